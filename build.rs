use shadow_rs::ShadowBuilder;

fn main() {
    // Build metadata backs `shop-rs --version`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate shop-rs build metadata");
}
