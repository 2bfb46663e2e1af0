//! Logger setup on top of `tracing-subscriber`.
//!
//! Supports console output with optional colors and file output in full,
//! compact or JSON format. The level string doubles as an `EnvFilter`
//! directive, so `info,shop_rs=debug` works too.

pub mod config;
mod writer;

pub use config::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
pub use writer::FileWriter;

use std::io::IsTerminal;

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global logger with the given configuration
pub fn init_logger(config: &LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(build_layers(config)?)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}

/// Builds the output layers. The file layer goes first so console ANSI
/// settings cannot leak into the file.
fn build_layers(config: &LoggerConfig) -> anyhow::Result<Vec<BoxedLayer>> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }

    if config.console.enabled {
        let use_ansi = config.console.colored && std::io::stdout().is_terminal();
        layers.push(
            fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true)
                .boxed(),
        );
    }

    Ok(layers)
}

fn file_layer(config: &FileConfig) -> anyhow::Result<BoxedLayer> {
    let writer = FileWriter::new(config)?;
    let base = fmt::layer().with_ansi(false).with_target(true);

    Ok(match config.format {
        LogFormat::Full => base.with_writer(writer).boxed(),
        LogFormat::Compact => base.compact().with_writer(writer).boxed(),
        LogFormat::Json => base.json().with_writer(writer).boxed(),
    })
}
