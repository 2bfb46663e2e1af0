pub mod pagination;
pub mod validate;

pub use pagination::PageRequest;
pub use validate::{IdPath, ValidatedJson};
