pub mod error;
pub mod scoring;
pub mod types;

pub use error::*;
pub use types::*;
