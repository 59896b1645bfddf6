mod config;
mod error;
mod index;
mod rules;

pub use config::{OverlapTest, ValidationConfig};
pub use error::{ErrorKind, ValidationError};
pub use rules::{validate_all, validate_subdivision};
