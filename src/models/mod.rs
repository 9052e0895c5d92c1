//! Request and response models shared by the cascade and the HTTP layer.

pub mod claim;
pub mod classification;
pub mod enums;

pub use claim::*;
pub use classification::*;
pub use enums::*;

use thiserror::Error;

/// A string did not name any variant of a `str_enum!` type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid enum value for {field}: {value}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}
