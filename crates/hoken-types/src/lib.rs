//! Core types shared across the hoken-academy crates

mod error;
mod types;

pub use error::*;
pub use types::*;
