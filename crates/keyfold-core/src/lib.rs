pub mod config;
pub mod error;

pub use config::{CodecConfig, Mode, DEFAULT_MAX_DEPTH};
pub use error::{CodecError, Malformed, Result};

#[cfg(test)]
mod tests;
