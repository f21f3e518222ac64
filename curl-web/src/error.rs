//! Error types for the fallible edges of the crate.
//!
//! The pose pipeline itself is total; only configuration and JS bridge
//! decoding can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid landmark buffer: expected {expected} values, got {actual}")]
    LandmarkBuffer { expected: usize, actual: usize },

    #[error("Invalid timestamp: {0}")]
    Timestamp(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown {kind}: {value}")]
    UnknownName { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<Error> for wasm_bindgen::JsValue {
    fn from(e: Error) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}
