//! Error types for the variant API client.
//!
//! # Design
//! The backend exposes exactly one failure mode to this layer: the request
//! did not produce the expected success response. `HttpError` carries the raw
//! status code and body for debugging; the serialization variants cover the
//! local JSON boundary on either side of the round trip. Callers that need
//! finer distinctions inspect the status themselves.

use std::fmt;

/// Errors returned by the `build_*` / `parse_*` client methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned a status other than the expected success code.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
