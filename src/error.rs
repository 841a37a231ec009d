// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Errors reported by the annotation overlay engine.

/// Recoverable failures of overlay operations.
///
/// Neither variant leaves the engine in a partially updated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// No image is loaded, or the current scale factor is zero.
    NotReady(String),
    /// A persisted record is missing fields or carries bad values.
    InvalidRecord(String),
}

impl OverlayError {
    pub fn not_ready(reason: impl Into<String>) -> Self {
        OverlayError::NotReady(reason.into())
    }

    pub fn invalid_record(reason: impl Into<String>) -> Self {
        OverlayError::InvalidRecord(reason.into())
    }
}

impl std::fmt::Display for OverlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayError::NotReady(reason) => write!(f, "not ready: {}", reason),
            OverlayError::InvalidRecord(reason) => write!(f, "invalid annotation record: {}", reason),
        }
    }
}

impl std::error::Error for OverlayError {}

impl From<serde_json::Error> for OverlayError {
    fn from(err: serde_json::Error) -> Self {
        OverlayError::InvalidRecord(err.to_string())
    }
}

impl From<serde_yaml::Error> for OverlayError {
    fn from(err: serde_yaml::Error) -> Self {
        OverlayError::InvalidRecord(err.to_string())
    }
}
