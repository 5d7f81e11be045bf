//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Zi CSV Error Module
//!
//! This module defines the error type shared by every phase of a CSV build.
//!
//! ## Error Categories
//!
//! - **MetadataResolution**: a record type could not be described; raised
//!   before any row is rendered
//! - **FieldAccess**: a field value could not be read from one record; the
//!   whole batch fails and nothing is written
//! - **SinkWrite**: the destination rejected the produced lines
//! - **Io**: filesystem errors outside of the sink write itself
//! - **Serde**: configuration parsing failures
//! - **Validation**: invalid configuration or arguments
//! - **Internal**: unexpected internal failures
//!
//! Every fault is local to one build call and none of them is retried.
//!
//! ## Usage
//!
//! ```rust
//! use zicsv::errors::{Result, ZiError};
//!
//! fn check_threads(threads: usize) -> Result<()> {
//!     if threads == 0 {
//!         return Err(ZiError::validation("max_threads must be positive"));
//!     }
//!     Ok(())
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convience result type used throughout Zi CSV.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for Zi CSV.
#[derive(Debug, Error, Serialize, Deserialize, PartialEq)]
pub enum ZiError {
    /// The metadata of a record type is unusable (duplicate fields,
    /// conflicting group declarations, ...).
    #[error("cannot resolve metadata of '{type_name}': {message}")]
    MetadataResolution { type_name: String, message: String },

    /// A field value could not be read from the record at `index`.
    #[error("cannot read field '{field}' of record {index}: {message}")]
    FieldAccess {
        field: String,
        index: usize,
        message: String,
    },

    /// The output destination failed to accept the produced lines.
    #[error("cannot write to '{path}': {message}")]
    SinkWrite { path: String, message: String },

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct metadata resolution errors.
    pub fn metadata(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::MetadataResolution {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Helper to construct field access errors.
    pub fn field_access(field: impl Into<String>, index: usize, message: impl Into<String>) -> Self {
        ZiError::FieldAccess {
            field: field.into(),
            index,
            message: message.into(),
        }
    }

    /// Helper to construct sink write errors.
    pub fn sink_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        ZiError::SinkWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        ZiError::Internal(message.into())
    }
}
