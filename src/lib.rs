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

//! # Zi CSV Library
//!
//! Metadata-driven CSV export for the Zi framework. Records of any type are
//! turned into CSV lines: the exported columns, their order, titles and
//! fallback values come from the type's descriptor, and rows are rendered
//! in parallel without losing the input order.
//!
//! ## Module Overview
//!
//! - **descriptor**: record type metadata (table policy, columns, accessors)
//! - **schema**: resolution of the exported columns for a set of groups
//! - **extract**: one record into one row, with default-value fallback
//! - **parallel**: order-preserving parallel rendering of a batch
//! - **encode**: CSV cell escaping and line encoding
//! - **sink**: CSV files and in-memory destinations
//! - **builder**: the build entry point tying the phases together
//! - **record**: the JSON-payload ZiRecord and its ready-made descriptor
//! - **config**: runtime configuration
//! - **errors**: the shared error type
//!
//! ## Feature Flags
//!
//! - `parallel`: renders rows on a Rayon pool (enabled by default)
//! - `full`: enables all features
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use zicsv::{ZiColumnMeta, ZiCsvBuilder, ZiRecord};
//!
//! let descriptor = ZiRecord::type_descriptor([
//!     ("name", ZiColumnMeta::new().title("Name").order(1)),
//!     ("age", ZiColumnMeta::new().title("Age").default_value("0")),
//! ])?;
//!
//! let records = vec![
//!     ZiRecord::new(None, json!({"name": "Al"})),
//!     ZiRecord::new(None, json!({"age": 30})),
//! ];
//!
//! let csv = ZiCsvBuilder::of(descriptor).build(records, &[])?;
//! // Age,Name
//! // 0,Al
//! // 30,""
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, ZiError>`. A failure in any phase
//! aborts the build and nothing is written.

#![allow(non_snake_case)]

pub mod errors;
pub mod config;
pub mod descriptor;
pub mod schema;
pub mod extract;
pub mod parallel;
pub mod encode;
pub mod sink;
pub mod builder;
pub mod record;

pub use errors::{Result, ZiError};
pub use config::ZiCsvConfig;
pub use descriptor::{
    ZiColumnMeta, ZiFieldAccessor, ZiFieldDescriptor, ZiFieldOrigin, ZiTableMeta, ZiTabular,
    ZiTypeDescriptor, ZiTypeDescriptorBuilder,
};
pub use schema::ZiResolvedSchema;
pub use extract::{extract_row, ZiRenderedRow};
pub use parallel::{render_rows, render_rows_in, ZiIndexedRow, ZiRenderPool};
pub use encode::{encode_lines, encode_row, escape_value};
pub use sink::{ZiCsv, ZiLineSink, ZiMemorySink};
pub use builder::{ZiBuildStats, ZiCsvBuilder};
pub use record::{ZiMetadata, ZiRecord, ZiRecordBatch};
