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

//! # Zi Record Module
//!
//! The JSON-payload record of the Zi framework, exportable without writing
//! a descriptor by hand. Columns are addressed by path:
//!
//! - `id`: the record identifier
//! - `metadata.<key>`: a metadata entry
//! - `payload.<a>.<b>` or just `<a>.<b>`: a nested payload value
//!
//! ```rust
//! use serde_json::json;
//! use zicsv::descriptor::ZiColumnMeta;
//! use zicsv::record::ZiRecord;
//!
//! let descriptor = ZiRecord::type_descriptor([
//!     ("id", ZiColumnMeta::new().title("Id")),
//!     ("user.name", ZiColumnMeta::new().title("Name").order(1)),
//! ])?;
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::descriptor::{ZiColumnMeta, ZiFieldDescriptor, ZiTypeDescriptor};
use crate::errors::Result;

/// Generic metadata map that may accompany a record.
pub type ZiMetadata = Map<String, Value>;

/// Fundamental data unit of the Zi framework.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ZiRecord {
    /// Optional stable identifier for the record.
    pub id: Option<String>,

    /// Primary payload carrying user content.
    pub payload: Value,

    /// Additional attributes such as scores, tags, or provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ZiMetadata>,
}

impl ZiRecord {
    /// Constructs a record with the given payload and optional identifier.
    pub fn new(id: impl Into<Option<String>>, payload: Value) -> Self {
        ZiRecord {
            id: id.into(),
            payload,
            metadata: None,
        }
    }

    /// Attaches metadata to the record.
    pub fn with_metadata(mut self, metadata: ZiMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns a mutable reference to the metadata map, creating it if necessary.
    pub fn metadata_mut(&mut self) -> &mut ZiMetadata {
        self.metadata.get_or_insert_with(ZiMetadata::new)
    }

    /// Value found at `path`, `Value::Null` when any segment is missing.
    pub fn lookup(&self, path: &str) -> Value {
        if path == "id" {
            return self.id.clone().map_or(Value::Null, Value::String);
        }
        if let Some(key) = path.strip_prefix("metadata.") {
            return self
                .metadata
                .as_ref()
                .and_then(|m| m.get(key))
                .cloned()
                .unwrap_or(Value::Null);
        }

        let path = path.strip_prefix("payload.").unwrap_or(path);
        path.split('.')
            .try_fold(&self.payload, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Describes `ZiRecord` as a table with one column per path.
    ///
    /// Columns are registered in the given order; the path doubles as the
    /// field name.
    pub fn type_descriptor<I, S>(columns: I) -> Result<ZiTypeDescriptor<ZiRecord>>
    where
        I: IntoIterator<Item = (S, ZiColumnMeta)>,
        S: Into<String>,
    {
        let fields = columns.into_iter().map(|(path, column)| {
            let path = path.into();
            let key = path.clone();
            ZiFieldDescriptor::getter(path, "json", move |record: &ZiRecord| record.lookup(&key))
                .column(column)
        });
        ZiTypeDescriptor::builder("ZiRecord").fields(fields).build()
    }
}

/// Convenience alias for working on batches of records.
pub type ZiRecordBatch = Vec<ZiRecord>;
