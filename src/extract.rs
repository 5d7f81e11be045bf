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

//! Reads one record into a row of cell values.
//!
//! A present value is used as-is. An absent one (`Value::Null`) falls back to
//! the column's own default, then to the type-wide default, and finally
//! stays null.

use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::schema::ZiResolvedSchema;

/// Cell values of one record, positionally aligned with the schema columns.
pub type ZiRenderedRow = Vec<Value>;

/// Extracts the row of `record`, the `index`-th record of its batch.
pub fn extract_row<T>(record: &T, index: usize, schema: &ZiResolvedSchema<T>) -> Result<ZiRenderedRow> {
    schema
        .fields()
        .iter()
        .enumerate()
        .map(|(position, field)| {
            let value = field
                .read(record)
                .map_err(|err| ZiError::field_access(&field.name, index, format!("{:#}", err)))?;
            if !value.is_null() {
                return Ok(value);
            }
            let fallback = schema
                .default_value(position)
                .or_else(|| schema.global_default())
                .map_or(Value::Null, |v| Value::String(v.to_string()));
            Ok(fallback)
        })
        .collect()
}
