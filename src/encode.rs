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

//! # CSV Text Encoding
//!
//! Turns rendered rows into CSV lines.
//!
//! ## Cell Rules
//!
//! - A null cell is written as the two characters `""`
//! - Every `"` is doubled
//! - A value whose original text contains a comma is wrapped in quotes
//!
//! | value    | cell         |
//! |----------|--------------|
//! | `hello`  | `hello`      |
//! | `a,b`    | `"a,b"`      |
//! | `a"b`    | `a""b`       |
//! | `a,"b"`  | `"a,""b"""`  |
//! | null     | `""`         |
//!
//! Lines carry no terminator; the sink adds it.

use serde_json::Value;

use crate::extract::ZiRenderedRow;

const NULL_CELL: &str = "\"\"";

/// Natural text of a cell value, `None` for null.
///
/// Strings are taken verbatim, numbers and booleans through `Display`,
/// arrays and objects as compact JSON.
pub fn natural_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Escapes one piece of text as a CSV cell.
pub fn escape_text(text: &str) -> String {
    let escaped = text.replace('"', "\"\"");
    // Comma detection looks at the text before quote doubling.
    if text.contains(',') {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}

/// Escapes an optional piece of text, null becoming `""`.
pub fn escape_cell(text: Option<&str>) -> String {
    text.map_or_else(|| NULL_CELL.to_string(), escape_text)
}

/// Escapes a cell value.
pub fn escape_value(value: &Value) -> String {
    escape_cell(natural_text(value).as_deref())
}

/// Joins the escaped cells of one row.
pub fn encode_row(row: &[Value]) -> String {
    row.iter().map(escape_value).collect::<Vec<_>>().join(",")
}

/// Joins the escaped titles of the header line.
pub fn encode_titles(titles: &[Option<String>]) -> String {
    titles
        .iter()
        .map(|t| escape_cell(t.as_deref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Encodes `rows` into lines, leading with the title line when `titles`
/// is given and the build is not appending.
///
/// No rows means no lines at all, header included.
pub fn encode_lines(rows: &[ZiRenderedRow], titles: Option<&[Option<String>]>, append: bool) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    if let (false, Some(titles)) = (append, titles) {
        lines.push(encode_titles(titles));
    }
    lines.extend(rows.iter().map(|row| encode_row(row)));
    lines
}
