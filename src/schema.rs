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

//! # Column Resolution
//!
//! Turns a [`ZiTypeDescriptor`] and the requested selection groups into the
//! final, ordered list of exported columns.
//!
//! ## Resolution Steps
//!
//! 1. Read the table policy (defaults apply when the type has none)
//! 2. Pre-elect fields: every field under `include_all_fields`, otherwise
//!    only fields with column metadata; `exclude_parent` limits both to
//!    declared fields; static fields are dropped under `ignore_static_fields`
//! 3. Drop excluded fields
//! 4. Keep fields whose groups intersect the requested groups (all fields
//!    when no group is requested)
//! 5. Stable sort by column order
//! 6. Compute titles and field-level defaults
//!
//! The title list is kept only when at least one title is non-blank.

use std::collections::HashMap;
use std::fmt;

use crate::descriptor::{ZiFieldDescriptor, ZiFieldOrigin, ZiTypeDescriptor};
use crate::errors::Result;

/// Ordered columns, titles and defaults for one build.
pub struct ZiResolvedSchema<T> {
    type_name: String,
    fields: Vec<ZiFieldDescriptor<T>>,
    titles: Option<Vec<Option<String>>>,
    default_values: HashMap<usize, String>,
    global_default: Option<String>,
}

impl<T> ZiResolvedSchema<T> {
    /// Resolves the exported columns of `descriptor` for `groups`.
    ///
    /// Blank and repeated group names are ignored.
    pub fn resolve(descriptor: &ZiTypeDescriptor<T>, groups: &[&str]) -> Result<Self> {
        let table = descriptor.table().cloned().unwrap_or_default();
        let global_default = table.default_value.clone().filter(|v| !v.is_empty());

        let mut selected_groups: Vec<&str> = Vec::with_capacity(groups.len());
        for group in groups.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
            if !selected_groups.contains(&group) {
                selected_groups.push(group);
            }
        }

        let mut fields: Vec<ZiFieldDescriptor<T>> = descriptor
            .fields()
            .iter()
            .filter(|f| !table.exclude_parent || f.origin == ZiFieldOrigin::Declared)
            .filter(|f| table.include_all_fields || f.column.is_some())
            .filter(|f| !table.ignore_static_fields || !f.is_static)
            .filter(|f| !f.excluded)
            .filter(|f| passes_groups(f, &selected_groups))
            .cloned()
            .collect();

        // Vec::sort_by_key is stable: equal orders keep encounter order.
        fields.sort_by_key(|f| f.order());

        let mut titles = Vec::with_capacity(fields.len());
        let mut default_values = HashMap::new();
        for (position, field) in fields.iter().enumerate() {
            let column_title = field
                .column
                .as_ref()
                .and_then(|c| c.title.clone())
                .filter(|t| !t.is_empty());
            let title = match column_title {
                Some(title) => Some(title),
                None if table.use_field_name_as_title => Some(field.name.clone()),
                None => None,
            };
            titles.push(title);

            if let Some(default) = field
                .column
                .as_ref()
                .and_then(|c| c.default_value.as_ref())
                .filter(|v| !v.is_empty())
            {
                default_values.insert(position, default.clone());
            }
        }

        let has_title = titles
            .iter()
            .any(|t| t.as_deref().map_or(false, |t| !t.trim().is_empty()));

        log::debug!(
            "resolved {} column(s) of '{}' for groups {:?}: {:?}",
            fields.len(),
            descriptor.type_name(),
            selected_groups,
            fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>()
        );

        Ok(Self {
            type_name: descriptor.type_name().to_string(),
            fields,
            titles: has_title.then_some(titles),
            default_values,
            global_default,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[ZiFieldDescriptor<T>] {
        &self.fields
    }

    /// Title of each column, `None` when the export is headerless.
    pub fn titles(&self) -> Option<&[Option<String>]> {
        self.titles.as_deref()
    }

    /// Field-level default of the column at `position`.
    pub fn default_value(&self, position: usize) -> Option<&str> {
        self.default_values.get(&position).map(String::as_str)
    }

    /// Type-wide default applied after field-level defaults.
    pub fn global_default(&self) -> Option<&str> {
        self.global_default.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for ZiResolvedSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiResolvedSchema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("titles", &self.titles)
            .field("default_values", &self.default_values)
            .field("global_default", &self.global_default)
            .finish()
    }
}

fn passes_groups<T>(field: &ZiFieldDescriptor<T>, selected: &[&str]) -> bool {
    if selected.is_empty() {
        return true;
    }
    field
        .groups()
        .iter()
        .any(|group| selected.contains(&group.as_str()))
}
