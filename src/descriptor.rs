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

//! # Record Type Descriptors
//!
//! Describes which fields a record type has and how each one may be
//! exported. A record type registers its fields explicitly, in encounter
//! order, together with an accessor that reads the field from an instance.
//!
//! ## Metadata Levels
//!
//! - **Table level** ([`ZiTableMeta`]): policy for the whole type, such as
//!   including every field or skipping inherited ones
//! - **Column level** ([`ZiColumnMeta`]): marks a field exportable and
//!   carries its title, order, default value and groups
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use zicsv::descriptor::{ZiColumnMeta, ZiFieldDescriptor, ZiTypeDescriptor};
//!
//! struct User {
//!     name: Option<String>,
//!     age: Option<u32>,
//! }
//!
//! let descriptor = ZiTypeDescriptor::<User>::builder("User")
//!     .field(
//!         ZiFieldDescriptor::getter("name", "String", |u: &User| json!(u.name))
//!             .column(ZiColumnMeta::new().title("Name").order(1)),
//!     )
//!     .field(
//!         ZiFieldDescriptor::getter("age", "u32", |u: &User| json!(u.age))
//!             .column(ZiColumnMeta::new().default_value("0")),
//!     )
//!     .build()?;
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, ZiError};

/// Reads one field from a record. `Value::Null` means the field is absent.
pub type ZiFieldAccessor<T> = Arc<dyn Fn(&T) -> anyhow::Result<Value> + Send + Sync>;

/// Export policy attached to a whole record type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZiTableMeta {
    /// Only consider fields declared by the type itself.
    pub exclude_parent: bool,
    /// Export every field, not only the ones carrying column metadata.
    pub include_all_fields: bool,
    /// Skip static (type-level) fields.
    pub ignore_static_fields: bool,
    /// Fall back to the field name when a column has no title.
    pub use_field_name_as_title: bool,
    /// Value written for any absent field without its own default.
    pub default_value: Option<String>,
}

impl Default for ZiTableMeta {
    fn default() -> Self {
        Self {
            exclude_parent: false,
            include_all_fields: false,
            ignore_static_fields: true,
            use_field_name_as_title: false,
            default_value: None,
        }
    }
}

impl ZiTableMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude_parent(mut self, value: bool) -> Self {
        self.exclude_parent = value;
        self
    }

    pub fn include_all_fields(mut self, value: bool) -> Self {
        self.include_all_fields = value;
        self
    }

    pub fn ignore_static_fields(mut self, value: bool) -> Self {
        self.ignore_static_fields = value;
        self
    }

    pub fn use_field_name_as_title(mut self, value: bool) -> Self {
        self.use_field_name_as_title = value;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Column metadata marking a field as exportable.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZiColumnMeta {
    /// Header text; blank means "no title".
    pub title: Option<String>,
    /// Position key, ascending. Equal keys keep encounter order.
    pub order: i32,
    /// Value written when the field is absent.
    pub default_value: Option<String>,
    /// Selection groups this column belongs to.
    pub groups: Vec<String>,
}

impl ZiColumnMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

/// Where a field comes from relative to the described type.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ZiFieldOrigin {
    /// Declared by the type itself.
    Declared,
    /// Inherited from an embedded or parent type.
    Inherited,
}

/// One field of a record type together with its export metadata.
pub struct ZiFieldDescriptor<T> {
    pub name: String,
    pub type_name: String,
    pub column: Option<ZiColumnMeta>,
    pub origin: ZiFieldOrigin,
    pub is_static: bool,
    pub excluded: bool,
    accessor: ZiFieldAccessor<T>,
}

impl<T> ZiFieldDescriptor<T> {
    /// Creates a declared, non-static field read by a fallible accessor.
    pub fn new<F>(name: impl Into<String>, type_name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            column: None,
            origin: ZiFieldOrigin::Declared,
            is_static: false,
            excluded: false,
            accessor: Arc::new(accessor),
        }
    }

    /// Creates a field whose accessor cannot fail.
    pub fn getter<F>(name: impl Into<String>, type_name: impl Into<String>, getter: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Self::new(name, type_name, move |record: &T| Ok(getter(record)))
    }

    pub fn column(mut self, column: ZiColumnMeta) -> Self {
        self.column = Some(column);
        self
    }

    pub fn inherited(mut self) -> Self {
        self.origin = ZiFieldOrigin::Inherited;
        self
    }

    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// Column order, 0 for fields without column metadata.
    pub fn order(&self) -> i32 {
        self.column.as_ref().map_or(0, |c| c.order)
    }

    /// Groups declared by the column, empty without column metadata.
    pub fn groups(&self) -> &[String] {
        self.column
            .as_ref()
            .map(|c| c.groups.as_slice())
            .unwrap_or_default()
    }

    /// Reads the field's current value from `record`.
    pub fn read(&self, record: &T) -> anyhow::Result<Value> {
        (self.accessor)(record)
    }
}

impl<T> Clone for ZiFieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            column: self.column.clone(),
            origin: self.origin,
            is_static: self.is_static,
            excluded: self.excluded,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<T> fmt::Debug for ZiFieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiFieldDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("column", &self.column)
            .field("origin", &self.origin)
            .field("is_static", &self.is_static)
            .field("excluded", &self.excluded)
            .finish_non_exhaustive()
    }
}

/// Complete description of a record type: policy plus fields in encounter order.
pub struct ZiTypeDescriptor<T> {
    type_name: String,
    table: Option<ZiTableMeta>,
    fields: Vec<ZiFieldDescriptor<T>>,
}

impl<T> ZiTypeDescriptor<T> {
    pub fn builder(type_name: impl Into<String>) -> ZiTypeDescriptorBuilder<T> {
        ZiTypeDescriptorBuilder {
            type_name: type_name.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn table(&self) -> Option<&ZiTableMeta> {
        self.table.as_ref()
    }

    /// Declared and inherited fields.
    pub fn fields(&self) -> &[ZiFieldDescriptor<T>] {
        &self.fields
    }

    /// Fields declared by the type itself.
    pub fn declared_fields(&self) -> impl Iterator<Item = &ZiFieldDescriptor<T>> {
        self.fields
            .iter()
            .filter(|f| f.origin == ZiFieldOrigin::Declared)
    }
}

impl<T> Clone for ZiTypeDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name.clone(),
            table: self.table.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl<T> fmt::Debug for ZiTypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiTypeDescriptor")
            .field("type_name", &self.type_name)
            .field("table", &self.table)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder validating a [`ZiTypeDescriptor`].
pub struct ZiTypeDescriptorBuilder<T> {
    type_name: String,
    table: Option<ZiTableMeta>,
    fields: Vec<ZiFieldDescriptor<T>>,
}

impl<T> ZiTypeDescriptorBuilder<T> {
    pub fn table(mut self, table: ZiTableMeta) -> Self {
        self.table = Some(table);
        self
    }

    pub fn field(mut self, field: ZiFieldDescriptor<T>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = ZiFieldDescriptor<T>>,
    {
        self.fields.extend(fields);
        self
    }

    /// Finishes the descriptor.
    ///
    /// Group tags are trimmed. Fails when two fields of the same origin
    /// share a name, or when a column declares a blank or repeated group.
    pub fn build(mut self) -> Result<ZiTypeDescriptor<T>> {
        let mut seen = HashSet::new();
        for field in &mut self.fields {
            if field.name.trim().is_empty() {
                return Err(ZiError::metadata(&self.type_name, "field name must not be blank"));
            }
            if !seen.insert((field.origin, field.name.clone())) {
                return Err(ZiError::metadata(
                    &self.type_name,
                    format!("field '{}' is declared more than once", field.name),
                ));
            }

            let Some(column) = field.column.as_mut() else {
                continue;
            };
            let mut groups = HashSet::new();
            for group in column.groups.iter_mut() {
                let trimmed = group.trim().to_string();
                if trimmed.is_empty() {
                    return Err(ZiError::metadata(
                        &self.type_name,
                        format!("field '{}' declares a blank group", field.name),
                    ));
                }
                if trimmed != *group {
                    *group = trimmed;
                }
                if !groups.insert(group.clone()) {
                    return Err(ZiError::metadata(
                        &self.type_name,
                        format!("field '{}' declares group '{}' twice", field.name, group),
                    ));
                }
            }
        }

        Ok(ZiTypeDescriptor {
            type_name: self.type_name,
            table: self.table,
            fields: self.fields,
        })
    }
}

/// Record types that can describe their own export metadata.
pub trait ZiTabular: Sized + Send + Sync + 'static {
    fn describe() -> Result<ZiTypeDescriptor<Self>>;
}
