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

//! # CSV Builder
//!
//! Entry point of a CSV export. A build runs in three phases:
//!
//! 1. **Resolve**: compute the columns once, before touching any record
//! 2. **Render**: extract every record into a row, in parallel, restoring
//!    input order afterwards
//! 3. **Encode and write**: escape the rows into lines and hand them to the
//!    sink in a single call
//!
//! A fresh build (`build`) writes into a new temporary file and leads with
//! the title line. An appending build (`build_into`) never writes titles.
//!
//! ```rust
//! use zicsv::builder::ZiCsvBuilder;
//!
//! let csv = ZiCsvBuilder::<User>::for_type()?.build(users, &["public"])?;
//! println!("written to {}", csv.path().display());
//! ```

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::config::ZiCsvConfig;
use crate::descriptor::{ZiTabular, ZiTypeDescriptor};
use crate::encode::encode_lines;
use crate::errors::{Result, ZiError};
use crate::parallel::{render_rows, render_rows_in, uses_pool, ZiRenderPool};
use crate::schema::ZiResolvedSchema;
use crate::sink::{ZiCsv, ZiLineSink};

/// Statistics about one build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZiBuildStats {
    /// Number of records rendered.
    pub records: usize,
    /// Number of lines handed to the sink, title included.
    pub lines_written: usize,
    /// Number of exported columns.
    pub columns: usize,
    /// Whether the title line was written.
    pub title_emitted: bool,
}

/// Builds CSV output for records of type `T`.
///
/// The render pool is started by the first parallel build and shared by
/// every later one until the configuration changes.
#[derive(Debug)]
pub struct ZiCsvBuilder<T> {
    descriptor: ZiTypeDescriptor<T>,
    config: ZiCsvConfig,
    pool: Mutex<Option<Arc<ZiRenderPool>>>,
}

impl<T: Send + Sync> ZiCsvBuilder<T> {
    /// Creates a builder for an explicit descriptor.
    pub fn of(descriptor: ZiTypeDescriptor<T>) -> Self {
        Self {
            descriptor,
            config: ZiCsvConfig::default(),
            pool: Mutex::new(None),
        }
    }

    /// Creates a builder from the type's own description.
    pub fn for_type() -> Result<Self>
    where
        T: ZiTabular,
    {
        Ok(Self::of(T::describe()?))
    }

    pub fn with_config(mut self, config: ZiCsvConfig) -> Self {
        self.config = config;
        self.pool = Mutex::new(None);
        self
    }

    pub fn config(&self) -> &ZiCsvConfig {
        &self.config
    }

    pub fn descriptor(&self) -> &ZiTypeDescriptor<T> {
        &self.descriptor
    }

    /// Render pool of this builder, started on first use.
    pub fn render_pool(&self) -> Result<Arc<ZiRenderPool>> {
        let mut slot = self
            .pool
            .lock()
            .map_err(|_| ZiError::internal("render pool lock poisoned"))?;
        if let Some(pool) = slot.as_ref() {
            return Ok(Arc::clone(pool));
        }
        let pool = Arc::new(ZiRenderPool::new(&self.config)?);
        *slot = Some(Arc::clone(&pool));
        Ok(pool)
    }

    /// Resolves the columns exported for `groups`.
    pub fn resolve(&self, groups: &[&str]) -> Result<ZiResolvedSchema<T>> {
        ZiResolvedSchema::resolve(&self.descriptor, groups)
    }

    /// Writes `records` into a new temporary CSV file, title line first.
    pub fn build(&self, records: Vec<T>, groups: &[&str]) -> Result<ZiCsv> {
        self.build_with_stats(records, groups).map(|(csv, _)| csv)
    }

    /// Like [`build`](Self::build), also returning statistics.
    pub fn build_with_stats(&self, records: Vec<T>, groups: &[&str]) -> Result<(ZiCsv, ZiBuildStats)> {
        self.config.validate()?;
        let schema = self.resolve(groups)?;
        let mut csv = ZiCsv::create_temp(&self.config)?;
        let stats = self.write(records, &schema, &mut csv, false)?;
        Ok((csv, stats))
    }

    /// Appends `records` to `sink` without a title line.
    pub fn build_into<S: ZiLineSink>(&self, records: Vec<T>, sink: &mut S, groups: &[&str]) -> Result<ZiBuildStats> {
        self.config.validate()?;
        let schema = self.resolve(groups)?;
        self.write(records, &schema, sink, true)
    }

    fn write<S: ZiLineSink>(
        &self,
        records: Vec<T>,
        schema: &ZiResolvedSchema<T>,
        sink: &mut S,
        append: bool,
    ) -> Result<ZiBuildStats> {
        let mut stats = ZiBuildStats {
            records: records.len(),
            columns: schema.len(),
            ..Default::default()
        };
        if records.is_empty() {
            log::debug!("no '{}' records to export", schema.type_name());
            return Ok(stats);
        }

        let rows = if uses_pool(records.len(), &self.config) {
            render_rows_in(&records, schema, &self.config, &*self.render_pool()?)?
        } else {
            render_rows(&records, schema, &self.config)?
        };
        drop(records);

        let lines = encode_lines(&rows, schema.titles(), append);
        stats.title_emitted = lines.len() > rows.len();
        stats.lines_written = lines.len();
        sink.append_lines(&lines)?;

        log::info!(
            "exported {} '{}' record(s) as {} line(s) ({} column(s), append: {})",
            stats.records,
            schema.type_name(),
            stats.lines_written,
            stats.columns,
            append
        );
        Ok(stats)
    }
}
