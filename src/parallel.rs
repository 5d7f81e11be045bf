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

//! # Parallel Row Rendering
//!
//! Renders every record of a batch into a row while keeping the batch
//! order. Each record is tagged with its position, rows are extracted in
//! any order on a Rayon pool, and the tagged rows are sorted back by
//! position before being returned.
//!
//! The first failing record aborts the batch; no partial result is
//! returned. Without the `parallel` feature, or for batches below
//! `min_parallel_records`, rows are rendered on the calling thread with
//! identical output.
//!
//! A [`ZiRenderPool`] owns the worker threads. Builders keep one alive
//! across builds; [`render_rows`] creates a short-lived one.

use crate::config::ZiCsvConfig;
use crate::errors::Result;
#[cfg(feature = "parallel")]
use crate::errors::ZiError;
use crate::extract::{extract_row, ZiRenderedRow};
use crate::schema::ZiResolvedSchema;

/// A rendered row tagged with the position of its source record.
#[derive(Clone, Debug, PartialEq)]
pub struct ZiIndexedRow {
    pub index: usize,
    pub row: ZiRenderedRow,
}

/// Worker threads used for parallel rendering.
#[derive(Debug)]
pub struct ZiRenderPool {
    workers: usize,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl ZiRenderPool {
    /// Starts `config.worker_count()` workers.
    pub fn new(config: &ZiCsvConfig) -> Result<Self> {
        let workers = config.worker_count();
        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("zicsv-render-{}", i))
            .build()
            .map_err(|e| ZiError::internal(format!("thread pool error: {}", e)))?;

        log::debug!("started render pool with {} worker(s)", workers);
        Ok(Self {
            workers,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    #[cfg(feature = "parallel")]
    fn render_indexed<T: Sync>(&self, records: &[T], schema: &ZiResolvedSchema<T>) -> Result<Vec<ZiIndexedRow>> {
        use rayon::prelude::*;

        log::debug!("rendering {} record(s) on {} worker(s)", records.len(), self.workers);
        self.pool.install(|| {
            records
                .par_iter()
                .enumerate()
                .map(|(index, record)| {
                    extract_row(record, index, schema).map(|row| ZiIndexedRow { index, row })
                })
                .collect::<Result<Vec<_>>>()
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn render_indexed<T: Sync>(&self, records: &[T], schema: &ZiResolvedSchema<T>) -> Result<Vec<ZiIndexedRow>> {
        render_indexed_sequential(records, schema)
    }
}

/// Whether a batch of `len` records is rendered on a pool.
pub fn uses_pool(len: usize, config: &ZiCsvConfig) -> bool {
    config.parallel && len >= config.min_parallel_records
}

/// Renders `records` into rows, in input order.
pub fn render_rows<T: Sync>(
    records: &[T],
    schema: &ZiResolvedSchema<T>,
    config: &ZiCsvConfig,
) -> Result<Vec<ZiRenderedRow>> {
    if uses_pool(records.len(), config) {
        let pool = ZiRenderPool::new(config)?;
        render_rows_in(records, schema, config, &pool)
    } else {
        Ok(into_rows(render_indexed_sequential(records, schema)?))
    }
}

/// Renders `records` into rows on an existing pool, in input order.
pub fn render_rows_in<T: Sync>(
    records: &[T],
    schema: &ZiResolvedSchema<T>,
    config: &ZiCsvConfig,
    pool: &ZiRenderPool,
) -> Result<Vec<ZiRenderedRow>> {
    let indexed = if uses_pool(records.len(), config) {
        pool.render_indexed(records, schema)?
    } else {
        render_indexed_sequential(records, schema)?
    };
    Ok(into_rows(indexed))
}

fn into_rows(mut indexed: Vec<ZiIndexedRow>) -> Vec<ZiRenderedRow> {
    indexed.sort_by_key(|r| r.index);
    indexed.into_iter().map(|r| r.row).collect()
}

fn render_indexed_sequential<T>(records: &[T], schema: &ZiResolvedSchema<T>) -> Result<Vec<ZiIndexedRow>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            extract_row(record, index, schema).map(|row| ZiIndexedRow { index, row })
        })
        .collect()
}
