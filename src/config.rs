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

//! # Builder Configuration
//!
//! Runtime knobs for a CSV build. The configuration can be constructed in
//! code or loaded from a JSON or YAML document:
//!
//! ```yaml
//! parallel: true
//! max_threads: 4
//! min_parallel_records: 128
//! temp_prefix: export
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};

/// Configuration for [`ZiCsvBuilder`](crate::builder::ZiCsvBuilder).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ZiCsvConfig {
    /// Render rows on a worker pool.
    pub parallel: bool,
    /// Upper bound on worker threads. `None` uses one worker per core.
    pub max_threads: Option<usize>,
    /// Batches smaller than this are rendered on the calling thread.
    pub min_parallel_records: usize,
    /// File name prefix of fresh destinations.
    pub temp_prefix: String,
    /// Directory of fresh destinations, the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ZiCsvConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            max_threads: None,
            min_parallel_records: 64,
            temp_prefix: "d_t_c".to_string(),
            temp_dir: None,
        }
    }
}

impl ZiCsvConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: ZiCsvConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: ZiCsvConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, choosing the parser by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
            Some("json") => Self::from_json_str(&source),
            other => Err(ZiError::validation(format!(
                "unsupported config extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Checks the invariants the builder relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_threads == Some(0) {
            return Err(ZiError::validation("max_threads must be positive"));
        }
        if self.temp_prefix.trim().is_empty() {
            return Err(ZiError::validation("temp_prefix must not be empty"));
        }
        Ok(())
    }

    /// Number of workers a parallel render may use.
    pub fn worker_count(&self) -> usize {
        self.max_threads.unwrap_or_else(num_cpus::get).max(1)
    }
}
