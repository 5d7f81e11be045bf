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

//! # Output Sinks
//!
//! Destinations for encoded CSV lines. A build hands all of its lines to
//! the sink in one call, in order.
//!
//! - [`ZiCsv`]: a CSV file addressed by path, always appended to
//! - [`ZiMemorySink`]: collects lines in memory

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ZiCsvConfig;
use crate::errors::{Result, ZiError};

/// Append-only destination of encoded lines.
pub trait ZiLineSink {
    /// Appends `lines`, in order, each terminated by a newline.
    fn append_lines(&mut self, lines: &[String]) -> Result<()>;
}

/// Handle to a CSV file on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCsv {
    path: PathBuf,
}

impl ZiCsv {
    /// Wraps an existing or future CSV file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates an empty, uniquely named CSV file that outlives the process.
    pub fn create_temp(config: &ZiCsvConfig) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&config.temp_prefix).suffix(".csv");
        let file = match &config.temp_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                builder.tempfile_in(dir)?
            }
            None => builder.tempfile()?,
        };
        let (_, path) = file.keep().map_err(|e| ZiError::Io(e.error.to_string()))?;
        log::debug!("created csv destination {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file back line by line.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path)?;
        BufReader::new(file)
            .lines()
            .map(|line| line.map_err(ZiError::from))
            .collect()
    }

    fn write_failed(&self, err: impl ToString) -> ZiError {
        ZiError::sink_write(self.path.display().to_string(), err.to_string())
    }
}

impl ZiLineSink for ZiCsv {
    fn append_lines(&mut self, lines: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_failed(e))?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{}", line).map_err(|e| self.write_failed(e))?;
        }
        writer.flush().map_err(|e| self.write_failed(e))?;
        Ok(())
    }
}

/// Sink keeping every appended line in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZiMemorySink {
    lines: Vec<String>,
}

impl ZiMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// The collected lines joined the way a file would hold them.
    pub fn to_text(&self) -> String {
        self.lines.iter().map(|l| format!("{}\n", l)).collect()
    }
}

impl ZiLineSink for ZiMemorySink {
    fn append_lines(&mut self, lines: &[String]) -> Result<()> {
        self.lines.extend_from_slice(lines);
        Ok(())
    }
}
