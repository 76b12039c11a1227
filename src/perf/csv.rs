// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Merging of per-hart performance dumps
//!
//! Performance segments of individual harts may be dumped as JSON arrays of
//! segment objects in files named `hart_<id>_perf.json`. This module merges
//! such dumps into a single [`Table`] with one row per hart, rendered as CSV.
//! Columns are named `<segment index>_<key>`.

use core::fmt;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Prefix of per-hart dump file names
pub const FILE_PREFIX: &str = "hart_";
/// Suffix of per-hart dump file names
pub const FILE_SUFFIX: &str = "_perf.json";

/// Extract the hart id from the name of a dump file
///
/// Returns `None` if the path does not name a dump file.
pub fn hart_id(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let id = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// Merged performance metrics of multiple harts
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<(u64, Map<String, Value>)>,
}

impl Table {
    /// Add the segments of a single hart as a new row
    ///
    /// New columns are appended in the order they are encountered.
    pub fn push(&mut self, hart: u64, segments: &[Map<String, Value>]) {
        let mut row = Map::new();
        for (i, segment) in segments.iter().enumerate() {
            for (key, value) in segment {
                let column = format!("{i}_{key}");
                if !self.columns.contains(&column) {
                    self.columns.push(column.clone());
                }
                row.insert(column, value.clone());
            }
        }
        self.rows.push((hart, row));
    }

    /// Retrieve the column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Retrieve the value of a cell, if present
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|(_, r)| r.get(column))
    }

    /// Retrieve the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for column in &self.columns {
            write!(f, ",{}", Cell(column))?;
        }
        writeln!(f)?;
        for (hart, row) in &self.rows {
            write!(f, "{hart}")?;
            for column in &self.columns {
                match row.get(column) {
                    None | Some(Value::Null) => write!(f, ",")?,
                    Some(Value::String(s)) => write!(f, ",{}", Cell(s))?,
                    Some(Value::Bool(true)) => write!(f, ",True")?,
                    Some(Value::Bool(false)) => write!(f, ",False")?,
                    Some(v) => write!(f, ",{}", Cell(&v.to_string()))?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A single CSV cell, quoted if necessary
struct Cell<'a>(&'a str);

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.contains([',', '"', '\n', '\r']) {
            write!(f, "\"{}\"", self.0.replace('"', "\"\""))
        } else {
            f.write_str(self.0)
        }
    }
}

/// Merge all dump files in a directory
///
/// Files are merged in the order of their names.
pub fn merge_dir(dir: &Path) -> Result<Table, Error> {
    let mut files = std::fs::read_dir(dir)
        .map_err(|e| Error::Io(dir.into(), e))?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| Error::Io(dir.into(), e))?;
    files.retain(|p| hart_id(p).is_some());
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut table = Table::default();
    for file in files {
        let Some(hart) = hart_id(&file) else {
            continue;
        };
        let text = std::fs::read_to_string(&file).map_err(|e| Error::Io(file.clone(), e))?;
        let segments: Vec<Map<String, Value>> =
            serde_json::from_str(&text).map_err(|e| Error::Json(file.clone(), e))?;
        tracing::debug!(hart, segments = segments.len(), "Merging dump");
        table.push(hart, &segments);
    }
    Ok(table)
}

/// Errors that may occur while merging dumps
#[derive(Debug)]
pub enum Error {
    /// A file or directory could not be read
    Io(PathBuf, std::io::Error),
    /// A dump file does not contain an array of segment objects
    Json(PathBuf, serde_json::Error),
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Io(_, inner) => Some(inner),
            Self::Json(_, inner) => Some(inner),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, _) => write!(f, "cannot read {}", path.display()),
            Self::Json(path, _) => write!(f, "cannot parse dump {}", path.display()),
        }
    }
}
