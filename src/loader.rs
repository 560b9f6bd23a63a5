//! Uploaded file handles and batch parsing.
//!
//! Every file in a batch is parsed independently. A file that fails is
//! recorded as a [`FileError`] and the rest of the batch carries on.

use rayon::prelude::*;
use std::fs;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::io;
use std::path::Path;

use crate::error::FileError;
use crate::parsers::{AnodeCsv, Parseable, RawTable};

/// An uploaded file: display name plus raw bytes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk, using its file name as the display name
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let contents = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        Ok(Self { name, contents })
    }

    /// 64-bit hash of the file contents
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.contents.hash(&mut hasher);
        hasher.finish()
    }
}

/// Outcome of parsing a batch of uploads
#[derive(Debug, Default)]
pub struct ParsedBatch {
    /// Successfully parsed tables, in upload order
    pub tables: Vec<RawTable>,
    /// Files that were skipped, in upload order
    pub errors: Vec<FileError>,
}

/// Parse a single upload
pub fn parse_file(file: &UploadedFile) -> Result<RawTable, FileError> {
    let fail = |message: String| FileError {
        file_name: file.name.clone(),
        message,
    };

    let text = std::str::from_utf8(&file.contents)
        .map_err(|e| fail(format!("file is not valid UTF-8: {}", e)))?;

    AnodeCsv
        .parse(&file.name, text)
        .map_err(|e| fail(e.to_string()))
}

/// Parse every upload in parallel, keeping upload order in the result
pub fn parse_batch(files: &[UploadedFile]) -> ParsedBatch {
    let results: Vec<Result<RawTable, FileError>> = files.par_iter().map(parse_file).collect();

    let mut batch = ParsedBatch::default();
    for result in results {
        match result {
            Ok(table) => batch.tables.push(table),
            Err(e) => {
                tracing::warn!("{}", e);
                batch.errors.push(e);
            }
        }
    }

    batch
}
