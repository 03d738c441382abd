//! Delimited table reading.
//!
//! A [`TableReader`] parses a text source into a header plus a lazy, forward-only sequence of
//! rows. Fields are separated by comma or tab, mixed freely within one file; quoting is not
//! part of the input format (a quote is an ordinary character). Both behaviors come from
//! unifying `\t` to `,` at the byte level and running the `csv` parser with quoting off.

use std::fs::File;
use std::io::{self, Read};

use crate::error::{ConversionError, ConversionResult};
use crate::types::TableSource;

/// Rewrites tab bytes to commas so a single-delimiter parser sees one separator.
#[derive(Debug)]
struct UnifyDelimiters<R> {
    inner: R,
}

impl<R: Read> Read for UnifyDelimiters<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        for b in &mut buf[..n] {
            if *b == b'\t' {
                *b = b',';
            }
        }
        Ok(n)
    }
}

/// Reads a header eagerly and data rows lazily from a delimited text source.
///
/// The reader is forward-only and non-restartable; open a fresh one per pass. Dropping it
/// closes the underlying stream on every exit path.
#[derive(Debug)]
pub struct TableReader<R: Read> {
    reader: csv::Reader<UnifyDelimiters<R>>,
    header: Vec<String>,
}

impl TableReader<File> {
    /// Open a source file and read its header.
    pub fn open(source: &TableSource) -> ConversionResult<Self> {
        let file = File::open(&source.path)?;
        Self::build(file, || source.path.clone())
    }
}

impl<R: Read> TableReader<R> {
    /// Read from an in-memory or otherwise pre-opened source. `label` is used in error
    /// messages in place of a file path.
    pub fn from_reader(input: R, label: &str) -> ConversionResult<Self> {
        Self::build(input, || label.into())
    }

    fn build(input: R, path: impl FnOnce() -> std::path::PathBuf) -> ConversionResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .quoting(false)
            .flexible(true)
            .has_headers(true)
            .from_reader(UnifyDelimiters { inner: input });

        let header: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        if header.iter().all(|h| h.is_empty()) {
            return Err(ConversionError::EmptyTable { path: path() });
        }

        Ok(Self { reader, header })
    }

    /// Column names, in file order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Lazy iterator over data rows. Rows may be shorter or longer than the header; callers
    /// decide whether that is tolerable.
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows {
            inner: self.reader.records(),
        }
    }
}

/// Iterator over the data rows of a [`TableReader`].
pub struct Rows<'r, R: Read> {
    inner: csv::StringRecordsIter<'r, UnifyDelimiters<R>>,
}

impl<R: Read> Iterator for Rows<'_, R> {
    type Item = ConversionResult<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.inner.next()?;
        Some(
            record
                .map(|r| r.iter().map(str::to_owned).collect())
                .map_err(ConversionError::from),
        )
    }
}
