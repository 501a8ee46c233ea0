//! Traits for reading translation documents in langgate.

use std::{
    fs::File,
    io::{BufRead, BufReader, Cursor},
    path::Path,
};

use crate::error::Error;

/// A trait for parsing one translation document from a reader or file.
///
/// Every document carries a source name used in diagnostics and collision
/// reports; `read_from` uses the file path for it.
///
/// # Example
///
/// ```rust,no_run
/// use langgate::{LocalizationDocument, traits::Parser};
/// let doc = LocalizationDocument::read_from("locales/base.json")?;
/// assert_eq!(doc.source(), "locales/base.json");
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(source: &str, reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(&path.display().to_string(), reader)
    }

    /// Parse from a string.
    fn from_str(source: &str, s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(source, Cursor::new(s))
    }
}
