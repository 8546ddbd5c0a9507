//! Line-prefix parser for tagged bibliographic export files.
//!
//! Each record is a run of two-letter tagged lines (`TI`, `AU`, `DI`, ...)
//! terminated by an `ER` line. Fields accumulate into one record at a time;
//! tags outside the recognized set are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::CoreError;

/// One parsed bibliographic record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WosRecord {
    pub title: Option<String>,
    /// Author names in file order. Repeated names within a record are kept.
    pub authors: Vec<String>,
    pub doi: Option<String>,
    pub source: Option<String>,
    /// Raw `PY` value; never parsed into a date at this stage.
    pub publication_date: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    /// `"<begin>"` or `"<begin>-<end>"` assembled from `BP`/`EP` lines.
    pub pages: Option<String>,
}

/// Streaming record reader over any buffered source.
///
/// Yields one record per `ER` terminator line. A trailing record with no
/// `ER` line is dropped at end of input, matching the export tools this
/// format comes from.
pub struct WosReader<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
    current: WosRecord,
    done: bool,
}

impl WosReader<BufReader<File>> {
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> WosReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            current: WosRecord::default(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for WosReader<R> {
    type Item = Result<WosRecord, CoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            self.line_no += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // Tag is the first two characters; the value is the rest, trimmed.
            let Some((tag, rest)) = line.split_at_checked(2) else {
                continue;
            };
            let value = rest.trim();

            match tag {
                "TI" => self.current.title = Some(value.to_string()),
                "DI" => self.current.doi = Some(value.to_string()),
                "AU" => self.current.authors.push(value.to_string()),
                "SO" => self.current.source = Some(value.to_string()),
                "PY" => self.current.publication_date = Some(value.to_string()),
                "VL" => self.current.volume = Some(value.to_string()),
                "IS" => self.current.issue = Some(value.to_string()),
                "BP" => self.current.pages = Some(value.to_string()),
                "EP" => match self.current.pages.as_mut() {
                    Some(pages) => {
                        pages.push('-');
                        pages.push_str(value);
                    }
                    None => {
                        self.done = true;
                        return Some(Err(CoreError::Parse(format!(
                            "line {}: EP tag with no preceding BP",
                            self.line_no
                        ))));
                    }
                },
                "ER" => return Some(Ok(std::mem::take(&mut self.current))),
                _ => {}
            }
        }
    }
}

/// Parse a complete export held in memory.
pub fn parse_str(input: &str) -> Result<Vec<WosRecord>, CoreError> {
    WosReader::new(input.as_bytes()).collect()
}
