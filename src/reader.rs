//! Streaming LTSV reader.
//!
//! [`Reader`] pulls one line at a time from a [`LineSource`], parses it with
//! its [`Parser`] and tags parse failures with the 1-based line number.
//! There is no read-ahead: each call consumes exactly one line.
//!
//! ## Usage
//!
//! ```rust
//! use ltsv::Reader;
//!
//! let input = "host:127.0.0.1\tstatus:200\nhost:10.0.0.2\tstatus:404\n";
//! let mut reader = Reader::new(input.as_bytes());
//!
//! while let Some(record) = reader.read().unwrap() {
//!     assert!(record.contains_key("status"));
//! }
//! assert_eq!(reader.line_number(), 2);
//! ```
//!
//! End of input is `Ok(None)`, never an error. After the source reports an
//! I/O error the reader is [`ReaderState::Failed`] and every later read
//! returns [`Error::ReaderFailed`]. A parse error leaves the reader ready,
//! so callers may log and skip a bad line.

use crate::error::{Error, ReadAllError, Result};
use crate::{de, Mapping, Parser, ParserOptions};
use serde::de::DeserializeOwned;
use std::io::{self, BufRead};
use tracing::{debug, trace};

/// Supplies successive lines with their terminators already stripped.
pub trait LineSource {
    /// Returns the next line, or `Ok(None)` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the line could not be read.
    fn next_line(&mut self) -> io::Result<Option<&[u8]>>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        (**self).next_line()
    }
}

/// [`LineSource`] over any [`BufRead`].
///
/// Lines end at `\n`; one `\r` before it (or at end of input) is dropped.
/// A final line without terminator is still returned.
#[derive(Debug)]
pub struct BufLines<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: BufRead> BufLines<R> {
    pub fn new(inner: R) -> Self {
        BufLines {
            inner,
            buf: Vec::with_capacity(256),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> LineSource for BufLines<R> {
    fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        Ok(Some(&self.buf))
    }
}

/// Where a [`Reader`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Another read may be attempted.
    Ready,
    /// The source reported end of input.
    Exhausted,
    /// The source reported an I/O error.
    Failed,
}

/// Reads LTSV records from a line source.
///
/// A `Reader` is driven by one caller at a time; it performs no internal
/// synchronization.
#[derive(Debug)]
pub struct Reader<S> {
    source: S,
    parser: Parser,
    line_no: usize,
    state: ReaderState,
}

impl<R: BufRead> Reader<BufLines<R>> {
    /// Creates a strict reader with the canonical delimiters.
    ///
    /// Wrap unbuffered inputs such as files in a [`std::io::BufReader`] first.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParserOptions::default())
    }

    pub fn with_options(reader: R, options: ParserOptions) -> Self {
        Self::from_source(BufLines::new(reader), options)
    }
}

impl<S: LineSource> Reader<S> {
    pub fn from_source(source: S, options: ParserOptions) -> Self {
        Reader {
            source,
            parser: Parser::new(options),
            line_no: 0,
            state: ReaderState::Ready,
        }
    }

    /// Number of lines consumed so far, including lines that failed to parse.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    #[must_use]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.parser.is_strict()
    }

    #[must_use]
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn next_line(&mut self) -> Result<Option<(usize, &[u8])>> {
        match self.state {
            ReaderState::Ready => {}
            ReaderState::Exhausted => return Ok(None),
            ReaderState::Failed => return Err(Error::ReaderFailed),
        }
        match self.source.next_line() {
            Ok(Some(line)) => {
                self.line_no += 1;
                trace!(line_no = self.line_no, len = line.len(), "read ltsv line");
                Ok(Some((self.line_no, line)))
            }
            Ok(None) => {
                debug!(lines = self.line_no, "ltsv input exhausted");
                self.state = ReaderState::Exhausted;
                Ok(None)
            }
            Err(err) => {
                debug!(after_line = self.line_no, error = %err, "ltsv line source failed");
                self.state = ReaderState::Failed;
                Err(Error::Io(err))
            }
        }
    }

    /// Reads one line into `record` without clearing it first.
    ///
    /// Returns `Ok(false)` at end of input. Labels absent from the new line
    /// keep the values `record` already held.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the source fails (the reader becomes `Failed`)
    /// - [`Error::Syntax`] with the line number if the line is malformed
    /// - [`Error::ReaderFailed`] on any read after an I/O error
    pub fn read_into(&mut self, record: &mut Mapping) -> Result<bool> {
        let parser = self.parser;
        let Some((line_no, line)) = self.next_line()? else {
            return Ok(false);
        };
        parser.fill_map(line, record).map_err(|err| {
            debug!(line_no, kind = %err.kind(), "rejected ltsv line");
            Error::syntax(line_no, err)
        })?;
        Ok(true)
    }

    /// Reads one record into a fresh map.
    ///
    /// # Errors
    ///
    /// See [`Reader::read_into`].
    pub fn read(&mut self) -> Result<Option<Mapping>> {
        self.read_reusing(Mapping::new())
    }

    /// Reads one record into `record`, which is not cleared first.
    ///
    /// # Errors
    ///
    /// See [`Reader::read_into`]. On error `record` is dropped together with
    /// any fields already inserted from the bad line; use
    /// [`Reader::read_into`] to keep the buffer across failures.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv::Reader;
    ///
    /// let mut reader = Reader::new("a:1\tb:2\na:3\n".as_bytes());
    /// let first = reader.read().unwrap().unwrap();
    /// let second = reader.read_reusing(first).unwrap().unwrap();
    /// assert_eq!(second["a"], "3");
    /// assert_eq!(second["b"], "2");
    /// ```
    pub fn read_reusing(&mut self, mut record: Mapping) -> Result<Option<Mapping>> {
        Ok(self.read_into(&mut record)?.then_some(record))
    }

    /// Reads one line and deserializes it into `T`.
    ///
    /// # Errors
    ///
    /// As [`Reader::read_into`]. A line that parses but does not fit `T`
    /// yields [`Error::Deserialize`] with the line number. Either way the
    /// reader stays usable for the next line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ltsv::Reader;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Access { host: String, status: u16 }
    ///
    /// let mut reader = Reader::new("host:127.0.0.1\tstatus:200\n".as_bytes());
    /// let access: Access = reader.deserialize().unwrap().unwrap();
    /// assert_eq!(access.status, 200);
    /// ```
    pub fn deserialize<T>(&mut self) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let parser = self.parser;
        let Some((line_no, line)) = self.next_line()? else {
            return Ok(None);
        };
        match de::from_line_with(&parser, line) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Line(err)) => {
                debug!(line_no, kind = %err.kind(), "rejected ltsv line");
                Err(Error::syntax(line_no, err))
            }
            Err(err) => {
                debug!(line_no, error = %err, "ltsv line does not fit target type");
                Err(Error::deserialize(line_no, err))
            }
        }
    }

    /// Reads every remaining line.
    ///
    /// # Errors
    ///
    /// Stops at the first failing line; the returned [`ReadAllError`] holds
    /// every record parsed before it.
    pub fn read_all(&mut self) -> std::result::Result<Vec<Mapping>, ReadAllError> {
        let mut records = Vec::new();
        loop {
            let mut record = Mapping::new();
            match self.read_into(&mut record) {
                Ok(true) => records.push(record),
                Ok(false) => return Ok(records),
                Err(err) => return Err(ReadAllError::new(records, err)),
            }
        }
    }
}

impl<S: LineSource> Iterator for Reader<S> {
    type Item = Result<Mapping>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) | Err(Error::ReaderFailed) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
