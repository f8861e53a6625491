//! Line transport.
//!
//! A channel never touches files or buffers directly. It pulls lines from a
//! [`Source`] and pushes lines to a [`Sink`], one line at a time, without
//! line terminators. Adapters cover the usual cases:
//!
//! | Source           | Reads from |
//! |------------------|------------|
//! | [`StrSource`]    | the lines of a `&str` |
//! | [`ReaderSource`] | any [`BufRead`] |
//! | [`FileSource`]   | a file opened by path |
//! | [`FnSource`]     | a closure returning `Option<String>` |
//! | [`NullSource`]   | nothing; always at end of input |
//!
//! | Sink             | Writes to |
//! |------------------|-----------|
//! | [`WriterSink`]   | any [`Write`], one `\n`-terminated line at a time |
//! | [`FileSink`]     | a file created by path |
//! | [`FnSink`]       | a closure taking `&str` |
//! | `String`         | appends each line plus `\n` |
//! | `Vec<String>`    | pushes each line |
//! | [`NullSink`]     | discards everything |
//!
//! Both traits are implemented for `&mut S` and `Box<S>`, so a caller can
//! keep ownership of a buffer and inspect it after writing.
//!
//! ## Examples
//!
//! ```rust
//! use objchan::io::{Sink, Source, StrSource};
//!
//! let mut source = StrSource::new("Begin Foo\r\nEnd Foo");
//! assert_eq!(source.next_line().unwrap().as_deref(), Some("Begin Foo"));
//! assert_eq!(source.next_line().unwrap().as_deref(), Some("End Foo"));
//! assert_eq!(source.next_line().unwrap(), None);
//!
//! let mut out = String::new();
//! out.put_line("Begin Foo").unwrap();
//! assert_eq!(out, "Begin Foo\n");
//! ```

use crate::{Error, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

/// Produces input lines, without terminators.
pub trait Source {
    /// Returns the next line, or `Ok(None)` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Consumes output lines, without terminators.
pub trait Sink {
    fn put_line(&mut self, line: &str) -> io::Result<()>;

    /// Pushes buffered output through. Called after every top-level write.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        (**self).next_line()
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn put_line(&mut self, line: &str) -> io::Result<()> {
        (**self).put_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn put_line(&mut self, line: &str) -> io::Result<()> {
        (**self).put_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Reads the lines of a string slice. Both `\n` and `\r\n` end a line.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        StrSource {
            lines: text.lines(),
        }
    }
}

impl Source for StrSource<'_> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.next().map(str::to_string))
    }
}

/// Reads the lines of a buffered reader.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Source for ReaderSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Reads the lines of a file.
pub type FileSource = ReaderSource<BufReader<File>>;

impl FileSource {
    /// Opens the file at `path` for reading.
    pub fn open(path: &str) -> io::Result<Self> {
        Ok(ReaderSource::new(BufReader::new(File::open(path)?)))
    }
}

/// Pulls lines from a closure. `None` ends the input.
pub struct FnSource<F> {
    f: F,
}

impl<F: FnMut() -> Option<String>> FnSource<F> {
    pub fn new(f: F) -> Self {
        FnSource { f }
    }
}

impl<F: FnMut() -> Option<String>> Source for FnSource<F> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok((self.f)())
    }
}

/// A source with no lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSource;

impl Source for NullSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(None)
    }
}

/// Writes each line, followed by `\n`, to a writer.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn put_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Writes lines to a file.
pub type FileSink = WriterSink<BufWriter<File>>;

impl FileSink {
    /// Creates (or truncates) the file at `path` for writing.
    pub fn create(path: &str) -> io::Result<Self> {
        Ok(WriterSink::new(BufWriter::new(File::create(path)?)))
    }
}

/// Pushes lines to a closure.
pub struct FnSink<F> {
    f: F,
}

impl<F: FnMut(&str)> FnSink<F> {
    pub fn new(f: F) -> Self {
        FnSink { f }
    }
}

impl<F: FnMut(&str)> Sink for FnSink<F> {
    fn put_line(&mut self, line: &str) -> io::Result<()> {
        (self.f)(line);
        Ok(())
    }
}

/// A sink that discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn put_line(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for String {
    fn put_line(&mut self, line: &str) -> io::Result<()> {
        self.push_str(line);
        self.push('\n');
        Ok(())
    }
}

impl Sink for Vec<String> {
    fn put_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// The channel's input side: the bound source, or a file that replaces it
/// while `SourceFile` is set.
pub(crate) struct LineReader<'io> {
    bound: Box<dyn Source + 'io>,
    file: Option<(String, FileSource)>,
    line: usize,
}

impl<'io> LineReader<'io> {
    pub(crate) fn new(source: impl Source + 'io) -> Self {
        LineReader {
            bound: Box::new(source),
            file: None,
            line: 0,
        }
    }

    pub(crate) fn next_line(&mut self) -> Result<Option<String>> {
        let next = match &mut self.file {
            Some((_, file)) => file.next_line(),
            None => self.bound.next_line(),
        }?;
        if next.is_some() {
            self.line += 1;
        }
        Ok(next)
    }

    /// Number of the line most recently returned.
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    /// Makes the input follow `path`: opens the named file when it differs
    /// from the current one, or reverts to the bound source for `None`.
    pub(crate) fn follow(&mut self, path: Option<&str>) -> Result<()> {
        let current = self.file.as_ref().map(|(p, _)| p.as_str());
        if current == path {
            return Ok(());
        }
        self.file = match path {
            Some(path) => {
                let file = FileSource::open(path).map_err(|e| {
                    Error::io(&format!("cannot open source file \"{}\": {}", path, e))
                })?;
                tracing::debug!(%path, "bound source file");
                Some((path.to_string(), file))
            }
            None => {
                tracing::debug!("reverted to bound source");
                None
            }
        };
        self.line = 0;
        Ok(())
    }
}

/// The channel's output side: the bound sink, or a file that replaces it
/// while `SinkFile` is set.
pub(crate) struct LineWriter<'io> {
    bound: Box<dyn Sink + 'io>,
    file: Option<(String, FileSink)>,
    lines: usize,
}

impl<'io> LineWriter<'io> {
    pub(crate) fn new(sink: impl Sink + 'io) -> Self {
        LineWriter {
            bound: Box::new(sink),
            file: None,
            lines: 0,
        }
    }

    pub(crate) fn put_line(&mut self, line: &str) -> Result<()> {
        match &mut self.file {
            Some((_, file)) => file.put_line(line),
            None => self.bound.put_line(line),
        }?;
        self.lines += 1;
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        match &mut self.file {
            Some((_, file)) => file.flush(),
            None => self.bound.flush(),
        }?;
        Ok(())
    }

    /// Total lines written so far.
    pub(crate) fn lines(&self) -> usize {
        self.lines
    }

    /// Makes the output follow `path`, flushing and closing any file being
    /// replaced.
    pub(crate) fn follow(&mut self, path: Option<&str>) -> Result<()> {
        let current = self.file.as_ref().map(|(p, _)| p.as_str());
        if current == path {
            return Ok(());
        }
        if let Some((_, mut old)) = self.file.take() {
            old.flush()?;
        }
        if let Some(path) = path {
            let file = FileSink::create(path).map_err(|e| {
                Error::io(&format!("cannot create sink file \"{}\": {}", path, e))
            })?;
            tracing::debug!(%path, "bound sink file");
            self.file = Some((path.to_string(), file));
        } else {
            tracing::debug!("reverted to bound sink");
        }
        Ok(())
    }
}
