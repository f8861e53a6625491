//! The channel: a line source and sink plus the settings that govern them.

use crate::de::Reader;
use crate::io::{LineReader, LineWriter, NullSink, NullSource, Sink, Source};
use crate::options::{canonical_name, parse_settings};
use crate::ser::write_top;
use crate::warning::WarningLog;
use crate::{Attributes, Persist, Result, Warnings};

/// Reads and writes objects as channel text.
///
/// A channel is bound to a [`Source`] for reading and a [`Sink`] for
/// writing, and can be used for any number of reads and writes. Each call
/// runs to completion before returning; a failed call leaves the channel
/// usable, and reading resumes from wherever the input stopped.
///
/// Setting the `SourceFile` or `SinkFile` attribute redirects reads or
/// writes to that file until the attribute is cleared.
///
/// # Examples
///
/// ```rust
/// use objchan::io::StrSource;
/// use objchan::{Channel, Dump, Field, Load, Persist, Result};
///
/// #[derive(Debug, PartialEq)]
/// struct Point { x: f64 }
///
/// impl Persist for Point {
///     fn class_name(&self) -> &'static str { "Point" }
///     fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
///         const CHAIN: &[&str] = &["Point"];
///         (class == "Point").then_some(CHAIN)
///     }
///     fn dump<'a>(&'a self, _: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
///         dump.scalar(Field::new("X", self.x))
///     }
///     fn load(_: &str, _: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
///         Ok(Point { x: load.read_double("X", 0.0) })
///     }
/// }
///
/// let text = "Begin Point\nX = 1.5\nColour = 2\nEnd Point\n";
/// let mut channel = Channel::from_source(StrSource::new(text));
/// let point: Option<Point> = channel.read().unwrap();
/// assert_eq!(point, Some(Point { x: 1.5 }));
/// assert_eq!(channel.warnings().len(), 1);
///
/// // End of input is not an error
/// assert_eq!(channel.read::<Point>().unwrap(), None);
/// ```
pub struct Channel<'io> {
    attrs: Attributes,
    reader: LineReader<'io>,
    writer: LineWriter<'io>,
    warnings: Warnings,
    writes: usize,
}

impl<'io> Channel<'io> {
    /// Creates a channel that reads from `source` and writes to `sink`.
    pub fn new(source: impl Source + 'io, sink: impl Sink + 'io) -> Self {
        Channel {
            attrs: Attributes::default(),
            reader: LineReader::new(source),
            writer: LineWriter::new(sink),
            warnings: Warnings::new(),
            writes: 0,
        }
    }

    /// Creates a read-only channel. Writes are discarded.
    pub fn from_source(source: impl Source + 'io) -> Self {
        Self::new(source, NullSink)
    }

    /// Creates a write-only channel. Reads find no input.
    pub fn from_sink(sink: impl Sink + 'io) -> Self {
        Self::new(NullSource, sink)
    }

    /// Replaces the channel's attributes.
    ///
    /// File attributes take effect at the next read or write.
    #[must_use]
    pub fn with_attributes(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attrs
    }

    /// Mutable access to the attributes. File attributes changed here take
    /// effect at the next read or write.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    /// Warnings raised by the most recent read.
    #[must_use]
    pub fn warnings(&self) -> &Warnings {
        &self.warnings
    }

    /// Reads the next object.
    ///
    /// Returns `Ok(None)` at end of input. Warnings raised along the way are
    /// available from [`warnings`](Self::warnings) afterwards, whether the
    /// read succeeded or not.
    ///
    /// # Errors
    ///
    /// Structural errors in the text, an unknown class, unconsumed fields in
    /// strict mode, errors raised by a loader, and source failures.
    pub fn read<T: Persist>(&mut self) -> Result<Option<T>> {
        let mut log = WarningLog::new(self.attrs.report_level());
        let result = self.read_with(&mut log);
        self.warnings = log.finish();
        result
    }

    /// Reads objects until end of input.
    ///
    /// Warnings from every object read are collected together.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read); objects read before the failure are
    /// dropped.
    pub fn read_all<T: Persist>(&mut self) -> Result<Vec<T>> {
        let mut log = WarningLog::new(self.attrs.report_level());
        let mut objects = Vec::new();
        let result = loop {
            match self.read_with(&mut log) {
                Ok(Some(object)) => objects.push(object),
                Ok(None) => break Ok(objects),
                Err(err) => break Err(err),
            }
        };
        self.warnings = log.finish();
        result
    }

    fn read_with<T: Persist>(&mut self, log: &mut WarningLog) -> Result<Option<T>> {
        self.reader.follow(self.attrs.source_file())?;
        Reader::new(&mut self.reader, &self.attrs, log).read_top()
    }

    /// Writes one object and flushes the sink.
    ///
    /// # Errors
    ///
    /// Values that cannot be written, an unknown class, errors raised by a
    /// dumper, and sink failures. Lines already written stay written.
    pub fn write<T: Persist>(&mut self, object: &T) -> Result<()> {
        self.writes += 1;
        self.writer.follow(self.attrs.sink_file())?;
        write_top(&mut self.writer, &self.attrs, object)
    }

    /// Number of times [`write`](Self::write) has been called on this
    /// channel, including calls that failed.
    #[must_use]
    pub fn write_invocations(&self) -> usize {
        self.writes
    }

    /// Applies a comma-separated list of `Name=value` settings.
    ///
    /// Setting `SourceFile` or `SinkFile` opens the file immediately.
    ///
    /// # Errors
    ///
    /// Unknown attributes, invalid values, and files that cannot be opened.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use objchan::{io::NullSink, Channel};
    ///
    /// let mut channel = Channel::from_sink(NullSink);
    /// channel.set("Comment=0, Indent=2").unwrap();
    /// assert_eq!(channel.get("indent").unwrap(), "2");
    /// assert!(channel.test("Comment").unwrap());
    /// assert!(channel.set("Colour=red").is_err());
    /// ```
    pub fn set(&mut self, settings: &str) -> Result<()> {
        for (name, value) in parse_settings(settings)? {
            match canonical_name(name)? {
                "SourceFile" => self.set_source_file(value)?,
                "SinkFile" => self.set_sink_file(value)?,
                _ => self.attrs.set_attrib(name, value)?,
            }
        }
        Ok(())
    }

    /// Returns the formatted value of the named attribute.
    ///
    /// # Errors
    ///
    /// Unknown attribute names.
    pub fn get(&self, name: &str) -> Result<String> {
        self.attrs.get_attrib(name)
    }

    /// Reverts the named attribute to its default. Clearing a file
    /// attribute closes the file and restores the bound source or sink.
    ///
    /// # Errors
    ///
    /// Unknown attribute names, and failure to flush a sink file.
    pub fn clear(&mut self, name: &str) -> Result<()> {
        match canonical_name(name)? {
            "SourceFile" => self.clear_source_file(),
            "SinkFile" => self.clear_sink_file(),
            _ => self.attrs.clear_attrib(name),
        }
    }

    /// Returns `true` if the named attribute has been set.
    ///
    /// # Errors
    ///
    /// Unknown attribute names.
    pub fn test(&self, name: &str) -> Result<bool> {
        self.attrs.test_attrib(name)
    }

    /// Reads from the file at `path` instead of the bound source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be opened;
    /// the attribute is left unchanged.
    pub fn set_source_file(&mut self, path: &str) -> Result<()> {
        self.reader.follow(Some(path))?;
        self.attrs.set_source_file(path);
        Ok(())
    }

    /// Writes to the file at `path` instead of the bound sink. The file is
    /// created, or truncated if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be
    /// created; the attribute is left unchanged.
    pub fn set_sink_file(&mut self, path: &str) -> Result<()> {
        self.writer.follow(Some(path))?;
        self.attrs.set_sink_file(path);
        Ok(())
    }

    pub fn clear_source_file(&mut self) -> Result<()> {
        self.attrs.clear_source_file();
        self.reader.follow(None)
    }

    pub fn clear_sink_file(&mut self) -> Result<()> {
        self.attrs.clear_sink_file();
        self.writer.follow(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::StrSource;
    use crate::{Dump, Error, Field, Load};

    #[derive(Debug, PartialEq)]
    struct Tag(String);

    impl Persist for Tag {
        fn class_name(&self) -> &'static str {
            "Tag"
        }

        fn ancestry_of(class: &str) -> Option<&'static [&'static str]> {
            const CHAIN: &[&str] = &["Tag"];
            (class == "Tag").then_some(CHAIN)
        }

        fn dump<'a>(&'a self, _class: &str, dump: &mut Dump<'a, Self>) -> Result<()> {
            dump.scalar(Field::new("Text", self.0.as_str()))
        }

        fn load(_class: &str, _partial: Option<Self>, load: &mut Load<'_, Self>) -> Result<Self> {
            Ok(Tag(load.read_string("Text").unwrap_or_default()))
        }
    }

    #[test]
    fn test_write_then_read() {
        let mut out = Vec::<String>::new();
        {
            let mut channel = Channel::from_sink(&mut out);
            channel.write(&Tag("a".into())).unwrap();
            channel.write(&Tag("b".into())).unwrap();
        }
        let text = out.join("\n");
        let mut channel = Channel::from_source(StrSource::new(&text));
        let tags: Vec<Tag> = channel.read_all().unwrap();
        assert_eq!(tags, vec![Tag("a".into()), Tag("b".into())]);
    }

    #[test]
    fn test_write_invocations() {
        let mut channel = Channel::from_sink(NullSink);
        assert_eq!(channel.write_invocations(), 0);
        channel.write(&Tag("a".into())).unwrap();
        assert!(channel.write(&Tag("two\nlines".into())).is_err());
        assert_eq!(channel.write_invocations(), 2);
    }

    #[test]
    fn test_warnings_replaced_per_read() {
        let text = "Begin Tag\nExtra = 1\nEnd Tag\nBegin Tag\nEnd Tag\n";
        let mut channel = Channel::from_source(StrSource::new(text));
        channel.read::<Tag>().unwrap();
        assert_eq!(channel.warnings().len(), 1);
        channel.read::<Tag>().unwrap();
        assert!(channel.warnings().is_empty());
    }

    #[test]
    fn test_warnings_kept_on_failure() {
        let text = "Begin Tag\nExtra = 1\nEnd Tag\n";
        let mut channel = Channel::from_source(StrSource::new(text));
        channel.attributes_mut().set_strict(true);
        let err = channel.read::<Tag>().unwrap_err();
        assert!(matches!(err, Error::Unconsumed { .. }));
        assert!(channel.warnings().is_empty());
    }

    #[test]
    fn test_string_keyed_attributes() {
        let mut channel = Channel::from_sink(NullSink);
        channel.set("full=1,skip=1").unwrap();
        assert_eq!(channel.get("Full").unwrap(), "1");
        assert!(channel.test("Skip").unwrap());
        channel.clear("skip").unwrap();
        assert!(!channel.test("Skip").unwrap());
        assert!(channel.clear("Nope").is_err());
    }

    #[test]
    fn test_bad_source_file_leaves_attribute_unset() {
        let mut channel = Channel::from_source(NullSource);
        assert!(channel
            .set_source_file("/nonexistent/objchan/in.txt")
            .is_err());
        assert!(!channel.attributes().test_source_file());
    }
}
