//! Thin element builder over `quick_xml::Writer`.
//!
//! All HWPX parts are written through this so that escaping of text and
//! attribute values is always handled by quick-xml.

use std::borrow::Cow;
use std::fmt;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::ConversionError;

pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a document with the standalone UTF-8 declaration HWPX expects.
    pub(crate) fn new() -> Result<Self, ConversionError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { writer })
    }

    pub(crate) fn element(&mut self, name: &str) -> Element<'_> {
        Element {
            writer: self,
            name: name.to_string(),
            start: BytesStart::new(name.to_string()),
        }
    }

    pub(crate) fn close(&mut self, name: &str) -> Result<(), ConversionError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<(), ConversionError> {
        let text = xml_safe(text);
        self.writer.write_event(Event::Text(BytesText::new(&text)))?;
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// An element whose start tag is still being assembled.
pub(crate) struct Element<'w> {
    writer: &'w mut XmlWriter,
    name: String,
    start: BytesStart<'static>,
}

impl<'w> Element<'w> {
    pub(crate) fn attr(mut self, key: &str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        self.start.push_attribute((key, &*xml_safe(&value)));
        self
    }

    /// Write the start tag; the caller closes it with [`XmlWriter::close`].
    pub(crate) fn open(self) -> Result<(), ConversionError> {
        self.writer.writer.write_event(Event::Start(self.start))?;
        Ok(())
    }

    pub(crate) fn empty(self) -> Result<(), ConversionError> {
        self.writer.writer.write_event(Event::Empty(self.start))?;
        Ok(())
    }

    /// Write the element with a single text child.
    pub(crate) fn text(self, text: &str) -> Result<(), ConversionError> {
        let Element {
            writer,
            name,
            start,
        } = self;
        writer.writer.write_event(Event::Start(start))?;
        writer.text(text)?;
        writer.close(&name)
    }
}

/// Drop characters XML 1.0 cannot carry, even escaped (C0 controls other
/// than tab/newline/carriage return, and the U+FFFE/U+FFFF noncharacters).
fn xml_safe(text: &str) -> Cow<'_, str> {
    let allowed = |c: char| {
        !matches!(
            c,
            '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
        )
    };
    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}
