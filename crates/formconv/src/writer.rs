//! JSON writer

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::warn;

use crate::document::Document;
use crate::error::ConvertResult;

/// Options for writing JSON documents
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Indentation of nested values (default: tab)
    pub indent: Indent,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: Indent::Tab }
    }
}

/// Indentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// One tab per level
    Tab,
    /// A number of spaces per level
    Spaces(usize),
    /// Everything on one line
    Compact,
}

/// AJF document writer
pub struct JsonWriter;

impl JsonWriter {
    /// Write a document to a file
    ///
    /// The file is removed if writing fails halfway.
    pub fn write_file<P: AsRef<Path>>(
        doc: &Document,
        path: P,
        options: &WriteOptions,
    ) -> ConvertResult<()> {
        let path = path.as_ref();
        let result: ConvertResult<()> = File::create(path)
            .map_err(Into::into)
            .and_then(|file| {
                let mut out = BufWriter::new(file);
                Self::write(doc, &mut out, options)?;
                out.flush()?;
                Ok(())
            });
        if result.is_err() {
            if let Err(e) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "can't remove partial output");
            }
        }
        result
    }

    /// Write a document, followed by a newline
    pub fn write<W: Write>(doc: &Document, mut writer: W, options: &WriteOptions) -> ConvertResult<()> {
        match options.indent {
            Indent::Compact => serde_json::to_writer(&mut writer, doc)?,
            Indent::Tab => pretty(doc, &mut writer, b"\t")?,
            Indent::Spaces(n) => pretty(doc, &mut writer, " ".repeat(n).as_bytes())?,
        }
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Serialize a document to a string, without trailing newline
    pub fn to_string(doc: &Document, options: &WriteOptions) -> ConvertResult<String> {
        let mut buf = Vec::new();
        Self::write(doc, &mut buf, options)?;
        buf.pop();
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn pretty<W: Write>(doc: &Document, writer: W, indent: &[u8]) -> serde_json::Result<()> {
    let mut ser = Serializer::with_formatter(writer, PrettyFormatter::with_indent(indent));
    doc.serialize(&mut ser)
}
