use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use super::Document;
use crate::error::SinkError;

/// Destination for mapped documents.
pub trait DocumentSink: Send {
    /// # Errors
    ///
    /// Returns [`SinkError`] if the document cannot be serialized or written.
    fn write(&mut self, document: &Document) -> Result<(), SinkError>;

    /// Called once after the last document.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if buffered output cannot be flushed.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// One JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> DocumentSink for JsonLinesSink<W> {
    fn write(&mut self, document: &Document) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, document)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects documents in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    documents: Arc<Mutex<Vec<Document>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn documents(&self) -> Vec<Document> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl DocumentSink for MemorySink {
    fn write(&mut self, document: &Document) -> Result<(), SinkError> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use feedgen_core::FieldValue;

    use super::*;

    fn doc(id: &str) -> Document {
        let mut doc = Document::new();
        doc.insert("df_id", FieldValue::from(id));
        doc
    }

    #[test]
    fn json_lines_writes_one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write(&doc("1")).unwrap();
        sink.write(&doc("2")).unwrap();
        sink.finish().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "{\"df_id\":\"1\"}\n{\"df_id\":\"2\"}\n");
    }

    #[test]
    fn memory_sink_clones_share_documents() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.write(&doc("1")).unwrap();

        assert_eq!(sink.documents(), vec![doc("1")]);
        sink.clear();
        assert!(writer.documents().is_empty());
    }
}
