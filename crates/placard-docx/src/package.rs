//! In-memory `.docx` package.
//!
//! A `.docx` file is a zip archive of XML parts. [`DocxPackage`] loads every
//! entry into memory, lets callers replace individual parts and writes the
//! archive back with the original entry order.

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::DocxError;
use crate::model::Document;
use crate::parser::XmlParser;
use crate::serializer::XmlSerializer;

/// Part holding the main document flow.
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

/// Part listing content types; written first in the archive.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

/// An opened `.docx` package.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    parts: Vec<Part>,
}

impl DocxPackage {
    /// Create an empty package.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a package from disk.
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        let bytes = fs::read(path)?;
        let package = Self::from_bytes(&bytes)?;
        tracing::debug!(path = %path.display(), parts = package.parts.len(), "Opened package");
        Ok(package)
    }

    /// Read a package from zip bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut parts = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
            file.read_to_end(&mut data)?;
            parts.push(Part {
                name: file.name().to_owned(),
                data,
            });
        }

        Ok(Self { parts })
    }

    /// Names of all parts, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.name.as_str())
    }

    /// Raw bytes of a part.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| part.data.as_slice())
    }

    /// Replace a part, or append it when absent.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        if let Some(part) = self.parts.iter_mut().find(|part| part.name == name) {
            part.data = data;
        } else {
            self.parts.push(Part {
                name: name.to_owned(),
                data,
            });
        }
    }

    /// Parse the main document part.
    pub fn main_document(&self) -> Result<Document, DocxError> {
        let data = self
            .part(MAIN_DOCUMENT_PART)
            .ok_or_else(|| DocxError::MissingPart(MAIN_DOCUMENT_PART.to_owned()))?;
        let xml = std::str::from_utf8(data)?;
        XmlParser::new().parse(xml)
    }

    /// Serialize `doc` into the main document part.
    pub fn set_main_document(&mut self, doc: &Document) {
        let xml = XmlSerializer::new().serialize(doc);
        self.set_part(MAIN_DOCUMENT_PART, xml.into_bytes());
    }

    /// Write the package as zip bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // Consumers sniff the content types entry, keep it first
        let ordered = self
            .parts
            .iter()
            .filter(|part| part.name == CONTENT_TYPES_PART)
            .chain(self.parts.iter().filter(|part| part.name != CONTENT_TYPES_PART));

        for part in ordered {
            writer.start_file(part.name.as_str(), options)?;
            writer.write_all(&part.data)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write the package to disk.
    pub fn save(&self, path: &Path) -> Result<(), DocxError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        tracing::debug!(path = %path.display(), "Saved package");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    const DOCUMENT_XML: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{{lugar_evento}}</w:t></w:r></w:p></w:body></w:document>"#;

    fn sample_package() -> DocxPackage {
        let mut package = DocxPackage::new();
        package.set_part("word/styles.xml", b"<w:styles/>".to_vec());
        package.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        package.set_part(MAIN_DOCUMENT_PART, DOCUMENT_XML.as_bytes().to_vec());
        package
    }

    #[test]
    fn test_bytes_round_trip_keeps_parts() {
        let package = sample_package();
        let bytes = package.to_bytes().unwrap();
        let reopened = DocxPackage::from_bytes(&bytes).unwrap();

        let names: Vec<_> = reopened.part_names().collect();
        assert_eq!(
            names,
            vec![CONTENT_TYPES_PART, "word/styles.xml", MAIN_DOCUMENT_PART]
        );
        assert_eq!(reopened.part("word/styles.xml"), Some(&b"<w:styles/>"[..]));
    }

    #[test]
    fn test_main_document_parses() {
        let package = sample_package();
        let doc = package.main_document().unwrap();
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_main_document_missing() {
        let package = DocxPackage::new();
        let err = package.main_document().unwrap_err();
        assert!(matches!(err, DocxError::MissingPart(ref name) if name == MAIN_DOCUMENT_PART));
    }

    #[test]
    fn test_set_main_document_replaces_part() {
        let mut package = sample_package();
        let mut doc = package.main_document().unwrap();
        doc.root.set_attr("w:marker", "1");
        package.set_main_document(&doc);

        let xml = std::str::from_utf8(package.part(MAIN_DOCUMENT_PART).unwrap()).unwrap();
        assert!(xml.contains(r#"w:marker="1""#));
        assert_eq!(package.part_names().count(), 3);
    }

    #[test]
    fn test_save_and_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.docx");

        sample_package().save(&path).unwrap();
        let reopened = DocxPackage::open(&path).unwrap();

        assert_eq!(
            reopened.part(MAIN_DOCUMENT_PART),
            Some(DOCUMENT_XML.as_bytes())
        );
    }

    #[test]
    fn test_from_bytes_rejects_non_zip() {
        let err = DocxPackage::from_bytes(b"not a zip").unwrap_err();
        assert!(matches!(err, DocxError::Zip(_)));
    }
}
