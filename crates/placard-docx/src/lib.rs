//! OOXML package handling and document model for placard.
//!
//! - [`DocxPackage`]: zip container of XML parts, loaded into memory
//! - [`XmlParser`] / [`XmlSerializer`]: `quick-xml` based part codec
//! - [`TreeNode`]: element tree with text/tail content
//! - [`Document`] / [`NodeKind`]: typed tree walk over WordprocessingML
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use placard_docx::{DocxPackage, NodeKind};
//!
//! let package = DocxPackage::open(Path::new("Formato a4.docx"))?;
//! let document = package.main_document()?;
//! let boxes = document.find_all(NodeKind::TextBoxContent);
//! println!("{} text boxes", boxes.len());
//! # Ok::<(), placard_docx::DocxError>(())
//! ```

mod error;
mod model;
mod package;
mod parser;
mod serializer;
mod tree;

pub use error::DocxError;
pub use model::{Document, NodeClassifier, NodeKind, W_NAMESPACE, W_STRICT_NAMESPACE};
pub use package::{CONTENT_TYPES_PART, DocxPackage, MAIN_DOCUMENT_PART};
pub use parser::XmlParser;
pub use serializer::XmlSerializer;
pub use tree::TreeNode;
