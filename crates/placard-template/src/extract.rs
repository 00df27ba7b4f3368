//! Container extractor.
//!
//! Text boxes are anchored inside runs (`w:drawing` for DrawingML shapes,
//! `w:pict` for the VML fallback) and never show up in the body's paragraph
//! walk. The extractor finds every text box content element anywhere in the
//! tree and exposes its paragraphs as [`ContainerRun`] sequences, so the
//! merger can process them exactly like the main flow.

use placard_docx::{Document, NodeKind};

use crate::run::{ContainerRun, paragraph_runs};
use crate::walk::block_paragraphs_mut;

/// A floating text box and the runs of its paragraphs.
pub struct Container<'a> {
    index: usize,
    paragraphs: Vec<Vec<ContainerRun<'a>>>,
}

impl<'a> Container<'a> {
    /// Position of the container among all text boxes in document order.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of non-empty paragraphs.
    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Run views, one sequence per paragraph.
    pub fn paragraphs_mut(&mut self) -> &mut [Vec<ContainerRun<'a>>] {
        &mut self.paragraphs
    }
}

/// Extract every text box in `doc`.
///
/// A document without text boxes yields an empty list. Text boxes without
/// paragraphs, and paragraphs without runs, are skipped.
pub fn extract_containers(doc: &mut Document) -> Vec<Container<'_>> {
    let (root, classifier) = doc.split_mut();
    let mut containers = Vec::new();

    for (index, content) in classifier
        .find_all_mut(root, NodeKind::TextBoxContent)
        .into_iter()
        .enumerate()
    {
        let mut paragraphs = Vec::new();
        for paragraph in block_paragraphs_mut(content, classifier) {
            let runs: Vec<ContainerRun<'_>> = paragraph_runs(paragraph, classifier)
                .into_iter()
                .flat_map(|run| ContainerRun::split(run, classifier, index))
                .collect();
            if !runs.is_empty() {
                paragraphs.push(runs);
            }
        }

        if paragraphs.is_empty() {
            tracing::debug!(container = index, "Skipping empty text box");
            continue;
        }
        containers.push(Container { index, paragraphs });
    }

    tracing::debug!(count = containers.len(), "Extracted text boxes");
    containers
}

#[cfg(test)]
mod tests {
    use placard_docx::XmlParser;

    use super::*;
    use crate::run::MutableTextRun;

    const DOCUMENT: &str = concat!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
        r#"xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" "#,
        r#"xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape" "#,
        r#"xmlns:v="urn:schemas-microsoft-com:vml"><w:body>"#,
        r#"<w:p><w:r><w:t>Flow</w:t></w:r><w:r><mc:AlternateContent>"#,
        r#"<mc:Choice Requires="wps"><w:drawing><wps:wsp><wps:txbx><w:txbxContent>"#,
        r#"<w:p><w:r><w:t>{{lugar_</w:t></w:r><w:r><w:t>evento}}</w:t></w:r></w:p>"#,
        r#"<w:p/>"#,
        r#"</w:txbxContent></wps:txbx></wps:wsp></w:drawing></mc:Choice>"#,
        r#"<mc:Fallback><w:pict><v:shape><v:textbox><w:txbxContent>"#,
        r#"<w:p><w:r><w:t>{{lugar_evento}}</w:t></w:r></w:p>"#,
        r#"</w:txbxContent></v:textbox></v:shape></w:pict></mc:Fallback>"#,
        r#"</mc:AlternateContent></w:r></w:p>"#,
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:pict><v:shape><v:textbox><w:txbxContent/>"#,
        r#"</v:textbox></v:shape></w:pict></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        r#"</w:body></w:document>"#,
    );

    #[test]
    fn test_extracts_choice_and_fallback() {
        let mut doc = XmlParser::new().parse(DOCUMENT).unwrap();
        let containers = extract_containers(&mut doc);

        // The empty text box inside the table is skipped
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0].index(), 0);
        assert_eq!(containers[1].index(), 1);
        // The empty paragraph of the first box has no runs
        assert_eq!(containers[0].paragraph_count(), 1);
    }

    #[test]
    fn test_container_runs_read_text() {
        let mut doc = XmlParser::new().parse(DOCUMENT).unwrap();
        let mut containers = extract_containers(&mut doc);

        let runs = &containers[0].paragraphs_mut()[0];
        let texts: Vec<_> = runs.iter().map(|run| run.text().into_owned()).collect();
        assert_eq!(texts, vec!["{{lugar_", "evento}}"]);
        assert!(runs.iter().all(|run| run.container() == 0));
    }

    #[test]
    fn test_no_containers() {
        let mut doc = XmlParser::new()
            .parse(r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p/></w:body></w:document>"#)
            .unwrap();
        assert!(extract_containers(&mut doc).is_empty());
    }
}
