//! Discovery of marker names present in a document.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use placard_docx::{Document, NodeKind};
use regex::Regex;

use crate::run::{paragraph_runs_ref, run_texts};
use crate::walk::block_paragraphs;

/// Pattern for a complete marker token.
static MARKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("invalid marker regex"));

/// Marker names found in the main flow and in text boxes, sorted and
/// de-duplicated.
///
/// Tokens split across runs are found the same way the merger finds them:
/// run texts are joined until a tab, break, drawing or other inline element.
pub fn scan_markers(doc: &Document) -> Vec<String> {
    let classifier = doc.classifier();

    let mut paragraphs = Vec::new();
    if let Some(body) = doc.body() {
        paragraphs.extend(block_paragraphs(body, classifier));
    }
    for container in doc.find_all(NodeKind::TextBoxContent) {
        paragraphs.extend(block_paragraphs(container, classifier));
    }

    let mut names = BTreeSet::new();
    for paragraph in paragraphs {
        let mut segment = String::new();
        for run in paragraph_runs_ref(paragraph, classifier) {
            for text in run_texts(run, classifier) {
                match text {
                    Some(text) => segment.push_str(&text),
                    None => {
                        collect_names(&segment, &mut names);
                        segment.clear();
                    }
                }
            }
        }
        collect_names(&segment, &mut names);
    }

    names.into_iter().collect()
}

fn collect_names(text: &str, names: &mut BTreeSet<String>) {
    for caps in MARKER_PATTERN.captures_iter(text) {
        names.insert(caps[1].to_owned());
    }
}
