//! Template driver: runs the merger over a whole document.

use placard_docx::{Document, NodeKind};

use crate::extract::extract_containers;
use crate::marker::MarkerSet;
use crate::merger::merge_runs;
use crate::run::{FlowRun, paragraph_runs};
use crate::walk::block_paragraphs_mut;

/// Counters from one [`apply`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Paragraphs visited in the main flow (tables included).
    pub paragraphs: usize,
    /// Text boxes visited.
    pub containers: usize,
    /// Runs whose text changed.
    pub runs_rewritten: usize,
}

/// Substitute `markers` throughout `doc`.
///
/// Body paragraphs and table cell paragraphs are processed first, then every
/// text box. The paragraph, table and text box structure is left unchanged.
pub fn apply(doc: &mut Document, markers: &MarkerSet) -> ApplyReport {
    let mut report = ApplyReport::default();

    {
        let (root, classifier) = doc.split_mut();
        match classifier.find_all_mut(root, NodeKind::Body).into_iter().next() {
            Some(body) => {
                for paragraph in block_paragraphs_mut(body, classifier) {
                    let mut runs: Vec<FlowRun<'_>> = paragraph_runs(paragraph, classifier)
                        .into_iter()
                        .flat_map(|run| FlowRun::split(run, classifier))
                        .collect();
                    report.runs_rewritten += merge_runs(&mut runs, markers);
                    report.paragraphs += 1;
                }
            }
            None => tracing::debug!("Document has no body, skipping main flow"),
        }
    }

    for mut container in extract_containers(doc) {
        for runs in container.paragraphs_mut() {
            report.runs_rewritten += merge_runs(runs, markers);
        }
        report.containers += 1;
    }

    tracing::debug!(
        paragraphs = report.paragraphs,
        containers = report.containers,
        runs_rewritten = report.runs_rewritten,
        "Applied markers"
    );
    report
}
