//! Block-level walks: paragraphs of a body, table cell or text box.

use placard_docx::{NodeClassifier, NodeKind, TreeNode};

/// Paragraphs under a block container in reading order.
///
/// Tables (including tables nested in cells) and block-level content
/// controls are walked; runs and drawings are not, so text boxes anchored
/// inside a paragraph are left to the container extractor.
pub(crate) fn block_paragraphs_mut<'a>(
    node: &'a mut TreeNode,
    classifier: &NodeClassifier,
) -> Vec<&'a mut TreeNode> {
    let mut out = Vec::new();
    collect_mut(node, classifier, &mut out);
    out
}

/// Read-only variant of [`block_paragraphs_mut`].
pub(crate) fn block_paragraphs<'a>(
    node: &'a TreeNode,
    classifier: &NodeClassifier,
) -> Vec<&'a TreeNode> {
    let mut out = Vec::new();
    collect(node, classifier, &mut out);
    out
}

fn collect_mut<'a>(
    node: &'a mut TreeNode,
    classifier: &NodeClassifier,
    out: &mut Vec<&'a mut TreeNode>,
) {
    for child in &mut node.children {
        match classifier.kind(child) {
            NodeKind::Paragraph => out.push(child),
            NodeKind::Table
            | NodeKind::TableRow
            | NodeKind::TableCell
            | NodeKind::InlineWrapper => collect_mut(child, classifier, out),
            _ => {}
        }
    }
}

fn collect<'a>(node: &'a TreeNode, classifier: &NodeClassifier, out: &mut Vec<&'a TreeNode>) {
    for child in &node.children {
        match classifier.kind(child) {
            NodeKind::Paragraph => out.push(child),
            NodeKind::Table
            | NodeKind::TableRow
            | NodeKind::TableCell
            | NodeKind::InlineWrapper => collect(child, classifier, out),
            _ => {}
        }
    }
}
