//! Mutable text views over run elements.
//!
//! The merger works against [`MutableTextRun`] only. [`FlowRun`] is a view
//! into a run of the main document flow, [`ContainerRun`] into a run found
//! inside a text box.
//!
//! A run element is split into several views: one per stretch of adjacent
//! text nodes, and one per inline element (tab, break, drawing…) between
//! them. Inline views have no text and act as barriers, so rewriting a
//! stretch never moves text across a tab or break of the same run.
//!
//! ```text
//! <w:r><w:t>Fecha:</w:t><w:tab/><w:t>{{fecha_evento}}</w:t></w:r>
//! views: [ "Fecha:" ][ <tab> ][ "{{fecha_evento}}" ]
//! ```

use std::borrow::Cow;

use placard_docx::{NodeClassifier, NodeKind, TreeNode};

/// Text getter/setter over a formatted run.
pub trait MutableTextRun {
    /// Current text of the run.
    fn text(&self) -> Cow<'_, str>;

    /// Replace the run's text.
    fn set_text(&mut self, text: &str);

    /// Whether the run carries a non-text inline element (break, drawing…).
    fn has_special_content(&self) -> bool;
}

/// Part of a run element seen by one view.
enum Segment<'a> {
    /// Adjacent text nodes, never empty.
    Text(Vec<&'a mut TreeNode>),
    /// A non-text inline element.
    Inline,
}

impl Segment<'_> {
    fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(nodes) => match nodes.as_slice() {
                [single] => Cow::Borrowed(single.text.as_str()),
                nodes => Cow::Owned(nodes.iter().map(|node| node.text.as_str()).collect()),
            },
            Self::Inline => Cow::Borrowed(""),
        }
    }

    /// Write into the first text node and clear the rest of the stretch.
    fn set_text(&mut self, text: &str) {
        let Self::Text(nodes) = self else {
            return;
        };
        let Some((first, rest)) = nodes.split_first_mut() else {
            return;
        };
        assign_text(first, text);
        for node in rest {
            node.text.clear();
        }
    }

    fn is_inline(&self) -> bool {
        matches!(self, Self::Inline)
    }
}

/// Run in a paragraph of the main document flow.
pub struct FlowRun<'a> {
    segment: Segment<'a>,
}

impl<'a> FlowRun<'a> {
    /// Split a run element into its text stretches and inline elements.
    ///
    /// A run holding only properties yields no views.
    pub fn split(run: &'a mut TreeNode, classifier: &NodeClassifier) -> Vec<Self> {
        split_run(run, classifier)
            .into_iter()
            .map(|segment| Self { segment })
            .collect()
    }
}

impl MutableTextRun for FlowRun<'_> {
    fn text(&self) -> Cow<'_, str> {
        self.segment.text()
    }

    fn set_text(&mut self, text: &str) {
        self.segment.set_text(text);
    }

    fn has_special_content(&self) -> bool {
        self.segment.is_inline()
    }
}

/// Run in a paragraph of a floating text box.
pub struct ContainerRun<'a> {
    segment: Segment<'a>,
    container: usize,
}

impl<'a> ContainerRun<'a> {
    /// Split a run element belonging to the container at index `container`.
    pub fn split(run: &'a mut TreeNode, classifier: &NodeClassifier, container: usize) -> Vec<Self> {
        split_run(run, classifier)
            .into_iter()
            .map(|segment| Self { segment, container })
            .collect()
    }

    /// Index of the owning container in extraction order.
    #[must_use]
    pub fn container(&self) -> usize {
        self.container
    }
}

impl MutableTextRun for ContainerRun<'_> {
    fn text(&self) -> Cow<'_, str> {
        self.segment.text()
    }

    fn set_text(&mut self, text: &str) {
        tracing::trace!(container = self.container, "Rewriting text box run");
        self.segment.set_text(text);
    }

    fn has_special_content(&self) -> bool {
        self.segment.is_inline()
    }
}

fn split_run<'a>(run: &'a mut TreeNode, classifier: &NodeClassifier) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut stretch: Vec<&'a mut TreeNode> = Vec::new();

    for child in &mut run.children {
        let kind = classifier.kind(child);
        if kind == NodeKind::Text {
            stretch.push(child);
        } else if kind.is_special_run_content() {
            if !stretch.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut stretch)));
            }
            segments.push(Segment::Inline);
        }
    }
    if !stretch.is_empty() {
        segments.push(Segment::Text(stretch));
    }
    segments
}

/// Texts of a run's views in order, `None` standing for an inline element.
pub(crate) fn run_texts<'n>(
    run: &'n TreeNode,
    classifier: &NodeClassifier,
) -> Vec<Option<Cow<'n, str>>> {
    let mut out = Vec::new();
    let mut stretch: Option<Cow<'n, str>> = None;

    for child in &run.children {
        let kind = classifier.kind(child);
        if kind == NodeKind::Text {
            stretch = Some(match stretch.take() {
                None => Cow::Borrowed(child.text.as_str()),
                Some(prev) => Cow::Owned(prev.into_owned() + &child.text),
            });
        } else if kind.is_special_run_content() {
            if let Some(text) = stretch.take() {
                out.push(Some(text));
            }
            out.push(None);
        }
    }
    if let Some(text) = stretch {
        out.push(Some(text));
    }
    out
}

/// Set text on a text node, marking whitespace as significant when needed.
fn assign_text(node: &mut TreeNode, text: &str) {
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        node.set_attr("xml:space", "preserve");
    }
    text.clone_into(&mut node.text);
}

/// Collect run elements of a paragraph in reading order.
///
/// Inline wrappers such as hyperlinks and tracked insertions are descended
/// into; runs themselves are not.
pub(crate) fn paragraph_runs<'a>(
    paragraph: &'a mut TreeNode,
    classifier: &NodeClassifier,
) -> Vec<&'a mut TreeNode> {
    let mut out = Vec::new();
    collect_runs_mut(paragraph, classifier, &mut out);
    out
}

fn collect_runs_mut<'a>(
    node: &'a mut TreeNode,
    classifier: &NodeClassifier,
    out: &mut Vec<&'a mut TreeNode>,
) {
    for child in &mut node.children {
        match classifier.kind(child) {
            NodeKind::Run => out.push(child),
            NodeKind::InlineWrapper => collect_runs_mut(child, classifier, out),
            _ => {}
        }
    }
}

/// Read-only variant of [`paragraph_runs`].
pub(crate) fn paragraph_runs_ref<'a>(
    paragraph: &'a TreeNode,
    classifier: &NodeClassifier,
) -> Vec<&'a TreeNode> {
    let mut out = Vec::new();
    collect_runs(paragraph, classifier, &mut out);
    out
}

fn collect_runs<'a>(node: &'a TreeNode, classifier: &NodeClassifier, out: &mut Vec<&'a TreeNode>) {
    for child in &node.children {
        match classifier.kind(child) {
            NodeKind::Run => out.push(child),
            NodeKind::InlineWrapper => collect_runs(child, classifier, out),
            _ => {}
        }
    }
}
