//! Typed view over a parsed WordprocessingML part.
//!
//! Elements are classified into a closed [`NodeKind`] set by resolving the
//! tag prefix against the namespace declarations of the root element, so
//! callers never match on serialized tag strings.

use std::collections::HashMap;

use crate::tree::TreeNode;

/// Transitional WordprocessingML namespace.
pub const W_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Strict WordprocessingML namespace.
pub const W_STRICT_NAMESPACE: &str = "http://purl.oclc.org/ooxml/wordprocessingml/main";

/// Structural kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Main document body.
    Body,
    /// Paragraph.
    Paragraph,
    /// Formatted text run.
    Run,
    /// Run properties.
    RunProperties,
    /// Text-bearing node inside a run.
    Text,
    /// Line, page or column break.
    Break,
    /// Tab character.
    Tab,
    /// DrawingML object (images, shapes, text boxes).
    Drawing,
    /// VML picture or embedded object.
    Picture,
    /// Layout hint written by the editor with no visible content.
    RenderHint,
    /// Table.
    Table,
    /// Table row.
    TableRow,
    /// Table cell.
    TableCell,
    /// Content of a floating text box.
    TextBoxContent,
    /// Transparent wrapper around runs or blocks (hyperlinks, tracked insertions,
    /// content controls).
    InlineWrapper,
    /// Anything else.
    Other,
}

impl NodeKind {
    /// Whether a run child of this kind is a non-text element that must survive
    /// text rewrites.
    #[must_use]
    pub fn is_special_run_content(self) -> bool {
        !matches!(self, Self::RunProperties | Self::Text | Self::RenderHint)
    }
}

/// Resolves element tags to [`NodeKind`]s using namespace declarations.
#[derive(Debug, Clone)]
pub struct NodeClassifier {
    namespaces: HashMap<String, String>,
}

impl Default for NodeClassifier {
    fn default() -> Self {
        let mut namespaces = HashMap::new();
        namespaces.insert("w".to_owned(), W_NAMESPACE.to_owned());
        Self { namespaces }
    }
}

impl NodeClassifier {
    /// Build a classifier from the namespace declarations on `root`.
    ///
    /// The conventional `w` prefix is assumed when the root does not declare it.
    #[must_use]
    pub fn from_root(root: &TreeNode) -> Self {
        let mut classifier = Self::default();
        for (key, value) in &root.attrs {
            if key == "xmlns" {
                classifier.namespaces.insert(String::new(), value.clone());
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                classifier
                    .namespaces
                    .insert(prefix.to_owned(), value.clone());
            }
        }
        classifier
    }

    /// Classify a single element.
    #[must_use]
    pub fn kind(&self, node: &TreeNode) -> NodeKind {
        let prefix = node.prefix().unwrap_or("");
        let in_wordml = self
            .namespaces
            .get(prefix)
            .is_some_and(|uri| uri == W_NAMESPACE || uri == W_STRICT_NAMESPACE);
        if !in_wordml {
            return NodeKind::Other;
        }

        match node.local_name() {
            "body" => NodeKind::Body,
            "p" => NodeKind::Paragraph,
            "r" => NodeKind::Run,
            "rPr" => NodeKind::RunProperties,
            "t" => NodeKind::Text,
            "br" | "cr" => NodeKind::Break,
            "tab" | "ptab" => NodeKind::Tab,
            "drawing" => NodeKind::Drawing,
            "pict" | "object" => NodeKind::Picture,
            "lastRenderedPageBreak" => NodeKind::RenderHint,
            "tbl" => NodeKind::Table,
            "tr" => NodeKind::TableRow,
            "tc" => NodeKind::TableCell,
            "txbxContent" => NodeKind::TextBoxContent,
            "hyperlink" | "ins" | "smartTag" | "fldSimple" | "sdt" | "sdtContent"
            | "customXml" | "bdo" | "dir" => NodeKind::InlineWrapper,
            _ => NodeKind::Other,
        }
    }

    /// Whether a run element carries any non-text inline element.
    #[must_use]
    pub fn has_special_content(&self, run: &TreeNode) -> bool {
        run.children
            .iter()
            .any(|child| self.kind(child).is_special_run_content())
    }

    /// Collect the outermost descendants of `node` (or `node` itself) of `kind`,
    /// in document order.
    #[must_use]
    pub fn find_all<'a>(&self, node: &'a TreeNode, kind: NodeKind) -> Vec<&'a TreeNode> {
        let mut out = Vec::new();
        collect(self, node, kind, &mut out);
        out
    }

    /// Mutable variant of [`find_all`](Self::find_all).
    ///
    /// Matches are not descended into, so the returned borrows are disjoint.
    #[must_use]
    pub fn find_all_mut<'a>(&self, node: &'a mut TreeNode, kind: NodeKind) -> Vec<&'a mut TreeNode> {
        let mut out = Vec::new();
        collect_mut(self, node, kind, &mut out);
        out
    }
}

fn collect<'a>(
    classifier: &NodeClassifier,
    node: &'a TreeNode,
    kind: NodeKind,
    out: &mut Vec<&'a TreeNode>,
) {
    if classifier.kind(node) == kind {
        out.push(node);
        return;
    }
    for child in &node.children {
        collect(classifier, child, kind, out);
    }
}

fn collect_mut<'a>(
    classifier: &NodeClassifier,
    node: &'a mut TreeNode,
    kind: NodeKind,
    out: &mut Vec<&'a mut TreeNode>,
) {
    if classifier.kind(node) == kind {
        out.push(node);
        return;
    }
    for child in &mut node.children {
        collect_mut(classifier, child, kind, out);
    }
}

/// A parsed XML part (usually `word/document.xml`).
#[derive(Debug, Clone)]
pub struct Document {
    /// XML declaration content (between `<?` and `?>`), if present.
    pub declaration: Option<String>,
    /// Root element.
    pub root: TreeNode,
    classifier: NodeClassifier,
}

impl Document {
    /// Wrap a root element, reading its namespace declarations.
    #[must_use]
    pub fn new(declaration: Option<String>, root: TreeNode) -> Self {
        let classifier = NodeClassifier::from_root(&root);
        Self {
            declaration,
            root,
            classifier,
        }
    }

    /// Classifier bound to this document's namespaces.
    #[must_use]
    pub fn classifier(&self) -> &NodeClassifier {
        &self.classifier
    }

    /// All outermost elements of `kind` anywhere in the document.
    #[must_use]
    pub fn find_all(&self, kind: NodeKind) -> Vec<&TreeNode> {
        self.classifier.find_all(&self.root, kind)
    }

    /// Mutable variant of [`find_all`](Self::find_all).
    #[must_use]
    pub fn find_all_mut(&mut self, kind: NodeKind) -> Vec<&mut TreeNode> {
        self.classifier.find_all_mut(&mut self.root, kind)
    }

    /// Split borrow of the root and the classifier, for walks that mutate the
    /// tree while classifying nodes.
    pub fn split_mut(&mut self) -> (&mut TreeNode, &NodeClassifier) {
        (&mut self.root, &self.classifier)
    }

    /// The main document body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&TreeNode> {
        self.find_all(NodeKind::Body).into_iter().next()
    }

    /// Mutable access to the main document body.
    pub fn body_mut(&mut self) -> Option<&mut TreeNode> {
        self.find_all_mut(NodeKind::Body).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        let text_box = TreeNode::new("w:txbxContent").with_children(vec![
            TreeNode::new("w:p").with_children(vec![
                TreeNode::new("w:r").with_children(vec![TreeNode::new("w:t").with_text("boxed")]),
            ]),
        ]);
        let drawing_run = TreeNode::new("w:r").with_children(vec![
            TreeNode::new("w:drawing").with_children(vec![
                TreeNode::new("wp:anchor").with_children(vec![
                    TreeNode::new("wps:txbx").with_children(vec![text_box]),
                ]),
            ]),
        ]);
        let body = TreeNode::new("w:body").with_children(vec![
            TreeNode::new("w:p").with_children(vec![drawing_run]),
            TreeNode::new("w:p"),
        ]);
        let root = TreeNode::new("w:document")
            .with_attr("xmlns:w", W_NAMESPACE)
            .with_attr("xmlns:wps", "http://schemas.microsoft.com/office/word/2010/wordprocessingShape")
            .with_children(vec![body]);
        Document::new(None, root)
    }

    #[test]
    fn test_classify_known_tags() {
        let classifier = NodeClassifier::default();
        assert_eq!(classifier.kind(&TreeNode::new("w:p")), NodeKind::Paragraph);
        assert_eq!(classifier.kind(&TreeNode::new("w:r")), NodeKind::Run);
        assert_eq!(classifier.kind(&TreeNode::new("w:br")), NodeKind::Break);
        assert_eq!(
            classifier.kind(&TreeNode::new("w:txbxContent")),
            NodeKind::TextBoxContent
        );
        assert_eq!(
            classifier.kind(&TreeNode::new("w:hyperlink")),
            NodeKind::InlineWrapper
        );
        assert_eq!(classifier.kind(&TreeNode::new("w:proofErr")), NodeKind::Other);
    }

    #[test]
    fn test_classify_resolves_custom_prefix() {
        let root = TreeNode::new("x:document").with_attr("xmlns:x", W_NAMESPACE);
        let classifier = NodeClassifier::from_root(&root);
        assert_eq!(classifier.kind(&TreeNode::new("x:p")), NodeKind::Paragraph);
    }

    #[test]
    fn test_classify_foreign_namespace_is_other() {
        let root = TreeNode::new("w:document")
            .with_attr("xmlns:w", W_NAMESPACE)
            .with_attr("xmlns:a", "http://schemas.openxmlformats.org/drawingml/2006/main");
        let classifier = NodeClassifier::from_root(&root);
        assert_eq!(classifier.kind(&TreeNode::new("a:p")), NodeKind::Other);
        assert_eq!(classifier.kind(&TreeNode::new("a:t")), NodeKind::Other);
    }

    #[test]
    fn test_classify_default_namespace() {
        let root = TreeNode::new("document").with_attr("xmlns", W_NAMESPACE);
        let classifier = NodeClassifier::from_root(&root);
        assert_eq!(classifier.kind(&TreeNode::new("p")), NodeKind::Paragraph);
    }

    #[test]
    fn test_special_content() {
        let classifier = NodeClassifier::default();
        let plain = TreeNode::new("w:r").with_children(vec![
            TreeNode::new("w:rPr"),
            TreeNode::new("w:t").with_text("x"),
            TreeNode::new("w:lastRenderedPageBreak"),
        ]);
        assert!(!classifier.has_special_content(&plain));

        let with_break = TreeNode::new("w:r").with_children(vec![TreeNode::new("w:br")]);
        assert!(classifier.has_special_content(&with_break));
    }

    #[test]
    fn test_find_all_reaches_nested_text_boxes() {
        let doc = sample_document();
        let boxes = doc.find_all(NodeKind::TextBoxContent);
        assert_eq!(boxes.len(), 1);

        let paragraphs = doc.find_all(NodeKind::Paragraph);
        // Outermost matches only: the text box paragraph sits inside a body paragraph.
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_find_all_mut_disjoint() {
        let mut doc = sample_document();
        for paragraph in doc.find_all_mut(NodeKind::Paragraph) {
            paragraph.set_attr("seen", "1");
        }
        assert!(
            doc.body()
                .unwrap()
                .children
                .iter()
                .all(|p| p.attr("seen") == Some("1"))
        );
    }

    #[test]
    fn test_body_missing() {
        let doc = Document::new(None, TreeNode::new("w:hdr"));
        assert!(doc.body().is_none());
    }
}
