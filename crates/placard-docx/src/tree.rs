//! Tree node representation for WordprocessingML parts.

/// Node in a parsed XML tree.
///
/// Uses the text/tail model: `text` is the character data before the first
/// child, `tail` is the character data after this element's end tag and
/// before the next sibling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    /// Qualified element name as written in the source (e.g. `w:p`).
    pub tag: String,
    /// Direct text content.
    pub text: String,
    /// Text after element (XML tail).
    pub tail: String,
    /// Element attributes in source order, including namespace declarations.
    pub attrs: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new tree node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set tail content.
    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Namespace prefix of the tag, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.tag.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Tag name without its namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.tag
            .split_once(':')
            .map_or(self.tag.as_str(), |(_, local)| local)
    }

    /// Get an attribute value by qualified name.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attrs.push((key, value));
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(index).1)
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }
}
