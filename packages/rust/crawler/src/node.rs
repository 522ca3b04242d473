//! Typed navigation over a parsed HTML tree.
//!
//! Archive pages from different site eras put a document's speaker, title and
//! date at fixed positions relative to its link. [`Node`] exposes the moves
//! needed to reach them; a move that falls off the tree is a
//! [`FomcError::Parse`] rather than a panic.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node as DomNode};

use fomc_shared::{FomcError, Result};

/// A node (element, text, or other) in a parsed document.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    inner: NodeRef<'a, DomNode>,
}

impl<'a> From<ElementRef<'a>> for Node<'a> {
    fn from(el: ElementRef<'a>) -> Self {
        Self { inner: *el }
    }
}

impl<'a> Node<'a> {
    fn wrap(inner: NodeRef<'a, DomNode>) -> Self {
        Self { inner }
    }

    /// Element tag name, `None` for text and other nodes.
    pub fn tag(&self) -> Option<&'a str> {
        self.inner.value().as_element().map(|el| el.name())
    }

    /// Concatenated text of this node and its descendants.
    pub fn text(&self) -> String {
        self.inner
            .descendants()
            .filter_map(|n| n.value().as_text())
            .map(|t| &**t)
            .collect()
    }

    /// [`Node::text`] with line breaks removed and surrounding whitespace trimmed.
    pub fn clean_text(&self) -> String {
        self.text().replace('\n', "").trim().to_string()
    }

    pub fn parent(&self) -> Result<Node<'a>> {
        self.inner
            .parent()
            .map(Self::wrap)
            .ok_or_else(|| self.missing("parent"))
    }

    pub fn next_sibling(&self) -> Result<Node<'a>> {
        self.inner
            .next_sibling()
            .map(Self::wrap)
            .ok_or_else(|| self.missing("next sibling"))
    }

    pub fn prev_sibling(&self) -> Result<Node<'a>> {
        self.inner
            .prev_sibling()
            .map(Self::wrap)
            .ok_or_else(|| self.missing("previous sibling"))
    }

    /// The node that follows this one in document order: its first child,
    /// or else the next sibling of the nearest node that has one.
    pub fn next_element(&self) -> Result<Node<'a>> {
        self.following()
            .next()
            .ok_or_else(|| self.missing("next element"))
    }

    /// First element named `tag` after this node in document order
    /// (descendants included).
    pub fn find_next(&self, tag: &str) -> Result<Node<'a>> {
        self.following()
            .find(|n| n.tag() == Some(tag))
            .ok_or_else(|| self.missing(&format!("<{tag}>")))
    }

    fn following(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        std::iter::successors(document_successor(self.inner), |n| {
            document_successor(*n)
        })
        .map(Self::wrap)
    }

    fn missing(&self, what: &str) -> FomcError {
        let at = match self.tag() {
            Some(tag) => format!("<{tag}>"),
            None => {
                let snippet: String = self.clean_text().chars().take(40).collect();
                format!("{snippet:?}")
            }
        };
        FomcError::parse(format!("no {what} after {at}"))
    }
}

fn document_successor<'a>(node: NodeRef<'a, DomNode>) -> Option<NodeRef<'a, DomNode>> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }
    let mut current = Some(node);
    while let Some(n) = current {
        if let Some(sibling) = n.next_sibling() {
            return Some(sibling);
        }
        current = n.parent();
    }
    None
}
