use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::convert::{self, FromXPath};
use crate::error::{Error, ErrorRecord, Result};
use crate::state::DocumentState;

/// A node within a [`Document`](crate::Document).
///
/// Nodes are obtained by querying for `Vec<Node>`. A node does not keep its
/// document alive. Once the document is dropped, or its tree is rebuilt by
/// [`Node::replace`] on another node, the handle is stale and its
/// operations fail with [`Error::Stale`].
///
/// The default node is empty: it refers to nothing and every operation on
/// it fails with [`Error::EmptyNode`].
#[derive(Clone, Default)]
pub struct Node {
    document: Weak<RefCell<DocumentState>>,
    node: Option<xot::Node>,
    generation: u64,
    err: Option<ErrorRecord>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("node", &self.node)
            .field("generation", &self.generation)
            .field("err", &self.err)
            .finish()
    }
}

impl Node {
    pub(crate) fn new(
        document: Weak<RefCell<DocumentState>>,
        node: xot::Node,
        generation: u64,
    ) -> Self {
        Self {
            document,
            node: Some(node),
            generation,
            err: None,
        }
    }

    /// The document state and tree node this handle refers to, if it is
    /// still valid.
    fn target(&self) -> Result<(Rc<RefCell<DocumentState>>, xot::Node)> {
        let node = self.node.ok_or(Error::EmptyNode)?;
        let document = self.document.upgrade().ok_or(Error::Stale {
            reason: "document was dropped",
        })?;
        if document.borrow().generation() != self.generation {
            return Err(Error::Stale {
                reason: "tree was rebuilt",
            });
        }
        Ok((document, node))
    }

    /// True for a default node that refers to nothing.
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// True when the node referred to something that is gone.
    pub fn is_stale(&self) -> bool {
        !self.is_empty() && self.target().is_err()
    }

    /// The error recorded by the most recent call, if it failed or warned.
    pub fn last_error(&self) -> Option<&ErrorRecord> {
        self.err.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.err = None;
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        self.err = result.as_ref().err().map(ErrorRecord::from);
        result
    }

    /// The subtree rooted at this node as indented XML.
    pub fn try_xml(&mut self) -> Result<String> {
        let result = self.render();
        self.record(result)
    }

    fn render(&self) -> Result<String> {
        let (document, node) = self.target()?;
        let state = document.borrow();
        state.tree()?.serialize(node)
    }

    /// The subtree rooted at this node as indented XML, or an empty string
    /// on failure.
    pub fn xml(&mut self) -> String {
        self.try_xml().unwrap_or_default()
    }

    /// Replace this node by the root element of `xml`.
    ///
    /// Element, text, comment and processing instruction nodes can be
    /// replaced. On success the handle refers to the inserted element. The
    /// document's tree is rebuilt, which makes every other node handle of
    /// the document stale. On failure the node is left unchanged.
    pub fn try_replace(&mut self, xml: &str) -> Result<()> {
        let result = self.replace_node(xml);
        self.record(result)
    }

    fn replace_node(&mut self, xml: &str) -> Result<()> {
        let (document, node) = self.target()?;
        let mut state = document.borrow_mut();
        let replacement = state.replace(node, xml)?;
        self.node = Some(replacement);
        self.generation = state.generation();
        Ok(())
    }

    /// Replace this node by the root element of `xml`. Returns whether it
    /// succeeded.
    pub fn replace(&mut self, xml: &str) -> bool {
        self.try_replace(xml).is_ok()
    }

    /// Evaluate `query` with this node as context item and convert the
    /// result to `T`.
    pub fn try_xpath<T: FromXPath>(&mut self, query: &str) -> Result<T> {
        let result = self
            .target()
            .and_then(|(document, node)| convert::query::<T>(&document, Some(node), query));
        let converted = self.record(result)?;
        self.err = converted.warning.as_ref().map(ErrorRecord::from);
        Ok(converted.value)
    }

    /// Evaluate `query` against this node, returning the default value of
    /// `T` on failure.
    pub fn xpath<T: FromXPath>(&mut self, query: &str) -> T {
        self.try_xpath(query).unwrap_or_default()
    }
}
