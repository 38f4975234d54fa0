use std::path::{Path, PathBuf};

use xee_xpath::{DocumentHandle, Documents};
use xot::output::xml::{Declaration, Parameters};
use xot::output::Indentation;
use xot::Xot;

use crate::context::EvalContext;
use crate::error::{snippet, Error, Result};
use crate::value::XPathValue;

/// A parsed XML tree as stored by Xee.
pub(crate) struct Tree {
    documents: Documents,
    handle: DocumentHandle,
}

impl Tree {
    pub(crate) fn parse(xml: &str) -> Result<Self> {
        let mut documents = Documents::new();
        let handle = documents
            .add_string_without_uri(xml)
            .map_err(|e| Error::Parse {
                message: e.to_string(),
                data: snippet(xml),
            })?;
        Ok(Self { documents, handle })
    }

    pub(crate) fn root(&self) -> Option<xot::Node> {
        self.documents.document_node(self.handle)
    }

    pub(crate) fn xot(&self) -> &Xot {
        self.documents.xot()
    }

    /// Indented serialization of `node`. A document node gets an XML
    /// declaration; any other node is rendered without trailing newline.
    /// Attribute and namespace nodes have no serialization of their own.
    pub(crate) fn serialize(&self, node: xot::Node) -> Result<String> {
        let xot = self.xot();
        let kind = node_kind(xot, node);
        if matches!(kind, "attribute" | "namespace") {
            return Err(Error::NotSerializable { kind });
        }
        let is_document = xot.is_document(node);
        let declaration = is_document.then(|| Declaration {
            encoding: Some("UTF-8".to_string()),
            standalone: None,
        });
        let parameters = Parameters {
            indentation: Some(Indentation::default()),
            declaration,
            ..Default::default()
        };
        let mut xml = xot.serialize_xml_string(parameters, node)?;
        if !is_document {
            xml.truncate(xml.trim_end_matches('\n').len());
        }
        Ok(xml)
    }
}

/// Everything a document handle owns, shared with its node handles through
/// weak references.
pub(crate) struct DocumentState {
    pub(crate) tree: Option<Tree>,
    pub(crate) origin: Option<PathBuf>,
    context: Option<EvalContext>,
    generation: u64,
}

impl DocumentState {
    pub(crate) fn new(tree: Option<Tree>, origin: Option<PathBuf>) -> Self {
        Self {
            tree,
            origin,
            context: None,
            generation: 0,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn tree(&self) -> Result<&Tree> {
        self.tree.as_ref().ok_or(Error::NoTree)
    }

    /// Evaluate `query` against `node`, or against the document node when
    /// `node` is `None`.
    ///
    /// The evaluation context is created on first use. Failing to create it
    /// releases the tree.
    pub(crate) fn evaluate(&mut self, node: Option<xot::Node>, query: &str) -> Result<XPathValue> {
        let root = match self.tree.as_ref().and_then(Tree::root) {
            Some(root) => root,
            None => {
                let data = self.origin_data();
                log::warn!("cannot create XPath context for {}; releasing tree", data);
                self.release();
                return Err(Error::Context { data });
            }
        };
        let context = self.context.get_or_insert_with(|| {
            log::debug!("creating XPath context");
            EvalContext::new()
        });
        // the tree is present, checked above
        let Some(tree) = self.tree.as_mut() else {
            return Err(Error::NoTree);
        };
        context.evaluate(&mut tree.documents, node.unwrap_or(root), query)
    }

    /// Replace `old` by a copy of the root element of `fragment`.
    ///
    /// The tree is rebuilt afterwards, so the node returned belongs to the
    /// new generation.
    pub(crate) fn replace(&mut self, old: xot::Node, fragment: &str) -> Result<xot::Node> {
        let tree = self.tree.as_mut().ok_or(Error::NoTree)?;
        let xot = tree.documents.xot_mut();
        let kind = node_kind(xot, old);
        if !matches!(kind, "element" | "text" | "comment" | "processing instruction") {
            return Err(Error::NotReplaceable { kind });
        }
        let is_top_level = xot.parent(old).is_some_and(|parent| xot.is_document(parent));
        // next to the document element only another element fits
        if is_top_level && kind != "element" {
            return Err(Error::NotReplaceable { kind });
        }
        let Some(path) = child_path(xot, old) else {
            return Err(Error::NotReplaceable { kind });
        };

        let scratch = xot.parse(fragment).map_err(|e| Error::Fragment {
            message: e.to_string(),
            data: snippet(fragment),
        })?;
        let element = match xot.document_element(scratch) {
            Ok(element) => element,
            Err(e) => {
                xot.remove(scratch)?;
                return Err(Error::Fragment {
                    message: e.to_string(),
                    data: "Could not extract root node from new XML".to_string(),
                });
            }
        };

        let xml = if is_top_level {
            // a document cannot hold two document elements, not even for a
            // moment, so the fragment becomes the document
            let xml = xot.to_string(scratch)?;
            xot.remove(scratch)?;
            xml
        } else {
            let copy = xot.clone_node(element);
            xot.insert_before(old, copy)?;
            xot.remove(old)?;
            xot.remove(scratch)?;
            let root = tree.root().ok_or(Error::NoTree)?;
            tree.xot().to_string(root)?
        };

        let rebuilt = Tree::parse(&xml)?;
        let root = rebuilt.root().ok_or(Error::NoTree)?;
        let node = if is_top_level {
            rebuilt.xot().document_element(root)?
        } else {
            follow_path(rebuilt.xot(), root, &path).ok_or(Error::NoTree)?
        };
        self.install(rebuilt);
        Ok(node)
    }

    fn install(&mut self, tree: Tree) {
        log::debug!("rebuilt tree, generation {}", self.generation + 1);
        self.tree = Some(tree);
        self.context = None;
        self.generation += 1;
    }

    fn release(&mut self) {
        self.tree = None;
        self.context = None;
        self.generation += 1;
    }

    pub(crate) fn origin_data(&self) -> String {
        self.origin
            .as_deref()
            .map(Path::display)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn node_kind(xot: &Xot, node: xot::Node) -> &'static str {
    if xot.is_element(node) {
        "element"
    } else if xot.is_text(node) {
        "text"
    } else if xot.is_comment(node) {
        "comment"
    } else if xot.is_processing_instruction(node) {
        "processing instruction"
    } else if xot.is_document(node) {
        "document"
    } else if xot.is_attribute_node(node) {
        "attribute"
    } else {
        "namespace"
    }
}

/// Child indices leading from the document node to `node`.
fn child_path(xot: &Xot, node: xot::Node) -> Option<Vec<usize>> {
    let mut path = Vec::new();
    let mut current = node;
    while let Some(parent) = xot.parent(current) {
        let index = xot.children(parent).position(|child| child == current)?;
        path.push(index);
        current = parent;
    }
    path.reverse();
    Some(path)
}

fn follow_path(xot: &Xot, root: xot::Node, path: &[usize]) -> Option<xot::Node> {
    path.iter()
        .try_fold(root, |node, &index| xot.children(node).nth(index))
}
