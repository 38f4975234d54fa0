use std::fmt;

use xee_xpath::{Atomic, Item};

use crate::error::{Error, Result};

/// The category of an XPath result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    /// A single string-like atomic value.
    Text,
    /// A single numeric atomic value.
    Number,
    /// A single boolean.
    Boolean,
    /// A sequence of nodes, possibly empty.
    Nodes,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::Text => write!(f, "string"),
            ResultKind::Number => write!(f, "number"),
            ResultKind::Boolean => write!(f, "boolean"),
            ResultKind::Nodes => write!(f, "nodelist/resultset"),
        }
    }
}

/// The result of an XPath query, reduced to the four categories a caller
/// can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    /// Nodes in the order the query produced them.
    Nodes(Vec<xot::Node>),
}

impl XPathValue {
    /// The category of this value.
    pub fn kind(&self) -> ResultKind {
        match self {
            XPathValue::Text(_) => ResultKind::Text,
            XPathValue::Number(_) => ResultKind::Number,
            XPathValue::Boolean(_) => ResultKind::Boolean,
            XPathValue::Nodes(_) => ResultKind::Nodes,
        }
    }

    /// Reduce the items of a result sequence to a value.
    ///
    /// A sequence made of nodes only (the empty sequence included) is a
    /// node-set. Otherwise the sequence must hold exactly one atomic value
    /// that is a string, a number or a boolean.
    pub(crate) fn from_items(items: Vec<Item>, query: &str) -> Result<Self> {
        if items.iter().all(|item| matches!(item, Item::Node(_))) {
            let nodes = items
                .into_iter()
                .filter_map(|item| match item {
                    Item::Node(node) => Some(node),
                    _ => None,
                })
                .collect();
            return Ok(XPathValue::Nodes(nodes));
        }
        let unsupported = |description: String| Error::Unsupported {
            description,
            query: query.to_string(),
        };
        match items.as_slice() {
            [Item::Atomic(atomic)] => from_atomic(atomic)
                .ok_or_else(|| unsupported(format!("atomic value {:?}", atomic))),
            [Item::Function(_)] => Err(unsupported("function item".to_string())),
            _ => Err(unsupported(format!(
                "sequence of {} items that are not all nodes",
                items.len()
            ))),
        }
    }
}

fn from_atomic(atomic: &Atomic) -> Option<XPathValue> {
    match atomic {
        Atomic::String(_, s) | Atomic::Untyped(s) => Some(XPathValue::Text(s.to_string())),
        Atomic::Boolean(b) => Some(XPathValue::Boolean(*b)),
        Atomic::Double(d) => Some(XPathValue::Number(d.0)),
        Atomic::Float(f) => Some(XPathValue::Number(f64::from(f.0))),
        // decimals and integers are arbitrary precision; go through their
        // canonical representation
        Atomic::Decimal(d) => d.to_string().parse().ok().map(XPathValue::Number),
        Atomic::Integer(_, i) => i.to_string().parse().ok().map(XPathValue::Number),
        _ => None,
    }
}
