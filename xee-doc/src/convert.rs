use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::node::Node;
use crate::state::DocumentState;
use crate::value::{ResultKind, XPathValue};

/// A type an XPath result can be converted into.
///
/// Implemented for `String`, `f64`, `bool`, `i64` and `Vec<Node>`. When
/// the result has a different category than the one the type asks for,
/// conversion fails with [`Error::TypeMismatch`]; there is no coercion
/// between categories. The [`Default`] value is what the out-of-band query
/// methods return on failure.
pub trait FromXPath: Sized + Default {
    /// Convert a classified result.
    fn from_xpath(value: XPathValue, conversion: &mut Conversion<'_>) -> Result<Self>;
}

/// What a conversion knows about the query that produced its value.
pub struct Conversion<'a> {
    query: &'a str,
    document: Weak<RefCell<DocumentState>>,
    generation: u64,
    warning: Option<Error>,
}

impl<'a> Conversion<'a> {
    /// The query text.
    pub fn query(&self) -> &str {
        self.query
    }

    /// Record a warning. The converted value is still returned to the
    /// caller.
    pub fn warn(&mut self, warning: Error) {
        self.warning = Some(warning);
    }

    /// The error for a result that is not of the `expected` category.
    pub fn mismatch(&self, expected: ResultKind) -> Error {
        Error::TypeMismatch {
            expected,
            query: self.query.to_string(),
        }
    }

    fn node(&self, node: xot::Node) -> Node {
        Node::new(self.document.clone(), node, self.generation)
    }
}

impl FromXPath for String {
    fn from_xpath(value: XPathValue, conversion: &mut Conversion<'_>) -> Result<Self> {
        match value {
            XPathValue::Text(s) => Ok(s),
            _ => Err(conversion.mismatch(ResultKind::Text)),
        }
    }
}

impl FromXPath for f64 {
    fn from_xpath(value: XPathValue, conversion: &mut Conversion<'_>) -> Result<Self> {
        match value {
            XPathValue::Number(n) => Ok(n),
            _ => Err(conversion.mismatch(ResultKind::Number)),
        }
    }
}

impl FromXPath for bool {
    fn from_xpath(value: XPathValue, conversion: &mut Conversion<'_>) -> Result<Self> {
        match value {
            XPathValue::Boolean(b) => Ok(b),
            _ => Err(conversion.mismatch(ResultKind::Boolean)),
        }
    }
}

/// Integers are numbers truncated toward zero. A number with a fractional
/// part, or one outside the `i64` range, still converts, with a warning.
impl FromXPath for i64 {
    fn from_xpath(value: XPathValue, conversion: &mut Conversion<'_>) -> Result<Self> {
        let n = match value {
            XPathValue::Number(n) => n,
            _ => return Err(conversion.mismatch(ResultKind::Number)),
        };
        let in_range = (i64::MIN as f64..i64::MAX as f64).contains(&n);
        if n.fract() != 0.0 || !in_range {
            let query = conversion.query().to_string();
            log::warn!("truncating {} from {:?}", n, query);
            conversion.warn(Error::Truncated { value: n, query });
        }
        // saturating; NaN becomes 0
        Ok(n.trunc() as i64)
    }
}

impl FromXPath for Vec<Node> {
    fn from_xpath(value: XPathValue, conversion: &mut Conversion<'_>) -> Result<Self> {
        match value {
            XPathValue::Nodes(nodes) => Ok(nodes
                .into_iter()
                .map(|node| conversion.node(node))
                .collect()),
            _ => Err(conversion.mismatch(ResultKind::Nodes)),
        }
    }
}

/// A converted value along with the warning its conversion raised, if any.
pub(crate) struct Converted<T> {
    pub(crate) value: T,
    pub(crate) warning: Option<Error>,
}

/// Evaluate `query` within `document` and convert the result.
///
/// `node` is the context node; `None` evaluates against the document node.
pub(crate) fn query<T: FromXPath>(
    document: &Rc<RefCell<DocumentState>>,
    node: Option<xot::Node>,
    query: &str,
) -> Result<Converted<T>> {
    let (value, generation) = {
        let mut state = document.borrow_mut();
        let value = state.evaluate(node, query)?;
        (value, state.generation())
    };
    let mut conversion = Conversion {
        query,
        document: Rc::downgrade(document),
        generation,
        warning: None,
    };
    let value = T::from_xpath(value, &mut conversion)?;
    Ok(Converted {
        value,
        warning: conversion.warning,
    })
}
