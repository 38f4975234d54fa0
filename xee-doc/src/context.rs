use ahash::{HashMap, HashMapExt};
use xee_xpath::query::ManyQuery;
use xee_xpath::{error, Documents, Item, Queries, Query};

use crate::error::{Error, Result};
use crate::value::XPathValue;

type ItemConvert = fn(&mut Documents, &Item) -> error::Result<Item>;

fn keep_item(_: &mut Documents, item: &Item) -> error::Result<Item> {
    Ok(item.clone())
}

/// The XPath evaluation context of one document.
///
/// It holds the static context used to compile expressions and the
/// expressions compiled so far, keyed by their source text. It is owned by
/// the document state and dropped together with the tree.
pub(crate) struct EvalContext {
    queries: Queries<'static>,
    compiled: HashMap<String, ManyQuery<Item, ItemConvert>>,
}

impl EvalContext {
    pub(crate) fn new() -> Self {
        Self {
            queries: Queries::default(),
            compiled: HashMap::new(),
        }
    }

    /// Evaluate `query` with `node` as the context item.
    pub(crate) fn evaluate(
        &mut self,
        documents: &mut Documents,
        node: xot::Node,
        query: &str,
    ) -> Result<XPathValue> {
        // the code with its span, followed by the documented message
        let evaluation_error = |e: error::Error| Error::Evaluation {
            message: format!("{}: {}", e, e.error.message()),
            query: query.to_string(),
        };
        if !self.compiled.contains_key(query) {
            log::debug!("compiling XPath expression {:?}", query);
            let compiled = self
                .queries
                .many(query, keep_item as ItemConvert)
                .map_err(evaluation_error)?;
            self.compiled.insert(query.to_string(), compiled);
        }
        let compiled = &self.compiled[query];
        let items = compiled
            .execute(documents, node)
            .map_err(evaluation_error)?;
        XPathValue::from_items(items, query)
    }

    #[cfg(test)]
    pub(crate) fn compiled_len(&self) -> usize {
        self.compiled.len()
    }
}
