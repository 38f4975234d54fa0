//! Typed XPath queries over XML documents.
//!
//! This crate wraps [`xot`] trees and [`xee_xpath`] evaluation in two
//! handles: [`Document`] owns a parsed document, [`Node`] refers to a node
//! inside one. Queries are typed by the value they should produce:
//!
//! ```
//! use xee_doc::{Document, Node};
//!
//! let mut document = Document::parse(
//!     r#"<Root><EntryType name="demo"><Comment>hi</Comment></EntryType></Root>"#,
//! );
//! let title: String = document.xpath("string((//EntryType/@name)[1])");
//! assert_eq!(title, "demo");
//!
//! let mut comments: Vec<Node> = document.xpath("//EntryType/Comment");
//! assert_eq!(comments[0].xml(), "<Comment>hi</Comment>");
//! ```
//!
//! Failures do not panic. Every operation has a `try_` form returning a
//! [`Result`], and a plain form returning a default value. Both keep an
//! [`ErrorRecord`] on the handle, readable through `last_error`, which can
//! be passed to the process-wide handler with [`handle_error`].
//!
//! Handles are built on `Rc` and cannot be sent to another thread.

mod context;
mod convert;
mod document;
mod error;
mod handler;
mod node;
mod state;
mod value;

pub use convert::{Conversion, FromXPath};
pub use document::Document;
pub use error::{Error, ErrorRecord, Level, Result};
pub use handler::{handle_error, print_error, reset_error_handler, set_error_handler};
pub use node::Node;
pub use value::{ResultKind, XPathValue};
