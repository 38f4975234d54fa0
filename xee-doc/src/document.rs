use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::convert::{self, FromXPath};
use crate::error::{snippet, Error, ErrorRecord, Result};
use crate::state::{DocumentState, Tree};

/// A parsed XML document.
///
/// The document owns its tree and the XPath evaluation context built for
/// it; both are released when the document is dropped. [`Node`](crate::Node)
/// handles obtained from queries refer back to the document without owning
/// it.
///
/// Every operation comes in two forms. The `try_` form returns a
/// [`Result`]. The other form returns the default value of its result type
/// on failure. Both record the failure, and clear any earlier one, so that
/// [`Document::last_error`] always describes the most recent call.
pub struct Document {
    state: Rc<RefCell<DocumentState>>,
    err: Option<ErrorRecord>,
}

impl Default for Document {
    /// A document without a tree.
    fn default() -> Self {
        Self::with_state(DocumentState::new(None, None))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Document")
            .field("origin", &state.origin)
            .field("has_tree", &state.tree.is_some())
            .field("generation", &state.generation())
            .field("err", &self.err)
            .finish()
    }
}

impl Document {
    fn with_state(state: DocumentState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            err: None,
        }
    }

    /// Build a document from a load result, keeping the error if there is
    /// one.
    fn loaded(result: Result<Self>) -> Self {
        match result {
            Ok(document) => document,
            Err(e) => {
                let mut document = Self::default();
                document.err = Some(ErrorRecord::from(&e));
                document
            }
        }
    }

    /// Read and parse the file at `path`.
    ///
    /// The path is recorded as the document's origin, which
    /// [`Document::save`] writes back to.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("opening {}", path.display());
        let xml = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = Tree::parse(&xml).map_err(|e| match e {
            Error::Parse { message, .. } => Error::Parse {
                message,
                data: path.display().to_string(),
            },
            e => e,
        })?;
        Ok(Self::with_state(DocumentState::new(
            Some(tree),
            Some(path.to_path_buf()),
        )))
    }

    /// Read and parse the file at `path`. On failure the document has no
    /// tree and [`Document::last_error`] tells why.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::loaded(Self::try_open(path))
    }

    /// Parse a buffer holding UTF-8 encoded XML.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes).map_err(|e| Error::Parse {
            message: e.to_string(),
            data: snippet(&String::from_utf8_lossy(bytes)),
        })?;
        Self::try_parse(xml)
    }

    /// Parse a buffer holding UTF-8 encoded XML. On failure the document
    /// has no tree and [`Document::last_error`] tells why.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::loaded(Self::try_from_bytes(bytes))
    }

    /// Parse XML text.
    pub fn try_parse(xml: &str) -> Result<Self> {
        log::debug!("parsing {} bytes of XML", xml.len());
        let tree = Tree::parse(xml)?;
        Ok(Self::with_state(DocumentState::new(Some(tree), None)))
    }

    /// Parse XML text. On failure the document has no tree and
    /// [`Document::last_error`] tells why.
    pub fn parse(xml: &str) -> Self {
        Self::loaded(Self::try_parse(xml))
    }

    /// The file this document was opened from or last saved to.
    pub fn origin(&self) -> Option<PathBuf> {
        self.state.borrow().origin.clone()
    }

    /// Whether the document holds a tree.
    pub fn has_tree(&self) -> bool {
        self.state.borrow().tree.is_some()
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

    /// The whole document as indented XML with an XML declaration.
    pub fn try_xml(&mut self) -> Result<String> {
        let result = self.render();
        self.record(result)
    }

    fn render(&self) -> Result<String> {
        let state = self.state.borrow();
        let tree = state.tree()?;
        let root = tree.root().ok_or(Error::NoTree)?;
        tree.serialize(root)
    }

    /// The whole document as indented XML, or an empty string on failure.
    pub fn xml(&mut self) -> String {
        self.try_xml().unwrap_or_default()
    }

    /// Write the document to `path`, which becomes its origin.
    pub fn try_save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let result = self.write(path.as_ref());
        self.record(result)
    }

    fn write(&self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(Error::EmptyPath);
        }
        let xml = self.render()?;
        std::fs::write(path, xml).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("saved {}", path.display());
        let mut state = self.state.borrow_mut();
        if state.origin.as_deref() != Some(path) {
            state.origin = Some(path.to_path_buf());
        }
        Ok(())
    }

    /// Write the document to `path`. Returns whether it succeeded.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> bool {
        self.try_save_as(path).is_ok()
    }

    /// Write the document back to its origin.
    pub fn try_save(&mut self) -> Result<()> {
        let result = match self.origin() {
            Some(origin) if !origin.as_os_str().is_empty() => self.write(&origin),
            _ => Err(Error::NoOrigin),
        };
        self.record(result)
    }

    /// Write the document back to its origin. Returns whether it succeeded.
    pub fn save(&mut self) -> bool {
        self.try_save().is_ok()
    }

    /// Evaluate `query` with the document node as context item and convert
    /// the result to `T`.
    ///
    /// ```
    /// use xee_doc::Document;
    ///
    /// let mut document = Document::parse("<doc><p>1</p><p>2</p></doc>");
    /// let count: f64 = document.try_xpath("count(//p)").unwrap();
    /// assert_eq!(count, 2.0);
    /// ```
    ///
    /// A warning raised by the conversion (a truncated integer) is recorded
    /// while the value is still returned.
    pub fn try_xpath<T: FromXPath>(&mut self, query: &str) -> Result<T> {
        let result = convert::query::<T>(&self.state, None, query);
        let converted = self.record(result)?;
        self.err = converted.warning.as_ref().map(ErrorRecord::from);
        Ok(converted.value)
    }

    /// Evaluate `query` against the document, returning the default value
    /// of `T` on failure.
    pub fn xpath<T: FromXPath>(&mut self, query: &str) -> T {
        self.try_xpath(query).unwrap_or_default()
    }
}
