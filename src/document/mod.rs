//! Page documents the shortcode pipeline reads from and writes into.
//!
//! The pipeline only needs three capabilities from a page: enumerate its text
//! nodes, swap a text node for an (initially empty) element, and set that
//! element's inner HTML. [`DocumentTree`] names exactly those, so the pipeline
//! can run against a parsed HTML page ([`HtmlDocument`]) or anything else that
//! can offer them.

pub mod error;
pub mod html;

use derive_more::Display;

pub use error::DocumentError;
pub use html::HtmlDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct NodeId(pub usize);

pub trait DocumentTree {
    /// Text nodes in document order.
    fn text_nodes(&self) -> Vec<NodeId>;

    /// The decoded value of a text node, `None` for anything else.
    fn text(&self, node: NodeId) -> Option<String>;

    /// Replaces a text node with an empty element carrying `class`, returning
    /// the id of the new element.
    fn replace_with_element(&mut self, node: NodeId, class: &str)
        -> Result<NodeId, DocumentError>;

    fn set_content(&mut self, element: NodeId, html: &str) -> Result<(), DocumentError>;
}
