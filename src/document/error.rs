use thiserror::Error;

use crate::document::NodeId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    #[error("No node with id {0}")]
    UnknownNode(NodeId),

    #[error("Node {0} is not a text node")]
    NotText(NodeId),

    #[error("Node {0} is not an element")]
    NotElement(NodeId),
}
