use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    UnknownNode(String),

    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),
}
