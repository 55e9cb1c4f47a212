use thiserror::Error;

use crate::params::ConfigError;
use crate::time::TimeError;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("unknown element type `{0}`")]
    UnknownElement(String),
    #[error("unknown component `{0}`")]
    UnknownComponent(String),
    #[error("component name `{0}` is already used")]
    DuplicateComponent(String),
    #[error("component `{component}` does not declare port `{port}`")]
    UndeclaredPort { component: String, port: String },
    #[error("port `{component}.{port}` is already connected")]
    PortAlreadyConnected { component: String, port: String },
    #[error("components have already been constructed")]
    AlreadyBuilt,
    #[error("failed to construct `{component}`: {source}")]
    Construct {
        component: String,
        #[source]
        source: ConfigError,
    },
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error("invalid graph: {0}")]
    Graph(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
