use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to find an asset tag stage in the current pipeline, `{plugin}` needs one to inject cdn tags")]
    Configuration { plugin: &'static str },
    #[error("failed to serialize the externals registry: {0}")]
    Registry(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    #[error("cdn module \"{0}\" is not configured")]
    NotConfigured(String),
    #[error("cdn module \"{name}\" failed to load {url}: {reason}")]
    ScriptLoad {
        name: String,
        url: String,
        reason: String,
    },
}
