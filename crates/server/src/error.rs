use thiserror::Error;

/// Errors that stop the service from starting or keep it from serving.
///
/// Per-request failures never surface here; they are absorbed by the
/// fallback chain.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Missing required credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to load sign catalog: {0}")]
    Catalog(#[from] catalog::CatalogError),

    #[error("Failed to build {service} client: {reason}")]
    Client {
        service: &'static str,
        reason: String,
    },

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}
