use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("DigitalOcean API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DigitalOcean API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("droplet {id} did not become active within {timeout_secs}s")]
    ActivationTimeout { id: u64, timeout_secs: u64 },
}

// Type alias for Result with ProviderError
pub type ProviderResult<T> = Result<T, ProviderError>;
