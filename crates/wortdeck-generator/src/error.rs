#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    // Distinct from Network so the user is pointed at credential entry
    // rather than told to check connectivity.
    #[error("authentication failed, check your OpenAI API key")]
    Auth,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("response did not match the expected shape: {0}")]
    Schema(String),

    #[error("input text is empty")]
    EmptyInput,
}
