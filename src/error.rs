use thiserror::Error;

/// Failures of the single stats request. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error sending GraphQL request: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to parse GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GraphQL reported errors: {0}")]
    GraphQl(String),

    #[error("GitHub user '{0}' not found")]
    UserNotFound(String),
}
