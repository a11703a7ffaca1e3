use thiserror::Error;

/// Why the text service did not produce a report.
#[derive(Debug, Error)]
pub enum SummaryServiceError {
    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingCredential,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}
