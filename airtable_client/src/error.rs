use thiserror::Error;

#[derive(Error, Debug)]
pub enum AirtableError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid API base URL: {url}")]
    InvalidBaseUrl { url: String },
}
