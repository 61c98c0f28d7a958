// ABOUTME: Error types for page extraction.
// ABOUTME: Provides ExtractError for pages whose URL or markup cannot be decoded at all.

use thiserror::Error;

/// Errors that abort the extraction of a whole page.
///
/// Row- and cell-level problems never surface here: they are logged and the
/// affected field is left at its schema default.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page URL does not carry the identifier the parser derives from it.
    #[error("cannot derive {what} from url {url}")]
    UrlPattern { url: String, what: &'static str },

    /// A game identifier does not start with a valid calendar date.
    #[error("invalid game id: {0}")]
    GameId(String),
}

impl ExtractError {
    /// Creates a UrlPattern error.
    pub fn url_pattern(url: impl Into<String>, what: &'static str) -> Self {
        ExtractError::UrlPattern {
            url: url.into(),
            what,
        }
    }
}
