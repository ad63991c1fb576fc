//! Errors raised while fetching and decoding a quote.
use thiserror::Error;

/// Failure kinds of a quote request.
///
/// Every variant is terminal: nothing is retried and no partially decoded
/// quote is ever handed back.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Transport or authentication failure reported by the session, unchanged.
    #[error(transparent)]
    Network(#[from] anyhow::Error),

    /// The response lacks the `<quote>` block or one of its fields, which
    /// usually means the symbol is unknown or delisted.
    #[error("Malformed quote response: missing <{element}> element")]
    Structure { element: &'static str },

    /// A numeric field holds text that is neither a number nor `N/A`.
    #[error("Failed to parse <{field}> value '{text}' as a number")]
    Parse { field: &'static str, text: String },
}

impl QuoteError {
    pub fn is_network(&self) -> bool {
        matches!(self, QuoteError::Network(_))
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, QuoteError::Structure { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, QuoteError::Parse { .. })
    }
}

/// `Result` alias defaulting to [`QuoteError`].
pub type Result<T, E = QuoteError> = std::result::Result<T, E>;
