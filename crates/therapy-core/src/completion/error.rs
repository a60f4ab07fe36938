use thiserror::Error;

/// Failure classes reported by the chat-completion provider.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The provider is throttling requests or the quota is exhausted.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The provider rejected the configured credentials.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Any other transport, status or payload failure.
    #[error("provider error: {0}")]
    Provider(String),
}

impl CompletionError {
    /// Classify a provider failure by its message text.
    ///
    /// The provider does not expose a structured error taxonomy, so this is a
    /// coarse substring match: `429`/`quota` means throttling and
    /// `401`/`authentication` means bad credentials.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("429") || lower.contains("quota") {
            CompletionError::RateLimited(message)
        } else if lower.contains("401") || lower.contains("authentication") {
            CompletionError::AuthFailed(message)
        } else {
            CompletionError::Provider(message)
        }
    }
}

/// Transport errors are classified by HTTP status only. Their text embeds
/// the request URL, which must not be mistaken for a status code.
impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(reqwest::StatusCode::TOO_MANY_REQUESTS) => CompletionError::RateLimited(e.to_string()),
            Some(reqwest::StatusCode::UNAUTHORIZED) => CompletionError::AuthFailed(e.to_string()),
            _ => CompletionError::Provider(e.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classifies_rate_limits() {
        assert!(matches!(
            CompletionError::classify("HTTP 429 Too Many Requests"),
            CompletionError::RateLimited(_)
        ));
        assert!(matches!(
            CompletionError::classify("You exceeded your current Quota"),
            CompletionError::RateLimited(_)
        ));
    }

    #[test]
    fn classifies_auth_failures() {
        assert!(matches!(
            CompletionError::classify("HTTP 401 Unauthorized: invalid api key"),
            CompletionError::AuthFailed(_)
        ));
        assert!(matches!(
            CompletionError::classify("Authentication required"),
            CompletionError::AuthFailed(_)
        ));
    }

    #[test]
    fn everything_else_is_a_provider_error() {
        let e = CompletionError::classify("HTTP 503 Service Unavailable");
        assert!(matches!(e, CompletionError::Provider(ref m) if m.contains("503")));
    }
}
