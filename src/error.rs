use crate::stock::StockDataError;

/// Failure kinds across the webhook pipeline.
///
/// Users never see these directly: the webhook layer turns the first two into
/// HTTP 400, and the message handler collapses the lookup/generation kinds into
/// one generic reply. The variants exist so logs and tests can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("invalid webhook signature")]
    InvalidSignature,
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),
    #[error("market data lookup failed: {0}")]
    LookupFailed(#[from] StockDataError),
    #[error("AI generation failed: {0}")]
    GenerationFailed(String),
    #[error("ticker not found: {0}")]
    NotFound(String),
    #[error("reply delivery failed: {0}")]
    ReplyFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(BotError::InvalidSignature.to_string(), "invalid webhook signature");
        assert_eq!(BotError::NotFound("9999".to_string()).to_string(), "ticker not found: 9999");
    }

    #[test]
    fn test_lookup_error_conversion() {
        let error: BotError = StockDataError::NetworkError("reset".to_string()).into();
        assert!(matches!(error, BotError::LookupFailed(_)));
        assert_eq!(
            error.to_string(),
            "market data lookup failed: Network error: reset"
        );
    }
}
