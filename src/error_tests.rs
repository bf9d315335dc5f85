//! Tests for error types

#[cfg(test)]
mod tests {
    use super::super::error::SentimentError;

    #[test]
    fn test_api_error() {
        let err = SentimentError::Api("service unavailable".to_string());
        assert!(err.to_string().contains("API error"));
        assert!(err.to_string().contains("service unavailable"));
    }

    #[test]
    fn test_config_error() {
        let err = SentimentError::Config("missing API key".to_string());
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: SentimentError = parse_err.into();
        assert!(matches!(err, SentimentError::Json(_)));
        assert!(err.to_string().contains("JSON parsing error"));
    }
}
