use thiserror::Error;

pub type Result<T> = std::result::Result<T, UsageError>;

/// A consumer was evaluated with no enclosing provider for its channel.
///
/// This is a composition mistake, never a transient fault: the fix is to
/// wrap the consumer in its provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{consumer} cannot be rendered outside the {provider} component")]
pub struct UsageError {
    consumer: String,
    provider: String,
}

impl UsageError {
    #[must_use]
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            consumer: consumer.into(),
            provider: provider.into(),
        }
    }

    /// Label of the consumer that failed to resolve.
    #[must_use]
    pub fn consumer(&self) -> &str {
        &self.consumer
    }

    /// Label of the provider the consumer expected to find.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_both_sides() {
        let err = UsageError::new("Toggle.Consumer", "Toggle");
        assert_eq!(
            err.to_string(),
            "Toggle.Consumer cannot be rendered outside the Toggle component"
        );
        assert_eq!(err.consumer(), "Toggle.Consumer");
        assert_eq!(err.provider(), "Toggle");
    }

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&UsageError::new("a", "b"));
    }
}
