//! Lifecycle of one asynchronous request.

/// Tagged state of a controller's current request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last accepted request succeeded.
    Success(T),
    /// The last accepted request failed with a user-facing message.
    Error(String),
}

impl<T> FetchState<T> {
    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the payload of a successful request.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the user-facing error message.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        // Arrange & Act
        let state: FetchState<Vec<u32>> = FetchState::default();

        // Assert
        assert_eq!(state, FetchState::Idle);
        assert!(!state.is_loading());
        assert!(state.value().is_none());
        assert!(state.error_message().is_none());
    }

    #[test]
    fn test_accessors() {
        // Arrange
        let loading: FetchState<u32> = FetchState::Loading;
        let success = FetchState::Success(7_u32);
        let error: FetchState<u32> = FetchState::Error(String::from("boom"));

        // Act & Assert
        assert!(loading.is_loading());
        assert_eq!(success.value(), Some(&7));
        assert!(!success.is_loading());
        assert_eq!(error.error_message(), Some("boom"));
        assert!(error.value().is_none());
    }
}
