//! Application state shared across handlers

use std::sync::Arc;

use crate::{config::Config, repository::PhoneRepository};

/// Shared handler state: the phone store and the loaded configuration
///
/// Generic over the store so handlers run unchanged against Postgres or the
/// in-memory backend.
pub struct AppState<R> {
    repository: Arc<R>,
    config: Arc<Config>,
}

// Manual impl: `R` itself need not be `Clone`
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: Arc::clone(&self.config),
        }
    }
}

impl<R: PhoneRepository> AppState<R> {
    pub fn new(repository: R, config: Config) -> Self {
        Self {
            repository: Arc::new(repository),
            config: Arc::new(config),
        }
    }

    /// Get the phone store
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryPhoneRepository;

    #[test]
    fn test_clone_shares_repository() {
        let state = AppState::new(MemoryPhoneRepository::new(), Config::default());
        let cloned = state.clone();
        assert!(std::ptr::eq(state.repository(), cloned.repository()));
        assert_eq!(cloned.config().service.port, 8080);
    }
}
