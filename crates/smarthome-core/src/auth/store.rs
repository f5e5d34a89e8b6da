use std::fmt;

use tracing::warn;

use super::storage::{MemoryStorage, TokenStorage};

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// The persisted session: an access/refresh token pair.
///
/// Storage failures never surface from here. A failed read is treated as
/// an absent token and a failed write as a no-op; both are logged. An empty
/// stored string also reads as absent.
pub struct TokenStore {
    storage: Box<dyn TokenStorage>,
}

impl TokenStore {
    pub fn new(storage: impl TokenStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Persist both tokens, replacing any existing pair.
    pub fn set_tokens(&self, access: &str, refresh: &str) {
        let pair = [(ACCESS_TOKEN_KEY, access), (REFRESH_TOKEN_KEY, refresh)];
        if let Err(e) = self.storage.set_many(&pair) {
            warn!(error = %e, "Failed to write tokens to storage");
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Remove both tokens.
    pub fn clear_tokens(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove token from storage");
            }
        }
    }

    /// True iff an access token is present. Expiry is not checked.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|token| !token.is_empty()),
            Err(e) => {
                warn!(key, error = %e, "Failed to read token from storage");
                None
            }
        }
    }
}

impl fmt::Debug for TokenStore {
    // Never print token values
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use anyhow::{anyhow, Result};

    struct BrokenStorage;

    impl TokenStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    /// Records each batch written so pair writes can be checked.
    #[derive(Default)]
    struct RecordingStorage {
        inner: MemoryStorage,
        batches: Arc<Mutex<Vec<usize>>>,
    }

    impl TokenStorage for RecordingStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.set_many(&[(key, value)])
        }
        fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
            self.batches.lock().unwrap().push(entries.len());
            for (key, value) in entries {
                self.inner.set(key, value)?;
            }
            Ok(())
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_set_and_get_tokens() {
        let store = TokenStore::in_memory();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);

        store.set_tokens("A1", "R1");
        assert_eq!(store.access_token().as_deref(), Some("A1"));
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
    }

    #[test]
    fn test_set_tokens_overwrites_pair() {
        let store = TokenStore::in_memory();
        store.set_tokens("A1", "R1");
        store.set_tokens("A2", "R2");
        assert_eq!(store.access_token().as_deref(), Some("A2"));
        assert_eq!(store.refresh_token().as_deref(), Some("R2"));
    }

    #[test]
    fn test_is_authenticated_follows_set_and_clear() {
        let store = TokenStore::in_memory();
        assert!(!store.is_authenticated());

        store.set_tokens("A1", "R1");
        assert!(store.is_authenticated());

        store.clear_tokens();
        assert!(!store.is_authenticated());
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn test_clear_on_empty_store() {
        let store = TokenStore::in_memory();
        store.clear_tokens();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_storage_errors_are_swallowed() {
        let store = TokenStore::new(BrokenStorage);
        store.set_tokens("A1", "R1");
        assert_eq!(store.access_token(), None);
        assert!(!store.is_authenticated());
        store.clear_tokens();
    }

    #[test]
    fn test_debug_hides_tokens() {
        let store = TokenStore::in_memory();
        store.set_tokens("secret-access", "secret-refresh");
        let debug = format!("{:?}", store);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("authenticated: true"));
    }

    #[test]
    fn test_empty_tokens_read_as_absent() {
        let store = TokenStore::in_memory();
        store.set_tokens("", "");
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
        assert!(!store.is_authenticated());

        store.set_tokens("A1", "");
        assert!(store.is_authenticated());
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn test_set_tokens_writes_pair_in_one_batch() {
        let storage = RecordingStorage::default();
        let batches = storage.batches.clone();
        let store = TokenStore::new(storage);
        store.set_tokens("A1", "R1");
        store.set_tokens("A2", "R2");
        assert_eq!(*batches.lock().unwrap(), vec![2, 2]);
        assert_eq!(store.access_token().as_deref(), Some("A2"));
        assert_eq!(store.refresh_token().as_deref(), Some("R2"));
    }
}
