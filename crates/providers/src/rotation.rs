//! API key rotation — ordered pool with a round-robin cursor.
//!
//! When a generation attempt fails (bad key, quota exhaustion, transport),
//! the caller advances the cursor and retries with the next key. The cursor
//! wraps around indefinitely; there is no "exhausted" state at this layer —
//! the response generator bounds its retries by `len()`.

use std::sync::atomic::{AtomicUsize, Ordering};

use anigate_core::error::ModelError;
use tracing::{info, warn};

/// An ordered pool of API keys with exactly one active at a time.
///
/// The cursor is a plain atomic, not a lock: two racing requests may both
/// advance it (double-advance) or overwrite each other (lost update). Both
/// outcomes are harmless — rotation is cyclic and idempotent in effect.
pub struct KeyRotator {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyRotator {
    /// Create a rotator over a non-empty key pool, activating the first key.
    pub fn new(keys: Vec<String>) -> Result<Self, ModelError> {
        if keys.is_empty() {
            warn!("cannot build key rotator: credential pool is empty");
            return Err(ModelError::NotConfigured(
                "credential pool is empty".into(),
            ));
        }

        let rotator = Self {
            keys,
            cursor: AtomicUsize::new(0),
        };
        rotator.activate(0);
        Ok(rotator)
    }

    /// Number of keys in the pool.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The currently active key and its index.
    pub fn active(&self) -> (usize, &str) {
        let index = self.cursor.load(Ordering::SeqCst) % self.keys.len();
        (index, &self.keys[index])
    }

    /// Advance to the next key, wrapping at the end of the pool.
    ///
    /// Returns the new index.
    pub fn rotate(&self) -> usize {
        let current = self.cursor.load(Ordering::SeqCst) % self.keys.len();
        let next = (current + 1) % self.keys.len();
        self.cursor.store(next, Ordering::SeqCst);
        warn!(
            failed_key = current + 1,
            next_key = next + 1,
            total = self.keys.len(),
            "key failed, switching to next key"
        );
        self.activate(next);
        next
    }

    /// Mark a key as the one the model client will use.
    ///
    /// The client itself is stateless (keys are passed per call), so this
    /// only records the switch in the log.
    fn activate(&self, index: usize) {
        info!(key = index + 1, total = self.keys.len(), "model client configured");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_rejected() {
        let result = KeyRotator::new(vec![]);
        assert!(matches!(result, Err(ModelError::NotConfigured(_))));
    }

    #[test]
    fn starts_at_first_key() {
        let rotator = KeyRotator::new(vec!["a".into(), "b".into()]).unwrap();
        let (index, key) = rotator.active();
        assert_eq!(index, 0);
        assert_eq!(key, "a");
    }

    #[test]
    fn rotate_advances_and_wraps() {
        let rotator = KeyRotator::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();

        assert_eq!(rotator.rotate(), 1);
        assert_eq!(rotator.active().1, "b");

        assert_eq!(rotator.rotate(), 2);
        assert_eq!(rotator.active().1, "c");

        // Wraps back to the start
        assert_eq!(rotator.rotate(), 0);
        assert_eq!(rotator.active().1, "a");
    }

    #[test]
    fn single_key_rotates_to_itself() {
        let rotator = KeyRotator::new(vec!["only".into()]).unwrap();
        assert_eq!(rotator.rotate(), 0);
        assert_eq!(rotator.active(), (0, "only"));
    }

    #[test]
    fn pool_length() {
        let rotator = KeyRotator::new(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(rotator.len(), 2);
        assert!(!rotator.is_empty());
    }
}
