//! Flags shared between the hosting view and its pending continuations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// "Still mounted" flag. Continuations check it before touching view state.
#[derive(Debug, Clone)]
pub struct MountGuard(Arc<AtomicBool>);

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl MountGuard {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Marks the view as torn down. Irreversible.
    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Counter bumped whenever the point collection or the filter set changes.
///
/// A render pass records the version it started from and stops between
/// batches once the counter has moved on.
#[derive(Debug, Clone, Default)]
pub struct InputVersion(Arc<AtomicU64>);

impl InputVersion {
    #[must_use]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Records an input change and returns the new version.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[must_use]
    pub fn is_current(&self, version: u64) -> bool {
        self.current() == version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmount_is_visible_through_clones() {
        let guard = MountGuard::new();
        let pending = guard.clone();
        assert!(pending.is_mounted());
        guard.unmount();
        assert!(!pending.is_mounted());
    }

    #[test]
    fn bump_invalidates_earlier_versions() {
        let version = InputVersion::default();
        let started = version.current();
        let observer = version.clone();
        assert!(observer.is_current(started));
        assert_eq!(version.bump(), started + 1);
        assert!(!observer.is_current(started));
    }
}
