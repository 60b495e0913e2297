// crates/policy-push-core/src/core/guarded.rs
// ============================================================================
// Module: Policy Push Guarded Entities
// Description: Per-object read/write lock wrapper for catalog entities.
// Purpose: Scope every lock acquisition to a guard that releases on drop.
// Dependencies: parking_lot
// ============================================================================

//! ## Overview
//! Catalog entities (policies and resources) are shared across dispatch
//! threads and mutated by registry operations. [`Guarded`] wraps one entity
//! behind its own read/write lock. Shared acquisition goes through
//! [`Guarded::read`], which hands back a [`ReadGuard`]; the lock is released
//! when the guard is dropped, including on early returns.
//!
//! ## Invariants
//! - Shared acquisition is recursive: a thread that already holds a read
//!   guard on an entity can take another without deadlocking on a queued
//!   writer.
//! - Every read acquisition is paired with exactly one release, observable
//!   through [`LockStats`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ops::Deref;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;

// ============================================================================
// SECTION: Lock Statistics
// ============================================================================

/// Snapshot of shared-lock bookkeeping for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockStats {
    /// Number of shared acquisitions.
    pub read_acquired: u64,
    /// Number of shared releases.
    pub read_released: u64,
}

impl LockStats {
    /// Returns the number of shared guards currently outstanding.
    #[must_use]
    pub const fn outstanding(&self) -> u64 {
        self.read_acquired.saturating_sub(self.read_released)
    }

    /// Returns true when every acquisition has been released.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.read_acquired == self.read_released
    }
}

// ============================================================================
// SECTION: Guarded Entity
// ============================================================================

/// Entity guarded by a per-instance read/write lock.
#[derive(Debug)]
pub struct Guarded<T> {
    /// Guarded entity value.
    inner: RwLock<T>,
    /// Shared acquisitions observed so far.
    read_acquired: AtomicU64,
    /// Shared releases observed so far.
    read_released: AtomicU64,
}

/// Exclusive guard handed to registry mutations.
pub type WriteGuard<'a, T> = RwLockWriteGuard<'a, T>;

impl<T> Guarded<T> {
    /// Wraps an entity in its own lock.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
            read_acquired: AtomicU64::new(0),
            read_released: AtomicU64::new(0),
        }
    }

    /// Acquires a shared lock scoped to the returned guard.
    ///
    /// Blocks while a writer holds the lock. Never upgrades.
    pub fn read(&self) -> ReadGuard<'_, T> {
        let guard = self.inner.read_recursive();
        self.read_acquired.fetch_add(1, Ordering::AcqRel);
        ReadGuard {
            guard,
            released: &self.read_released,
        }
    }

    /// Acquires an exclusive lock for registry mutations.
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.inner.write()
    }

    /// Returns the current shared-lock bookkeeping.
    #[must_use]
    pub fn lock_stats(&self) -> LockStats {
        LockStats {
            read_acquired: self.read_acquired.load(Ordering::Acquire),
            read_released: self.read_released.load(Ordering::Acquire),
        }
    }

    /// Consumes the wrapper and returns the entity.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T> From<T> for Guarded<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Read Guard
// ============================================================================

/// Shared guard over a [`Guarded`] entity; releases the lock on drop.
pub struct ReadGuard<'a, T> {
    /// Underlying shared lock guard.
    guard: RwLockReadGuard<'a, T>,
    /// Release counter owned by the entity.
    released: &'a AtomicU64,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::AcqRel);
    }
}
