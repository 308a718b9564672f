//! Lock aliases used across the workspace.
//!
//! Everything that is only touched in short, non-async critical sections goes
//! through these so the lock implementation can be swapped in one place.

/// A synchronous mutex.
pub type SyncMutex<T> = parking_lot::Mutex<T>;
/// A synchronous reader-writer lock.
pub type SyncRwLock<T> = parking_lot::RwLock<T>;
