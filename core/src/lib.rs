//! # structedit core
//!
//! Graph handles and the undo/redo command framework shared by the
//! structure editor engine.

pub mod shared;
pub mod undo;

pub use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
pub use shared::{Shared, Target};
