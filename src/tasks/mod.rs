//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Stale purge: Sweeps expired entries out of every domain cache at
//!   configured intervals

mod cleanup;

pub use cleanup::spawn_purge_task;
