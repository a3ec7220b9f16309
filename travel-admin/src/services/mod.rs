//! Services module
//!
//! Synchronization logic between the console handlers and the remote
//! collections.

pub mod crud;
pub mod mirror;

pub use crud::{Consistency, CrudService};
pub use mirror::{Mirror, MirrorDiff, Record};
