//! Task board with optimistic drag-and-drop lane changes.
//!
//! Tasks live in three fixed lanes. Dragging a card moves the task in the
//! local collection at once, then the remote store is asked to confirm: its
//! record replaces the local one on success, and the prior lane is restored
//! on failure. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
