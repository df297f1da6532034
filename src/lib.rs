//! Taskboard: a kanban board engine with optimistic drag-and-drop.
//!
//! Tasks sit in three fixed lanes (to do, in progress, done). Moving a task
//! between lanes updates the local board immediately and reconciles with a
//! remote task store afterwards, restoring the previous lane when the store
//! refuses the change.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the task store and notifier
//! - **Adapters**: In-memory store, recording notifier and a `tracing` sink
//! - **Services**: Drop resolution, the transition engine and the board
//!   controller
//!
//! # Modules
//!
//! - [`board`]: Task board domain, ports, adapters and services

pub mod board;
