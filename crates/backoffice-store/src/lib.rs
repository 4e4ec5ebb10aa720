//! # backoffice-store: Record Storage for the Back Office
//!
//! Every page reads and writes its records through one [`Repository`] trait.
//! The only backend today is [`InMemoryRepository`], seeded from
//! [`fixtures`]; records vanish on restart.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Page command (orders::mark_paid)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 backoffice-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │  Repository   │    │  HistoryLog   │    │   fixtures   │   │   │
//! │  │   │  (trait)      │    │  created /    │    │   seed(today)│   │   │
//! │  │   │  InMemory..   │    │  updated /    │    │              │   │   │
//! │  │   │  RwLock<Vec>  │    │  deleted      │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`repository`] - `Repository<T>`, `ListQuery<T>`, in-memory backend
//! - [`history`] - Append-only change history
//! - [`fixtures`] - Mock records
//! - [`error`] - Store error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixtures;
pub mod history;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use history::{HistoryAction, HistoryEntry, HistoryLog};
pub use repository::{InMemoryRepository, ListQuery, Repository};
