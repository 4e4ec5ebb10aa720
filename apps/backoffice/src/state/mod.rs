//! # State Module
//!
//! Application state shared by the page commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │    StoreState                │   │    ConfigState               │   │
//! │  │                              │   │                              │   │
//! │  │  • one repository per page   │   │  • store name, currency      │   │
//! │  │  • shared history log        │   │  • default page size         │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! │                                                                         │
//! │  Commands take only the state they need.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod store;

pub use config::{ConfigError, ConfigState};
pub use store::StoreState;
