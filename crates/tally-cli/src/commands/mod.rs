//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (ledger loading, sinks, JSON output)
//! - `interactive` - Menu-driven prompt
//! - `phones` - Phone number search
//! - `reports` - Monthly card report and category spending report

pub mod core;
pub mod interactive;
pub mod phones;
pub mod reports;

// Re-export command functions for main.rs
pub use core::*;
pub use interactive::*;
pub use phones::*;
pub use reports::*;
