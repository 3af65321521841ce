//! Markdown display for plans, runs and operation feedback.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections are wrapped in newtypes that add list formatting and empty
//! collection handling. Everything renders markdown so the CLI can hand the
//! output to its terminal renderer and the MCP server can return it verbatim.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │   Collection    │    │   Formatted     │
//! │  (Plan, Run)    │───▶│   Wrappers      │───▶│    Output       │
//! │                 │    │                 │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (Plans, RunSummaries)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! # Examples
//!
//! ```rust
//! use conductor_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Completed 2 manual steps".to_string());
//! assert_eq!(status.to_string(), "Success: Completed 2 manual steps\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{Plans, RunSummaries};
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
