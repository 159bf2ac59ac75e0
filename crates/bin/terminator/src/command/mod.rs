//! Command layer - business logic separated from UI
//!
//! Following pcli's architecture:
//! - query/ - Read-only operations
//! - tx/ - Transaction operations (future)

pub mod query;
