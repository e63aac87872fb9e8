//! Core business logic - framework-agnostic repositories and aggregates.
//!
//! Each function opens its own short-lived unit of work on the connection it is given and
//! returns detached models; nothing here holds state between calls, prints, or logs.

/// Category creation, lookup, deletion and budget status
pub mod category;
/// Demo seeding, table counts and full wipe
pub mod maintenance;
/// Financial summary, category report and display formatting helpers
pub mod report;
/// Transaction creation, lookup and deletion
pub mod transaction;
/// User registration, lookup, deletion and balance aggregates
pub mod user;
