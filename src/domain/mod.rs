//! Domain layer for Prose Warden
//!
//! CDD Principle: Domain Model - Pure business logic for prose style enforcement
//! - Contains the core value objects for rewrite outcomes and style violations
//! - Independent of infrastructure concerns like HTTP clients or terminals
//! - Expresses the ubiquitous language of style rules and bounded rewrites

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
