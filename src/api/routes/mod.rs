//! API Routes
//!
//! Route handlers organized by functionality.

pub mod dashboard;
pub mod figures;
pub mod health;
pub mod options;
