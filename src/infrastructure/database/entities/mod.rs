//! Sea-ORM entity definitions
//!
//! These map the compliance model to database tables.

pub mod cloud_account;
pub mod notification;
pub mod policy;
pub mod policy_evaluation;
pub mod user;

