//! Infrastructure layer

pub mod cli;
pub mod database;
pub mod events;
pub mod logging;
pub mod security;
