//! Database models shared across the visits repository.

pub mod client;
pub mod config;
pub mod team_member;
pub mod visit_entry;
