//! Domain aggregates exposed by the visits service layer.

pub mod actor;
pub mod client;
pub mod derivation;
pub mod team_member;
pub mod types;
pub mod visit;
