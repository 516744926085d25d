//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers authenticate through the session cookie, translate JSON
//! payloads into domain drafts and patches, and call the driving ports held
//! in [`state::HttpState`].

pub mod error;
pub mod games;
pub mod games_dto;
pub mod health;
pub mod locations;
pub mod rules;
pub mod schemas;
pub mod session;
pub mod state;
pub mod statistics;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
