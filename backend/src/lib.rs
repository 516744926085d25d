//! Mahjong game-results ledger.
//!
//! Players record four-player games against a scoring rule; the ledger
//! stores raw table scores, derives each player's calculated score, and
//! aggregates per-player statistics and a ranking table.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
