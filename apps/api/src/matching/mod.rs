// Skill matching engine.
// Extraction → pool load → scoring → ranking → reasons. Scoring is pure;
// everything that touches storage goes through store::MatchStore.

pub mod candidate;
pub mod engine;
pub mod extractor;
pub mod handlers;
pub mod profile;
pub mod ranker;
pub mod reason;
pub mod scoring;
pub mod store;
pub mod tags;
