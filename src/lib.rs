//! Love Note Engine: templated romantic message generation.
//!
//! Fills a small catalog of sentence templates from mood-bucketed word banks
//! chosen by occasion and intensity, then caches, scores, and tracks usage of
//! the results. All state is in-memory and owned by a single
//! [`MessageGenerator`](core::generator::MessageGenerator).

pub mod core;
pub mod schema;
