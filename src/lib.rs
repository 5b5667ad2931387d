//! TrialTrack Backend Library
//!
//! A small token-gated CRUD API for clinical-trial participants: login
//! exchanges seeded credentials for a bearer token, which gates the
//! participant repository and a metrics summary endpoint.

pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod middleware;
pub mod participants;
