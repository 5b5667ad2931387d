//! Participant Module
//! Mission: Store trial participants and enforce enrollment rules

pub mod api;
pub mod models;
pub mod repository;
pub mod store;

pub use models::{Participant, ParticipantCreate, ParticipantError};
pub use repository::ParticipantRepository;
pub use store::{MemoryStore, ParticipantStore, SqliteStore};
