//! Authentication Module
//! Mission: Gate participant data behind stateless bearer tokens

pub mod api;
pub mod credential_store;
pub mod middleware;
pub mod models;
pub mod token;

pub use credential_store::CredentialStore;
pub use middleware::auth_middleware;
pub use token::TokenService;
