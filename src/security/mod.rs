//! Credential handling and auth header construction.

pub mod auth;
pub mod credentials;

pub use credentials::{CredentialProvider, EnvCredentials, StaticCredentials};
