//! Auth module - Credential providers for the `Negotiate` scheme

pub mod credentials;

pub use credentials::{CredentialProvider, NegotiateCredentials};
