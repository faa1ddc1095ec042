//! Service-account identity primitives: credentials, scopes, and signed assertions.

pub mod assertion;
pub mod credentials;
pub mod scope;

pub use assertion::AssertionClaims;
pub use credentials::{Credentials, PrivateKey};
pub use scope::Scope;
