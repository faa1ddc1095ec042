//! Signed-assertion builder for the service-account JWT-bearer flow.
//!
//! The assertion is an RS256 JWT whose claims name the service account (`iss`),
//! the requested permission grant (`scope`), and the token-exchange endpoint
//! (`aud`). Its 30-minute validity window only needs to survive the single
//! exchange call; the token cache applies its own, independent TTL policy.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	auth::{Credentials, Scope},
	error::SigningError,
};

/// Validity window of a signed assertion, in seconds.
pub const ASSERTION_LIFETIME_SECS: i64 = 30 * 60;

/// Claim set carried by a signed assertion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Issuer: the service-account email.
	pub iss: String,
	/// Requested permission scope.
	pub scope: String,
	/// Audience: the token-exchange endpoint.
	pub aud: String,
	/// Expiry, seconds since epoch.
	pub exp: i64,
	/// Issued-at, seconds since epoch.
	pub iat: i64,
}

/// Signs an assertion for `scope` using the current wall clock.
pub fn sign(credentials: &Credentials, scope: &Scope, audience: &str) -> Result<String, SigningError> {
	sign_at(credentials, scope, audience, OffsetDateTime::now_utc())
}

/// Signs an assertion issued at an explicit instant.
pub fn sign_at(
	credentials: &Credentials,
	scope: &Scope,
	audience: &str,
	issued_at: OffsetDateTime,
) -> Result<String, SigningError> {
	let iat = issued_at.unix_timestamp();
	let claims = AssertionClaims {
		iss: credentials.client_email.clone(),
		scope: scope.to_string(),
		aud: audience.into(),
		exp: iat + ASSERTION_LIFETIME_SECS,
		iat,
	};
	let key = EncodingKey::from_rsa_pem(credentials.private_key.expose().as_bytes())
		.map_err(|source| SigningError::InvalidKey { source })?;

	jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
		.map_err(|source| SigningError::Sign { source })
}
