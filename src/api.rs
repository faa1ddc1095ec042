//! Typed facades over the resource APIs the client fronts.
//!
//! Each facade borrows the [`GcloudClient`](crate::client::GcloudClient), fetches a
//! bearer token for the default cloud-platform scope, attaches it to the request,
//! and delegates to the shared executor. They are thin request/response mappings;
//! all lifecycle concerns (token freshness, error classification) live in the core.

pub mod cloud_run;
pub mod pubsub;
pub mod secrets;
pub mod storage;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ConfigError};

/// Deserializes a response body into a typed value, keeping the failing path.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
	serde_path_to_error::deserialize(body).map_err(|source| Error::Json { source })
}

/// Serializes a request body, surfacing failures as payload errors.
pub(crate) fn encode(body: &impl Serialize) -> Result<Value> {
	serde_json::to_value(body).map_err(|source| Error::Payload { message: source.to_string() })
}

/// Joins a base URL and a relative path into a parsed endpoint URL.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url> {
	let raw = format!("{}/{path}", base_url.trim_end_matches('/'));

	Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint { raw, source }.into())
}
