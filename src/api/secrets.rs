//! Secret Manager facade: secret lookup, creation, and version management.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	api,
	auth::Scope,
	client::GcloudClient,
	http::RequestOptions,
};

/// Default Secret Manager API base URL.
pub const BASE_URL: &str = "https://secretmanager.googleapis.com";

/// Secret Manager facade borrowed from a [`GcloudClient`].
#[derive(Clone, Debug)]
pub struct Secrets<'a> {
	client: &'a GcloudClient,
	base_url: String,
}
impl<'a> Secrets<'a> {
	pub(crate) fn new(client: &'a GcloudClient) -> Self {
		Self { client, base_url: BASE_URL.into() }
	}

	/// Overrides the API base URL. Intended for tests.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();

		self
	}

	/// Fetches a secret's metadata, returning `None` when it does not exist.
	pub async fn get_secret(&self, project_id: &str, secret_id: &str) -> Result<Option<Secret>> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url = api::endpoint(&self.base_url, &format!("v1/projects/{project_id}/secrets/{secret_id}"))?;

		match self.client.request(url, RequestOptions::get().authorization(token)).await {
			Ok(body) => Ok(Some(api::decode(body)?)),
			Err(err) if err.is_not_found() => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// Creates a secret with automatic replication.
	pub async fn create_secret(
		&self,
		project_id: &str,
		secret_id: &str,
		spec: &SecretCreate,
	) -> Result<Secret> {
		let token = self.client.access_token(&Scope::default()).await?;
		let mut url = api::endpoint(&self.base_url, &format!("v1/projects/{project_id}/secrets"))?;

		url.query_pairs_mut().append_pair("secretId", secret_id);

		let mut body = api::encode(spec)?;

		// The facade always provisions automatic replication.
		if let Value::Object(map) = &mut body {
			map.insert("replication".into(), serde_json::json!({ "automatic": {} }));
		}

		let response = self
			.client
			.request(url, RequestOptions::post().authorization(token).json(body))
			.await?;

		api::decode(response)
	}

	/// Lists the versions of a secret; a secret with no versions yields an empty vec.
	pub async fn list_secret_versions(
		&self,
		project_id: &str,
		secret_id: &str,
	) -> Result<Vec<SecretVersion>> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url = api::endpoint(
			&self.base_url,
			&format!("v1/projects/{project_id}/secrets/{secret_id}/versions"),
		)?;
		let body = self.client.request(url, RequestOptions::get().authorization(token)).await?;
		let listing: VersionListing = api::decode(body)?;

		Ok(listing.versions)
	}

	/// Adds a new version holding `data` to an existing secret.
	pub async fn create_secret_version(
		&self,
		project_id: &str,
		secret_id: &str,
		data: &str,
	) -> Result<SecretVersion> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url = api::endpoint(
			&self.base_url,
			&format!("v1/projects/{project_id}/secrets/{secret_id}:addVersion"),
		)?;
		let body = serde_json::json!({
			"payload": { "data": STANDARD.encode(data.as_bytes()) },
		});
		let response = self
			.client
			.request(url, RequestOptions::post().authorization(token).json(body))
			.await?;

		api::decode(response)
	}

	/// Reads and decodes the payload of a secret version (full resource name).
	pub async fn access_secret_version(&self, version_name: &str) -> Result<String> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url = api::endpoint(&self.base_url, &format!("v1/{version_name}:access"))?;
		let body = self.client.request(url, RequestOptions::get().authorization(token)).await?;
		let accessed: AccessedVersion = api::decode(body)?;
		let Some(encoded) = accessed.payload.map(|payload| payload.data) else {
			return Ok(String::new());
		};
		let bytes = STANDARD
			.decode(encoded.as_bytes())
			.map_err(|source| Error::Payload { message: source.to_string() })?;

		String::from_utf8(bytes).map_err(|source| Error::Payload { message: source.to_string() })
	}
}

/// Secret metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Secret {
	/// Full resource name (`projects/*/secrets/*`).
	pub name: String,
	/// User-managed annotations.
	#[serde(default)]
	pub annotations: HashMap<String, String>,
}

/// Creation parameters for a secret.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SecretCreate {
	/// User-managed annotations.
	#[serde(default)]
	pub annotations: HashMap<String, String>,
}

/// A version of a secret.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecretVersion {
	/// Full resource name (`projects/*/secrets/*/versions/*`).
	pub name: String,
	/// Lifecycle state of the version.
	pub state: SecretVersionState,
}

/// Lifecycle states of a secret version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecretVersionState {
	/// The version is accessible.
	Enabled,
	/// The version exists but cannot be accessed.
	Disabled,
	/// The version's payload has been destroyed.
	Destroyed,
}

#[derive(Debug, Deserialize)]
struct VersionListing {
	#[serde(default)]
	versions: Vec<SecretVersion>,
}

#[derive(Debug, Deserialize)]
struct AccessedVersion {
	#[serde(default)]
	payload: Option<VersionPayload>,
}

#[derive(Debug, Deserialize)]
struct VersionPayload {
	data: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn version_states_use_wire_names() {
		let version: SecretVersion = serde_json::from_str(
			r#"{"name":"projects/p/secrets/s/versions/1","state":"ENABLED"}"#,
		)
		.expect("Version JSON should parse.");

		assert_eq!(version.state, SecretVersionState::Enabled);
	}

	#[test]
	fn missing_versions_field_defaults_to_empty() {
		let listing: VersionListing =
			serde_json::from_str("{}").expect("Empty listing should parse.");

		assert!(listing.versions.is_empty());
	}
}
