//! Client facade coordinating token acquisition and authenticated requests.

// self
use crate::{
	_prelude::*,
	api::{cloud_run::CloudRun, pubsub::PubSub, secrets::Secrets, storage::Storage},
	auth::{Credentials, Scope, assertion},
	cache::{DEFAULT_TTL_SECS, TokenCache},
	error::ConfigError,
	http::{ReqwestHttpClient, RequestOptions},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Default token-exchange endpoint for service-account assertions.
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
/// Grant type identifier for the JWT-bearer assertion flow.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Provides authenticated access to Google Cloud REST APIs.
///
/// The client owns the credentials, a per-scope [`TokenCache`], and the HTTP
/// transport. [`access_token`](Self::access_token) is the sole path by which a
/// usable bearer token is obtained; the resource facades returned by
/// [`cloud_run`](Self::cloud_run), [`pub_sub`](Self::pub_sub),
/// [`secrets`](Self::secrets), and [`storage`](Self::storage) build on it.
#[derive(Clone, Debug)]
pub struct GcloudClient {
	credentials: Credentials,
	token_endpoint: String,
	cache: TokenCache,
	http: ReqwestHttpClient,
}
impl GcloudClient {
	/// Creates a client from already validated [`Credentials`].
	pub fn new(credentials: Credentials) -> Self {
		Self {
			credentials,
			token_endpoint: TOKEN_ENDPOINT.into(),
			cache: TokenCache::default(),
			http: ReqwestHttpClient::default(),
		}
	}

	/// Creates a client from a service-account key file's JSON content.
	pub fn from_json(raw: &str) -> Result<Self> {
		Ok(Self::new(Credentials::from_json(raw)?))
	}

	/// Replaces the HTTP transport (e.g. with one accepting test certificates).
	pub fn with_http_client(mut self, http: ReqwestHttpClient) -> Self {
		self.http = http;

		self
	}

	/// Overrides the token-exchange endpoint. Intended for tests.
	pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.token_endpoint = endpoint.into();

		self
	}

	/// Returns the Cloud Run facade.
	pub fn cloud_run(&self) -> CloudRun<'_> {
		CloudRun::new(self)
	}

	/// Returns the Pub/Sub facade.
	pub fn pub_sub(&self) -> PubSub<'_> {
		PubSub::new(self)
	}

	/// Returns the Secret Manager facade.
	pub fn secrets(&self) -> Secrets<'_> {
		Secrets::new(self)
	}

	/// Returns the Cloud Storage facade.
	pub fn storage(&self) -> Storage<'_> {
		Storage::new(self)
	}

	/// Returns a ready-to-use `Authorization` header value (`Bearer <token>`) for `scope`.
	///
	/// Cache hits return immediately without a network call. On a miss the client
	/// signs a fresh assertion, exchanges it at the token endpoint, caches the
	/// result for the returned (or default) TTL, and returns it. Concurrent
	/// misses for the same scope may each perform an exchange; the last store
	/// wins and every caller still receives a valid token.
	pub async fn access_token(&self, scope: &Scope) -> Result<String> {
		if let Some(token) = self.cache.lookup(scope) {
			return Ok(token);
		}

		const KIND: OpKind = OpKind::TokenExchange;

		let span = OpSpan::new(KIND, "access_token");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let assertion = assertion::sign(&self.credentials, scope, &self.token_endpoint)?;
				let endpoint = self.endpoint()?;
				let options = RequestOptions::post()
					.form([("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", &assertion)]);
				let body = self.http.execute(endpoint, options).await?;
				let response: TokenResponse = serde_path_to_error::deserialize(body)
					.map_err(|source| Error::Json { source })?;
				let token = format!("Bearer {}", response.access_token);

				self.cache.store(scope.clone(), &token, response.ttl_secs());

				Ok(token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	/// Performs a call with the given options and returns the parsed JSON body.
	///
	/// The request is sent as-is; callers attach the bearer token themselves via
	/// [`RequestOptions::authorization`]. Failures surface immediately as
	/// structured errors with no retries.
	pub async fn request(&self, url: Url, options: RequestOptions) -> Result<Value> {
		const KIND: OpKind = OpKind::Request;

		let span = OpSpan::new(KIND, "request");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span.instrument(self.http.execute(url, options)).await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	fn endpoint(&self) -> Result<Url> {
		Url::parse(&self.token_endpoint).map_err(|source| {
			ConfigError::InvalidEndpoint { raw: self.token_endpoint.clone(), source }.into()
		})
	}
}

/// Relevant fields of the token-exchange response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default)]
	expires_in: Option<u64>,
}
impl TokenResponse {
	// An absent or zero lifetime both fall back to the default TTL.
	fn ttl_secs(&self) -> u64 {
		match self.expires_in {
			Some(secs) if secs > 0 => secs,
			_ => DEFAULT_TTL_SECS,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_response_defaults_expires_in() {
		let response: TokenResponse =
			serde_json::from_str(r#"{"access_token":"abc","token_type":"Bearer"}"#)
				.expect("Token response without expires_in should parse.");

		assert_eq!(response.access_token, "abc");
		assert_eq!(response.expires_in, None);
		assert_eq!(response.ttl_secs(), 3600);
	}

	#[test]
	fn token_response_reads_expires_in() {
		let response: TokenResponse =
			serde_json::from_str(r#"{"access_token":"abc","expires_in":1000}"#)
				.expect("Token response with expires_in should parse.");

		assert_eq!(response.expires_in, Some(1000));
		assert_eq!(response.ttl_secs(), 1000);
	}

	#[test]
	fn zero_expires_in_falls_back_to_default_ttl() {
		let response: TokenResponse =
			serde_json::from_str(r#"{"access_token":"abc","expires_in":0}"#)
				.expect("Token response with a zero expires_in should parse.");

		assert_eq!(response.ttl_secs(), DEFAULT_TTL_SECS);
	}
}
