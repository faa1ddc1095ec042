//! Transport primitives: the request options model and the reqwest-backed executor.
//!
//! The executor performs a single HTTP call and classifies the outcome: a 2xx
//! response yields its parsed JSON body (empty bodies become [`Value::Null`]),
//! any other status becomes a [`RequestError`] carrying the status code plus the
//! decoded error payload, and transport failures surface as
//! [`TransportError`](crate::error::TransportError). No retries are attempted at
//! this layer; every failure is the caller's to interpret.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	Method,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ErrorDetails, ErrorPayload, RequestError, TransportError},
};

/// Method, headers, and body of a single outbound request.
#[derive(Debug, Default)]
pub struct RequestOptions {
	/// HTTP method; defaults to `GET`.
	pub method: Method,
	/// Additional request headers.
	pub headers: Vec<(HeaderName, String)>,
	/// Optional request body.
	pub body: Option<RequestBody>,
}
impl RequestOptions {
	/// Options for a `GET` request.
	pub fn get() -> Self {
		Self::default()
	}

	/// Options for a `POST` request.
	pub fn post() -> Self {
		Self { method: Method::POST, ..Default::default() }
	}

	/// Options for a `PATCH` request.
	pub fn patch() -> Self {
		Self { method: Method::PATCH, ..Default::default() }
	}

	/// Appends a request header.
	pub fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
		self.headers.push((name, value.into()));

		self
	}

	/// Attaches a ready-to-use `Authorization` header value (e.g. `Bearer <token>`).
	pub fn authorization(self, token: impl Into<String>) -> Self {
		self.header(AUTHORIZATION, token)
	}

	/// Attaches a JSON body.
	pub fn json(mut self, body: Value) -> Self {
		self.body = Some(RequestBody::Json(body));

		self
	}

	/// Attaches a form-urlencoded body.
	pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let pairs =
			pairs.into_iter().map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned())).collect();

		self.body = Some(RequestBody::Form(pairs));

		self
	}

	/// Attaches a raw body with an explicit content type.
	pub fn bytes(mut self, content: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
		self.body =
			Some(RequestBody::Bytes { content: content.into(), content_type: content_type.into() });

		self
	}
}

/// Request body variants supported by the executor.
#[derive(Clone, Debug)]
pub enum RequestBody {
	/// JSON value, sent as `application/json`.
	Json(Value),
	/// Key/value pairs, sent as `application/x-www-form-urlencoded`.
	Form(Vec<(String, String)>),
	/// Raw bytes with a caller-supplied content type.
	Bytes {
		/// Body content.
		content: Vec<u8>,
		/// Value of the `content-type` header.
		content_type: String,
	},
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Executes a request and returns the parsed JSON body of a 2xx response.
	pub async fn execute(&self, url: Url, options: RequestOptions) -> Result<Value> {
		let method = options.method.clone();
		let mut builder = self.0.request(method.clone(), url.clone());

		for (name, value) in &options.headers {
			let value = HeaderValue::from_str(value).map_err(|source| {
				ConfigError::InvalidHeader { name: name.to_string(), source }
			})?;

			builder = builder.header(name, value);
		}

		builder = match options.body {
			Some(RequestBody::Json(value)) => builder
				.header(CONTENT_TYPE, "application/json")
				.body(value.to_string()),
			Some(RequestBody::Form(pairs)) => {
				let mut serializer = url::form_urlencoded::Serializer::new(String::new());

				for (key, value) in &pairs {
					serializer.append_pair(key, value);
				}

				builder
					.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
					.body(serializer.finish())
			},
			Some(RequestBody::Bytes { content, content_type }) =>
				builder.header(CONTENT_TYPE, content_type).body(content),
			None => builder,
		};

		let response = builder
			.send()
			.await
			.map_err(|source| TransportError::network(url.to_string(), source))?;
		let status = response.status();
		let text = response
			.text()
			.await
			.map_err(|source| TransportError::network(url.to_string(), source))?;

		if !status.is_success() {
			let payload = match serde_json::from_str::<Value>(&text) {
				Ok(value) => ErrorPayload::Json(value),
				Err(_) => ErrorPayload::Text { response_text: text },
			};

			return Err(RequestError {
				status: status.as_u16(),
				details: ErrorDetails {
					method: method.to_string(),
					url: url.to_string(),
					payload,
				},
			}
			.into());
		}
		// Some endpoints acknowledge with an empty body; treat that as null rather
		// than a parse failure.
		if text.trim().is_empty() {
			return Ok(Value::Null);
		}

		let mut deserializer = serde_json::Deserializer::from_str(&text);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Json { source })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
