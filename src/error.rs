//! Client-level error types shared across the token manager, executor, and facades.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Assertion signing failure.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Non-2xx response from a Google Cloud endpoint.
	#[error(transparent)]
	Request(#[from] Box<RequestError>),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A successful response carried a body that could not be parsed as JSON.
	#[error("Response body is not valid JSON.")]
	Json {
		/// Structured parsing failure with the path to the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A request or response payload could not be encoded or decoded (JSON, base64, UTF-8).
	#[error("Payload could not be encoded or decoded: {message}.")]
	Payload {
		/// Human-readable encode/decode failure.
		message: String,
	},
}
impl Error {
	/// Returns the HTTP status code, when the error carries one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Request(err) => Some(err.status),
			_ => None,
		}
	}

	/// Returns `true` for a `404 Not Found` response.
	///
	/// Facades use this to treat absence as a valid empty result instead of an error.
	pub fn is_not_found(&self) -> bool {
		self.status() == Some(404)
	}
}
impl From<RequestError> for Error {
	fn from(e: RequestError) -> Self {
		Self::Request(Box::new(e))
	}
}

/// Configuration and validation failures raised during client construction.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Credentials JSON could not be parsed.
	#[error("Credentials must be JSON containing client_email and private_key.")]
	InvalidCredentialsJson {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Credentials are missing a required field.
	#[error("Credentials are missing the {field} field.")]
	MissingCredentialField {
		/// Name of the absent or empty field.
		field: &'static str,
	},
	/// An endpoint URL could not be parsed.
	#[error("Endpoint URL `{raw}` is invalid.")]
	InvalidEndpoint {
		/// The offending URL string.
		raw: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A request header value contains characters HTTP forbids.
	#[error("Header `{name}` carries an invalid value.")]
	InvalidHeader {
		/// Header name as supplied by the caller.
		name: String,
		/// Underlying header validation failure.
		#[source]
		source: reqwest::header::InvalidHeaderValue,
	},
}

/// Failure to produce a signed service-account assertion. Fatal, never retried.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// The credential's private key is not usable RSA PEM material.
	#[error("Private key is not a valid RSA PEM.")]
	InvalidKey {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// The signing operation itself failed.
	#[error("Failed to sign the service-account assertion.")]
	Sign {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// URL of the failed call.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error for the given URL.
	pub fn network(url: impl Into<String>, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: url.into(), source: Box::new(src) }
	}
}

/// Structured error carrying the HTTP status and parsed details of a failed request.
///
/// This is the only error type callers are expected to branch on programmatically,
/// notably `status == 404` for "resource not found".
#[derive(Debug, ThisError)]
#[error("Request failed with status {status}: {} {}.", details.method, details.url)]
pub struct RequestError {
	/// HTTP status code of the response.
	pub status: u16,
	/// Request coordinates plus the provider's error payload.
	pub details: ErrorDetails,
}

/// Details attached to a [`RequestError`].
#[derive(Clone, Debug)]
pub struct ErrorDetails {
	/// HTTP method of the failed request.
	pub method: String,
	/// URL of the failed request.
	pub url: String,
	/// Provider-supplied error payload.
	pub payload: ErrorPayload,
}
impl ErrorDetails {
	/// Looks up a field of the decoded JSON payload, if the body was a JSON object.
	pub fn field(&self, key: &str) -> Option<&Value> {
		match &self.payload {
			ErrorPayload::Json(Value::Object(map)) => map.get(key),
			_ => None,
		}
	}

	/// Returns the provider's `message` field, when present.
	pub fn message(&self) -> Option<&str> {
		self.field("message").and_then(Value::as_str)
	}

	/// Returns the raw body text for responses that were not valid JSON.
	pub fn response_text(&self) -> Option<&str> {
		match &self.payload {
			ErrorPayload::Text { response_text } => Some(response_text),
			ErrorPayload::Json(_) => None,
		}
	}
}

/// Error payload variants: a decoded JSON body, or the raw text fallback.
#[derive(Clone, Debug)]
pub enum ErrorPayload {
	/// Body parsed as JSON.
	Json(Value),
	/// Body was not JSON; kept verbatim.
	Text {
		/// Raw response body text.
		response_text: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn not_found() -> RequestError {
		RequestError {
			status: 404,
			details: ErrorDetails {
				method: "GET".into(),
				url: "https://run.googleapis.com/v2/projects/p/locations/l/services/s".into(),
				payload: ErrorPayload::Json(serde_json::json!({ "message": "not found" })),
			},
		}
	}

	#[test]
	fn request_error_exposes_status_and_fields() {
		let err: Error = not_found().into();

		assert!(err.is_not_found());
		assert_eq!(err.status(), Some(404));

		match &err {
			Error::Request(inner) => {
				assert_eq!(inner.details.message(), Some("not found"));
				assert_eq!(inner.details.response_text(), None);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn text_payload_falls_back_to_response_text() {
		let err = RequestError {
			status: 500,
			details: ErrorDetails {
				method: "POST".into(),
				url: "https://pubsub.googleapis.com/v1/projects/p/topics/t:publish".into(),
				payload: ErrorPayload::Text { response_text: "internal error".into() },
			},
		};

		assert_eq!(err.details.response_text(), Some("internal error"));
		assert_eq!(err.details.message(), None);
		assert!(err.to_string().contains("status 500"));
	}
}
