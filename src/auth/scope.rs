//! Permission scope newtype used as the token cache key.

// self
use crate::_prelude::*;

/// Canonical scope granting access to every Google Cloud Platform API.
pub const CLOUD_PLATFORM: &str = "https://www.googleapis.com/auth/cloud-platform";

/// A permission grant requested for a token.
///
/// Scopes are opaque strings; the client accepts arbitrary values and uses them
/// verbatim as cache keys and assertion claims. [`Scope::default`] resolves to
/// the broad [`CLOUD_PLATFORM`] scope, which is what the built-in facades request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope(String);
impl Scope {
	/// Wraps an arbitrary scope string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the canonical cloud-platform scope.
	pub fn cloud_platform() -> Self {
		Self(CLOUD_PLATFORM.into())
	}

	/// Returns the scope string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Default for Scope {
	fn default() -> Self {
		Self::cloud_platform()
	}
}
impl Display for Scope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl From<&str> for Scope {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for Scope {
	fn from(value: String) -> Self {
		Self(value)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_scope_is_cloud_platform() {
		assert_eq!(Scope::default().as_str(), CLOUD_PLATFORM);
		assert_eq!(Scope::default(), Scope::cloud_platform());
	}

	#[test]
	fn arbitrary_scopes_round_trip() {
		let scope = Scope::from("https://www.googleapis.com/auth/devstorage.read_only");

		assert_eq!(scope.to_string(), "https://www.googleapis.com/auth/devstorage.read_only");
		assert_ne!(scope, Scope::default());
	}
}
