#![allow(dead_code)]

// crates.io
use httpmock::{Mock, MockServer, prelude::*};
// self
use gcloud_broker::{auth::Credentials, client::GcloudClient};

/// PEM fixture used to sign assertions in tests.
pub const TEST_KEY_PEM: &str = include_str!("../fixtures/test_key.pem");
/// Service-account email fixture.
pub const TEST_EMAIL: &str = "svc@example.iam.gserviceaccount.com";

/// Builds valid test credentials backed by the fixture key.
pub fn test_credentials() -> Credentials {
	Credentials::new(TEST_EMAIL, TEST_KEY_PEM).expect("Test credentials should be valid.")
}

/// Builds a client whose token exchange targets the mock server.
pub fn client_for(server: &MockServer) -> GcloudClient {
	GcloudClient::new(test_credentials()).with_token_endpoint(server.url("/token"))
}

/// Registers a successful token-exchange mock returning `access_token`.
pub async fn mock_token_exchange<'a>(server: &'a MockServer, access_token: &str) -> Mock<'a> {
	let body = format!(
		"{{\"access_token\":\"{access_token}\",\"token_type\":\"Bearer\",\"expires_in\":3600}}"
	);

	server
		.mock_async(move |when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}
