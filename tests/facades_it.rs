mod common;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use httpmock::prelude::*;
// self
use gcloud_broker::api::{
	cloud_run::ServiceResource,
	pubsub::{PubsubMessage, TopicSpec},
	storage::UploadSpec,
};

#[tokio::test]
async fn absent_secret_reads_as_none() {
	let server = MockServer::start_async().await;
	let client = common::client_for(&server);

	common::mock_token_exchange(&server, "secrets-token").await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/projects/acme-prod/secrets/missing");
			then.status(404)
				.header("content-type", "application/json")
				.body("{\"message\":\"Secret not found.\"}");
		})
		.await;

	let secret = client
		.secrets()
		.with_base_url(server.base_url())
		.get_secret("acme-prod", "missing")
		.await
		.expect("A 404 should map to an absent secret, not an error.");

	assert!(secret.is_none());
}

#[tokio::test]
async fn secret_version_payload_is_decoded() {
	let server = MockServer::start_async().await;
	let client = common::client_for(&server);
	let encoded = STANDARD.encode("hunter2");

	common::mock_token_exchange(&server, "secrets-token").await;
	server
		.mock_async(move |when, then| {
			when.method(GET)
				.path("/v1/projects/acme-prod/secrets/db-password/versions/3:access")
				.header("authorization", "Bearer secrets-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!("{{\"payload\":{{\"data\":\"{encoded}\"}}}}"));
		})
		.await;

	let value = client
		.secrets()
		.with_base_url(server.base_url())
		.access_secret_version("projects/acme-prod/secrets/db-password/versions/3")
		.await
		.expect("Accessing the version should succeed.");

	assert_eq!(value, "hunter2");
}

#[tokio::test]
async fn secret_listing_defaults_to_empty() {
	let server = MockServer::start_async().await;
	let client = common::client_for(&server);

	common::mock_token_exchange(&server, "secrets-token").await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/projects/acme-prod/secrets/empty/versions");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;

	let versions = client
		.secrets()
		.with_base_url(server.base_url())
		.list_secret_versions("acme-prod", "empty")
		.await
		.expect("Listing a secret without versions should succeed.");

	assert!(versions.is_empty());
}

#[tokio::test]
async fn publish_returns_message_ids() {
	let server = MockServer::start_async().await;
	let client = common::client_for(&server);

	common::mock_token_exchange(&server, "pubsub-token").await;

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/projects/acme-prod/topics/events:publish")
				.header("authorization", "Bearer pubsub-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"messageIds\":[\"811\"]}");
		})
		.await;

	let topic = TopicSpec { project_id: "acme-prod".into(), topic_name: "events".into() };
	let message = PubsubMessage {
		data: serde_json::json!({ "kind": "deploy.finished" }),
		..Default::default()
	};
	let response = client
		.pub_sub()
		.with_base_url(server.base_url())
		.publish(&topic, &[message])
		.await
		.expect("Publishing should succeed.");

	assert_eq!(response.message_ids, vec!["811".to_owned()]);

	mock.assert_async().await;
}

#[tokio::test]
async fn upload_returns_public_url() {
	let server = MockServer::start_async().await;
	let client = common::client_for(&server);

	common::mock_token_exchange(&server, "storage-token").await;

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/upload/storage/v1/b/acme-assets/o")
				.query_param("name", "logo.svg")
				.header("content-type", "image/svg+xml");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;

	let spec = UploadSpec {
		bucket: "acme-assets".into(),
		filename: "logo.svg".into(),
		content: b"<svg/>".to_vec(),
		content_type: "image/svg+xml".into(),
	};
	let uploaded = client
		.storage()
		.with_base_url(server.base_url())
		.upload_file(spec)
		.await
		.expect("Uploading should succeed.");

	assert_eq!(
		uploaded.public_url,
		format!("{}/acme-assets/logo.svg", server.base_url().trim_end_matches('/'))
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn absent_service_reads_as_none() {
	let server = MockServer::start_async().await;
	let client = common::client_for(&server);

	common::mock_token_exchange(&server, "run-token").await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/projects/acme-prod/locations/europe-west1/services/api");
			then.status(404)
				.header("content-type", "application/json")
				.body("{\"message\":\"Service not found.\"}");
		})
		.await;

	let resource = ServiceResource {
		project_id: "acme-prod".into(),
		location: "europe-west1".into(),
		service_id: "api".into(),
	};
	let service = client
		.cloud_run()
		.with_base_url(server.base_url())
		.get_service(&resource)
		.await
		.expect("A 404 should map to an absent service, not an error.");

	assert!(service.is_none());
}

#[tokio::test]
async fn wait_operation_round_trips() {
	let server = MockServer::start_async().await;
	let client = common::client_for(&server);

	common::mock_token_exchange(&server, "run-token").await;

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/projects/acme-prod/locations/europe-west1/operations/op-1:wait");
			then.status(200).header("content-type", "application/json").body(
				"{\"name\":\"projects/acme-prod/locations/europe-west1/operations/op-1\",\"done\":true}",
			);
		})
		.await;

	let operation = client
		.cloud_run()
		.with_base_url(server.base_url())
		.wait_operation("projects/acme-prod/locations/europe-west1/operations/op-1", None)
		.await
		.expect("Waiting on the operation should succeed.");

	assert!(operation.done);
	assert!(operation.error.is_none());

	mock.assert_async().await;
}
