//! Pub/Sub facade: topic publishing.

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

/// Default Pub/Sub API base URL.
pub const BASE_URL: &str = "https://pubsub.googleapis.com";

/// Pub/Sub facade borrowed from a [`GcloudClient`].
#[derive(Clone, Debug)]
pub struct PubSub<'a> {
	client: &'a GcloudClient,
	base_url: String,
}
impl<'a> PubSub<'a> {
	pub(crate) fn new(client: &'a GcloudClient) -> Self {
		Self { client, base_url: BASE_URL.into() }
	}

	/// Overrides the API base URL. Intended for tests.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();

		self
	}

	/// Publishes a batch of messages to a topic, returning the assigned message ids.
	///
	/// Each message's `data` value is JSON-serialized and base64-encoded per the
	/// wire contract; attributes pass through unchanged.
	pub async fn publish(
		&self,
		topic: &TopicSpec,
		messages: &[PubsubMessage],
	) -> Result<PublishResponse> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url = api::endpoint(
			&self.base_url,
			&format!("v1/projects/{}/topics/{}:publish", topic.project_id, topic.topic_name),
		)?;
		let encoded = messages.iter().map(encode_message).collect::<Result<Vec<_>>>()?;
		let body = serde_json::json!({ "messages": encoded });
		let response = self
			.client
			.request(url, RequestOptions::post().authorization(token).json(body))
			.await?;

		api::decode(response)
	}
}

fn encode_message(message: &PubsubMessage) -> Result<Value> {
	let data = serde_json::to_string(&message.data)
		.map_err(|source| Error::Payload { message: source.to_string() })?;

	Ok(serde_json::json!({
		"attributes": message.attributes,
		"data": STANDARD.encode(data.as_bytes()),
	}))
}

/// Addresses a topic within a project.
#[derive(Clone, Debug)]
pub struct TopicSpec {
	/// Project owning the topic.
	pub project_id: String,
	/// Short topic name.
	pub topic_name: String,
}

/// A message to publish.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PubsubMessage {
	/// Arbitrary JSON payload; serialized and base64-encoded on the wire.
	pub data: Value,
	/// Message attributes, passed through verbatim.
	#[serde(default)]
	pub attributes: HashMap<String, String>,
}

/// Response to a publish call.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
	/// Server-assigned ids, in message order.
	pub message_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn message_data_is_base64_of_its_json() {
		let message = PubsubMessage {
			data: serde_json::json!({ "kind": "build.finished" }),
			attributes: HashMap::from([("origin".to_owned(), "ci".to_owned())]),
		};
		let encoded = encode_message(&message).expect("Message encoding should succeed.");
		let data = encoded["data"].as_str().expect("Encoded data should be a string.");
		let decoded = STANDARD.decode(data).expect("Encoded data should be valid base64.");

		assert_eq!(decoded, br#"{"kind":"build.finished"}"#);
		assert_eq!(encoded["attributes"]["origin"], "ci");
	}
}
