//! Cloud Storage facade: object upload.

// self
use crate::{
	_prelude::*,
	api,
	auth::Scope,
	client::GcloudClient,
	http::RequestOptions,
};

/// Default Cloud Storage base URL (serving and upload).
pub const BASE_URL: &str = "https://storage.googleapis.com";

/// Cloud Storage facade borrowed from a [`GcloudClient`].
#[derive(Clone, Debug)]
pub struct Storage<'a> {
	client: &'a GcloudClient,
	base_url: String,
}
impl<'a> Storage<'a> {
	pub(crate) fn new(client: &'a GcloudClient) -> Self {
		Self { client, base_url: BASE_URL.into() }
	}

	/// Overrides the API base URL. Intended for tests.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();

		self
	}

	/// Uploads an object and returns its public URL.
	pub async fn upload_file(&self, spec: UploadSpec) -> Result<UploadedObject> {
		let token = self.client.access_token(&Scope::default()).await?;
		let mut url = api::endpoint(
			&self.base_url,
			&format!("upload/storage/v1/b/{}/o", spec.bucket),
		)?;

		url.query_pairs_mut().append_pair("name", &spec.filename);

		let options = RequestOptions::post()
			.authorization(token)
			.bytes(spec.content, spec.content_type);

		self.client.request(url, options).await?;

		Ok(UploadedObject {
			public_url: format!(
				"{}/{}/{}",
				self.base_url.trim_end_matches('/'),
				spec.bucket,
				spec.filename
			),
		})
	}
}

/// Parameters of an object upload.
#[derive(Clone, Debug)]
pub struct UploadSpec {
	/// Destination bucket.
	pub bucket: String,
	/// Object name within the bucket.
	pub filename: String,
	/// Object content.
	pub content: Vec<u8>,
	/// Content type recorded for the object.
	pub content_type: String,
}

/// Result of an upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedObject {
	/// Public serving URL of the uploaded object.
	pub public_url: String,
}
