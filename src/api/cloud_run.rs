//! Cloud Run facade: service deployment, long-running operations, and IAM policy.

// self
use crate::{
	_prelude::*,
	api,
	auth::Scope,
	client::GcloudClient,
	http::RequestOptions,
};

/// Default Cloud Run API base URL.
pub const BASE_URL: &str = "https://run.googleapis.com";

/// Cloud Run facade borrowed from a [`GcloudClient`].
#[derive(Clone, Debug)]
pub struct CloudRun<'a> {
	client: &'a GcloudClient,
	base_url: String,
}
impl<'a> CloudRun<'a> {
	pub(crate) fn new(client: &'a GcloudClient) -> Self {
		Self { client, base_url: BASE_URL.into() }
	}

	/// Overrides the API base URL. Intended for tests.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();

		self
	}

	/// Fetches a service, returning `None` when it does not exist.
	pub async fn get_service(&self, resource: &ServiceResource) -> Result<Option<Service>> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url = api::endpoint(&self.base_url, &format!("v2/{}", resource.service_name()))?;

		match self.client.request(url, RequestOptions::get().authorization(token)).await {
			Ok(body) => Ok(Some(api::decode(body)?)),
			Err(err) if err.is_not_found() => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// Creates a service, returning the long-running operation tracking it.
	pub async fn create_service(
		&self,
		resource: &ServiceResource,
		spec: &ServiceSpec,
	) -> Result<Operation> {
		let token = self.client.access_token(&Scope::default()).await?;
		let mut url = api::endpoint(
			&self.base_url,
			&format!(
				"v2/projects/{}/locations/{}/services",
				resource.project_id, resource.location
			),
		)?;

		url.query_pairs_mut().append_pair("serviceId", &resource.service_id);

		let body = api::encode(spec)?;
		let response = self
			.client
			.request(url, RequestOptions::post().authorization(token).json(body))
			.await?;

		api::decode(response)
	}

	/// Patches a service with a partial document, returning the tracking operation.
	///
	/// `patch` is an arbitrary JSON fragment merged server-side, so callers can
	/// update a single nested field without round-tripping the full service.
	pub async fn update_service(
		&self,
		resource: &ServiceResource,
		patch: Value,
	) -> Result<Operation> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url = api::endpoint(&self.base_url, &format!("v2/{}", resource.service_name()))?;
		let response = self
			.client
			.request(url, RequestOptions::patch().authorization(token).json(patch))
			.await?;

		api::decode(response)
	}

	/// Fetches a long-running operation by its full resource name.
	pub async fn get_operation(&self, name: &str) -> Result<Operation> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url = api::endpoint(&self.base_url, &format!("v2/{name}"))?;
		let response = self.client.request(url, RequestOptions::get().authorization(token)).await?;

		api::decode(response)
	}

	/// Blocks server-side until the operation completes or `timeout` elapses.
	///
	/// `timeout` uses the API's duration syntax (e.g. `"60s"`, the default).
	pub async fn wait_operation(&self, name: &str, timeout: Option<&str>) -> Result<Operation> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url = api::endpoint(&self.base_url, &format!("v2/{name}:wait"))?;
		let body = serde_json::json!({ "timeout": timeout.unwrap_or("60s") });
		let response = self
			.client
			.request(url, RequestOptions::post().authorization(token).json(body))
			.await?;

		api::decode(response)
	}

	/// Replaces the service's IAM policy (e.g. to allow unauthenticated invocations).
	pub async fn set_iam_policy(
		&self,
		resource: &ServiceResource,
		policy: &IamPolicy,
	) -> Result<IamPolicy> {
		let token = self.client.access_token(&Scope::default()).await?;
		let url =
			api::endpoint(&self.base_url, &format!("v2/{}:setIamPolicy", resource.service_name()))?;
		let body = serde_json::json!({ "policy": api::encode(policy)? });
		let response = self
			.client
			.request(url, RequestOptions::post().authorization(token).json(body))
			.await?;

		api::decode(response)
	}
}

/// Addresses a service within a project and location.
#[derive(Clone, Debug)]
pub struct ServiceResource {
	/// Project owning the service.
	pub project_id: String,
	/// Deployment location (e.g. `europe-west1`).
	pub location: String,
	/// Short service identifier.
	pub service_id: String,
}
impl ServiceResource {
	/// Returns the full resource name (`projects/*/locations/*/services/*`).
	pub fn service_name(&self) -> String {
		format!(
			"projects/{}/locations/{}/services/{}",
			self.project_id, self.location, self.service_id
		)
	}
}

/// A deployed Cloud Run service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
	/// Full resource name.
	pub name: String,
	/// Revision template describing the workload.
	pub template: RevisionTemplate,
	/// Serving URI assigned by the platform.
	#[serde(default)]
	pub uri: String,
	/// Service labels.
	#[serde(default)]
	pub labels: HashMap<String, String>,
	/// Service annotations.
	#[serde(default)]
	pub annotations: HashMap<String, String>,
}

/// Creation parameters for a service (everything but the server-assigned fields).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
	/// Revision template describing the workload.
	pub template: RevisionTemplate,
	/// Service labels.
	#[serde(default, skip_serializing_if = "HashMap::is_empty")]
	pub labels: HashMap<String, String>,
	/// Service annotations.
	#[serde(default, skip_serializing_if = "HashMap::is_empty")]
	pub annotations: HashMap<String, String>,
}

/// Template for the revisions a service stamps out.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionTemplate {
	/// Optional revision name; generated when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub revision: Option<String>,
	/// Instance scaling bounds.
	#[serde(default)]
	pub scaling: RevisionScaling,
	/// Request timeout in the API's duration syntax (e.g. `"300s"`).
	#[serde(default)]
	pub timeout: String,
	/// Runtime service account email.
	#[serde(default)]
	pub service_account: String,
	/// Workload containers.
	#[serde(default)]
	pub containers: Vec<Container>,
	/// Execution environment generation.
	#[serde(default)]
	pub execution_environment: String,
	/// Maximum concurrent requests per instance.
	#[serde(default)]
	pub max_instance_request_concurrency: u32,
}

/// Instance count bounds for a revision.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionScaling {
	/// Minimum instance count.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_instance_count: Option<u32>,
	/// Maximum instance count.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_instance_count: Option<u32>,
}

/// A container within a revision template.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
	/// Container name.
	pub name: String,
	/// Image reference.
	pub image: String,
	/// Environment variables.
	#[serde(default)]
	pub env: Vec<ContainerEnv>,
	/// Resource limits.
	#[serde(default)]
	pub resources: ContainerResources,
	/// Exposed ports.
	#[serde(default)]
	pub ports: Vec<ContainerPort>,
}

/// An environment variable, literal or secret-backed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerEnv {
	/// Variable name.
	pub name: String,
	/// Literal value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	/// Secret-backed value source.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value_source: Option<EnvValueSource>,
}

/// Source of a secret-backed environment variable.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvValueSource {
	/// Secret reference.
	pub secret_key_ref: SecretKeyRef,
}

/// Reference to a secret version.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeyRef {
	/// Secret resource name or short id.
	pub secret: String,
	/// Version selector (number or `"latest"`).
	pub version: Value,
}

/// CPU/memory limits for a container.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerResources {
	/// Resource limits keyed by resource name (`cpu`, `memory`).
	#[serde(default)]
	pub limits: HashMap<String, String>,
	/// Whether CPU is throttled outside of request processing.
	#[serde(default)]
	pub cpu_idle: bool,
}

/// An exposed container port.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
	/// Protocol name (`http1` or `h2c`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Port number.
	pub container_port: u16,
}

/// A long-running operation returned by mutating calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Operation {
	/// Full operation resource name.
	pub name: String,
	/// Whether the operation has completed.
	#[serde(default)]
	pub done: bool,
	/// Service-specific progress metadata.
	#[serde(default)]
	pub metadata: Value,
	/// Failure status, set when the operation completed unsuccessfully.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<OperationStatus>,
	/// Response payload, set on success.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub response: Option<Value>,
}

/// Failure status of a completed operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OperationStatus {
	/// Status code.
	#[serde(default)]
	pub code: Value,
	/// Human-readable failure message.
	#[serde(default)]
	pub message: String,
	/// Structured failure details.
	#[serde(default)]
	pub details: Value,
}

/// An IAM policy document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IamPolicy {
	/// Role bindings.
	#[serde(default)]
	pub bindings: Vec<PolicyBinding>,
}

/// Members granted a role.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyBinding {
	/// Role identifier (e.g. `roles/run.invoker`).
	pub role: String,
	/// Granted members (e.g. `allUsers`).
	pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn service_name_joins_resource_parts() {
		let resource = ServiceResource {
			project_id: "acme-prod".into(),
			location: "europe-west1".into(),
			service_id: "api".into(),
		};

		assert_eq!(resource.service_name(), "projects/acme-prod/locations/europe-west1/services/api");
	}

	#[test]
	fn service_spec_serializes_camel_case() {
		let spec = ServiceSpec {
			template: RevisionTemplate {
				timeout: "300s".into(),
				service_account: "svc@example.iam.gserviceaccount.com".into(),
				execution_environment: "EXECUTION_ENVIRONMENT_GEN2".into(),
				max_instance_request_concurrency: 80,
				..Default::default()
			},
			..Default::default()
		};
		let rendered = serde_json::to_value(&spec).expect("Service spec should serialize.");

		assert_eq!(
			rendered["template"]["serviceAccount"],
			"svc@example.iam.gserviceaccount.com"
		);
		assert_eq!(rendered["template"]["maxInstanceRequestConcurrency"], 80);
		assert_eq!(rendered["template"]["executionEnvironment"], "EXECUTION_ENVIRONMENT_GEN2");
	}

	#[test]
	fn operation_defaults_optional_fields() {
		let operation: Operation = serde_json::from_str(
			r#"{"name":"projects/p/locations/l/operations/op-1"}"#,
		)
		.expect("Minimal operation JSON should parse.");

		assert!(!operation.done);
		assert!(operation.error.is_none());
		assert!(operation.response.is_none());
	}
}
