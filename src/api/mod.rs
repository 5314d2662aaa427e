//! Client side of the community-detection REST service.
//!
//! The service exposes a fixed contract:
//! - `GET /api/algorithms` lists the available algorithms.
//! - `GET /api/algorithms/{resource}` returns a partition (list of communities).
//! - `GET /api/algorithms/{resource}/interactions?communities=i1,i2,...` returns
//!   the edges between every pair of listed communities.
//! - `GET /api/gene/{id}` returns flat gene metadata.
//!
//! [`Backend`] abstracts the transport so application state can be driven by
//! [`HttpBackend`] in the browser and by an in-memory double in tests.

mod http;
mod types;

use serde::Deserialize;
use serde::de::DeserializeOwned;

pub use http::HttpBackend;
pub use types::{Algorithm, Community, ElementData, GeneInfo, GraphElement, Interaction, NodeId};

/// Failures talking to the service.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("{url} answered with HTTP {status}")]
	Status { status: u16, url: String },
	#[error("resource not found: {0}")]
	NotFound(String),
	#[error("server error: {0}")]
	Server(String),
	#[error("invalid service address: {0}")]
	InvalidUrl(String),
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Async access to the service. Futures are not `Send`; everything runs on the
/// browser event loop.
#[allow(async_fn_in_trait)]
pub trait Backend {
	async fn algorithms(&self) -> Result<Vec<Algorithm>, ApiError>;

	async fn partition(&self, resource: &str) -> Result<Vec<Community>, ApiError>;

	async fn interactions(
		&self,
		resource: &str,
		communities: &[usize],
	) -> Result<Vec<Interaction>, ApiError>;

	async fn gene(&self, id: &NodeId) -> Result<GeneInfo, ApiError>;
}

/// The service reports errors as `{"error": "..."}`, sometimes with HTTP 200.
#[derive(Deserialize)]
#[serde(untagged)]
enum Reply<T> {
	Failure { error: String },
	Data(T),
}

/// Decode a response body, unwrapping the service's error envelope.
pub(crate) fn decode_reply<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
	match serde_json::from_str::<Reply<T>>(body) {
		Ok(Reply::Data(data)) => Ok(data),
		Ok(Reply::Failure { error }) if error.eq_ignore_ascii_case("not found") => {
			Err(ApiError::NotFound(url.to_string()))
		}
		Ok(Reply::Failure { error }) => Err(ApiError::Server(error)),
		// Re-run the plain decode to get a useful serde error instead of the
		// untagged "did not match any variant".
		Err(_) => serde_json::from_str::<T>(body).map_err(ApiError::Decode),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_envelope_not_found_maps_to_not_found() {
		let result = decode_reply::<Vec<Community>>("/api/algorithms/zz", r#"{"error": "Not found"}"#);
		assert!(matches!(result, Err(ApiError::NotFound(url)) if url == "/api/algorithms/zz"));
	}

	#[test]
	fn other_error_envelopes_map_to_server_errors() {
		let result = decode_reply::<Vec<Interaction>>("/x", r#"{"error": "Bad request"}"#);
		assert!(matches!(result, Err(ApiError::Server(msg)) if msg == "Bad request"));
	}

	#[test]
	fn data_payloads_pass_through() {
		let algorithms: Vec<Algorithm> =
			decode_reply("/api/algorithms", r#"[{"name": "Louvain", "resource": "lvn"}]"#).unwrap();
		assert_eq!(algorithms[0].resource, "lvn");
	}

	#[test]
	fn malformed_payloads_report_decode_errors() {
		let result = decode_reply::<Vec<Algorithm>>("/api/algorithms", "[1, 2");
		assert!(matches!(result, Err(ApiError::Decode(_))));
	}
}
