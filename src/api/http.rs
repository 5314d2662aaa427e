//! `reqwest`-based backend. On wasm32 reqwest drives the browser `fetch` API.

use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::{Algorithm, ApiError, Backend, Community, GeneInfo, Interaction, NodeId, decode_reply};

/// Talks to the service rooted at `base` (e.g. `https://host:5000`).
#[derive(Clone, Debug)]
pub struct HttpBackend {
	client: Client,
	base: String,
}

impl HttpBackend {
	pub fn new(base: impl Into<String>) -> Self {
		Self {
			client: Client::new(),
			base: base.into().trim_end_matches('/').to_string(),
		}
	}

	/// `{base}/api/{segments...}`, each segment percent-encoded so ids cannot
	/// change the route.
	fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
		let mut url =
			Url::parse(&self.base).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base)))?;
		url.path_segments_mut()
			.map_err(|()| ApiError::InvalidUrl(self.base.clone()))?
			.pop_if_empty()
			.push("api")
			.extend(segments);
		Ok(url)
	}

	async fn get_json<T: DeserializeOwned>(
		&self,
		segments: &[&str],
		query: &[(&str, String)],
	) -> Result<T, ApiError> {
		let url = self.url(segments)?;
		debug!("gcviz: GET {url}");
		let response = self.client.get(url.clone()).query(query).send().await?;
		let status = response.status();
		if status == StatusCode::NOT_FOUND {
			return Err(ApiError::NotFound(url.to_string()));
		}
		if !status.is_success() {
			return Err(ApiError::Status {
				status: status.as_u16(),
				url: url.to_string(),
			});
		}
		let body = response.text().await?;
		decode_reply(url.as_str(), &body)
	}
}

impl Backend for HttpBackend {
	async fn algorithms(&self) -> Result<Vec<Algorithm>, ApiError> {
		self.get_json(&["algorithms"], &[]).await
	}

	async fn partition(&self, resource: &str) -> Result<Vec<Community>, ApiError> {
		self.get_json(&["algorithms", resource], &[]).await
	}

	async fn interactions(
		&self,
		resource: &str,
		communities: &[usize],
	) -> Result<Vec<Interaction>, ApiError> {
		let joined = communities
			.iter()
			.map(usize::to_string)
			.collect::<Vec<_>>()
			.join(",");
		self.get_json(
			&["algorithms", resource, "interactions"],
			&[("communities", joined)],
		)
		.await
	}

	async fn gene(&self, id: &NodeId) -> Result<GeneInfo, ApiError> {
		self.get_json(&["gene", id.as_str()], &[]).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn urls_are_rooted_under_api() {
		let backend = HttpBackend::new("http://localhost:5000/");
		assert_eq!(
			backend
				.url(&["algorithms", "lvn", "interactions"])
				.unwrap()
				.as_str(),
			"http://localhost:5000/api/algorithms/lvn/interactions"
		);
	}

	#[test]
	fn base_paths_are_kept() {
		let backend = HttpBackend::new("http://host/gcviz");
		assert_eq!(
			backend.url(&["algorithms"]).unwrap().as_str(),
			"http://host/gcviz/api/algorithms"
		);
	}

	#[test]
	fn segments_cannot_change_the_route() {
		let backend = HttpBackend::new("http://localhost:5000");
		let url = backend.url(&["algorithms", "../gene/1?x=y#z"]).unwrap();

		assert_eq!(url.path_segments().map(Iterator::count), Some(3));
		assert_eq!(url.query(), None);
		assert_eq!(url.fragment(), None);
		assert!(url.path().starts_with("/api/algorithms/"));
	}

	#[test]
	fn unusable_bases_are_reported() {
		let backend = HttpBackend::new("");
		assert!(matches!(
			backend.url(&["algorithms"]),
			Err(ApiError::InvalidUrl(_))
		));
	}
}
