//! In-memory service double for state and controller tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::api::{
	Algorithm, ApiError, Backend, Community, GeneInfo, GraphElement, Interaction, NodeId,
};

/// A request the mock has seen, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
	Algorithms,
	Partition(String),
	Interactions(String, Vec<usize>),
	Gene(String),
}

/// Releases a response held by [`MockBackend::hold_next_interactions`] or
/// [`MockBackend::hold_next_partition`].
pub struct Gate(oneshot::Sender<()>);

impl Gate {
	pub fn release(self) {
		let _ = self.0.send(());
	}
}

struct Link {
	resource: String,
	from: (usize, NodeId),
	to: (usize, NodeId),
}

/// Serves partitions (indexes refer to the size-sorted order, as on the real
/// service) and answers interaction queries for every requested pair.
#[derive(Default)]
pub struct MockBackend {
	algorithms: Vec<Algorithm>,
	partitions: HashMap<String, Vec<Community>>,
	genes: HashMap<String, GeneInfo>,
	links: RefCell<Vec<Link>>,
	requests: RefCell<Vec<Request>>,
	fail_all: Cell<bool>,
	fail_interactions: Cell<bool>,
	held: RefCell<Option<oneshot::Receiver<()>>>,
	held_partition: RefCell<Option<oneshot::Receiver<()>>>,
}

impl MockBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_partition(mut self, resource: &str, partition: Vec<Community>) -> Self {
		self.algorithms.push(Algorithm {
			name: resource.to_uppercase(),
			resource: resource.to_string(),
			modularity: None,
		});
		self.partitions.insert(resource.to_string(), partition);
		self
	}

	pub fn with_gene(mut self, id: &str, fields: Value) -> Self {
		let fields = match fields {
			Value::Object(map) => map,
			_ => serde_json::Map::new(),
		};
		self.genes.insert(id.to_string(), GeneInfo { fields });
		self
	}

	/// Add a cross-community edge between `(community, node)` pairs.
	pub fn link(&self, resource: &str, from: (usize, &str), to: (usize, &str)) {
		self.links.borrow_mut().push(Link {
			resource: resource.to_string(),
			from: (from.0, from.1.into()),
			to: (to.0, to.1.into()),
		});
	}

	pub fn requests(&self) -> Vec<Request> {
		self.requests.borrow().clone()
	}

	pub fn fail_all(&self, fail: bool) {
		self.fail_all.set(fail);
	}

	pub fn fail_interactions(&self, fail: bool) {
		self.fail_interactions.set(fail);
	}

	/// Make the next interaction request wait until the returned gate is released.
	pub fn hold_next_interactions(&self) -> Gate {
		let (tx, rx) = oneshot::channel();
		*self.held.borrow_mut() = Some(rx);
		Gate(tx)
	}

	/// Make the next partition request wait until the returned gate is released.
	pub fn hold_next_partition(&self) -> Gate {
		let (tx, rx) = oneshot::channel();
		*self.held_partition.borrow_mut() = Some(rx);
		Gate(tx)
	}

	fn record(&self, request: Request) -> Result<(), ApiError> {
		self.requests.borrow_mut().push(request);
		if self.fail_all.get() {
			return Err(ApiError::Status {
				status: 503,
				url: "mock".to_string(),
			});
		}
		Ok(())
	}

	fn pair(&self, resource: &str, c1: usize, c2: usize) -> Interaction {
		let edges = self
			.links
			.borrow()
			.iter()
			.filter(|l| l.resource == resource)
			.filter_map(|l| {
				if (l.from.0, l.to.0) == (c1, c2) || (l.from.0, l.to.0) == (c2, c1) {
					Some((l.from.1.clone(), l.to.1.clone()))
				} else {
					None
				}
			})
			.collect();
		Interaction { c1, c2, edges }
	}
}

impl Backend for MockBackend {
	async fn algorithms(&self) -> Result<Vec<Algorithm>, ApiError> {
		self.record(Request::Algorithms)?;
		Ok(self.algorithms.clone())
	}

	async fn partition(&self, resource: &str) -> Result<Vec<Community>, ApiError> {
		self.record(Request::Partition(resource.to_string()))?;
		let held = self.held_partition.borrow_mut().take();
		if let Some(rx) = held {
			let _ = rx.await;
		}
		self.partitions
			.get(resource)
			.cloned()
			.ok_or_else(|| ApiError::NotFound(format!("/api/algorithms/{resource}")))
	}

	async fn interactions(
		&self,
		resource: &str,
		communities: &[usize],
	) -> Result<Vec<Interaction>, ApiError> {
		self.record(Request::Interactions(
			resource.to_string(),
			communities.to_vec(),
		))?;
		let held = self.held.borrow_mut().take();
		if let Some(rx) = held {
			let _ = rx.await;
		}
		if self.fail_interactions.get() {
			return Err(ApiError::Status {
				status: 500,
				url: "mock".to_string(),
			});
		}

		let mut interactions = Vec::new();
		for (i, &c1) in communities.iter().enumerate() {
			for &c2 in &communities[i + 1..] {
				interactions.push(self.pair(resource, c1, c2));
			}
		}
		Ok(interactions)
	}

	async fn gene(&self, id: &NodeId) -> Result<GeneInfo, ApiError> {
		self.record(Request::Gene(id.to_string()))?;
		self.genes
			.get(id.as_str())
			.cloned()
			.ok_or_else(|| ApiError::NotFound(format!("/api/gene/{id}")))
	}
}

/// A community of `size` nodes with ids `{prefix}0`, `{prefix}1`, ...
pub fn community(prefix: &str, size: usize) -> Community {
	(0..size)
		.map(|j| GraphElement::node(format!("{prefix}{j}").as_str()))
		.collect::<Vec<_>>()
		.into()
}

/// Communities of the given sizes; community `i` has nodes `c{i}n0`, `c{i}n1`, ...
pub fn partition_of_sizes(sizes: &[usize]) -> Vec<Community> {
	sizes
		.iter()
		.enumerate()
		.map(|(i, &size)| community(&format!("c{i}n"), size))
		.collect()
}
