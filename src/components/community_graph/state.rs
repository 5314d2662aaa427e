//! Application state: algorithm selection, partition, active communities,
//! their styles and the cross-community interaction cache.
//!
//! The state lives on the browser event loop and is shared as
//! `Rc<AppState<B>>`. Operations that talk to the service take `&self` and
//! never hold a `RefCell` borrow across an `.await`, so overlapping calls
//! (rapid toggling while a request is in flight) are allowed.
//!
//! Overlapping interaction refreshes are ordered by ticket: a response is
//! applied only if no newer response has been applied already, and it is
//! filtered against the active set at arrival time so it can never
//! reintroduce a community that was deactivated meanwhile.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, info, warn};

use super::elements::Element;
use super::theme::{Color, CommunityStyle, StyleAllocator, size_gradient};
use crate::api::{Algorithm, ApiError, Backend, Community, Interaction};

/// Algorithm identifier assumed before the catalog is loaded.
pub const INITIAL_ALGORITHM: &str = "n2v";

/// Failures of state operations. Nothing is mutated when one is returned.
#[derive(thiserror::Error, Debug)]
pub enum StateError {
	#[error("network error: {0}")]
	Network(#[from] ApiError),
	#[error("unknown algorithm resource '{0}'")]
	InvalidResource(String),
	#[error("community {0} is out of range or not active")]
	InvalidCommunityIndex(usize),
	#[error("community {0} is already displayed")]
	CommunityAlreadyActive(usize),
}

/// Legend row for one displayed community.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LegendEntry {
	pub index: usize,
	pub color: Color,
}

/// Picker entry for one community of the partition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommunitySummary {
	pub index: usize,
	pub size: usize,
	/// Position of `size` on the partition's size gradient.
	pub color: Color,
}

/// An issued interaction refresh; remembers what was asked and when.
struct Ticket {
	seq: u64,
	epoch: u64,
	resource: String,
	communities: Vec<usize>,
}

struct Inner {
	algorithms: Vec<Algorithm>,
	algorithm: String,
	partition: Vec<Community>,
	active: Vec<usize>,
	styles: HashMap<usize, CommunityStyle>,
	interactions: Vec<Interaction>,
	allocator: StyleAllocator,
	/// Last interaction ticket handed out.
	refresh_seq: u64,
	/// Ticket of the last interaction response stored.
	applied_seq: u64,
	/// Last algorithm selection handed out.
	selection_seq: u64,
	/// Bumped whenever a new partition is committed.
	epoch: u64,
}

impl Inner {
	fn issue_ticket(&mut self) -> Ticket {
		self.refresh_seq += 1;
		Ticket {
			seq: self.refresh_seq,
			epoch: self.epoch,
			resource: self.algorithm.clone(),
			communities: self.active.clone(),
		}
	}

	/// No refresh has been issued after `ticket`.
	fn is_latest(&self, ticket: &Ticket) -> bool {
		ticket.seq == self.refresh_seq && ticket.epoch == self.epoch
	}

	/// Nothing newer than `ticket` has been stored yet.
	fn is_fresh(&self, ticket: &Ticket) -> bool {
		ticket.seq > self.applied_seq && ticket.epoch == self.epoch
	}

	/// Make every ticket issued so far stale.
	fn invalidate_tickets(&mut self) {
		self.refresh_seq += 1;
		self.applied_seq = self.refresh_seq;
	}

	/// Replace the cache wholesale, keeping only pairs that are still active.
	fn store_interactions(&mut self, mut interactions: Vec<Interaction>) {
		let active = &self.active;
		interactions.retain(|i| active.contains(&i.c1) && active.contains(&i.c2));
		self.interactions = interactions;
	}

	fn remove(&mut self, index: usize) {
		self.active.retain(|&i| i != index);
		self.styles.remove(&index);
		self.interactions.retain(|i| !i.involves(index));
	}
}

/// Sort communities by ascending element count; ties keep their original order.
pub fn sort_partition(mut partition: Vec<Community>) -> Vec<Community> {
	partition.sort_by_key(Community::len);
	partition
}

/// Index of the community opened when a partition is loaded:
/// `floor(count / 1.2)`, a moderately large one. `None` for an empty partition.
pub fn default_community(count: usize) -> Option<usize> {
	(count > 0).then(|| (count as f64 / 1.2).floor() as usize)
}

/// Owns everything the graph view displays.
pub struct AppState<B> {
	backend: B,
	inner: RefCell<Inner>,
}

impl<B: Backend> AppState<B> {
	pub fn new(backend: B) -> Self {
		Self::with_allocator(backend, StyleAllocator::new())
	}

	pub fn with_allocator(backend: B, allocator: StyleAllocator) -> Self {
		Self {
			backend,
			inner: RefCell::new(Inner {
				algorithms: Vec::new(),
				algorithm: INITIAL_ALGORITHM.to_string(),
				partition: Vec::new(),
				active: Vec::new(),
				styles: HashMap::new(),
				interactions: Vec::new(),
				allocator,
				refresh_seq: 0,
				applied_seq: 0,
				selection_seq: 0,
				epoch: 0,
			}),
		}
	}

	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Load the algorithm catalog.
	pub async fn fetch_algorithms(&self) -> Result<Vec<Algorithm>, StateError> {
		let algorithms = self.backend.algorithms().await?;
		info!("gcviz: {} algorithms available", algorithms.len());
		self.inner.borrow_mut().algorithms = algorithms.clone();
		Ok(algorithms)
	}

	/// Switch to the partition produced by `resource`.
	///
	/// The partition and the default community's interactions are fetched
	/// before anything is replaced, so a failure leaves the previous view
	/// intact. If another selection starts before this one finishes, the
	/// later one wins and this call returns without committing.
	pub async fn select_algorithm(&self, resource: &str) -> Result<(), StateError> {
		let selection = {
			let mut inner = self.inner.borrow_mut();
			inner.selection_seq += 1;
			inner.selection_seq
		};

		let partition = match self.backend.partition(resource).await {
			Ok(partition) => sort_partition(partition),
			Err(ApiError::NotFound(_)) => {
				return Err(StateError::InvalidResource(resource.to_string()));
			}
			Err(e) => return Err(e.into()),
		};
		let default = default_community(partition.len());
		let interactions = match default {
			Some(index) => self.backend.interactions(resource, &[index]).await?,
			None => Vec::new(),
		};

		let mut inner = self.inner.borrow_mut();
		if inner.selection_seq != selection {
			debug!("gcviz: dropping superseded partition for '{resource}'");
			return Ok(());
		}
		inner.algorithm = resource.to_string();
		inner.partition = partition;
		inner.active.clear();
		inner.styles.clear();
		inner.interactions.clear();
		inner.epoch += 1;
		// Outstanding refreshes belong to the old partition.
		inner.invalidate_tickets();
		if let Some(index) = default {
			inner.active.push(index);
			let style = inner.allocator.assign(index, 1);
			inner.styles.insert(index, style);
			inner.store_interactions(interactions);
		}
		info!(
			"gcviz: loaded '{resource}' with {} communities, showing {:?}",
			inner.partition.len(),
			default
		);
		Ok(())
	}

	/// Display community `index` and refresh interactions for the new active set.
	///
	/// If the refresh fails and nothing newer has been issued, the activation
	/// is rolled back before the error is returned.
	pub async fn activate_community(&self, index: usize) -> Result<(), StateError> {
		let ticket = {
			let mut inner = self.inner.borrow_mut();
			if index >= inner.partition.len() {
				return Err(StateError::InvalidCommunityIndex(index));
			}
			if inner.active.contains(&index) {
				return Err(StateError::CommunityAlreadyActive(index));
			}
			inner.active.push(index);
			let count = inner.active.len();
			let style = inner.allocator.assign(index, count);
			inner.styles.insert(index, style);
			inner.issue_ticket()
		};
		info!("gcviz: activated community {index}");

		match self.complete_refresh(ticket).await {
			Ok(()) => Ok(()),
			Err((ticket, e)) => {
				let mut inner = self.inner.borrow_mut();
				if inner.is_latest(&ticket) && inner.active.contains(&index) {
					warn!("gcviz: rolling back community {index}: {e}");
					inner.remove(index);
				}
				Err(e.into())
			}
		}
	}

	/// Hide community `index`; drops its style and every interaction touching it.
	pub fn deactivate_community(&self, index: usize) -> Result<(), StateError> {
		let mut inner = self.inner.borrow_mut();
		if !inner.active.contains(&index) {
			return Err(StateError::InvalidCommunityIndex(index));
		}
		inner.remove(index);
		info!("gcviz: deactivated community {index}");
		Ok(())
	}

	/// Re-fetch interactions between every pair of active communities,
	/// replacing the cache. With nothing active the cache is just cleared.
	pub async fn get_communities_interactions(&self) -> Result<(), StateError> {
		let ticket = {
			let mut inner = self.inner.borrow_mut();
			if inner.active.is_empty() {
				inner.invalidate_tickets();
				inner.interactions.clear();
				return Ok(());
			}
			inner.issue_ticket()
		};
		self.complete_refresh(ticket)
			.await
			.map_err(|(_, e)| StateError::from(e))
	}

	async fn complete_refresh(&self, ticket: Ticket) -> Result<(), (Ticket, ApiError)> {
		debug!(
			"gcviz: interaction refresh #{} for {:?}",
			ticket.seq, ticket.communities
		);
		let result = self
			.backend
			.interactions(&ticket.resource, &ticket.communities)
			.await;
		let interactions = match result {
			Ok(interactions) => interactions,
			Err(e) => return Err((ticket, e)),
		};

		let mut inner = self.inner.borrow_mut();
		if inner.is_fresh(&ticket) {
			inner.applied_seq = ticket.seq;
			inner.store_interactions(interactions);
		} else {
			warn!(
				"gcviz: discarding stale interaction refresh #{} (applied #{})",
				ticket.seq, inner.applied_seq
			);
		}
		Ok(())
	}

	pub fn algorithms(&self) -> Vec<Algorithm> {
		self.inner.borrow().algorithms.clone()
	}

	pub fn algorithm(&self) -> String {
		self.inner.borrow().algorithm.clone()
	}

	pub fn partition_len(&self) -> usize {
		self.inner.borrow().partition.len()
	}

	pub fn community_sizes(&self) -> Vec<usize> {
		self.inner.borrow().partition.iter().map(Community::len).collect()
	}

	/// Every community of the partition with its gradient color.
	pub fn community_summaries(&self) -> Vec<CommunitySummary> {
		let sizes = self.community_sizes();
		sizes
			.iter()
			.zip(size_gradient(&sizes))
			.enumerate()
			.map(|(index, (&size, color))| CommunitySummary { index, size, color })
			.collect()
	}

	pub fn active_communities(&self) -> Vec<usize> {
		self.inner.borrow().active.clone()
	}

	pub fn is_active(&self, index: usize) -> bool {
		self.inner.borrow().active.contains(&index)
	}

	pub fn interactions(&self) -> Vec<Interaction> {
		self.inner.borrow().interactions.clone()
	}

	/// Style of an active community; `None` when `index` is not displayed.
	pub fn style_for(&self, index: usize) -> Option<CommunityStyle> {
		self.inner.borrow().styles.get(&index).cloned()
	}

	/// Styles of all active communities, in activation order.
	pub fn all_styles(&self) -> Vec<CommunityStyle> {
		let inner = self.inner.borrow();
		inner
			.active
			.iter()
			.filter_map(|index| inner.styles.get(index).cloned())
			.collect()
	}

	pub fn legend(&self) -> Vec<LegendEntry> {
		self.all_styles()
			.into_iter()
			.map(|style| LegendEntry {
				index: style.index,
				color: style.color,
			})
			.collect()
	}

	/// Nodes of every active community, followed by intercluster edges.
	///
	/// With a single community nodes stay untagged and no synthetic edges are
	/// emitted; the base stylesheet covers everything.
	pub fn render_elements(&self) -> Vec<Element> {
		let inner = self.inner.borrow();
		let multi = inner.active.len() > 1;
		let mut elements = Vec::new();

		for index in &inner.active {
			let Some(community) = inner.partition.get(*index) else {
				continue;
			};
			let class = multi
				.then(|| inner.styles.get(index).map(|s| s.class.as_str()))
				.flatten();
			elements.extend(
				community
					.elements
					.iter()
					.map(|e| Element::from_partition(e, class)),
			);
		}

		if multi {
			elements.extend(
				inner
					.interactions
					.iter()
					.flat_map(|i| i.edges.iter())
					.map(|(source, target)| Element::intercluster(source, target)),
			);
		}
		elements
	}
}
