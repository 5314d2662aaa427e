//! Wire types returned by the community-detection service.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Identifier of a graph element.
///
/// The service emits gene ids as JSON integers and edge ids as `"u-v"` strings,
/// so both forms are normalised to their string representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

impl From<u64> for NodeId {
	fn from(n: u64) -> Self {
		Self(n.to_string())
	}
}

impl Serialize for NodeId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for NodeId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct IdVisitor;

		impl Visitor<'_> for IdVisitor {
			type Value = NodeId;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a string or integer identifier")
			}

			fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeId, E> {
				Ok(NodeId(v.to_string()))
			}

			fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeId, E> {
				Ok(NodeId(v.to_string()))
			}

			fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeId, E> {
				Ok(NodeId(v.to_string()))
			}
		}

		deserializer.deserialize_any(IdVisitor)
	}
}

/// One entry of the algorithm catalog (`GET /api/algorithms`).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Algorithm {
	/// Human-readable name, e.g. "Louvain".
	pub name: String,
	/// Identifier used in partition and interaction URLs.
	pub resource: String,
	/// Modularity of the partition the algorithm produced, when reported.
	#[serde(default)]
	pub modularity: Option<f64>,
}

/// Payload of a partition element: a gene node or an intra-community edge.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ElementData {
	pub id: NodeId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<NodeId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target: Option<NodeId>,
	/// Remaining attributes (gene symbol and anything else the service adds).
	#[serde(flatten)]
	pub attributes: Map<String, Value>,
}

/// A graph element descriptor as stored in a partition.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphElement {
	pub data: ElementData,
}

impl GraphElement {
	pub fn node(id: impl Into<NodeId>) -> Self {
		Self {
			data: ElementData {
				id: id.into(),
				source: None,
				target: None,
				attributes: Map::new(),
			},
		}
	}

	pub fn edge(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
		let (source, target) = (source.into(), target.into());
		Self {
			data: ElementData {
				id: NodeId(format!("{source}-{target}")),
				source: Some(source),
				target: Some(target),
				attributes: Map::new(),
			},
		}
	}

	/// Elements with both endpoints are edges; everything else is a node.
	pub fn is_edge(&self) -> bool {
		self.data.source.is_some() && self.data.target.is_some()
	}

	/// Gene symbol, if the service attached one.
	pub fn symbol(&self) -> Option<&str> {
		self.data.attributes.get("symbol").and_then(Value::as_str)
	}
}

/// A cluster of genes, with the edges internal to it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Community {
	pub elements: Vec<GraphElement>,
}

impl Community {
	/// Total element count; this is the sort key the service also uses.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	pub fn nodes(&self) -> impl Iterator<Item = &GraphElement> {
		self.elements.iter().filter(|e| !e.is_edge())
	}
}

impl From<Vec<GraphElement>> for Community {
	fn from(elements: Vec<GraphElement>) -> Self {
		Self { elements }
	}
}

/// Cross-community edges between two communities (`c1`, `c2` are partition indexes).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Interaction {
	pub c1: usize,
	pub c2: usize,
	#[serde(default)]
	pub edges: Vec<(NodeId, NodeId)>,
}

impl Interaction {
	pub fn involves(&self, index: usize) -> bool {
		self.c1 == index || self.c2 == index
	}
}

/// Flat gene metadata returned by `GET /api/gene/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct GeneInfo {
	pub fields: Map<String, Value>,
}

impl GeneInfo {
	/// Display rows: underscores in keys become spaces, `null` becomes empty.
	pub fn rows(&self) -> Vec<(String, String)> {
		self.fields
			.iter()
			.map(|(key, value)| {
				let value = match value {
					Value::Null => String::new(),
					Value::String(s) => s.clone(),
					other => other.to_string(),
				};
				(key.replace('_', " "), value)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partition_elements_accept_integer_and_string_ids() {
		let json = r#"[
			{"data": {"id": 7157, "symbol": "TP53"}},
			{"data": {"id": "7157-672", "source": 7157, "target": 672}}
		]"#;
		let community: Community = serde_json::from_str(json).unwrap();

		assert_eq!(community.len(), 2);
		assert_eq!(community.elements[0].data.id, NodeId::from("7157"));
		assert_eq!(community.elements[0].symbol(), Some("TP53"));
		assert!(!community.elements[0].is_edge());
		assert!(community.elements[1].is_edge());
		assert_eq!(community.elements[1].data.source, Some(NodeId::from(7157u64)));
		assert_eq!(community.nodes().count(), 1);
	}

	#[test]
	fn interaction_edges_decode_from_nested_arrays() {
		let json = r#"{"c1": 3, "c2": 4, "edges": [[1, 2], ["5", 6]]}"#;
		let interaction: Interaction = serde_json::from_str(json).unwrap();

		assert_eq!(interaction.edges.len(), 2);
		assert_eq!(interaction.edges[1], (NodeId::from("5"), NodeId::from(6u64)));
		assert!(interaction.involves(3));
		assert!(!interaction.involves(1));
	}

	#[test]
	fn algorithm_modularity_is_optional() {
		let json = r#"[{"name": "Louvain", "modularity": 0.688, "resource": "lvn"},
			{"name": "Custom", "resource": "x"}]"#;
		let algorithms: Vec<Algorithm> = serde_json::from_str(json).unwrap();

		assert_eq!(algorithms[0].modularity, Some(0.688));
		assert_eq!(algorithms[1].modularity, None);
	}

	#[test]
	fn gene_rows_format_keys_and_nulls() {
		let info: GeneInfo = serde_json::from_str(
			r#"{"map_location": "17p13.1", "alias": null, "Entrez ID": "7157"}"#,
		)
		.unwrap();
		let rows = info.rows();

		assert!(rows.contains(&("map location".to_string(), "17p13.1".to_string())));
		assert!(rows.contains(&("alias".to_string(), String::new())));
		assert!(rows.contains(&("Entrez ID".to_string(), "7157".to_string())));
	}

	#[test]
	fn edge_builder_joins_endpoint_ids() {
		let edge = GraphElement::edge("1", "2");
		assert_eq!(edge.data.id.as_str(), "1-2");
	}
}
