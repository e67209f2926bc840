//! Wire documents exchanged with the persistence API and their conversions
//! to and from the in-memory model.
//!
//! Positions travel as CSS length strings (`"120px"`), matching what the
//! backend has always stored. Earlier schema revisions stored topics as bare
//! strings; reads accept both forms and normalize to `{ text, links }`.

use serde::{Deserialize, Serialize};

use super::markup::Markup;
use super::model::{Link, MindMap};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireLink {
	pub title: String,
	pub url: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct WireTopic {
	pub text: String,
	#[serde(default)]
	pub links: Vec<WireLink>,
}

impl<'de> Deserialize<'de> for WireTopic {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Full {
				text: String,
				#[serde(default)]
				links: Vec<WireLink>,
			},
			// Legacy schema stored the topic as its text alone.
			Text(String),
		}
		Ok(match Raw::deserialize(deserializer)? {
			Raw::Full { text, links } => WireTopic { text, links },
			Raw::Text(text) => WireTopic {
				text,
				links: Vec::new(),
			},
		})
	}
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WireNode {
	pub id: String,
	pub left: String,
	pub top: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub height: Option<String>,
	#[serde(default)]
	pub topics: Vec<WireTopic>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireConnection {
	pub from: String,
	pub to: String,
}

/// A stored map document as the API returns it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapDoc {
	#[serde(rename = "_id")]
	pub id: String,
	#[serde(default)]
	pub user: Option<String>,
	pub title: String,
	#[serde(default)]
	pub nodes: Vec<WireNode>,
	#[serde(default)]
	pub connections: Vec<WireConnection>,
	#[serde(rename = "createdAt", default)]
	pub created_at: Option<String>,
}

/// `POST /maps` body. `id` is absent until the first save assigns one.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SaveMapRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub title: String,
	pub nodes: Vec<WireNode>,
	pub connections: Vec<WireConnection>,
}

fn css_px(value: f64) -> String {
	format!("{value}px")
}

/// Parses a CSS length like `"120px"`. Empty or malformed lengths (legacy
/// documents saved `""` for auto-sized boxes) yield `None`.
fn parse_px(value: &str) -> Option<f64> {
	let trimmed = value.trim();
	let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
	number.parse().ok()
}

/// Structural snapshot of the model; only `from`/`to` survive per
/// connection, transient visual state is never serialized.
pub fn snapshot(map: &MindMap) -> (Vec<WireNode>, Vec<WireConnection>) {
	let nodes = map
		.nodes
		.iter()
		.map(|node| WireNode {
			id: node.id.clone(),
			left: css_px(node.left),
			top: css_px(node.top),
			width: node.width.map(css_px),
			height: node.height.map(css_px),
			topics: node
				.topics
				.iter()
				.map(|topic| WireTopic {
					text: topic.text.to_html(),
					links: topic
						.links
						.iter()
						.map(|l| WireLink {
							title: l.title.clone(),
							url: l.url.clone(),
						})
						.collect(),
				})
				.collect(),
		})
		.collect();
	let connections = map
		.connections
		.iter()
		.map(|c| WireConnection {
			from: c.from.clone(),
			to: c.to.clone(),
		})
		.collect();
	(nodes, connections)
}

pub fn save_request(map: &MindMap, id: Option<String>, title: String) -> SaveMapRequest {
	let (nodes, connections) = snapshot(map);
	SaveMapRequest {
		id,
		title,
		nodes,
		connections,
	}
}

/// Rebuilds the model from a stored document. The node id counter continues
/// from the maximum numeric suffix observed; connections that reference
/// missing nodes are dropped.
pub fn map_from_doc(doc: &MapDoc) -> MindMap {
	let mut map = MindMap::new();
	for node in &doc.nodes {
		let topics = node
			.topics
			.iter()
			.map(|t| {
				(
					Markup::parse_html(&t.text),
					t.links
						.iter()
						.map(|l| Link {
							title: l.title.clone(),
							url: l.url.clone(),
						})
						.collect(),
				)
			})
			.collect();
		map.restore_node(
			node.id.clone(),
			parse_px(&node.left).unwrap_or(0.0),
			parse_px(&node.top).unwrap_or(0.0),
			node.width.as_deref().and_then(parse_px),
			node.height.as_deref().and_then(parse_px),
			topics,
		);
	}
	for conn in &doc.connections {
		map.restore_connection(&conn.from, &conn.to);
	}
	map
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_map() -> MindMap {
		let mut map = MindMap::new();
		let a = map.add_node(120.0, 40.5);
		let b = map.add_node(400.0, 300.0);
		map.set_size(&b, 200.0, 120.0);
		let t = map.add_topic(&a, Markup::parse_html("<b>Idea</b>")).unwrap();
		map.set_topic_links(
			t,
			vec![Link {
				title: "docs".into(),
				url: "https://example.com".into(),
			}],
		);
		map.add_topic(&b, Markup::plain("Other")).unwrap();
		map.add_connection(&a, &b);
		map
	}

	fn doc_from(map: &MindMap, id: &str, title: &str) -> MapDoc {
		let (nodes, connections) = snapshot(map);
		MapDoc {
			id: id.into(),
			user: None,
			title: title.into(),
			nodes,
			connections,
			created_at: None,
		}
	}

	#[test]
	fn round_trip_preserves_structure() {
		let map = sample_map();
		let doc = doc_from(&map, "abc", "Trip");
		let json = serde_json::to_string(&doc).unwrap();
		let parsed: MapDoc = serde_json::from_str(&json).unwrap();
		let rebuilt = map_from_doc(&parsed);

		assert_eq!(rebuilt.nodes.len(), map.nodes.len());
		for (orig, back) in map.nodes.iter().zip(rebuilt.nodes.iter()) {
			assert_eq!(orig.id, back.id);
			assert_eq!(orig.left, back.left);
			assert_eq!(orig.top, back.top);
			assert_eq!(orig.width, back.width);
			assert_eq!(orig.height, back.height);
			assert_eq!(orig.topics.len(), back.topics.len());
			for (a, b) in orig.topics.iter().zip(back.topics.iter()) {
				assert_eq!(a.text, b.text);
				assert_eq!(a.links, b.links);
			}
		}
		assert_eq!(rebuilt.connections.len(), map.connections.len());
		for conn in &map.connections {
			assert!(
				rebuilt
					.connections
					.iter()
					.any(|c| c.joins(&conn.from, &conn.to))
			);
		}
	}

	#[test]
	fn counter_continues_after_load() {
		let map = sample_map();
		let doc = doc_from(&map, "abc", "T");
		let rebuilt = map_from_doc(&doc);
		assert_eq!(rebuilt.node_counter(), 2);
		let mut rebuilt = rebuilt;
		assert_eq!(rebuilt.add_node(0.0, 0.0), "node-2");
	}

	#[test]
	fn legacy_string_topics_normalize() {
		let json = r#"{
			"_id": "m1", "title": "Old",
			"nodes": [{ "id": "node-0", "left": "10px", "top": "20px",
			            "topics": ["plain old topic", { "text": "new style" }] }],
			"connections": []
		}"#;
		let doc: MapDoc = serde_json::from_str(json).unwrap();
		assert_eq!(doc.nodes[0].topics.len(), 2);
		assert_eq!(doc.nodes[0].topics[0].text, "plain old topic");
		assert!(doc.nodes[0].topics[0].links.is_empty());
		assert_eq!(doc.nodes[0].topics[1].text, "new style");
	}

	#[test]
	fn empty_css_lengths_mean_auto_size() {
		let json = r#"{
			"_id": "m1", "title": "T",
			"nodes": [{ "id": "node-0", "left": "10px", "top": "20px",
			            "width": "", "height": "", "topics": [] }],
			"connections": []
		}"#;
		let doc: MapDoc = serde_json::from_str(json).unwrap();
		let map = map_from_doc(&doc);
		let node = map.node("node-0").unwrap();
		assert_eq!(node.width, None);
		assert_eq!(node.height, None);
	}

	#[test]
	fn save_request_omits_absent_id() {
		// Node objects carry their own "id" keys, so check the top level only.
		let map = sample_map();
		let req = save_request(&map, None, "T".into());
		let value = serde_json::to_value(&req).unwrap();
		assert!(value.get("id").is_none());

		let req = save_request(&map, Some("abc".into()), "T".into());
		let value = serde_json::to_value(&req).unwrap();
		assert_eq!(value["id"], "abc");
	}

	#[test]
	fn unknown_fields_are_ignored() {
		let json = r#"{
			"_id": "m1", "title": "T", "user": "u1", "__v": 3,
			"nodes": [], "connections": [], "createdAt": "2024-05-01T12:00:00.000Z"
		}"#;
		let doc: MapDoc = serde_json::from_str(json).unwrap();
		assert_eq!(doc.created_at.as_deref(), Some("2024-05-01T12:00:00.000Z"));
	}

	#[test]
	fn connections_referencing_missing_nodes_are_dropped() {
		let json = r#"{
			"_id": "m1", "title": "T",
			"nodes": [{ "id": "node-0", "left": "0px", "top": "0px", "topics": [] }],
			"connections": [{ "from": "node-0", "to": "node-9" }]
		}"#;
		let doc: MapDoc = serde_json::from_str(json).unwrap();
		assert!(map_from_doc(&doc).connections.is_empty());
	}
}
