//! In-memory graph model: nodes, topics, links and connections.
//!
//! This is the single source of truth for everything that gets serialized.
//! The rendering layer looks entities up by id and never owns value data, so
//! deleting here can never leave a visual pointing at live state.

use super::markup::Markup;

/// Hard cap on hyperlinks attached to a single topic.
pub const MAX_LINKS_PER_TOPIC: usize = 10;

/// Footprint used when placing a fresh node on the view center.
pub const DEFAULT_NODE_WIDTH: f64 = 250.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 120.0;

/// Resize floor, in logical units.
pub const MIN_NODE_WIDTH: f64 = 150.0;
pub const MIN_NODE_HEIGHT: f64 = 80.0;

/// Stable identifier for a topic, unique within the current map session.
///
/// The DOM layer derives element ids from this instead of holding a
/// reference to the topic record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TopicId(u64);

impl TopicId {
	pub fn dom_id(&self) -> String {
		format!("topic-{}", self.0)
	}
}

/// A hyperlink attached to a topic. Immutable once added, removable only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
	pub title: String,
	pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Topic {
	pub id: TopicId,
	pub text: Markup,
	pub links: Vec<Link>,
}

/// A draggable box on the canvas. Position and size are logical-canvas
/// pixels; `width`/`height` of `None` means the box auto-sizes to content.
#[derive(Clone, Debug, PartialEq)]
pub struct MapNode {
	pub id: String,
	pub left: f64,
	pub top: f64,
	pub width: Option<f64>,
	pub height: Option<f64>,
	pub topics: Vec<Topic>,
}

/// An undirected edge between two nodes. `from`/`to` order is preserved for
/// the wire but carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
	pub from: String,
	pub to: String,
}

impl Connection {
	/// Symmetric endpoint match.
	pub fn joins(&self, a: &str, b: &str) -> bool {
		(self.from == a && self.to == b) || (self.from == b && self.to == a)
	}

	pub fn touches(&self, id: &str) -> bool {
		self.from == id || self.to == id
	}
}

/// Result of committing edited topic text, so callers can react to the
/// cascade (empty text deletes the topic, an emptied node is deleted too).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextCommit {
	Kept,
	TopicRemoved,
	NodeRemoved,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MindMap {
	pub nodes: Vec<MapNode>,
	pub connections: Vec<Connection>,
	node_counter: u64,
	topic_counter: u64,
}

impl MindMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Next node id suffix that `add_node` would allocate.
	pub fn node_counter(&self) -> u64 {
		self.node_counter
	}

	pub fn node(&self, id: &str) -> Option<&MapNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut MapNode> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	pub fn topic(&self, id: TopicId) -> Option<&Topic> {
		self.nodes
			.iter()
			.flat_map(|n| n.topics.iter())
			.find(|t| t.id == id)
	}

	pub fn topic_mut(&mut self, id: TopicId) -> Option<&mut Topic> {
		self.nodes
			.iter_mut()
			.flat_map(|n| n.topics.iter_mut())
			.find(|t| t.id == id)
	}

	pub fn node_of_topic(&self, id: TopicId) -> Option<&MapNode> {
		self.nodes.iter().find(|n| n.topics.iter().any(|t| t.id == id))
	}

	/// Allocates the next `node-<n>` id and inserts an empty node there.
	pub fn add_node(&mut self, left: f64, top: f64) -> String {
		let id = format!("node-{}", self.node_counter);
		self.node_counter += 1;
		self.nodes.push(MapNode {
			id: id.clone(),
			left,
			top,
			width: None,
			height: None,
			topics: Vec::new(),
		});
		id
	}

	/// Appends a topic to a node and returns its id for immediate editing.
	pub fn add_topic(&mut self, node_id: &str, text: Markup) -> Option<TopicId> {
		let id = TopicId(self.topic_counter);
		let node = self.node_mut(node_id)?;
		node.topics.push(Topic {
			id,
			text,
			links: Vec::new(),
		});
		self.topic_counter += 1;
		Some(id)
	}

	/// Stores edited topic text, cascading deletion when the text is empty.
	pub fn commit_topic_text(&mut self, id: TopicId, text: Markup) -> TextCommit {
		let Some(node) = self
			.nodes
			.iter_mut()
			.find(|n| n.topics.iter().any(|t| t.id == id))
		else {
			return TextCommit::Kept;
		};
		if !text.is_empty() {
			if let Some(topic) = node.topics.iter_mut().find(|t| t.id == id) {
				topic.text = text;
			}
			return TextCommit::Kept;
		}
		node.topics.retain(|t| t.id != id);
		if node.topics.is_empty() {
			let node_id = node.id.clone();
			self.remove_node(&node_id);
			TextCommit::NodeRemoved
		} else {
			TextCommit::TopicRemoved
		}
	}

	/// Replaces a topic's link list, enforcing the per-topic cap.
	pub fn set_topic_links(&mut self, id: TopicId, mut links: Vec<Link>) {
		links.truncate(MAX_LINKS_PER_TOPIC);
		if let Some(topic) = self.topic_mut(id) {
			topic.links = links;
		}
	}

	/// Removes a node and every connection that touches it.
	pub fn remove_node(&mut self, id: &str) -> bool {
		let before = self.nodes.len();
		self.nodes.retain(|n| n.id != id);
		self.remove_connections_for(id);
		self.nodes.len() != before
	}

	pub fn remove_connections_for(&mut self, id: &str) {
		self.connections.retain(|c| !c.touches(id));
	}

	/// Adds a connection unless it would self-link, duplicate an existing
	/// pair (in either direction) or reference a missing node. Returns
	/// whether a connection was added.
	pub fn add_connection(&mut self, from: &str, to: &str) -> bool {
		if from == to
			|| self.node(from).is_none()
			|| self.node(to).is_none()
			|| self.connections.iter().any(|c| c.joins(from, to))
		{
			return false;
		}
		self.connections.push(Connection {
			from: from.to_string(),
			to: to.to_string(),
		});
		true
	}

	pub fn set_position(&mut self, id: &str, left: f64, top: f64) {
		if let Some(node) = self.node_mut(id) {
			node.left = left;
			node.top = top;
		}
	}

	pub fn set_size(&mut self, id: &str, width: f64, height: f64) {
		if let Some(node) = self.node_mut(id) {
			node.width = Some(width);
			node.height = Some(height);
		}
	}

	/// Re-inserts a node from a stored snapshot, keeping its id and bumping
	/// the counter past it so later `add_node` calls never collide.
	pub fn restore_node(
		&mut self,
		id: String,
		left: f64,
		top: f64,
		width: Option<f64>,
		height: Option<f64>,
		topics: Vec<(Markup, Vec<Link>)>,
	) {
		if let Some(n) = node_id_suffix(&id) {
			if n >= self.node_counter {
				self.node_counter = n + 1;
			}
		}
		let topics = topics
			.into_iter()
			.map(|(text, mut links)| {
				links.truncate(MAX_LINKS_PER_TOPIC);
				let id = TopicId(self.topic_counter);
				self.topic_counter += 1;
				Topic { id, text, links }
			})
			.collect();
		self.nodes.push(MapNode {
			id,
			left,
			top,
			width,
			height,
			topics,
		});
	}

	/// Re-inserts a stored connection, dropping anything that violates the
	/// endpoint-existence invariant instead of propagating bad data.
	pub fn restore_connection(&mut self, from: &str, to: &str) -> bool {
		self.add_connection(from, to)
	}
}

/// Numeric suffix of a `node-<n>` id.
pub fn node_id_suffix(id: &str) -> Option<u64> {
	id.strip_prefix("node-")?.parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn two_node_map() -> (MindMap, String, String) {
		let mut map = MindMap::new();
		let a = map.add_node(0.0, 0.0);
		let b = map.add_node(100.0, 100.0);
		(map, a, b)
	}

	#[test]
	fn node_ids_are_monotonic() {
		let (map, a, b) = two_node_map();
		assert_eq!(a, "node-0");
		assert_eq!(b, "node-1");
		assert_eq!(map.node_counter(), 2);
	}

	#[test]
	fn removing_a_node_removes_incident_connections() {
		let (mut map, a, b) = two_node_map();
		let c = map.add_node(50.0, 50.0);
		assert!(map.add_connection(&a, &b));
		assert!(map.add_connection(&b, &c));
		assert!(map.remove_node(&a));
		assert!(map.connections.iter().all(|conn| !conn.touches(&a)));
		assert_eq!(map.connections.len(), 1);
		assert!(map.node(&b).is_some());
	}

	#[test]
	fn duplicate_detection_is_symmetric() {
		let (mut map, a, b) = two_node_map();
		assert!(map.add_connection(&a, &b));
		assert!(!map.add_connection(&b, &a));
		assert_eq!(map.connections.len(), 1);
	}

	#[test]
	fn self_connection_is_rejected() {
		let (mut map, a, _) = two_node_map();
		assert!(!map.add_connection(&a, &a));
		assert!(map.connections.is_empty());
	}

	#[test]
	fn connection_to_missing_node_is_rejected() {
		let (mut map, a, _) = two_node_map();
		assert!(!map.add_connection(&a, "node-99"));
	}

	#[test]
	fn empty_text_deletes_topic_then_node() {
		let (mut map, a, b) = two_node_map();
		let t1 = map.add_topic(&a, Markup::plain("one")).unwrap();
		let t2 = map.add_topic(&a, Markup::plain("two")).unwrap();
		map.add_connection(&a, &b);

		assert_eq!(
			map.commit_topic_text(t1, Markup::default()),
			TextCommit::TopicRemoved
		);
		assert!(map.node(&a).is_some());

		// Emptying the last topic cascades to the node and its connections.
		assert_eq!(
			map.commit_topic_text(t2, Markup::default()),
			TextCommit::NodeRemoved
		);
		assert!(map.node(&a).is_none());
		assert!(map.connections.is_empty());
	}

	#[test]
	fn non_empty_commit_keeps_topic() {
		let (mut map, a, _) = two_node_map();
		let t = map.add_topic(&a, Markup::default()).unwrap();
		assert_eq!(
			map.commit_topic_text(t, Markup::plain("idea")),
			TextCommit::Kept
		);
		assert_eq!(map.topic(t).unwrap().text.plain_text(), "idea");
	}

	#[test]
	fn link_list_never_exceeds_cap() {
		let (mut map, a, _) = two_node_map();
		let t = map.add_topic(&a, Markup::plain("x")).unwrap();
		let links = (0..20)
			.map(|i| Link {
				title: format!("link {i}"),
				url: format!("https://example.com/{i}"),
			})
			.collect();
		map.set_topic_links(t, links);
		assert_eq!(map.topic(t).unwrap().links.len(), MAX_LINKS_PER_TOPIC);
	}

	#[test]
	fn restore_bumps_counter_past_max_suffix() {
		let mut map = MindMap::new();
		map.restore_node("node-3".into(), 0.0, 0.0, None, None, vec![]);
		map.restore_node("node-7".into(), 1.0, 1.0, None, None, vec![]);
		assert_eq!(map.node_counter(), 8);
		assert_eq!(map.add_node(2.0, 2.0), "node-8");
	}

	#[test]
	fn restore_connection_drops_invalid_pairs() {
		let mut map = MindMap::new();
		map.restore_node("node-0".into(), 0.0, 0.0, None, None, vec![]);
		assert!(!map.restore_connection("node-0", "node-0"));
		assert!(!map.restore_connection("node-0", "node-9"));
		assert!(map.connections.is_empty());
	}

	#[test]
	fn topic_lookup_by_id() {
		let (mut map, a, _) = two_node_map();
		let t = map.add_topic(&a, Markup::plain("x")).unwrap();
		assert_eq!(map.node_of_topic(t).unwrap().id, a);
		assert_eq!(map.topic(t).unwrap().id, t);
	}
}
