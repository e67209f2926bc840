//! Two-click "connect two nodes" interaction state.

/// At most one link can be pending; starting a new one replaces it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LinkingState {
	#[default]
	Idle,
	/// A source node is marked and the next node click picks the target.
	AwaitingTarget(String),
}

impl LinkingState {
	pub fn is_active(&self) -> bool {
		matches!(self, LinkingState::AwaitingTarget(_))
	}

	pub fn source(&self) -> Option<&str> {
		match self {
			LinkingState::AwaitingTarget(id) => Some(id),
			LinkingState::Idle => None,
		}
	}

	/// Enters linking mode from `source`, implicitly resetting any pending
	/// link from another node.
	pub fn begin(&mut self, source: String) {
		*self = LinkingState::AwaitingTarget(source);
	}

	pub fn cancel(&mut self) {
		*self = LinkingState::Idle;
	}

	/// Resolves a node click while linking. Always returns to `Idle`; yields
	/// the `(source, target)` pair to attempt unless the click landed back
	/// on the source node.
	pub fn take_target(&mut self, target: &str) -> Option<(String, String)> {
		match std::mem::take(self) {
			LinkingState::AwaitingTarget(source) if source != target => {
				Some((source, target.to_string()))
			}
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn begin_marks_source() {
		let mut s = LinkingState::default();
		assert!(!s.is_active());
		s.begin("node-1".into());
		assert!(s.is_active());
		assert_eq!(s.source(), Some("node-1"));
	}

	#[test]
	fn target_click_yields_pair_and_resets() {
		let mut s = LinkingState::default();
		s.begin("node-1".into());
		assert_eq!(
			s.take_target("node-2"),
			Some(("node-1".into(), "node-2".into()))
		);
		assert_eq!(s, LinkingState::Idle);
	}

	#[test]
	fn clicking_source_resets_without_pair() {
		let mut s = LinkingState::default();
		s.begin("node-1".into());
		assert_eq!(s.take_target("node-1"), None);
		assert_eq!(s, LinkingState::Idle);
	}

	#[test]
	fn re_entering_replaces_pending_source() {
		let mut s = LinkingState::default();
		s.begin("node-1".into());
		s.begin("node-2".into());
		assert_eq!(s.source(), Some("node-2"));
	}

	#[test]
	fn cancel_clears() {
		let mut s = LinkingState::default();
		s.begin("node-1".into());
		s.cancel();
		assert_eq!(s, LinkingState::Idle);
		assert_eq!(s.take_target("node-3"), None);
	}
}
