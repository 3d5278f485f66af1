//! Navigation-button state shared across session rebuilds.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

/// Per-display nav-bar disable state delivered by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavBarDisableState {
	pub state1: i32,
	pub state2: i32,
}

/// Last rotation proposal relayed by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationProposal {
	pub rotation: i32,
}

/// Nav-button coordination state.
///
/// Created once per manager and handed to every session it builds, so
/// button state is not tied to any single session's lifetime.
#[derive(Debug, Default)]
pub struct NavButtonController {
	state: Mutex<NavButtonState>,
}

#[derive(Debug, Default)]
struct NavButtonState {
	disabled: HashMap<u32, NavBarDisableState>,
	rotation: Option<RotationProposal>,
}

impl NavButtonController {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records disable flags for `display_id`.
	pub fn set_disable_state(&self, display_id: u32, state: NavBarDisableState, animate: bool) {
		debug!(
			target = "bar.session",
			display_id,
			state1 = state.state1,
			state2 = state.state2,
			animate,
			"nav-bar disable state updated"
		);
		self.state.lock().disabled.insert(display_id, state);
	}

	/// Current disable flags for `display_id`.
	pub fn disable_state(&self, display_id: u32) -> NavBarDisableState {
		self.state.lock().disabled.get(&display_id).copied().unwrap_or_default()
	}

	/// Stores a rotation proposal, or clears the pending one when the shell
	/// marks it invalid.
	pub fn set_rotation_proposal(&self, rotation: i32, valid: bool) {
		let mut state = self.state.lock();
		state.rotation = valid.then_some(RotationProposal { rotation });
	}

	/// Pending rotation proposal, if the last one was valid.
	pub fn rotation_proposal(&self) -> Option<RotationProposal> {
		self.state.lock().rotation
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn disable_state_is_tracked_per_display() {
		let buttons = NavButtonController::new();
		buttons.set_disable_state(0, NavBarDisableState { state1: 1, state2: 2 }, false);
		buttons.set_disable_state(1, NavBarDisableState { state1: 4, state2: 0 }, true);

		assert_eq!(buttons.disable_state(0).state1, 1);
		assert_eq!(buttons.disable_state(1).state1, 4);
		assert_eq!(buttons.disable_state(7), NavBarDisableState::default());
	}

	#[test]
	fn invalid_rotation_proposal_clears_pending_one() {
		let buttons = NavButtonController::new();
		buttons.set_rotation_proposal(90, true);
		assert_eq!(buttons.rotation_proposal(), Some(RotationProposal { rotation: 90 }));

		buttons.set_rotation_proposal(180, false);
		assert_eq!(buttons.rotation_proposal(), None);
	}
}
