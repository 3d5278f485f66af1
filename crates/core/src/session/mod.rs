//! Bar session lifecycle and UI-state routing.

pub mod controller;
pub mod nav_buttons;
pub mod policy;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::profile::DeviceProfile;
use crate::shell::{CompositorLink, SurfaceHandle};
use crate::types::{BarStatus, UiStateFlags};

use controller::{BarController, BarSessionInfo};
use nav_buttons::{NavBarDisableState, NavButtonController};

/// One live taskbar instance bound to a rendering surface.
///
/// Sessions move through `Created → Initialized → Destroyed`, linearly.
/// They are never reused across rebuilds: an environment change destroys
/// the current instance and creates a fresh one.
pub struct BarSession {
	surface: SurfaceHandle,
	profile: DeviceProfile,
	nav_buttons: Arc<NavButtonController>,
	compositor: Arc<dyn CompositorLink>,
	controller: Arc<dyn BarController>,
	ui_state: UiStateFlags,
	reported: Option<BarStatus>,
	bar_behavior: i32,
	initialized: bool,
}

impl BarSession {
	pub(crate) fn new(
		surface: SurfaceHandle,
		profile: DeviceProfile,
		nav_buttons: Arc<NavButtonController>,
		compositor: Arc<dyn CompositorLink>,
	) -> Self {
		Self {
			surface,
			profile,
			nav_buttons,
			compositor,
			controller: controller::noop(),
			ui_state: UiStateFlags::empty(),
			reported: None,
			bar_behavior: 0,
			initialized: false,
		}
	}

	/// Marks the session live. Must be called exactly once after
	/// construction, before any other operation; the first downstream push
	/// comes from the manager's forced status replay right after.
	pub fn init(&mut self) {
		if self.initialized {
			warn!(target = "bar.session", surface = self.surface.id(), "init called twice; ignoring");
			return;
		}
		self.initialized = true;
		debug!(
			target = "bar.session",
			display_id = self.profile.display_id,
			surface = self.surface.id(),
			"session initialized"
		);
	}

	pub fn is_initialized(&self) -> bool {
		self.initialized
	}

	/// Identity handed to controllers on attach.
	pub fn info(&self) -> BarSessionInfo {
		BarSessionInfo {
			display_id: self.profile.display_id,
			surface_id: self.surface.id(),
		}
	}

	pub fn profile(&self) -> &DeviceProfile {
		&self.profile
	}

	pub fn ui_state(&self) -> UiStateFlags {
		self.ui_state
	}

	/// Last status pushed to the compositor by this session.
	pub fn reported_status(&self) -> Option<BarStatus> {
		self.reported
	}

	/// Applies a compositor UI-state update.
	///
	/// `force` bypasses the redundant-value check and unconditionally pushes
	/// the derived status downstream; it changes nothing else.
	pub fn apply_ui_state(&mut self, flags: UiStateFlags, force: bool) {
		if !self.initialized {
			warn!(target = "bar.session", "ui-state update before init; ignoring");
			return;
		}
		if !force && flags == self.ui_state {
			debug!(target = "bar.session", state = ?flags, "ui state unchanged; skipping");
			return;
		}
		self.ui_state = flags;
		let status = self.derive_status();
		if force || self.reported != Some(status) {
			debug!(
				target = "bar.session",
				visible = status.visible,
				stashed = status.stashed,
				forced = force,
				"reporting bar status"
			);
			self.compositor.bar_status_changed(status);
			self.reported = Some(status);
		}
	}

	fn derive_status(&self) -> BarStatus {
		BarStatus {
			visible: !self.ui_state.contains(UiStateFlags::SCREEN_LOCKED),
			stashed: self
				.ui_state
				.intersects(UiStateFlags::IME_VISIBLE | UiStateFlags::IMMERSIVE_FULLSCREEN),
		}
	}

	/// Swaps the attached controller, detaching the previous one first.
	pub fn attach_controller(&mut self, controller: Arc<dyn BarController>) {
		self.controller.on_detached();
		controller.on_attached(self.info());
		self.controller = controller;
	}

	/// Replaces the attached controller with the no-op default.
	pub fn detach_controller(&mut self) {
		self.attach_controller(controller::noop());
	}

	/// Relays a rotation proposal into the shared nav-button state.
	pub fn on_rotation_proposal(&self, rotation: i32, valid: bool) {
		self.nav_buttons.set_rotation_proposal(rotation, valid);
	}

	/// Relays nav-bar disable flags into the shared nav-button state.
	pub fn disable_nav_bar_elements(&self, display_id: u32, state1: i32, state2: i32, animate: bool) {
		self.nav_buttons
			.set_disable_state(display_id, NavBarDisableState { state1, state2 }, animate);
	}

	/// Records the system-bar behavior for this session's display; updates
	/// for other displays are ignored.
	pub fn on_system_bar_attributes_changed(&mut self, display_id: u32, behavior: i32) {
		if display_id != self.profile.display_id {
			debug!(
				target = "bar.session",
				display_id,
				own_display = self.profile.display_id,
				"system-bar attributes for another display; ignoring"
			);
			return;
		}
		self.bar_behavior = behavior;
	}

	pub fn bar_behavior(&self) -> i32 {
		self.bar_behavior
	}

	/// Tears the session down: detaches the controller and releases the
	/// surface. Terminal; consuming `self` makes post-destroy calls
	/// unrepresentable.
	pub fn destroy(self) {
		self.controller.on_detached();
		debug!(
			target = "bar.session",
			display_id = self.profile.display_id,
			surface = self.surface.id(),
			"session destroyed"
		);
	}
}
