//! Rebuild orchestration for the single live bar session.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::session::controller::{self, BarController};
use crate::session::nav_buttons::NavButtonController;
use crate::session::policy::{EnvSnapshot, SessionFactory};
use crate::session::BarSession;
use crate::shell::ShellEnv;
use crate::types::{BarStatus, DisplayChange, DisplayInfo, NavMode, UiStateFlags};

/// Display-change subset that invalidates the session; changes outside it
/// never trigger a rebuild.
const WATCHED_CHANGES: DisplayChange = DisplayChange::ACTIVE_SCREEN
	.union(DisplayChange::DENSITY)
	.union(DisplayChange::SUPPORTED_BOUNDS);

/// Sole authority that creates and destroys bar sessions.
///
/// Every signal entry point funnels into the same destroy-then-decide-then-
/// create sequence, so at most one session is ever alive and existence is
/// always recomputed from scratch instead of patched.
///
/// All methods take `&mut self` and run synchronously; callers are expected
/// to serialize access (see [`crate::service`] for the single-task
/// confinement most hosts want).
pub struct BarManager {
	env: ShellEnv,
	factory: SessionFactory,
	session: Option<BarSession>,
	controller: Option<Arc<dyn BarController>>,
	/// Cached so state can be replayed whenever the session is recreated;
	/// the manager outlives every session it builds.
	ui_state: UiStateFlags,
	unlocked: bool,
}

impl BarManager {
	/// Creates the manager and runs the initial reconciliation pass. A
	/// session may come up immediately, depending on the environment.
	pub fn new(env: ShellEnv) -> Self {
		let nav_buttons = Arc::new(NavButtonController::new());
		let factory = SessionFactory::new(env.clone(), nav_buttons);
		let mut manager = Self {
			env,
			factory,
			session: None,
			controller: None,
			ui_state: UiStateFlags::empty(),
			unlocked: false,
		};
		manager.recreate_session();
		manager
	}

	pub fn has_session(&self) -> bool {
		self.session.is_some()
	}

	pub fn session(&self) -> Option<&BarSession> {
		self.session.as_ref()
	}

	pub fn is_unlocked(&self) -> bool {
		self.unlocked
	}

	/// Last UI-state flags received from the compositor.
	pub fn ui_state(&self) -> UiStateFlags {
		self.ui_state
	}

	/// Any navigation-mode transition invalidates the session.
	pub fn on_nav_mode_changed(&mut self, mode: NavMode) {
		debug!(target = "bar.manager", ?mode, "navigation mode changed");
		self.recreate_session();
	}

	/// Rebuilds only when the change touches the watched subset; everything
	/// else is a logged no-op. This filters, it does not coalesce: every
	/// qualifying notification rebuilds individually.
	pub fn on_display_changed(&mut self, info: &DisplayInfo, change: DisplayChange) {
		if !change.intersects(WATCHED_CHANGES) {
			debug!(
				target = "bar.manager",
				display_id = info.display_id,
				?change,
				"display change outside watched subset; ignoring"
			);
			return;
		}
		debug!(
			target = "bar.manager",
			display_id = info.display_id,
			?change,
			"display configuration changed"
		);
		self.recreate_session();
	}

	/// Marks the user unlocked (monotonic; repeats are harmless) and
	/// reconciles, since the profile becomes derivable from here on.
	pub fn on_user_unlocked(&mut self) {
		self.unlocked = true;
		self.recreate_session();
	}

	/// Stores the host-window controller and attaches it to the live
	/// session immediately when one exists; otherwise attachment happens on
	/// the next successful rebuild. Overwrites any previously set one.
	pub fn set_controller(&mut self, controller: Arc<dyn BarController>) {
		if let Some(session) = &mut self.session {
			session.attach_controller(Arc::clone(&controller));
		}
		self.controller = Some(controller);
	}

	/// Clears the stored controller only when `controller` is the identical
	/// one currently stored; a stale caller that lost the slot to someone
	/// else is ignored. On a real clear with a live session, the no-op
	/// default takes its place.
	pub fn clear_controller(&mut self, controller: &Arc<dyn BarController>) {
		let matches = self
			.controller
			.as_ref()
			.is_some_and(|held| Arc::ptr_eq(held, controller));
		if !matches {
			debug!(target = "bar.manager", "controller clear from non-owner; ignoring");
			return;
		}
		self.controller = None;
		if let Some(session) = &mut self.session {
			session.detach_controller();
		}
	}

	/// Caches the compositor UI-state flags and pushes them to the live
	/// session, letting it skip redundant values. The cache is what gets
	/// replayed, force-pushed, into every new session.
	pub fn on_ui_state_changed(&mut self, flags: UiStateFlags) {
		self.ui_state = flags;
		if let Some(session) = &mut self.session {
			session.apply_ui_state(flags, false);
		}
	}

	/// Forwarded to the live session; dropped (never buffered) otherwise.
	pub fn on_rotation_proposal(&mut self, rotation: i32, valid: bool) {
		if let Some(session) = &self.session {
			session.on_rotation_proposal(rotation, valid);
		}
	}

	/// Forwarded to the live session; dropped (never buffered) otherwise.
	pub fn disable_nav_bar_elements(&mut self, display_id: u32, state1: i32, state2: i32, animate: bool) {
		if let Some(session) = &self.session {
			session.disable_nav_bar_elements(display_id, state1, state2, animate);
		}
	}

	/// Forwarded to the live session; dropped (never buffered) otherwise.
	pub fn on_system_bar_attributes_changed(&mut self, display_id: u32, behavior: i32) {
		if let Some(session) = &mut self.session {
			session.on_system_bar_attributes_changed(display_id, behavior);
		}
	}

	/// The one rebuild path: destroy the old session unconditionally, then
	/// decide from a fresh snapshot whether a new one should exist, then
	/// create and resynchronize it.
	fn recreate_session(&mut self) {
		if let Some(session) = self.session.take() {
			session.destroy();
		}

		let snapshot = EnvSnapshot::capture(&self.env, self.unlocked);
		let Some(profile) = snapshot.eligible_profile() else {
			debug!(
				target = "bar.manager",
				unlocked = self.unlocked,
				enabled = snapshot.taskbar_enabled,
				profile_present = snapshot.profile.is_some(),
				"no session for current environment"
			);
			self.env.compositor.bar_status_changed(BarStatus::hidden());
			return;
		};

		match self.factory.create(profile) {
			Ok(mut session) => {
				session.init();
				let controller = self.controller.clone().unwrap_or_else(controller::noop);
				session.attach_controller(controller);
				// Forced replay: the new session's views must resync even
				// when the cached value looks redundant.
				session.apply_ui_state(self.ui_state, true);
				info!(
					target = "bar.manager",
					display_id = profile.display_id,
					"bar session created"
				);
				self.session = Some(session);
			}
			Err(err) => {
				warn!(
					target = "bar.manager",
					error = %err,
					"session assembly failed; staying sessionless"
				);
				self.env.compositor.bar_status_changed(BarStatus::hidden());
			}
		}
	}

	/// Tears down the manager: destroys any live session. Consuming `self`
	/// makes a double teardown unrepresentable.
	pub fn shutdown(mut self) {
		if let Some(session) = self.session.take() {
			session.destroy();
		}
		info!(target = "bar.manager", "manager shut down");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::profile::DeviceProfile;
	use crate::shell::fake::FakeShell;

	fn ready_shell() -> FakeShell {
		let shell = FakeShell::new();
		shell.set_taskbar_enabled(true);
		shell.set_profile(Some(DeviceProfile::taskbar_capable(0, 2560, 1600, 220)));
		shell
	}

	#[test]
	fn unwatched_display_changes_keep_session_identity() {
		let shell = ready_shell();
		let mut manager = BarManager::new(shell.env());
		manager.on_user_unlocked();
		let before = manager.session().map(|s| s.info()).expect("session");

		let info = DisplayInfo { display_id: 0, width_px: 2560, height_px: 1600, density_dpi: 220 };
		manager.on_display_changed(&info, DisplayChange::ROTATION | DisplayChange::REFRESH_RATE);

		assert_eq!(manager.session().map(|s| s.info()), Some(before));
	}

	#[test]
	fn watched_display_changes_rebuild_each_time() {
		let shell = ready_shell();
		let mut manager = BarManager::new(shell.env());
		manager.on_user_unlocked();
		let first = manager.session().map(|s| s.info()).expect("session");

		let info = DisplayInfo { display_id: 0, width_px: 2560, height_px: 1600, density_dpi: 220 };
		manager.on_display_changed(&info, DisplayChange::DENSITY);
		let second = manager.session().map(|s| s.info()).expect("session after rebuild");

		assert_ne!(first.surface_id, second.surface_id);
	}

	#[test]
	fn surface_failure_degrades_to_sessionless() {
		let shell = ready_shell();
		let mut manager = BarManager::new(shell.env());

		shell.fail_next_acquire();
		shell.clear_notifications();
		manager.on_user_unlocked();

		assert!(!manager.has_session());
		assert_eq!(shell.notifications(), vec![BarStatus::hidden()]);

		// The next qualifying signal recovers on its own.
		manager.on_nav_mode_changed(NavMode::Gestural);
		assert!(manager.has_session());
	}

	#[test]
	fn ui_state_is_cached_while_sessionless() {
		let shell = ready_shell();
		let mut manager = BarManager::new(shell.env());

		manager.on_ui_state_changed(UiStateFlags::IME_VISIBLE);
		assert_eq!(manager.ui_state(), UiStateFlags::IME_VISIBLE);
		assert!(!manager.has_session());

		manager.on_user_unlocked();
		let session = manager.session().expect("session");
		assert_eq!(session.ui_state(), UiStateFlags::IME_VISIBLE);
	}

	#[test]
	fn shutdown_releases_the_surface() {
		let shell = ready_shell();
		let mut manager = BarManager::new(shell.env());
		manager.on_user_unlocked();
		assert_eq!(shell.live_surfaces(), 1);

		manager.shutdown();
		assert_eq!(shell.live_surfaces(), 0);
	}
}
