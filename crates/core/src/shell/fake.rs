//! In-memory shell for unit tests and the host harness.
//!
//! Provides a scriptable implementation of every collaborator port plus an
//! inspection surface for outbound notifications and surface lifetimes,
//! without any real display stack.
//!
//! # Example
//!
//! ```ignore
//! let shell = FakeShell::new();
//! shell.set_taskbar_enabled(true);
//! shell.set_profile(Some(DeviceProfile::taskbar_capable(0, 2560, 1600, 220)));
//!
//! let mut manager = BarManager::new(shell.env());
//! manager.on_user_unlocked();
//! assert!(manager.has_session());
//! assert_eq!(shell.live_surfaces(), 1);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::profile::DeviceProfile;
use crate::types::BarStatus;

use super::{CompositorLink, FeatureGate, ProfileSource, ShellEnv, SurfaceHandle, SurfaceProvider};

/// Scriptable in-memory shell.
///
/// Starts with the taskbar feature disabled and no profile; tests flip the
/// state they need and read back what the reconciler did.
#[derive(Clone)]
pub struct FakeShell {
	state: Arc<FakeShellState>,
}

struct FakeShellState {
	profile: Mutex<Option<DeviceProfile>>,
	taskbar_enabled: AtomicBool,
	notifications: Mutex<Vec<BarStatus>>,
	live_surfaces: Arc<AtomicU64>,
	next_surface_id: AtomicU64,
	fail_next_acquire: AtomicBool,
}

impl FakeShell {
	pub fn new() -> Self {
		Self {
			state: Arc::new(FakeShellState {
				profile: Mutex::new(None),
				taskbar_enabled: AtomicBool::new(false),
				notifications: Mutex::new(Vec::new()),
				live_surfaces: Arc::new(AtomicU64::new(0)),
				next_surface_id: AtomicU64::new(1),
				fail_next_acquire: AtomicBool::new(false),
			}),
		}
	}

	/// Builds the port aggregate consumed by the manager.
	pub fn env(&self) -> ShellEnv {
		ShellEnv {
			profiles: self.state.clone(),
			features: self.state.clone(),
			compositor: self.state.clone(),
			surfaces: self.state.clone(),
		}
	}

	/// Replaces the profile returned by the profile port.
	pub fn set_profile(&self, profile: Option<DeviceProfile>) {
		*self.state.profile.lock() = profile;
	}

	/// Flips the feature gate.
	pub fn set_taskbar_enabled(&self, enabled: bool) {
		self.state.taskbar_enabled.store(enabled, Ordering::SeqCst);
	}

	/// Makes the next surface acquisition fail.
	pub fn fail_next_acquire(&self) {
		self.state.fail_next_acquire.store(true, Ordering::SeqCst);
	}

	/// Every status notification received so far, in order.
	pub fn notifications(&self) -> Vec<BarStatus> {
		self.state.notifications.lock().clone()
	}

	/// Drops the recorded notifications.
	pub fn clear_notifications(&self) {
		self.state.notifications.lock().clear();
	}

	/// Number of surface handles currently alive.
	pub fn live_surfaces(&self) -> u64 {
		self.state.live_surfaces.load(Ordering::SeqCst)
	}
}

impl Default for FakeShell {
	fn default() -> Self {
		Self::new()
	}
}

impl ProfileSource for FakeShellState {
	fn current_profile(&self) -> Option<DeviceProfile> {
		self.profile.lock().clone()
	}
}

impl FeatureGate for FakeShellState {
	fn taskbar_enabled(&self) -> bool {
		self.taskbar_enabled.load(Ordering::SeqCst)
	}
}

impl CompositorLink for FakeShellState {
	fn bar_status_changed(&self, status: BarStatus) {
		self.notifications.lock().push(status);
	}
}

impl SurfaceProvider for FakeShellState {
	/// # Panics
	///
	/// Panics when a second surface is requested while one is still live;
	/// overlapping surfaces mean the release-before-acquire discipline was
	/// broken, which no caller can recover from.
	fn acquire(&self, display_id: u32) -> Result<SurfaceHandle> {
		if self.fail_next_acquire.swap(false, Ordering::SeqCst) {
			return Err(Error::SurfaceUnavailable {
				display_id,
				reason: "scripted failure".to_string(),
			});
		}

		let previously_live = self.live_surfaces.fetch_add(1, Ordering::SeqCst);
		assert_eq!(
			previously_live, 0,
			"surface acquired for display {display_id} while another surface is live"
		);

		let id = self.next_surface_id.fetch_add(1, Ordering::SeqCst);
		let live = Arc::clone(&self.live_surfaces);
		Ok(SurfaceHandle::new(id, move || {
			live.fetch_sub(1, Ordering::SeqCst);
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn surface_handles_release_on_drop() {
		let shell = FakeShell::new();
		let env = shell.env();

		let handle = env.surfaces.acquire(0).expect("acquire");
		assert_eq!(shell.live_surfaces(), 1);
		drop(handle);
		assert_eq!(shell.live_surfaces(), 0);

		let next = env.surfaces.acquire(0).expect("second acquire");
		assert_eq!(next.id(), 2, "surface ids are never reused");
	}

	#[test]
	fn scripted_failure_only_affects_one_acquire() {
		let shell = FakeShell::new();
		let env = shell.env();

		shell.fail_next_acquire();
		assert!(env.surfaces.acquire(0).is_err());
		assert!(env.surfaces.acquire(0).is_ok());
	}
}
