//! Pure existence policy and session assembly.

use std::sync::Arc;

use crate::error::Result;
use crate::profile::DeviceProfile;
use crate::session::BarSession;
use crate::session::nav_buttons::NavButtonController;
use crate::shell::ShellEnv;

/// Momentary environment inputs a rebuild decision is computed from.
///
/// Captured fresh on every rebuild request and never stored.
#[derive(Debug, Clone)]
pub struct EnvSnapshot {
	/// Profile for the display the bar would attach to; absent while the
	/// user has not unlocked or no profile can be derived.
	pub profile: Option<DeviceProfile>,
	/// Whether the taskbar feature is enabled at all.
	pub taskbar_enabled: bool,
}

impl EnvSnapshot {
	/// Captures the current environment. The profile is treated as absent
	/// until the user unlocks.
	pub fn capture(env: &ShellEnv, unlocked: bool) -> Self {
		let profile = if unlocked { env.profiles.current_profile() } else { None };
		Self {
			profile,
			taskbar_enabled: env.features.taskbar_enabled(),
		}
	}

	/// Returns the profile a session may attach to, or `None` when the
	/// existence policy rejects this snapshot.
	pub fn eligible_profile(&self) -> Option<&DeviceProfile> {
		if !self.taskbar_enabled {
			return None;
		}
		self.profile.as_ref().filter(|profile| profile.taskbar_allowed)
	}
}

/// Whether a session should exist for `snapshot`.
///
/// Pure over the snapshot: the feature is enabled AND a profile is present
/// AND that profile declares taskbar support.
pub fn session_should_exist(snapshot: &EnvSnapshot) -> bool {
	snapshot.eligible_profile().is_some()
}

/// Assembles sessions for snapshots the policy approved.
pub struct SessionFactory {
	env: ShellEnv,
	nav_buttons: Arc<NavButtonController>,
}

impl SessionFactory {
	pub(crate) fn new(env: ShellEnv, nav_buttons: Arc<NavButtonController>) -> Self {
		Self { env, nav_buttons }
	}

	/// Acquires a surface for the profile's display and assembles a new
	/// session around a copy of the profile.
	pub fn create(&self, profile: &DeviceProfile) -> Result<BarSession> {
		let surface = self.env.surfaces.acquire(profile.display_id)?;
		Ok(BarSession::new(
			surface,
			profile.clone(),
			Arc::clone(&self.nav_buttons),
			Arc::clone(&self.env.compositor),
		))
	}
}
