//! Device profile snapshot consumed by the existence policy.

use serde::{Deserialize, Serialize};

/// Momentary description of the display the taskbar would attach to.
///
/// Profiles are produced by the injected [`ProfileSource`] and copied into
/// each session at creation; a session never shares the source's instance.
///
/// [`ProfileSource`]: crate::shell::ProfileSource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
	pub display_id: u32,
	pub width_px: u32,
	pub height_px: u32,
	pub density_dpi: u32,
	/// Whether this profile declares taskbar support at all.
	pub taskbar_allowed: bool,
}

impl DeviceProfile {
	/// Convenience constructor for a taskbar-capable profile.
	pub fn taskbar_capable(display_id: u32, width_px: u32, height_px: u32, density_dpi: u32) -> Self {
		Self {
			display_id,
			width_px,
			height_px,
			density_dpi,
			taskbar_allowed: true,
		}
	}
}
