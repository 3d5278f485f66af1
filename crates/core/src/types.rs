//! Signal payload types shared by the manager, sessions, and shell ports.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// System navigation mode reported by the shell.
///
/// Any transition between modes invalidates the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavMode {
	ThreeButton,
	TwoButton,
	Gestural,
}

/// Bitmask describing which display properties changed in one notification.
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayChange(pub u32);

impl DisplayChange {
	/// The active screen moved to a different display.
	pub const ACTIVE_SCREEN: DisplayChange = DisplayChange(1 << 0);
	/// Logical density changed.
	pub const DENSITY: DisplayChange = DisplayChange(1 << 1);
	/// The set of supported window bounds changed.
	pub const SUPPORTED_BOUNDS: DisplayChange = DisplayChange(1 << 2);
	/// The display rotated. Not part of the watched subset.
	pub const ROTATION: DisplayChange = DisplayChange(1 << 3);
	/// The refresh rate switched. Not part of the watched subset.
	pub const REFRESH_RATE: DisplayChange = DisplayChange(1 << 4);

	/// The empty mask.
	pub const fn empty() -> Self {
		DisplayChange(0)
	}

	/// Returns the union of `self` and `other`.
	pub const fn union(self, other: Self) -> Self {
		DisplayChange(self.0 | other.0)
	}

	/// Returns `true` when `self` and `other` share any bit.
	pub const fn intersects(self, other: Self) -> bool {
		self.0 & other.0 != 0
	}

	/// Returns `true` when every bit of `other` is set in `self`.
	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	/// Returns `true` when no bit is set.
	pub const fn is_empty(self) -> bool {
		self.0 == 0
	}
}

impl BitOr for DisplayChange {
	type Output = DisplayChange;

	fn bitor(self, rhs: Self) -> Self {
		self.union(rhs)
	}
}

impl fmt::Debug for DisplayChange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "DisplayChange({:#x})", self.0)
	}
}

/// Opaque bitmask of compositor-reported UI state.
///
/// The mask is carried verbatim; only the bits below are interpreted when a
/// session derives its visible/stashed status.
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UiStateFlags(pub u32);

impl UiStateFlags {
	/// The lock screen is covering the display.
	pub const SCREEN_LOCKED: UiStateFlags = UiStateFlags(1 << 0);
	/// An input-method window is visible.
	pub const IME_VISIBLE: UiStateFlags = UiStateFlags(1 << 1);
	/// The notification shade is expanded.
	pub const SHADE_EXPANDED: UiStateFlags = UiStateFlags(1 << 2);
	/// A fullscreen app requested immersive mode.
	pub const IMMERSIVE_FULLSCREEN: UiStateFlags = UiStateFlags(1 << 3);

	/// The empty mask.
	pub const fn empty() -> Self {
		UiStateFlags(0)
	}

	/// Returns the union of `self` and `other`.
	pub const fn union(self, other: Self) -> Self {
		UiStateFlags(self.0 | other.0)
	}

	/// Returns `true` when `self` and `other` share any bit.
	pub const fn intersects(self, other: Self) -> bool {
		self.0 & other.0 != 0
	}

	/// Returns `true` when every bit of `other` is set in `self`.
	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	/// Returns `true` when no bit is set.
	pub const fn is_empty(self) -> bool {
		self.0 == 0
	}
}

impl BitOr for UiStateFlags {
	type Output = UiStateFlags;

	fn bitor(self, rhs: Self) -> Self {
		self.union(rhs)
	}
}

impl fmt::Debug for UiStateFlags {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "UiStateFlags({:#x})", self.0)
	}
}

/// Diagnostic payload accompanying a display-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
	pub display_id: u32,
	pub width_px: u32,
	pub height_px: u32,
	pub density_dpi: u32,
}

/// Outbound taskbar status reported to the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarStatus {
	pub visible: bool,
	pub stashed: bool,
}

impl BarStatus {
	/// Status reported when no session exists.
	pub const fn hidden() -> Self {
		BarStatus {
			visible: false,
			stashed: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_change_set_operations() {
		let mask = DisplayChange::ACTIVE_SCREEN | DisplayChange::DENSITY;
		assert!(mask.intersects(DisplayChange::DENSITY));
		assert!(!mask.intersects(DisplayChange::ROTATION));
		assert!(mask.contains(DisplayChange::ACTIVE_SCREEN));
		assert!(!mask.contains(DisplayChange::ACTIVE_SCREEN | DisplayChange::ROTATION));
		assert!(DisplayChange::empty().is_empty());
	}

	#[test]
	fn ui_state_flags_preserve_unknown_bits() {
		let raw = UiStateFlags(0x8000_0001);
		assert!(raw.contains(UiStateFlags::SCREEN_LOCKED));
		assert!(raw.intersects(UiStateFlags(0x8000_0000)));
	}

	#[test]
	fn nav_mode_serializes_camel_case() {
		let json = serde_json::to_string(&NavMode::ThreeButton).expect("serialize");
		assert_eq!(json, "\"threeButton\"");
	}
}
