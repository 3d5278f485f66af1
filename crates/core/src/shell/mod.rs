//! Shell collaborator ports.
//!
//! The production shell exposes these as live system services; tests and
//! the host harness use the in-memory [`fake`] implementations. Every port
//! is either a read-only query or a fire-and-forget notification; the
//! reconciler owns no shell state of its own.

pub mod fake;

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::profile::DeviceProfile;
use crate::types::BarStatus;

/// Profile lookup for the display the bar would attach to.
pub trait ProfileSource: Send + Sync {
	/// Returns the current device profile, or `None` when one cannot be
	/// derived yet.
	fn current_profile(&self) -> Option<DeviceProfile>;
}

/// Taskbar feature enablement query.
pub trait FeatureGate: Send + Sync {
	fn taskbar_enabled(&self) -> bool;
}

/// Outbound status notifications toward the system compositor.
pub trait CompositorLink: Send + Sync {
	fn bar_status_changed(&self, status: BarStatus);
}

/// Owner of the rendering surfaces sessions draw into.
///
/// A provider may refuse to hand out a second handle while one is live; the
/// manager guarantees release-before-acquire across rebuilds.
pub trait SurfaceProvider: Send + Sync {
	fn acquire(&self, display_id: u32) -> Result<SurfaceHandle>;
}

/// Exclusive handle to one rendering surface.
///
/// Not `Clone`; the surface is released when the handle drops.
pub struct SurfaceHandle {
	id: u64,
	on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl SurfaceHandle {
	/// Wraps a provider-assigned surface id with a release hook invoked on
	/// drop.
	pub fn new(id: u64, on_release: impl FnOnce() + Send + 'static) -> Self {
		Self {
			id,
			on_release: Some(Box::new(on_release)),
		}
	}

	/// Provider-assigned surface id.
	pub fn id(&self) -> u64 {
		self.id
	}
}

impl Drop for SurfaceHandle {
	fn drop(&mut self) {
		if let Some(release) = self.on_release.take() {
			release();
		}
	}
}

impl fmt::Debug for SurfaceHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SurfaceHandle").field(&self.id).finish()
	}
}

/// Aggregated shell environment injected into the manager at construction.
///
/// Cloning is cheap; all fields are shared references.
#[derive(Clone)]
pub struct ShellEnv {
	pub profiles: Arc<dyn ProfileSource>,
	pub features: Arc<dyn FeatureGate>,
	pub compositor: Arc<dyn CompositorLink>,
	pub surfaces: Arc<dyn SurfaceProvider>,
}
