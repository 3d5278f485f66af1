//! Host-window attachment point for a live bar session.

use std::sync::Arc;

/// Identity of the session a controller is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSessionInfo {
	pub display_id: u32,
	pub surface_id: u64,
}

/// Integration surface offered to the owning host window.
///
/// A controller is set by an external caller and survives session rebuilds:
/// the manager stores it independently of any session and re-attaches it to
/// each new one. Identity for the clear guard is `Arc` pointer identity, so
/// a stale caller can never clear a controller someone else set after it.
pub trait BarController: Send + Sync {
	/// Called when the controller becomes attached to a live session.
	fn on_attached(&self, session: BarSessionInfo);

	/// Called when the controller is detached from its session.
	fn on_detached(&self);
}

/// Controller held while no host window has claimed the bar.
#[derive(Debug, Default)]
pub struct NoopController;

impl BarController for NoopController {
	fn on_attached(&self, _session: BarSessionInfo) {}

	fn on_detached(&self) {}
}

/// Fresh no-op controller instance.
pub(crate) fn noop() -> Arc<dyn BarController> {
	Arc::new(NoopController)
}
