//! Error types surfaced at the shell-collaborator seam.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by shell collaborators during session assembly.
///
/// The reconciler itself has no recoverable-error taxonomy: signal payloads
/// are well-formed by construction, and a collaborator failure during a
/// rebuild degrades to the sessionless state rather than propagating out of
/// the manager.
#[derive(Debug, Error)]
pub enum Error {
	/// The surface provider refused or failed to hand out a rendering
	/// surface for the requested display.
	#[error("surface unavailable for display {display_id}: {reason}")]
	SurfaceUnavailable {
		display_id: u32,
		reason: String,
	},
}
