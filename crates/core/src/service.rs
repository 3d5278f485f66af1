//! Single-task confinement of manager entry points.
//!
//! The manager assumes one serialized caller. Hosts that collect signals
//! from several threads get that serialization here: [`BarService::spawn`]
//! moves a [`BarManager`] onto one tokio task, and every [`BarHandle`]
//! method funnels through one mpsc channel, so signals apply strictly in
//! arrival order and rebuilds never overlap.
//!
//! Holding a handle is the listener registration; dropping every handle
//! (or calling [`BarHandle::shutdown`]) deregisters and tears the manager
//! down. Sends after shutdown are silently dropped.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::manager::BarManager;
use crate::session::controller::BarController;
use crate::shell::ShellEnv;
use crate::types::{BarStatus, DisplayChange, DisplayInfo, NavMode, UiStateFlags};

enum Signal {
	NavModeChanged(NavMode),
	DisplayChanged { info: DisplayInfo, change: DisplayChange },
	UserUnlocked,
	UiStateChanged(UiStateFlags),
	SetController(Arc<dyn BarController>),
	ClearController(Arc<dyn BarController>),
	RotationProposal { rotation: i32, valid: bool },
	DisableNavBarElements { display_id: u32, state1: i32, state2: i32, animate: bool },
	SystemBarAttributes { display_id: u32, behavior: i32 },
	Query(oneshot::Sender<ServiceState>),
	Shutdown(oneshot::Sender<()>),
}

/// Point-in-time view of reconciler state, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceState {
	pub has_session: bool,
	pub unlocked: bool,
	pub ui_state: UiStateFlags,
	pub reported_status: Option<BarStatus>,
	pub display_id: Option<u32>,
}

/// Spawner for the confined reconciler task.
pub struct BarService;

impl BarService {
	/// Spawns the reconciler task (including the initial reconciliation
	/// pass) and returns its signal handle.
	pub fn spawn(env: ShellEnv) -> BarHandle {
		let (tx, rx) = mpsc::unbounded_channel();
		tokio::spawn(run(env, rx));
		BarHandle { tx }
	}
}

async fn run(env: ShellEnv, mut rx: mpsc::UnboundedReceiver<Signal>) {
	// Constructed inside the task so even the initial rebuild happens on
	// the owner task.
	let mut manager = BarManager::new(env);
	let mut shutdown_ack = None;

	while let Some(signal) = rx.recv().await {
		match signal {
			Signal::NavModeChanged(mode) => manager.on_nav_mode_changed(mode),
			Signal::DisplayChanged { info, change } => manager.on_display_changed(&info, change),
			Signal::UserUnlocked => manager.on_user_unlocked(),
			Signal::UiStateChanged(flags) => manager.on_ui_state_changed(flags),
			Signal::SetController(controller) => manager.set_controller(controller),
			Signal::ClearController(controller) => manager.clear_controller(&controller),
			Signal::RotationProposal { rotation, valid } => manager.on_rotation_proposal(rotation, valid),
			Signal::DisableNavBarElements { display_id, state1, state2, animate } => {
				manager.disable_nav_bar_elements(display_id, state1, state2, animate);
			}
			Signal::SystemBarAttributes { display_id, behavior } => {
				manager.on_system_bar_attributes_changed(display_id, behavior);
			}
			Signal::Query(reply) => {
				let _ = reply.send(snapshot_state(&manager));
			}
			Signal::Shutdown(ack) => {
				shutdown_ack = Some(ack);
				break;
			}
		}
	}

	debug!(target = "bar.service", "signal loop ended; tearing down");
	manager.shutdown();
	if let Some(ack) = shutdown_ack {
		let _ = ack.send(());
	}
}

fn snapshot_state(manager: &BarManager) -> ServiceState {
	ServiceState {
		has_session: manager.has_session(),
		unlocked: manager.is_unlocked(),
		ui_state: manager.ui_state(),
		reported_status: manager.session().and_then(|s| s.reported_status()),
		display_id: manager.session().map(|s| s.info().display_id),
	}
}

/// Cloneable signal handle mirroring every manager entry point.
#[derive(Clone)]
pub struct BarHandle {
	tx: mpsc::UnboundedSender<Signal>,
}

impl BarHandle {
	pub fn nav_mode_changed(&self, mode: NavMode) {
		let _ = self.tx.send(Signal::NavModeChanged(mode));
	}

	pub fn display_changed(&self, info: DisplayInfo, change: DisplayChange) {
		let _ = self.tx.send(Signal::DisplayChanged { info, change });
	}

	pub fn user_unlocked(&self) {
		let _ = self.tx.send(Signal::UserUnlocked);
	}

	pub fn ui_state_changed(&self, flags: UiStateFlags) {
		let _ = self.tx.send(Signal::UiStateChanged(flags));
	}

	pub fn set_controller(&self, controller: Arc<dyn BarController>) {
		let _ = self.tx.send(Signal::SetController(controller));
	}

	pub fn clear_controller(&self, controller: &Arc<dyn BarController>) {
		let _ = self.tx.send(Signal::ClearController(Arc::clone(controller)));
	}

	pub fn rotation_proposal(&self, rotation: i32, valid: bool) {
		let _ = self.tx.send(Signal::RotationProposal { rotation, valid });
	}

	pub fn disable_nav_bar_elements(&self, display_id: u32, state1: i32, state2: i32, animate: bool) {
		let _ = self.tx.send(Signal::DisableNavBarElements { display_id, state1, state2, animate });
	}

	pub fn system_bar_attributes_changed(&self, display_id: u32, behavior: i32) {
		let _ = self.tx.send(Signal::SystemBarAttributes { display_id, behavior });
	}

	/// Queries reconciler state after all previously sent signals apply.
	/// Returns `None` when the service has already shut down.
	pub async fn state(&self) -> Option<ServiceState> {
		let (reply_tx, reply_rx) = oneshot::channel();
		self.tx.send(Signal::Query(reply_tx)).ok()?;
		reply_rx.await.ok()
	}

	/// Stops the signal loop and waits for teardown to finish.
	pub async fn shutdown(self) {
		let (ack_tx, ack_rx) = oneshot::channel();
		if self.tx.send(Signal::Shutdown(ack_tx)).is_ok() {
			let _ = ack_rx.await;
		}
	}
}
