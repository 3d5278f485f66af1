//! Controller set/clear/re-attach behavior across session rebuilds.

use std::sync::Arc;
use std::sync::Mutex;

use shellbar::shell::fake::FakeShell;
use shellbar::{BarController, BarManager, BarSessionInfo, DeviceProfile, NavMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
	Attached(BarSessionInfo),
	Detached,
}

#[derive(Default)]
struct RecordingController {
	events: Mutex<Vec<Event>>,
}

impl RecordingController {
	fn events(&self) -> Vec<Event> {
		self.events.lock().expect("events lock").clone()
	}
}

impl BarController for RecordingController {
	fn on_attached(&self, session: BarSessionInfo) {
		self.events.lock().expect("events lock").push(Event::Attached(session));
	}

	fn on_detached(&self) {
		self.events.lock().expect("events lock").push(Event::Detached);
	}
}

fn ready_shell() -> FakeShell {
	let shell = FakeShell::new();
	shell.set_taskbar_enabled(true);
	shell.set_profile(Some(DeviceProfile::taskbar_capable(0, 2560, 1600, 220)));
	shell
}

#[test]
fn setting_while_live_attaches_immediately() {
	let shell = ready_shell();
	let mut manager = BarManager::new(shell.env());
	manager.on_user_unlocked();
	let info = manager.session().map(|s| s.info()).expect("session");

	let controller = Arc::new(RecordingController::default());
	manager.set_controller(controller.clone());

	assert_eq!(controller.events(), vec![Event::Attached(info)]);
}

#[test]
fn setting_while_sessionless_defers_to_next_rebuild() {
	let shell = ready_shell();
	let mut manager = BarManager::new(shell.env());

	let controller = Arc::new(RecordingController::default());
	manager.set_controller(controller.clone());
	assert!(controller.events().is_empty());

	manager.on_user_unlocked();
	let info = manager.session().map(|s| s.info()).expect("session");
	assert_eq!(controller.events(), vec![Event::Attached(info)]);
}

#[test]
fn controller_survives_a_nav_mode_rebuild() {
	let shell = ready_shell();
	let mut manager = BarManager::new(shell.env());
	manager.on_user_unlocked();

	let controller = Arc::new(RecordingController::default());
	manager.set_controller(controller.clone());
	let first = manager.session().map(|s| s.info()).expect("first session");

	manager.on_nav_mode_changed(NavMode::Gestural);
	let second = manager.session().map(|s| s.info()).expect("second session");

	assert_ne!(first, second);
	assert_eq!(
		controller.events(),
		vec![Event::Attached(first), Event::Detached, Event::Attached(second)]
	);
}

#[test]
fn clear_with_non_matching_reference_is_ignored() {
	let shell = ready_shell();
	let mut manager = BarManager::new(shell.env());
	manager.on_user_unlocked();

	let owner = Arc::new(RecordingController::default());
	let stranger: Arc<dyn BarController> = Arc::new(RecordingController::default());
	manager.set_controller(owner.clone());

	manager.clear_controller(&stranger);

	// The owner stays installed: a rebuild still re-attaches it.
	manager.on_nav_mode_changed(NavMode::TwoButton);
	let info = manager.session().map(|s| s.info()).expect("session");
	assert_eq!(owner.events().last(), Some(&Event::Attached(info)));
}

#[test]
fn matching_clear_detaches_and_stops_reattachment() {
	let shell = ready_shell();
	let mut manager = BarManager::new(shell.env());
	manager.on_user_unlocked();

	let owner = Arc::new(RecordingController::default());
	let owner_dyn: Arc<dyn BarController> = owner.clone();
	manager.set_controller(owner_dyn.clone());
	manager.clear_controller(&owner_dyn);
	assert_eq!(owner.events().last(), Some(&Event::Detached));

	let events_after_clear = owner.events();
	manager.on_nav_mode_changed(NavMode::Gestural);
	assert!(manager.has_session());
	assert_eq!(owner.events(), events_after_clear, "cleared controller is not re-attached");
}

#[test]
fn replacing_a_controller_detaches_the_previous_one() {
	let shell = ready_shell();
	let mut manager = BarManager::new(shell.env());
	manager.on_user_unlocked();

	let first = Arc::new(RecordingController::default());
	let second = Arc::new(RecordingController::default());
	manager.set_controller(first.clone());
	manager.set_controller(second.clone());

	assert_eq!(first.events().last(), Some(&Event::Detached));
	assert!(matches!(second.events().as_slice(), [Event::Attached(_)]));
}
