//! Taskbar session lifecycle reconciliation.
//!
//! One long-lived [`BarManager`] owns at most one live [`BarSession`] and
//! rebuilds it whenever an external signal invalidates the environment the
//! session was created for: display-configuration changes, navigation-mode
//! changes, the user-unlock event, and the compositor's UI-state flag
//! stream. Sessions are never patched in place: every qualifying signal
//! runs the same destroy-then-decide-then-create sequence, so existence and
//! identity always come from one decision path.
//!
//! Hosts that deliver signals from multiple threads should drive the
//! reconciler through [`service::BarService`], which confines every entry
//! point to one task. Single-threaded hosts can call [`BarManager`]
//! directly.

pub mod error;
pub mod manager;
pub mod profile;
pub mod service;
pub mod session;
pub mod shell;
pub mod types;

pub use error::{Error, Result};
pub use manager::BarManager;
pub use profile::DeviceProfile;
pub use service::{BarHandle, BarService, ServiceState};
pub use session::BarSession;
pub use session::controller::{BarController, BarSessionInfo, NoopController};
pub use session::policy::{EnvSnapshot, session_should_exist};
pub use shell::ShellEnv;
pub use types::{BarStatus, DisplayChange, DisplayInfo, NavMode, UiStateFlags};
