use crate::core::gateway::{GatewayResult, ProfileStatus, SubmittedRecord};

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic tick: notification TTLs and wizard polling.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// Background profile check finished for the wizard with this id.
    ProfileChecked {
        wizard_id: u64,
        result: GatewayResult<ProfileStatus>,
    },
    /// The wizard with this id completed with `record`.
    Submitted {
        wizard_id: u64,
        record: SubmittedRecord,
    },
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched from the dashboard and global keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NewRequest,
    PostJob,
    EditLastRequest,
    CloseWizard,
    ShowHelp,
    CloseHelp,
    Quit,
}

/// Dashboard menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    NewRequest,
    PostJob,
    EditLastRequest,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::NewRequest,
        MenuItem::PostJob,
        MenuItem::EditLastRequest,
        MenuItem::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::NewRequest => "Request a developer",
            MenuItem::PostJob => "Post a job",
            MenuItem::EditLastRequest => "Edit last request",
            MenuItem::Quit => "Quit",
        }
    }

    pub fn to_action(self) -> Action {
        match self {
            MenuItem::NewRequest => Action::NewRequest,
            MenuItem::PostJob => Action::PostJob,
            MenuItem::EditLastRequest => Action::EditLastRequest,
            MenuItem::Quit => Action::Quit,
        }
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notification {
    /// A notification whose id is assigned by `AppState`.
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: 100,
        }
    }
}
