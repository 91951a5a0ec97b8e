use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::core::control::{Controllable, SharedState, StateCell};
use crate::core::gateway::SubmittedRecord;
use crate::core::requests::{DEVELOPER_REQUEST_FORM, JOB_POSTING_FORM};
use crate::core::wizard::{WizardController, WizardEvent};

use super::events::{Action, AppEvent, MenuItem, Notification, NotificationLevel};
use super::services::Services;
use super::theme;
use super::views::request_wizard::{RequestWizardView, WizardInputResult};

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Highlighted dashboard entry.
    pub menu_index: usize,
    /// Records submitted during this session, oldest first.
    pub records: Vec<SubmittedRecord>,
    /// Wizard modal (Some while open).
    pub wizard: Option<RequestWizardView>,
    /// Open flag shared with the wizard modal.
    wizard_open: SharedState<bool>,
    next_wizard_id: u64,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender for pushing events from within the app.
    #[allow(dead_code)]
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        services: Services,
    ) -> Self {
        Self {
            running: true,
            menu_index: 0,
            records: Vec::new(),
            wizard: None,
            wizard_open: SharedState::new(false),
            next_wizard_id: 0,
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            event_rx,
            event_tx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Ctrl+C always quits
                if is_force_quit(&crossterm_event) {
                    self.handle_action(Action::Quit);
                    return;
                }

                // Priority 1: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Wizard modal consumes all input when open
                if let Some(ref mut wizard) = self.wizard {
                    if wizard.handle_input(&crossterm_event, &self.services)
                        == WizardInputResult::Close
                    {
                        self.handle_action(Action::CloseWizard);
                    }
                    return;
                }

                // Priority 3: Dashboard
                if let Some(action) = self.map_input_to_action(crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::ProfileChecked { wizard_id, result } => {
                match self.wizard.as_mut() {
                    Some(wizard) if wizard.id() == wizard_id => wizard.apply_profile(result),
                    _ => log::debug!("Dropping profile result for closed wizard {wizard_id}"),
                }
            }
            AppEvent::Submitted { wizard_id, record } => self.on_submitted(wizard_id, record),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&mut self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (modifiers, code) {
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Char('n') => Some(Action::NewRequest),
                KeyCode::Char('p') => Some(Action::PostJob),
                KeyCode::Char('e') => Some(Action::EditLastRequest),
                KeyCode::Down | KeyCode::Char('j') => {
                    self.menu_index = (self.menu_index + 1) % MenuItem::ALL.len();
                    None
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.menu_index =
                        (self.menu_index + MenuItem::ALL.len() - 1) % MenuItem::ALL.len();
                    None
                }
                KeyCode::Enter => MenuItem::ALL
                    .get(self.menu_index)
                    .map(|item| item.to_action()),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::NewRequest => {
                let id = self.allocate_wizard_id();
                let controller = self.services.create_wizard(&DEVELOPER_REQUEST_FORM, id);
                self.open_wizard(id, controller, true);
            }
            Action::PostJob => {
                let id = self.allocate_wizard_id();
                let controller = self.services.create_wizard(&JOB_POSTING_FORM, id);
                self.open_wizard(id, controller, true);
            }
            Action::EditLastRequest => {
                let last = self.records.iter().rev().find_map(|record| match record {
                    SubmittedRecord::Request(request) => Some(request),
                    SubmittedRecord::Job(_) => None,
                });
                match last {
                    Some(request) => {
                        let id = self.next_wizard_id + 1;
                        let controller = self.services.edit_wizard(request, id);
                        self.next_wizard_id = id;
                        self.open_wizard(id, controller, false);
                    }
                    None => self.push_notification(
                        "No request submitted yet".to_string(),
                        NotificationLevel::Warning,
                    ),
                }
            }
            Action::CloseWizard => {
                if let Some(mut wizard) = self.wizard.take() {
                    wizard.close();
                }
                self.wizard_open.set(false);
            }
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
        }
    }

    fn allocate_wizard_id(&mut self) -> u64 {
        self.next_wizard_id += 1;
        self.next_wizard_id
    }

    /// Replace any open wizard. Creation wizards start behind the profile gate.
    fn open_wizard(&mut self, id: u64, controller: WizardController, check_profile: bool) {
        if let Some(mut previous) = self.wizard.take() {
            previous.close();
        }

        self.wizard_open.set(true);
        let cell: Arc<dyn StateCell<bool>> = Arc::new(self.wizard_open.clone());
        log::info!(
            "Opening wizard {id}: {}",
            controller.schema().title
        );
        self.wizard = Some(RequestWizardView::new(
            id,
            controller,
            Controllable::new(Some(cell), true),
        ));

        if check_profile {
            self.services.spawn_profile_check(id);
        }
    }

    /// A wizard finished. An edited request replaces its earlier entry.
    fn on_submitted(&mut self, wizard_id: u64, record: SubmittedRecord) {
        let message = format!("Saved \"{}\"", record.title());
        match self
            .records
            .iter_mut()
            .find(|existing| same_record(existing, &record))
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.push_notification(message, NotificationLevel::Success);
        // A newer wizard may have replaced the one that finished
        if self.wizard.as_ref().is_some_and(|wizard| wizard.id() == wizard_id) {
            self.handle_action(Action::CloseWizard);
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        let mut notification = Notification::new(message, level);
        notification.id = self.notification_counter;
        self.notifications.push(notification);

        while self.notifications.len() > 3 {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired, poll the wizard.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        let Some(wizard) = self.wizard.as_mut() else {
            return;
        };
        match wizard.poll() {
            Some(WizardEvent::Succeeded(record)) => {
                log::info!("Submitted {}", record.id());
            }
            Some(WizardEvent::Failed(e)) if !e.redirect_reason() => {
                self.push_notification(e.user_message(), NotificationLevel::Error);
            }
            _ => {}
        }
        if !self.wizard_open.get() {
            self.wizard = None;
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

        self.render_dashboard(frame, chunks[0]);
        self.render_status_bar(frame, chunks[1]);

        // Overlays
        if let Some(ref wizard) = self.wizard {
            wizard.render(frame, centered_rect(80, 85, area));
        }

        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let columns =
            Layout::horizontal([Constraint::Length(32), Constraint::Min(20)]).split(area);

        let menu: Vec<Line> = MenuItem::ALL
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == self.menu_index {
                    Line::from(Span::styled(format!(" ▸ {}", item.label()), theme::highlight()))
                } else {
                    Line::from(Span::styled(
                        format!("   {}", item.label()),
                        Style::default().fg(theme::TEXT),
                    ))
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(menu).block(theme::block_focused("Actions")),
            columns[0],
        );

        let mut lines = Vec::new();
        if self.records.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "Nothing submitted yet",
                theme::muted(),
            )));
        }
        for record in &self.records {
            let (kind, detail) = match record {
                SubmittedRecord::Request(request) => ("request", request.status.label().to_string()),
                SubmittedRecord::Job(job) => ("job", job.job_type.clone()),
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {kind:<8}"), theme::key_hint()),
                Span::styled(format!("#{:<6} ", record.id()), theme::muted()),
                Span::styled(record.title().to_string(), Style::default().fg(theme::TEXT)),
                Span::styled(format!("  {detail}"), Style::default().fg(theme::PRIMARY_LIGHT)),
            ]));
        }
        frame.render_widget(
            Paragraph::new(lines).block(theme::block_default("Submitted this session")),
            columns[1],
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mode = if self.wizard.is_some() {
            Span::styled(" WIZARD ", theme::insert_badge())
        } else {
            Span::raw("")
        };

        let status = Line::from(vec![
            Span::styled(" TALENT BRIDGE ", theme::brand_badge()),
            Span::raw(" "),
            mode,
            Span::raw(" "),
            Span::styled(
                format!("{} submitted", self.records.len()),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled("n", theme::key_hint()),
            Span::raw(":request "),
            Span::styled("p", theme::key_hint()),
            Span::raw(":job "),
            Span::styled("e", theme::key_hint()),
            Span::raw(":edit "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color).bold()),
                    Span::raw(&n.message),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Dashboard:", ""),
            ("j/k", "Move through actions"),
            ("Enter", "Run highlighted action"),
            ("n", "Request a developer"),
            ("p", "Post a job"),
            ("e", "Edit last submitted request"),
            ("?", "Toggle this help"),
            ("q / Ctrl+C", "Quit"),
            ("", ""),
            ("Wizard:", ""),
            ("Tab / Shift+Tab", "Next / previous field"),
            ("Enter", "Edit text field / save edit"),
            ("←/→", "Cycle choice or move option cursor"),
            ("Space", "Toggle highlighted option"),
            ("n / p", "Next / previous step"),
            ("s", "Submit (last step)"),
            ("a / x", "Add / remove media file"),
            ("c", "Cancel a running submission"),
            ("r", "Re-check profile when blocked"),
            ("Esc", "Discard edit / close wizard"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                " Keybindings",
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {key}"),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<18}", key),
                        Style::default().fg(theme::PRIMARY_LIGHT).bold(),
                    ),
                    Span::raw(*desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("?", Style::default().fg(theme::PRIMARY_LIGHT).bold()),
            Span::raw(" or "),
            Span::styled("Esc", Style::default().fg(theme::PRIMARY_LIGHT).bold()),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

fn is_force_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            ..
        })
    )
}

fn same_record(a: &SubmittedRecord, b: &SubmittedRecord) -> bool {
    matches!(
        (a, b),
        (SubmittedRecord::Request(_), SubmittedRecord::Request(_))
            | (SubmittedRecord::Job(_), SubmittedRecord::Job(_))
    ) && a.id() == b.id()
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
