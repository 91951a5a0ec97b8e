//! Wizard modal. Renders any [`FormSchema`] through a [`WizardController`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::control::Controllable;
use crate::core::gateway::{GatewayResult, ProfileStatus};
use crate::core::media::StagedFile;
use crate::core::wizard::{
    FieldKind, FieldSpec, ProfileGate, SubmitOutcome, WizardController, WizardEvent, WizardMode,
    WizardStatus,
};
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardInputResult {
    Consumed,
    Ignored,
    Close,
}

pub struct RequestWizardView {
    id: u64,
    controller: WizardController,
    open: Controllable<bool>,
    /// Index of the focused field within the current step.
    focus: usize,
    /// Active text edit for the focused field.
    editor: Option<InputBuffer>,
    /// Highlighted option of a focused multi-select.
    option_cursor: usize,
    /// Active path prompt on the media step.
    media_input: Option<InputBuffer>,
    media_cursor: usize,
    notice: Option<String>,
}

impl RequestWizardView {
    pub fn new(id: u64, controller: WizardController, open: Controllable<bool>) -> Self {
        Self {
            id,
            controller,
            open,
            focus: 0,
            editor: None,
            option_cursor: 0,
            media_input: None,
            media_cursor: 0,
            notice: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    /// Dismiss the modal. A success still on screen completes first so its
    /// record is reported.
    pub fn close(&mut self) {
        if self.controller.complete_now().is_none() {
            self.controller.cancel();
        }
        self.open.set(false);
    }

    pub fn apply_profile(&mut self, result: GatewayResult<ProfileStatus>) {
        match result {
            Ok(status) => self.controller.apply_profile_status(status),
            Err(e) => self.controller.apply_profile_error(&e),
        }
    }

    /// Collect submission progress. Closes the modal once the wizard completes.
    pub fn poll(&mut self) -> Option<WizardEvent> {
        let event = self.controller.poll()?;
        if matches!(event, WizardEvent::Completed(_)) {
            self.open.set(false);
        }
        Some(event)
    }

    fn step_fields(&self) -> &'static [FieldSpec] {
        self.controller
            .schema()
            .step(self.controller.current_step())
            .map(|step| step.fields)
            .unwrap_or(&[])
    }

    fn focused_field(&self) -> Option<&'static FieldSpec> {
        self.step_fields().get(self.focus)
    }

    fn on_media_step(&self) -> bool {
        self.controller.media().is_some() && self.step_fields().is_empty()
    }

    fn entries_of(&self, spec: &FieldSpec) -> Vec<String> {
        multi_select_entries(spec.options(), self.controller.state().fields.list(spec.name))
    }

    fn set_focus(&mut self, focus: usize) {
        self.focus = focus;
        self.option_cursor = 0;
    }

    /// Focus the first field of the current step that has an error.
    fn focus_first_error(&mut self) {
        let errors = &self.controller.state().errors;
        let first = self
            .step_fields()
            .iter()
            .position(|spec| errors.contains_key(spec.name));
        self.set_focus(first.unwrap_or(0));
    }

    // ── Input ───────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> WizardInputResult {
        let Event::Key(key) = event else {
            return WizardInputResult::Ignored;
        };
        if key.kind != KeyEventKind::Press {
            return WizardInputResult::Ignored;
        }

        if self.editor.is_some() {
            self.handle_editor_key(*key);
            return WizardInputResult::Consumed;
        }
        if self.media_input.is_some() {
            self.handle_media_input_key(*key);
            return WizardInputResult::Consumed;
        }

        if key.code == KeyCode::Esc {
            self.close();
            return WizardInputResult::Close;
        }

        if self.controller.gate().is_unchecked() {
            return WizardInputResult::Consumed;
        }
        if let ProfileGate::Blocked { .. } = self.controller.gate() {
            if key.code == KeyCode::Char('r') {
                self.notice = Some("Checking your profile...".to_string());
                services.spawn_profile_check(self.id);
            }
            return WizardInputResult::Consumed;
        }

        match self.controller.status() {
            WizardStatus::Submitting => {
                if key.code == KeyCode::Char('c') {
                    self.controller.cancel();
                    self.notice = Some("Submission cancelled".to_string());
                }
                return WizardInputResult::Consumed;
            }
            WizardStatus::Succeeded => return WizardInputResult::Consumed,
            WizardStatus::Idle | WizardStatus::Failed => {}
        }

        self.handle_form_key(*key)
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> WizardInputResult {
        let field_count = self.step_fields().len();
        match (key.modifiers, key.code) {
            (_, KeyCode::Tab) | (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => {
                if self.on_media_step() {
                    let len = self.controller.media().map_or(0, |m| m.len());
                    self.media_cursor = (self.media_cursor + 1).min(len.saturating_sub(1));
                } else if field_count > 0 {
                    self.set_focus((self.focus + 1) % field_count);
                }
            }
            (_, KeyCode::BackTab) | (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => {
                if self.on_media_step() {
                    self.media_cursor = self.media_cursor.saturating_sub(1);
                } else if field_count > 0 {
                    self.set_focus((self.focus + field_count - 1) % field_count);
                }
            }
            (KeyModifiers::NONE, KeyCode::Char('n')) => {
                self.notice = None;
                if self.controller.go_next() {
                    self.set_focus(0);
                } else {
                    self.focus_first_error();
                }
            }
            (KeyModifiers::NONE, KeyCode::Char('p')) => {
                self.notice = None;
                self.controller.go_prev();
                self.set_focus(0);
            }
            (KeyModifiers::NONE, KeyCode::Char('s')) if self.controller.is_last_step() => {
                self.submit();
            }
            (KeyModifiers::NONE, KeyCode::Char('a')) if self.on_media_step() => {
                self.media_input = Some(InputBuffer::new());
            }
            (KeyModifiers::NONE, KeyCode::Char('x') | KeyCode::Delete) if self.on_media_step() => {
                if let Some(file) = self.controller.unstage_media(self.media_cursor) {
                    self.notice = Some(format!("Removed {}", file.file_name));
                    let len = self.controller.media().map_or(0, |m| m.len());
                    self.media_cursor = self.media_cursor.min(len.saturating_sub(1));
                }
            }
            (KeyModifiers::NONE, code) => return self.handle_field_key(code),
            _ => return WizardInputResult::Ignored,
        }
        WizardInputResult::Consumed
    }

    fn handle_field_key(&mut self, code: KeyCode) -> WizardInputResult {
        let Some(spec) = self.focused_field() else {
            return WizardInputResult::Ignored;
        };
        let current = self.controller.state().fields.text(spec.name).to_string();

        match (spec.kind, code) {
            (FieldKind::Text | FieldKind::LongText, KeyCode::Enter) => {
                self.editor = Some(InputBuffer::with_text(current));
            }
            (FieldKind::Choice(options), KeyCode::Enter | KeyCode::Right | KeyCode::Char('l')) => {
                let next = cycle_option(options, &current, true);
                self.controller.update_field(spec.name, next);
            }
            (FieldKind::Choice(options), KeyCode::Left | KeyCode::Char('h')) => {
                let prev = cycle_option(options, &current, false);
                self.controller.update_field(spec.name, prev);
            }
            (FieldKind::MultiSelect(_), KeyCode::Right | KeyCode::Char('l')) => {
                let len = self.entries_of(spec).len();
                self.option_cursor = (self.option_cursor + 1).min(len.saturating_sub(1));
            }
            (FieldKind::MultiSelect(_), KeyCode::Left | KeyCode::Char('h')) => {
                self.option_cursor = self.option_cursor.saturating_sub(1);
            }
            (FieldKind::MultiSelect(_), KeyCode::Enter | KeyCode::Char(' ')) => {
                if let Some(option) = self.entries_of(spec).get(self.option_cursor) {
                    self.controller.toggle_multi_value(spec.name, option);
                }
                // Unselecting a value outside the catalog drops it from the list
                let len = self.entries_of(spec).len();
                self.option_cursor = self.option_cursor.min(len.saturating_sub(1));
            }
            _ => return WizardInputResult::Ignored,
        }
        WizardInputResult::Consumed
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                let text = editor.take();
                self.editor = None;
                if let Some(spec) = self.focused_field() {
                    self.controller.update_field(spec.name, text);
                }
            }
            KeyCode::Esc => self.editor = None,
            code => edit_buffer(editor, code),
        }
    }

    fn handle_media_input_key(&mut self, key: KeyEvent) {
        let Some(input) = self.media_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                let path = input.take();
                self.media_input = None;
                self.stage_path(path.trim());
            }
            KeyCode::Esc => self.media_input = None,
            code => edit_buffer(input, code),
        }
    }

    fn stage_path(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }
        match StagedFile::from_path(path) {
            Ok(file) => {
                self.notice = Some(format!("Staged {}", file.file_name));
                self.controller.stage_media([file]);
            }
            Err(e) => {
                log::warn!("Could not stage {path}: {e}");
                self.notice = Some(format!("Could not add {path}: {e}"));
            }
        }
    }

    fn submit(&mut self) {
        self.notice = match self.controller.submit() {
            SubmitOutcome::Started => None,
            SubmitOutcome::AlreadySubmitting => Some("Already submitting".to_string()),
            SubmitOutcome::Invalid { step } => {
                self.focus_first_error();
                Some(format!("Fix the highlighted fields on step {step}"))
            }
            SubmitOutcome::Blocked => None,
            SubmitOutcome::AwaitingProfile => Some("Still checking your profile".to_string()),
        };
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let schema = self.controller.schema();
        let title = match self.controller.mode() {
            WizardMode::Create => schema.title.to_string(),
            WizardMode::Edit { .. } => "Edit Request".to_string(),
        };
        let block = Block::default()
            .title(Span::styled(format!(" {title} "), theme::title()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme::border_focused());

        let inner = block.inner(area);
        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let banner = self.banner_line();
        let chunks = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(u16::from(banner.is_some())),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

        frame.render_widget(Paragraph::new(self.step_indicator()), chunks[0]);
        if let Some(banner) = banner {
            frame.render_widget(Paragraph::new(banner), chunks[1]);
        }

        if self.controller.gate().is_unchecked() {
            let lines = vec![
                Line::raw(""),
                Line::from(Span::styled("Checking your profile...", theme::muted())),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                chunks[2],
            );
        } else if let ProfileGate::Blocked { message } = self.controller.gate() {
            self.render_remediation(frame, chunks[2], message);
        } else if let Some(record) = self.controller.succeeded_record() {
            let lines = vec![
                Line::raw(""),
                Line::from(Span::styled(
                    "✓ Submitted successfully",
                    Style::default().fg(theme::SUCCESS).add_modifier(Modifier::BOLD),
                )),
                Line::raw(""),
                Line::from(Span::styled(record.title().to_string(), theme::heading())),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                chunks[2],
            );
        } else if self.on_media_step() {
            self.render_media(frame, chunks[2]);
        } else {
            self.render_fields(frame, chunks[2]);
        }

        frame.render_widget(Paragraph::new(self.hints()), chunks[3]);
    }

    fn step_indicator(&self) -> Vec<Line<'static>> {
        let schema = self.controller.schema();
        let current = self.controller.current_step();
        let mut spans = Vec::new();
        for (i, step) in schema.steps.iter().enumerate() {
            let n = i + 1;
            let (marker, style) = if n < current {
                ("✓", Style::default().fg(theme::SUCCESS))
            } else if n == current {
                ("●", theme::highlight())
            } else {
                ("○", theme::muted())
            };
            spans.push(Span::styled(format!(" {marker} {} ", step.title), style));
        }
        vec![
            Line::from(Span::styled(
                format!(" Step {current} of {}", schema.total_steps()),
                theme::muted(),
            )),
            Line::from(spans),
        ]
    }

    fn banner_line(&self) -> Option<Line<'static>> {
        let state = self.controller.state();
        if self.controller.gate().is_blocked() {
            return None;
        }
        if state.status == WizardStatus::Submitting {
            return Some(Line::from(Span::styled(
                " Submitting... ",
                Style::default().fg(theme::INFO).add_modifier(Modifier::BOLD),
            )));
        }
        if let Some(error) = &state.submit_error {
            return Some(Line::from(Span::styled(
                format!(" {error} "),
                theme::banner_error(),
            )));
        }
        self.notice.as_ref().map(|notice| {
            Line::from(Span::styled(
                format!(" {notice} "),
                Style::default().fg(theme::WARNING),
            ))
        })
    }

    fn render_remediation(&self, frame: &mut Frame, area: Rect, message: &str) {
        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                "Your profile needs attention",
                Style::default().fg(theme::WARNING).add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::from(Span::raw(message.to_string())),
            Line::raw(""),
            Line::from(Span::styled(
                "Complete your company profile, then press r to check again.",
                theme::muted(),
            )),
        ];
        if let Some(notice) = &self.notice {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(notice.clone(), theme::muted())));
        }
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(theme::block_default("Profile incomplete")),
            area,
        );
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        let state = self.controller.state();
        let mut lines = Vec::new();

        for (i, spec) in self.step_fields().iter().enumerate() {
            let focused = i == self.focus;
            let marker = if focused { "▸ " } else { "  " };
            let required = if spec.required { " *" } else { "" };
            let label_style = if focused { theme::highlight() } else { theme::heading() };
            lines.push(Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{}{required}", spec.label), label_style),
            ]));

            let value_line = match spec.kind {
                FieldKind::Text | FieldKind::LongText => match (&self.editor, focused) {
                    (Some(editor), true) => {
                        let mut line = editor.to_line(Style::default().fg(theme::TEXT));
                        line.spans.insert(0, Span::raw("    "));
                        line
                    }
                    _ => value_text(state.fields.text(spec.name)),
                },
                FieldKind::Choice(_) => {
                    let value = state.fields.text(spec.name);
                    if value.is_empty() {
                        Line::from(Span::styled("    ‹ not selected ›", theme::muted()))
                    } else {
                        Line::from(Span::styled(
                            format!("    ‹ {value} ›"),
                            Style::default().fg(theme::TEXT),
                        ))
                    }
                }
                FieldKind::MultiSelect(options) => {
                    let selected = state.fields.list(spec.name);
                    let mut spans = vec![Span::raw("    ")];
                    for (j, option) in multi_select_entries(options, selected).iter().enumerate() {
                        let checked = selected.iter().any(|s| s == option);
                        let mark = if checked { "[x]" } else { "[ ]" };
                        let mut style = if checked {
                            Style::default().fg(theme::PRIMARY_LIGHT)
                        } else {
                            theme::muted()
                        };
                        if focused && j == self.option_cursor {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        spans.push(Span::styled(format!("{mark} {option}"), style));
                        spans.push(Span::raw("  "));
                    }
                    Line::from(spans)
                }
            };
            lines.push(value_line);

            if let Some(error) = state.errors.get(spec.name) {
                lines.push(Line::from(Span::styled(
                    format!("    {error}"),
                    theme::field_error(),
                )));
            }
            lines.push(Line::raw(""));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn render_media(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(area);

        let mut lines = Vec::new();
        let entries = self.controller.media().map(|m| m.entries()).unwrap_or(&[]);
        if entries.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No files staged. Press a to add one.",
                theme::muted(),
            )));
        }
        for (i, entry) in entries.iter().enumerate() {
            let style = if i == self.media_cursor {
                theme::highlight()
            } else {
                Style::default().fg(theme::TEXT)
            };
            lines.push(Line::from(vec![
                Span::styled(if i == self.media_cursor { "▸ " } else { "  " }, style),
                Span::styled(entry.file.file_name.clone(), style),
                Span::styled(
                    format!("  {} · {} bytes", entry.file.mime_type, entry.file.size),
                    theme::muted(),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", entry.preview_url()),
                theme::key_hint(),
            )));
        }
        frame.render_widget(
            Paragraph::new(lines).block(theme::block_default("Staged media")),
            chunks[0],
        );

        if let Some(input) = &self.media_input {
            frame.render_widget(
                Paragraph::new(input.to_line(Style::default().fg(theme::TEXT)))
                    .block(theme::block_focused("File path")),
                chunks[1],
            );
        }
    }

    fn hints(&self) -> Line<'static> {
        let pairs: &[(&str, &str)] = if self.editor.is_some() || self.media_input.is_some() {
            &[("Enter", "save "), ("Esc", "discard")]
        } else if self.controller.gate().is_unchecked() {
            &[("Esc", "close")]
        } else if self.controller.gate().is_blocked() {
            &[("r", "re-check "), ("Esc", "close")]
        } else if self.controller.status() == WizardStatus::Submitting {
            &[("c", "cancel")]
        } else if self.on_media_step() {
            &[
                ("a", "add file "),
                ("x", "remove "),
                ("p", "back "),
                ("s", "submit "),
                ("Esc", "close"),
            ]
        } else if self.controller.is_last_step() {
            &[
                ("Tab", "field "),
                ("Enter", "edit "),
                ("←/→", "choose "),
                ("p", "back "),
                ("s", "submit "),
                ("Esc", "close"),
            ]
        } else {
            &[
                ("Tab", "field "),
                ("Enter", "edit "),
                ("←/→", "choose "),
                ("n", "next "),
                ("p", "back "),
                ("Esc", "close"),
            ]
        };

        let mut spans = vec![Span::raw(" ")];
        for (key, desc) in pairs {
            spans.push(Span::styled(key.to_string(), theme::heading()));
            spans.push(Span::styled(format!(":{desc}"), theme::key_hint()));
        }
        Line::from(spans)
    }
}

fn value_text(text: &str) -> Line<'static> {
    if text.is_empty() {
        Line::from(Span::styled("    (empty)", theme::key_hint()))
    } else {
        Line::from(Span::styled(
            format!("    {text}"),
            Style::default().fg(theme::TEXT),
        ))
    }
}

fn edit_buffer(buffer: &mut InputBuffer, code: KeyCode) {
    match code {
        KeyCode::Char(c) => buffer.insert_char(c),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Home => buffer.move_home(),
        KeyCode::End => buffer.move_end(),
        _ => {}
    }
}

/// Catalog options followed by selected values the catalog lacks, so values
/// loaded from a record can still be unselected.
fn multi_select_entries(options: &[&str], selected: &[String]) -> Vec<String> {
    options
        .iter()
        .map(|o| o.to_string())
        .chain(
            selected
                .iter()
                .filter(|value| !options.contains(&value.as_str()))
                .cloned(),
        )
        .collect()
}

/// Next or previous option after `current`. An unset value starts at either end.
fn cycle_option(options: &'static [&'static str], current: &str, forward: bool) -> &'static str {
    if options.is_empty() {
        return "";
    }
    let last = options.len() - 1;
    let index = match (options.iter().position(|o| *o == current), forward) {
        (None, true) => 0,
        (None, false) => last,
        (Some(i), true) => if i == last { 0 } else { i + 1 },
        (Some(i), false) => if i == 0 { last } else { i - 1 },
    };
    options[index]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crossterm::event::KeyEvent;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    use super::*;
    use crate::core::control::{SharedState, StateCell};
    use crate::core::gateway::{MockSubmissionGateway, SubmittedRecord};
    use crate::core::requests::catalog::{EXPERIENCE_LEVELS, TECHNOLOGY_OPTIONS, WORK_STYLES};
    use crate::core::requests::{RequestRecord, DEVELOPER_REQUEST_FORM, JOB_POSTING_FORM};
    use crate::core::wizard::fields::*;
    use crate::core::wizard::FormSchema;
    use crate::tests::mocks::RecordingPreviews;
    use crate::tui::events::AppEvent;

    fn services_with(
        gateway: MockSubmissionGateway,
        success_delay: Duration,
    ) -> (Services, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let services = Services::new(
            Arc::new(gateway),
            Arc::new(RecordingPreviews::default()),
            success_delay,
            tx,
        );
        (services, rx)
    }

    fn services() -> Services {
        services_with(MockSubmissionGateway::new(), Duration::ZERO).0
    }

    fn wrap(controller: WizardController) -> (RequestWizardView, SharedState<bool>) {
        let open = SharedState::new(true);
        let cell: Arc<dyn StateCell<bool>> = Arc::new(open.clone());
        let view = RequestWizardView::new(1, controller, Controllable::new(Some(cell), true));
        (view, open)
    }

    fn ready() -> GatewayResult<ProfileStatus> {
        Ok(ProfileStatus {
            is_complete: true,
            message: None,
        })
    }

    /// A creation wizard whose profile check already passed.
    fn view(services: &Services, schema: &'static FormSchema) -> (RequestWizardView, SharedState<bool>) {
        let (mut view, open) = wrap(services.create_wizard(schema, 1));
        view.apply_profile(ready());
        (view, open)
    }

    fn existing_request() -> RequestRecord {
        RequestRecord {
            id: "r-5".into(),
            project_title: "Clinic site".into(),
            project_description: "Online booking for a dental clinic".into(),
            project_type: "website".into(),
            technologies: vec!["React".into(), "TypeScript".into()],
            experience_level: "mid".into(),
            work_type: "contract".into(),
            duration: "1-3-months".into(),
            start_date: "flexible".into(),
            work_style: "remote".into(),
            work_hours: "flexible".into(),
            team_size: "solo".into(),
            ..Default::default()
        }
    }

    fn press(view: &mut RequestWizardView, services: &Services, code: KeyCode) -> WizardInputResult {
        view.handle_input(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)), services)
    }

    fn type_text(view: &mut RequestWizardView, services: &Services, text: &str) {
        press(view, services, KeyCode::Enter);
        for c in text.chars() {
            press(view, services, KeyCode::Char(c));
        }
        press(view, services, KeyCode::Enter);
    }

    fn screen(view: &RequestWizardView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_cycle_option_wraps() {
        assert_eq!(cycle_option(WORK_STYLES, "", true), "remote");
        assert_eq!(cycle_option(WORK_STYLES, "", false), "hybrid");
        assert_eq!(cycle_option(WORK_STYLES, "hybrid", true), "remote");
        assert_eq!(cycle_option(WORK_STYLES, "remote", false), "hybrid");
        assert_eq!(cycle_option(EXPERIENCE_LEVELS, "junior", true), "mid");
    }

    #[test]
    fn test_typing_updates_fields() {
        let services = services();
        let (mut view, _) = view(&services, &DEVELOPER_REQUEST_FORM);

        type_text(&mut view, &services, "Clinic site");
        assert_eq!(view.controller().state().fields.text(PROJECT_TITLE), "Clinic site");

        press(&mut view, &services, KeyCode::Tab);
        press(&mut view, &services, KeyCode::Tab);
        press(&mut view, &services, KeyCode::Right);
        assert_eq!(view.controller().state().fields.text(PROJECT_TYPE), "website");
    }

    #[test]
    fn test_next_with_errors_stays_and_shows_them() {
        let services = services();
        let (mut view, _) = view(&services, &DEVELOPER_REQUEST_FORM);

        type_text(&mut view, &services, "Clinic site");
        press(&mut view, &services, KeyCode::Char('n'));

        assert_eq!(view.controller().current_step(), 1);
        // Focus jumps to the first failing field
        assert_eq!(view.focus, 1);
        let text = screen(&view);
        assert!(text.contains("Project description is required"));
        assert!(text.contains("Project type is required"));
    }

    #[test]
    fn test_multi_select_toggle() {
        let services = services();
        let (mut view, _) = view(&services, &DEVELOPER_REQUEST_FORM);
        view.controller.update_field(PROJECT_TITLE, "Clinic site");
        view.controller
            .update_field(PROJECT_DESCRIPTION, "Online booking for a dental clinic");
        view.controller.update_field(PROJECT_TYPE, "website");
        press(&mut view, &services, KeyCode::Char('n'));
        assert_eq!(view.controller().current_step(), 2);

        press(&mut view, &services, KeyCode::Char(' '));
        press(&mut view, &services, KeyCode::Right);
        press(&mut view, &services, KeyCode::Char(' '));
        press(&mut view, &services, KeyCode::Left);
        press(&mut view, &services, KeyCode::Char(' '));
        assert_eq!(view.controller().state().fields.list(TECHNOLOGIES), ["Vue"]);
    }

    #[test]
    fn test_escape_closes_through_shared_flag() {
        let services = services();
        let (mut view, open) = view(&services, &DEVELOPER_REQUEST_FORM);

        assert_eq!(press(&mut view, &services, KeyCode::Esc), WizardInputResult::Close);
        assert!(!open.get());
        assert!(!view.is_open());
    }

    #[test]
    fn test_escape_while_editing_discards_edit() {
        let services = services();
        let (mut view, open) = view(&services, &DEVELOPER_REQUEST_FORM);

        press(&mut view, &services, KeyCode::Enter);
        press(&mut view, &services, KeyCode::Char('x'));
        press(&mut view, &services, KeyCode::Esc);
        assert!(open.get());
        assert_eq!(view.controller().state().fields.text(PROJECT_TITLE), "");
    }

    #[test]
    fn test_blocked_gate_renders_remediation() {
        let services = services();
        let (mut view, _) = view(&services, &DEVELOPER_REQUEST_FORM);
        view.apply_profile(Ok(ProfileStatus {
            is_complete: false,
            message: Some("Add your company logo".into()),
        }));

        let text = screen(&view);
        assert!(text.contains("Your profile needs attention"));
        assert!(text.contains("Add your company logo"));
        // Form keys are swallowed while blocked
        assert_eq!(press(&mut view, &services, KeyCode::Char('n')), WizardInputResult::Consumed);
        assert_eq!(view.controller().current_step(), 1);
    }

    #[test]
    fn test_media_step_stages_and_removes_files() {
        let services = services();
        let (mut view, _) = view(&services, &JOB_POSTING_FORM);
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        std::fs::write(&logo, b"png").unwrap();

        view.controller.update_field(TITLE, "Intern");
        view.controller
            .update_field(DESCRIPTION, "Summer internship on the data team");
        view.controller.update_field(JOB_TYPE, "internship");
        press(&mut view, &services, KeyCode::Char('n'));
        view.controller.update_field(EXPERIENCE_LEVEL, "entry");
        press(&mut view, &services, KeyCode::Char('n'));
        assert!(view.on_media_step());

        press(&mut view, &services, KeyCode::Char('a'));
        for c in logo.to_string_lossy().chars() {
            press(&mut view, &services, KeyCode::Char(c));
        }
        press(&mut view, &services, KeyCode::Enter);
        assert_eq!(view.controller().media().map(|m| m.len()), Some(1));
        assert!(screen(&view).contains("logo.png"));

        press(&mut view, &services, KeyCode::Char('a'));
        for c in "/no/such/file.png".chars() {
            press(&mut view, &services, KeyCode::Char(c));
        }
        press(&mut view, &services, KeyCode::Enter);
        assert_eq!(view.controller().media().map(|m| m.len()), Some(1));
        assert!(view.notice.as_deref().unwrap_or("").starts_with("Could not add"));

        press(&mut view, &services, KeyCode::Char('x'));
        assert_eq!(view.controller().media().map(|m| m.len()), Some(0));
    }

    #[test]
    fn test_unchecked_profile_hides_steps() {
        let services = services();
        let (mut view, open) = wrap(services.create_wizard(&DEVELOPER_REQUEST_FORM, 1));

        let text = screen(&view);
        assert!(text.contains("Checking your profile..."));
        assert!(!text.contains("Project title"));

        press(&mut view, &services, KeyCode::Enter);
        press(&mut view, &services, KeyCode::Char('x'));
        press(&mut view, &services, KeyCode::Char('n'));
        assert_eq!(view.controller().state().fields.text(PROJECT_TITLE), "");
        assert_eq!(view.controller().current_step(), 1);

        view.apply_profile(ready());
        assert!(screen(&view).contains("Project title"));
        assert!(open.get());
    }

    #[test]
    fn test_prefilled_value_outside_catalog_can_be_removed() {
        let services = services();
        let (mut view, _) = wrap(services.edit_wizard(&existing_request(), 1));

        press(&mut view, &services, KeyCode::Char('n'));
        assert_eq!(view.controller().current_step(), 2);
        assert!(screen(&view).contains("TypeScript"));

        for _ in 0..TECHNOLOGY_OPTIONS.len() {
            press(&mut view, &services, KeyCode::Right);
        }
        press(&mut view, &services, KeyCode::Char(' '));
        assert_eq!(view.controller().state().fields.list(TECHNOLOGIES), ["React"]);
        assert_eq!(view.option_cursor, TECHNOLOGY_OPTIONS.len() - 1);
    }

    #[tokio::test]
    async fn test_escape_during_success_message_reports_record() {
        let mut gateway = MockSubmissionGateway::new();
        gateway.expect_update_request().times(1).returning(|id, _| {
            Ok(RequestRecord {
                id,
                project_title: "Edited".into(),
                ..Default::default()
            })
        });
        let (services, mut rx) = services_with(gateway, Duration::from_secs(60));
        let (mut view, open) = wrap(services.edit_wizard(&existing_request(), 1));

        assert_eq!(view.controller.submit(), SubmitOutcome::Started);
        view.controller.wait_for_submission().await;
        assert_eq!(view.controller().status(), WizardStatus::Succeeded);

        assert_eq!(press(&mut view, &services, KeyCode::Esc), WizardInputResult::Close);
        assert!(!open.get());
        match rx.try_recv() {
            Ok(AppEvent::Submitted {
                wizard_id: 1,
                record: SubmittedRecord::Request(record),
            }) => assert_eq!(record.project_title, "Edited"),
            other => panic!("expected submitted event, got {other:?}"),
        }
    }
}
