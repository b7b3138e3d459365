use super::View;
use crate::app::AppCommand;
use crate::playback::{Advance, PlaybackController, PlaybackState};
use crate::render::MapRenderer;
use crate::scene::Scene;
use common::{project, GameLog, Meeting};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
enum LayoutMode {
    SingleColumn,
    TwoColumn,
}

impl LayoutMode {
    fn from_dimensions(width: u16, height: u16) -> Self {
        let aspect_ratio = width as f32 / height as f32;
        const MIN_WIDTH_FOR_TWO_COLUMN: u16 = 100;
        const ASPECT_RATIO_THRESHOLD: f32 = 1.8;

        if width >= MIN_WIDTH_FOR_TWO_COLUMN && aspect_ratio >= ASPECT_RATIO_THRESHOLD {
            LayoutMode::TwoColumn
        } else {
            LayoutMode::SingleColumn
        }
    }
}

pub struct TheaterState {
    controller: PlaybackController,
    scene: Scene,
    overlay_open: bool,
    file_name: String,
}

impl TheaterState {
    pub fn new(log: GameLog, file_name: String) -> Self {
        let mut state = Self {
            controller: PlaybackController::new(log),
            scene: Scene::new(),
            overlay_open: false,
            file_name,
        };
        state.sync_scene();
        state
    }

    /// Atomic document replace on a live theater: resets the controller,
    /// drops every retained element from the prior document, closes any
    /// overlay, and projects round 0 of the new log.
    pub fn load_document(&mut self, log: GameLog, file_name: String) {
        self.controller.load(log);
        self.scene.clear();
        self.overlay_open = false;
        self.file_name = file_name;
        self.sync_scene();
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Projects the current round and applies it to the retained scene.
    /// Called after every index change.
    fn sync_scene(&mut self) {
        let log = self.controller.log();
        let derived = project(
            log.get_round(self.controller.current_round_idx()),
            &log.all_roles,
        );
        self.scene.apply(&derived);
    }

    fn current_meetings(&self) -> Vec<&Meeting> {
        self.controller
            .log()
            .meetings_for(self.controller.current_round_number())
            .collect()
    }
}

impl View for TheaterState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        // While the meeting overlay is open everything except closing it
        // is disabled.
        if self.overlay_open {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') | KeyCode::Enter
            ) {
                self.overlay_open = false;
            }
            return None;
        }

        match key.code {
            KeyCode::Char(' ') => {
                self.controller.toggle_play();
                None
            }
            KeyCode::Left => {
                self.controller.step_back(1);
                self.sync_scene();
                None
            }
            KeyCode::Right => {
                self.controller.step_forward(1);
                self.sync_scene();
                None
            }
            KeyCode::Char('h') => {
                self.controller.step_back(5);
                self.sync_scene();
                None
            }
            KeyCode::Char('l') => {
                self.controller.step_forward(5);
                self.sync_scene();
                None
            }
            KeyCode::Home => {
                self.controller.go_to(0);
                self.sync_scene();
                None
            }
            KeyCode::End => {
                self.controller
                    .go_to(self.controller.log().total_rounds() as i64);
                self.sync_scene();
                None
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = self.controller.speed();
                self.controller.set_speed(speed - 0.2);
                None
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                let speed = self.controller.speed();
                self.controller.set_speed(speed + 0.2);
                None
            }
            KeyCode::Char('m') => {
                if !self.current_meetings().is_empty() {
                    self.overlay_open = true;
                }
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(AppCommand::BackToSelector),
            _ => None,
        }
    }

    fn update(&mut self, dt: Duration) {
        if let Some(advance) = self.controller.update(dt) {
            match advance {
                Advance::Stepped => self.sync_scene(),
                Advance::MeetingReached => {
                    self.sync_scene();
                    self.overlay_open = true;
                }
                Advance::Finished => {}
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        match LayoutMode::from_dimensions(frame.area().width, frame.area().height) {
            LayoutMode::SingleColumn => self.render_single_column(frame),
            LayoutMode::TwoColumn => self.render_two_column(frame),
        }
        if self.overlay_open {
            self.render_overlay(frame);
        }
    }
}

impl TheaterState {
    fn render_single_column(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(18),    // Ship map
                Constraint::Length(10), // Round actions
                Constraint::Length(3),  // Header
                Constraint::Length(3),  // Progress
                Constraint::Length(4),  // Status
                Constraint::Length(3),  // Controls help
            ])
            .split(frame.area());

        self.render_map(frame, chunks[0]);
        self.render_round_info(frame, chunks[1]);
        frame.render_widget(self.render_header(), chunks[2]);
        frame.render_widget(self.render_progress(), chunks[3]);
        frame.render_widget(self.render_status(), chunks[4]);
        frame.render_widget(self.render_controls(), chunks[5]);
    }

    fn render_two_column(&self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .margin(1)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(frame.area());

        self.render_map(frame, main_chunks[0]);

        let info_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),   // Round actions
                Constraint::Length(3), // Header
                Constraint::Length(3), // Progress
                Constraint::Length(4), // Status
                Constraint::Length(3), // Controls help
            ])
            .split(main_chunks[1]);

        self.render_round_info(frame, info_chunks[0]);
        frame.render_widget(self.render_header(), info_chunks[1]);
        frame.render_widget(self.render_progress(), info_chunks[2]);
        frame.render_widget(self.render_status(), info_chunks[3]);
        frame.render_widget(self.render_controls(), info_chunks[4]);
    }

    fn render_map(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("Ship Map [{}]", self.file_name))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let renderer = MapRenderer::new(inner.width, inner.height);
        frame.render_widget(Paragraph::new(renderer.render(&self.scene)), inner);
    }

    fn render_header(&self) -> Paragraph {
        let state_label = match self.controller.state() {
            PlaybackState::Playing => "▶ Playing",
            PlaybackState::Paused => "⏸ Paused",
            PlaybackState::Idle => "◼ Idle",
        };
        let title = format!(
            "ROUND {:02} / {:02} | {:.1}s per round | {}",
            self.controller.current_round_number(),
            self.controller.log().last_round_number(),
            self.controller.speed(),
            state_label,
        );

        Paragraph::new(title)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_progress(&self) -> Gauge<'static> {
        let total = self.controller.log().total_rounds();
        let idx = self.controller.current_round_idx();
        let ratio = if total > 1 {
            idx as f64 / (total - 1) as f64
        } else {
            1.0
        };
        Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio)
            .label(format!("{} / {}", idx + 1, total))
    }

    fn render_round_info(&self, frame: &mut Frame, area: Rect) {
        let round = self.controller.log().get_round(self.controller.current_round_idx());
        let mut lines = Vec::new();

        for (pid, action) in &round.actions {
            let outcome = round.results.get(pid);
            let success = outcome.map(|o| o.success).unwrap_or(false);
            let style = if success {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };

            let mut text = format!("{}: {}", pid, action.action);
            if let Some(target) = &action.target {
                text.push(' ');
                text.push_str(target);
            }
            if !success {
                if let Some(reason) = outcome.and_then(|o| o.reason.as_deref()) {
                    text.push_str(&format!(" ({})", reason));
                }
            }
            lines.push(Line::from(Span::styled(text, style)));
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "No actions this round",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let info = Paragraph::new(lines)
            .block(
                Block::default()
                    .title("Round Actions")
                    .borders(Borders::ALL),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(info, area);
    }

    fn render_status(&self) -> Paragraph {
        let log = self.controller.log();
        let round = log.get_round(self.controller.current_round_idx());
        let mut lines = Vec::new();

        let alive = round.state.alive_players.len();
        let total = round.state.player_locations.len();
        lines.push(Line::from(format!("Alive: {} / {}", alive, total)));

        match log.winner {
            Some(winner) => {
                let cause = log.cause_display().unwrap_or_default();
                lines.push(Line::from(Span::styled(
                    format!("Winner: {:?} {}", winner, cause).to_uppercase(),
                    Style::default().fg(Color::Yellow),
                )));
            }
            None => {
                if let Some(sabotage) = &round.state.sabotage {
                    let kind = sabotage.kind.as_deref().unwrap_or("unknown");
                    lines.push(Line::from(Span::styled(
                        format!("SABOTAGE: {}", kind.to_uppercase()),
                        Style::default().fg(Color::Yellow),
                    )));
                }
            }
        }

        Paragraph::new(lines).block(Block::default().borders(Borders::ALL))
    }

    fn render_controls(&self) -> Paragraph {
        let meetings_hint = if self.current_meetings().is_empty() {
            ""
        } else {
            " | m: Meeting"
        };
        let text = format!(
            "Space: Play/Pause | ←/→: ±1 | h/l: ±5 | Home/End: Jump | +/-: Speed{} | q: Back",
            meetings_hint
        );
        Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_overlay(&self, frame: &mut Frame) {
        let meetings = self.current_meetings();
        if meetings.is_empty() {
            return;
        }

        let area = centered_rect(80, 80, frame.area());
        frame.render_widget(Clear, area);

        let log = self.controller.log();
        let mut lines = Vec::new();
        for meeting in &meetings {
            lines.push(Line::from(Span::styled(
                format!(
                    "MEETING CALLED BY {} ({})",
                    meeting.called_by.to_uppercase(),
                    meeting.trigger
                ),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            if let Some(location) = &meeting.body_location {
                let found = meeting.body_found.as_deref().unwrap_or("a body");
                lines.push(Line::from(format!("Body found: {} in {}", found, location)));
            }
            lines.push(Line::from(""));

            for msg in &meeting.transcript {
                let color = if log.role_of(&msg.speaker).is_impostor() {
                    Color::Red
                } else {
                    Color::Cyan
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("[{}] {}: ", msg.rotation, msg.speaker),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(msg.message.clone()),
                ]));
            }

            if !meeting.vote_tally.is_empty() {
                let tally = meeting
                    .sorted_tally()
                    .into_iter()
                    .map(|(target, count)| format!("{}: {}", target, count))
                    .collect::<Vec<_>>()
                    .join(" | ");
                lines.push(Line::from(""));
                lines.push(Line::from(format!("Votes: {}", tally)));
            }

            lines.push(Line::from(Span::styled(
                format!("RESULT: {}", meeting.result_line()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }

        let overlay = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(
                        "EMERGENCY MEETING: ROUND {} (Esc to close)",
                        self.controller.current_round_number()
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(overlay, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
