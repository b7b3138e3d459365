use super::View;
use crate::app::AppCommand;
use crate::playback::LogReader;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::path::PathBuf;
use std::time::Duration;

pub struct LogSelectorState {
    log_files: Vec<PathBuf>,
    selected_index: usize,
    scroll_offset: usize,
    /// Visible failure notice from the last load attempt. The previously
    /// shown state is untouched; we only display why the open failed.
    notice: Option<String>,
}

impl LogSelectorState {
    pub fn new(log_dir: PathBuf) -> Result<Self> {
        let log_files = LogReader::list_logs(&log_dir)?;
        Ok(Self {
            log_files,
            selected_index: 0,
            scroll_offset: 0,
            notice: None,
        })
    }

    pub fn set_notice(&mut self, notice: String) {
        self.notice = Some(notice);
    }

    fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            if self.selected_index < self.scroll_offset {
                self.scroll_offset = self.selected_index;
            }
        }
    }

    fn move_selection_down(&mut self) {
        if self.selected_index < self.log_files.len().saturating_sub(1) {
            self.selected_index += 1;
        }
    }
}

impl View for LogSelectorState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppCommand::Quit),
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection_down();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection_up();
                None
            }
            KeyCode::Enter => {
                if self.selected_index < self.log_files.len() {
                    self.notice = None;
                    Some(AppCommand::OpenLog(
                        self.log_files[self.selected_index].clone(),
                    ))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn update(&mut self, _dt: Duration) {}

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("Match Replay Theater")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let list_area = chunks[1];
        let visible_height = list_area.height.saturating_sub(2) as usize;

        let scroll_offset = if self.selected_index >= self.scroll_offset + visible_height {
            self.selected_index.saturating_sub(visible_height.saturating_sub(1))
        } else if self.selected_index < self.scroll_offset {
            self.selected_index
        } else {
            self.scroll_offset
        };

        let items: Vec<ListItem> = self
            .log_files
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(visible_height)
            .map(|(i, path)| {
                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("Unknown");
                let style = if i == self.selected_index {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>3} ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(filename.to_string(), style),
                ]))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title("Select Match Log")
                .borders(Borders::ALL),
        );
        frame.render_widget(list, list_area);

        let help_line = if self.log_files.is_empty() {
            "No log files found. Press 'q' to quit.".to_string()
        } else {
            "↑/k: Up | ↓/j: Down | Enter: Open | q: Quit".to_string()
        };
        let (help_text, help_style) = match &self.notice {
            Some(notice) => (
                notice.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            None => (help_line, Style::default().fg(Color::DarkGray)),
        };

        let help = Paragraph::new(help_text)
            .style(help_style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }
}
