use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use std::path::PathBuf;
use std::time::Duration;

use crate::playback::LogReader;
use crate::views::{LogSelectorState, TheaterState, View};

#[derive(Debug)]
pub enum AppCommand {
    Quit,
    BackToSelector,
    OpenLog(PathBuf),
}

pub enum AppState {
    LogSelector(Box<LogSelectorState>),
    Theater(Box<TheaterState>),
}

pub struct App {
    pub state: AppState,
    pub log_dir: PathBuf,
}

impl App {
    pub fn new(log_dir: PathBuf) -> Result<Self> {
        let selector = LogSelectorState::new(log_dir.clone())?;
        Ok(Self {
            state: AppState::LogSelector(Box::new(selector)),
            log_dir,
        })
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match &mut self.state {
            AppState::LogSelector(selector) => selector.handle_input(key),
            AppState::Theater(theater) => theater.handle_input(key),
        }
    }

    pub fn update(&mut self, dt: Duration) {
        match &mut self.state {
            AppState::LogSelector(selector) => selector.update(dt),
            AppState::Theater(theater) => theater.update(dt),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        match &self.state {
            AppState::LogSelector(selector) => selector.render(frame),
            AppState::Theater(theater) => theater.render(frame),
        }
    }

    pub fn handle_command(&mut self, command: AppCommand) -> Result<()> {
        match command {
            AppCommand::OpenLog(path) => {
                // A failed load leaves the current state exactly as it was;
                // the selector just shows the failure.
                match LogReader::load_log(&path) {
                    Ok(log) => {
                        let file_name = path
                            .file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("log")
                            .to_string();
                        // Reloads reuse the live theater so the document
                        // swap goes through controller reset + scene clear.
                        match &mut self.state {
                            AppState::Theater(theater) => {
                                theater.load_document(log, file_name)
                            }
                            _ => {
                                self.state = AppState::Theater(Box::new(TheaterState::new(
                                    log, file_name,
                                )));
                            }
                        }
                    }
                    Err(err) => {
                        tracing::warn!("failed to open log {:?}: {:#}", path, err);
                        if let AppState::LogSelector(selector) = &mut self.state {
                            selector.set_notice(format!("Failed to open log: {:#}", err));
                        }
                    }
                }
            }
            AppCommand::BackToSelector => {
                let selector = LogSelectorState::new(self.log_dir.clone())?;
                self.state = AppState::LogSelector(Box::new(selector));
            }
            AppCommand::Quit => {
                // Handled in main loop
            }
        }
        Ok(())
    }
}
