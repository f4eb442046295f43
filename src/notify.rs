//! User-facing notices and transient status lines.
//!
//! Controllers report everything the user should see through the
//! [`Notifier`] trait: one-shot notices (validation problems, failures,
//! confirmations) and a transient status line while a scan is in flight.
//! The default [`ConsoleNotifier`] prints notices to the terminal and
//! shows the status line as a spinner.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

pub trait Notifier: Send + Sync {
    /// Surface a one-shot message to the user.
    fn notice(&self, level: NoticeLevel, message: &str);

    /// Show a transient status line, or clear it with `None`.
    fn status(&self, text: Option<&str>);
}

/// Terminal notifier: colored notice lines plus a spinner for status.
pub struct ConsoleNotifier {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn notice(&self, level: NoticeLevel, message: &str) {
        let prefix = match level {
            NoticeLevel::Info => "\x1b[34minfo\x1b[0m",
            NoticeLevel::Success => "\x1b[32mok\x1b[0m",
            NoticeLevel::Error => "\x1b[31merror\x1b[0m",
        };
        let line = format!("{}: {}", prefix, message);

        let guard = self.spinner.lock().unwrap();
        match guard.as_ref() {
            Some(pb) => pb.println(line),
            None if level == NoticeLevel::Error => eprintln!("{}", line),
            None => println!("{}", line),
        }
    }

    fn status(&self, text: Option<&str>) {
        let mut guard = self.spinner.lock().unwrap();
        match text {
            Some(message) => {
                let pb = guard.get_or_insert_with(|| {
                    let pb = ProgressBar::new_spinner();
                    pb.set_style(
                        ProgressStyle::default_spinner()
                            .template("{spinner:.green} {msg}")
                            .unwrap(),
                    );
                    pb.enable_steady_tick(Duration::from_millis(100));
                    pb
                });
                pb.set_message(message.to_string());
            }
            None => {
                if let Some(pb) = guard.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }
}

/// Test notifier that records everything it is told.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<(NoticeLevel, String)>>,
    pub statuses: Mutex<Vec<Option<String>>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn has_notice(&self, level: NoticeLevel, fragment: &str) -> bool {
        self.notices()
            .iter()
            .any(|(l, m)| *l == level && m.contains(fragment))
    }

    pub fn error_count(&self) -> usize {
        self.notices()
            .iter()
            .filter(|(l, _)| *l == NoticeLevel::Error)
            .count()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notice(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }

    fn status(&self, text: Option<&str>) {
        self.statuses
            .lock()
            .unwrap()
            .push(text.map(|t| t.to_string()));
    }
}
