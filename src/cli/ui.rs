//! Terminal styling and progress indicators
//!
//! Colors are applied only while the `colorOutput` feature is on and
//! progress bars are drawn only while `showProgress` is on.

use crate::config::Features;
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Output style derived from the feature toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ui {
    color: bool,
    progress: bool,
}

impl Ui {
    pub fn new(color: bool, progress: bool) -> Self {
        Self { color, progress }
    }

    pub fn from_features(features: &Features) -> Self {
        Self::new(features.color_output, features.show_progress)
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warn(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn info(&self, text: &str) -> String {
        if self.color {
            text.blue().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }

    /// Bar over `len` steps; hidden when progress display is off
    pub fn progress_bar(&self, len: u64, prefix: &str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_prefix(prefix.to_string());
        let template = if self.color {
            "{prefix} [{wide_bar:.cyan/blue}] {pos}/{len}"
        } else {
            "{prefix} [{wide_bar}] {pos}/{len}"
        };
        pb.set_style(
            ProgressStyle::with_template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }

    /// Spinner for a single request; hidden when progress display is off
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_without_color() {
        let ui = Ui::new(false, false);
        assert_eq!(ui.success("done"), "done");
        assert_eq!(ui.error("failed"), "failed");
        assert_eq!(ui.heading("Menu"), "Menu");
    }

    #[test]
    fn test_colored_output_wraps_text() {
        let ui = Ui::new(true, false);
        let styled = ui.heading("done");
        assert!(styled.contains("done"));
        assert!(styled.contains('\u{1b}'));
    }

    #[test]
    fn test_progress_hidden_when_disabled() {
        let ui = Ui::new(false, false);
        assert!(ui.progress_bar(10, "Geocoding").is_hidden());
        assert!(ui.spinner("Working").is_hidden());
    }

    #[test]
    fn test_from_features() {
        let features = Features {
            color_output: false,
            ..Features::default()
        };
        assert_eq!(Ui::from_features(&features), Ui::new(false, true));
    }
}
