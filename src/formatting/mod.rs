use colored::*;
use std::env;
use std::io::IsTerminal;

use crate::core::Bucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattingConfig {
    pub color: ColorMode,
    /// ASCII markers instead of symbols
    pub ascii: bool,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            ascii: false,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode, ascii: bool) -> Self {
        Self { color, ascii }
    }

    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // no-color.org
        if var("NO_COLOR").is_some() {
            config.color = ColorMode::Never;
        }

        if var("CLICOLOR").as_deref() == Some("0") {
            config.color = ColorMode::Never;
        }

        if var("CLICOLOR_FORCE").as_deref() == Some("1") {
            config.color = ColorMode::Always;
        }

        config
    }

    /// Create a plain output configuration (ASCII-only, no colors)
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            ascii: true,
        }
    }
}

pub trait OutputFormatter {
    fn success(&self, text: &str) -> String;
    fn error(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn info(&self, text: &str) -> String;
    fn header(&self, text: &str) -> String;
    fn bold(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
    /// Marker for a yes/no cell, e.g. the download flag.
    fn mark(&self, yes: bool) -> String;
    /// `text` styled after the bucket it belongs to.
    fn bucket(&self, bucket: Bucket, text: &str) -> String;
}

pub struct ColoredFormatter {
    config: FormattingConfig,
    use_color: bool,
}

impl ColoredFormatter {
    pub fn new(config: FormattingConfig) -> Self {
        let use_color = config.color.should_use_color();
        colored::control::set_override(use_color);

        Self { config, use_color }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    fn info(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan())
    }

    fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    fn mark(&self, yes: bool) -> String {
        match (yes, self.config.ascii) {
            (true, true) => self.success("yes"),
            (false, true) => self.dim("no"),
            (true, false) => self.success("✓"),
            (false, false) => self.dim("✗"),
        }
    }

    fn bucket(&self, bucket: Bucket, text: &str) -> String {
        match bucket {
            Bucket::Match => self.success(text),
            Bucket::Mismatch => self.error(text),
            Bucket::OnlyInput => self.warning(text),
            Bucket::OnlyCandidate => self.info(text),
        }
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
