//! Path-addressed diagnostics for a config pipeline run.
//!
//! A `Report` is created once per invocation and only accumulates: it records
//! errors, deprecations and hints but never decides anything. Callers check
//! `has_errors()` after validation and either discard the report or attach it
//! to a `SproutError::ConfigValidation`.

use crate::types::{ConfigPath, ConfigValue};
use crate::utils::pluralise;

/// Kind of a diagnostic, used to pick headings and styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Error,
    Deprecation,
    Hint,
}

/// A config value that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValueError {
    pub path: ConfigPath,
    pub value: ConfigValue,
    pub message: String,
}

/// A deprecation warning or hint
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub path: ConfigPath,
    pub messages: Vec<String>,
}

/// Accumulated diagnostics plus where the config came from
#[derive(Debug, Clone, Default)]
pub struct Report {
    config_path: Option<String>,
    has_argument_overrides: bool,
    errors: Vec<ValueError>,
    deprecations: Vec<Notice>,
    hints: Vec<Notice>,
}

/// Styling hooks for `Report::render_with`.
///
/// Every method receives plain text and returns the text to emit; the
/// defaults leave it untouched.
pub trait ReportStyle {
    /// The report title line
    fn title(&self, text: &str) -> String {
        text.to_string()
    }

    /// A section heading such as `2 Errors`
    fn section(&self, _kind: DiagnosticKind, text: &str) -> String {
        text.to_string()
    }

    /// The symbol and path leading each diagnostic block
    fn marker(&self, _kind: DiagnosticKind, text: &str) -> String {
        text.to_string()
    }

    /// Separators between a path and its value
    fn punctuation(&self, text: &str) -> String {
        text.to_string()
    }

    /// The line shown for an empty report
    fn success(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Unstyled rendering
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyle;

impl ReportStyle for PlainStyle {}

impl DiagnosticKind {
    fn symbol(&self) -> &'static str {
        match self {
            DiagnosticKind::Error => "✖",
            DiagnosticKind::Deprecation => "⚠",
            DiagnosticKind::Hint => "ℹ",
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Deprecation => "Deprecation Warning",
            DiagnosticKind::Hint => "Hint",
        }
    }
}

impl Report {
    /// Create a report for a config loaded from `config_path`, or for
    /// defaults only when there is no config file
    pub fn new(config_path: Option<String>) -> Self {
        Self {
            config_path,
            ..Self::default()
        }
    }

    pub fn config_file_exists(&self) -> bool {
        self.config_path.is_some()
    }

    pub fn config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }

    pub fn has_argument_overrides(&self) -> bool {
        self.has_argument_overrides
    }

    /// Mark that CLI arguments contributed config
    pub fn set_argument_overrides(&mut self, present: bool) {
        self.has_argument_overrides = present;
    }

    pub fn error(&mut self, path: ConfigPath, value: ConfigValue, message: impl Into<String>) {
        self.errors.push(ValueError {
            path,
            value,
            message: message.into(),
        });
    }

    pub fn deprecated<I, S>(&mut self, path: ConfigPath, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deprecations.push(Notice {
            path,
            messages: messages.into_iter().map(Into::into).collect(),
        });
    }

    pub fn hint<I, S>(&mut self, path: ConfigPath, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hints.push(Notice {
            path,
            messages: messages.into_iter().map(Into::into).collect(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_something_to_report(&self) -> bool {
        self.errors.len() + self.deprecations.len() + self.hints.len() > 0
    }

    pub fn errors(&self) -> &[ValueError] {
        &self.errors
    }

    pub fn deprecations(&self) -> &[Notice] {
        &self.deprecations
    }

    pub fn hints(&self) -> &[Notice] {
        &self.hints
    }

    /// Human description of where the config came from
    pub fn config_source(&self) -> String {
        match (&self.config_path, self.has_argument_overrides) {
            (Some(path), true) => format!("{} (with CLI argument overrides)", path),
            (Some(path), false) => path.clone(),
            (None, true) => "config via CLI arguments".to_string(),
            (None, false) => "default config".to_string(),
        }
    }

    /// One-line description used as the validation error message
    pub fn summary(&self) -> String {
        let count = self.errors.len();
        format!(
            "Invalid config: {} error{} in {}",
            count,
            pluralise(count),
            self.config_source()
        )
    }

    /// Render the report as plain text
    pub fn render(&self) -> String {
        self.render_with(&PlainStyle)
    }

    /// Render the report, letting `style` decorate each part
    pub fn render_with(&self, style: &dyn ReportStyle) -> String {
        let mut lines = vec![
            style.title(&format!("sprout config report for {}", self.config_source())),
            String::new(),
        ];

        if !self.has_something_to_report() {
            lines.push(style.success("✔ Nothing to report!"));
            return lines.join("\n");
        }

        if !self.errors.is_empty() {
            lines.push(style.section(
                DiagnosticKind::Error,
                &section_heading(DiagnosticKind::Error, self.errors.len()),
            ));
            lines.push(String::new());
        }
        for ValueError { path, value, message } in &self.errors {
            lines.push(format!(
                "{} {} {}",
                style.marker(
                    DiagnosticKind::Error,
                    &format!("{} {}", DiagnosticKind::Error.symbol(), path)
                ),
                style.punctuation("="),
                value.inspect()
            ));
            lines.push(format!("  {}", message));
            lines.push(String::new());
        }

        render_notices(&mut lines, style, DiagnosticKind::Deprecation, &self.deprecations);
        render_notices(&mut lines, style, DiagnosticKind::Hint, &self.hints);

        lines.join("\n")
    }
}

fn section_heading(kind: DiagnosticKind, count: usize) -> String {
    let prefix = if count > 1 {
        format!("{} ", count)
    } else {
        String::new()
    };
    format!("{}{}{}", prefix, kind.heading(), pluralise(count))
}

fn render_notices(
    lines: &mut Vec<String>,
    style: &dyn ReportStyle,
    kind: DiagnosticKind,
    notices: &[Notice],
) {
    if notices.is_empty() {
        return;
    }
    lines.push(style.section(kind, &section_heading(kind, notices.len())));
    lines.push(String::new());
    for Notice { path, messages } in notices {
        lines.push(style.marker(kind, &format!("{} {}", kind.symbol(), path)));
        for message in messages {
            lines.push(format!("  {}", message));
        }
        lines.push(String::new());
    }
}
