//! Terminal styling for the config report.

use sprout_core::{DiagnosticKind, ReportStyle};

use super::colors::{ColorSupport, CYAN, RED, YELLOW};

/// Colors report headings and markers by diagnostic kind
pub struct ColorReportStyle {
    colors: ColorSupport,
}

impl ColorReportStyle {
    pub fn new(colors: ColorSupport) -> Self {
        Self { colors }
    }

    fn code(kind: DiagnosticKind) -> &'static str {
        match kind {
            DiagnosticKind::Error => RED,
            DiagnosticKind::Deprecation => YELLOW,
            DiagnosticKind::Hint => CYAN,
        }
    }
}

impl ReportStyle for ColorReportStyle {
    fn title(&self, text: &str) -> String {
        self.colors.underline(None, &self.colors.bold(text))
    }

    fn section(&self, kind: DiagnosticKind, text: &str) -> String {
        self.colors.underline(Some(Self::code(kind)), text)
    }

    fn marker(&self, kind: DiagnosticKind, text: &str) -> String {
        match kind {
            DiagnosticKind::Error => self.colors.red(text),
            DiagnosticKind::Deprecation => self.colors.yellow(text),
            DiagnosticKind::Hint => self.colors.cyan(text),
        }
    }

    fn punctuation(&self, text: &str) -> String {
        self.colors.dim(text)
    }

    fn success(&self, text: &str) -> String {
        self.colors.green(text)
    }
}
