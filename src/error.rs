//! Error types and exit codes

use std::path::PathBuf;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::template::SearchPath;

/// Byte range in template source
pub type Span = std::ops::Range<usize>;

/// Process exit codes, one per failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Ok = 0,
    NoTemplateProvided = 1,
    TemplateNotFound = 2,
    ContextVariableNotProvided = 3,
    TemplateError = 4,
    InvalidArguments = 5,
    ConfigurationError = 6,
}

impl ExitStatus {
    /// Numeric process exit code
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Every way a single invocation can fail.
///
/// The `Display` output is the exact diagnostic shown to the user.
#[derive(Debug, Error)]
pub enum ConfiguratorError {
    #[error("{usage}\n\nERROR: you must specify a template")]
    NoTemplate { usage: String },

    #[error("ERROR: can not find template \"{name}\"\nERROR: search path was \"{search_path}\"")]
    TemplateNotFound {
        name: String,
        search_path: SearchPath,
    },

    #[error(
        "ERROR: \"{name}\" is used in the template.\nERROR: please provide a value for it by using \"--{name}=VALUE\""
    )]
    MissingVariable { name: String },

    /// Syntax or render failure reported by the template engine
    #[error("ERROR: template \"{name}\" failed: {message}\n{report}")]
    Template {
        name: String,
        message: String,
        report: String,
    },

    #[error("ERROR: can not read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Argument errors are rendered by clap itself
    #[error("{message}")]
    InvalidArguments { message: String },

    #[error("ERROR: invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl ConfiguratorError {
    /// Exit code the process terminates with for this error
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            ConfiguratorError::NoTemplate { .. } => ExitStatus::NoTemplateProvided,
            ConfiguratorError::TemplateNotFound { .. } => ExitStatus::TemplateNotFound,
            ConfiguratorError::MissingVariable { .. } => ExitStatus::ContextVariableNotProvided,
            ConfiguratorError::Template { .. } | ConfiguratorError::Io { .. } => {
                ExitStatus::TemplateError
            }
            ConfiguratorError::InvalidArguments { .. } => ExitStatus::InvalidArguments,
            ConfiguratorError::Config(_) => ExitStatus::ConfigurationError,
        }
    }

    /// Build a template error with a source-context report
    pub fn template(name: &str, source: &str, span: Span, message: impl Into<String>) -> Self {
        let message = message.into();
        let report = format_report(name, source, span, &message);
        ConfiguratorError::Template {
            name: name.to_string(),
            message,
            report,
        }
    }
}

/// Format an error with source context using ariadne
fn format_report(filename: &str, source: &str, span: Span, message: &str) -> String {
    let span = span.start.min(source.len())..span.end.min(source.len());
    let mut buf = Vec::new();

    let written = Report::build(ReportKind::Error, filename, span.start)
        .with_config(Config::default().with_color(false))
        .with_message(message)
        .with_label(
            Label::new((filename, span.clone()))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .write((filename, Source::from(source)), &mut buf);

    match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_message() {
        let err = ConfiguratorError::MissingVariable {
            name: "port".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ERROR: \"port\" is used in the template.\n\
             ERROR: please provide a value for it by using \"--port=VALUE\""
        );
        assert_eq!(err.exit_status().code(), 3);
    }

    #[test]
    fn test_not_found_message_names_search_path() {
        let err = ConfiguratorError::TemplateNotFound {
            name: "nope.conf".to_string(),
            search_path: SearchPath::new(vec![PathBuf::from("/a"), PathBuf::from("/b")]),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"nope.conf\""));
        assert!(msg.contains("/a, /b"));
        assert_eq!(err.exit_status(), ExitStatus::TemplateNotFound);
    }

    #[test]
    fn test_no_template_ends_with_error_line() {
        let err = ConfiguratorError::NoTemplate {
            usage: "Usage: x".to_string(),
        };
        assert!(err.to_string().ends_with("\n\nERROR: you must specify a template"));
        assert_eq!(err.exit_status().code(), 1);
    }

    #[test]
    fn test_template_report_points_at_source() {
        let err = ConfiguratorError::template("bad.txt", "Hello {{ name", 6..13, "unexpected end");
        let msg = err.to_string();
        assert!(msg.starts_with("ERROR: template \"bad.txt\" failed: unexpected end"));
        assert!(msg.contains("bad.txt"));
        assert!(msg.contains("Hello {{ name"));
        assert_eq!(err.exit_status(), ExitStatus::TemplateError);
    }

    #[test]
    fn test_report_clamps_out_of_range_span() {
        let err = ConfiguratorError::template("t", "abc", 10..20, "boom");
        assert!(err.to_string().contains("boom"));
    }
}
