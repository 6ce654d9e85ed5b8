//! Error adapter for converting CliError to miette diagnostics.
//!
//! This module provides the bridge between the CLI's standard error type and
//! miette's rich diagnostic formatting. Graph file parse errors carry their
//! source and span, so they render with a labeled snippet.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use forcelink::LayoutError;

use crate::error::CliError;

/// Adapter exposing a [`CliError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Io(_) => "forcelink::io",
            CliError::ConfigParse(_) | CliError::MissingConfig(_) => "forcelink::config",
            CliError::GraphFile { .. } => "forcelink::graph_file",
            CliError::Collection(_) => "forcelink::graph",
            CliError::Layout(LayoutError::Config(_)) => "forcelink::config",
            CliError::Layout(_) => "forcelink::layout",
            CliError::Output(_) => "forcelink::output",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Collection(_) => {
                "declare parents before their children and nodes before their edges"
            }
            CliError::MissingConfig(_) => "omit --config to fall back to the default configuration",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            CliError::GraphFile { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let CliError::GraphFile {
            message,
            span: Some(span),
            ..
        } = self.0
        else {
            return None;
        };
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(message.clone()), span),
        )))
    }
}

/// Convert a [`CliError`] into a list of reportable errors.
///
/// Every error currently maps to a single report.
pub fn to_reportables(err: &CliError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}

#[cfg(test)]
mod tests {
    use forcelink::config::ConfigError;

    use super::*;
    use crate::graph_file::GraphFile;

    #[test]
    fn test_graph_file_error_has_label() {
        let src = "[[nodes]]\nid = 3\n";
        let toml_err = GraphFile::parse(src).unwrap_err();
        let err = CliError::graph_file("broken.toml", src, &toml_err);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let adapter = &reportables[0];
        assert_eq!(adapter.code().unwrap().to_string(), "forcelink::graph_file");
        assert!(adapter.source_code().is_some());

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
    }

    #[test]
    fn test_config_error_code() {
        let err = CliError::from(ConfigError::Invalid {
            field: "iterations",
            reason: "must be positive".to_string(),
        });

        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "forcelink::config");
        assert!(adapter.labels().is_none());
        assert_eq!(
            adapter.to_string(),
            "Configuration error: Invalid configuration value for `iterations`: must be positive"
        );
    }

    #[test]
    fn test_io_error_has_no_snippet() {
        let err = CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));

        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "forcelink::io");
        assert!(adapter.source_code().is_none());
        assert!(adapter.help().is_none());
    }
}
