//! Error handling for heat-viz
//!
//! Every fatal condition of a run is a [`HeatVizError`] variant. Library code
//! returns [`anyhow::Result`] and attaches file paths with `.with_context(..)`;
//! the binary converts whatever comes back into an [`ErrorContext`] through
//! [`user_friendly_error`] and prints it with a suggestion.
//!
//! Dropped edges are not errors: the edge resolver logs them and reports them
//! in its output, and the run continues.
//!
//! # Examples
//!
//! ```rust,no_run
//! use heat_viz::core::{HeatVizError, user_friendly_error};
//!
//! let error = HeatVizError::UnrecognizedDialect {
//!     marker: "2099-01-01x".to_string(),
//! };
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::dialect::Dialect;

/// The main error type for heat-viz operations.
#[derive(Error, Debug, Clone)]
pub enum HeatVizError {
    /// Input file or directory does not exist
    #[error("Input path not found: {path}")]
    InputNotFound {
        /// The path given on the command line
        path: String,
    },

    /// A role directory argument is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The offending argument
        path: String,
    },

    /// The template file is not valid YAML/JSON
    #[error("Invalid template syntax in {file}")]
    TemplateParseError {
        /// Path to the template file
        file: String,
        /// Parser message
        reason: String,
    },

    /// None of the known version markers carries a recognized value
    ///
    /// `marker` is the value found in the document, or `<none>` when the
    /// document carries no version marker at all.
    #[error("Unrecognized template dialect: version marker '{marker}'")]
    UnrecognizedDialect {
        /// The offending marker value
        marker: String,
    },

    /// A resource passed the type allow-list but fits no shape category
    #[error("Unexpected resource type '{resource_type}' for resource '{resource}'")]
    UnexpectedResourceType {
        /// Resource key
        resource: String,
        /// Declared type
        resource_type: String,
    },

    /// The resource section or an entry in it has the wrong structure
    #[error("Malformed template: {reason}")]
    MalformedTemplate {
        /// What was wrong
        reason: String,
    },

    /// A filter, tag or exclude pattern failed to compile
    #[error("Invalid pattern '{pattern}'")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Regex compiler message
        reason: String,
    },

    /// A role manifest could not be parsed
    #[error("Invalid role manifest {file}")]
    RoleParseError {
        /// Path to the manifest
        file: String,
        /// Parser message
        reason: String,
    },

    /// The HTML template failed to compile or render
    #[error("Failed to render page '{page}'")]
    RenderError {
        /// Name of the page being rendered
        page: String,
        /// Tera message, including its source chain
        reason: String,
    },

    /// Configuration file problems
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// Catch-all with a preformatted message
    #[error("{message}")]
    Other {
        /// Message shown to the user
        message: String,
    },
}

/// An error plus optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: HeatVizError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Why it happened
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion or details.
    #[must_use]
    pub const fn new(error: HeatVizError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with an actionable suggestion.
///
/// Recognizes [`HeatVizError`] anywhere in the chain (context layers added
/// with `.with_context(..)` are kept in the details), [`std::io::Error`] and
/// [`toml::de::Error`]. Anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(heat_error) = error.chain().find_map(|e| e.downcast_ref::<HeatVizError>()) {
        let mut context = create_error_context(heat_error.clone());
        let outer = error.to_string();
        if outer != heat_error.to_string() && context.details.is_none() {
            context = context.with_details(outer);
        }
        return context;
    }

    if let Some(io_error) = error.chain().find_map(|e| e.downcast_ref::<std::io::Error>()) {
        let kind = io_error.kind();
        let context = ErrorContext::new(HeatVizError::Other {
            message: error.to_string(),
        })
        .with_details(io_error.to_string());
        return match kind {
            std::io::ErrorKind::PermissionDenied => context
                .with_suggestion("Check file ownership and permissions of the input and output paths"),
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the file or directory exists and the path is correct"),
            _ => context,
        };
    }

    if let Some(toml_error) = error.chain().find_map(|e| e.downcast_ref::<toml::de::Error>()) {
        return ErrorContext::new(HeatVizError::ConfigError {
            message: error.to_string(),
        })
        .with_details(toml_error.to_string())
        .with_suggestion("Check the TOML syntax of your heat-viz configuration file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(HeatVizError::Other {
        message,
    })
}

fn create_error_context(error: HeatVizError) -> ErrorContext {
    match &error {
        HeatVizError::InputNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the path; template mode expects a single YAML or JSON file"),
        HeatVizError::NotADirectory {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Role mode expects directories of *.json role manifests, e.g. chef-repo/roles",
        ),
        HeatVizError::TemplateParseError {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_details(reason)
                .with_suggestion("Check indentation and quoting; JSON templates are accepted too")
        }
        HeatVizError::UnrecognizedDialect {
            marker,
        } => {
            let suggestion = match Dialect::closest_version(marker) {
                Some(close) => format!("Did you mean '{close}'?"),
                None => format!(
                    "Add a version marker: {}",
                    Dialect::all()
                        .iter()
                        .map(|d| d.fields().version_markers[0])
                        .collect::<Vec<_>>()
                        .join(" or ")
                ),
            };
            ErrorContext::new(error).with_suggestion(suggestion).with_details(
                "HOT templates use 'heat_template_version' (a date or a release name); \
                 CFN templates use 'HeatTemplateFormatVersion: 2012-12-12' or \
                 'AWSTemplateFormatVersion: 2010-09-09'",
            )
        }
        HeatVizError::UnexpectedResourceType {
            ..
        } => ErrorContext::new(error).with_details(
            "Only deployment, config and server resources can be drawn",
        ),
        HeatVizError::MalformedTemplate {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Every resource must be a mapping with a string type field"),
        HeatVizError::InvalidPattern {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_details(reason)
                .with_suggestion("Patterns are regular expressions; escape literal brackets")
        }
        HeatVizError::RoleParseError {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_details(reason)
                .with_suggestion("A role manifest needs a 'name' and an optional 'run_list' array")
        }
        HeatVizError::RenderError {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error).with_details(reason).with_suggestion(
                "Check the custom page template; it receives title, now, dotdata, notes, nav and nav2",
            )
        }
        HeatVizError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check ~/.heat-viz/config.toml or the file passed with --config"),
        HeatVizError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
