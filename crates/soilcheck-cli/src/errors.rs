use console::style;
use soilcheck_core::models::ErrorClass;
use soilcheck_core::SoilcheckError;
use soilcheck_llm::SUPPORTED_MIME_TYPES;
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a failed analysis, with remediation per failure class
pub fn analysis_failed(class: ErrorClass, message: &str) -> CliError {
    let error = CliError::new("Soil analysis failed").with_context(message.to_string());

    match class {
        ErrorClass::InvalidInput => error
            .with_suggestion("Pick a soil category: soilcheck crops")
            .with_suggestion("Pass a crop with --crop")
            .with_help("Run: soilcheck analyze --help"),
        ErrorClass::RateLimited => error
            .with_suggestion("Wait a minute and run the same command again")
            .with_suggestion("If the daily quota is exhausted, try again tomorrow or use another API key"),
        ErrorClass::Unknown => error
            .with_suggestion("Check your internet connection")
            .with_suggestion("Verify the endpoint and API key: soilcheck config")
            .with_suggestion("Set SOILCHECK_API_KEY or add api_key to soilcheck.toml")
            .with_help("Run: soilcheck config"),
    }
}

/// Create error for a missing image file
pub fn image_not_found(path: &Path) -> CliError {
    CliError::new("Image file not found")
        .with_context(format!("The specified image does not exist.\n\nPath: {}", path.display()))
        .with_suggestion("Check the file path and try again")
        .with_help("Run: soilcheck image --help")
}

/// Create error for an image whose type cannot be used
pub fn unsupported_image_type(path: &Path, mime: Option<&str>) -> CliError {
    let context = match mime {
        Some(mime) => format!("Image type '{}' is not supported.\n\nPath: {}", mime, path.display()),
        None => format!(
            "Cannot infer the image type from the file extension.\n\nPath: {}",
            path.display()
        ),
    };

    CliError::new("Unsupported image type")
        .with_context(context)
        .with_suggestion(format!("Use one of: {}", SUPPORTED_MIME_TYPES.join(", ")))
        .with_suggestion("Or pass the type explicitly: --mime image/jpeg")
        .with_help("Run: soilcheck image --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check soilcheck.toml for syntax errors")
        .with_suggestion("Check SOILCHECK_* environment variables and command-line flags")
        .with_help("Run: soilcheck config")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let error = match error.downcast::<CliError>() {
        Ok(cli_error) => return cli_error,
        Err(error) => error,
    };

    if let Some(SoilcheckError::ConfigInvalid { key, reason }) = error.downcast_ref::<SoilcheckError>() {
        return invalid_config(key, reason);
    }

    let message = format!("{:#}", error);

    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.contains("permission denied") || message.contains("Permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
    } else {
        CliError::new(message)
    }
}
