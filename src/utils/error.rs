use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },

    #[error("Validation failed: {}", .errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    #[error("Email provider request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Email provider rejected the message ({status}): {message}")]
    ProviderRejected { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Provider,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LeadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LeadError::InvalidPayload { .. } | LeadError::ValidationFailed { .. } => {
                ErrorCategory::Input
            }
            LeadError::ConfigError { .. }
            | LeadError::MissingConfigError { .. }
            | LeadError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            LeadError::ApiError(_) | LeadError::ProviderRejected { .. } => ErrorCategory::Provider,
            LeadError::IoError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者輸入錯誤，不影響服務
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Provider => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// HTTP status reported to the submitting client.
    pub fn status_code(&self) -> u16 {
        match self {
            LeadError::InvalidPayload { .. } | LeadError::ValidationFailed { .. } => 400,
            LeadError::ProviderRejected { .. } => 502,
            _ => 500,
        }
    }

    /// Stable machine-readable code placed in the `error` field of responses.
    pub fn code(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "invalid_payload",
            ErrorCategory::Configuration => "server_misconfigured",
            ErrorCategory::Provider => "email_send_failed",
            ErrorCategory::Internal => "server_error",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LeadError::InvalidPayload { .. } => "Payload non valido".to_string(),
            LeadError::ValidationFailed { errors } => errors.join(", "),
            LeadError::MissingConfigError { field } => {
                format!("Server misconfigured: missing {}", field)
            }
            LeadError::ConfigError { message } => format!("Server misconfigured: {}", message),
            LeadError::InvalidConfigValueError { field, reason, .. } => {
                format!("Server misconfigured: {} {}", field, reason)
            }
            LeadError::ProviderRejected { message, .. } => message.clone(),
            LeadError::ApiError(_) => "Email provider unreachable".to_string(),
            LeadError::IoError(_) => "Internal server error".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LeadError::InvalidPayload { .. } => "Send a JSON object as the request body",
            LeadError::ValidationFailed { .. } => "Correct the listed fields and resubmit",
            LeadError::MissingConfigError { .. } => {
                "Set RESEND_API_KEY, CONTACT_TO_EMAIL and RESEND_FROM (or their aliases)"
            }
            LeadError::ConfigError { .. } | LeadError::InvalidConfigValueError { .. } => {
                "Check the configuration file and environment variables"
            }
            LeadError::ProviderRejected { .. } => {
                "Check the Resend API key and that the sender domain is verified"
            }
            LeadError::ApiError(_) => "Check network connectivity to the email provider",
            LeadError::IoError(_) => "Inspect the server logs for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, LeadError>;
