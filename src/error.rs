use thiserror::Error;

/// Structured error context for locating a failure inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Parameter name or path that caused the error
    /// (e.g., "videoInput.videoInputValues[0].avatarId")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., upstream request id)
    pub details: Option<String>,
    /// Source of the error (e.g., "request_builder", "http_transport")
    pub source: Option<String>,
    /// Operation being executed, as `resource.operation`
    pub operation: Option<String>,
    /// Index of the input item the error belongs to
    pub item_index: Option<usize>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
            operation: None,
            item_index: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_item_index(mut self, index: usize) -> Self {
        self.item_index = Some(index);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type.
///
/// `Validation`, `MissingBinary` and `Api` are the per-item kinds: they are
/// confined to one input item and become `{ "error": ... }` records when the
/// batch runs in continue-on-fail mode.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Missing binary data: {message}{}", format_context(.context))]
    MissingBinary {
        message: String,
        context: ErrorContext,
    },

    #[error("HeyGen API error{}: {message}{}", format_status(.status), format_context(.context))]
    Api {
        status: Option<u16>,
        message: String,
        /// Upstream response body, when the service returned one.
        body: Option<String>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Execution cancelled")]
    Cancelled,
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref op) = ctx.operation {
        parts.push(format!("operation: {}", op));
    }
    if let Some(index) = ctx.item_index {
        parts.push(format!("item: {}", index));
    }
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn missing_binary(msg: impl Into<String>) -> Self {
        Error::MissingBinary {
            message: msg.into(),
            context: ErrorContext::new().with_source("request_builder"),
        }
    }

    pub fn api(status: Option<u16>, msg: impl Into<String>, body: Option<String>) -> Self {
        Error::Api {
            status,
            message: msg.into(),
            body,
            context: ErrorContext::new(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. }
            | Error::MissingBinary { context, .. }
            | Error::Api { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    fn context_mut(&mut self) -> Option<&mut ErrorContext> {
        match self {
            Error::Validation { context, .. }
            | Error::MissingBinary { context, .. }
            | Error::Api { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Tag the error with the operation it was raised for (keeps an existing tag).
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        if let Some(ctx) = self.context_mut() {
            if ctx.operation.is_none() {
                ctx.operation = Some(operation.into());
            }
        }
        self
    }

    /// Tag the error with the input item it belongs to.
    pub fn with_item_index(mut self, index: usize) -> Self {
        if let Some(ctx) = self.context_mut() {
            ctx.item_index = Some(index);
        }
        self
    }

    /// True for the kinds that are local to one input item.
    pub fn is_item_error(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::MissingBinary { .. } | Error::Api { .. }
        )
    }

    /// Message placed in the `{ "error": ... }` record of a tolerated failure.
    pub fn record_message(&self) -> String {
        match self {
            Error::Validation { message, .. } | Error::MissingBinary { message, .. } => {
                message.clone()
            }
            Error::Api {
                message, body, ..
            } => match body {
                Some(body) if !body.is_empty() => format!("{}: {}", message, body),
                _ => message.clone(),
            },
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            _ => None,
        }
    }
}
