use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, RotspecError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotspecErrorCategory {
    Success,
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl RotspecErrorCategory {
    pub const fn exit_placeholder(self) -> ExitPlaceholder {
        match self {
            Self::Success => ExitPlaceholder {
                exit_code: 0,
                category_name: "Success",
            },
            Self::InputValidationError => ExitPlaceholder {
                exit_code: 2,
                category_name: "InputValidationError",
            },
            Self::IoSystemError => ExitPlaceholder {
                exit_code: 3,
                category_name: "IoSystemError",
            },
            Self::ComputationError => ExitPlaceholder {
                exit_code: 4,
                category_name: "ComputationError",
            },
            Self::InternalError => ExitPlaceholder {
                exit_code: 5,
                category_name: "InternalError",
            },
        }
    }

    pub const fn exit_code(self) -> i32 {
        self.exit_placeholder().exit_code
    }

    pub const fn category_name(self) -> &'static str {
        self.exit_placeholder().category_name
    }

    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitPlaceholder {
    pub exit_code: i32,
    pub category_name: &'static str,
}

/// Central error currency of the workspace. Module-level `thiserror` enums
/// convert into this at component boundaries so the CLI can map every
/// failure onto a stable exit code and a single-line diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotspecError {
    category: RotspecErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl RotspecError {
    pub fn new(
        category: RotspecErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            RotspecErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(RotspecErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(RotspecErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(RotspecErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> RotspecErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        let severity = if self.category.is_fatal() {
            "ERROR"
        } else {
            "INFO"
        };
        format!("{}: [{}] {}", severity, self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> Option<String> {
        self.category
            .is_fatal()
            .then(|| format!("FATAL EXIT CODE: {}", self.exit_code()))
    }
}

impl Display for RotspecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.category_name(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for RotspecError {}
