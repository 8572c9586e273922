use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidHost { input: String },
    InvalidMode { field: &'static str, input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidHost { input } => write!(f, "invalid host: {input}"),
            Self::InvalidMode { field, input } => write!(f, "invalid {field}: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
