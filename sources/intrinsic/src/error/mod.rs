use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArrayError {
    /// An array was produced without going through its construction token.
    #[error("{type_name} must be constructed through the array factory ({reason})")]
    IllegalConstruction {
        type_name: &'static str,
        reason: String,
    },

    #[error("could not construct {type_name} of length {length}")]
    Construction {
        type_name: &'static str,
        length: i64,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ArrayError {
    pub fn is_illegal_construction(&self) -> bool {
        matches!(self, ArrayError::IllegalConstruction { .. })
    }

    pub fn is_construction(&self) -> bool {
        matches!(self, ArrayError::Construction { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ArrayError::InvalidArgument(_))
    }
}

#[macro_export]
macro_rules! invalid {
    ($msg:literal $(,)?) => {
        $crate::error::ArrayError::InvalidArgument(format!($msg))
    };
    ($err:expr $(,)?) => {
        $crate::error::ArrayError::InvalidArgument(($err).to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::ArrayError::InvalidArgument(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! invalidate {
    () => {
        |f| $crate::invalid!(f)
    };
}
