/// Convenience result type used across the crate.
pub type SheetResult<T> = Result<T, SheetError>;

/// Top-level error taxonomy used by the export APIs.
#[derive(thiserror::Error, Debug)]
pub enum SheetError {
    /// Invalid user-provided export settings (layout mode, sprite size, padding, ...).
    ///
    /// Always raised before any document is cloned or created.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A failure reported by the host document/rendering collaborator.
    #[error("host operation failed: {0}")]
    HostOperation(String),

    /// Errors when serializing or deserializing manifests, configs or plans.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SheetError {
    /// Build a [`SheetError::InvalidConfiguration`] value.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`SheetError::HostOperation`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::HostOperation(msg.into())
    }

    /// Build a [`SheetError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for errors raised by configuration checks rather than the host.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
