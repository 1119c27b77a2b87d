/// Convenience result type used across ckpass.
pub type PassResult<T> = Result<T, PassError>;

/// Top-level error taxonomy used by pass rendering and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum PassError {
    /// Rendering the pass region into a raster image failed, or the region was absent.
    #[error("capture error: {0}")]
    Capture(String),

    /// Handing the exported image to the delivery target failed.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Invalid configuration or option values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PassError {
    /// Build a [`PassError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`PassError::Delivery`] value.
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Build a [`PassError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PassError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error came from the capture step.
    pub fn is_capture(&self) -> bool {
        matches!(self, Self::Capture(_))
    }

    /// Whether this error came from the delivery step.
    pub fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
