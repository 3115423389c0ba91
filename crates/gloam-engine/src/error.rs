use thiserror::Error;

/// Failures surfaced by the context binding layer.
///
/// Format and creation failures are fatal to the widget that requested
/// initialization. `ContextLost` leaves the widget usable; callers decide
/// whether to tear it down and build a fresh one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GlError {
    /// No native visual / pixel format matches the requested descriptor.
    #[error("unsupported pixel format: {reason}")]
    UnsupportedPixelFormat { reason: String },

    /// The driver refused to create a context (bad driver, unsupported
    /// version, exhausted pixel formats).
    #[error("context creation failed: {reason}")]
    ContextCreationFailed { reason: String },

    /// The native surface behind a created context is gone.
    #[error("context lost: {reason}")]
    ContextLost { reason: String },

    /// The native handle is null or belongs to another platform family.
    #[error("invalid native surface: {reason}")]
    InvalidSurface { reason: String },

    /// A platform windowing library could not be loaded.
    #[error("failed to load {library}: {reason}")]
    PlatformLibrary { library: &'static str, reason: String },
}

impl GlError {
    pub(crate) fn unsupported_format(reason: impl Into<String>) -> Self {
        Self::UnsupportedPixelFormat { reason: reason.into() }
    }

    pub(crate) fn creation_failed(reason: impl Into<String>) -> Self {
        Self::ContextCreationFailed { reason: reason.into() }
    }

    pub(crate) fn context_lost(reason: impl Into<String>) -> Self {
        Self::ContextLost { reason: reason.into() }
    }

    pub(crate) fn invalid_surface(reason: impl Into<String>) -> Self {
        Self::InvalidSurface { reason: reason.into() }
    }

    /// Returns `true` when recovery requires rebuilding the widget.
    pub fn is_context_lost(&self) -> bool {
        matches!(self, Self::ContextLost { .. })
    }
}

pub type Result<T> = std::result::Result<T, GlError>;
