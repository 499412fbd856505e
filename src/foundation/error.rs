/// Convenience result type used across quizreel.
pub type QuizResult<T> = Result<T, QuizError>;

/// Top-level error taxonomy used by render APIs.
///
/// Precondition failures (`Validation`, `Config`) are raised before any frame is produced.
/// `Process` carries the diagnostic stream of a failed external tool.
#[derive(thiserror::Error, Debug)]
pub enum QuizError {
    /// Invalid job data or render parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid or incomplete configuration (including missing required fonts).
    #[error("config error: {0}")]
    Config(String),

    /// Failure decoding or locating an asset.
    #[error("asset error: {0}")]
    Asset(String),

    /// Failure while rasterizing or persisting a frame.
    #[error("render error: {0}")]
    Render(String),

    /// An external process exited unsuccessfully.
    #[error("process error: {program} exited with {status}: {stderr}")]
    Process {
        /// Program that was invoked.
        program: String,
        /// Exit status description.
        status: String,
        /// Captured diagnostic output.
        stderr: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// An operation was cancelled on request.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuizError {
    /// Build a [`QuizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QuizError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`QuizError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`QuizError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`QuizError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`QuizError::Cancelled`] value.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Build a [`QuizError::Process`] value from captured process diagnostics.
    pub fn process(
        program: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Process {
            program: program.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }

    /// `true` when the failure is caused by the job's content rather than the local setup or a
    /// transient tool failure.
    ///
    /// Only puzzle and job checks raise [`QuizError::Validation`]; setup problems are `Config`
    /// and rasterization problems are `Render`. Callers that keep a "never retry this content"
    /// ledger should only record a content unit when this returns `true`.
    pub fn is_content_rejection(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
