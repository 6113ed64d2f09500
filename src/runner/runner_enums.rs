use crate::software::PixelBufferError;

/// What a draw callback may return.
///
/// Implemented for `()` and for `Result<(), E>` with any displayable error,
/// so callbacks can use `?` on context operations.
pub trait DrawOutcome {
    fn into_result(self) -> Result<(), String>;
}

impl DrawOutcome for () {
    fn into_result(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E: std::fmt::Display> DrawOutcome for Result<(), E> {
    fn into_result(self) -> Result<(), String> {
        self.map_err(|e| e.to_string())
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum RunnerError {
    /// The event loop was first created on another thread.
    ThreadMismatch,
    /// A window is already open; only one runs at a time.
    AlreadyRunning,
    WinitEventLoopPanic,
    WinitEventLoopFailed(String),
    FailedToCreateWindow(String),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerError::ThreadMismatch => {
                write!(f, "Event loop must be run from the thread that created it")
            }
            RunnerError::AlreadyRunning => write!(f, "A quickdraw window is already running"),
            RunnerError::WinitEventLoopPanic => write!(f, "winit panicked creating the event loop"),
            RunnerError::WinitEventLoopFailed(e) => write!(f, "Event loop failed: {}", e),
            RunnerError::FailedToCreateWindow(e) => write!(f, "Failed to create window: {}", e),
        }
    }
}

impl std::error::Error for RunnerError {}

#[derive(Debug)]
pub enum QuickDrawError {
    Runner(RunnerError),
    PixelBuffer(PixelBufferError),
    /// The draw callback returned an error.
    Draw(String),
}

impl std::fmt::Display for QuickDrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuickDrawError::Runner(e) => write!(f, "Runner error: {}", e),
            QuickDrawError::PixelBuffer(e) => write!(f, "PixelBuffer error: {}", e),
            QuickDrawError::Draw(e) => write!(f, "Draw callback failed: {}", e),
        }
    }
}

impl std::error::Error for QuickDrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuickDrawError::Runner(e) => Some(e),
            QuickDrawError::PixelBuffer(e) => Some(e),
            QuickDrawError::Draw(_) => None,
        }
    }
}

impl From<RunnerError> for QuickDrawError {
    fn from(e: RunnerError) -> Self {
        QuickDrawError::Runner(e)
    }
}

impl From<PixelBufferError> for QuickDrawError {
    fn from(e: PixelBufferError) -> Self {
        QuickDrawError::PixelBuffer(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_outcome_is_ok() {
        assert_eq!(().into_result(), Ok(()));
    }

    #[test]
    fn error_outcome_keeps_message() {
        let outcome: Result<(), RunnerError> = Err(RunnerError::AlreadyRunning);
        assert_eq!(
            outcome.into_result(),
            Err("A quickdraw window is already running".to_string())
        );
    }

    #[test]
    fn errors_convert_into_quickdraw_error() {
        let e: QuickDrawError = PixelBufferError::PresentFailed.into();
        assert!(matches!(e, QuickDrawError::PixelBuffer(PixelBufferError::PresentFailed)));
        assert_eq!(e.to_string(), "PixelBuffer error: Failed to present pixel buffer");

        let e: QuickDrawError = RunnerError::ThreadMismatch.into();
        assert!(std::error::Error::source(&e).is_some());
    }
}
