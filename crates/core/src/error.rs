use std::error::Error;

/// Maximum number of entries carried in a computation error's trace.
pub const MAX_TRACE_FRAMES: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Birth data that cannot be interpreted (e.g. a malformed date/time).
    #[error("{0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Only raised when timezone resolution runs in strict mode.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Any fault while querying the chart engine.
    #[error("{message}")]
    Computation { message: String, trace: Vec<String> },
}

impl CoreError {
    /// Build a [`CoreError::Computation`] from an engine-side error.
    ///
    /// The trace starts with `context` and follows the error's `source()`
    /// chain, capped at [`MAX_TRACE_FRAMES`] entries.
    pub fn computation(context: &str, err: &(dyn Error + 'static)) -> Self {
        let mut trace = vec![context.to_string()];
        let mut current: Option<&(dyn Error + 'static)> = Some(err);
        while let Some(e) = current {
            if trace.len() >= MAX_TRACE_FRAMES {
                break;
            }
            trace.push(e.to_string());
            current = e.source();
        }

        CoreError::Computation {
            message: err.to_string(),
            trace,
        }
    }

    /// Whether the error was caused by the caller's input rather than by
    /// the computation itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidInput(_) | CoreError::Validation(_) | CoreError::UnknownTimezone(_)
        )
    }
}
