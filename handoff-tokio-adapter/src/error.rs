//! Tokio-specific error handling support
//!
//! Adds conversions from tokio's task and runtime errors to the core
//! [`QueueError`] without making `handoff-core` depend on tokio.

use handoff_core::QueueError;

/// Tokio-specific constructors for [`QueueError`]
pub trait TokioErrorSupport {
    /// Converts a `tokio::task::JoinError` from the named task
    ///
    /// # Example
    /// ```
    /// use handoff_core::QueueError;
    /// use handoff_tokio_adapter::TokioErrorSupport;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let handle = tokio::spawn(async { panic!("bad item") });
    /// let join_error = handle.await.unwrap_err();
    /// let error = QueueError::from_join_error("consumer", join_error);
    /// assert_eq!(error.to_string(), "Task consumer failed: task panicked: bad item");
    /// # }
    /// ```
    fn from_join_error(task: &'static str, error: tokio::task::JoinError) -> Self;

    /// Converts a failure to build a tokio runtime
    fn from_runtime_build_error(error: std::io::Error) -> Self;
}

impl TokioErrorSupport for QueueError {
    fn from_join_error(task: &'static str, error: tokio::task::JoinError) -> Self {
        let reason = if error.is_cancelled() {
            "task was cancelled".to_string()
        } else if error.is_panic() {
            let payload = error.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned());
            match message {
                Some(message) => format!("task panicked: {}", message),
                None => "task panicked".to_string(),
            }
        } else {
            format!("task join error: {}", error)
        };

        QueueError::TaskFailed { task, reason }
    }

    fn from_runtime_build_error(error: std::io::Error) -> Self {
        QueueError::RuntimeError {
            message: format!("failed to build tokio runtime: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_join_error_from_panic() {
        let handle = tokio::spawn(async {
            panic!("{}", String::from("owned message"));
        });
        let error = QueueError::from_join_error("producer", handle.await.unwrap_err());
        assert_eq!(
            error.to_string(),
            "Task producer failed: task panicked: owned message"
        );
        assert_eq!(error.error_code(), 0x7003);
    }

    #[tokio::test]
    async fn test_join_error_from_cancel() {
        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        let error = QueueError::from_join_error("consumer", handle.await.unwrap_err());
        assert!(matches!(
            error,
            QueueError::TaskFailed { task: "consumer", ref reason } if reason == "task was cancelled"
        ));
    }

    #[test]
    fn test_runtime_build_error() {
        let error = QueueError::from_runtime_build_error(std::io::Error::other("no threads"));
        assert_eq!(
            error.to_string(),
            "Runtime error: failed to build tokio runtime: no threads"
        );
    }
}
