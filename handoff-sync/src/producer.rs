//! Blocking producer adapter

use handoff_core::{BoxError, Producer};

use crate::in_flight::InFlight;

/// Runs a blocking `FnMut() -> Result<Option<T>, E>` as a [`Producer`]
///
/// Each call executes on the runtime's blocking pool, so a slow producer never
/// stalls the worker that drives the consumer.
pub(crate) struct BlockingProducer<F> {
    call: Option<F>,
    in_flight: InFlight,
}

impl<F> BlockingProducer<F> {
    pub(crate) fn new(call: F, in_flight: InFlight) -> Self {
        Self {
            call: Some(call),
            in_flight,
        }
    }
}

impl<T, F, E> Producer<T> for BlockingProducer<F>
where
    T: Send + 'static,
    F: FnMut() -> Result<Option<T>, E> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    async fn next(&mut self) -> Result<Option<T>, BoxError> {
        let permit = self.in_flight.enter().await?;
        let mut call = self
            .call
            .take()
            .ok_or_else(|| BoxError::from("producer lost after an earlier panic"))?;

        let joined = tokio::task::spawn_blocking(move || {
            let result = call();
            drop(permit);
            (call, result)
        })
        .await;

        match joined {
            Ok((call, result)) => {
                self.call = Some(call);
                result.map_err(Into::into)
            }
            // Surface the panic on the production task itself
            Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
            Err(error) => Err(error.into()),
        }
    }
}
