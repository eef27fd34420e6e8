//! Blocking consumer adapter

use handoff_core::{BoxError, Consumer};

use crate::in_flight::InFlight;

/// Runs a blocking `FnMut(T) -> Result<(), E>` as a [`Consumer`]
pub(crate) struct BlockingConsumer<F> {
    call: Option<F>,
    in_flight: InFlight,
}

impl<F> BlockingConsumer<F> {
    pub(crate) fn new(call: F, in_flight: InFlight) -> Self {
        Self {
            call: Some(call),
            in_flight,
        }
    }
}

impl<T, F, E> Consumer<T> for BlockingConsumer<F>
where
    T: Send + 'static,
    F: FnMut(T) -> Result<(), E> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    async fn handle(&mut self, item: T) -> Result<(), BoxError> {
        let permit = self.in_flight.enter().await?;
        let mut call = self
            .call
            .take()
            .ok_or_else(|| BoxError::from("consumer lost after an earlier panic"))?;

        let joined = tokio::task::spawn_blocking(move || {
            let result = call(item);
            drop(permit);
            (call, result)
        })
        .await;

        match joined {
            Ok((call, result)) => {
                self.call = Some(call);
                result.map_err(Into::into)
            }
            Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
            Err(error) => Err(error.into()),
        }
    }
}
