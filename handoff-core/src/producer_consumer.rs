//! Producer and consumer capabilities
//!
//! A queue run is driven by exactly one [`Producer`] and one [`Consumer`].
//! Both are narrow, single-method capabilities. The queue never calls either
//! one concurrently with itself.
//!
//! Plain async closures implement both traits, so most callers never name
//! them:
//!
//! ```rust
//! use handoff_core::{BoxError, Consumer, Producer};
//!
//! fn assert_producer<P: Producer<u32>>(_: &P) {}
//! fn assert_consumer<C: Consumer<u32>>(_: &C) {}
//!
//! let mut remaining = 3u32;
//! let producer = move || {
//!     let next = remaining.checked_sub(1);
//!     if let Some(n) = next {
//!         remaining = n;
//!     }
//!     async move { Ok::<_, BoxError>(next) }
//! };
//! let consumer = |item: u32| async move {
//!     println!("got {item}");
//!     Ok::<_, BoxError>(())
//! };
//!
//! assert_producer(&producer);
//! assert_consumer(&consumer);
//! ```

use core::future::Future;

use crate::BoxError;

/// Source of items for a queue run
///
/// `next()` resolves to `Ok(Some(item))` for each item and to `Ok(None)` once
/// the stream has ended. The production task stops calling `next()` after the
/// first `None` or `Err`.
pub trait Producer<T>: Send {
    fn next(&mut self) -> impl Future<Output = Result<Option<T>, BoxError>> + Send;
}

/// Sink for items of a queue run
///
/// `handle()` is awaited to completion before the next item is popped, so
/// at most one item is ever in flight.
pub trait Consumer<T>: Send {
    fn handle(&mut self, item: T) -> impl Future<Output = Result<(), BoxError>> + Send;
}

impl<T, F, Fut, E> Producer<T> for F
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<Option<T>, E>> + Send,
    E: Into<BoxError>,
{
    fn next(&mut self) -> impl Future<Output = Result<Option<T>, BoxError>> + Send {
        let fut = self();
        async move { fut.await.map_err(Into::into) }
    }
}

impl<T, F, Fut, E> Consumer<T> for F
where
    F: FnMut(T) -> Fut + Send,
    Fut: Future<Output = Result<(), E>> + Send,
    E: Into<BoxError>,
{
    fn handle(&mut self, item: T) -> impl Future<Output = Result<(), BoxError>> + Send {
        let fut = self(item);
        async move { fut.await.map_err(Into::into) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    /// Polls a future that never suspends
    fn ready<F: Future>(fut: F) -> F::Output {
        let mut fut = pin!(fut);
        let mut cx = Context::from_waker(Waker::noop());
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(output) => output,
            Poll::Pending => panic!("future was not immediately ready"),
        }
    }

    struct Countdown(u32);

    impl Producer<u32> for Countdown {
        async fn next(&mut self) -> Result<Option<u32>, BoxError> {
            if self.0 == 0 {
                return Ok(None);
            }
            self.0 -= 1;
            Ok(Some(self.0))
        }
    }

    #[test]
    fn test_struct_producer() {
        let mut producer = Countdown(2);
        assert_eq!(ready(producer.next()).unwrap(), Some(1));
        assert_eq!(ready(producer.next()).unwrap(), Some(0));
        assert_eq!(ready(producer.next()).unwrap(), None);
    }

    #[test]
    fn test_closure_error_is_boxed() {
        let mut producer = || async { Err::<Option<u32>, _>(std::io::Error::other("offline")) };
        let error = ready(Producer::next(&mut producer)).unwrap_err();
        assert_eq!(error.to_string(), "offline");
    }

    #[test]
    fn test_closure_consumer_sees_items() {
        let mut seen = Vec::new();
        {
            let mut consumer = |item: u32| {
                seen.push(item);
                async { Ok::<_, BoxError>(()) }
            };
            ready(consumer.handle(4)).unwrap();
            ready(consumer.handle(5)).unwrap();
        }
        assert_eq!(seen, vec![4, 5]);
    }
}
