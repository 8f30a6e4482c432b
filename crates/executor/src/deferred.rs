//! Awaitable adapter over synchronous work.
//!
//! Every builder chain, auth call and RPC resolves through [`defer`]: the
//! work runs on the poll that first drives the future, then the future
//! yields to the scheduler once before handing back the result. So work
//! executes in the order futures are first polled, and no result is ever
//! ready on that first poll. Callers written against a networked client see
//! the same ordering here.

use std::future::Future;

/// Run `work` on first poll; settle after one scheduling step.
///
/// The work itself runs to completion inside a single poll; there is no
/// cancellation point once it has started.
pub fn defer<T, F>(work: F) -> impl Future<Output = T> + Send
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    async move {
        let out = work();
        tokio::task::yield_now().await;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn first_poll_runs_work_but_stays_pending() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let mut fut = Box::pin(defer(move || {
            flag.store(true, Ordering::SeqCst);
            7
        }));
        assert!(!ran.load(Ordering::SeqCst));

        assert!((&mut fut).now_or_never().is_none());
        assert!(ran.load(Ordering::SeqCst));

        assert_eq!(futures::executor::block_on(fut), 7);
    }

    #[test]
    fn work_runs_in_first_poll_order() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let (a, b) = (order.clone(), order.clone());
        let mut first = Box::pin(defer(move || a.lock().push(1)));
        let mut second = Box::pin(defer(move || b.lock().push(2)));

        assert!((&mut first).now_or_never().is_none());
        assert!((&mut second).now_or_never().is_none());
        futures::executor::block_on(second);
        futures::executor::block_on(first);
        assert_eq!(*order.lock(), vec![1, 2]);
    }

    #[tokio::test]
    async fn resolves_on_runtime() {
        assert_eq!(defer(|| "done").await, "done");
    }
}
