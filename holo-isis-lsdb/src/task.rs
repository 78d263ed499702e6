//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant};
use tracing::Instrument;

/// Owned handle to a spawned tokio task.
///
/// The task is aborted when the handle goes out of scope. Awaiting the
/// handle yields the task's output.
#[derive(Debug)]
pub struct Task<T> {
    join_handle: JoinHandle<T>,
}

/// Handle to a task running a callback at a fixed rate.
///
/// Dropping the handle aborts the task on the spot, possibly in the middle
/// of a callback. [`IntervalTask::stop`] ends it at a tick boundary.
#[derive(Debug)]
pub struct IntervalTask {
    task: Task<()>,
    stop_tx: oneshot::Sender<()>,
}

// ===== impl Task =====

impl<T> Task<T>
where
    T: Send + 'static,
{
    pub fn spawn<F>(future: F) -> Task<T>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let join_handle = tokio::spawn(future);
        Task { join_handle }
    }
}

impl<T> Future for Task<T> {
    type Output = Result<T, JoinError>;

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Self::Output> {
        Pin::new(&mut self.join_handle).poll(cx)
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        self.join_handle.abort();
    }
}

// ===== impl IntervalTask =====

impl IntervalTask {
    /// Runs `cb` every `period`, starting one period from now unless
    /// `tick_on_start` is set.
    ///
    /// A callback in progress is always awaited to completion. Stop requests
    /// are only honored while waiting for the next tick.
    pub fn new<F, Fut>(
        period: Duration,
        tick_on_start: bool,
        mut cb: F,
    ) -> IntervalTask
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let first_tick = match tick_on_start {
            true => Instant::now(),
            false => Instant::now() + period,
        };

        let task = Task::spawn(
            async move {
                let mut ticker = time::interval_at(first_tick, period);
                loop {
                    tokio::select! {
                        _ = &mut stop_rx => return,
                        _ = ticker.tick() => cb().await,
                    }
                }
            }
            .in_current_span(),
        );

        IntervalTask { task, stop_tx }
    }

    /// Asks the task to stop and waits until it has.
    pub async fn stop(self) -> Result<(), JoinError> {
        let _ = self.stop_tx.send(());
        self.task.await
    }
}
