//! Bounded, order-preserving concurrent fetching.
//!
//! Up to `concurrency` tasks are in flight. Admission is a FCFS sliding
//! window: when the window is full the oldest task is awaited before the next
//! one is spawned, even if a younger task already finished. Each task writes
//! only its own slot, so the output order always matches the input order.

use std::collections::VecDeque;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

use fomc_shared::{FomcError, Result};

/// Run `fetch_one(index, item)` for every item with at most `concurrency`
/// tasks in flight.
///
/// `output[i]` is the result for `items[i]`. The first failure (or panicking
/// task) aborts every task still running and is returned; no partial output
/// is produced.
pub async fn fetch_all<D, T, F, Fut>(
    items: Vec<D>,
    concurrency: usize,
    fetch_one: F,
) -> Result<Vec<T>>
where
    D: Send + 'static,
    T: Send + 'static,
    F: Fn(usize, D) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let concurrency = concurrency.max(1);
    let total = items.len();
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    let mut window: VecDeque<(usize, JoinHandle<Result<T>>)> =
        VecDeque::with_capacity(concurrency);

    for (index, item) in items.into_iter().enumerate() {
        if window.len() >= concurrency {
            if let Some((done, handle)) = window.pop_front() {
                if let Err(e) = settle(done, handle, &mut slots).await {
                    abort_all(window);
                    return Err(e);
                }
            }
        }
        debug!(index, "spawning fetch");
        window.push_back((index, tokio::spawn(fetch_one(index, item))));
    }

    while let Some((done, handle)) = window.pop_front() {
        if let Err(e) = settle(done, handle, &mut slots).await {
            abort_all(window);
            return Err(e);
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| FomcError::Task(format!("fetch {index} produced no result")))
        })
        .collect()
}

async fn settle<T>(
    index: usize,
    handle: JoinHandle<Result<T>>,
    slots: &mut [Option<T>],
) -> Result<()> {
    let value = handle
        .await
        .map_err(|e| FomcError::Task(format!("fetch {index} did not complete: {e}")))??;
    slots[index] = Some(value);
    Ok(())
}

fn abort_all<T>(window: VecDeque<(usize, JoinHandle<T>)>) {
    for (_, handle) in window {
        handle.abort();
    }
}
