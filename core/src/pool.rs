//! Bounded fan-out for independent probes.
//!
//! Every work item owns one slot in the result vector, indexed by its input
//! position. Tasks finish in any order; the output order is the input order.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// Runs `task` over `items` with at most `workers` in flight.
///
/// Slot `i` holds the result for `items[i]`, or `None` if that task panicked.
pub async fn run_slotted<T, U, F, Fut>(items: Vec<T>, workers: usize, task: F) -> Vec<Option<U>>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = U> + Send + 'static,
{
    let len = items.len();
    let limiter = Arc::new(Semaphore::new(workers.max(1)));
    let task = Arc::new(task);
    let mut set: JoinSet<(usize, U)> = JoinSet::new();

    for (slot, item) in items.into_iter().enumerate() {
        // The semaphore is never closed, so acquiring only waits.
        let Ok(permit) = Arc::clone(&limiter).acquire_owned().await else {
            break;
        };
        let task = Arc::clone(&task);
        set.spawn(async move {
            let _permit = permit;
            (slot, task(item).await)
        });
    }

    let mut slots: Vec<Option<U>> = std::iter::repeat_with(|| None).take(len).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((slot, value)) => slots[slot] = Some(value),
            Err(e) => warn!("Probe task did not complete: {e}"),
        }
    }
    slots
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
