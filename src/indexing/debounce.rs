//! Per-key debouncing of delayed actions
//!
//! Bursts of change notifications for the same file collapse into a single
//! action that runs once the key has been quiet for the delay.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;

/// Default quiet period before a scheduled action fires
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

struct PendingTimer {
    generation: u64,
    handle: AbortHandle,
}

struct TimerTable<K> {
    timers: HashMap<K, PendingTimer>,
    next_generation: u64,
}

/// Owns one cancellable timer per key. Must be used inside a tokio runtime.
pub struct DebounceScheduler<K> {
    table: Arc<Mutex<TimerTable<K>>>,
}

impl<K> Clone for DebounceScheduler<K> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<K> DebounceScheduler<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(TimerTable {
                timers: HashMap::new(),
                next_generation: 0,
            })),
        }
    }

    /// Replace any pending timer for `key` with one that runs `action` after `delay`.
    ///
    /// Only the most recently scheduled action of a key can ever run. An action
    /// that has already started is not interrupted.
    pub fn schedule<F>(&self, key: K, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut table = self.table.lock();
        table.next_generation += 1;
        let generation = table.next_generation;

        let shared = Arc::clone(&self.table);
        let timer_key = key.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Claim the slot; a newer schedule or a cancel may have replaced it
            // between the timer expiring and this task getting polled.
            {
                let mut table = shared.lock();
                match table.timers.get(&timer_key) {
                    Some(pending) if pending.generation == generation => {
                        table.timers.remove(&timer_key);
                    }
                    _ => return,
                }
            }

            action.await;
        });

        let previous = table.timers.insert(
            key,
            PendingTimer {
                generation,
                handle: task.abort_handle(),
            },
        );
        if let Some(previous) = previous {
            previous.handle.abort();
        }
    }

    /// Drop the pending timer for `key` without running its action.
    /// Returns whether a timer was pending.
    pub fn cancel(&self, key: &K) -> bool {
        match self.table.lock().timers.remove(key) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.table.lock().timers.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.table.lock().timers.len()
    }

    /// Cancel every pending timer
    pub fn cancel_all(&self) {
        let mut table = self.table.lock();
        for (_, pending) in table.timers.drain() {
            pending.handle.abort();
        }
    }
}

impl<K> Default for DebounceScheduler<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
