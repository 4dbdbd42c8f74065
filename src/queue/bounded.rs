//! BoundedQueue implementation
//!
//! A fixed-capacity FIFO shared by any number of producers and consumers:
//! - `enqueue` suspends while the queue is full and open
//! - `dequeue` suspends while the queue is empty and open
//! - `close` is a one-way, idempotent, level-triggered transition that wakes everyone
//!
//! All state lives behind one mutex; the three `Notify` instances only carry
//! wake-ups and never hold state of their own. Every waiter registers interest
//! *before* inspecting the state, so a change made between the check and the
//! `await` is never missed.

use crate::core::sync::recover_poison;
use crate::queue::error::{EndOfStream, QueueClosed, QueueError, QueueResult, TryEnqueueError};
use crate::queue::types::QueueStats;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

/// Mutable queue state, only ever touched under the lock
struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
    enqueued_total: u64,
    dequeued_total: u64,
    rejected_total: u64,
    high_watermark: usize,
}

impl<T> QueueState<T> {
    fn push(&mut self, item: T) {
        self.items.push_back(item);
        self.enqueued_total += 1;
        self.high_watermark = self.high_watermark.max(self.items.len());
    }

    fn pop(&mut self) -> Option<T> {
        let item = self.items.pop_front()?;
        self.dequeued_total += 1;
        Some(item)
    }
}

/// Capacity-bounded, closable FIFO queue
///
/// Share it as `Arc<BoundedQueue<T>>`; every method takes `&self`.
///
/// # Example
///
/// ```rust
/// use drainpipe::queue::BoundedQueue;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = BoundedQueue::new(2)?;
/// queue.enqueue("a").await?;
/// queue.close();
///
/// // Buffered items are still delivered after close
/// assert_eq!(queue.dequeue().await, Ok("a"));
/// assert!(queue.dequeue().await.is_err());
/// # Ok(())
/// # }
/// ```
pub struct BoundedQueue<T> {
    state: Mutex<QueueState<T>>,
    capacity: usize,
    /// Signalled when a slot frees up
    not_full: Notify,
    /// Signalled when an item is pushed
    not_empty: Notify,
    /// Signalled once, on close
    closed: Notify,
}

impl<T> BoundedQueue<T> {
    /// Create an open, empty queue
    ///
    /// A zero capacity is rejected rather than coerced.
    pub fn new(capacity: usize) -> QueueResult<Self> {
        if capacity == 0 {
            return Err(QueueError::InvalidCapacity { capacity });
        }

        Ok(Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                closed: false,
                enqueued_total: 0,
                dequeued_total: 0,
                rejected_total: 0,
                high_watermark: 0,
            }),
            capacity,
            not_full: Notify::new(),
            not_empty: Notify::new(),
            closed: Notify::new(),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState<T>> {
        recover_poison(self.state.lock(), "bounded queue state")
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered items
    pub fn len(&self) -> usize {
        self.lock_state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_state().items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.lock_state().closed
    }

    /// Snapshot of the queue counters
    pub fn stats(&self) -> QueueStats {
        let state = self.lock_state();
        QueueStats {
            capacity: self.capacity,
            buffered: state.items.len(),
            enqueued_total: state.enqueued_total,
            dequeued_total: state.dequeued_total,
            rejected_total: state.rejected_total,
            high_watermark: state.high_watermark,
            closed: state.closed,
        }
    }

    /// Append an item, waiting for space while the queue is full
    ///
    /// Fails with [`QueueClosed`] (returning the item) if the queue is closed at
    /// call time or becomes closed while waiting. Cancel safe: dropping the
    /// future before it resolves leaves the item un-enqueued and passes any
    /// consumed wake-up on to the next waiting producer.
    pub async fn enqueue(&self, item: T) -> Result<(), QueueClosed<T>> {
        loop {
            let notified = self.not_full.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock_state();
                if state.closed {
                    state.rejected_total += 1;
                    return Err(QueueClosed(item));
                }
                if state.items.len() < self.capacity {
                    state.push(item);
                    drop(state);
                    self.not_empty.notify_one();
                    return Ok(());
                }
            }

            notified.await;
        }
    }

    /// Append an item without waiting
    pub fn try_enqueue(&self, item: T) -> Result<(), TryEnqueueError<T>> {
        let mut state = self.lock_state();
        if state.closed {
            state.rejected_total += 1;
            return Err(TryEnqueueError::Closed(item));
        }
        if state.items.len() >= self.capacity {
            return Err(TryEnqueueError::Full(item));
        }

        state.push(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the oldest item, waiting while the queue is empty and open
    ///
    /// Returns [`EndOfStream`] once the queue is closed and drained; every later
    /// call returns it immediately. Cancel safe.
    pub async fn dequeue(&self) -> Result<T, EndOfStream> {
        loop {
            let notified = self.not_empty.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match self.try_dequeue()? {
                Some(item) => return Ok(item),
                None => notified.await,
            }
        }
    }

    /// Remove the oldest item without waiting
    ///
    /// `Ok(None)` means open and empty.
    pub fn try_dequeue(&self) -> Result<Option<T>, EndOfStream> {
        let mut state = self.lock_state();
        match state.pop() {
            Some(item) => {
                drop(state);
                self.not_full.notify_one();
                Ok(Some(item))
            }
            None if state.closed => Err(EndOfStream),
            None => Ok(None),
        }
    }

    /// Close the queue for writes
    ///
    /// Idempotent. Returns `true` only for the call that performed the transition.
    /// Already-buffered items remain available to consumers.
    pub fn close(&self) -> bool {
        {
            let mut state = self.lock_state();
            if state.closed {
                return false;
            }
            state.closed = true;
        }

        self.not_full.notify_waiters();
        self.not_empty.notify_waiters();
        self.closed.notify_waiters();
        true
    }

    /// Wait until the queue is closed (immediately if it already is)
    pub async fn closed(&self) {
        loop {
            let notified = self.closed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_closed() {
                return;
            }

            notified.await;
        }
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("stats", &self.stats())
            .finish()
    }
}
