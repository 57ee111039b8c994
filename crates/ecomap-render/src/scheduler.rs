//! Cooperative batch scheduling for the render loop.

use std::collections::VecDeque;
use std::future::Future;

/// Fixed-size chunks of work, drained front to back by a single consumer.
#[derive(Debug)]
pub struct BatchQueue<T> {
    batches: VecDeque<Vec<T>>,
}

impl<T> BatchQueue<T> {
    /// Splits `items` into chunks of at most `chunk_size` (minimum 1).
    #[must_use]
    pub fn new(items: Vec<T>, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let mut batches = VecDeque::with_capacity(items.len().div_ceil(chunk_size));
        let mut items = items.into_iter().peekable();
        while items.peek().is_some() {
            batches.push_back(items.by_ref().take(chunk_size).collect());
        }
        Self { batches }
    }

    pub fn pop_batch(&mut self) -> Option<Vec<T>> {
        self.batches.pop_front()
    }

    /// Batches not yet drained.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Hands control back to the host between batches.
pub trait FrameYield {
    fn next_frame(&mut self) -> impl Future<Output = ()>;
}

/// Yields to the tokio scheduler.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioYield;

impl FrameYield for TokioYield {
    async fn next_frame(&mut self) {
        tokio::task::yield_now().await;
    }
}
