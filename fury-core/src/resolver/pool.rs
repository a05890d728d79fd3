// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::util::Spinlock;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of segments in the pool.
const NUM_SEGMENTS: usize = 16;

/// Items kept per segment; surplus items returned to a full segment are dropped.
const MAX_ITEMS_PER_SEGMENT: usize = 8;

static THREAD_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static SEGMENT_INDEX: Cell<usize> = Cell::new(
        (THREAD_ID_COUNTER.fetch_add(1, Ordering::Relaxed) as usize) % NUM_SEGMENTS
    );
}

struct Segment<T> {
    items: Spinlock<Vec<T>>,
}

impl<T> Segment<T> {
    fn new() -> Self {
        Segment {
            items: Spinlock::new(Vec::new()),
        }
    }

    /// Pops a pooled item, or builds a new one when the segment is empty or
    /// held by another thread.
    #[inline(always)]
    fn get(&self, factory: &dyn Fn() -> T) -> T {
        let pooled = self.items.try_lock().and_then(|mut items| items.pop());
        pooled.unwrap_or_else(factory)
    }

    #[inline(always)]
    fn put(&self, item: T) {
        if let Some(mut items) = self.items.try_lock() {
            if items.len() < MAX_ITEMS_PER_SEGMENT {
                items.push(item);
            }
        }
    }
}

/// A segmented object pool.
///
/// Each thread is pinned to one segment, so concurrent callers usually hit
/// different locks. A segment that is momentarily contended never blocks:
/// `get` builds a fresh item and `put` drops the returned one.
pub struct Pool<T> {
    segments: [Segment<T>; NUM_SEGMENTS],
    factory: Box<dyn Fn() -> T + Send + Sync>,
    recycle: Box<dyn Fn(&mut T) -> bool + Send + Sync>,
}

impl<T> Pool<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::with_recycle(factory, |_| true)
    }

    /// Creates a pool whose items pass through `recycle` before going back.
    /// `recycle` resets the item and returns false when it should be dropped
    /// instead of kept.
    pub fn with_recycle<F, R>(factory: F, recycle: R) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        R: Fn(&mut T) -> bool + Send + Sync + 'static,
    {
        Pool {
            segments: std::array::from_fn(|_| Segment::new()),
            factory: Box::new(factory),
            recycle: Box::new(recycle),
        }
    }

    /// Borrows an item from the pool, executes the handler, and returns the item to the pool.
    #[inline(always)]
    pub fn borrow_mut<Result>(&self, handler: impl FnOnce(&mut T) -> Result) -> Result {
        let segment_idx = SEGMENT_INDEX.with(|idx| idx.get());
        let segment = &self.segments[segment_idx];

        let mut obj = segment.get(&*self.factory);
        let result = handler(&mut obj);
        if (self.recycle)(&mut obj) {
            segment.put(obj);
        }
        result
    }
}
