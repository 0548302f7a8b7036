use std::sync::atomic::{AtomicU64, Ordering};

use crate::utils::error::SegPadError;

pub struct MemoryTracker {
    maximum: u64,
    current: AtomicU64,
}

impl MemoryTracker {
    pub fn new(maximum: u64) -> Self {
        Self {
            maximum,
            current: AtomicU64::new(0),
        }
    }

    pub fn try_allocate(&self, size: u64) -> Result<(), SegPadError> {
        // a rejected request leaves the counter untouched
        self.current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current
                    .checked_add(size)
                    .filter(|&next| next <= self.maximum)
            })
            .map(|_| ())
            .map_err(|current| {
                SegPadError::ResourceExhaustion(format!(
                    "Scratch limit exceeded: tried to allocate {} bytes when {} of {} bytes are used",
                    size, current, self.maximum
                ))
            })
    }

    pub fn deallocate(&self, size: u64) {
        self.current.fetch_sub(size, Ordering::Release);
    }

    pub fn get_current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    pub fn get_available(&self) -> u64 {
        self.maximum - self.get_current()
    }
}
