//! Parallel running sums over segment lengths.
//!
//! The scan is chunked: every chunk of `grain` lengths is totalled in parallel, the
//! chunk totals are scanned serially (there are few of them), and each chunk then runs a
//! local scan seeded with its base, again in parallel. Totals are carried in `i64` so a
//! batch whose block count overflows `i32` is reported instead of wrapping.

use rayon::prelude::*;

use crate::compute::memory_tracker::MemoryTracker;
use crate::utils::error::SegPadError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanMode {
    /// `out[i] = lengths[0] + .. + lengths[i]`
    Inclusive,
    /// `out[i] = lengths[0] + .. + lengths[i - 1]`, `out[0] = 0`
    Exclusive,
}

/// Reusable scan buffers. They grow to the largest batch seen and are never shrunk.
pub struct PrefixScratch {
    sums: Vec<i32>,
    partials: Vec<i64>,
    tracker: MemoryTracker,
}

impl PrefixScratch {
    pub fn new(limit_bytes: u64) -> Self {
        Self {
            sums: Vec::new(),
            partials: Vec::new(),
            tracker: MemoryTracker::new(limit_bytes),
        }
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.tracker.get_current()
    }

    pub fn available_bytes(&self) -> u64 {
        self.tracker.get_available()
    }

    fn reserve(&mut self, sums: usize, partials: usize) -> Result<(), SegPadError> {
        grow(&mut self.sums, sums, &self.tracker)?;
        grow(&mut self.partials, partials, &self.tracker)
    }
}

fn grow<V>(buf: &mut Vec<V>, len: usize, tracker: &MemoryTracker) -> Result<(), SegPadError> {
    let have = buf.capacity();
    if have >= len {
        return Ok(());
    }

    let bytes = |cap: usize| (cap * std::mem::size_of::<V>()) as u64;
    let extra = bytes(len - have);
    tracker.try_allocate(extra)?;

    buf.clear();
    if let Err(e) = buf.try_reserve_exact(len) {
        tracker.deallocate(extra);
        return Err(e.into());
    }

    // charge the capacity actually granted, which may exceed the request
    let granted = bytes(buf.capacity() - have);
    if granted > extra {
        if let Err(e) = tracker.try_allocate(granted - extra) {
            *buf = Vec::new();
            tracker.deallocate(bytes(have) + extra);
            return Err(e);
        }
    }

    log::trace!("prefix scratch grown to {} entries ({} extra bytes)", len, granted);
    Ok(())
}

/// Fails on the first negative length, naming the segment.
pub fn check_lengths(lengths: &[i32]) -> Result<(), SegPadError> {
    match lengths.par_iter().position_first(|&l| l < 0) {
        Some(idx) => Err(SegPadError::ContractViolation(format!(
            "segment {} has negative length {}",
            idx, lengths[idx]
        ))),
        None => Ok(()),
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PrefixSum {
    mode: ScanMode,
    grain: usize,
}

impl PrefixSum {
    pub fn new(mode: ScanMode, grain: usize) -> Self {
        Self {
            mode,
            grain: grain.max(1),
        }
    }

    /// Scan `lengths` into the scratch buffer and return a view of the result.
    ///
    /// Runs on whichever rayon pool the caller is installed in.
    pub fn run<'s>(
        &self,
        lengths: &[i32],
        scratch: &'s mut PrefixScratch,
    ) -> Result<&'s [i32], SegPadError> {
        check_lengths(lengths)?;

        let n = lengths.len();
        if n == 0 {
            scratch.sums.clear();
            return Ok(scratch.sums.as_slice());
        }

        let grain = self.grain;
        scratch.reserve(n, n.div_ceil(grain))?;

        lengths
            .par_chunks(grain)
            .map(|chunk| chunk.iter().map(|&l| l as i64).sum::<i64>())
            .collect_into_vec(&mut scratch.partials);

        // chunk totals become chunk bases
        let mut running = 0i64;
        for partial in scratch.partials.iter_mut() {
            let total = *partial;
            *partial = running;
            running += total;
        }

        if running > i32::MAX as i64 {
            return Err(SegPadError::ContractViolation(format!(
                "lengths total {} blocks, which overflows a 32-bit prefix sum",
                running
            )));
        }

        scratch.sums.clear();
        scratch.sums.resize(n, 0);

        let mode = self.mode;
        scratch
            .sums
            .par_chunks_mut(grain)
            .zip(lengths.par_chunks(grain))
            .zip(scratch.partials.par_iter())
            .for_each(|((out, chunk), &base)| {
                let mut acc = base;
                for (o, &l) in out.iter_mut().zip(chunk) {
                    match mode {
                        ScanMode::Inclusive => {
                            acc += l as i64;
                            *o = acc as i32;
                        }
                        ScanMode::Exclusive => {
                            *o = acc as i32;
                            acc += l as i64;
                        }
                    }
                }
            });

        Ok(scratch.sums.as_slice())
    }
}
