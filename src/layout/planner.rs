use std::borrow::Cow;

use rayon::prelude::*;

use crate::utils::error::SegPadError;

/// Block counts inserted before and after every segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PaddingWidths {
    pub start: usize,
    pub end: usize,
}

impl PaddingWidths {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn symmetric(width: usize) -> Self {
        Self {
            start: width,
            end: width,
        }
    }

    // Padding blocks added to (or removed from) a single segment
    pub fn total(&self) -> usize {
        self.start.saturating_add(self.end)
    }

    /// [`total`](Self::total), rejected when a 32-bit length could not hold it.
    pub fn checked_total(&self) -> Result<usize, SegPadError> {
        self.start
            .checked_add(self.end)
            .filter(|&t| t <= i32::MAX as usize)
            .ok_or_else(|| {
                SegPadError::ContractViolation(format!(
                    "padding widths {} + {} do not fit in a 32-bit length",
                    self.start, self.end
                ))
            })
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

/// Which way segment offsets shift between the input and output space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PadDirection {
    /// Output is the padded space: every earlier segment pushes this one further out.
    Insert,
    /// Output is the unpadded space: every earlier segment's padding is subtracted.
    Strip,
}

/// Where each segment's blocks begin, as handed over by the prefix sum.
#[derive(Clone, Copy, Debug)]
pub enum Prefix<'a> {
    /// Inclusive running sum of the lengths.
    Inclusive(&'a [i32]),
    /// Exclusive running sum alongside the lengths it was computed from.
    Exclusive { starts: &'a [i32], lengths: &'a [i32] },
    /// No lengths were supplied; the batch is a single segment.
    Whole { segments: usize },
}

/// One segment's placement, in blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentLayout {
    pub in_start: usize,
    pub out_start: usize,
    pub len_blocks: usize,
}

/// Materialised layout for one call, consumed by the transform kernels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutTable {
    segments: Vec<SegmentLayout>,
    widths: PaddingWidths,
    direction: PadDirection,
    block_size: usize,
    in_blocks: usize,
    out_blocks: usize,
}

impl LayoutTable {
    pub fn segments(&self) -> &[SegmentLayout] {
        &self.segments
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    pub fn widths(&self) -> PaddingWidths {
        self.widths
    }

    pub fn direction(&self) -> PadDirection {
        self.direction
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn in_blocks(&self) -> usize {
        self.in_blocks
    }

    pub fn out_blocks(&self) -> usize {
        self.out_blocks
    }

    pub fn out_elements(&self) -> usize {
        self.out_blocks * self.block_size
    }

    /// Blocks the segment occupies in the output space.
    pub fn segment_out_blocks(&self, seg: &SegmentLayout) -> usize {
        match self.direction {
            PadDirection::Insert => seg.len_blocks + self.widths.total(),
            PadDirection::Strip => seg.len_blocks - self.widths.total(),
        }
    }

    /// `(offset, len)` of every segment's output region, in elements.
    pub fn out_regions(&self) -> impl ExactSizeIterator<Item = (usize, usize)> + '_ {
        self.segments.iter().map(|seg| {
            (
                seg.out_start * self.block_size,
                self.segment_out_blocks(seg) * self.block_size,
            )
        })
    }

    /// Segment lengths as they read in the output space.
    pub fn updated_lengths(&self) -> Result<Vec<i32>, SegPadError> {
        self.segments
            .par_iter()
            .map(|seg| {
                i32::try_from(self.segment_out_blocks(seg)).map_err(|_| {
                    SegPadError::ContractViolation(format!(
                        "segment length {} plus padding does not fit in a 32-bit length",
                        seg.len_blocks
                    ))
                })
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutPlanner {
    direction: PadDirection,
    widths: PaddingWidths,
    block_size: usize,
}

impl LayoutPlanner {
    pub fn new(direction: PadDirection, widths: PaddingWidths, block_size: usize) -> Self {
        Self {
            direction,
            widths,
            block_size,
        }
    }

    pub fn direction(&self) -> PadDirection {
        self.direction
    }

    pub fn widths(&self) -> PaddingWidths {
        self.widths
    }

    /// Padding already inserted ahead of segment `e`.
    pub fn prior_padding(&self, e: usize) -> usize {
        e.saturating_mul(self.widths.total())
    }

    pub fn plan(&self, prefix: Prefix<'_>, outer_size: usize) -> Result<LayoutTable, SegPadError> {
        let n = match prefix {
            Prefix::Whole { segments } => segments,
            Prefix::Inclusive(ends) => ends.len(),
            Prefix::Exclusive { lengths, .. } => lengths.len(),
        };
        let pad = self.widths.checked_total()?;
        let padding = n.checked_mul(pad).ok_or_else(|| {
            SegPadError::ContractViolation(format!(
                "{} segments of {} padding blocks overflow the block count",
                n, pad
            ))
        })?;
        elements(outer_size, self.block_size)?;

        // the whole padded batch must stay addressable by 32-bit lengths
        if self.direction == PadDirection::Insert {
            let out_blocks = outer_size
                .checked_add(padding)
                .filter(|&b| b <= i32::MAX as usize)
                .ok_or_else(|| {
                    SegPadError::ContractViolation(format!(
                        "{} blocks plus {} padding blocks do not fit in a 32-bit length",
                        outer_size, padding
                    ))
                })?;
            elements(out_blocks, self.block_size)?;
        }

        let segments: Vec<SegmentLayout> = match prefix {
            Prefix::Whole { segments } => {
                if segments != 1 {
                    return Err(SegPadError::ContractViolation(format!(
                        "lengths were omitted but {} segments were requested; exactly one is implied",
                        segments
                    )));
                }
                vec![self.segment(0, 0, outer_size)?]
            }
            Prefix::Inclusive(ends) => {
                let total = ends.last().map_or(0, |&t| t.max(0) as usize);
                check_total(total, outer_size)?;
                (0..ends.len())
                    .into_par_iter()
                    .map(|e| {
                        let prev = if e == 0 { 0 } else { ends[e - 1] };
                        let len_blocks = blocks(e, ends[e] as i64 - prev as i64)?;
                        self.segment(e, ends[e] as usize - len_blocks, len_blocks)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            Prefix::Exclusive { starts, lengths } => {
                if starts.len() != lengths.len() {
                    return Err(SegPadError::ContractViolation(format!(
                        "{} segment starts for {} lengths",
                        starts.len(),
                        lengths.len()
                    )));
                }
                let total = match (starts.last(), lengths.last()) {
                    (Some(&s), Some(&l)) => (s as i64 + l as i64).max(0) as usize,
                    _ => 0,
                };
                check_total(total, outer_size)?;
                (0..lengths.len())
                    .into_par_iter()
                    .map(|e| {
                        let in_start = blocks(e, starts[e] as i64)?;
                        let len_blocks = blocks(e, lengths[e] as i64)?;
                        if in_start + len_blocks > outer_size {
                            return Err(SegPadError::ContractViolation(format!(
                                "segment {} spans blocks {}..{} past the {} input blocks",
                                e,
                                in_start,
                                in_start + len_blocks,
                                outer_size
                            )));
                        }
                        self.segment(e, in_start, len_blocks)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let out_blocks = match self.direction {
            PadDirection::Insert => outer_size + padding,
            // every segment was checked to hold its padding
            PadDirection::Strip => outer_size.checked_sub(padding).ok_or_else(|| {
                SegPadError::ContractViolation(format!(
                    "{} padding blocks to remove exceed the {} input blocks",
                    padding, outer_size
                ))
            })?,
        };

        Ok(LayoutTable {
            segments,
            widths: self.widths,
            direction: self.direction,
            block_size: self.block_size,
            in_blocks: outer_size,
            out_blocks,
        })
    }

    fn segment(&self, e: usize, in_start: usize, len_blocks: usize) -> Result<SegmentLayout, SegPadError> {
        let prior = self.prior_padding(e);
        let out_start = match self.direction {
            PadDirection::Insert => in_start + prior,
            PadDirection::Strip => {
                if len_blocks < self.widths.total() {
                    return Err(SegPadError::ContractViolation(format!(
                        "segment {} holds {} blocks, fewer than the {} padding blocks to remove",
                        e,
                        len_blocks,
                        self.widths.total()
                    )));
                }
                in_start.checked_sub(prior).ok_or_else(|| {
                    SegPadError::ContractViolation(format!(
                        "segment {} starts at block {} but {} padding blocks precede it",
                        e, in_start, prior
                    ))
                })?
            }
        };

        Ok(SegmentLayout {
            in_start,
            out_start,
            len_blocks,
        })
    }
}

// A block count read from a prefix; negative means the prefix was not monotone
fn blocks(e: usize, value: i64) -> Result<usize, SegPadError> {
    usize::try_from(value).map_err(|_| {
        SegPadError::ContractViolation(format!(
            "segment {} has a negative block count {} in its prefix",
            e, value
        ))
    })
}

fn elements(blocks: usize, block_size: usize) -> Result<usize, SegPadError> {
    blocks.checked_mul(block_size).ok_or_else(|| {
        SegPadError::ContractViolation(format!(
            "{} blocks of {} elements overflow the element count",
            blocks, block_size
        ))
    })
}

fn check_total(total: usize, outer_size: usize) -> Result<(), SegPadError> {
    if total != outer_size {
        return Err(SegPadError::ContractViolation(format!(
            "lengths sum to {} blocks but the input holds {}",
            total, outer_size
        )));
    }
    Ok(())
}

/// Read lengths handed to a strip or gather call as padded lengths.
///
/// Lengths normally count padded blocks and sum to `outer_size`. Lengths that instead
/// sum to `outer_size - n * widths.total()` count payload blocks and are widened here.
/// With non-zero widths and at least one segment the two totals differ.
pub fn padded_lengths<'a>(
    lengths: &'a [i32],
    outer_size: usize,
    widths: PaddingWidths,
) -> Result<Cow<'a, [i32]>, SegPadError> {
    let pad = widths.checked_total()?;
    if pad == 0 || lengths.is_empty() {
        return Ok(Cow::Borrowed(lengths));
    }

    let total: i64 = lengths.par_iter().map(|&l| l as i64).sum();
    let widened = lengths
        .len()
        .checked_mul(pad)
        .and_then(|p| i64::try_from(p).ok())
        .and_then(|p| p.checked_add(total));
    if total == outer_size as i64 || widened != Some(outer_size as i64) {
        // padded basis, or a mismatch the planner will report
        return Ok(Cow::Borrowed(lengths));
    }

    // checked_total keeps the width within i32
    let pad = pad as i32;
    lengths
        .par_iter()
        .map(|&l| {
            l.checked_add(pad).ok_or_else(|| {
                SegPadError::ContractViolation(format!(
                    "length {} plus {} padding blocks overflows 32 bits",
                    l, pad
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Cow::Owned)
}
