use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::{
    compute::compute_manager::ComputeManager,
    layout::{LayoutPlanner, LayoutTable, PadDirection, PaddingWidths, padded_lengths},
    scan::{ScanMode, prefix_sum::check_lengths},
    tensor::{Batch, BatchDesc, Element, batch::zeroed_vec},
    utils::error::SegPadError,
};

/// Whether start and end sums land in two buffers or are added into one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GatherMode {
    #[default]
    Separate,
    Merged,
}

/// Caller-owned destination for the padding sums, one block each.
#[derive(Debug)]
pub enum GatherTarget<'a, T> {
    Separate { start: &'a mut [T], end: &'a mut [T] },
    Merged(&'a mut [T]),
}

impl<T> GatherTarget<'_, T> {
    pub fn mode(&self) -> GatherMode {
        match self {
            GatherTarget::Separate { .. } => GatherMode::Separate,
            GatherTarget::Merged(_) => GatherMode::Merged,
        }
    }

    fn check(&self, block_size: usize) -> Result<(), SegPadError> {
        let check = |name: &str, len: usize| {
            if len != block_size {
                return Err(SegPadError::ContractViolation(format!(
                    "{} sum buffer holds {} elements but blocks hold {}",
                    name, len, block_size
                )));
            }
            Ok(())
        };

        match self {
            GatherTarget::Separate { start, end } => {
                check("start", start.len())?;
                check("end", end.len())
            }
            GatherTarget::Merged(out) => check("merged", out.len()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GatherOutput<T> {
    Separate { start: Vec<T>, end: Vec<T> },
    Merged(Vec<T>),
}

impl<T: Element> GatherOutput<T> {
    pub(crate) fn zeroed(mode: GatherMode, block_size: usize) -> Result<Self, SegPadError> {
        Ok(match mode {
            GatherMode::Separate => GatherOutput::Separate {
                start: zeroed_vec(block_size)?,
                end: zeroed_vec(block_size)?,
            },
            GatherMode::Merged => GatherOutput::Merged(zeroed_vec(block_size)?),
        })
    }

    pub fn as_target(&mut self) -> GatherTarget<'_, T> {
        match self {
            GatherOutput::Separate { start, end } => GatherTarget::Separate {
                start: start.as_mut_slice(),
                end: end.as_mut_slice(),
            },
            GatherOutput::Merged(out) => GatherTarget::Merged(out.as_mut_slice()),
        }
    }

    pub fn start(&self) -> Option<&[T]> {
        match self {
            GatherOutput::Separate { start, .. } => Some(start.as_slice()),
            GatherOutput::Merged(_) => None,
        }
    }

    pub fn end(&self) -> Option<&[T]> {
        match self {
            GatherOutput::Separate { end, .. } => Some(end.as_slice()),
            GatherOutput::Merged(_) => None,
        }
    }

    pub fn merged(&self) -> Option<&[T]> {
        match self {
            GatherOutput::Merged(out) => Some(out.as_slice()),
            GatherOutput::Separate { .. } => None,
        }
    }
}

#[derive(Clone, Copy)]
pub struct GatherPaddingInstruction {
    pub widths: PaddingWidths,
}

impl Debug for GatherPaddingInstruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "GatherPadding(start_width={}, end_width={})",
            self.widths.start, self.widths.end
        )
    }
}

impl GatherPaddingInstruction {
    pub fn new(widths: PaddingWidths) -> Self {
        Self { widths }
    }

    /// Locates segments with an exclusive scan; every segment must hold its padding.
    pub fn plan(
        &self,
        cm: &mut ComputeManager,
        desc: &BatchDesc,
        lengths: Option<&[i32]>,
    ) -> Result<LayoutTable, SegPadError> {
        let planner = LayoutPlanner::new(PadDirection::Strip, self.widths, desc.block_size());
        match lengths {
            Some(lengths) => {
                check_lengths(lengths)?;
                let lengths = padded_lengths(lengths, desc.outer_size(), self.widths)?;
                cm.plan(Some(&*lengths), ScanMode::Exclusive, &planner, desc.outer_size())
            }
            None => cm.plan(None, ScanMode::Exclusive, &planner, desc.outer_size()),
        }
    }

    pub fn launch<T: Element>(
        &self,
        cm: &ComputeManager,
        table: &LayoutTable,
        input: &[T],
        target: GatherTarget<'_, T>,
    ) -> Result<(), SegPadError> {
        let in_elements = table.in_blocks() * table.block_size();
        if input.len() != in_elements {
            return Err(SegPadError::ContractViolation(format!(
                "input holds {} elements but the layout covers {}",
                input.len(),
                in_elements
            )));
        }
        target.check(table.block_size())?;

        log::debug!(
            "{:?}: {} segments, {:?} sums of {} columns",
            self,
            table.num_segments(),
            target.mode(),
            table.block_size()
        );

        cm.run(|grain| super::cpu::gather_padding(table, input, target, grain))
    }

    pub fn execute_cpu<T: Element>(
        &self,
        cm: &mut ComputeManager,
        input: &Batch<T>,
        lengths: Option<&[i32]>,
        target: GatherTarget<'_, T>,
    ) -> Result<(), SegPadError> {
        let table = self.plan(cm, input.desc(), lengths)?;
        self.launch(cm, &table, input.data(), target)
    }
}
