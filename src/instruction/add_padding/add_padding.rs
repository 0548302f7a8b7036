use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::{
    compute::compute_manager::ComputeManager,
    layout::{LayoutPlanner, LayoutTable, PadDirection, PaddingWidths},
    scan::ScanMode,
    tensor::{Batch, BatchDesc, Element},
    utils::error::SegPadError,
};

/// Widths plus the block templates written into the inserted padding.
#[derive(Clone, Debug, PartialEq)]
pub struct PaddingSpec<T: Element> {
    pub widths: PaddingWidths,
    pub start_fill: Option<Vec<T>>,
    pub end_fill: Option<Vec<T>>,
}

impl<T: Element> PaddingSpec<T> {
    pub fn new(start_width: usize, end_width: usize) -> Self {
        Self::from_widths(PaddingWidths::new(start_width, end_width))
    }

    pub fn from_widths(widths: PaddingWidths) -> Self {
        Self {
            widths,
            start_fill: None,
            end_fill: None,
        }
    }

    pub fn with_start_fill(mut self, block: Vec<T>) -> Self {
        self.start_fill = Some(block);
        self
    }

    pub fn with_end_fill(mut self, block: Vec<T>) -> Self {
        self.end_fill = Some(block);
        self
    }

    /// One template for both ends.
    pub fn with_fill(self, block: Vec<T>) -> Self {
        self.with_start_fill(block.clone()).with_end_fill(block)
    }

    pub fn check_fills(&self, block_size: usize) -> Result<(), SegPadError> {
        for (name, fill) in [("start", &self.start_fill), ("end", &self.end_fill)] {
            if let Some(fill) = fill {
                if fill.len() != block_size {
                    return Err(SegPadError::ContractViolation(format!(
                        "{} fill has {} elements but blocks hold {}",
                        name,
                        fill.len(),
                        block_size
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Output of a transform that rewrites the segment layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentedBatch<T: Element> {
    pub batch: Batch<T>,
    /// One entry per segment; a single entry when the call had no lengths.
    pub lengths: Vec<i32>,
}

pub struct AddPaddingInstruction<'a, T: Element> {
    pub spec: &'a PaddingSpec<T>,
}

impl<T: Element> Debug for AddPaddingInstruction<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "AddPadding(start_width={}, end_width={}, start_fill={}, end_fill={})",
            self.spec.widths.start,
            self.spec.widths.end,
            self.spec.start_fill.is_some(),
            self.spec.end_fill.is_some()
        )
    }
}

impl<'a, T: Element> AddPaddingInstruction<'a, T> {
    pub fn new(spec: &'a PaddingSpec<T>) -> Self {
        Self { spec }
    }

    /// Phase one: prefix sum and layout table. Nothing is written.
    pub fn plan(
        &self,
        cm: &mut ComputeManager,
        desc: &BatchDesc,
        lengths: Option<&[i32]>,
    ) -> Result<LayoutTable, SegPadError> {
        self.spec.check_fills(desc.block_size())?;
        let planner = LayoutPlanner::new(PadDirection::Insert, self.spec.widths, desc.block_size());
        cm.plan(lengths, ScanMode::Inclusive, &planner, desc.outer_size())
    }

    /// Phase two: write every segment's padding and payload into `out`.
    pub fn launch(
        &self,
        cm: &ComputeManager,
        table: &LayoutTable,
        input: &[T],
        out: &mut [T],
        lengths_out: Option<&mut [i32]>,
    ) -> Result<(), SegPadError> {
        check_buffers(table, input, out, lengths_out.as_deref())?;
        let new_lengths = match lengths_out {
            Some(_) => Some(table.updated_lengths()?),
            None => None,
        };

        log::debug!(
            "{:?}: {} segments, {} -> {} blocks of {}",
            self,
            table.num_segments(),
            table.in_blocks(),
            table.out_blocks(),
            table.block_size()
        );

        let start_fill = self.spec.start_fill.as_deref();
        let end_fill = self.spec.end_fill.as_deref();
        cm.run(|grain| {
            super::cpu::add_padding(table, input, start_fill, end_fill, out, grain)?;
            if let (Some(dst), Some(src)) = (lengths_out, new_lengths) {
                dst.copy_from_slice(&src);
            }
            Ok(())
        })
    }

    pub fn execute_cpu(
        &self,
        cm: &mut ComputeManager,
        input: &Batch<T>,
        lengths: Option<&[i32]>,
        out: &mut [T],
        lengths_out: Option<&mut [i32]>,
    ) -> Result<(), SegPadError> {
        let table = self.plan(cm, input.desc(), lengths)?;
        self.launch(cm, &table, input.data(), out, lengths_out)
    }
}

// Shared by the add and remove launches: every size is checked before any write
pub(crate) fn check_buffers<T>(
    table: &LayoutTable,
    input: &[T],
    out: &[T],
    lengths_out: Option<&[i32]>,
) -> Result<(), SegPadError> {
    let in_elements = table.in_blocks() * table.block_size();
    if input.len() != in_elements {
        return Err(SegPadError::ContractViolation(format!(
            "input holds {} elements but the layout covers {}",
            input.len(),
            in_elements
        )));
    }

    if out.len() != table.out_elements() {
        return Err(SegPadError::ContractViolation(format!(
            "output buffer holds {} elements but the layout needs {}",
            out.len(),
            table.out_elements()
        )));
    }

    if let Some(lengths_out) = lengths_out {
        if lengths_out.len() != table.num_segments() {
            return Err(SegPadError::ContractViolation(format!(
                "lengths output holds {} entries for {} segments",
                lengths_out.len(),
                table.num_segments()
            )));
        }
    }

    Ok(())
}
