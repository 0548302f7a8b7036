use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::{
    compute::compute_manager::ComputeManager,
    instruction::add_padding::add_padding::check_buffers,
    layout::{LayoutPlanner, LayoutTable, PadDirection, PaddingWidths, padded_lengths},
    scan::{ScanMode, prefix_sum::check_lengths},
    tensor::{Batch, BatchDesc, Element},
    utils::error::SegPadError,
};

#[derive(Clone, Copy)]
pub struct RemovePaddingInstruction {
    pub widths: PaddingWidths,
}

impl Debug for RemovePaddingInstruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "RemovePadding(start_width={}, end_width={})",
            self.widths.start, self.widths.end
        )
    }
}

impl RemovePaddingInstruction {
    pub fn new(widths: PaddingWidths) -> Self {
        Self { widths }
    }

    /// Lengths may count padded blocks or payload blocks; see [`padded_lengths`].
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
                cm.plan(Some(&*lengths), ScanMode::Inclusive, &planner, desc.outer_size())
            }
            None => cm.plan(None, ScanMode::Inclusive, &planner, desc.outer_size()),
        }
    }

    pub fn launch<T: Element>(
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

        cm.run(|grain| {
            super::cpu::remove_padding(table, input, out, grain)?;
            if let (Some(dst), Some(src)) = (lengths_out, new_lengths) {
                dst.copy_from_slice(&src);
            }
            Ok(())
        })
    }

    pub fn execute_cpu<T: Element>(
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
