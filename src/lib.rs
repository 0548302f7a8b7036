//! segpad - segment padding transforms for batched, variable-length sequence data
//!
//! A batch is a run of fixed-size blocks grouped into segments by a lengths array. This
//! library inserts, strips and sums padding blocks around every segment, in parallel
//! across segments and across the elements of each segment.

mod compute;

mod instruction;

mod layout;

mod scan;

mod tensor;

mod utils;

pub use compute::{
    compute_manager::ComputeManager, config::ComputeConfig, print_layout_stats::print_layout_stats,
};
pub use instruction::{
    add_padding::add_padding::{AddPaddingInstruction, PaddingSpec, SegmentedBatch},
    gather_padding::gather_padding::{
        GatherMode, GatherOutput, GatherPaddingInstruction, GatherTarget,
    },
    remove_padding::remove_padding::RemovePaddingInstruction,
};
pub use layout::{LayoutPlanner, LayoutTable, PadDirection, PaddingWidths, Prefix, SegmentLayout};
pub use scan::ScanMode;
pub use tensor::{Batch, BatchDesc, Element};
pub use utils::error::SegPadError;
