pub mod planner;

pub use planner::{
    LayoutPlanner, LayoutTable, PadDirection, PaddingWidths, Prefix, SegmentLayout,
    padded_lengths,
};
