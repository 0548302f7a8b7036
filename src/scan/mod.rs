pub mod prefix_sum;

pub use prefix_sum::{PrefixScratch, PrefixSum, ScanMode};
