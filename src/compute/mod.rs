pub mod compute_manager;
pub mod config;
pub mod memory_tracker;
pub mod parallel;
pub mod print_layout_stats;
