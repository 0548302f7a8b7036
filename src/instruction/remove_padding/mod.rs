pub mod cpu;
pub mod remove_padding;
