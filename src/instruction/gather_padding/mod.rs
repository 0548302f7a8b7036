pub mod cpu;
pub mod gather_padding;
