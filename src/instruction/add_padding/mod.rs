pub mod add_padding;
pub mod cpu;
