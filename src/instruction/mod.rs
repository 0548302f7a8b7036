use crate::{
    instruction::{
        add_padding::add_padding::{AddPaddingInstruction, PaddingSpec},
        gather_padding::gather_padding::GatherPaddingInstruction,
        remove_padding::remove_padding::RemovePaddingInstruction,
    },
    layout::PaddingWidths,
    tensor::Element,
};

pub mod add_padding;
pub mod gather_padding;
pub mod remove_padding;

pub fn add_padding<T: Element>(spec: &PaddingSpec<T>) -> AddPaddingInstruction<'_, T> {
    AddPaddingInstruction::new(spec)
}

pub fn remove_padding(widths: PaddingWidths) -> RemovePaddingInstruction {
    RemovePaddingInstruction::new(widths)
}

pub fn gather_padding(widths: PaddingWidths) -> GatherPaddingInstruction {
    GatherPaddingInstruction::new(widths)
}
