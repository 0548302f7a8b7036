use rayon::prelude::*;

use crate::{
    compute::{
        config::Grain,
        parallel::{copy_elements, split_regions},
    },
    layout::LayoutTable,
    tensor::Element,
    utils::error::SegPadError,
};

pub fn remove_padding<T: Element>(
    table: &LayoutTable,
    input: &[T],
    out: &mut [T],
    grain: Grain,
) -> Result<(), SegPadError> {
    let bs = table.block_size();
    let skip = table.widths().start;

    let regions = split_regions(out, table.out_regions())?;

    regions
        .into_par_iter()
        .zip(table.segments().par_iter())
        .with_min_len(grain.segments)
        .for_each(|(region, seg)| {
            let from = (seg.in_start + skip) * bs;
            copy_elements(region, &input[from..from + region.len()], grain.elements);
        });

    Ok(())
}
