use rayon::prelude::*;

use crate::{
    compute::{
        config::Grain,
        parallel::{copy_elements, fill_blocks, split_regions},
    },
    layout::LayoutTable,
    tensor::Element,
    utils::error::SegPadError,
};

pub fn add_padding<T: Element>(
    table: &LayoutTable,
    input: &[T],
    start_fill: Option<&[T]>,
    end_fill: Option<&[T]>,
    out: &mut [T],
    grain: Grain,
) -> Result<(), SegPadError> {
    let bs = table.block_size();
    let start_width = table.widths().start * bs;

    // region e = [start pad | payload | end pad]
    let regions = split_regions(out, table.out_regions())?;

    regions
        .into_par_iter()
        .zip(table.segments().par_iter())
        .with_min_len(grain.segments)
        .for_each(|(region, seg)| {
            let len = seg.len_blocks * bs;
            let src = &input[seg.in_start * bs..seg.in_start * bs + len];

            let (head, rest) = region.split_at_mut(start_width);
            let (body, tail) = rest.split_at_mut(len);

            fill_blocks(head, start_fill, grain.elements);
            copy_elements(body, src, grain.elements);
            fill_blocks(tail, end_fill, grain.elements);
        });

    Ok(())
}
