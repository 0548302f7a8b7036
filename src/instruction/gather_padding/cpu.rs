use rayon::prelude::*;

use crate::{
    compute::config::Grain,
    layout::LayoutTable,
    tensor::Element,
    utils::error::SegPadError,
};

use super::gather_padding::GatherTarget;

/// Column sums of every segment's start-pad and end-pad blocks.
///
/// Each task folds its segments into a private `[start | end]` accumulator; the partials
/// are combined pairwise and every output column is narrowed and written once.
pub fn gather_padding<T: Element>(
    table: &LayoutTable,
    input: &[T],
    target: GatherTarget<'_, T>,
    grain: Grain,
) -> Result<(), SegPadError> {
    let bs = table.block_size();
    let widths = table.widths();

    let sums = table
        .segments()
        .par_iter()
        .with_min_len(grain.segments)
        .fold(
            || vec![T::Acc::default(); 2 * bs],
            |mut acc, seg| {
                let (start_acc, end_acc) = acc.split_at_mut(bs);
                let end_from = seg.in_start + seg.len_blocks - widths.end;
                for row in seg.in_start..seg.in_start + widths.start {
                    accumulate(start_acc, &input[row * bs..(row + 1) * bs]);
                }
                for row in end_from..end_from + widths.end {
                    accumulate(end_acc, &input[row * bs..(row + 1) * bs]);
                }
                acc
            },
        )
        .reduce(
            || vec![T::Acc::default(); 2 * bs],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x = *x + y);
                a
            },
        );

    let (start_sums, end_sums) = sums.split_at(bs);
    match target {
        GatherTarget::Separate { start, end } => {
            narrow_into(start, start_sums, grain.elements);
            narrow_into(end, end_sums, grain.elements);
        }
        GatherTarget::Merged(out) => {
            out.par_iter_mut()
                .with_min_len(grain.elements)
                .zip(start_sums.par_iter().zip(end_sums.par_iter()))
                .for_each(|(o, (&s, &e))| *o = T::narrow(s + e));
        }
    }

    Ok(())
}

fn accumulate<T: Element>(acc: &mut [T::Acc], row: &[T]) {
    for (a, &v) in acc.iter_mut().zip(row) {
        *a = *a + v.widen();
    }
}

fn narrow_into<T: Element>(dst: &mut [T], sums: &[T::Acc], grain: usize) {
    dst.par_iter_mut()
        .with_min_len(grain)
        .zip(sums.par_iter())
        .for_each(|(d, &s)| *d = T::narrow(s));
}
