use rayon::prelude::*;

use crate::tensor::Element;
use crate::utils::error::SegPadError;

/// Carve `buf` into the given `(offset, len)` regions.
///
/// Regions must be in ascending order and must not overlap; each segment then owns its
/// slice outright and can be written from its own task without synchronisation.
pub fn split_regions<'a, T, I>(buf: &'a mut [T], regions: I) -> Result<Vec<&'a mut [T]>, SegPadError>
where
    I: ExactSizeIterator<Item = (usize, usize)>,
{
    let mut out = Vec::new();
    out.try_reserve_exact(regions.len())?;

    let mut rest = buf;
    let mut cursor = 0usize;
    for (idx, (offset, len)) in regions.enumerate() {
        if offset < cursor {
            return Err(SegPadError::ContractViolation(format!(
                "output region {} starts at {} inside the previous region ending at {}",
                idx, offset, cursor
            )));
        }
        let skip = offset - cursor;
        if skip + len > rest.len() {
            return Err(SegPadError::ContractViolation(format!(
                "output region {} ({}..{}) runs past the {}-element buffer",
                idx,
                offset,
                offset + len,
                cursor + rest.len()
            )));
        }

        let (_, tail) = std::mem::take(&mut rest).split_at_mut(skip);
        let (region, tail) = tail.split_at_mut(len);
        out.push(region);
        rest = tail;
        cursor = offset + len;
    }

    Ok(out)
}

/// Fill `dst` with repeated copies of `block`, or with zeros when no block is given.
pub fn fill_blocks<T: Element>(dst: &mut [T], block: Option<&[T]>, grain: usize) {
    if dst.is_empty() {
        return;
    }

    match block {
        Some(block) if block.is_empty() => {}
        Some(block) => {
            // keep every chunk a whole number of blocks so each starts on block boundary
            let per_chunk = (grain / block.len()).max(1) * block.len();
            dst.par_chunks_mut(per_chunk).for_each(|chunk| {
                for row in chunk.chunks_exact_mut(block.len()) {
                    row.copy_from_slice(block);
                }
            });
        }
        None => dst
            .par_chunks_mut(grain)
            .for_each(|chunk| chunk.fill(T::zeroed())),
    }
}

pub fn copy_elements<T: Element>(dst: &mut [T], src: &[T], grain: usize) {
    debug_assert_eq!(dst.len(), src.len());
    if dst.is_empty() {
        return;
    }

    dst.par_chunks_mut(grain)
        .zip(src.par_chunks(grain))
        .for_each(|(d, s)| d.copy_from_slice(s));
}
