use crate::utils::error::SegPadError;

/// Shape of a packed batch: a leading segment dimension followed by the block dims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchDesc {
    dims: Vec<i64>,
}

impl BatchDesc {
    pub fn new(dims: Vec<i64>) -> Result<Self, SegPadError> {
        if dims.is_empty() {
            return Err(SegPadError::ContractViolation(
                "Batch dimensions cannot be empty".to_string(),
            ));
        }

        if let Some(d) = dims.iter().find(|&&d| d < 0) {
            return Err(SegPadError::ContractViolation(format!(
                "Batch dimensions must be non-negative, got {} in {:?}",
                d, dims
            )));
        }

        // lengths are 32-bit, so the leading dim has to be addressable by them
        if dims[0] > i32::MAX as i64 {
            return Err(SegPadError::ContractViolation(format!(
                "Leading dimension {} does not fit in a 32-bit length",
                dims[0]
            )));
        }

        // block_size and num_elements are plain products once this passes
        let total = dims[1..]
            .iter()
            .chain(&dims[..1])
            .try_fold(1usize, |acc, &d| acc.checked_mul(usize::try_from(d).ok()?));
        if total.is_none() {
            return Err(SegPadError::ContractViolation(format!(
                "Batch dimensions {:?} overflow the element count",
                dims
            )));
        }

        Ok(Self { dims })
    }

    pub fn dims(&self) -> &[i64] {
        &self.dims
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    // Number of blocks along the leading dimension
    pub fn outer_size(&self) -> usize {
        self.dims[0] as usize
    }

    // Product of every dimension after the leading one
    pub fn block_size(&self) -> usize {
        self.dims[1..].iter().map(|d| *d as usize).product()
    }

    pub fn num_elements(&self) -> usize {
        self.dims.iter().map(|d| *d as usize).product()
    }

    pub fn block_dims(&self) -> &[i64] {
        &self.dims[1..]
    }

    /// Same block shape with a different number of leading blocks.
    pub fn with_outer_size(&self, outer_size: usize) -> Result<Self, SegPadError> {
        let mut dims = self.dims.clone();
        dims[0] = i64::try_from(outer_size).map_err(|_| {
            SegPadError::ContractViolation(format!(
                "Leading dimension {} does not fit in i64",
                outer_size
            ))
        })?;
        Self::new(dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_size_is_product_of_trailing_dims() {
        let desc = BatchDesc::new(vec![5, 2, 3]).unwrap();
        assert_eq!(desc.outer_size(), 5);
        assert_eq!(desc.block_size(), 6);
        assert_eq!(desc.num_elements(), 30);
        assert_eq!(desc.block_dims(), &[2, 3]);
    }

    #[test]
    fn one_dimensional_batch_has_unit_blocks() {
        let desc = BatchDesc::new(vec![7]).unwrap();
        assert_eq!(desc.block_size(), 1);
        assert_eq!(desc.num_elements(), 7);
    }

    #[test]
    fn rejects_empty_and_negative_dims() {
        assert!(BatchDesc::new(vec![]).unwrap_err().is_contract_violation());
        assert!(BatchDesc::new(vec![3, -1]).unwrap_err().is_contract_violation());
    }

    #[test]
    fn rejects_dims_whose_product_overflows() {
        let err = BatchDesc::new(vec![2, i64::MAX, 4]).unwrap_err();
        assert!(err.is_contract_violation());
        // an empty leading dim does not hide an oversized block
        assert!(BatchDesc::new(vec![0, i64::MAX, i64::MAX]).is_err());
        assert_eq!(BatchDesc::new(vec![0, i64::MAX]).unwrap().block_size(), i64::MAX as usize);
    }

    #[test]
    fn with_outer_size_keeps_block_dims() {
        let desc = BatchDesc::new(vec![3, 4]).unwrap();
        let grown = desc.with_outer_size(9).unwrap();
        assert_eq!(grown.dims(), &[9, 4]);
    }
}
