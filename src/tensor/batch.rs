use super::{desc::BatchDesc, element::Element};
use crate::utils::error::SegPadError;

/// A packed batch of segments, stored as one flat buffer of blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch<T: Element> {
    desc: BatchDesc,
    data: Vec<T>,
}

impl<T: Element> Batch<T> {
    pub fn new(dims: Vec<i64>, data: Vec<T>) -> Result<Self, SegPadError> {
        let desc = BatchDesc::new(dims)?;
        Self::from_desc(desc, data)
    }

    pub fn from_desc(desc: BatchDesc, data: Vec<T>) -> Result<Self, SegPadError> {
        if data.len() != desc.num_elements() {
            return Err(SegPadError::ContractViolation(format!(
                "Batch data holds {} elements but dims {:?} need {}",
                data.len(),
                desc.dims(),
                desc.num_elements()
            )));
        }
        Ok(Self { desc, data })
    }

    /// Zero-filled batch, reserved fallibly so oversized requests fail instead of aborting.
    pub fn zeros(desc: BatchDesc) -> Result<Self, SegPadError> {
        let data = zeroed_vec(desc.num_elements())?;
        Ok(Self { desc, data })
    }

    /// Build a batch from raw element bytes in native byte order, the order `as_bytes` yields.
    pub fn from_bytes(dims: Vec<i64>, bytes: &[u8]) -> Result<Self, SegPadError> {
        let elem_size = std::mem::size_of::<T>();
        if bytes.len() % elem_size != 0 {
            return Err(SegPadError::ContractViolation(format!(
                "{} bytes is not a whole number of {}-byte elements",
                bytes.len(),
                elem_size
            )));
        }

        // aligned input can be cast directly, otherwise read element by element
        let data: Vec<T> = match bytemuck::try_cast_slice::<u8, T>(bytes) {
            Ok(slice) => slice.to_vec(),
            Err(_) => bytes
                .chunks_exact(elem_size)
                .map(bytemuck::pod_read_unaligned)
                .collect(),
        };

        Self::new(dims, data)
    }

    pub fn desc(&self) -> &BatchDesc {
        &self.desc
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn outer_size(&self) -> usize {
        self.desc.outer_size()
    }

    pub fn block_size(&self) -> usize {
        self.desc.block_size()
    }

    pub fn block(&self, idx: usize) -> &[T] {
        let bs = self.block_size();
        &self.data[idx * bs..(idx + 1) * bs]
    }
}

pub(crate) fn zeroed_vec<T: Element>(len: usize) -> Result<Vec<T>, SegPadError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)?;
    data.resize(len, T::zeroed());
    Ok(data)
}
