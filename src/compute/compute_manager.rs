use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    compute::config::{ComputeConfig, Grain},
    instruction::{
        self,
        add_padding::add_padding::{PaddingSpec, SegmentedBatch},
        gather_padding::gather_padding::{GatherMode, GatherOutput, GatherTarget},
    },
    layout::{LayoutPlanner, LayoutTable, PaddingWidths, Prefix},
    scan::{PrefixScratch, PrefixSum, ScanMode},
    tensor::{Batch, Element, batch::zeroed_vec},
    utils::error::SegPadError,
};

/// Owns the worker pool and the reusable scan scratch that every transform runs on.
///
/// Calls take `&mut self`: one manager serves one call at a time, so scratch is never
/// shared between concurrent transforms.
pub struct ComputeManager {
    config: ComputeConfig,
    pool: ThreadPool,
    scratch: PrefixScratch,
}

impl ComputeManager {
    pub fn new() -> Result<Self, SegPadError> {
        Self::new_with(ComputeConfig::default())
    }

    pub fn new_with(config: ComputeConfig) -> Result<Self, SegPadError> {
        config.validate()?;

        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("segpad-worker-{}", i));
        if let Some(threads) = config.num_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        log::debug!(
            "compute manager ready: {} threads, grains {:?}, scratch limit {:?}",
            pool.current_num_threads(),
            config.grain(),
            config.scratch_limit_bytes
        );

        Ok(Self {
            scratch: PrefixScratch::new(config.scratch_limit()),
            config,
            pool,
        })
    }

    pub fn config(&self) -> &ComputeConfig {
        &self.config
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Bytes currently held by the scan scratch.
    pub fn scratch_bytes(&self) -> u64 {
        self.scratch.capacity_bytes()
    }

    /// Bytes the scan scratch may still grow by before calls fail.
    pub fn scratch_available(&self) -> u64 {
        self.scratch.available_bytes()
    }

    pub fn prefix_sum(&mut self, lengths: &[i32], mode: ScanMode) -> Result<Vec<i32>, SegPadError> {
        let Self {
            config,
            pool,
            scratch,
        } = self;
        let scan = PrefixSum::new(mode, config.scan_grain);
        pool.install(|| scan.run(lengths, scratch).map(<[i32]>::to_vec))
    }

    /// Phase one on its own: scan the lengths and materialise the layout table.
    pub fn plan(
        &mut self,
        lengths: Option<&[i32]>,
        mode: ScanMode,
        planner: &LayoutPlanner,
        outer_size: usize,
    ) -> Result<LayoutTable, SegPadError> {
        let Self {
            config,
            pool,
            scratch,
        } = self;
        let scan = PrefixSum::new(mode, config.scan_grain);

        pool.install(|| {
            let prefix = match lengths {
                None => Prefix::Whole { segments: 1 },
                Some(lengths) => {
                    let sums = scan.run(lengths, scratch)?;
                    match mode {
                        ScanMode::Inclusive => Prefix::Inclusive(sums),
                        ScanMode::Exclusive => Prefix::Exclusive {
                            starts: sums,
                            lengths,
                        },
                    }
                }
            };
            planner.plan(prefix, outer_size)
        })
    }

    pub(crate) fn run<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce(Grain) -> R + Send,
    {
        let grain = self.config.grain();
        self.pool.install(|| op(grain))
    }

    pub fn add_padding<T: Element>(
        &mut self,
        input: &Batch<T>,
        lengths: Option<&[i32]>,
        spec: &PaddingSpec<T>,
    ) -> Result<SegmentedBatch<T>, SegPadError> {
        let instr = instruction::add_padding(spec);
        let table = instr.plan(self, input.desc(), lengths)?;

        let mut data: Vec<T> = zeroed_vec(table.out_elements())?;
        let mut new_lengths: Vec<i32> = zeroed_vec(table.num_segments())?;
        instr.launch(
            self,
            &table,
            input.data(),
            &mut data,
            Some(new_lengths.as_mut_slice()),
        )?;

        let desc = input.desc().with_outer_size(table.out_blocks())?;
        Ok(SegmentedBatch {
            batch: Batch::from_desc(desc, data)?,
            lengths: new_lengths,
        })
    }

    /// Writes into caller buffers; nothing is written unless every check passes.
    pub fn add_padding_into<T: Element>(
        &mut self,
        input: &Batch<T>,
        lengths: Option<&[i32]>,
        spec: &PaddingSpec<T>,
        out: &mut [T],
        lengths_out: Option<&mut [i32]>,
    ) -> Result<(), SegPadError> {
        instruction::add_padding(spec).execute_cpu(self, input, lengths, out, lengths_out)
    }

    pub fn remove_padding<T: Element>(
        &mut self,
        input: &Batch<T>,
        lengths: Option<&[i32]>,
        widths: PaddingWidths,
    ) -> Result<SegmentedBatch<T>, SegPadError> {
        let instr = instruction::remove_padding(widths);
        let table = instr.plan(self, input.desc(), lengths)?;

        let mut data: Vec<T> = zeroed_vec(table.out_elements())?;
        let mut new_lengths: Vec<i32> = zeroed_vec(table.num_segments())?;
        instr.launch(
            self,
            &table,
            input.data(),
            &mut data,
            Some(new_lengths.as_mut_slice()),
        )?;

        let desc = input.desc().with_outer_size(table.out_blocks())?;
        Ok(SegmentedBatch {
            batch: Batch::from_desc(desc, data)?,
            lengths: new_lengths,
        })
    }

    pub fn remove_padding_into<T: Element>(
        &mut self,
        input: &Batch<T>,
        lengths: Option<&[i32]>,
        widths: PaddingWidths,
        out: &mut [T],
        lengths_out: Option<&mut [i32]>,
    ) -> Result<(), SegPadError> {
        instruction::remove_padding(widths).execute_cpu(self, input, lengths, out, lengths_out)
    }

    pub fn gather_padding<T: Element>(
        &mut self,
        input: &Batch<T>,
        lengths: Option<&[i32]>,
        widths: PaddingWidths,
        mode: GatherMode,
    ) -> Result<GatherOutput<T>, SegPadError> {
        let instr = instruction::gather_padding(widths);
        let table = instr.plan(self, input.desc(), lengths)?;

        let mut output = GatherOutput::zeroed(mode, table.block_size())?;
        instr.launch(self, &table, input.data(), output.as_target())?;
        Ok(output)
    }

    pub fn gather_padding_into<T: Element>(
        &mut self,
        input: &Batch<T>,
        lengths: Option<&[i32]>,
        widths: PaddingWidths,
        target: GatherTarget<'_, T>,
    ) -> Result<(), SegPadError> {
        instruction::gather_padding(widths).execute_cpu(self, input, lengths, target)
    }
}
