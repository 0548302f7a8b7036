use std::time::Instant;

use rand::{
    Rng, SeedableRng,
    distr::{Distribution, Uniform},
    rngs::StdRng,
};
use segpad::{
    Batch, ComputeConfig, ComputeManager, GatherMode, LayoutPlanner, PadDirection, PaddingSpec,
    PaddingWidths, ScanMode, SegPadError, print_layout_stats,
};

fn main() -> Result<(), SegPadError> {
    let mut rng = StdRng::seed_from_u64(727);

    let config = ComputeConfig {
        element_grain: 1024,
        ..Default::default()
    };
    let mut cm = ComputeManager::new_with(config)?;
    println!("Compute manager ready with {} threads", cm.num_threads());

    // - - - - Random variable-length batch - - - -
    let num_segments: usize = 2048;
    let feature_size: usize = 64;
    let lengths: Vec<i32> = (0..num_segments).map(|_| rng.random_range(0..48)).collect();
    let outer: i64 = lengths.iter().map(|&l| l as i64).sum();

    let values = Uniform::new(-1.0f32, 1.0).map_err(|e| SegPadError::Config(e.to_string()))?;
    let data: Vec<f32> = (0..outer as usize * feature_size)
        .map(|_| values.sample(&mut rng))
        .collect();
    let batch = Batch::new(vec![outer, feature_size as i64], data)?;

    let spec = PaddingSpec::new(2, 3).with_start_fill(vec![1.0; feature_size]);

    // - - - - Layout only - - - -
    let planner = LayoutPlanner::new(PadDirection::Insert, spec.widths, batch.block_size());
    let table = cm.plan(
        Some(lengths.as_slice()),
        ScanMode::Inclusive,
        &planner,
        batch.outer_size(),
    )?;
    print_layout_stats(&table, batch.desc(), std::mem::size_of::<f32>());

    // - - - - Add -> gather -> remove - - - -
    let start = Instant::now();
    let padded = cm.add_padding(&batch, Some(lengths.as_slice()), &spec)?;
    println!(
        "\nAdd padding: {} -> {} blocks in {:?}",
        batch.outer_size(),
        padded.batch.outer_size(),
        start.elapsed()
    );

    let start = Instant::now();
    let sums = cm.gather_padding(
        &padded.batch,
        Some(padded.lengths.as_slice()),
        spec.widths,
        GatherMode::Separate,
    )?;
    println!("Gather padding: {:?}", start.elapsed());
    if let (Some(start_sums), Some(end_sums)) = (sums.start(), sums.end()) {
        // start pads hold ones, end pads zeros
        println!(
            "  start sum column 0 = {} (expected {}), end sum column 0 = {}",
            start_sums[0],
            num_segments * spec.widths.start,
            end_sums[0]
        );
    }

    let start = Instant::now();
    let restored = cm.remove_padding(
        &padded.batch,
        Some(padded.lengths.as_slice()),
        spec.widths,
    )?;
    println!("Remove padding: {:?}", start.elapsed());

    println!(
        "Round trip {}: lengths restored = {}, scratch held = {} bytes",
        if restored.batch == batch { "matches" } else { "DIFFERS" },
        restored.lengths == lengths,
        cm.scratch_bytes()
    );

    // - - - - Symmetric widths, merged sums - - - -
    let widths = PaddingWidths::symmetric(1);
    let spec = PaddingSpec::from_widths(widths).with_fill(vec![0.5; feature_size]);
    let padded = cm.add_padding(&batch, Some(lengths.as_slice()), &spec)?;
    let merged = cm.gather_padding(
        &padded.batch,
        Some(lengths.as_slice()),
        widths,
        GatherMode::Merged,
    )?;
    if let Some(merged) = merged.merged() {
        println!(
            "Merged sum column 0 = {} over {} segments",
            merged[0], num_segments
        );
    }

    Ok(())
}
