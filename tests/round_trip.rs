use rand::{Rng, SeedableRng, rngs::StdRng};
use segpad::{Batch, ComputeConfig, ComputeManager, Element, GatherMode, PaddingSpec};

fn manager() -> ComputeManager {
    ComputeManager::new_with(ComputeConfig {
        num_threads: Some(4),
        element_grain: 5,
        scan_grain: 3,
        ..ComputeConfig::default()
    })
    .unwrap()
}

fn random_lengths(rng: &mut StdRng, n: usize) -> Vec<i32> {
    (0..n).map(|_| rng.random_range(0..6)).collect()
}

fn check_round_trip<T: Element>(
    cm: &mut ComputeManager,
    rng: &mut StdRng,
    value: impl Fn(&mut StdRng) -> T,
) {
    let n: usize = rng.random_range(0..12);
    let block: usize = rng.random_range(1..5);
    let lengths = random_lengths(rng, n);
    let outer: i64 = lengths.iter().map(|&l| l as i64).sum();
    let data: Vec<T> = (0..outer as usize * block).map(|_| value(rng)).collect();
    let batch = Batch::new(vec![outer, block as i64], data).unwrap();

    let spec = PaddingSpec::new(rng.random_range(0..3), rng.random_range(0..3))
        .with_start_fill(vec![value(rng); block]);
    let padded = cm.add_padding(&batch, Some(lengths.as_slice()), &spec).unwrap();

    let total = spec.widths.total() as i32;
    let expected_lengths: Vec<i32> = lengths.iter().map(|&l| l + total).collect();
    assert_eq!(padded.lengths, expected_lengths);

    // either lengths basis strips back to the original batch
    let from_padded = cm
        .remove_padding(&padded.batch, Some(padded.lengths.as_slice()), spec.widths)
        .unwrap();
    assert_eq!(from_padded.batch, batch);
    assert_eq!(from_padded.lengths, lengths);

    let from_payload = cm
        .remove_padding(&padded.batch, Some(lengths.as_slice()), spec.widths)
        .unwrap();
    assert_eq!(from_payload, from_padded);
}

#[test]
fn add_then_remove_restores_f32_batches() {
    let mut rng = StdRng::seed_from_u64(727);
    let mut cm = manager();
    for _ in 0..50 {
        check_round_trip(&mut cm, &mut rng, |r| r.random_range(-1.0f32..1.0));
    }
}

#[test]
fn add_then_remove_restores_integer_batches() {
    let mut rng = StdRng::seed_from_u64(728);
    let mut cm = manager();
    for _ in 0..50 {
        check_round_trip(&mut cm, &mut rng, |r| r.random::<i64>());
        check_round_trip(&mut cm, &mut rng, |r| r.random::<u8>());
    }
}

#[test]
fn gather_matches_a_serial_sum() {
    let mut rng = StdRng::seed_from_u64(729);
    let mut cm = manager();

    for _ in 0..30 {
        let n: usize = rng.random_range(1..20);
        let block: usize = rng.random_range(1..4);
        let lengths = random_lengths(&mut rng, n);
        let outer: i64 = lengths.iter().map(|&l| l as i64).sum();
        let data: Vec<i32> = (0..outer as usize * block)
            .map(|_| rng.random_range(-100..100))
            .collect();
        let batch = Batch::new(vec![outer, block as i64], data).unwrap();

        let start_width: usize = rng.random_range(0..3);
        let end_width: usize = rng.random_range(0..3);
        let spec = PaddingSpec::new(start_width, end_width)
            .with_start_fill((0..block as i32).collect())
            .with_end_fill(vec![3; block]);
        let padded = cm.add_padding(&batch, Some(lengths.as_slice()), &spec).unwrap();

        let sums = cm
            .gather_padding(
                &padded.batch,
                Some(padded.lengths.as_slice()),
                spec.widths,
                GatherMode::Separate,
            )
            .unwrap();

        let expected_start: Vec<i32> = (0..block as i32)
            .map(|c| c * (n * start_width) as i32)
            .collect();
        let expected_end = vec![3 * (n * end_width) as i32; block];
        assert_eq!(sums.start(), Some(expected_start.as_slice()));
        assert_eq!(sums.end(), Some(expected_end.as_slice()));

        let merged = cm
            .gather_padding(
                &padded.batch,
                Some(lengths.as_slice()),
                spec.widths,
                GatherMode::Merged,
            )
            .unwrap();
        let expected_merged: Vec<i32> = expected_start
            .iter()
            .zip(&expected_end)
            .map(|(s, e)| s + e)
            .collect();
        assert_eq!(merged.merged(), Some(expected_merged.as_slice()));
    }
}
