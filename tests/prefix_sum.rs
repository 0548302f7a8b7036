use segpad::{ComputeConfig, ComputeManager, ScanMode};

fn manager(scan_grain: usize) -> ComputeManager {
    ComputeManager::new_with(ComputeConfig {
        scan_grain,
        ..ComputeConfig::default()
    })
    .unwrap()
}

#[test]
fn inclusive_and_exclusive_sums() {
    let mut cm = manager(2);
    let lengths = [3, 0, 4, 1, 2];

    assert_eq!(
        cm.prefix_sum(&lengths, ScanMode::Inclusive).unwrap(),
        vec![3, 3, 7, 8, 10]
    );
    assert_eq!(
        cm.prefix_sum(&lengths, ScanMode::Exclusive).unwrap(),
        vec![0, 3, 3, 7, 8]
    );
}

#[test]
fn empty_lengths_give_empty_sums() {
    let mut cm = manager(4);
    assert!(cm.prefix_sum(&[], ScanMode::Inclusive).unwrap().is_empty());
}

#[test]
fn negative_length_is_a_violation() {
    let mut cm = manager(4);
    let err = cm.prefix_sum(&[2, -1], ScanMode::Inclusive).unwrap_err();
    assert!(err.is_contract_violation());
    assert!(err.to_string().contains("segment 1"));
}

#[test]
fn grain_does_not_change_the_result() {
    let lengths: Vec<i32> = (0..10_000).map(|i| (i * 31 % 17) as i32).collect();
    let expected = manager(1).prefix_sum(&lengths, ScanMode::Exclusive).unwrap();

    for grain in [7, 128, 4096, 20_000] {
        let sums = manager(grain)
            .prefix_sum(&lengths, ScanMode::Exclusive)
            .unwrap();
        assert_eq!(sums, expected, "grain {}", grain);
    }

    let total: i32 = lengths.iter().sum();
    assert_eq!(expected[lengths.len() - 1] + lengths[lengths.len() - 1], total);
}

#[test]
fn overflowing_total_is_a_violation() {
    let mut cm = manager(8);
    let err = cm
        .prefix_sum(&[i32::MAX / 2, i32::MAX / 2, 2], ScanMode::Inclusive)
        .unwrap_err();
    assert!(err.is_contract_violation());
}
