use segpad::{
    Batch, ComputeConfig, ComputeManager, GatherMode, GatherOutput, GatherPaddingInstruction,
    GatherTarget, PaddingWidths,
};

fn manager() -> ComputeManager {
    ComputeManager::new_with(ComputeConfig {
        num_threads: Some(4),
        element_grain: 1,
        scan_grain: 1,
        ..ComputeConfig::default()
    })
    .unwrap()
}

// [pA, x1, x2, pB, pC, y1, y2, y3, pD]
fn two_segments() -> Batch<f64> {
    Batch::new(
        vec![9],
        vec![1.0, 10.0, 20.0, 2.0, 3.0, 30.0, 40.0, 50.0, 4.0],
    )
    .unwrap()
}

#[test]
fn sums_start_and_end_padding_separately() {
    let mut cm = manager();

    let out = cm
        .gather_padding(
            &two_segments(),
            Some(&[4, 5][..]),
            PaddingWidths::symmetric(1),
            GatherMode::Separate,
        )
        .unwrap();

    assert_eq!(out.start(), Some(&[4.0][..]));
    assert_eq!(out.end(), Some(&[6.0][..]));
    assert_eq!(out.merged(), None);
}

#[test]
fn payload_lengths_locate_the_same_padding() {
    let mut cm = manager();
    let widths = PaddingWidths::symmetric(1);

    let padded = cm
        .gather_padding(&two_segments(), Some(&[4, 5][..]), widths, GatherMode::Separate)
        .unwrap();
    let payload = cm
        .gather_padding(&two_segments(), Some(&[2, 3][..]), widths, GatherMode::Separate)
        .unwrap();

    assert_eq!(padded, payload);
}

#[test]
fn merged_mode_adds_both_ends() {
    let mut cm = manager();

    let out = cm
        .gather_padding(
            &two_segments(),
            Some(&[2, 3][..]),
            PaddingWidths::symmetric(1),
            GatherMode::Merged,
        )
        .unwrap();

    assert_eq!(out, GatherOutput::Merged(vec![10.0]));
    assert_eq!(out.start(), None);
}

#[test]
fn sums_every_column_of_wide_padding() {
    let mut cm = manager();
    // two segments of padded length 4 and 3, widths (2, 1), blocks of two columns
    let data = vec![
        1, 2, 3, 4, 0, 0, 5, 6, // segment 0
        7, 8, 9, 10, 11, 12, // segment 1
    ];
    let batch = Batch::new(vec![7, 2], data).unwrap();

    let out = cm
        .gather_padding(
            &batch,
            Some(&[4, 3][..]),
            PaddingWidths::new(2, 1),
            GatherMode::Separate,
        )
        .unwrap();

    assert_eq!(out.start(), Some(&[1 + 3 + 7 + 9, 2 + 4 + 8 + 10][..]));
    assert_eq!(out.end(), Some(&[5 + 11, 6 + 12][..]));
}

#[test]
fn accumulator_is_wider_than_the_element() {
    let mut cm = manager();
    let big = i32::MAX;
    // padding-only segments; partial sums overflow i32 even though the total fits
    let batch = Batch::new(vec![4], vec![big, -big, big, -big + 5]).unwrap();

    let out = cm
        .gather_padding(
            &batch,
            Some(&[2, 2][..]),
            PaddingWidths::symmetric(1),
            GatherMode::Merged,
        )
        .unwrap();

    assert_eq!(out.merged(), Some(&[5][..]));
}

#[test]
fn omitted_lengths_gather_the_batch_ends() {
    let mut cm = manager();
    let batch = Batch::new(vec![4, 2], vec![1u32, 2, 9, 9, 9, 9, 3, 4]).unwrap();

    let out = cm
        .gather_padding(&batch, None, PaddingWidths::symmetric(1), GatherMode::Separate)
        .unwrap();

    assert_eq!(out.start(), Some(&[1, 2][..]));
    assert_eq!(out.end(), Some(&[3, 4][..]));
}

#[test]
fn zero_widths_give_zero_sums() {
    let mut cm = manager();

    let out = cm
        .gather_padding(
            &two_segments(),
            Some(&[4, 5][..]),
            PaddingWidths::default(),
            GatherMode::Separate,
        )
        .unwrap();

    assert_eq!(out.start(), Some(&[0.0][..]));
    assert_eq!(out.end(), Some(&[0.0][..]));
}

#[test]
fn zero_segments_give_zero_sums() {
    let mut cm = manager();
    let batch = Batch::<f32>::new(vec![0, 3], Vec::new()).unwrap();

    let out = cm
        .gather_padding(&batch, Some(&[][..]), PaddingWidths::symmetric(2), GatherMode::Merged)
        .unwrap();

    assert_eq!(out.merged(), Some(&[0.0, 0.0, 0.0][..]));
}

#[test]
fn segment_shorter_than_padding_is_a_violation() {
    let mut cm = manager();

    let err = cm
        .gather_padding(
            &two_segments(),
            Some(&[1, 8][..]),
            PaddingWidths::symmetric(1),
            GatherMode::Separate,
        )
        .unwrap_err();

    assert!(err.is_contract_violation());
}

#[test]
fn caller_target_is_written_in_place() {
    let mut cm = manager();
    let mut start = vec![-1.0f64];
    let mut end = vec![-1.0f64];

    cm.gather_padding_into(
        &two_segments(),
        Some(&[4, 5][..]),
        PaddingWidths::symmetric(1),
        GatherTarget::Separate {
            start: &mut start[..],
            end: &mut end[..],
        },
    )
    .unwrap();

    assert_eq!(start, vec![4.0]);
    assert_eq!(end, vec![6.0]);
}

#[test]
fn caller_target_of_wrong_size_is_rejected() {
    let mut cm = manager();
    let mut merged = vec![-1.0f64; 2];

    let err = cm
        .gather_padding_into(
            &two_segments(),
            Some(&[4, 5][..]),
            PaddingWidths::symmetric(1),
            GatherTarget::Merged(&mut merged[..]),
        )
        .unwrap_err();

    assert!(err.is_contract_violation());
    assert_eq!(merged, vec![-1.0; 2]);
}

#[test]
fn instruction_plans_with_segment_starts() {
    let mut cm = manager();
    let batch = two_segments();
    let instr = GatherPaddingInstruction::new(PaddingWidths::symmetric(1));

    let table = instr.plan(&mut cm, batch.desc(), Some(&[4, 5][..])).unwrap();

    assert_eq!(table.segments()[0].in_start, 0);
    assert_eq!(table.segments()[1].in_start, 4);
    assert_eq!(table.segments()[1].len_blocks, 5);
    assert_eq!(format!("{:?}", instr), "GatherPadding(start_width=1, end_width=1)");
}

#[test]
fn oversized_widths_are_a_violation() {
    let mut cm = manager();
    let batch = Batch::new(vec![2], vec![1.0f64, 2.0]).unwrap();

    let err = cm
        .gather_padding(
            &batch,
            Some(&[1, 1][..]),
            PaddingWidths::new(usize::MAX, 1),
            GatherMode::Separate,
        )
        .unwrap_err();
    assert!(err.is_contract_violation());
}
