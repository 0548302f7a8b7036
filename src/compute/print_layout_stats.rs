use crate::{
    layout::{LayoutTable, PadDirection},
    tensor::BatchDesc,
};

// Rows beyond this are summarised rather than listed
const MAX_ROWS: usize = 16;

pub fn print_layout_stats(table: &LayoutTable, desc: &BatchDesc, element_bytes: usize) {
    let direction = match table.direction() {
        PadDirection::Insert => "insert",
        PadDirection::Strip => "strip",
    };

    println!("\nLayout Statistics");
    println!("=================");
    println!("\nInput Shape: {}", format_dimensions(desc.dims()));
    println!(
        "Direction: {}  Widths: start={} end={}  Block Size: {}",
        direction,
        table.widths().start,
        table.widths().end,
        table.block_size()
    );
    println!(
        "Segments: {}  Blocks: {} -> {}",
        table.num_segments(),
        table.in_blocks(),
        table.out_blocks()
    );
    println!(
        "Output Memory: {}",
        format_memory_mb(table.out_elements() * element_bytes)
    );

    println!("\nSegment Details:");
    println!("{:-<60}", "");
    println!(
        "{:<8} {:<12} {:<12} {:<12} {}",
        "Seg", "In Start", "Out Start", "Len", "Out Len"
    );
    println!("{:-<60}", "");

    for (idx, seg) in table.segments().iter().take(MAX_ROWS).enumerate() {
        println!(
            "{:<8} {:<12} {:<12} {:<12} {}",
            idx,
            seg.in_start,
            seg.out_start,
            seg.len_blocks,
            table.segment_out_blocks(seg)
        );
    }

    if table.num_segments() > MAX_ROWS {
        println!("... {} more segments", table.num_segments() - MAX_ROWS);
    }
    println!("{:-<60}", "");
}

fn format_dimensions(dims: &[i64]) -> String {
    if dims.len() <= 4 {
        dims.iter()
            .map(|&d| d.to_string())
            .collect::<Vec<_>>()
            .join("×")
    } else {
        format!("{}d batch", dims.len())
    }
}

fn format_memory_mb(bytes: usize) -> String {
    format!("{:.2} MiB", bytes as f64 / (1024.0 * 1024.0))
}
