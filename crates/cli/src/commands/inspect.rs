use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use pta_kernel::layout::LayoutStats;
use pta_kernel::verify::to_hex;
use serde::Serialize;

use crate::workload::Workload;

#[derive(Debug, Serialize)]
pub struct LayoutReport {
    pub build_ms: f64,
    pub layout: LayoutStats,
    pub fingerprint: String,
    /// Tuple count and block count of each partition, in partition order.
    pub partitions: Vec<(usize, usize)>,
}

pub fn describe(workload: &Workload) -> Result<LayoutReport> {
    let (engine, build_time) = workload.build()?;
    let arena = engine.arena();
    Ok(LayoutReport {
        build_ms: build_time.as_secs_f64() * 1000.0,
        layout: arena.stats(),
        fingerprint: to_hex(&arena.fingerprint()),
        partitions: arena.partitions().map(|p| (p.tuple_count(), p.block_count())).collect(),
    })
}

pub fn run(workload: &Workload, show_partitions: bool, json: bool) -> Result<()> {
    let report = describe(workload)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\nBlock Layout Report");
    println!("-------------------");

    let stats = &report.layout;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Property", "Value"]);
    table.add_row(vec!["Tuples".to_string(), stats.tuples.to_string()]);
    table.add_row(vec!["Partitions".to_string(), stats.partitions.to_string()]);
    table.add_row(vec!["Empty partitions".to_string(), stats.empty_partitions.to_string()]);
    table.add_row(vec!["Partition size".to_string(), format!("{}..={}", stats.min_partition, stats.max_partition)]);
    table.add_row(vec!["Blocks".to_string(), stats.blocks.to_string()]);
    table.add_row(vec!["Block capacity".to_string(), stats.block_capacity.to_string()]);
    table.add_row(vec!["Build time".to_string(), format!("{:.1} ms", report.build_ms)]);
    table.add_row(vec!["Fingerprint".to_string(), report.fingerprint.clone()]);
    println!("{table}");

    if show_partitions {
        let mut parts = Table::new();
        parts
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Partition", "Tuples", "Blocks"]);
        for (i, (tuples, blocks)) in report.partitions.iter().enumerate() {
            parts.add_row(vec![i.to_string(), tuples.to_string(), blocks.to_string()]);
        }
        println!("{parts}");
    }
    Ok(())
}
