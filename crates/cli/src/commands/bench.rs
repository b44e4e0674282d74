use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use pta_kernel::oracle::threshold_topk;
use pta_kernel::{Query, ScanMetrics, TopkEngine};
use serde::Serialize;
use std::time::Instant;

use super::parse_executions;
use crate::workload::{query_for, Workload};

/// Row label of the classic threshold algorithm baseline.
pub const TA_BASELINE: &str = "ta";

#[derive(Debug, Serialize)]
pub struct BenchRow {
    pub execution: String,
    pub qq: usize,
    pub queries: usize,
    pub avg_ms: f64,
    pub tuples_per_query: f64,
    pub scan_ratio: f64,
    pub early_stop_ratio: f64,
    pub threshold: f32,
}

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub n: usize,
    pub d: usize,
    pub k: usize,
    pub build_ms: f64,
    pub partitions: usize,
    pub blocks: usize,
    pub rows: Vec<BenchRow>,
}

/// The qq values to time: `qq` (0 = all attributes), then every `step` up to `dims`.
///
/// The first value is kept even when it exceeds `dims`, so the query fails.
pub fn qq_sweep(qq: usize, step: usize, dims: usize) -> Vec<usize> {
    let first = if qq == 0 { dims } else { qq };
    let mut sweep = vec![first];
    if step > 0 {
        let mut next = first + step;
        while next <= dims {
            sweep.push(next);
            next += step;
        }
    }
    sweep
}

/// Builds once, then for each qq of the sweep times `queries` repetitions per
/// execution after one warm-up query, plus the threshold algorithm baseline.
pub fn measure(
    workload: &Workload,
    k: usize,
    qq: usize,
    qq_step: usize,
    queries: usize,
    executions: &str,
) -> Result<BenchReport> {
    let kinds = parse_executions(executions)?;
    let (engine, build_time) = workload.build()?;
    let dims = engine.dataset().dims();
    let stats = engine.layout_stats();
    let queries = queries.max(1);

    let mut rows = Vec::new();
    for q in qq_sweep(qq, qq_step, dims) {
        let query = query_for(k, dims, q);
        query.validate(dims)?;

        for &kind in &kinds {
            engine.query_with(kind, &query)?;

            let metrics = ScanMetrics::new();
            let start = Instant::now();
            let mut threshold = f32::NEG_INFINITY;
            for _ in 0..queries {
                threshold = engine.query_with_metrics(kind, &query, &metrics)?.threshold;
            }
            let elapsed = start.elapsed();
            let snap = metrics.snapshot();
            tracing::debug!("{} qq={}: {:?}", kind.name(), q, snap);

            rows.push(BenchRow {
                execution: kind.name().to_string(),
                qq: q,
                queries,
                avg_ms: elapsed.as_secs_f64() * 1000.0 / queries as f64,
                tuples_per_query: snap.tuples_scanned as f64 / queries as f64,
                scan_ratio: snap.scan_ratio(engine.dataset().len() * queries),
                early_stop_ratio: if snap.partitions_scanned == 0 {
                    0.0
                } else {
                    snap.partitions_terminated_early as f64 / snap.partitions_scanned as f64
                },
                threshold,
            });
        }
        rows.push(time_baseline(&engine, &query, queries));
    }

    Ok(BenchReport {
        n: engine.dataset().len(),
        d: dims,
        k,
        build_ms: build_time.as_secs_f64() * 1000.0,
        partitions: stats.partitions,
        blocks: stats.blocks,
        rows,
    })
}

fn time_baseline(engine: &TopkEngine, query: &Query, queries: usize) -> BenchRow {
    let dataset = engine.dataset();
    threshold_topk(dataset, query);

    let start = Instant::now();
    let mut seen = 0;
    let mut threshold = f32::NEG_INFINITY;
    for _ in 0..queries {
        let outcome = threshold_topk(dataset, query);
        seen += outcome.seen;
        threshold = outcome.candidates.last().map(|c| c.score).unwrap_or(f32::NEG_INFINITY);
    }
    let elapsed = start.elapsed();

    BenchRow {
        execution: TA_BASELINE.to_string(),
        qq: query.qq(),
        queries,
        avg_ms: elapsed.as_secs_f64() * 1000.0 / queries as f64,
        tuples_per_query: seen as f64 / queries as f64,
        scan_ratio: if dataset.is_empty() { 0.0 } else { seen as f64 / (dataset.len() * queries) as f64 },
        early_stop_ratio: 0.0,
        threshold,
    }
}

pub fn run(
    workload: &Workload,
    k: usize,
    qq: usize,
    qq_step: usize,
    queries: usize,
    executions: &str,
    json: bool,
) -> Result<()> {
    let report = measure(workload, k, qq, qq_step, queries, executions)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "\nTop-{} over {} attributes, {} tuples ({} partitions, {} blocks, built in {:.1} ms)",
        report.k, report.d, report.n, report.partitions, report.blocks, report.build_ms
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Execution", "qq", "Avg ms", "Tuples/query", "Scanned", "Early stops", "k-th score"]);
    for row in &report.rows {
        table.add_row(vec![
            row.execution.clone(),
            row.qq.to_string(),
            format!("{:.3}", row.avg_ms),
            format!("{:.0}", row.tuples_per_query),
            format!("{:.2}%", row.scan_ratio * 100.0),
            format!("{:.0}%", row.early_stop_ratio * 100.0),
            format!("{:.5}", row.threshold),
        ]);
    }
    println!("{table}");
    Ok(())
}
