use anyhow::{bail, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use pta_kernel::oracle::{brute_force_topk, threshold_topk};
use pta_kernel::verify::cross_validate;
use serde::Serialize;

use super::parse_executions;
use crate::workload::{query_for, Workload};

#[derive(Debug, Serialize)]
pub struct ValidationRow {
    pub execution: String,
    pub k: usize,
    pub passed: bool,
    pub detail: String,
}

/// Checks every execution, and the classic threshold algorithm, against brute force.
///
/// A `k` or `qq` the engine rejects yields failed rows rather than an error.
pub fn check(workload: &Workload, ks: &[usize], qq: usize, executions: &str, tolerance: f64) -> Result<Vec<ValidationRow>> {
    let kinds = parse_executions(executions)?;
    let (engine, _) = workload.build()?;
    let dims = engine.dataset().dims();

    let mut rows = Vec::new();
    for &k in ks {
        let query = query_for(k, dims, qq);
        if let Err(e) = query.validate(dims) {
            rows.extend(kinds.iter().map(|kind| ValidationRow {
                execution: kind.name().to_string(),
                k,
                passed: false,
                detail: e.to_string(),
            }));
            continue;
        }
        let expected = brute_force_topk(engine.dataset(), &query);

        for &kind in &kinds {
            let row = match engine.query_with(kind, &query) {
                Ok(result) => match cross_validate(kind.name(), &expected, &result.candidates, tolerance) {
                    Ok(()) => ValidationRow {
                        execution: kind.name().to_string(),
                        k: query.k,
                        passed: true,
                        detail: format!("k-th score {:.6}", result.threshold),
                    },
                    Err(e) => ValidationRow {
                        execution: kind.name().to_string(),
                        k: query.k,
                        passed: false,
                        detail: e.to_string(),
                    },
                },
                Err(e) => ValidationRow {
                    execution: kind.name().to_string(),
                    k: query.k,
                    passed: false,
                    detail: e.to_string(),
                },
            };
            rows.push(row);
        }

        let ta = threshold_topk(engine.dataset(), &query);
        let (passed, detail) = match cross_validate("ta", &expected, &ta.candidates, tolerance) {
            Ok(()) => (true, format!("depth {}, {} tuples scored", ta.depth, ta.seen)),
            Err(e) => (false, e.to_string()),
        };
        rows.push(ValidationRow { execution: "ta".into(), k: query.k, passed, detail });
    }
    Ok(rows)
}

pub fn run(workload: &Workload, ks: &[usize], qq: usize, executions: &str, tolerance: f64, json: bool) -> Result<()> {
    let rows = check(workload, ks, qq, executions, tolerance)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Execution", "k", "Status", "Details"]);
        for row in &rows {
            let status = if row.passed { "OK" } else { "MISMATCH" };
            table.add_row(vec![row.execution.clone(), row.k.to_string(), status.to_string(), row.detail.clone()]);
        }
        println!("{table}");
    }

    let failed = rows.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        bail!("{} of {} checks disagree with brute force", failed, rows.len());
    }
    Ok(())
}
