pub mod bench;
pub mod inspect;
pub mod validate;

use pta_kernel::ExecutionKind;

/// Parses an execution name; `all` selects every execution.
pub fn parse_executions(name: &str) -> anyhow::Result<Vec<ExecutionKind>> {
    if name.eq_ignore_ascii_case("all") {
        return Ok(ExecutionKind::ALL.to_vec());
    }
    ExecutionKind::ALL
        .into_iter()
        .find(|k| k.name().eq_ignore_ascii_case(name))
        .map(|k| vec![k])
        .ok_or_else(|| anyhow::anyhow!("unknown execution '{}' (expected scalar, simd, threaded or all)", name))
}
