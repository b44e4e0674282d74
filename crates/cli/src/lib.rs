pub mod commands;
pub mod workload;
