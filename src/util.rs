use std::fs;

use clap::ArgMatches;
use serde_json::{json, Value};
use tracing::info;

use crate::color::{coloring_to_solution, Color};
use crate::compact_instance::CompactInstance;
use crate::config::GlsConfig;
use crate::error::{ColoringError, Result};
use crate::pipeline::PipelineReport;

/** command line parameters of a coloring run */
#[derive(Debug)]
pub struct RunParams {
    /// instance file name
    pub inst_filename: String,
    /// instance read from the file
    pub instance: CompactInstance,
    /// run configuration (file + command line overrides)
    pub config: GlsConfig,
    /// solution file (if any)
    pub sol_file: Option<String>,
    /// statistics file (if any)
    pub perf_file: Option<String>,
}

fn parse_arg<T>(main_args:&ArgMatches, name:&str) -> Result<Option<T>>
where T: std::str::FromStr<Err=ColoringError> {
    main_args.value_of(name).map(str::parse).transpose()
}

/** reads command line input and returns the instance, the configuration and the output files */
pub fn read_params(main_args:&ArgMatches) -> Result<RunParams> {
    let inst_filename = main_args.value_of("instance")
        .ok_or_else(|| ColoringError::Parse("missing instance file".to_string()))?;
    let mut config = match main_args.value_of("config") {
        None => GlsConfig::default(),
        Some(filename) => GlsConfig::from_file(filename)?,
    };
    if let Some(strategy) = parse_arg(main_args, "upper-bound")? { config.upper_bound = strategy; }
    if let Some(strategy) = parse_arg(main_args, "build")? { config.build = strategy; }
    if let Some(policy) = parse_arg(main_args, "policy")? { config.search.policy = policy; }
    if let Some(lb) = main_args.value_of("lower-bound") {
        config.search.lower_bound = Some(lb.parse()
            .map_err(|_| ColoringError::Parse(format!("invalid lower bound: {}", lb)))?);
    }
    if let Some(seed) = main_args.value_of("seed") {
        config.search.guided.seed = seed.parse()
            .map_err(|_| ColoringError::Parse(format!("invalid seed: {}", seed)))?;
    }
    let sol_file = main_args.value_of("solution").map(str::to_string);
    let perf_file = main_args.value_of("perf").map(str::to_string);
    if let Some(e) = &sol_file { info!("printing solutions in: {}", e); }
    if let Some(e) = &perf_file { info!("printing perfs in: {}", e); }
    let instance = CompactInstance::from_file(inst_filename)?;
    instance.display_statistics();
    Ok(RunParams { inst_filename: inst_filename.to_string(), instance, config, sol_file, perf_file })
}

/** writes a string encoding the solution: each line lists the vertices of a color */
pub fn solution_to_string(coloring:&[Color]) -> String {
    let mut res = String::default();
    for e in coloring_to_solution(coloring) {
        for v in e {
            res += format!("{} ", v).as_str();
        }
        res += "\n";
    }
    res
}

/** statistics of a run (exported in the performance file) */
pub fn build_stats(inst_name:&str, report:&PipelineReport, time_searched:f32) -> Result<Value> {
    Ok(json!({
        "inst_name": inst_name,
        "time_searched": time_searched,
        "upper_bound": report.bound,
        "initial_colors": report.initial_colors,
        "bipartite": report.bipartite,
        "search": serde_json::to_value(&report.search)?,
    }))
}

/// exports search results to files
pub fn export_results(
    coloring:&[Color],
    stats:&Value,
    perf_file:Option<&str>,
    sol_file:Option<&str>,
) -> Result<()> {
    if let Some(filename) = perf_file {
        fs::write(filename, serde_json::to_string(stats)?)?;
        info!(filename, "statistics exported");
    }
    if let Some(filename) = sol_file {
        fs::write(filename, solution_to_string(coloring))?;
        info!(filename, "solution exported");
    }
    Ok(())
}
