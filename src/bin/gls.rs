use std::process;
use std::time::Instant;

use clap::{App, load_yaml};
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;

use gls_color::color::{checker, CheckerResult};
use gls_color::error::Result;
use gls_color::pipeline::color_graph;
use gls_color::util::{read_params, build_stats, export_results};

fn run() -> Result<()> {
    let yaml = load_yaml!("gls.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let level:LevelFilter = main_args.value_of("log-level").unwrap_or("info")
        .parse().unwrap_or(LevelFilter::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();
    let params = read_params(&main_args)?;

    // solve it
    let t_start = Instant::now();
    let report = color_graph(&params.instance, &params.config)?;
    let duration = t_start.elapsed().as_secs_f32();
    match checker(&params.instance, &report.coloring) {
        CheckerResult::Ok(nb_colors) => info!(
            "GLS took {:.3} seconds. Nb colors: {}", duration, nb_colors
        ),
        res => error!("invalid coloring: {:?}", res),
    }
    let stats = build_stats(&params.inst_filename, &report, duration)?;

    // export results
    export_results(
        &report.coloring,
        &stats,
        params.perf_file.as_deref(),
        params.sol_file.as_deref(),
    )
}

/** colors a DIMACS instance */
pub fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
