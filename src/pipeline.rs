use fastrand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::builder::{self, BuildStrategy};
use crate::color::{Coloring, ColoringInstance, validate_graph};
use crate::config::GlsConfig;
use crate::error::Result;
use crate::search::guided::{GuidedLocalSearch, Resolution};
use crate::search::local_search::{evaluate, get_colors, nb_colors, SolveReport};
use crate::upper_bound;

/** result of a coloring run */
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// upper bound on the chromatic number
    pub bound: usize,
    /// number of colors of the initial (conflict-free) coloring
    pub initial_colors: usize,
    /// true if the graph is bipartite and was solved by the DFS 2-coloring
    pub bipartite: bool,
    /// color reduction statistics (None if the bipartite shortcut was used)
    pub search: Option<SolveReport>,
    /// final coloring
    pub coloring: Coloring,
}

/** colors a graph:
    1. if the DFS 2-coloring has no conflict, returns it
    2. computes the upper bound K
    3. builds an initial coloring (colors ≥ K are set to 0)
    4. repairs it with the guided local search if it has conflicts (greedy as fallback)
    5. reduces the number of colors with the local search colorer
*/
pub fn color_graph(inst:&dyn ColoringInstance, config:&GlsConfig) -> Result<PipelineReport> {
    validate_graph(inst)?;
    let bipartite = builder::bipartite(inst);
    if evaluate(inst, &bipartite) == 0 {
        info!("the graph is bipartite");
        return Ok(PipelineReport {
            bound: upper_bound::calculate(inst, config.upper_bound)?,
            initial_colors: nb_colors(&bipartite),
            bipartite: true,
            search: None,
            coloring: bipartite,
        });
    }
    let bound = upper_bound::calculate(inst, config.upper_bound)?;
    let mut rng = Rng::with_seed(config.search.guided.seed);
    let built = builder::build(inst, config.build, bound, &mut rng);
    let k = std::cmp::max(bound, get_colors(&built).map_or(0, |c| c+1));
    info!(bound, k, build = %config.build, "initial coloring");
    let mut coloring:Coloring = built.into_iter().map(|c| if c >= k { 0 } else { c }).collect();
    if evaluate(inst, &coloring) > 0 {
        let mut gls = GuidedLocalSearch::new(inst, config.search.guided.clone());
        let (repaired, report) = gls.solve(&coloring, k)?;
        coloring = if report.resolution == Resolution::Solved {
            repaired
        } else {
            warn!(resolution = ?report.resolution, "initial repair failed, using the greedy coloring");
            builder::build(inst, BuildStrategy::Greedy, bound, &mut rng)
        };
    }
    let initial_colors = nb_colors(&coloring);
    let search = config.search.solve(inst, &mut coloring)?;
    Ok(PipelineReport { bound, initial_colors, bipartite: false, search: Some(search), coloring })
}
