use std::cmp::{Ordering, Ord};
use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use fastrand::Rng;
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{Color, Coloring, ColoringInstance, VertexId};
use crate::error::{ColoringError, Result};

/** How to build an initial coloring */
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStrategy {
    /// random coloring with as many colors as the upper bound (may have conflicts)
    Random,
    /// first-fit greedy in vertex order (no conflict)
    Greedy,
    /// two colors given by a DFS (no conflict iff the graph is bipartite)
    Bipartite,
    /// DSATUR greedy (no conflict)
    Dsatur,
}

impl FromStr for BuildStrategy {
    type Err = ColoringError;

    fn from_str(s:&str) -> Result<Self> {
        match s {
            "random" => Ok(Self::Random),
            "greedy" => Ok(Self::Greedy),
            "bipartite" => Ok(Self::Bipartite),
            "dsatur" => Ok(Self::Dsatur),
            _ => Err(ColoringError::UnsupportedStrategy(format!("build strategy '{}'", s))),
        }
    }
}

impl fmt::Display for BuildStrategy {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Random => "random",
            Self::Greedy => "greedy",
            Self::Bipartite => "bipartite",
            Self::Dsatur => "dsatur",
        };
        write!(f, "{}", name)
    }
}

/** random coloring using at most k colors */
pub fn random(inst:&dyn ColoringInstance, k:usize, rng:&mut Rng) -> Coloring {
    let k = std::cmp::max(k, 1);
    inst.vertices().map(|_| rng.usize(0..k)).collect()
}

/** two-coloring by a DFS from every uncolored vertex.
Each vertex takes the opposite color of the vertex it was discovered from.
*/
pub fn bipartite(inst:&dyn ColoringInstance) -> Coloring {
    let n = inst.nb_vertices();
    let mut colors:Vec<Option<Color>> = vec![None ; n];
    let mut stack:Vec<(VertexId, Color)> = Vec::new();
    for s in inst.vertices() {
        if colors[s].is_some() { continue; }
        stack.push((s, 0));
        while let Some((u,c)) = stack.pop() {
            if colors[u].is_some() { continue; }
            colors[u] = Some(c);
            for v in inst.neighbors(u) {
                if colors[*v].is_none() {
                    stack.push((*v, 1-c));
                }
            }
        }
    }
    colors.into_iter().map(|c| c.unwrap_or(0)).collect()
}

/** first-fit greedy: vertices are colored in index order with the smallest color
not used by an already colored neighbor.
*/
pub fn greedy(inst:&dyn ColoringInstance) -> Coloring {
    let n = inst.nb_vertices();
    let mut colors:Vec<Option<Color>> = vec![None ; n];
    let mut taken = BitSet::with_capacity(n);
    for v in inst.vertices() {
        taken.clear();
        for u in inst.neighbors(v) {
            if let Some(c) = colors[*u] { taken.insert(c); }
        }
        colors[v] = (0..).find(|c| !taken.contains(*c));
    }
    colors.into_iter().map(|c| c.unwrap_or(0)).collect()
}

#[derive(PartialEq, Eq)]
struct DSatInfo {
    dsat: usize,
    degree: usize
}

impl Ord for DSatInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dsat.cmp(&other.dsat)
            .then_with(|| self.degree.cmp(&other.degree))
    }
}

impl PartialOrd for DSatInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/** implements a greedy DSATUR algorithm.
    1. choose an uncolored vertex that sees the most colors (break ties by the largest degree)
    2. assign it the first color available
    3. mark all its neighbors seeing this color
    4. repeat until a proper coloring is found
*/
pub fn dsatur(inst:&dyn ColoringInstance) -> Coloring {
    let n:usize = inst.nb_vertices();
    let mut remaining_vertices:PriorityQueue<VertexId, DSatInfo> = PriorityQueue::new();
    for i in 0..n {
        remaining_vertices.push(i, DSatInfo { dsat:0, degree:inst.degree(i)});
    }
    let mut colors:Vec<Option<Color>> = vec![None ; n]; // colors[v] -> color assigned to vertex v
    let mut adj_colors:Vec<BitSet> = vec![BitSet::default() ; n]; // adj_colors[n] -> colors n sees
    while let Some((current_vertex,_)) = remaining_vertices.pop() {
        let mut color:Color = 0;
        while adj_colors[current_vertex].contains(color) { color += 1; }
        colors[current_vertex] = Some(color);
        // update saturation degree information
        for conflict_vertex in inst.neighbors(current_vertex).iter()
        .filter(|conflict_vertex| colors[**conflict_vertex].is_none()) {
            if adj_colors[*conflict_vertex].insert(color) {
                remaining_vertices.change_priority_by(conflict_vertex, |p| {p.dsat += 1;});
            }
        }
    }
    colors.into_iter().map(|c| c.unwrap_or(0)).collect()
}

/** builds an initial coloring. `bound` is the number of colors of the random strategy. */
pub fn build(inst:&dyn ColoringInstance, strategy:BuildStrategy, bound:usize, rng:&mut Rng) -> Coloring {
    let res = match strategy {
        BuildStrategy::Random => random(inst, bound, rng),
        BuildStrategy::Greedy => greedy(inst),
        BuildStrategy::Bipartite => bipartite(inst),
        BuildStrategy::Dsatur => dsatur(inst),
    };
    debug!(%strategy, nb_colors = res.iter().max().map_or(0, |c| c+1), "initial coloring built");
    res
}
