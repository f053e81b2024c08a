use std::time::Instant;

use fastrand::Rng;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::color::{Color, Coloring, ColoringInstance, VertexId};
use crate::error::{ColoringError, Result};

/** parameters of the guided local search */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidedParams {
    /// coefficient of the guidance in the total score
    pub lambda: i64,
    /// if true, λ is set at the first penalty update to the average score decrease per move
    pub dynamic_lambda: bool,
    /// number of consecutive non-improving moves before a penalty update
    pub max_no_improve: usize,
    /// enables the aspiration moves
    pub aspiration: bool,
    /// if true, penalties are cleared at the beginning of every call to solve
    pub reset_weights: bool,
    /// maximum number of moves over the lifetime of the search
    pub max_iter: Option<u64>,
    /// maximum execution time (in seconds) over the lifetime of the search
    pub timeout: Option<f32>,
    /// random seed
    pub seed: u64,
}

impl Default for GuidedParams {
    fn default() -> Self {
        Self {
            lambda: 10,
            dynamic_lambda: false,
            max_no_improve: 5,
            aspiration: true,
            reset_weights: true,
            max_iter: Some(1_000_000),
            timeout: Some(120.),
            seed: 0,
        }
    }
}

/** why the search stopped */
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// the best coloring found has no conflict
    Solved,
    /// the iteration limit was reached
    MaxIterations,
    /// the time limit was reached
    Timeout,
}

/** score of a coloring */
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct Score {
    /// number of conflicting edges
    pub conflicts: i64,
    /// sum of the weights of the conflicting edges
    pub guidance: i64,
    /// 10.conflicts + λ.guidance (or 10.conflicts while no penalty exists)
    pub total: i64,
}

/// recolors vertex to color `to`, reaching score `score`
#[derive(Debug, Clone, Copy)]
struct Move {
    vertex: VertexId,
    to: Color,
    score: Score,
}

/** statistics of a call to solve */
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// number of colors searched
    pub k: usize,
    /// stopping reason
    pub resolution: Resolution,
    /// moves performed
    pub iterations: u64,
    /// penalty updates performed
    pub weight_updates: u64,
    /// best-so-far improvements
    pub improvements: u64,
    /// aspiration moves performed
    pub aspirations: u64,
    /// local minima met
    pub local_minima: u64,
    /// initial score
    pub start: Score,
    /// score of the returned coloring
    pub end: Score,
}

/** Guided Local Search for the k-coloring problem.
(see <http://www.cleveralgorithms.com/nature-inspired/stochastic/guided_local_search.html>)

Starts from a k-coloring that may contain conflicts and recolors conflicting vertices.
The objective combines the number of conflicts and the penalties (weights) of the
conflicting edges. At a local minimum, or after some non-improving moves, the conflicting
edges with maximal utility indicator/(1+weight) are penalized.
*/
#[derive(Debug)]
pub struct GuidedLocalSearch<'a> {
    /// reference instance
    inst: &'a dyn ColoringInstance,
    /// parameters
    params: GuidedParams,
    /// current value of λ
    lambda: i64,
    /// incident[u]: (v, e) for every edge e=(u,v)
    incident: Vec<Vec<(VertexId, usize)>>,
    /// weights[e]: penalty of edge e
    weights: Vec<i64>,
    /// sum of the penalties
    total_weight: i64,
    /// nb_neigh_colors[v][c]: number of neighbors of v that are assigned color c
    nb_neigh_colors: Vec<Vec<i64>>,
    /// random number generator
    rng: Rng,
    /// creation time (used by the timeout)
    start: Instant,
    /// number of moves since the creation
    nb_iter: u64,
}

impl<'a> GuidedLocalSearch<'a> {

    /** creates a search for an instance. The timer starts now. */
    pub fn new(inst:&'a dyn ColoringInstance, params:GuidedParams) -> Self {
        let mut incident = vec![Vec::new() ; inst.nb_vertices()];
        for (e,(u,v)) in inst.edges().iter().enumerate() {
            incident[*u].push((*v, e));
            incident[*v].push((*u, e));
        }
        Self {
            inst,
            lambda: params.lambda,
            rng: Rng::with_seed(params.seed),
            params,
            incident,
            weights: vec![0 ; inst.nb_edges()],
            total_weight: 0,
            nb_neigh_colors: Vec::new(),
            start: Instant::now(),
            nb_iter: 0,
        }
    }

    /// current penalty of every edge (in the order of the instance edge list)
    pub fn weights(&self) -> &[i64] { &self.weights }

    /// sets all penalties to zero
    fn clear_weights(&mut self) {
        self.weights.iter_mut().for_each(|w| *w = 0);
        self.total_weight = 0;
        self.lambda = self.params.lambda;
    }

    fn build_score(&self, conflicts:i64, guidance:i64) -> Score {
        let total = if self.total_weight > 0 {
            10 * conflicts + self.lambda * guidance
        } else {
            10 * conflicts
        };
        Score { conflicts, guidance, total }
    }

    /// populates nb_neigh_colors for a k-coloring
    fn update_conflicts(&mut self, coloring:&[Color], k:usize) {
        let mut res = vec![vec![0 ; k] ; self.inst.nb_vertices()];
        for u in self.inst.vertices() {
            for v in self.inst.neighbors(u) {
                res[u][coloring[*v]] += 1;
            }
        }
        self.nb_neigh_colors = res;
    }

    fn score_conflicts(&self, coloring:&[Color]) -> i64 {
        let sum:i64 = self.inst.vertices()
            .map(|v| self.nb_neigh_colors[v][coloring[v]])
            .sum();
        sum / 2
    }

    fn score_guidance(&self, coloring:&[Color]) -> i64 {
        if self.total_weight == 0 { return 0; }
        self.inst.edges().iter().enumerate()
            .filter(|(_,(u,v))| coloring[*u] == coloring[*v])
            .map(|(e,_)| self.weights[e])
            .sum()
    }

    /** increments the weights of the conflicting edges with maximal utility */
    fn update_weights(&mut self, coloring:&[Color]) {
        let utilities:Vec<OrderedFloat<f64>> = self.inst.edges().iter().enumerate()
            .map(|(e,(u,v))| {
                let indicator = if coloring[*u] == coloring[*v] { 1. } else { 0. };
                OrderedFloat(indicator / (1. + self.weights[e] as f64))
            })
            .collect();
        let max_utility = match utilities.iter().max() {
            Some(m) if m.into_inner() > 0. => *m,
            _ => return, // no conflicting edge
        };
        let mut nb_updated = 0;
        for (e,utility) in utilities.iter().enumerate() {
            if *utility == max_utility {
                self.weights[e] += 1;
                nb_updated += 1;
            }
        }
        self.total_weight += nb_updated;
        trace!(nb_updated, total_weight = self.total_weight, "penalties updated");
    }

    /// applies a move to the coloring and to the neighbor color counts
    fn make_move(&mut self, coloring:&mut [Color], next:&Move) {
        let old = coloring[next.vertex];
        for u in self.inst.neighbors(next.vertex) {
            self.nb_neigh_colors[*u][old] -= 1;
            self.nb_neigh_colors[*u][next.to] += 1;
        }
        coloring[next.vertex] = next.to;
    }

    /** returns the best moves from the current coloring.
    Only conflicting vertices are recolored. A move is kept if it does not worsen the total
    score. If aspiration is enabled and some moves reach fewer conflicts than the best
    coloring found so far (while worsening the total score), those are returned instead.
    */
    fn best_neighbours(
        &self, coloring:&[Color], k:usize, score:&Score, best_conflicts:i64
    ) -> (Vec<Move>, bool) {
        let mut res:Vec<Move> = Vec::new();
        let mut aspired:Vec<Move> = Vec::new();
        let mut best_total = score.total;
        let mut min_conflicts = i64::MAX;
        let with_guidance = self.total_weight > 0;
        let mut weight_to_color = vec![0 ; k];
        for v in self.inst.vertices() {
            let cv = coloring[v];
            if self.nb_neigh_colors[v][cv] == 0 { continue; }
            if with_guidance {
                weight_to_color.iter_mut().for_each(|w| *w = 0);
                for (u,e) in &self.incident[v] {
                    weight_to_color[coloring[*u]] += self.weights[*e];
                }
            }
            for c in (0..k).filter(|c| *c != cv) {
                let conflicts = score.conflicts + self.nb_neigh_colors[v][c] - self.nb_neigh_colors[v][cv];
                let guidance = if with_guidance {
                    score.guidance + weight_to_color[c] - weight_to_color[cv]
                } else { 0 };
                let eval = self.build_score(conflicts, guidance);
                let m = Move { vertex:v, to:c, score:eval };
                if eval.total < best_total {
                    best_total = eval.total;
                    res.clear();
                }
                if eval.total == best_total {
                    res.push(m);
                }
                if self.params.aspiration {
                    if eval.conflicts < min_conflicts {
                        min_conflicts = eval.conflicts;
                        aspired.clear();
                    }
                    if eval.conflicts == min_conflicts && eval.conflicts < best_conflicts
                    && eval.total > score.total {
                        aspired.push(m);
                    }
                }
            }
        }
        if !aspired.is_empty() {
            return (aspired, true);
        }
        (res, false)
    }

    fn stopping_resolution(&self) -> Option<Resolution> {
        if let Some(max_iter) = self.params.max_iter {
            if self.nb_iter >= max_iter { return Some(Resolution::MaxIterations); }
        }
        if let Some(timeout) = self.params.timeout {
            if self.start.elapsed().as_secs_f32() > timeout { return Some(Resolution::Timeout); }
        }
        None
    }

    /** searches a k-coloring without conflict, starting from the given coloring.
    Returns the coloring with the fewest conflicts found (conflict-free if the resolution is Solved).
    Fails if the coloring does not have one color in 0..k per vertex.
    */
    pub fn solve(&mut self, coloring:&[Color], k:usize) -> Result<(Coloring, SearchReport)> {
        if coloring.len() != self.inst.nb_vertices() {
            return Err(ColoringError::InvalidColoring(format!(
                "coloring has {} entries, the graph has {} vertices",
                coloring.len(), self.inst.nb_vertices()
            )));
        }
        if let Some(c) = coloring.iter().find(|c| **c >= k) {
            return Err(ColoringError::InvalidColoring(format!("color {} is not in 0..{}", c, k)));
        }
        if self.params.reset_weights {
            self.clear_weights();
        }
        self.update_conflicts(coloring, k);
        let mut current:Coloring = coloring.to_vec();
        let mut score = self.build_score(self.score_conflicts(&current), self.score_guidance(&current));
        let mut best:Coloring = current.clone();
        let mut best_score = score;
        let mut report = SearchReport {
            k, resolution: Resolution::Solved,
            iterations: 0, weight_updates: 0, improvements: 0, aspirations: 0, local_minima: 0,
            start: score, end: score,
        };
        let mut no_improve:usize = 0;
        // decrease of the total score before the first penalty (dynamic λ)
        let mut first_update_total:i64 = 0;
        let mut first_update_iters:i64 = 0;
        loop {
            if best_score.conflicts == 0 {
                report.resolution = Resolution::Solved;
                break;
            }
            if let Some(resolution) = self.stopping_resolution() {
                report.resolution = resolution;
                break;
            }
            self.nb_iter += 1;
            report.iterations += 1;
            let (moves, aspiration) = self.best_neighbours(&current, k, &score, best_score.conflicts);
            let mut penalize = false;
            if moves.is_empty() {
                report.local_minima += 1;
                penalize = true;
            } else {
                if aspiration { report.aspirations += 1; }
                let next = moves[self.rng.usize(0..moves.len())];
                no_improve = if score.total == next.score.total { no_improve + 1 } else { 0 };
                if self.params.dynamic_lambda && self.total_weight == 0 {
                    first_update_iters += 1;
                    first_update_total += score.total - next.score.total;
                }
                self.make_move(&mut current, &next);
                score = next.score;
                if no_improve >= self.params.max_no_improve {
                    penalize = true;
                }
                if score.conflicts < best_score.conflicts {
                    best = current.clone();
                    best_score = score;
                    report.improvements += 1;
                }
            }
            if penalize {
                if self.params.dynamic_lambda && self.total_weight == 0 {
                    self.lambda = match first_update_iters {
                        0 => 10,
                        n => first_update_total / n,
                    };
                    if self.lambda == 0 { self.lambda = 10; }
                }
                self.update_weights(&current);
                score = self.build_score(score.conflicts, self.score_guidance(&current));
                no_improve = 0;
                report.weight_updates += 1;
            }
        }
        report.end = best_score;
        debug!(
            k, resolution = ?report.resolution, iterations = report.iterations,
            conflicts = best_score.conflicts, "guided local search finished"
        );
        Ok((best, report))
    }
}
