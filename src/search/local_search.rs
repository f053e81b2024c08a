//! Epoch-based color reduction over conflict-free colorings.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::builder;
use crate::color::{Color, Coloring, ColoringInstance, VertexId, validate_graph};
use crate::error::{ColoringError, Result};
use crate::search::guided::{GuidedLocalSearch, GuidedParams, Resolution};

/** what to do when the merge of the selected color class fails */
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpochPolicy {
    /// stop the search
    StopOnFirstFailure,
    /// try the other color classes (in the source order) before stopping
    TryAllClasses,
    /// force the merge and repair the conflicts with the guided local search
    GuidedRepair,
    /// restart every epoch from a random coloring with one color less, repaired by the guided
    /// local search (no class merging)
    Scratch,
}

impl Default for EpochPolicy {
    fn default() -> Self { Self::StopOnFirstFailure }
}

impl FromStr for EpochPolicy {
    type Err = ColoringError;

    fn from_str(s:&str) -> Result<Self> {
        match s {
            "stop_on_first_failure" => Ok(Self::StopOnFirstFailure),
            "try_all_classes" => Ok(Self::TryAllClasses),
            "guided_repair" => Ok(Self::GuidedRepair),
            "scratch" => Ok(Self::Scratch),
            _ => Err(ColoringError::UnsupportedStrategy(format!("epoch policy '{}'", s))),
        }
    }
}

/** which color class to select as source (or destination) of a merge */
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeTarget {
    /// class with the fewest vertices
    Minimal,
    /// class with the most vertices
    Maximal,
    /// class with the median number of vertices
    Median,
    /// random class (as a destination: a random color for each vertex)
    Random,
}

impl FromStr for MergeTarget {
    type Err = ColoringError;

    fn from_str(s:&str) -> Result<Self> {
        match s {
            "minimal" => Ok(Self::Minimal),
            "maximal" => Ok(Self::Maximal),
            "median" => Ok(Self::Median),
            "random" => Ok(Self::Random),
            _ => Err(ColoringError::UnsupportedStrategy(format!("merge target '{}'", s))),
        }
    }
}

impl fmt::Display for EpochPolicy {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StopOnFirstFailure => "stop_on_first_failure",
            Self::TryAllClasses => "try_all_classes",
            Self::GuidedRepair => "guided_repair",
            Self::Scratch => "scratch",
        };
        write!(f, "{}", name)
    }
}

/** number of conflicting edges (both endpoints share the same color).
The coloring must have one entry per vertex.
*/
pub fn evaluate(inst:&dyn ColoringInstance, coloring:&[Color]) -> usize {
    debug_assert_eq!(coloring.len(), inst.nb_vertices());
    inst.edges().iter().filter(|(u,v)| coloring[*u] == coloring[*v]).count()
}

/** vertices of each of the first k colors (or of every color, if k exceeds the range) */
pub fn groups(coloring:&[Color], k:usize) -> Vec<Vec<VertexId>> {
    let nb = match get_colors(coloring) {
        None => 0,
        Some(c) => std::cmp::min(k, c+1),
    };
    let mut res = vec![Vec::new() ; nb];
    for (v,c) in coloring.iter().enumerate() {
        if *c < nb { res[*c].push(v); }
    }
    res
}

/** highest color used (None for an empty coloring) */
pub fn get_colors(coloring:&[Color]) -> Option<Color> {
    coloring.iter().max().cloned()
}

/** number of distinct colors used */
pub fn nb_colors(coloring:&[Color]) -> usize {
    let used:BitSet = coloring.iter().cloned().collect();
    used.len()
}

/** relabels the colors to 0..K, keeping their relative order */
pub fn normalize(coloring:&mut [Color]) {
    let used:BitSet = coloring.iter().cloned().collect();
    let mut relabel = vec![0 ; used.iter().last().map_or(0, |c| c+1)];
    for (i,c) in used.iter().enumerate() {
        relabel[c] = i;
    }
    coloring.iter_mut().for_each(|c| *c = relabel[*c]);
}

/** removes color k: colors above k are shifted down */
fn remove_color(coloring:&mut [Color], k:Color) {
    coloring.iter_mut().filter(|c| **c > k).for_each(|c| *c -= 1);
}

/** color classes ordered by preference for the target */
fn class_order(classes:&[Vec<VertexId>], target:MergeTarget, rng:&Rng) -> Vec<Color> {
    let mut res:Vec<Color> = (0..classes.len()).collect();
    match target {
        MergeTarget::Minimal => res.sort_by_key(|c| (classes[*c].len(), *c)),
        MergeTarget::Maximal => res.sort_by_key(|c| (Reverse(classes[*c].len()), *c)),
        MergeTarget::Median => {
            res.sort_by_key(|c| (classes[*c].len(), *c));
            let median = res.remove(res.len()/2);
            res.insert(0, median);
        },
        MergeTarget::Random => rng.shuffle(&mut res),
    }
    res
}

/** merges the color class k into the other classes, preferring the largest classes
(ties broken by the lowest color). See [`filter_with`].
*/
pub fn filter(inst:&dyn ColoringInstance, coloring:&[Color], k:Color) -> Coloring {
    filter_with(inst, coloring, k, MergeTarget::Maximal, &Rng::with_seed(0))
}

/** merges the color class k into the other classes.
Every vertex of color k moves to an existing color that none of its neighbors uses.
Candidate colors are tried in the `destination` order; with `MergeTarget::Random`, each vertex
draws its own order. If one vertex cannot move, the merge is infeasible and the input coloring
is returned unchanged. On success, colors above k are shifted down.
The coloring must have one entry per vertex.
*/
pub fn filter_with(
    inst:&dyn ColoringInstance, coloring:&[Color], k:Color, destination:MergeTarget, rng:&Rng
) -> Coloring {
    debug_assert_eq!(coloring.len(), inst.nb_vertices());
    let classes = groups(coloring, usize::MAX);
    if k >= classes.len() {
        return coloring.to_vec();
    }
    let mut destinations:Vec<Color> = class_order(&classes, destination, rng).into_iter()
        .filter(|c| *c != k && !classes[*c].is_empty())
        .collect();
    let mut res = coloring.to_vec();
    for v in &classes[k] {
        if destination == MergeTarget::Random {
            rng.shuffle(&mut destinations);
        }
        let target = destinations.iter().find(|c| {
            inst.neighbors(*v).iter().all(|u| res[*u] != **c)
        });
        match target {
            Some(c) => res[*v] = *c,
            None => return coloring.to_vec(), // infeasible: nothing is committed
        }
    }
    remove_color(&mut res, k);
    res
}

/** why the color reduction stopped */
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// no merge could be performed in the last epoch
    MergeFailed,
    /// a single color remains
    SingleColor,
    /// the epoch limit was reached
    EpochLimit,
    /// the number of colors reached the given lower bound
    LowerBound,
}

/** statistics of a color reduction */
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// number of colors of the input coloring
    pub initial_colors: usize,
    /// number of colors of the output coloring
    pub final_colors: usize,
    /// epochs performed
    pub epochs: usize,
    /// merges accepted without repair
    pub merges: usize,
    /// merges accepted after a guided repair
    pub repairs: usize,
    /// stopping reason
    pub stop: StopReason,
}

/** Iterative color reduction (hill-climbing on the number of colors).
Each epoch selects a source color class (by default the smallest one, ties broken by
the lowest color) and tries to redistribute its vertices to the other classes.
A merge is accepted only if the resulting coloring uses one color less and has no conflict.
*/
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchColorer {
    /// behavior after a failed merge
    pub policy: EpochPolicy,
    /// source class selection
    pub source: MergeTarget,
    /// destination class of the forced merges (guided repair)
    pub destination: MergeTarget,
    /// maximum number of epochs
    pub max_epochs: Option<usize>,
    /// known lower bound on the chromatic number (stops the search once reached)
    pub lower_bound: Option<usize>,
    /// parameters of the guided repair
    pub guided: GuidedParams,
}

impl Default for LocalSearchColorer {
    fn default() -> Self {
        Self {
            policy: EpochPolicy::StopOnFirstFailure,
            source: MergeTarget::Minimal,
            destination: MergeTarget::Maximal,
            max_epochs: None,
            lower_bound: None,
            guided: GuidedParams::default(),
        }
    }
}

impl LocalSearchColorer {

    /** creates a colorer with a given epoch policy (other parameters by default) */
    pub fn new(policy:EpochPolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /** merges src into the destination class, then repairs the conflicts with k-1 colors.
    Returns the repaired coloring if it has no conflict.
    */
    fn guided_merge(
        &self, gls:&mut GuidedLocalSearch, coloring:&[Color], classes:&[Vec<VertexId>],
        src:Color, rng:&Rng
    ) -> Result<Option<Coloring>> {
        let k = classes.len();
        let others:Vec<Vec<VertexId>> = classes.iter().enumerate()
            .map(|(c,vertices)| if c == src { Vec::new() } else { vertices.clone() })
            .collect();
        let dest = class_order(&others, self.destination, rng).into_iter()
            .find(|c| *c != src)
            .ok_or_else(|| ColoringError::InvalidColoring("no destination class".to_string()))?;
        let mut forced:Coloring = coloring.iter().map(|c| if *c == src { dest } else { *c }).collect();
        remove_color(&mut forced, src);
        let (mut repaired, report) = gls.solve(&forced, k-1)?;
        if report.resolution == Resolution::Solved {
            normalize(&mut repaired);
            Ok(Some(repaired))
        } else {
            Ok(None)
        }
    }

    /** builds a random coloring with k-1 colors and repairs it.
    Returns the repaired coloring if it has no conflict.
    */
    fn scratch_restart(
        &self, gls:&mut GuidedLocalSearch, inst:&dyn ColoringInstance, k:usize, rng:&mut Rng
    ) -> Result<Option<Coloring>> {
        let start = builder::random(inst, k-1, rng);
        let (mut repaired, report) = gls.solve(&start, k-1)?;
        if report.resolution == Resolution::Solved {
            normalize(&mut repaired);
            Ok(Some(repaired))
        } else {
            Ok(None)
        }
    }

    /** reduces the number of colors of a conflict-free coloring (modified in place).
    Fails if the coloring size differs from the number of vertices or if it has conflicts.
    */
    pub fn solve(&self, inst:&dyn ColoringInstance, coloring:&mut Coloring) -> Result<SolveReport> {
        if coloring.len() != inst.nb_vertices() {
            return Err(ColoringError::InvalidColoring(format!(
                "coloring has {} entries, the graph has {} vertices",
                coloring.len(), inst.nb_vertices()
            )));
        }
        if inst.nb_vertices() > 0 {
            validate_graph(inst)?;
        }
        let initial_conflicts = evaluate(inst, coloring);
        if initial_conflicts > 0 {
            return Err(ColoringError::InvalidColoring(
                format!("the initial coloring has {} conflicts", initial_conflicts)
            ));
        }
        normalize(coloring);
        let mut rng = Rng::with_seed(self.guided.seed);
        let mut gls = match self.policy {
            EpochPolicy::GuidedRepair | EpochPolicy::Scratch => Some(GuidedLocalSearch::new(inst, self.guided.clone())),
            _ => None,
        };
        let mut report = SolveReport {
            initial_colors: nb_colors(coloring), final_colors: 0,
            epochs: 0, merges: 0, repairs: 0, stop: StopReason::SingleColor,
        };
        info!(policy = %self.policy, nb_colors = report.initial_colors, "color reduction started");
        loop {
            let k = get_colors(coloring).map_or(0, |c| c+1);
            if k <= 1 {
                report.stop = StopReason::SingleColor;
                break;
            }
            if self.lower_bound.map_or(false, |lb| k <= lb) {
                report.stop = StopReason::LowerBound;
                break;
            }
            if self.max_epochs.map_or(false, |m| report.epochs >= m) {
                report.stop = StopReason::EpochLimit;
                break;
            }
            report.epochs += 1;
            let classes = groups(coloring, k);
            let order = class_order(&classes, self.source, &rng);
            let candidates = match self.policy {
                EpochPolicy::TryAllClasses => &order[..],
                EpochPolicy::Scratch => &order[..0],
                _ => &order[..1],
            };
            let mut merged:Option<Coloring> = None;
            for src in candidates {
                let res = filter_with(inst, coloring, *src, self.destination, &rng);
                if nb_colors(&res) < k && evaluate(inst, &res) == 0 {
                    merged = Some(res);
                    report.merges += 1;
                    break;
                }
            }
            if merged.is_none() {
                if let Some(gls) = gls.as_mut() {
                    merged = match self.policy {
                        EpochPolicy::Scratch => self.scratch_restart(gls, inst, k, &mut rng)?,
                        _ => self.guided_merge(gls, coloring, &classes, order[0], &rng)?,
                    };
                    if merged.is_some() { report.repairs += 1; }
                }
            }
            match merged {
                Some(res) => {
                    *coloring = res;
                    debug!(epoch = report.epochs, nb_colors = k-1, "color class removed");
                },
                None => {
                    debug!(epoch = report.epochs, nb_colors = k, "no color class can be removed");
                    report.stop = StopReason::MergeFailed;
                    break;
                }
            }
        }
        report.final_colors = nb_colors(coloring);
        info!(
            nb_colors = report.final_colors, epochs = report.epochs, stop = ?report.stop,
            "color reduction finished"
        );
        Ok(report)
    }
}
