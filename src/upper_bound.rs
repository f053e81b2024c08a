//! Upper bounds on the chromatic number.
//!
//! Every strategy returns a value that is at least the chromatic number of the graph.
//! The theorem-based bounds follow <http://www.sciencedirect.com/science/article/pii/S0166218X11003039>.

use std::cmp::{max, Reverse};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{ColoringInstance, VertexId, validate_graph};
use crate::error::{ColoringError, Result};

/** method used to estimate the upper bound */
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundStrategy {
    /// Δ(G)+1, the bound reached by any greedy coloring
    DegreeGreedy,
    /// Brooks' theorem, applied on each connected component
    #[serde(alias = "simple")]
    Brooks,
    /// Welsh-Powell bound on the sorted degrees
    Theorem2,
    /// bound on the sorted neighbor degrees (ρ values)
    Theorem3,
}

impl FromStr for BoundStrategy {
    type Err = ColoringError;

    fn from_str(s:&str) -> Result<Self> {
        match s {
            "degree_greedy" => Ok(Self::DegreeGreedy),
            "brooks" | "simple" => Ok(Self::Brooks),
            "theorem2" => Ok(Self::Theorem2),
            "theorem3" => Ok(Self::Theorem3),
            _ => Err(ColoringError::UnsupportedStrategy(format!("upper bound '{}'", s))),
        }
    }
}

impl fmt::Display for BoundStrategy {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DegreeGreedy => "degree_greedy",
            Self::Brooks => "brooks",
            Self::Theorem2 => "theorem2",
            Self::Theorem3 => "theorem3",
        };
        write!(f, "{}", name)
    }
}

/** degree table: (vertex, degree) for every vertex, in vertex order */
pub fn get_degrees(inst:&dyn ColoringInstance) -> Vec<(VertexId, usize)> {
    inst.vertices().map(|v| (v, inst.degree(v))).collect()
}

/// sorts a table of (vertex, value) by decreasing value (stable)
fn sort_decreasing(table:&mut [(VertexId, usize)]) {
    table.sort_by_key(|(_,d)| Reverse(*d));
}

/** largest k such that the k-th value (sorted decreasingly) is at least k-1.
Returns at least 1.
*/
fn largest_admissible_rank(sorted:&[(VertexId, usize)]) -> usize {
    let mut res = 0;
    for (_,d) in sorted {
        if *d >= res { res += 1; } else { break; }
    }
    max(res, 1)
}

/** Δ(G)+1: a greedy coloring never needs more colors than that */
pub fn degree_greedy(inst:&dyn ColoringInstance) -> Result<usize> {
    validate_graph(inst)?;
    let mut degrees = get_degrees(inst);
    sort_decreasing(&mut degrees);
    Ok(degrees[0].1 + 1)
}

/** connected components of the graph (each component lists its vertices in BFS order) */
pub fn connected_components(inst:&dyn ColoringInstance) -> Vec<Vec<VertexId>> {
    let n = inst.nb_vertices();
    let mut visited = BitSet::with_capacity(n);
    let mut res = Vec::new();
    for s in inst.vertices() {
        if visited.contains(s) { continue; }
        visited.insert(s);
        let mut component = vec![];
        let mut queue = VecDeque::from(vec![s]);
        while let Some(u) = queue.pop_front() {
            component.push(u);
            for v in inst.neighbors(u) {
                if visited.insert(*v) {
                    queue.push_back(*v);
                }
            }
        }
        res.push(component);
    }
    res
}

/** Brooks' theorem on one connected component:
Δ+1 for complete graphs and odd cycles, Δ otherwise.
*/
fn brooks_component(inst:&dyn ColoringInstance, component:&[VertexId]) -> usize {
    let n = component.len();
    let degree_sum:usize = component.iter().map(|v| inst.degree(*v)).sum();
    let max_degree = component.iter().map(|v| inst.degree(*v)).max().unwrap_or(0);
    let is_complete = degree_sum / 2 == n * (n-1) / 2;
    let is_odd_cycle = n % 2 == 1 && component.iter().all(|v| inst.degree(*v) == 2);
    if is_complete || is_odd_cycle { max_degree + 1 } else { max_degree }
}

/** Brooks' theorem.
The bound is computed on every connected component, the maximum is returned.
*/
pub fn simple(inst:&dyn ColoringInstance) -> Result<usize> {
    validate_graph(inst)?;
    Ok(connected_components(inst).iter()
        .map(|c| brooks_component(inst, c))
        .max()
        .unwrap_or(1))
}

/** Theorem 2: sort the degrees d1 ≥ d2 ≥ ... and return the largest k such that dk ≥ k-1 */
pub fn theorem2(inst:&dyn ColoringInstance) -> Result<usize> {
    validate_graph(inst)?;
    let mut degrees = get_degrees(inst);
    sort_decreasing(&mut degrees);
    Ok(largest_admissible_rank(&degrees))
}

/** ρ(v): largest r such that the r-th neighbor of v (by decreasing degree) has degree ≥ r */
fn rho(inst:&dyn ColoringInstance, v:VertexId) -> usize {
    let mut neigh_degrees:Vec<usize> = inst.neighbors(v).iter().map(|u| inst.degree(*u)).collect();
    neigh_degrees.sort_unstable_by_key(|d| Reverse(*d));
    let mut res = 0;
    for d in neigh_degrees {
        if d > res { res += 1; } else { break; }
    }
    res
}

/** Theorem 3: same as theorem 2, using the ρ values instead of the degrees.
Every vertex of a k-critical subgraph has k-1 neighbors of degree ≥ k-1, thus ρ ≥ k-1
on at least k vertices.
*/
pub fn theorem3(inst:&dyn ColoringInstance) -> Result<usize> {
    validate_graph(inst)?;
    let mut rhos:Vec<(VertexId, usize)> = inst.vertices().map(|v| (v, rho(inst, v))).collect();
    sort_decreasing(&mut rhos);
    Ok(largest_admissible_rank(&rhos))
}

/** computes the upper bound using the given strategy */
pub fn calculate(inst:&dyn ColoringInstance, strategy:BoundStrategy) -> Result<usize> {
    let res = match strategy {
        BoundStrategy::DegreeGreedy => degree_greedy(inst),
        BoundStrategy::Brooks => simple(inst),
        BoundStrategy::Theorem2 => theorem2(inst),
        BoundStrategy::Theorem3 => theorem3(inst),
    }?;
    debug!(%strategy, bound = res, "upper bound computed");
    Ok(res)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact_instance::CompactInstance;
    use crate::testing::*;

    use proptest::prelude::*;

    const STRATEGIES:[BoundStrategy ; 4] = [
        BoundStrategy::DegreeGreedy, BoundStrategy::Brooks,
        BoundStrategy::Theorem2, BoundStrategy::Theorem3,
    ];

    fn families() -> Vec<CompactInstance> {
        vec![
            complete(1), complete(2), complete(5), cycle(4), cycle(5), cycle(7),
            path(6), star(5), wheel(5), wheel(6), complete_bipartite(3,4), petersen(),
            disjoint_union(&cycle(5), &complete(4)),
            disjoint_union(&path(3), &star(3)),
            CompactInstance::from_edges(6, &[]).unwrap(),
        ]
    }

    #[test]
    fn test_get_degrees() {
        let inst = star(3);
        assert_eq!(get_degrees(&inst), vec![(0,3),(1,1),(2,1),(3,1)]);
    }

    #[test]
    fn test_brooks_complete() {
        for n in 1..7 {
            assert_eq!(simple(&complete(n)).unwrap(), n);
        }
    }

    #[test]
    fn test_brooks_odd_cycle() {
        for n in [3,5,7,9] {
            assert_eq!(simple(&cycle(n)).unwrap(), 3);
        }
    }

    #[test]
    fn test_brooks_other_connected() {
        assert_eq!(simple(&cycle(6)).unwrap(), 2);
        assert_eq!(simple(&path(5)).unwrap(), 2);
        assert_eq!(simple(&petersen()).unwrap(), 3);
        assert_eq!(simple(&wheel(5)).unwrap(), 5);
        assert_eq!(simple(&star(4)).unwrap(), 4);
        assert_eq!(simple(&complete_bipartite(2,3)).unwrap(), 3);
    }

    #[test]
    fn test_brooks_disconnected() {
        // K4 ∪ C5: max(4, 3)
        assert_eq!(simple(&disjoint_union(&complete(4), &cycle(5))).unwrap(), 4);
        // C5 ∪ P6: max(3, 2)
        assert_eq!(simple(&disjoint_union(&cycle(5), &path(6))).unwrap(), 3);
        assert_eq!(simple(&CompactInstance::from_edges(3, &[]).unwrap()).unwrap(), 1);
    }

    #[test]
    fn test_degree_greedy() {
        assert_eq!(degree_greedy(&star(4)).unwrap(), 5);
        assert_eq!(degree_greedy(&cycle(4)).unwrap(), 3);
    }

    #[test]
    fn test_theorem2() {
        // star: degrees 4,1,1,1,1 -> k=2
        assert_eq!(theorem2(&star(4)).unwrap(), 2);
        assert_eq!(theorem2(&complete(4)).unwrap(), 4);
        assert_eq!(theorem2(&CompactInstance::from_edges(2, &[]).unwrap()).unwrap(), 1);
    }

    #[test]
    fn test_theorem3() {
        assert_eq!(theorem3(&complete(5)).unwrap(), 5);
        assert_eq!(theorem3(&cycle(5)).unwrap(), 3);
        assert_eq!(theorem3(&star(3)).unwrap(), 2);
        // the hub of a wheel has a high degree, theorem 3 ignores it for the rim
        assert!(theorem3(&wheel(8)).unwrap() <= theorem2(&wheel(8)).unwrap());
    }

    #[test]
    fn test_empty_graph_is_invalid() {
        let inst = CompactInstance::new(vec![]).unwrap();
        for s in STRATEGIES {
            assert!(matches!(calculate(&inst, s), Err(ColoringError::InvalidGraph(_))));
        }
    }

    #[test]
    fn test_malformed_graph_is_invalid() {
        let inst = CompactInstance::new_unchecked(vec![vec![1], vec![]]);
        assert!(matches!(calculate(&inst, BoundStrategy::Brooks), Err(ColoringError::InvalidGraph(_))));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("brooks".parse::<BoundStrategy>().unwrap(), BoundStrategy::Brooks);
        assert_eq!("simple".parse::<BoundStrategy>().unwrap(), BoundStrategy::Brooks);
        assert_eq!("theorem3".parse::<BoundStrategy>().unwrap(), BoundStrategy::Theorem3);
        for s in STRATEGIES {
            assert_eq!(s.to_string().parse::<BoundStrategy>().unwrap(), s);
        }
        assert!(matches!(
            "theorem4".parse::<BoundStrategy>(),
            Err(ColoringError::UnsupportedStrategy(_))
        ));
    }

    #[test]
    fn test_soundness_families() {
        for inst in families() {
            let chi = brute_force_chromatic(&inst);
            for s in STRATEGIES {
                let bound = calculate(&inst, s).unwrap();
                assert!(bound >= chi, "{} gives {} < χ={} on {:?}", s, bound, chi, inst.edges());
            }
        }
    }

    proptest! {
        #[test]
        fn prop_bounds_are_sound(n in 1usize..10, p in 0.0f64..1.0, seed in any::<u64>()) {
            let inst = random_graph(n, p, seed);
            let chi = brute_force_chromatic(&inst);
            for s in STRATEGIES {
                prop_assert!(calculate(&inst, s).unwrap() >= chi);
            }
        }

        #[test]
        fn prop_brooks_is_tightest_degree_bound(n in 1usize..10, p in 0.0f64..1.0, seed in any::<u64>()) {
            let inst = random_graph(n, p, seed);
            prop_assert!(simple(&inst).unwrap() <= degree_greedy(&inst).unwrap());
            prop_assert!(theorem2(&inst).unwrap() <= degree_greedy(&inst).unwrap());
        }
    }
}
