use bit_set::BitSet;

use crate::error::{ColoringError, Result};

/** Vertex Id */
pub type VertexId = usize;

/** Color Id */
pub type Color = usize;

/** Coloring of a graph: coloring[v] is the color of vertex v */
pub type Coloring = Vec<Color>;

/** Solution of a graph coloring problem
(represented as a partition: one vertex list per color).
*/
pub type Solution = Vec<Vec<VertexId>>;

/** read-only view of a graph, as needed by the bounds and the local search */
pub trait ColoringInstance: std::fmt::Debug {
    /// number of vertices
    fn nb_vertices(&self) -> usize;

    /// number of edges
    fn nb_edges(&self) -> usize;

    /// vertices adjacent to u
    fn neighbors(&self, u:VertexId) -> &[VertexId];

    /// degree of vertex u
    fn degree(&self, u:VertexId) -> usize { self.neighbors(u).len() }

    /// true iff u and v are adjacent
    fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool {
        self.neighbors(u).iter().any(|w| *w == v)
    }

    /// edge list (each edge (u,v) appears once with u < v)
    fn edges(&self) -> &[(VertexId, VertexId)];

    /// iterator over the vertices
    fn vertices(&self) -> std::ops::Range<VertexId> { 0..self.nb_vertices() }

    /// maximum degree Δ(G) (0 for an empty graph)
    fn max_degree(&self) -> usize {
        self.vertices().map(|u| self.degree(u)).max().unwrap_or(0)
    }
}

/** checks that the adjacency of an instance is a simple undirected graph:
no neighbor out of range, no self-loop, no duplicated neighbor and a symmetric adjacency.
*/
pub fn validate_graph(inst:&dyn ColoringInstance) -> Result<()> {
    let n = inst.nb_vertices();
    if n == 0 {
        return Err(ColoringError::InvalidGraph("the graph has no vertex".to_string()));
    }
    for u in inst.vertices() {
        let mut seen = BitSet::with_capacity(n);
        for v in inst.neighbors(u) {
            if *v >= n {
                return Err(ColoringError::InvalidGraph(
                    format!("vertex {} has neighbor {} out of range (n={})", u, v, n)
                ));
            }
            if *v == u {
                return Err(ColoringError::InvalidGraph(format!("self-loop on vertex {}", u)));
            }
            if !seen.insert(*v) {
                return Err(ColoringError::InvalidGraph(
                    format!("edge ({},{}) listed twice", u, v)
                ));
            }
            if !inst.neighbors(*v).contains(&u) {
                return Err(ColoringError::InvalidGraph(
                    format!("edge ({},{}) is not symmetric", u, v)
                ));
            }
        }
    }
    Ok(())
}

/** result of the solution checker */
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CheckerResult {
    /// feasible coloring that uses the given number of colors
    Ok(usize),
    /// the coloring does not have one entry per vertex (expected, found)
    WrongSize(usize, usize),
    /// both endpoints of the edge share the same color
    ConflictingEdge(VertexId, VertexId),
}

/** checks a coloring against an instance.
Returns the number of distinct colors if it is feasible.
*/
pub fn checker(inst:&dyn ColoringInstance, coloring:&[Color]) -> CheckerResult {
    if coloring.len() != inst.nb_vertices() {
        return CheckerResult::WrongSize(inst.nb_vertices(), coloring.len());
    }
    for (u,v) in inst.edges() {
        if coloring[*u] == coloring[*v] {
            return CheckerResult::ConflictingEdge(*u, *v);
        }
    }
    let used:BitSet = coloring.iter().cloned().collect();
    CheckerResult::Ok(used.len())
}

/** transforms a coloring into a partition (empty color classes are dropped) */
pub fn coloring_to_solution(coloring:&[Color]) -> Solution {
    let k = match coloring.iter().max() {
        None => return Vec::new(),
        Some(c) => c+1,
    };
    let mut res:Solution = vec![vec![] ; k];
    for (v,c) in coloring.iter().enumerate() {
        res[*c].push(v);
    }
    res.into_iter().filter(|e| !e.is_empty()).collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::compact_instance::CompactInstance;

    fn square() -> CompactInstance {
        CompactInstance::from_edges(4, &[(0,1),(1,2),(2,3),(3,0)]).unwrap()
    }

    #[test]
    fn test_checker_ok() {
        let inst = square();
        assert_eq!(checker(&inst, &[0,1,0,1]), CheckerResult::Ok(2));
        assert_eq!(checker(&inst, &[0,1,2,3]), CheckerResult::Ok(4));
    }

    #[test]
    fn test_checker_errors() {
        let inst = square();
        assert_eq!(checker(&inst, &[0,1,0]), CheckerResult::WrongSize(4,3));
        assert_eq!(checker(&inst, &[0,0,1,2]), CheckerResult::ConflictingEdge(0,1));
    }

    #[test]
    fn test_partition_conversions() {
        let coloring = vec![2,0,2,0];
        let sol = coloring_to_solution(&coloring);
        assert_eq!(sol, vec![vec![1,3], vec![0,2]]);
        assert!(coloring_to_solution(&[]).is_empty());
    }

    #[test]
    fn test_validate_graph() {
        assert!(validate_graph(&square()).is_ok());
        let empty = CompactInstance::new_unchecked(vec![]);
        assert!(matches!(validate_graph(&empty), Err(ColoringError::InvalidGraph(_))));
        let asymmetric = CompactInstance::new_unchecked(vec![vec![1], vec![]]);
        assert!(matches!(validate_graph(&asymmetric), Err(ColoringError::InvalidGraph(_))));
        let self_loop = CompactInstance::new_unchecked(vec![vec![0]]);
        assert!(matches!(validate_graph(&self_loop), Err(ColoringError::InvalidGraph(_))));
    }
}
