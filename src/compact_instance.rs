use bit_set::BitSet;
use tracing::info;

use crate::dimacs::read_from_file;
use crate::color::{ColoringInstance, VertexId, validate_graph};
use crate::error::Result;

/** models a Graph Coloring instance.  */
#[derive(Debug, Clone)]
pub struct CompactInstance {
    /// nb vertices
    n: usize,
    /// nb edges
    m: usize,
    /// edges of the graph
    edges: Vec<(VertexId,VertexId)>,
    /// adj_list[i]: list of vertices adjacent to i
    adj_list: Vec<Vec<VertexId>>,
    /// if exists: adj_matrix[i] represents a bitset of its neighbors
    adj_matrix: Option<Vec<BitSet>>,
}

impl ColoringInstance for CompactInstance {
    fn nb_vertices(&self) -> usize { self.n }

    fn nb_edges(&self) -> usize { self.m }

    fn neighbors(&self, u:VertexId) -> &[VertexId] { &self.adj_list[u] }

    fn degree(&self, u:VertexId) -> usize { self.adj_list[u].len() }

    fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool {
        match &self.adj_matrix { // if the matrix representation does not exist, iterate over
            None => { self.adj_list[u].iter().any(|c| &v==c) },
            Some(matrix) => { matrix[u].contains(v) } // otherwise, use it
        }
    }

    fn edges(&self) -> &[(VertexId, VertexId)] { &self.edges }
}


impl CompactInstance {

    /// builds the edge list
    fn build_edges(adj_list:&[Vec<VertexId>]) -> Vec<(VertexId,VertexId)> {
        let mut res = Vec::new();
        for (i,l) in adj_list.iter().enumerate() {
            for j in l {
                if i < *j {
                    res.push((i,*j));
                }
            }
        }
        res
    }

    /** constructor using an adjacency list, without checking it.
    The bounds and the local search validate the graph before using it.
    */
    pub fn new_unchecked(adj_list:Vec<Vec<usize>>) -> Self {
        let n = adj_list.len();
        let edges = Self::build_edges(&adj_list);
        let m = edges.len();
        Self { n,m, edges, adj_list, adj_matrix:None }
    }

    /** constructor using an adjacency list.
    Fails if the adjacency is not a simple undirected graph. The empty graph is accepted.
    */
    pub fn new(adj_list:Vec<Vec<usize>>) -> Result<Self> {
        let res = Self::new_unchecked(adj_list);
        if res.n > 0 {
            validate_graph(&res)?;
        }
        Ok(res)
    }

    /** constructor using an edge list over n vertices.
    Edges listed twice (in any direction) are kept once.
    */
    pub fn from_edges(n:usize, edges:&[(VertexId,VertexId)]) -> Result<Self> {
        let mut adj_list = vec![Vec::new() ; n];
        for (a,b) in edges {
            if *a >= n || *b >= n {
                return Err(crate::error::ColoringError::InvalidGraph(
                    format!("edge ({},{}) out of range (n={})", a, b, n)
                ));
            }
            adj_list[*a].push(*b);
            adj_list[*b].push(*a);
        }
        for l in adj_list.iter_mut() {
            l.sort_unstable();
            l.dedup();
        }
        Self::new(adj_list)
    }

    /// creates an instance from a DIMACS file
    pub fn from_file(filename:&str) -> Result<Self> {
        let (n,_,edges) = read_from_file(filename)?;
        Self::from_edges(n, &edges)
    }

    /// if called, populate the adj_matrix
    pub fn populate_adj_matrix(&mut self) {
        let mut res = vec![BitSet::default(); self.n];
        for (a,resa) in res.iter_mut().enumerate() {
            for b in &self.adj_list[a] {
                resa.insert(*b);
            }
        }
        self.adj_matrix = Some(res);
    }

    /// logs statistics of the instance
    pub fn display_statistics(&self) {
        let min_degree = self.vertices().map(|u| self.degree(u)).min().unwrap_or(0);
        info!(
            vertices = self.n,
            edges = self.m,
            min_degree,
            max_degree = self.max_degree(),
            adj_matrix = self.adj_matrix.is_some(),
            "instance statistics"
        );
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColoringError;

    #[test]
    fn test_from_edges() {
        let inst = CompactInstance::from_edges(4, &[(0,1),(1,2),(2,3),(3,0),(1,0)]).unwrap();
        assert_eq!(inst.nb_vertices(), 4);
        assert_eq!(inst.nb_edges(), 4);
        assert_eq!(inst.neighbors(0), &[1,3]);
        assert_eq!(inst.edges(), &[(0,1),(0,3),(1,2),(2,3)]);
    }

    #[test]
    fn test_adjacency_matrix() {
        let mut inst = CompactInstance::from_edges(3, &[(0,1),(1,2)]).unwrap();
        assert!(!inst.are_adjacent(0,2));
        inst.populate_adj_matrix();
        assert!(inst.are_adjacent(0,1));
        assert!(inst.are_adjacent(2,1));
        assert!(!inst.are_adjacent(0,2));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            CompactInstance::from_edges(2, &[(0,2)]),
            Err(ColoringError::InvalidGraph(_))
        ));
        assert!(matches!(
            CompactInstance::from_edges(2, &[(1,1)]),
            Err(ColoringError::InvalidGraph(_))
        ));
        assert!(matches!(
            CompactInstance::new(vec![vec![1], vec![]]),
            Err(ColoringError::InvalidGraph(_))
        ));
        assert!(CompactInstance::new(vec![]).is_ok());
    }
}
