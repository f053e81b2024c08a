//! Graph families and reference algorithms shared by the unit tests.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::color::{Color, ColoringInstance, VertexId};
use crate::compact_instance::CompactInstance;

/// complete graph K_n
pub fn complete(n:usize) -> CompactInstance {
    let mut edges = Vec::new();
    for u in 0..n {
        for v in u+1..n {
            edges.push((u,v));
        }
    }
    CompactInstance::from_edges(n, &edges).unwrap()
}

/// cycle C_n (n >= 3)
pub fn cycle(n:usize) -> CompactInstance {
    let edges:Vec<(VertexId,VertexId)> = (0..n).map(|u| (u, (u+1)%n)).collect();
    CompactInstance::from_edges(n, &edges).unwrap()
}

/// path P_n
pub fn path(n:usize) -> CompactInstance {
    let edges:Vec<(VertexId,VertexId)> = (1..n).map(|u| (u-1, u)).collect();
    CompactInstance::from_edges(n, &edges).unwrap()
}

/// star with one center (vertex 0) and `leaves` leaves
pub fn star(leaves:usize) -> CompactInstance {
    let edges:Vec<(VertexId,VertexId)> = (1..=leaves).map(|u| (0, u)).collect();
    CompactInstance::from_edges(leaves+1, &edges).unwrap()
}

/// wheel: a cycle on vertices 1..=rim plus a hub (vertex 0)
pub fn wheel(rim:usize) -> CompactInstance {
    let mut edges:Vec<(VertexId,VertexId)> = (0..rim).map(|i| (1+i, 1+(i+1)%rim)).collect();
    edges.extend((1..=rim).map(|u| (0,u)));
    CompactInstance::from_edges(rim+1, &edges).unwrap()
}

/// complete bipartite graph K_{a,b}
pub fn complete_bipartite(a:usize, b:usize) -> CompactInstance {
    let mut edges = Vec::new();
    for u in 0..a {
        for v in a..a+b {
            edges.push((u,v));
        }
    }
    CompactInstance::from_edges(a+b, &edges).unwrap()
}

/// Petersen graph (3-regular, chromatic number 3)
pub fn petersen() -> CompactInstance {
    let mut edges = Vec::new();
    for i in 0..5 {
        edges.push((i, (i+1)%5)); // outer cycle
        edges.push((i, i+5)); // spokes
        edges.push((5+i, 5+(i+2)%5)); // inner pentagram
    }
    CompactInstance::from_edges(10, &edges).unwrap()
}

/// disjoint union of two graphs (vertices of b are shifted by a.nb_vertices())
pub fn disjoint_union(a:&CompactInstance, b:&CompactInstance) -> CompactInstance {
    let shift = a.nb_vertices();
    let mut edges:Vec<(VertexId,VertexId)> = a.edges().to_vec();
    edges.extend(b.edges().iter().map(|(u,v)| (u+shift, v+shift)));
    CompactInstance::from_edges(shift + b.nb_vertices(), &edges).unwrap()
}

/// G(n,p) random graph with a fixed seed
pub fn random_graph(n:usize, p:f64, seed:u64) -> CompactInstance {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..n {
        for v in u+1..n {
            if rng.gen_bool(p) {
                edges.push((u,v));
            }
        }
    }
    CompactInstance::from_edges(n, &edges).unwrap()
}

/** exact chromatic number by backtracking (only for small graphs) */
pub fn brute_force_chromatic(inst:&dyn ColoringInstance) -> usize {
    let n = inst.nb_vertices();
    if n == 0 { return 0; }
    (1..=n).find(|k| {
        let mut colors:Vec<Option<Color>> = vec![None ; n];
        try_color(inst, 0, *k, &mut colors)
    }).unwrap_or(n)
}

fn try_color(inst:&dyn ColoringInstance, v:VertexId, k:usize, colors:&mut Vec<Option<Color>>) -> bool {
    if v == colors.len() { return true; }
    // symmetry breaking: a vertex never opens more than one new color
    let max_used = colors[..v].iter().filter_map(|c| *c).max().map_or(0, |c| c+1);
    for c in 0..std::cmp::min(k, max_used+1) {
        if inst.neighbors(v).iter().all(|u| colors[*u] != Some(c)) {
            colors[v] = Some(c);
            if try_color(inst, v+1, k, colors) { return true; }
            colors[v] = None;
        }
    }
    false
}
