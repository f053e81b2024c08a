//! Guided local search color reduction for the Graph Coloring problem

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// errors raised while reading, validating or coloring a graph
pub mod error;

/// coloring instance base trait, solutions and checker
pub mod color;

/// read DIMACS formats
pub mod dimacs;

/// compact instance (adjacency lists and edge list)
pub mod compact_instance;

/// upper bounds on the chromatic number
pub mod upper_bound;

/// initial colorings
pub mod builder;

/// color reduction and conflict repair
pub mod search;

/// run configuration
pub mod config;

/// full coloring run (bound, initial coloring, repair, reduction)
pub mod pipeline;

/// helper and utility methods for executables
pub mod util;

#[cfg(test)]
mod testing;
