/// guided local search repairing a k-coloring
pub mod guided;

/// color class merging (color reduction epochs)
pub mod local_search;
