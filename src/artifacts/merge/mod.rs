pub mod lca_finder;
pub mod outcome;
pub mod resolution;
