//! Reply generation: provider call, response normalization, failure mapping.

pub mod extract;
pub mod generator;
