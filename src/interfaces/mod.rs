//! File adapters at the edges of the pipeline.

pub mod csv;
