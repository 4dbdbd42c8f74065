//! Test modules for the pipeline coordinator
//!
//! Unit-level behaviour lives next to each type; these cover whole-pipeline runs.
