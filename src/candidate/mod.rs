//! Candidate selection.
//!
//! Includes bounded Top-K collection and the final conversion of peaks into
//! original-resolution matches.

pub(crate) mod select;
pub(crate) mod topk;
