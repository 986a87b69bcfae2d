//! Exact Bayesian inference of gene-copy and trait posteriors over small
//! two-parent pedigrees.
//!
//! Every joint assignment of gene count and trait status is scored under a
//! fixed inheritance model with mutation, and the scores are folded into
//! per-individual marginals.

pub mod error;
pub mod inference;
pub mod loader;
pub mod report;

pub use error::{Error, Result};
pub use inference::{
    infer, infer_with, GeneCount, HeredityModel, Method, Pedigree, PersonRecord, Posterior,
    Posteriors,
};
