// Depth-first engine drops any branch whose running product is exactly zero

use tracing::{debug, info};

use crate::error::Result;
use crate::inference::enumerate::{for_each_assignment, Assignment};
use crate::inference::joint::JointEvaluator;
use crate::inference::model::{GeneCount, HeredityModel};
use crate::inference::pedigree::Pedigree;
use crate::inference::posterior::{PosteriorTable, Posteriors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Enumerate,
    DepthFirst,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InferenceStats {
    /// complete assignments folded into the posterior table
    pub assignments: u64,
    pub rejected_trait_subsets: u64,
    /// partial assignments abandoned with a zero running product
    pub pruned_branches: u64,
    pub evidence_probability: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub posteriors: Posteriors,
    pub stats: InferenceStats,
}

/// Posterior gene and trait distributions for every individual.
pub fn infer(pedigree: &Pedigree, model: &HeredityModel) -> Result<Posteriors> {
    infer_with(pedigree, model, Method::default()).map(|inference| inference.posteriors)
}

pub fn infer_with(pedigree: &Pedigree, model: &HeredityModel, method: Method) -> Result<Inference> {
    debug!(
        individuals = pedigree.len(),
        observed = pedigree.n_observed(),
        ?method,
        "starting exact inference"
    );
    let (table, mut stats) = accumulate(pedigree, model, method)?;
    stats.evidence_probability = table.evidence_probability(pedigree)?;
    let posteriors = table.normalize(pedigree)?;
    info!(
        assignments = stats.assignments,
        rejected_trait_subsets = stats.rejected_trait_subsets,
        pruned_branches = stats.pruned_branches,
        evidence_probability = stats.evidence_probability,
        "inference complete"
    );
    Ok(Inference { posteriors, stats })
}

/// Run an engine up to, but not including, normalization.
pub fn accumulate(
    pedigree: &Pedigree,
    model: &HeredityModel,
    method: Method,
) -> Result<(PosteriorTable, InferenceStats)> {
    let evaluator = JointEvaluator::new(pedigree, model);
    let mut table = PosteriorTable::new(pedigree.len());
    let mut stats = InferenceStats::default();
    match method {
        Method::Enumerate => {
            let counts = for_each_assignment(pedigree, |assignment| {
                let p = evaluator.joint_probability(assignment)?;
                table.add(assignment, p)
            })?;
            stats.assignments = counts.assignments;
            stats.rejected_trait_subsets = counts.rejected_trait_subsets;
        }
        Method::DepthFirst => {
            let mut search = DepthFirst {
                evaluator: &evaluator,
                order: pedigree.topo_order(),
                table: &mut table,
                stats: &mut stats,
            };
            let mut assignment = Assignment::empty(pedigree.len());
            search.descend(0, 1.0, &mut assignment)?;
        }
    }
    Ok((table, stats))
}

struct DepthFirst<'s, 'a> {
    evaluator: &'s JointEvaluator<'a>,
    order: &'s [usize],
    table: &'s mut PosteriorTable,
    stats: &'s mut InferenceStats,
}

impl<'s, 'a> DepthFirst<'s, 'a> {
    fn descend(&mut self, depth: usize, weight: f64, assignment: &mut Assignment) -> Result<()> {
        let idx = match self.order.get(depth) {
            Some(&idx) => idx,
            None => {
                self.stats.assignments += 1;
                return self.table.add(assignment, weight);
            }
        };
        for &count in GeneCount::ALL.iter() {
            assignment.set_gene(idx, count);
            for &has_trait in [false, true].iter() {
                assignment.set_trait(idx, has_trait);
                let factor = self.evaluator.factor(idx, assignment);
                if factor == 0.0 {
                    self.stats.pruned_branches += 1;
                    continue;
                }
                self.descend(depth + 1, weight * factor, assignment)?;
            }
        }
        Ok(())
    }
}
