use crate::error::{Error, Result};
use crate::inference::enumerate::Assignment;
use crate::inference::model::{HeredityModel, TransmissionTable};
use crate::inference::pedigree::Pedigree;

/// Scores assignments against a fixed pedigree and model.
#[derive(Debug, Clone)]
pub struct JointEvaluator<'a> {
    pedigree: &'a Pedigree,
    model: &'a HeredityModel,
    table: TransmissionTable,
}

impl<'a> JointEvaluator<'a> {
    pub fn new(pedigree: &'a Pedigree, model: &'a HeredityModel) -> Self {
        JointEvaluator {
            pedigree,
            model,
            table: model.transmission(),
        }
    }

    /// P(gene count of `idx` | its parents' counts in `assignment`), or the
    /// prior for a founder.
    ///
    /// Only `idx` and its parents need to be filled in, so this is also valid
    /// on a partial assignment built parents-first.
    pub fn gene_factor(&self, idx: usize, assignment: &Assignment) -> f64 {
        let count = assignment.gene(idx);
        match self.pedigree.individual(idx).parents() {
            None => self.model.gene_prior(count),
            Some(parents) => self.table.inherit(
                assignment.gene(parents.mother),
                assignment.gene(parents.father),
                count,
            ),
        }
    }

    pub fn trait_factor(&self, idx: usize, assignment: &Assignment) -> f64 {
        self.model
            .trait_given_genes(assignment.gene(idx), assignment.has_trait(idx))
    }

    /// Combined gene and trait factor for one individual. Zero when the
    /// hypothesized trait contradicts the observation.
    pub fn factor(&self, idx: usize, assignment: &Assignment) -> f64 {
        if !self
            .pedigree
            .individual(idx)
            .admits_trait(assignment.has_trait(idx))
        {
            return 0.0;
        }
        self.gene_factor(idx, assignment) * self.trait_factor(idx, assignment)
    }

    /// Probability that the pedigree produces exactly `assignment`.
    pub fn joint_probability(&self, assignment: &Assignment) -> Result<f64> {
        self.check(assignment)?;
        if !assignment.agrees_with(self.pedigree) {
            return Ok(0.0);
        }
        let n = self.pedigree.len();
        let genes: f64 = (0..n).map(|i| self.gene_factor(i, assignment)).product();
        let traits: f64 = (0..n).map(|i| self.trait_factor(i, assignment)).product();
        Ok(genes * traits)
    }

    pub(crate) fn check(&self, assignment: &Assignment) -> Result<()> {
        if !assignment.is_well_formed() || assignment.len() != self.pedigree.len() {
            return Err(Error::InvalidAssignment(format!(
                "assignment covers {} genes and {} traits, pedigree has {} individuals",
                assignment.genes().len(),
                assignment.traits().len(),
                self.pedigree.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::model::GeneCount;
    use crate::inference::pedigree::PersonRecord;
    use std::collections::BTreeMap;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    // Potter family, indices sorted by name: Harry 0, James 1, Lily 2
    fn potter() -> Pedigree {
        let mut records = BTreeMap::new();
        records.insert("Harry".into(), PersonRecord::child("Lily", "James", None));
        records.insert("James".into(), PersonRecord::founder(Some(true)));
        records.insert("Lily".into(), PersonRecord::founder(Some(false)));
        Pedigree::new(records).unwrap()
    }

    #[test]
    fn test_joint_probability_by_hand() {
        let pedigree = potter();
        let model = HeredityModel::default();
        let evaluator = JointEvaluator::new(&pedigree, &model);
        // Harry one copy without trait, James two copies with trait, Lily none
        let assignment = Assignment::new(
            vec![GeneCount::One, GeneCount::Two, GeneCount::Zero],
            vec![false, true, false],
        );
        let expected = 0.96 * 0.99 * (0.99 * 0.99 + 0.01 * 0.01) * 0.44 * 0.01 * 0.65;
        let p = evaluator.joint_probability(&assignment).unwrap();
        assert!(approx_eq(p, expected, 1e-17));
        assert!(approx_eq(p, 0.0026643247488, 1e-15));
    }

    #[test]
    fn test_founder_uses_prior() {
        let pedigree = potter();
        let model = HeredityModel::default();
        let evaluator = JointEvaluator::new(&pedigree, &model);
        let mut assignment = Assignment::empty(3);
        assignment.set_gene(1, GeneCount::Two);
        assert_eq!(evaluator.gene_factor(1, &assignment), 0.01);
        assignment.set_trait(1, true);
        assert_eq!(evaluator.gene_factor(1, &assignment), 0.01);
    }

    #[test]
    fn test_contradicting_assignment_scores_zero() {
        let pedigree = potter();
        let model = HeredityModel::default();
        let evaluator = JointEvaluator::new(&pedigree, &model);
        // James is observed with the trait
        let assignment = Assignment::empty(3);
        assert_eq!(evaluator.joint_probability(&assignment).unwrap(), 0.0);
        assert_eq!(evaluator.factor(1, &assignment), 0.0);
    }

    #[test]
    fn test_short_assignment_is_rejected() {
        let pedigree = potter();
        let model = HeredityModel::default();
        let evaluator = JointEvaluator::new(&pedigree, &model);
        let result = evaluator.joint_probability(&Assignment::empty(2));
        assert!(matches!(result, Err(Error::InvalidAssignment(_))));
        let ragged = Assignment::new(vec![GeneCount::Zero; 3], vec![true; 2]);
        assert!(matches!(
            evaluator.joint_probability(&ragged),
            Err(Error::InvalidAssignment(_))
        ));
    }
}
