use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::inference::enumerate::Assignment;
use crate::inference::model::GeneCount;
use crate::inference::pedigree::Pedigree;

/// Relative tolerance when comparing per-individual evidence totals.
pub const EVIDENCE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneDistribution {
    #[serde(rename = "0")]
    pub zero: f64,
    #[serde(rename = "1")]
    pub one: f64,
    #[serde(rename = "2")]
    pub two: f64,
}

impl GeneDistribution {
    pub fn get(&self, count: GeneCount) -> f64 {
        match count {
            GeneCount::Zero => self.zero,
            GeneCount::One => self.one,
            GeneCount::Two => self.two,
        }
    }

    pub fn sum(&self) -> f64 {
        self.zero + self.one + self.two
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitDistribution {
    #[serde(rename = "true")]
    pub present: f64,
    #[serde(rename = "false")]
    pub absent: f64,
}

impl TraitDistribution {
    pub fn get(&self, has_trait: bool) -> f64 {
        if has_trait {
            self.present
        } else {
            self.absent
        }
    }

    pub fn sum(&self) -> f64 {
        self.present + self.absent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posterior {
    pub gene_distribution: GeneDistribution,
    pub trait_distribution: TraitDistribution,
}

/// Normalized posteriors keyed by individual name.
pub type Posteriors = BTreeMap<String, Posterior>;

/// Running, unnormalized gene and trait weights for every individual.
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorTable {
    /// gene[i][copies]
    gene: Vec<[f64; 3]>,
    /// traits[i][has_trait as usize]
    traits: Vec<[f64; 2]>,
}

impl PosteriorTable {
    pub fn new(n: usize) -> Self {
        PosteriorTable {
            gene: vec![[0.0; 3]; n],
            traits: vec![[0.0; 2]; n],
        }
    }

    pub fn len(&self) -> usize {
        self.gene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gene.is_empty()
    }

    /// Fold one scored assignment into every individual's buckets.
    pub fn add(&mut self, assignment: &Assignment, weight: f64) -> Result<()> {
        if !assignment.is_well_formed() || assignment.len() != self.len() {
            return Err(Error::InvalidAssignment(format!(
                "cannot accumulate an assignment over {} individuals into a table of {}",
                assignment.len(),
                self.len()
            )));
        }
        for (idx, (gene, traits)) in self.gene.iter_mut().zip(self.traits.iter_mut()).enumerate() {
            gene[assignment.gene(idx).copies()] += weight;
            traits[assignment.has_trait(idx) as usize] += weight;
        }
        Ok(())
    }

    pub fn gene_weights(&self, idx: usize) -> [f64; 3] {
        self.gene[idx]
    }

    pub fn trait_weights(&self, idx: usize) -> [f64; 2] {
        self.traits[idx]
    }

    /// Total accumulated weight, which is the probability of the evidence.
    ///
    /// Every individual's gene buckets and trait buckets see every scored
    /// assignment exactly once, so all of their totals must agree. A
    /// disagreement is reported as `InconsistentEvidence`.
    pub fn evidence_probability(&self, pedigree: &Pedigree) -> Result<f64> {
        let expected = match self.gene.first() {
            Some(weights) => weights.iter().sum::<f64>(),
            None => return Ok(1.0),
        };
        let scale = expected.abs().max(f64::MIN_POSITIVE);
        for idx in 0..self.len() {
            let totals = [
                self.gene[idx].iter().sum::<f64>(),
                self.traits[idx].iter().sum::<f64>(),
            ];
            for &actual in totals.iter() {
                if (actual - expected).abs() > EVIDENCE_TOLERANCE * scale {
                    return Err(Error::InconsistentEvidence {
                        individual: pedigree.individual(idx).name().to_string(),
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(expected)
    }

    /// Rescale each distribution to sum to one.
    ///
    /// An individual with no accumulated weight means no assignment consistent
    /// with the evidence has nonzero probability.
    pub fn normalize(&self, pedigree: &Pedigree) -> Result<Posteriors> {
        let mut posteriors = Posteriors::new();
        for (idx, ind) in pedigree.individuals().iter().enumerate() {
            let contradiction = || Error::ContradictoryEvidence {
                individual: ind.name().to_string(),
            };
            let [g0, g1, g2] = self.gene[idx];
            let gene_sum = g0 + g1 + g2;
            let [absent, present] = self.traits[idx];
            let trait_sum = absent + present;
            if gene_sum <= 0.0 || !gene_sum.is_finite() {
                return Err(contradiction());
            }
            if trait_sum <= 0.0 || !trait_sum.is_finite() {
                return Err(contradiction());
            }
            posteriors.insert(
                ind.name().to_string(),
                Posterior {
                    gene_distribution: GeneDistribution {
                        zero: g0 / gene_sum,
                        one: g1 / gene_sum,
                        two: g2 / gene_sum,
                    },
                    trait_distribution: TraitDistribution {
                        present: present / trait_sum,
                        absent: absent / trait_sum,
                    },
                },
            );
        }
        Ok(posteriors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::pedigree::PersonRecord;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn couple() -> Pedigree {
        let mut records = BTreeMap::new();
        records.insert("Homer".to_string(), PersonRecord::founder(None));
        records.insert("Marge".to_string(), PersonRecord::founder(None));
        Pedigree::new(records).unwrap()
    }

    #[test]
    fn test_add_and_normalize() {
        let pedigree = couple();
        let mut table = PosteriorTable::new(2);
        let a = Assignment::new(vec![GeneCount::One, GeneCount::Zero], vec![true, false]);
        let b = Assignment::new(vec![GeneCount::Two, GeneCount::Zero], vec![false, false]);
        table.add(&a, 0.3).unwrap();
        table.add(&b, 0.1).unwrap();
        assert_eq!(table.gene_weights(0), [0.0, 0.3, 0.1]);
        assert_eq!(table.trait_weights(0), [0.1, 0.3]);
        assert!(approx_eq(table.evidence_probability(&pedigree).unwrap(), 0.4, 1e-15));

        let posteriors = table.normalize(&pedigree).unwrap();
        let homer = &posteriors["Homer"];
        assert!(approx_eq(homer.gene_distribution.one, 0.75, 1e-15));
        assert!(approx_eq(homer.gene_distribution.two, 0.25, 1e-15));
        assert!(approx_eq(homer.trait_distribution.get(true), 0.75, 1e-15));
        let marge = &posteriors["Marge"];
        assert_eq!(marge.gene_distribution.get(GeneCount::Zero), 1.0);
        assert_eq!(marge.trait_distribution.absent, 1.0);
    }

    #[test]
    fn test_zero_weight_is_contradictory() {
        let pedigree = couple();
        let mut table = PosteriorTable::new(2);
        table.add(&Assignment::empty(2), 0.0).unwrap();
        match table.normalize(&pedigree) {
            Err(Error::ContradictoryEvidence { individual }) => assert_eq!(individual, "Homer"),
            other => panic!("expected contradictory evidence, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_totals_are_reported() {
        let pedigree = couple();
        let mut table = PosteriorTable::new(2);
        table.add(&Assignment::empty(2), 0.5).unwrap();
        table.traits[1][1] += 0.25;
        match table.evidence_probability(&pedigree) {
            Err(Error::InconsistentEvidence { individual, .. }) => assert_eq!(individual, "Marge"),
            other => panic!("expected inconsistent evidence, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_size_assignment_is_rejected() {
        let mut table = PosteriorTable::new(2);
        assert!(matches!(
            table.add(&Assignment::empty(3), 1.0),
            Err(Error::InvalidAssignment(_))
        ));
    }

    #[test]
    fn test_serializes_output_contract() {
        let posterior = Posterior {
            gene_distribution: GeneDistribution {
                zero: 0.5,
                one: 0.25,
                two: 0.25,
            },
            trait_distribution: TraitDistribution {
                present: 0.5,
                absent: 0.5,
            },
        };
        let json = serde_json::to_value(posterior).unwrap();
        assert_eq!(json["geneDistribution"]["1"], 0.25);
        assert_eq!(json["traitDistribution"]["true"], 0.5);
        assert_eq!(json["traitDistribution"]["false"], 0.5);
    }
}
