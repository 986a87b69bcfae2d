use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tolerance used when checking that a distribution sums to one.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-9;

/// Number of copies of the gene an individual carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneCount {
    Zero,
    One,
    Two,
}

impl GeneCount {
    pub const ALL: [GeneCount; 3] = [GeneCount::Zero, GeneCount::One, GeneCount::Two];

    pub fn copies(self) -> usize {
        match self {
            GeneCount::Zero => 0,
            GeneCount::One => 1,
            GeneCount::Two => 2,
        }
    }

    pub fn from_copies(copies: usize) -> Option<Self> {
        match copies {
            0 => Some(GeneCount::Zero),
            1 => Some(GeneCount::One),
            2 => Some(GeneCount::Two),
            _ => None,
        }
    }

    /// The next gene count in `ALL` order, or `None` after `Two`.
    pub fn succ(self) -> Option<Self> {
        Self::from_copies(self.copies() + 1)
    }
}

impl fmt::Display for GeneCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.copies())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeredityModel {
    /// P(copies) for individuals with no known parents, indexed by copy count.
    gene_prior: [f64; 3],
    /// P(trait status | copies), indexed as `[copies][has_trait as usize]`.
    trait_given_genes: [[f64; 2]; 3],
    /// Probability that a transmitted allele flips state.
    mutation_rate: f64,
}

impl Default for HeredityModel {
    fn default() -> Self {
        HeredityModel {
            gene_prior: [0.96, 0.03, 0.01],
            trait_given_genes: [[0.99, 0.01], [0.44, 0.56], [0.35, 0.65]],
            mutation_rate: 0.01,
        }
    }
}

impl HeredityModel {
    pub fn new(
        gene_prior: [f64; 3],
        trait_given_genes: [[f64; 2]; 3],
        mutation_rate: f64,
    ) -> Result<Self> {
        let model = HeredityModel {
            gene_prior,
            trait_given_genes,
            mutation_rate,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let model: HeredityModel = serde_json::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn gene_prior(&self, count: GeneCount) -> f64 {
        self.gene_prior[count.copies()]
    }

    pub fn trait_given_genes(&self, count: GeneCount, has_trait: bool) -> f64 {
        self.trait_given_genes[count.copies()][has_trait as usize]
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Probability that a parent with `parent` copies passes the gene on.
    ///
    /// A parent with one copy hands down either allele with equal chance, and
    /// each outcome may mutate, so the result is the mutation-perturbed average
    /// of the two homozygous cases.
    pub fn transmit_probability(&self, parent: GeneCount) -> f64 {
        let m = self.mutation_rate;
        match parent {
            GeneCount::Zero => m,
            GeneCount::One => 0.5 * (1.0 - m) + 0.5 * m,
            GeneCount::Two => 1.0 - m,
        }
    }

    pub fn transmission(&self) -> TransmissionTable {
        TransmissionTable::new(self)
    }

    /// Check that every table entry is a probability and that each
    /// distribution sums to one.
    pub fn validate(&self) -> Result<()> {
        check_probability("mutation_rate", self.mutation_rate)?;
        for (copies, p) in self.gene_prior.iter().enumerate() {
            check_probability(&format!("gene_prior[{}]", copies), *p)?;
        }
        check_sum("gene_prior", self.gene_prior.iter().sum())?;
        for (copies, row) in self.trait_given_genes.iter().enumerate() {
            for (status, p) in row.iter().enumerate() {
                check_probability(&format!("trait_given_genes[{}][{}]", copies, status), *p)?;
            }
            check_sum(
                &format!("trait_given_genes[{}]", copies),
                row.iter().sum(),
            )?;
        }
        Ok(())
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(Error::InvalidModel(format!(
            "{} = {} is not a probability",
            name, p
        )))
    }
}

fn check_sum(name: &str, sum: f64) -> Result<()> {
    if (sum - 1.0).abs() <= DISTRIBUTION_TOLERANCE {
        Ok(())
    } else {
        Err(Error::InvalidModel(format!(
            "{} sums to {}, expected 1",
            name, sum
        )))
    }
}

/// Transmission and inheritance probabilities precomputed for every gene
/// count, so the hot loop never re-derives them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionTable {
    /// inherit[mother][father][child]
    inherit: [[[f64; 3]; 3]; 3],
}

impl TransmissionTable {
    pub fn new(model: &HeredityModel) -> Self {
        let mut transmit = [0.0; 3];
        for count in GeneCount::ALL.iter() {
            transmit[count.copies()] = model.transmit_probability(*count);
        }
        let mut inherit = [[[0.0; 3]; 3]; 3];
        for (mother, row) in inherit.iter_mut().enumerate() {
            for (father, child) in row.iter_mut().enumerate() {
                let pm = transmit[mother];
                let pf = transmit[father];
                child[0] = (1.0 - pm) * (1.0 - pf);
                child[1] = pm * (1.0 - pf) + (1.0 - pm) * pf;
                child[2] = pm * pf;
            }
        }
        TransmissionTable { inherit }
    }

    /// Probability that a child of parents with the given counts carries
    /// exactly `child` copies.
    pub fn inherit(&self, mother: GeneCount, father: GeneCount, child: GeneCount) -> f64 {
        self.inherit[mother.copies()][father.copies()][child.copies()]
    }
}
