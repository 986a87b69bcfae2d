// Odometer walk over every gene partition and trait subset of a pedigree

use tracing::trace;

use crate::error::Result;
use crate::inference::model::GeneCount;
use crate::inference::pedigree::Pedigree;

/// A gene count and trait status for every individual, by pedigree index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    genes: Vec<GeneCount>,
    traits: Vec<bool>,
}

impl Assignment {
    pub fn new(genes: Vec<GeneCount>, traits: Vec<bool>) -> Self {
        Assignment { genes, traits }
    }

    /// Everyone at zero copies and without the trait.
    pub fn empty(n: usize) -> Self {
        Assignment {
            genes: vec![GeneCount::Zero; n],
            traits: vec![false; n],
        }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// True when the gene and trait vectors cover the same individuals.
    pub fn is_well_formed(&self) -> bool {
        self.genes.len() == self.traits.len()
    }

    pub fn gene(&self, idx: usize) -> GeneCount {
        self.genes[idx]
    }

    pub fn has_trait(&self, idx: usize) -> bool {
        self.traits[idx]
    }

    pub fn genes(&self) -> &[GeneCount] {
        &self.genes
    }

    pub fn traits(&self) -> &[bool] {
        &self.traits
    }

    pub fn set_gene(&mut self, idx: usize, count: GeneCount) {
        self.genes[idx] = count;
    }

    pub fn set_trait(&mut self, idx: usize, has_trait: bool) {
        self.traits[idx] = has_trait;
    }

    /// Whether every observed trait in the pedigree matches this assignment.
    pub fn agrees_with(&self, pedigree: &Pedigree) -> bool {
        traits_agree(pedigree, &self.traits)
    }

    /// Step the gene odometer. Returns false once every partition was visited,
    /// leaving the genes back at all-zero.
    pub fn advance_genes(&mut self) -> bool {
        for gene in self.genes.iter_mut() {
            match gene.succ() {
                Some(next) => {
                    *gene = next;
                    return true;
                }
                None => *gene = GeneCount::Zero,
            }
        }
        false
    }

    /// Step the trait odometer. Returns false once every subset was visited.
    pub fn advance_traits(&mut self) -> bool {
        next_subset(&mut self.traits)
    }
}

fn next_subset(members: &mut [bool]) -> bool {
    for member in members.iter_mut() {
        if *member {
            *member = false;
        } else {
            *member = true;
            return true;
        }
    }
    false
}

fn traits_agree(pedigree: &Pedigree, traits: &[bool]) -> bool {
    pedigree
        .individuals()
        .iter()
        .zip(traits.iter())
        .all(|(ind, &t)| ind.admits_trait(t))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationCounts {
    /// assignments handed to the visitor
    pub assignments: u64,
    pub rejected_trait_subsets: u64,
}

/// Visit every assignment consistent with the observed traits.
///
/// The same `Assignment` buffer is reused between calls; visitors that need
/// to keep it must clone it.
pub fn for_each_assignment<F>(pedigree: &Pedigree, mut visit: F) -> Result<EnumerationCounts>
where
    F: FnMut(&Assignment) -> Result<()>,
{
    let mut counts = EnumerationCounts::default();
    let mut assignment = Assignment::empty(pedigree.len());
    loop {
        if assignment.agrees_with(pedigree) {
            loop {
                visit(&assignment)?;
                counts.assignments += 1;
                if !assignment.advance_genes() {
                    break;
                }
            }
        } else {
            trace!(trait_subset = ?assignment.traits(), "rejected trait subset");
            counts.rejected_trait_subsets += 1;
        }
        if !assignment.advance_traits() {
            break;
        }
    }
    Ok(counts)
}
