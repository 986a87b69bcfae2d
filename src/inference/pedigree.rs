use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Input record for one individual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub mother: Option<String>,
    pub father: Option<String>,
    pub observed_trait: Option<bool>,
}

impl PersonRecord {
    pub fn founder(observed_trait: Option<bool>) -> Self {
        PersonRecord {
            mother: None,
            father: None,
            observed_trait,
        }
    }

    pub fn child(mother: &str, father: &str, observed_trait: Option<bool>) -> Self {
        PersonRecord {
            mother: Some(mother.into()),
            father: Some(father.into()),
            observed_trait,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parents {
    pub mother: usize,
    pub father: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    name: String,
    parents: Option<Parents>,
    observed_trait: Option<bool>,
}

impl Individual {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> Option<Parents> {
        self.parents
    }

    pub fn observed_trait(&self) -> Option<bool> {
        self.observed_trait
    }

    pub fn is_founder(&self) -> bool {
        self.parents.is_none()
    }

    /// Whether a hypothesized trait status agrees with the observation.
    pub fn admits_trait(&self, has_trait: bool) -> bool {
        self.observed_trait.map_or(true, |obs| obs == has_trait)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pedigree {
    /// sorted by name
    individuals: Vec<Individual>,
    index: BTreeMap<String, usize>,
    /// every parent precedes its children
    topo_order: Vec<usize>,
}

impl Pedigree {
    pub fn new(records: BTreeMap<String, PersonRecord>) -> Result<Self> {
        let index: BTreeMap<String, usize> = records
            .keys()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let resolve = |child: &str, parent: &str| -> Result<usize> {
            if child == parent {
                return Err(Error::malformed(format!(
                    "{} is listed as their own parent",
                    child
                )));
            }
            index.get(parent).copied().ok_or_else(|| {
                Error::malformed(format!("{} refers to unknown parent {}", child, parent))
            })
        };

        let mut individuals = Vec::with_capacity(records.len());
        for (name, record) in records.iter() {
            let parents = match (&record.mother, &record.father) {
                (None, None) => None,
                (Some(mother), Some(father)) => Some(Parents {
                    mother: resolve(name, mother)?,
                    father: resolve(name, father)?,
                }),
                _ => {
                    return Err(Error::malformed(format!(
                        "{} has exactly one parent; both or neither must be given",
                        name
                    )))
                }
            };
            individuals.push(Individual {
                name: name.clone(),
                parents,
                observed_trait: record.observed_trait,
            });
        }
        let topo_order = parents_first_order(&individuals)?;
        Ok(Pedigree {
            individuals,
            index,
            topo_order,
        })
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individual(&self, idx: usize) -> &Individual {
        &self.individuals[idx]
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn topo_order(&self) -> &[usize] {
        &self.topo_order
    }

    pub fn n_observed(&self) -> usize {
        self.individuals
            .iter()
            .filter(|ind| ind.observed_trait.is_some())
            .count()
    }
}

/// Order individuals so parents come before children.
/// Returns an error if the parent graph has a cycle.
fn parents_first_order(individuals: &[Individual]) -> Result<Vec<usize>> {
    let n = individuals.len();
    let mut n_unplaced_parents = vec![0usize; n];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (idx, ind) in individuals.iter().enumerate() {
        if let Some(parents) = ind.parents {
            n_unplaced_parents[idx] = 2;
            children[parents.mother].push(idx);
            children[parents.father].push(idx);
        }
    }
    let mut ready: VecDeque<usize> = (0..n).filter(|&i| n_unplaced_parents[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(next) = ready.pop_front() {
        order.push(next);
        for &child in children[next].iter() {
            n_unplaced_parents[child] -= 1;
            if n_unplaced_parents[child] == 0 {
                ready.push_back(child);
            }
        }
    }
    if order.len() == n {
        Ok(order)
    } else {
        let stuck = (0..n)
            .find(|&i| n_unplaced_parents[i] > 0)
            .map(|i| individuals[i].name.clone())
            .unwrap_or_default();
        Err(Error::malformed(format!(
            "parent references form a cycle through {}",
            stuck
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potter_records() -> BTreeMap<String, PersonRecord> {
        let mut records = BTreeMap::new();
        records.insert("Harry".into(), PersonRecord::child("Lily", "James", None));
        records.insert("James".into(), PersonRecord::founder(Some(true)));
        records.insert("Lily".into(), PersonRecord::founder(Some(false)));
        records
    }

    #[test]
    fn test_resolves_parents() {
        let pedigree = Pedigree::new(potter_records()).unwrap();
        assert_eq!(pedigree.len(), 3);
        let harry = pedigree.individual(pedigree.index_of("Harry").unwrap());
        let parents = harry.parents().unwrap();
        assert_eq!(pedigree.individual(parents.mother).name(), "Lily");
        assert_eq!(pedigree.individual(parents.father).name(), "James");
        assert!(!harry.is_founder());
        assert_eq!(pedigree.n_observed(), 2);
    }

    #[test]
    fn test_topo_order_puts_parents_first() {
        let pedigree = Pedigree::new(potter_records()).unwrap();
        let order = pedigree.topo_order();
        let pos = |name: &str| {
            let idx = pedigree.index_of(name).unwrap();
            order.iter().position(|&i| i == idx).unwrap()
        };
        assert!(pos("Lily") < pos("Harry"));
        assert!(pos("James") < pos("Harry"));
    }

    #[test]
    fn test_single_parent_is_malformed() {
        let mut records = potter_records();
        records.insert(
            "Harry".into(),
            PersonRecord {
                mother: Some("Lily".into()),
                father: None,
                observed_trait: None,
            },
        );
        assert!(matches!(
            Pedigree::new(records),
            Err(Error::MalformedPedigree(_))
        ));
    }

    #[test]
    fn test_unknown_parent_is_malformed() {
        let mut records = potter_records();
        records.insert("Harry".into(), PersonRecord::child("Petunia", "James", None));
        assert!(matches!(
            Pedigree::new(records),
            Err(Error::MalformedPedigree(_))
        ));
    }

    #[test]
    fn test_cycle_is_malformed() {
        let mut records = BTreeMap::new();
        records.insert("a".to_string(), PersonRecord::child("b", "c", None));
        records.insert("b".to_string(), PersonRecord::child("a", "c", None));
        records.insert("c".to_string(), PersonRecord::founder(None));
        assert!(matches!(
            Pedigree::new(records),
            Err(Error::MalformedPedigree(_))
        ));

        let mut records = BTreeMap::new();
        records.insert("a".to_string(), PersonRecord::child("a", "b", None));
        records.insert("b".to_string(), PersonRecord::founder(None));
        assert!(matches!(
            Pedigree::new(records),
            Err(Error::MalformedPedigree(_))
        ));
    }

    #[test]
    fn test_admits_trait() {
        let pedigree = Pedigree::new(potter_records()).unwrap();
        let james = pedigree.individual(pedigree.index_of("James").unwrap());
        assert!(james.admits_trait(true));
        assert!(!james.admits_trait(false));
        let harry = pedigree.individual(pedigree.index_of("Harry").unwrap());
        assert!(harry.admits_trait(true) && harry.admits_trait(false));
    }
}
