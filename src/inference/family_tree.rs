use std::collections::BTreeMap;

use rand::Rng;

use crate::error::Result;
use crate::inference::pedigree::{Pedigree, PersonRecord};

/// Harry and his parents; James shows the trait, Lily does not.
pub fn make_potter_family() -> Result<Pedigree> {
    let records = vec![
        ("Harry", PersonRecord::child("Lily", "James", None)),
        ("James", PersonRecord::founder(Some(true))),
        ("Lily", PersonRecord::founder(Some(false))),
    ];
    Pedigree::new(named(records))
}

/// Three generations of Simpsons with the trait observed in Abraham and the
/// grandchildren.
pub fn make_simpson_family() -> Result<Pedigree> {
    let records = vec![
        ("Abraham", PersonRecord::founder(Some(true))),
        ("Mona", PersonRecord::founder(None)),
        ("Clancy", PersonRecord::founder(None)),
        ("Jacqueline", PersonRecord::founder(None)),
        ("Homer", PersonRecord::child("Mona", "Abraham", None)),
        ("Marge", PersonRecord::child("Jacqueline", "Clancy", None)),
        ("Lisa", PersonRecord::child("Marge", "Homer", Some(true))),
        ("Bart", PersonRecord::child("Marge", "Homer", Some(false))),
        ("Maggie", PersonRecord::child("Marge", "Homer", Some(false))),
    ];
    Pedigree::new(named(records))
}

/// A random pedigree of `n` people named `p0..pn`. Each person after the
/// first two has two distinct earlier parents with probability `p_child`,
/// and an observed trait with probability `p_observed`.
pub fn random_pedigree<R: Rng>(
    rng: &mut R,
    n: usize,
    p_child: f64,
    p_observed: f64,
) -> Result<Pedigree> {
    let mut records = BTreeMap::new();
    for i in 0..n {
        let observed = if rng.gen_bool(p_observed) {
            Some(rng.gen_bool(0.5))
        } else {
            None
        };
        let record = if i >= 2 && rng.gen_bool(p_child) {
            let mother = rng.gen_range(0, i);
            let mut father = rng.gen_range(0, i - 1);
            if father >= mother {
                father += 1;
            }
            PersonRecord::child(&format!("p{}", mother), &format!("p{}", father), observed)
        } else {
            PersonRecord::founder(observed)
        };
        records.insert(format!("p{}", i), record);
    }
    Pedigree::new(records)
}

fn named(records: Vec<(&str, PersonRecord)>) -> BTreeMap<String, PersonRecord> {
    records
        .into_iter()
        .map(|(name, record)| (name.to_string(), record))
        .collect()
}
