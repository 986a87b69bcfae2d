use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::inference::pedigree::{Pedigree, PersonRecord};

#[derive(Debug, Deserialize)]
struct Row {
    name: String,
    mother: Option<String>,
    father: Option<String>,
    #[serde(rename = "trait")]
    observed: Option<String>,
}

pub fn load_pedigree(path: &Path) -> Result<Pedigree> {
    debug!(path = %path.display(), "loading pedigree");
    read_pedigree(File::open(path)?)
}

pub fn read_pedigree<R: Read>(reader: R) -> Result<Pedigree> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = BTreeMap::new();
    for row in rdr.deserialize() {
        let row: Row = row?;
        if row.name.is_empty() {
            return Err(Error::malformed("row with an empty name"));
        }
        let observed_trait = parse_trait(&row.name, row.observed.as_deref())?;
        let record = PersonRecord {
            mother: row.mother.filter(|m| !m.is_empty()),
            father: row.father.filter(|f| !f.is_empty()),
            observed_trait,
        };
        if records.insert(row.name.clone(), record).is_some() {
            return Err(Error::malformed(format!("{} appears more than once", row.name)));
        }
    }
    Pedigree::new(records)
}

fn parse_trait(name: &str, field: Option<&str>) -> Result<Option<bool>> {
    match field {
        None | Some("") => Ok(None),
        Some("1") => Ok(Some(true)),
        Some("0") => Ok(Some(false)),
        Some(other) => Err(Error::malformed(format!(
            "{} has trait {:?}; expected 1, 0 or blank",
            name, other
        ))),
    }
}
