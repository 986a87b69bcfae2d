use std::io::Write;

use crate::error::Result;
use crate::inference::model::GeneCount;
use crate::inference::posterior::Posteriors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

pub fn write_report<W: Write>(out: &mut W, posteriors: &Posteriors, format: Format) -> Result<()> {
    match format {
        Format::Text => write_text(out, posteriors),
        Format::Json => write_json(out, posteriors),
    }
}

/// Per person, gene counts from two down to zero, then trait True/False,
/// at four decimals.
pub fn write_text<W: Write>(out: &mut W, posteriors: &Posteriors) -> Result<()> {
    for (name, posterior) in posteriors.iter() {
        writeln!(out, "{}:", name)?;
        writeln!(out, "  Gene:")?;
        for &count in GeneCount::ALL.iter().rev() {
            writeln!(out, "    {}: {:.4}", count, posterior.gene_distribution.get(count))?;
        }
        writeln!(out, "  Trait:")?;
        writeln!(out, "    True: {:.4}", posterior.trait_distribution.present)?;
        writeln!(out, "    False: {:.4}", posterior.trait_distribution.absent)?;
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, posteriors: &Posteriors) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, posteriors)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::posterior::{GeneDistribution, Posterior, TraitDistribution};

    fn sample() -> Posteriors {
        let mut posteriors = Posteriors::new();
        posteriors.insert(
            "Lily".to_string(),
            Posterior {
                gene_distribution: GeneDistribution {
                    zero: 0.9827318788129458,
                    one: 0.013649053872402023,
                    two: 0.0036190673146520515,
                },
                trait_distribution: TraitDistribution {
                    present: 0.0,
                    absent: 1.0,
                },
            },
        );
        posteriors
    }

    #[test]
    fn test_text_report() {
        let mut out = Vec::new();
        write_report(&mut out, &sample(), Format::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "Lily:\n  Gene:\n    2: 0.0036\n    1: 0.0136\n    0: 0.9827\n  Trait:\n    True: 0.0000\n    False: 1.0000\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_json_report() {
        let mut out = Vec::new();
        write_report(&mut out, &sample(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["Lily"]["traitDistribution"]["false"], 1.0);
        assert_eq!(value["Lily"]["geneDistribution"]["0"], 0.9827318788129458);
    }
}
