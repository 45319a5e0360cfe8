//! Serialization of validated records into the worker's tab-separated batch lines.
//!
//! Each line carries the variant id, a type-dependent length, and one column per
//! entry of [`FORMAT_FIELDS`]. A column holds that attribute's value for every sample,
//! in sample order, joined by [`DATA_VALUE_SEPARATOR`].

use crate::consts::*;
use crate::errors::{Result, SvTrainError};
use crate::models::{SvType, VariantRecord};

/// Compute the length the genotyper sees for `record`, given the run's established type.
pub fn variant_length(record: &VariantRecord, sv_type: &SvType) -> Result<i32> {
    match sv_type {
        SvType::Del | SvType::Dup | SvType::Inv => {
            let svlen = record
                .attribute(SVLEN_ATTRIBUTE)
                .ok_or_else(|| SvTrainError::missing_attribute(SVLEN_ATTRIBUTE, &record.id))?;
            svlen
                .trim()
                .parse::<i32>()
                .map_err(|_| SvTrainError::InvalidAttributeValue {
                    attribute: SVLEN_ATTRIBUTE.to_string(),
                    value: svlen.to_string(),
                    id: record.id.clone(),
                })
        }
        // insertion length carries no evidence for the model
        SvType::Ins => Ok(0),
        SvType::Bnd => {
            let contig2 = record
                .attribute(CONTIG2_ATTRIBUTE)
                .ok_or_else(|| SvTrainError::missing_attribute(CONTIG2_ATTRIBUTE, &record.id))?;
            if contig2 == record.contig {
                let span = record.end as i64 - record.start as i64;
                i32::try_from(span).map_err(|_| SvTrainError::InvalidAttributeValue {
                    attribute: END_ATTRIBUTE.to_string(),
                    value: record.end.to_string(),
                    id: record.id.clone(),
                })
            } else {
                Ok(INTERCHROMOSOMAL_LENGTH)
            }
        }
        SvType::Cnv | SvType::Other(_) => Err(SvTrainError::UntrackedVariantType(sv_type.clone())),
    }
}

/// Join one FORMAT attribute across all samples of `record`. A sample without the key
/// is written as the VCF missing value, which the worker reads as "no evidence"; the
/// value does not come from the input.
fn format_column(record: &VariantRecord, key: &str) -> String {
    record
        .genotypes
        .iter()
        .map(|genotype| genotype.get(key).unwrap_or(VCF_MISSING_VALUE))
        .collect::<Vec<_>>()
        .join(DATA_VALUE_SEPARATOR)
}

/// Encode `record` as a single newline-terminated batch line.
pub fn encode_record(record: &VariantRecord, sv_type: &SvType) -> Result<String> {
    let length = variant_length(record, sv_type)?;

    let mut line = String::with_capacity(64 + 16 * record.genotypes.len() * FORMAT_FIELDS.len());
    line.push_str(&record.id);
    line.push_str(DATA_TYPE_SEPARATOR);
    line.push_str(&length.to_string());

    for key in FORMAT_FIELDS {
        line.push_str(DATA_TYPE_SEPARATOR);
        line.push_str(&format_column(record, key));
    }
    line.push_str(LINE_TERMINATOR);

    Ok(line)
}
