use crate::errors::{Result, SvTrainError};
use crate::models::{RunTypeContext, SvType, VariantRecord};

/// First-pass check. Rejects depth-only evidence and enforces a single SV type per file,
/// establishing that type on the first record it accepts.
pub fn validate_record(record: &VariantRecord, context: &mut RunTypeContext) -> Result<()> {
    if record.is_depth_only() {
        return Err(SvTrainError::UnsupportedEvidenceType(record.id.clone()));
    }

    let variant_type = &record.sv_type;
    match context.get() {
        None => {
            if !variant_type.is_supported() {
                return Err(SvTrainError::UnsupportedVariantType {
                    found: variant_type.clone(),
                    supported: SvType::supported_names(),
                });
            }
            context.establish(variant_type.clone());
        }
        Some(established) if established != variant_type => {
            return Err(SvTrainError::InconsistentVariantType {
                established: established.clone(),
                found: variant_type.clone(),
                id: record.id.clone(),
            });
        }
        Some(_) => {}
    }

    Ok(())
}
