use crate::errors::Result;
use crate::models::VariantRecord;

pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<VariantRecord>> + 'a>;

/// A rewindable stream of variant records.
///
/// Each call to [`VariantSource::records`] starts a fresh traversal from the first
/// record; the training run relies on two traversals yielding the same records in the
/// same order.
pub trait VariantSource {
    /// Sample names from the header, in genotype column order.
    fn sample_names(&self) -> &[String];

    fn records(&self) -> Result<RecordIter<'_>>;
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    samples: Vec<String>,
    records: Vec<VariantRecord>,
}

impl MemorySource {
    pub fn new(samples: Vec<String>, records: Vec<VariantRecord>) -> Self {
        Self { samples, records }
    }
}

impl VariantSource for MemorySource {
    fn sample_names(&self) -> &[String] {
        &self.samples
    }

    fn records(&self) -> Result<RecordIter<'_>> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}
