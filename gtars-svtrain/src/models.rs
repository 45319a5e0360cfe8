//! Records and per-run state shared by the validator, encoder and orchestrator.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::consts::*;

/// Structural variant class, as carried by the `SVTYPE` INFO attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SvType {
    Del,
    Dup,
    Ins,
    Inv,
    Cnv,
    Bnd,
    /// Any other class name found in the input, e.g. `CPX` or `CTX`.
    Other(String),
}

impl SvType {
    /// Types the genotyper can be trained on. Inversions are expected to have been
    /// converted to breakends upstream.
    pub const SUPPORTED: [SvType; 4] = [SvType::Del, SvType::Dup, SvType::Ins, SvType::Bnd];

    pub fn name(&self) -> &str {
        match self {
            SvType::Del => "DEL",
            SvType::Dup => "DUP",
            SvType::Ins => "INS",
            SvType::Inv => "INV",
            SvType::Cnv => "CNV",
            SvType::Bnd => "BND",
            SvType::Other(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        SvType::SUPPORTED.contains(self)
    }

    pub fn supported_names() -> String {
        SvType::SUPPORTED
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Display for SvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for SvType {
    fn from(s: &str) -> Self {
        match s {
            "DEL" => SvType::Del,
            "DUP" => SvType::Dup,
            "INS" => SvType::Ins,
            "INV" => SvType::Inv,
            "CNV" => SvType::Cnv,
            "BND" => SvType::Bnd,
            other => SvType::Other(other.to_string()),
        }
    }
}

impl FromStr for SvType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SvType::from(s))
    }
}

/// FORMAT values of one sample, keyed by FORMAT id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Genotype {
    pub attributes: HashMap<String, String>,
}

impl Genotype {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// A single structural variant call. Positions are 1-based and inclusive, as in the VCF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub id: String,
    pub contig: String,
    pub start: u64,
    pub end: u64,
    pub sv_type: SvType,
    pub info: HashMap<String, String>,
    pub genotypes: Vec<Genotype>,
}

impl VariantRecord {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.info.get(key).map(String::as_str)
    }

    pub fn is_depth_only(&self) -> bool {
        self.attribute(ALGORITHMS_ATTRIBUTE) == Some(DEPTH_ALGORITHM)
    }
}

/// The SV type established by the first record of a run. Set once, then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTypeContext {
    sv_type: Option<SvType>,
}

impl RunTypeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&SvType> {
        self.sv_type.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.sv_type.is_some()
    }

    pub(crate) fn establish(&mut self, sv_type: SvType) {
        debug_assert!(self.sv_type.is_none());
        self.sv_type = Some(sv_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("DEL", SvType::Del)]
    #[case("DUP", SvType::Dup)]
    #[case("INS", SvType::Ins)]
    #[case("INV", SvType::Inv)]
    #[case("CNV", SvType::Cnv)]
    #[case("BND", SvType::Bnd)]
    fn test_svtype_names_round_trip(#[case] name: &str, #[case] expected: SvType) {
        let parsed: SvType = name.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), name);
    }

    #[rstest]
    #[case("CPX")]
    #[case("CTX")]
    fn test_unknown_svtype_is_kept(#[case] name: &str) {
        let parsed = SvType::from(name);
        assert_eq!(parsed, SvType::Other(name.to_string()));
        assert_eq!(parsed.to_string(), name);
        assert!(!parsed.is_supported());
    }

    #[test]
    fn test_supported_names() {
        assert_eq!(SvType::supported_names(), "DEL,DUP,INS,BND");
        assert!(!SvType::Inv.is_supported());
        assert!(!SvType::Cnv.is_supported());
    }

    #[test]
    fn test_depth_only_requires_exact_match() {
        let mut record = VariantRecord {
            id: "v1".to_string(),
            contig: "chr1".to_string(),
            start: 100,
            end: 200,
            sv_type: SvType::Del,
            info: HashMap::new(),
            genotypes: vec![],
        };
        assert!(!record.is_depth_only());

        record
            .info
            .insert(ALGORITHMS_ATTRIBUTE.to_string(), "depth,manta".to_string());
        assert!(!record.is_depth_only());

        record
            .info
            .insert(ALGORITHMS_ATTRIBUTE.to_string(), "depth".to_string());
        assert!(record.is_depth_only());
    }
}
