//! Minimal VCF reader for structural variant call sets.
//!
//! Reads plain text or gzipped/bgzf VCFs. Only what the training run needs is parsed:
//! the sample names from the `#CHROM` line, and per record the id, position, INFO
//! attributes and per-sample FORMAT values.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::consts::*;
use crate::errors::{Result, SvTrainError};
use crate::models::{Genotype, SvType, VariantRecord};
use crate::source::{RecordIter, VariantSource};

const MANDATORY_COLUMNS: usize = 8;
const FIRST_SAMPLE_COLUMN: usize = 9;

/// Open a VCF file, detecting gzip/bgzf compression from the extension.
fn open_vcf(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    let capacity = 256 * 1024;
    let gzipped = path
        .extension()
        .is_some_and(|ext| ext == "gz" || ext == "bgz");
    if gzipped {
        Ok(Box::new(BufReader::with_capacity(
            capacity,
            MultiGzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(capacity, file)))
    }
}

/// A VCF on disk. Every traversal re-opens the file.
#[derive(Debug, Clone)]
pub struct VcfSource {
    path: PathBuf,
    samples: Vec<String>,
}

impl VcfSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = open_vcf(&path)?;
        let (samples, _) = read_header(&mut reader)?;
        Ok(Self { path, samples })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VariantSource for VcfSource {
    fn sample_names(&self) -> &[String] {
        &self.samples
    }

    fn records(&self) -> Result<RecordIter<'_>> {
        let mut reader = open_vcf(&self.path)?;
        let (samples, line_number) = read_header(&mut reader)?;
        Ok(Box::new(VcfRecords {
            reader,
            num_samples: samples.len(),
            line_number,
            buf: String::new(),
            done: false,
        }))
    }
}

/// Consume header lines, returning the sample names and the number of lines read.
fn read_header(reader: &mut Box<dyn BufRead>) -> Result<(Vec<String>, usize)> {
    let mut line = String::new();
    let mut line_number = 0;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(SvTrainError::vcf(line_number, "missing #CHROM header line"));
        }
        line_number += 1;

        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.starts_with("##") {
            continue;
        }
        if let Some(columns) = trimmed.strip_prefix('#') {
            let samples = columns
                .split('\t')
                .skip(FIRST_SAMPLE_COLUMN)
                .map(str::to_string)
                .collect();
            return Ok((samples, line_number));
        }
        return Err(SvTrainError::vcf(
            line_number,
            "record found before #CHROM header line",
        ));
    }
}

struct VcfRecords {
    reader: Box<dyn BufRead>,
    num_samples: usize,
    line_number: usize,
    buf: String,
    done: bool,
}

impl Iterator for VcfRecords {
    type Item = Result<VariantRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
            self.line_number += 1;

            let line = self.buf.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }
            let parsed = parse_record(line, self.num_samples, self.line_number);
            if parsed.is_err() {
                self.done = true;
            }
            return Some(parsed);
        }
    }
}

fn parse_info(field: &str) -> HashMap<String, String> {
    if field == VCF_MISSING_VALUE {
        return HashMap::new();
    }
    field
        .split(';')
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (entry.to_string(), String::new()),
        })
        .collect()
}

fn parse_genotype(keys: &[&str], column: &str) -> Genotype {
    Genotype {
        attributes: keys
            .iter()
            .zip(column.split(':'))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    }
}

pub(crate) fn parse_record(line: &str, num_samples: usize, line_number: usize) -> Result<VariantRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MANDATORY_COLUMNS {
        return Err(SvTrainError::vcf(
            line_number,
            format!(
                "expected at least {} columns, found {}",
                MANDATORY_COLUMNS,
                fields.len()
            ),
        ));
    }

    let contig = fields[0];
    let start: u64 = fields[1]
        .parse()
        .map_err(|_| SvTrainError::vcf(line_number, format!("invalid POS '{}'", fields[1])))?;
    let id = fields[2];
    let ref_allele = fields[3];
    let info = parse_info(fields[7]);

    let sv_type = match info.get(SVTYPE_ATTRIBUTE) {
        Some(value) => SvType::from(value.as_str()),
        None => {
            return Err(SvTrainError::vcf(
                line_number,
                format!("record {} has no {} attribute", id, SVTYPE_ATTRIBUTE),
            ));
        }
    };

    let end = match info.get(END_ATTRIBUTE) {
        Some(value) => value.parse::<u64>().map_err(|_| {
            SvTrainError::vcf(line_number, format!("invalid {} '{}'", END_ATTRIBUTE, value))
        })?,
        None => start + (ref_allele.len().max(1) as u64) - 1,
    };

    let sample_columns = fields.get(FIRST_SAMPLE_COLUMN..).unwrap_or(&[]);
    if sample_columns.len() != num_samples {
        return Err(SvTrainError::vcf(
            line_number,
            format!(
                "expected {} sample columns, found {}",
                num_samples,
                sample_columns.len()
            ),
        ));
    }
    let keys: Vec<&str> = fields
        .get(MANDATORY_COLUMNS)
        .map(|format| format.split(':').collect())
        .unwrap_or_default();
    let genotypes = sample_columns
        .iter()
        .map(|column| parse_genotype(&keys, column))
        .collect();

    Ok(VariantRecord {
        id: id.to_string(),
        contig: contig.to_string(),
        start,
        end,
        sv_type,
        info,
        genotypes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    const HEADER: &str = "##fileformat=VCFv4.2\n\
        ##INFO=<ID=SVTYPE,Number=1,Type=String,Description=\"SV type\">\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n";

    #[fixture]
    fn vcf_file() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".vcf").tempfile().unwrap();
        write!(
            file,
            "{}chr1\t1000\tdel_1\tN\t<DEL>\t.\tPASS\tSVTYPE=DEL;SVLEN=500;END=1500;ALGORITHMS=manta\tGT:PE:SR1:SR2:NCN:CNLP\t0/1:5:2:1:2:0,10,30\t0/0:0:0:0:2:0,40,90\n\
             chr2\t200\tbnd_1\tA\tN]chr5:900]\t.\tPASS\tSVTYPE=BND;CHR2=chr5;IMPRECISE\tGT:PE\t0/1:7\t./.\n",
            HEADER
        )
        .unwrap();
        file
    }

    #[rstest]
    fn test_header_samples(vcf_file: NamedTempFile) {
        let source = VcfSource::open(vcf_file.path()).unwrap();
        assert_eq!(source.sample_names(), &["S1", "S2"]);
    }

    #[rstest]
    fn test_parse_records(vcf_file: NamedTempFile) {
        let source = VcfSource::open(vcf_file.path()).unwrap();
        let records: Vec<VariantRecord> = source.records().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);

        let del = &records[0];
        assert_eq!(del.id, "del_1");
        assert_eq!(del.sv_type, SvType::Del);
        assert_eq!((del.start, del.end), (1000, 1500));
        assert_eq!(del.attribute("SVLEN"), Some("500"));
        assert_eq!(del.genotypes[1].get("CNLP"), Some("0,40,90"));

        let bnd = &records[1];
        assert_eq!(bnd.sv_type, SvType::Bnd);
        assert_eq!(bnd.end, 200);
        assert_eq!(bnd.attribute("IMPRECISE"), Some(""));
        assert_eq!(bnd.genotypes[0].get("PE"), Some("7"));
        assert_eq!(bnd.genotypes[1].get("GT"), Some("./."));
        assert_eq!(bnd.genotypes[1].get("PE"), None);
    }

    #[rstest]
    fn test_traversals_are_repeatable(vcf_file: NamedTempFile) {
        let source = VcfSource::open(vcf_file.path()).unwrap();
        let first: Vec<_> = source.records().unwrap().map(|r| r.unwrap()).collect();
        let second: Vec<_> = source.records().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_gzipped_vcf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("calls.vcf.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        write!(
            encoder,
            "{}chr1\t10\tins_1\tA\t<INS>\t.\tPASS\tSVTYPE=INS\tPE\t1\t2\n",
            HEADER
        )
        .unwrap();
        encoder.finish().unwrap();

        let source = VcfSource::open(&path).unwrap();
        let records: Vec<_> = source.records().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sv_type, SvType::Ins);
    }

    #[rstest]
    #[case("CPX")]
    #[case("CTX")]
    fn test_unknown_svtype_is_kept_for_validation(#[case] name: &str) {
        let line = format!("chr1\t10\tx\tA\t<{0}>\t.\tPASS\tSVTYPE={0}\tPE\t1\t2", name);
        let record = parse_record(&line, 2, 7).unwrap();
        assert_eq!(record.sv_type, SvType::Other(name.to_string()));
    }

    #[rstest]
    #[case("chr1\t10\tx\tA\t<DEL>\t.\tPASS\tSVLEN=5\tPE\t1\t2", "no SVTYPE")]
    #[case("chr1\tten\tx\tA\t<DEL>\t.\tPASS\tSVTYPE=DEL\tPE\t1\t2", "invalid POS")]
    #[case("chr1\t10\tx\tA\t<DEL>\t.\tPASS\tSVTYPE=DEL\tPE\t1", "sample columns")]
    #[case("chr1\t10\tx\tA", "columns")]
    fn test_malformed_records(#[case] line: &str, #[case] message: &str) {
        let err = parse_record(line, 2, 7).unwrap_err();
        assert!(matches!(err, SvTrainError::VcfParse { line: 7, .. }));
        assert!(err.to_string().contains(message), "{}", err);
    }

    #[test]
    fn test_missing_header() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t10\tx\tA\t<DEL>\t.\tPASS\tSVTYPE=DEL").unwrap();
        let err = VcfSource::open(file.path()).unwrap_err();
        assert!(matches!(err, SvTrainError::VcfParse { line: 1, .. }));
    }
}
