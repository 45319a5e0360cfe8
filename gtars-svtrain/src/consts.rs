pub const SVTRAIN_CMD: &str = "svtrain";

// batch line layout
pub const DATA_VALUE_SEPARATOR: &str = ";";
pub const DATA_TYPE_SEPARATOR: &str = "\t";
pub const LINE_TERMINATOR: &str = "\n";

/// Length reported for breakends joining two different contigs.
pub const INTERCHROMOSOMAL_LENGTH: i32 = i32::MAX;

// INFO keys
pub const SVTYPE_ATTRIBUTE: &str = "SVTYPE";
pub const SVLEN_ATTRIBUTE: &str = "SVLEN";
pub const END_ATTRIBUTE: &str = "END";
pub const CONTIG2_ATTRIBUTE: &str = "CHR2";
pub const ALGORITHMS_ATTRIBUTE: &str = "ALGORITHMS";
pub const DEPTH_ALGORITHM: &str = "depth";

// FORMAT keys
pub const DISCORDANT_PAIR_COUNT_ATTRIBUTE: &str = "PE";
pub const START_SPLIT_READ_COUNT_ATTRIBUTE: &str = "SR1";
pub const END_SPLIT_READ_COUNT_ATTRIBUTE: &str = "SR2";
pub const NEUTRAL_COPY_NUMBER_KEY: &str = "NCN";
pub const COPY_NUMBER_LOG_POSTERIORS_KEY: &str = "CNLP";

/// Per-sample attributes sent to the worker, in column order.
pub const FORMAT_FIELDS: [&str; 5] = [
    DISCORDANT_PAIR_COUNT_ATTRIBUTE,
    START_SPLIT_READ_COUNT_ATTRIBUTE,
    END_SPLIT_READ_COUNT_ATTRIBUTE,
    NEUTRAL_COPY_NUMBER_KEY,
    COPY_NUMBER_LOG_POSTERIORS_KEY,
];

pub const VCF_MISSING_VALUE: &str = ".";

// worker
pub const DEFAULT_PYTHON_EXECUTABLE: &str = "python3";
pub const WORKER_MODULE: &str = "svgenotyper";
pub const WORKER_ENTRYPOINT: &str = "svgenotyper.train";
pub const ACK_SUCCESS: &str = "ack";
pub const ACK_FAILURE_PREFIX: &str = "nck";
pub const JOURNAL_SUFFIX: &str = ".journal.txt";
pub const SAMPLES_FILE_SUFFIX: &str = ".samples";
pub const TEMP_FILE_EXTENSION: &str = ".tmp";

// training defaults
pub const DEFAULT_DEVICE: &str = "cpu";
pub const DEFAULT_RANDOM_SEED: i64 = 92837488;
pub const DEFAULT_NUM_STATES: u32 = 0;
pub const DEFAULT_DEPTH_DILUTION_FACTOR: f64 = 1e-6;
pub const DEFAULT_EPS_PE: f64 = 0.01;
pub const DEFAULT_EPS_SR1: f64 = 0.01;
pub const DEFAULT_EPS_SR2: f64 = 0.01;
pub const DEFAULT_PHI_PE: f64 = 0.1;
pub const DEFAULT_PHI_SR1: f64 = 0.1;
pub const DEFAULT_PHI_SR2: f64 = 0.1;
pub const DEFAULT_READ_LENGTH: u32 = 150;
pub const DEFAULT_LR_DECAY: f64 = 1000.0;
pub const DEFAULT_LR_MIN: f64 = 1e-3;
pub const DEFAULT_LR_INIT: f64 = 0.01;
pub const DEFAULT_ADAM_BETA1: f64 = 0.9;
pub const DEFAULT_ADAM_BETA2: f64 = 0.999;
pub const DEFAULT_MAX_ITER: u32 = 2000;
pub const DEFAULT_ITER_LOG_FREQ: u32 = 50;
