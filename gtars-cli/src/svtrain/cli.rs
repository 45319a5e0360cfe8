use clap::{Arg, ArgAction, Command, arg, value_parser};

pub use gtars_svtrain::consts::SVTRAIN_CMD;

pub fn create_svtrain_cli() -> Command {
    Command::new(SVTRAIN_CMD)
        .author("Databio")
        .about("Train the SV genotyper model on the evidence in a single-type VCF.")
        .arg(
            arg!(-V --variant <variant> "Input VCF (plain or gzipped) holding variants of a single type")
                .required(true),
        )
        .arg(arg!(--config <config> "YAML file of training arguments; flags override its values"))
        .arg(arg!(--"coverage-file" <coverage_file> "Table of sample mean coverage"))
        .arg(arg!(--"output-name" <output_name> "Output base name"))
        .arg(arg!(--"output-dir" <output_dir> "Output directory"))
        .arg(arg!(--device <device> "Device for Torch backend (e.g. \"cpu\", \"cuda\")"))
        .arg(
            arg!(--"random-seed" <random_seed> "PRNG seed")
                .value_parser(value_parser!(i64)),
        )
        .arg(
            arg!(--"num-states" <num_states> "Max number of genotype states; 0 lets the model decide")
                .value_parser(value_parser!(u32)),
        )
        .arg(float_arg("depth-dilution-factor", "Dilution factor for depth posteriors"))
        .arg(float_arg("eps-pe", "Mean of discordant pair noise"))
        .arg(float_arg("eps-sr1", "Mean of split read noise (start)"))
        .arg(float_arg("eps-sr2", "Mean of split read noise (end)"))
        .arg(float_arg("phi-pe", "Variance of discordant pair bias"))
        .arg(float_arg("phi-sr1", "Variance of split read bias (start)"))
        .arg(float_arg("phi-sr2", "Variance of split read bias (end)"))
        .arg(
            arg!(--"read-length" <read_length> "Read length")
                .value_parser(value_parser!(u32)),
        )
        .arg(float_arg("lr-decay", "Learning rate decay constant (lower is faster)"))
        .arg(float_arg("lr-min", "Minimum learning rate"))
        .arg(float_arg("lr-init", "Initial learning rate"))
        .arg(float_arg("adam-beta1", "ADAM beta1 constant"))
        .arg(float_arg("adam-beta2", "ADAM beta2 constant"))
        .arg(
            arg!(--"max-iter" <max_iter> "Max number of training iterations")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--"iter-log-freq" <iter_log_freq> "Number of iterations between log messages")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--jit "Enable JIT compilation")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("python")
                .long("python")
                .hide(true)
                .help("Interpreter used to run the training worker"),
        )
        .arg(
            Arg::new("enable-journal")
                .long("enable-journal")
                .hide(true)
                .action(ArgAction::SetTrue)
                .help("Record worker traffic next to the output files"),
        )
}

fn float_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(value_parser!(f64))
}
