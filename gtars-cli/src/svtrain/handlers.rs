use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use tracing::info;

use gtars_svtrain::{PythonLauncher, TrainingArgs, WorkerSettings, train_from_vcf};

/// Defaults, then the `--config` file, then any flag given on the command line.
fn training_args(matches: &ArgMatches) -> Result<TrainingArgs> {
    let mut args = match matches.get_one::<String>("config") {
        Some(path) => TrainingArgs::from_yaml_file(path)?,
        None => TrainingArgs::default(),
    };

    if let Some(v) = matches.get_one::<String>("coverage-file") {
        args.coverage_file = PathBuf::from(v);
    }
    if let Some(v) = matches.get_one::<String>("output-name") {
        args.output_name = v.clone();
    }
    if let Some(v) = matches.get_one::<String>("output-dir") {
        args.output_dir = PathBuf::from(v);
    }
    if let Some(v) = matches.get_one::<String>("device") {
        args.device = v.clone();
    }
    if let Some(v) = matches.get_one::<i64>("random-seed") {
        args.random_seed = *v;
    }

    let integers: [(&str, &mut u32); 4] = [
        ("num-states", &mut args.num_states),
        ("read-length", &mut args.read_length),
        ("max-iter", &mut args.max_iter),
        ("iter-log-freq", &mut args.iter_log_freq),
    ];
    for (name, field) in integers {
        if let Some(v) = matches.get_one::<u32>(name) {
            *field = *v;
        }
    }

    let floats: [(&str, &mut f64); 12] = [
        ("depth-dilution-factor", &mut args.depth_dilution_factor),
        ("eps-pe", &mut args.eps_pe),
        ("eps-sr1", &mut args.eps_sr1),
        ("eps-sr2", &mut args.eps_sr2),
        ("phi-pe", &mut args.phi_pe),
        ("phi-sr1", &mut args.phi_sr1),
        ("phi-sr2", &mut args.phi_sr2),
        ("lr-decay", &mut args.lr_decay),
        ("lr-min", &mut args.lr_min),
        ("lr-init", &mut args.lr_init),
        ("adam-beta1", &mut args.adam_beta1),
        ("adam-beta2", &mut args.adam_beta2),
    ];
    for (name, field) in floats {
        if let Some(v) = matches.get_one::<f64>(name) {
            *field = *v;
        }
    }

    if matches.get_flag("jit") {
        args.jit = true;
    }

    Ok(args)
}

pub fn run_svtrain(matches: &ArgMatches) -> Result<()> {
    let variant = matches
        .get_one::<String>("variant")
        .context("A path to a variant file is required.")?;
    let variant = PathBuf::from(variant);

    let args = training_args(matches)?;

    let mut settings = WorkerSettings::default();
    if let Some(python) = matches.get_one::<String>("python") {
        settings.python_executable = python.clone();
    }
    if matches.get_flag("enable-journal") {
        settings.journal = Some(WorkerSettings::journal_path(&args));
    }

    let launcher = PythonLauncher::new(settings.clone());
    let summary = train_from_vcf(&variant, args, settings, launcher)
        .with_context(|| format!("Training failed for {}", variant.display()))?;

    match &summary.sv_type {
        Some(sv_type) if summary.trained => info!(
            "Trained on {} {} variants from {}",
            summary.num_records,
            sv_type,
            variant.display()
        ),
        _ => info!("No variants found in {}; nothing to train", variant.display()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svtrain::cli::create_svtrain_cli;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn parse(argv: &[&str]) -> ArgMatches {
        let mut full = vec!["svtrain", "-V", "del.vcf"];
        full.extend_from_slice(argv);
        create_svtrain_cli().try_get_matches_from(full).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let args = training_args(&parse(&[])).unwrap();
        assert_eq!(args, TrainingArgs::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("train.yaml");
        std::fs::write(
            &config,
            "output_name: from_file\nmax_iter: 500\neps_pe: 0.5\ndevice: cuda\n",
        )
        .unwrap();

        let args = training_args(&parse(&[
            "--config",
            config.to_str().unwrap(),
            "--max-iter",
            "20",
            "--phi-sr2",
            "0.25",
        ]))
        .unwrap();

        assert_eq!(args.output_name, "from_file");
        assert_eq!(args.device, "cuda");
        assert_eq!(args.eps_pe, 0.5);
        assert_eq!(args.max_iter, 20);
        assert_eq!(args.phi_sr2, 0.25);
        assert_eq!(args.read_length, TrainingArgs::default().read_length);
    }

    #[test]
    fn test_unknown_config_key_is_rejected() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("train.yaml");
        std::fs::write(&config, "learning_rate: 0.1\n").unwrap();

        assert!(training_args(&parse(&["--config", config.to_str().unwrap()])).is_err());
    }
}
