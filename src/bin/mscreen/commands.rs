use std::fs;
use std::time::Duration;

use anyhow::{Context as AnyhowContext, Result, bail};

use molscreen::io::{artifacts, reference, samples};
use molscreen::{evaluate, BondingRules, DockingConfig, EvalConfig};

use crate::cli::{Command, EvalArgs};
use crate::display::{Context, Progress, print_report};

const TOTAL_STEPS: u8 = 3;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Eval(args) => run_eval(args, ctx),
    }
}

fn run_eval(args: EvalArgs, ctx: Context) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Loading inputs");
    let sample_set = samples::read_samples(&args.io.input)
        .with_context(|| format!("reading sample set {}", args.io.input.display()))?;
    let reference_profile = reference::load_reference(args.io.reference.as_deref())
        .context("loading reference profile")?;
    let rules = match &args.pipeline.rules {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading bonding rules {}", path.display()))?;
            BondingRules::from_toml(&text)
                .with_context(|| format!("parsing bonding rules {}", path.display()))?
        }
        None => BondingRules::default_rules().clone(),
    };
    progress.complete_step(&format!(
        "Loaded {} samples (reference {})",
        sample_set.samples.len(),
        reference_profile.version
    ));

    let ligand_id = args
        .docking
        .ligand
        .clone()
        .or_else(|| sample_set.ligand_filename.clone());

    let docking = args.docking.mode.to_mode().map(|mode| DockingConfig {
        program: args.docking.program.clone(),
        receptor_root: args.docking.receptor_root.clone(),
        mode,
        exhaustiveness: args.docking.exhaustiveness,
        timeout: Duration::from_secs(args.docking.timeout),
    });
    if docking.is_some() && ligand_id.is_none() {
        bail!(
            "docking requested but no ligand id available; pass --ligand or \
             use a sample set with a ligand_filename"
        );
    }

    let mut config = EvalConfig::new(reference_profile);
    config.encoding = args.pipeline.atom_encoding.into();
    config.rules = rules;
    config.docking = docking;
    config.success_stats = args.pipeline.success_stats.into();
    config.ligand_id = ligand_id;

    progress.step("Evaluating samples");
    let run = evaluate(&sample_set.samples, &config).context("evaluation failed")?;
    progress.complete_step(&format!(
        "Evaluated {} samples ({} complete)",
        run.accumulator.n_samples, run.accumulator.n_complete
    ));

    progress.step("Writing results");
    let mut written: Vec<String> = Vec::new();
    if let Some(out_dir) = &args.io.out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("creating output directory {}", out_dir.display()))?;
        let report_path = out_dir.join("report.json");
        artifacts::write_report(&report_path, &run.report)
            .with_context(|| format!("writing {}", report_path.display()))?;
        written.push(report_path.display().to_string());

        if args.io.save_histograms {
            let n = artifacts::write_histograms(out_dir, &run.accumulator, &config.reference)
                .context("writing histograms")?;
            written.push(format!("{} histograms", n));
        }
    }
    progress.complete_step(&if written.is_empty() {
        "Nothing to write (no --out-dir)".to_string()
    } else {
        format!("Wrote {}", written.join(", "))
    });
    progress.finish();

    if ctx.interactive {
        print_report(&run.report, &run.accumulator);
    } else if !args.io.quiet {
        // Plain key/value lines for scripting.
        for (name, value) in run.report.metrics() {
            match value {
                Some(v) => println!("{}\t{:.6}", name, v),
                None => println!("{}\tNone", name),
            }
        }
    }

    Ok(())
}
