use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use molscreen::{EvalReport, RunAccumulator};

#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
}

impl Context {
    pub fn detect() -> Self {
        Self {
            interactive: io::stderr().is_terminal(),
        }
    }

    pub fn with_quiet(self, quiet: bool) -> Self {
        if quiet {
            Self { interactive: false }
        } else {
            self
        }
    }
}

pub struct StepSpinner {
    bar: Option<ProgressBar>,
    step: u8,
    total_steps: u8,
    step_start: Instant,
}

impl StepSpinner {
    fn new(total_steps: u8) -> Self {
        Self {
            bar: None,
            step: 0,
            total_steps,
            step_start: Instant::now(),
        }
    }

    fn step(&mut self, description: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        self.step += 1;
        self.step_start = Instant::now();

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .expect("invalid template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!(
            "[{}/{}] {}...",
            self.step, self.total_steps, description
        ));

        self.bar = Some(bar);
    }

    fn complete_step(&mut self, description: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        let elapsed = self.step_start.elapsed();
        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
            description,
            elapsed.as_secs_f64()
        );
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

pub enum Progress {
    Interactive(StepSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        if interactive {
            Self::Interactive(StepSpinner::new(total_steps))
        } else {
            Self::Silent
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Self::Interactive(spinner) = self {
            spinner.step(description);
        }
    }

    pub fn complete_step(&mut self, description: &str) {
        if let Self::Interactive(spinner) = self {
            spinner.complete_step(description);
        }
    }

    pub fn finish(&mut self) {
        if let Self::Interactive(spinner) = self {
            spinner.finish();
        }
    }
}

const INNER_WIDTH: usize = 46;

pub fn print_report(report: &EvalReport, acc: &RunAccumulator) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let header = format!(
        "Evaluation Summary ({} samples)",
        report.n_samples
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  ┌─{}─┐", "─".repeat(INNER_WIDTH));
    let _ = writeln!(out, "  │ {:<w$} │", header, w = INNER_WIDTH);
    let _ = writeln!(out, "  ├─{}─┤", "─".repeat(INNER_WIDTH));

    for (name, value) in report.metrics() {
        let rendered = match value {
            Some(v) => format!("{:.4}", v),
            None => "None".to_string(),
        };
        let _ = writeln!(
            out,
            "  │ {:<30} {:>15} │",
            name,
            rendered
        );
    }

    if let Some(js) = report.atom_type_js {
        let _ = writeln!(out, "  │ {:<30} {:>15.4} │", "atom_type_js", js);
    }

    if !report.ring_ratios.is_empty() {
        let _ = writeln!(out, "  ├─{}─┤", "─".repeat(INNER_WIDTH));
        for (size, ratio) in &report.ring_ratios {
            let label = format!("ring size {}", size);
            let _ = writeln!(out, "  │ {:<30} {:>15.3} │", label, ratio);
        }
    }

    let _ = writeln!(out, "  ├─{}─┤", "─".repeat(INNER_WIDTH));
    let counts = format!(
        "recon {} · complete {} · eval {}",
        acc.n_recon_success, acc.n_complete, acc.n_eval_success
    );
    let _ = writeln!(out, "  │ {:<w$} │", counts, w = INNER_WIDTH);
    let _ = writeln!(out, "  └─{}─┘", "─".repeat(INNER_WIDTH));
    let _ = writeln!(out);
}

#[rustfmt::skip]
pub fn print_error(err: &anyhow::Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "  ✗ Error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "    caused by: {}", cause);
        source = cause.source();
    }
    let _ = writeln!(stderr);
}
