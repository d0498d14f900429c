//! Out-of-process docking scorer integration.
//!
//! The scorer is a black box: the reconstructed ligand is written to a
//! scratch SDF file, the configured executable is invoked once per
//! requested scoring mode, and the reported affinity is parsed from its
//! standard output. Every invocation is time-boxed; a timeout kills the
//! child and surfaces as a recoverable docking failure.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use log::debug;

use super::error::Error;
use crate::chem::Molecule;
use crate::io::sdf;

/// Scoring mode requested from the docking backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockingMode {
    /// Score the pose as generated.
    ScoreOnly,
    /// Local minimization, then score.
    Minimize,
    /// Full redocking search.
    Dock,
}

impl DockingMode {
    fn flag(&self) -> Option<&'static str> {
        match self {
            DockingMode::ScoreOnly => Some("--score_only"),
            DockingMode::Minimize => Some("--local_only"),
            DockingMode::Dock => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DockingConfig {
    /// Docking executable.
    pub program: PathBuf,
    /// Directory holding receptor structures, addressed by ligand id.
    pub receptor_root: PathBuf,
    pub mode: DockingMode,
    pub exhaustiveness: u32,
    pub timeout: Duration,
}

/// Scores returned by a docking run. `minimize` and `dock` are populated
/// for the deeper modes only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockingScores {
    pub score_only: f64,
    pub minimize: Option<f64>,
    pub dock: Option<f64>,
}

/// Runs the configured docking backend for one molecule.
///
/// `ligand_id` names the reference ligand whose receptor is used; the
/// receptor path is `<receptor_root>/<ligand_id>` with the extension
/// replaced by `.pdbqt`. The deeper modes score first, matching the
/// original evaluation order.
pub fn run_docking(
    mol: &Molecule,
    ligand_id: &str,
    config: &DockingConfig,
) -> Result<DockingScores, Error> {
    let receptor = config
        .receptor_root
        .join(Path::new(ligand_id).with_extension("pdbqt"));

    let scratch = tempfile::tempdir()
        .map_err(|e| Error::docking(format!("scratch dir creation failed: {}", e)))?;
    let ligand_path = scratch.path().join("ligand.sdf");
    let file = std::fs::File::create(&ligand_path)
        .map_err(|e| Error::docking(format!("ligand write failed: {}", e)))?;
    sdf::write(file, mol).map_err(|e| Error::docking(format!("ligand write failed: {}", e)))?;

    let score_only = invoke(config, &receptor, &ligand_path, DockingMode::ScoreOnly)?;
    let minimize = match config.mode {
        DockingMode::Minimize | DockingMode::Dock => {
            Some(invoke(config, &receptor, &ligand_path, DockingMode::Minimize)?)
        }
        DockingMode::ScoreOnly => None,
    };
    let dock = match config.mode {
        DockingMode::Dock => Some(invoke(config, &receptor, &ligand_path, DockingMode::Dock)?),
        _ => None,
    };

    Ok(DockingScores {
        score_only,
        minimize,
        dock,
    })
}

fn invoke(
    config: &DockingConfig,
    receptor: &Path,
    ligand: &Path,
    mode: DockingMode,
) -> Result<f64, Error> {
    let mut command = Command::new(&config.program);
    command
        .arg("--receptor")
        .arg(receptor)
        .arg("--ligand")
        .arg(ligand)
        .arg("--exhaustiveness")
        .arg(config.exhaustiveness.to_string())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if let Some(flag) = mode.flag() {
        command.arg(flag);
    }

    debug!(
        "invoking docking backend {:?} ({:?} mode)",
        config.program, mode
    );
    let child = command
        .spawn()
        .map_err(|e| Error::docking(format!("failed to spawn {:?}: {}", config.program, e)))?;
    let stdout = wait_with_timeout(child, config.timeout)?;

    parse_affinity(&stdout).ok_or_else(|| {
        Error::docking(format!(
            "no affinity found in docking output ({} bytes)",
            stdout.len()
        ))
    })
}

/// Polls the child until it exits or the deadline passes; on timeout the
/// child is killed and the call fails. Stdout is drained on a helper
/// thread so a chatty backend cannot block on a full pipe.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<String, Error> {
    let pipe = child.stdout.take();
    let reader = std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    });

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = reader.join().unwrap_or_default();
                if !status.success() {
                    return Err(Error::docking(format!(
                        "docking backend exited with {}",
                        status
                    )));
                }
                return Ok(stdout);
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::docking(format!(
                        "docking backend timed out after {:.0?}",
                        timeout
                    )));
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                return Err(Error::docking(format!("wait on docking backend: {}", e)));
            }
        }
    }
}

/// Extracts the affinity from backend output.
///
/// Accepts the `Affinity: <value> (kcal/mol)` line as well as the first row
/// of a Vina-style result table (`   1   -7.2   0.000   0.000`).
fn parse_affinity(output: &str) -> Option<f64> {
    for line in output.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("Affinity:") {
            if let Some(token) = rest.split_whitespace().next() {
                if let Ok(value) = token.parse::<f64>() {
                    return Some(value);
                }
            }
        }
    }
    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        if let (Some(first), Some(second)) = (tokens.next(), tokens.next()) {
            if first == "1" {
                if let Ok(value) = second.parse::<f64>() {
                    return Some(value);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn parses_affinity_line() {
        let output = "Detected 8 CPUs\nAffinity: -7.31 (kcal/mol)\n";
        assert!(approx_eq(parse_affinity(output).unwrap(), -7.31, 1e-12));
    }

    #[test]
    fn parses_result_table_row() {
        let output = "mode |   affinity | dist\n-----+------------+-----\n   1       -6.80      0.000\n   2       -6.10      1.2\n";
        assert!(approx_eq(parse_affinity(output).unwrap(), -6.80, 1e-12));
    }

    #[test]
    fn affinity_line_wins_over_table() {
        let output = "Affinity: -5.5 (kcal/mol)\n   1   -9.9   0.0\n";
        assert!(approx_eq(parse_affinity(output).unwrap(), -5.5, 1e-12));
    }

    #[test]
    fn missing_affinity_is_none() {
        assert_eq!(parse_affinity("nothing to see here\n"), None);
    }

    #[test]
    fn spawn_failure_is_a_docking_error() {
        use crate::chem::{fixtures, sanitize};

        let mol = sanitize(fixtures::ethanol()).unwrap();
        let config = DockingConfig {
            program: PathBuf::from("/nonexistent/docking-backend"),
            receptor_root: PathBuf::from("/tmp"),
            mode: DockingMode::ScoreOnly,
            exhaustiveness: 8,
            timeout: Duration::from_secs(1),
        };
        let err = run_docking(&mol, "target/ligand.sdf", &config).unwrap_err();
        assert!(matches!(err, Error::Docking(_)));
    }
}
