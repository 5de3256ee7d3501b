//! Refreshing the rate table from outside the process.
//!
//! The rates file is produced by an external fetch script. The front ends only
//! see the `RateRefresher` capability: call `refresh`, get a brand-new table
//! (or an error, in which case the old table stays in use).
use std::fs;
use std::path::{self, Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::SystemTime;

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::error::ConverterError;
use crate::rates::RateTable;
use crate::result::Result;

/// Interpreter used to run the fetch script when none is configured.
pub const DEFAULT_INTERPRETER: &str = "python";
/// Fetch script name used when none is configured.
pub const DEFAULT_SCRIPT: &str = "fetch_currency_rates.py";

/// Produces a fresh `RateTable` on demand.
pub trait RateRefresher {
    /// Obtains a new table. The caller decides whether to swap it in.
    fn refresh(&self) -> Result<RateTable>;
}

/// Re-reads the rates file, for when something else already updated it.
#[derive(Debug, Clone)]
pub struct FileRefresher {
    rates_path: PathBuf,
}

impl FileRefresher {
    /// Creates a refresher that reloads `rates_path`.
    pub fn new<P: Into<PathBuf>>(rates_path: P) -> Self {
        Self {
            rates_path: rates_path.into(),
        }
    }
}

impl RateRefresher for FileRefresher {
    fn refresh(&self) -> Result<RateTable> {
        RateTable::load_file(&self.rates_path)
    }
}

/// Runs the external fetch script, then reloads the rates file it wrote.
///
/// The command line is `<interpreter> <script> [<YYYY-MM-DD>]`. Fetch scripts
/// write their output into the current directory, so unless a working
/// directory is set the script runs from the directory holding the rates file.
#[derive(Debug, Clone)]
pub struct ScriptRefresher {
    interpreter: String,
    script: PathBuf,
    rates_path: PathBuf,
    working_dir: Option<PathBuf>,
    date: Option<NaiveDate>,
}

impl ScriptRefresher {
    /// Creates a refresher running `script` with the default interpreter.
    pub fn new<S: Into<PathBuf>, P: Into<PathBuf>>(script: S, rates_path: P) -> Self {
        Self {
            interpreter: String::from(DEFAULT_INTERPRETER),
            script: script.into(),
            rates_path: rates_path.into(),
            working_dir: None,
            date: None,
        }
    }

    /// Uses `interpreter` instead of `python`.
    pub fn with_interpreter(mut self, interpreter: &str) -> Self {
        self.interpreter = String::from(interpreter);
        self
    }

    /// Runs the script from `dir` instead of the rates file's directory.
    pub fn with_working_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Passes `date` to the script as its only argument.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Path of the rates file reloaded after the script succeeds.
    pub fn rates_path(&self) -> &Path {
        &self.rates_path
    }

    /// Directory the script runs in: the configured one, else the rates file's parent.
    fn script_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref().or_else(|| {
            self.rates_path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
        })
    }

    fn command(&self) -> Result<Command> {
        let mut cmd = Command::new(&self.interpreter);
        match self.script_dir() {
            Some(dir) => {
                // The script path was given relative to our own directory.
                cmd.arg(path::absolute(&self.script)?);
                cmd.current_dir(dir);
            }
            None => {
                cmd.arg(&self.script);
            }
        }
        if let Some(date) = self.date {
            cmd.arg(date.format("%Y-%m-%d").to_string());
        }
        cmd.stdin(Stdio::null());
        Ok(cmd)
    }

    fn rates_modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.rates_path)
            .and_then(|meta| meta.modified())
            .ok()
    }
}

impl RateRefresher for ScriptRefresher {
    fn refresh(&self) -> Result<RateTable> {
        info!(
            "Running {} {} to refresh currency rates",
            self.interpreter,
            self.script.display()
        );
        let before = self.rates_modified();
        let output = self.command()?.output().map_err(|e| {
            ConverterError::Refresh(format!(
                "failed to start {} {}: {}",
                self.interpreter,
                self.script.display(),
                e
            ))
        })?;
        debug!(
            "Refresh script stdout: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| String::from("signal"));
            return Err(ConverterError::Refresh(format!(
                "script exited with {}: {}",
                code,
                stderr.trim()
            )));
        }

        if before.is_some() && before == self.rates_modified() {
            warn!(
                "{} was not rewritten by the refresh script; rates may be stale",
                self.rates_path.display()
            );
        }

        let table = RateTable::load_file(&self.rates_path)?;
        info!("Currency rates refreshed: {} entries", table.len());
        Ok(table)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fetch.sh");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn script_success_reloads_rates_file() {
        let dir = TempDir::new().unwrap();
        let script = write_script(
            &dir,
            "printf '{\"rates\": {\"USD\": 1, \"EUR\": 0.5}}' > rates.json\n",
        );
        let refresher = ScriptRefresher::new(script, dir.path().join("rates.json"))
            .with_interpreter("sh")
            .with_working_dir(dir.path());

        let table = refresher.refresh().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rate("EUR"), Some(0.5));
    }

    #[test]
    fn script_receives_date_argument() {
        let dir = TempDir::new().unwrap();
        let script = write_script(
            &dir,
            "printf '{\"rates\": {\"D%s\": 1}}' \"$(echo $1 | sed 's/-//g')\" > rates.json\n",
        );
        let date = NaiveDate::from_ymd_opt(2023, 10, 5).unwrap();
        let refresher = ScriptRefresher::new(script, dir.path().join("rates.json"))
            .with_interpreter("sh")
            .with_working_dir(dir.path())
            .with_date(date);

        let table = refresher.refresh().unwrap();
        assert!(table.contains("D20231005"));
    }

    #[test]
    fn script_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "echo 'no network' >&2\nexit 3\n");
        let refresher = ScriptRefresher::new(script, dir.path().join("rates.json"))
            .with_interpreter("sh")
            .with_working_dir(dir.path());

        let err = refresher.refresh().unwrap_err();
        match err {
            ConverterError::Refresh(msg) => {
                assert!(msg.contains("3"), "{msg}");
                assert!(msg.contains("no network"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn script_runs_next_to_rates_file_by_default() {
        let dir = TempDir::new().unwrap();
        let rates_dir = dir.path().join("data");
        fs::create_dir(&rates_dir).unwrap();
        let rates_path = rates_dir.join("rates.json");
        fs::write(&rates_path, r#"{"rates": {"USD": 1}}"#).unwrap();
        let script = write_script(
            &dir,
            "printf '{\"rates\": {\"USD\": 1, \"GBP\": 0.8}}' > rates.json\n",
        );
        let refresher = ScriptRefresher::new(script, &rates_path).with_interpreter("sh");

        let table = refresher.refresh().unwrap();
        assert_eq!(table.rate("GBP"), Some(0.8));
        assert!(!dir.path().join("rates.json").exists());
    }

    #[test]
    fn missing_interpreter_is_reported() {
        let dir = TempDir::new().unwrap();
        let refresher = ScriptRefresher::new("fetch.py", dir.path().join("rates.json"))
            .with_interpreter("definitely-not-an-interpreter-7f3a");
        assert!(matches!(refresher.refresh(), Err(ConverterError::Refresh(_))));
    }

    #[test]
    fn file_refresher_reads_current_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rates.json");
        fs::write(&path, r#"{"rates": {"USD": 1}}"#).unwrap();
        let refresher = FileRefresher::new(&path);
        assert_eq!(refresher.refresh().unwrap().len(), 1);

        fs::write(&path, r#"{"rates": {"USD": 1, "EUR": 0.9}}"#).unwrap();
        assert_eq!(refresher.refresh().unwrap().len(), 2);
    }
}
