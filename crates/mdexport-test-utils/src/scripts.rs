//! Shell scripts that stand in for a real converter.
//!
//! The script is run as `/bin/sh <script> <args...>` rather than executed
//! directly, so tests never exec a file that was just written. Configure the
//! converter with [`FakeConverter::executable`] as its path and
//! [`FakeConverter::args`] as its extra arguments; the converter then
//! appends its usual `-i <input> -o <output>`.

use std::fs;
use std::path::{Path, PathBuf};

/// Contents written by a succeeding fake converter
pub const FAKE_PDF: &str = "%PDF-1.4 fake\n";

/// What the fake converter does when run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeBehavior {
    /// Write [`FAKE_PDF`] to the `-o` path and exit 0
    Succeed,
    /// Print `stderr` and exit with `code`
    Fail { code: i32, stderr: String },
    /// Exit 0 without writing anything
    Silent,
    /// Sleep far longer than any test timeout
    Hang,
}

/// A converter script on disk
#[derive(Debug, Clone)]
pub struct FakeConverter {
    script: PathBuf,
    log: PathBuf,
}

impl FakeConverter {
    /// Write a fake converter script named `name` into `dir`.
    ///
    /// Every invocation appends its arguments, one per line, to
    /// [`FakeConverter::log`].
    pub fn create(dir: &Path, name: &str, behavior: FakeBehavior) -> Self {
        fs::create_dir_all(dir).unwrap();
        let script = dir.join(format!("{name}.sh"));
        let log = dir.join(format!("{name}.log"));

        let action = match &behavior {
            FakeBehavior::Succeed => {
                format!("printf '%s\\n' '{}' > \"$out\"\nexit 0", FAKE_PDF.trim_end())
            }
            FakeBehavior::Fail { code, stderr } => {
                format!("printf '%s\\n' '{stderr}' >&2\nexit {code}")
            }
            FakeBehavior::Silent => "exit 0".to_string(),
            FakeBehavior::Hang => "exec sleep 30".to_string(),
        };

        let body = format!(
            r#"#!/bin/sh
printf '%s\n' "$@" >> '{log}'
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
{action}
"#,
            log = log.display(),
        );
        fs::write(&script, body).unwrap();
        Self { script, log }
    }

    /// Executable to configure as the converter path.
    pub fn executable(&self) -> String {
        "/bin/sh".to_string()
    }

    /// Extra arguments to configure, so the shell runs the script.
    pub fn args(&self) -> Vec<String> {
        vec![self.script.display().to_string()]
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Log of received arguments.
    pub fn log(&self) -> &Path {
        &self.log
    }

    /// Arguments of every invocation so far, flattened, without the script path.
    pub fn received_args(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Number of times the converter was run.
    pub fn invocations(&self) -> usize {
        self.received_args().iter().filter(|a| *a == "-o").count()
    }
}
