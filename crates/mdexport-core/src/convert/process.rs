//! Subprocess-backed converter
//!
//! Runs the converter as a child process with captured output and a
//! wall-clock limit. The child writes to a staging file next to the final
//! output; only a non-empty staging file is renamed into place, so a
//! converter that exits zero without writing anything cannot be mistaken
//! for success because of a document left over from an earlier run.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};

use super::{ConversionError, Converter, Invocation};
use crate::config::ConverterChoice;

/// Converter that spawns the configured executable.
pub struct ProcessConverter {
    runtime: Runtime,
    timeout: Duration,
}

impl ProcessConverter {
    /// Create a converter that kills the child after `timeout`.
    pub fn new(timeout: Duration) -> crate::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn execute(&self, program: &Path, args: &[OsString]) -> std::io::Result<Option<Output>> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping the output future on timeout drops the child, which kills it
        match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }
}

impl std::fmt::Debug for ProcessConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessConverter")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Converter for ProcessConverter {
    fn render(
        &self,
        markdown: &Path,
        output: &Path,
        choice: &ConverterChoice,
    ) -> Result<(), ConversionError> {
        let converter = choice.kind();
        let program =
            which::which(choice.executable()).map_err(|_| ConversionError::ExecutableNotFound {
                converter,
                executable: choice.executable().to_string(),
            })?;

        mdexport_fs::io::ensure_parent(output).map_err(|e| match e {
            mdexport_fs::Error::Io { path, source } => ConversionError::Io { path, source },
            other => ConversionError::Io {
                path: output.to_path_buf(),
                source: std::io::Error::other(other.to_string()),
            },
        })?;

        let staging = staging_path(output);
        let invocation = Invocation::build(choice, markdown, &staging);
        tracing::debug!(command = %invocation.display(), "Running converter");

        let result = self.runtime.block_on(self.execute(&program, &invocation.args));
        let finished = match result {
            Ok(Some(out)) => out,
            Ok(None) => {
                discard(&staging);
                tracing::error!(
                    input = %markdown.display(),
                    timeout_secs = self.timeout.as_secs(),
                    "Converter timed out"
                );
                return Err(ConversionError::Timeout {
                    converter,
                    timeout: self.timeout,
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConversionError::ExecutableNotFound {
                    converter,
                    executable: program.display().to_string(),
                });
            }
            Err(source) => {
                discard(&staging);
                return Err(ConversionError::Io {
                    path: program,
                    source,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&finished.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&finished.stderr).trim().to_string();

        if !finished.status.success() {
            discard(&staging);
            let code = finished.status.code().unwrap_or(-1);
            tracing::error!(input = %markdown.display(), code, stderr = %stderr, "Converter failed");
            return Err(ConversionError::NonZeroExit {
                converter,
                code,
                stderr,
            });
        }

        if !stdout.is_empty() {
            tracing::debug!(input = %markdown.display(), "{converter} stdout: {stdout}");
        }
        if !stderr.is_empty() {
            tracing::debug!(input = %markdown.display(), "{converter} stderr: {stderr}");
        }

        match mdexport_fs::io::file_len(&staging) {
            Some(len) if len > 0 => {}
            _ => {
                discard(&staging);
                return Err(ConversionError::NoOutputProduced {
                    converter,
                    path: output.to_path_buf(),
                    stderr,
                });
            }
        }

        fs::rename(&staging, output).map_err(|source| {
            discard(&staging);
            ConversionError::Io {
                path: output.to_path_buf(),
                source,
            }
        })?;
        Ok(())
    }
}

/// Hidden sibling of `output` with the same extension, so converters that
/// infer the format from the output name still see `.pdf`.
fn staging_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(ext) => format!(".{stem}.{}.partial.{}", std::process::id(), ext.to_string_lossy()),
        None => format!(".{stem}.{}.partial", std::process::id()),
    };
    output.with_file_name(name)
}

/// Whether `path` names a staging file as produced by [`staging_path`].
///
/// Such files only outlive a render when the process was killed mid-run.
pub(crate) fn is_staging_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let Some(rest) = name.strip_prefix('.') else {
        return false;
    };
    let Some((base, extension)) = rest.rsplit_once(".partial") else {
        return false;
    };
    let extension_ok = extension.is_empty()
        || extension
            .strip_prefix('.')
            .is_some_and(|ext| !ext.is_empty() && !ext.contains('.'));
    let pid_ok = base
        .rsplit_once('.')
        .is_some_and(|(_, pid)| !pid.is_empty() && pid.bytes().all(|b| b.is_ascii_digit()));
    extension_ok && pid_ok
}

fn discard(staging: &Path) {
    if staging.exists()
        && let Err(e) = fs::remove_file(staging)
    {
        tracing::warn!(path = %staging.display(), error = %e, "Failed to remove staging file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_path_keeps_extension_and_directory() {
        let staging = staging_path(Path::new("/out/docs/intro.pdf"));
        assert_eq!(staging.parent(), Some(Path::new("/out/docs")));
        let name = staging.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".intro."), "{name}");
        assert!(name.ends_with(".partial.pdf"), "{name}");
    }

    #[test]
    fn staging_names_are_recognised() {
        assert!(is_staging_file(&staging_path(Path::new("/out/intro.pdf"))));
        assert!(is_staging_file(Path::new("docs/.notes.v2.4242.partial.pdf")));
        assert!(is_staging_file(Path::new(".README.17.partial")));

        assert!(!is_staging_file(Path::new("intro.pdf")));
        assert!(!is_staging_file(Path::new(".intro.partial.pdf")));
        assert!(!is_staging_file(Path::new(".intro.abc.partial.pdf")));
        assert!(!is_staging_file(Path::new("intro.123.partial.pdf")));
        assert!(!is_staging_file(Path::new(".intro.123.partial.pdf.bak")));
    }

    #[test]
    fn missing_executable_is_reported_before_spawning() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("a.md");
        fs::write(&input, "# A").unwrap();
        let output = temp.path().join("out").join("a.pdf");

        let choice = ConverterChoice::Pandoc(crate::config::ConverterSettings {
            path: Some(temp.path().join("no-such-pandoc").display().to_string()),
            args: Vec::new(),
        });
        let converter = ProcessConverter::new(Duration::from_secs(5)).unwrap();

        let err = converter.render(&input, &output, &choice).unwrap_err();

        assert!(matches!(err, ConversionError::ExecutableNotFound { .. }));
        assert!(!output.exists());
        assert!(!output.parent().unwrap().exists());
    }
}
