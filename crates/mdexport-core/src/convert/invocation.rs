//! Converter command-line construction

use std::ffi::OsString;
use std::path::Path;

use crate::config::ConverterChoice;

/// The program and arguments for one conversion.
///
/// User arguments always come before the input/output arguments, so
/// templates and engine flags are in place before the files are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable as configured (not yet resolved against `PATH`)
    pub program: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Build the invocation for rendering `input` into `output`.
    ///
    /// - Pandoc: `pandoc <args...> -i <input> -o <output>`
    /// - Typst: `typst compile <args...> <input> <output>`
    pub fn build(choice: &ConverterChoice, input: &Path, output: &Path) -> Self {
        let mut args: Vec<OsString> = Vec::new();
        match choice {
            ConverterChoice::Pandoc(settings) => {
                args.extend(settings.args.iter().map(OsString::from));
                args.push("-i".into());
                args.push(input.as_os_str().to_owned());
                args.push("-o".into());
                args.push(output.as_os_str().to_owned());
            }
            ConverterChoice::Typst(settings) => {
                args.push("compile".into());
                args.extend(settings.args.iter().map(OsString::from));
                args.push(input.as_os_str().to_owned());
                args.push(output.as_os_str().to_owned());
            }
        }
        Self {
            program: choice.executable().to_string(),
            args,
        }
    }

    /// Shell-like rendering for log output.
    pub fn display(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("'{part}'")
                } else {
                    part
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
