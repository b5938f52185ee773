//! Test doubles shared by the engine test suites

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use mdexport_core::config::{ConverterChoice, ConverterKind};
use mdexport_core::sync::{Decision, DecisionSource};
use mdexport_core::{CancellationToken, ConversionError, Converter, Error, Mapping, Result};
use mdexport_fs::NormalizedPath;
use mdexport_test_utils::TestTree;

pub const STUB_PDF: &str = "%PDF-stub";

/// Answers prompts from a fixed script and records what was asked.
///
/// A `None` answer cancels the run. Running out of answers panics, so a
/// test fails loudly on an unexpected prompt.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<Option<Decision>>,
    pub asked: Vec<String>,
}

impl ScriptedDecisions {
    pub fn new(answers: &[Decision]) -> Self {
        Self {
            answers: answers.iter().copied().map(Some).collect(),
            asked: Vec::new(),
        }
    }

    /// No prompt is expected at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Cancel once the scripted answers are used up.
    pub fn then_cancel(mut self) -> Self {
        self.answers.push_back(None);
        self
    }
}

impl DecisionSource for ScriptedDecisions {
    fn decide(&mut self, relative_path: &NormalizedPath) -> Result<Decision> {
        self.asked.push(relative_path.to_string());
        match self.answers.pop_front() {
            Some(Some(decision)) => Ok(decision),
            Some(None) => Err(Error::Cancelled),
            None => panic!("unexpected prompt for {relative_path}"),
        }
    }
}

/// In-process converter that writes a stub document.
///
/// Files listed in `failures` fail with the given error instead. Calls are
/// recorded by input file name.
#[derive(Clone, Default)]
pub struct StubConverter {
    failures: HashMap<String, fn(ConverterKind) -> ConversionError>,
    missing: bool,
    cancel_after_first: Option<CancellationToken>,
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl StubConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every render fails as if the executable were not installed.
    pub fn missing_executable() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn failing_on(mut self, file_name: &str, error: fn(ConverterKind) -> ConversionError) -> Self {
        self.failures.insert(file_name.to_string(), error);
        self
    }

    /// Cancel `token` right after the first render.
    pub fn cancelling(mut self, token: CancellationToken) -> Self {
        self.cancel_after_first = Some(token);
        self
    }
}

impl Converter for StubConverter {
    fn render(
        &self,
        markdown: &Path,
        output: &Path,
        choice: &ConverterChoice,
    ) -> std::result::Result<(), ConversionError> {
        let name = markdown
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.borrow_mut().push(name.clone());

        if let Some(token) = &self.cancel_after_first {
            token.cancel();
        }
        if self.missing {
            return Err(ConversionError::ExecutableNotFound {
                converter: choice.kind(),
                executable: choice.executable().to_string(),
            });
        }
        if let Some(error) = self.failures.get(&name) {
            return Err(error(choice.kind()));
        }

        fs::create_dir_all(output.parent().unwrap()).unwrap();
        fs::write(output, STUB_PDF).unwrap();
        Ok(())
    }
}

pub fn non_zero_exit(converter: ConverterKind) -> ConversionError {
    ConversionError::NonZeroExit {
        converter,
        code: 43,
        stderr: "Error producing PDF.".into(),
    }
}

pub fn mapping_for(tree: &TestTree) -> Mapping {
    Mapping::new(tree.source(), tree.target(), ConverterChoice::pandoc())
}
