//! Scripted command runner for tests
//!
//! Records every argument vector it receives and answers from a list of
//! prefix-matched responses. Unmatched commands succeed with empty output.

use super::command_runner::{CommandError, CommandOutput, CommandRunner};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Scripted {
    Output { exit_code: i32, stdout: String },
    Error(CommandError),
}

#[derive(Debug, Default)]
pub struct RecordingRunner {
    responses: Vec<(Vec<String>, Scripted)>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with this exit code and stdout
    pub fn with_response(mut self, prefix: &[&str], exit_code: i32, stdout: &str) -> Self {
        self.responses.push((
            prefix.iter().map(|p| p.to_string()).collect(),
            Scripted::Output {
                exit_code,
                stdout: stdout.to_string(),
            },
        ));
        self
    }

    /// Fail commands starting with `prefix` before they "start"
    pub fn with_error(mut self, prefix: &[&str], error: CommandError) -> Self {
        self.responses.push((
            prefix.iter().map(|p| p.to_string()).collect(),
            Scripted::Error(error),
        ));
        self
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Vec<String>>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.guard().clone()
    }

    /// Recorded calls rendered as space-joined lines
    pub fn call_lines(&self) -> Vec<String> {
        self.guard().iter().map(|argv| argv.join(" ")).collect()
    }

    pub fn call_count(&self) -> usize {
        self.guard().len()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, argv: &[String]) -> Result<CommandOutput, CommandError> {
        self.guard().push(argv.to_vec());

        let scripted = self
            .responses
            .iter()
            .find(|(prefix, _)| argv.starts_with(prefix))
            .map(|(_, response)| response.clone());

        match scripted {
            Some(Scripted::Error(error)) => Err(error),
            Some(Scripted::Output { exit_code, stdout }) => Ok(CommandOutput {
                stdout,
                stderr: String::new(),
                exit_code,
                duration: Duration::ZERO,
            }),
            None => Ok(CommandOutput {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 0,
                duration: Duration::ZERO,
            }),
        }
    }
}
