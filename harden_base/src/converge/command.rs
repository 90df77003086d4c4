//! Delegated command execution shared by package and service convergence
//!
//! These helpers do not inspect current state: a successful command is
//! reported as a change, and preview never runs anything.

use super::status::{Convergence, ConvergenceStatus};
use crate::execution::{render_command, CommandError, CommandOutput, RunContext};
use crate::logging::codes;

/// Run a sequence of mutating commands, or describe them under preview
///
/// Apply runs every command even after a failure; `ok` is true only when all
/// of them exit successfully, and `changed` mirrors `ok`.
pub fn run_commands(ctx: &RunContext, commands: &[Vec<String>]) -> Convergence {
    let rendered: Vec<String> = commands.iter().map(|argv| render_command(argv)).collect();

    if ctx.is_preview() {
        return Convergence::new(
            ConvergenceStatus::Planned,
            format!("DRY-RUN: would run {}", rendered.join(" && ")),
        )
        .with_commands(rendered);
    }

    let mut all_ok = true;
    let mut notes = Vec::new();

    for (argv, line) in commands.iter().zip(&rendered) {
        match ctx.runner().run(argv) {
            Ok(output) => {
                if !output.success() {
                    all_ok = false;
                    crate::log_error!(ctx.logger(), codes::primitive::COMMAND_FAILED, "Command failed",
                        "command" => line, "exit_code" => output.exit_code);
                }
                notes.push(describe_output(&output));
            }
            Err(e) => {
                all_ok = false;
                crate::log_error!(ctx.logger(), codes::primitive::COMMAND_REJECTED, "Command could not run",
                    "command" => line, "error" => e);
                notes.push(e.to_string());
            }
        }
    }

    let status = if all_ok {
        ConvergenceStatus::Changed
    } else {
        ConvergenceStatus::Failed
    };
    Convergence::new(status, notes.join("\n").trim().to_string()).with_commands(rendered)
}

/// Run a single mutating command, or describe it under preview
pub fn run_command(ctx: &RunContext, argv: Vec<String>) -> Convergence {
    run_commands(ctx, &[argv])
}

/// Run a read-only query in either mode
///
/// Queries never change host state, so modules use them to decide what a
/// preview should report.
pub fn query(ctx: &RunContext, argv: &[String]) -> Result<CommandOutput, CommandError> {
    crate::log_debug!(ctx.logger(), "Running query", "command" => render_command(argv));
    ctx.runner().run(argv)
}

/// Output text of one command for the record note. A command that prints
/// nothing is noted as `exit status N` so its line in the note is never blank.
fn describe_output(output: &CommandOutput) -> String {
    let combined = output.combined();
    if combined.is_empty() {
        format!("exit status {}", output.exit_code)
    } else {
        combined
    }
}
