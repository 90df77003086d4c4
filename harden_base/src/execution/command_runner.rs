//! External command execution with security controls
//!
//! The runner is the only place the engine starts child processes. A non-zero
//! exit status is ordinary data in `CommandOutput`; `CommandError` is reserved
//! for commands that could not be started or did not finish.

use std::collections::HashSet;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Restricted search path for child processes
pub const SAFE_PATH: &str = "/usr/bin:/bin:/usr/sbin:/sbin";

/// Executes an argument vector and captures its output
pub trait CommandRunner: Send + Sync {
    fn run(&self, argv: &[String]) -> Result<CommandOutput, CommandError>;
}

/// Runs real processes with an allow-list, a cleared environment and an
/// optional timeout
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    allowed_commands: HashSet<String>,
    unrestricted: bool,
    timeout: Option<Duration>,
}

impl SystemCommandRunner {
    /// Create runner with empty allow-list - must be configured before use
    pub fn new() -> Self {
        Self {
            allowed_commands: HashSet::new(),
            unrestricted: false,
            timeout: None,
        }
    }

    /// Runner that accepts any program name
    pub fn unrestricted() -> Self {
        Self {
            unrestricted: true,
            ..Self::new()
        }
    }

    /// Kill children that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn allow_command(&mut self, command: impl Into<String>) {
        self.allowed_commands.insert(command.into());
    }

    pub fn allow_commands(&mut self, commands: &[&str]) {
        for cmd in commands {
            self.allowed_commands.insert(cmd.to_string());
        }
    }

    pub fn is_allowed(&self, command: &str) -> bool {
        self.unrestricted || self.allowed_commands.contains(command)
    }

    fn spawn(&self, program: &str, args: &[String]) -> Result<Child, CommandError> {
        Command::new(program)
            .args(args)
            .env_clear()
            .env("PATH", SAFE_PATH)
            .env("LANG", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CommandError::ProgramNotFound {
                    program: program.to_string(),
                },
                std::io::ErrorKind::PermissionDenied => CommandError::PermissionDenied {
                    program: program.to_string(),
                },
                _ => CommandError::SpawnFailed {
                    program: program.to_string(),
                    reason: e.to_string(),
                },
            })
    }

    fn wait_with_timeout(
        program: &str,
        mut child: Child,
        timeout: Duration,
        start: Instant,
    ) -> Result<CommandOutput, CommandError> {
        // Drain both pipes while waiting so a chatty child cannot block on a full pipe
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let status = wait_timeout::ChildExt::wait_timeout(&mut child, timeout).map_err(|e| {
            CommandError::SpawnFailed {
                program: program.to_string(),
                reason: e.to_string(),
            }
        })?;

        let Some(status) = status else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CommandError::Timeout {
                program: program.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        };

        Ok(CommandOutput {
            stdout: join_reader(stdout_reader),
            stderr: join_reader(stderr_reader),
            exit_code: status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, argv: &[String]) -> Result<CommandOutput, CommandError> {
        let (program, args) = argv.split_first().ok_or(CommandError::EmptyCommand)?;

        if !self.is_allowed(program) {
            return Err(CommandError::NotAllowed {
                program: program.clone(),
            });
        }

        let start = Instant::now();
        let child = self.spawn(program, args)?;

        if let Some(timeout) = self.timeout {
            return Self::wait_with_timeout(program, child, timeout, start);
        }

        let output = child
            .wait_with_output()
            .map_err(|e| CommandError::SpawnFailed {
                program: program.clone(),
                reason: e.to_string(),
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

fn join_reader(reader: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).to_string())
        .unwrap_or_default()
}

/// Render an argument vector as a single shell-quoted line for audit records
pub fn render_command(argv: &[String]) -> String {
    shlex::try_join(argv.iter().map(String::as_str)).unwrap_or_else(|_| argv.join(" "))
}

/// Convenience for building argument vectors from string literals
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// Command execution output
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr, trimmed
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr).trim().to_string()
    }
}

/// Failures to start or finish a command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command line")]
    EmptyCommand,

    #[error("Command '{program}' not in allow-list")]
    NotAllowed { program: String },

    #[error("Program not found: {program}")]
    ProgramNotFound { program: String },

    #[error("Permission denied: {program}")]
    PermissionDenied { program: String },

    #[error("Failed to run '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Command '{program}' timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_allow_list() {
        let runner = SystemCommandRunner::new();
        assert!(!runner.is_allowed("dnf"));
        assert!(!runner.is_allowed("systemctl"));
    }

    #[test]
    fn test_allow_list_management() {
        let mut runner = SystemCommandRunner::new();

        runner.allow_command("dnf");
        assert!(runner.is_allowed("dnf"));
        assert!(!runner.is_allowed("systemctl"));

        runner.allow_commands(&["systemctl", "modprobe"]);
        assert!(runner.is_allowed("systemctl"));
        assert!(runner.is_allowed("modprobe"));
        assert!(SystemCommandRunner::unrestricted().is_allowed("anything"));
    }

    #[test]
    fn test_rejects_program_outside_allow_list() {
        let runner = SystemCommandRunner::new();
        assert_matches!(
            runner.run(&argv(&["rm", "-rf", "/"])),
            Err(CommandError::NotAllowed { ref program }) if program == "rm"
        );
        assert_matches!(runner.run(&[]), Err(CommandError::EmptyCommand));
    }

    #[test]
    fn test_non_zero_exit_is_data() {
        let mut runner = SystemCommandRunner::new();
        runner.allow_command("sh");

        let output = runner
            .run(&argv(&["sh", "-c", "echo out; echo err >&2; exit 3"]))
            .unwrap();
        assert_eq!(output.exit_code, 3);
        assert!(!output.success());
        assert_eq!(output.combined(), "out\nerr");
    }

    #[test]
    fn test_environment_is_cleared() {
        let mut runner = SystemCommandRunner::new();
        runner.allow_command("sh");

        let output = runner
            .run(&argv(&["sh", "-c", "printf %s \"$PATH\""]))
            .unwrap();
        assert_eq!(output.stdout, SAFE_PATH);
    }

    #[test]
    fn test_timeout_kills_child() {
        let mut runner =
            SystemCommandRunner::new().with_timeout(Some(Duration::from_millis(200)));
        runner.allow_command("sleep");

        assert_matches!(
            runner.run(&argv(&["sleep", "5"])),
            Err(CommandError::Timeout { .. })
        );
    }

    #[test]
    fn test_timeout_path_captures_output() {
        let mut runner = SystemCommandRunner::new().with_timeout(Some(Duration::from_secs(10)));
        runner.allow_command("sh");

        let output = runner.run(&argv(&["sh", "-c", "echo ready"])).unwrap();
        assert!(output.success());
        assert_eq!(output.combined(), "ready");
    }

    #[test]
    fn test_render_command_quotes_arguments() {
        assert_eq!(
            render_command(&argv(&["dnf", "-y", "install", "audit"])),
            "dnf -y install audit"
        );

        let script = argv(&["bash", "-lc", "aide --init && mv a b"]);
        let rendered = render_command(&script);
        assert!(rendered.starts_with("bash -lc "));
        assert_eq!(shlex::split(&rendered), Some(script));
    }
}
