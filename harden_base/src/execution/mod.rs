pub mod command_runner;
pub mod context;
pub mod preconditions;
pub mod recording;

pub use command_runner::{
    argv, render_command, CommandError, CommandOutput, CommandRunner, SystemCommandRunner,
};
pub use context::{RunContext, RunMode};
pub use preconditions::{Precondition, PreconditionError, RootPrivilege};
pub use recording::RecordingRunner;
