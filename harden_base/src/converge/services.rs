//! Service-manager state convergence

use super::command::run_commands;
use super::status::Convergence;
use crate::execution::RunContext;

/// Logical service state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Enabled and started
    Enable,
    /// Disabled and stopped
    Disable,
    /// Disabled, stopped and blocked from manual start
    Mask,
}

impl ServiceState {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceState::Enable => "enable",
            ServiceState::Disable => "disable",
            ServiceState::Mask => "mask",
        }
    }
}

/// systemctl invocations for a logical state
pub fn service_commands(service: &str, state: ServiceState) -> Vec<Vec<String>> {
    vec![vec![
        "systemctl".to_string(),
        state.as_str().to_string(),
        "--now".to_string(),
        service.to_string(),
    ]]
}

/// Ensure `service` is in `state`
///
/// The current unit state is not queried first; issuing the command against
/// a converged unit is a no-op for systemd.
pub fn ensure_service(ctx: &RunContext, service: &str, state: ServiceState) -> Convergence {
    run_commands(ctx, &service_commands(service, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converge::status::ConvergenceStatus;
    use crate::converge::test_support::context_with_runner;
    use crate::execution::{RecordingRunner, RunMode};
    use std::sync::Arc;

    #[test]
    fn test_state_command_mapping() {
        assert_eq!(
            service_commands("auditd", ServiceState::Enable)[0].join(" "),
            "systemctl enable --now auditd"
        );
        assert_eq!(
            service_commands("cups", ServiceState::Disable)[0].join(" "),
            "systemctl disable --now cups"
        );
        assert_eq!(
            service_commands("telnet.socket", ServiceState::Mask)[0].join(" "),
            "systemctl mask --now telnet.socket"
        );
    }

    #[test]
    fn test_preview_reports_would_run() {
        let runner = Arc::new(RecordingRunner::new());
        let root = tempfile::tempdir().unwrap();
        let ctx = context_with_runner(RunMode::Preview, root.path(), runner.clone());

        let result = ensure_service(&ctx, "avahi-daemon", ServiceState::Mask);
        assert_eq!(result.status, ConvergenceStatus::Planned);
        assert_eq!(result.note, "DRY-RUN: would run systemctl mask --now avahi-daemon");
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_apply_reports_runner_outcome() {
        let runner = Arc::new(
            RecordingRunner::new().with_response(&["systemctl", "enable"], 1, "Unit not found"),
        );
        let root = tempfile::tempdir().unwrap();
        let ctx = context_with_runner(RunMode::Apply, root.path(), runner.clone());

        let enabled = ensure_service(&ctx, "crond", ServiceState::Enable);
        assert!(!enabled.ok());
        assert_eq!(enabled.note, "Unit not found");

        let masked = ensure_service(&ctx, "cups", ServiceState::Mask);
        assert!(masked.ok());
        assert!(masked.changed());
        assert_eq!(runner.call_count(), 2);
    }
}
