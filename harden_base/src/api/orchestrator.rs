//! # Orchestrator
//!
//! Runs a profile's modules in order and aggregates their records.
//!
//! A run moves through `NotStarted -> Running(0) -> ... -> Running(n-1) ->
//! Aggregated -> Done`. Preconditions are checked before `Running(0)` and abort
//! the run. After that nothing aborts: an unknown module, a module error or a
//! module panic is recorded as a module failure and the next module runs.

use super::errors::RunError;
use crate::checks::{ModuleRegistry, Profile};
use crate::config::HardeningConfig;
use crate::execution::{Precondition, RunContext};
use crate::logging::codes;
use crate::results::{HostContext, ModuleFailure, OutcomeRecord, Report, ReportMetadata, TimestampInfo};
use chrono::Utc;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

/// Orchestrator state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running { index: usize, module: String },
    Aggregated,
    Done,
}

/// A finished run: the report plus the states the run passed through
#[derive(Debug)]
pub struct RunOutcome {
    pub report: Report,
    pub trace: Vec<RunState>,
}

pub struct Orchestrator<'a> {
    registry: &'a ModuleRegistry,
    preconditions: Vec<Box<dyn Precondition>>,
    controls: HashMap<String, String>,
    benchmark: Option<String>,
    tool_version: String,
}

impl<'a> Orchestrator<'a> {
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        Self {
            registry,
            preconditions: Vec::new(),
            controls: HashMap::new(),
            benchmark: None,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_precondition(mut self, precondition: Box<dyn Precondition>) -> Self {
        self.preconditions.push(precondition);
        self
    }

    /// Map from record id to benchmark control, attached to matching records
    pub fn with_controls<I, K, V>(mut self, controls: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.controls
            .extend(controls.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_benchmark(mut self, benchmark: impl Into<String>) -> Self {
        self.benchmark = Some(benchmark.into());
        self
    }

    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = version.into();
        self
    }

    /// Evaluate every precondition, stopping at the first failure
    pub fn check_preconditions(&self, ctx: &RunContext) -> Result<(), RunError> {
        for precondition in &self.preconditions {
            if let Err(e) = precondition.check() {
                crate::log_error!(ctx.logger(), codes::precondition::PRECONDITION_FAILED,
                    "Precondition failed", "precondition" => precondition.name(), "error" => e);
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Run `profile` and build its report
    pub fn run(
        &self,
        profile: &Profile,
        config: &HardeningConfig,
        ctx: &RunContext,
    ) -> Result<RunOutcome, RunError> {
        let mut trace = vec![RunState::NotStarted];
        self.check_preconditions(ctx)?;

        let run_start = Utc::now();
        crate::log_success!(ctx.logger(), codes::success::RUN_STARTED, "Hardening run started",
            "profile" => profile.name(), "mode" => ctx.mode(), "modules" => profile.len());

        let mut records: Vec<OutcomeRecord> = Vec::new();
        let mut failures: Vec<ModuleFailure> = Vec::new();

        for (index, name) in profile.modules().iter().enumerate() {
            trace.push(RunState::Running {
                index,
                module: name.clone(),
            });
            crate::log_debug!(ctx.logger(), "Running module", "index" => index, "module" => name);

            match self.invoke(name, config, ctx) {
                Ok(module_records) => {
                    let failing = module_records.iter().filter(|r| !r.ok()).count();
                    if failing > 0 {
                        crate::log_warning!(ctx.logger(), code = codes::module::MODULE_REPORTED_FAILURE,
                            "Module reported failing checks", "module" => name, "failing" => failing);
                    } else {
                        crate::log_success!(ctx.logger(), codes::success::MODULE_COMPLETED,
                            "Module completed", "module" => name, "records" => module_records.len());
                    }
                    records.extend(module_records.into_iter().map(|r| self.annotate(r)));
                }
                Err(failure) => failures.push(failure),
            }
        }

        trace.push(RunState::Aggregated);
        let report = Report::new(
            uuid::Uuid::new_v4().to_string(),
            profile.name().to_string(),
            ctx.mode(),
            ReportMetadata {
                host: HostContext::from_system(),
                tool_version: self.tool_version.clone(),
                benchmark: self.benchmark.clone(),
            },
            TimestampInfo::between(run_start, Utc::now()),
            profile.len(),
            failures,
            records,
        );

        crate::log_success!(ctx.logger(), codes::success::RUN_COMPLETED, "Hardening run completed",
            "total" => report.summary().total, "failed" => report.summary().failed,
            "module_failures" => report.module_failures().len(), "ok" => report.ok());
        trace.push(RunState::Done);

        Ok(RunOutcome { report, trace })
    }

    /// Look up and invoke one module behind the isolation boundary
    fn invoke(
        &self,
        name: &str,
        config: &HardeningConfig,
        ctx: &RunContext,
    ) -> Result<Vec<OutcomeRecord>, ModuleFailure> {
        let failure = |error: String| ModuleFailure {
            module: name.to_string(),
            error,
        };

        let module = self.registry.get(name).map_err(|e| {
            crate::log_error!(ctx.logger(), codes::module::UNKNOWN_MODULE, "Module not registered",
                "module" => name);
            failure(e.to_string())
        })?;

        let module_config = config.module_config(name);
        let result = panic::catch_unwind(AssertUnwindSafe(|| module.apply(&module_config, ctx)));

        match result {
            Ok(Ok(records)) => Ok(records),
            Ok(Err(e)) => {
                crate::log_error!(ctx.logger(), codes::config::INVALID_MODULE_SETTING, "Module failed",
                    "module" => name, "error" => e);
                Err(failure(e.to_string()))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                crate::log_error!(ctx.logger(), codes::module::MODULE_PANICKED, "Module panicked",
                    "module" => name, "panic" => message);
                Err(failure(format!("Module panicked: {}", message)))
            }
        }
    }

    fn annotate(&self, record: OutcomeRecord) -> OutcomeRecord {
        if record.control().is_some() {
            return record;
        }
        match self.controls.get(record.id()) {
            Some(control) => record.with_control(control.clone()),
            None => record,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{CheckModule, ModuleError};
    use crate::config::ModuleConfig;
    use crate::execution::{PreconditionError, RecordingRunner, RunMode};
    use crate::logging::{LogLevel, LoggingService, MemoryLogger};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns fixed records and counts its invocations
    struct Fixed {
        name: &'static str,
        records: Vec<OutcomeRecord>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(name: &'static str, records: Vec<OutcomeRecord>) -> Self {
            Self {
                name,
                records,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CheckModule for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn apply(&self, _: &ModuleConfig, _: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }
    }

    struct Panics;

    impl CheckModule for Panics {
        fn name(&self) -> &str {
            "panics"
        }

        fn apply(&self, _: &ModuleConfig, _: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
            panic!("index out of bounds");
        }
    }

    struct Errors;

    impl CheckModule for Errors {
        fn name(&self) -> &str {
            "errors"
        }

        fn apply(&self, config: &ModuleConfig, _: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
            config.get_bool("enforce", true)?;
            Ok(Vec::new())
        }
    }

    struct Denied;

    impl Precondition for Denied {
        fn name(&self) -> &str {
            "denied"
        }

        fn check(&self) -> Result<(), PreconditionError> {
            Err(PreconditionError::NotPrivileged { euid: 1000 })
        }
    }

    fn context(memory: Arc<MemoryLogger>) -> RunContext {
        RunContext::new(
            RunMode::Apply,
            "test",
            Arc::new(RecordingRunner::new()),
            Arc::new(LoggingService::new(memory, LogLevel::Debug)),
        )
    }

    fn record(id: &str, changed: bool, ok: bool) -> OutcomeRecord {
        OutcomeRecord::new(id, id, changed, ok, "")
    }

    #[test]
    fn test_pass_and_fail_scenario() {
        let mut registry = ModuleRegistry::new();
        registry.register(Box::new(Fixed::new("a", vec![record("A-1", true, true)]))).unwrap();
        registry.register(Box::new(Fixed::new("b", vec![record("B-1", false, false)]))).unwrap();
        let profile = Profile::new("test", "", &["a", "b"]);
        let memory = Arc::new(MemoryLogger::new());

        let outcome = Orchestrator::new(&registry)
            .run(&profile, &HardeningConfig::default(), &context(memory.clone()))
            .unwrap();
        let summary = outcome.report.summary();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.compliance, 50.0);
        assert!(!summary.ok);
        assert_eq!(outcome.report.modules_attempted(), 2);
        assert!(memory.has_event_with_code("H033"));
    }

    #[test]
    fn test_failure_isolation() {
        let mut registry = ModuleRegistry::new();
        registry.register(Box::new(Fixed::new("a", vec![record("A-1", false, true), record("A-2", true, true)]))).unwrap();
        registry.register(Box::new(Panics)).unwrap();
        registry.register(Box::new(Fixed::new("c", vec![record("C-1", false, true)]))).unwrap();
        let profile = Profile::new("test", "", &["a", "panics", "c"]);
        let memory = Arc::new(MemoryLogger::new());

        let outcome = Orchestrator::new(&registry)
            .run(&profile, &HardeningConfig::default(), &context(memory.clone()))
            .unwrap();
        let report = &outcome.report;

        let ids: Vec<&str> = report.results().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["A-1", "A-2", "C-1"]);
        assert_eq!(report.summary().total, 3);
        assert_eq!(report.summary().compliance, 100.0);
        assert!(!report.ok());
        assert_eq!(report.module_failures().len(), 1);
        assert_eq!(report.module_failures()[0].module, "panics");
        assert!(report.module_failures()[0].error.contains("index out of bounds"));
        assert!(memory.has_event_with_code("H032"));
    }

    #[test]
    fn test_unknown_module_and_module_error_continue() {
        let mut registry = ModuleRegistry::new();
        registry.register(Box::new(Errors)).unwrap();
        registry.register(Box::new(Fixed::new("c", vec![record("C-1", false, true)]))).unwrap();
        let profile = Profile::new("test", "", &["ghost", "errors", "c"]);
        let config = HardeningConfig::from_toml_str("[modules.errors]\nenforce = \"yes\"\n").unwrap();

        let memory = Arc::new(MemoryLogger::new());
        let outcome = Orchestrator::new(&registry)
            .run(&profile, &config, &context(memory.clone()))
            .unwrap();
        let report = &outcome.report;

        assert!(memory.has_event_with_code("H012"));
        assert_eq!(report.modules_attempted(), 3);
        assert_eq!(report.results().len(), 1);
        let failed: Vec<&str> = report.module_failures().iter().map(|f| f.module.as_str()).collect();
        assert_eq!(failed, vec!["ghost", "errors"]);
        assert_eq!(report.module_failures()[0].error, "Unknown module: ghost");
        assert!(!report.ok());
    }

    #[test]
    fn test_state_trace() {
        let mut registry = ModuleRegistry::new();
        registry.register(Box::new(Fixed::new("a", Vec::new()))).unwrap();
        let profile = Profile::new("test", "", &["a", "ghost"]);

        let outcome = Orchestrator::new(&registry)
            .run(&profile, &HardeningConfig::default(), &context(Arc::new(MemoryLogger::new())))
            .unwrap();

        assert_eq!(
            outcome.trace,
            vec![
                RunState::NotStarted,
                RunState::Running { index: 0, module: "a".to_string() },
                RunState::Running { index: 1, module: "ghost".to_string() },
                RunState::Aggregated,
                RunState::Done,
            ]
        );
    }

    #[test]
    fn test_precondition_aborts_before_modules() {
        let module = Fixed::new("a", vec![record("A-1", false, true)]);
        let mut registry = ModuleRegistry::new();
        registry.register(Box::new(module)).unwrap();
        let profile = Profile::new("test", "", &["a"]);
        let memory = Arc::new(MemoryLogger::new());

        let result = Orchestrator::new(&registry)
            .with_precondition(Box::new(Denied))
            .run(&profile, &HardeningConfig::default(), &context(memory.clone()));

        let error = result.unwrap_err();
        assert_eq!(error.exit_code(), 2);
        assert!(matches!(
            error,
            RunError::Precondition(PreconditionError::NotPrivileged { euid: 1000 })
        ));
        assert!(memory.has_event_with_code("H020"));
        assert!(!memory.has_event_with_code("S001"));
    }

    #[test]
    fn test_empty_module_output_is_ok() {
        let registry = {
            let mut registry = ModuleRegistry::new();
            registry.register(Box::new(Fixed::new("a", Vec::new()))).unwrap();
            registry
        };
        let profile = Profile::new("test", "", &["a"]);
        let ctx = context(Arc::new(MemoryLogger::new()));

        let outcome = Orchestrator::new(&registry)
            .run(&profile, &HardeningConfig::default(), &ctx)
            .unwrap();
        assert_eq!(outcome.report.summary().total, 0);
        assert!(outcome.report.ok());
    }

    #[test]
    fn test_control_annotation() {
        let mut registry = ModuleRegistry::new();
        registry
            .register(Box::new(Fixed::new(
                "a",
                vec![
                    record("CRYPTO-1", false, true),
                    record("X-1", false, true),
                    record("SUDO-1", false, true).with_control("custom"),
                ],
            )))
            .unwrap();
        let profile = Profile::new("test", "", &["a"]);

        let outcome = Orchestrator::new(&registry)
            .with_controls([("CRYPTO-1", "1.5.1"), ("SUDO-1", "5.3.7")])
            .with_benchmark("Oracle Linux 9 v2.0.0")
            .run(&profile, &HardeningConfig::default(), &context(Arc::new(MemoryLogger::new())))
            .unwrap();
        let results = outcome.report.results();

        assert_eq!(results[0].control(), Some("1.5.1"));
        assert_eq!(results[1].control(), None);
        assert_eq!(results[2].control(), Some("custom"));
        assert_eq!(
            outcome.report.metadata().benchmark.as_deref(),
            Some("Oracle Linux 9 v2.0.0")
        );
    }
}
