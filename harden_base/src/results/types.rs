//! # Report Types
//!
//! The aggregate of one hardening run. Built once after every module has
//! run, serialized for external consumers, never mutated.

use super::outcome::OutcomeRecord;
use crate::execution::RunMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete result of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    run_id: String,
    profile: String,
    mode: RunMode,
    metadata: ReportMetadata,
    timestamp: TimestampInfo,
    summary: ComplianceSummary,
    remediation: RemediationSummary,
    modules_attempted: usize,
    module_failures: Vec<ModuleFailure>,
    results: Vec<OutcomeRecord>,
}

/// Where and with what the run executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Host information where the run executed
    pub host: HostContext,

    /// Version of the tool that produced the report
    pub tool_version: String,

    /// Benchmark the profiles are derived from
    pub benchmark: Option<String>,
}

/// Host execution context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContext {
    pub hostname: String,

    /// Kernel release string
    pub kernel: String,

    /// Operating system and architecture
    pub os_info: String,
}

/// Timestamp information for the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampInfo {
    pub run_start: DateTime<Utc>,
    pub run_end: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Pass/fail totals over every outcome record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    /// `100 * passed / total`, or 0 when there are no records
    pub compliance: f64,

    /// True only when every record is ok and every module could be invoked
    pub ok: bool,
}

/// How the passing records got there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationSummary {
    /// Records that changed (or would change) and are ok
    pub remediated: usize,

    /// Records that passed without needing a change
    pub already_compliant: usize,

    pub failed: usize,
}

/// A module that could not be invoked or faulted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleFailure {
    pub module: String,
    pub error: String,
}

impl ComplianceSummary {
    pub fn from_records(records: &[OutcomeRecord], module_failures: usize) -> Self {
        let total = records.len();
        let passed = records.iter().filter(|r| r.ok()).count();
        let compliance = if total > 0 {
            passed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            passed,
            failed: total - passed,
            compliance,
            ok: passed == total && module_failures == 0,
        }
    }
}

impl RemediationSummary {
    pub fn from_records(records: &[OutcomeRecord]) -> Self {
        let passed = records.iter().filter(|r| r.ok()).count();
        let remediated = records.iter().filter(|r| r.changed() && r.ok()).count();

        Self {
            remediated,
            already_compliant: passed - remediated,
            failed: records.len() - passed,
        }
    }
}

impl Report {
    /// Aggregate a finished run
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        run_id: String,
        profile: String,
        mode: RunMode,
        metadata: ReportMetadata,
        timestamp: TimestampInfo,
        modules_attempted: usize,
        module_failures: Vec<ModuleFailure>,
        results: Vec<OutcomeRecord>,
    ) -> Self {
        let summary = ComplianceSummary::from_records(&results, module_failures.len());
        let remediation = RemediationSummary::from_records(&results);

        Self {
            run_id,
            profile,
            mode,
            metadata,
            timestamp,
            summary,
            remediation,
            modules_attempted,
            module_failures,
            results,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn is_preview(&self) -> bool {
        self.mode.is_preview()
    }

    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    pub fn timestamp(&self) -> &TimestampInfo {
        &self.timestamp
    }

    pub fn summary(&self) -> &ComplianceSummary {
        &self.summary
    }

    pub fn remediation(&self) -> &RemediationSummary {
        &self.remediation
    }

    pub fn modules_attempted(&self) -> usize {
        self.modules_attempted
    }

    pub fn module_failures(&self) -> &[ModuleFailure] {
        &self.module_failures
    }

    pub fn results(&self) -> &[OutcomeRecord] {
        &self.results
    }

    pub fn ok(&self) -> bool {
        self.summary.ok
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl HostContext {
    /// Create host context from system information
    pub fn from_system() -> Self {
        Self {
            hostname: hostname::get()
                .unwrap_or_else(|_| std::ffi::OsString::from("unknown"))
                .to_string_lossy()
                .to_string(),
            kernel: std::fs::read_to_string("/proc/sys/kernel/osrelease")
                .map(|release| release.trim().to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
            os_info: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
        }
    }
}

impl TimestampInfo {
    pub fn between(run_start: DateTime<Utc>, run_end: DateTime<Utc>) -> Self {
        Self {
            run_start,
            run_end,
            duration_ms: (run_end - run_start).num_milliseconds().max(0) as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, changed: bool, ok: bool) -> OutcomeRecord {
        OutcomeRecord::new(id, id, changed, ok, "")
    }

    fn report(records: Vec<OutcomeRecord>, failures: Vec<ModuleFailure>) -> Report {
        let now = Utc::now();
        Report::new(
            "run-1".to_string(),
            "l1-server".to_string(),
            RunMode::Apply,
            ReportMetadata {
                host: HostContext {
                    hostname: "host".to_string(),
                    kernel: "5.14".to_string(),
                    os_info: "linux x86_64".to_string(),
                },
                tool_version: "0.1.0".to_string(),
                benchmark: None,
            },
            TimestampInfo::between(now, now),
            2,
            failures,
            records,
        )
    }

    #[test]
    fn test_empty_run_has_zero_compliance() {
        let summary = ComplianceSummary::from_records(&[], 0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.compliance, 0.0);
        assert!(summary.ok);
    }

    #[test]
    fn test_one_pass_one_fail() {
        let summary =
            ComplianceSummary::from_records(&[record("A", true, true), record("B", false, false)], 0);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.compliance, 50.0);
        assert!(!summary.ok);
    }

    #[test]
    fn test_ok_is_and_of_records() {
        let cases: Vec<Vec<bool>> = vec![
            vec![true],
            vec![true, true, true],
            vec![true, false, true],
            vec![false],
            vec![false, false],
        ];
        for oks in cases {
            let records: Vec<OutcomeRecord> = oks
                .iter()
                .enumerate()
                .map(|(i, ok)| record(&format!("R-{}", i), false, *ok))
                .collect();
            let summary = ComplianceSummary::from_records(&records, 0);
            assert_eq!(summary.ok, oks.iter().all(|ok| *ok));
            let passed = oks.iter().filter(|ok| **ok).count();
            assert_eq!(summary.compliance, 100.0 * passed as f64 / oks.len() as f64);
        }
    }

    #[test]
    fn test_module_failure_forces_failure() {
        let summary = ComplianceSummary::from_records(&[record("A", false, true)], 1);
        assert_eq!(summary.compliance, 100.0);
        assert!(!summary.ok);
    }

    #[test]
    fn test_remediation_split() {
        let remediation = RemediationSummary::from_records(&[
            record("A", true, true),
            record("B", false, true),
            record("C", false, true),
            record("D", true, false),
        ]);
        assert_eq!(remediation.remediated, 1);
        assert_eq!(remediation.already_compliant, 2);
        assert_eq!(remediation.failed, 1);
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = report(
            vec![record("A", true, true).with_control("1.5.1")],
            vec![ModuleFailure {
                module: "ghost".to_string(),
                error: "Unknown module: ghost".to_string(),
            }],
        );

        let parsed = Report::from_json(&report.to_json().unwrap()).unwrap();
        assert_eq!(parsed, report);
        assert!(!parsed.ok());
        assert_eq!(parsed.results()[0].control(), Some("1.5.1"));
        assert_eq!(parsed.module_failures()[0].module, "ghost");
    }
}
