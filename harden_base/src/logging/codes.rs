//! Event codes for hardening runs
//!
//! Every event carries a short code so that structured output can be filtered
//! by category without parsing the message text.

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code attached to every log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// Generic codes used when the caller does not pick one
pub mod generic {
    use super::Code;

    pub const WARNING: Code = Code::new("W000");
    pub const INFO: Code = Code::new("I000");
    pub const DEBUG: Code = Code::new("D000");
}

/// Process-level failures
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("H001");
    pub const REPORT_WRITE_FAILED: Code = Code::new("H002");
    pub const LOG_FILE_UNAVAILABLE: Code = Code::new("H003");
}

/// Configuration loading
pub mod config {
    use super::Code;

    pub const CONFIG_NOT_FOUND: Code = Code::new("H010");
    pub const CONFIG_INVALID: Code = Code::new("H011");
    pub const INVALID_MODULE_SETTING: Code = Code::new("H012");
}

/// Preconditions evaluated before any module runs
pub mod precondition {
    use super::Code;

    pub const PRECONDITION_FAILED: Code = Code::new("H020");
}

/// Module lookup and invocation
pub mod module {
    use super::Code;

    pub const UNKNOWN_MODULE: Code = Code::new("H030");
    pub const MODULE_PANICKED: Code = Code::new("H032");
    pub const MODULE_REPORTED_FAILURE: Code = Code::new("H033");
}

/// Convergence primitives and command execution
pub mod primitive {
    use super::Code;

    pub const COMMAND_FAILED: Code = Code::new("H040");
    pub const COMMAND_REJECTED: Code = Code::new("H041");
    pub const FILE_IO_FAILED: Code = Code::new("H042");
    pub const OWNERSHIP_REJECTED: Code = Code::new("H043");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const RUN_STARTED: Code = Code::new("S001");
    pub const MODULE_COMPLETED: Code = Code::new("S002");
    pub const RUN_COMPLETED: Code = Code::new("S003");
    pub const REPORT_WRITTEN: Code = Code::new("S004");
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Category name for a code, derived from its numeric block
pub fn get_category(code: &str) -> &'static str {
    match code {
        "W000" | "I000" | "D000" => "General",
        "H001" | "H002" | "H003" => "System",
        "H010" | "H011" | "H012" => "Configuration",
        "H020" => "Precondition",
        "H030" | "H032" | "H033" => "Module",
        "H040" | "H041" | "H042" | "H043" => "Primitive",
        c if c.starts_with('S') => "Success",
        _ => "Unknown",
    }
}

/// Short human description of a code
pub fn get_description(code: &str) -> &'static str {
    match code {
        "H001" => "Internal error",
        "H002" => "Report could not be written",
        "H003" => "Log file could not be opened",
        "H010" => "Configuration file not found",
        "H011" => "Configuration file is invalid",
        "H012" => "Module setting has the wrong type",
        "H020" => "Run precondition not met",
        "H030" => "Profile names an unregistered module",
        "H032" => "Module panicked",
        "H033" => "Module reported failing outcomes",
        "H040" => "External command failed",
        "H041" => "External command rejected before start",
        "H042" => "File read or write failed",
        "H043" => "Ownership change rejected",
        "S001" => "Run started",
        "S002" => "Module completed",
        "S003" => "Run completed",
        "S004" => "Report written",
        _ => "Unknown code",
    }
}
