//! Remove legacy cleartext network packages

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_packages, PackageState};
use harden_base::execution::RunContext;
use harden_base::results::OutcomeRecord;

const LEGACY_PACKAGES: &[&str] = &[
    "telnet",
    "telnet-server",
    "ftp",
    "tftp",
    "tftp-server",
    "rsh",
    "rsh-server",
    "ypbind",
    "ypserv",
    "talk",
    "talk-server",
    "xinetd",
];

pub struct LegacyPackages;

impl CheckModule for LegacyPackages {
    fn name(&self) -> &str {
        "packages"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        Ok(vec![OutcomeRecord::from_convergence(
            "PKG-1",
            "Remove legacy/insecure network packages",
            ensure_packages(ctx, LEGACY_PACKAGES, PackageState::Absent),
        )])
    }
}
