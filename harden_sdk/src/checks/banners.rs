//! Login banners

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::ensure_file_content;
use harden_base::execution::RunContext;
use harden_base::results::OutcomeRecord;

pub const BANNER: &str = "Authorized uses only. All activity may be monitored and reported.\n";

pub struct LoginBanners;

impl CheckModule for LoginBanners {
    fn name(&self) -> &str {
        "banners"
    }

    fn description(&self) -> &str {
        "Set login banners and clear the message of the day"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let results = vec![
            ensure_file_content(ctx, "/etc/issue", BANNER, 0o644),
            ensure_file_content(ctx, "/etc/issue.net", BANNER, 0o644),
            ensure_file_content(ctx, "/etc/motd", "", 0o644),
        ];
        Ok(vec![OutcomeRecord::from_convergences(
            "BANNER-1",
            "Set login banners and clear /etc/motd",
            results,
        )])
    }
}
