//! System-wide crypto policy

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{query, run_command};
use harden_base::execution::{argv, RunContext};
use harden_base::results::OutcomeRecord;

const ID: &str = "CRYPTO-1";
const TITLE: &str = "Ensure system crypto policy is not LEGACY";
const SHOW: &[&str] = &["update-crypto-policies", "--show"];
const SET_DEFAULT: &[&str] = &["update-crypto-policies", "--set", "DEFAULT"];

pub struct CryptoPolicy;

impl CheckModule for CryptoPolicy {
    fn name(&self) -> &str {
        "crypto"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let commands = vec![SHOW.join(" "), SET_DEFAULT.join(" ")];

        if ctx.is_preview() {
            return Ok(vec![OutcomeRecord::informational(
                ID,
                TITLE,
                "DRY-RUN: would check and set crypto policy to DEFAULT if LEGACY",
            )
            .with_commands(commands)]);
        }

        let current = match query(ctx, &argv(SHOW)) {
            Ok(output) => output.combined(),
            Err(e) => {
                return Ok(vec![OutcomeRecord::failure(ID, TITLE, e.to_string()).with_commands(commands)]);
            }
        };

        let mut notes = vec![format!("current: {}", current)];
        let (changed, ok) = if current.contains("LEGACY") {
            let result = run_command(ctx, argv(SET_DEFAULT));
            let ok = result.ok();
            notes.push(result.note);
            (true, ok)
        } else {
            (false, true)
        };

        Ok(vec![OutcomeRecord::new(ID, TITLE, changed, ok, notes.join("\n")).with_commands(commands)])
    }
}
