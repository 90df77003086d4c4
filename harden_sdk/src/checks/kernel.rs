//! Disable uncommon filesystem and network protocol kernel modules

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::ensure_file_content;
use harden_base::execution::{argv, render_command, RunContext};
use harden_base::results::OutcomeRecord;

const FILESYSTEM_MODULES: &[&str] = &[
    "cramfs",
    "freevxfs",
    "hfs",
    "hfsplus",
    "jffs2",
    "squashfs",
    "udf",
    "usb-storage",
];

/// Added on level 2 profiles
const NETWORK_PROTOCOL_MODULES: &[&str] = &["dccp", "sctp", "rds", "tipc"];

const TITLE: &str = "Disable uncommon filesystem/network kernel modules";

pub struct KernelModules;

impl KernelModules {
    fn modules_for(profile: &str) -> Vec<&'static str> {
        let mut modules = FILESYSTEM_MODULES.to_vec();
        if profile.starts_with("l2") {
            modules.extend_from_slice(NETWORK_PROTOCOL_MODULES);
        }
        modules
    }

    fn conf_path(module: &str) -> String {
        format!("/etc/modprobe.d/cis-disable-{}.conf", module)
    }

    fn conf_content(module: &str) -> String {
        format!("install {} /bin/true\nblacklist {}\n", module, module)
    }
}

impl CheckModule for KernelModules {
    fn name(&self) -> &str {
        "kernel"
    }

    fn description(&self) -> &str {
        "Blacklist and unload uncommon kernel modules"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let modules = Self::modules_for(ctx.profile());

        let mut notes = Vec::new();
        let mut files = Vec::new();
        let mut any_written = false;
        let mut all_ok = true;
        for module in &modules {
            let path = Self::conf_path(module);
            let result = ensure_file_content(ctx, &path, &Self::conf_content(module), 0o644);
            any_written |= result.changed();
            all_ok &= result.ok();
            notes.push(format!("{}: {}", module, result.note));
            files.push(path);
        }

        let unloads: Vec<Vec<String>> = modules
            .iter()
            .map(|module| argv(&["modprobe", "-r", *module]))
            .collect();
        let commands: Vec<String> = unloads.iter().map(|c| render_command(c)).collect();

        let mut notes = notes.join("; ");
        let changed = if ctx.is_preview() {
            notes.push_str("\nDRY-RUN: would attempt unload modules");
            any_written
        } else {
            // Unload failures are expected for built-in or in-use modules
            let outputs: Vec<String> = unloads
                .iter()
                .map(|unload| match ctx.runner().run(unload) {
                    Ok(output) => output.combined(),
                    Err(e) => e.to_string(),
                })
                .filter(|out| !out.is_empty())
                .collect();
            if !outputs.is_empty() {
                notes.push('\n');
                notes.push_str(&outputs.join("\n"));
            }
            true
        };

        Ok(vec![OutcomeRecord::new("KERN-1", TITLE, changed, all_ok, notes)
            .with_commands(commands)
            .with_files(files)])
    }
}
