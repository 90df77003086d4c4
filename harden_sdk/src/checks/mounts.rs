//! tmpfs mount units for /tmp and /var/tmp

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_file_content, run_commands};
use harden_base::execution::{argv, RunContext};
use harden_base::results::OutcomeRecord;

const TMP_UNIT: &str = "/etc/systemd/system/tmp.mount";
const VAR_TMP_UNIT: &str = "/etc/systemd/system/var-tmp.mount";

pub struct TmpMounts;

impl TmpMounts {
    fn unit(mount_point: &str, size: &str) -> String {
        format!(
            "[Unit]\n\
             Description=Temporary Directory ({mount_point})\n\
             Before=local-fs.target\n\
             \n\
             [Mount]\n\
             What=tmpfs\n\
             Where={mount_point}\n\
             Type=tmpfs\n\
             Options=mode=1777,strictatime,nodev,nosuid,noexec,size={size}\n\
             \n\
             [Install]\n\
             WantedBy=local-fs.target\n"
        )
    }
}

impl CheckModule for TmpMounts {
    fn name(&self) -> &str {
        "mounts"
    }

    fn description(&self) -> &str {
        "Mount /tmp and /var/tmp as restricted tmpfs"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        if !config.get_bool("enable_tmp_mount_units", true)? {
            return Ok(vec![OutcomeRecord::informational(
                "MNT-0",
                "tmpfs mount units (skipped by config)",
                "mounts.enable_tmp_mount_units=false",
            )]);
        }

        let tmp_size = config.get_str("tmp_size", "1G")?;
        let var_tmp_size = config.get_str("var_tmp_size", "1G")?;

        let units = [
            ensure_file_content(ctx, TMP_UNIT, &Self::unit("/tmp", &tmp_size), 0o644),
            ensure_file_content(ctx, VAR_TMP_UNIT, &Self::unit("/var/tmp", &var_tmp_size), 0o644),
        ];
        let enable = run_commands(
            ctx,
            &[
                argv(&["systemctl", "daemon-reload"]),
                argv(&["systemctl", "enable", "--now", "tmp.mount", "var-tmp.mount"]),
            ],
        );

        let changed = units.iter().any(|u| u.changed());
        let ok = units.iter().all(|u| u.ok()) && enable.ok();
        let mut notes: Vec<String> = units.iter().map(|u| u.note.clone()).collect();
        notes.push(enable.note);

        Ok(vec![OutcomeRecord::new(
            "MNT-1",
            "Configure tmpfs mounts for /tmp and /var/tmp",
            changed,
            ok,
            notes.join("; "),
        )
        .with_commands(enable.commands)
        .with_files(vec![TMP_UNIT.to_string(), VAR_TMP_UNIT.to_string()])])
    }
}
