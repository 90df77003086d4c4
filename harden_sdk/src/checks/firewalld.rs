//! firewalld installation and zone configuration

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_packages, ensure_service, run_commands, PackageState, ServiceState};
use harden_base::execution::{argv, render_command, RunContext};
use harden_base::results::OutcomeRecord;

pub struct Firewalld;

impl Firewalld {
    /// Script that strips the zone down to the configured allow-list
    fn allowlist_script(zone: &str, services: &[String], ports: &[String]) -> String {
        let quote = |value: &str| render_command(&[value.to_string()]);

        let mut lines = vec![
            "set -e".to_string(),
            format!("ZONE={}", quote(zone)),
            r#"SVCS="$(firewall-cmd --zone="$ZONE" --list-services || true)""#.to_string(),
            r#"PORTS="$(firewall-cmd --zone="$ZONE" --list-ports || true)""#.to_string(),
            r#"for s in $SVCS; do firewall-cmd --permanent --zone="$ZONE" --remove-service="$s" || true; done"#
                .to_string(),
            r#"for p in $PORTS; do firewall-cmd --permanent --zone="$ZONE" --remove-port="$p" || true; done"#
                .to_string(),
        ];
        for service in services {
            lines.push(format!(
                r#"firewall-cmd --permanent --zone="$ZONE" --add-service={}"#,
                quote(service)
            ));
        }
        for port in ports {
            lines.push(format!(
                r#"firewall-cmd --permanent --zone="$ZONE" --add-port={}"#,
                quote(port)
            ));
        }
        lines.push("firewall-cmd --reload".to_string());
        lines.join("\n")
    }
}

impl CheckModule for Firewalld {
    fn name(&self) -> &str {
        "firewalld"
    }

    fn description(&self) -> &str {
        "Install and enable firewalld, set the default zone"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let zone = config.get_str("zone", "public")?;
        let enforce_allowlist = config.get_bool("enforce_allowlist", false)?;
        let allow_services = config.get_str_list("allow_services", &[])?;
        let allow_ports = config.get_str_list("allow_ports", &[])?;

        let mut records = vec![
            OutcomeRecord::from_convergence(
                "FW-1",
                "Install firewalld",
                ensure_packages(ctx, &["firewalld"], PackageState::Present),
            ),
            OutcomeRecord::from_convergence(
                "FW-2",
                "Enable firewalld",
                ensure_service(ctx, "firewalld", ServiceState::Enable),
            ),
        ];

        let mut commands = vec![argv(&["firewall-cmd", "--set-default-zone", zone.as_str()])];
        if enforce_allowlist {
            let script = Self::allowlist_script(&zone, &allow_services, &allow_ports);
            commands.push(argv(&["bash", "-lc", script.as_str()]));
        } else {
            commands.push(argv(&["firewall-cmd", "--reload"]));
        }

        records.push(OutcomeRecord::from_convergence(
            "FW-3",
            "Configure firewalld",
            run_commands(ctx, &commands),
        ));
        Ok(records)
    }
}
