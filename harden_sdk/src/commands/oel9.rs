//! Oracle Linux 9 command runner configuration
//!
//! Provides an allow-listed command runner for CIS hardening on Oracle Linux 9.

use harden_base::execution::SystemCommandRunner;
use std::time::Duration;

/// Create command runner configured for Oracle Linux 9 hardening
///
/// Allow-list includes:
/// - dnf, yum: Package installation and removal
/// - systemctl: Service enable/disable/mask and unit reloads
/// - modprobe: Kernel module unloading
/// - bash: Composite scripts (AIDE database rotation, firewalld allow-lists)
/// - update-crypto-policies: System crypto policy
/// - firewall-cmd: Firewall zone configuration
/// - augenrules: Audit rule loading
/// - setenforce, getenforce: SELinux mode
/// - aide: File integrity database
/// - authselect: PAM profile features
/// - sysctl: Kernel parameter reload
/// - mv: Database rotation
/// - ldd: Read-only check for libwrap linkage
pub fn create_oel9_command_runner(timeout: Option<Duration>) -> SystemCommandRunner {
    let mut runner = SystemCommandRunner::new().with_timeout(timeout);

    runner.allow_commands(&[
        "dnf",                    // Package management
        "yum",                    // Package management (legacy)
        "systemctl",              // Service state
        "modprobe",               // Kernel modules
        "bash",                   // Composite scripts
        "update-crypto-policies", // Crypto policy
        "firewall-cmd",           // Firewall
        "augenrules",             // Audit rules
        "setenforce",             // SELinux mode
        "getenforce",             // SELinux status
        "aide",                   // File integrity
        "authselect",             // PAM features
        "sysctl",                 // Kernel parameters
        "mv",                     // File rotation
        "ldd",                    // Library linkage checks
    ]);

    runner
}
