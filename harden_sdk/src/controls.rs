//! CIS Oracle Linux 9 benchmark control mapping
//!
//! Maps module record ids to the benchmark control numbers they evidence.
//! The orchestrator attaches the control to each matching record.

pub const BENCHMARK: &str = "CIS Oracle Linux 9 Benchmark v2.0.0";

pub const CONTROL_MAPPING: &[(&str, &str)] = &[
    // Kernel
    ("KERN-1", "1.1.1-1.1.24"),
    ("SYSCTL-1", "3.1.1-3.3.2"),
    // Cryptography
    ("CRYPTO-1", "1.5.1"),
    // Access control
    ("BANNER-1", "5.4.4"),
    ("SSH-1", "5.2.1-5.2.21"),
    ("SUDO-1", "5.3.7"),
    // Services
    ("SVC-avahi-daemon", "2.1.1"),
    ("SVC-cups", "2.2.1"),
    ("SVC-dhcpd", "2.1.2"),
    ("SVC-slapd", "2.1.3"),
    ("SVC-nfs-server", "2.1.4"),
    ("SVC-rpcbind", "2.1.5"),
    ("SVC-smb", "2.2.2"),
    ("SVC-snmpd", "2.2.3"),
    ("SVC-rsyncd", "2.2.4"),
    ("SVC-ypserv", "2.1.6"),
    ("SVC-telnet.socket", "2.3.1"),
    ("SVC-tftp.socket", "2.3.2"),
    ("SVC-AIDE-PKG", "6.2.1"),
    ("SVC-AIDE-INIT", "6.2.1"),
    ("SVC-auditd", "4.1.2"),
    ("SVC-JOURNAL-REMOTE", "4.2.2.1"),
    // Packages
    ("PKG-1", "2.4.1-2.4.2"),
    // Audit and logging
    ("AUD-1", "4.1.1"),
    ("AUD-2", "4.1.2"),
    ("AUD-3", "4.1.3-4.1.18"),
    ("LOG-1", "4.2.2.1"),
    ("LOG-2", "4.2.1.1"),
    ("LOG-3", "4.2.1.2"),
    // File integrity and permissions
    ("PERM-1", "5.6.1-5.6.5"),
    ("AIDE-1", "6.2.1"),
    ("AIDE-2", "6.2.1"),
    // Firewall and network
    ("FW-1", "3.4.1"),
    ("FW-2", "3.4.2"),
    ("FW-3", "3.4.3-3.4.4"),
    // SELinux
    ("SEL-1", "1.6.1"),
    // Authentication
    ("AUTH-1", "5.4.1"),
    ("AUTH-2", "5.4.2"),
    ("AUTH-3", "5.4.5"),
    ("AUTH-4", "5.4.6"),
    // System limits and scheduling
    ("CORE-1", "1.5.3"),
    ("CRON-1", "5.1.1"),
    ("CRON-2", "5.1.2"),
    ("CRON-3", "5.1.3-5.1.5"),
    // Mounts
    ("MNT-1", "1.4.2"),
    // IPv6
    ("IPV6-0", "3.3.1-3.3.2"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_control_ids_unique() {
        let ids: HashSet<&str> = CONTROL_MAPPING.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), CONTROL_MAPPING.len());
    }
}
