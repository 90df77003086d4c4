//! Hardening profiles shipped with the tool

use harden_base::checks::Profile;

pub const L1_SERVER: &str = "l1-server";
pub const L2_SERVER: &str = "l2-server";

const L1_MODULES: &[&str] = &[
    "kernel",
    "sysctl",
    "crypto",
    "banners",
    "ssh",
    "sudo",
    "services",
    "packages",
    "audit",
    "logging",
    "fileperms",
    "firewalld",
];

const L2_EXTRA_MODULES: &[&str] = &[
    "selinux",
    "auth",
    "coredumps",
    "cron",
    "aide",
    "mounts",
    "ipv6",
];

pub fn l1_server() -> Profile {
    Profile::new(L1_SERVER, "CIS Level 1 server baseline", L1_MODULES)
}

/// Level 1 plus the stricter Level 2 modules
pub fn l2_server() -> Profile {
    l1_server().extend(L2_SERVER, "CIS Level 2 server baseline", L2_EXTRA_MODULES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_contains_l1_in_order() {
        let l1 = l1_server();
        let l2 = l2_server();

        assert_eq!(l1.len(), 12);
        assert_eq!(l2.len(), 19);
        assert_eq!(&l2.modules()[..l1.len()], l1.modules());
        assert_eq!(l2.modules().last().map(String::as_str), Some("ipv6"));
    }
}
