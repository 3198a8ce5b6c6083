// ABOUTME: derives the os identifier that recipes and steps are matched against.
// ABOUTME: keeps the decision a pure function of the platform name and release string.

use crate::OsId;

pub fn detect_from(system: &str, release: &str) -> OsId {
    let system = system.to_ascii_lowercase();

    if system.contains("windows") {
        if release.to_ascii_lowercase().contains("microsoft") {
            return OsId::Wsl;
        }
        return OsId::Windows;
    }

    if system.contains("darwin") || system == "macos" {
        return OsId::Mac;
    }

    OsId::Linux
}

pub fn detect() -> OsId {
    detect_from(std::env::consts::OS, &host_release())
}

#[cfg(target_os = "linux")]
fn host_release() -> String {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
fn host_release() -> String {
    String::new()
}
