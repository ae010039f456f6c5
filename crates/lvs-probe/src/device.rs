//! Device identity adapter: hardware identifiers of the local machine.
//!
//! On Linux the MAC address of every network interface is read from
//! `/sys/class/net/<iface>/address`. Loopback and other interfaces without
//! a hardware address report `00:00:00:00:00:00`, which is dropped. An
//! unreadable directory yields an empty set, which fails the device check.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use lvs_core::DeviceId;

/// Sysfs directory listing network interfaces.
pub const SYS_CLASS_NET: &str = "/sys/class/net";

const NULL_MAC: &str = "00:00:00:00:00:00";

/// Reports the identifiers of the machine the process runs on.
pub trait DeviceIdentityAdapter: Send + Sync {
    /// Identifiers of the current machine. May be empty.
    fn local_device_ids(&self) -> BTreeSet<DeviceId>;
}

/// Enumerates interface MAC addresses from sysfs.
#[derive(Debug, Clone)]
pub struct SystemDevices {
    root: PathBuf,
}

impl Default for SystemDevices {
    fn default() -> Self {
        Self {
            root: PathBuf::from(SYS_CLASS_NET),
        }
    }
}

impl SystemDevices {
    /// Read interfaces from the standard sysfs location.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read interfaces from a directory laid out like `/sys/class/net`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory being enumerated.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DeviceIdentityAdapter for SystemDevices {
    fn local_device_ids(&self) -> BTreeSet<DeviceId> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    root = %self.root.display(),
                    error = %e,
                    "cannot enumerate network interfaces"
                );
                return BTreeSet::new();
            }
        };

        let mut ids = BTreeSet::new();
        for entry in entries.flatten() {
            let path = entry.path().join("address");
            let Ok(raw) = std::fs::read_to_string(&path) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() || raw == NULL_MAC {
                continue;
            }
            match DeviceId::new(raw) {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping interface"),
            }
        }
        tracing::debug!(count = ids.len(), "enumerated local device identifiers");
        ids
    }
}

/// Adapter returning a fixed identifier set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticDevices(pub BTreeSet<DeviceId>);

impl StaticDevices {
    /// Build from any iterator of identifiers.
    pub fn new(ids: impl IntoIterator<Item = DeviceId>) -> Self {
        Self(ids.into_iter().collect())
    }
}

impl DeviceIdentityAdapter for StaticDevices {
    fn local_device_ids(&self) -> BTreeSet<DeviceId> {
        self.0.clone()
    }
}
