use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::version::Version;

/// OS family of a device-support symbol bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Ios,
    WatchOs,
    TvOs,
    MacOs,
}

impl OsFamily {
    pub const ALL: [OsFamily; 4] = [
        OsFamily::Ios,
        OsFamily::WatchOs,
        OsFamily::TvOs,
        OsFamily::MacOs,
    ];

    /// Label as it appears on disk and in the UI, e.g. `iOS DeviceSupport`.
    pub fn label(&self) -> &'static str {
        match self {
            OsFamily::Ios => "iOS",
            OsFamily::WatchOs => "watchOS",
            OsFamily::TvOs => "tvOS",
            OsFamily::MacOs => "macOS",
        }
    }
}

/// Typed metadata attached to an entry, parsed once at classification time.
///
/// Payloads are passive: they only feed label and description formatting,
/// the tree operations treat every kind alike.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    Generic,
    DeviceSupport {
        device: Option<String>,
        os: OsFamily,
        version: Version,
        build: Option<String>,
        architecture: Option<String>,
        created: Option<DateTime<Local>>,
    },
    Archive {
        project_name: String,
        bundle_id: String,
        version: Version,
        build: String,
        created: DateTime<Local>,
    },
    DerivedData {
        project_name: String,
        workspace_path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_family_labels() {
        assert_eq!(OsFamily::Ios.label(), "iOS");
        assert_eq!(OsFamily::WatchOs.label(), "watchOS");
        assert_eq!(OsFamily::TvOs.label(), "tvOS");
        assert_eq!(OsFamily::MacOs.label(), "macOS");
    }

    #[test]
    fn kinds_compare_by_payload() {
        let a = EntryKind::DerivedData {
            project_name: "App".into(),
            workspace_path: None,
        };
        let b = EntryKind::DerivedData {
            project_name: "App".into(),
            workspace_path: None,
        };
        assert_eq!(a, b);
        assert_ne!(a, EntryKind::Generic);
    }
}
