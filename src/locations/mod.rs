//! Per-category cache classifiers.
//!
//! Each location gets its own heuristic parser that turns a raw directory
//! listing (plus optional bundle manifests) into typed entry subtrees. A
//! malformed item never aborts the rest of its location; a missing or
//! unreadable root directory simply yields zero entries for that branch.

pub mod archives;
pub mod derived_data;
pub mod device_support;
pub mod logs;
pub mod old_docs;

use std::path::Path;

use clap::ValueEnum;

use crate::entry::{EntryId, EntryTree};

/// The five top-level cache categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Location {
    DeviceSupport,
    Archives,
    DerivedData,
    Logs,
    OldDocumentation,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::DeviceSupport,
        Location::Archives,
        Location::DerivedData,
        Location::Logs,
        Location::OldDocumentation,
    ];

    /// Human-readable category label, used for the root entry and in
    /// deletion progress reporting.
    pub fn label(&self) -> &'static str {
        match self {
            Location::DeviceSupport => "Device Support",
            Location::Archives => "Archives",
            Location::DerivedData => "Derived Data",
            Location::Logs => "Old Simulator & Device Logs",
            Location::OldDocumentation => "Old Documentation Downloads",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            Location::DeviceSupport => {
                "Systems debug symbols retained for every OS version, usually only the newer ones are needed"
            }
            Location::Archives => {
                "Archived apps, delete only if you are sure you don't need them"
            }
            Location::DerivedData => "Cached project data & symbol index",
            Location::Logs => {
                "Old device logs & crash databases, only the most recent ones are usually needed"
            }
            Location::OldDocumentation => {
                "Old offline documentation, not used anymore by modern toolchains"
            }
        }
    }

    /// Whether the category root starts out selected after a fresh scan.
    pub fn default_selected(&self) -> bool {
        matches!(self, Location::DeviceSupport | Location::Logs)
    }
}

/// Folders a scan pass reads from, resolved once by the orchestrator and
/// passed into every classifier.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub developer_dir: &'a Path,
    pub custom_derived_data: Option<&'a Path>,
    pub custom_archives: Option<&'a Path>,
}

/// Run the classifier for one location and attach its results under the
/// category root. Hierarchical categories gain children; the flat ones
/// (logs, old documentation) attach paths directly to the root.
pub fn populate(
    location: Location,
    ctx: &ScanContext<'_>,
    tree: &mut EntryTree,
    root: EntryId,
) {
    match location {
        Location::DeviceSupport => {
            let children = device_support::scan(ctx, tree);
            tree.add_children(root, &children);
        }
        Location::Archives => {
            let children = archives::scan(ctx, tree);
            tree.add_children(root, &children);
        }
        Location::DerivedData => {
            let children = derived_data::scan(ctx, tree);
            tree.add_children(root, &children);
        }
        Location::Logs => {
            tree.add_paths(root, logs::scan(ctx));
        }
        Location::OldDocumentation => {
            tree.add_paths(root, old_docs::scan(ctx));
        }
    }
}
