//! Device-support symbol bundle classifier.
//!
//! Bundle directory names follow loose conventions, e.g.:
//!
//! ```text
//! Watch2,7 5.2.1 (16U113)
//! iPad 10.2 (11C203)
//! 12.3 (16F156) arm64e
//! 12.3.1 (16F203)
//! ```
//!
//! Whitespace tokens resolve to `[device] version build [arch]`, trying the
//! version in slot 0 first, then slot 1. Names that fit neither shape are
//! logged and skipped.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::entry::{EntryId, EntryKind, EntryNode, EntryTree, OsFamily};
use crate::version::Version;

use super::ScanContext;

/// One parsed symbol bundle, prior to tree insertion.
#[derive(Debug)]
struct SymbolBundle {
    device: Option<String>,
    version: Version,
    build: Option<String>,
    architecture: Option<String>,
    created: Option<DateTime<Local>>,
    paths: Vec<PathBuf>,
}

/// Scan every OS family folder and return one container entry per family.
///
/// Families appear even when empty on disk, so the tree shape is stable
/// across machines. Within a family, entries are sorted newest first and
/// the newest one is deselected by default since its symbols are assumed
/// to still be in use.
pub fn scan(ctx: &ScanContext<'_>, tree: &mut EntryTree) -> Vec<EntryId> {
    let xcode_dir = ctx.developer_dir.join("Xcode");

    let mut families = Vec::with_capacity(OsFamily::ALL.len());
    for family in OsFamily::ALL {
        let family_id = tree.insert(EntryNode::new(family.label(), true));
        let dir = xcode_dir.join(format!("{} DeviceSupport", family.label()));

        match fs::read_dir(&dir) {
            Ok(listing) => {
                let mut bundles = Vec::new();
                for item in listing.flatten() {
                    let path = item.path();
                    let name = item.file_name().to_string_lossy().into_owned();

                    match parse_directory_name(&name) {
                        Some(mut bundle) => {
                            bundle.created = fs::metadata(&path)
                                .ok()
                                .and_then(|m| m.created().ok())
                                .map(DateTime::<Local>::from);
                            bundle.paths.push(path);
                            bundles.push(bundle);
                        }
                        None => {
                            tracing::warn!(
                                name,
                                family = family.label(),
                                "no version in device support directory name, skipping"
                            );
                        }
                    }
                }

                bundles.sort_by(|lhs, rhs| rhs.version.cmp(&lhs.version));
                merge_architecture_duplicates(&mut bundles);

                let children: Vec<EntryId> = bundles
                    .into_iter()
                    .map(|bundle| insert_bundle(tree, family, bundle))
                    .collect();
                tree.add_children(family_id, &children);

                // Deselect the newest entry, we usually still want those
                // symbols.
                if let Some(&newest) = children.first() {
                    tree.deselect_with_children(newest);
                }
            }
            Err(_) => {
                tracing::warn!(
                    path = %dir.display(),
                    "cannot read device support directory, skipping"
                );
            }
        }

        families.push(family_id);
    }

    families
}

fn parse_directory_name(name: &str) -> Option<SymbolBundle> {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let own = |token: Option<&&str>| token.map(|t| t.to_string());

    if let Ok(version) = tokens[0].parse::<Version>() {
        Some(SymbolBundle {
            device: None,
            version,
            build: own(tokens.get(1)),
            architecture: own(tokens.get(2)),
            created: None,
            paths: Vec::new(),
        })
    } else if tokens.len() > 1 {
        let version = tokens[1].parse::<Version>().ok()?;
        Some(SymbolBundle {
            device: Some(tokens[0].to_string()),
            version,
            build: own(tokens.get(2)),
            architecture: own(tokens.get(3)),
            created: None,
            paths: Vec::new(),
        })
    } else {
        None
    }
}

/// Fold arch-qualified duplicates into the plain entry sharing their
/// version and build: the plain entry gains the duplicate's paths and the
/// arch-only entry disappears. An arch entry with no plain counterpart is
/// kept as its own row. With several plain candidates the first (newest)
/// one wins.
fn merge_architecture_duplicates(bundles: &mut Vec<SymbolBundle>) {
    let (with_arch, mut merged): (Vec<_>, Vec<_>) = bundles
        .drain(..)
        .partition(|bundle| bundle.architecture.is_some());

    for bundle in with_arch {
        match merged.iter_mut().find(|candidate| {
            candidate.architecture.is_none()
                && candidate.version == bundle.version
                && candidate.build == bundle.build
        }) {
            Some(host) => host.paths.extend(bundle.paths),
            None => merged.push(bundle),
        }
    }

    merged.sort_by(|lhs, rhs| rhs.version.cmp(&lhs.version));
    *bundles = merged;
}

fn insert_bundle(tree: &mut EntryTree, family: OsFamily, bundle: SymbolBundle) -> EntryId {
    let mut label = format!("{} {}", family.label(), bundle.version);
    if let Some(build) = &bundle.build {
        label.push(' ');
        label.push_str(build);
    }
    if let Some(device) = &bundle.device {
        label.push_str(&format!(" ({})", device));
    }

    let tooltip = match bundle.created {
        Some(created) => format!("{} {}", label, created.format("%Y-%m-%d")),
        None => label.clone(),
    };

    let node = EntryNode::new(label, true)
        .with_tooltip(tooltip)
        .with_kind(EntryKind::DeviceSupport {
            device: bundle.device,
            os: family,
            version: bundle.version,
            build: bundle.build,
            architecture: bundle.architecture,
            created: bundle.created,
        });

    let id = tree.insert(node);
    tree.add_paths(id, bundle.paths);
    id
}
