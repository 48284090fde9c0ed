//! Build archive classifier.
//!
//! Archives live two levels deep: date-bucketed folders holding
//! `.xcarchive` bundles. Bundles are grouped by bundle identifier into one
//! parent node per app, newest version first. A bundle whose manifest is
//! incomplete is skipped, never guessed at.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::entry::{EntryId, EntryKind, EntryNode, EntryTree};
use crate::manifest::{self, ArchiveManifest};

use super::ScanContext;

pub fn scan(ctx: &ScanContext<'_>, tree: &mut EntryTree) -> Vec<EntryId> {
    let mut roots = vec![ctx.developer_dir.join("Xcode").join("Archives")];
    if let Some(custom) = ctx.custom_archives {
        if !roots.iter().any(|root| root == custom) {
            roots.push(custom.to_path_buf());
        }
    }

    // Keyed by bundle identifier; BTreeMap keeps project order stable
    // across scans.
    let mut projects: BTreeMap<String, Vec<(ArchiveManifest, PathBuf)>> = BTreeMap::new();

    for root in roots {
        let Ok(date_folders) = fs::read_dir(&root) else {
            tracing::debug!(path = %root.display(), "no archives folder, skipping");
            continue;
        };

        for date_folder in date_folders.flatten() {
            let Ok(candidates) = fs::read_dir(date_folder.path()) else {
                continue;
            };

            for candidate in candidates.flatten() {
                let path = candidate.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("xcarchive") {
                    continue;
                }

                if let Some(archive) = manifest::read_archive_manifest(&path) {
                    projects
                        .entry(archive.bundle_id.clone())
                        .or_default()
                        .push((archive, path));
                }
            }
        }
    }

    projects
        .into_values()
        .map(|mut archives| {
            archives.sort_by(|(lhs, _), (rhs, _)| {
                rhs.version
                    .cmp(&lhs.version)
                    .then_with(|| rhs.build.cmp(&lhs.build))
            });

            let project_node =
                EntryNode::new(archives[0].0.project_name.clone(), false);
            let project_id = tree.insert(project_node);

            let children: Vec<EntryId> = archives
                .into_iter()
                .map(|(archive, path)| {
                    let label = format!("{} ({})", archive.version, archive.build);
                    let extra_info = archive.created.format("%Y-%m-%d %H:%M").to_string();

                    let node = EntryNode::new(label, false)
                        .with_extra_info(extra_info)
                        .with_kind(EntryKind::Archive {
                            project_name: archive.project_name,
                            bundle_id: archive.bundle_id,
                            version: archive.version,
                            build: archive.build,
                            created: archive.created,
                        });

                    let id = tree.insert(node);
                    tree.add_path(id, path);
                    id
                })
                .collect();

            tree.add_children(project_id, &children);
            project_id
        })
        .collect()
}
