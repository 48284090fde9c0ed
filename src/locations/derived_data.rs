//! Derived-data cache classifier.
//!
//! Every immediate subdirectory of the derived-data folder is one project
//! cache, named `Project_Name-<opaque hash>`. The hash suffix is stripped
//! for display and the originating workspace path is recovered from the
//! folder's manifest when possible.

use std::fs;

use crate::entry::{EntryId, EntryKind, EntryNode, EntryTree};
use crate::manifest;

use super::ScanContext;

/// The compiler module cache regenerates itself cheaply and is shared
/// between projects, so it is never offered for deletion.
const MODULE_CACHE_DIR: &str = "ModuleCache";

pub fn scan(ctx: &ScanContext<'_>, tree: &mut EntryTree) -> Vec<EntryId> {
    let mut roots = vec![ctx.developer_dir.join("Xcode").join("DerivedData")];
    if let Some(custom) = ctx.custom_derived_data {
        if !roots.iter().any(|root| root == custom) {
            roots.push(custom.to_path_buf());
        }
    }

    let mut results = Vec::new();
    for root in roots {
        let Ok(listing) = fs::read_dir(&root) else {
            tracing::debug!(path = %root.display(), "no derived data folder, skipping");
            continue;
        };

        for item in listing.flatten() {
            let path = item.path();
            if !path.is_dir() {
                continue;
            }

            let dir_name = item.file_name().to_string_lossy().into_owned();
            if dir_name == MODULE_CACHE_DIR {
                continue;
            }

            let project_name = display_name(&dir_name);
            let workspace_path = manifest::read_workspace_path(&path);

            let label = match &workspace_path {
                Some(workspace) => format!("{} ({})", project_name, workspace.display()),
                None => project_name.clone(),
            };

            let node = EntryNode::new(label, false).with_kind(EntryKind::DerivedData {
                project_name,
                workspace_path,
            });

            let id = tree.insert(node);
            tree.add_path(id, path);
            results.push(id);
        }
    }

    results.sort_by(|&lhs, &rhs| tree.node(lhs).label().cmp(tree.node(rhs).label()));
    results
}

/// Strip the trailing dash-delimited hash and render underscores as the
/// spaces they stand in for.
fn display_name(dir_name: &str) -> String {
    let parts: Vec<&str> = dir_name.split('-').filter(|part| !part.is_empty()).collect();
    let kept = if parts.len() > 1 {
        &parts[..parts.len() - 1]
    } else {
        &parts[..]
    };

    kept.join("-").replace('_', " ")
}
