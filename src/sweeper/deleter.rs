//! Bulk deletion of selected entries.
//!
//! The executor walks each selected category with an explicit stack; the
//! trees can get deep and recursion depth should not depend on how many
//! archives someone has hoarded. Items are gathered first, then processed
//! in order; one failing path never aborts the batch. There is no
//! cancellation: once started, a batch runs to completion.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::entry::Selection;

use super::Sweeper;

/// Simulated per-item duration of a dry run.
pub const DRY_RUN_DELAY: Duration = Duration::from_millis(50);

/// Deletion progress notifications. All methods default to no-ops so
/// observers implement only what they need.
pub trait DeleteObserver {
    fn delete_will_begin(&mut self) {}

    /// One gathered path is about to be processed. `current` is 1-based.
    fn delete_in_progress(
        &mut self,
        _location: &str,
        _label: &str,
        _path: &Path,
        _current: usize,
        _total: usize,
    ) {
    }

    fn delete_item_failed(
        &mut self,
        _error: &io::Error,
        _location: &str,
        _label: &str,
        _path: &Path,
    ) {
    }

    fn delete_did_finish(&mut self) {}
}

impl DeleteObserver for () {}

#[derive(Debug)]
struct DeletionItem {
    location: String,
    label: String,
    path: PathBuf,
}

impl Sweeper {
    /// Delete every selected leaf path, reporting through `observer`.
    ///
    /// With `dry_run` the filesystem is untouched and each item is
    /// simulated with a fixed short delay instead.
    pub fn delete_selected(&mut self, dry_run: bool, observer: &mut dyn DeleteObserver) {
        observer.delete_will_begin();

        let items = self.gather_deletion_items();
        let total = items.len();

        for (index, item) in items.iter().enumerate() {
            let ordinal = index + 1;
            observer.delete_in_progress(&item.location, &item.label, &item.path, ordinal, total);

            tracing::info!(
                location = %item.location,
                label = %item.label,
                path = %item.path.display(),
                dry_run,
                "deleting {}/{}",
                ordinal,
                total
            );

            if dry_run {
                thread::sleep(DRY_RUN_DELAY);
            } else if let Err(error) = remove_path(&item.path) {
                tracing::warn!(path = %item.path.display(), %error, "failed to delete");
                observer.delete_item_failed(&error, &item.location, &item.label, &item.path);
            }
        }

        observer.delete_did_finish();
    }

    /// Pre-order walk of every category that is not fully deselected.
    ///
    /// Children are pushed onto the stack in reverse so they are visited
    /// first-to-last; the resulting item order is part of the observable
    /// contract and pinned by a golden-order test. Only nodes that are not
    /// Off and hold direct paths produce items, containers never do, and
    /// a Mixed node contributes through its selected descendants.
    fn gather_deletion_items(&self) -> Vec<DeletionItem> {
        let mut items = Vec::new();

        for &(location, root) in &self.roots {
            if self.tree.node(root).selection() == Selection::Off {
                continue;
            }

            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                let node = self.tree.node(id);

                if node.selection() != Selection::Off && !node.paths().is_empty() {
                    for path in node.paths() {
                        items.push(DeletionItem {
                            location: location.label().to_string(),
                            label: node.full_description(),
                            path: path.clone(),
                        });
                    }
                }

                for &child in node.children().iter().rev() {
                    stack.push(child);
                }
            }
        }

        items
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
