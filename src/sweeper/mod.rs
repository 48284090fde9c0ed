//! Scan orchestration.
//!
//! A [`Sweeper`] owns the entry tree with one category root per
//! [`Location`], drives the classifiers, and exposes aggregate totals plus
//! the deletion executor. Scanning and deleting are long-running
//! filesystem operations meant to run off any interactive thread; observer
//! callbacks fire synchronously on the thread doing the work, and any
//! re-marshaling is the caller's responsibility. At most one scan or one
//! delete may be in flight per instance; the core performs no internal
//! locking, callers must serialize.

mod deleter;

pub use deleter::DeleteObserver;

use std::path::{Path, PathBuf};

use crate::access::ScopedAccess;
use crate::entry::{EntryId, EntryNode, EntryTree};
use crate::error::{Result, SweepError};
use crate::locations::{self, Location, ScanContext};

/// Scan lifecycle notifications.
pub trait ScanObserver {
    fn scan_will_begin(&mut self) {}
    fn scan_did_finish(&mut self) {}
}

impl ScanObserver for () {}

#[derive(Debug)]
pub struct Sweeper {
    developer_dir: PathBuf,
    custom_derived_data: Option<ScopedAccess>,
    custom_archives: Option<ScopedAccess>,
    tree: EntryTree,
    roots: Vec<(Location, EntryId)>,
}

impl Sweeper {
    /// Create an orchestrator rooted at `developer_dir`.
    ///
    /// Fails when the directory is missing or does not hold the `Xcode`
    /// cache folder, since without that substructure there is nothing this tool
    /// could safely classify. Custom folders are optional; one that cannot
    /// be accessed degrades its location to "no entries found" with a
    /// warning instead of failing construction.
    pub fn new(
        developer_dir: impl Into<PathBuf>,
        custom_derived_data: Option<PathBuf>,
        custom_archives: Option<PathBuf>,
    ) -> Result<Self> {
        let developer_dir = developer_dir.into();

        if !developer_dir.is_dir() {
            return Err(SweepError::DeveloperDirMissing(developer_dir));
        }
        if !developer_dir.join("Xcode").is_dir() {
            return Err(SweepError::DeveloperDirStructure(developer_dir));
        }

        let mut tree = EntryTree::new();
        let roots = Location::ALL
            .iter()
            .map(|&location| {
                let node = EntryNode::new(location.label(), location.default_selected())
                    .with_tooltip(location.tooltip());
                (location, tree.insert(node))
            })
            .collect();

        Ok(Self {
            developer_dir,
            custom_derived_data: custom_derived_data.as_deref().and_then(acquire_or_degrade),
            custom_archives: custom_archives.as_deref().and_then(acquire_or_degrade),
            tree,
            roots,
        })
    }

    pub fn developer_dir(&self) -> &Path {
        &self.developer_dir
    }

    pub fn tree(&self) -> &EntryTree {
        &self.tree
    }

    /// Category root for a location.
    pub fn entry(&self, location: Location) -> EntryId {
        self.roots
            .iter()
            .find(|(candidate, _)| *candidate == location)
            .map(|(_, id)| *id)
            .expect("every location has a root entry")
    }

    /// Sum of the cached sizes of all category roots.
    pub fn total_size(&self) -> u64 {
        self.roots
            .iter()
            .map(|&(_, root)| self.tree.node(root).size().bytes().unwrap_or(0))
            .sum()
    }

    /// Bytes the current selection would reclaim.
    pub fn selected_size(&self) -> u64 {
        self.roots
            .iter()
            .map(|&(_, root)| self.tree.selected_size(root))
            .sum()
    }

    /// Force-select or deselect a subtree, then re-roll selection state up
    /// through every category root.
    pub fn set_selected(&mut self, id: EntryId, selected: bool) {
        if selected {
            self.tree.select_with_children(id);
        } else {
            self.tree.deselect_with_children(id);
        }

        let roots = self.roots.clone();
        for (_, root) in roots {
            self.tree.recalculate_selection(root);
        }
    }

    /// Replace the custom folder overrides, re-acquiring scoped access.
    pub fn update_custom_folders(
        &mut self,
        custom_derived_data: Option<PathBuf>,
        custom_archives: Option<PathBuf>,
    ) {
        self.custom_derived_data = custom_derived_data.as_deref().and_then(acquire_or_degrade);
        self.custom_archives = custom_archives.as_deref().and_then(acquire_or_degrade);
    }

    /// Scan the given locations, replacing all previous results.
    ///
    /// Every category root is cleared, not just the rescanned ones, then
    /// each requested location is classified, sized and selection-rolled.
    pub fn scan(&mut self, scan_locations: &[Location], observer: &mut dyn ScanObserver) {
        observer.scan_will_begin();
        tracing::info!(locations = ?scan_locations, "scan starting");

        let roots = self.roots.clone();
        for &(_, root) in &roots {
            self.tree.clear(root);
        }

        for &(location, root) in &roots {
            if !scan_locations.contains(&location) {
                continue;
            }

            let ctx = ScanContext {
                developer_dir: &self.developer_dir,
                custom_derived_data: self.custom_derived_data.as_ref().map(|a| a.path()),
                custom_archives: self.custom_archives.as_ref().map(|a| a.path()),
            };

            locations::populate(location, &ctx, &mut self.tree, root);
            self.tree.recalculate_size(root);
            self.tree.recalculate_selection(root);
        }

        tracing::info!(total_size = self.total_size(), "scan finished");
        observer.scan_did_finish();
    }

    /// Indented dump of every category tree, for diagnostics.
    pub fn debug_representation(&self) -> String {
        let mut result = String::new();
        for &(_, root) in &self.roots {
            result.push_str(&self.tree.debug_representation(root));
            result.push('\n');
        }
        result
    }
}

fn acquire_or_degrade(path: &Path) -> Option<ScopedAccess> {
    match ScopedAccess::acquire(path) {
        Ok(access) => Some(access),
        Err(err) => {
            tracing::warn!(%err, "custom folder not accessible, it will report no entries");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Selection;
    use std::fs;
    use tempfile::TempDir;

    fn make_developer_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Xcode")).unwrap();
        tmp
    }

    struct CountingObserver {
        begins: usize,
        finishes: usize,
    }

    impl ScanObserver for CountingObserver {
        fn scan_will_begin(&mut self) {
            self.begins += 1;
        }

        fn scan_did_finish(&mut self) {
            self.finishes += 1;
        }
    }

    #[test]
    fn construction_requires_developer_dir() {
        let err = Sweeper::new("/nonexistent/Developer", None, None).unwrap_err();
        assert!(matches!(err, SweepError::DeveloperDirMissing(_)));
    }

    #[test]
    fn construction_requires_xcode_substructure() {
        let tmp = TempDir::new().unwrap();
        let err = Sweeper::new(tmp.path(), None, None).unwrap_err();
        assert!(matches!(err, SweepError::DeveloperDirStructure(_)));
    }

    #[test]
    fn inaccessible_custom_folder_degrades_quietly() {
        let tmp = make_developer_dir();
        let sweeper = Sweeper::new(
            tmp.path(),
            Some(PathBuf::from("/nonexistent/custom")),
            None,
        )
        .unwrap();
        assert!(sweeper.custom_derived_data.is_none());
    }

    #[test]
    fn roots_exist_for_every_location() {
        let tmp = make_developer_dir();
        let sweeper = Sweeper::new(tmp.path(), None, None).unwrap();

        for location in Location::ALL {
            let root = sweeper.entry(location);
            assert_eq!(sweeper.tree().node(root).label(), location.label());
        }
    }

    #[test]
    fn scan_emits_lifecycle_notifications() {
        let tmp = make_developer_dir();
        let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();

        let mut observer = CountingObserver {
            begins: 0,
            finishes: 0,
        };
        sweeper.scan(&Location::ALL, &mut observer);

        assert_eq!(observer.begins, 1);
        assert_eq!(observer.finishes, 1);
    }

    #[test]
    fn scan_replaces_previous_results() {
        let tmp = make_developer_dir();
        let logs_dir = tmp.path().join("Xcode/iOS Device Logs");
        fs::create_dir_all(&logs_dir).unwrap();
        fs::write(logs_dir.join("MyApp 14.0 (A).log"), "old").unwrap();
        fs::write(logs_dir.join("MyApp 14.5 (B).log"), "new").unwrap();

        let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
        sweeper.scan(&[Location::Logs], &mut ());

        let logs_root = sweeper.entry(Location::Logs);
        assert_eq!(sweeper.tree().node(logs_root).paths().len(), 1);

        // Rescan with the stale file gone.
        fs::remove_file(logs_dir.join("MyApp 14.0 (A).log")).unwrap();
        sweeper.scan(&[Location::Logs], &mut ());
        assert!(sweeper.tree().node(logs_root).paths().is_empty());
    }

    #[test]
    fn set_selected_rolls_up() {
        let tmp = make_developer_dir();
        let support = tmp.path().join("Xcode/iOS DeviceSupport/14.2 (18B92)");
        fs::create_dir_all(&support).unwrap();
        fs::write(support.join("Symbols.bin"), vec![b'x'; 64]).unwrap();

        let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
        sweeper.scan(&[Location::DeviceSupport], &mut ());

        let root = sweeper.entry(Location::DeviceSupport);
        sweeper.set_selected(root, false);
        assert_eq!(sweeper.tree().node(root).selection(), Selection::Off);
        assert_eq!(sweeper.selected_size(), 0);

        sweeper.set_selected(root, true);
        assert_eq!(sweeper.tree().node(root).selection(), Selection::On);
        assert_eq!(sweeper.selected_size(), sweeper.total_size());
    }

    #[test]
    fn update_custom_folders_affects_next_scan() {
        let tmp = make_developer_dir();
        let custom = TempDir::new().unwrap();
        let project = custom.path().join("Side_Project-ffff");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("index.db"), vec![b'x'; 64]).unwrap();

        let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
        sweeper.scan(&[Location::DerivedData], &mut ());
        let root = sweeper.entry(Location::DerivedData);
        assert!(sweeper.tree().node(root).children().is_empty());

        sweeper.update_custom_folders(Some(custom.path().to_path_buf()), None);
        sweeper.scan(&[Location::DerivedData], &mut ());
        assert_eq!(sweeper.tree().node(root).children().len(), 1);
    }

    #[test]
    fn totals_sum_over_locations() {
        let tmp = make_developer_dir();
        let docs = tmp.path().join("Shared/Documentation");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("old.docset"), vec![b'x'; 2048]).unwrap();

        let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
        sweeper.scan(&Location::ALL, &mut ());

        assert!(sweeper.total_size() >= 2048);
        // Old documentation is deselected by default.
        assert_eq!(sweeper.selected_size(), 0);
    }
}
