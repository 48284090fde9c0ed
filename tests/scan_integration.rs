//! Integration tests for scanning a fabricated developer directory.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use xcsweep::entry::{validate_exclusivity, Selection};
use xcsweep::{Location, Sweeper};

fn write_archive_bundle(
    archives_root: &Path,
    date_folder: &str,
    bundle: &str,
    name: &str,
    bundle_id: &str,
    version: &str,
    build: &str,
) {
    let dir = archives_root
        .join(date_folder)
        .join(format!("{bundle}.xcarchive"));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Payload.bin"), vec![b'x'; 1024]).unwrap();
    fs::write(
        dir.join("Info.plist"),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Name</key>
    <string>{name}</string>
    <key>CreationDate</key>
    <date>2021-03-01T10:30:00Z</date>
    <key>ApplicationProperties</key>
    <dict>
        <key>CFBundleIdentifier</key>
        <string>{bundle_id}</string>
        <key>CFBundleShortVersionString</key>
        <string>{version}</string>
        <key>CFBundleVersion</key>
        <string>{build}</string>
    </dict>
</dict>
</plist>
"#
        ),
    )
    .unwrap();
}

/// A developer directory exercising every location.
fn create_developer_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    // Device support symbols for two iOS versions.
    for name in ["14.2 (18B92)", "14.5 (18E182)"] {
        let bundle = root.join("Xcode/iOS DeviceSupport").join(name);
        fs::create_dir_all(&bundle).unwrap();
        fs::write(bundle.join("Symbols.bin"), vec![b'x'; 2048]).unwrap();
    }

    // Two archives of the same app.
    let archives = root.join("Xcode/Archives");
    write_archive_bundle(
        &archives,
        "2021-01-01",
        "Acme 1-1-21, 10.00 AM",
        "Acme",
        "com.acme.app",
        "1.0",
        "100",
    );
    write_archive_bundle(
        &archives,
        "2021-03-01",
        "Acme 3-1-21, 10.30 AM",
        "Acme",
        "com.acme.app",
        "1.1",
        "101",
    );

    // One derived data project.
    let derived = root.join("Xcode/DerivedData/My_App-abcdef123456");
    fs::create_dir_all(&derived).unwrap();
    fs::write(derived.join("index.db"), vec![b'x'; 512]).unwrap();

    // Logs at two versions.
    let logs = root.join("Xcode/iOS Device Logs");
    fs::create_dir_all(&logs).unwrap();
    fs::write(logs.join("MyApp 14.0 (A).log"), "old").unwrap();
    fs::write(logs.join("MyApp 14.5 (B).log"), "new").unwrap();

    // Old documentation.
    let docs = root.join("Shared/Documentation");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("old.docset"), vec![b'x'; 256]).unwrap();

    tmp
}

#[test]
fn device_support_orders_newest_first_and_keeps_it() {
    let tmp = create_developer_dir();
    let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
    sweeper.scan(&[Location::DeviceSupport], &mut ());

    let root = sweeper.entry(Location::DeviceSupport);
    let ios = sweeper.tree().node(root).children()[0];
    let versions = sweeper.tree().node(ios).children().to_vec();

    assert_eq!(versions.len(), 2);
    assert_eq!(sweeper.tree().node(versions[0]).label(), "iOS 14.5 (18E182)");
    assert_eq!(sweeper.tree().node(versions[1]).label(), "iOS 14.2 (18B92)");

    // Only the older bundle defaults to selected.
    assert_eq!(sweeper.tree().node(versions[0]).selection(), Selection::Off);
    assert_eq!(sweeper.tree().node(versions[1]).selection(), Selection::On);

    // Which makes the family and category roll up to Mixed.
    assert_eq!(sweeper.tree().node(ios).selection(), Selection::Mixed);
    assert_eq!(sweeper.tree().node(root).selection(), Selection::Mixed);
}

#[test]
fn archives_group_into_one_project_node() {
    let tmp = create_developer_dir();
    let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
    sweeper.scan(&[Location::Archives], &mut ());

    let root = sweeper.entry(Location::Archives);
    let projects = sweeper.tree().node(root).children().to_vec();
    assert_eq!(projects.len(), 1);
    assert_eq!(sweeper.tree().node(projects[0]).label(), "Acme");

    let bundles = sweeper.tree().node(projects[0]).children().to_vec();
    assert_eq!(bundles.len(), 2);
    assert_eq!(sweeper.tree().node(bundles[0]).label(), "1.1 (101)");
    assert_eq!(sweeper.tree().node(bundles[1]).label(), "1.0 (100)");

    // Archives default to fully deselected.
    assert_eq!(sweeper.tree().node(root).selection(), Selection::Off);
}

#[test]
fn logs_exclude_the_newest_version() {
    let tmp = create_developer_dir();
    let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
    sweeper.scan(&[Location::Logs], &mut ());

    let root = sweeper.entry(Location::Logs);
    let paths = sweeper.tree().node(root).paths();

    assert_eq!(paths.len(), 1);
    assert!(paths[0].to_string_lossy().contains("14.0"));
}

#[test]
fn full_scan_keeps_the_tree_invariant() {
    let tmp = create_developer_dir();
    let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
    sweeper.scan(&Location::ALL, &mut ());

    for location in Location::ALL {
        assert!(validate_exclusivity(
            sweeper.tree(),
            sweeper.entry(location)
        ));
    }
}

#[test]
fn totals_are_consistent() {
    let tmp = create_developer_dir();
    let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
    sweeper.scan(&Location::ALL, &mut ());

    let total = sweeper.total_size();
    assert!(total > 0);
    assert!(sweeper.selected_size() <= total);

    // Rescanning without filesystem changes yields the same totals.
    sweeper.scan(&Location::ALL, &mut ());
    assert_eq!(sweeper.total_size(), total);
}

#[test]
fn selecting_archives_increases_selected_size() {
    let tmp = create_developer_dir();
    let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
    sweeper.scan(&Location::ALL, &mut ());

    let before = sweeper.selected_size();
    let archives_root = sweeper.entry(Location::Archives);
    sweeper.set_selected(archives_root, true);

    let archives_size = sweeper
        .tree()
        .node(archives_root)
        .size()
        .bytes()
        .unwrap();
    assert!(archives_size > 0);
    assert_eq!(sweeper.selected_size(), before + archives_size);
}

#[test]
fn derived_data_entry_reads_display_name() {
    let tmp = create_developer_dir();
    let mut sweeper = Sweeper::new(tmp.path(), None, None).unwrap();
    sweeper.scan(&[Location::DerivedData], &mut ());

    let root = sweeper.entry(Location::DerivedData);
    let entries = sweeper.tree().node(root).children().to_vec();
    assert_eq!(entries.len(), 1);
    assert_eq!(sweeper.tree().node(entries[0]).label(), "My App");
    assert_eq!(sweeper.tree().node(entries[0]).paths().len(), 1);
}

#[test]
fn custom_archives_folder_contributes_entries() {
    let tmp = create_developer_dir();
    let custom = TempDir::new().unwrap();
    write_archive_bundle(
        custom.path(),
        "2022-06-01",
        "Beta 6-1-22, 9.00 AM",
        "Beta",
        "com.beta.app",
        "2.0",
        "7",
    );

    let mut sweeper = Sweeper::new(
        tmp.path(),
        None,
        Some(custom.path().to_path_buf()),
    )
    .unwrap();
    sweeper.scan(&[Location::Archives], &mut ());

    let root = sweeper.entry(Location::Archives);
    let labels: Vec<String> = sweeper
        .tree()
        .node(root)
        .children()
        .iter()
        .map(|&id| sweeper.tree().node(id).label().to_string())
        .collect();

    assert!(labels.contains(&"Acme".to_string()));
    assert!(labels.contains(&"Beta".to_string()));
}
