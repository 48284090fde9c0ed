//! Stale device log classifier.
//!
//! Log file names carry the OS version they were captured against, e.g.
//! `MyApp 14.0 (A).log`. Everything except the files at the single highest
//! version is offered for deletion, which guarantees the most recent logs
//! are retained. The result is a flat path list attached straight to the
//! Logs root.

use std::fs;
use std::path::PathBuf;

use crate::version::Version;

use super::ScanContext;

pub fn scan(ctx: &ScanContext<'_>) -> Vec<PathBuf> {
    let dir = ctx.developer_dir.join("Xcode").join("iOS Device Logs");

    let Ok(listing) = fs::read_dir(&dir) else {
        tracing::debug!(path = %dir.display(), "no device logs folder, skipping");
        return Vec::new();
    };

    let mut logs: Vec<(Version, PathBuf)> = Vec::new();
    for item in listing.flatten() {
        let path = item.path();
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let version = stem
            .split_whitespace()
            .find_map(|token| token.parse::<Version>().ok());

        match version {
            Some(version) => logs.push((version, path)),
            None => {
                tracing::warn!(
                    path = %path.display(),
                    "no version in log file name, skipping"
                );
            }
        }
    }

    let Some(newest) = logs.iter().map(|(version, _)| *version).max() else {
        return Vec::new();
    };

    logs.sort_by(|(lhs_v, lhs_p), (rhs_v, rhs_p)| {
        rhs_v.cmp(lhs_v).then_with(|| lhs_p.cmp(rhs_p))
    });

    logs.into_iter()
        .filter(|(version, _)| *version != newest)
        .map(|(_, path)| path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> ScanContext<'_> {
        ScanContext {
            developer_dir: dir.path(),
            custom_derived_data: None,
            custom_archives: None,
        }
    }

    fn make_logs(tmp: &TempDir, names: &[&str]) {
        let dir = tmp.path().join("Xcode/iOS Device Logs");
        fs::create_dir_all(&dir).unwrap();
        for name in names {
            fs::write(dir.join(name), "log data").unwrap();
        }
    }

    #[test]
    fn newest_version_is_retained() {
        let tmp = TempDir::new().unwrap();
        make_logs(&tmp, &["MyApp 14.0 (A).log", "MyApp 14.5 (B).log"]);

        let paths = scan(&context(&tmp));

        assert_eq!(paths.len(), 1);
        assert!(paths[0].to_string_lossy().contains("14.0"));
    }

    #[test]
    fn all_files_at_newest_version_are_retained() {
        let tmp = TempDir::new().unwrap();
        make_logs(
            &tmp,
            &[
                "MyApp 14.5 (A).log",
                "Other 14.5 (B).log",
                "MyApp 14.0 (C).log",
                "MyApp 13.2 (D).log",
            ],
        );

        let paths = scan(&context(&tmp));

        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| !p.to_string_lossy().contains("14.5")));
    }

    #[test]
    fn versionless_names_are_skipped() {
        let tmp = TempDir::new().unwrap();
        make_logs(&tmp, &["garbage.log", "MyApp 14.0 (A).log", "MyApp 14.5 (B).log"]);

        let paths = scan(&context(&tmp));
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn single_version_keeps_everything() {
        let tmp = TempDir::new().unwrap();
        make_logs(&tmp, &["MyApp 14.5 (A).log", "Other 14.5 (B).log"]);

        assert!(scan(&context(&tmp)).is_empty());
    }

    #[test]
    fn missing_folder_yields_no_paths() {
        let tmp = TempDir::new().unwrap();
        assert!(scan(&context(&tmp)).is_empty());
    }
}
