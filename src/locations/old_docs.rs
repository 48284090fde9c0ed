//! Old documentation cache classifier.
//!
//! One fixed path, taken wholesale. Modern toolchains no longer use the
//! shared offline documentation folder, so there is nothing to parse per
//! item.

use std::path::PathBuf;

use super::ScanContext;

pub fn scan(ctx: &ScanContext<'_>) -> Vec<PathBuf> {
    let docs = ctx.developer_dir.join("Shared").join("Documentation");

    if docs.exists() {
        vec![docs]
    } else {
        tracing::debug!(path = %docs.display(), "no old documentation folder, skipping");
        Vec::new()
    }
}
