//! Clean command implementation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::CleanArgs;
use crate::config::Config;
use crate::locations::Location;
use crate::sweeper::DeleteObserver;

/// Run the clean command.
pub fn run(args: CleanArgs, config: &Config) -> Result<()> {
    let mut sweeper = super::build_sweeper(args.developer_dir, config)?;
    let locations = args.locations.unwrap_or_else(|| Location::ALL.to_vec());

    println!("Scanning {}...", sweeper.developer_dir().display());
    sweeper.scan(&locations, &mut ());

    if args.all {
        for location in &locations {
            let root = sweeper.entry(*location);
            sweeper.set_selected(root, true);
        }
    }

    for location in &locations {
        let root = sweeper.entry(*location);
        let size = sweeper.tree().node(root).size().bytes().unwrap_or(0);
        println!(
            "  {:<30} {:>10}  (selected: {})",
            location.label(),
            format_size(size, BINARY),
            format_size(sweeper.tree().selected_size(root), BINARY),
        );
    }

    let selected = sweeper.selected_size();
    println!(
        "\nTotal: {}   Selected for deletion: {}",
        format_size(sweeper.total_size(), BINARY),
        format_size(selected, BINARY),
    );

    if selected == 0 {
        println!("Nothing selected, nothing to delete.");
        return Ok(());
    }

    let needs_confirmation = config.clean.confirm && !args.force && !args.dry_run;
    if needs_confirmation {
        print!("\nProceed with deletion? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if args.dry_run {
        println!("\n[DRY RUN] Would delete:");
    } else {
        println!("\nDeleting...");
    }

    let mut observer = CliDeleteObserver::default();
    sweeper.delete_selected(args.dry_run, &mut observer);

    println!(
        "\nProcessed {} item{}.",
        observer.processed,
        if observer.processed == 1 { "" } else { "s" }
    );

    if !observer.failures.is_empty() {
        for (path, error) in &observer.failures {
            eprintln!("  Failed to delete {}: {}", path.display(), error);
        }
        std::process::exit(5); // Partial failure
    }

    Ok(())
}

/// Renders deletion progress as a terminal bar and collects failures for
/// the final report.
#[derive(Default)]
struct CliDeleteObserver {
    bar: Option<ProgressBar>,
    processed: usize,
    failures: Vec<(PathBuf, String)>,
}

impl DeleteObserver for CliDeleteObserver {
    fn delete_in_progress(
        &mut self,
        location: &str,
        label: &str,
        _path: &Path,
        current: usize,
        total: usize,
    ) {
        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(ProgressStyle::default_bar());
            bar
        });

        bar.set_message(format!("{}: {}", location, label));
        bar.set_position(current as u64);
        self.processed = current;
    }

    fn delete_item_failed(
        &mut self,
        error: &io::Error,
        _location: &str,
        _label: &str,
        path: &Path,
    ) {
        self.failures.push((path.to_path_buf(), error.to_string()));
    }

    fn delete_did_finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
