//! Scan command implementation.

use anyhow::Result;
use humansize::{format_size, BINARY};
use serde_json::json;

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::entry::{EntryId, EntryTree, Selection};
use crate::locations::Location;

/// Run the scan command.
pub fn run(args: ScanArgs, config: &Config) -> Result<()> {
    let mut sweeper = super::build_sweeper(args.developer_dir, config)?;
    let locations = args.locations.unwrap_or_else(|| Location::ALL.to_vec());

    tracing::info!(path = %sweeper.developer_dir().display(), "Scanning developer caches");
    sweeper.scan(&locations, &mut ());
    tracing::debug!("scan results:\n{}", sweeper.debug_representation());

    if args.json {
        let report = json!({
            "developer_dir": sweeper.developer_dir().display().to_string(),
            "total_size": sweeper.total_size(),
            "selected_size": sweeper.selected_size(),
            "locations": locations
                .iter()
                .map(|location| entry_json(sweeper.tree(), sweeper.entry(*location)))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for location in &locations {
        print_entry(sweeper.tree(), sweeper.entry(*location), 0);
    }

    println!();
    println!(
        "Total: {}   Selected for deletion: {}",
        format_size(sweeper.total_size(), BINARY),
        format_size(sweeper.selected_size(), BINARY),
    );

    Ok(())
}

fn selection_marker(selection: Selection) -> &'static str {
    match selection {
        Selection::On => "[x]",
        Selection::Off => "[ ]",
        Selection::Mixed => "[~]",
    }
}

fn print_entry(tree: &EntryTree, id: EntryId, depth: usize) {
    let node = tree.node(id);
    let size = node
        .size()
        .bytes()
        .map(|bytes| format_size(bytes, BINARY))
        .unwrap_or_else(|| "?".to_string());

    let labelled = format!(
        "{}{} {}",
        "  ".repeat(depth),
        selection_marker(node.selection()),
        node.label()
    );
    println!("{:<60} {:>10}", labelled, size);

    for &child in node.children() {
        print_entry(tree, child, depth + 1);
    }
}

fn entry_json(tree: &EntryTree, id: EntryId) -> serde_json::Value {
    let node = tree.node(id);

    json!({
        "label": node.label(),
        "extra_info": node.extra_info(),
        "selection": match node.selection() {
            Selection::On => "on",
            Selection::Off => "off",
            Selection::Mixed => "mixed",
        },
        "size": node.size().bytes(),
        "paths": node
            .paths()
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>(),
        "children": node
            .children()
            .iter()
            .map(|&child| entry_json(tree, child))
            .collect::<Vec<_>>(),
    })
}
