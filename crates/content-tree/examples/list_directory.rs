//! CLI example that explores a directory through the navigation queries
//!
//! Usage:
//!   cargo run --example list_directory [path]
//!
//! If no path is provided, uses the current directory. Only the directories
//! the queries touch are read from disk.

use std::env;

use anyhow::Result;
use content_tree::filesystem::{FILE, FOLDER};
use content_tree::prelude::*;
use content_tree::{FileData, FilesystemLoader};

fn main() -> Result<()> {
    env_logger::init();

    // Get path from command line args or use current directory
    let args: Vec<String> = env::args().collect();
    let path = args.get(1).map(String::as_str).unwrap_or(".");

    println!("Loading directory: {}", path);
    let loader = FilesystemLoader::new(path)?;
    let root = loader.get(loader.root())?;

    let query = Query::any().with_max_hops(4);
    let everything = loader.descendants(&root, &query)?;
    let folders = everything.iter().filter(|c| c.is_a(&FOLDER)).count();
    let files: Vec<_> = everything.iter().filter(|c| c.is_a(&FILE)).collect();

    println!();
    println!("Within 4 levels:");
    println!("  Directories: {}", folders);
    println!("  Files: {}", files.len());
    println!("  Total size: {}", format_size(files.iter().map(|f| f.data.size).sum()));
    println!("  Read from disk: {} entries", loader.discovered()?);

    // The deepest file found, with its ancestry
    if let Some(deepest) = files.last() {
        let ancestors = loader.ancestors(deepest, &query)?;
        let trail: Vec<_> = ancestors.iter().rev().map(|a| a.name.as_str()).collect();
        println!();
        println!("Deepest file: {}", deepest.name);
        println!("  Path: {} / {}", trail.join(" / "), deepest.name);

        let by_name = |c: &Content<FileData>| c.name.clone();
        let siblings = loader.siblings(deepest, &Query::of_type(FILE))?;
        println!("  Sibling files: {}", siblings.len());
        if let Some(next) = loader.following_sibling(deepest, by_name, &Query::any())? {
            println!("  Next sibling: {}", next.name);
        }
        if let Some(prev) = loader.previous_sibling(deepest, by_name, &Query::any())? {
            println!("  Previous sibling: {}", prev.name);
        }
    }

    Ok(())
}

/// Format file size in human-readable format
fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
