//! Explore the demo site or a directory with the content navigation queries
//!
//! Usage:
//!   site-explorer [--config FILE] [site | dir PATH]
//!
//! Without a mode the demo site (or the configured fixture) is explored.

mod config;
mod report;
mod site;

use anyhow::{anyhow, bail, Context, Result};
use content_tree::filesystem::{FilesystemLoader, FILE, FOLDER};
use content_tree::prelude::*;
use log::info;
use std::env;
use std::path::{Path, PathBuf};

use config::ExplorerConfig;
use report::{outline, ContactBlockModel, PageListBlock, PageListModel, TestsViewModel};
use site::{demo_site, ensure_tests_page, load_fixture, start_page, PageData, STANDARD_PAGE};

enum Mode {
    Site,
    Dir(PathBuf),
}

struct Args {
    config: Option<PathBuf>,
    mode: Mode,
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let mut config = None;
    let mut mode = Mode::Site;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("--config needs a file"))?;
                config = Some(PathBuf::from(path));
            }
            "site" => mode = Mode::Site,
            "dir" => {
                let path = args.next().unwrap_or_else(|| ".".to_string());
                mode = Mode::Dir(PathBuf::from(path));
            }
            other => bail!("Unknown argument \"{}\"\nUsage: site-explorer [--config FILE] [site | dir PATH]", other),
        }
    }

    Ok(Args { config, mode })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    };

    match args.mode {
        Mode::Site => explore_site(&config),
        Mode::Dir(path) => explore_dir(&path, &config),
    }
}

fn explore_site(config: &ExplorerConfig) -> Result<()> {
    let options = &config.navigation;

    let (mut repo, start) = match &config.fixture {
        Some(path) => {
            info!("Loading site fixture {}", path.display());
            let repo = load_fixture(path)?;
            let start = start_page(&repo)
                .ok_or_else(|| anyhow!("{} has no start page", path.display()))?
                .id;
            (repo, start)
        }
        None => demo_site()?,
    };

    let tests = ensure_tests_page(&mut repo, start, &config.tests_page_name)?;
    let root = repo.get(start)?;

    println!("Site outline:");
    print!("{}", outline(&repo, &root, config.outline_depth)?);
    println!();

    let current = repo.get(tests)?;
    let model = TestsViewModel::build(&repo, &current, options)?;
    print!("{}", model);
    println!();

    let list = PageListBlock {
        heading: format!("Pages under {}", root.name),
        root: start,
        recursive: false,
        include_introduction: true,
        include_publish_date: true,
    };
    print!("{}", PageListModel::build(&repo, &list, options)?);
    println!();

    if let Some(page) = &model.descendant_with_predicate {
        let contact = ContactBlockModel::build(&repo, page, "Questions?", options)?;
        match &contact.contact_page {
            Some(contact_page) => println!("{} See {}", contact.heading, contact_page.name),
            None => println!("{} No contact page nearby", contact.heading),
        }

        let by_order = |c: &Content<PageData>| c.data.sort_order;
        let standard = Query::of_type(STANDARD_PAGE).with_options(options);
        let previous = repo.previous_sibling(page, by_order, &standard)?;
        let next = repo.following_sibling(page, by_order, &standard)?;
        println!(
            "Around {}: previous {}, next {}",
            page.name,
            previous.map_or_else(|| "-".to_string(), |p| p.name),
            next.map_or_else(|| "-".to_string(), |n| n.name)
        );
    }

    Ok(())
}

fn explore_dir(path: &Path, config: &ExplorerConfig) -> Result<()> {
    let loader = FilesystemLoader::new(path)
        .with_context(|| format!("Cannot explore {}", path.display()))?;
    let root = loader.get(loader.root())?;

    println!("Directory outline:");
    print!("{}", outline(&loader, &root, config.outline_depth)?);
    println!();

    let query = Query::any().with_options(&config.navigation);
    let all = loader.descendants(&root, &query)?;
    let files = all.iter().filter(|c| c.is_a(&FILE)).count();
    let folders = all.iter().filter(|c| c.is_a(&FOLDER)).count();
    let bytes: u64 = all.iter().map(|c| c.data.size).sum();

    println!(
        "{} folders, {} files, {} bytes within {} levels",
        folders, files, bytes, config.navigation.max_hops
    );
    println!("Items discovered: {}", loader.discovered()?);
    Ok(())
}
