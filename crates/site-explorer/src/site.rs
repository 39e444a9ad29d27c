//! Demo site: page types, the in-memory page tree and fixture loading

use anyhow::{anyhow, Context, Result};
use content_tree::{Content, ContentId, ContentRepository, ContentType};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub static PAGE_DATA: ContentType = ContentType::root("PageData");
pub static SITE_PAGE: ContentType = ContentType::derived("SitePageData", &PAGE_DATA);
pub static START_PAGE: ContentType = ContentType::derived("StartPage", &SITE_PAGE);
pub static STANDARD_PAGE: ContentType = ContentType::derived("StandardPage", &SITE_PAGE);
pub static CONTACT_PAGE: ContentType = ContentType::derived("ContactPage", &SITE_PAGE);
pub static SEARCH_PAGE: ContentType = ContentType::derived("SearchPage", &SITE_PAGE);
pub static TESTS_PAGE: ContentType = ContentType::derived("TestsPage", &SITE_PAGE);

static PAGE_TYPES: [&ContentType; 7] = [
    &PAGE_DATA,
    &SITE_PAGE,
    &START_PAGE,
    &STANDARD_PAGE,
    &CONTACT_PAGE,
    &SEARCH_PAGE,
    &TESTS_PAGE,
];

/// Look up a page type by name
pub fn page_type(name: &str) -> Option<ContentType> {
    PAGE_TYPES.iter().find(|t| t.name() == name).map(|t| **t)
}

/// Properties shared by every demo page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageData {
    /// Position among siblings in menus and lists
    pub sort_order: i32,
    /// Short introduction shown in page lists
    pub teaser: String,
    /// Publication date shown in page lists, as written by the editor
    pub published: Option<String>,
}

impl PageData {
    pub fn sorted(sort_order: i32) -> Self {
        Self {
            sort_order,
            ..Self::default()
        }
    }
}

pub type SiteRepository = ContentRepository<PageData>;

/// Build the demo site
///
/// ```text
/// Start
/// ├── About us
/// │   ├── News & Events
/// │   │   └── Press Releases
/// │   ├── Management
/// │   └── Contact us (contact)
/// ├── Alloy Plan
/// │   └── Download Alloy Plan
/// ├── Alloy Track
/// │   ├── Find a reseller
/// │   ├── Features
/// │   └── Pricing
/// └── Search (search)
/// ```
///
/// Returns the repository and the id of the start page.
pub fn demo_site() -> Result<(SiteRepository, ContentId)> {
    let mut repo = SiteRepository::new();
    let start = repo.create(None, "Start", START_PAGE, PageData::sorted(0))?;

    let about = repo.create(Some(start), "About us", STANDARD_PAGE, PageData::sorted(30))?;
    let news = repo.create(Some(about), "News & Events", STANDARD_PAGE, PageData::sorted(10))?;
    repo.create(
        Some(news),
        "Press Releases",
        STANDARD_PAGE,
        PageData {
            sort_order: 10,
            published: Some("2024-03-01".to_string()),
            ..PageData::default()
        },
    )?;
    repo.create(Some(about), "Management", STANDARD_PAGE, PageData::sorted(20))?;
    repo.create(Some(about), "Contact us", CONTACT_PAGE, PageData::sorted(30))?;

    let plan = repo.create(Some(start), "Alloy Plan", STANDARD_PAGE, PageData::sorted(10))?;
    repo.create(
        Some(plan),
        "Download Alloy Plan",
        STANDARD_PAGE,
        PageData {
            sort_order: 10,
            teaser: "Try it for free".to_string(),
            ..PageData::default()
        },
    )?;

    let track = repo.create(Some(start), "Alloy Track", STANDARD_PAGE, PageData::sorted(20))?;
    repo.create(
        Some(track),
        "Find a reseller",
        STANDARD_PAGE,
        PageData {
            sort_order: 30,
            teaser: "Resellers near you".to_string(),
            ..PageData::default()
        },
    )?;
    repo.create(Some(track), "Features", STANDARD_PAGE, PageData::sorted(10))?;
    repo.create(Some(track), "Pricing", STANDARD_PAGE, PageData::sorted(20))?;

    repo.create(Some(start), "Search", SEARCH_PAGE, PageData::sorted(90))?;

    debug!("Demo site built with {} pages", repo.len());
    Ok((repo, start))
}

/// Make sure the start page has a tests page below it
///
/// Returns the id of the existing or newly created tests page.
pub fn ensure_tests_page(repo: &mut SiteRepository, start: ContentId, name: &str) -> Result<ContentId> {
    let (id, created) =
        repo.get_or_create_child(start, TESTS_PAGE, name, PageData::sorted(100))?;
    if created {
        info!("Created tests page {} under {}", id, start);
    }
    Ok(id)
}

/// The first top-level start page
pub fn start_page(repo: &SiteRepository) -> Option<Content<PageData>> {
    repo.roots()
        .into_iter()
        .find(|root| root.is_a(&START_PAGE))
}

#[derive(Debug, Deserialize)]
struct Fixture {
    items: Vec<FixtureItem>,
}

#[derive(Debug, Deserialize)]
struct FixtureItem {
    id: ContentId,
    #[serde(default)]
    parent: Option<ContentId>,
    name: String,
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    sort_order: i32,
    #[serde(default)]
    teaser: String,
    #[serde(default)]
    published: Option<String>,
}

/// Parse a JSON site description
///
/// ```json
/// { "items": [ { "id": 1, "name": "Start", "type": "StartPage", "published": "2024-01-31" },
///              { "id": 2, "parent": 1, "name": "About", "type": "StandardPage", "sort_order": 10 } ] }
/// ```
///
/// Items are stored as given; parents may appear after their children.
pub fn parse_fixture(json: &str) -> Result<SiteRepository> {
    let fixture: Fixture = serde_json::from_str(json).context("Failed to parse site fixture")?;

    let mut repo = SiteRepository::new();
    for item in fixture.items {
        let content_type = page_type(&item.content_type)
            .ok_or_else(|| anyhow!("Unknown page type \"{}\" for {}", item.content_type, item.name))?;

        let mut content = Content::new(
            item.id,
            item.name,
            content_type,
            PageData {
                sort_order: item.sort_order,
                teaser: item.teaser,
                published: item.published,
            },
        );
        content.parent = item.parent;
        repo.insert(content)?;
    }

    debug!("Fixture loaded with {} pages", repo.len());
    Ok(repo)
}

/// Read a JSON site description from disk
pub fn load_fixture(path: &Path) -> Result<SiteRepository> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture {}", path.display()))?;
    parse_fixture(&json).with_context(|| format!("Invalid fixture {}", path.display()))
}
