//! View models built from navigation queries, and their text rendering

use anyhow::Result;
use content_tree::{Content, ContentId, ContentLoader, ContentNavigation, NavigationOptions, Query};
use std::collections::HashSet;
use std::fmt;

use crate::site::{PageData, CONTACT_PAGE, START_PAGE, STANDARD_PAGE, TESTS_PAGE};

/// Name of the page the descendant lookup searches for
pub const RESELLER_PAGE_NAME: &str = "Find a reseller";

/// Results of the navigation checks run from the tests page
#[derive(Debug, Clone, PartialEq)]
pub struct TestsViewModel {
    pub current_page: Content<PageData>,
    /// Start page found walking up from the current page, self included
    pub ancestor_start_page: Option<Content<PageData>>,
    /// Tests page found walking up from the current page, self included
    pub ancestor_or_self: Option<Content<PageData>>,
    /// Start page found walking up from the current page's parent
    pub ancestor: Option<Content<PageData>>,
    /// First standard page named "Find a reseller" below the start page
    pub descendant_with_predicate: Option<Content<PageData>>,
    /// Every ancestor of that page
    pub ancestors: Vec<Content<PageData>>,
    /// Standard page ancestors of that page
    pub ancestors_of_type: Vec<Content<PageData>>,
    /// Ancestors of that page with more than two children
    pub ancestors_with_many_children: Vec<Content<PageData>>,
}

impl TestsViewModel {
    /// Run every check starting from `current_page`
    pub fn build<L>(
        loader: &L,
        current_page: &Content<PageData>,
        options: &NavigationOptions,
    ) -> Result<Self>
    where
        L: ContentLoader<Data = PageData>,
    {
        let start_page =
            loader.ancestor_or_self(current_page, &Query::of_type(START_PAGE).with_options(options))?;
        let ancestor_or_self =
            loader.ancestor_or_self(current_page, &Query::of_type(TESTS_PAGE).with_options(options))?;
        let ancestor =
            loader.ancestor(current_page, &Query::of_type(START_PAGE).with_options(options))?;

        let descendant_with_predicate = match &start_page {
            Some(start) => loader.descendant(
                start,
                &Query::of_type(STANDARD_PAGE)
                    .matching(|page: &Content<PageData>| page.name == RESELLER_PAGE_NAME)
                    .with_options(options),
            )?,
            None => None,
        };

        let (ancestors, ancestors_of_type, ancestors_with_many_children) =
            match &descendant_with_predicate {
                Some(page) => {
                    let ancestors = loader.ancestors(page, &Query::any().with_options(options))?;
                    let crowded = with_more_children_than(loader, &ancestors, 2)?;
                    let many_children = Query::any()
                        .matching_with(&crowded, |crowded: &HashSet<ContentId>, item: &Content<PageData>| {
                            crowded.contains(&item.id)
                        })
                        .with_options(options);
                    (
                        ancestors,
                        loader.ancestors(page, &Query::of_type(STANDARD_PAGE).with_options(options))?,
                        loader.ancestors(page, &many_children)?,
                    )
                }
                None => (Vec::new(), Vec::new(), Vec::new()),
            };

        Ok(Self {
            current_page: current_page.clone(),
            ancestor_start_page: start_page,
            ancestor_or_self,
            ancestor,
            descendant_with_predicate,
            ancestors,
            ancestors_of_type,
            ancestors_with_many_children,
        })
    }
}

/// Ids of the items in `items` that have more than `count` children
///
/// Counted before the query runs so a failing loader fails the build.
fn with_more_children_than<L: ContentLoader + ?Sized>(
    loader: &L,
    items: &[Content<L::Data>],
    count: usize,
) -> Result<HashSet<ContentId>> {
    let mut crowded = HashSet::new();
    for item in items {
        if loader.children(item.id)?.len() > count {
            crowded.insert(item.id);
        }
    }
    Ok(crowded)
}

fn name_or_dash<D>(content: Option<&Content<D>>) -> &str {
    content.map_or("-", |c| c.name.as_str())
}

/// Names joined with " > ", or "-" for an empty list
pub fn trail<D>(items: &[Content<D>]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

impl fmt::Display for TestsViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current page: {}", self.current_page)?;
        writeln!(
            f,
            "Ancestor-or-self start page: {}",
            name_or_dash(self.ancestor_start_page.as_ref())
        )?;
        writeln!(
            f,
            "Ancestor-or-self tests page: {}",
            name_or_dash(self.ancestor_or_self.as_ref())
        )?;
        writeln!(f, "Ancestor start page: {}", name_or_dash(self.ancestor.as_ref()))?;
        writeln!(
            f,
            "Descendant \"{}\": {}",
            RESELLER_PAGE_NAME,
            name_or_dash(self.descendant_with_predicate.as_ref())
        )?;
        writeln!(f, "Ancestors: {}", trail(&self.ancestors))?;
        writeln!(f, "Standard page ancestors: {}", trail(&self.ancestors_of_type))?;
        writeln!(
            f,
            "Ancestors with more than 2 children: {}",
            trail(&self.ancestors_with_many_children)
        )
    }
}

/// Settings of a page list block
#[derive(Debug, Clone, PartialEq)]
pub struct PageListBlock {
    pub heading: String,
    /// Page whose children (or descendants) are listed
    pub root: ContentId,
    /// List every standard page below the root, not just its children
    pub recursive: bool,
    pub include_introduction: bool,
    pub include_publish_date: bool,
}

/// A heading and the standard pages under a root, in sort order
#[derive(Debug, Clone, PartialEq)]
pub struct PageListModel {
    pub heading: String,
    pub pages: Vec<Content<PageData>>,
    pub show_introduction: bool,
    pub show_publish_date: bool,
}

impl PageListModel {
    pub fn build<L>(loader: &L, block: &PageListBlock, options: &NavigationOptions) -> Result<Self>
    where
        L: ContentLoader<Data = PageData>,
    {
        let query = Query::of_type(STANDARD_PAGE).with_options(options);
        let mut pages = if block.recursive {
            let root = loader.get(block.root)?;
            loader.descendants(&root, &query)?
        } else {
            loader.children_of(block.root, &query)?
        };
        pages.sort_by_key(|page| page.data.sort_order);

        Ok(Self {
            heading: block.heading.clone(),
            pages,
            show_introduction: block.include_introduction,
            show_publish_date: block.include_publish_date,
        })
    }
}

impl fmt::Display for PageListModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        for page in &self.pages {
            write!(f, "  - {}", page.name)?;
            if let (true, Some(date)) = (self.show_publish_date, &page.data.published) {
                write!(f, " ({})", date)?;
            }
            if self.show_introduction && !page.data.teaser.is_empty() {
                write!(f, ": {}", page.data.teaser)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Contact teaser resolved for the current page
#[derive(Debug, Clone, PartialEq)]
pub struct ContactBlockModel {
    pub heading: String,
    /// Nearest contact page: a sibling of the current page or of one of
    /// its ancestors
    pub contact_page: Option<Content<PageData>>,
}

impl ContactBlockModel {
    pub fn build<L>(
        loader: &L,
        current_page: &Content<PageData>,
        heading: &str,
        options: &NavigationOptions,
    ) -> Result<Self>
    where
        L: ContentLoader<Data = PageData>,
    {
        let contact = Query::of_type(CONTACT_PAGE).with_options(options);
        let mut contact_page = loader.first_sibling(current_page, &contact)?;

        if contact_page.is_none() {
            for ancestor in loader.ancestors(current_page, &Query::any().with_options(options))? {
                contact_page = loader.first_sibling(&ancestor, &contact)?;
                if contact_page.is_some() {
                    break;
                }
            }
        }

        Ok(Self {
            heading: heading.to_string(),
            contact_page,
        })
    }
}

/// Indented outline of the tree below `root`, `depth` levels deep
pub fn outline<L: ContentLoader>(loader: &L, root: &Content<L::Data>, depth: usize) -> Result<String> {
    let mut out = String::new();
    write_outline(loader, root, 0, depth, &mut out)?;
    Ok(out)
}

fn write_outline<L: ContentLoader>(
    loader: &L,
    item: &Content<L::Data>,
    level: usize,
    depth: usize,
    out: &mut String,
) -> Result<()> {
    out.push_str(&"  ".repeat(level));
    out.push_str(&item.to_string());
    out.push('\n');

    if level < depth {
        for child in loader.children(item.id)? {
            write_outline(loader, &child, level + 1, depth, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{demo_site, ensure_tests_page, SiteRepository};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn site_with_tests_page() -> (SiteRepository, ContentId, ContentId) {
        let (mut repo, start) = demo_site().unwrap();
        let tests = ensure_tests_page(&mut repo, start, "Tests Page").unwrap();
        (repo, start, tests)
    }

    #[test]
    fn test_tests_view_model() {
        let (repo, start, tests) = site_with_tests_page();
        let current = repo.get(tests).unwrap();
        let model = TestsViewModel::build(&repo, &current, &NavigationOptions::default()).unwrap();

        assert_eq!(model.ancestor_start_page.as_ref().map(|p| p.id), Some(start));
        assert_eq!(model.ancestor_or_self.as_ref().map(|p| p.id), Some(tests));
        assert_eq!(model.ancestor.as_ref().map(|p| p.id), Some(start));
        assert_eq!(
            model.descendant_with_predicate.as_ref().map(|p| p.name.as_str()),
            Some(RESELLER_PAGE_NAME)
        );
        assert_snapshot!(trail(&model.ancestors), @"Alloy Track > Start");
        assert_snapshot!(trail(&model.ancestors_of_type), @"Alloy Track");
        assert_snapshot!(trail(&model.ancestors_with_many_children), @"Alloy Track > Start");
    }

    #[test]
    fn test_tests_view_model_rendering() {
        let (repo, _, tests) = site_with_tests_page();
        let current = repo.get(tests).unwrap();
        let model = TestsViewModel::build(&repo, &current, &NavigationOptions::default()).unwrap();

        let expected = format!(
            "Current page: Tests Page [TestsPage] ({})\n\
             Ancestor-or-self start page: Start\n\
             Ancestor-or-self tests page: Tests Page\n\
             Ancestor start page: Start\n\
             Descendant \"Find a reseller\": Find a reseller\n\
             Ancestors: Alloy Track > Start\n\
             Standard page ancestors: Alloy Track\n\
             Ancestors with more than 2 children: Alloy Track > Start\n",
            tests.get()
        );
        assert_eq!(model.to_string(), expected);
    }

    #[test]
    fn test_tests_view_model_from_start_page() {
        // The start page is its own ancestor-or-self but has no start page above it
        let (repo, start, _) = site_with_tests_page();
        let current = repo.get(start).unwrap();
        let model = TestsViewModel::build(&repo, &current, &NavigationOptions::default()).unwrap();

        assert_eq!(model.ancestor_start_page.as_ref().map(|p| p.id), Some(start));
        assert_eq!(model.ancestor_or_self, None);
        assert_eq!(model.ancestor, None);
        assert!(model.descendant_with_predicate.is_some());
    }

    #[test]
    fn test_tight_hop_bound_hides_far_pages() {
        let (repo, _, tests) = site_with_tests_page();
        let current = repo.get(tests).unwrap();
        let options = NavigationOptions::default().with_max_hops(1);
        let model = TestsViewModel::build(&repo, &current, &options).unwrap();

        // Only the tests page itself is examined
        assert_eq!(model.ancestor_start_page, None);
        assert!(model.ancestor_or_self.is_some());
        assert_eq!(model.descendant_with_predicate, None);
        assert!(model.ancestors.is_empty());
    }

    /// Site repository whose listing of one page always fails
    struct UnreadablePage {
        repo: SiteRepository,
        broken: ContentId,
    }

    impl ContentLoader for UnreadablePage {
        type Data = PageData;

        fn try_get(&self, id: ContentId) -> Result<Option<Content<PageData>>> {
            self.repo.try_get(id)
        }

        fn children(&self, id: ContentId) -> Result<Vec<Content<PageData>>> {
            if id == self.broken {
                anyhow::bail!("listing of {} is unavailable", id);
            }
            self.repo.children(id)
        }
    }

    #[test]
    fn test_child_count_errors_propagate() {
        let (repo, start, _) = site_with_tests_page();
        let root = repo.get(start).unwrap();
        let crowded = with_more_children_than(&repo, std::slice::from_ref(&root), 2).unwrap();
        assert!(crowded.contains(&start));

        let loader = UnreadablePage { repo, broken: start };
        let err = with_more_children_than(&loader, &[root], 2).unwrap_err();
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn test_page_list_model() {
        let (repo, start, _) = site_with_tests_page();
        let track = repo
            .first_child(
                start,
                &Query::any().matching(|c: &Content<PageData>| c.name == "Alloy Track"),
            )
            .unwrap()
            .unwrap();

        let block = PageListBlock {
            heading: "Alloy Track".to_string(),
            root: track.id,
            recursive: false,
            include_introduction: true,
            include_publish_date: false,
        };
        let model = PageListModel::build(&repo, &block, &NavigationOptions::default()).unwrap();
        assert_eq!(
            model.to_string(),
            "Alloy Track\n  - Features\n  - Pricing\n  - Find a reseller: Resellers near you\n"
        );

        let everything = PageListBlock {
            heading: "All".to_string(),
            root: start,
            recursive: true,
            include_introduction: false,
            include_publish_date: true,
        };
        let model = PageListModel::build(&repo, &everything, &NavigationOptions::default()).unwrap();
        // Contact, search and tests pages are not standard pages
        assert_eq!(model.pages.len(), 10);
        assert!(model
            .to_string()
            .lines()
            .any(|line| line == "  - Press Releases (2024-03-01)"));
        assert!(!model.to_string().contains("Try it for free"));
        assert!(model.pages.windows(2).all(|w| w[0].data.sort_order <= w[1].data.sort_order));
    }

    #[test]
    fn test_contact_block_model() {
        let (repo, start, tests) = site_with_tests_page();
        let options = NavigationOptions::default();

        // Management sits next to "Contact us"
        let management = repo
            .descendant(
                &repo.get(start).unwrap(),
                &Query::any().matching(|c: &Content<PageData>| c.name == "Management"),
            )
            .unwrap()
            .unwrap();
        let model = ContactBlockModel::build(&repo, &management, "Contact", &options).unwrap();
        assert_eq!(
            model.contact_page.as_ref().map(|c| c.name.as_str()),
            Some("Contact us")
        );

        // Press Releases finds it through its ancestor "News & Events"
        let press = repo
            .descendant(
                &repo.get(start).unwrap(),
                &Query::any().matching(|c: &Content<PageData>| c.name == "Press Releases"),
            )
            .unwrap()
            .unwrap();
        let model = ContactBlockModel::build(&repo, &press, "Contact", &options).unwrap();
        assert_eq!(
            model.contact_page.as_ref().map(|c| c.name.as_str()),
            Some("Contact us")
        );

        // Nothing near the tests page
        let model =
            ContactBlockModel::build(&repo, &repo.get(tests).unwrap(), "Contact", &options).unwrap();
        assert_eq!(model.contact_page, None);
    }

    #[test]
    fn test_outline() {
        let (repo, start) = demo_site().unwrap();
        let root = repo.get(start).unwrap();

        let text = outline(&repo, &root, 1).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Start [StartPage] (1)");
        assert_eq!(lines[1], "  About us [StandardPage] (2)");
        assert_eq!(lines[4], "  Search [SearchPage] (13)");
    }
}
