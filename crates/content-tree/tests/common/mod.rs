#![allow(dead_code)]

use content_tree::prelude::*;

pub static NODE: ContentType = ContentType::root("Node");
pub static HOME: ContentType = ContentType::derived("Home", &NODE);
pub static SECTION: ContentType = ContentType::derived("Section", &NODE);
pub static ARTICLE: ContentType = ContentType::derived("Article", &NODE);
pub static COMMENT: ContentType = ContentType::derived("Comment", &NODE);

/// Payload used by the test trees: a sort key that can disagree with the
/// insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub rank: i32,
}

pub type Repo = ContentRepository<Meta>;

pub fn add(repo: &mut Repo, parent: Option<ContentId>, name: &str, ty: ContentType) -> ContentId {
    repo.create(parent, name, ty, Meta::default()).unwrap()
}

pub fn add_ranked(
    repo: &mut Repo,
    parent: ContentId,
    name: &str,
    ty: ContentType,
    rank: i32,
) -> ContentId {
    repo.create(Some(parent), name, ty, Meta { rank }).unwrap()
}

pub fn names(items: &[Content<Meta>]) -> Vec<&str> {
    items.iter().map(|c| c.name.as_str()).collect()
}

/// Root(Home) -> A(Section) -> B(Article) -> C(Comment)
pub struct Chain {
    pub repo: Repo,
    pub root: ContentId,
    pub a: ContentId,
    pub b: ContentId,
    pub c: ContentId,
}

pub fn chain() -> Chain {
    let mut repo = Repo::new();
    let root = add(&mut repo, None, "Root", HOME);
    let a = add(&mut repo, Some(root), "A", SECTION);
    let b = add(&mut repo, Some(a), "B", ARTICLE);
    let c = add(&mut repo, Some(b), "C", COMMENT);
    Chain { repo, root, a, b, c }
}

/// Root
/// ├── S1 (Section)
/// │   ├── A1 (Article)
/// │   └── S3 (Section)
/// │       └── A3 (Article)
/// ├── A0 (Article)
/// └── S2 (Section)
///     └── A2 (Article)
pub fn wide_tree() -> Repo {
    let mut repo = Repo::new();
    let root = add(&mut repo, None, "Root", HOME);
    let s1 = add(&mut repo, Some(root), "S1", SECTION);
    add(&mut repo, Some(root), "A0", ARTICLE);
    let s2 = add(&mut repo, Some(root), "S2", SECTION);
    add(&mut repo, Some(s1), "A1", ARTICLE);
    let s3 = add(&mut repo, Some(s1), "S3", SECTION);
    add(&mut repo, Some(s2), "A2", ARTICLE);
    add(&mut repo, Some(s3), "A3", ARTICLE);
    repo
}

/// A single chain of `depth` sections below a home root; returns the repo
/// and the ids from the root down
pub fn deep_chain(depth: usize) -> (Repo, Vec<ContentId>) {
    let mut repo = Repo::new();
    let mut ids = vec![add(&mut repo, None, "level-0", HOME)];
    for level in 1..=depth {
        let parent = *ids.last().unwrap();
        ids.push(add(&mut repo, Some(parent), &format!("level-{}", level), SECTION));
    }
    (repo, ids)
}

pub fn find(repo: &Repo, name: &str) -> Content<Meta> {
    let root = repo.roots().into_iter().next().unwrap();
    if root.name == name {
        return root;
    }
    repo.descendants(&root, &Query::any().with_max_hops(64))
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("no item named {}", name))
}
