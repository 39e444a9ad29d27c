mod common;

use common::*;
use content_tree::prelude::*;
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::HashSet;

static TYPES: [&ContentType; 4] = [&HOME, &SECTION, &ARTICLE, &COMMENT];

/// Random tree: item `i > 0` hangs below some earlier item
fn arb_tree() -> impl Strategy<Value = (Repo, Vec<ContentId>)> {
    prop::collection::vec((any::<Index>(), 0..TYPES.len(), 0..4i32), 1..40).prop_map(|specs| {
        let mut repo = Repo::new();
        let mut ids: Vec<ContentId> = Vec::new();
        for (i, (parent, ty, rank)) in specs.into_iter().enumerate() {
            let parent = if i == 0 {
                None
            } else {
                Some(ids[parent.index(i)])
            };
            let id = repo
                .create(parent, format!("n{}", i), *TYPES[ty], Meta { rank })
                .unwrap();
            ids.push(id);
        }
        (repo, ids)
    })
}

proptest! {
    #[test]
    fn ancestor_or_self_of_own_type_is_self((repo, ids) in arb_tree()) {
        for id in ids {
            let item = repo.get(id).unwrap();
            let found = repo.ancestor_or_self(&item, &Query::of_type(item.content_type)).unwrap();
            prop_assert_eq!(found.map(|f| f.id), Some(id));
        }
    }

    #[test]
    fn ancestor_is_ancestor_or_self_of_parent((repo, ids) in arb_tree(), ty in 0..TYPES.len()) {
        let query = Query::of_type(*TYPES[ty]);
        for id in ids {
            let item = repo.get(id).unwrap();
            let expected = match repo.parent(&item).unwrap() {
                Some(parent) => repo.ancestor_or_self(&parent, &query).unwrap(),
                None => None,
            };
            prop_assert_eq!(repo.ancestor(&item, &query).unwrap(), expected);
        }
    }

    #[test]
    fn siblings_are_siblings_and_self_minus_self((repo, ids) in arb_tree()) {
        for id in ids {
            let item = repo.get(id).unwrap();
            let siblings: Vec<_> = repo.siblings(&item, &Query::any()).unwrap()
                .into_iter().map(|c| c.id).collect();
            prop_assert!(!siblings.contains(&id));

            let with_self: Vec<_> = repo.siblings_and_self(&item, &Query::any()).unwrap()
                .into_iter().map(|c| c.id).filter(|&c| c != id).collect();
            prop_assert_eq!(siblings, with_self);
        }
    }

    #[test]
    fn previous_self_following_partition_the_ordered_siblings((repo, ids) in arb_tree()) {
        let rank = |c: &Content<Meta>| c.data.rank;
        for id in ids {
            let item = repo.get(id).unwrap();
            if item.is_root() {
                continue;
            }

            let ordered = repo.ordered_siblings_and_self(&item, rank).unwrap();
            let mut rebuilt = repo.previous_siblings(&item, rank, &Query::any()).unwrap();
            rebuilt.push(item.clone());
            rebuilt.extend(repo.following_siblings(&item, rank, &Query::any()).unwrap());

            prop_assert_eq!(rebuilt, ordered);
        }
    }

    #[test]
    fn descendants_visit_each_item_once((repo, ids) in arb_tree()) {
        let root = repo.get(ids[0]).unwrap();
        let all = repo.descendants(&root, &Query::any().with_max_hops(ids.len())).unwrap();

        let unique: HashSet<_> = all.iter().map(|c| c.id).collect();
        prop_assert_eq!(unique.len(), all.len());
        prop_assert_eq!(all.len(), ids.len() - 1);
    }
}
