use proptest::prelude::*;
use tokens_core::node::Group;
use tokens_core::{
    FileCategory, Leaf, Scalar, StructureClassifier, TokenNode, deep_merge, diff, flatten,
    resolve_tree, unflatten_all,
};

fn scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        any::<bool>().prop_map(Scalar::Boolean),
        (-1000i32..1000).prop_map(|n| Scalar::Number(f64::from(n) / 4.0)),
        "[a-z#0-9 ]{0,8}".prop_map(Scalar::Text),
        "\\{[abc](\\.[abc]){0,2}\\}".prop_map(Scalar::Text),
    ]
}

fn leaf() -> impl Strategy<Value = TokenNode> {
    (
        scalar(),
        proptest::option::of("[a-z]{1,8}"),
        proptest::option::of("[a-z ]{0,10}"),
    )
        .prop_map(|(value, token_type, comment)| {
            TokenNode::Leaf(Leaf {
                value,
                token_type,
                comment,
            })
        })
}

/// Trees whose groups are never empty (an empty group has no flat form)
fn tree_with_keys(keys: &'static str) -> impl Strategy<Value = TokenNode> {
    let node = leaf().prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(("[abc]", inner), 1..4)
            .prop_map(|entries| TokenNode::Group(entries.into_iter().collect::<Group>()))
    });
    prop::collection::vec((keys, node), 0..4)
        .prop_map(|entries| TokenNode::Group(entries.into_iter().collect::<Group>()))
}

fn tree() -> impl Strategy<Value = TokenNode> {
    tree_with_keys("[abc]")
}

proptest! {
    #[test]
    fn test_flatten_unflatten_round_trip(t in tree()) {
        let rebuilt = unflatten_all(flatten(&t)).unwrap();
        prop_assert!(rebuilt.diagnostics.is_empty());
        prop_assert_eq!(rebuilt.value, t);
    }

    #[test]
    fn test_resolution_is_idempotent(t in tree()) {
        let once = resolve_tree(&t).value;
        let twice = resolve_tree(&once).value;
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn test_disjoint_merge_is_a_union_in_any_order(
        a in tree_with_keys("a[abc]"),
        b in tree_with_keys("b[abc]"),
    ) {
        let mut ab = a.clone();
        deep_merge(&mut ab, &b);
        let mut ba = b.clone();
        deep_merge(&mut ba, &a);

        prop_assert_eq!(flatten(&ab).len(), flatten(&a).len() + flatten(&b).len());
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn test_later_leaf_wins(t in tree(), x in leaf(), y in leaf()) {
        let mut a = t;
        let overlay_a: Group = [("x".to_string(), TokenNode::Group([("y".to_string(), x)].into_iter().collect()))]
            .into_iter()
            .collect();
        deep_merge(&mut a, &TokenNode::Group(overlay_a));

        let overlay_b: Group = [("x".to_string(), TokenNode::Group([("y".to_string(), y.clone())].into_iter().collect()))]
            .into_iter()
            .collect();
        deep_merge(&mut a, &TokenNode::Group(overlay_b));

        prop_assert_eq!(a.get_path(&["x", "y"]), Some(&y));
    }

    #[test]
    fn test_diff_of_identical_trees_is_empty(t in tree()) {
        prop_assert!(diff(&t, &t).is_empty());
    }

    #[test]
    fn test_global_under_brand_folder_is_never_a_brand(
        prefix in "[a-z]{1,8}",
        file in "[a-z]{1,8}",
    ) {
        let path = format!("{prefix}/brand/global/{file}.json");
        let (category, brand) = StructureClassifier::default().categorize(&path);
        prop_assert_eq!(category, FileCategory::Global);
        prop_assert_eq!(brand, None);
    }
}
