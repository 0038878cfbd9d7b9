//! End-to-end tests over parsed snapshots

use kindred_core::{
    build_family_tree, calculate_relationship, find_common_ancestor, get_ancestors,
    get_descendants, parse_snapshot, validate, FamilyIndex, Member, Relationship,
};

const EXAMPLE: &str = r#"[
    {"id": "A", "parents": []},
    {"id": "B", "parents": []},
    {"id": "C", "parents": ["A", "B"]},
    {"id": "D", "parents": ["C"]}
]"#;

fn example() -> Vec<Member> {
    parse_snapshot(EXAMPLE).expect("example snapshot parses")
}

#[test]
fn given_example_family_when_building_tree_then_founder_is_root() {
    let members = example();
    let tree = build_family_tree(&members, None).unwrap();

    let root = tree.root_member().id.as_str();
    assert!(root == "A" || root == "B");

    let c = tree.index_of("C").unwrap();
    let d = tree.index_of("D").unwrap();
    assert_eq!(tree.children(tree.root()), &[c]);
    assert_eq!(tree.children(c), &[d]);
}

#[test]
fn given_two_parents_when_building_tree_then_child_node_is_shared() {
    let members = example();
    let tree = build_family_tree(&members, None).unwrap();

    let a = tree.index_of("A").unwrap();
    let b = tree.index_of("B").unwrap();
    let c = tree.index_of("C").unwrap();

    let under_a: Vec<_> = tree.children(a).iter().filter(|&&i| i == c).collect();
    let under_b: Vec<_> = tree.children(b).iter().filter(|&&i| i == c).collect();
    assert_eq!(under_a.len(), 1);
    assert_eq!(under_b.len(), 1);
    assert_eq!(under_a[0], under_b[0]);
}

#[test]
fn given_every_member_as_root_when_building_tree_then_root_matches() {
    let members = example();
    for member in &members {
        let tree = build_family_tree(&members, Some(member.id.as_str())).unwrap();
        assert_eq!(tree.root_member().id, member.id);
    }
}

#[test]
fn given_example_family_when_classifying_then_labels_match() {
    let members = example();

    assert!(calculate_relationship(&members, "C", "A").is_parent());
    assert_eq!(calculate_relationship(&members, "A", "B"), Relationship::Unrelated);
    assert_eq!(calculate_relationship(&members, "D", "D"), Relationship::SamePerson);
    assert_eq!(calculate_relationship(&members, "A", "C"), Relationship::Child);
}

#[test]
fn given_example_family_when_finding_common_ancestor_then_parent_is_returned() {
    let members = example();
    let found = find_common_ancestor(&members, "D", "C").map(|m| m.id.as_str());

    assert_eq!(found, Some("C"));
    assert_eq!(find_common_ancestor(&members, "A", "B"), None);
}

#[test]
fn given_common_ancestor_then_it_is_in_both_lines() {
    let members = example();
    let index = FamilyIndex::new(&members);
    let ids: Vec<&str> = members.iter().map(|m| m.id.as_str()).collect();

    for &x in &ids {
        for &y in &ids {
            let Some(found) = find_common_ancestor(&members, x, y) else {
                continue;
            };
            let found = found.id.as_str();
            let in_line = |id: &str| id == found || index.ancestor_ids(id).contains(&found);
            assert!(in_line(x), "{} not in line of {}", found, x);
            assert!(in_line(y), "{} not in line of {}", found, y);
        }
    }
}

#[test]
fn given_cyclic_snapshot_when_querying_then_queries_terminate() {
    let members = parse_snapshot(
        r#"[
            {"id": "A", "parents": ["B"]},
            {"id": "B", "parents": ["A"]}
        ]"#,
    )
    .unwrap();

    assert_eq!(get_ancestors(&members, "A").len(), 1);
    assert_eq!(get_descendants(&members, "B").len(), 1);
    assert!(build_family_tree(&members, None).is_some());
    assert!(!validate(&members).is_empty());
}

#[test]
fn given_wrapped_snapshot_with_dates_when_building_then_eldest_is_root() {
    let members = parse_snapshot(
        r#"{"members": [
            {"id": "kid", "parents": ["mum", "elsewhere"], "birthDate": "1990-06-01"},
            {"id": "mum", "gender": "female", "birthDate": "1960-01-01", "generation": 1},
            {"id": "gran", "birthDate": "1930-01-01", "generation": 0}
        ]}"#,
    )
    .unwrap();
    let tree = build_family_tree(&members, None).unwrap();

    assert_eq!(tree.root_member().id.as_str(), "gran");
    assert_eq!(
        calculate_relationship(&members, "kid", "mum"),
        Relationship::Mother
    );
}
