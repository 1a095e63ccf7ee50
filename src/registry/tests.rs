//! Registry and resolution tests

use super::*;
use crate::config::PathAlias;

fn module(path: Option<&str>, parent: Option<Uuid>, order_no: i32) -> Module {
    Module {
        id: Uuid::new_v4(),
        display_name: path.unwrap_or("group").trim_start_matches('/').to_string(),
        internal_name: path.unwrap_or("group").trim_start_matches('/').to_string(),
        level: if parent.is_some() { 2 } else { 1 },
        order_no,
        canonical_path: path.map(|p| p.to_string()),
        parent_id: parent,
        is_group: path.is_none(),
        visible: true,
    }
}

#[test]
fn find_by_path_is_exact_and_case_sensitive() {
    let registry = ModuleRegistry::new();
    let accounts = module(Some("/accounts"), None, 1);
    let id = accounts.id;
    registry.insert(accounts).unwrap();

    assert_eq!(registry.find_by_path("/accounts").map(|m| m.id), Some(id));
    assert!(registry.find_by_path("/Accounts").is_none());
    assert!(registry.find_by_path("/accounts/").is_none());
}

#[test]
fn duplicate_canonical_path_is_rejected() {
    let registry = ModuleRegistry::new();
    registry.insert(module(Some("/accounts"), None, 1)).unwrap();

    let duplicate = module(Some("/accounts"), None, 2);
    assert!(registry.insert(duplicate).is_err());
}

#[test]
fn update_may_move_canonical_path() {
    let registry = ModuleRegistry::new();
    let mut m = module(Some("/accounts"), None, 1);
    registry.insert(m.clone()).unwrap();

    m.canonical_path = Some("/customer-accounts".to_string());
    registry.insert(m.clone()).unwrap();

    assert!(registry.find_by_path("/accounts").is_none());
    assert_eq!(
        registry.find_by_path("/customer-accounts").map(|x| x.id),
        Some(m.id)
    );
}

#[test]
fn grouping_nodes_carry_no_path() {
    let registry = ModuleRegistry::new();
    let group = module(None, None, 1);
    let group_id = group.id;
    registry.insert(group).unwrap();
    registry
        .insert(module(Some("/contracts"), Some(group_id), 1))
        .unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.find_by_path("/contracts").is_some());
}

#[test]
fn list_all_orders_siblings_by_order_no() {
    let registry = ModuleRegistry::new();
    let root = module(None, None, 1);
    let root_id = root.id;
    registry.insert(root).unwrap();
    registry.insert(module(Some("/c"), Some(root_id), 3)).unwrap();
    registry.insert(module(Some("/a"), Some(root_id), 1)).unwrap();
    registry.insert(module(Some("/b"), Some(root_id), 2)).unwrap();

    let order: Vec<i32> = registry
        .list_all()
        .into_iter()
        .filter(|m| m.parent_id == Some(root_id))
        .map(|m| m.order_no)
        .collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn build_tree_groups_children_under_parents() {
    let registry = ModuleRegistry::new();
    let sales = module(None, None, 2);
    let sales_id = sales.id;
    let personnel = module(None, None, 1);
    let personnel_id = personnel.id;
    registry.insert(sales).unwrap();
    registry.insert(personnel).unwrap();
    registry
        .insert(module(Some("/opportunities"), Some(sales_id), 2))
        .unwrap();
    registry
        .insert(module(Some("/contracts"), Some(sales_id), 1))
        .unwrap();
    registry
        .insert(module(Some("/employees"), Some(personnel_id), 1))
        .unwrap();

    let tree = registry.build_tree();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].module.id, personnel_id);
    assert_eq!(tree[1].module.id, sales_id);

    let sales_children: Vec<&str> = tree[1]
        .children
        .iter()
        .map(|n| n.module.internal_name.as_str())
        .collect();
    assert_eq!(sales_children, vec!["contracts", "opportunities"]);
}

#[test]
fn orphaned_parent_reference_becomes_a_root() {
    let registry = ModuleRegistry::new();
    let orphan = module(Some("/monitoring-points"), Some(Uuid::new_v4()), 1);
    let orphan_id = orphan.id;
    registry.insert(orphan).unwrap();

    let tree = registry.build_tree();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].module.id, orphan_id);
    assert!(tree[0].children.is_empty());
}

#[test]
fn remove_clears_the_path_index() {
    let registry = ModuleRegistry::new();
    let m = module(Some("/contracts"), None, 1);
    let id = m.id;
    registry.insert(m).unwrap();

    let removed = registry.remove(id);
    assert_eq!(removed.map(|m| m.id), Some(id));
    assert!(registry.find_by_path("/contracts").is_none());
    assert!(registry.remove(id).is_none());
}

#[test]
fn resolve_prefers_the_longest_registered_prefix() {
    let registry = ModuleRegistry::new();
    registry.insert(module(Some("/contracts"), None, 1)).unwrap();
    let specific = module(Some("/contracts/templates"), None, 2);
    let specific_id = specific.id;
    registry.insert(specific).unwrap();

    let resolver = PathResolver::new("/api", Vec::new());
    let resolved = resolver
        .resolve("/api/contracts/templates/preview", &registry)
        .unwrap();
    assert_eq!(resolved.id, specific_id);
}

#[test]
fn resolve_falls_back_to_the_nearest_parent() {
    let registry = ModuleRegistry::new();
    let contracts = module(Some("/contracts"), None, 1);
    let contracts_id = contracts.id;
    registry.insert(contracts).unwrap();

    let resolver = PathResolver::new("/api", Vec::new());

    // Registered path resolves to itself.
    let direct = resolver.resolve("/api/contracts", &registry).unwrap();
    assert_eq!(direct.id, contracts_id);

    // Unregistered sub-actions resolve to the enclosing resource.
    let action = resolver
        .resolve("/api/contracts/42/approve", &registry)
        .unwrap();
    assert_eq!(action.id, contracts_id);

    let deep = resolver
        .resolve("/api/contracts/drafts/bulk/export", &registry)
        .unwrap();
    assert_eq!(deep.id, contracts_id);
}

#[test]
fn uuid_tail_resolves_like_the_stripped_path() {
    let registry = ModuleRegistry::new();
    registry.insert(module(Some("/accounts"), None, 1)).unwrap();
    let resolver = PathResolver::new("/api", Vec::new());

    let with_id = resolver
        .resolve(
            "/api/accounts/9b1deb4d-3b7d-4bad-9bdd-2b0d7b3dcb6d",
            &registry,
        )
        .unwrap();
    let without_id = resolver.resolve("/api/accounts", &registry).unwrap();
    assert_eq!(with_id.id, without_id.id);
}

#[test]
fn unregistered_path_resolves_to_nothing() {
    let registry = ModuleRegistry::new();
    registry.insert(module(Some("/accounts"), None, 1)).unwrap();
    let resolver = PathResolver::new("/api", Vec::new());

    assert!(resolver.resolve("/api/unregistered-thing", &registry).is_none());
    // Single segment is tried exactly once, no further shortening.
    assert!(resolver.resolve("/api/contracts", &registry).is_none());
    // Outside the namespace the resolver is not applicable at all.
    assert!(resolver.resolve("/metrics", &registry).is_none());
}

#[test]
fn empty_path_never_matches_a_catch_all() {
    let registry = ModuleRegistry::new();
    // Hostile registration: a module claiming the empty string.
    let mut m = module(Some(""), None, 1);
    m.canonical_path = Some(String::new());
    registry.insert(m).unwrap();

    let resolver = PathResolver::new("/api", Vec::new());
    assert!(resolver.resolve("/api/", &registry).is_none());
    assert!(resolver.resolve("/api", &registry).is_none());
}

#[test]
fn alias_routes_registration_to_accounts() {
    let registry = ModuleRegistry::new();
    let accounts = module(Some("/accounts"), None, 1);
    let accounts_id = accounts.id;
    registry.insert(accounts).unwrap();

    let resolver = PathResolver::new(
        "/api",
        vec![PathAlias {
            from: "/register".to_string(),
            to: "/accounts".to_string(),
        }],
    );
    let resolved = resolver.resolve("/api/register", &registry).unwrap();
    assert_eq!(resolved.id, accounts_id);
}
