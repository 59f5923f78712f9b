use graftwatch_model::CompanyId;
use graftwatch_store::fixture::{
    company_id, empty_store, insert_partner, insert_supplier, link_partner, person_hash,
};
use graftwatch_store::{GraphNodeKind, GraphReader, SqliteStore};

fn id(seed: u32) -> CompanyId {
    CompanyId::parse(&company_id(seed)).expect("fixture company id")
}

#[tokio::test]
async fn missing_seed_yields_none() {
    let store = SqliteStore::from_connection(empty_store());
    assert!(store
        .graph_two_hops(&id(1), 50)
        .await
        .expect("walk")
        .is_none());
}

#[tokio::test]
async fn seed_without_partners_is_a_single_node_graph() {
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "LONER LTDA", 12);
    let store = SqliteStore::from_connection(conn);

    let graph = store
        .graph_two_hops(&id(1), 50)
        .await
        .expect("walk")
        .expect("projection");
    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].kind, GraphNodeKind::Company);
    assert_eq!(graph.nodes[0].id, company_id(1));
    assert_eq!(graph.nodes[0].score, Some(12));
    assert!(graph.edges.is_empty());
    assert!(!graph.truncated);
}

#[tokio::test]
async fn two_hop_walk_reaches_partners_of_level_one_suppliers() {
    // seed --p1-- other --p2-- (nothing further)
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "SEED", 0);
    insert_supplier(&conn, 2, &company_id(2), "OTHER", 0);
    insert_partner(&conn, 1, &person_hash(1), "SHARED PARTNER");
    insert_partner(&conn, 2, &person_hash(2), "OTHER OWN PARTNER");
    link_partner(&conn, 1, 1);
    link_partner(&conn, 2, 1);
    link_partner(&conn, 2, 2);
    let store = SqliteStore::from_connection(conn);

    let graph = store
        .graph_two_hops(&id(1), 50)
        .await
        .expect("walk")
        .expect("projection");

    // seed, p1, other, p2 — the second partner is reached on hop two.
    assert_eq!(graph.nodes.len(), 4);
    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert!(ids.contains(&person_hash(2).as_str()));
    assert!(!graph.truncated);

    // Both endpoints of every edge are kept nodes.
    for edge in &graph.edges {
        assert!(ids.contains(&edge.source.as_str()));
        assert!(ids.contains(&edge.target.as_str()));
    }
    // p1 connects to both companies, p2 only to the second.
    assert_eq!(graph.edges.len(), 3);
}

#[tokio::test]
async fn node_identities_are_company_ids_and_person_hashes() {
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "SEED", 0);
    insert_partner(&conn, 1, &person_hash(9), "PARTNER");
    link_partner(&conn, 1, 1);
    let store = SqliteStore::from_connection(conn);

    let graph = store
        .graph_two_hops(&id(1), 50)
        .await
        .expect("walk")
        .expect("projection");
    let person = graph
        .nodes
        .iter()
        .find(|n| n.kind == GraphNodeKind::Person)
        .expect("person node");
    assert_eq!(person.id, person_hash(9));
    assert_eq!(person.score, None);
    let edge = &graph.edges[0];
    assert_eq!(edge.source, person_hash(9));
    assert_eq!(edge.target, company_id(1));
}

#[tokio::test]
async fn walk_truncates_at_max_nodes_and_keeps_edges_consistent() {
    // Seed + one hub partner + 73 sibling suppliers: 75 distinct nodes.
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "SEED", 0);
    insert_partner(&conn, 1, &person_hash(1), "HUB PARTNER");
    link_partner(&conn, 1, 1);
    for n in 0..73 {
        let pk = 100 + n;
        insert_supplier(&conn, pk, &company_id(1000 + n as u32), "SIBLING", 0);
        link_partner(&conn, pk, 1);
    }
    let store = SqliteStore::from_connection(conn);

    let graph = store
        .graph_two_hops(&id(1), 50)
        .await
        .expect("walk")
        .expect("projection");
    assert_eq!(graph.nodes.len(), 50);
    assert!(graph.truncated);

    let kept: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &graph.edges {
        assert!(kept.contains(&edge.source.as_str()));
        assert!(kept.contains(&edge.target.as_str()));
    }
    // The hub links every kept sibling: 49 company nodes are kept next to
    // the hub partner, each with exactly one edge.
    assert_eq!(graph.edges.len(), 49);
}

#[tokio::test]
async fn exactly_max_nodes_is_not_truncated() {
    // Seed + partner + 3 siblings = 5 nodes at max_nodes = 5.
    let conn = empty_store();
    insert_supplier(&conn, 1, &company_id(1), "SEED", 0);
    insert_partner(&conn, 1, &person_hash(1), "HUB PARTNER");
    link_partner(&conn, 1, 1);
    for n in 0..3_i64 {
        let pk = 100 + n;
        insert_supplier(&conn, pk, &company_id(1000 + n as u32), "SIBLING", 0);
        link_partner(&conn, pk, 1);
    }
    let store = SqliteStore::from_connection(conn);

    let graph = store
        .graph_two_hops(&id(1), 5)
        .await
        .expect("walk")
        .expect("projection");
    assert_eq!(graph.nodes.len(), 5);
    assert!(!graph.truncated);
}
