//! # Builder de Políticas — Documentos, Key Points e Relações
//!
//! Cada [`PolicyRecord`] vira um nó `Policy` ligado ao estado onde se aplica,
//! ao seu tipo, aos seus key points e às entidades mencionadas. As triplas de
//! relação viram arestas `POLICY_RELATION` **entre entidades**:
//!
//! ```text
//! Policy ──APPLIES_TO_STATE──► State
//!   ├────HAS_TYPE────────────► PolicyType
//!   ├────HAS_KEYPOINT(order)─► KeyPoint
//!   └────MENTIONS_ENTITY─────► Entity ──POLICY_RELATION──► Entity
//! ```
//!
//! ## Resolução de Sujeito e Objeto
//!
//! Sujeito e objeto de uma tripla são texto livre. A resolução é por texto
//! normalizado exato contra as entidades **do mesmo registro** (texto da
//! menção ou nome canônico). Sem correspondência, uma entidade ad-hoc é
//! sintetizada com tipo `"unknown"` e nome igual ao literal, e passa a valer
//! para as triplas seguintes do registro.
//!
//! O predicado passa pela ontologia ([`relation_annotation`]): a aresta
//! guarda a forma original, a canônica e a classe da relação.

use std::collections::HashMap;
use std::time::Instant;

use serde_json::Value;

use crate::core::canonical::{entity_id, keypoint_id, non_blank, normalize_text, UNKNOWN_ENTITY_TYPE};
use crate::core::ontology::relation_annotation;
use crate::core::timestamp::{format_date, format_timestamp, parse_optional};
use crate::core::{EdgeType, Graph, GraphEdge, GraphNode, NodeRef, NodeType};
use crate::records::{EntityMention, PolicyRecord, RelationTriple};

use super::{entity_node, mention_edge, state_node};

/// Índice texto normalizado → entidade, válido para um único registro.
type EntityIndex = HashMap<String, NodeRef>;

pub fn build_policy_graph(records: &[PolicyRecord]) -> Graph {
    let span = tracing::info_span!("policy_graph_build", records = records.len());
    let _guard = span.enter();
    let started = Instant::now();

    let mut graph = Graph::new();
    let mut skipped = 0usize;
    let mut relations = 0usize;

    for (index, record) in records.iter().enumerate() {
        let Some(doc_id) = non_blank(Some(record.doc_id.as_str())) else {
            tracing::warn!(index, "Política sem doc_id ignorada");
            skipped += 1;
            continue;
        };
        relations += add_policy(&mut graph, doc_id, record);
    }

    tracing::info!(
        records = records.len() - skipped,
        skipped,
        relations,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Grafo de políticas construído"
    );
    graph
}

/// Adiciona um registro ao grafo e retorna o número de relações emitidas.
fn add_policy(graph: &mut Graph, doc_id: &str, record: &PolicyRecord) -> usize {
    // ─── Passada 1: nós ──────────────────────────────────────
    let state = state_node(record.state.as_deref()).map(|node| graph.add_node(node));
    let policy_type = non_blank(record.policy_type.as_deref()).map(|label| {
        graph.add_node(GraphNode::new(NodeType::PolicyType, normalize_text(label)).with_property("label", label))
    });

    let mut keypoints: Vec<NodeRef> = Vec::new();
    for text in record.key_points.iter().filter_map(|k| non_blank(Some(k.as_str()))) {
        let node = graph.add_node(
            GraphNode::new(NodeType::KeyPoint, keypoint_id(text))
                .with_property("text", text)
                .with_property("normalized", normalize_text(text)),
        );
        if !keypoints.contains(&node) {
            keypoints.push(node);
        }
    }

    let mut index = EntityIndex::new();
    let mut mentions: Vec<(NodeRef, &EntityMention)> = Vec::new();
    for mention in &record.entities {
        let Some(node) = entity_node(mention) else {
            continue;
        };
        let entity = graph.add_node(node);
        for name in [Some(mention.text.as_str()), mention.canonical_name.as_deref()] {
            let key = normalize_text(name.unwrap_or_default());
            if !key.is_empty() {
                index.entry(key).or_insert_with(|| entity.clone());
            }
        }
        mentions.push((entity, mention));
    }

    let policy = graph.add_node(
        GraphNode::new(NodeType::Policy, doc_id)
            .with_optional("title", non_blank(record.title.as_deref()))
            .with_optional("status", non_blank(record.status.as_deref()).map(str::to_lowercase))
            .with_optional("published_at", date_property(record.published_at.as_deref()))
            .with_optional("effective_at", date_property(record.effective_at.as_deref()))
            .with_optional("summary", non_blank(record.summary.as_deref()))
            .with_optional("source", non_blank(record.source.as_deref()))
            .with_optional("state", state.as_ref().map(|s| s.id.clone()))
            .with_optional("policy_type", non_blank(record.policy_type.as_deref()))
            .with_property("keypoint_count", keypoints.len()),
    );

    // ─── Passada 2: arestas ──────────────────────────────────
    if let Some(state) = state {
        graph.add_edge(GraphEdge::new(EdgeType::AppliesToState, policy.clone(), state).with_weight(1.0));
    }
    if let Some(policy_type) = policy_type {
        graph.add_edge(GraphEdge::new(EdgeType::HasType, policy.clone(), policy_type).with_weight(1.0));
    }
    for (position, keypoint) in keypoints.into_iter().enumerate() {
        graph.add_edge(
            GraphEdge::new(EdgeType::HasKeypoint, policy.clone(), keypoint)
                .with_weight(1.0)
                .with_property("order", position + 1),
        );
    }
    for (entity, mention) in mentions {
        graph.add_edge(mention_edge(policy.clone(), entity, mention));
    }

    let mut emitted = 0;
    for triple in &record.relations {
        if let Some(edge) = relation_edge(graph, &mut index, doc_id, triple) {
            graph.add_edge(edge);
            emitted += 1;
        }
    }
    emitted
}

/// Resolve sujeito e objeto e monta a aresta `POLICY_RELATION`.
fn relation_edge(
    graph: &mut Graph,
    index: &mut EntityIndex,
    doc_id: &str,
    triple: &RelationTriple,
) -> Option<GraphEdge> {
    let (Some(subject), Some(object)) = (
        non_blank(Some(triple.subject.as_str())),
        non_blank(Some(triple.object.as_str())),
    ) else {
        tracing::warn!(policy = doc_id, "Relação sem sujeito ou objeto ignorada");
        return None;
    };

    let from = resolve_entity(graph, index, subject);
    let to = resolve_entity(graph, index, object);
    let annotation = relation_annotation(triple.predicate.as_deref());
    let date = parse_optional(triple.date.as_deref())
        .map(|dt| format_date(&dt))
        .or_else(|| non_blank(triple.date.as_deref()).map(str::to_string));

    Some(
        GraphEdge::new(EdgeType::PolicyRelation, from, to)
            .with_weight(1.0)
            .with_property("predicate", annotation.predicate_norm.clone())
            .with_property("predicate_norm", annotation.predicate_norm)
            .with_optional("predicate_raw", non_blank(Some(annotation.predicate_raw.as_str())))
            .with_property("relation_class", annotation.relation_class)
            .with_optional("evidence", non_blank(triple.evidence.as_deref()))
            .with_optional("confidence", triple.confidence)
            .with_optional("date", date)
            .with_property("policy_id", doc_id),
    )
}

/// Entidade do registro com o mesmo texto normalizado, ou uma ad-hoc nova.
fn resolve_entity(graph: &mut Graph, index: &mut EntityIndex, literal: &str) -> NodeRef {
    let key = normalize_text(literal);
    if let Some(found) = index.get(&key) {
        return found.clone();
    }

    let adhoc = EntityMention {
        text: literal.to_string(),
        canonical_name: Some(literal.to_string()),
        ..Default::default()
    };
    tracing::debug!(entity = literal, "Entidade ad-hoc sintetizada");
    let entity = graph.add_node(
        GraphNode::new(NodeType::Entity, entity_id(&adhoc))
            .with_property("name", literal)
            .with_property("entity_type", UNKNOWN_ENTITY_TYPE)
            .with_property("adhoc", true),
    );
    index.insert(key, entity.clone());
    entity
}

/// Datas do documento em RFC 3339; texto ilegível é descartado.
fn date_property(raw: Option<&str>) -> Option<Value> {
    parse_optional(raw).map(|dt| Value::String(format_timestamp(&dt)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn relation(subject: &str, object: &str, predicate: &str) -> RelationTriple {
        RelationTriple {
            subject: subject.into(),
            object: object.into(),
            predicate: Some(predicate.into()),
            ..Default::default()
        }
    }

    #[test]
    fn scenario_adhoc_entities_for_unmatched_relation() {
        crate::test_support::init_tracing();
        let record = PolicyRecord {
            doc_id: "d1".into(),
            relations: vec![relation("Acme Corp", "State X", "regulate")],
            ..Default::default()
        };
        let graph = build_policy_graph(&[record]);

        let entities: Vec<_> = graph.nodes_of_type(NodeType::Entity).collect();
        assert_eq!(entities.len(), 2);
        for entity in &entities {
            assert_eq!(entity.property_str("entity_type"), Some("unknown"));
            assert_eq!(entity.properties["adhoc"], json!(true));
        }

        let edges: Vec<_> = graph.edges_of_type(EdgeType::PolicyRelation).collect();
        assert_eq!(edges.len(), 1);
        let edge = edges[0];
        assert_eq!(edge.properties["predicate_norm"], json!("regulates"));
        assert_eq!(edge.properties["predicate_raw"], json!("regulate"));
        assert_eq!(edge.properties["relation_class"], json!("governance"));
        assert_eq!(edge.properties["policy_id"], json!("d1"));
        assert!(!edge.properties.contains_key("evidence"));
        assert!(!edge.properties.contains_key("confidence"));

        let acme = graph.get_node(&edge.from).unwrap();
        assert_eq!(acme.property_str("name"), Some("Acme Corp"));
    }

    #[test]
    fn relations_resolve_against_declared_entities() {
        let record = PolicyRecord {
            doc_id: "d1".into(),
            entities: vec![
                EntityMention {
                    text: "the Commission".into(),
                    canonical_name: Some("Gaming Commission".into()),
                    entity_type: Some("org".into()),
                    ..Default::default()
                },
                EntityMention {
                    text: "Acme".into(),
                    entity_type: Some("org".into()),
                    ..Default::default()
                },
            ],
            relations: vec![
                relation("gaming commission", "ACME", "licensed"),
                relation("The Commission", "Acme", "fined"),
            ],
            ..Default::default()
        };
        let graph = build_policy_graph(&[record]);

        assert_eq!(graph.nodes_of_type(NodeType::Entity).count(), 2);
        let edges: Vec<_> = graph.edges_of_type(EdgeType::PolicyRelation).collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].from, edges[1].from);
        assert_eq!(edges[0].properties["predicate_norm"], json!("licenses"));
        assert_eq!(edges[1].properties["relation_class"], json!("legal"));
    }

    #[test]
    fn adhoc_entity_is_reused_within_record() {
        let record = PolicyRecord {
            doc_id: "d1".into(),
            relations: vec![
                relation("Acme Corp", "State X", "regulate"),
                relation("acme corp", "Beta LLC", "partnered with"),
            ],
            ..Default::default()
        };
        let graph = build_policy_graph(&[record]);
        assert_eq!(graph.nodes_of_type(NodeType::Entity).count(), 3);
        let edges: Vec<_> = graph.edges_of_type(EdgeType::PolicyRelation).collect();
        assert_eq!(edges[0].from, edges[1].from);
    }

    #[test]
    fn blank_subject_or_object_is_skipped() {
        let record = PolicyRecord {
            doc_id: "d1".into(),
            relations: vec![relation(" ", "State X", "regulate"), relation("Acme", "", "bans")],
            ..Default::default()
        };
        let graph = build_policy_graph(&[record]);
        assert_eq!(graph.edges_of_type(EdgeType::PolicyRelation).count(), 0);
        assert_eq!(graph.nodes_of_type(NodeType::Entity).count(), 0);
    }

    #[test]
    fn policy_links_state_type_and_ordered_keypoints() {
        let record = PolicyRecord {
            doc_id: "d1".into(),
            title: Some("Online Sales Act".into()),
            state: Some("tx".into()),
            status: Some("Enacted".into()),
            published_at: Some("2024-02-01".into()),
            effective_at: Some("garbage".into()),
            policy_type: Some("Statute".into()),
            key_points: vec![
                "Allows online sales".into(),
                "allows  ONLINE sales".into(),
                "".into(),
                "Sets age limit".into(),
            ],
            ..Default::default()
        };
        let graph = build_policy_graph(&[record]);

        let policy = graph.get_node(&NodeRef::new(NodeType::Policy, "d1")).unwrap();
        assert_eq!(policy.property_str("status"), Some("enacted"));
        assert_eq!(policy.property_str("published_at"), Some("2024-02-01T00:00:00Z"));
        assert!(policy.properties.get("effective_at").is_none());
        assert_eq!(policy.properties["keypoint_count"], json!(2));

        assert!(graph.contains(&NodeRef::new(NodeType::State, "TX")));
        assert!(graph.contains(&NodeRef::new(NodeType::PolicyType, "statute")));
        assert_eq!(graph.nodes_of_type(NodeType::KeyPoint).count(), 2);

        let orders: Vec<_> = graph
            .edges_of_type(EdgeType::HasKeypoint)
            .map(|e| (e.to.id.clone(), e.properties["order"].clone()))
            .collect();
        assert_eq!(
            orders,
            vec![
                (keypoint_id("Allows online sales"), json!(1)),
                (keypoint_id("Sets age limit"), json!(2)),
            ]
        );
        assert_eq!(graph.edges_of_type(EdgeType::AppliesToState).count(), 1);
        assert_eq!(graph.edges_of_type(EdgeType::HasType).count(), 1);
    }

    #[test]
    fn keypoints_are_shared_across_policies() {
        let make = |id: &str| PolicyRecord {
            doc_id: id.into(),
            key_points: vec!["Sets age limit".into()],
            ..Default::default()
        };
        let graph = build_policy_graph(&[make("d1"), make("d2"), PolicyRecord::default()]);
        assert_eq!(graph.nodes_of_type(NodeType::KeyPoint).count(), 1);
        assert_eq!(graph.nodes_of_type(NodeType::Policy).count(), 2);
    }
}
