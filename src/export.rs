//! # Exportação e Validação
//!
//! ## Forma de Trânsito
//!
//! [`export_graph`] achata o [`Graph`] num documento JSON estável:
//!
//! ```json
//! {
//!   "graph_schema_version": "v1",
//!   "nodes": [{"type": "Keyword", "id": "…", "text": "lottery", "language": "en"}],
//!   "edges": [{"type": "MENTIONS_KEYWORD",
//!              "from": {"type": "Post", "id": "p1"},
//!              "to": {"type": "Keyword", "id": "…"},
//!              "weight": 0.5}]
//! }
//! ```
//!
//! As propriedades são achatadas no mesmo objeto. As chaves estruturais
//! (`type`, `id`, `from`, `to`) sempre prevalecem sobre propriedades homônimas.
//!
//! ## Validação
//!
//! [`validate_graph`] nunca falha: devolve um [`ValidationReport`] com erros
//! (chaves duplicadas, arestas soltas), avisos (muitos nós sem propriedades)
//! e estatísticas por tipo.

use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::core::{Graph, GraphEdge, GraphNode, NodeRef};

/// Máximo de arestas soltas listadas individualmente nos erros.
const MAX_DANGLING_REPORTED: usize = 10;

/// Acima desta fração de nós sem propriedades, o relatório emite um aviso.
const EMPTY_PROPERTIES_WARN_RATIO: f64 = 0.30;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphExport {
    pub graph_schema_version: String,
    pub nodes: Vec<Value>,
    pub edges: Vec<Value>,
}

pub fn export_graph(graph: &Graph) -> GraphExport {
    GraphExport {
        graph_schema_version: graph.schema_version.clone(),
        nodes: graph.nodes.values().map(export_node).collect(),
        edges: graph.edges.iter().map(export_edge).collect(),
    }
}

fn export_node(node: &GraphNode) -> Value {
    let mut object: Map<String, Value> = node.properties.clone();
    object.insert("type".into(), json!(node.node_type));
    object.insert("id".into(), json!(node.id));
    Value::Object(object)
}

fn export_edge(edge: &GraphEdge) -> Value {
    let mut object: Map<String, Value> = edge.properties.clone();
    object.insert("type".into(), json!(edge.edge_type));
    object.insert("from".into(), json!(edge.from));
    object.insert("to".into(), json!(edge.to));
    Value::Object(object)
}

/// Serializa a forma de trânsito em JSON.
pub fn export_json_string(graph: &Graph, pretty: bool) -> Result<String> {
    let export = export_graph(graph);
    let json = if pretty {
        serde_json::to_string_pretty(&export)
    } else {
        serde_json::to_string(&export)
    };
    json.context("Falha ao serializar o grafo exportado")
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_type: BTreeMap<String, usize>,
    pub edges_by_type: BTreeMap<String, usize>,
    /// Fração de nós sem nenhuma propriedade com valor.
    pub empty_property_ratio: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub statistics: GraphStatistics,
}

/// Verifica a integridade estrutural do grafo.
///
/// | Verificação | Severidade |
/// |-------------|------------|
/// | Dois nós com a mesma chave `Tipo:id` | erro |
/// | Nó guardado sob chave diferente da sua | aviso |
/// | Aresta com ponta inexistente (até 10 listadas, depois `+N more`) | erro |
/// | Mais de 30% dos nós sem propriedades | aviso |
///
/// ```rust
/// use semantic_graph::core::{EdgeType, Graph, GraphEdge, GraphNode, NodeRef, NodeType};
/// use semantic_graph::export::validate_graph;
///
/// let mut graph = Graph::new();
/// let post = graph.add_node(GraphNode::new(NodeType::Post, "p1").with_property("text", "hi"));
/// graph.add_edge(GraphEdge::new(EdgeType::HasTopic, post, NodeRef::new(NodeType::Topic, "gone")));
///
/// let report = validate_graph(&graph);
/// assert!(!report.valid);
/// assert_eq!(report.errors.len(), 1);
/// ```
pub fn validate_graph(graph: &Graph) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut statistics = GraphStatistics {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        ..Default::default()
    };

    // ─── Nós: chaves duplicadas e estatísticas ───────────────
    let mut occurrences: BTreeMap<String, usize> = BTreeMap::new();
    let mut empty = 0usize;
    for (stored_key, node) in &graph.nodes {
        let key = node.key();
        if &key != stored_key {
            warnings.push(format!("node {} stored under key {}", key, stored_key));
        }
        *occurrences.entry(key).or_insert(0) += 1;
        *statistics.nodes_by_type.entry(node.node_type.to_string()).or_insert(0) += 1;
        if node.has_empty_properties() {
            empty += 1;
        }
    }
    for (key, count) in &occurrences {
        if *count > 1 {
            errors.push(format!("duplicate node key {} ({} nodes)", key, count));
        }
    }

    // ─── Arestas: pontas soltas ──────────────────────────────
    // Pontas são resolvidas pela chave do mapa, como em Graph::get_node
    let known: HashSet<&str> = graph.nodes.keys().map(String::as_str).collect();
    let mut dangling: Vec<String> = Vec::new();
    for (index, edge) in graph.edges.iter().enumerate() {
        *statistics.edges_by_type.entry(edge.edge_type.to_string()).or_insert(0) += 1;
        for (end, node) in [("from", &edge.from), ("to", &edge.to)] {
            if !known.contains(node.key().as_str()) {
                dangling.push(describe_dangling(index, edge, end, node));
            }
        }
    }
    if !dangling.is_empty() {
        let total = dangling.len();
        errors.extend(dangling.into_iter().take(MAX_DANGLING_REPORTED));
        if total > MAX_DANGLING_REPORTED {
            errors.push(format!("+{} more dangling edge endpoints", total - MAX_DANGLING_REPORTED));
        }
    }

    // ─── Propriedades vazias ─────────────────────────────────
    if statistics.node_count > 0 {
        statistics.empty_property_ratio = empty as f64 / statistics.node_count as f64;
        if statistics.empty_property_ratio > EMPTY_PROPERTIES_WARN_RATIO {
            warnings.push(format!(
                "{:.1}% of nodes have no properties ({} of {})",
                statistics.empty_property_ratio * 100.0,
                empty,
                statistics.node_count
            ));
        }
    }

    let valid = errors.is_empty();
    if valid {
        tracing::debug!(nodes = statistics.node_count, edges = statistics.edge_count, "Grafo válido");
    } else {
        tracing::warn!(errors = errors.len(), "Grafo inválido");
    }

    ValidationReport {
        valid,
        errors,
        warnings,
        statistics,
    }
}

fn describe_dangling(index: usize, edge: &GraphEdge, end: &str, node: &NodeRef) -> String {
    format!("edge #{} ({}) has dangling {} endpoint {}", index, edge.edge_type, end, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EdgeType, NodeType};

    fn sample() -> Graph {
        let mut graph = Graph::new();
        let post = graph.add_node(
            GraphNode::new(NodeType::Post, "p1")
                .with_property("text", "hello")
                .with_property("type", "spoofed"),
        );
        let topic = graph.add_node(GraphNode::new(NodeType::Topic, "gaming").with_property("label", "Gaming"));
        graph.add_edge(
            GraphEdge::new(EdgeType::HasTopic, post, topic)
                .with_weight(1.0)
                .with_property("from", "spoofed"),
        );
        graph
    }

    #[test]
    fn export_flattens_properties_and_protects_reserved_keys() {
        let export = export_graph(&sample());
        assert_eq!(export.graph_schema_version, "v1");

        let post = export.nodes.iter().find(|n| n["id"] == "p1").unwrap();
        assert_eq!(post["type"], "Post");
        assert_eq!(post["text"], "hello");

        let edge = &export.edges[0];
        assert_eq!(edge["type"], "HAS_TOPIC");
        assert_eq!(edge["from"], json!({"type": "Post", "id": "p1"}));
        assert_eq!(edge["to"], json!({"type": "Topic", "id": "gaming"}));
        assert_eq!(edge["weight"], json!(1.0));
    }

    #[test]
    fn json_string_has_transit_shape() {
        let text = export_json_string(&sample(), false).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["graph_schema_version"], "v1");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert!(export_json_string(&sample(), true).unwrap().contains('\n'));
    }

    #[test]
    fn valid_graph_reports_statistics() {
        let report = validate_graph(&sample());
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.warnings.is_empty());
        assert_eq!(report.statistics.node_count, 2);
        assert_eq!(report.statistics.nodes_by_type["Post"], 1);
        assert_eq!(report.statistics.edges_by_type["HAS_TOPIC"], 1);
        assert_eq!(report.statistics.empty_property_ratio, 0.0);
    }

    #[test]
    fn duplicate_composite_key_is_an_error() {
        let mut graph = sample();
        // mesmo nó inserido à força sob outra chave do mapa
        graph
            .nodes
            .insert("Post:p1#copy".into(), GraphNode::new(NodeType::Post, "p1").with_property("text", "x"));
        let report = validate_graph(&graph);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("duplicate node key Post:p1")));
        assert!(report.warnings.iter().any(|w| w.contains("stored under key Post:p1#copy")));
    }

    #[test]
    fn endpoint_must_match_stored_key() {
        let mut graph = Graph::new();
        let post = graph.add_node(GraphNode::new(NodeType::Post, "p").with_property("text", "x"));
        graph
            .nodes
            .insert("Topic:wrong".into(), GraphNode::new(NodeType::Topic, "t").with_property("label", "T"));
        let topic = NodeRef::new(NodeType::Topic, "t");
        graph.add_edge(GraphEdge::new(EdgeType::HasTopic, post, topic.clone()));
        assert!(graph.get_node(&topic).is_none());

        let report = validate_graph(&graph);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("dangling to endpoint Topic:t"), "{:?}", report.errors);
        assert!(report.warnings.iter().any(|w| w.contains("stored under key Topic:wrong")));
    }

    #[test]
    fn dangling_endpoints_are_capped() {
        let mut graph = Graph::new();
        let post = graph.add_node(GraphNode::new(NodeType::Post, "p1").with_property("text", "x"));
        for i in 0..12 {
            graph.add_edge(GraphEdge::new(
                EdgeType::MentionsKeyword,
                post.clone(),
                NodeRef::new(NodeType::Keyword, format!("k{}", i)),
            ));
        }
        let report = validate_graph(&graph);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 11);
        assert_eq!(report.errors[10], "+2 more dangling edge endpoints");
    }

    #[test]
    fn mostly_empty_nodes_trigger_warning() {
        let mut graph = Graph::new();
        graph.add_node(GraphNode::new(NodeType::Topic, "a"));
        graph.add_node(GraphNode::new(NodeType::Topic, "b").with_property("label", Value::Null));
        graph.add_node(GraphNode::new(NodeType::Topic, "c").with_property("label", "C"));
        let report = validate_graph(&graph);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);
        assert!((report.statistics.empty_property_ratio - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_graph_is_valid() {
        let report = validate_graph(&Graph::new());
        assert!(report.valid);
        assert_eq!(report.statistics.empty_property_ratio, 0.0);
    }
}
