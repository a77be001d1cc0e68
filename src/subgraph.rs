//! # Subgrafo por Tópico
//!
//! Recorta de um grafo social tudo o que gira em torno de um `Topic`:
//!
//! 1. Localiza o nó `Topic` pelo rótulo normalizado
//! 2. Seleciona os posts ligados a ele por `HAS_TOPIC` (opcionalmente
//!    filtrados por uma janela de tempo)
//! 3. Faz **uma** passada de fechamento: todo nó adjacente a um post
//!    selecionado entra (keywords, entidades, usuário, subreddit...)
//! 4. Copia as arestas cujas duas pontas ficaram no recorte
//!
//! O fechamento não é recursivo: vizinhos dos vizinhos só entram se também
//! forem vizinhos de algum post selecionado. Posts do mesmo tópico fora da
//! janela não voltam pelo nó `Topic`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::canonical::normalize_text;
use crate::core::timestamp::parse_timestamp;
use crate::core::{EdgeType, Graph, GraphNode, NodeRef, NodeType};

/// Intervalo de tempo inclusivo; extremos ausentes ficam em aberto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| instant >= s) && self.end.map_or(true, |e| instant <= e)
    }
}

/// Subgrafo de um tópico. Tópico inexistente → grafo vazio.
///
/// ```rust
/// use semantic_graph::config::BuildConfig;
/// use semantic_graph::records::SocialPost;
/// use semantic_graph::{build_social_graph, build_topic_subgraph};
///
/// let posts = vec![SocialPost { id: "p1".into(), topic: Some("Gaming".into()), ..Default::default() }];
/// let graph = build_social_graph(&posts, &BuildConfig::default());
///
/// assert_eq!(build_topic_subgraph(&graph, " GAMING ", None).node_count(), 2);
/// assert!(build_topic_subgraph(&graph, "nonexistent-topic", None).is_empty());
/// ```
pub fn build_topic_subgraph(graph: &Graph, topic: &str, window: Option<TimeWindow>) -> Graph {
    let span = tracing::info_span!("topic_subgraph", topic = %topic);
    let _guard = span.enter();

    let topic_ref = NodeRef::new(NodeType::Topic, normalize_text(topic));
    if topic_ref.id.is_empty() || !graph.contains(&topic_ref) {
        tracing::info!("Tópico não encontrado, subgrafo vazio");
        return Graph::new();
    }

    // ─── Posts semente ───────────────────────────────────────
    let seeds: HashSet<&NodeRef> = graph
        .edges_of_type(EdgeType::HasTopic)
        .filter(|e| e.to == topic_ref && e.from.node_type == NodeType::Post)
        .map(|e| &e.from)
        .filter(|post| window.map_or(true, |w| in_window(graph, post, &w)))
        .collect();
    if seeds.is_empty() {
        tracing::info!("Nenhum post do tópico na janela, subgrafo vazio");
        return Graph::new();
    }

    // ─── Fechamento de um salto ──────────────────────────────
    // O Topic entra pelas arestas HAS_TOPIC dos próprios posts semente
    let mut retained: HashSet<&NodeRef> = seeds.clone();
    for edge in &graph.edges {
        if seeds.contains(&edge.from) {
            retained.insert(&edge.to);
        } else if seeds.contains(&edge.to) {
            retained.insert(&edge.from);
        }
    }

    let mut subgraph = Graph::new();
    for node_ref in &retained {
        if let Some(node) = graph.get_node(node_ref) {
            subgraph.add_node(node.clone());
        }
    }
    subgraph.edges = graph
        .edges
        .iter()
        .filter(|e| retained.contains(&e.from) && retained.contains(&e.to))
        .cloned()
        .collect();

    tracing::info!(
        posts = seeds.len(),
        nodes = subgraph.node_count(),
        edges = subgraph.edge_count(),
        "Subgrafo extraído"
    );
    subgraph
}

/// Posts sem `timestamp` legível ficam fora de qualquer janela.
fn in_window(graph: &Graph, post: &NodeRef, window: &TimeWindow) -> bool {
    graph
        .get_node(post)
        .and_then(|node: &GraphNode| node.property_str("timestamp"))
        .and_then(parse_timestamp)
        .is_some_and(|ts| window.contains(ts))
}
