//! # Builder de Mercado
//!
//! Cada [`MarketRecord`] vira um nó `MarketData` com as métricas do ponto
//! de dado, ligado ao seu `State`, ao seu `Segment` e às entidades citadas.
//!
//! ```text
//! MarketData ──IN_STATE────► State (código em maiúsculas)
//!     │  └─────HAS_SEGMENT─► Segment (rótulo normalizado)
//!     └──MENTIONS_ENTITY───► Entity
//! ```
//!
//! Não há arestas entre `MarketData`s: séries temporais ficam a cargo de
//! quem consome o grafo.

use std::time::Instant;

use crate::core::canonical::{non_blank, normalize_text};
use crate::core::timestamp::{format_date, parse_optional};
use crate::core::{EdgeType, Graph, GraphEdge, GraphNode, NodeType};
use crate::records::MarketRecord;

use super::{entity_node, mention_edge, state_node};

pub fn build_market_graph(records: &[MarketRecord]) -> Graph {
    let span = tracing::info_span!("market_graph_build", records = records.len());
    let _guard = span.enter();
    let started = Instant::now();

    let mut graph = Graph::new();
    let mut skipped = 0usize;

    for (index, record) in records.iter().enumerate() {
        let Some(stat_id) = non_blank(Some(record.stat_id.as_str())) else {
            tracing::warn!(index, "Registro de mercado sem stat_id ignorado");
            skipped += 1;
            continue;
        };

        let state = state_node(record.state.as_deref()).map(|node| graph.add_node(node));
        let segment = non_blank(record.segment.as_deref()).map(|label| {
            graph.add_node(GraphNode::new(NodeType::Segment, normalize_text(label)).with_property("label", label))
        });
        let entities: Vec<_> = record
            .entities
            .iter()
            .filter_map(|mention| entity_node(mention).map(|node| (graph.add_node(node), mention)))
            .collect();

        let date = parse_optional(record.date.as_deref());
        if date.is_none() && non_blank(record.date.as_deref()).is_some() {
            tracing::debug!(stat_id, "Data de mercado ilegível descartada");
        }

        let data = graph.add_node(
            GraphNode::new(NodeType::MarketData, stat_id)
                .with_optional("title", non_blank(record.title.as_deref()))
                .with_optional("date", date.as_ref().map(format_date))
                .with_optional("volume", record.volume)
                .with_optional("revenue", record.revenue)
                .with_optional("jackpot", record.jackpot)
                .with_optional("unit_price", record.unit_price)
                .with_optional("source", non_blank(record.source.as_deref()))
                .with_optional("state", state.as_ref().map(|s| s.id.clone()))
                .with_optional("segment", segment.as_ref().map(|s| s.id.clone())),
        );

        if let Some(state) = state {
            graph.add_edge(GraphEdge::new(EdgeType::InState, data.clone(), state).with_weight(1.0));
        }
        if let Some(segment) = segment {
            graph.add_edge(GraphEdge::new(EdgeType::HasSegment, data.clone(), segment).with_weight(1.0));
        }
        for (entity, mention) in entities {
            graph.add_edge(mention_edge(data.clone(), entity, mention));
        }
    }

    tracing::info!(
        records = records.len() - skipped,
        skipped,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Grafo de mercado construído"
    );
    graph
}
