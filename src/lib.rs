//! # Semantic Graph — Grafos de Conhecimento a partir de Registros Enriquecidos
//!
//! Converte três famílias de registros já enriquecidos (posts de redes
//! sociais, pontos de dado de mercado e documentos de política) em grafos de
//! propriedades tipados, prontos para carga num banco de grafos.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ SocialPost[] │   │MarketRecord[]│   │PolicyRecord[]│
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        ▼                  ▼                  ▼
//!  builder::social    builder::market    builder::policy
//!  (TF-IDF + decay)         │            (ontologia de relações)
//!        └──────────┬───────┴──────────────────┘
//!                   ▼
//!                 Graph  ──► subgraph (recorte por tópico)
//!                   │
//!                   ▼
//!                export  ──► {graph_schema_version, nodes, edges} + validação
//! ```
//!
//! Todas as identidades vêm de [`core::canonical`](crate::core::canonical): a mesma keyword, entidade
//! ou key point gera o mesmo ID em qualquer builder e em qualquer execução.
//!
//! ## Módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`core`](crate::core) | Normalização, IDs, ontologia, datas e o modelo de grafo |
//! | [`records`] | Registros de entrada e adapters de payloads brutos |
//! | [`config`] | Parâmetros de construção |
//! | [`builder`] | Os três builders e os pesos do grafo social |
//! | [`nlu`] | Extração heurística de keywords |
//! | [`subgraph`] | Subgrafo por tópico com janela de tempo |
//! | [`export`] | Forma de trânsito JSON e validação estrutural |
//!
//! ## Logging
//!
//! O crate só emite eventos `tracing`; instalar um subscriber é papel de
//! quem o usa.

pub mod builder;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod nlu;
pub mod records;
pub mod subgraph;

pub use builder::{build_all, build_market_graph, build_policy_graph, build_social_graph, GraphInputs, GraphSet};
pub use config::BuildConfig;
pub use error::{GraphError, Result};
pub use export::{export_graph, export_json_string, validate_graph, GraphExport, ValidationReport};
pub use subgraph::{build_topic_subgraph, TimeWindow};

#[cfg(test)]
pub(crate) mod test_support {
    use tracing_subscriber::EnvFilter;

    /// Liga os logs nos testes (`RUST_LOG=debug cargo test`). Chamadas repetidas são ignoradas.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with_test_writer()
            .try_init();
    }
}
