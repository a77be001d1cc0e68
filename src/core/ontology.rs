//! # Ontologia de Relações — Canonicalização de Predicados
//!
//! Relações extraídas de documentos chegam com predicados em formas livres:
//! `"regulate"`, `"Regulated"`, `"oversees"`, `"is-regulated-by"`...
//! Este módulo reduz essas variações a um **verbo canônico** e a uma
//! **classe de relação**, usando uma tabela fixa de aliases.
//!
//! ## Fluxo
//!
//! ```text
//! "Regulated  by"  ──sanitize──▶  "regulated_by"  ──alias──▶  "regulated_by" (passa direto)
//! "Regulate"       ──sanitize──▶  "regulate"      ──alias──▶  "regulates" / governance
//! ""               ──────────────────────────────────────▶  "unknown"    / other
//! ```
//!
//! ## Classes
//!
//! | Classe | Exemplos |
//! |--------|----------|
//! | `governance` | regulates, licenses, prohibits, enacts |
//! | `legal` | sues, fines, investigates |
//! | `economic` | funds, taxes, owns, partners_with |
//! | `organizational` | part_of, located_in, affiliated_with |
//! | `causal` | causes, affects, increases, decreases |
//! | `stance` | supports, opposes |
//! | `other` | qualquer predicado fora da tabela |
//!
//! Ampliar o vocabulário é só adicionar aliases em [`RELATION_TABLE`].

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Predicado canônico para entrada vazia.
pub const UNKNOWN_PREDICATE: &str = "unknown";

/// Classe padrão para predicados fora da tabela.
pub const OTHER_CLASS: &str = "other";

/// Uma entrada da tabela: verbo canônico, classe e aliases.
pub struct RelationEntry {
    pub canonical: &'static str,
    pub class: &'static str,
    pub aliases: &'static [&'static str],
}

/// Tabela fixa de predicados conhecidos.
pub const RELATION_TABLE: &[RelationEntry] = &[
    // governance
    RelationEntry {
        canonical: "regulates",
        class: "governance",
        aliases: &["regulate", "regulated", "regulating", "regulation_of", "oversees", "oversee", "governs", "govern", "supervises", "supervise"],
    },
    RelationEntry {
        canonical: "licenses",
        class: "governance",
        aliases: &["license", "licensed", "licensing", "authorizes", "authorize", "authorized", "permits", "permit", "approves", "approve", "approved"],
    },
    RelationEntry {
        canonical: "prohibits",
        class: "governance",
        aliases: &["prohibit", "prohibited", "bans", "ban", "banned", "forbids", "forbid", "outlaws", "outlaw", "restricts", "restrict"],
    },
    RelationEntry {
        canonical: "enacts",
        class: "governance",
        aliases: &["enact", "enacted", "passes", "pass", "passed", "adopts", "adopt", "adopted", "signs", "sign", "signed"],
    },
    RelationEntry {
        canonical: "amends",
        class: "governance",
        aliases: &["amend", "amended", "modifies", "modify", "revises", "revise"],
    },
    RelationEntry {
        canonical: "repeals",
        class: "governance",
        aliases: &["repeal", "repealed", "rescinds", "rescind", "revokes", "revoke"],
    },
    RelationEntry {
        canonical: "enforces",
        class: "governance",
        aliases: &["enforce", "enforced", "implements", "implement"],
    },
    // legal
    RelationEntry {
        canonical: "sues",
        class: "legal",
        aliases: &["sue", "sued", "litigates", "litigate", "files_suit_against"],
    },
    RelationEntry {
        canonical: "fines",
        class: "legal",
        aliases: &["fine", "fined", "penalizes", "penalize", "sanctions", "sanction"],
    },
    RelationEntry {
        canonical: "investigates",
        class: "legal",
        aliases: &["investigate", "investigated", "audits", "audit", "probes"],
    },
    // economic
    RelationEntry {
        canonical: "funds",
        class: "economic",
        aliases: &["fund", "funded", "finances", "finance", "allocates", "allocate", "invests_in"],
    },
    RelationEntry {
        canonical: "taxes",
        class: "economic",
        aliases: &["tax", "taxed", "levies", "levy"],
    },
    RelationEntry {
        canonical: "owns",
        class: "economic",
        aliases: &["own", "owned", "acquires", "acquire", "acquired", "operates", "operate"],
    },
    RelationEntry {
        canonical: "partners_with",
        class: "economic",
        aliases: &["partner", "partners", "partnered_with", "collaborates_with", "contracts_with"],
    },
    RelationEntry {
        canonical: "sponsors",
        class: "economic",
        aliases: &["sponsor", "sponsored"],
    },
    // organizational
    RelationEntry {
        canonical: "part_of",
        class: "organizational",
        aliases: &["belongs_to", "member_of", "subsidiary_of", "division_of"],
    },
    RelationEntry {
        canonical: "located_in",
        class: "organizational",
        aliases: &["based_in", "headquartered_in", "located"],
    },
    RelationEntry {
        canonical: "affiliated_with",
        class: "organizational",
        aliases: &["affiliated", "associated_with", "related_to", "linked_to"],
    },
    // causal
    RelationEntry {
        canonical: "causes",
        class: "causal",
        aliases: &["cause", "caused", "leads_to", "results_in"],
    },
    RelationEntry {
        canonical: "affects",
        class: "causal",
        aliases: &["affect", "affected", "impacts", "impact", "influences", "influence"],
    },
    RelationEntry {
        canonical: "increases",
        class: "causal",
        aliases: &["increase", "increased", "raises", "raise", "expands", "expand"],
    },
    RelationEntry {
        canonical: "decreases",
        class: "causal",
        aliases: &["decrease", "decreased", "reduces", "reduce", "lowers", "lower", "limits", "limit"],
    },
    // stance
    RelationEntry {
        canonical: "supports",
        class: "stance",
        aliases: &["support", "supported", "endorses", "endorse", "backs", "back", "favors"],
    },
    RelationEntry {
        canonical: "opposes",
        class: "stance",
        aliases: &["oppose", "opposed", "challenges", "challenge", "criticizes", "criticize", "rejects"],
    },
];

/// Anotação anexada a toda aresta de relação.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationAnnotation {
    /// Predicado como veio na entrada (com trim).
    pub predicate_raw: String,
    /// Verbo canônico.
    pub predicate_norm: String,
    /// Classe da relação (ou `"other"`).
    pub relation_class: String,
}

/// Índice alias → (canônico, classe), construído uma única vez.
fn alias_index() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    static INDEX: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut index = HashMap::new();
        for entry in RELATION_TABLE {
            index.insert(entry.canonical, (entry.canonical, entry.class));
            for alias in entry.aliases {
                index.insert(*alias, (entry.canonical, entry.class));
            }
        }
        index
    })
}

/// Sanitiza um predicado: lowercase, hífens/espaços viram `_`, sem `_` repetidos.
fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().to_lowercase().chars() {
        let c = if c == '-' || c.is_whitespace() { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

/// Forma canônica de um predicado.
///
/// Tokens desconhecidos passam sanitizados; entrada vazia vira `"unknown"`.
///
/// ```rust
/// use semantic_graph::core::ontology::canonical_predicate;
///
/// assert_eq!(canonical_predicate(Some("Regulate")), "regulates");
/// assert_eq!(canonical_predicate(Some("spun-off  from")), "spun_off_from");
/// assert_eq!(canonical_predicate(None), "unknown");
/// ```
pub fn canonical_predicate(raw: Option<&str>) -> String {
    let token = sanitize(raw.unwrap_or_default());
    if token.is_empty() {
        return UNKNOWN_PREDICATE.to_string();
    }
    match alias_index().get(token.as_str()) {
        Some((canonical, _)) => canonical.to_string(),
        None => token,
    }
}

/// Classe de um predicado, ou `"other"` se não estiver na tabela.
pub fn predicate_class(raw: Option<&str>) -> String {
    let canonical = canonical_predicate(raw);
    alias_index()
        .get(canonical.as_str())
        .map(|(_, class)| class.to_string())
        .unwrap_or_else(|| OTHER_CLASS.to_string())
}

pub fn relation_annotation(raw: Option<&str>) -> RelationAnnotation {
    RelationAnnotation {
        predicate_raw: raw.map(str::trim).unwrap_or_default().to_string(),
        predicate_norm: canonical_predicate(raw),
        relation_class: predicate_class(raw),
    }
}
