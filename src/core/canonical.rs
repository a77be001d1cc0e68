//! # Canonicalizador — Normalização de Texto e IDs Determinísticos
//!
//! Toda identidade de nó derivada de conteúdo passa por este módulo.
//! A regra é simples: **mesmo conteúdo → mesmo ID**, em qualquer execução,
//! em qualquer máquina. Isso permite reconstruir um grafo a partir dos mesmos
//! registros e obter exatamente as mesmas chaves.
//!
//! ## Pipeline de Normalização
//!
//! ```text
//! texto bruto
//!   ├── 1. NFC (Unicode): "a" + U+0303 vira "ã"
//!   ├── 2. Remove marcas invisíveis (zero-width, BOM, soft hyphen...)
//!   ├── 3. Lowercase
//!   └── 4. Colapsa espaços e faz trim
//! ```
//!
//! ## IDs Derivados
//!
//! | Função | Entrada do hash |
//! |--------|-----------------|
//! | [`keyword_id`] | `normalize(texto) + "|" + lowercase(idioma)` |
//! | [`entity_id`] | `"kb:" + kb_id` (sem hash) ou `normalize(nome) + "|" + lowercase(tipo)` |
//! | [`keypoint_id`] | `"policy_keypoint:" + normalize(texto)` |
//!
//! O hash é SHA-256 em hexadecimal. O uso é de **identidade**, não de segurança.

use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

use crate::records::EntityMention;

/// Tipo usado para entidades sem tipo declarado.
pub const UNKNOWN_ENTITY_TYPE: &str = "unknown";

/// Prefixo dos IDs vindos de uma base de conhecimento externa.
pub const KB_ID_PREFIX: &str = "kb:";

/// Namespace dos key points de políticas: evita colisão com keywords de mesmo texto.
const KEYPOINT_NAMESPACE: &str = "policy_keypoint:";

/// Verifica se um caractere é uma marca invisível que não deve afetar a identidade.
///
/// Cobre espaços de largura zero, marcas de direção bidirecional,
/// o BOM (U+FEFF) e o soft hyphen (U+00AD).
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{034F}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{2069}'
            | '\u{FEFF}'
    )
}

/// Normaliza texto para comparação e derivação de IDs.
///
/// Nunca falha: texto vazio ou só com espaços/marcas invisíveis vira `""`.
///
/// # Exemplo
///
/// ```rust
/// use semantic_graph::core::canonical::normalize_text;
///
/// assert_eq!(normalize_text("  Mega\u{200B}   SENA \n"), "mega sena");
/// ```
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().filter(|c| !is_invisible(*c)).collect();
    composed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Variante de [`normalize_text`] para campos opcionais: `None` vira `""`.
pub fn normalize_optional(text: Option<&str>) -> String {
    text.map(normalize_text).unwrap_or_default()
}

/// SHA-256 hexadecimal de uma string.
pub fn content_hash(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// ID canônico de uma keyword.
///
/// Idiomas diferentes geram identidades diferentes, mesmo com texto igual.
pub fn keyword_id(text: &str, lang: &str) -> String {
    let lang = lang.trim().to_lowercase();
    content_hash(&format!("{}|{}", normalize_text(text), lang))
}

/// ID canônico de uma entidade.
///
/// Se houver `kb_id`, ele é autoritativo e dispensa o hash. Caso contrário,
/// usa o nome canônico (ou o texto da menção) combinado com o tipo.
pub fn entity_id(entity: &EntityMention) -> String {
    if let Some(kb_id) = non_blank(entity.kb_id.as_deref()) {
        return format!("{}{}", KB_ID_PREFIX, kb_id);
    }
    let name = non_blank(entity.canonical_name.as_deref()).unwrap_or(&entity.text);
    content_hash(&format!(
        "{}|{}",
        normalize_text(name),
        entity_type_label(entity.entity_type.as_deref())
    ))
}

/// ID canônico de um key point de política.
pub fn keypoint_id(text: &str) -> String {
    content_hash(&format!("{}{}", KEYPOINT_NAMESPACE, normalize_text(text)))
}

/// Tipo de entidade em lowercase, ou `"unknown"` quando ausente/vazio.
pub fn entity_type_label(entity_type: Option<&str>) -> String {
    non_blank(entity_type)
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| UNKNOWN_ENTITY_TYPE.to_string())
}

/// Retorna o texto com trim se não for vazio.
pub(crate) fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Corta o texto em no máximo `max_chars` caracteres (não bytes).
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(text: &str) -> EntityMention {
        EntityMention {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn normalize_collapses_and_folds() {
        assert_eq!(normalize_text("  Hello   WORLD\t\n"), "hello world");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn normalize_strips_invisible_marks() {
        assert_eq!(normalize_text("jack\u{200B}pot"), "jackpot");
        assert_eq!(normalize_text("\u{FEFF}Lottery\u{00AD}"), "lottery");
    }

    #[test]
    fn normalize_composes_unicode() {
        // "a" + til combinante vira "ã" precomposto
        assert_eq!(normalize_text("Sa\u{0303}o"), "são");
        assert_eq!(normalize_text("Sa\u{0303}o"), normalize_text("São"));
    }

    #[test]
    fn normalize_optional_handles_none() {
        assert_eq!(normalize_optional(None), "");
        assert_eq!(normalize_optional(Some(" X ")), "x");
    }

    #[test]
    fn keyword_id_is_stable_under_normalization() {
        assert_eq!(keyword_id(" Lottery ", "en"), keyword_id("lottery", "EN"));
        assert_eq!(keyword_id("jackpot", "en"), keyword_id("jackpot", "en"));
        assert_eq!(keyword_id("jackpot", "en").len(), 64);
    }

    #[test]
    fn keyword_id_distinguishes_languages() {
        assert_ne!(keyword_id("lottery", "en"), keyword_id("lottery", "es"));
    }

    #[test]
    fn entity_id_prefers_kb_id() {
        let entity = EntityMention {
            text: "Y".into(),
            entity_type: Some("org".into()),
            kb_id: Some("X".into()),
            ..Default::default()
        };
        assert_eq!(entity_id(&entity), "kb:X");
    }

    #[test]
    fn entity_id_ignores_blank_kb_id() {
        let mut entity = mention("Acme");
        entity.kb_id = Some("   ".into());
        assert_eq!(entity_id(&entity), entity_id(&mention("acme")));
    }

    #[test]
    fn entity_id_uses_canonical_name_and_type() {
        let mut a = mention("ACME corp.");
        a.canonical_name = Some("Acme Corp".into());
        a.entity_type = Some("ORG".into());

        let mut b = mention("acme corp");
        b.entity_type = Some("org".into());
        assert_eq!(entity_id(&a), entity_id(&b));

        // tipo diferente → identidade diferente
        let mut c = mention("acme corp");
        c.entity_type = Some("person".into());
        assert_ne!(entity_id(&b), entity_id(&c));

        // sem tipo → "unknown"
        let mut d = mention("acme corp");
        d.entity_type = Some("unknown".into());
        assert_eq!(entity_id(&mention("Acme Corp")), entity_id(&d));
    }

    #[test]
    fn keypoint_id_is_namespaced() {
        assert_eq!(keypoint_id("Ban on ads"), keypoint_id("ban  on ADS"));
        assert_ne!(keypoint_id("lottery"), keyword_id("lottery", ""));
        assert_ne!(keypoint_id("lottery"), content_hash("lottery"));
    }

    #[test]
    fn excerpt_counts_chars_not_bytes() {
        assert_eq!(excerpt("ããããã", 3), "ããã");
        assert_eq!(excerpt("  abc  ", 10), "abc");
    }
}
