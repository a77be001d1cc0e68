//! # Extrator de Keywords — Heurísticas para Posts sem Keywords
//!
//! Alguns posts chegam sem lista de keywords (o adapter upstream não as
//! extraiu). Quando `extract_missing_keywords` está ligado, o builder social
//! usa o [`KeywordExtractor`] para gerar candidatas a partir do texto.
//!
//! Não há modelo de linguagem aqui: só regex e listas de palavras.
//!
//! ## Estratégia (em ordem de prioridade)
//!
//! | Prioridade | Estratégia | Exemplo |
//! |-----------|------------|---------|
//! | 1 | Texto entre aspas | `"second chance drawing"` |
//! | 2 | Sequências capitalizadas | `Mega Millions`, `Powerball` |
//! | 3 | Bigrams de content words | `jackpot winner` |
//! | 4 | Palavras individuais ≥ 4 chars | `tickets`, `odds` |
//!
//! A deduplicação é feita pela forma normalizada
//! ([`normalize_text`](crate::core::canonical::normalize_text)), então
//! `"Jackpot"` e `"jackpot"` contam como a mesma keyword.

use std::collections::HashSet;

use regex::Regex;

use crate::core::canonical::normalize_text;

/// Stopwords em inglês: palavras funcionais que não viram keywords.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "else", "of", "to", "in", "on", "at",
    "by", "for", "with", "from", "into", "onto", "over", "under", "about", "after", "before",
    "is", "are", "was", "were", "be", "been", "being", "am", "do", "does", "did", "have", "has",
    "had", "it", "its", "this", "that", "these", "those", "there", "here", "i", "me", "my", "we",
    "our", "you", "your", "he", "she", "him", "her", "his", "they", "them", "their", "what",
    "which", "who", "whom", "when", "where", "why", "how", "all", "any", "some", "each", "every",
    "no", "not", "nor", "only", "just", "so", "than", "too", "very", "can", "could", "will",
    "would", "should", "shall", "may", "might", "must", "also", "still", "even", "more", "most",
    "much", "many", "such", "other", "same", "own", "again", "ever", "never", "always", "now",
    "today", "really", "like", "get", "got", "going", "gonna", "know", "think", "said", "says",
    "thing", "things", "lol", "yeah", "okay", "anyone", "someone", "everyone", "because", "while",
    "what's", "it's", "i'm", "don't", "doesn't", "can't", "won't", "isn't", "aren't",
];

/// Sufixos de formas verbais comuns (gerúndio e particípio).
const VERB_SUFFIXES: &[&str] = &["ing", "ed"];

/// Extrator de keywords baseado em heurísticas.
///
/// As regexes são compiladas uma vez em [`KeywordExtractor::new`].
pub struct KeywordExtractor {
    /// Texto entre aspas retas ou curvas.
    quoted_re: Regex,
    /// Sequências de palavras capitalizadas (possíveis nomes próprios).
    capitalized_re: Regex,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self {
            quoted_re: Regex::new(r#"["“”]([^"“”]{2,60})["“”]"#).expect("regex de aspas válida"),
            capitalized_re: Regex::new(r"\b[A-Z][a-zA-Z0-9]{2,}(?:\s+[A-Z][a-zA-Z0-9]{2,})*\b")
                .expect("regex de capitalizadas válida"),
        }
    }

    /// Extrai até `limit` keywords do texto, sem duplicatas, na ordem de prioridade.
    pub fn extract(&self, text: &str, limit: usize) -> Vec<String> {
        let mut keywords = Vec::new();
        let mut seen = HashSet::new();

        let mut push = |candidate: &str, keywords: &mut Vec<String>| {
            let normalized = normalize_text(candidate);
            if keywords.len() < limit && !normalized.is_empty() && seen.insert(normalized.clone()) {
                keywords.push(normalized);
            }
        };

        // ─── 1. Texto entre aspas ────────────────────────────────
        for cap in self.quoted_re.captures_iter(text) {
            if let Some(m) = cap.get(1) {
                push(m.as_str(), &mut keywords);
            }
        }

        // ─── 2. Sequências capitalizadas ─────────────────────────
        // "The Mega Millions" → "Mega Millions": stopwords iniciais caem
        for m in self.capitalized_re.find_iter(text) {
            let parts: Vec<&str> = m
                .as_str()
                .split_whitespace()
                .skip_while(|w| is_stopword(&w.to_lowercase()))
                .collect();
            if !parts.is_empty() {
                push(&parts.join(" "), &mut keywords);
            }
        }

        // ─── 3. Bigrams de content words ─────────────────────────
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();
        for window in words.windows(2) {
            if window.iter().all(|w| is_content_word(w, 5)) {
                push(&window.join(" "), &mut keywords);
            }
        }

        // ─── 4. Palavras individuais ─────────────────────────────
        for word in &words {
            if is_content_word(word, 4) {
                push(word, &mut keywords);
            }
        }

        keywords
    }
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

fn looks_like_verb(word: &str) -> bool {
    VERB_SUFFIXES.iter().any(|s| word.len() > s.len() + 3 && word.ends_with(s))
}

/// Palavra com conteúdo: não é stopword, não parece verbo, tem tamanho mínimo
/// e não é só número.
fn is_content_word(word: &str, min_chars: usize) -> bool {
    word.chars().count() >= min_chars
        && !is_stopword(word)
        && !looks_like_verb(word)
        && !word.chars().all(|c| c.is_ascii_digit())
}
