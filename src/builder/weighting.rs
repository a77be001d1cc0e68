//! # Motor de Pesos — TF-IDF e Decaimento Temporal
//!
//! Pesos das arestas `MENTIONS_KEYWORD` do grafo social. São duas políticas
//! independentes que se **multiplicam**:
//!
//! ```text
//! peso = tf_idf(keyword, post) × decay(post)
//! ```
//!
//! ## TF-IDF
//!
//! Depende de estatísticas do corpus inteiro, por isso o builder social
//! precisa de duas passadas: a primeira alimenta [`KeywordStats`], a segunda
//! calcula os pesos.
//!
//! - `df` = número de posts distintos que contêm a keyword
//! - `tf` = ocorrências no post / tamanho da lista deduplicada
//! - `idf` = `1 + ln(N / max(df, 1))`, **fixado em exatamente 1.0** quando `df = N`
//!
//! ## Decaimento Temporal
//!
//! `decay = exp(-Δdias / τ)`, com `Δdias = referência − data do post`.
//! Posts sem data utilizável não decaem. Posts com data futura também não
//! (Δ é limitado a zero), para que o decaimento nunca amplifique um peso.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Estatísticas de documento por keyword, acumuladas na primeira passada.
#[derive(Clone, Debug, Default)]
pub struct KeywordStats {
    total_posts: usize,
    document_frequency: HashMap<String, usize>,
}

impl KeywordStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra um post e as keywords (IDs) que ele contém.
    ///
    /// IDs repetidos no mesmo post contam uma vez só para o `df`.
    pub fn observe_post<'a, I>(&mut self, keyword_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.total_posts += 1;
        let distinct: HashSet<&str> = keyword_ids.into_iter().collect();
        for id in distinct {
            *self.document_frequency.entry(id.to_string()).or_insert(0) += 1;
        }
    }

    pub fn total_posts(&self) -> usize {
        self.total_posts
    }

    pub fn document_frequency(&self, keyword_id: &str) -> usize {
        self.document_frequency.get(keyword_id).copied().unwrap_or(0)
    }

    /// Multiplicador IDF.
    ///
    /// Quando a keyword aparece em todos os posts, retorna exatamente `1.0`
    /// em vez de passar pela fórmula com logaritmo.
    pub fn idf(&self, keyword_id: &str) -> f64 {
        let df = self.document_frequency(keyword_id).max(1);
        if self.total_posts == 0 || df >= self.total_posts {
            return 1.0;
        }
        1.0 + (self.total_posts as f64 / df as f64).ln()
    }

    pub fn tf_idf(&self, keyword_id: &str, occurrences: usize, distinct_keywords: usize) -> f64 {
        term_frequency(occurrences, distinct_keywords) * self.idf(keyword_id)
    }
}

/// Frequência do termo no post. Lista vazia → `0.0`.
pub fn term_frequency(occurrences: usize, distinct_keywords: usize) -> f64 {
    if distinct_keywords == 0 {
        return 0.0;
    }
    occurrences as f64 / distinct_keywords as f64
}

/// Política de decaimento exponencial com referência fixa.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeDecay {
    tau_days: f64,
    reference: DateTime<Utc>,
}

impl TimeDecay {
    /// Cria a política; `None` quando τ está ausente, não é finito ou não é positivo.
    ///
    /// Sem referência explícita, usa o relógio do momento da construção.
    pub fn new(tau_days: Option<f64>, reference: Option<DateTime<Utc>>) -> Option<Self> {
        let tau_days = tau_days.filter(|t| t.is_finite() && *t > 0.0)?;
        Some(Self {
            tau_days,
            reference: reference.unwrap_or_else(Utc::now),
        })
    }

    pub fn tau_days(&self) -> f64 {
        self.tau_days
    }

    pub fn reference(&self) -> DateTime<Utc> {
        self.reference
    }

    /// Fator multiplicativo em `(0, 1]`. Sem data → `1.0`.
    pub fn factor(&self, post_time: Option<DateTime<Utc>>) -> f64 {
        let Some(post_time) = post_time else {
            return 1.0;
        };
        let delta_days =
            (self.reference - post_time).num_milliseconds() as f64 / MILLIS_PER_DAY;
        (-delta_days.max(0.0) / self.tau_days).exp()
    }

    pub fn apply(&self, weight: f64, post_time: Option<DateTime<Utc>>) -> f64 {
        weight * self.factor(post_time)
    }
}

/// Aplica o decaimento a um peso; sem τ válido, devolve o peso intacto.
pub fn decay(
    weight: f64,
    post_time: Option<DateTime<Utc>>,
    reference: Option<DateTime<Utc>>,
    tau_days: Option<f64>,
) -> f64 {
    match TimeDecay::new(tau_days, reference) {
        Some(policy) => policy.apply(weight, post_time),
        None => weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn idf_is_pinned_when_keyword_is_everywhere() {
        let mut stats = KeywordStats::new();
        stats.observe_post(["lottery", "jackpot"]);
        stats.observe_post(["lottery"]);
        assert_eq!(stats.total_posts(), 2);
        assert_eq!(stats.document_frequency("lottery"), 2);
        assert_eq!(stats.idf("lottery"), 1.0);
        assert!((stats.idf("jackpot") - (1.0 + 2f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn repeated_ids_count_once_per_post() {
        let mut stats = KeywordStats::new();
        stats.observe_post(["a", "a", "a"]);
        stats.observe_post(["b"]);
        assert_eq!(stats.document_frequency("a"), 1);
    }

    #[test]
    fn unseen_keyword_uses_df_of_one() {
        let mut stats = KeywordStats::new();
        for _ in 0..4 {
            stats.observe_post(["x"]);
        }
        assert!((stats.idf("never-seen") - (1.0 + 4f64.ln())).abs() < 1e-12);
        assert_eq!(KeywordStats::new().idf("anything"), 1.0);
    }

    #[test]
    fn tf_idf_combines_both_factors() {
        let mut stats = KeywordStats::new();
        stats.observe_post(["lottery", "jackpot"]);
        stats.observe_post(["lottery"]);
        assert_eq!(stats.tf_idf("lottery", 1, 2), 0.5);
        assert_eq!(stats.tf_idf("lottery", 1, 1), 1.0);
        assert!((stats.tf_idf("jackpot", 1, 2) - 0.5 * (1.0 + 2f64.ln())).abs() < 1e-12);
        assert_eq!(term_frequency(3, 0), 0.0);
    }

    #[test]
    fn decay_is_identity_at_reference_time() {
        let now = reference();
        assert_eq!(decay(0.75, Some(now), Some(now), Some(7.0)), 0.75);
    }

    #[test]
    fn decay_is_noop_without_tau() {
        let old = reference() - Duration::days(365);
        assert_eq!(decay(0.75, Some(old), Some(reference()), None), 0.75);
        assert_eq!(decay(0.75, Some(old), Some(reference()), Some(0.0)), 0.75);
        assert_eq!(decay(0.75, Some(old), Some(reference()), Some(-1.0)), 0.75);
    }

    #[test]
    fn decay_follows_exponential_curve() {
        let policy = TimeDecay::new(Some(7.0), Some(reference())).unwrap();
        let week_old = reference() - Duration::days(7);
        assert!((policy.factor(Some(week_old)) - (-1f64).exp()).abs() < 1e-12);
        assert!((policy.apply(2.0, Some(week_old)) - 2.0 * (-1f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn missing_or_future_timestamps_do_not_decay() {
        let policy = TimeDecay::new(Some(7.0), Some(reference())).unwrap();
        assert_eq!(policy.factor(None), 1.0);
        assert_eq!(policy.factor(Some(reference() + Duration::days(3))), 1.0);
    }

    #[test]
    fn reference_defaults_to_now() {
        let before = Utc::now();
        let policy = TimeDecay::new(Some(1.0), None).unwrap();
        assert!(policy.reference() >= before);
        assert_eq!(policy.tau_days(), 1.0);
    }
}
