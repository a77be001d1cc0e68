//! # Timestamps — Parsing Tolerante de Datas
//!
//! Os registros de entrada carregam datas como texto, em formatos variados.
//! Um timestamp que não pode ser interpretado é tratado como **ausente**,
//! nunca como erro.
//!
//! Formatos aceitos (nesta ordem):
//!
//! | Formato | Exemplo |
//! |---------|---------|
//! | RFC 3339 | `2024-03-01T12:00:00Z`, `2024-03-01T09:00:00-03:00` |
//! | Data/hora sem fuso (UTC) | `2024-03-01 12:00:00`, `2024-03-01T12:00:00` |
//! | Data (meia-noite UTC) | `2024-03-01` |
//! | Epoch em segundos | `1709294400`, `1709294400.0` |

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Interpreta um timestamp textual. Retorna `None` se vazio ou não reconhecido.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    // Epoch (Reddit usa float em `created_utc`)
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() => DateTime::from_timestamp(secs.trunc() as i64, 0),
        _ => None,
    }
}

/// Variante para campos opcionais.
pub fn parse_optional(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(parse_timestamp)
}

/// Serializa em RFC 3339 com sufixo `Z`: forma textual ordenável.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serializa apenas a data (`YYYY-MM-DD`).
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_timestamp("2024-03-01T09:00:00-03:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_and_date_only() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01 12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:00:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parses_epoch_seconds() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_timestamp("1709294400"), Some(expected));
        assert_eq!(parse_timestamp("1709294400.75"), Some(expected));
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("ontem à tarde"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
        assert_eq!(parse_timestamp("NaN"), None);
        assert_eq!(parse_optional(None), None);
    }

    #[test]
    fn formats_are_sortable() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&dt), "2024-03-01T12:00:00Z");
        assert_eq!(format_date(&dt), "2024-03-01");
        assert_eq!(parse_timestamp(&format_timestamp(&dt)), Some(dt));
    }
}
