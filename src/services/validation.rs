//! Input checks shared by the create/update paths

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};

/// Trimmed text, or `None` when absent or blank.
pub(crate) fn present_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Inclusive range check. NaN is rejected.
pub(crate) fn check_range(name: &str, value: f64, min: f64, max: f64) -> ServiceResult<()> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "{} must be between {} and {} (got {})",
            name, min, max, value
        )))
    }
}

pub(crate) fn check_optional_range(name: &str, value: Option<f64>, min: f64, max: f64) -> ServiceResult<()> {
    match value {
        Some(v) => check_range(name, v, min, max),
        None => Ok(()),
    }
}

/// Sort newest first by the given timestamp.
pub(crate) fn sort_newest_first<T, F>(items: &mut [T], timestamp: F)
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.sort_by(|a, b| timestamp(b).cmp(&timestamp(a)));
}

/// Sort oldest first by the given timestamp.
pub(crate) fn sort_oldest_first<T, F>(items: &mut [T], timestamp: F)
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.sort_by(|a, b| timestamp(a).cmp(&timestamp(b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_present_text() {
        assert_eq!(present_text(Some("  A-1 ".into())), Some("A-1".to_string()));
        assert_eq!(present_text(Some("   ".into())), None);
        assert_eq!(present_text(None), None);
    }

    #[test]
    fn test_check_range() {
        assert!(check_range("phLevel", 0.0, 0.0, 14.0).is_ok());
        assert!(check_range("phLevel", 14.0, 0.0, 14.0).is_ok());
        let err = check_range("phLevel", 14.1, 0.0, 14.0).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.message().starts_with("phLevel must be between 0 and 14"));
        assert!(check_range("moisture", f64::NAN, 0.0, 100.0).is_err());
        assert!(check_optional_range("organicMatter", None, 0.0, 100.0).is_ok());
    }

    #[test]
    fn test_sorting() {
        let now = Utc::now();
        let mut stamps = vec![now - Duration::days(2), now, now - Duration::days(1)];
        sort_newest_first(&mut stamps, |t| *t);
        assert_eq!(stamps[0], now);
        sort_oldest_first(&mut stamps, |t| *t);
        assert_eq!(stamps[2], now);
        assert_eq!(stamps[0], now - Duration::days(2));
    }
}
