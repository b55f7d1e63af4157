use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use service_core::error::AppError;
use thiserror::Error;

const DEFAULT_LIMIT: &str = "10";
const DEFAULT_OFFSET: &str = "0";

/// Raw `limit`/`offset` query parameters.
///
/// Kept as strings so that malformed values reach our own validation instead of
/// being rejected by the extractor with its own error shape. When a key repeats,
/// the first value wins.
#[derive(Debug, Default)]
pub struct PageParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Validated paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PagingError {
    #[error("failed to parse limit query")]
    InvalidLimit,
    #[error("failed to parse offset query")]
    InvalidOffset,
    #[error("limit must not be negative")]
    NegativeLimit,
    #[error("offset must not be negative")]
    NegativeOffset,
}

impl From<PagingError> for AppError {
    fn from(err: PagingError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self::from_pairs(pairs))
    }
}

impl PageParams {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "limit" => &mut params.limit,
                "offset" => &mut params.offset,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Empty values count as absent and take the default.
    pub fn parse(&self) -> Result<Page, PagingError> {
        let limit = self
            .limit
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_LIMIT)
            .parse::<i64>()
            .map_err(|_| PagingError::InvalidLimit)?;
        let offset = self
            .offset
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_OFFSET)
            .parse::<i64>()
            .map_err(|_| PagingError::InvalidOffset)?;

        if limit < 0 {
            return Err(PagingError::NegativeLimit);
        }
        if offset < 0 {
            return Err(PagingError::NegativeOffset);
        }

        Ok(Page { limit, offset })
    }
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }

    /// Offset as the unsigned skip count MongoDB expects.
    pub fn skip(&self) -> u64 {
        self.offset.max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<&str>, offset: Option<&str>) -> PageParams {
        PageParams {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    #[test]
    fn defaults_apply_when_absent() {
        assert_eq!(params(None, None).parse(), Ok(Page::new(10, 0)));
    }

    #[test]
    fn explicit_values_are_used() {
        assert_eq!(params(Some("25"), Some("100")).parse(), Ok(Page::new(25, 100)));
        assert_eq!(params(Some("0"), None).parse(), Ok(Page::new(0, 0)));
    }

    #[test]
    fn limit_is_checked_before_offset() {
        assert_eq!(
            params(Some("ten"), Some("zero")).parse(),
            Err(PagingError::InvalidLimit)
        );
        assert_eq!(params(Some("5"), Some("zero")).parse(), Err(PagingError::InvalidOffset));
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        assert_eq!(params(Some(""), Some("")).parse(), Ok(Page::new(10, 0)));
        assert_eq!(params(Some("4"), Some("")).parse(), Ok(Page::new(4, 0)));
    }

    #[test]
    fn fractional_and_padded_values_are_rejected() {
        assert_eq!(params(Some("1.5"), None).parse(), Err(PagingError::InvalidLimit));
        assert_eq!(params(None, Some(" 3")).parse(), Err(PagingError::InvalidOffset));
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_value_wins_for_repeated_keys() {
        let params = PageParams::from_pairs(pairs(&[
            ("limit", "1"),
            ("offset", "4"),
            ("limit", "2"),
            ("offset", "x"),
        ]));
        assert_eq!(params.parse(), Ok(Page::new(1, 4)));
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let params = PageParams::from_pairs(pairs(&[("sort", "asc"), ("limit", "3")]));
        assert_eq!(params.limit.as_deref(), Some("3"));
        assert_eq!(params.offset, None);
    }

    #[test]
    fn negative_values_are_rejected() {
        assert_eq!(params(Some("-1"), None).parse(), Err(PagingError::NegativeLimit));
        assert_eq!(params(None, Some("-5")).parse(), Err(PagingError::NegativeOffset));
    }

    #[test]
    fn paging_errors_become_bad_requests() {
        let err: AppError = PagingError::InvalidOffset.into();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "failed to parse offset query"));
    }
}
