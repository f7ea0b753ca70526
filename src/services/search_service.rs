// src/services/search_service.rs

use crate::{
    common::{db_utils::like_pattern, error::AppError},
    db::SearchRepository,
    models::search::{SearchQuery, SearchResults, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT, MIN_QUERY_LEN},
};

/// Termo já aparado e limite normalizado.
pub fn normalize(query: &SearchQuery) -> Result<(String, i64), AppError> {
    let term = query.q.trim();
    if term.chars().count() < MIN_QUERY_LEN {
        return Err(AppError::bad_request(format!(
            "The search term must have at least {} characters.",
            MIN_QUERY_LEN
        )));
    }
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT);
    Ok((like_pattern(term), limit))
}

#[derive(Clone)]
pub struct SearchService {
    repo: SearchRepository,
}

impl SearchService {
    pub fn new(repo: SearchRepository) -> Self {
        Self { repo }
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, AppError> {
        let (pattern, limit) = normalize(query)?;

        let (units, customers, tenants, complaints, vehicles) = tokio::try_join!(
            self.repo.units(&pattern, limit),
            self.repo.customers(&pattern, limit),
            self.repo.tenants(&pattern, limit),
            self.repo.complaints(&pattern, limit),
            self.repo.vehicles(&pattern, limit),
        )?;

        Ok(SearchResults {
            units,
            customers,
            tenants,
            complaints,
            vehicles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(q: &str, limit: Option<i64>) -> SearchQuery {
        SearchQuery { q: q.into(), limit }
    }

    #[test]
    fn short_terms_are_rejected_after_trim() {
        assert!(matches!(normalize(&query("  a ", None)), Err(AppError::BadRequest(_))));
        assert!(normalize(&query(" ab ", None)).is_ok());
    }

    #[test]
    fn limit_defaults_and_caps() {
        assert_eq!(normalize(&query("tower", None)).unwrap().1, 10);
        assert_eq!(normalize(&query("tower", Some(500))).unwrap().1, 50);
        assert_eq!(normalize(&query("tower", Some(0))).unwrap().1, 1);
    }

    #[test]
    fn term_becomes_a_substring_pattern() {
        assert_eq!(normalize(&query(" A-12 ", None)).unwrap().0, "%A-12%");
    }
}
