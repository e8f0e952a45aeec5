//! Query Translator — `ParsedQuery` → engine-native `SearchParams`.
//!
//! Pure and stateless. Limits arrive already clamped by the HTTP layer.

use std::fmt;

use crate::search::models::ParsedQuery;
use crate::store::SearchParams;

/// Fields every free-text query is matched against.
pub const QUERY_BY: &str = "title,company,description";
/// Match-all query.
pub const MATCH_ALL: &str = "*";

/// Result ordering requested by the parsed query.
///
/// The data has no salary or real posting date, so `Salary` and `Date` share
/// the `Relevance` expression (newest import first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPreference {
    Relevance,
    Salary,
    Date,
    Company,
}

impl SortPreference {
    /// Unknown or missing preferences read as `Relevance`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("salary") => SortPreference::Salary,
            Some("date") => SortPreference::Date,
            Some("company") => SortPreference::Company,
            _ => SortPreference::Relevance,
        }
    }

    pub fn expression(self) -> &'static str {
        match self {
            SortPreference::Relevance | SortPreference::Salary | SortPreference::Date => {
                "job_id:desc"
            }
            SortPreference::Company => "company:asc",
        }
    }
}

/// One equality or inequality clause of a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    Equals { field: &'static str, value: String },
    NotEquals { field: &'static str, value: String },
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterClause::Equals { field, value } => write!(f, "{field}:={}", quote(value)),
            FilterClause::NotEquals { field, value } => write!(f, "{field}:!={}", quote(value)),
        }
    }
}

/// Backtick-quotes values containing characters the filter grammar reserves.
/// The value itself is never altered; one that already contains a backtick
/// cannot be quoted and goes out as-is.
fn quote(value: &str) -> String {
    const RESERVED: &[char] = &[',', '(', ')', '[', ']', '&', '|', ':'];
    if value.contains(RESERVED) && !value.contains('`') {
        format!("`{value}`")
    } else {
        value.to_string()
    }
}

/// ANDs clauses together. No clauses means no expression at all.
pub fn filter_expression(clauses: &[FilterClause]) -> Option<String> {
    if clauses.is_empty() {
        return None;
    }
    Some(
        clauses
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" && "),
    )
}

/// Facet clauses recognized in `parsed.filters`. Unrecognized values add nothing.
pub fn facet_clauses(parsed: &ParsedQuery) -> Vec<FilterClause> {
    let mut clauses = Vec::new();

    match parsed.filters.location.as_deref().map(str::trim) {
        Some(l) if l.eq_ignore_ascii_case("remote") => clauses.push(FilterClause::Equals {
            field: "location",
            value: "Remote".to_string(),
        }),
        Some(l) if l.eq_ignore_ascii_case("onsite") => clauses.push(FilterClause::NotEquals {
            field: "location",
            value: "Remote".to_string(),
        }),
        _ => {}
    }

    match parsed.filters.experience_level.as_deref().map(str::trim) {
        Some(l) if l.eq_ignore_ascii_case("senior") => clauses.push(FilterClause::Equals {
            field: "title",
            value: "Senior".to_string(),
        }),
        Some(l) if l.eq_ignore_ascii_case("junior") => clauses.push(FilterClause::Equals {
            field: "title",
            value: "Junior".to_string(),
        }),
        _ => {}
    }

    clauses
}

/// Builds the AI-search request for a parsed query.
pub fn build_search_params(parsed: &ParsedQuery, limit: u32) -> SearchParams {
    let q = parsed
        .search_query
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(MATCH_ALL)
        .to_string();

    SearchParams {
        q,
        query_by: Some(QUERY_BY.to_string()),
        per_page: Some(limit),
        sort_by: Some(
            SortPreference::parse(parsed.sort_by.as_deref())
                .expression()
                .to_string(),
        ),
        filter_by: filter_expression(&facet_clauses(parsed)),
        ..SearchParams::default()
    }
}

/// Inputs of the non-LLM search path.
#[derive(Debug, Clone, Default)]
pub struct TraditionalQuery {
    pub q: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

/// Builds the traditional-search request: exact `company`/`location`
/// filters and true offset paging.
pub fn build_traditional_params(query: &TraditionalQuery) -> SearchParams {
    let non_empty = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    let mut clauses = Vec::new();
    if let Some(company) = non_empty(&query.company) {
        clauses.push(FilterClause::Equals {
            field: "company",
            value: company,
        });
    }
    if let Some(location) = non_empty(&query.location) {
        clauses.push(FilterClause::Equals {
            field: "location",
            value: location,
        });
    }

    SearchParams {
        q: non_empty(&query.q).unwrap_or_else(|| MATCH_ALL.to_string()),
        query_by: Some(QUERY_BY.to_string()),
        filter_by: filter_expression(&clauses),
        offset: Some(query.offset),
        limit: Some(query.limit),
        ..SearchParams::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::models::QueryFilters;

    fn parsed(json: serde_json::Value) -> ParsedQuery {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_senior_react_example() {
        let p = parsed(serde_json::json!({
            "search_query": "react",
            "filters": {"experience_level": "senior"}
        }));
        let params = build_search_params(&p, 10);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({
                "q": "react",
                "query_by": "title,company,description",
                "per_page": 10,
                "sort_by": "job_id:desc",
                "filter_by": "title:=Senior"
            })
        );
    }

    #[test]
    fn test_remote_has_single_location_clause() {
        let p = ParsedQuery {
            filters: QueryFilters {
                location: Some("remote".to_string()),
                experience_level: None,
            },
            ..ParsedQuery::default()
        };
        let filter = build_search_params(&p, 5).filter_by.unwrap();
        assert_eq!(filter, "location:=Remote");
        assert_eq!(filter.matches("location").count(), 1);
    }

    #[test]
    fn test_onsite_junior_are_anded() {
        let p = ParsedQuery {
            filters: QueryFilters {
                location: Some("onsite".to_string()),
                experience_level: Some("junior".to_string()),
            },
            ..ParsedQuery::default()
        };
        assert_eq!(
            build_search_params(&p, 5).filter_by.as_deref(),
            Some("location:!=Remote && title:=Junior")
        );
    }

    #[test]
    fn test_no_facets_omits_filter_entirely() {
        let params = build_search_params(&ParsedQuery::default(), 10);
        assert_eq!(params.filter_by, None);
        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("filter_by").is_none());
    }

    #[test]
    fn test_unrecognized_facets_are_ignored() {
        let p = ParsedQuery {
            filters: QueryFilters {
                location: Some("hybrid".to_string()),
                experience_level: Some("mid".to_string()),
            },
            ..ParsedQuery::default()
        };
        assert_eq!(build_search_params(&p, 10).filter_by, None);
    }

    #[test]
    fn test_empty_search_query_matches_all() {
        let p = ParsedQuery {
            search_query: Some("   ".to_string()),
            ..ParsedQuery::default()
        };
        assert_eq!(build_search_params(&p, 10).q, "*");
        assert_eq!(build_search_params(&ParsedQuery::default(), 10).q, "*");
    }

    #[test]
    fn test_sort_table() {
        assert_eq!(SortPreference::parse(Some("relevance")).expression(), "job_id:desc");
        assert_eq!(SortPreference::parse(Some("salary")).expression(), "job_id:desc");
        assert_eq!(SortPreference::parse(Some("date")).expression(), "job_id:desc");
        assert_eq!(SortPreference::parse(Some("company")).expression(), "company:asc");
    }

    #[test]
    fn test_unknown_or_missing_sort_is_relevance() {
        let relevance = SortPreference::Relevance.expression();
        assert_eq!(SortPreference::parse(Some("rating")).expression(), relevance);
        assert_eq!(SortPreference::parse(None).expression(), relevance);
    }

    #[test]
    fn test_traditional_filters_and_offset() {
        let params = build_traditional_params(&TraditionalQuery {
            q: None,
            company: Some("Acme".to_string()),
            location: Some("Austin, TX".to_string()),
            limit: 20,
            offset: 30,
        });
        assert_eq!(params.q, "*");
        assert_eq!(
            params.filter_by.as_deref(),
            Some("company:=Acme && location:=`Austin, TX`")
        );
        assert_eq!(params.offset, Some(30));
        assert_eq!(params.limit, Some(20));
        assert_eq!(params.per_page, None);
        assert_eq!(params.sort_by, None);
    }

    #[test]
    fn test_filter_values_are_never_rewritten() {
        let clause = |value: &str| {
            FilterClause::Equals {
                field: "company",
                value: value.to_string(),
            }
            .to_string()
        };
        assert_eq!(clause("Acme"), "company:=Acme");
        assert_eq!(clause("Smith & Sons"), "company:=`Smith & Sons`");
        assert_eq!(clause("Ac`me"), "company:=Ac`me");
        assert_eq!(clause("Ac`me, Inc"), "company:=Ac`me, Inc");
    }

    #[test]
    fn test_traditional_blank_inputs_add_nothing() {
        let params = build_traditional_params(&TraditionalQuery {
            q: Some("".to_string()),
            company: Some(" ".to_string()),
            location: None,
            limit: 10,
            offset: 0,
        });
        assert_eq!(params.q, "*");
        assert_eq!(params.filter_by, None);
    }
}
