//! In-memory implementation of PageFetcher for testing and development
//!
//! Rows are held behind an `Arc<RwLock<..>>`, filtered through an
//! optional [`FilterGroup`], sorted, and windowed per request. Evaluation
//! works on the rows' JSON projection, so any serializable row type
//! works.

use crate::core::fetcher::PageFetcher;
use crate::core::page::{PageRequest, PageResponse, SortOrder};
use crate::filter::{Condition, FilterGroup, FilterNode, FilterRule, Operator};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

/// In-memory page fetcher
///
/// The reference backend: answers data requests with the filtered,
/// sorted window and count requests with the filtered total. Clones
/// share the same row store.
#[derive(Clone)]
pub struct MemoryFetcher<T> {
    rows: Arc<RwLock<Vec<T>>>,
    filter: Option<FilterGroup>,
    overview: Option<Value>,
}

impl<T> MemoryFetcher<T> {
    /// Create a fetcher over the given rows
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            filter: None,
            overview: None,
        }
    }

    /// Constrain the served rows with a filter tree
    pub fn with_filter(mut self, filter: FilterGroup) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Attach an overview aggregate returned with every data page
    pub fn with_overview(mut self, overview: Value) -> Self {
        self.overview = Some(overview);
        self
    }

    /// Append a row to the store
    pub fn push(&self, row: T) -> Result<()> {
        self.rows
            .write()
            .map_err(|e| anyhow!("failed to acquire row lock: {}", e))?
            .push(row);
        Ok(())
    }
}

#[async_trait]
impl<T> PageFetcher for MemoryFetcher<T>
where
    T: Clone + Serialize + Send + Sync,
{
    type Row = T;
    type Overview = Value;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse<T, Value>> {
        let rows = self
            .rows
            .read()
            .map_err(|e| anyhow!("failed to acquire row lock: {}", e))?
            .clone();

        let mut projected = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::to_value(&row)?;
            projected.push((row, value));
        }

        if let Some(filter) = &self.filter {
            projected.retain(|(_, value)| group_matches(filter, value));
        }

        if request.count {
            return Ok(PageResponse::of_count(projected.len() as u64));
        }

        if let Some(field) = &request.sort {
            projected.sort_by(|(_, a), (_, b)| compare_values(a.get(field), b.get(field)));
            if request.order == Some(SortOrder::Desc) {
                projected.reverse();
            }
        }

        let window: Vec<T> = projected
            .into_iter()
            .skip(request.start as usize)
            .take(request.limit as usize)
            .map(|(row, _)| row)
            .collect();

        let mut response = PageResponse::of_rows(window);
        if let Some(overview) = &self.overview {
            response = response.with_overview(overview.clone());
        }
        Ok(response)
    }
}

/// Evaluate a filter tree against one row's JSON projection
///
/// An empty group matches everything; a search form whose rules were all
/// dropped for emptiness still lists all rows.
pub fn group_matches(group: &FilterGroup, row: &Value) -> bool {
    if group.rules.is_empty() {
        return true;
    }
    match group.condition {
        Condition::And => group.rules.iter().all(|node| node_matches(node, row)),
        Condition::Or => group.rules.iter().any(|node| node_matches(node, row)),
    }
}

fn node_matches(node: &FilterNode, row: &Value) -> bool {
    match node {
        FilterNode::Rule(rule) => rule_matches(rule, row),
        FilterNode::Group(group) => group_matches(group, row),
    }
}

fn rule_matches(rule: &FilterRule, row: &Value) -> bool {
    let field = row.get(&rule.field);
    match rule.operator {
        Operator::Equal => field == Some(&rule.value),
        Operator::NotEqual => field != Some(&rule.value),
        Operator::Greater => number_cmp(field, &rule.value) == Some(Ordering::Greater),
        Operator::Less => number_cmp(field, &rule.value) == Some(Ordering::Less),
        Operator::GreaterOrEqual => {
            matches!(
                number_cmp(field, &rule.value),
                Some(Ordering::Greater | Ordering::Equal)
            )
        }
        Operator::LessOrEqual => {
            matches!(
                number_cmp(field, &rule.value),
                Some(Ordering::Less | Ordering::Equal)
            )
        }
        Operator::DatetimeGreater => datetime_cmp(field, &rule.value) == Some(Ordering::Greater),
        Operator::DatetimeLess => datetime_cmp(field, &rule.value) == Some(Ordering::Less),
        Operator::DatetimeGreaterOrEqual => {
            matches!(
                datetime_cmp(field, &rule.value),
                Some(Ordering::Greater | Ordering::Equal)
            )
        }
        Operator::DatetimeLessOrEqual => {
            matches!(
                datetime_cmp(field, &rule.value),
                Some(Ordering::Less | Ordering::Equal)
            )
        }
        Operator::In => in_set(field, &rule.value),
        Operator::NotIn => !in_set(field, &rule.value),
        Operator::IsEmpty => field_is_empty(field),
        Operator::IsNotEmpty => !field_is_empty(field),
        Operator::BeginsWith => string_test(field, &rule.value, |s, n| s.starts_with(n)),
        Operator::NotBeginsWith => !string_test(field, &rule.value, |s, n| s.starts_with(n)),
        Operator::Contains => string_test(field, &rule.value, |s, n| s.contains(n)),
        Operator::NotContains => !string_test(field, &rule.value, |s, n| s.contains(n)),
        Operator::EndsWith => string_test(field, &rule.value, |s, n| s.ends_with(n)),
        Operator::NotEndsWith => !string_test(field, &rule.value, |s, n| s.ends_with(n)),
        Operator::IsNull => matches!(field, None | Some(Value::Null)),
        Operator::IsNotNull => matches!(field, Some(value) if !value.is_null()),
        Operator::Exist => field.is_some(),
        Operator::NotExist => field.is_none(),
    }
}

fn number_cmp(field: Option<&Value>, value: &Value) -> Option<Ordering> {
    let a = field?.as_f64()?;
    let b = value.as_f64()?;
    a.partial_cmp(&b)
}

fn datetime_cmp(field: Option<&Value>, value: &Value) -> Option<Ordering> {
    let a = field?.as_str()?;
    let b = value.as_str()?;
    match (parse_datetime(a), parse_datetime(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        // Unparseable stamps fall back to lexicographic comparison,
        // which is still correct for same-format sortable stamps
        _ => Some(a.cmp(b)),
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn in_set(field: Option<&Value>, value: &Value) -> bool {
    match (field, value.as_array()) {
        (Some(field), Some(set)) => set.contains(field),
        _ => false,
    }
}

fn field_is_empty(field: Option<&Value>) -> bool {
    match field {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

fn string_test(field: Option<&Value>, value: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
    match (field.and_then(Value::as_str), value.as_str()) {
        (Some(field), Some(needle)) => test(field, needle),
        _ => false,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            } else if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
                x.cmp(y)
            } else {
                a.to_string().cmp(&b.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::from_conditions;
    use serde_json::json;

    fn hosts() -> Vec<Value> {
        vec![
            json!({"name": "web-1", "cpu": 4, "region": "ap-1", "created_at": "2025-03-01"}),
            json!({"name": "web-2", "cpu": 8, "region": "ap-2", "created_at": "2025-06-15"}),
            json!({"name": "db-1", "cpu": 16, "region": "ap-1", "created_at": "2024-11-30"}),
            json!({"name": "cache-1", "cpu": 2, "region": "ap-3", "created_at": "2025-01-20", "note": ""}),
        ]
    }

    fn matches(conditions: Value, row: &Value) -> bool {
        let group = from_conditions(&conditions).unwrap();
        group_matches(&group, row)
    }

    #[test]
    fn test_equality_operators() {
        let row = json!({"status": "running", "cpu": 4});
        assert!(matches(json!(["AND", ["status", "=", "running"]]), &row));
        assert!(!matches(json!(["AND", ["status", "=", "stopped"]]), &row));
        assert!(matches(json!(["AND", ["status", "!=", "stopped"]]), &row));
        assert!(matches(json!(["AND", ["cpu", "=", 4]]), &row));
    }

    #[test]
    fn test_numeric_operators() {
        let row = json!({"cpu": 8});
        assert!(matches(json!(["AND", ["cpu", ">", 4]]), &row));
        assert!(matches(json!(["AND", ["cpu", ">=", 8]]), &row));
        assert!(!matches(json!(["AND", ["cpu", "<", 8]]), &row));
        assert!(matches(json!(["AND", ["cpu", "<=", 8]]), &row));
        // missing field never compares
        assert!(!matches(json!(["AND", ["memory", ">", 1]]), &row));
    }

    #[test]
    fn test_datetime_operators() {
        let row = json!({"created_at": "2025-03-01"});
        assert!(matches(
            json!(["AND", ["created_at", "d>", "2025-01-01"]]),
            &row
        ));
        assert!(matches(
            json!(["AND", ["created_at", "d<=", "2025-03-01"]]),
            &row
        ));
        // mixed formats still compare through parsing
        assert!(matches(
            json!(["AND", ["created_at", "d<", "2025-03-01 12:00:00"]]),
            &row
        ));
    }

    #[test]
    fn test_membership_operators() {
        let row = json!({"region": "ap-2"});
        assert!(matches(
            json!(["AND", ["region", "in", ["ap-1", "ap-2"]]]),
            &row
        ));
        assert!(matches(
            json!(["AND", ["region", "not_in", ["ap-1", "ap-3"]]]),
            &row
        ));
    }

    #[test]
    fn test_string_operators() {
        let row = json!({"name": "web-cluster-1"});
        assert!(matches(json!(["AND", ["name", "begins_with", "web"]]), &row));
        assert!(matches(json!(["AND", ["name", "contains", "cluster"]]), &row));
        assert!(matches(json!(["AND", ["name", "ends_with", "-1"]]), &row));
        assert!(matches(
            json!(["AND", ["name", "not_begins_with", "db"]]),
            &row
        ));
        // non-string field never matches a string operator
        assert!(!matches(json!(["AND", ["name", "contains", "x"]]), &json!({"name": 7})));
    }

    #[test]
    fn test_presence_operators() {
        let row = json!({"note": "", "tags": [], "owner": null, "cpu": 4});
        assert!(matches(json!(["AND", ["note", "is_empty", [1]]]), &row));
        assert!(matches(json!(["AND", ["tags", "is_empty", [1]]]), &row));
        assert!(matches(json!(["AND", ["cpu", "is_not_empty", [1]]]), &row));
        assert!(matches(json!(["AND", ["owner", "is_null", true]]), &row));
        assert!(matches(json!(["AND", ["cpu", "is_not_null", true]]), &row));
        assert!(matches(json!(["AND", ["cpu", "exist", true]]), &row));
        assert!(matches(json!(["AND", ["memory", "not_exist", true]]), &row));
        assert!(!matches(json!(["AND", ["memory", "exist", true]]), &row));
    }

    #[test]
    fn test_nested_group_evaluation() {
        let conditions = json!([
            "AND",
            ["cpu", ">=", 4],
            ["OR", ["region", "=", "ap-1"], ["region", "=", "ap-2"]]
        ]);
        assert!(matches(conditions.clone(), &json!({"cpu": 8, "region": "ap-2"})));
        assert!(!matches(conditions, &json!({"cpu": 8, "region": "ap-3"})));
    }

    #[test]
    fn test_empty_group_matches_everything() {
        let group = from_conditions(&json!(["AND", ["name", "=", ""]])).unwrap();
        assert!(group_matches(&group, &json!({"anything": 1})));
    }

    #[tokio::test]
    async fn test_fetch_applies_filter_sort_and_window() {
        let filter = from_conditions(&json!(["AND", ["region", "in", ["ap-1", "ap-2"]]])).unwrap();
        let fetcher = MemoryFetcher::new(hosts()).with_filter(filter);

        let request = PageRequest::data(0, 2, Some("cpu".to_string()), Some(SortOrder::Desc));
        let page = fetcher.fetch_page(&request).await.unwrap();
        let names: Vec<_> = page.rows.iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("db-1"), json!("web-2")]);

        let totals = fetcher
            .fetch_page(&PageRequest::count_for(&request))
            .await
            .unwrap();
        assert_eq!(totals.count, Some(3));
    }

    #[tokio::test]
    async fn test_window_past_the_end_is_empty() {
        let fetcher = MemoryFetcher::new(hosts());
        let page = fetcher
            .fetch_page(&PageRequest::data(40, 10, None, None))
            .await
            .unwrap();
        assert!(page.rows.is_empty());
    }

    #[tokio::test]
    async fn test_overview_travels_with_data_pages() {
        let fetcher =
            MemoryFetcher::new(hosts()).with_overview(json!({"total_cpu": 30}));
        let page = fetcher
            .fetch_page(&PageRequest::data(0, 10, None, None))
            .await
            .unwrap();
        assert_eq!(page.overview.unwrap()["total_cpu"], json!(30));
    }

    #[tokio::test]
    async fn test_push_is_visible_to_clones() {
        let fetcher = MemoryFetcher::new(hosts());
        let clone = fetcher.clone();
        clone.push(json!({"name": "web-3", "cpu": 4, "region": "ap-1"})).unwrap();

        let totals = fetcher
            .fetch_page(&PageRequest::count_only())
            .await
            .unwrap();
        assert_eq!(totals.count, Some(5));
    }
}
