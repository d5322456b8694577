//! Query parameters, filters and pagination utilities

use crate::core::error::{ShopError, ShopResult};
use crate::core::field::FieldValue;
use crate::core::resource::Resource;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::LazyLock;

static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("field name pattern is valid"));

/// Query parameters for pagination and filtering
///
/// # Example
/// ```text
/// GET /orders?page=2&limit=10
/// GET /orders?filter={"status": "pending"}
/// GET /products?page=1&limit=20&filter={"price_cents>": 1000}&sort=created_at:desc
/// GET /users?include_inactive=true
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    pub page: Option<usize>,

    /// Number of items per page
    pub limit: Option<usize>,

    /// Filters as JSON object
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - Inequality: `{"field!=": "value"}`
    /// - Comparison: `{"field>": value, "field<": value, "field>=": value, "field<=": value}`
    pub filter: Option<String>,

    /// Sort field and direction, `field`, `field:asc` or `field:desc`
    pub sort: Option<String>,

    /// Include disabled resources (admin only)
    pub include_inactive: bool,
}

/// Default and maximum page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Get limit, clamped to `1..=max_limit`
    pub fn limit(&self, limits: &PageLimits) -> usize {
        self.limit
            .unwrap_or(limits.default_limit)
            .clamp(1, limits.max_limit.max(1))
    }

    /// Translate into the structured query consumed by services
    pub fn to_list_query(&self, limits: &PageLimits) -> ShopResult<ListQuery> {
        let filter = match self.filter.as_deref().map(str::trim) {
            None | Some("") => Filter::default(),
            Some(raw) => {
                let value: Value = serde_json::from_str(raw)
                    .map_err(|e| ShopError::invalid_filter(format!("not valid JSON: {}", e)))?;
                Filter::from_json(&value)?
            }
        };

        let sort = self.sort.as_deref().map(Sort::parse).transpose()?;

        Ok(ListQuery {
            filter,
            sort,
            page: self.page(),
            limit: self.limit(limits),
            include_inactive: self.include_inactive,
        })
    }
}

/// Comparison operator of a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    // Longest suffixes first so ">=" is not read as ">"
    const SUFFIXES: [(&'static str, Comparison); 5] = [
        ("!=", Comparison::Ne),
        (">=", Comparison::Gte),
        ("<=", Comparison::Lte),
        (">", Comparison::Gt),
        ("<", Comparison::Lt),
    ];

    fn split_key(key: &str) -> (&str, Comparison) {
        for (suffix, op) in Self::SUFFIXES {
            if let Some(field) = key.strip_suffix(suffix) {
                return (field.trim_end(), op);
            }
        }
        (key, Comparison::Eq)
    }
}

/// One `field <op> value` constraint
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Comparison,
    pub value: FieldValue,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Comparison, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluate against the actual value of the field.
    ///
    /// A missing field reads as null. Values of incompatible types only
    /// satisfy `!=`.
    pub fn matches(&self, actual: Option<&FieldValue>) -> bool {
        let actual = actual.unwrap_or(&FieldValue::Null);
        let ordering = actual.compare(&self.value);

        match self.op {
            Comparison::Eq => ordering == Some(Ordering::Equal),
            Comparison::Ne => ordering != Some(Ordering::Equal),
            Comparison::Gt => ordering == Some(Ordering::Greater),
            Comparison::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            Comparison::Lt => ordering == Some(Ordering::Less),
            Comparison::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        }
    }
}

/// Conjunction of conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON filter grammar.
    pub fn from_json(value: &Value) -> ShopResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ShopError::invalid_filter("filter must be a JSON object"))?;

        let mut filter = Filter::new();
        for (key, raw) in object {
            let (field, op) = Comparison::split_key(key.trim());
            if !FIELD_NAME.is_match(field) {
                return Err(ShopError::invalid_filter(format!(
                    "invalid field name '{}'",
                    field
                )));
            }
            let value = FieldValue::from_json(raw).ok_or_else(|| {
                ShopError::invalid_filter(format!("value for '{}' must be a scalar", field))
            })?;
            filter.push(Condition {
                field: field.to_string(),
                op,
                value,
            });
        }
        Ok(filter)
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Append an equality condition.
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(Condition::new(field, Comparison::Eq, value));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Fail on the first field `T` does not expose.
    pub fn ensure_fields<T: Resource>(&self) -> ShopResult<()> {
        match self.conditions.iter().find(|c| !T::has_field(&c.field)) {
            Some(condition) => Err(ShopError::invalid_filter(format!(
                "unknown field '{}' for {}",
                condition.field,
                T::KIND
            ))),
            None => Ok(()),
        }
    }

    pub fn matches<T: Resource>(&self, record: &T) -> bool {
        self.conditions
            .iter()
            .all(|c| c.matches(record.field(&c.field).as_ref()))
    }
}

/// Sort key of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    pub fn parse(raw: &str) -> ShopResult<Self> {
        let (field, direction) = match raw.split_once(':') {
            Some((field, direction)) => (field.trim(), direction.trim()),
            None => (raw.trim(), "asc"),
        };

        let descending = match direction.to_ascii_lowercase().as_str() {
            "asc" => false,
            "desc" => true,
            other => {
                return Err(ShopError::invalid_filter(format!(
                    "unknown sort direction '{}'",
                    other
                )));
            }
        };

        if !FIELD_NAME.is_match(field) {
            return Err(ShopError::invalid_filter(format!(
                "invalid sort field '{}'",
                field
            )));
        }

        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }

    /// Sort records in place. Incomparable values keep their order.
    pub fn apply<T: Resource>(&self, records: &mut [T]) {
        records.sort_by(|a, b| {
            let ordering = match (a.field(&self.field), b.field(&self.field)) {
                (Some(a), Some(b)) => a.compare(&b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
}

/// Structured listing request
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub page: usize,
    pub limit: usize,
    pub include_inactive: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            sort: None,
            page: 1,
            limit: PageLimits::default().default_limit,
            include_inactive: false,
        }
    }
}

/// Paginated response structure
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Slice one page out of the full, ordered result set
    pub fn paginate(items: Vec<T>, page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = items.len();
        let data = items
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        Self {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}
