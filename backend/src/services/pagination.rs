//! Page requests, sorting by whitelisted fields, and page envelopes.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::error::{ServiceError, ServiceResult};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "ASC")]
    Asc,
    #[default]
    #[serde(alias = "DESC")]
    Desc,
}

/// Query parameters of every paged listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default, rename = "type")]
    pub direction: SortDirection,
}

fn default_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
            direction: SortDirection::Desc,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(field.into());
        self.direction = direction;
        self
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// Entities that can be ordered by a named field.
pub trait Sortable {
    /// Field names accepted in `PageRequest::sort`.
    const SORT_FIELDS: &'static [&'static str];

    /// Compare by `field`, which is always one of `SORT_FIELDS`.
    fn compare_by(&self, other: &Self, field: &str) -> Ordering;
}

/// `f64` ordering for sort keys; NaN sorts as equal.
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Sort `items` as requested and cut out the requested page.
///
/// Unknown sort fields and a zero page size are rejected rather than ignored.
pub fn paginate<T: Sortable>(
    mut items: Vec<T>,
    request: &PageRequest,
    default_sort: &str,
) -> ServiceResult<Page<T>> {
    if request.size == 0 {
        return Err(ServiceError::bad_request("Page size must be greater than zero"));
    }

    let field = request.sort.as_deref().unwrap_or(default_sort);
    if !T::SORT_FIELDS.contains(&field) {
        return Err(ServiceError::bad_request(format!(
            "Unknown sort field '{}', expected one of: {}",
            field,
            T::SORT_FIELDS.join(", ")
        )));
    }

    items.sort_by(|a, b| {
        let ordering = a.compare_by(b, field);
        match request.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total_elements = items.len();
    let total_pages = total_elements.div_ceil(request.size);
    let content = items
        .into_iter()
        .skip(request.page.saturating_mul(request.size))
        .take(request.size)
        .collect();

    Ok(Page {
        content,
        page: request.page,
        size: request.size,
        total_elements,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        score: f64,
    }

    impl Sortable for Row {
        const SORT_FIELDS: &'static [&'static str] = &["id", "score"];

        fn compare_by(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "score" => cmp_f64(self.score, other.score),
                _ => self.id.cmp(&other.id),
            }
        }
    }

    fn rows() -> Vec<Row> {
        (1..=5)
            .map(|id| Row {
                id,
                score: (10 - id) as f64,
            })
            .collect()
    }

    #[test]
    fn test_pages_split_and_count() {
        let request = PageRequest::new(1, 2).sorted_by("id", SortDirection::Asc);
        let page = paginate(rows(), &request, "id").unwrap();
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_default_direction_is_descending() {
        let page = paginate(rows(), &PageRequest::default(), "id").unwrap();
        assert_eq!(page.content[0].id, 5);
    }

    #[test]
    fn test_sort_by_float_field() {
        let request = PageRequest::new(0, 10).sorted_by("score", SortDirection::Asc);
        let page = paginate(rows(), &request, "id").unwrap();
        assert_eq!(page.content[0].id, 5);
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        let request = PageRequest::new(0, 10).sorted_by("password", SortDirection::Asc);
        assert!(matches!(
            paginate(rows(), &request, "id"),
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(paginate(rows(), &PageRequest::new(0, 0), "id").is_err());
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page = paginate(rows(), &PageRequest::new(9, 2), "id").unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 5);
    }

    #[test]
    fn test_direction_parses_either_case() {
        let request: PageRequest =
            serde_json::from_str(r#"{"page":0,"size":5,"sort":"id","type":"ASC"}"#).unwrap();
        assert_eq!(request.direction, SortDirection::Asc);
        let request: PageRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
    }
}
