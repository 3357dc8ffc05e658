//! Paged response shapes.

use photomarket_core::card::Grade;
use photomarket_core::pagination::PageRequest;
use photomarket_db::models::card::GradeCount;
use serde::Serialize;

/// One page of an offset-paged list.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: request.total_pages(total),
        }
    }
}

/// A page plus a count per grade across the whole filtered set.
#[derive(Debug, Serialize)]
pub struct GradedPage<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub grade_counts: Vec<GradeCount>,
}

/// Expand sparse per-grade rows to every grade, in rarity order, with zeros
/// for the missing ones.
pub fn fill_grade_counts(rows: Vec<GradeCount>) -> Vec<GradeCount> {
    Grade::ALL
        .iter()
        .map(|grade| GradeCount {
            grade: grade.as_str().to_string(),
            count: rows
                .iter()
                .find(|row| row.grade == grade.as_str())
                .map_or(0, |row| row.count),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_grade_in_order() {
        let counts = fill_grade_counts(vec![GradeCount {
            grade: "LEGENDARY".to_string(),
            count: 3,
        }]);
        let grades: Vec<&str> = counts.iter().map(|c| c.grade.as_str()).collect();
        assert_eq!(grades, ["COMMON", "RARE", "SUPER_RARE", "LEGENDARY"]);
        assert_eq!(counts[3].count, 3);
        assert_eq!(counts[0].count, 0);
    }

    #[test]
    fn page_reports_total_pages() {
        let request = PageRequest::new(Some(2), Some(5), 15).unwrap();
        let page = Page::new(vec![1, 2], request, 7);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 2);
    }
}
