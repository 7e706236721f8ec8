//! Page Envelope: the finder's only output shape.

use serde::{Deserialize, Serialize};

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T> PageEnvelope<T> {
    /// Assembles a page. `data` beyond `limit` is dropped so the envelope
    /// never claims more rows than its limit.
    pub fn new(mut data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        data.truncate(limit as usize);
        Self {
            data,
            page,
            limit,
            total,
            has_next_page: u64::from(page) * u64::from(limit) < total,
            has_prev_page: page > 1,
        }
    }

    /// Rows a fresh store read must return for this page.
    pub fn expected_len(page: u32, limit: u32, total: u64) -> usize {
        let skipped = u64::from(page.saturating_sub(1)) * u64::from(limit);
        total.saturating_sub(skipped).min(u64::from(limit)) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_of_45() {
        let envelope = PageEnvelope::new((0..20).collect::<Vec<u32>>(), 1, 20, 45);
        assert_eq!(envelope.data.len(), 20);
        assert!(envelope.has_next_page);
        assert!(!envelope.has_prev_page);
    }

    #[test]
    fn test_last_page_of_45() {
        let envelope = PageEnvelope::new((0..5).collect::<Vec<u32>>(), 3, 20, 45);
        assert!(!envelope.has_next_page);
        assert!(envelope.has_prev_page);
        assert_eq!(PageEnvelope::<u32>::expected_len(3, 20, 45), 5);
    }

    #[test]
    fn test_page_past_the_end() {
        assert_eq!(PageEnvelope::<u32>::expected_len(9, 20, 45), 0);
        let envelope = PageEnvelope::<u32>::new(vec![], 9, 20, 45);
        assert!(!envelope.has_next_page);
        assert!(envelope.has_prev_page);
    }

    #[test]
    fn test_data_truncated_to_limit() {
        let envelope = PageEnvelope::new(vec![1, 2, 3], 1, 2, 3);
        assert_eq!(envelope.data, vec![1, 2]);
    }

    #[test]
    fn test_camel_case_json() {
        let envelope = PageEnvelope::new(vec![1u32], 1, 20, 1);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["hasNextPage"], false);
        assert_eq!(json["hasPrevPage"], false);
        assert_eq!(json["total"], 1);
    }
}
