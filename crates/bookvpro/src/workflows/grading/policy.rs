use super::domain::{Grade, SearchSignal};

/// Thresholds that turn search signals into a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GradePolicy {
    /// Highest seller count that can still grade A.
    pub max_sellers_for_a: u32,
    /// Titles below this monthly volume grade C instead of A. Unset disables C.
    pub min_search_volume: Option<u64>,
}

impl GradePolicy {
    pub fn grade(&self, signal: &SearchSignal) -> Grade {
        if signal.has_card || signal.seller_count > self.max_sellers_for_a {
            return Grade::B;
        }

        match (self.min_search_volume, signal.search_volume) {
            (Some(minimum), Some(volume)) if volume < minimum => Grade::C,
            _ => Grade::A,
        }
    }
}
