// region:    --- Imports
use crate::auction::model::Listing;
use chrono::{DateTime, Duration, Utc};

// endregion: --- Imports

// region:    --- Listing Filters
/// "곧 종료" 판단 범위
pub const ENDING_SOON_WINDOW_HOURS: i64 = 24;

/// 목록 필터 (검색어, 태그, 진행 중, 곧 종료)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListingFilters {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub active_only: bool,
    pub ending_soon: bool,
}

impl ListingFilters {
    /// 필터가 하나라도 켜져 있으면 클라이언트 측 필터링으로 전환
    pub fn is_active(&self) -> bool {
        needle(&self.search).is_some()
            || needle(&self.tag).is_some()
            || self.active_only
            || self.ending_soon
    }
}

fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// 필터 적용 (고정 순서: 검색어 -> 태그 -> 진행 중 -> 곧 종료)
/// 곧 종료 필터는 요청한 정렬을 무시하고 종료 시각 오름차순으로 정렬한다.
pub fn apply_filters(
    listings: Vec<Listing>,
    filters: &ListingFilters,
    now: DateTime<Utc>,
) -> Vec<Listing> {
    let mut result = listings;

    if let Some(search) = needle(&filters.search) {
        result.retain(|l| {
            l.title.to_lowercase().contains(&search)
                || l.seller
                    .as_ref()
                    .map(|s| s.name.to_lowercase().contains(&search))
                    .unwrap_or(false)
        });
    }

    if let Some(tag) = needle(&filters.tag) {
        result.retain(|l| l.tags.iter().any(|t| t.to_lowercase().contains(&tag)));
    }

    if filters.active_only {
        result.retain(|l| l.ends_at > now);
    }

    if filters.ending_soon {
        let horizon = now + Duration::hours(ENDING_SOON_WINDOW_HOURS);
        result.retain(|l| l.ends_at > now && l.ends_at <= horizon);
        result.sort_by_key(|l| l.ends_at);
    }

    result
}

// endregion: --- Listing Filters

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
    }

    fn listing(id: &str, title: &str, seller: &str, tags: &[&str], ends_in_hours: i64) -> Listing {
        serde_json::from_value(json!({
            "id": id,
            "title": title,
            "tags": tags,
            "seller": {"name": seller},
            "endsAt": now() + Duration::hours(ends_in_hours)
        }))
        .unwrap()
    }

    fn corpus() -> Vec<Listing> {
        vec![
            listing("1", "Antique clock", "zed", &["Brass", "home"], 48),
            listing("2", "Bike", "Alma", &["sport"], 10),
            listing("3", "Banjo", "kim", &["music", "brass-band"], 2),
            listing("4", "Lamp", "abe", &["home"], -5),
            listing("5", "Camera", "lee", &["photo"], 20),
        ]
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn blank_filters_are_inactive() {
        let filters = ListingFilters {
            search: Some("   ".into()),
            tag: Some(String::new()),
            ..Default::default()
        };
        assert!(!filters.is_active());
        assert_eq!(apply_filters(corpus(), &filters, now()).len(), 5);
    }

    #[test]
    fn search_matches_title_or_seller_case_insensitively() {
        let filters = ListingFilters {
            search: Some("A".into()),
            ..Default::default()
        };
        // title: Antique clock, Banjo, Lamp, Camera / seller: Alma, abe
        assert_eq!(ids(&apply_filters(corpus(), &filters, now())), vec!["1", "2", "3", "4", "5"]);

        let filters = ListingFilters {
            search: Some("alm".into()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(corpus(), &filters, now())), vec!["2"]);
    }

    #[test]
    fn combined_filters_give_a_deterministic_subset() {
        let filters = ListingFilters {
            search: Some("a".into()),
            tag: Some("b".into()),
            active_only: true,
            ending_soon: false,
        };
        assert_eq!(ids(&apply_filters(corpus(), &filters, now())), vec!["1", "3"]);

        let mut reversed = corpus();
        reversed.reverse();
        assert_eq!(ids(&apply_filters(reversed, &filters, now())), vec!["3", "1"]);
    }

    #[test]
    fn ending_soon_keeps_window_and_sorts_by_end_time() {
        let filters = ListingFilters {
            ending_soon: true,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(corpus(), &filters, now())), vec!["3", "2", "5"]);
    }

    #[test]
    fn active_only_drops_ended_listings() {
        let filters = ListingFilters {
            active_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(corpus(), &filters, now())), vec!["1", "2", "3", "5"]);
    }
}
