use crate::bidding::policy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// null 또는 누락된 컬렉션 필드는 기본값으로 처리
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// region:    --- Media
/// 아바타/배너 이미지 (URL 문자열 또는 {url, alt} 객체)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Image {
    Url(String),
    Media {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

impl Image {
    pub fn url(&self) -> &str {
        match self {
            Image::Url(url) => url,
            Image::Media { url, .. } => url,
        }
    }
}

/// 상품 이미지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl Media {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
        }
    }
}

// endregion: --- Media

// region:    --- User
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listings: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<u64>,
}

/// 사용자 (판매자, 입찰자, 프로필, 세션 사용자 공용)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<i64>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<ProfileCount>,
}

impl User {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 판매자 이름 비교 (대소문자 무시)
    pub fn is_named(&self, name: &str) -> bool {
        !self.name.is_empty() && self.name.to_lowercase() == name.to_lowercase()
    }
}

// endregion: --- User

// region:    --- Bid
/// 입찰자 (사용자 객체 또는 이름 문자열)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bidder {
    Name(String),
    User(User),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder: Option<Bidder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Bid {
    pub fn bidder_display(&self) -> &str {
        if let Some(name) = self.bidder_name.as_deref().filter(|n| !n.is_empty()) {
            return name;
        }
        match &self.bidder {
            Some(Bidder::Name(name)) if !name.is_empty() => name,
            Some(Bidder::User(user)) if !user.name.is_empty() => &user.name,
            _ => "Unknown",
        }
    }
}

// endregion: --- Bid

// region:    --- Listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCount {
    #[serde(default)]
    pub bids: u64,
}

/// 경매 상품
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    pub ends_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<User>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bids: Vec<Bid>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<ListingCount>,
}

impl Listing {
    /// 현재 가격 (최고 입찰가, 없으면 0)
    pub fn highest_bid(&self) -> u64 {
        policy::highest_bid(&self.bids)
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }

    pub fn bid_count(&self) -> u64 {
        self.count
            .as_ref()
            .map(|c| c.bids)
            .unwrap_or(self.bids.len() as u64)
    }

    pub fn seller_name(&self) -> &str {
        self.seller
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown seller")
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled listing"
        } else {
            &self.title
        }
    }

    /// URL이 있는 이미지만 반환
    pub fn images(&self) -> Vec<&Media> {
        self.media.iter().filter(|m| !m.url.is_empty()).collect()
    }

    /// 입찰 이력 (최신순)
    pub fn bids_newest_first(&self) -> Vec<&Bid> {
        let mut bids: Vec<&Bid> = self.bids.iter().collect();
        bids.sort_by(|a, b| b.created.cmp(&a.created));
        bids
    }
}

// endregion: --- Listing

// region:    --- Paging
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub is_first_page: Option<bool>,
    #[serde(default)]
    pub is_last_page: Option<bool>,
    #[serde(default)]
    pub total_count: Option<u32>,
}

impl PageMeta {
    /// meta가 없을 때의 기본값
    pub fn single(page: u32) -> Self {
        Self {
            current_page: Some(page),
            page_count: Some(1),
            is_first_page: None,
            is_last_page: Some(true),
            total_count: None,
        }
    }

    pub fn current(&self, requested: u32) -> u32 {
        self.current_page.unwrap_or(requested).max(1)
    }

    pub fn pages(&self, requested: u32) -> u32 {
        self.page_count.unwrap_or(1).max(1).max(self.current(requested))
    }

    pub fn is_first(&self, requested: u32) -> bool {
        self.is_first_page.unwrap_or(self.current(requested) <= 1)
    }

    pub fn is_last(&self, requested: u32) -> bool {
        self.is_last_page
            .unwrap_or(self.current(requested) >= self.pages(requested))
    }
}

/// 서버 페이지 조회 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingsPage {
    pub listings: Vec<Listing>,
    pub meta: PageMeta,
}

// endregion: --- Paging

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_tolerates_null_collections_and_bidder_shapes() {
        let listing: Listing = serde_json::from_value(json!({
            "id": "abc",
            "title": "Lamp",
            "description": null,
            "tags": null,
            "media": [{"url": "https://img/1.png", "alt": ""}, {"url": ""}],
            "endsAt": "2030-01-01T00:00:00.000Z",
            "seller": {"name": "ann", "avatar": {"url": "https://img/a.png"}},
            "bids": [
                {"amount": 5, "bidder": {"name": "bob"}, "created": "2026-01-01T00:00:00Z"},
                {"amount": 9, "bidder": "carl", "created": "2026-01-02T00:00:00Z"},
                {"amount": 7, "bidderName": "dora"}
            ],
            "_count": {"bids": 3}
        }))
        .unwrap();

        assert!(listing.tags.is_empty());
        assert_eq!(listing.images().len(), 1);
        assert_eq!(listing.highest_bid(), 9);
        assert_eq!(listing.bid_count(), 3);
        assert_eq!(listing.seller_name(), "ann");

        let newest: Vec<&str> = listing
            .bids_newest_first()
            .iter()
            .map(|b| b.bidder_display())
            .collect();
        assert_eq!(newest, vec!["carl", "bob", "dora"]);
    }

    #[test]
    fn missing_seller_and_title_have_display_fallbacks() {
        let listing: Listing = serde_json::from_value(json!({
            "id": "x",
            "endsAt": "2030-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(listing.seller_name(), "Unknown seller");
        assert_eq!(listing.display_title(), "Untitled listing");
        assert_eq!(listing.bid_count(), 0);
        assert_eq!(listing.highest_bid(), 0);
    }

    #[test]
    fn page_meta_defaults_when_fields_are_missing() {
        let meta = PageMeta::default();
        assert_eq!(meta.current(3), 3);
        assert_eq!(meta.pages(3), 3);
        assert!(meta.is_last(3));
        assert!(!meta.is_first(3));

        let single = PageMeta::single(1);
        assert!(single.is_first(1));
        assert!(single.is_last(1));
    }
}
