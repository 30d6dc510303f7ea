use serde::{Deserialize, Serialize};
use std::fmt;

/// 정렬 기준 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum SortField {
    Created,
    EndsAt,
    Title,
    Updated,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Created => "created",
            SortField::EndsAt => "endsAt",
            SortField::Title => "title",
            SortField::Updated => "updated",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 상품 목록 조회 조건 (서버 페이지네이션)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingsQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: SortField,
    pub order: SortOrder,
}

impl Default for ListingsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            sort: SortField::EndsAt,
            order: SortOrder::Asc,
        }
    }
}

impl ListingsQuery {
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("_seller", "true".to_string()),
            ("_bids", "true".to_string()),
            ("sort", self.sort.as_str().to_string()),
            ("sortOrder", self.order.as_str().to_string()),
            ("limit", self.limit.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}

/// 입찰 요청 본문
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BidRequest {
    pub amount: u64,
}
