// region:    --- Imports
use super::filters::{apply_filters, ListingFilters};
use crate::api::{AuctionApi, ListingsQuery, SortField, SortOrder};
use crate::auction::model::Listing;
use crate::error::ClientError;
use chrono::{DateTime, Utc};
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Constants
/// 화면 한 페이지 크기
pub const PAGE_SIZE: u32 = 18;
/// 필터 사용 시 API 페이지 크기
pub const FILTER_FETCH_PAGE_SIZE: u32 = 100;
/// 필터 사용 시 최대 수집 개수
pub const MAX_FILTER_ITEMS: usize = 600;

pub const TRENDING_LIMIT: u32 = 9;
pub const CARDS_PER_SLIDE: usize = 3;
/// 홈 화면 로더 최소 표시 시간
pub const MIN_LOADER_DURATION: Duration = Duration::from_millis(400);

// endregion: --- Constants

// region:    --- Browse State
/// 필터용으로 수집한 전체 목록 캐시
#[derive(Debug, Clone, PartialEq, Eq)]
struct CorpusCache {
    sort: SortField,
    order: SortOrder,
    listings: Vec<Listing>,
    truncated: bool,
}

/// 목록 화면 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    pub page: u32,
    pub page_size: u32,
    pub sort: SortField,
    pub order: SortOrder,
    pub filters: ListingFilters,
    cache: Option<CorpusCache>,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PAGE_SIZE,
            sort: SortField::EndsAt,
            order: SortOrder::Asc,
            filters: ListingFilters::default(),
            cache: None,
        }
    }
}

impl BrowseState {
    /// 필터 변경 시 첫 페이지로 이동
    pub fn set_filters(&mut self, filters: ListingFilters) {
        if self.filters != filters {
            self.filters = filters;
            self.page = 1;
        }
    }

    /// 정렬 변경 시 캐시 무효화
    pub fn set_sort(&mut self, sort: SortField, order: SortOrder) {
        if self.sort != sort || self.order != order {
            self.sort = sort;
            self.order = order;
            self.page = 1;
            self.cache = None;
        }
    }

    pub fn go_to(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

/// 목록 조회 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseResult {
    pub listings: Vec<Listing>,
    pub page: u32,
    pub page_count: u32,
    pub has_prev: bool,
    pub has_next: bool,
    /// 최대 수집 개수 제한으로 잘린 경우
    pub truncated: bool,
}

// endregion: --- Browse State

// region:    --- Query Handlers
/// 상품 목록 조회
/// 필터가 없으면 서버 페이지네이션, 있으면 전체 수집 후 클라이언트에서 필터링
pub async fn browse_listings(
    api: &dyn AuctionApi,
    state: &mut BrowseState,
    now: DateTime<Utc>,
) -> Result<BrowseResult, ClientError> {
    if state.filters.is_active() {
        browse_filtered(api, state, now).await
    } else {
        browse_server_page(api, state).await
    }
}

async fn browse_server_page(
    api: &dyn AuctionApi,
    state: &mut BrowseState,
) -> Result<BrowseResult, ClientError> {
    info!("{:<12} --> 서버 페이지 조회 page: {}", "Query", state.page);
    let query = ListingsQuery {
        page: state.page,
        limit: state.page_size,
        sort: state.sort,
        order: state.order,
    };
    let result = api.list_listings(&query).await?;

    state.page = result.meta.current(query.page);
    Ok(BrowseResult {
        page: state.page,
        page_count: result.meta.pages(query.page),
        has_prev: !result.meta.is_first(query.page),
        has_next: !result.meta.is_last(query.page) && !result.listings.is_empty(),
        listings: result.listings,
        truncated: false,
    })
}

async fn browse_filtered(
    api: &dyn AuctionApi,
    state: &mut BrowseState,
    now: DateTime<Utc>,
) -> Result<BrowseResult, ClientError> {
    let cache_hit = state
        .cache
        .as_ref()
        .map(|c| c.sort == state.sort && c.order == state.order)
        .unwrap_or(false);

    if !cache_hit {
        let (listings, truncated) = fetch_corpus(api, state.sort, state.order).await?;
        state.cache = Some(CorpusCache {
            sort: state.sort,
            order: state.order,
            listings,
            truncated,
        });
    }

    let (corpus, truncated) = match &state.cache {
        Some(cache) => (cache.listings.clone(), cache.truncated),
        None => (Vec::new(), false),
    };
    let filtered = apply_filters(corpus, &state.filters, now);

    let page_size = state.page_size.max(1) as usize;
    let page_count = filtered.len().div_ceil(page_size).max(1) as u32;
    state.page = state.page.clamp(1, page_count);

    let start = (state.page as usize - 1) * page_size;
    let listings: Vec<Listing> = filtered.into_iter().skip(start).take(page_size).collect();
    info!(
        "{:<12} --> 필터 결과 page {}/{} ({}건)",
        "Query",
        state.page,
        page_count,
        listings.len()
    );

    Ok(BrowseResult {
        page: state.page,
        page_count,
        has_prev: state.page > 1,
        has_next: state.page < page_count,
        listings,
        truncated,
    })
}

/// 필터용 전체 목록 수집 (최대 MAX_FILTER_ITEMS)
pub async fn fetch_corpus(
    api: &dyn AuctionApi,
    sort: SortField,
    order: SortOrder,
) -> Result<(Vec<Listing>, bool), ClientError> {
    let mut listings = Vec::new();
    let mut page = 1;

    loop {
        let query = ListingsQuery {
            page,
            limit: FILTER_FETCH_PAGE_SIZE,
            sort,
            order,
        };
        let result = api.list_listings(&query).await?;
        let received = result.listings.len();
        let is_last = received == 0 || result.meta.is_last(page);
        listings.extend(result.listings);

        if listings.len() >= MAX_FILTER_ITEMS {
            let truncated = !is_last || listings.len() > MAX_FILTER_ITEMS;
            listings.truncate(MAX_FILTER_ITEMS);
            if truncated {
                warn!(
                    "{:<12} --> 필터 대상이 {}건으로 제한되어 일부 결과가 누락될 수 있습니다",
                    "Query", MAX_FILTER_ITEMS
                );
            }
            return Ok((listings, truncated));
        }
        if is_last {
            return Ok((listings, false));
        }
        page += 1;
    }
}

/// 홈 화면 인기 상품 (최신 등록순, 슬라이드 단위)
pub async fn load_trending(api: &dyn AuctionApi) -> Result<Vec<Vec<Listing>>, ClientError> {
    info!("{:<12} --> 인기 상품 조회", "Query");
    let query = ListingsQuery {
        page: 1,
        limit: TRENDING_LIMIT,
        sort: SortField::Created,
        order: SortOrder::Desc,
    };

    let (result, _) = tokio::join!(api.list_listings(&query), sleep(MIN_LOADER_DURATION));
    let listings = result?.listings;

    Ok(listings
        .chunks(CARDS_PER_SLIDE)
        .map(|slide| slide.to_vec())
        .collect())
}

// endregion: --- Query Handlers
