//! 입찰 관련 커맨드 처리
//! 1. 상품 조회 후 입찰 가능 여부 확인
//! 2. 금액 로컬 검증 (실패 시 네트워크 호출 없음)
//! 3. 입찰 요청 후 상품 재조회
// region:    --- Imports
use super::policy::{self, BidEligibility};
use crate::api::AuctionApi;
use crate::auction::model::{Listing, User};
use crate::error::ClientError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: String,
    /// 사용자가 입력한 그대로의 금액
    pub amount: String,
}

/// 입찰 결과 (재조회한 상품과 갱신된 입찰 가능 상태)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidOutcome {
    pub amount: u64,
    pub listing: Listing,
    pub eligibility: BidEligibility,
}

/// 표시 중인 상품 기준 금액 검증
pub fn validate_bid(
    listing: &Listing,
    user: Option<&User>,
    raw_amount: &str,
    now: DateTime<Utc>,
) -> Result<u64, ClientError> {
    match policy::evaluate(listing, user, now) {
        BidEligibility::Disabled(reason) => Err(ClientError::BiddingDisabled(reason)),
        BidEligibility::Open { minimum, .. } => policy::parse_amount(raw_amount, minimum),
    }
}

/// 입찰
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    api: &dyn AuctionApi,
    user: Option<&User>,
    now: DateTime<Utc>,
) -> Result<BidOutcome, ClientError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    let listing = api.get_listing(&cmd.listing_id).await?;

    let amount = validate_bid(&listing, user, &cmd.amount, now).map_err(|e| {
        warn!("{:<12} --> 입찰 거부 (로컬): {}", "Command", e);
        e
    })?;

    // 서버 오류 메시지는 그대로 전달
    api.place_bid(&cmd.listing_id, amount).await?;

    // 다른 입찰자와의 경합을 반영하기 위해 전체 재조회
    let listing = api.get_listing(&cmd.listing_id).await?;
    let eligibility = policy::evaluate(&listing, user, now);
    info!(
        "{:<12} --> 입찰 성공: amount={}, 현재 최고가 {}",
        "Command",
        amount,
        listing.highest_bid()
    );

    Ok(BidOutcome {
        amount,
        listing,
        eligibility,
    })
}

// endregion: --- Commands
