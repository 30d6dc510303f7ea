//! 입찰 가능 여부 및 최소 입찰가 규칙
//! 서버가 최종 판단하며, 여기서는 네트워크 호출 전에 걸러낼 수 있는 것만 검사한다.
// region:    --- Imports
use crate::auction::model::{Bid, Listing, User};
use crate::error::ClientError;
use chrono::{DateTime, Utc};
use std::fmt;

// endregion: --- Imports

// region:    --- Eligibility
/// 입찰 불가 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledReason {
    NotAuthenticated,
    OwnListing,
    Ended,
}

impl fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DisabledReason::NotAuthenticated => "Log in to place a bid.",
            DisabledReason::OwnListing => "You cannot bid on your own listing.",
            DisabledReason::Ended => "This auction has ended.",
        };
        f.write_str(message)
    }
}

/// 입찰 폼 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidEligibility {
    Open { highest: u64, minimum: u64 },
    Disabled(DisabledReason),
}

impl BidEligibility {
    pub fn is_open(&self) -> bool {
        matches!(self, BidEligibility::Open { .. })
    }
}

/// 최고 입찰가 (입찰이 없으면 0)
pub fn highest_bid(bids: &[Bid]) -> u64 {
    bids.iter().map(|b| b.amount).max().unwrap_or(0)
}

/// 최소 입찰가
pub fn minimum_bid(highest: u64) -> u64 {
    if highest > 0 {
        highest + 1
    } else {
        1
    }
}

/// 입찰 가능 여부 평가
pub fn evaluate(listing: &Listing, user: Option<&User>, now: DateTime<Utc>) -> BidEligibility {
    let Some(user) = user else {
        return BidEligibility::Disabled(DisabledReason::NotAuthenticated);
    };

    let is_seller = listing
        .seller
        .as_ref()
        .map(|seller| user.is_named(&seller.name))
        .unwrap_or(false);
    if is_seller {
        return BidEligibility::Disabled(DisabledReason::OwnListing);
    }

    if listing.has_ended(now) {
        return BidEligibility::Disabled(DisabledReason::Ended);
    }

    let highest = listing.highest_bid();
    BidEligibility::Open {
        highest,
        minimum: minimum_bid(highest),
    }
}

// endregion: --- Eligibility

// region:    --- Amount Validation
/// 입력 금액 검증 (양의 정수, 최소 입찰가 이상)
pub fn parse_amount(raw: &str, minimum: u64) -> Result<u64, ClientError> {
    let amount = raw
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|amount| *amount > 0)
        .ok_or_else(|| ClientError::Validation("Please enter a whole number of credits.".to_string()))?;

    if amount < minimum {
        return Err(ClientError::Validation(format!(
            "Your bid must be at least {} credits.",
            minimum
        )));
    }
    Ok(amount)
}

// endregion: --- Amount Validation

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn listing(id: &str, seller: &str, amounts: &[u64], ends_in: Duration) -> Listing {
        let bids: Vec<_> = amounts.iter().map(|a| json!({"amount": a})).collect();
        serde_json::from_value(json!({
            "id": id,
            "title": "Item",
            "endsAt": Utc::now() + ends_in,
            "seller": {"name": seller},
            "bids": bids
        }))
        .unwrap()
    }

    #[test]
    fn highest_is_zero_without_bids_and_max_otherwise() {
        assert_eq!(highest_bid(&[]), 0);
        let listing = listing("1", "ann", &[3, 11, 7], Duration::hours(1));
        assert_eq!(highest_bid(&listing.bids), 11);
        assert_eq!(minimum_bid(11), 12);
        assert_eq!(minimum_bid(0), 1);
    }

    #[test]
    fn minimum_follows_the_current_price_per_listing() {
        let listings = [
            listing("1", "ann", &[5], Duration::hours(1)),
            listing("2", "ann", &[], Duration::hours(1)),
        ];
        let bob = User::named("bob");
        let minimums: Vec<_> = listings
            .iter()
            .map(|l| match evaluate(l, Some(&bob), Utc::now()) {
                BidEligibility::Open { minimum, .. } => minimum,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(minimums, vec![6, 1]);
    }

    #[test]
    fn disabled_reasons_are_specific() {
        let open = listing("1", "Ann", &[], Duration::hours(1));
        let ended = listing("2", "ann", &[4], -Duration::minutes(5));
        let now = Utc::now();

        assert_eq!(
            evaluate(&open, None, now),
            BidEligibility::Disabled(DisabledReason::NotAuthenticated)
        );
        assert_eq!(
            evaluate(&open, Some(&User::named("ann")), now),
            BidEligibility::Disabled(DisabledReason::OwnListing)
        );
        assert_eq!(
            evaluate(&ended, Some(&User::named("bob")), now),
            BidEligibility::Disabled(DisabledReason::Ended)
        );
    }

    #[test]
    fn amount_below_minimum_is_rejected_and_equal_is_accepted() {
        assert_eq!(parse_amount("6", 6), Ok(6));
        assert_eq!(parse_amount(" 10 ", 6), Ok(10));
        assert_eq!(
            parse_amount("5", 6),
            Err(ClientError::Validation("Your bid must be at least 6 credits.".to_string()))
        );
        for raw in ["0", "-3", "2.5", "abc", ""] {
            assert_eq!(
                parse_amount(raw, 1),
                Err(ClientError::Validation("Please enter a whole number of credits.".to_string()))
            );
        }
    }
}
