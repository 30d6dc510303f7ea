//! 상품 수명 주기 규칙
//! 수정/삭제 가능 여부는 화면 표시용이며, 실제 권한 검사는 원격 API가 담당한다.
// region:    --- Imports
use super::model::{Listing, User};
use crate::error::ClientError;
use chrono::{DateTime, Utc};

// endregion: --- Imports

// region:    --- Manage Gate
pub const NOT_SELLER_MESSAGE: &str = "You are not allowed to edit this listing.";
pub const ENDED_MESSAGE: &str = "This listing has ended and can no longer be changed.";

/// 수정/삭제 컨트롤 노출 여부
pub fn can_manage(user: Option<&User>, listing: &Listing, now: DateTime<Utc>) -> bool {
    manage_gate(user, listing, now).is_ok()
}

/// 수정/삭제 가능 여부 검사 (거절 사유 포함)
pub fn manage_gate(
    user: Option<&User>,
    listing: &Listing,
    now: DateTime<Utc>,
) -> Result<(), ClientError> {
    let seller = listing.seller.as_ref().map(|s| s.name.as_str()).unwrap_or("");
    match user {
        Some(user) if !seller.is_empty() && user.is_named(seller) => {}
        _ => return Err(ClientError::Forbidden(NOT_SELLER_MESSAGE.to_string())),
    }
    if listing.has_ended(now) {
        return Err(ClientError::Forbidden(ENDED_MESSAGE.to_string()));
    }
    Ok(())
}

// endregion: --- Manage Gate

// region:    --- Display Helpers
/// 남은 시간 표시
pub fn time_remaining_label(ends_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (ends_at - now).num_milliseconds();
    if diff_ms <= 0 {
        return "Ended".to_string();
    }

    let hours = (diff_ms as f64 / 3_600_000.0).round() as i64;
    if hours < 24 {
        return format!("In about {} {}", hours, plural(hours, "hour"));
    }

    let days = (hours as f64 / 24.0).round() as i64;
    format!("In about {} {}", days, plural(days, "day"))
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%-d %B %Y").to_string()
}

pub fn format_date_time(date: DateTime<Utc>) -> String {
    date.format("%d %B %Y at %H:%M").to_string()
}

/// "N bid" / "N bids"
pub fn plural_bids(count: u64) -> String {
    format!("{} {}", count, plural(count as i64, "bid"))
}

fn plural(count: i64, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

// endregion: --- Display Helpers

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn listing(seller: &str, ends_at: DateTime<Utc>) -> Listing {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "title": "Chair",
            "endsAt": ends_at,
            "seller": {"name": seller}
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn seller_sees_controls_on_own_open_listing() {
        let listing = listing("Alice", now() + Duration::hours(5));
        assert!(can_manage(Some(&User::named("alice")), &listing, now()));
    }

    #[test]
    fn non_seller_and_anonymous_never_see_controls() {
        let listing = listing("alice", now() + Duration::hours(5));
        assert_eq!(
            manage_gate(Some(&User::named("bob")), &listing, now()),
            Err(ClientError::Forbidden(NOT_SELLER_MESSAGE.to_string()))
        );
        assert!(!can_manage(None, &listing, now()));
    }

    #[test]
    fn ended_listing_hides_controls_even_for_seller() {
        let listing = listing("alice", now() - Duration::minutes(1));
        assert_eq!(
            manage_gate(Some(&User::named("alice")), &listing, now()),
            Err(ClientError::Forbidden(ENDED_MESSAGE.to_string()))
        );

        let at_deadline = self::listing("alice", now());
        assert!(!can_manage(Some(&User::named("alice")), &at_deadline, now()));
    }

    #[test]
    fn time_remaining_rounds_to_hours_then_days() {
        assert_eq!(time_remaining_label(now() - Duration::seconds(1), now()), "Ended");
        assert_eq!(time_remaining_label(now() + Duration::minutes(50), now()), "In about 1 hour");
        assert_eq!(time_remaining_label(now() + Duration::hours(5), now()), "In about 5 hours");
        assert_eq!(time_remaining_label(now() + Duration::hours(30), now()), "In about 1 day");
        assert_eq!(time_remaining_label(now() + Duration::hours(80), now()), "In about 3 days");
    }

    #[test]
    fn dates_and_counts_are_formatted_for_display() {
        assert_eq!(format_date(now()), "1 March 2026");
        assert_eq!(format_date_time(now()), "01 March 2026 at 12:00");
        assert_eq!(plural_bids(1), "1 bid");
        assert_eq!(plural_bids(0), "0 bids");
    }
}
