// region:    --- Imports
use super::model::{Listing, Media};
use crate::error::ClientError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Listing Draft
/// 상품 생성/수정 요청 본문
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub media: Vec<Media>,
    pub ends_at: DateTime<Utc>,
}

// endregion: --- Listing Draft

// region:    --- Listing Form
/// 입력 폼 원본 값
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    /// 쉼표 구분
    pub tags: String,
    /// 줄바꿈 구분 URL
    pub media: String,
    pub ends_at: String,
}

impl ListingForm {
    /// 수정 폼 초기값
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            title: listing.title.clone(),
            description: listing.description.clone().unwrap_or_default(),
            tags: listing.tags.join(", "),
            media: listing
                .images()
                .iter()
                .map(|m| m.url.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            ends_at: listing.ends_at.format("%Y-%m-%dT%H:%M").to_string(),
        }
    }

    /// 폼 검증
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ListingDraft, ClientError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(invalid("Title is required."));
        }

        let ends_at_raw = self.ends_at.trim();
        if ends_at_raw.is_empty() {
            return Err(invalid("End date and time is required."));
        }

        let ends_at = parse_ends_at(ends_at_raw)
            .ok_or_else(|| invalid("Please provide a valid end date and time."))?;
        if ends_at <= now {
            return Err(invalid("End date must be in the future."));
        }

        let description = self.description.trim();
        Ok(ListingDraft {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            tags: parse_tags(&self.tags),
            media: parse_media(&self.media),
            ends_at,
        })
    }
}

fn invalid(message: &str) -> ClientError {
    ClientError::Validation(message.to_string())
}

/// RFC 3339 또는 datetime-local 형식 (UTC로 해석)
pub fn parse_ends_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_media(raw: &str) -> Vec<Media> {
    raw.lines()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(Media::new)
        .collect()
}

// endregion: --- Listing Form

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 8, 0, 0).unwrap()
    }

    fn form() -> ListingForm {
        ListingForm {
            title: "  Vintage radio ".to_string(),
            description: "   ".to_string(),
            tags: "retro, , audio ,".to_string(),
            media: "https://img/1.jpg\n\n  https://img/2.jpg  \n".to_string(),
            ends_at: "2026-05-12T18:30".to_string(),
        }
    }

    #[test]
    fn valid_form_is_normalised_into_a_draft() {
        let draft = form().validate(now()).unwrap();
        assert_eq!(draft.title, "Vintage radio");
        assert_eq!(draft.description, None);
        assert_eq!(draft.tags, vec!["retro", "audio"]);
        assert_eq!(
            draft.media,
            vec![Media::new("https://img/1.jpg"), Media::new("https://img/2.jpg")]
        );
        assert_eq!(draft.ends_at, Utc.with_ymd_and_hms(2026, 5, 12, 18, 30, 0).unwrap());

        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("description").is_none());
        assert_eq!(body["endsAt"], "2026-05-12T18:30:00Z");
    }

    #[test]
    fn each_rule_reports_its_own_message() {
        let cases = [
            (ListingForm { title: " ".into(), ..form() }, "Title is required."),
            (ListingForm { ends_at: "".into(), ..form() }, "End date and time is required."),
            (
                ListingForm { ends_at: "next tuesday".into(), ..form() },
                "Please provide a valid end date and time.",
            ),
            (
                ListingForm { ends_at: "2026-05-10T08:00".into(), ..form() },
                "End date must be in the future.",
            ),
        ];
        for (form, message) in cases {
            assert_eq!(form.validate(now()), Err(ClientError::Validation(message.to_string())));
        }
    }

    #[test]
    fn edit_form_is_prefilled_from_listing() {
        let listing: Listing = serde_json::from_value(serde_json::json!({
            "id": "9",
            "title": "Desk",
            "tags": ["wood", "office"],
            "media": [{"url": "https://img/a.jpg"}, {"url": "https://img/b.jpg"}],
            "endsAt": "2026-06-01T10:15:00Z"
        }))
        .unwrap();

        let form = ListingForm::from_listing(&listing);
        assert_eq!(form.tags, "wood, office");
        assert_eq!(form.media, "https://img/a.jpg\nhttps://img/b.jpg");
        assert_eq!(form.ends_at, "2026-06-01T10:15");
        assert_eq!(form.validate(now()).unwrap().tags, vec!["wood", "office"]);
    }
}
