use crate::auction::model::Media;
use crate::error::ClientError;
use serde::Serialize;

/// 프로필 수정 요청
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Media>,
}

impl ProfileUpdate {
    /// 빈 값은 제외, 최소 한 항목 필요
    pub fn new(
        bio: Option<&str>,
        avatar: Option<&str>,
        banner: Option<&str>,
    ) -> Result<Self, ClientError> {
        let clean = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        let update = Self {
            bio: clean(bio),
            avatar: clean(avatar).map(Media::new),
            banner: clean(banner).map(Media::new),
        };

        if update == Self::default() {
            return Err(ClientError::Validation("Nothing to update.".to_string()));
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_rejected() {
        assert_eq!(
            ProfileUpdate::new(Some("  "), None, Some("")),
            Err(ClientError::Validation("Nothing to update.".to_string()))
        );
    }

    #[test]
    fn only_provided_fields_are_sent() {
        let update = ProfileUpdate::new(None, Some("https://img/me.png"), None).unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"avatar": {"url": "https://img/me.png"}})
        );
    }
}
