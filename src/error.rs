// region:    --- Imports
use crate::bidding::policy::DisabledReason;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Client Error
/// 클라이언트 오류 분류
/// 1. 검증 오류: 네트워크 호출 전에 걸러짐
/// 2. 인증 필요: 로그인 후 돌아올 경로를 포함
/// 3. 원격 오류: 서버 메시지를 그대로 전달
/// 4. 네트워크/파싱 오류
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("Please log in to continue.")]
    AuthRequired { redirect: String },

    #[error("{0}")]
    BiddingDisabled(DisabledReason),

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn is_auth_required(&self) -> bool {
        matches!(self, ClientError::AuthRequired { .. })
    }

    /// 화면에 표시할 메시지
    /// 네트워크 오류는 원인 대신 일반 문구로 대체한다.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Network(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}

// endregion: --- Client Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_use_the_generic_message() {
        let err = ClientError::Network("connection refused".to_string());
        assert_eq!(err.user_message("Could not load listings."), "Could not load listings.");
    }

    #[test]
    fn remote_errors_surface_the_server_message() {
        let err = ClientError::Remote {
            status: 400,
            message: "Bid must be higher".to_string(),
        };
        assert_eq!(err.user_message("Could not place bid."), "Bid must be higher");
        assert!(!err.is_auth_required());
    }
}
