// region:    --- Imports
use crate::error::ClientError;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Constants
pub const DEFAULT_API_BASE: &str = "https://v2.api.noroff.dev";
pub const API_KEY_HEADER: &str = "X-Noroff-API-Key";
const SESSION_DIR: &str = ".auction-house";
const SESSION_FILE: &str = "session.json";
const FALLBACK_SESSION_FILE: &str = ".auction-house-session.json";

// endregion: --- Constants

// region:    --- Config
/// 클라이언트 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub api_key: Option<String>,
    pub session_path: PathBuf,
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Self {
        let api_base = env::var("AUCTION_API_BASE").unwrap_or_else(|_| {
            info!("{:<12} --> AUCTION_API_BASE 미설정, 기본값 사용: {}", "Config", DEFAULT_API_BASE);
            DEFAULT_API_BASE.to_string()
        });

        let api_key = env::var("AUCTION_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!("{:<12} --> AUCTION_API_KEY 미설정: 인증이 필요한 요청은 실패합니다", "Config");
        }

        let session_path = env::var("AUCTION_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_path());

        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
            session_path,
        }
    }

    /// CLI 인자로 덮어쓰기
    pub fn with_overrides(mut self, api_base: Option<String>, session_path: Option<PathBuf>) -> Self {
        if let Some(base) = api_base {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(path) = session_path {
            self.session_path = path;
        }
        self
    }

    /// API 키 조회 (인증 요청 및 프로필 조회에 필요)
    pub fn require_api_key(&self) -> Result<&str, ClientError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ClientError::Config("AUCTION_API_KEY must be set".to_string()))
    }
}

/// 홈 디렉터리를 찾지 못하면 현재 디렉터리의 파일 사용
pub fn default_session_path() -> PathBuf {
    session_path_in(dirs::home_dir())
}

fn session_path_in(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) => home.join(SESSION_DIR).join(SESSION_FILE),
        None => {
            warn!("{:<12} --> 홈 디렉터리 확인 실패, 현재 디렉터리에 세션 저장", "Config");
            PathBuf::from(FALLBACK_SESSION_FILE)
        }
    }
}

// endregion: --- Config

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_base_and_session_path() {
        let config = Config {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            session_path: PathBuf::from("a.json"),
        }
        .with_overrides(Some("http://127.0.0.1:4000/".to_string()), Some(PathBuf::from("b.json")));

        assert_eq!(config.api_base, "http://127.0.0.1:4000");
        assert_eq!(config.session_path, PathBuf::from("b.json"));
        assert!(matches!(config.require_api_key(), Err(ClientError::Config(_))));
    }

    #[test]
    fn session_path_lives_under_home_directory() {
        let home = PathBuf::from("/home/ann");
        assert_eq!(
            session_path_in(Some(home)),
            PathBuf::from("/home/ann/.auction-house/session.json")
        );
        assert_eq!(session_path_in(None), PathBuf::from(".auction-house-session.json"));
    }
}
