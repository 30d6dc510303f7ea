//! 로그인 세션 저장소
//! {accessToken, user} 레코드 하나를 세션 파일에 보관한다. 파일이 없으면 로그아웃 상태.
// region:    --- Imports
use crate::auction::model::User;
use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Session Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

// endregion: --- Session Model

// region:    --- Session Store
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 세션 저장
    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        info!("{:<12} --> 세션 저장: user={}", "Session", session.user.name);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;
        }
        let value =
            serde_json::to_string(session).map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::write(&self.path, value).map_err(|e| ClientError::Storage(e.to_string()))
    }

    /// 세션 조회 (없거나 손상된 경우 None)
    pub fn load(&self) -> Option<Session> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("{:<12} --> 세션 파일 읽기 실패: {:?}", "Session", e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if !session.access_token.is_empty() => Some(session),
            Ok(_) => None,
            Err(e) => {
                warn!("{:<12} --> 세션 파싱 실패: {}", "Session", e);
                None
            }
        }
    }

    /// 세션 삭제
    pub fn clear(&self) -> Result<(), ClientError> {
        info!("{:<12} --> 세션 삭제", "Session");
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(e.to_string())),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.load().is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.load().map(|s| s.access_token)
    }

    pub fn user(&self) -> Option<User> {
        self.load().map(|s| s.user)
    }
}

// endregion: --- Session Store

// region:    --- Guards
impl SessionStore {
    /// 로그인 필요 화면 가드
    pub fn require_auth(&self, return_path: &str) -> Result<Session, ClientError> {
        self.load().ok_or_else(|| {
            debug!("{:<12} --> 로그인 필요: {}", "Session", return_path);
            ClientError::AuthRequired {
                redirect: login_redirect(return_path),
            }
        })
    }

    /// 로그인 상태에서 숨겨야 하는 화면 가드 (로그인된 사용자 반환)
    pub fn redirect_if_authenticated(&self) -> Option<User> {
        self.user()
    }
}

/// 로그인 후 돌아올 경로
pub fn login_redirect(return_path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(return_path.as_bytes()).collect();
    format!("login?redirect={}", encoded)
}

// endregion: --- Guards

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        (dir, store)
    }

    #[test]
    fn save_then_load_round_trips_and_clear_logs_out() {
        let (_dir, store) = store();
        let record = json!({"accessToken": "T", "user": {"name": "bob"}});
        let session: Session = serde_json::from_value(record.clone()).unwrap();

        store.save(&session).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(serde_json::to_value(&loaded).unwrap(), record);
        assert_eq!(store.access_token().as_deref(), Some("T"));

        store.clear().unwrap();
        assert_eq!(store.load(), None);
        assert!(!store.is_logged_in());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_means_logged_out() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn guard_redirects_to_login_with_return_path() {
        let (_dir, store) = store();
        assert_eq!(
            store.require_auth("bid abc 10"),
            Err(ClientError::AuthRequired {
                redirect: "login?redirect=bid+abc+10".to_string()
            })
        );
        assert_eq!(store.redirect_if_authenticated(), None);
    }
}
