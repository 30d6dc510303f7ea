use crate::error::ClientError;
use serde::{Deserialize, Serialize};

/// 학생 계정 이메일 도메인
pub const STUDENT_EMAIL_DOMAIN: &str = "@stud.noroff.no";

/// 회원 가입 요청
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// 입력값 정리 및 검증
    pub fn new(name: &str, email: &str, password: &str) -> Result<Self, ClientError> {
        let name = name.trim();
        let email = email.trim();
        let password = password.trim();

        if name.is_empty() {
            return Err(ClientError::Validation("Username is required.".to_string()));
        }
        if !email.ends_with(STUDENT_EMAIL_DOMAIN) {
            return Err(ClientError::Validation(format!(
                "Email must be a valid {} address.",
                STUDENT_EMAIL_DOMAIN
            )));
        }
        if password.is_empty() {
            return Err(ClientError::Validation("Password is required.".to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// 로그인 요청
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.trim().to_string(),
        }
    }
}

/// 로그인 응답 (토큰은 최상위 또는 data 안에 위치)
#[derive(Debug, Deserialize)]
pub(crate) struct LoginEnvelope {
    pub data: serde_json::Value,
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
}

impl LoginEnvelope {
    pub fn token(&self) -> Option<String> {
        self.access_token
            .clone()
            .or_else(|| {
                self.data
                    .get("accessToken")
                    .and_then(|t| t.as_str())
                    .map(str::to_string)
            })
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_requires_student_email() {
        assert!(RegisterRequest::new("bob", "bob@stud.noroff.no", "secret123").is_ok());
        assert!(matches!(
            RegisterRequest::new("bob", "bob@gmail.com", "secret123"),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            RegisterRequest::new(" ", "bob@stud.noroff.no", "secret123"),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn login_token_is_found_at_either_level() {
        let top: LoginEnvelope =
            serde_json::from_value(json!({"data": {"name": "bob"}, "accessToken": "T1"})).unwrap();
        assert_eq!(top.token().as_deref(), Some("T1"));

        let nested: LoginEnvelope =
            serde_json::from_value(json!({"data": {"name": "bob", "accessToken": "T2"}})).unwrap();
        assert_eq!(nested.token().as_deref(), Some("T2"));

        let none: LoginEnvelope = serde_json::from_value(json!({"data": {"name": "bob"}})).unwrap();
        assert_eq!(none.token(), None);
    }
}
