//! 원격 경매 REST API 클라이언트
// region:    --- Imports
use crate::auction::form::ListingDraft;
use crate::auction::model::{Listing, ListingsPage, PageMeta, User};
use crate::config::{Config, API_KEY_HEADER};
use crate::error::ClientError;
use crate::session::Session;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

// endregion: --- Imports

// region:    --- Modules
pub mod auth;
pub mod listings;
pub mod profiles;

pub use auth::{LoginRequest, RegisterRequest};
pub use listings::{BidRequest, ListingsQuery, SortField, SortOrder};
pub use profiles::ProfileUpdate;

// endregion: --- Modules

// region:    --- Wire Model
/// 응답 공통 봉투
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
    #[serde(default)]
    meta: Option<PageMeta>,
}

/// 오류 응답 본문 {errors:[{message}]}
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    message: Option<String>,
}

/// 오류 응답에서 메시지 추출 (없으면 고정 문구)
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.errors.into_iter().next())
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

// endregion: --- Wire Model

// region:    --- Auction Api Trait
/// 경매 API 트레이트
#[async_trait]
pub trait AuctionApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<User, ClientError>;
    async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError>;
    async fn list_listings(&self, query: &ListingsQuery) -> Result<ListingsPage, ClientError>;
    async fn get_listing(&self, id: &str) -> Result<Listing, ClientError>;
    async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing, ClientError>;
    async fn update_listing(&self, id: &str, draft: &ListingDraft) -> Result<Listing, ClientError>;
    async fn delete_listing(&self, id: &str) -> Result<(), ClientError>;
    async fn place_bid(&self, id: &str, amount: u64) -> Result<(), ClientError>;
    async fn get_profile(&self, name: &str) -> Result<User, ClientError>;
    async fn update_profile(&self, name: &str, update: &ProfileUpdate) -> Result<User, ClientError>;
}

// endregion: --- Auction Api Trait

// region:    --- Http Auction Api
/// 요청 인증 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// 토큰/API 키가 있으면 첨부
    Public,
    /// API 키 필수, 토큰은 있으면 첨부
    ApiKey,
    /// 토큰과 API 키 필수
    Authenticated,
}

/// reqwest 기반 구현체
#[derive(Debug, Clone)]
pub struct HttpAuctionApi {
    client: Client,
    config: Config,
    token: Option<String>,
}

impl HttpAuctionApi {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// 경로 세그먼트는 개별적으로 인코딩
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| ClientError::Config(format!("invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("API base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 요청 생성 (헤더 설정)
    fn request(&self, method: Method, url: Url, access: Access) -> Result<RequestBuilder, ClientError> {
        let mut builder = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        match access {
            Access::Authenticated => {
                let token = self.token.as_deref().ok_or_else(|| ClientError::AuthRequired {
                    redirect: "login".to_string(),
                })?;
                let api_key = self.config.require_api_key()?;
                builder = builder.bearer_auth(token).header(API_KEY_HEADER, api_key);
            }
            Access::ApiKey => {
                let api_key = self.config.require_api_key()?;
                if let Some(token) = self.token.as_deref() {
                    builder = builder.bearer_auth(token);
                }
                builder = builder.header(API_KEY_HEADER, api_key);
            }
            Access::Public => {
                if let Some(token) = self.token.as_deref() {
                    builder = builder.bearer_auth(token);
                }
                if let Some(api_key) = self.config.api_key.as_deref() {
                    builder = builder.header(API_KEY_HEADER, api_key);
                }
            }
        }
        Ok(builder)
    }

    /// 요청 전송 및 상태 코드 검사
    async fn execute(&self, builder: RequestBuilder, fallback: &str) -> Result<Response, ClientError> {
        let response = builder.send().await.map_err(|e| {
            error!("{:<12} --> 요청 실패: {}", "Api", e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!("{:<12} --> 응답 상태: {} {}", "Api", status, response.url());
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body, fallback);
        error!("{:<12} --> API 오류: status={}, message={}", "Api", status, message);
        Err(ClientError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    /// 응답 본문 파싱
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = self.execute(builder, fallback).await?;
        response.json::<T>().await.map_err(|e| {
            error!("{:<12} --> 응답 파싱 실패: {}", "Api", e);
            ClientError::Network(e.to_string())
        })
    }
}

#[async_trait]
impl AuctionApi for HttpAuctionApi {
    async fn register(&self, request: &RegisterRequest) -> Result<User, ClientError> {
        info!("{:<12} --> 회원 가입: {}", "Api", request.name);
        let url = self.endpoint(&["auth", "register"])?;
        let builder = self.request(Method::POST, url, Access::Public)?.json(request);
        let envelope: Envelope<User> = self.send_json(builder, "Something went wrong").await?;
        Ok(envelope.data)
    }

    async fn login(&self, request: &LoginRequest) -> Result<Session, ClientError> {
        info!("{:<12} --> 로그인: {}", "Api", request.email);
        let url = self.endpoint(&["auth", "login"])?;
        let builder = self.request(Method::POST, url, Access::Public)?.json(request);
        let envelope: auth::LoginEnvelope = self.send_json(builder, "Something went wrong").await?;

        let access_token = envelope.token().ok_or_else(|| ClientError::Remote {
            status: 200,
            message: "No access token returned from server.".to_string(),
        })?;
        let user: User = serde_json::from_value(envelope.data)
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Session { access_token, user })
    }

    async fn list_listings(&self, query: &ListingsQuery) -> Result<ListingsPage, ClientError> {
        info!(
            "{:<12} --> 상품 목록 조회: page={}, limit={}, sort={} {}",
            "Api", query.page, query.limit, query.sort, query.order
        );
        let url = self.endpoint(&["auction", "listings"])?;
        let builder = self
            .request(Method::GET, url, Access::Public)?
            .query(&query.params());
        let envelope: Envelope<Vec<Listing>> =
            self.send_json(builder, "Failed to fetch listings").await?;

        Ok(ListingsPage {
            listings: envelope.data,
            meta: envelope.meta.unwrap_or_else(|| PageMeta::single(query.page)),
        })
    }

    async fn get_listing(&self, id: &str) -> Result<Listing, ClientError> {
        info!("{:<12} --> 상품 조회 id: {}", "Api", id);
        let url = self.endpoint(&["auction", "listings", id])?;
        let builder = self
            .request(Method::GET, url, Access::Public)?
            .query(&[("_seller", "true"), ("_bids", "true")]);
        let envelope: Envelope<Listing> = self.send_json(builder, "Failed to fetch listing").await?;
        Ok(envelope.data)
    }

    async fn create_listing(&self, draft: &ListingDraft) -> Result<Listing, ClientError> {
        info!("{:<12} --> 상품 등록: {}", "Api", draft.title);
        let url = self.endpoint(&["auction", "listings"])?;
        let builder = self.request(Method::POST, url, Access::Authenticated)?.json(draft);
        let envelope: Envelope<Listing> = self
            .send_json(builder, "Could not create listing. Please try again.")
            .await?;
        Ok(envelope.data)
    }

    async fn update_listing(&self, id: &str, draft: &ListingDraft) -> Result<Listing, ClientError> {
        info!("{:<12} --> 상품 수정 id: {}", "Api", id);
        let url = self.endpoint(&["auction", "listings", id])?;
        let builder = self.request(Method::PUT, url, Access::Authenticated)?.json(draft);
        let envelope: Envelope<Listing> = self.send_json(builder, "Could not update listing.").await?;
        Ok(envelope.data)
    }

    async fn delete_listing(&self, id: &str) -> Result<(), ClientError> {
        info!("{:<12} --> 상품 삭제 id: {}", "Api", id);
        let url = self.endpoint(&["auction", "listings", id])?;
        let builder = self.request(Method::DELETE, url, Access::Authenticated)?;
        self.execute(builder, "Could not delete listing.").await?;
        Ok(())
    }

    async fn place_bid(&self, id: &str, amount: u64) -> Result<(), ClientError> {
        info!("{:<12} --> 입찰 요청 id: {}, amount: {}", "Api", id, amount);
        let url = self.endpoint(&["auction", "listings", id, "bids"])?;
        let builder = self
            .request(Method::POST, url, Access::Authenticated)?
            .json(&BidRequest { amount });
        self.execute(builder, "Could not place bid.").await?;
        Ok(())
    }

    async fn get_profile(&self, name: &str) -> Result<User, ClientError> {
        info!("{:<12} --> 프로필 조회: {}", "Api", name);
        let url = self.endpoint(&["auction", "profiles", name])?;
        let builder = self
            .request(Method::GET, url, Access::ApiKey)?
            .query(&[("_listings", "false")]);
        let envelope: Envelope<User> = self.send_json(builder, "Failed to load profile").await?;
        Ok(envelope.data)
    }

    async fn update_profile(&self, name: &str, update: &ProfileUpdate) -> Result<User, ClientError> {
        info!("{:<12} --> 프로필 수정: {}", "Api", name);
        let url = self.endpoint(&["auction", "profiles", name])?;
        let builder = self.request(Method::PUT, url, Access::Authenticated)?.json(update);
        let envelope: Envelope<User> = self.send_json(builder, "Could not update profile.").await?;
        Ok(envelope.data)
    }
}

// endregion: --- Http Auction Api

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn api(base: &str) -> HttpAuctionApi {
        HttpAuctionApi::new(Config {
            api_base: base.to_string(),
            api_key: None,
            session_path: PathBuf::from("unused.json"),
        })
    }

    #[test]
    fn error_message_prefers_first_server_message() {
        let body = r#"{"errors":[{"message":"Title is too long"},{"message":"other"}]}"#;
        assert_eq!(error_message(body, "fallback"), "Title is too long");
        assert_eq!(error_message(r#"{"errors":[]}"#, "fallback"), "fallback");
        assert_eq!(error_message("<html>bad gateway</html>", "fallback"), "fallback");
    }

    #[test]
    fn path_segments_are_encoded() {
        let url = api("http://localhost:9000/").endpoint(&["auction", "profiles", "ann lee/x"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/auction/profiles/ann%20lee%2Fx");
    }

    #[test]
    fn authenticated_requests_need_a_token_before_any_call() {
        let url = Url::parse("http://localhost:9000/auction/listings").unwrap();
        let err = api("http://localhost:9000")
            .request(Method::POST, url, Access::Authenticated)
            .unwrap_err();
        assert!(err.is_auth_required());
    }

    #[tokio::test]
    async fn profile_reads_need_an_api_key() {
        let err = api("http://127.0.0.1:9").get_profile("bob").await.unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        let url = Url::parse("http://localhost:9000/auction/profiles/bob").unwrap();
        let keyed = HttpAuctionApi::new(Config {
            api_key: Some("K".to_string()),
            ..api("http://localhost:9000").config
        });
        let request = keyed.request(Method::GET, url, Access::ApiKey).unwrap().build().unwrap();
        assert_eq!(request.headers()[API_KEY_HEADER], "K");
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}
