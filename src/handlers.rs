//! 화면별 컨트롤러
//! 각 컨트롤러는 API를 호출하고 출력 가능한 뷰를 반환한다.
// region:    --- Imports
use crate::api::{AuctionApi, LoginRequest, ProfileUpdate, RegisterRequest};
use crate::auction::form::ListingForm;
use crate::auction::lifecycle::{
    self, format_date, format_date_time, plural_bids, time_remaining_label,
};
use crate::auction::model::{Listing, User};
use crate::bidding::commands::{handle_place_bid, BidOutcome, PlaceBidCommand};
use crate::bidding::policy::{self, BidEligibility};
use crate::error::ClientError;
use crate::query::handlers::{browse_listings, load_trending, BrowseResult, BrowseState, MAX_FILTER_ITEMS};
use crate::session::SessionStore;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Page Context
pub const LISTING_PLACEHOLDER: &str = "./assets/icons/placeholder-listing.svg";
pub const AVATAR_PLACEHOLDER: &str = "./assets/images/profile-avatar-placeholder.svg";
pub const LISTING_LOAD_FAILED: &str = "Could not load listing. Please try again later.";

/// 컨트롤러 공용 의존성
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub api: &'a dyn AuctionApi,
    pub session: &'a SessionStore,
}

/// 실패 시 화면에 표시할 문구
pub fn failure_message(err: &ClientError, fallback: &str) -> String {
    match err {
        ClientError::AuthRequired { redirect } => {
            format!("Please log in to continue. ({})", redirect)
        }
        other => other.user_message(fallback),
    }
}

// endregion: --- Page Context

// region:    --- Auth Pages
/// 회원 가입
pub async fn register(
    ctx: PageContext<'_>,
    name: &str,
    email: &str,
    password: &str,
) -> Result<String, ClientError> {
    let request = RegisterRequest::new(name, email, password)?;
    let user = ctx.api.register(&request).await.map_err(|e| match e {
        ClientError::Remote { status, message } => ClientError::Remote {
            status,
            message: format!("Registration failed: {}", message),
        },
        other => other,
    })?;
    info!("{:<12} --> 회원 가입 완료: {}", "Handler", user.name);
    Ok("Registration successful! You can now log in.".to_string())
}

/// 로그인
pub async fn login(ctx: PageContext<'_>, email: &str, password: &str) -> Result<String, ClientError> {
    if let Some(user) = ctx.session.redirect_if_authenticated() {
        info!("{:<12} --> 이미 로그인됨: {}", "Handler", user.name);
        return Ok(format!("Already logged in as {}.", user.name));
    }

    let session = ctx
        .api
        .login(&LoginRequest::new(email, password))
        .await
        .map_err(|e| match e {
            ClientError::Remote { status, message } => ClientError::Remote {
                status,
                message: format!("Login failed: {}", message),
            },
            other => other,
        })?;
    ctx.session.save(&session)?;

    let name = if session.user.name.is_empty() {
        "user"
    } else {
        session.user.name.as_str()
    };
    Ok(format!("Welcome back, {}!", name))
}

/// 로그아웃
pub fn logout(ctx: PageContext<'_>) -> Result<String, ClientError> {
    ctx.session.clear()?;
    Ok("Logged out.".to_string())
}

// endregion: --- Auth Pages

// region:    --- Navigation
/// 상단 내비게이션 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavView {
    pub username: Option<String>,
    pub credits: Option<i64>,
    pub avatar_url: Option<String>,
}

impl NavView {
    pub fn credits_label(&self) -> Option<String> {
        self.credits.map(|c| format!("{} Credits", c))
    }
}

impl fmt::Display for NavView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            None => write!(f, "Not logged in."),
            Some(name) => {
                write!(f, "Logged in as {}", name)?;
                if let Some(credits) = self.credits_label() {
                    write!(f, " | {}", credits)?;
                }
                if let Some(avatar) = &self.avatar_url {
                    write!(f, "\nAvatar: {}", avatar)?;
                }
                Ok(())
            }
        }
    }
}

/// 로그인 상태, 크레딧, 아바타 조회 (조회 실패 시에도 화면은 표시)
pub async fn nav(ctx: PageContext<'_>) -> NavView {
    let Some(session) = ctx.session.load() else {
        return NavView {
            username: None,
            credits: None,
            avatar_url: None,
        };
    };

    let mut view = NavView {
        username: Some(session.user.name.clone()),
        credits: None,
        avatar_url: None,
    };

    match ctx.api.get_profile(&session.user.name).await {
        Ok(profile) => {
            view.credits = Some(profile.credits.unwrap_or(0));
            view.avatar_url = Some(
                profile
                    .avatar
                    .as_ref()
                    .map(|a| a.url().to_string())
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| AVATAR_PLACEHOLDER.to_string()),
            );
        }
        Err(e) => error!("{:<12} --> 크레딧 조회 실패: {}", "Handler", e),
    }
    view
}

// endregion: --- Navigation

// region:    --- Listing Cards
/// 목록 카드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    pub id: String,
    pub title: String,
    pub bids_label: String,
    pub time_remaining: String,
    pub seller: String,
    pub ends_at: String,
    pub current_bid: u64,
    pub image_url: String,
}

impl ListingCard {
    pub fn new(listing: &Listing, now: DateTime<Utc>) -> Self {
        Self {
            id: listing.id.clone(),
            title: listing.display_title().to_string(),
            bids_label: plural_bids(listing.bid_count()),
            time_remaining: time_remaining_label(listing.ends_at, now),
            seller: listing.seller_name().to_string(),
            ends_at: format_date(listing.ends_at),
            current_bid: listing.highest_bid(),
            image_url: listing
                .images()
                .first()
                .map(|m| m.url.clone())
                .unwrap_or_else(|| LISTING_PLACEHOLDER.to_string()),
        }
    }
}

impl fmt::Display for ListingCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  [{}]", self.title, self.id)?;
        writeln!(f, "  Seller: {} | {} | Current bid: {}", self.seller, self.bids_label, self.current_bid)?;
        write!(f, "  Ends {} ({})", self.ends_at, self.time_remaining)
    }
}

// endregion: --- Listing Cards

// region:    --- Home Page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub slides: Vec<Vec<ListingCard>>,
}

impl fmt::Display for HomeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trending listings")?;
        if self.slides.is_empty() {
            return write!(f, "No listings found.");
        }
        for (index, slide) in self.slides.iter().enumerate() {
            writeln!(f, "\n-- {}/{} --", index + 1, self.slides.len())?;
            for card in slide {
                writeln!(f, "{}", card)?;
            }
        }
        Ok(())
    }
}

pub async fn home(ctx: PageContext<'_>, now: DateTime<Utc>) -> Result<HomeView, ClientError> {
    let slides = load_trending(ctx.api).await?;
    Ok(HomeView {
        slides: slides
            .iter()
            .map(|slide| slide.iter().map(|l| ListingCard::new(l, now)).collect())
            .collect(),
    })
}

// endregion: --- Home Page

// region:    --- Listings Page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingsView {
    pub cards: Vec<ListingCard>,
    pub page: u32,
    pub page_count: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub truncated: bool,
}

impl ListingsView {
    pub fn new(result: &BrowseResult, now: DateTime<Utc>) -> Self {
        Self {
            cards: result.listings.iter().map(|l| ListingCard::new(l, now)).collect(),
            page: result.page,
            page_count: result.page_count,
            prev_enabled: result.has_prev,
            next_enabled: result.has_next,
            truncated: result.truncated,
        }
    }

    pub fn page_info(&self) -> String {
        format!("Page {} of {}", self.page, self.page_count)
    }
}

impl fmt::Display for ListingsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cards.is_empty() {
            writeln!(f, "No listings found.")?;
        }
        for card in &self.cards {
            writeln!(f, "{}\n", card)?;
        }
        if self.truncated {
            writeln!(
                f,
                "Note: only the first {} listings were searched; some matches may be missing.",
                MAX_FILTER_ITEMS
            )?;
        }
        let prev = if self.prev_enabled { "< prev" } else { "" };
        let next = if self.next_enabled { "next >" } else { "" };
        write!(f, "{}  {}  {}", prev, self.page_info(), next)
    }
}

pub async fn listings(
    ctx: PageContext<'_>,
    state: &mut BrowseState,
    now: DateTime<Utc>,
) -> Result<ListingsView, ClientError> {
    let result = browse_listings(ctx.api, state, now).await?;
    Ok(ListingsView::new(&result, now))
}

// endregion: --- Listings Page

// region:    --- Listing Detail Page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidRow {
    pub bidder: String,
    pub date: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDetailView {
    pub id: String,
    pub title: String,
    pub image_urls: Vec<String>,
    pub seller: String,
    pub total_bids: String,
    pub highest_bid: String,
    pub ends_at: String,
    pub status: String,
    pub description: String,
    pub tags: Vec<String>,
    pub bid_history: Vec<BidRow>,
    pub bid_form: BidEligibility,
    pub can_manage: bool,
}

impl ListingDetailView {
    pub fn new(listing: &Listing, user: Option<&User>, now: DateTime<Utc>) -> Self {
        let mut image_urls: Vec<String> = listing.images().iter().map(|m| m.url.clone()).collect();
        if image_urls.is_empty() {
            image_urls.push(LISTING_PLACEHOLDER.to_string());
        }

        Self {
            id: listing.id.clone(),
            title: if listing.title.trim().is_empty() {
                "Listing".to_string()
            } else {
                listing.title.clone()
            },
            image_urls,
            seller: listing.seller_name().to_string(),
            total_bids: plural_bids(listing.bids.len() as u64),
            highest_bid: format!("{} Credits", listing.highest_bid()),
            ends_at: format_date_time(listing.ends_at),
            status: time_remaining_label(listing.ends_at, now),
            description: listing
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .unwrap_or("No description provided.")
                .to_string(),
            tags: listing.tags.clone(),
            bid_history: listing
                .bids_newest_first()
                .into_iter()
                .map(|bid| BidRow {
                    bidder: bid.bidder_display().to_string(),
                    date: bid.created.map(format_date_time).unwrap_or_else(|| "Unknown".to_string()),
                    amount: bid.amount,
                })
                .collect(),
            bid_form: policy::evaluate(listing, user, now),
            can_manage: lifecycle::can_manage(user, listing, now),
        }
    }
}

impl fmt::Display for ListingDetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  [{}]", self.title, self.id)?;
        writeln!(f, "Status: {}", self.status)?;
        for (index, url) in self.image_urls.iter().enumerate() {
            writeln!(f, "Image {}/{}: {}", index + 1, self.image_urls.len(), url)?;
        }
        writeln!(f, "Seller: {}", self.seller)?;
        writeln!(f, "Bids: {} | Highest bid: {}", self.total_bids, self.highest_bid)?;
        writeln!(f, "Ends: {}", self.ends_at)?;
        if !self.tags.is_empty() {
            writeln!(f, "Tags: {}", self.tags.join(", "))?;
        }
        writeln!(f, "\n{}\n", self.description)?;

        writeln!(f, "Bid history")?;
        if self.bid_history.is_empty() {
            writeln!(f, "  No bids yet.")?;
        }
        for row in &self.bid_history {
            writeln!(f, "  {:<20} {:>28} {:>8} Credits", row.bidder, row.date, row.amount)?;
        }

        match self.bid_form {
            BidEligibility::Open { minimum, .. } => write!(f, "\nMinimum bid: {} credits", minimum)?,
            BidEligibility::Disabled(reason) => write!(f, "\nBidding disabled: {}", reason)?,
        }
        if self.can_manage {
            write!(f, "\nYou can edit or delete this listing.")?;
        }
        Ok(())
    }
}

/// 상품 상세 (id가 없으면 종료 상태)
pub async fn listing_detail(
    ctx: PageContext<'_>,
    id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ListingDetailView, ClientError> {
    let id = id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ClientError::NotFound("Listing not found: missing listing id.".to_string()))?;

    // 서버 메시지 대신 고정 문구 표시
    let listing = ctx.api.get_listing(id).await.map_err(|e| {
        error!("{:<12} --> 상품 조회 실패: {}", "Handler", e);
        match e {
            ClientError::Remote { status, .. } => ClientError::Remote {
                status,
                message: LISTING_LOAD_FAILED.to_string(),
            },
            other => other,
        }
    })?;
    let user = ctx.session.user();
    Ok(ListingDetailView::new(&listing, user.as_ref(), now))
}

// endregion: --- Listing Detail Page

// region:    --- Bid Form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidView {
    pub outcome: BidOutcome,
}

impl fmt::Display for BidView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bid of {} credits placed.", self.outcome.amount)?;
        write!(f, "Current highest bid: {} Credits", self.outcome.listing.highest_bid())?;
        match self.outcome.eligibility {
            BidEligibility::Open { minimum, .. } => write!(f, "\nNext minimum bid: {} credits", minimum),
            BidEligibility::Disabled(reason) => write!(f, "\nBidding disabled: {}", reason),
        }
    }
}

pub async fn place_bid(
    ctx: PageContext<'_>,
    id: &str,
    amount: &str,
    now: DateTime<Utc>,
) -> Result<BidView, ClientError> {
    let session = ctx.session.require_auth(&format!("bid {} {}", id, amount))?;
    let cmd = PlaceBidCommand {
        listing_id: id.to_string(),
        amount: amount.to_string(),
    };
    let outcome = handle_place_bid(cmd, ctx.api, Some(&session.user), now).await?;
    Ok(BidView { outcome })
}

// endregion: --- Bid Form

// region:    --- Create / Edit / Delete Listing
/// 수정 시 입력된 항목만 덮어쓰기
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFormPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub media: Option<String>,
    pub ends_at: Option<String>,
}

impl ListingFormPatch {
    pub fn apply(self, form: &mut ListingForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(tags) = self.tags {
            form.tags = tags;
        }
        if let Some(media) = self.media {
            form.media = media;
        }
        if let Some(ends_at) = self.ends_at {
            form.ends_at = ends_at;
        }
    }
}

pub async fn create_listing(
    ctx: PageContext<'_>,
    form: &ListingForm,
    now: DateTime<Utc>,
) -> Result<String, ClientError> {
    ctx.session.require_auth("create")?;
    let draft = form.validate(now)?;
    let listing = ctx.api.create_listing(&draft).await?;
    info!("{:<12} --> 상품 등록 완료 id: {}", "Handler", listing.id);
    Ok(format!("Listing created successfully. (id: {})", listing.id))
}

/// 상품 조회 후 수정 가능 여부 확인
async fn load_managed_listing(
    ctx: PageContext<'_>,
    id: &str,
    return_path: &str,
    now: DateTime<Utc>,
) -> Result<Listing, ClientError> {
    let session = ctx.session.require_auth(return_path)?;
    let listing = ctx.api.get_listing(id).await?;
    lifecycle::manage_gate(Some(&session.user), &listing, now)?;
    Ok(listing)
}

pub async fn edit_listing(
    ctx: PageContext<'_>,
    id: &str,
    patch: ListingFormPatch,
    now: DateTime<Utc>,
) -> Result<String, ClientError> {
    let listing = load_managed_listing(ctx, id, &format!("edit {}", id), now).await?;

    let mut form = ListingForm::from_listing(&listing);
    patch.apply(&mut form);
    let draft = form.validate(now)?;

    ctx.api.update_listing(id, &draft).await?;
    Ok("Listing updated successfully.".to_string())
}

/// 삭제 (권한 확인 후에만 확인 요청)
pub async fn delete_listing(
    ctx: PageContext<'_>,
    id: &str,
    confirm: impl FnOnce(&Listing) -> bool,
    now: DateTime<Utc>,
) -> Result<String, ClientError> {
    let listing = load_managed_listing(ctx, id, &format!("delete {}", id), now).await?;
    if !confirm(&listing) {
        return Err(ClientError::Validation("Deletion cancelled.".to_string()));
    }
    ctx.api.delete_listing(id).await?;
    Ok("Listing deleted.".to_string())
}

// endregion: --- Create / Edit / Delete Listing

// region:    --- Profile Page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub user: User,
}

impl fmt::Display for ProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = &self.user;
        writeln!(f, "{}", user.name)?;
        if let Some(email) = &user.email {
            writeln!(f, "Email: {}", email)?;
        }
        writeln!(f, "Credits: {}", user.credits.unwrap_or(0))?;
        if let Some(count) = &user.count {
            writeln!(
                f,
                "Listings: {} | Wins: {}",
                count.listings.unwrap_or(0),
                count.wins.unwrap_or(0)
            )?;
        }
        let avatar = user.avatar.as_ref().map(|a| a.url()).unwrap_or(AVATAR_PLACEHOLDER);
        writeln!(f, "Avatar: {}", avatar)?;
        if let Some(banner) = &user.banner {
            writeln!(f, "Banner: {}", banner.url())?;
        }
        write!(f, "{}", user.bio.as_deref().unwrap_or("No bio yet."))
    }
}

/// 프로필 조회 (이름이 없으면 내 프로필)
pub async fn profile(ctx: PageContext<'_>, name: Option<&str>) -> Result<ProfileView, ClientError> {
    let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => ctx.session.require_auth("profile")?.user.name,
    };
    let user = ctx.api.get_profile(&name).await?;
    Ok(ProfileView { user })
}

/// 내 프로필 수정 후 세션 사용자 정보 갱신
pub async fn update_profile(
    ctx: PageContext<'_>,
    update: &ProfileUpdate,
) -> Result<ProfileView, ClientError> {
    let mut session = ctx.session.require_auth("profile-update")?;
    let user = ctx.api.update_profile(&session.user.name, update).await?;

    session.user.avatar = user.avatar.clone();
    session.user.banner = user.banner.clone();
    session.user.bio = user.bio.clone();
    ctx.session.save(&session)?;

    Ok(ProfileView { user })
}

// endregion: --- Profile Page
