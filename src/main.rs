// region:    --- Imports
use auction_house::api::{HttpAuctionApi, ProfileUpdate, SortField, SortOrder};
use auction_house::auction::form::ListingForm;
use auction_house::auction::model::Listing;
use auction_house::config::Config;
use auction_house::error::ClientError;
use auction_house::handlers::{self, failure_message, ListingFormPatch, PageContext};
use auction_house::query::filters::ListingFilters;
use auction_house::query::handlers::BrowseState;
use auction_house::session::SessionStore;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Cli
#[derive(Parser)]
#[command(name = "auction-house")]
#[command(about = "Browse, sell and bid on the auction marketplace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the API base URL
    #[arg(long, env = "AUCTION_API_BASE")]
    api_base: Option<String>,

    /// Override the session file location
    #[arg(long, env = "AUCTION_SESSION_FILE")]
    session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show login state and credits
    Whoami,
    /// Show trending listings
    Home,
    /// Browse listings
    Listings {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Search title or seller name
        #[arg(long)]
        search: Option<String>,
        /// Match tags containing this text
        #[arg(long)]
        tag: Option<String>,
        /// Only listings that have not ended
        #[arg(long)]
        active: bool,
        /// Listings ending within the next 24 hours
        #[arg(long)]
        ending_soon: bool,
        #[arg(long, value_enum, default_value_t = SortField::EndsAt)]
        sort: SortField,
        #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
        order: SortOrder,
    },
    /// Show a single listing
    Show { id: Option<String> },
    /// Place a bid on a listing
    Bid { id: String, amount: String },
    /// Create a listing
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,
        /// Image URL (repeatable)
        #[arg(long = "media")]
        media: Vec<String>,
        /// End time, e.g. 2026-12-24T18:00
        #[arg(long)]
        ends_at: String,
    },
    /// Edit one of your listings
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long = "media")]
        media: Vec<String>,
        #[arg(long)]
        ends_at: Option<String>,
    },
    /// Delete one of your listings
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show a profile (yours when no name is given)
    Profile { name: Option<String> },
    /// Update your bio, avatar or banner
    ProfileUpdate {
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        banner: Option<String>,
    },
}

// endregion: --- Cli

// region:    --- Main
#[tokio::main]
async fn main() -> ExitCode {
    // logging 초기화 (stderr)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.api_base, cli.session_file);
    info!("{:<12} --> API: {}", "Main", config.api_base);

    let session = SessionStore::new(config.session_path.clone());
    let api = HttpAuctionApi::new(config).with_token(session.access_token());
    let ctx = PageContext {
        api: &api,
        session: &session,
    };

    let now = Utc::now();
    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => report(handlers::register(ctx, &name, &email, &password).await, "Registration failed."),
        Commands::Login { email, password } => report(
            handlers::login(ctx, &email, &password).await,
            "Login failed. Please check your details.",
        ),
        Commands::Logout => report(handlers::logout(ctx), "Could not log out."),
        Commands::Whoami => report(Ok(handlers::nav(ctx).await), ""),
        Commands::Home => report(handlers::home(ctx, now).await, "Could not load listings."),
        Commands::Listings {
            page,
            search,
            tag,
            active,
            ending_soon,
            sort,
            order,
        } => {
            let mut state = BrowseState::default();
            state.set_sort(sort, order);
            state.set_filters(ListingFilters {
                search,
                tag,
                active_only: active,
                ending_soon,
            });
            state.go_to(page);
            report(
                handlers::listings(ctx, &mut state, now).await,
                "Could not load listings.",
            )
        }
        Commands::Show { id } => report(
            handlers::listing_detail(ctx, id.as_deref(), now).await,
            handlers::LISTING_LOAD_FAILED,
        ),
        Commands::Bid { id, amount } => report(
            handlers::place_bid(ctx, &id, &amount, now).await,
            "Could not place bid.",
        ),
        Commands::Create {
            title,
            description,
            tags,
            media,
            ends_at,
        } => {
            let form = ListingForm {
                title,
                description,
                tags,
                media: media.join("\n"),
                ends_at,
            };
            report(
                handlers::create_listing(ctx, &form, now).await,
                "Could not create listing. Please try again.",
            )
        }
        Commands::Edit {
            id,
            title,
            description,
            tags,
            media,
            ends_at,
        } => {
            let patch = ListingFormPatch {
                title,
                description,
                tags,
                media: (!media.is_empty()).then(|| media.join("\n")),
                ends_at,
            };
            report(
                handlers::edit_listing(ctx, &id, patch, now).await,
                "Could not update listing.",
            )
        }
        Commands::Delete { id, yes } => {
            let confirmed = |listing: &Listing| {
                yes || confirm(&format!(
                    "Are you sure you want to delete \"{}\"? This cannot be undone.",
                    listing.display_title()
                ))
            };
            report(
                handlers::delete_listing(ctx, &id, confirmed, now).await,
                "Could not delete listing.",
            )
        }
        Commands::Profile { name } => report(
            handlers::profile(ctx, name.as_deref()).await,
            "Could not load profile.",
        ),
        Commands::ProfileUpdate {
            bio,
            avatar,
            banner,
        } => {
            let result = match ProfileUpdate::new(bio.as_deref(), avatar.as_deref(), banner.as_deref()) {
                Ok(update) => handlers::update_profile(ctx, &update).await,
                Err(e) => Err(e),
            };
            report(result, "Could not update profile.")
        }
    }
}

/// 결과 출력
fn report<T: Display>(result: Result<T, ClientError>, fallback: &str) -> ExitCode {
    match result {
        Ok(view) => {
            println!("{}", view);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:<12} --> {:?}", "Main", e);
            eprintln!("{}", failure_message(&e, fallback));
            ExitCode::FAILURE
        }
    }
}

/// 확인 프롬프트
fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

// endregion: --- Main
