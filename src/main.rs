// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HSKH command-line client.
//!
//! Signs in against the profile backend, keeps the session in a local
//! storage file and exposes the researcher-facing operations.

use clap::{Parser, Subcommand};
use hskh_portal::{
    config::Config,
    error::Result,
    models::{format_file_size, ArticleQuery, ArticleStatus, DocumentUpload, UploadFile},
    routes::{self, GuardDecision},
    services::{Credentials, RegisterRequest},
    Portal,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hskh")]
#[command(about = "Hồ sơ khoa học client", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login { email: String, password: String },

    /// Sign out and clear the stored session
    Logout,

    /// Create a new account
    Register {
        email: String,
        password: String,
        full_name: String,
    },

    /// Show the signed-in user
    Whoami,

    /// Show the academic profile
    Profile {
        /// Skip the local cache
        #[arg(long)]
        refresh: bool,
    },

    /// Show profile completion status
    Completion,

    /// Manage scientific articles
    Articles {
        #[command(subcommand)]
        command: ArticleCommands,
    },

    /// Upload a new avatar image
    UploadAvatar { path: PathBuf },

    /// Upload a supporting document for a work
    UploadDocument {
        work_id: i64,
        document_type: String,
        path: PathBuf,
    },

    /// List fields of study
    Fields,

    /// Show where navigating to a screen would lead
    Route { path: String },
}

#[derive(Subcommand)]
enum ArticleCommands {
    List {
        /// pending, verified_auto, verified_manual or rejected
        #[arg(long)]
        status: Option<ArticleStatus>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    Get {
        id: i64,
    },
    Delete {
        id: i64,
    },
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(api = %config.api_base_url, storage = %config.storage_path.display(), "Configuration loaded");

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: Config) -> Result<()> {
    let portal = Portal::open(config)?;

    match command {
        Commands::Login { email, password } => {
            let user = portal.login(&Credentials::new(email, password)).await?;
            println!("Đăng nhập thành công: {} ({})", user.display_name(), user.role);
            println!("→ {}", portal.location().path);
        }
        Commands::Logout => {
            portal.logout().await;
            println!("Đã đăng xuất");
        }
        Commands::Register {
            email,
            password,
            full_name,
        } => {
            let request = RegisterRequest {
                email: email.trim().to_string(),
                password,
                full_name: full_name.trim().to_string(),
            };
            portal.auth.service().register(&request).await?;
            println!("Đăng ký thành công. Vui lòng đăng nhập.");
        }
        Commands::Whoami => match portal.auth.current_user() {
            Some(user) => {
                println!("[{}] {} <{}>", user.initials(), user.display_name(), user.email);
                println!("Vai trò: {}", user.role);
                for item in routes::menu_for(user.role) {
                    println!("  {:<32} {}", item.label, item.path);
                }
            }
            None => println!("Chưa đăng nhập"),
        },
        Commands::Profile { refresh } => {
            let profile = portal.profile.fetch(refresh).await;
            match (profile, portal.profile.snapshot().error) {
                (Some(profile), _) => {
                    println!("{}", serde_json::to_string_pretty(&profile).map_err(anyhow::Error::from)?);
                }
                (None, Some(error)) => println!("{}", error),
                (None, None) => println!("Không có hồ sơ cho phiên hiện tại"),
            }
        }
        Commands::Completion => {
            let status = portal.profiles.completion_status().await?;
            println!("Hoàn thành: {:.0}%", status.completion_percentage);
            if status.is_first_time {
                println!("Lần đầu đăng nhập: cần hoàn thiện hồ sơ");
            }
            if !status.missing_fields.is_empty() {
                println!("Còn thiếu: {}", status.missing_fields.join(", "));
            }
            if !status.next_step.is_empty() {
                println!("Bước tiếp theo: {}", status.next_step);
            }
        }
        Commands::Articles { command } => run_articles(&portal, command).await?,
        Commands::UploadAvatar { path } => {
            let file = UploadFile::from_path(&path)?;
            let profile = portal.upload_avatar(&file).await?;
            println!("Đã cập nhật ảnh đại diện: {}", profile.avatar().unwrap_or("-"));
        }
        Commands::UploadDocument {
            work_id,
            document_type,
            path,
        } => {
            let upload = DocumentUpload {
                work_id,
                document_type,
                file: UploadFile::from_path(&path)?,
            };
            let size = format_file_size(upload.file.size() as u64);
            let result = portal.documents.upload(&upload).await?;
            println!("{} ({}) {}", upload.file.file_name, size, result.message);
        }
        Commands::Fields => {
            for field in portal.fields.list().await? {
                println!("{:>4}  {}", field.id, field.name);
            }
        }
        Commands::Route { path } => match portal.navigate(&path) {
            GuardDecision::Loading => println!("{}: đang tải", path),
            GuardDecision::Render => println!("{}: hiển thị", path),
            GuardDecision::Redirect(redirect) => match redirect.from {
                Some(from) => println!("{} → {} (quay lại {})", path, redirect.to, from),
                None => println!("{} → {}", path, redirect.to),
            },
        },
    }
    Ok(())
}

async fn run_articles(portal: &Portal, command: ArticleCommands) -> Result<()> {
    match command {
        ArticleCommands::List {
            status,
            limit,
            offset,
        } => {
            let list = portal
                .articles
                .list(&ArticleQuery {
                    status,
                    limit,
                    offset,
                })
                .await?;
            for article in &list.articles {
                println!(
                    "{:>5}  {:<24} {}  ({})",
                    article.id,
                    article.status.label(),
                    article.title,
                    article.journal_name
                );
            }
            println!("Tổng: {}", list.total);
        }
        ArticleCommands::Get { id } => {
            let article = portal.articles.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&article).map_err(anyhow::Error::from)?);
        }
        ArticleCommands::Delete { id } => {
            portal.articles.delete(id).await?;
            println!("Đã xóa bài báo {}", id);
        }
        ArticleCommands::Stats => {
            let stats = portal.articles.stats().await?;
            println!("Tổng số bài báo: {}", stats.summary.total_articles);
            println!("Tổng điểm: {:.2}", stats.summary.total_points);
            println!("Tác giả chính: {}", stats.summary.main_author_count);
            for status in [
                ArticleStatus::Pending,
                ArticleStatus::VerifiedAuto,
                ArticleStatus::VerifiedManual,
                ArticleStatus::Rejected,
            ] {
                println!("  {:<24} {}", status.label(), stats.count_for(status));
            }
        }
    }
    Ok(())
}

/// Initialize logging to stderr: JSON when `HSKH_LOG_JSON=1`, compact otherwise.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hskh_portal=debug,info"));
    let json = std::env::var("HSKH_LOG_JSON").is_ok_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
