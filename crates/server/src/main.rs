//! Educa-rs command-line entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use educa_common::Config;
use educa_core::{CourseService, SubjectInput, SubjectService};
use educa_db::repositories::{CourseRepository, SubjectRepository};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Course catalog maintenance.
#[derive(Parser, Debug)]
#[command(name = "educa", author, version, about)]
struct Cli {
    /// Read configuration from this file instead of `config/`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending database migrations (the default).
    Migrate,
    /// List subjects.
    Subjects,
    /// Add a subject.
    AddSubject {
        /// URL-safe identifier.
        slug: String,
        /// Display title.
        title: String,
    },
    /// List courses, optionally only those under one subject.
    Courses {
        /// Subject slug to filter by.
        #[arg(short, long)]
        subject: Option<String>,
        /// Maximum number of courses to print.
        #[arg(long, default_value_t = 50)]
        limit: u64,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "educa=debug,sea_orm=info".into());

    // EDUCA_LOG_FORMAT=json switches to one JSON object per line.
    let json = std::env::var("EDUCA_LOG_FORMAT").is_ok_and(|f| f == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };

    let db = educa_db::init(&config).await?;
    info!("Connected to database");

    educa_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);
    let subjects = SubjectService::new(SubjectRepository::new(Arc::clone(&db)));
    let courses = CourseService::new(
        CourseRepository::new(Arc::clone(&db)),
        SubjectRepository::new(Arc::clone(&db)),
    );

    match cli.command.unwrap_or(Commands::Migrate) {
        Commands::Migrate => {}
        Commands::Subjects => {
            for subject in subjects.list().await? {
                println!("{}\t{}", subject.slug, subject.title);
            }
        }
        Commands::AddSubject { slug, title } => {
            let subject = subjects.create(SubjectInput { title, slug }).await?;
            println!("{}", subject.id);
        }
        Commands::Courses { subject, limit } => {
            let list = match subject {
                Some(slug) => courses.list_by_subject(&slug, limit, 0).await?,
                None => courses.list_all(limit, 0).await?,
            };
            for course in list {
                println!("{}\t{}\t{}", course.slug, course.owner_id, course.title);
            }
        }
    }

    Ok(())
}
