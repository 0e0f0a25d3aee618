mod cli;
mod render;

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use course_core::Catalog;
use services::{AppServices, Clock, CompletionOutcome, LessonFlowService, ProgressStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::{AppContext, Route, UiApp, build_app_context};

use crate::cli::{Cli, Command};
use crate::render::{progress_bar, render_page};

#[derive(Debug)]
enum ArgsError {
    InvalidDbUrl { raw: String },
    UnreadableCatalog { path: String, source: io::Error },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::UnreadableCatalog { path, source } => {
                write!(f, "cannot read catalog {path}: {source}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

struct TerminalApp {
    services: AppServices,
}

impl UiApp for TerminalApp {
    fn catalog(&self) -> Arc<Catalog> {
        self.services.catalog()
    }

    fn progress(&self) -> Arc<dyn ProgressStore> {
        self.services.progress()
    }

    fn lesson_flow(&self) -> Arc<LessonFlowService> {
        self.services.lesson_flow()
    }
}

fn init_tracing() {
    // COURSE_LOG_FORMAT=json switches to machine-readable output.
    let log_format = std::env::var("COURSE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "course=info,services=info,storage=warn".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Catalog::builtin()?);
    };
    let raw = std::fs::read_to_string(path).map_err(|source| ArgsError::UnreadableCatalog {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = Catalog::from_json(&raw)?;
    tracing::info!(path = %path.display(), lessons = catalog.lesson_count(), "loaded catalog");
    Ok(catalog)
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Open + migrate `SQLite` at startup. An unusable database is logged and the
/// session continues with progress held in memory.
async fn open_services(raw_db: &str, clock: Clock, catalog: Catalog) -> AppServices {
    let db_url = normalize_sqlite_url(raw_db);
    if let Err(err) = prepare_sqlite_file(&db_url) {
        tracing::warn!(db = %db_url, error = %err, "cannot prepare database file");
    }
    AppServices::open_sqlite(&db_url, clock, catalog).await
}

fn confirm_reset() -> io::Result<bool> {
    let mut stdout = io::stdout();
    write!(
        stdout,
        "¿Seguro que quieres borrar todo tu progreso? Esta acción no se puede deshacer. [s/N] "
    )?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    ))
}

async fn show(context: &AppContext, route: &Route) {
    print!("{}", render_page(&context.page(route).await));
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let clock = Clock::system();

    let services = if cli.in_memory {
        AppServices::in_memory(clock, catalog)
    } else {
        open_services(&cli.db, clock, catalog).await
    };

    let app: Arc<dyn UiApp> = Arc::new(TerminalApp { services });
    let context = build_app_context(&app);
    let flow = context.lesson_flow();
    let progress = context.progress();

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => show(&context, &Route::Home).await,
        Command::Open { path } => show(&context, &Route::parse(&path)).await,
        Command::Module { module_id } => show(&context, &Route::module(module_id)).await,
        Command::Lesson { lesson_id } => show(&context, &Route::lesson(lesson_id)).await,
        Command::Complete { lesson_id } => {
            match flow.mark_complete(&lesson_id).await? {
                CompletionOutcome::NewlyCompleted => println!("¡Excelente progreso! Lección completada."),
                CompletionOutcome::AlreadyCompleted => println!("Esta lección ya estaba completada."),
            }
            println!("{}", progress_bar(progress.overall_progress_percentage().await));
        }
        Command::Submit { lesson_id, answers } => {
            flow.submit_activity(&lesson_id, &answers).await?;
            println!("Respuestas guardadas. Lección completada.");
            println!("{}", progress_bar(progress.overall_progress_percentage().await));
        }
        Command::Resume => match flow.resume_target().await {
            Some(lesson_id) => show(&context, &Route::lesson(lesson_id)).await,
            None => println!("El curso no tiene lecciones."),
        },
        Command::FinalProject => show(&context, &Route::FinalProject).await,
        Command::Reset { yes } => {
            let token = progress.request_reset().await;
            if yes || confirm_reset()? {
                progress.confirm_reset(token).await?;
                println!("Progreso reiniciado.");
            } else {
                progress.cancel_reset(token).await;
                println!("Reinicio cancelado.");
            }
        }
        Command::Export => {
            let record = progress.load().await;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_explicit_urls_are_kept() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/course.sqlite3"),
            "sqlite:///tmp/course.sqlite3"
        );
    }

    #[test]
    fn bare_paths_become_absolute_urls() {
        assert_eq!(
            normalize_sqlite_url("/var/lib/course.db"),
            "sqlite:///var/lib/course.db"
        );
        let relative = normalize_sqlite_url("sqlite:data/course.db");
        assert!(relative.starts_with("sqlite:///"));
        assert!(relative.ends_with("data/course.db"));
    }

    #[test]
    fn prepare_rejects_urls_without_a_path() {
        assert!(prepare_sqlite_file("sqlite://").is_err());
        assert!(prepare_sqlite_file("postgres://x").is_err());
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let err = load_catalog(Some(Path::new("/nonexistent/course.json"))).unwrap_err();
        assert!(err.to_string().contains("cannot read catalog"));
    }

    #[tokio::test]
    async fn unusable_database_still_renders_the_dashboard() {
        // A path below a regular file can never be created.
        let db = std::env::current_exe().unwrap().join("progress.sqlite3");
        let opened =
            open_services(&db.display().to_string(), Clock::system(), load_catalog(None).unwrap())
                .await;
        let app: Arc<dyn UiApp> = Arc::new(TerminalApp { services: opened });
        let context = build_app_context(&app);

        let text = render_page(&context.page(&Route::Home).await);
        assert!(text.starts_with("Vivir su Mundo\n"));
        assert!(text.contains("0 de 8 lecciones"));
        assert_eq!(
            context.progress().persistence().await,
            services::Persistence::InMemoryOnly
        );
    }

    #[test]
    fn bundled_catalog_is_the_default() {
        let catalog = load_catalog(None).unwrap();
        assert_eq!(catalog.lesson_count(), 9);
    }
}
