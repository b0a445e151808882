//! plib - personal library command line client
//!
//! Restores the saved session, talks to the library backend and prints the
//! dashboard.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use personal_library::{
    config::{AppConfig, LoggingConfig},
    dashboard::{DashboardView, LoadState, Navigation},
    models::{ImageChange, ImageUpload},
    session::FileSessionStore,
    ApiClient, Dashboard, Session,
};

/// Personal library client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend URL, overrides the configured one
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session
    Login {
        username: String,
        #[arg(long, env = "PLIB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long, env = "PLIB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Show who is logged in
    Whoami,
    /// List your books
    List,
    /// Add a book
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        description: Option<String>,
        /// Cover image file
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        pages_total: Option<i32>,
        #[arg(long)]
        pages_read: Option<i32>,
    },
    /// Edit a book; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replace the cover image
        #[arg(long, conflicts_with = "remove_image")]
        image: Option<PathBuf>,
        /// Remove the cover image
        #[arg(long)]
        remove_image: bool,
        #[arg(long)]
        pages_total: Option<i32>,
        #[arg(long)]
        pages_read: Option<i32>,
    },
    /// Delete a book
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Download the cover image of a book
    Cover {
        id: i64,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(url) = args.api_url.clone() {
        config.api.base_url = url;
    }

    init_tracing(&config.logging);
    tracing::debug!("plib v{} using {}", env!("CARGO_PKG_VERSION"), config.api.base());

    let store = Arc::new(FileSessionStore::new(config.session.path.clone()));
    let session = Session::restore(store)
        .await
        .context("Failed to restore session")?;
    let client = Arc::new(ApiClient::new(&config.api, session.clone())?);

    run(args.command, client, session).await
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "personal_library={level},plib={level}",
            level = logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(command: Command, client: Arc<ApiClient>, session: Session) -> anyhow::Result<ExitCode> {
    match command {
        Command::Login { username, password } => {
            match client.login(&username, &password).await {
                Ok(credentials) => {
                    session.establish(&credentials).await?;
                    println!("Logged in as {}", credentials.username);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => fail(&e.user_message()),
            }
        }
        Command::Register {
            username,
            email,
            password,
        } => match client.register(&username, &email, &password).await {
            Ok(payload) => {
                println!("Registered {}", username);
                if !payload.is_null() {
                    println!("{}", payload);
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => fail(&e.user_message()),
        },
        Command::Logout => {
            let dashboard = Dashboard::new(client, session);
            dashboard.logout().await?;
            println!("Logged out");
            Ok(ExitCode::SUCCESS)
        }
        Command::Whoami => {
            match (session.is_authenticated(), session.display_name()) {
                (true, Some(name)) => println!("{}", name),
                (true, None) => println!("User"),
                (false, _) => println!("Not logged in"),
            }
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let dashboard = Dashboard::new(client.clone(), session);
            if dashboard.mount().await == Navigation::Login {
                return fail("Not logged in. Run `plib login <username>` first.");
            }
            run_dashboard(command, &dashboard, &client).await
        }
    }
}

async fn run_dashboard(
    command: Command,
    dashboard: &Dashboard<ApiClient>,
    client: &ApiClient,
) -> anyhow::Result<ExitCode> {
    match command {
        Command::List => {}
        Command::Add {
            title,
            author,
            description,
            image,
            pages_total,
            pages_read,
        } => {
            let image = match image {
                Some(path) => ImageChange::Replace(ImageUpload::from_path(&path).await?),
                None => ImageChange::Keep,
            };
            dashboard.open_create();
            dashboard.edit_draft(|draft| {
                draft.title = title;
                draft.author = author;
                draft.description = description.unwrap_or_default();
                draft.pages_total = pages_total;
                draft.pages_read = pages_read;
                draft.image = image;
            });
            if let Ok(book) = dashboard.submit().await {
                println!("Added \"{}\" (#{})", book.title, book.id);
            }
        }
        Command::Edit {
            id,
            title,
            author,
            description,
            image,
            remove_image,
            pages_total,
            pages_read,
        } => {
            let image = match (image, remove_image) {
                (Some(path), _) => ImageChange::Replace(ImageUpload::from_path(&path).await?),
                (None, true) => ImageChange::Remove,
                (None, false) => ImageChange::Keep,
            };
            if let Err(e) = dashboard.open_edit(id) {
                return fail(&e.user_message());
            }
            dashboard.edit_draft(|draft| {
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(author) = author {
                    draft.author = author;
                }
                if let Some(description) = description {
                    draft.description = description;
                }
                if pages_total.is_some() {
                    draft.pages_total = pages_total;
                }
                if pages_read.is_some() {
                    draft.pages_read = pages_read;
                }
                draft.image = image;
            });
            if let Ok(book) = dashboard.submit().await {
                println!("Updated \"{}\" (#{})", book.title, book.id);
            }
        }
        Command::Delete { id, yes } => {
            let title = dashboard
                .view()
                .books
                .iter()
                .find(|book| book.id == id)
                .map(|book| book.title.clone());
            let Some(title) = title else {
                return fail(&format!("Book {} is not in your library", id));
            };

            dashboard.request_delete(id);
            let confirmed = yes
                || confirm(&format!("Are you sure you want to delete \"{}\"?", title)).await?;
            if !confirmed {
                dashboard.cancel_delete();
                println!("Cancelled");
                return Ok(ExitCode::SUCCESS);
            }
            if dashboard.confirm_delete().await.is_ok() {
                println!("Deleted \"{}\"", title);
            }
        }
        Command::Cover { id, output } => {
            let view = dashboard.view();
            let Some(book) = view.books.iter().find(|book| book.id == id) else {
                return fail(&format!("Book {} is not in your library", id));
            };
            let Some(image_path) = book.image_path.as_deref() else {
                return fail(&format!("\"{}\" has no cover image", book.title));
            };
            match client.fetch_image(image_path).await {
                Ok(bytes) => {
                    tokio::fs::write(&output, &bytes)
                        .await
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    println!("Saved cover of \"{}\" to {}", book.title, output.display());
                    return Ok(ExitCode::SUCCESS);
                }
                Err(e) => return fail(&e.user_message()),
            }
        }
        Command::Login { .. } | Command::Register { .. } | Command::Logout | Command::Whoami => {
            return fail("Command does not operate on the book list");
        }
    }

    let view = dashboard.view();
    render(&view, client);
    Ok(if view.message().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn confirm(question: &str) -> anyhow::Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(format!("{} [y/N] ", question).as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn fail(message: &str) -> anyhow::Result<ExitCode> {
    eprintln!("{}", message);
    Ok(ExitCode::FAILURE)
}

fn render(view: &DashboardView, client: &ApiClient) {
    println!("My Library - Welcome, {}", view.username);
    if let Some(message) = view.message() {
        eprintln!("! {}", message);
    }

    if view.load == LoadState::Loading {
        println!("Loading your books...");
        return;
    }
    if view.books.is_empty() {
        println!("No books in your library yet");
        return;
    }

    for book in &view.books {
        println!();
        println!("#{} {}", book.id, book.title);
        println!("   By {}", book.author);
        if let Some(description) = book.description.as_deref().filter(|d| !d.is_empty()) {
            println!("   {}", description);
        }
        if let (Some(progress), Some(read), Some(total)) =
            (book.progress(), book.pages_read, book.pages_total)
        {
            println!("   {}/{} pages ({:.0}%)", read, total, progress * 100.0);
        }
        if let Some(path) = book.image_path.as_deref() {
            println!("   Cover: {}", client.image_url(path));
        }
    }
}
