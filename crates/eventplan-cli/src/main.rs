//! Eventplan CLI
//!
//! Command-line client for the event planner backend. Browse events,
//! create your own, RSVP, and keep a signed-in session between runs.

use clap::{Parser, Subcommand};
use eventplan_core::{
    ApiClient, ClientConfig, CreateEventForm, LoginForm, MemorySessionStore, RegisterForm,
    RsvpStatus, SessionContext, SessionStore, SledSessionStore,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod render;
mod views;

use render::Renderer;
use views::{Route, RsvpOutcome};

/// Eventplan - plan events, browse the lineup, and RSVP
#[derive(Parser, Debug)]
#[command(name = "eventplan")]
#[command(version, about, long_about = None)]
struct Args {
    /// Backend base URL (defaults to EVENTPLAN_API_BASE, then EVENTPLAN_BACKEND_URL)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Directory holding the saved session
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Output format: text or json
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum RsvpArg {
    Yes,
    Maybe,
    No,
}

impl From<RsvpArg> for RsvpStatus {
    fn from(arg: RsvpArg) -> Self {
        match arg {
            RsvpArg::Yes => RsvpStatus::Yes,
            RsvpArg::Maybe => RsvpStatus::Maybe,
            RsvpArg::No => RsvpStatus::No,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Landing page
    Home,

    /// List events
    Events,

    /// Show one event
    Event { id: String },

    /// Create an event (requires login)
    Create {
        #[arg(long)]
        title: Option<String>,
        /// Local date and time, e.g. 2024-01-01T10:00
        #[arg(long)]
        date_time: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// RSVP to an event (requires login)
    Rsvp { id: String, status: RsvpArg },

    /// Sign in
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "EVENTPLAN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Path to continue to afterwards, e.g. /events/42
        #[arg(long)]
        next: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "EVENTPLAN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,
}

impl Args {
    fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(base) = &self.api_base {
            config = config.with_base_url(base.clone());
        }
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        config
    }
}

/// Open the durable store, degrading to memory when it is unavailable
fn open_store(config: &ClientConfig) -> Arc<dyn SessionStore> {
    let path = config.session_db_path();
    match SledSessionStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(
                "Session store at {} unavailable, session will not persist: {}",
                path.display(),
                e
            );
            Arc::new(MemorySessionStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let renderer = Renderer::new(matches!(args.format, OutputFormat::Json));

    let config = args.config();
    let client = match ApiClient::new(&config, open_store(&config)) {
        Ok(client) => client,
        Err(e) => {
            renderer.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("Using backend {}", client.base_url());

    let ctx = SessionContext::hydrate(client);

    match run(&ctx, &renderer, args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            renderer.error(&message);
            ExitCode::FAILURE
        }
    }
}

async fn run(ctx: &SessionContext, renderer: &Renderer, command: Command) -> Result<(), String> {
    match command {
        Command::Home => navigate(ctx, renderer, Route::Home).await,
        Command::Events => navigate(ctx, renderer, Route::Events).await,
        Command::Event { id } => navigate(ctx, renderer, Route::EventDetails(id)).await,
        Command::Create {
            title,
            date_time,
            location,
            description,
        } => {
            let form = CreateEventForm {
                title: title.unwrap_or_default(),
                date_time: date_time.unwrap_or_default(),
                location: location.unwrap_or_default(),
                description: description.unwrap_or_default(),
            };
            let route = views::create_event(ctx, &form).await?;
            navigate(ctx, renderer, route).await
        }
        Command::Rsvp { id, status } => match views::rsvp(ctx, &id, status.into()).await? {
            RsvpOutcome::Redirect(route) => navigate(ctx, renderer, route).await,
            RsvpOutcome::Saved { message, event } => {
                renderer.notice(&message);
                let event = event.map_err(retry_hint)?;
                renderer.event(event.as_ref());
                Ok(())
            }
        },
        Command::Login {
            email,
            password,
            next,
        } => {
            let form = LoginForm {
                email: email.unwrap_or_default(),
                password: password.unwrap_or_default(),
            };
            let route = views::login(ctx, &form, next.as_deref()).await?;
            navigate(ctx, renderer, route).await
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let form = RegisterForm {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
                password: password.unwrap_or_default(),
            };
            let route = views::register(ctx, &form).await?;
            navigate(ctx, renderer, route).await
        }
        Command::Logout => {
            let route = views::logout(ctx);
            renderer.notice("Signed out.");
            navigate(ctx, renderer, route).await
        }
        Command::Whoami => {
            if !ctx.is_authenticated() {
                return navigate(ctx, renderer, Route::Login {
                    next: "/".to_string(),
                })
                .await;
            }
            let remote = views::whoami(ctx).await?;
            renderer.profile(&ctx.session(), &remote);
            Ok(())
        }
    }
}

/// Show the view behind `route`
async fn navigate(ctx: &SessionContext, renderer: &Renderer, route: Route) -> Result<(), String> {
    renderer.navigated(&route);
    match route {
        Route::Home => {
            renderer.home(&ctx.session());
            Ok(())
        }
        Route::Events => {
            let events = views::load_events(ctx.client()).await.map_err(retry_hint)?;
            renderer.events(&events);
            Ok(())
        }
        Route::EventDetails(id) => {
            let event = views::load_event(ctx.client(), &id)
                .await
                .map_err(retry_hint)?;
            renderer.event(event.as_ref());
            Ok(())
        }
        Route::Login { next } => Err(format!(
            "Login required. Sign in with: eventplan login --email <email> --next {next}"
        )),
        Route::Register => Err("Create an account with: eventplan register".to_string()),
    }
}

fn retry_hint(message: String) -> String {
    format!("{message} (run the command again to retry)")
}
