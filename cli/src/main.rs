use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgGroup, Args, Parser, Subcommand};
use jobtrack::net::api::HttpApi;
use jobtrack::net::types::{ApplicationInput, ApplicationStatus, LoginRequest, ProfileUpdate, RegisterRequest};
use jobtrack::resources::ResourceClient;
use jobtrack::shell::ConsoleShell;
use jobtrack::storage::FileStore;
use jobtrack::{
    AccessGate, ApiError, AuthOutcome, ClientConfig, ConfigError, GateDecision, GatePolicy, Route, SessionManager,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", .0.user_message(&.0.to_string()))]
    Api(#[from] ApiError),
    #[error("{0}")]
    Auth(String),
    #[error("not signed in; run `jobtrack login` first")]
    NotSignedIn,
    #[error("no application with id {0}")]
    UnknownApplication(String),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "jobtrack", about = "Job application tracker and resume feedback CLI")]
struct Cli {
    /// Overrides `JOBTRACK_API_URL`.
    #[arg(long)]
    api_url: Option<String>,

    /// Overrides `JOBTRACK_STORE_PATH`.
    #[arg(long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "JOBTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Print the signed-in user.
    Whoami,
    /// Show what the router would do for a path.
    Open {
        path: String,
        /// Require a server-verified identity instead of token presence.
        #[arg(long, default_value_t = false)]
        verified: bool,
    },
    Apps(AppsCommand),
    Profile(ProfileCommand),
    Feedback(FeedbackArgs),
}

#[derive(Args, Debug)]
struct AppsCommand {
    #[command(subcommand)]
    command: AppsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AppsSubcommand {
    List,
    Stats,
    Add {
        #[arg(long)]
        company: String,
        #[arg(long)]
        title: String,
        /// `YYYY-MM-DD`; defaults to today.
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "Applied")]
        status: String,
        #[arg(long, default_value = "")]
        job_description: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Update {
        id: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        job_description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Delete,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("resume").required(true).args(["text", "file"])))]
struct FeedbackArgs {
    #[arg(long)]
    job_description: String,
    /// Resume as plain text.
    #[arg(long)]
    text: Option<String>,
    /// PDF or Word resume to upload.
    #[arg(long)]
    file: Option<PathBuf>,
}

struct CliContext {
    session: Arc<SessionManager>,
    resources: ResourceClient,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env(cli.api_url.as_deref(), cli.store_path)?;
    tracing::debug!(api_url = %config.api_url, store = %config.store_path.display(), "config resolved");

    let ctx = connect(&config)?;
    ctx.session.bootstrap().await;

    match cli.command {
        Command::Register { name, email, password } => {
            let outcome = ctx.session.register(RegisterRequest { name, email, password }).await;
            expect_success(outcome)
        }
        Command::Login { email, password } => {
            let outcome = ctx.session.login(LoginRequest { email, password }).await;
            expect_success(outcome)
        }
        Command::Logout => {
            ctx.session.logout();
            Ok(())
        }
        Command::Whoami => {
            let user = ctx.session.identity().ok_or(CliError::NotSignedIn)?;
            print_json(&user)
        }
        Command::Open { path, verified } => {
            let policy = if verified { GatePolicy::VerifiedIdentity } else { GatePolicy::TokenPresence };
            let decision = AccessGate::new(policy).decide(Route::from_path(&path), &ctx.session.view());
            println!("{}", describe(decision));
            Ok(())
        }
        Command::Apps(apps) => run_apps(&ctx, apps).await,
        Command::Profile(profile) => run_profile(&ctx, profile).await,
        Command::Feedback(args) => run_feedback(&ctx, args).await,
    }
}

fn connect(config: &ClientConfig) -> Result<CliContext, CliError> {
    let http = Arc::new(HttpApi::new(config.api_url.clone())?);
    let storage = Arc::new(FileStore::new(config.store_path.clone()));
    let shell = Arc::new(ConsoleShell);
    let session = Arc::new(SessionManager::new(http.clone(), storage, shell.clone(), shell.clone()));
    let resources = ResourceClient::new(http, Arc::clone(&session), shell);
    Ok(CliContext { session, resources })
}

fn expect_success(outcome: AuthOutcome) -> Result<(), CliError> {
    match outcome {
        AuthOutcome::Success => Ok(()),
        AuthOutcome::Failure { message } => Err(CliError::Auth(message)),
    }
}

fn describe(decision: GateDecision) -> String {
    match decision {
        GateDecision::Render(route) => format!("render {route}"),
        GateDecision::Redirect(route) => format!("redirect {route}"),
        GateDecision::Pending => "pending".to_owned(),
    }
}

async fn run_apps(ctx: &CliContext, apps: AppsCommand) -> Result<(), CliError> {
    match apps.command {
        AppsSubcommand::List => print_json(&ctx.resources.list_applications().await?),
        AppsSubcommand::Stats => {
            let stats = ctx.resources.application_stats().await?;
            print_json(&serde_json::json!({
                "applied": stats.applied,
                "interview": stats.interview,
                "offer": stats.offer,
                "rejected": stats.rejected,
                "total": stats.total(),
            }))
        }
        AppsSubcommand::Add { company, title, date, status, job_description, notes } => {
            let date = date.unwrap_or_else(today);
            let mut input = ApplicationInput::new(company, title, date);
            input.status = ApplicationStatus::from(status);
            input.job_description = job_description;
            input.notes = notes;
            print_json(&ctx.resources.create_application(&input).await?)
        }
        AppsSubcommand::Update { id, company, title, date, status, job_description, notes } => {
            let existing = ctx
                .resources
                .list_applications()
                .await?
                .into_iter()
                .find(|app| app.id == id)
                .ok_or_else(|| CliError::UnknownApplication(id.clone()))?;

            let mut input = ApplicationInput::from(&existing);
            if let Some(company) = company {
                input.company = company;
            }
            if let Some(title) = title {
                input.job_title = title;
            }
            if let Some(date) = date {
                input.application_date = date;
            }
            if let Some(status) = status {
                input.status = ApplicationStatus::from(status);
            }
            if let Some(job_description) = job_description {
                input.job_description = job_description;
            }
            if let Some(notes) = notes {
                input.notes = notes;
            }
            print_json(&ctx.resources.update_application(&id, &input).await?)
        }
        AppsSubcommand::Delete { id } => {
            ctx.resources.delete_application(&id).await?;
            eprintln!("deleted application {id}");
            Ok(())
        }
    }
}

async fn run_profile(ctx: &CliContext, profile: ProfileCommand) -> Result<(), CliError> {
    match profile.command {
        ProfileSubcommand::Show => print_json(&ctx.resources.profile().await?),
        ProfileSubcommand::Update { name, email } => {
            let current = ctx.resources.profile().await?;
            let update = ProfileUpdate {
                name: name.unwrap_or(current.name),
                email: email.unwrap_or(current.email),
            };
            print_json(&ctx.resources.update_profile(&update).await?)
        }
        ProfileSubcommand::Delete => {
            ctx.resources.delete_account().await?;
            Ok(())
        }
    }
}

async fn run_feedback(ctx: &CliContext, args: FeedbackArgs) -> Result<(), CliError> {
    let feedback = match (args.text, args.file) {
        (Some(text), _) => ctx.resources.resume_feedback(&text, &args.job_description).await?,
        (None, Some(path)) => ctx.resources.resume_feedback_file(&path, &args.job_description).await?,
        (None, None) => {
            return Err(ApiError::InvalidInput(jobtrack::resources::RESUME_TEXT_REQUIRED.to_owned()).into());
        }
    };
    eprintln!("match: {:.0}% ({})", feedback.match_score, feedback.band().label());
    print_json(&feedback)
}

fn today() -> String {
    time::OffsetDateTime::now_utc().date().to_string()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
