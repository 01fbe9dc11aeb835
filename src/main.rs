use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use blueprint_session::api::content_dto::GraphContentDto;
use blueprint_session::api::project_dto::{ProjectDto, ProjectFileDto};
use blueprint_session::config::SessionConfig;
use blueprint_session::domain::project_service::project_service_trait::ProjectService;
use blueprint_session::domain::session::controller::EditorSession;
use blueprint_session::domain::utils::id::ProjectId;
use blueprint_session::logger;

#[derive(Debug, Parser)]
#[command(name = "blueprint-session", about = "Inspect blueprint projects through the editor session cache")]
struct Cli {
    /// JSON file with session settings.
    #[arg(long)]
    config: Option<String>,

    /// Overrides the project service base URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Use an in-memory project service seeded from this fixture instead of HTTP.
    #[arg(long)]
    offline: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the projects of the current user.
    Projects,
    /// Show every file of a project with its graph size.
    Inspect {
        /// Project id; the default project when omitted.
        #[arg(long)]
        project: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = SessionConfig::load(cli.config.as_deref()).context("failed to load session configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
        config.validate()?;
    }

    logger::init(&config.log_dir);
    let _analytics = logger::init_analytics(&config.log_dir);

    let mut session = match cli.offline.as_deref() {
        Some(fixture) => blueprint_session::offline(fixture, &config)?,
        None => blueprint_session::connect(&config)?,
    };

    match cli.command {
        Command::Projects => list_projects(&session).await,
        Command::Inspect { project } => inspect(&mut session, project).await,
    }
}

async fn list_projects(session: &EditorSession) -> anyhow::Result<()> {
    let projects = session.service().get_projects().await.context("failed to fetch projects")?;
    if projects.is_empty() {
        println!("{}", "No projects.".dimmed());
    }
    for project in projects {
        println!("{}  {}  (updated {})", project.id.to_string().bold(), project.name, project.updated_at.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}

async fn inspect(session: &mut EditorSession, project: Option<String>) -> anyhow::Result<()> {
    let project: &ProjectDto = match project {
        Some(id) => session.load_project(&ProjectId::new(id.as_str())).await.with_context(|| format!("failed to load project '{}'", id))?,
        None => session.load_default_project().await.context("failed to load the default project")?,
    };

    println!("{} {} ({} files)", "Project".bold(), project.name.cyan(), project.files.len());
    for file in &project.files {
        println!("  {}", describe(file));
    }
    Ok(())
}

fn describe(file: &ProjectFileDto) -> String {
    let head = format!("{:<32} {:<10} {}", file.name, file.file_type.as_str(), file.path.dimmed());
    if !file.file_type.is_graph() {
        return head;
    }

    let Some(content) = file.content.as_ref() else {
        return format!("{}  {}", head, "no content".yellow());
    };

    match serde_json::from_value::<GraphContentDto>(content.clone()) {
        Ok(envelope) => {
            let snapshot = envelope.snapshot();
            let dangling = snapshot.dangling_edges().len();
            let summary = format!("{} nodes, {} edges, v{}", snapshot.nodes.len(), snapshot.edges.len(), envelope.version);
            if dangling > 0 {
                format!("{}  {}  {}", head, summary.green(), format!("{} dangling edges", dangling).yellow())
            } else {
                format!("{}  {}", head, summary.green())
            }
        }
        Err(e) => format!("{}  {}", head, format!("invalid envelope: {}", e).red()),
    }
}
