use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roc_support::{
    config::Config,
    db::{sql::FieldSet, EmergencyResourceRepository, MedicalIssueRepository},
    state::{create_db_pool, run_migrations},
};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Parser)]
#[command(
    name = "roc-admin",
    about = "ROC Support operator tool: migrations and reference data",
    version,
    arg_required_else_help = true
)]
struct Cli {
    /// Pretty-print JSON output.
    #[arg(short, long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version information.
    Version,

    /// Apply pending database migrations.
    Migrate,

    /// Manage the medical issue catalogue.
    Issues {
        #[command(subcommand)]
        command: IssueCommands,
    },

    /// Manage emergency resources.
    Resources {
        #[command(subcommand)]
        command: ResourceCommands,
    },
}

#[derive(Subcommand)]
enum IssueCommands {
    /// List all medical issues.
    List,
    /// Add a medical issue.
    Add {
        /// Issue name (unique, case-insensitive).
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change the name and/or description of an issue.
    Update {
        id: i32,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Clear the description.
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
    },
    /// Remove a medical issue and its provider associations.
    Remove { id: i32 },
}

#[derive(Subcommand)]
enum ResourceCommands {
    /// List emergency resources.
    List,
    /// Add an emergency resource.
    Add {
        name: String,
        phone: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Link the resource to a medical issue.
        #[arg(short, long)]
        issue_id: Option<i32>,
    },
    /// Change fields of an emergency resource.
    Update {
        id: i32,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        issue_id: Option<i32>,
    },
    /// Remove an emergency resource.
    Remove { id: i32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let pretty = cli.pretty;

    match cli.command {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Migrate => {
            let pool = connect().await?;
            run_migrations(&pool).await?;
            println!("Migrations applied");
        }
        Commands::Issues { command } => {
            let issues = MedicalIssueRepository::new(connect().await?);
            run_issue_command(&issues, command, pretty).await?;
        }
        Commands::Resources { command } => {
            let resources = EmergencyResourceRepository::new(connect().await?);
            run_resource_command(&resources, command, pretty).await?;
        }
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(create_db_pool(&config).await?)
}

async fn run_issue_command(
    issues: &MedicalIssueRepository,
    command: IssueCommands,
    pretty: bool,
) -> Result<()> {
    match command {
        IssueCommands::List => print_json(&issues.list().await?, pretty),
        IssueCommands::Add { name, description } => {
            print_json(&issues.create(&name, description.as_deref()).await?, pretty)
        }
        IssueCommands::Update {
            id,
            name,
            description,
            clear_description,
        } => {
            let mut fields = FieldSet::new();
            fields.set_opt("name", name);
            if clear_description {
                fields.set("description", None::<String>);
            } else {
                fields.set_opt("description", description.map(Some));
            }
            print_json(&issues.update(id, fields).await?, pretty)
        }
        IssueCommands::Remove { id } => {
            issues.delete(id).await?;
            println!("Removed medical issue {id}");
            Ok(())
        }
    }
}

async fn run_resource_command(
    resources: &EmergencyResourceRepository,
    command: ResourceCommands,
    pretty: bool,
) -> Result<()> {
    match command {
        ResourceCommands::List => print_json(&resources.list().await?, pretty),
        ResourceCommands::Add {
            name,
            phone,
            description,
            issue_id,
        } => print_json(
            &resources
                .create(&name, &phone, description.as_deref(), issue_id)
                .await?,
            pretty,
        ),
        ResourceCommands::Update {
            id,
            name,
            phone,
            description,
            issue_id,
        } => {
            let mut fields = FieldSet::new();
            fields
                .set_opt("name", name)
                .set_opt("phone", phone)
                .set_opt("description", description.map(Some))
                .set_opt("issue_id", issue_id);
            print_json(&resources.update(id, fields).await?, pretty)
        }
        ResourceCommands::Remove { id } => {
            resources.delete(id).await?;
            println!("Removed emergency resource {id}");
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
