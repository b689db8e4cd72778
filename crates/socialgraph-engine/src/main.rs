//! CLI entry point for the social graph access engine.
//!
//! Create commands read a JSON request from stdin; every command writes its
//! JSON result to stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use socialgraph_core::config::{AppConfig, PaginationSettings};
use socialgraph_core::NewGroup;
use socialgraph_engine::{AccessEngine, CreateGroupRequest, CreateUserRequest};
use socialgraph_graph::{GraphClient, GraphConfig};

#[derive(Parser)]
#[command(name = "socialgraph")]
#[command(about = "Query and mutate the User/Group social graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: socialgraph).
    #[arg(short, long, default_value = "socialgraph", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Install uniqueness constraints for user_id and group_id.
    Schema,
    /// User operations.
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Group operations.
    Groups {
        #[command(subcommand)]
        action: GroupAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users with the ids they follow.
    List(PageArgs),
    /// Show a user with follows and subscriptions expanded.
    Get { user_id: i64 },
    /// Create a user (reads JSON from stdin).
    Create,
    /// Delete a user and its edges.
    Delete { user_id: i64 },
}

#[derive(Subcommand)]
enum GroupAction {
    /// List groups with their subscriber ids.
    List(PageArgs),
    /// Show a group with subscribers expanded.
    Get { group_id: i64 },
    /// Create a group (reads JSON from stdin).
    Create,
    /// Delete a group and its edges.
    Delete { group_id: i64 },
}

#[derive(clap::Args)]
struct PageArgs {
    /// Maximum rows to return.
    #[arg(long)]
    limit: Option<u32>,
    /// Rows to skip.
    #[arg(long)]
    offset: Option<u32>,
}

impl PageArgs {
    fn page(&self, settings: &PaginationSettings) -> socialgraph_core::Page {
        settings.page(self.limit, self.offset)
    }
}

#[derive(Serialize)]
struct Deleted {
    deleted: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    let graph = GraphClient::connect(&GraphConfig::from(config.neo4j.clone())).await?;

    match cli.command {
        Command::Schema => {
            graph.ensure_schema().await?;
            print_json(&serde_json::json!({ "schema": "ok" }))?;
        }
        Command::Users { action } => {
            let engine = AccessEngine::new(graph);
            run_users(&engine, action, &config.pagination).await?;
        }
        Command::Groups { action } => {
            let engine = AccessEngine::new(graph);
            run_groups(&engine, action, &config.pagination).await?;
        }
    }

    Ok(())
}

async fn run_users(
    engine: &AccessEngine<GraphClient>,
    action: UserAction,
    pagination: &PaginationSettings,
) -> anyhow::Result<()> {
    match action {
        UserAction::List(args) => {
            print_json(&engine.list_users(args.page(pagination)).await?)?;
        }
        UserAction::Get { user_id } => {
            print_json(&engine.get_user(user_id).await?)?;
        }
        UserAction::Create => {
            let input = std::io::read_to_string(std::io::stdin())?;
            let request: CreateUserRequest = serde_json::from_str(&input)?;
            let new_user = request.validate()?;
            print_json(&engine.create_user(new_user).await?)?;
        }
        UserAction::Delete { user_id } => {
            engine.delete_user(user_id).await?;
            print_json(&Deleted { deleted: true })?;
        }
    }
    Ok(())
}

async fn run_groups(
    engine: &AccessEngine<GraphClient>,
    action: GroupAction,
    pagination: &PaginationSettings,
) -> anyhow::Result<()> {
    match action {
        GroupAction::List(args) => {
            print_json(&engine.list_groups(args.page(pagination)).await?)?;
        }
        GroupAction::Get { group_id } => {
            print_json(&engine.get_group(group_id).await?)?;
        }
        GroupAction::Create => {
            let input = std::io::read_to_string(std::io::stdin())?;
            let request: CreateGroupRequest = serde_json::from_str(&input)?;
            print_json(&engine.create_group(NewGroup::from(request)).await?)?;
        }
        GroupAction::Delete { group_id } => {
            engine.delete_group(group_id).await?;
            print_json(&Deleted { deleted: true })?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
