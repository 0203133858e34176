#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use serde_json::json;

use claimdesk::{
    Attachment, ClaimDraft, ClaimStore, Config, ErrorSet, FileTokenStorage, Role, SessionStore,
    TokenStorage,
};

#[derive(Parser)]
#[clap(version, about = "Claim reimbursement workflow client")]
struct Opts {
    /// Path to config.yml, defaults to $CLAIMDESK_HOME/config.yml
    #[clap(short, long)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    subcmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session token
    Login {
        email: String,
        password: String,
    },
    /// Create an account, then pick a role with `assign-role`
    Register {
        name: String,
        email: String,
        password: String,
        password_confirmation: String,
    },
    /// End the session server-side and drop the local token
    Logout,
    /// Show the identity behind the persisted token
    Whoami,
    /// Give a user a role (admin)
    AssignRole {
        user_id: i64,
        role: String,
    },
    /// Submit and inspect claims
    #[clap(subcommand)]
    Claim(ClaimCommand),
    /// Role-scoped queue of claims awaiting this approver
    Queue {
        role: String,
    },
}

#[derive(Subcommand)]
enum ClaimCommand {
    /// Submit a new claim with a document attachment
    Create {
        name: String,
        department: String,
        relation: String,
        description: String,
        amount: f64,
        document: PathBuf,
    },
    /// The claims I submitted
    List,
    /// My claims partitioned by status
    Grouped,
    /// Claims I already acted on as an approver
    Handled,
    Approve {
        id: i64,
    },
    Reject {
        id: i64,
        reason: String,
    },
}

fn report(errors: &ErrorSet) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    for (field, messages) in &errors.0 {
        for message in messages {
            eprintln!("{field}: {message}");
        }
    }
    bail!("request failed");
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let opts = Opts::parse();
    let config = Config::open(opts.config.as_ref())?;
    debug!("using api at {}", config.base_url);

    let tokens: Arc<dyn TokenStorage> = Arc::new(FileTokenStorage::new(&config.token_path));
    let mut session = SessionStore::new(&config.base_url, tokens.clone());
    let mut claims = ClaimStore::new(&config.base_url, tokens);

    match opts.subcmd {
        Command::Login { email, password } => {
            let destination = session
                .authenticate("login", &json!({"email": email, "password": password}))
                .await?;
            report(&session.errors)?;
            if let Some(destination) = destination {
                println!("signed in, continue at {}", destination.url());
            }
        }
        Command::Register {
            name,
            email,
            password,
            password_confirmation,
        } => {
            let destination = session
                .authenticate(
                    "register",
                    &json!({
                        "name": name,
                        "email": email,
                        "password": password,
                        "password_confirmation": password_confirmation,
                    }),
                )
                .await?;
            report(&session.errors)?;
            if let Some(destination) = destination {
                println!("registered, continue at {}", destination.url());
            }
        }
        Command::Logout => {
            session.logout().await?;
            report(&session.errors)?;
            println!("signed out");
        }
        Command::Whoami => {
            session.restore_session().await?;
            match &session.user {
                Some(user) => println!("{}", serde_json::to_string_pretty(user)?),
                None => bail!("not signed in"),
            }
        }
        Command::AssignRole { user_id, role } => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            let updated = session.assign_role(user_id, role).await?;
            report(&session.errors)?;
            if let Some(user) = updated {
                println!("{}", serde_json::to_string_pretty(&user)?);
            }
        }
        Command::Claim(cmd) => run_claim(cmd, &mut claims).await?,
        Command::Queue { role } => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            let queue = match role {
                Role::Employee => claims.fetch_my_claims().await?,
                Role::Supervisor => claims.fetch_supervisor_claims().await?,
                Role::Manager => claims.fetch_manager_claims().await?,
                Role::Hr => claims.fetch_hr_claims().await?,
                Role::Account => claims.fetch_account_claims().await?,
            };
            report(&claims.errors)?;
            println!("{}", serde_json::to_string_pretty(&queue)?);
        }
    }

    Ok(())
}

async fn run_claim(cmd: ClaimCommand, claims: &mut ClaimStore) -> Result<()> {
    match cmd {
        ClaimCommand::Create {
            name,
            department,
            relation,
            description,
            amount,
            document,
        } => {
            let bytes = std::fs::read(&document)?;
            let file_name = document
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "document".to_string());
            claims
                .create_claim(ClaimDraft {
                    name,
                    department,
                    relation,
                    description,
                    amount,
                    document: Attachment { file_name, bytes },
                })
                .await?;
            report(&claims.errors)?;
            println!("claim submitted");
        }
        ClaimCommand::List => {
            let mine = claims.fetch_my_claims().await?;
            report(&claims.errors)?;
            println!("{}", serde_json::to_string_pretty(&mine)?);
        }
        ClaimCommand::Grouped => {
            let grouped = claims.fetch_my_claims_grouped().await;
            if let Some(message) = &claims.grouped_claims_error {
                bail!("{message}");
            }
            println!("{}", serde_json::to_string_pretty(&grouped)?);
        }
        ClaimCommand::Handled => {
            let handled = claims.fetch_my_handled_claims().await?;
            report(&claims.errors)?;
            println!("{}", serde_json::to_string_pretty(&handled)?);
        }
        ClaimCommand::Approve { id } => {
            let body = claims.approve_claim(id).await?;
            report(&claims.errors)?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        ClaimCommand::Reject { id, reason } => {
            claims.reject_claim(id, &reason).await?;
            report(&claims.errors)?;
            println!("claim {id} rejected");
        }
    }
    Ok(())
}
