use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use clap::{Parser, Subcommand};

use summon_adapters::http::HttpWebhookSender;
use summon_adapters::persistence::SqliteDb;
use summon_app::calendar_service::CalendarService;
use summon_app::dispatcher::NotificationDispatcher;
use summon_app::oncall_service::OncallService;
use summon_app::roster_service::RosterService;
use summon_core::escalation::EscalationPolicy;
use summon_core::ids::{OverrideId, RotationId, UserId};
use summon_core::schedule::{LegacyShift, Period, PrimaryContact, Rotation, ShiftOverride};
use summon_core::user::User;
use summon_core::webhook::{Webhook, WebhookKind};
use summon_ports::outbound::{DeliveryLogStore, PolicyRepository, WebhookRepository};

#[derive(Parser)]
#[command(name = "summon", about = "On-call resolution and notification engine")]
struct Cli {
    /// SQLite database URL
    #[arg(long, env = "SUMMON_DB", default_value = "sqlite://summon.db?mode=rwc")]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show who is on call
    Oncall {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Show the full escalation chain
    Chain {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Show the dial plan the telephony side consumes
    Plan {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Preview the on-call calendar
    Calendar {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Mirror users from a JSON file into the directory
    SyncUsers { file: PathBuf },
    #[command(subcommand)]
    Override(OverrideCmd),
    #[command(subcommand)]
    Rotation(RotationCmd),
    #[command(subcommand)]
    Legacy(LegacyCmd),
    #[command(subcommand)]
    Primary(PrimaryCmd),
    #[command(subcommand)]
    Manual(ManualCmd),
    #[command(subcommand)]
    Webhook(WebhookCmd),
    #[command(subcommand)]
    Policy(PolicyCmd),
    /// Show recent webhook deliveries
    Log {
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum OverrideCmd {
    /// Put one person on call for a bounded period
    Add {
        #[arg(long)]
        user: String,
        #[arg(long)]
        start: DateTime<Utc>,
        #[arg(long)]
        end: DateTime<Utc>,
        #[arg(long, default_value = "Manual override")]
        reason: String,
    },
    Remove { id: String },
}

#[derive(Subcommand)]
enum RotationCmd {
    Add {
        #[arg(long)]
        name: String,
        /// daily, weekly, monthly or yearly
        #[arg(long)]
        period: String,
        /// user ids, in rotation order
        #[arg(long = "member", required = true)]
        members: Vec<String>,
        #[arg(long)]
        anchor: NaiveDate,
    },
    Remove { id: String },
}

#[derive(Subcommand)]
enum LegacyCmd {
    Add {
        /// weekday name, e.g. monday
        #[arg(long)]
        day: String,
        #[arg(long)]
        start_hour: u32,
        #[arg(long)]
        end_hour: u32,
        #[arg(long)]
        number: String,
        #[arg(long, default_value = "On-Call")]
        name: String,
    },
}

#[derive(Subcommand)]
enum PrimaryCmd {
    Set {
        #[arg(long)]
        number: String,
        #[arg(long, default_value = "Primary On-Call")]
        name: String,
    },
    Clear,
}

#[derive(Subcommand)]
enum ManualCmd {
    Set {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        user: String,
    },
    Clear {
        #[arg(long)]
        date: NaiveDate,
    },
}

#[derive(Subcommand)]
enum WebhookCmd {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        /// slack, discord, teams or generic
        #[arg(long)]
        kind: String,
        #[arg(long = "event", required = true)]
        events: Vec<String>,
    },
    Remove { id: String },
    List,
    /// Send a test payload to one webhook
    Test { id: String },
}

#[derive(Subcommand)]
enum PolicyCmd {
    Show,
    /// Load the escalation policy from a JSON file
    Set { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let db = SqliteDb::new(&cli.db)
        .await
        .with_context(|| format!("failed to open {}", cli.db))?;

    let sender = HttpWebhookSender::new()?;
    let dispatcher =
        NotificationDispatcher::new(Arc::new(db.clone()), Arc::new(db.clone()), Arc::new(sender));
    let oncall = OncallService::new(db.clone(), db.clone(), db.clone());
    let roster = RosterService::new(db.clone(), db.clone(), db.clone(), dispatcher.clone());
    let calendar = CalendarService::new(db.clone(), db.clone(), db.clone());

    match cli.command {
        Command::Oncall { at } => {
            let at = at.unwrap_or_else(Utc::now);
            match oncall.current_oncall(at).await? {
                Some(resolved) => print_json(&resolved)?,
                None => println!("nobody is on call"),
            }
        }
        Command::Chain { at } => {
            let at = at.unwrap_or_else(Utc::now);
            print_json(&oncall.escalation_chain(at).await?)?;
        }
        Command::Plan { at } => {
            let at = at.unwrap_or_else(Utc::now);
            print_json(&oncall.call_plan(at).await?)?;
        }
        Command::Calendar { start, days } => {
            let start = start.unwrap_or_else(|| Utc::now().date_naive());
            print_json(&calendar.calendar(start, days).await?)?;
        }
        Command::SyncUsers { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let users: Vec<User> = serde_json::from_str(&content)?;
            let count = users.len();
            for user in &users {
                db.put_user(user).await?;
            }
            println!("synced {count} users");
        }
        Command::Override(cmd) => match cmd {
            OverrideCmd::Add {
                user,
                start,
                end,
                reason,
            } => {
                let user_id = UserId::parse(&user)?;
                let id = roster
                    .add_override(ShiftOverride::new(user_id, start, end, reason))
                    .await?;
                println!("{id}");
                settle_deliveries().await;
            }
            OverrideCmd::Remove { id } => {
                let removed = roster.remove_override(&OverrideId::parse(&id)?).await?;
                println!("{}", if removed { "removed" } else { "not found" });
            }
        },
        Command::Rotation(cmd) => match cmd {
            RotationCmd::Add {
                name,
                period,
                members,
                anchor,
            } => {
                let members = members
                    .iter()
                    .map(|m| UserId::parse(m))
                    .collect::<Result<Vec<_>, _>>()?;
                let rotation = Rotation::new(name, parse_period(&period)?, members, anchor)?;
                let id = roster.add_rotation(rotation).await?;
                println!("{id}");
            }
            RotationCmd::Remove { id } => {
                let removed = roster.remove_rotation(&RotationId::parse(&id)?).await?;
                println!("{}", if removed { "removed" } else { "not found" });
            }
        },
        Command::Legacy(LegacyCmd::Add {
            day,
            start_hour,
            end_hour,
            number,
            name,
        }) => {
            let day: Weekday = day
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid weekday: {day}"))?;
            roster
                .add_legacy_shift(LegacyShift {
                    day,
                    start_hour,
                    end_hour,
                    number,
                    name,
                })
                .await?;
            println!("added");
        }
        Command::Primary(cmd) => {
            let primary = match cmd {
                PrimaryCmd::Set { number, name } => Some(PrimaryContact { number, name }),
                PrimaryCmd::Clear => None,
            };
            roster.set_primary(primary).await?;
            println!("updated");
        }
        Command::Manual(cmd) => match cmd {
            ManualCmd::Set { date, user } => {
                roster.set_manual_day(date, UserId::parse(&user)?).await?;
                println!("set");
                settle_deliveries().await;
            }
            ManualCmd::Clear { date } => {
                let cleared = roster.clear_manual_day(date).await?;
                println!("{}", if cleared { "cleared" } else { "not set" });
            }
        },
        Command::Webhook(cmd) => match cmd {
            WebhookCmd::Add {
                name,
                url,
                kind,
                events,
            } => {
                let hook = Webhook::new(name, url, parse_kind(&kind)?, events);
                let id = hook.id().to_string();
                WebhookRepository::save(&db, &hook).await?;
                println!("{id}");
            }
            WebhookCmd::Remove { id } => {
                WebhookRepository::delete(&db, &id).await?;
                println!("removed");
            }
            WebhookCmd::List => {
                print_json(&WebhookRepository::list_all(&db).await?)?;
            }
            WebhookCmd::Test { id } => {
                dispatcher.send_test(&id).await?;
                println!("test delivery attempted, see the delivery log");
            }
        },
        Command::Policy(cmd) => match cmd {
            PolicyCmd::Show => {
                print_json(&PolicyRepository::load(&db).await?)?;
            }
            PolicyCmd::Set { file } => {
                let content = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let parsed: EscalationPolicy = serde_json::from_str(&content)?;
                // re-validate; serde does not enforce level ordering
                let policy =
                    EscalationPolicy::new(parsed.is_enabled(), parsed.levels().to_vec())?;
                PolicyRepository::save(&db, &policy).await?;
                println!("updated");
            }
        },
        Command::Log { limit } => {
            print_json(&DeliveryLogStore::recent(&db, limit).await?)?;
        }
    }

    Ok(())
}

fn parse_period(s: &str) -> anyhow::Result<Period> {
    match s {
        "daily" => Ok(Period::Daily),
        "weekly" => Ok(Period::Weekly),
        "monthly" => Ok(Period::Monthly),
        "yearly" => Ok(Period::Yearly),
        other => anyhow::bail!("invalid period: {other}"),
    }
}

fn parse_kind(s: &str) -> anyhow::Result<WebhookKind> {
    match s {
        "slack" => Ok(WebhookKind::Slack),
        "discord" => Ok(WebhookKind::Discord),
        "teams" => Ok(WebhookKind::Teams),
        "generic" => Ok(WebhookKind::Generic),
        other => anyhow::bail!("invalid webhook kind: {other}"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Change notifications ride on detached tasks; give them a moment to land
/// before a one-shot process exits.
async fn settle_deliveries() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}
