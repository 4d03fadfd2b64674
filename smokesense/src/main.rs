//! smokesense - log cigarettes and see your patterns from the terminal
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/smokesense/data.db (~/.local/share/smokesense/data.db)
//! - Config: $XDG_CONFIG_HOME/smokesense/config.toml (~/.config/smokesense/config.toml)
//! - Logs: $XDG_STATE_HOME/smokesense/ (~/.local/state/smokesense/)

mod render;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use smokesense_core::analytics::{
    elapsed_minutes, milestone_states, project_with, DashboardStats, Insights, MilestoneState,
    RecoveryStatus, RecoveryTracker, StatsReport,
};
use smokesense_core::wellness::{quote_of_the_day, suggest_ritual, Quote, Ritual, RITUALS};
use smokesense_core::{
    effective_unit_price, Activity, Config, Database, Location, LogFilter, Mood, Phase, Profile,
    SmokeLog,
};

#[derive(Parser, Debug)]
#[command(name = "smokesense")]
#[command(about = "Track cigarettes, spot your triggers, watch your body recover")]
#[command(version)]
struct Args {
    /// User to act for (default: from config)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a cigarette
    Log {
        #[arg(long)]
        mood: Option<Mood>,

        #[arg(long)]
        activity: Option<Activity>,

        #[arg(long)]
        location: Option<Location>,

        /// Seconds spent on the delay timer first
        #[arg(long)]
        delay: Option<i64>,

        #[arg(long)]
        note: Option<String>,

        /// When it happened, as RFC 3339 (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Delete logs. The profile is kept.
    Reset {
        /// Only delete logs from today's local calendar day
        #[arg(long)]
        today: bool,
    },

    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Today's counter, weekly trend and quick stats
    Dashboard,

    /// Statistics over the configured window (default 30 days)
    Stats,

    /// Triggers, archetype and tips
    Insights,

    /// Recovery milestones since the last cigarette
    Health,

    /// A quick ritual to ride out a craving
    Shield {
        /// List every ritual
        #[arg(long)]
        all: bool,
    },

    /// Savings from cutting down
    Project {
        /// Reduction in percent
        #[arg(long, default_value_t = 50.0)]
        reduction: f64,

        /// Cigarettes per day (default: your recent average)
        #[arg(long)]
        average: Option<f64>,

        /// Price per cigarette (default: from profile)
        #[arg(long)]
        price: Option<f64>,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileAction {
    /// Print the profile
    Show,
    /// Update profile fields
    Set(ProfileUpdate),
}

#[derive(ClapArgs, Debug)]
struct ProfileUpdate {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    phase: Option<Phase>,

    /// Daily budget; 0 clears it
    #[arg(long)]
    budget: Option<u32>,

    /// Price per cigarette
    #[arg(long)]
    price: Option<f64>,

    #[arg(long)]
    motivation: Option<String>,

    #[arg(long)]
    motivation_image: Option<String>,

    /// Show the app under a neutral name
    #[arg(long)]
    disguise: Option<bool>,

    #[arg(long)]
    disguise_name: Option<String>,
}

/// Everything a command needs.
struct App {
    config: Config,
    db: Database,
    user: String,
    json: bool,
}

impl App {
    fn logs(&self) -> Result<Vec<SmokeLog>> {
        self.db
            .list_logs(&self.user, &LogFilter::default())
            .context("failed to read logs")
    }

    fn profile(&self) -> Result<Option<Profile>> {
        self.db
            .get_profile(&self.user)
            .context("failed to read profile")
    }

    fn dashboard(&self, now: &DateTime<Local>) -> Result<DashboardStats> {
        let logs = self.logs()?;
        let profile = self.profile()?;
        Ok(DashboardStats::compute(
            &logs,
            profile.as_ref(),
            &self.config.analytics,
            now,
        ))
    }

    fn stats(&self, now: &DateTime<Local>) -> Result<StatsReport> {
        let logs = self.logs()?;
        let profile = self.profile()?;
        Ok(StatsReport::compute(
            &logs,
            profile.as_ref(),
            &self.config.analytics,
            now,
        ))
    }

    fn currency(&self) -> &str {
        &self.config.analytics.currency_symbol
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = smokesense_core::logging::init(&config.logging).ok();

    let db = Database::open(&Config::database_path()).context("failed to open database")?;
    db.migrate().context("failed to run migrations")?;

    let user = args.user.unwrap_or_else(|| config.user.id.clone());
    tracing::debug!(user = %user, command = ?args.command, "Running command");

    let app = App {
        config,
        db,
        user,
        json: args.json,
    };
    let now = Local::now();

    match args.command {
        Command::Log {
            mood,
            activity,
            location,
            delay,
            note,
            at,
        } => {
            let at = match at {
                Some(text) => DateTime::parse_from_rfc3339(&text)
                    .with_context(|| format!("invalid --at timestamp: {}", text))?
                    .with_timezone(&Utc),
                None => now.with_timezone(&Utc),
            };
            let mut log = SmokeLog::new(app.user.clone(), at);
            log.mood = mood;
            log.activity = activity;
            log.location = location;
            log.notes = note;
            if let Some(seconds) = delay {
                log = log.with_delay(seconds);
            }
            cmd_log(&app, &log, &now)
        }
        Command::Reset { today } => cmd_reset(&app, today, &now),
        Command::Profile { action } => match action {
            ProfileAction::Show => cmd_profile_show(&app),
            ProfileAction::Set(update) => cmd_profile_set(&app, update),
        },
        Command::Dashboard => {
            let stats = app.dashboard(&now)?;
            if app.json {
                print_json(&stats)
            } else {
                render::print_dashboard(&stats, app.currency(), now.with_timezone(&Utc));
                Ok(())
            }
        }
        Command::Stats => {
            let stats = app.stats(&now)?;
            if app.json {
                print_json(&stats)
            } else {
                render::print_stats(&stats, app.currency());
                Ok(())
            }
        }
        Command::Insights => {
            let insights = Insights::compute(&app.logs()?, &Local);
            if app.json {
                print_json(&insights)
            } else {
                render::print_insights(&insights);
                Ok(())
            }
        }
        Command::Health => cmd_health(&app, &now),
        Command::Shield { all } => cmd_shield(&app, all, &now),
        Command::Project {
            reduction,
            average,
            price,
        } => cmd_project(&app, reduction, average, price, &now),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn cmd_log(app: &App, log: &SmokeLog, now: &DateTime<Local>) -> Result<()> {
    app.db.insert_log(log).context("failed to record log")?;

    if app.json {
        return print_json(log);
    }

    let stats = app.dashboard(now)?;
    println!("Logged. Today: {}", stats.today_count);
    if let Some(message) = stats.budget.message() {
        println!("{}", message);
    }
    Ok(())
}

fn cmd_reset(app: &App, today: bool, now: &DateTime<Local>) -> Result<()> {
    let removed = if today {
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|start| Local.from_local_datetime(&start).earliest())
            .context("failed to resolve local midnight")?;
        app.db
            .delete_logs_since(&app.user, midnight.with_timezone(&Utc))
            .context("failed to delete today's logs")?
    } else {
        app.db
            .delete_all_logs(&app.user)
            .context("failed to delete logs")?
    };

    if app.json {
        return print_json(&serde_json::json!({ "deleted": removed }));
    }
    println!("Deleted {} log(s).", removed);
    Ok(())
}

fn cmd_profile_show(app: &App) -> Result<()> {
    let profile = app
        .profile()?
        .unwrap_or_else(|| Profile::new(app.user.clone()));
    if app.json {
        print_json(&profile)
    } else {
        render::print_profile(&profile, app.currency());
        Ok(())
    }
}

fn cmd_profile_set(app: &App, update: ProfileUpdate) -> Result<()> {
    let mut profile = app
        .profile()?
        .unwrap_or_else(|| Profile::new(app.user.clone()));

    if let Some(name) = update.name {
        profile.display_name = Some(name).filter(|n| !n.trim().is_empty());
    }
    if let Some(phase) = update.phase {
        profile.phase = phase;
    }
    if let Some(budget) = update.budget {
        profile.daily_budget = Some(budget).filter(|&b| b > 0);
    }
    if let Some(price) = update.price {
        if !price.is_finite() || price <= 0.0 {
            anyhow::bail!("--price must be a positive number");
        }
        profile.unit_price = Some(price);
    }
    if let Some(text) = update.motivation {
        profile.motivation_text = Some(text).filter(|t| !t.trim().is_empty());
    }
    if let Some(image) = update.motivation_image {
        profile.motivation_image = Some(image).filter(|i| !i.trim().is_empty());
    }
    if let Some(enabled) = update.disguise {
        profile.disguise_enabled = enabled;
    }
    if let Some(name) = update.disguise_name {
        if name.trim().is_empty() {
            anyhow::bail!("--disguise-name must not be empty");
        }
        profile.disguise_name = name;
    }

    app.db
        .save_profile(&profile)
        .context("failed to save profile")?;

    if app.json {
        print_json(&profile)
    } else {
        println!("Profile saved.");
        render::print_profile(&profile, app.currency());
        Ok(())
    }
}

/// Recovery view for `health`.
#[derive(Debug, Serialize)]
struct HealthReport {
    last_logged_at: Option<DateTime<Utc>>,
    elapsed_minutes: Option<i64>,
    status: Option<RecoveryStatus>,
    milestones: Vec<MilestoneState>,
    motivation: Option<String>,
    quote: &'static Quote,
}

fn cmd_health(app: &App, local_now: &DateTime<Local>) -> Result<()> {
    let now = local_now.with_timezone(&Utc);
    let last = app
        .db
        .latest_log(&app.user)
        .context("failed to read latest log")?
        .and_then(|log| log.occurred_at());

    let tracker = RecoveryTracker::new(last);
    let elapsed = last.map(|ts| elapsed_minutes(ts, now));
    let report = HealthReport {
        last_logged_at: last,
        elapsed_minutes: elapsed,
        status: tracker.status(now),
        milestones: elapsed.map(milestone_states).unwrap_or_default(),
        motivation: app.profile()?.and_then(|p| p.motivation_text),
        quote: quote_of_the_day(local_now.date_naive()),
    };

    if app.json {
        print_json(&report)
    } else {
        render::print_health(report.status.as_ref(), &report.milestones, last, now);
        render::print_motivation(report.motivation.as_deref(), report.quote);
        Ok(())
    }
}

fn cmd_shield(app: &App, all: bool, now: &DateTime<Local>) -> Result<()> {
    let rituals: Vec<&'static Ritual> = if all {
        RITUALS.iter().collect()
    } else {
        vec![suggest_ritual(now.with_timezone(&Utc))]
    };

    if app.json {
        print_json(&rituals)
    } else {
        render::print_rituals(&rituals);
        Ok(())
    }
}

fn cmd_project(
    app: &App,
    reduction: f64,
    average: Option<f64>,
    price: Option<f64>,
    now: &DateTime<Local>,
) -> Result<()> {
    let average = match average {
        Some(avg) => avg,
        None => app.stats(now)?.projection_baseline,
    };
    let price = match price {
        Some(price) => price,
        None => {
            let profile = app.profile()?;
            effective_unit_price(profile.as_ref(), app.config.analytics.default_unit_price)
        }
    };

    let projection = project_with(
        average,
        reduction,
        price,
        app.config.analytics.minutes_per_unit,
    );

    if app.json {
        print_json(&projection)
    } else {
        render::print_projection(&projection, app.currency());
        Ok(())
    }
}
