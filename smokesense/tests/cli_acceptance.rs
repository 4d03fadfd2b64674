use chrono::{Duration, Local, Utc};
use smokesense_core::{Database, LogFilter, Mood};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("smokesense/data.db")
    }

    fn write_config(&self, contents: &str) {
        let dir = self.xdg_config.join("smokesense");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), contents).expect("failed to write config");
    }
}

fn run(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("smokesense"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute smokesense: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "smokesense {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn run_ok(env: &CliTestEnv, args: &[&str]) -> String {
    let output = run(env, args);
    assert_success(args, &output);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn run_json(env: &CliTestEnv, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let stdout = run_ok(env, &full);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid JSON from {:?}: {e}\n{stdout}", args))
}

#[test]
fn log_persists_to_database() {
    let env = CliTestEnv::new();

    let stdout = run_ok(
        &env,
        &["log", "--mood", "stressed", "--activity", "work", "--location", "car"],
    );
    assert!(stdout.contains("Today: 1"), "unexpected output:\n{stdout}");

    let db = Database::open(&env.db_path()).expect("failed to open db");
    db.migrate().expect("failed to migrate db");
    let logs = db.list_logs("local", &LogFilter::default()).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].mood, Some(Mood::Stressed));
}

#[test]
fn log_rejects_unknown_mood() {
    let env = CliTestEnv::new();
    let output = run(&env, &["log", "--mood", "ecstatic"]);
    assert!(!output.status.success());
}

#[test]
fn dashboard_reflects_budget_and_profile() {
    let env = CliTestEnv::new();
    run_ok(
        &env,
        &["profile", "set", "--name", "Sam", "--budget", "2", "--price", "20"],
    );
    run_ok(&env, &["log"]);
    run_ok(&env, &["log"]);
    run_ok(&env, &["log"]);

    let dashboard = run_json(&env, &["dashboard"]);
    assert_eq!(dashboard["today_count"], 3);
    assert_eq!(dashboard["budget"]["state"], "over");
    assert_eq!(dashboard["budget"]["by"], 1);
    assert_eq!(dashboard["weekly_spend"], 60.0);
    assert!(dashboard["greeting"].as_str().unwrap().ends_with("Sam"));

    let text = run_ok(&env, &["dashboard"]);
    assert!(text.contains("1 over budget"), "unexpected output:\n{text}");
}

#[test]
fn dashboard_lists_todays_logs_with_delay() {
    let env = CliTestEnv::new();
    run_ok(&env, &["log", "--mood", "bored"]);
    run_ok(
        &env,
        &["log", "--delay", "240", "--activity", "coffee", "--note", "held off"],
    );

    let dashboard = run_json(&env, &["dashboard"]);
    let recent = dashboard["recent_today"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["delay_seconds"], 240);

    let text = run_ok(&env, &["dashboard"]);
    assert!(text.contains("TODAY'S LOG"), "unexpected output:\n{text}");
    assert!(text.contains("⏱ 4m"), "unexpected output:\n{text}");
    assert!(text.contains("With Coffee"), "unexpected output:\n{text}");
    assert!(text.contains("held off"), "unexpected output:\n{text}");
}

#[test]
fn reset_today_keeps_older_logs_and_profile() {
    let env = CliTestEnv::new();
    let two_days_ago = (Local::now() - Duration::days(2))
        .with_timezone(&Utc)
        .to_rfc3339();

    run_ok(&env, &["profile", "set", "--budget", "5"]);
    run_ok(&env, &["log", "--at", &two_days_ago]);
    run_ok(&env, &["log"]);

    let reset = run_json(&env, &["reset", "--today"]);
    assert_eq!(reset["deleted"], 1);

    let dashboard = run_json(&env, &["dashboard"]);
    assert_eq!(dashboard["today_count"], 0);
    assert_eq!(dashboard["week_total"], 1);

    run_ok(&env, &["reset"]);
    let profile = run_json(&env, &["profile", "show"]);
    assert_eq!(profile["daily_budget"], 5);
}

#[test]
fn insights_unlock_after_five_logs() {
    let env = CliTestEnv::new();
    for _ in 0..4 {
        run_ok(&env, &["log", "--mood", "anxious"]);
    }

    let locked = run_json(&env, &["insights"]);
    assert_eq!(locked["status"], "not_enough_data");
    assert_eq!(locked["logged"], 4);

    run_ok(&env, &["log", "--mood", "anxious"]);
    let insights = run_json(&env, &["insights"]);
    assert_eq!(insights["status"], "ready");
    assert_eq!(insights["archetype"], "stress_reliever");
    assert_eq!(insights["main_trigger"], "Anxious");

    let text = run_ok(&env, &["insights"]);
    assert!(text.contains("The Stress Reliever"));
}

#[test]
fn health_tracks_time_since_last_log() {
    let env = CliTestEnv::new();

    let empty = run_json(&env, &["health"]);
    assert!(empty["status"].is_null());

    let thirty_hours_ago = (Utc::now() - Duration::hours(30)).to_rfc3339();
    run_ok(&env, &["log", "--at", &thirty_hours_ago]);

    let health = run_json(&env, &["health"]);
    assert_eq!(health["status"]["state"], "in_progress");
    assert_eq!(health["status"]["milestone"]["id"], "48hr");
    assert_eq!(health["milestones"].as_array().unwrap().len(), 6);
}

#[test]
fn health_shows_motivation_and_quote() {
    let env = CliTestEnv::new();
    run_ok(&env, &["profile", "set", "--motivation", "For my kids"]);
    run_ok(&env, &["log"]);

    let health = run_json(&env, &["health"]);
    assert_eq!(health["motivation"], "For my kids");
    assert!(!health["quote"]["text"].as_str().unwrap().is_empty());

    let text = run_ok(&env, &["health"]);
    assert!(text.contains("For my kids"), "unexpected output:\n{text}");
}

#[test]
fn shield_suggests_rituals() {
    let env = CliTestEnv::new();

    let one = run_json(&env, &["shield"]);
    assert_eq!(one.as_array().unwrap().len(), 1);

    let all = run_json(&env, &["shield", "--all"]);
    let rituals = all.as_array().unwrap();
    assert_eq!(rituals.len(), 6);
    assert_eq!(rituals[0]["title"], "Hydrate");

    let text = run_ok(&env, &["shield", "--all"]);
    assert!(text.contains("CRAVING SHIELD"));
    assert!(text.contains("Swap (5 min)"));
}

#[test]
fn project_uses_explicit_inputs() {
    let env = CliTestEnv::new();
    let projection = run_json(
        &env,
        &["project", "--average", "10", "--reduction", "100", "--price", "18"],
    );
    assert_eq!(projection["yearly_savings"], 65700.0);
    assert_eq!(projection["target_daily"], 0.0);
}

#[test]
fn config_controls_user_and_currency() {
    let env = CliTestEnv::new();
    env.write_config("[user]\nid = \"alex\"\n\n[analytics]\ncurrency_symbol = \"$\"\n");

    run_ok(&env, &["log"]);
    let text = run_ok(&env, &["stats"]);
    assert!(text.contains("$15"), "unexpected output:\n{text}");

    let db = Database::open(&env.db_path()).expect("failed to open db");
    assert_eq!(db.count_logs("alex").unwrap(), 1);
    assert_eq!(db.count_logs("local").unwrap(), 0);

    // --user overrides the configured user
    run_ok(&env, &["--user", "local", "log"]);
    assert_eq!(db.count_logs("local").unwrap(), 1);
}

#[test]
fn invalid_config_fails_cleanly() {
    let env = CliTestEnv::new();
    env.write_config("[analytics]\nstats_window_days = 0\n");

    let output = run(&env, &["dashboard"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load configuration"));
}
