//! Terminal rendering for each view.

use chrono::{DateTime, Local, Utc};
use smokesense_core::analytics::{
    BudgetStatus, DashboardStats, Insights, MilestoneState, Projection, RecoveryStatus,
    StatsReport,
};
use smokesense_core::format::{
    format_duration_minutes, format_hour, format_money, format_time_since_opt,
};
use smokesense_core::wellness::{Quote, Ritual};
use smokesense_core::{Category, Profile, SmokeLog};

const BAR_WIDTH: usize = 30;

fn header(title: &str) {
    println!();
    println!("╭{}╮", "─".repeat(50));
    println!("│{:^50}│", title);
    println!("╰{}╯", "─".repeat(50));
    println!();
}

/// Bar of `value` relative to `max`, `BAR_WIDTH` wide at most.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    "█".repeat(filled)
}

pub fn print_dashboard(stats: &DashboardStats, currency: &str, now: DateTime<Utc>) {
    header(&stats.greeting);
    println!("  {}", stats.phase_tagline);
    println!();

    println!("TODAY");
    println!("   Cigarettes: {}", stats.today_count);
    println!(
        "   Last one:   {}",
        format_time_since_opt(stats.last_logged_at, now)
    );
    match stats.budget {
        BudgetStatus::Unset => println!("   Budget:     not set"),
        status => println!(
            "   Budget:     [{:<width$}] {}",
            bar(status.fill_percent(), 100.0),
            status.message().unwrap_or_default(),
            width = BAR_WIDTH
        ),
    }
    println!();

    println!("TODAY'S LOG");
    if stats.recent_today.is_empty() {
        println!("   No cigarettes logged today");
    }
    for log in &stats.recent_today {
        println!("   {}", log_line(log));
    }
    println!();

    println!("THIS WEEK");
    let max = stats.trend.series.max_count().max(1) as f64;
    for bucket in &stats.trend.series.buckets {
        println!(
            "   {} {:<width$} {}",
            bucket.day.format("%a %d"),
            bar(bucket.count as f64, max),
            bucket.count,
            width = BAR_WIDTH
        );
    }
    println!("   {}", stats.trend.direction.display());
    println!();
    println!(
        "   Total: {:<8} Daily avg: {:.1}",
        stats.week_total, stats.week_daily_average
    );
    println!(
        "   Spent: {:<8} Monthly at this rate: {}",
        format_money(currency, stats.weekly_spend),
        format_money(currency, stats.monthly_projection)
    );
    println!("   Time spent: {:.1}h", stats.weekly_hours);
    if let Some(days) = stats.days_within_budget {
        println!("   Days within budget: {}/7", days);
    }

    if let Some(status) = &stats.recovery {
        println!();
        print_recovery_line(status);
    }
    println!();
}

/// One row of the day's log: time, delay badge, tags and note.
fn log_line(log: &SmokeLog) -> String {
    let mut parts = vec![log
        .occurred_at()
        .map(|ts| ts.with_timezone(&Local).format("%l:%M %p").to_string())
        .unwrap_or_else(|| "--:--".to_string())];
    if let Some(minutes) = log.delay_minutes() {
        parts.push(format!("⏱ {}m", minutes));
    }
    parts.extend(log.mood.map(|m| m.label().to_string()));
    parts.extend(log.activity.map(|a| a.label().to_string()));
    parts.extend(log.location.map(|l| l.label().to_string()));
    if let Some(note) = &log.notes {
        parts.push(format!("\"{}\"", note));
    }
    parts.join("  ")
}

fn print_recovery_line(status: &RecoveryStatus) {
    match status {
        RecoveryStatus::InProgress {
            milestone,
            elapsed_minutes,
            ..
        } => println!(
            "RECOVERY   {} free, next: {} ({:.0}%)",
            format_duration_minutes(*elapsed_minutes),
            milestone.title,
            status.progress_percent()
        ),
        RecoveryStatus::AllAchieved { elapsed_minutes } => println!(
            "RECOVERY   {} free, Major Milestones Achieved!",
            format_duration_minutes(*elapsed_minutes)
        ),
    }
}

pub fn print_stats(stats: &StatsReport, currency: &str) {
    header(&format!("LAST {} DAYS", stats.window_days));

    println!("OVERVIEW");
    println!(
        "   Total: {:<8} Daily avg: {:.1}",
        stats.total, stats.daily_average
    );
    if let (Some(best), Some(peak)) = (stats.best_day, stats.peak_day) {
        println!(
            "   Best day: {} ({})   Peak day: {} ({})",
            best.day.format("%b %d"),
            best.count,
            peak.day.format("%b %d"),
            peak.count
        );
    }
    println!();

    println!("BY HOUR");
    let max = stats.hourly.scale_max() as f64;
    for (hour, count) in stats.hourly.counts.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        println!(
            "   {:>5} {:<width$} {}",
            format_hour(hour as u8),
            bar(*count as f64, max),
            count,
            width = BAR_WIDTH
        );
    }
    if stats.total > 0 {
        println!("   Peak: {}", format_hour(stats.peak_hour));
    }
    println!();

    if !stats.top_moods.is_empty() {
        println!("MOODS");
        for row in &stats.top_moods {
            println!(
                "   {:<12} {:>3}  {:.0}%",
                row.value.label(),
                row.count,
                row.percentage
            );
        }
        println!();
    }

    println!("SPENDING");
    println!(
        "   Spent: {}   Monthly: {}   Yearly: {}",
        format_money(currency, stats.spend.total_spent),
        format_money(currency, stats.spend.monthly_projection),
        format_money(currency, stats.spend.yearly_projection)
    );
    println!("   Time spent: {:.1}h", stats.spend.hours_spent());
    println!();
    println!("   A year at this rate could buy:");
    for reward in &stats.rewards {
        println!("   {} {}", reward.emoji, reward.description);
    }
    println!();
}

pub fn print_insights(insights: &Insights) {
    header("INSIGHTS");

    let report = match insights {
        Insights::NotEnoughData { logged, required } => {
            println!("  Log {} cigarettes to unlock your smoker archetype.", required);
            println!(
                "  [{:<width$}] {} / {} logged",
                bar(insights.unlock_progress(), 1.0),
                logged,
                required,
                width = BAR_WIDTH
            );
            println!();
            return;
        }
        Insights::Ready(report) => report,
    };

    println!(
        "  {} {}",
        report.archetype.emoji(),
        report.archetype.name()
    );
    println!("  {}", report.archetype.description());
    println!();

    println!(
        "   Main trigger: {}",
        report.main_trigger.unwrap_or("N/A")
    );
    println!("   Peak time:    {}", format_hour(report.peak_hour));
    println!(
        "   Top place:    {}",
        report
            .top_location
            .map(|row| row.value.label())
            .unwrap_or("N/A")
    );
    println!("   Daily avg:    {:.1}", report.daily_average);
    println!();

    println!("SMART TIPS");
    for tip in &report.tips {
        println!("   • {}", tip.text);
    }
    println!();
}

pub fn print_health(
    status: Option<&RecoveryStatus>,
    milestones: &[MilestoneState],
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) {
    header("HEALTH JOURNEY");

    let Some(status) = status else {
        println!("  Nothing logged yet.");
        println!();
        return;
    };

    if let Some(last) = last {
        println!(
            "  Last cigarette: {} ({})",
            last.with_timezone(&Local).format("%b %d %H:%M"),
            format_time_since_opt(Some(last), now)
        );
    }
    print_recovery_line(status);
    if let Some(milestone) = status.active_milestone() {
        println!(
            "  [{:<width$}] {} / {}",
            bar(status.progress(), 1.0),
            format_duration_minutes(status.elapsed_minutes()),
            format_duration_minutes(milestone.threshold_minutes),
            width = BAR_WIDTH
        );
    } else {
        println!("  Your body is thanking you.");
    }
    println!();

    for state in milestones {
        let mark = if state.unlocked {
            "✓"
        } else if state.active {
            "›"
        } else {
            " "
        };
        println!(
            "  {} {:>4}  {}",
            mark,
            format_duration_minutes(state.milestone.threshold_minutes),
            state.milestone.title
        );
        if state.unlocked || state.active {
            println!("          {}", state.milestone.description);
        }
    }
    println!();
}

pub fn print_motivation(motivation: Option<&str>, quote: &Quote) {
    if let Some(text) = motivation {
        println!("MY WHY");
        println!("   {}", text);
        println!();
    }
    println!("   \"{}\"", quote.text);
    println!("      - {}", quote.author);
    println!();
}

pub fn print_rituals(rituals: &[&Ritual]) {
    header("CRAVING SHIELD");
    for ritual in rituals {
        println!("  {} ({} min)", ritual.title, ritual.duration_minutes);
        println!("     {}", ritual.action);
    }
    println!();
    println!("  Cravings pass in a few minutes. Ride it out.");
    println!();
}

pub fn print_projection(projection: &Projection, currency: &str) {
    header(&format!(
        "CUTTING DOWN BY {:.0}%",
        projection.reduction_percent
    ));

    println!(
        "   From {:.0} to {:.0} a day at {} each",
        projection.current_daily_average,
        projection.target_daily,
        format_money(currency, projection.unit_price)
    );
    println!();
    println!(
        "   Yearly savings:  {}",
        format_money(currency, projection.yearly_savings)
    );
    println!(
        "   Monthly:         {}",
        format_money(currency, projection.monthly_savings)
    );
    println!(
        "   Five years:      {}",
        format_money(currency, projection.five_year_savings)
    );
    println!();
    println!(
        "   Time regained:   {:.0}h a year ({:.1} days)",
        projection.hours_saved_yearly, projection.days_saved_yearly
    );
    if projection.is_quit() {
        println!("   Plus every health milestone along the way.");
    }
    println!();
}

pub fn print_profile(profile: &Profile, currency: &str) {
    println!("Profile: {}", profile.user_id);
    println!(
        "   Name:       {}",
        profile.display_name.as_deref().unwrap_or("-")
    );
    println!("   Phase:      {}", profile.phase);
    println!(
        "   Budget:     {}",
        profile
            .budget()
            .map_or_else(|| "not set".to_string(), |b| format!("{} a day", b))
    );
    println!(
        "   Price:      {}",
        profile
            .unit_price
            .map_or_else(|| "default".to_string(), |p| format_money(currency, p))
    );
    if let Some(text) = &profile.motivation_text {
        println!("   Motivation: {}", text);
    }
    if let Some(image) = &profile.motivation_image {
        println!("   Image:      {}", image);
    }
    if profile.disguise_enabled {
        println!("   Disguised as \"{}\"", profile.disguise_name);
    }
}
