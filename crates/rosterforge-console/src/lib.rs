//! Colorful console output for solve lifecycle events.
//!
//! Provides a custom `tracing` layer that formats RosterForge events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve start/end) and improving solutions
//! - **DEBUG**: Model statistics and search summaries
//! - **WARN**: Solves that produced no schedule

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "rosterforge=info,rosterforge_encoding=info,rosterforge_solver=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(RosterConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since solve start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

/// A tracing layer that formats solve events with colors.
pub struct RosterConsoleLayer;

impl<S: Subscriber> Layer<S> for RosterConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("rosterforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    status: Option<String>,
    backend: Option<String>,
    employees: Option<u64>,
    days: Option<u64>,
    variables: Option<u64>,
    constraints: Option<u64>,
    penalty_terms: Option<u64>,
    time_limit_ms: Option<u64>,
    nodes: Option<u64>,
    conflicts: Option<u64>,
    duration_ms: Option<u64>,
    objective: Option<i64>,
    success: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "status" => self.status = Some(s),
            "backend" => self.backend = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "employees" => self.employees = Some(value),
            "days" => self.days = Some(value),
            "variables" => self.variables = Some(value),
            "constraints" => self.constraints = Some(value),
            "penalty_terms" => self.penalty_terms = Some(value),
            "time_limit_ms" => self.time_limit_ms = Some(value),
            "nodes" => self.nodes = Some(value),
            "conflicts" => self.conflicts = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "objective" => self.objective = i64::try_from(value).ok(),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "objective" => self.objective = Some(value),
            _ => self.record_u64(field, value.max(0) as u64),
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "success" {
            self.success = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "backend" => self.backend = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "solution_improved" => format_solution_improved(v),
        "solve_end" => format_solve_end(v),
        "solve_unsuccessful" => format_unsuccessful(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();

    let mut output = format!(
        "{} {} Solving │ {} employees │ {} days │ {} variables │ {} constraints",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.employees).bright_yellow(),
        count(v.days).bright_yellow(),
        count(v.variables).bright_yellow(),
        count(v.constraints).bright_yellow(),
    );

    if let Some(terms) = v.penalty_terms {
        output.push_str(&format!(
            " │ {} penalty terms",
            terms.to_formatted_string(&Locale::en).bright_magenta()
        ));
    }

    if let Some(ms) = v.time_limit_ms.filter(|&ms| ms > 0) {
        output.push_str(&format!(" │ {} limit", format_duration_ms(ms).bright_yellow()));
    }

    output
}

fn format_solution_improved(v: &EventVisitor) -> String {
    format!(
        "{} {} objective {} │ {} nodes",
        format_elapsed(),
        "⚡".bright_cyan(),
        format_objective(v.objective),
        count(v.nodes).white(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("UNKNOWN");
    let mut output = format!(
        "{} {} Solving complete │ {} │ objective {} │ {} nodes",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_status(status),
        format_objective(v.objective),
        count(v.nodes).white(),
    );

    if let Some(conflicts) = v.conflicts {
        output.push_str(&format!(
            " │ {} conflicts",
            conflicts.to_formatted_string(&Locale::en).white()
        ));
    }
    if let Some(ms) = v.duration_ms {
        output.push_str(&format!(" │ {}", format_duration_ms(ms).yellow()));
    }

    output
}

fn format_unsuccessful(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("UNKNOWN");
    let reason = if status == "INFEASIBLE" {
        "hard constraints cannot all hold"
    } else {
        "no schedule found within the limits"
    };
    format!(
        "{} {} {} │ {}",
        format_elapsed(),
        "✗".bright_red().bold(),
        format_status(status),
        reason.bright_red(),
    )
}

fn format_status(status: &str) -> String {
    match status {
        "OPTIMAL" => status.bright_green().bold().to_string(),
        "FEASIBLE" => status.bright_yellow().bold().to_string(),
        _ => status.bright_red().bold().to_string(),
    }
}

fn format_objective(objective: Option<i64>) -> String {
    match objective {
        Some(0) => "0".bright_green().to_string(),
        Some(value) => value.to_formatted_string(&Locale::en).yellow().to_string(),
        None => "N/A".white().to_string(),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
