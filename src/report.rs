use chrono::{DateTime, Datelike, Duration, Local};

use crate::{RELEASE_STAGE, VERSION};

/// NAME/VERSION block printed for `--version`
pub fn version_details(name: &str) -> String {
    format!("\nNAME:\n    {name}\nVERSION:\n    {VERSION}\n    {RELEASE_STAGE}")
}

/// Start/finish times of a run, printed for `--duration`
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: DateTime<Local>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Local::now(),
        }
    }

    pub fn report(&self) -> String {
        self.report_until(Local::now())
    }

    pub fn report_until(&self, finished: DateTime<Local>) -> String {
        format!(
            "\nStarted:  {}\nFinished: {}\nDuration: {} (days hh:mm:ss:ms)",
            timestamp(&self.started),
            timestamp(&finished),
            elapsed(finished - self.started)
        )
    }
}

fn timestamp(at: &DateTime<Local>) -> String {
    let suffix = day_suffix(at.day());

    at.format(&format!("%Y-%m-%d %H:%M:%S.%6f (%a %d{suffix} %b %Y)"))
        .to_string()
}

/// english ordinal suffix for a day of the month
fn day_suffix(day: u32) -> &'static str {
    match day {
        4..=20 | 24..=30 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// `[D day[s], ]H:MM:SS[.ffffff]`
fn elapsed(duration: Duration) -> String {
    let duration = duration.max(Duration::zero());
    let total_seconds = duration.num_seconds();
    let days = total_seconds / 86_400;
    let seconds = total_seconds % 86_400;
    let micros = (duration - Duration::seconds(total_seconds))
        .num_microseconds()
        .unwrap_or_default();

    let mut clock = format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    );
    if micros > 0 {
        clock.push_str(&format!(".{micros:06}"));
    }

    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        days => format!("{days} days, {clock}"),
    }
}
