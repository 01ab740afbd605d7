use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::model::{Location, Prayer, PrayerSchedule};

/// Which prayer is in progress and which comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrayerStatus {
    /// `None` before the day's first prayer.
    pub current: Option<Prayer>,
    /// Wraps to (tomorrow's) Fajr once Isha has passed.
    pub next: Prayer,
}

/// Parse a timings value such as `"05:10"` or `"05:10 (EET)"`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let hhmm = raw.split_whitespace().next()?;
    NaiveTime::parse_from_str(hhmm, "%H:%M").ok()
}

/// Convert a time of day to 12-hour form, e.g. `13:05` becomes `"1:05 PM"`.
pub fn format_twelve_hour(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Classify the five prayers against the current wall-clock time.
///
/// Single pass in canonical order at minute resolution: current is the last
/// prayer whose time is at or before `now`, next is the first one after it.
pub fn classify_prayers(schedule: &PrayerSchedule, now: NaiveTime) -> PrayerStatus {
    let now = truncate_to_minute(now);
    let mut current = None;

    for (prayer, time) in schedule.iter() {
        if time > now {
            return PrayerStatus {
                current,
                next: prayer,
            };
        }
        current = Some(prayer);
    }

    PrayerStatus {
        current,
        next: Prayer::Fajr,
    }
}

/// Time remaining until `next` starts, looking into tomorrow when it has
/// already passed today.
pub fn time_until(schedule: &PrayerSchedule, next: Prayer, now: NaiveTime) -> Duration {
    let now = truncate_to_minute(now);
    let target = schedule.time(next);
    let diff = target - now;
    if diff <= Duration::zero() {
        diff + Duration::days(1)
    } else {
        diff
    }
}

/// Render a countdown as `"2h 05m"`, or `"45m"` below one hour.
pub fn format_countdown(remaining: Duration) -> String {
    let total = remaining.num_minutes().max(0);
    let (hours, minutes) = (total / 60, total % 60);
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Header date line, e.g. `"Sunday, October 18, 2026"`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Plain-text schedule for terminal output: header lines, then one row per
/// prayer with `now` / `next` markers.
pub fn render_report(location: &Location, schedule: &PrayerSchedule, now: NaiveDateTime) -> String {
    let status = classify_prayers(schedule, now.time());
    let countdown = format_countdown(time_until(schedule, status.next, now.time()));

    let mut out = format!(
        "{}\n{}\n\n",
        location.display_name,
        format_long_date(now.date())
    );
    for (prayer, time) in schedule.iter() {
        let (marker, note) = if status.current == Some(prayer) {
            (">", "now".to_string())
        } else if status.next == prayer {
            (" ", format!("next in {}", countdown))
        } else {
            (" ", String::new())
        };
        let line = format!(
            "{} {:<8}{:>8}   {}",
            marker,
            prayer.to_string(),
            format_twelve_hour(time),
            note
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}
