//! Display formatting for catalog values. Output strings are Russian, as
//! shown in the UI.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};

const MINUTES_PER_DAY: u64 = 1440;
const MINUTES_PER_HOUR: u64 = 60;

const MONTHS_SHORT: [&str; 12] = [
    "янв.", "февр.", "мар.", "апр.", "мая", "июн.", "июл.", "авг.", "сент.", "окт.", "нояб.",
    "дек.",
];

const SEASON_NAMES: [Option<&str>; 5] = [None, Some("Зима"), Some("Весна"), Some("Лето"), Some("Осень")];

/// A minute count split into whole days, hours and remaining minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

pub fn get_string_time(total_minutes: u64) -> StringTime {
    StringTime {
        days: total_minutes / MINUTES_PER_DAY,
        hours: (total_minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR,
        minutes: total_minutes % MINUTES_PER_HOUR,
    }
}

/// Picks the word form for `number` from `[one, few, many]`
/// (e.g. `["день", "дня", "дней"]`).
pub fn numeric_word<'a>(number: i64, words: [&'a str; 3]) -> &'a str {
    let number = number.unsigned_abs();
    if (5..=19).contains(&(number % 100)) {
        return words[2];
    }
    match number % 10 {
        1 => words[0],
        2..=4 => words[1],
        _ => words[2],
    }
}

/// "3 дня 4 часа", hours left out when zero. Used for watch-time stats.
pub fn full_string_time(total_minutes: u64) -> String {
    let StringTime { days, hours, .. } = get_string_time(total_minutes);
    let mut text = format!(
        "{days} {}",
        numeric_word(days as i64, ["день", "дня", "дней"])
    );
    if hours != 0 {
        text.push_str(&format!(
            " {hours} {}",
            numeric_word(hours as i64, ["час", "часа", "часов"])
        ));
    }
    text
}

/// Episode progress: "12" when complete, "? из 24" when the released count is
/// unknown, "?" when nothing is known.
pub fn episode_string(released: Option<u32>, total: Option<u32>) -> String {
    let unknown = || "?".to_string();
    let released = released.map_or_else(unknown, |count| count.to_string());
    let total = total.map_or_else(unknown, |count| count.to_string());

    if released == total {
        total
    } else {
        format!("{released} из {total}")
    }
}

pub fn age_rating(code: i64) -> &'static str {
    match code {
        2 => "6+",
        3 => "12+",
        4 => "16+",
        5 => "18+",
        _ => "0+",
    }
}

/// `DD.MM` for a unix timestamp in seconds, in local time.
pub fn short_date(unix_secs: i64) -> String {
    short_date_in(unix_secs, &Local)
}

pub fn short_date_in<Tz: TimeZone>(unix_secs: i64, tz: &Tz) -> String {
    let date = DateTime::from_timestamp(unix_secs, 0)
        .unwrap_or_default()
        .with_timezone(tz);
    format!("{:02}.{:02}", date.day(), date.month())
}

/// "5 янв. 2024 в 9:07" for a unix timestamp in milliseconds, local time.
pub fn time_string(unix_millis: i64, show_year: bool) -> String {
    time_string_in(unix_millis, show_year, &Local)
}

pub fn time_string_in<Tz: TimeZone>(unix_millis: i64, show_year: bool, tz: &Tz) -> String {
    let date = DateTime::from_timestamp_millis(unix_millis)
        .unwrap_or_default()
        .with_timezone(tz);
    let month = MONTHS_SHORT[date.month0() as usize];
    let clock = format!("{}:{:02}", date.hour(), date.minute());

    if show_year {
        format!("{} {month} {} в {clock}", date.day(), date.year())
    } else {
        format!("{} {month} в {clock}", date.day())
    }
}

/// Playback position as `MM:SS`, or `HH:MM:SS` once past the first hour.
pub fn formatted_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours == 0 {
        format!("{minutes:02}:{secs:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    }
}

/// Announcement data for a release that has not aired yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpcomingRelease {
    /// Unix seconds, `0` when no date is announced.
    pub aired_on_date: i64,
    pub year: Option<i32>,
    /// 1 winter .. 4 autumn.
    pub season: Option<u8>,
}

pub fn soon_text(release: &UpcomingRelease) -> String {
    soon_text_in(release, &Local)
}

pub fn soon_text_in<Tz: TimeZone>(release: &UpcomingRelease, tz: &Tz) -> String {
    if release.aired_on_date != 0 {
        let date = DateTime::<Utc>::from_timestamp(release.aired_on_date, 0)
            .unwrap_or_default()
            .with_timezone(tz);
        return format!(
            "{} {} {} год.",
            date.day(),
            MONTHS_SHORT[date.month0() as usize],
            date.year()
        );
    }

    match release.year {
        Some(year) => {
            let season = release
                .season
                .and_then(|season| SEASON_NAMES.get(season as usize).copied().flatten());
            match season {
                Some(season) => format!("{season}, {year} г."),
                None => format!("{year} г."),
            }
        }
        None => "Скоро".to_string(),
    }
}
