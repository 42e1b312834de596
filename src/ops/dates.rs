use chrono::{DateTime, Datelike, Days, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Weekday};

use crate::model::ParseError;

/// Short calendar form used in lists: `25/3/9`
pub const SHORT_DATE: &str = "%y/%-m/%-d";

/// 23:59 local time on `date`, the moment a due date refers to.
pub fn end_of_day(date: NaiveDate) -> DateTime<Local> {
    let naive = date.and_time(NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN));
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(_, latest) => latest,
        LocalResult::None => Local.from_utc_datetime(&naive),
    }
}

/// Quick choices offered by the due-date overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuePreset {
    Today,
    Tomorrow,
    NextWeek,
    Clear,
    Custom,
}

impl DuePreset {
    pub const ALL: [DuePreset; 5] = [
        DuePreset::Today,
        DuePreset::Tomorrow,
        DuePreset::NextWeek,
        DuePreset::Clear,
        DuePreset::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DuePreset::Today => "Today",
            DuePreset::Tomorrow => "Tomorrow",
            DuePreset::NextWeek => "Next week",
            DuePreset::Clear => "Clear",
            DuePreset::Custom => "Custom...",
        }
    }

    /// The date this preset stands for; `None` for Clear and Custom.
    pub fn due_date(self, today: NaiveDate) -> Option<DateTime<Local>> {
        let days = match self {
            DuePreset::Today => 0,
            DuePreset::Tomorrow => 1,
            DuePreset::NextWeek => 7,
            DuePreset::Clear | DuePreset::Custom => return None,
        };
        today.checked_add_days(Days::new(days)).map(end_of_day)
    }
}

/// Rejected input in the custom date prompt
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateInputError {
    #[error("Date is required")]
    Empty,
    #[error("Invalid date format (use YYYY-MM-DD)")]
    Format,
}

/// Strict `YYYY-MM-DD` parsing for the custom due-date prompt.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, DateInputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DateInputError::Empty);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| DateInputError::Format)
}

/// Parse a due date typed on the command line.
///
/// Accepts `today`, `tomorrow`, `next week`, offsets like `3d` or `2w`,
/// weekday names (the next such day), `YYYY-MM-DD`, and year-less `MM-DD`,
/// `MM/DD` or `Jan 2` (this year, or next year once the day has passed).
pub fn parse_due_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    let s = input.trim().to_ascii_lowercase();
    let invalid = || ParseError::Date(input.to_string());

    match s.as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" | "tmr" => return today.succ_opt().ok_or_else(invalid),
        "next week" | "nextweek" => {
            return today.checked_add_days(Days::new(7)).ok_or_else(invalid);
        }
        _ => {}
    }

    if let Some(n) = s.strip_suffix('d').and_then(|n| n.parse::<u64>().ok()) {
        return today.checked_add_days(Days::new(n)).ok_or_else(invalid);
    }
    if let Some(n) = s.strip_suffix('w').and_then(|n| n.parse::<u64>().ok()) {
        return n
            .checked_mul(7)
            .and_then(|days| today.checked_add_days(Days::new(days)))
            .ok_or_else(invalid);
    }

    if let Ok(weekday) = s.parse::<Weekday>() {
        let ahead = (7 + weekday.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64)
            % 7;
        let ahead = if ahead == 0 { 7 } else { ahead };
        return today
            .checked_add_days(Days::new(ahead as u64))
            .ok_or_else(invalid);
    }

    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(date);
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y %b %d", "%Y %B %d"] {
        let with_year = match fmt {
            "%Y-%m-%d" => format!("{}-{}", today.year(), s),
            "%Y/%m/%d" => format!("{}/{}", today.year(), s),
            _ => format!("{} {}", today.year(), s),
        };
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, fmt) {
            if date < today {
                return date
                    .with_year(today.year() + 1)
                    .ok_or_else(invalid);
            }
            return Ok(date);
        }
    }

    Err(invalid())
}

/// How urgent a due date is relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueUrgency {
    Overdue,
    Today,
    Later,
}

/// `by Today`, `by Fri`, `by 25/4/30` and so on.
pub fn due_label(due: DateTime<Local>, today: NaiveDate) -> (String, DueUrgency) {
    let days = (due.date_naive() - today).num_days();
    let (text, urgency) = match days {
        d if d < 0 => ("Overdue".to_string(), DueUrgency::Overdue),
        0 => ("Today".to_string(), DueUrgency::Today),
        1 => ("Tomorrow".to_string(), DueUrgency::Later),
        2..=7 => (due.format("%a").to_string(), DueUrgency::Later),
        _ => (due.format(SHORT_DATE).to_string(), DueUrgency::Later),
    };
    (format!("by {}", text), urgency)
}

/// `✓ 25/3/9 14:05`, plus `(+2d)` / `(-1d)` when finished after / before the due day.
pub fn completion_label(completed: DateTime<Local>, due: Option<DateTime<Local>>) -> String {
    let mut text = format!("\u{2713} {}", completed.format("%y/%-m/%-d %H:%M"));
    if let Some(due) = due {
        let diff = (completed.date_naive() - due.date_naive()).num_days();
        if diff > 0 {
            text.push_str(&format!(" (+{}d)", diff));
        } else if diff < 0 {
            text.push_str(&format!(" ({}d)", diff));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // 2025-03-12 is a Wednesday
    const TODAY: (i32, u32, u32) = (2025, 3, 12);

    fn today() -> NaiveDate {
        d(TODAY.0, TODAY.1, TODAY.2)
    }

    #[test]
    fn test_parse_keywords_and_offsets() {
        assert_eq!(parse_due_date("today", today()), Ok(today()));
        assert_eq!(parse_due_date("Tomorrow", today()), Ok(d(2025, 3, 13)));
        assert_eq!(parse_due_date("next week", today()), Ok(d(2025, 3, 19)));
        assert_eq!(parse_due_date("3d", today()), Ok(d(2025, 3, 15)));
        assert_eq!(parse_due_date("2w", today()), Ok(d(2025, 3, 26)));
    }

    #[test]
    fn test_parse_huge_offsets_are_rejected() {
        let err = ParseError::Date("3000000000000000000w".into());
        assert_eq!(parse_due_date("3000000000000000000w", today()), Err(err));
        assert!(parse_due_date("18446744073709551615d", today()).is_err());
        assert!(parse_due_date("99999999w", today()).is_err());
    }

    #[test]
    fn test_parse_weekday_is_strictly_ahead() {
        assert_eq!(parse_due_date("fri", today()), Ok(d(2025, 3, 14)));
        assert_eq!(parse_due_date("monday", today()), Ok(d(2025, 3, 17)));
        assert_eq!(parse_due_date("wed", today()), Ok(d(2025, 3, 19)));
    }

    #[test]
    fn test_parse_explicit_dates() {
        assert_eq!(parse_due_date("2026-01-05", today()), Ok(d(2026, 1, 5)));
        assert_eq!(parse_due_date("04-01", today()), Ok(d(2025, 4, 1)));
        assert_eq!(parse_due_date("4/1", today()), Ok(d(2025, 4, 1)));
        assert_eq!(parse_due_date("Jan 2", today()), Ok(d(2026, 1, 2)));
        assert_eq!(parse_due_date("03-01", today()), Ok(d(2026, 3, 1)));
        assert!(parse_due_date("someday", today()).is_err());
        assert!(parse_due_date("2025-13-40", today()).is_err());
    }

    #[test]
    fn test_parse_iso_date_messages() {
        assert_eq!(parse_iso_date("2025-04-01"), Ok(d(2025, 4, 1)));
        assert_eq!(
            parse_iso_date("  ").unwrap_err().to_string(),
            "Date is required"
        );
        assert_eq!(
            parse_iso_date("04/01/2025").unwrap_err().to_string(),
            "Invalid date format (use YYYY-MM-DD)"
        );
    }

    #[test]
    fn test_presets() {
        let today = today();
        let tomorrow = DuePreset::Tomorrow.due_date(today).unwrap();
        assert_eq!(tomorrow.date_naive(), d(2025, 3, 13));
        assert_eq!(tomorrow.format("%H:%M").to_string(), "23:59");
        assert_eq!(
            DuePreset::NextWeek.due_date(today).map(|dt| dt.date_naive()),
            Some(d(2025, 3, 19))
        );
        assert_eq!(DuePreset::Clear.due_date(today), None);
        assert_eq!(DuePreset::Custom.due_date(today), None);
    }

    #[test]
    fn test_due_labels() {
        let today = today();
        let label = |date: NaiveDate| due_label(end_of_day(date), today);
        assert_eq!(label(d(2025, 3, 11)), ("by Overdue".into(), DueUrgency::Overdue));
        assert_eq!(label(today), ("by Today".into(), DueUrgency::Today));
        assert_eq!(label(d(2025, 3, 13)).0, "by Tomorrow");
        assert_eq!(label(d(2025, 3, 14)).0, "by Fri");
        assert_eq!(label(d(2025, 4, 30)).0, "by 25/4/30");
    }

    #[test]
    fn test_completion_label() {
        let done = end_of_day(d(2025, 3, 14));
        assert_eq!(completion_label(done, None), "\u{2713} 25/3/14 23:59");
        assert_eq!(
            completion_label(done, Some(end_of_day(d(2025, 3, 12)))),
            "\u{2713} 25/3/14 23:59 (+2d)"
        );
        assert_eq!(
            completion_label(done, Some(end_of_day(d(2025, 3, 15)))),
            "\u{2713} 25/3/14 23:59 (-1d)"
        );
    }
}
