use chrono::{DateTime, Local};
use serde::Serialize;

use super::ParseError;

/// How often a recurring task repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Daily,
        Pattern::Weekly,
        Pattern::Monthly,
        Pattern::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Pattern::Daily => "daily",
            Pattern::Weekly => "weekly",
            Pattern::Monthly => "monthly",
            Pattern::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pattern::Daily => "Daily",
            Pattern::Weekly => "Weekly",
            Pattern::Monthly => "Monthly",
            Pattern::Yearly => "Yearly",
        }
    }

    fn unit_plural(self) -> &'static str {
        match self {
            Pattern::Daily => "days",
            Pattern::Weekly => "weeks",
            Pattern::Monthly => "months",
            Pattern::Yearly => "years",
        }
    }

    pub fn parse(s: &str) -> Result<Pattern, ParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "d" => Ok(Pattern::Daily),
            "weekly" | "w" => Ok(Pattern::Weekly),
            "monthly" | "m" => Ok(Pattern::Monthly),
            "yearly" | "y" => Ok(Pattern::Yearly),
            _ => Err(ParseError::Pattern(s.to_string())),
        }
    }
}

/// Parse a repeat spec such as `weekly` or `daily:3` into pattern + interval.
pub fn parse_repeat(spec: &str) -> Result<(Pattern, u32), ParseError> {
    let (pattern, interval) = match spec.split_once(':') {
        Some((p, n)) => {
            let n: u32 = n
                .trim()
                .parse()
                .map_err(|_| ParseError::Interval(n.to_string()))?;
            if n == 0 {
                return Err(ParseError::Interval(n.to_string()));
            }
            (p, n)
        }
        None => (spec, 1),
    };
    Ok((Pattern::parse(pattern)?, interval))
}

/// The recurring series attached to whichever task is its current instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recurrence {
    pub id: i64,
    pub task_id: i64,
    pub pattern: Pattern,
    pub interval: u32,
    pub next_due: DateTime<Local>,
}

impl Recurrence {
    /// Unsaved recurrence; an interval of 0 is raised to 1.
    pub fn new(task_id: i64, pattern: Pattern, interval: u32, next_due: DateTime<Local>) -> Self {
        Recurrence {
            id: 0,
            task_id,
            pattern,
            interval: interval.max(1),
            next_due,
        }
    }

    /// `weekly`, or `every 3 weeks` when the interval is above one
    pub fn pattern_label(&self) -> String {
        if self.interval == 1 {
            self.pattern.as_str().to_string()
        } else {
            format!("every {} {}", self.interval, self.pattern.unit_plural())
        }
    }
}
