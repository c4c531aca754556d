//! Wall-clock trigger schedule.
//!
//! Triggers are evaluated against local naive date-times supplied by the
//! caller, so the schedule never reads the clock itself.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};

use crate::error::{AgentError, AgentResult};

/// When a scheduled job fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Once a week on `weekday` at `at`
    Weekly { weekday: Weekday, at: NaiveTime },
    /// Every day at `at`
    Daily { at: NaiveTime },
}

impl Trigger {
    /// First occurrence strictly after `now`.
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        match *self {
            Trigger::Daily { at } => {
                let candidate = now.date().and_time(at);
                if candidate > now {
                    candidate
                } else {
                    candidate + Duration::days(1)
                }
            }
            Trigger::Weekly { weekday, at } => {
                let days_ahead = (7 + weekday.num_days_from_monday()
                    - now.weekday().num_days_from_monday())
                    % 7;
                let candidate = (now.date() + Duration::days(i64::from(days_ahead))).and_time(at);
                if candidate > now {
                    candidate
                } else {
                    candidate + Duration::weeks(1)
                }
            }
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Weekly { weekday, at } => {
                write!(f, "every {} at {}", weekday, at.format("%H:%M"))
            }
            Trigger::Daily { at } => write!(f, "every day at {}", at.format("%H:%M")),
        }
    }
}

/// A registered trigger and the target it dispatches.
#[derive(Debug, Clone)]
pub struct ScheduledJob<T> {
    pub trigger: Trigger,
    pub target: T,
    pub next_run: NaiveDateTime,
}

/// Ordered set of triggers.
#[derive(Debug, Clone)]
pub struct Schedule<T> {
    jobs: Vec<ScheduledJob<T>>,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self { jobs: Vec::new() }
    }
}

impl<T: Clone> Schedule<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger. Its first run is the next occurrence after `now`.
    pub fn every(&mut self, trigger: Trigger, target: T, now: NaiveDateTime) {
        self.jobs.push(ScheduledJob {
            trigger,
            target,
            next_run: trigger.next_after(now),
        });
    }

    /// Targets of every due job, in registration order.
    ///
    /// Each due job is moved to its next occurrence after `now`, so a job that
    /// was missed several times fires once.
    pub fn run_pending(&mut self, now: NaiveDateTime) -> Vec<T> {
        let mut due = Vec::new();
        for job in &mut self.jobs {
            if job.next_run <= now {
                due.push(job.target.clone());
                job.next_run = job.trigger.next_after(now);
            }
        }
        due
    }

    /// Earliest pending run.
    pub fn next_run(&self) -> Option<NaiveDateTime> {
        self.jobs.iter().map(|j| j.next_run).min()
    }

    /// Time until the earliest pending run, zero if one is already due.
    pub fn idle_duration(&self, now: NaiveDateTime) -> Option<Duration> {
        self.next_run()
            .map(|next| (next - now).max(Duration::zero()))
    }

    pub fn jobs(&self) -> impl Iterator<Item = &ScheduledJob<T>> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}

/// Parse an `HH:MM` time of day.
pub fn parse_time(s: &str) -> AgentResult<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| AgentError::config_error(format!("Invalid time '{}', expected HH:MM", s)))
}

/// Parse an English weekday name, short or long, any case.
pub fn parse_weekday(s: &str) -> AgentResult<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| AgentError::config_error(format!("Invalid weekday '{}'", s)))
}

/// Parse a comma-separated list with `parse`, skipping empty entries.
pub fn parse_list<T>(s: &str, parse: impl Fn(&str) -> AgentResult<T>) -> AgentResult<Vec<T>> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2024-01-01 is a Monday.

    #[test]
    fn test_daily_next_after() {
        let trigger = Trigger::Daily { at: time(8, 0) };
        assert_eq!(trigger.next_after(at(2024, 1, 1, 7, 59)), at(2024, 1, 1, 8, 0));
        assert_eq!(trigger.next_after(at(2024, 1, 1, 8, 0)), at(2024, 1, 2, 8, 0));
        assert_eq!(trigger.next_after(at(2024, 1, 1, 23, 0)), at(2024, 1, 2, 8, 0));
    }

    #[test]
    fn test_weekly_next_after() {
        let monday = Trigger::Weekly {
            weekday: Weekday::Mon,
            at: time(15, 0),
        };
        let thursday = Trigger::Weekly {
            weekday: Weekday::Thu,
            at: time(15, 0),
        };

        assert_eq!(monday.next_after(at(2024, 1, 1, 9, 0)), at(2024, 1, 1, 15, 0));
        assert_eq!(monday.next_after(at(2024, 1, 1, 15, 0)), at(2024, 1, 8, 15, 0));
        assert_eq!(thursday.next_after(at(2024, 1, 1, 9, 0)), at(2024, 1, 4, 15, 0));
        assert_eq!(thursday.next_after(at(2024, 1, 6, 9, 0)), at(2024, 1, 11, 15, 0));
    }

    #[test]
    fn test_run_pending_fires_due_jobs_in_order() {
        let start = at(2024, 1, 1, 7, 0);
        let mut schedule = Schedule::new();
        schedule.every(Trigger::Daily { at: time(10, 0) }, "ten", start);
        schedule.every(Trigger::Daily { at: time(8, 0) }, "eight", start);

        assert!(schedule.run_pending(at(2024, 1, 1, 7, 59)).is_empty());
        assert_eq!(schedule.run_pending(at(2024, 1, 1, 8, 0)), vec!["eight"]);
        assert!(schedule.run_pending(at(2024, 1, 1, 8, 1)).is_empty());
        assert_eq!(
            schedule.run_pending(at(2024, 1, 1, 12, 0)),
            vec!["ten"]
        );
        assert_eq!(
            schedule.run_pending(at(2024, 1, 2, 11, 0)),
            vec!["ten", "eight"]
        );
    }

    #[test]
    fn test_missed_occurrences_fire_once() {
        let mut schedule = Schedule::new();
        schedule.every(Trigger::Daily { at: time(8, 0) }, 1, at(2024, 1, 1, 0, 0));

        // Three days asleep
        assert_eq!(schedule.run_pending(at(2024, 1, 4, 9, 0)), vec![1]);
        assert_eq!(schedule.next_run(), Some(at(2024, 1, 5, 8, 0)));
    }

    #[test]
    fn test_next_run_and_idle_duration() {
        let now = at(2024, 1, 1, 9, 0);
        let mut schedule: Schedule<u8> = Schedule::new();
        assert_eq!(schedule.next_run(), None);
        assert_eq!(schedule.idle_duration(now), None);

        schedule.every(Trigger::Daily { at: time(12, 0) }, 1, now);
        schedule.every(Trigger::Daily { at: time(10, 30) }, 2, now);

        assert_eq!(schedule.next_run(), Some(at(2024, 1, 1, 10, 30)));
        assert_eq!(schedule.idle_duration(now), Some(Duration::minutes(90)));
        assert_eq!(
            schedule.idle_duration(at(2024, 1, 1, 11, 0)),
            Some(Duration::zero())
        );
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("15:00").unwrap(), time(15, 0));
        assert_eq!(parse_time(" 08:30 ").unwrap(), time(8, 30));
        assert!(matches!(parse_time("24:00"), Err(AgentError::Config(_))));
        assert!(parse_time("3pm").is_err());
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("Thu").unwrap(), Weekday::Thu);
        assert_eq!(parse_weekday("SUNDAY").unwrap(), Weekday::Sun);
        assert!(parse_weekday("someday").is_err());
    }

    #[test]
    fn test_parse_list() {
        let days = parse_list("monday, thursday,", parse_weekday).unwrap();
        assert_eq!(days, vec![Weekday::Mon, Weekday::Thu]);
        assert!(parse_list("08:00,nope", parse_time).is_err());
    }

    #[test]
    fn test_trigger_display() {
        let weekly = Trigger::Weekly {
            weekday: Weekday::Mon,
            at: time(15, 0),
        };
        assert_eq!(weekly.to_string(), "every Mon at 15:00");
        assert_eq!(
            Trigger::Daily { at: time(8, 0) }.to_string(),
            "every day at 08:00"
        );
    }
}
