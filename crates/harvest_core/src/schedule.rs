use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};

/// Daily trigger times for the harvest run, local clock, kept sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerTimes(Vec<NaiveTime>);

impl Default for TriggerTimes {
    fn default() -> Self {
        Self(
            [(9, 0), (15, 0), (21, 0)]
                .iter()
                .filter_map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0))
                .collect(),
        )
    }
}

impl TriggerTimes {
    /// Builds a sorted trigger list. An empty input falls back to the
    /// default 09:00 / 15:00 / 21:00 schedule.
    pub fn new(mut times: Vec<NaiveTime>) -> Self {
        if times.is_empty() {
            return Self::default();
        }
        times.sort();
        Self(times)
    }

    pub fn times(&self) -> &[NaiveTime] {
        &self.0
    }
}

/// Soonest configured trigger strictly after `now`; rolls over to the
/// following day's first trigger when none remain today.
pub fn next_run_after(now: DateTime<Local>, triggers: &TriggerTimes) -> DateTime<Local> {
    for day_offset in 0..=2 {
        let date = now.date_naive() + Duration::days(day_offset);
        for &time in triggers.times() {
            // A local time can be skipped by a DST gap; just move on.
            let Some(candidate) = Local.from_local_datetime(&date.and_time(time)).earliest()
            else {
                continue;
            };
            if candidate > now {
                return candidate;
            }
        }
    }
    // Unreachable with a non-empty trigger list.
    now + Duration::days(1)
}
