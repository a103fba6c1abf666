use tracing::debug;

pub const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Year,
    All,
}

impl Period {
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "week" => Period::Week,
            "month" => Period::Month,
            "year" => Period::Year,
            "all" => Period::All,
            other => {
                debug!(token = other, "unknown period token, using week");
                Period::Week
            }
        }
    }

    pub fn days(self) -> Option<i64> {
        match self {
            Period::Week => Some(7),
            Period::Month => Some(30),
            Period::Year => Some(365),
            Period::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<i64>,
    pub end: i64,
}

impl TimeRange {
    pub fn last_days(days: i64, now: i64) -> Self {
        Self {
            start: Some(now - days * SECONDS_PER_DAY),
            end: now,
        }
    }

    pub fn bounds(&self) -> Option<(i64, i64)> {
        self.start.map(|start| (start, self.end))
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        match self.bounds() {
            Some((start, end)) => (start..=end).contains(&timestamp),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    Period(Period),
    Explicit(TimeRange),
}

impl RangeSpec {
    pub fn resolve(self, now: i64) -> TimeRange {
        match self {
            RangeSpec::Period(period) => resolve_range(period, now),
            RangeSpec::Explicit(range) => range,
        }
    }
}

// Whole multiples of 86 400 s, not local midnights.
pub fn resolve_range(period: Period, now: i64) -> TimeRange {
    match period.days() {
        Some(days) => TimeRange::last_days(days, now),
        None => TimeRange { start: None, end: now },
    }
}
