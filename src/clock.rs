use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const MONTHS: [&str; 12] = [
    "januar", "februar", "mart", "april", "maj", "jun",
    "jul", "avgust", "septembar", "oktobar", "novembar", "decembar",
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "ponedeljak",
        Weekday::Tue => "utorak",
        Weekday::Wed => "sreda",
        Weekday::Thu => "četvrtak",
        Weekday::Fri => "petak",
        Weekday::Sat => "subota",
        Weekday::Sun => "nedelja",
    }
}

/// Long Serbian (Latin) date, e.g. "utorak, 24. decembar 2024."
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{}, {}. {} {}.",
        weekday_name(date.weekday()),
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    pub date: String,
    pub time: String,
}

impl ClockReading {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            date: format_long_date(now.date()),
            time: format!("{:02}:{:02}", now.hour(), now.minute()),
        }
    }

    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }
}

/// Header clock refreshed on a fixed period by a background task.
/// Dropping the clock stops the task.
pub struct HeaderClock {
    rx: watch::Receiver<ClockReading>,
    task: JoinHandle<()>,
}

impl HeaderClock {
    /// Must be called from within a tokio runtime
    pub fn start(period: Duration) -> Self {
        let (tx, rx) = watch::channel(ClockReading::now());
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if tx.send(ClockReading::now()).is_err() {
                    break;
                }
            }
        });
        Self { rx, task }
    }

    pub fn current(&self) -> ClockReading {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ClockReading> {
        self.rx.clone()
    }
}

impl Drop for HeaderClock {
    fn drop(&mut self) {
        self.task.abort();
    }
}
