use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use log::info;
use std::fmt;
use std::thread;

use crate::types::*;
use crate::utilities::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cadence {
    Daily,
    Weekly(Weekday),
    /// First day of every month.
    Monthly,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReportSchedule {
    pub kind: ReportKind,
    pub cadence: Cadence,
    pub time: NaiveTime,
}

#[derive(Debug)]
struct ScheduledJob {
    schedule: ReportSchedule,
    next_run: NaiveDateTime,
}

#[derive(Debug)]
pub struct Scheduler {
    jobs: Vec<ScheduledJob>,
}

impl Cadence {
    fn matches(self, date: NaiveDate) -> bool {
        match self {
            Cadence::Daily => true,
            Cadence::Weekly(weekday) => date.weekday() == weekday,
            Cadence::Monthly => date.day() == 1,
        }
    }
}

impl ReportSchedule {
    pub fn new(kind: ReportKind, cadence: Cadence, time: NaiveTime) -> ReportSchedule {
        ReportSchedule {
            kind,
            cadence,
            time,
        }
    }

    /// First instant strictly after `now` that matches this schedule.
    pub fn next_run_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let mut date = now.date();
        loop {
            let candidate = date.and_time(self.time);
            if candidate > now && self.cadence.matches(date) {
                return candidate;
            }
            date = date + Duration::days(1);
        }
    }
}

impl fmt::Display for ReportSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.time.format("%H:%M");
        match self.cadence {
            Cadence::Daily => write!(f, "every day at {}", time),
            Cadence::Weekly(weekday) => write!(f, "every {} at {}", weekday_name(weekday), time),
            Cadence::Monthly => write!(f, "1st of the month at {}", time),
        }
    }
}

impl Scheduler {
    pub fn new(schedules: &[ReportSchedule], now: NaiveDateTime) -> Scheduler {
        Scheduler {
            jobs: schedules
                .iter()
                .map(|&schedule| ScheduledJob {
                    schedule,
                    next_run: schedule.next_run_after(now),
                })
                .collect(),
        }
    }

    /// Returns the reports due at `now` in registration order and advances
    /// each of them to its next run.
    pub fn take_due(&mut self, now: NaiveDateTime) -> Vec<ReportKind> {
        let mut due = Vec::new();
        for job in &mut self.jobs {
            if job.next_run <= now {
                due.push(job.schedule.kind);
                job.next_run = job.schedule.next_run_after(now);
                info!("Next {} scheduled for {}", job.schedule.kind, job.next_run);
            }
        }
        due
    }

    pub fn next_runs(&self) -> Vec<(ReportKind, NaiveDateTime)> {
        self.jobs
            .iter()
            .map(|job| (job.schedule.kind, job.next_run))
            .collect()
    }

    /// Polls forever, calling `run_report` for every due report. `now` is
    /// consulted on each tick so the loop follows the wall clock.
    pub fn run_forever<N, R>(
        &mut self,
        poll_interval: std::time::Duration,
        now: N,
        mut run_report: R,
    ) -> !
    where
        N: Fn() -> NaiveDateTime,
        R: FnMut(ReportKind),
    {
        loop {
            for kind in self.take_due(now()) {
                run_report(kind);
            }
            thread::sleep(poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_daily_next_run() {
        let schedule = ReportSchedule::new(ReportKind::DailyAlert, Cadence::Daily, time(7, 30));
        assert_eq!(
            schedule.next_run_after(at(2024, 3, 5, 6, 0)),
            at(2024, 3, 5, 7, 30)
        );
        assert_eq!(
            schedule.next_run_after(at(2024, 3, 5, 7, 30)),
            at(2024, 3, 6, 7, 30)
        );
        assert_eq!(
            schedule.next_run_after(at(2024, 12, 31, 9, 0)),
            at(2025, 1, 1, 7, 30)
        );
    }

    #[test]
    fn test_weekly_next_run() {
        let schedule = ReportSchedule::new(
            ReportKind::WeeklyRecap,
            Cadence::Weekly(Weekday::Mon),
            time(8, 0),
        );
        // 2024-03-05 is a Tuesday.
        assert_eq!(
            schedule.next_run_after(at(2024, 3, 5, 6, 0)),
            at(2024, 3, 11, 8, 0)
        );
        assert_eq!(
            schedule.next_run_after(at(2024, 3, 11, 7, 59)),
            at(2024, 3, 11, 8, 0)
        );
        assert_eq!(
            schedule.next_run_after(at(2024, 3, 11, 8, 0)),
            at(2024, 3, 18, 8, 0)
        );
    }

    #[test]
    fn test_monthly_next_run() {
        let schedule = ReportSchedule::new(ReportKind::MonthlyRecap, Cadence::Monthly, time(8, 0));
        assert_eq!(
            schedule.next_run_after(at(2024, 2, 10, 12, 0)),
            at(2024, 3, 1, 8, 0)
        );
        assert_eq!(
            schedule.next_run_after(at(2024, 3, 1, 8, 0)),
            at(2024, 4, 1, 8, 0)
        );
        assert_eq!(
            schedule.next_run_after(at(2023, 12, 15, 0, 0)),
            at(2024, 1, 1, 8, 0)
        );
    }

    #[test]
    fn test_take_due_runs_each_job_once_per_occurrence() {
        let schedules = [
            ReportSchedule::new(ReportKind::DailyAlert, Cadence::Daily, time(7, 30)),
            ReportSchedule::new(
                ReportKind::WeeklyRecap,
                Cadence::Weekly(Weekday::Mon),
                time(8, 0),
            ),
            ReportSchedule::new(ReportKind::MonthlyRecap, Cadence::Monthly, time(8, 0)),
        ];
        // Sunday evening, the day before Monday 2024-04-01.
        let mut scheduler = Scheduler::new(&schedules, at(2024, 3, 31, 20, 0));
        assert!(scheduler.take_due(at(2024, 4, 1, 7, 29)).is_empty());
        assert_eq!(
            scheduler.take_due(at(2024, 4, 1, 7, 30)),
            vec![ReportKind::DailyAlert]
        );
        assert!(scheduler.take_due(at(2024, 4, 1, 7, 31)).is_empty());
        assert_eq!(
            scheduler.take_due(at(2024, 4, 1, 8, 0)),
            vec![ReportKind::WeeklyRecap, ReportKind::MonthlyRecap]
        );
        assert!(scheduler.take_due(at(2024, 4, 1, 8, 1)).is_empty());
        assert_eq!(
            scheduler.next_runs(),
            vec![
                (ReportKind::DailyAlert, at(2024, 4, 2, 7, 30)),
                (ReportKind::WeeklyRecap, at(2024, 4, 8, 8, 0)),
                (ReportKind::MonthlyRecap, at(2024, 5, 1, 8, 0)),
            ]
        );
    }

    #[test]
    fn test_take_due_after_missed_tick_runs_once() {
        let schedules = [ReportSchedule::new(
            ReportKind::DailyAlert,
            Cadence::Daily,
            time(7, 30),
        )];
        let mut scheduler = Scheduler::new(&schedules, at(2024, 3, 5, 6, 0));
        // The process was suspended over two scheduled times.
        assert_eq!(
            scheduler.take_due(at(2024, 3, 7, 9, 0)),
            vec![ReportKind::DailyAlert]
        );
        assert_eq!(
            scheduler.next_runs(),
            vec![(ReportKind::DailyAlert, at(2024, 3, 8, 7, 30))]
        );
    }

    #[test]
    fn test_schedule_display() {
        assert_eq!(
            ReportSchedule::new(ReportKind::DailyAlert, Cadence::Daily, time(7, 30)).to_string(),
            "every day at 07:30"
        );
        assert_eq!(
            ReportSchedule::new(
                ReportKind::WeeklyRecap,
                Cadence::Weekly(Weekday::Mon),
                time(8, 0)
            )
            .to_string(),
            "every Monday at 08:00"
        );
    }
}
