use chrono::{Local, NaiveDate};
use log::{debug, error, info};
use std::time::Duration;

use crate::budget_data_processor::*;
use crate::budget_formatter::*;
use crate::constants::*;
use crate::email_sender::*;
use crate::errors::*;
use crate::report_generator::*;
use crate::report_renderer::*;
use crate::scheduler::*;
use crate::types::*;
use crate::utilities::*;
use crate::ynab_client::*;

pub struct ReportMailer<'a> {
    ynab_client: &'a YnabBudgetClient<'a>,
    /// `None` prints reports to stdout instead of mailing them.
    email_sender: Option<&'a EmailSender>,
    threshold_percent: u32,
}

impl<'a> ReportMailer<'a> {
    pub fn new(
        ynab_client: &'a YnabBudgetClient<'a>,
        email_sender: Option<&'a EmailSender>,
        threshold_percent: u32,
    ) -> ReportMailer<'a> {
        ReportMailer {
            ynab_client,
            email_sender,
            threshold_percent,
        }
    }

    pub fn send_report(&self, kind: ReportKind, today: NaiveDate) -> Result<()> {
        println!("Generating {} for {}...", kind, format_iso_date(today));
        let settings = self.ynab_client.get_budget_settings()?;
        debug!("Budget settings received from YNAB: {:#?}", &settings);
        let formatter = BudgetFormatter::new(&settings);
        let renderer = ReportRenderer::new(&formatter);
        let processor = BudgetDataProcessor::new(self.ynab_client, today);
        let report = match kind {
            ReportKind::DailyAlert => {
                renderer.render_daily_alert(&self.daily_alert(&processor, today)?)
            }
            ReportKind::WeeklyRecap => {
                renderer.render_weekly_recap(&self.weekly_recap(&processor, today)?)
            }
            ReportKind::MonthlyRecap => {
                renderer.render_monthly_recap(&monthly_recap(&processor, today)?)
            }
        };
        self.deliver(report)
            .chain_err(|| format!("Failed to deliver {}", kind))
    }

    /// Sends every report once, carrying on past failures.
    pub fn run_test(&self, today: NaiveDate) -> Result<()> {
        let mut failed = Vec::new();
        for &kind in ReportKind::ALL.iter() {
            if let Err(e) = self.send_report(kind, today) {
                println!("  {} failed: {}", kind, format_error_chain(&e));
                failed.push(kind.to_string());
            }
        }
        if !failed.is_empty() {
            bail!("Failed to send: {}", failed.join(", "));
        }
        println!("All reports sent.");
        Ok(())
    }

    pub fn run_scheduler(&self, schedules: &[ReportSchedule]) -> ! {
        println!("Starting report scheduler:");
        for schedule in schedules {
            println!("  {}: {}", schedule.kind, schedule);
        }
        println!("  Category alert threshold: {}%", self.threshold_percent);
        let mut scheduler = Scheduler::new(schedules, Local::now().naive_local());
        for (kind, next_run) in scheduler.next_runs() {
            info!("Next {} scheduled for {}", kind, next_run);
        }
        scheduler.run_forever(
            Duration::from_secs(SCHEDULER_POLL_INTERVAL_SECS),
            || Local::now().naive_local(),
            |kind| {
                let today = Local::now().naive_local().date();
                match self.send_report(kind, today) {
                    Ok(()) => info!("Sent {}", kind),
                    Err(e) => error!("Failed to send {}: {}", kind, format_error_chain(&e)),
                }
            },
        )
    }

    fn daily_alert(&self, processor: &BudgetDataProcessor, today: NaiveDate) -> Result<DailyAlert> {
        let uncategorized = processor.get_uncategorized_transactions()?;
        let (category_status, ready_to_assign) =
            processor.get_category_status(self.threshold_percent)?;
        Ok(DailyAlert::generate(
            today,
            uncategorized,
            category_status,
            ready_to_assign,
            self.threshold_percent,
        ))
    }

    fn weekly_recap(&self, processor: &BudgetDataProcessor, today: NaiveDate) -> Result<WeeklyRecap> {
        let transactions = processor.get_last_week_transactions()?;
        let category_spending = aggregate_by_category(&transactions);
        let upcoming = processor.get_upcoming_scheduled_transactions(WEEKLY_UPCOMING_DAYS_AHEAD)?;
        let (category_status, _) = processor.get_category_status(self.threshold_percent)?;
        Ok(WeeklyRecap::generate(
            today,
            &transactions,
            category_spending,
            upcoming,
            category_status,
            self.threshold_percent,
        ))
    }

    fn deliver(&self, report: RenderedReport) -> Result<()> {
        match self.email_sender {
            Some(email_sender) => email_sender.send_email(&report.subject, report.html, report.text),
            None => {
                println!("  Dry run, not sending \"{}\":", report.subject);
                println!();
                println!("{}", report.text);
                debug!("HTML body: {}", report.html);
                Ok(())
            }
        }
    }
}

fn monthly_recap(processor: &BudgetDataProcessor, today: NaiveDate) -> Result<MonthlyRecap> {
    let transactions = processor.get_last_month_transactions()?;
    let category_spending = aggregate_by_category(&transactions);
    let recurring = processor.get_recurring_scheduled_this_month()?;
    Ok(MonthlyRecap::generate(
        today,
        &transactions,
        category_spending,
        recurring,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    const SETTINGS_BODY: &str = r#"{"data": {"settings": {
        "date_format": {"format": "MM/DD/YYYY"},
        "currency_format": {"iso_code": "USD", "example_format": "123,456.78",
            "decimal_digits": 2, "decimal_separator": ".", "symbol_first": true,
            "group_separator": ",", "currency_symbol": "$", "display_symbol": true}
    }}}"#;
    const TRANSACTIONS_BODY: &str = r#"{"data": {"transactions": [
        {"id": "t1", "date": "2024-03-08", "amount": -12500, "account_name": "Checking",
         "payee_name": "Market", "category_id": "c1", "category_name": "Groceries"},
        {"id": "t2", "date": "2024-03-09", "amount": -3000, "account_name": "Checking",
         "payee_name": "Hardware"}
    ], "server_knowledge": 3}}"#;
    const MONTH_BODY: &str = r#"{"data": {"month": {"month": "2024-03-01",
        "to_be_budgeted": 250000, "categories": [
            {"id": "c1", "name": "Groceries", "budgeted": 400000, "activity": -350000,
             "balance": 50000, "deleted": false}
        ]}}}"#;
    const SCHEDULED_BODY: &str = r#"{"data": {"scheduled_transactions": [
        {"id": "st1", "date_next": "2024-03-15", "frequency": "monthly", "amount": -1500000,
         "payee_name": "Landlord", "category_name": "Rent"}
    ], "server_knowledge": 3}}"#;

    fn mock_json(server: &mut mockito::ServerGuard, path: &str, body: &str) -> mockito::Mock {
        server
            .mock("GET", path)
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create()
    }

    #[test]
    fn test_run_test_sends_every_report() {
        let mut server = mockito::Server::new();
        let _settings = mock_json(&mut server, "/budgets/b1/settings", SETTINGS_BODY);
        let _transactions = mock_json(&mut server, "/budgets/b1/transactions", TRANSACTIONS_BODY);
        let _month = mock_json(&mut server, "/budgets/b1/months/2024-03-01", MONTH_BODY);
        let _scheduled = mock_json(
            &mut server,
            "/budgets/b1/scheduled_transactions",
            SCHEDULED_BODY,
        );
        let url = server.url();
        let ynab_client = YnabBudgetClient::new(&url, "token", "b1");
        let report_mailer = ReportMailer::new(&ynab_client, None, 80);
        assert!(report_mailer.run_test(date(2024, 3, 11)).is_ok());
    }

    #[test]
    fn test_run_test_continues_past_failures() {
        let mut server = mockito::Server::new();
        let _settings = mock_json(&mut server, "/budgets/b1/settings", SETTINGS_BODY);
        let _transactions = mock_json(&mut server, "/budgets/b1/transactions", TRANSACTIONS_BODY);
        let month_mock = server
            .mock("GET", "/budgets/b1/months/2024-03-01")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(MONTH_BODY)
            .expect(1)
            .create();
        let scheduled_mock = server
            .mock("GET", "/budgets/b1/scheduled_transactions")
            .with_status(500)
            .with_body("internal error")
            .expect(2)
            .create();
        let url = server.url();
        let ynab_client = YnabBudgetClient::new(&url, "token", "b1");
        let report_mailer = ReportMailer::new(&ynab_client, None, 80);
        let error = report_mailer.run_test(date(2024, 3, 11)).unwrap_err();
        assert_eq!(
            format_error_chain(&error),
            "Failed to send: weekly recap, monthly recap"
        );
        // Only the daily alert got as far as the month; the monthly recap was
        // still attempted after the weekly recap failed.
        month_mock.assert();
        scheduled_mock.assert();
    }

    #[test]
    fn test_send_report_fails_for_single_report() {
        let mut server = mockito::Server::new();
        let _settings = server
            .mock("GET", "/budgets/b1/settings")
            .with_status(500)
            .create();
        let url = server.url();
        let ynab_client = YnabBudgetClient::new(&url, "token", "b1");
        let report_mailer = ReportMailer::new(&ynab_client, None, 80);
        let error = report_mailer
            .send_report(ReportKind::DailyAlert, date(2024, 3, 11))
            .unwrap_err();
        assert!(format_error_chain(&error).starts_with("Failed to load budget settings from YNAB"));
    }
}
