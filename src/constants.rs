use lazy_static::lazy_static;
use regex::Regex;

pub const YNAB_API_BASE_URL: &str = "https://api.ynab.com/v1";
pub const DEFAULT_BUDGET_ID: &str = "default";
pub const UNCATEGORIZED_CATEGORY_NAME: &str = "Uncategorized";

pub const UNCATEGORIZED_LOOKBACK_DAYS: i64 = 30;
pub const WEEKLY_RECAP_LOOKBACK_DAYS: i64 = 7;
pub const WEEKLY_UPCOMING_DAYS_AHEAD: i64 = 14;
pub const SURPLUS_BUDGETED_MULTIPLE: i64 = 2;
pub const SCHEDULER_POLL_INTERVAL_SECS: u64 = 60;

pub const REPORT_ARG: &str = "report";
pub const REPORT_COMMANDS: [&str; 4] = ["daily", "weekly", "monthly", "test"];
pub const TEST_COMMAND: &str = "test";
pub const DRY_RUN_ARG: &str = "dry-run";
pub const YNAB_ACCESS_TOKEN_ARG: &str = "ynab-access-token";
pub const YNAB_ACCESS_TOKEN_ENV: &str = "YNAB_API_TOKEN";
pub const YNAB_BUDGET_ID_ARG: &str = "budget-id";
pub const YNAB_BUDGET_ID_ENV: &str = "YNAB_BUDGET_ID";
pub const SMTP_SERVER_ARG: &str = "smtp-server";
pub const SMTP_SERVER_ENV: &str = "SMTP_SERVER";
pub const SMTP_PORT_ARG: &str = "smtp-port";
pub const SMTP_PORT_ENV: &str = "SMTP_PORT";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const SMTP_USERNAME_ARG: &str = "smtp-username";
pub const SMTP_USERNAME_ENV: &str = "SMTP_USERNAME";
pub const SMTP_PASSWORD_ARG: &str = "smtp-password";
pub const SMTP_PASSWORD_ENV: &str = "SMTP_PASSWORD";
pub const EMAIL_FROM_ARG: &str = "email-from";
pub const EMAIL_FROM_ENV: &str = "EMAIL_FROM";
pub const EMAIL_TO_ARG: &str = "email-to";
pub const EMAIL_TO_ENV: &str = "EMAIL_TO";
pub const THRESHOLD_ARG: &str = "threshold";
pub const THRESHOLD_ENV: &str = "CATEGORY_SPENT_THRESHOLD";
pub const DEFAULT_THRESHOLD_PERCENT: u32 = 80;
pub const DAILY_ALERT_TIME_ARG: &str = "daily-alert-time";
pub const DAILY_ALERT_TIME_ENV: &str = "DAILY_ALERT_TIME";
pub const DEFAULT_DAILY_ALERT_TIME: &str = "07:30";
pub const WEEKLY_RECAP_DAY_ARG: &str = "weekly-recap-day";
pub const WEEKLY_RECAP_DAY_ENV: &str = "WEEKLY_RECAP_DAY";
pub const DEFAULT_WEEKLY_RECAP_DAY: &str = "monday";
pub const WEEKLY_RECAP_TIME_ARG: &str = "weekly-recap-time";
pub const WEEKLY_RECAP_TIME_ENV: &str = "WEEKLY_RECAP_TIME";
pub const DEFAULT_WEEKLY_RECAP_TIME: &str = "08:00";
pub const MONTHLY_RECAP_TIME_ARG: &str = "monthly-recap-time";
pub const MONTHLY_RECAP_TIME_ENV: &str = "MONTHLY_RECAP_TIME";
pub const DEFAULT_MONTHLY_RECAP_TIME: &str = "08:00";

lazy_static! {
    pub static ref RECONCILIATION_PAYEE_REGEX: Regex =
        Regex::new(r"(?i)reconciliation|balance adjustment")
            .expect("RECONCILIATION_PAYEE_REGEX should be valid");
    pub static ref INFLOW_CATEGORY_REGEX: Regex = Regex::new(r"(?i)inflow|ready to assign")
        .expect("INFLOW_CATEGORY_REGEX should be valid");
}
