use chrono::Local;
use std::env;
use std::ffi::OsStr;

use crate::constants::*;
use crate::email_sender::*;
use crate::errors::*;
use crate::report_mailer::*;
use crate::scheduler::*;
use crate::types::*;
use crate::utilities::*;
use crate::ynab_client::*;

pub fn run() -> Result<()> {
    initialize();
    run_clap_matches(get_clap_matches())
}

fn initialize() {
    openssl_probe::init_ssl_cert_env_vars();
    dotenv::dotenv().ok();
    env_logger::init();

    default_env(YNAB_BUDGET_ID_ENV, DEFAULT_BUDGET_ID);
    default_env(SMTP_PORT_ENV, DEFAULT_SMTP_PORT.to_string());
    default_env(THRESHOLD_ENV, DEFAULT_THRESHOLD_PERCENT.to_string());
    default_env(DAILY_ALERT_TIME_ENV, DEFAULT_DAILY_ALERT_TIME);
    default_env(WEEKLY_RECAP_DAY_ENV, DEFAULT_WEEKLY_RECAP_DAY);
    default_env(WEEKLY_RECAP_TIME_ENV, DEFAULT_WEEKLY_RECAP_TIME);
    default_env(MONTHLY_RECAP_TIME_ENV, DEFAULT_MONTHLY_RECAP_TIME);
}

fn get_clap_matches() -> clap::ArgMatches<'static> {
    clap::App::new(clap::crate_name!())
        .version(option_env!("CI_BUILD_VERSION").unwrap_or(clap::crate_version!()))
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .arg(
            clap::Arg::with_name(REPORT_ARG)
                .index(1)
                .value_name("COMMAND")
                .help("Send one report now (daily, weekly, monthly) or all of them (test).  Without a command, runs the scheduler.")
                .possible_values(&REPORT_COMMANDS),
        )
        .arg(
            clap::Arg::with_name(DRY_RUN_ARG)
                .long(DRY_RUN_ARG)
                .short("n")
                .help("Print reports instead of sending them by email"),
        )
        .arg(
            clap::Arg::with_name(YNAB_ACCESS_TOKEN_ARG)
                .env(YNAB_ACCESS_TOKEN_ENV)
                .long(YNAB_ACCESS_TOKEN_ARG)
                .value_name("KEY")
                .help("YNAB personal access token")
                .takes_value(true)
                .required(true),
        )
        .arg(
            clap::Arg::with_name(YNAB_BUDGET_ID_ARG)
                .env(YNAB_BUDGET_ID_ENV)
                .long(YNAB_BUDGET_ID_ARG)
                .value_name("ID")
                .help("YNAB budget identifier, or \"default\" for the first budget in the account")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name(SMTP_SERVER_ARG)
                .env(SMTP_SERVER_ENV)
                .long(SMTP_SERVER_ARG)
                .value_name("HOST")
                .help("SMTP server to send email through (using STARTTLS)")
                .takes_value(true)
                .required_unless(DRY_RUN_ARG),
        )
        .arg(
            clap::Arg::with_name(SMTP_PORT_ARG)
                .env(SMTP_PORT_ENV)
                .long(SMTP_PORT_ARG)
                .value_name("PORT")
                .help("SMTP server port")
                .takes_value(true)
                .validator(|value| {
                    value
                        .parse::<u16>()
                        .map(|_| ())
                        .map_err(|err| format!("Invalid port {}: {}", value, err))
                }),
        )
        .arg(
            clap::Arg::with_name(SMTP_USERNAME_ARG)
                .env(SMTP_USERNAME_ENV)
                .long(SMTP_USERNAME_ARG)
                .value_name("USERNAME")
                .help("SMTP login username")
                .takes_value(true)
                .required_unless(DRY_RUN_ARG),
        )
        .arg(
            clap::Arg::with_name(SMTP_PASSWORD_ARG)
                .env(SMTP_PASSWORD_ENV)
                .hide_env_values(true)
                .long(SMTP_PASSWORD_ARG)
                .value_name("PASSWORD")
                .help("SMTP login password")
                .takes_value(true)
                .required_unless(DRY_RUN_ARG),
        )
        .arg(
            clap::Arg::with_name(EMAIL_FROM_ARG)
                .env(EMAIL_FROM_ENV)
                .long(EMAIL_FROM_ARG)
                .value_name("ADDRESS")
                .help("Sender address of the reports")
                .takes_value(true)
                .required_unless(DRY_RUN_ARG),
        )
        .arg(
            clap::Arg::with_name(EMAIL_TO_ARG)
                .env(EMAIL_TO_ENV)
                .long(EMAIL_TO_ARG)
                .value_name("ADDRESSES")
                .help("Comma-separated recipient addresses of the reports")
                .takes_value(true)
                .required_unless(DRY_RUN_ARG),
        )
        .arg(
            clap::Arg::with_name(THRESHOLD_ARG)
                .env(THRESHOLD_ENV)
                .long(THRESHOLD_ARG)
                .value_name("PERCENT")
                .help("Warn about categories that have spent at least this percentage of their budgeted amount")
                .takes_value(true)
                .validator(|value| {
                    value
                        .parse::<u32>()
                        .map(|_| ())
                        .map_err(|err| format!("Invalid percentage {}: {}", value, err))
                }),
        )
        .arg(
            clap::Arg::with_name(DAILY_ALERT_TIME_ARG)
                .env(DAILY_ALERT_TIME_ENV)
                .long(DAILY_ALERT_TIME_ARG)
                .value_name("HH:MM")
                .help("Local time of day to send the daily alert")
                .takes_value(true)
                .validator(validate_time_of_day),
        )
        .arg(
            clap::Arg::with_name(WEEKLY_RECAP_DAY_ARG)
                .env(WEEKLY_RECAP_DAY_ENV)
                .long(WEEKLY_RECAP_DAY_ARG)
                .value_name("WEEKDAY")
                .help("Day of the week to send the weekly recap")
                .takes_value(true)
                .validator(|value| {
                    parse_weekday(&value)
                        .map(|_| ())
                        .map_err(|err| err.to_string())
                }),
        )
        .arg(
            clap::Arg::with_name(WEEKLY_RECAP_TIME_ARG)
                .env(WEEKLY_RECAP_TIME_ENV)
                .long(WEEKLY_RECAP_TIME_ARG)
                .value_name("HH:MM")
                .help("Local time of day to send the weekly recap")
                .takes_value(true)
                .validator(validate_time_of_day),
        )
        .arg(
            clap::Arg::with_name(MONTHLY_RECAP_TIME_ARG)
                .env(MONTHLY_RECAP_TIME_ENV)
                .long(MONTHLY_RECAP_TIME_ARG)
                .value_name("HH:MM")
                .help("Local time of day to send the monthly recap on the first of the month")
                .takes_value(true)
                .validator(validate_time_of_day),
        )
        .get_matches()
}

fn run_clap_matches(matches: clap::ArgMatches) -> Result<()> {
    let dry_run = matches.is_present(DRY_RUN_ARG);
    let threshold_percent = clap::value_t!(matches.value_of(THRESHOLD_ARG), u32)
        .expect("CLAP matches should have valid THRESHOLD_ARG");
    let ynab_client = YnabBudgetClient::new(
        YNAB_API_BASE_URL,
        matches
            .value_of(YNAB_ACCESS_TOKEN_ARG)
            .expect("CLAP matches should have YNAB_ACCESS_TOKEN_ARG"),
        matches
            .value_of(YNAB_BUDGET_ID_ARG)
            .expect("CLAP matches should have YNAB_BUDGET_ID_ARG"),
    );
    let email_sender = if dry_run {
        None
    } else {
        Some(EmailSender::new(&SmtpSettings {
            server: matches
                .value_of(SMTP_SERVER_ARG)
                .expect("CLAP matches should have SMTP_SERVER_ARG"),
            port: clap::value_t!(matches.value_of(SMTP_PORT_ARG), u16)
                .expect("CLAP matches should have valid SMTP_PORT_ARG"),
            username: matches
                .value_of(SMTP_USERNAME_ARG)
                .expect("CLAP matches should have SMTP_USERNAME_ARG"),
            password: matches
                .value_of(SMTP_PASSWORD_ARG)
                .expect("CLAP matches should have SMTP_PASSWORD_ARG"),
            from: matches
                .value_of(EMAIL_FROM_ARG)
                .expect("CLAP matches should have EMAIL_FROM_ARG"),
            to: matches
                .value_of(EMAIL_TO_ARG)
                .expect("CLAP matches should have EMAIL_TO_ARG"),
        })?)
    };
    let report_mailer = ReportMailer::new(&ynab_client, email_sender.as_ref(), threshold_percent);
    let today = Local::now().naive_local().date();
    match matches.value_of(REPORT_ARG) {
        None => report_mailer.run_scheduler(&get_schedules(&matches)),
        Some(TEST_COMMAND) => report_mailer.run_test(today),
        Some(command) => report_mailer.send_report(ReportKind::from_command(command)?, today),
    }
}

fn get_schedules(matches: &clap::ArgMatches) -> Vec<ReportSchedule> {
    let time_of_day = |arg_name: &str| {
        matches
            .value_of(arg_name)
            .map(parse_time_of_day)
            .transpose()
            .expect("CLAP matches should have valid time of day")
            .expect("CLAP matches should have time of day")
    };
    let weekly_recap_day = matches
        .value_of(WEEKLY_RECAP_DAY_ARG)
        .map(parse_weekday)
        .transpose()
        .expect("CLAP matches should have valid WEEKLY_RECAP_DAY_ARG")
        .expect("CLAP matches should have WEEKLY_RECAP_DAY_ARG");
    vec![
        ReportSchedule::new(
            ReportKind::DailyAlert,
            Cadence::Daily,
            time_of_day(DAILY_ALERT_TIME_ARG),
        ),
        ReportSchedule::new(
            ReportKind::WeeklyRecap,
            Cadence::Weekly(weekly_recap_day),
            time_of_day(WEEKLY_RECAP_TIME_ARG),
        ),
        ReportSchedule::new(
            ReportKind::MonthlyRecap,
            Cadence::Monthly,
            time_of_day(MONTHLY_RECAP_TIME_ARG),
        ),
    ]
}

fn validate_time_of_day(value: String) -> std::result::Result<(), String> {
    parse_time_of_day(&value)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

fn default_env<V: AsRef<OsStr>>(var_name: &str, default_value: V) {
    if let Err(env::VarError::NotPresent) = env::var(var_name) {
        env::set_var(var_name, default_value);
    }
}
