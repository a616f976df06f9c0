//! Subset of the YNAB API response models used by the reports.
//!
//! Field names follow the API's snake_case JSON. Unknown fields are ignored so
//! that additions to the API don't break deserialization.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::*;

#[derive(Debug, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub id: String,
    pub name: String,
    pub detail: String,
}

#[derive(Debug, Deserialize)]
pub struct BudgetSummaryResponseData {
    pub budgets: Vec<BudgetSummary>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BudgetSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BudgetSettingsResponseData {
    pub settings: BudgetSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BudgetSettings {
    pub date_format: DateFormat,
    pub currency_format: CurrencyFormat,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DateFormat {
    pub format: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CurrencyFormat {
    pub decimal_digits: u32,
    pub decimal_separator: String,
    pub symbol_first: bool,
    pub group_separator: String,
    pub currency_symbol: String,
    pub display_symbol: bool,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsResponseData {
    pub transactions: Vec<TransactionDetail>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TransactionDetail {
    pub id: YnabTransactionId,
    pub date: NaiveDate,
    pub amount: Milliunits,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<YnabCategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub transfer_account_id: Option<YnabAccountId>,
    #[serde(default)]
    pub scheduled_transaction_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub subtransactions: Vec<SubTransaction>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubTransaction {
    pub amount: Milliunits,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub transfer_account_id: Option<YnabAccountId>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct ScheduledTransactionsResponseData {
    pub scheduled_transactions: Vec<ScheduledTransactionDetail>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScheduledTransactionDetail {
    #[serde(default)]
    pub date_next: Option<NaiveDate>,
    pub frequency: Frequency,
    pub amount: Milliunits,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    Never,
    Daily,
    Weekly,
    EveryOtherWeek,
    TwiceAMonth,
    Every4Weeks,
    Monthly,
    EveryOtherMonth,
    Every3Months,
    Every4Months,
    TwiceAYear,
    Yearly,
    EveryOtherYear,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub struct MonthDetailResponseData {
    pub month: MonthDetail,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MonthDetail {
    pub month: NaiveDate,
    #[serde(default)]
    pub to_be_budgeted: Option<Milliunits>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Category {
    pub name: String,
    pub budgeted: Milliunits,
    pub activity: Milliunits,
    pub balance: Milliunits,
    #[serde(default)]
    pub deleted: bool,
}

impl Frequency {
    pub fn is_recurring(self) -> bool {
        self != Frequency::Never
    }

    pub fn description(self) -> &'static str {
        match self {
            Frequency::Never => "Once",
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::EveryOtherWeek => "Every other week",
            Frequency::TwiceAMonth => "Twice a month",
            Frequency::Every4Weeks => "Every 4 weeks",
            Frequency::Monthly => "Monthly",
            Frequency::EveryOtherMonth => "Every other month",
            Frequency::Every3Months => "Every 3 months",
            Frequency::Every4Months => "Every 4 months",
            Frequency::TwiceAYear => "Twice a year",
            Frequency::Yearly => "Yearly",
            Frequency::EveryOtherYear => "Every other year",
            Frequency::Unknown => "Recurring",
        }
    }
}
