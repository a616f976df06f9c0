use chrono::NaiveDate;
use lazy_static::lazy_static;

use crate::models::*;
use crate::types::*;

lazy_static! {
    pub static ref US_SETTINGS: BudgetSettings = BudgetSettings {
        date_format: DateFormat {
            format: "MM/DD/YYYY".to_string(),
        },
        currency_format: CurrencyFormat {
            decimal_digits: 2,
            decimal_separator: ".".to_string(),
            symbol_first: true,
            group_separator: ",".to_string(),
            currency_symbol: "$".to_string(),
            display_symbol: true,
        }
    };
    pub static ref OTHER_SETTINGS: BudgetSettings = BudgetSettings {
        date_format: DateFormat {
            format: "YYYY-MM-DD".to_string(),
        },
        currency_format: CurrencyFormat {
            decimal_digits: 3,
            decimal_separator: ",".to_string(),
            symbol_first: false,
            group_separator: ".".to_string(),
            currency_symbol: "X".to_string(),
            display_symbol: true,
        }
    };
    pub static ref NO_SYMBOL_SETTINGS: BudgetSettings = BudgetSettings {
        date_format: DateFormat {
            format: "YYYY-MM-DD".to_string(),
        },
        currency_format: CurrencyFormat {
            decimal_digits: 3,
            decimal_separator: ",".to_string(),
            symbol_first: false,
            group_separator: ".".to_string(),
            currency_symbol: "X".to_string(),
            display_symbol: false,
        }
    };
    pub static ref YEN_SETTINGS: BudgetSettings = BudgetSettings {
        date_format: DateFormat {
            format: "YYYY/MM/DD".to_string(),
        },
        currency_format: CurrencyFormat {
            decimal_digits: 0,
            decimal_separator: ".".to_string(),
            symbol_first: true,
            group_separator: ",".to_string(),
            currency_symbol: "¥".to_string(),
            display_symbol: true,
        }
    };
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn transaction(
    id: &str,
    date: NaiveDate,
    amount: i64,
    payee_name: &str,
    category_name: Option<&str>,
) -> TransactionDetail {
    TransactionDetail {
        id: YnabTransactionId(id.to_string()),
        date,
        amount: Milliunits::from_scaled_i64(amount),
        memo: None,
        account_name: Some("Checking".to_string()),
        payee_name: Some(payee_name.to_string()),
        category_id: category_name.map(|name| YnabCategoryId(format!("id-{}", name))),
        category_name: category_name.map(str::to_string),
        transfer_account_id: None,
        scheduled_transaction_id: None,
        deleted: false,
        subtransactions: vec![],
    }
}

pub fn subtransaction(amount: i64, category_name: Option<&str>) -> SubTransaction {
    SubTransaction {
        amount: Milliunits::from_scaled_i64(amount),
        category_name: category_name.map(str::to_string),
        transfer_account_id: None,
        deleted: false,
    }
}

pub fn scheduled_transaction(
    date_next: Option<NaiveDate>,
    frequency: Frequency,
    amount: i64,
    payee_name: &str,
) -> ScheduledTransactionDetail {
    ScheduledTransactionDetail {
        date_next,
        frequency,
        amount: Milliunits::from_scaled_i64(amount),
        payee_name: Some(payee_name.to_string()),
        category_name: Some("Bills".to_string()),
        deleted: false,
    }
}

pub fn category(name: &str, budgeted: i64, activity: i64, balance: i64) -> Category {
    Category {
        name: name.to_string(),
        budgeted: Milliunits::from_scaled_i64(budgeted),
        activity: Milliunits::from_scaled_i64(activity),
        balance: Milliunits::from_scaled_i64(balance),
        deleted: false,
    }
}
