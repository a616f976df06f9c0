use chrono::{Duration, NaiveDate};
use log::debug;
use std::collections::HashMap;

use crate::constants::*;
use crate::errors::*;
use crate::models::*;
use crate::types::*;
use crate::utilities::*;
use crate::ynab_client::*;

pub struct BudgetDataProcessor<'a> {
    ynab_client: &'a YnabBudgetClient<'a>,
    today: NaiveDate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryUsage {
    pub name: String,
    pub budgeted: Milliunits,
    /// Magnitude of the month's activity, so refunds count the same as spending.
    pub activity: Milliunits,
    pub balance: Milliunits,
    pub percent_used: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryStatus {
    pub overspent: Vec<CategoryUsage>,
    /// At or above the alert threshold but not yet overspent.
    pub warning: Vec<CategoryUsage>,
    /// Available balance is more than twice the month's assignment.
    pub surplus: Vec<CategoryUsage>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategorySpending {
    pub name: String,
    /// Net outflow: spending is positive, refunds reduce it.
    pub total: Milliunits,
    pub count: usize,
}

impl<'a> BudgetDataProcessor<'a> {
    pub fn new(ynab_client: &'a YnabBudgetClient<'a>, today: NaiveDate) -> BudgetDataProcessor<'a> {
        BudgetDataProcessor { ynab_client, today }
    }

    pub fn get_last_week_transactions(&self) -> Result<Vec<TransactionDetail>> {
        let since_date = self.today - Duration::days(WEEKLY_RECAP_LOOKBACK_DAYS);
        let transactions = self.ynab_client.get_transactions(Some(since_date))?;
        debug!("Last week's transactions received from YNAB: {:#?}", &transactions);
        Ok(last_week_spending(transactions))
    }

    pub fn get_last_month_transactions(&self) -> Result<Vec<TransactionDetail>> {
        let since_date = first_of_previous_month(self.today);
        let transactions = self.ynab_client.get_transactions(Some(since_date))?;
        debug!("Last month's transactions received from YNAB: {:#?}", &transactions);
        Ok(last_month_spending(transactions, self.today))
    }

    pub fn get_upcoming_scheduled_transactions(
        &self,
        days_ahead: i64,
    ) -> Result<Vec<ScheduledTransactionDetail>> {
        let scheduled = self.ynab_client.get_scheduled_transactions()?;
        debug!("Scheduled transactions received from YNAB: {:#?}", &scheduled);
        Ok(upcoming_scheduled(scheduled, self.today, days_ahead))
    }

    pub fn get_uncategorized_transactions(&self) -> Result<Vec<TransactionDetail>> {
        let since_date = self.today - Duration::days(UNCATEGORIZED_LOOKBACK_DAYS);
        let transactions = self.ynab_client.get_transactions(Some(since_date))?;
        debug!("Recent transactions received from YNAB: {:#?}", &transactions);
        Ok(uncategorized(transactions))
    }

    /// Returns the month's category status along with the amount still ready to assign.
    pub fn get_category_status(
        &self,
        threshold_percent: u32,
    ) -> Result<(CategoryStatus, Option<Milliunits>)> {
        let month = self.ynab_client.get_month(self.today)?;
        debug!(
            "Month budget for {} received from YNAB: {:#?}",
            format_iso_date(month.month),
            &month
        );
        Ok((
            category_status(&month.categories, threshold_percent),
            month.to_be_budgeted,
        ))
    }

    pub fn get_recurring_scheduled_this_month(&self) -> Result<Vec<ScheduledTransactionDetail>> {
        let scheduled = self.ynab_client.get_scheduled_transactions()?;
        debug!("Scheduled transactions received from YNAB: {:#?}", &scheduled);
        Ok(recurring_scheduled_in_month(scheduled, self.today))
    }
}

pub fn is_transfer(transaction: &TransactionDetail) -> bool {
    transaction.transfer_account_id.is_some()
}

pub fn is_reconciliation(payee_name: Option<&str>) -> bool {
    RECONCILIATION_PAYEE_REGEX.is_match(payee_name.unwrap_or(""))
}

pub fn is_inflow(category_name: Option<&str>) -> bool {
    INFLOW_CATEGORY_REGEX.is_match(category_name.unwrap_or(""))
}

/// Real outflows and refunds: not scheduled, not a transfer, not a
/// reconciliation adjustment and not income.
pub fn is_actual_spending(transaction: &TransactionDetail) -> bool {
    !transaction.deleted
        && transaction.scheduled_transaction_id.is_none()
        && !is_transfer(transaction)
        && !is_reconciliation(transaction.payee_name.as_deref())
        && !is_inflow(transaction.category_name.as_deref())
}

pub fn last_week_spending(transactions: Vec<TransactionDetail>) -> Vec<TransactionDetail> {
    let mut spending: Vec<TransactionDetail> = transactions
        .into_iter()
        .filter(is_actual_spending)
        .collect();
    spending.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    spending
}

pub fn last_month_spending(
    transactions: Vec<TransactionDetail>,
    today: NaiveDate,
) -> Vec<TransactionDetail> {
    let last_month = first_of_previous_month(today);
    transactions
        .into_iter()
        .filter(|transaction| same_month(transaction.date, last_month))
        .filter(is_actual_spending)
        .collect()
}

pub fn uncategorized(transactions: Vec<TransactionDetail>) -> Vec<TransactionDetail> {
    transactions
        .into_iter()
        .filter(|transaction| {
            !transaction.deleted
                && !is_transfer(transaction)
                && !is_reconciliation(transaction.payee_name.as_deref())
                && !is_inflow(transaction.category_name.as_deref())
        })
        .filter(|transaction| {
            transaction.category_id.is_none()
                || transaction.category_name.as_deref() == Some(UNCATEGORIZED_CATEGORY_NAME)
        })
        .collect()
}

pub fn upcoming_scheduled(
    scheduled: Vec<ScheduledTransactionDetail>,
    today: NaiveDate,
    days_ahead: i64,
) -> Vec<ScheduledTransactionDetail> {
    let until = today + Duration::days(days_ahead);
    let mut upcoming: Vec<ScheduledTransactionDetail> = scheduled
        .into_iter()
        .filter(|st| !st.deleted)
        .filter(|st| match st.date_next {
            Some(date_next) => today <= date_next && date_next <= until,
            None => false,
        })
        .collect();
    upcoming.sort_by_key(|st| st.date_next);
    upcoming
}

pub fn recurring_scheduled_in_month(
    scheduled: Vec<ScheduledTransactionDetail>,
    today: NaiveDate,
) -> Vec<ScheduledTransactionDetail> {
    let mut recurring: Vec<ScheduledTransactionDetail> = scheduled
        .into_iter()
        .filter(|st| !st.deleted && st.frequency.is_recurring())
        .filter(|st| match st.date_next {
            Some(date_next) => same_month(date_next, today),
            None => false,
        })
        .collect();
    recurring.sort_by_key(|st| st.date_next);
    recurring
}

pub fn category_status(categories: &[Category], threshold_percent: u32) -> CategoryStatus {
    let mut status = CategoryStatus::default();
    for category in categories {
        if category.deleted || is_inflow(Some(category.name.as_str())) || category.budgeted.is_zero() {
            continue;
        }
        let activity = category.activity.abs();
        let usage = CategoryUsage {
            name: category.name.clone(),
            budgeted: category.budgeted,
            activity,
            balance: category.balance,
            percent_used: activity.percent_of(category.budgeted),
        };
        if category.balance.is_negative() {
            status.overspent.push(usage);
        } else if usage.percent_used >= f64::from(threshold_percent) {
            status.warning.push(usage);
        } else if category.balance > category.budgeted * SURPLUS_BUDGETED_MULTIPLE {
            status.surplus.push(usage);
        }
    }
    status
}

/// Groups spending by category name, expanding split transactions so each
/// part counts toward its own category. Ordered by total, largest first.
pub fn aggregate_by_category(transactions: &[TransactionDetail]) -> Vec<CategorySpending> {
    let mut totals: HashMap<String, (Milliunits, usize)> = HashMap::new();
    let mut add = |category_name: Option<&str>, amount: Milliunits| {
        let name = category_name.unwrap_or(UNCATEGORIZED_CATEGORY_NAME);
        let entry = totals
            .entry(name.to_string())
            .or_insert((Milliunits::zero(), 0));
        entry.0 -= amount;
        entry.1 += 1;
    };
    for transaction in transactions {
        if transaction.deleted
            || is_transfer(transaction)
            || is_reconciliation(transaction.payee_name.as_deref())
        {
            continue;
        }
        if transaction.subtransactions.is_empty() {
            if !is_inflow(transaction.category_name.as_deref()) {
                add(transaction.category_name.as_deref(), transaction.amount);
            }
            continue;
        }
        for subtransaction in &transaction.subtransactions {
            if subtransaction.deleted
                || subtransaction.transfer_account_id.is_some()
                || is_inflow(subtransaction.category_name.as_deref())
            {
                continue;
            }
            add(subtransaction.category_name.as_deref(), subtransaction.amount);
        }
    }
    let mut spending: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(name, (total, count))| CategorySpending { name, total, count })
        .collect();
    spending.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    spending
}
