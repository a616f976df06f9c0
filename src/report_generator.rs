use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::budget_data_processor::*;
use crate::constants::*;
use crate::models::*;
use crate::types::*;
use crate::utilities::*;

#[derive(Debug)]
pub struct DailyAlert {
    pub date: NaiveDate,
    pub uncategorized_transactions: Vec<TransactionDetail>,
    pub category_status: CategoryStatus,
    pub ready_to_assign: Option<Milliunits>,
    pub threshold_percent: u32,
}

#[derive(Debug)]
pub struct WeeklyRecap {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_spent: Milliunits,
    pub transaction_count: usize,
    pub category_spending: Vec<CategorySpending>,
    pub upcoming_scheduled: Vec<ScheduledTransactionDetail>,
    pub category_status: CategoryStatus,
    pub threshold_percent: u32,
}

#[derive(Debug)]
pub struct MonthlyRecap {
    /// First day of the month being summarized.
    pub month: NaiveDate,
    pub total_spent: Milliunits,
    pub transaction_count: usize,
    pub average_per_day: Milliunits,
    pub average_per_transaction: Milliunits,
    pub largest_transaction: Milliunits,
    pub most_active_day: Option<Weekday>,
    pub categories_used: usize,
    pub top_categories: Vec<CategoryShare>,
    pub recurring_this_month: Vec<ScheduledTransactionDetail>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryShare {
    pub spending: CategorySpending,
    pub percentage: f64,
}

impl DailyAlert {
    pub fn generate(
        today: NaiveDate,
        uncategorized_transactions: Vec<TransactionDetail>,
        category_status: CategoryStatus,
        ready_to_assign: Option<Milliunits>,
        threshold_percent: u32,
    ) -> DailyAlert {
        DailyAlert {
            date: today,
            uncategorized_transactions,
            category_status,
            ready_to_assign,
            threshold_percent,
        }
    }
}

impl WeeklyRecap {
    pub fn generate(
        today: NaiveDate,
        transactions: &[TransactionDetail],
        category_spending: Vec<CategorySpending>,
        upcoming_scheduled: Vec<ScheduledTransactionDetail>,
        category_status: CategoryStatus,
        threshold_percent: u32,
    ) -> WeeklyRecap {
        WeeklyRecap {
            week_start: today - Duration::days(WEEKLY_RECAP_LOOKBACK_DAYS),
            week_end: today,
            total_spent: total_spent(transactions),
            transaction_count: transactions.len(),
            category_spending,
            upcoming_scheduled,
            category_status,
            threshold_percent,
        }
    }
}

impl MonthlyRecap {
    pub fn generate(
        today: NaiveDate,
        transactions: &[TransactionDetail],
        category_spending: Vec<CategorySpending>,
        recurring_this_month: Vec<ScheduledTransactionDetail>,
    ) -> MonthlyRecap {
        let month = first_of_previous_month(today);
        let total_spent = total_spent(transactions);
        let transaction_count = transactions.len();
        let categories_used = category_spending.len();
        let top_categories = category_spending
            .into_iter()
            .map(|spending| CategoryShare {
                percentage: spending.total.percent_of(total_spent),
                spending,
            })
            .collect();
        MonthlyRecap {
            month,
            total_spent,
            transaction_count,
            average_per_day: total_spent.divide_by(days_in_month(month)),
            average_per_transaction: total_spent.divide_by(transaction_count as u32),
            largest_transaction: transactions
                .iter()
                .map(|t| t.amount.abs())
                .max()
                .unwrap_or_else(Milliunits::zero),
            most_active_day: most_active_day(transactions),
            categories_used,
            top_categories,
            recurring_this_month,
        }
    }
}

/// Sum of absolute amounts, so refunds add to the figure rather than offset it.
pub fn total_spent(transactions: &[TransactionDetail]) -> Milliunits {
    transactions.iter().map(|t| t.amount.abs()).sum()
}

/// Weekday with the most transactions; ties go to the earlier day of the week.
pub fn most_active_day(transactions: &[TransactionDetail]) -> Option<Weekday> {
    let mut counts = [0usize; 7];
    for transaction in transactions {
        counts[transaction.date.weekday().num_days_from_monday() as usize] += 1;
    }
    let mut best: Option<(usize, usize)> = None;
    for (index, &count) in counts.iter().enumerate() {
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((index, count));
        }
    }
    best.map(|(index, _)| weekday_from_monday(index))
}

fn weekday_from_monday(index: usize) -> Weekday {
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ][index % 7]
}
