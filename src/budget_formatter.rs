use chrono::NaiveDate;
use rust_decimal::prelude::Zero;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cell::RefCell;

use crate::models::BudgetSettings;
use crate::types::*;

#[derive(Debug)]
pub struct BudgetFormatter<'a> {
    settings: &'a BudgetSettings,
    date_format: RefCell<Option<String>>,
}

impl<'a> BudgetFormatter<'a> {
    pub fn new(settings: &BudgetSettings) -> BudgetFormatter {
        BudgetFormatter {
            settings,
            date_format: RefCell::new(None),
        }
    }

    pub fn format_milliunits(&self, amount: Milliunits) -> String {
        self.format_currency(&self.settings.currency_format.currency_symbol, amount.to_decimal())
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut fmt_opt = self.date_format.borrow_mut();
        let fmt = fmt_opt.get_or_insert_with(|| {
            self.settings
                .date_format
                .format
                .replace("YYYY", "%Y")
                .replace("MM", "%m")
                .replace("DD", "%d")
        });
        date.format(fmt).to_string()
    }

    pub fn format_percent(&self, percent: f64) -> String {
        format!("{:.1}%", percent)
    }

    fn format_currency(&self, currency_symbol: &str, amount: Decimal) -> String {
        let currency_format = &self.settings.currency_format;
        let abs_amount: Decimal = amount.abs();
        let raw_formatted = format!(
            "{:.*}",
            currency_format.decimal_digits as usize,
            abs_amount.round_dp_with_strategy(
                currency_format.decimal_digits,
                RoundingStrategy::MidpointAwayFromZero
            )
        );
        let mut split_around_decimal = raw_formatted.splitn(2, '.');
        let before_decimal = split_around_decimal
            .next()
            .expect("split_around_decimal should have at least one element");
        let group_separated = match split_around_decimal.next() {
            Some(after_decimal) => format!(
                "{}{}{}",
                self.add_group_separators(before_decimal),
                currency_format.decimal_separator,
                after_decimal
            ),
            None => self.add_group_separators(before_decimal),
        };
        let group_separated_with_symbol = if currency_format.display_symbol {
            if currency_format.symbol_first {
                format!("{}{}", currency_symbol, group_separated)
            } else {
                format!("{}{}", group_separated, currency_symbol)
            }
        } else {
            group_separated
        };
        let rounded_to_zero = abs_amount
            .round_dp_with_strategy(
                currency_format.decimal_digits,
                RoundingStrategy::MidpointAwayFromZero,
            )
            .is_zero();
        if amount < Decimal::zero() && !rounded_to_zero {
            format!("-{}", group_separated_with_symbol)
        } else {
            group_separated_with_symbol
        }
    }

    fn add_group_separators(&self, before_decimal: &str) -> String {
        before_decimal
            .chars()
            .rev()
            .collect::<Vec<char>>()
            .chunks(3)
            .map(|chunk| chunk.iter().collect())
            .collect::<Vec<String>>()
            .join(&self.settings.currency_format.group_separator)
            .chars()
            .rev()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn test_format_milliunits() {
        assert_eq!(
            BudgetFormatter::new(&US_SETTINGS)
                .format_milliunits(Milliunits::from_scaled_i64(-12_345)),
            "-$12.35"
        );
        assert_eq!(
            BudgetFormatter::new(&OTHER_SETTINGS)
                .format_milliunits(Milliunits::from_scaled_i64(-12_345)),
            "-12,345X"
        );
        assert_eq!(
            BudgetFormatter::new(&NO_SYMBOL_SETTINGS)
                .format_milliunits(Milliunits::from_scaled_i64(-123_456)),
            "-123,456"
        );
        assert_eq!(
            BudgetFormatter::new(&US_SETTINGS)
                .format_milliunits(Milliunits::from_scaled_i64(123_456_789_012_345)),
            "$123,456,789,012.35"
        );
        assert_eq!(
            BudgetFormatter::new(&US_SETTINGS).format_milliunits(Milliunits::from_scaled_i64(123)),
            "$0.12"
        );
    }

    #[test]
    fn test_format_milliunits_without_decimal_digits() {
        assert_eq!(
            BudgetFormatter::new(&YEN_SETTINGS)
                .format_milliunits(Milliunits::from_scaled_i64(1_234_500)),
            "¥1,235"
        );
    }

    #[test]
    fn test_format_milliunits_rounding_to_zero_has_no_sign() {
        assert_eq!(
            BudgetFormatter::new(&US_SETTINGS).format_milliunits(Milliunits::from_scaled_i64(-4)),
            "$0.00"
        );
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            BudgetFormatter::new(&US_SETTINGS)
                .format_date(NaiveDate::from_ymd_opt(2011, 4, 27).unwrap()),
            "04/27/2011"
        );
        assert_eq!(
            BudgetFormatter::new(&OTHER_SETTINGS)
                .format_date(NaiveDate::from_ymd_opt(2011, 4, 27).unwrap()),
            "2011-04-27"
        );
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(BudgetFormatter::new(&US_SETTINGS).format_percent(85.26), "85.3%");
        assert_eq!(BudgetFormatter::new(&US_SETTINGS).format_percent(85.24), "85.2%");
        assert_eq!(BudgetFormatter::new(&US_SETTINGS).format_percent(100.0), "100.0%");
    }
}
