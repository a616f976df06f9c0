use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::fmt;
use std::iter;
use std::ops;

use crate::errors::*;

pub use rust_decimal::prelude::Zero;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd)]
#[serde(from = "i64")]
pub struct Milliunits(Decimal);

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct YnabTransactionId(pub String);

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct YnabCategoryId(pub String);

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct YnabAccountId(pub String);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReportKind {
    DailyAlert,
    WeeklyRecap,
    MonthlyRecap,
}

impl Milliunits {
    const SCALE: u32 = 3;

    pub fn from_scaled_i64(value: i64) -> Milliunits {
        Milliunits(Decimal::new(value, Self::SCALE))
    }

    pub fn from_decimal(value: Decimal) -> Milliunits {
        let scale_difference = Self::SCALE as i32 - value.scale() as i32;
        if scale_difference.is_zero() {
            return Milliunits(value);
        }
        let mut result = if scale_difference > 0 {
            value * Decimal::new(10i64.pow(scale_difference as u32), 0)
        } else {
            value / Decimal::new(10i64.pow((-scale_difference) as u32), 0)
        };
        result
            .set_scale(Self::SCALE)
            .unwrap_or_else(|_| panic!("Milliunits scale should be settable to {}", Self::SCALE));
        Milliunits(result)
    }

    pub fn to_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(&self) -> Milliunits {
        let result = Milliunits(self.0.abs());
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Divides evenly into `parts`, rounding half away from zero to the nearest milliunit.
    pub fn divide_by(self, parts: u32) -> Milliunits {
        if parts == 0 {
            return Milliunits::zero();
        }
        Milliunits::from_decimal(
            (self.0 / Decimal::from(parts))
                .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Percentage that `self` makes up of `whole`, or 0 when `whole` is not positive.
    pub fn percent_of(self, whole: Milliunits) -> f64 {
        if whole.0 <= Decimal::zero() {
            return 0.0;
        }
        (self.0 / whole.0 * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0)
    }
}

impl From<i64> for Milliunits {
    fn from(value: i64) -> Milliunits {
        Milliunits::from_scaled_i64(value)
    }
}

impl ops::Add for Milliunits {
    type Output = Milliunits;
    fn add(self, other: Milliunits) -> Milliunits {
        let result = Milliunits(self.0 + other.0);
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }
}

impl ops::AddAssign for Milliunits {
    fn add_assign(&mut self, other: Milliunits) {
        self.0 += other.0;
        assert_eq!(self.0.scale(), Self::SCALE);
    }
}

impl ops::Sub for Milliunits {
    type Output = Milliunits;
    fn sub(self, other: Milliunits) -> Milliunits {
        let result = Milliunits(self.0 - other.0);
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }
}

impl ops::SubAssign for Milliunits {
    fn sub_assign(&mut self, other: Milliunits) {
        self.0 -= other.0;
        assert_eq!(self.0.scale(), Self::SCALE);
    }
}

impl ops::Neg for Milliunits {
    type Output = Milliunits;
    fn neg(self) -> Milliunits {
        let result = Milliunits(self.0.neg());
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }
}

impl ops::Mul<i64> for Milliunits {
    type Output = Milliunits;
    fn mul(self, factor: i64) -> Milliunits {
        let result = Milliunits(self.0 * Decimal::from(factor));
        assert_eq!(result.0.scale(), Self::SCALE);
        result
    }
}

impl iter::Sum for Milliunits {
    fn sum<I: Iterator<Item = Milliunits>>(iter: I) -> Milliunits {
        iter.fold(Milliunits::zero(), |total, amount| total + amount)
    }
}

impl Zero for Milliunits {
    fn zero() -> Milliunits {
        Milliunits::from_scaled_i64(0)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::DailyAlert,
        ReportKind::WeeklyRecap,
        ReportKind::MonthlyRecap,
    ];

    pub fn from_command(command: &str) -> Result<ReportKind> {
        match command.to_lowercase().as_str() {
            "daily" => Ok(ReportKind::DailyAlert),
            "weekly" => Ok(ReportKind::WeeklyRecap),
            "monthly" => Ok(ReportKind::MonthlyRecap),
            _ => bail!("Unknown report command: {}", command),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ReportKind::DailyAlert => "daily alert",
                ReportKind::WeeklyRecap => "weekly recap",
                ReportKind::MonthlyRecap => "monthly recap",
            }
        )
    }
}
