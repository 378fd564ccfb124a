use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Undiscounted price of one credit.
pub const LIST_PRICE_PER_CREDIT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
/// Budget at which the volume discount stops growing.
pub const DISCOUNT_SATURATION_BUDGET: Decimal = Decimal::from_parts(120_000, 0, 0, false, 0);
/// Highest discount fraction the volume schedule grants (40%).
pub const MAX_DISCOUNT: Decimal = Decimal::from_parts(40, 0, 0, false, 2);

// Decimal holds 28 fractional digits and integers up to 29 digits (~7.9e28).
const MAX_SCALE: i64 = 28;
const MAX_INTEGER_DIGITS: i64 = 29;
const EXPONENT_LIMIT: i64 = 1_000;

/// Normalized pricing inputs: `budget >= 0` and `months >= 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingInput {
    budget: Decimal,
    months: u32,
}

impl PricingInput {
    pub fn new(budget: Decimal, months: u32) -> Self {
        Self { budget: budget.max(Decimal::ZERO), months: months.max(1) }
    }

    /// Builds inputs from raw form text.
    ///
    /// Only the leading number of each field is read, so `"12 mesi"` is 12.
    /// A budget that is empty, non-numeric or negative becomes 0; months that
    /// are empty, non-numeric or below 1 become 1. Fractional months are
    /// truncated.
    pub fn from_text(budget: &str, months: &str) -> Self {
        Self { budget: normalize_budget_text(budget), months: normalize_months_text(months) }
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn months(&self) -> u32 {
        self.months
    }
}

impl Default for PricingInput {
    fn default() -> Self {
        Self::new(Decimal::ZERO, 1)
    }
}

/// Everything the pricing model derives from one [`PricingInput`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingState {
    pub budget: Decimal,
    pub months: u32,
    pub discount: Decimal,
    pub unit_price: Decimal,
    pub installment: Decimal,
}

impl PricingState {
    pub fn discount_percent(&self) -> Decimal {
        self.discount * Decimal::ONE_HUNDRED
    }
}

impl Default for PricingState {
    fn default() -> Self {
        price_volume_discount(PricingInput::default())
    }
}

pub trait PricingModel: Send + Sync {
    fn price(&self, input: PricingInput) -> PricingState;
}

/// Linear volume discount up to [`MAX_DISCOUNT`] at [`DISCOUNT_SATURATION_BUDGET`].
#[derive(Clone, Copy, Debug, Default)]
pub struct VolumeDiscountPricing;

impl PricingModel for VolumeDiscountPricing {
    fn price(&self, input: PricingInput) -> PricingState {
        price_volume_discount(input)
    }
}

pub fn price_volume_discount(input: PricingInput) -> PricingState {
    let discount = discount_for_budget(input.budget);

    PricingState {
        budget: input.budget,
        months: input.months,
        discount,
        unit_price: unit_price_for_discount(discount),
        installment: monthly_installment(input.budget, input.months),
    }
}

pub fn discount_for_budget(budget: Decimal) -> Decimal {
    let budget = budget.max(Decimal::ZERO);
    let discount = budget / DISCOUNT_SATURATION_BUDGET * MAX_DISCOUNT;
    discount.clamp(Decimal::ZERO, MAX_DISCOUNT)
}

pub fn unit_price_for_discount(discount: Decimal) -> Decimal {
    LIST_PRICE_PER_CREDIT * (Decimal::ONE - discount)
}

pub fn monthly_installment(budget: Decimal, months: u32) -> Decimal {
    budget / Decimal::from(months.max(1))
}

fn normalize_budget_text(raw: &str) -> Decimal {
    parse_leading_decimal(raw).unwrap_or(Decimal::ZERO).max(Decimal::ZERO)
}

fn normalize_months_text(raw: &str) -> u32 {
    let Some(value) = parse_leading_decimal(raw) else {
        return 1;
    };

    let whole = value.trunc();
    if whole < Decimal::ONE {
        return 1;
    }
    whole.to_u32().unwrap_or(u32::MAX)
}

/// Parses the numeric prefix of `raw`: optional sign, digits with at most one
/// dot, then an optional exponent. Magnitudes beyond `Decimal` saturate at
/// `Decimal::MAX`/`Decimal::MIN`; digits past 28 decimal places are dropped.
fn parse_leading_decimal(raw: &str) -> Option<Decimal> {
    let text = raw.trim_start();
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let integer = leading_digits(unsigned);
    let mut rest = &unsigned[integer.len()..];
    let mut fraction = "";
    if let Some(after_dot) = rest.strip_prefix('.') {
        fraction = leading_digits(after_dot);
        rest = &after_dot[fraction.len()..];
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let digits = format!("{integer}{fraction}");
    let scale = fraction.len() as i64 - leading_exponent(rest);
    Some(decimal_from_digits(negative, &digits, scale))
}

fn leading_digits(text: &str) -> &str {
    let end = text.bytes().position(|byte| !byte.is_ascii_digit()).unwrap_or(text.len());
    &text[..end]
}

/// Reads `e[+-]digits` at the start of `rest`; anything else is no exponent.
fn leading_exponent(rest: &str) -> i64 {
    let Some(body) = rest.strip_prefix(|ch: char| ch == 'e' || ch == 'E') else {
        return 0;
    };
    let (negative, unsigned) = match body.as_bytes().first() {
        Some(b'-') => (true, &body[1..]),
        Some(b'+') => (false, &body[1..]),
        _ => (false, body),
    };

    let magnitude = leading_digits(unsigned)
        .bytes()
        .fold(0_i64, |acc, byte| (acc * 10 + i64::from(byte - b'0')).min(EXPONENT_LIMIT));
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Builds `digits * 10^-scale`, truncating precision `Decimal` cannot hold.
fn decimal_from_digits(negative: bool, digits: &str, scale: i64) -> Decimal {
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Decimal::ZERO;
    }

    let saturated = if negative { Decimal::MIN } else { Decimal::MAX };
    let integer_digits = digits.len() as i64 - scale;
    if integer_digits > MAX_INTEGER_DIGITS {
        return saturated;
    }

    let kept = (digits.len() as i64).min(MAX_SCALE).min(MAX_SCALE + integer_digits);
    if kept <= 0 {
        return Decimal::ZERO;
    }

    let mut mantissa_text = digits[..kept as usize].to_string();
    let mut kept_scale = kept - integer_digits;
    if kept_scale < 0 {
        mantissa_text.push_str(&"0".repeat(kept_scale.unsigned_abs() as usize));
        kept_scale = 0;
    }

    let Ok(mantissa) = mantissa_text.parse::<i128>() else {
        return saturated;
    };
    let signed = if negative { -mantissa } else { mantissa };
    Decimal::try_from_i128_with_scale(signed, kept_scale as u32).unwrap_or(saturated)
}
