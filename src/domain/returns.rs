//! Potential-return estimates shown before a prediction is placed.

use rust_decimal::Decimal;
use serde::Serialize;

use super::format::{clamp_percent, decimal_from_str};

/// Estimated payout for staking `investment` at `confidence` percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnEstimate {
    pub investment: Decimal,
    pub confidence: Decimal,
    pub profit: Decimal,
    pub total_return: Decimal,
}

impl ReturnEstimate {
    /// Profit is `amount * confidence / 100`. `None` when either is zero.
    #[must_use]
    pub fn compute(amount: Decimal, confidence: Decimal) -> Option<Self> {
        if amount <= Decimal::ZERO || confidence <= Decimal::ZERO {
            return None;
        }
        let profit = amount * confidence / Decimal::ONE_HUNDRED;
        Some(Self {
            investment: amount,
            confidence,
            profit,
            total_return: amount + profit,
        })
    }
}

/// Confidence percentage submitted with an order.
///
/// An explicit override wins, then the outcome's implied probability, then
/// a percentage found in the question's free-text probability.
#[must_use]
pub fn confidence(
    override_pct: Option<Decimal>,
    implied: Option<Decimal>,
    question_probability: Option<&str>,
) -> Decimal {
    if let Some(pct) = override_pct {
        return clamp_percent(pct);
    }
    if let Some(pct) = implied.map(clamp_percent).filter(|p| *p > Decimal::ZERO) {
        return pct;
    }
    question_probability
        .and_then(percent_in_text)
        .unwrap_or(Decimal::ZERO)
}

/// First `NN%` or `NN.N%` figure in free text, clamped to `[0, 100]`.
#[must_use]
pub fn percent_in_text(text: &str) -> Option<Decimal> {
    let bytes = text.as_bytes();
    let mut start = None;
    for (i, b) in bytes.iter().copied().enumerate() {
        match (start, b) {
            (None, b'0'..=b'9') => start = Some(i),
            (Some(_), b'0'..=b'9' | b'.') => {}
            (Some(s), _) => {
                let rest = text[i..].trim_start();
                if rest.starts_with('%') {
                    if let Some(n) = decimal_from_str(text[s..i].trim_end_matches('.')) {
                        return Some(clamp_percent(n));
                    }
                }
                start = None;
            }
            (None, _) => {}
        }
    }
    None
}
