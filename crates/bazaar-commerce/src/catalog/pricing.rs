//! Tiered pricing rules and the price engine.
//!
//! A pricing rule overrides a product's unit price for quantities inside
//! an inclusive `[from_qty, to_qty]` range. Rules are kept in list order
//! and the first matching rule wins. Overlapping ranges are rejected at
//! ingestion time so the first-match resolution never has to arbitrate
//! between rules silently.

use crate::error::CommerceError;
use crate::ids::PricingRuleId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// What a matching rule does to the price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RuleAction {
    /// Per-unit override price.
    FixedPrice(Money),
    /// Percentage off the base price (0..=100).
    PercentageOff(f64),
}

/// A quantity-range-conditioned price override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    /// Unique rule identifier.
    pub id: PricingRuleId,
    /// Lowest quantity the rule applies to (inclusive).
    pub from_qty: i64,
    /// Highest quantity the rule applies to (inclusive).
    pub to_qty: i64,
    /// Price action.
    pub action: RuleAction,
}

impl PricingRule {
    /// Create a fixed-price rule.
    pub fn fixed(from_qty: i64, to_qty: i64, unit_price: Money) -> Result<Self, CommerceError> {
        validate_range(from_qty, to_qty)?;
        if unit_price.is_negative() {
            return Err(CommerceError::Validation(format!(
                "fixed price must not be negative, got {}",
                unit_price
            )));
        }
        Ok(Self {
            id: PricingRuleId::generate(),
            from_qty,
            to_qty,
            action: RuleAction::FixedPrice(unit_price),
        })
    }

    /// Create a percentage-off rule.
    pub fn percentage(from_qty: i64, to_qty: i64, percent: f64) -> Result<Self, CommerceError> {
        validate_range(from_qty, to_qty)?;
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(CommerceError::Validation(format!(
                "percentage must be between 0 and 100, got {percent}"
            )));
        }
        Ok(Self {
            id: PricingRuleId::generate(),
            from_qty,
            to_qty,
            action: RuleAction::PercentageOff(percent),
        })
    }

    /// Parse a rule from untrusted form fields.
    ///
    /// Malformed numerics are rejected here with a validation error
    /// instead of being allowed to propagate as NaN into price reads.
    pub fn parse(
        from: &str,
        to: &str,
        kind: &str,
        amount: &str,
        currency: Currency,
    ) -> Result<Self, CommerceError> {
        let from_qty: i64 = from
            .trim()
            .parse()
            .map_err(|_| CommerceError::Validation(format!("invalid 'from' quantity: {from:?}")))?;
        let to_qty: i64 = to
            .trim()
            .parse()
            .map_err(|_| CommerceError::Validation(format!("invalid 'to' quantity: {to:?}")))?;
        match kind.trim() {
            "fixed_price" => {
                let unit: f64 = amount.trim().parse().map_err(|_| {
                    CommerceError::Validation(format!("invalid rule amount: {amount:?}"))
                })?;
                if !unit.is_finite() {
                    return Err(CommerceError::Validation(format!(
                        "invalid rule amount: {amount:?}"
                    )));
                }
                Self::fixed(from_qty, to_qty, Money::from_decimal(unit, currency))
            }
            "percentage" => {
                let percent: f64 = amount.trim().parse().map_err(|_| {
                    CommerceError::Validation(format!("invalid rule amount: {amount:?}"))
                })?;
                Self::percentage(from_qty, to_qty, percent)
            }
            other => Err(CommerceError::Validation(format!(
                "unknown rule kind: {other:?}"
            ))),
        }
    }

    /// Whether the rule's inclusive range contains the quantity.
    pub fn contains(&self, quantity: i64) -> bool {
        self.from_qty <= quantity && quantity <= self.to_qty
    }

    fn overlaps(&self, other: &PricingRule) -> bool {
        self.from_qty <= other.to_qty && other.from_qty <= self.to_qty
    }
}

fn validate_range(from_qty: i64, to_qty: i64) -> Result<(), CommerceError> {
    if from_qty < 1 {
        return Err(CommerceError::Validation(format!(
            "rule 'from' quantity must be at least 1, got {from_qty}"
        )));
    }
    if to_qty < from_qty {
        return Err(CommerceError::Validation(format!(
            "rule range is inverted: [{from_qty}, {to_qty}]"
        )));
    }
    Ok(())
}

/// Reject rule sets with overlapping quantity ranges.
///
/// Called when rules are ingested; overlaps are a data-entry mistake,
/// not something to resolve at read time.
pub fn validate_rule_set(rules: &[PricingRule]) -> Result<(), CommerceError> {
    for (i, a) in rules.iter().enumerate() {
        for b in &rules[i + 1..] {
            if a.overlaps(b) {
                return Err(CommerceError::Validation(format!(
                    "pricing rules overlap: [{}, {}] and [{}, {}]",
                    a.from_qty, a.to_qty, b.from_qty, b.to_qty
                )));
            }
        }
    }
    Ok(())
}

/// Compute the effective line total for a quantity of one product.
///
/// Selects the first rule (in list order) whose range contains
/// `quantity`. A fixed-price rule overrides the per-unit price; a
/// percentage rule discounts the base line total, rounding once. With no
/// matching rule the line total is `base * quantity`.
pub fn effective_price(
    base: Money,
    rules: &[PricingRule],
    quantity: i64,
) -> Result<Money, CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    let gross = base
        .try_multiply(quantity)
        .ok_or(CommerceError::Overflow)?;
    match rules.iter().find(|r| r.contains(quantity)) {
        None => Ok(gross),
        Some(rule) => match rule.action {
            RuleAction::FixedPrice(unit) => {
                unit.try_multiply(quantity).ok_or(CommerceError::Overflow)
            }
            RuleAction::PercentageOff(percent) => Ok(gross.percentage_off(percent)),
        },
    }
}

/// Compute the effective per-unit price for a quantity of one product.
///
/// Used to freeze a unit price onto order items. The authoritative line
/// total is [`effective_price`]; for percentage rules this per-unit
/// figure carries its own rounding.
pub fn effective_unit_price(
    base: Money,
    rules: &[PricingRule],
    quantity: i64,
) -> Result<Money, CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    match rules.iter().find(|r| r.contains(quantity)) {
        None => Ok(base),
        Some(rule) => match rule.action {
            RuleAction::FixedPrice(unit) => Ok(unit),
            RuleAction::PercentageOff(percent) => Ok(base.percentage_off(percent)),
        },
    }
}
