//! Fee calculation and request validation for new transactions.

use rust_decimal::{Decimal, RoundingStrategy};

use cashora_shared::AppError;

use super::types::{Counterparty, TransactionKind};

/// Fee rate on outgoing transactions (2%).
pub const FEE_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Largest value a `NUMERIC(19,2)` money column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_313_682_943, 2_328_306_436, 0, false, 2);

/// Checks that a money value fits the stored representation: at most two
/// decimal places and no larger than [`MAX_AMOUNT`] in magnitude.
///
/// # Errors
///
/// `Validation` naming `field`.
pub fn check_money(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.normalize().scale() > 2 {
        return Err(AppError::Validation(format!(
            "{field} must have at most two decimal places"
        )));
    }
    if value.abs() > MAX_AMOUNT {
        return Err(AppError::Validation(format!("{field} is too large")));
    }
    Ok(())
}

/// A customer's request to move money, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Kind.
    pub kind: TransactionKind,
    /// Unsigned amount.
    pub amount: Decimal,
    /// Counterparty metadata.
    pub counterparty: Counterparty,
}

/// Fee charged for a transaction of `kind` and unsigned `amount`.
///
/// Deposits are free. Outgoing kinds pay [`FEE_RATE`], rounded to cents.
#[must_use]
pub fn fee_for(kind: TransactionKind, amount: Decimal) -> Decimal {
    if kind.is_outgoing() {
        amount
            .saturating_mul(FEE_RATE)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    }
}

/// Stored amount: positive for deposits, negative for outgoing kinds.
#[must_use]
pub fn signed_amount(kind: TransactionKind, amount: Decimal) -> Decimal {
    if kind.is_outgoing() { -amount } else { amount }
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Checks a request against the caller's current balance.
///
/// # Errors
///
/// `Validation` for malformed input, `BusinessRule` when the balance does
/// not cover the request.
pub fn validate(request: &TransactionRequest, balance: Decimal) -> Result<(), AppError> {
    if request.amount <= Decimal::ZERO {
        return Err(AppError::Validation("amount must be positive".to_string()));
    }
    check_money(request.amount, "amount")?;

    let counterparty = &request.counterparty;
    match request.kind {
        TransactionKind::Deposit => Ok(()),
        TransactionKind::Send => {
            if is_blank(counterparty.recipient.as_ref()) {
                return Err(AppError::Validation("recipient is required".to_string()));
            }
            let total = request
                .amount
                .checked_add(fee_for(request.kind, request.amount))
                .ok_or_else(|| AppError::Validation("amount is too large".to_string()))?;
            if total > balance {
                return Err(AppError::BusinessRule("Insufficient balance".to_string()));
            }
            Ok(())
        }
        TransactionKind::Withdraw => {
            if is_blank(counterparty.bank_name.as_ref())
                || is_blank(counterparty.account_number.as_ref())
            {
                return Err(AppError::Validation(
                    "bank name and account number are required".to_string(),
                ));
            }
            if request.amount > balance {
                return Err(AppError::BusinessRule("Insufficient balance".to_string()));
            }
            Ok(())
        }
    }
}
