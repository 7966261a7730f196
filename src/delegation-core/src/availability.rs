//! How much an allowance-style caveat still permits.
//!
//! The pure functions mirror the enforcers' own arithmetic. The `estimate_*` helpers pull
//! state through an [`EnforcerStateReader`] and fall back to the caveat's terms when the
//! enforcer has not seen the delegation yet.

use alloy_primitives::{Address, FixedBytes, U256};
use delegation_types::{
    Caveat, EnforcerStateReader, PeriodAllowance, PeriodAvailability, StreamingAllowance,
};

use crate::decoder::{
    decode_erc20_period_terms, decode_erc20_streaming_terms, decode_erc20_transfer_amount_terms,
    decode_limited_calls_terms, decode_native_period_terms, decode_native_streaming_terms,
};
use crate::errors::Result;

/// Whether allowance terms carry a leading token address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Native,
    Erc20,
}

/// Where to look up enforcer state for one caveat of one delegation.
#[derive(Clone, Copy, Debug)]
pub struct CaveatContext<'a> {
    pub caveat: &'a Caveat,
    pub delegation_manager: Address,
    pub delegation_hash: FixedBytes<32>,
}

pub fn streaming_available_amount(allowance: &StreamingAllowance, now: u64) -> U256 {
    if now < allowance.start_time {
        return U256::ZERO;
    }
    let elapsed = U256::from(now - allowance.start_time);
    let unlocked = allowance
        .initial_amount
        .saturating_add(allowance.amount_per_second.saturating_mul(elapsed))
        .min(allowance.max_amount);
    unlocked.saturating_sub(allowance.spent)
}

pub fn period_available_amount(allowance: &PeriodAllowance, now: u64) -> PeriodAvailability {
    if allowance.period_duration == 0 || now < allowance.start_date {
        return PeriodAvailability::default();
    }
    let current_period = (now - allowance.start_date) / allowance.period_duration + 1;
    let is_new_period = allowance.last_transfer_period != current_period;
    let available_amount = if is_new_period {
        allowance.period_amount
    } else {
        allowance.period_amount.saturating_sub(allowance.transferred_in_current_period)
    };
    PeriodAvailability { available_amount, is_new_period, current_period }
}

pub fn estimate_streaming_availability<R>(reader: &R, context: CaveatContext<'_>, asset: AssetKind) -> Result<U256>
where
    R: EnforcerStateReader + ?Sized,
{
    let now = reader.block_timestamp();
    let stored = reader.streaming_allowance(
        context.caveat.enforcer,
        context.delegation_manager,
        context.delegation_hash,
    )?;
    if stored.is_initialized() {
        return Ok(streaming_available_amount(&stored, now));
    }
    let terms = match asset {
        AssetKind::Native => decode_native_streaming_terms(&context.caveat.terms)?,
        AssetKind::Erc20 => decode_erc20_streaming_terms(&context.caveat.terms)?.stream(),
    };
    let simulated = StreamingAllowance {
        initial_amount: terms.initial_amount,
        max_amount: terms.max_amount,
        amount_per_second: terms.amount_per_second,
        start_time: terms.start_time,
        spent: U256::ZERO,
    };
    tracing::trace!(enforcer = %context.caveat.enforcer, "no streaming state yet; simulating from terms");
    Ok(streaming_available_amount(&simulated, now))
}

pub fn estimate_period_availability<R>(
    reader: &R,
    context: CaveatContext<'_>,
    asset: AssetKind,
) -> Result<PeriodAvailability>
where
    R: EnforcerStateReader + ?Sized,
{
    let now = reader.block_timestamp();
    let stored = reader.period_allowance(
        context.caveat.enforcer,
        context.delegation_manager,
        context.delegation_hash,
    )?;
    if stored.start_date != 0 {
        return Ok(period_available_amount(&stored, now));
    }
    let terms = match asset {
        AssetKind::Native => decode_native_period_terms(&context.caveat.terms)?,
        AssetKind::Erc20 => decode_erc20_period_terms(&context.caveat.terms)?.period(),
    };
    let simulated = PeriodAllowance {
        period_amount: terms.period_amount,
        period_duration: terms.period_duration,
        start_date: terms.start_date,
        last_transfer_period: 0,
        transferred_in_current_period: U256::ZERO,
    };
    Ok(period_available_amount(&simulated, now))
}

/// Token amount an ERC-20 transfer-amount caveat still allows.
pub fn remaining_transfer_amount<R>(reader: &R, context: CaveatContext<'_>) -> Result<U256>
where
    R: EnforcerStateReader + ?Sized,
{
    let terms = decode_erc20_transfer_amount_terms(&context.caveat.terms)?;
    let spent = reader.spent_amount(context.caveat.enforcer, context.delegation_manager, context.delegation_hash)?;
    Ok(terms.max_amount.saturating_sub(spent))
}

/// Redemptions a limited-calls caveat still allows.
pub fn remaining_calls<R>(reader: &R, context: CaveatContext<'_>) -> Result<U256>
where
    R: EnforcerStateReader + ?Sized,
{
    let terms = decode_limited_calls_terms(&context.caveat.terms)?;
    let used = reader.call_count(context.caveat.enforcer, context.delegation_manager, context.delegation_hash)?;
    Ok(U256::from(terms.limit).saturating_sub(used))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(spent: u64) -> StreamingAllowance {
        StreamingAllowance {
            initial_amount: U256::from(10u64),
            max_amount: U256::from(100u64),
            amount_per_second: U256::from(2u64),
            start_time: 1_000,
            spent: U256::from(spent),
        }
    }

    #[test]
    fn test_streaming_curve() {
        assert_eq!(streaming_available_amount(&stream(0), 999), U256::ZERO);
        assert_eq!(streaming_available_amount(&stream(0), 1_000), U256::from(10u64));
        assert_eq!(streaming_available_amount(&stream(5), 1_010), U256::from(25u64));
        // capped at max
        assert_eq!(streaming_available_amount(&stream(0), 10_000), U256::from(100u64));
        // overspent floors at zero
        assert_eq!(streaming_available_amount(&stream(200), 10_000), U256::ZERO);
    }

    #[test]
    fn test_period_rollover() {
        let mut allowance = PeriodAllowance {
            period_amount: U256::from(50u64),
            period_duration: 100,
            start_date: 1_000,
            last_transfer_period: 1,
            transferred_in_current_period: U256::from(20u64),
        };
        assert_eq!(period_available_amount(&allowance, 500), PeriodAvailability::default());

        let same = period_available_amount(&allowance, 1_050);
        assert_eq!(same.current_period, 1);
        assert!(!same.is_new_period);
        assert_eq!(same.available_amount, U256::from(30u64));

        let next = period_available_amount(&allowance, 1_100);
        assert_eq!(next.current_period, 2);
        assert!(next.is_new_period);
        assert_eq!(next.available_amount, U256::from(50u64));

        allowance.transferred_in_current_period = U256::from(80u64);
        assert_eq!(period_available_amount(&allowance, 1_050).available_amount, U256::ZERO);
    }
}
