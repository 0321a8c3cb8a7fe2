//! Dynamic interest-rate calculator.
//!
//! The effective rate for a settlement is a bounded weighted sum over three
//! normalized factors:
//!
//! ```text
//! rate = base_rate
//!      + amount_weight   × (principal / total_staked)
//!      + duration_weight × clamp(elapsed / REFERENCE_DURATION, 0, 1)
//!      + supply_weight   × clamp(1 − reward_supply / supply_reference, 0, 1)
//! ```
//!
//! clamped to [`RATE_CEILING`]. All values are fixed-point scaled by
//! [`math::SCALE`]. Every function here is pure and deterministic given its
//! inputs, so any off-chain verifier can reproduce a quote bit-for-bit.
//!
//! The additive combination rule is confined to this module: replacing it
//! (e.g. with a multiplicative model) must not touch the ledger or the
//! settlement engine.

use soroban_sdk::contracttype;

use crate::ledger::Position;
use crate::{math, Error};

/// Reference period for the duration factor and for reward accrual:
/// 365 days in seconds. A rate of `SCALE` means 100% per reference period.
pub const REFERENCE_DURATION: u64 = 31_536_000;

/// Hard ceiling on the effective rate: 100% per reference period.
pub const RATE_CEILING: i128 = math::SCALE;

/// Immutable rate configuration, fixed at initialization.
///
/// All fields are fixed-point scaled by [`math::SCALE`] and must be
/// non-negative.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateConfig {
    pub base_rate: i128,
    pub amount_weight: i128,
    pub duration_weight: i128,
    pub supply_weight: i128,
}

/// Snapshot of the contract-wide accounting state, assembled from storage
/// for a single settlement. Read-only to this module.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlobalState {
    /// Sum of all live positions' principal.
    pub total_staked: i128,
    /// Reward tokens still available for distribution.
    pub reward_supply: i128,
    /// Funding high-water mark; denominator of the scarcity factor.
    pub supply_reference: i128,
}

/// An ephemeral rate quote. Computed per settlement, never persisted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateQuote {
    pub rate: i128,
    pub computed_at: u64,
}

/// Reject configurations with any negative component.
pub fn validate(cfg: &RateConfig) -> Result<(), Error> {
    if cfg.base_rate < 0
        || cfg.amount_weight < 0
        || cfg.duration_weight < 0
        || cfg.supply_weight < 0
    {
        return Err(Error::InvalidWeights);
    }
    Ok(())
}

/// Share of the global stake held by this position, in `[0, SCALE]`.
///
/// Zero when nothing is staked globally: with no stake there is no growth
/// driver to apportion.
fn amount_factor(principal: i128, total_staked: i128) -> Result<i128, Error> {
    if total_staked <= 0 {
        return Ok(0);
    }
    math::div(principal, total_staked)
}

/// Elapsed staking time relative to [`REFERENCE_DURATION`], capped at 1.0
/// so very old stakes cannot inflate the rate without bound.
fn duration_factor(staked_at: u64, now: u64) -> Result<i128, Error> {
    let elapsed = now.saturating_sub(staked_at);
    let ratio = math::div(elapsed as i128, REFERENCE_DURATION as i128)?;
    Ok(math::clamp(ratio, 0, math::SCALE))
}

/// Scarcity of the reward asset in `[0, SCALE]`: rises as the distributable
/// supply is consumed relative to the funding high-water mark. Zero when the
/// contract has never been funded.
fn supply_factor(reward_supply: i128, supply_reference: i128) -> Result<i128, Error> {
    if supply_reference <= 0 {
        return Ok(0);
    }
    let remaining = math::div(reward_supply, supply_reference)?;
    let consumed = math::sub(math::SCALE, remaining)?;
    Ok(math::clamp(consumed, 0, math::SCALE))
}

/// Compute the effective rate for `position` against `global` at `now`.
///
/// Fails with `InvalidWeights` for a negative configuration and `NoStake`
/// for a zero-principal position.
pub fn effective_rate(
    cfg: &RateConfig,
    global: &GlobalState,
    position: &Position,
    now: u64,
) -> Result<i128, Error> {
    validate(cfg)?;
    if position.principal <= 0 {
        return Err(Error::NoStake);
    }

    let amount = amount_factor(position.principal, global.total_staked)?;
    let duration = duration_factor(position.staked_at, now)?;
    let supply = supply_factor(global.reward_supply, global.supply_reference)?;

    let mut rate = cfg.base_rate;
    rate = math::add(rate, math::mul(cfg.amount_weight, amount)?)?;
    rate = math::add(rate, math::mul(cfg.duration_weight, duration)?)?;
    rate = math::add(rate, math::mul(cfg.supply_weight, supply)?)?;

    Ok(math::clamp(rate, 0, RATE_CEILING))
}

/// [`effective_rate`] packaged with its computation timestamp.
pub fn quote(
    cfg: &RateConfig,
    global: &GlobalState,
    position: &Position,
    now: u64,
) -> Result<RateQuote, Error> {
    Ok(RateQuote {
        rate: effective_rate(cfg, global, position, now)?,
        computed_at: now,
    })
}

// ── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::math::SCALE;

    fn cfg(base: i128, amount: i128, duration: i128, supply: i128) -> RateConfig {
        RateConfig {
            base_rate: base,
            amount_weight: amount,
            duration_weight: duration,
            supply_weight: supply,
        }
    }

    fn global(total_staked: i128, reward_supply: i128, supply_reference: i128) -> GlobalState {
        GlobalState {
            total_staked,
            reward_supply,
            supply_reference,
        }
    }

    fn position(principal: i128, staked_at: u64) -> Position {
        Position {
            principal,
            staked_at,
        }
    }

    #[test]
    fn negative_weight_rejected() {
        let bad = cfg(0, -1, 0, 0);
        let result = effective_rate(&bad, &global(10, 0, 0), &position(10, 0), 0);
        assert_eq!(result, Err(Error::InvalidWeights));
    }

    #[test]
    fn zero_principal_rejected() {
        let result = effective_rate(&cfg(0, 0, 0, 0), &global(10, 0, 0), &position(0, 0), 0);
        assert_eq!(result, Err(Error::NoStake));
    }

    #[test]
    fn base_rate_only_when_all_weights_zero() {
        let rate =
            effective_rate(&cfg(SCALE / 10, 0, 0, 0), &global(10, 0, 0), &position(10, 0), 500)
                .unwrap();
        assert_eq!(rate, SCALE / 10);
    }

    #[test]
    fn amount_factor_reflects_stake_share() {
        // 10 of 40 staked → factor 0.25; with amount_weight = 1.0 the rate
        // equals the factor directly.
        let rate =
            effective_rate(&cfg(0, SCALE, 0, 0), &global(40, 0, 0), &position(10, 0), 0).unwrap();
        assert_eq!(rate, SCALE / 4);
    }

    #[test]
    fn duration_factor_caps_at_one_reference_period() {
        let c = cfg(0, 0, SCALE, 0);
        let g = global(10, 0, 0);
        let p = position(10, 0);

        // Half a reference period → 0.5.
        let halfway = effective_rate(&c, &g, &p, REFERENCE_DURATION / 2).unwrap();
        assert_eq!(halfway, SCALE / 2);

        // Ten reference periods → capped at 1.0.
        let ancient = effective_rate(&c, &g, &p, REFERENCE_DURATION * 10).unwrap();
        assert_eq!(ancient, SCALE);
    }

    #[test]
    fn supply_factor_rises_with_scarcity() {
        let c = cfg(0, 0, 0, SCALE);
        let p = position(10, 0);

        // Fully funded → no scarcity.
        assert_eq!(effective_rate(&c, &global(10, 1_000, 1_000), &p, 0).unwrap(), 0);

        // Three quarters consumed → factor 0.75.
        assert_eq!(
            effective_rate(&c, &global(10, 250, 1_000), &p, 0).unwrap(),
            SCALE * 3 / 4
        );

        // Never funded → factor 0, not a division error.
        assert_eq!(effective_rate(&c, &global(10, 0, 0), &p, 0).unwrap(), 0);
    }

    #[test]
    fn rate_clamped_to_ceiling() {
        // Every factor saturated with weight 1.0 plus a full base rate would
        // be 4.0; the ceiling holds it at 1.0.
        let c = cfg(SCALE, SCALE, SCALE, SCALE);
        let rate = effective_rate(
            &c,
            &global(10, 0, 1_000),
            &position(10, 0),
            REFERENCE_DURATION * 2,
        )
        .unwrap();
        assert_eq!(rate, RATE_CEILING);
    }

    #[test]
    fn quote_carries_timestamp() {
        let q = quote(&cfg(SCALE / 10, 0, 0, 0), &global(10, 0, 0), &position(10, 0), 42).unwrap();
        assert_eq!(q.rate, SCALE / 10);
        assert_eq!(q.computed_at, 42);
    }
}
