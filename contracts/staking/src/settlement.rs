//! Reward settlement engine.
//!
//! Computes the reward owed to a position at withdrawal time and enforces
//! solvency: a settlement that would pay out more than the remaining
//! distributable supply fails outright rather than truncating. The
//! degradation policy is fail-and-retry — the caller may withdraw again
//! once the supply has been replenished via `fund_rewards`.

use crate::ledger::Position;
use crate::rate::{self, GlobalState, RateConfig, RateQuote, REFERENCE_DURATION};
use crate::{math, Error};

/// Outcome of a settlement computation: the reward owed and the rate quote
/// it was derived from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub reward: i128,
    pub quote: RateQuote,
}

/// Reward accrued by `position` up to `now`:
///
/// ```text
/// reward = principal × rate × elapsed / (SCALE × REFERENCE_DURATION)
/// ```
///
/// where `rate` is the effective rate quoted for this settlement. Zero
/// elapsed time yields zero reward. Pure; performs no solvency check, so
/// views can use it to preview a withdrawal.
pub fn accrued(
    cfg: &RateConfig,
    global: &GlobalState,
    position: &Position,
    now: u64,
) -> Result<Settlement, Error> {
    let quote = rate::quote(cfg, global, position, now)?;
    let elapsed = now.saturating_sub(position.staked_at);

    let per_period = math::mul_div(position.principal, quote.rate, math::SCALE)?;
    let reward = math::mul_div(per_period, elapsed as i128, REFERENCE_DURATION as i128)?;

    Ok(Settlement { reward, quote })
}

/// Settle a position: compute its reward and authorize payout against the
/// remaining supply.
///
/// Fails with `RewardSupplyExhausted` when the computed reward exceeds
/// `global.reward_supply`. The total ever paid out can therefore never
/// exceed what was funded.
pub fn settle(
    cfg: &RateConfig,
    global: &GlobalState,
    position: &Position,
    now: u64,
) -> Result<Settlement, Error> {
    let settlement = accrued(cfg, global, position, now)?;
    if settlement.reward > global.reward_supply {
        return Err(Error::RewardSupplyExhausted);
    }
    Ok(settlement)
}

// ── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use crate::math::SCALE;

    fn base_only(rate: i128) -> RateConfig {
        RateConfig {
            base_rate: rate,
            amount_weight: 0,
            duration_weight: 0,
            supply_weight: 0,
        }
    }

    fn global(total_staked: i128, reward_supply: i128) -> GlobalState {
        GlobalState {
            total_staked,
            reward_supply,
            supply_reference: reward_supply,
        }
    }

    #[test]
    fn zero_elapsed_pays_nothing() {
        let p = Position {
            principal: 1_000_000,
            staked_at: 500,
        };
        let s = settle(&base_only(SCALE / 10), &global(1_000_000, 0), &p, 500).unwrap();
        assert_eq!(s.reward, 0);
        assert_eq!(s.quote.computed_at, 500);
    }

    #[test]
    fn reward_matches_rate_times_elapsed() {
        // 10% per reference period, held for 1/100 of a period:
        // 1_000_000_000 × 0.10 × 0.01 = 1_000_000.
        let p = Position {
            principal: 1_000_000_000,
            staked_at: 0,
        };
        let s = settle(
            &base_only(SCALE / 10),
            &global(1_000_000_000, 1_000_000_000),
            &p,
            REFERENCE_DURATION / 100,
        )
        .unwrap();
        assert_eq!(s.reward, 1_000_000);
        assert_eq!(s.quote.rate, SCALE / 10);
    }

    #[test]
    fn insolvent_settlement_fails_rather_than_truncating() {
        let p = Position {
            principal: 1_000_000_000,
            staked_at: 0,
        };
        // Same accrual as above but only half the supply available.
        let result = settle(
            &base_only(SCALE / 10),
            &global(1_000_000_000, 500_000),
            &p,
            REFERENCE_DURATION / 100,
        );
        assert_eq!(result, Err(Error::RewardSupplyExhausted));
    }

    #[test]
    fn reward_exactly_consuming_supply_is_allowed() {
        let p = Position {
            principal: 1_000_000_000,
            staked_at: 0,
        };
        let s = settle(
            &base_only(SCALE / 10),
            &global(1_000_000_000, 1_000_000),
            &p,
            REFERENCE_DURATION / 100,
        )
        .unwrap();
        assert_eq!(s.reward, 1_000_000);
    }
}
