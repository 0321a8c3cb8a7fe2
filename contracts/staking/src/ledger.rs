//! Stake ledger: per-depositor positions and the global staked total.
//!
//! The ledger is the source of truth for "how much is staked, by whom,
//! since when". Positions live in persistent storage under tuple keys
//! `(POSITION, owner)`; the global total lives in instance storage.
//! Every mutation updates both in the same invocation, so the invariant
//! `total_staked == Σ principal` holds at every observation point — Soroban
//! reverts all storage writes if the invocation fails.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{math, Error};

const POSITION: Symbol = symbol_short!("POS");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");

/// A depositor's staking position. One per owner; never stored with a
/// non-positive principal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub principal: i128,
    /// Stake timestamp. On merge this becomes the principal-weighted average
    /// of the old and new stake times.
    pub staked_at: u64,
}

/// Return the owner's position, if any.
pub fn get_position(env: &Env, owner: &Address) -> Option<Position> {
    env.storage().persistent().get(&(POSITION, owner.clone()))
}

/// Sum of all live positions' principal.
pub fn total_staked(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
}

/// Record a deposit: create the owner's position or merge into it.
///
/// On merge the stake timestamp becomes the principal-weighted average of
/// the existing and incoming stakes. Re-staking therefore never resets an
/// accrued duration, and adding principal dilutes it proportionally — the
/// anti-gaming rule for withdraw/restake cycles.
pub fn record_stake(
    env: &Env,
    owner: &Address,
    amount: i128,
    now: u64,
) -> Result<Position, Error> {
    let position = match get_position(env, owner) {
        Some(existing) => {
            let merged_at = math::weighted_average(
                existing.staked_at as i128,
                existing.principal,
                now as i128,
                amount,
            )?;
            Position {
                principal: math::add(existing.principal, amount)?,
                // Bounded by its inputs, both of which fit in u64.
                staked_at: merged_at as u64,
            }
        }
        None => Position {
            principal: amount,
            staked_at: now,
        },
    };

    env.storage()
        .persistent()
        .set(&(POSITION, owner.clone()), &position);

    let new_total = math::add(total_staked(env), amount)?;
    env.storage().instance().set(&TOTAL_STAKED, &new_total);

    Ok(position)
}

/// Destroy the owner's position and release its principal from the global
/// total. Full-position removal only; partial withdrawal is not supported.
pub fn remove_position(env: &Env, owner: &Address, position: &Position) -> Result<(), Error> {
    env.storage().persistent().remove(&(POSITION, owner.clone()));

    let new_total = math::sub(total_staked(env), position.principal)?;
    env.storage().instance().set(&TOTAL_STAKED, &new_total);

    Ok(())
}
