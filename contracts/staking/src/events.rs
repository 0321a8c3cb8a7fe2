#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::rate::RateConfig;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub stake_token: Address,
    pub reward_token: Address,
    pub base_rate: i128,
    pub amount_weight: i128,
    pub duration_weight: i128,
    pub supply_weight: i128,
    pub timestamp: u64,
}

/// Fired when a user deposits stake. `principal` and `staked_at` describe
/// the position after any merge.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub principal: i128,
    pub staked_at: u64,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a position is fully withdrawn and settled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub principal: i128,
    pub reward: i128,
    pub rate: i128,
    pub timestamp: u64,
}

/// Fired when the distributable reward supply is topped up.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsFundedEvent {
    pub from: Address,
    pub amount: i128,
    pub reward_supply: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    stake_token: Address,
    reward_token: Address,
    cfg: &RateConfig,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            stake_token,
            reward_token,
            base_rate: cfg.base_rate,
            amount_weight: cfg.amount_weight,
            duration_weight: cfg.duration_weight,
            supply_weight: cfg.supply_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(
    env: &Env,
    staker: Address,
    amount: i128,
    principal: i128,
    staked_at: u64,
    new_total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            principal,
            staked_at,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, principal: i128, reward: i128, rate: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            principal,
            reward,
            rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_funded(env: &Env, from: Address, amount: i128, reward_supply: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), from.clone()),
        RewardsFundedEvent {
            from,
            amount,
            reward_supply,
            timestamp: env.ledger().timestamp(),
        },
    );
}
