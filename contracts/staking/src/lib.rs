#![no_std]

pub mod events;
pub mod ledger;
pub mod math;
pub mod rate;
pub mod settlement;

use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol};

pub use ledger::Position;
pub use rate::{RateConfig, RateQuote};

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const RATE_CONFIG: Symbol = symbol_short!("RATE_CFG");
const REWARD_SUPPLY: Symbol = symbol_short!("RWD_SUP");
const SUPPLY_REFERENCE: Symbol = symbol_short!("SUP_REF");

// ── Contract errors ──────────────────────────────────────────────────────────

/// Error codes, grouped by range:
///
/// | Range   | Purpose                  |
/// |---------|--------------------------|
/// | 1 – 9   | Lifecycle                |
/// | 20 – 29 | State / not found        |
/// | 30 – 39 | Validation / input       |
/// | 40 – 49 | Configuration            |
/// | 50 – 59 | Arithmetic               |
/// | 60 – 69 | Solvency                 |
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// The caller has no staking position.
    NoPosition = 20,
    /// A rate was requested for a zero-principal position.
    NoStake = 21,
    /// The amount must be strictly positive.
    ZeroAmount = 30,
    /// Stake and reward assets must differ.
    TokensIdentical = 31,
    /// A configured weight or base rate is negative.
    InvalidWeights = 40,
    Overflow = 50,
    Underflow = 51,
    DivideByZero = 52,
    /// The computed reward exceeds the distributable supply. Terminal for
    /// this withdrawal; retry after `fund_rewards`.
    RewardSupplyExhausted = 60,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Amounts settled by a full withdrawal, returned for the caller's records;
/// the token transfers themselves happen inside `withdraw`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawReceipt {
    pub principal: i128,
    pub reward: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract. All parameters are immutable afterwards.
    ///
    /// * `stake_token`  – SAC address of the token users stake.
    /// * `reward_token` – SAC address of the token paid out as rewards.
    /// * `base_rate` and the three weights – fixed-point values scaled by
    ///   [`math::SCALE`] (`SCALE` = 100% per reference period); all must be
    ///   non-negative.
    pub fn initialize(
        env: Env,
        stake_token: Address,
        reward_token: Address,
        base_rate: i128,
        amount_weight: i128,
        duration_weight: i128,
        supply_weight: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(Error::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(Error::TokensIdentical);
        }

        let cfg = RateConfig {
            base_rate,
            amount_weight,
            duration_weight,
            supply_weight,
        };
        rate::validate(&cfg)?;

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&STAKE_TOKEN, &stake_token);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&RATE_CONFIG, &cfg);
        // TOTAL_STAKED, REWARD_SUPPLY, and SUPPLY_REFERENCE start at zero;
        // unwrap_or(0) handles absent keys, so no explicit init needed.

        events::publish_initialized(&env, stake_token, reward_token, &cfg);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens into the caller's position.
    ///
    /// A second deposit merges into the existing position with a
    /// principal-weighted average stake timestamp, so duration-based accrual
    /// can never be gamed by withdraw/restake cycles.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }

        let now = env.ledger().timestamp();
        let position = ledger::record_stake(&env, &staker, amount, now)?;
        let new_total = ledger::total_staked(&env);

        // Bookkeeping is complete; the transfer is the last fallible step.
        let stake_token = Self::stake_token(&env)?;
        token::Client::new(&env, &stake_token).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_staked(
            &env,
            staker,
            amount,
            position.principal,
            position.staked_at,
            new_total,
        );

        Ok(())
    }

    // ── Withdrawal ──────────────────────────────────────────────────────────

    /// Withdraw the caller's entire position: settle the reward at the
    /// current dynamic rate, destroy the position, and transfer principal
    /// plus reward out.
    ///
    /// Fails with `RewardSupplyExhausted` — leaving the position intact —
    /// when the accrued reward exceeds the distributable supply; the caller
    /// may retry once the supply has been replenished.
    pub fn withdraw(env: Env, staker: Address) -> Result<WithdrawReceipt, Error> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let position = ledger::get_position(&env, &staker).ok_or(Error::NoPosition)?;
        let cfg = Self::rate_config(&env)?;
        let global = Self::global_state(&env);
        let now = env.ledger().timestamp();

        let settlement = settlement::settle(&cfg, &global, &position, now)?;
        let reward = settlement.reward;

        // Effects: remove the position and debit the reward supply before
        // any token leaves the contract.
        ledger::remove_position(&env, &staker, &position)?;
        let remaining = math::sub(global.reward_supply, reward)?;
        env.storage().instance().set(&REWARD_SUPPLY, &remaining);

        // Interactions last. A failed transfer traps and reverts every
        // storage write above.
        let stake_token = Self::stake_token(&env)?;
        token::Client::new(&env, &stake_token).transfer(
            &env.current_contract_address(),
            &staker,
            &position.principal,
        );
        if reward > 0 {
            let reward_token = Self::reward_token(&env)?;
            token::Client::new(&env, &reward_token).transfer(
                &env.current_contract_address(),
                &staker,
                &reward,
            );
        }

        events::publish_withdrawn(&env, staker, position.principal, reward, settlement.quote.rate);

        Ok(WithdrawReceipt {
            principal: position.principal,
            reward,
        })
    }

    // ── Reward funding ──────────────────────────────────────────────────────

    /// Top up the distributable reward supply. Permissionless: any holder of
    /// the reward asset may fund future payouts.
    ///
    /// The funding high-water mark feeds the scarcity factor of the rate
    /// calculation, so depleting the supply raises the incentive rate until
    /// someone replenishes it.
    pub fn fund_rewards(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        Self::require_initialized(&env)?;
        from.require_auth();

        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }

        let supply = math::add(Self::reward_supply(&env), amount)?;
        env.storage().instance().set(&REWARD_SUPPLY, &supply);

        let reference: i128 = env.storage().instance().get(&SUPPLY_REFERENCE).unwrap_or(0);
        if supply > reference {
            env.storage().instance().set(&SUPPLY_REFERENCE, &supply);
        }

        let reward_token = Self::reward_token(&env)?;
        token::Client::new(&env, &reward_token).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_rewards_funded(&env, from, amount, supply);

        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Return the sum of all live positions' principal.
    pub fn get_total_staked(env: Env) -> i128 {
        ledger::total_staked(&env)
    }

    /// Return the caller's position.
    pub fn get_position(env: Env, staker: Address) -> Result<Position, Error> {
        ledger::get_position(&env, &staker).ok_or(Error::NoPosition)
    }

    /// Return the reward supply still available for distribution.
    pub fn get_reward_supply(env: Env) -> i128 {
        Self::reward_supply(&env)
    }

    /// Quote the effective rate the staker would settle at right now.
    pub fn quote_rate(env: Env, staker: Address) -> Result<RateQuote, Error> {
        Self::require_initialized(&env)?;
        let position = ledger::get_position(&env, &staker).ok_or(Error::NoPosition)?;
        let cfg = Self::rate_config(&env)?;
        let global = Self::global_state(&env);
        rate::quote(&cfg, &global, &position, env.ledger().timestamp())
    }

    /// Return the reward a `withdraw` would pay right now, without the
    /// solvency check.
    pub fn preview_reward(env: Env, staker: Address) -> Result<i128, Error> {
        Self::require_initialized(&env)?;
        let position = ledger::get_position(&env, &staker).ok_or(Error::NoPosition)?;
        let cfg = Self::rate_config(&env)?;
        let global = Self::global_state(&env);
        let settlement =
            settlement::accrued(&cfg, &global, &position, env.ledger().timestamp())?;
        Ok(settlement.reward)
    }

    /// Return the immutable rate configuration.
    pub fn get_config(env: Env) -> Result<RateConfig, Error> {
        Self::rate_config(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), Error> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(Error::NotInitialized);
        }
        Ok(())
    }

    fn stake_token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&STAKE_TOKEN)
            .ok_or(Error::NotInitialized)
    }

    fn reward_token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(Error::NotInitialized)
    }

    fn rate_config(env: &Env) -> Result<RateConfig, Error> {
        env.storage()
            .instance()
            .get(&RATE_CONFIG)
            .ok_or(Error::NotInitialized)
    }

    fn reward_supply(env: &Env) -> i128 {
        env.storage().instance().get(&REWARD_SUPPLY).unwrap_or(0)
    }

    /// Assemble the rate calculator's read-only snapshot from storage.
    fn global_state(env: &Env) -> rate::GlobalState {
        rate::GlobalState {
            total_staked: ledger::total_staked(env),
            reward_supply: Self::reward_supply(env),
            supply_reference: env.storage().instance().get(&SUPPLY_REFERENCE).unwrap_or(0),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
