#![no_std]

mod allocation;
mod bidding;
mod disbursement;
mod error;
mod events;
mod ledger;
mod payout;
mod preference;
mod schedule;
mod storage;
mod thrift;
mod validation;

pub use error::Error;
pub use storage::{
    Assignment, CycleConfig, Payout, PayoutFrequency, PayoutStatus, PositionStatus, Preference,
    PreferenceStatus, Thrift,
};

use allocation::Allocator;
use disbursement::Disbursement;
use payout::Scheduler;
use preference::PreferenceStore;
use storage::Storage;
use thrift::Registry;
use validation::Validator;

use soroban_sdk::{contract, contractimpl, Address, Env, Vec};

/// Position allocation and payout scheduling for rotating savings groups.
#[contract]
pub struct ThriftEngine;

#[contractimpl]
impl ThriftEngine {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the engine with its admin and the ledger contract
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address, ledger: Address) -> Result<(), Error> {
        if Storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        Storage::initialize(&env, &admin, &ledger);
        Ok(())
    }

    /// Pause all commands (emergency)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn pause(env: Env) -> Result<(), Error> {
        let admin = Storage::get_admin(&env).ok_or(Error::NotInitialized)?;
        admin.require_auth();

        Storage::set_paused(&env, true);
        Ok(())
    }

    /// Resume commands
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn unpause(env: Env) -> Result<(), Error> {
        let admin = Storage::get_admin(&env).ok_or(Error::NotInitialized)?;
        admin.require_auth();

        Storage::set_paused(&env, false);
        Ok(())
    }

    // ============================================
    // THRIFT REGISTRY
    // ============================================

    /// Register a thrift; the caller becomes its admin
    ///
    /// # Errors
    /// - `InvalidConfig`: Contribution, member bounds or duration out of range
    /// - `InvalidAmount`: Negative priority fee
    pub fn create_thrift(
        env: Env,
        admin: Address,
        config: CycleConfig,
        priority_fee: i128,
    ) -> Result<u64, Error> {
        Validator::check_not_paused(&env)?;
        Registry::create_thrift(&env, &admin, config, priority_fee)
    }

    /// Replace the cycle config before any allocation or scheduling
    ///
    /// # Errors
    /// - `CycleLocked`: Assignments or payouts already exist this cycle
    pub fn update_cycle_config(
        env: Env,
        admin: Address,
        thrift_id: u64,
        config: CycleConfig,
    ) -> Result<Thrift, Error> {
        Validator::check_not_paused(&env)?;
        Registry::update_cycle_config(&env, &admin, thrift_id, config)
    }

    /// Set the fee charged for an early payout
    pub fn set_priority_fee(
        env: Env,
        admin: Address,
        thrift_id: u64,
        priority_fee: i128,
    ) -> Result<Thrift, Error> {
        Validator::check_not_paused(&env)?;
        Registry::set_priority_fee(&env, &admin, thrift_id, priority_fee)
    }

    /// Open the next rotation once every payout of the current one is settled
    ///
    /// # Errors
    /// - `CycleInProgress`: Schedule missing or payouts still open
    pub fn start_next_cycle(
        env: Env,
        admin: Address,
        thrift_id: u64,
        cycle_start_date: u64,
    ) -> Result<Thrift, Error> {
        Validator::check_not_paused(&env)?;
        Registry::start_next_cycle(&env, &admin, thrift_id, cycle_start_date)
    }

    // ============================================
    // PREFERENCES
    // ============================================

    /// Request a rotation position, optionally with a bid
    ///
    /// # Errors
    /// - `InvalidPosition`: Position outside [1, max_members]
    /// - `PositionAssigned`: Position already finalized
    /// - `MemberAlreadyAssigned`: Member already holds a position
    /// - `NotFound`: Unknown thrift or member
    /// - `InsufficientBalance`: Bid exceeds the member's balance
    pub fn set_preference(
        env: Env,
        member: Address,
        thrift_id: u64,
        position: u32,
        bid_amount: i128,
    ) -> Result<Preference, Error> {
        Validator::check_not_paused(&env)?;
        PreferenceStore::set_preference(&env, &member, thrift_id, position, bid_amount)
    }

    /// Withdraw the member's live request
    pub fn withdraw_preference(env: Env, member: Address, thrift_id: u64) -> Result<Preference, Error> {
        Validator::check_not_paused(&env)?;
        PreferenceStore::withdraw(&env, &member, thrift_id)
    }

    // ============================================
    // ALLOCATION
    // ============================================

    /// Resolve requests into irreversible assignments
    ///
    /// Pass the version read from `get_version` to fail fast with
    /// `ConcurrentModification` if requests changed in between.
    pub fn finalize_allocation(
        env: Env,
        admin: Address,
        thrift_id: u64,
        expected_version: Option<u32>,
    ) -> Result<Vec<Assignment>, Error> {
        Validator::check_not_paused(&env)?;
        Allocator::finalize(&env, &admin, thrift_id, expected_version)
    }

    /// Assign an open position directly (administrator default)
    pub fn assign_position(
        env: Env,
        admin: Address,
        thrift_id: u64,
        position: u32,
        member: Address,
    ) -> Result<Assignment, Error> {
        Validator::check_not_paused(&env)?;
        Allocator::assign_position(&env, &admin, thrift_id, position, &member)
    }

    // ============================================
    // PAYOUTS
    // ============================================

    /// Create Pending payouts for every assignment without one
    pub fn generate_schedule(env: Env, admin: Address, thrift_id: u64) -> Result<Vec<Payout>, Error> {
        Validator::check_not_paused(&env)?;
        Scheduler::generate_schedule(&env, &admin, thrift_id)
    }

    /// Move a payout to `target` status
    ///
    /// # Errors
    /// - `IllegalTransition`: Not reachable from the current status
    pub fn advance_payout_status(
        env: Env,
        admin: Address,
        payout_id: u64,
        target: PayoutStatus,
    ) -> Result<Payout, Error> {
        Validator::check_not_paused(&env)?;
        Disbursement::advance(&env, &admin, payout_id, target)
    }

    /// Pay the priority fee to receive a Pending payout now
    ///
    /// # Errors
    /// - `AlreadyExpedited`: Early payout already granted
    /// - `IllegalTransition`: Payout not Pending
    /// - `InsufficientBalance`: Fee exceeds the requester's balance
    pub fn request_early_payout(env: Env, requester: Address, payout_id: u64) -> Result<Payout, Error> {
        Validator::check_not_paused(&env)?;
        Disbursement::request_early_payout(&env, &requester, payout_id)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_position_status(env: Env, thrift_id: u64, position: u32) -> Result<PositionStatus, Error> {
        PreferenceStore::position_status(&env, thrift_id, position)
    }

    pub fn list_preferences(env: Env, thrift_id: u64) -> Result<Vec<Preference>, Error> {
        PreferenceStore::list_preferences(&env, thrift_id)
    }

    pub fn get_preference(env: Env, thrift_id: u64, member: Address) -> Result<Preference, Error> {
        PreferenceStore::get_preference(&env, thrift_id, &member)
    }

    pub fn list_assignments(env: Env, thrift_id: u64) -> Result<Vec<Assignment>, Error> {
        Allocator::list_assignments(&env, thrift_id)
    }

    pub fn list_payouts(env: Env, thrift_id: u64) -> Result<Vec<Payout>, Error> {
        Scheduler::list_payouts(&env, thrift_id)
    }

    pub fn get_payout(env: Env, payout_id: u64) -> Result<Payout, Error> {
        Scheduler::get_payout(&env, payout_id)
    }

    pub fn get_thrift(env: Env, thrift_id: u64) -> Result<Thrift, Error> {
        Registry::get_thrift(&env, thrift_id)
    }

    /// Allocation version of a thrift, for `finalize_allocation`
    pub fn get_version(env: Env, thrift_id: u64) -> Result<u32, Error> {
        Ok(Registry::get_thrift(&env, thrift_id)?.version)
    }

    pub fn get_ledger(env: Env) -> Result<Address, Error> {
        Storage::get_ledger(&env).ok_or(Error::NotInitialized)
    }
}
