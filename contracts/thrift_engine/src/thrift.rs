use soroban_sdk::{Address, Env, Symbol};

use crate::error::Error;
use crate::events::{CycleStartedEvent, ThriftCreatedEvent};
use crate::storage::{CycleConfig, Storage, Thrift};
use crate::validation::Validator;

pub struct Registry;

impl Registry {
    /// Register a thrift; the caller becomes its admin.
    pub fn create_thrift(
        env: &Env,
        admin: &Address,
        config: CycleConfig,
        priority_fee: i128,
    ) -> Result<u64, Error> {
        admin.require_auth();

        Validator::validate_cycle_config(&config)?;
        Validator::validate_amount(priority_fee)?;

        let thrift = Thrift {
            id: Storage::next_thrift_id(env),
            admin: admin.clone(),
            config,
            priority_fee,
            cycle: 1,
            version: 0,
            assigned_count: 0,
            schedule_generated: false,
            created_at: env.ledger().timestamp(),
        };
        Storage::set_thrift(env, &thrift);

        env.events().publish(
            (Symbol::new(env, "thrift_created"), thrift.id),
            ThriftCreatedEvent {
                thrift_id: thrift.id,
                admin: admin.clone(),
                contribution_amount: thrift.config.contribution_amount,
                max_members: thrift.config.max_members,
                cycle_start_date: thrift.config.cycle_start_date,
                payout_frequency: thrift.config.payout_frequency,
            },
        );

        Ok(thrift.id)
    }

    pub fn get_thrift(env: &Env, thrift_id: u64) -> Result<Thrift, Error> {
        Storage::get_thrift(env, thrift_id).ok_or(Error::NotFound)
    }

    /// Replace the cycle config while the cycle is still untouched.
    pub fn update_cycle_config(
        env: &Env,
        admin: &Address,
        thrift_id: u64,
        config: CycleConfig,
    ) -> Result<Thrift, Error> {
        let mut thrift = Validator::require_thrift_admin(env, admin, thrift_id)?;

        if thrift.config_locked() {
            return Err(Error::CycleLocked);
        }
        Validator::validate_cycle_config(&config)?;

        // shrinking max_members strands requests for the dropped positions
        thrift.config = config;
        thrift.version = thrift.version.wrapping_add(1);
        Storage::set_thrift(env, &thrift);

        Ok(thrift)
    }

    pub fn set_priority_fee(
        env: &Env,
        admin: &Address,
        thrift_id: u64,
        priority_fee: i128,
    ) -> Result<Thrift, Error> {
        let mut thrift = Validator::require_thrift_admin(env, admin, thrift_id)?;
        Validator::validate_amount(priority_fee)?;

        thrift.priority_fee = priority_fee;
        Storage::set_thrift(env, &thrift);

        Ok(thrift)
    }

    /// Close the current cycle and open the next one
    ///
    /// The current cycle must have a generated schedule with every payout
    /// Completed or Failed. Preferences, assignments and payouts of the new
    /// cycle start empty.
    pub fn start_next_cycle(
        env: &Env,
        admin: &Address,
        thrift_id: u64,
        cycle_start_date: u64,
    ) -> Result<Thrift, Error> {
        let mut thrift = Validator::require_thrift_admin(env, admin, thrift_id)?;

        if !thrift.schedule_generated {
            return Err(Error::CycleInProgress);
        }

        for payout in Storage::list_payouts(env, thrift.id, thrift.cycle).iter() {
            if !payout.status.is_terminal() {
                return Err(Error::CycleInProgress);
            }
        }

        thrift.cycle += 1;
        thrift.config.cycle_start_date = cycle_start_date;
        thrift.assigned_count = 0;
        thrift.schedule_generated = false;
        thrift.version = thrift.version.wrapping_add(1);
        Storage::set_thrift(env, &thrift);

        env.events().publish(
            (Symbol::new(env, "cycle_started"), thrift.id),
            CycleStartedEvent {
                thrift_id: thrift.id,
                cycle: thrift.cycle,
                cycle_start_date,
            },
        );

        Ok(thrift)
    }
}
