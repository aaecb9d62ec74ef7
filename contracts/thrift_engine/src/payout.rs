use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::error::Error;
use crate::events::PayoutScheduledEvent;
use crate::ledger::Ledger;
use crate::schedule;
use crate::storage::{Payout, PayoutStatus, Storage};
use crate::validation::Validator;

pub struct Scheduler;

impl Scheduler {
    /// Create one Pending payout per assignment that has none yet
    ///
    /// Formula: amount = contribution_amount × active members on the ledger roster
    ///
    /// Re-running only picks up positions assigned since the previous run.
    /// Returns every payout of the current cycle.
    ///
    /// # Errors
    /// - `NotFound`: Unknown thrift
    /// - `Unauthorized`: Caller is not the thrift admin
    /// - `InvalidAmount`: Pool amount or payout date overflows
    /// - `AdapterUnavailable`: Ledger call failed
    pub fn generate_schedule(env: &Env, admin: &Address, thrift_id: u64) -> Result<Vec<Payout>, Error> {
        let mut thrift = Validator::require_thrift_admin(env, admin, thrift_id)?;

        let active_members = Ledger::load(env)?.get_active_members(thrift_id)?.len();
        let amount = thrift
            .config
            .contribution_amount
            .checked_mul(active_members as i128)
            .ok_or(Error::InvalidAmount)?;

        for assignment in Storage::list_assignments(env, &thrift).iter() {
            if Storage::position_payout(env, thrift.id, thrift.cycle, assignment.position).is_some() {
                continue;
            }

            let scheduled_date = schedule::scheduled_date(
                thrift.config.cycle_start_date,
                thrift.config.payout_frequency,
                assignment.position,
            )
            .ok_or(Error::InvalidAmount)?;

            let payout = Payout {
                id: Storage::next_payout_id(env),
                thrift_id: thrift.id,
                cycle: thrift.cycle,
                member: assignment.member.clone(),
                position: assignment.position,
                amount,
                scheduled_date,
                status: PayoutStatus::Pending,
                completed_date: None,
                priority_fee: None,
            };
            Storage::add_payout(env, &payout);

            env.events().publish(
                (Symbol::new(env, "payout_scheduled"), thrift.id, payout.id),
                PayoutScheduledEvent {
                    payout_id: payout.id,
                    thrift_id: thrift.id,
                    member: payout.member.clone(),
                    position: payout.position,
                    amount,
                    scheduled_date,
                },
            );
        }

        if !thrift.schedule_generated {
            thrift.schedule_generated = true;
            Storage::set_thrift(env, &thrift);
        }

        Ok(Storage::list_payouts(env, thrift.id, thrift.cycle))
    }

    /// Payouts of the current cycle in creation order
    pub fn list_payouts(env: &Env, thrift_id: u64) -> Result<Vec<Payout>, Error> {
        let thrift = Storage::get_thrift(env, thrift_id).ok_or(Error::NotFound)?;
        Ok(Storage::list_payouts(env, thrift_id, thrift.cycle))
    }

    pub fn get_payout(env: &Env, payout_id: u64) -> Result<Payout, Error> {
        Storage::get_payout(env, payout_id).ok_or(Error::NotFound)
    }
}
