use soroban_sdk::{Address, Env, Map, Symbol, Vec};

use crate::bidding;
use crate::error::Error;
use crate::events::{PreferenceSetEvent, PreferenceWithdrawnEvent};
use crate::ledger::Ledger;
use crate::storage::{Preference, PreferenceStatus, PositionStatus, Storage, Thrift};
use crate::validation::Validator;

pub struct PreferenceStore;

impl PreferenceStore {
    /// Record or replace a member's desired position for the current cycle
    ///
    /// # Errors
    /// - `NotFound`: Unknown thrift, or member not on the ledger roster
    /// - `InvalidAmount`: Negative bid
    /// - `InvalidPosition`: Position outside [1, max_members]
    /// - `PositionAssigned`: Position already finalized
    /// - `MemberAlreadyAssigned`: Member already holds a position
    /// - `InsufficientBalance`: Bid exceeds the member's current balance
    pub fn set_preference(
        env: &Env,
        member: &Address,
        thrift_id: u64,
        position: u32,
        bid_amount: i128,
    ) -> Result<Preference, Error> {
        member.require_auth();

        let mut thrift = Storage::get_thrift(env, thrift_id).ok_or(Error::NotFound)?;

        Validator::validate_amount(bid_amount)?;
        Validator::validate_open_slot(env, &thrift, position, member)?;

        let ledger = Ledger::load(env)?;
        if !ledger.is_active_member(thrift_id, member)? {
            return Err(Error::NotFound);
        }

        // not held; re-checked when the position settles
        if bid_amount > 0 && ledger.get_balance(member)? < bid_amount {
            return Err(Error::InsufficientBalance);
        }

        let preference = Preference {
            member: member.clone(),
            thrift_id,
            cycle: thrift.cycle,
            desired_position: position,
            bid_amount,
            status: PreferenceStatus::Requested,
            created_at: env.ledger().timestamp(),
            sequence: Storage::next_preference_sequence(env),
        };
        Storage::set_preference(env, &preference);

        thrift.version = thrift.version.wrapping_add(1);
        Storage::set_thrift(env, &thrift);

        env.events().publish(
            (Symbol::new(env, "preference_set"), thrift_id, member.clone()),
            PreferenceSetEvent {
                thrift_id,
                member: member.clone(),
                desired_position: position,
                bid_amount,
            },
        );

        Ok(preference)
    }

    /// Withdraw the member's live preference; other members are unaffected.
    ///
    /// # Errors
    /// - `NotFound`: Unknown thrift or no live preference
    /// - `PositionAssigned`: The preference already won its position
    pub fn withdraw(env: &Env, member: &Address, thrift_id: u64) -> Result<Preference, Error> {
        member.require_auth();

        let mut thrift = Storage::get_thrift(env, thrift_id).ok_or(Error::NotFound)?;
        let mut preference = Storage::get_preference(env, thrift_id, thrift.cycle, member)
            .filter(Preference::is_live)
            .ok_or(Error::NotFound)?;

        if preference.status == PreferenceStatus::Won {
            return Err(Error::PositionAssigned);
        }

        preference.status = PreferenceStatus::Withdrawn;
        Storage::set_preference(env, &preference);

        thrift.version = thrift.version.wrapping_add(1);
        Storage::set_thrift(env, &thrift);

        env.events().publish(
            (Symbol::new(env, "preference_withdrawn"), thrift_id, member.clone()),
            PreferenceWithdrawnEvent {
                thrift_id,
                member: member.clone(),
                desired_position: preference.desired_position,
            },
        );

        Ok(preference)
    }

    pub fn get_preference(env: &Env, thrift_id: u64, member: &Address) -> Result<Preference, Error> {
        let thrift = Storage::get_thrift(env, thrift_id).ok_or(Error::NotFound)?;
        Storage::get_preference(env, thrift_id, thrift.cycle, member).ok_or(Error::NotFound)
    }

    pub fn list_preferences(env: &Env, thrift_id: u64) -> Result<Vec<Preference>, Error> {
        let thrift = Storage::get_thrift(env, thrift_id).ok_or(Error::NotFound)?;
        Ok(Storage::list_preferences(env, thrift_id, thrift.cycle))
    }

    /// Requested preferences of the current cycle, grouped by desired position.
    /// Members that already hold an assignment are left out.
    pub fn open_requests(env: &Env, thrift: &Thrift) -> Map<u32, Vec<Preference>> {
        let mut by_position: Map<u32, Vec<Preference>> = Map::new(env);
        for preference in Storage::list_preferences(env, thrift.id, thrift.cycle).iter() {
            if preference.status != PreferenceStatus::Requested
                || preference.desired_position > thrift.config.max_members
                || Storage::member_position(env, thrift.id, thrift.cycle, &preference.member).is_some()
            {
                continue;
            }
            let mut bucket = by_position
                .get(preference.desired_position)
                .unwrap_or(Vec::new(env));
            bucket.push_back(preference.clone());
            by_position.set(preference.desired_position, bucket);
        }
        by_position
    }

    pub fn position_status(env: &Env, thrift_id: u64, position: u32) -> Result<PositionStatus, Error> {
        let thrift = Storage::get_thrift(env, thrift_id).ok_or(Error::NotFound)?;
        Validator::validate_position(&thrift, position)?;

        if let Some(assignment) = Storage::get_assignment(env, thrift_id, thrift.cycle, position) {
            return Ok(PositionStatus::Assigned(assignment.member));
        }

        let requests = Self::open_requests(env, &thrift)
            .get(position)
            .unwrap_or(Vec::new(env));
        match bidding::rank(env, &requests).first() {
            Some(leader) => Ok(PositionStatus::Requested(leader.member, leader.bid_amount)),
            None => Ok(PositionStatus::Available),
        }
    }
}
