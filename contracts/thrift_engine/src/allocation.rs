use soroban_sdk::{log, Address, Env, Symbol, Vec};

use crate::bidding::{self, Resolution};
use crate::error::Error;
use crate::events::{BidReleasedEvent, BidderSkippedEvent, PositionAssignedEvent};
use crate::ledger::Ledger;
use crate::preference::PreferenceStore;
use crate::storage::{Assignment, Preference, PreferenceStatus, Storage, Thrift};
use crate::validation::Validator;

pub struct Allocator;

impl Allocator {
    /// Finalize every open position that has at least one request
    ///
    /// Uncontested positions go to the sole requester with no money moved.
    /// Contested positions go to the best-ranked bidder whose debit clears;
    /// bidders who cannot pay are passed over in rank order. Bids stay in the
    /// bidders' balances until settlement, so only the winner is charged and
    /// losing bids are released without a ledger credit. A ledger failure
    /// aborts the whole settlement.
    ///
    /// Returns the complete assignment set of the current cycle.
    ///
    /// # Errors
    /// - `NotFound`: Unknown thrift
    /// - `Unauthorized`: Caller is not the thrift admin
    /// - `ConcurrentModification`: `expected_version` is stale
    /// - `AdapterUnavailable`: Ledger call failed
    pub fn finalize(
        env: &Env,
        admin: &Address,
        thrift_id: u64,
        expected_version: Option<u32>,
    ) -> Result<Vec<Assignment>, Error> {
        let mut thrift = Validator::require_thrift_admin(env, admin, thrift_id)?;

        if let Some(expected) = expected_version {
            if expected != thrift.version {
                return Err(Error::ConcurrentModification);
            }
        }

        let ledger = Ledger::load(env)?;
        let requests = PreferenceStore::open_requests(env, &thrift);
        let mut assigned = 0u32;

        for position in 1..=thrift.config.max_members {
            if Storage::get_assignment(env, thrift.id, thrift.cycle, position).is_some() {
                continue;
            }
            let Some(candidates) = requests.get(position) else {
                continue;
            };
            if Self::settle_position(env, &ledger, &thrift, position, &candidates)?.is_some() {
                assigned += 1;
            }
        }

        // nothing assigned means nothing changed: keep the version stable
        if assigned > 0 {
            thrift.assigned_count += assigned;
            thrift.version = thrift.version.wrapping_add(1);
            Storage::set_thrift(env, &thrift);
        }

        Ok(Storage::list_assignments(env, &thrift))
    }

    /// Administrator default assignment of an open position
    ///
    /// The member's outstanding request, if any, is withdrawn.
    ///
    /// # Errors
    /// - `NotFound`: Unknown thrift or member not on the roster
    /// - `InvalidPosition` / `PositionAssigned` / `MemberAlreadyAssigned`
    pub fn assign_position(
        env: &Env,
        admin: &Address,
        thrift_id: u64,
        position: u32,
        member: &Address,
    ) -> Result<Assignment, Error> {
        let mut thrift = Validator::require_thrift_admin(env, admin, thrift_id)?;
        Validator::validate_open_slot(env, &thrift, position, member)?;

        if !Ledger::load(env)?.is_active_member(thrift_id, member)? {
            return Err(Error::NotFound);
        }

        if let Some(mut preference) = Storage::get_preference(env, thrift_id, thrift.cycle, member) {
            if preference.is_live() {
                preference.status = PreferenceStatus::Withdrawn;
                Storage::set_preference(env, &preference);
            }
        }

        let assignment = Self::record_assignment(env, &thrift, position, member, 0);

        thrift.assigned_count += 1;
        thrift.version = thrift.version.wrapping_add(1);
        Storage::set_thrift(env, &thrift);

        Ok(assignment)
    }

    pub fn list_assignments(env: &Env, thrift_id: u64) -> Result<Vec<Assignment>, Error> {
        let thrift = Storage::get_thrift(env, thrift_id).ok_or(Error::NotFound)?;
        Ok(Storage::list_assignments(env, &thrift))
    }

    fn settle_position(
        env: &Env,
        ledger: &Ledger,
        thrift: &Thrift,
        position: u32,
        candidates: &Vec<Preference>,
    ) -> Result<Option<Assignment>, Error> {
        let contested = candidates.len() > 1;
        let mut disqualified: Vec<Address> = Vec::new(env);

        let resolution: Resolution = loop {
            let Some(resolution) = bidding::resolve(env, candidates, &disqualified) else {
                // every bidder failed the balance check; requests stay open
                return Ok(None);
            };

            let winner = &resolution.winner;
            if !contested || winner.bid_amount == 0 {
                break resolution;
            }

            match ledger.debit(&winner.member, winner.bid_amount) {
                Ok(()) => break resolution,
                Err(Error::InsufficientBalance) => {
                    log!(
                        env,
                        "bidder passed over",
                        thrift.id,
                        position,
                        winner.member.clone(),
                        winner.bid_amount
                    );
                    env.events().publish(
                        (Symbol::new(env, "bidder_skipped"), thrift.id, position),
                        BidderSkippedEvent {
                            thrift_id: thrift.id,
                            position,
                            member: winner.member.clone(),
                            bid_amount: winner.bid_amount,
                        },
                    );
                    disqualified.push_back(winner.member.clone());
                }
                Err(err) => return Err(err),
            }
        };

        // losing bids were never collected: release them, credit nothing
        for refund in resolution.refunds.iter() {
            env.events().publish(
                (Symbol::new(env, "bid_released"), thrift.id, position),
                BidReleasedEvent {
                    thrift_id: thrift.id,
                    position,
                    member: refund.member.clone(),
                    amount: refund.amount,
                },
            );
        }

        for mut candidate in candidates.iter() {
            candidate.status = if candidate.member == resolution.winner.member {
                PreferenceStatus::Won
            } else {
                PreferenceStatus::Outbid
            };
            Storage::set_preference(env, &candidate);
        }

        log!(
            env,
            "position settled, bids released",
            thrift.id,
            position,
            resolution.total_refunded()
        );

        let winning_bid = if contested {
            resolution.winner.bid_amount
        } else {
            0
        };
        Ok(Some(Self::record_assignment(
            env,
            thrift,
            position,
            &resolution.winner.member,
            winning_bid,
        )))
    }

    fn record_assignment(
        env: &Env,
        thrift: &Thrift,
        position: u32,
        member: &Address,
        winning_bid: i128,
    ) -> Assignment {
        let assignment = Assignment {
            thrift_id: thrift.id,
            cycle: thrift.cycle,
            position,
            member: member.clone(),
            finalized_at: env.ledger().timestamp(),
            winning_bid,
        };
        Storage::set_assignment(env, &assignment);

        env.events().publish(
            (Symbol::new(env, "position_assigned"), thrift.id, position),
            PositionAssignedEvent {
                thrift_id: thrift.id,
                cycle: thrift.cycle,
                position,
                member: member.clone(),
                winning_bid,
            },
        );

        assignment
    }
}
