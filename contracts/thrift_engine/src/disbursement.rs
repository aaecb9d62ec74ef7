use soroban_sdk::{Address, Env, Symbol};

use crate::error::Error;
use crate::events::{PayoutExpeditedEvent, PayoutStatusEvent};
use crate::ledger::Ledger;
use crate::storage::{Payout, PayoutStatus, Storage};
use crate::validation::Validator;

impl PayoutStatus {
    /// Transition table
    ///
    /// Pending → Processing → Completed, and Pending | Processing → Failed.
    /// Completed and Failed are terminal.
    pub fn can_transition_to(self, next: PayoutStatus) -> bool {
        matches!(
            (self, next),
            (PayoutStatus::Pending, PayoutStatus::Processing)
                | (PayoutStatus::Processing, PayoutStatus::Completed)
                | (PayoutStatus::Pending, PayoutStatus::Failed)
                | (PayoutStatus::Processing, PayoutStatus::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PayoutStatus::Completed | PayoutStatus::Failed)
    }
}

pub struct Disbursement;

impl Disbursement {
    /// Move a payout along its lifecycle (thrift admin only)
    ///
    /// # Errors
    /// - `NotFound`: Unknown payout
    /// - `Unauthorized`: Caller is not the thrift admin
    /// - `IllegalTransition`: `target` not reachable from the current status
    pub fn advance(
        env: &Env,
        admin: &Address,
        payout_id: u64,
        target: PayoutStatus,
    ) -> Result<Payout, Error> {
        let mut payout = Storage::get_payout(env, payout_id).ok_or(Error::NotFound)?;
        Validator::require_thrift_admin(env, admin, payout.thrift_id)?;

        let from = payout.status;
        if !from.can_transition_to(target) {
            return Err(Error::IllegalTransition);
        }

        payout.status = target;
        if target == PayoutStatus::Completed {
            payout.completed_date = Some(env.ledger().timestamp());
        }
        Storage::set_payout(env, &payout);

        env.events().publish(
            (Symbol::new(env, "payout_status"), payout.thrift_id, payout_id),
            PayoutStatusEvent {
                payout_id,
                from,
                to: target,
            },
        );

        Ok(payout)
    }

    /// Pay the thrift's priority fee to move a Pending payout to now
    ///
    /// Only this payout's date changes; every other payout keeps its date, so
    /// two payouts may share an instant. Fee debit and reschedule commit
    /// together or not at all.
    ///
    /// # Errors
    /// - `NotFound`: Unknown payout or thrift
    /// - `Unauthorized`: Requester does not own the payout
    /// - `AlreadyExpedited`: Payout was already expedited
    /// - `IllegalTransition`: Payout is no longer Pending
    /// - `InsufficientBalance`: Requester cannot cover the fee
    pub fn request_early_payout(env: &Env, requester: &Address, payout_id: u64) -> Result<Payout, Error> {
        requester.require_auth();

        let mut payout = Storage::get_payout(env, payout_id).ok_or(Error::NotFound)?;
        if requester != &payout.member {
            return Err(Error::Unauthorized);
        }

        if payout.priority_fee.is_some() {
            return Err(Error::AlreadyExpedited);
        }

        if payout.status != PayoutStatus::Pending {
            return Err(Error::IllegalTransition);
        }

        let thrift = Storage::get_thrift(env, payout.thrift_id).ok_or(Error::NotFound)?;
        let fee = thrift.priority_fee;
        if fee > 0 {
            Ledger::load(env)?.debit(requester, fee)?;
        }

        let previous_date = payout.scheduled_date;
        payout.scheduled_date = env.ledger().timestamp();
        payout.priority_fee = Some(fee);
        Storage::set_payout(env, &payout);

        env.events().publish(
            (Symbol::new(env, "payout_expedited"), payout.thrift_id, payout_id),
            PayoutExpeditedEvent {
                payout_id,
                member: payout.member.clone(),
                priority_fee: fee,
                previous_date,
                scheduled_date: payout.scheduled_date,
            },
        );

        Ok(payout)
    }
}
