use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::storage::Preference;

/// Amount owed back to a losing bidder
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Refund {
    pub member: Address,
    pub amount: i128,
}

pub struct Resolution {
    pub winner: Preference,
    /// One entry per losing candidate with a positive bid
    pub refunds: Vec<Refund>,
}

impl Resolution {
    pub fn total_refunded(&self) -> i128 {
        self.refunds.iter().map(|refund| refund.amount).sum()
    }
}

/// Ordering used for contested positions
///
/// Higher bid first; equal bids go to the earlier request (`created_at`,
/// then `sequence`, since several requests can share a ledger timestamp).
pub fn outranks(a: &Preference, b: &Preference) -> bool {
    if a.bid_amount != b.bid_amount {
        return a.bid_amount > b.bid_amount;
    }
    if a.created_at != b.created_at {
        return a.created_at < b.created_at;
    }
    a.sequence < b.sequence
}

/// Candidates sorted best-first. Positions hold few candidates, so a plain
/// insertion sort is enough.
pub fn rank(env: &Env, candidates: &Vec<Preference>) -> Vec<Preference> {
    let mut ranked: Vec<Preference> = Vec::new(env);
    for candidate in candidates.iter() {
        let mut index = ranked.len();
        for (i, existing) in ranked.iter().enumerate() {
            if outranks(&candidate, &existing) {
                index = i as u32;
                break;
            }
        }
        ranked.insert(index, candidate);
    }
    ranked
}

/// Resolve one position
///
/// The winner is the best-ranked candidate whose member is not in
/// `disqualified`. Every other candidate with a positive bid, disqualified
/// ones included, gets a refund entry equal to its bid. Returns `None` when no
/// candidate is eligible.
pub fn resolve(
    env: &Env,
    candidates: &Vec<Preference>,
    disqualified: &Vec<Address>,
) -> Option<Resolution> {
    let ranked = rank(env, candidates);
    let winner = ranked
        .iter()
        .find(|candidate| !disqualified.contains(&candidate.member))?;

    let mut refunds = Vec::new(env);
    for candidate in ranked.iter() {
        if candidate.member == winner.member || candidate.bid_amount <= 0 {
            continue;
        }
        refunds.push_back(Refund {
            member: candidate.member.clone(),
            amount: candidate.bid_amount,
        });
    }

    Some(Resolution { winner, refunds })
}
