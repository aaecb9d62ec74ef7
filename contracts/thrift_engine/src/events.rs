use soroban_sdk::{contracttype, Address};

use crate::storage::{PayoutFrequency, PayoutStatus};

#[contracttype]
#[derive(Clone, Debug)]
pub struct ThriftCreatedEvent {
    pub thrift_id: u64,
    pub admin: Address,
    pub contribution_amount: i128,
    pub max_members: u32,
    pub cycle_start_date: u64,
    pub payout_frequency: PayoutFrequency,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CycleStartedEvent {
    pub thrift_id: u64,
    pub cycle: u32,
    pub cycle_start_date: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PreferenceSetEvent {
    pub thrift_id: u64,
    pub member: Address,
    pub desired_position: u32,
    pub bid_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PreferenceWithdrawnEvent {
    pub thrift_id: u64,
    pub member: Address,
    pub desired_position: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PositionAssignedEvent {
    pub thrift_id: u64,
    pub cycle: u32,
    pub position: u32,
    pub member: Address,
    pub winning_bid: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BidReleasedEvent {
    pub thrift_id: u64,
    pub position: u32,
    pub member: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BidderSkippedEvent {
    pub thrift_id: u64,
    pub position: u32,
    pub member: Address,
    pub bid_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PayoutScheduledEvent {
    pub payout_id: u64,
    pub thrift_id: u64,
    pub member: Address,
    pub position: u32,
    pub amount: i128,
    pub scheduled_date: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PayoutStatusEvent {
    pub payout_id: u64,
    pub from: PayoutStatus,
    pub to: PayoutStatus,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PayoutExpeditedEvent {
    pub payout_id: u64,
    pub member: Address,
    pub priority_fee: i128,
    pub previous_date: u64,
    pub scheduled_date: u64,
}
