use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreditEvent {
    pub operator: Address,
    pub member: Address,
    pub amount: i128,
    pub balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebitEvent {
    pub operator: Address,
    pub member: Address,
    pub amount: i128,
    pub balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RosterEvent {
    pub thrift_id: u64,
    pub member: Address,
    pub active_members: u32,
}
