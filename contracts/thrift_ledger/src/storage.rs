use soroban_sdk::{contracttype, Address};

pub const PERSISTENT_TTL_THRESHOLD: u32 = 100;
pub const PERSISTENT_TTL_EXTEND: u32 = 1000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Balance {
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Operators(Address),
    Balance(Address),   // member -> Balance, shared across thrifts
    Roster(u64),        // thrift_id -> Vec<Address>
    Initialized,
}
