#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{CreditEvent, DebitEvent, RosterEvent};
use storage::{Balance, DataKey, PERSISTENT_TTL_EXTEND, PERSISTENT_TTL_THRESHOLD};

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol, Vec};

/// Member balances and thrift rosters.
///
/// Balances are global per member; rosters are scoped per thrift. Only
/// registered operators (the engine contract) may move balances.
#[contract]
pub struct ThriftLedger;

#[contractimpl]
impl ThriftLedger {
    /// Initialize the ledger contract
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);

        Ok(())
    }

    /// Add an operator (the engine contract)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn add_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        env.storage()
            .instance()
            .set(&DataKey::Operators(operator), &true);

        Ok(())
    }

    /// Remove an operator
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn remove_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        env.storage()
            .instance()
            .remove(&DataKey::Operators(operator));

        Ok(())
    }

    // ============================================
    // BALANCES
    // ============================================

    /// Credit a member's balance (operators only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    /// - `InvalidAmount`: Amount <= 0 or balance overflow
    pub fn credit(env: Env, operator: Address, member: Address, amount: i128) -> Result<(), Error> {
        Self::check_operator(&env, &operator)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let current = Self::read_balance(&env, &member);
        let new_balance = current.checked_add(amount).ok_or(Error::InvalidAmount)?;
        Self::write_balance(&env, &member, new_balance);

        env.events().publish(
            (Symbol::new(&env, "credit"), member.clone()),
            CreditEvent {
                operator,
                member,
                amount,
                balance: new_balance,
            },
        );

        Ok(())
    }

    /// Debit a member's balance (operators only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotOperator`: Caller is not a registered operator
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn debit(env: Env, operator: Address, member: Address, amount: i128) -> Result<(), Error> {
        Self::check_operator(&env, &operator)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let current = Self::read_balance(&env, &member);
        if current < amount {
            return Err(Error::InsufficientBalance);
        }

        let new_balance = current - amount;
        Self::write_balance(&env, &member, new_balance);

        env.events().publish(
            (Symbol::new(&env, "debit"), member.clone()),
            DebitEvent {
                operator,
                member,
                amount,
                balance: new_balance,
            },
        );

        Ok(())
    }

    /// Get a member's balance
    pub fn get_balance(env: Env, member: Address) -> i128 {
        Self::read_balance(&env, &member)
    }

    // ============================================
    // ROSTER
    // ============================================

    /// Add a member to a thrift's active roster (admin only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `AlreadyMember`: Member already on the roster
    pub fn add_member(env: Env, thrift_id: u64, member: Address) -> Result<(), Error> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        let mut roster = Self::read_roster(&env, thrift_id);
        if roster.contains(&member) {
            return Err(Error::AlreadyMember);
        }
        roster.push_back(member.clone());
        Self::write_roster(&env, thrift_id, &roster);

        env.events().publish(
            (Symbol::new(&env, "member_added"), thrift_id),
            RosterEvent {
                thrift_id,
                member,
                active_members: roster.len(),
            },
        );

        Ok(())
    }

    /// Remove a member from a thrift's active roster (admin only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotMember`: Member is not on the roster
    pub fn remove_member(env: Env, thrift_id: u64, member: Address) -> Result<(), Error> {
        let admin = Self::admin(&env)?;
        admin.require_auth();

        let mut roster = Self::read_roster(&env, thrift_id);
        let index = roster.first_index_of(&member).ok_or(Error::NotMember)?;
        roster.remove(index);
        Self::write_roster(&env, thrift_id, &roster);

        env.events().publish(
            (Symbol::new(&env, "member_removed"), thrift_id),
            RosterEvent {
                thrift_id,
                member,
                active_members: roster.len(),
            },
        );

        Ok(())
    }

    /// Active members of a thrift, in join order
    pub fn get_active_members(env: Env, thrift_id: u64) -> Vec<Address> {
        Self::read_roster(&env, thrift_id)
    }

    /// Check if address is on a thrift's roster
    pub fn is_member(env: Env, thrift_id: u64, member: Address) -> bool {
        Self::read_roster(&env, thrift_id).contains(&member)
    }

    /// Check if address is an operator
    pub fn is_operator(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Operators(address))
            .unwrap_or(false)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    fn check_operator(env: &Env, operator: &Address) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        operator.require_auth();

        if !Self::is_operator(env.clone(), operator.clone()) {
            return Err(Error::NotOperator);
        }
        Ok(())
    }

    fn read_balance(env: &Env, member: &Address) -> i128 {
        env.storage()
            .persistent()
            .get::<DataKey, Balance>(&DataKey::Balance(member.clone()))
            .unwrap_or(Balance { amount: 0 })
            .amount
    }

    fn write_balance(env: &Env, member: &Address, amount: i128) {
        let key = DataKey::Balance(member.clone());
        if amount == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &Balance { amount });
            env.storage().persistent().extend_ttl(
                &key,
                PERSISTENT_TTL_THRESHOLD,
                PERSISTENT_TTL_EXTEND,
            );
        }
    }

    fn read_roster(env: &Env, thrift_id: u64) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::Roster(thrift_id))
            .unwrap_or(Vec::new(env))
    }

    fn write_roster(env: &Env, thrift_id: u64, roster: &Vec<Address>) {
        let key = DataKey::Roster(thrift_id);
        env.storage().persistent().set(&key, roster);
        env.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Address, Env};

    fn setup() -> (Env, ThriftLedgerClient<'static>, Address) {
        let env = Env::default();
        env.mock_all_auths();

        let contract_id = env.register(ThriftLedger, ());
        let client = ThriftLedgerClient::new(&env, &contract_id);

        let admin = Address::generate(&env);
        client.initialize(&admin);

        let operator = Address::generate(&env);
        client.add_operator(&operator);

        (env, client, operator)
    }

    #[test]
    fn test_initialize() {
        let env = Env::default();
        env.mock_all_auths();
        let contract_id = env.register(ThriftLedger, ());
        let client = ThriftLedgerClient::new(&env, &contract_id);

        let admin = Address::generate(&env);
        client.initialize(&admin);

        let result = client.try_initialize(&admin);
        assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
    }

    #[test]
    fn test_credit_and_debit() {
        let (env, client, operator) = setup();
        let member = Address::generate(&env);

        client.credit(&operator, &member, &1_000);
        assert_eq!(client.get_balance(&member), 1_000);

        client.debit(&operator, &member, &400);
        assert_eq!(client.get_balance(&member), 600);

        client.debit(&operator, &member, &600);
        assert_eq!(client.get_balance(&member), 0);
    }

    #[test]
    fn test_insufficient_balance_error() {
        let (env, client, operator) = setup();
        let member = Address::generate(&env);

        client.credit(&operator, &member, &100);

        let result = client.try_debit(&operator, &member, &150);
        assert_eq!(result, Err(Ok(Error::InsufficientBalance)));
        assert_eq!(client.get_balance(&member), 100);
    }

    #[test]
    fn test_non_operator_rejected() {
        let (env, client, _operator) = setup();
        let stranger = Address::generate(&env);
        let member = Address::generate(&env);

        let result = client.try_credit(&stranger, &member, &100);
        assert_eq!(result, Err(Ok(Error::NotOperator)));
    }

    #[test]
    fn test_invalid_amount() {
        let (env, client, operator) = setup();
        let member = Address::generate(&env);

        assert_eq!(
            client.try_credit(&operator, &member, &0),
            Err(Ok(Error::InvalidAmount))
        );
        assert_eq!(
            client.try_debit(&operator, &member, &-5),
            Err(Ok(Error::InvalidAmount))
        );
    }

    #[test]
    fn test_roster() {
        let (env, client, _operator) = setup();
        let alice = Address::generate(&env);
        let bob = Address::generate(&env);

        client.add_member(&7, &alice);
        client.add_member(&7, &bob);
        assert_eq!(client.get_active_members(&7).len(), 2);
        assert!(client.is_member(&7, &alice));
        assert!(!client.is_member(&8, &alice));

        assert_eq!(
            client.try_add_member(&7, &alice),
            Err(Ok(Error::AlreadyMember))
        );

        client.remove_member(&7, &alice);
        let roster = client.get_active_members(&7);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(0).unwrap(), bob);

        assert_eq!(
            client.try_remove_member(&7, &alice),
            Err(Ok(Error::NotMember))
        );
    }

    #[test]
    fn test_removed_operator_loses_access() {
        let (env, client, operator) = setup();
        let member = Address::generate(&env);

        client.credit(&operator, &member, &10);
        client.remove_operator(&operator);
        assert!(!client.is_operator(&operator));

        let result = client.try_debit(&operator, &member, &10);
        assert_eq!(result, Err(Ok(Error::NotOperator)));
    }
}
