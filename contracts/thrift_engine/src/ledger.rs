use soroban_sdk::{contracterror, vec, Address, Env, IntoVal, Symbol, TryFromVal, Val, Vec};

use crate::error::Error;
use crate::storage::Storage;

/// Error codes published by the ledger contract. Only the variants the
/// engine reacts to are mirrored; everything else is an adapter failure.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LedgerError {
    NotInitialized = 2,
    InsufficientBalance = 4,
    InvalidAmount = 5,
    NotOperator = 6,
}

/// Read-modify-write view of member balances and thrift rosters held by the
/// ledger contract. The engine contract acts as a ledger operator.
pub struct Ledger<'a> {
    env: &'a Env,
    address: Address,
}

impl<'a> Ledger<'a> {
    pub fn load(env: &'a Env) -> Result<Self, Error> {
        let address = Storage::get_ledger(env).ok_or(Error::NotInitialized)?;
        Ok(Self { env, address })
    }

    pub fn get_balance(&self, member: &Address) -> Result<i128, Error> {
        self.call("get_balance", vec![self.env, member.to_val()])
    }

    pub fn get_active_members(&self, thrift_id: u64) -> Result<Vec<Address>, Error> {
        self.call("get_active_members", vec![self.env, thrift_id.into_val(self.env)])
    }

    pub fn is_active_member(&self, thrift_id: u64, member: &Address) -> Result<bool, Error> {
        Ok(self.get_active_members(thrift_id)?.contains(member))
    }

    /// Check the balance, then debit. A failed debit leaves the ledger untouched.
    ///
    /// # Errors
    /// - `InsufficientBalance`: balance below `amount`
    /// - `InvalidAmount`: ledger rejected the amount
    /// - `AdapterUnavailable`: any other ledger failure
    pub fn debit(&self, member: &Address, amount: i128) -> Result<(), Error> {
        if self.get_balance(member)? < amount {
            return Err(Error::InsufficientBalance);
        }
        self.call::<()>(
            "debit",
            vec![
                self.env,
                self.env.current_contract_address().to_val(),
                member.to_val(),
                amount.into_val(self.env),
            ],
        )
    }

    fn call<T>(&self, function: &str, args: Vec<Val>) -> Result<T, Error>
    where
        T: TryFromVal<Env, Val>,
    {
        match self.env.try_invoke_contract::<T, LedgerError>(
            &self.address,
            &Symbol::new(self.env, function),
            args,
        ) {
            Ok(Ok(value)) => Ok(value),
            Err(Ok(LedgerError::InsufficientBalance)) => Err(Error::InsufficientBalance),
            Err(Ok(LedgerError::InvalidAmount)) => Err(Error::InvalidAmount),
            _ => Err(Error::AdapterUnavailable),
        }
    }
}
