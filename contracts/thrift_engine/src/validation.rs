use crate::error::Error;
use crate::storage::{CycleConfig, Storage, Thrift, MAX_MEMBERS, MIN_MEMBERS};
use soroban_sdk::{Address, Env};

pub struct Validator;

impl Validator {
    pub fn validate_cycle_config(config: &CycleConfig) -> Result<(), Error> {
        if config.contribution_amount <= 0 {
            return Err(Error::InvalidConfig);
        }

        if config.max_members < MIN_MEMBERS || config.max_members > MAX_MEMBERS {
            return Err(Error::InvalidConfig);
        }

        if config.cycle_duration == 0 {
            return Err(Error::InvalidConfig);
        }

        Ok(())
    }

    pub fn validate_amount(amount: i128) -> Result<(), Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        Ok(())
    }

    pub fn validate_position(thrift: &Thrift, position: u32) -> Result<(), Error> {
        if position < 1 || position > thrift.config.max_members {
            return Err(Error::InvalidPosition);
        }
        Ok(())
    }

    /// Position must still be open and the member must not hold another one.
    pub fn validate_open_slot(
        env: &Env,
        thrift: &Thrift,
        position: u32,
        member: &Address,
    ) -> Result<(), Error> {
        Self::validate_position(thrift, position)?;

        if Storage::get_assignment(env, thrift.id, thrift.cycle, position).is_some() {
            return Err(Error::PositionAssigned);
        }

        if Storage::member_position(env, thrift.id, thrift.cycle, member).is_some() {
            return Err(Error::MemberAlreadyAssigned);
        }

        Ok(())
    }

    pub fn check_not_paused(env: &Env) -> Result<(), Error> {
        if !Storage::is_initialized(env) {
            return Err(Error::NotInitialized);
        }

        if Storage::is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    /// Loads the thrift and requires its admin's authorization
    pub fn require_thrift_admin(env: &Env, admin: &Address, thrift_id: u64) -> Result<Thrift, Error> {
        admin.require_auth();

        let thrift = Storage::get_thrift(env, thrift_id).ok_or(Error::NotFound)?;
        if admin != &thrift.admin {
            return Err(Error::Unauthorized);
        }
        Ok(thrift)
    }
}
