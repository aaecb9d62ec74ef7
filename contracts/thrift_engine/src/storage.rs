use soroban_sdk::{contracttype, Address, Env, Vec};

// Constants
pub const MIN_MEMBERS: u32 = 2;
pub const MAX_MEMBERS: u32 = 100;
pub const SECONDS_PER_DAY: u64 = 86_400;

const INSTANCE_TTL_THRESHOLD: u32 = 100;
const INSTANCE_TTL_EXTEND: u32 = 500;
const PERSISTENT_TTL_THRESHOLD: u32 = 100;
const PERSISTENT_TTL_EXTEND: u32 = 1000;

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PayoutFrequency {
    /// Every 7 days
    Weekly = 0,
    /// Every 14 days
    Biweekly = 1,
    /// Same day of the month, clamped to month end
    Monthly = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CycleConfig {
    /// Amount each member pays in per period
    pub contribution_amount: i128,
    /// Number of rotation positions (N)
    pub max_members: u32,
    /// Length of one full rotation in seconds
    pub cycle_duration: u64,
    /// Unix timestamp of the first payout (position 1)
    pub cycle_start_date: u64,
    pub payout_frequency: PayoutFrequency,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Thrift {
    pub id: u64,
    pub admin: Address,
    pub config: CycleConfig,
    /// Fee charged for an early payout
    pub priority_fee: i128,
    /// Current cycle number, starting at 1
    pub cycle: u32,
    /// Bumped on every change to preferences or assignments; wraps, compared for equality only
    pub version: u32,
    pub assigned_count: u32,
    pub schedule_generated: bool,
    pub created_at: u64,
}

impl Thrift {
    /// Config may change only before anything was allocated or scheduled.
    pub fn config_locked(&self) -> bool {
        self.assigned_count > 0 || self.schedule_generated
    }
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PreferenceStatus {
    Requested = 0,
    Outbid = 1,
    Won = 2,
    Withdrawn = 3,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Preference {
    pub member: Address,
    pub thrift_id: u64,
    pub cycle: u32,
    pub desired_position: u32,
    pub bid_amount: i128,
    pub status: PreferenceStatus,
    pub created_at: u64,
    /// Global insertion order, breaks same-timestamp ties
    pub sequence: u64,
}

impl Preference {
    pub fn is_live(&self) -> bool {
        self.status != PreferenceStatus::Withdrawn
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    pub thrift_id: u64,
    pub cycle: u32,
    pub position: u32,
    pub member: Address,
    pub finalized_at: u64,
    /// Amount debited from the winner, 0 when uncontested or admin-assigned
    pub winning_bid: i128,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PayoutStatus {
    Pending = 0,
    Processing = 1,
    Completed = 2,
    Failed = 3,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payout {
    pub id: u64,
    pub thrift_id: u64,
    pub cycle: u32,
    pub member: Address,
    pub position: u32,
    pub amount: i128,
    pub scheduled_date: u64,
    pub status: PayoutStatus,
    pub completed_date: Option<u64>,
    /// Set once, by the early-payout override
    pub priority_fee: Option<i128>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PositionStatus {
    Available,
    /// Top-ranked live request: (member, bid)
    Requested(Address, i128),
    Assigned(Address),
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Ledger,
    Initialized,
    Paused,
    ThriftCounter,
    PayoutCounter,
    PreferenceSequence,
    Thrift(u64),
    Preference(u64, u32, Address),     // (thrift_id, cycle, member) -> Preference
    Preferences(u64, u32),             // (thrift_id, cycle) -> Vec<Address>
    Assignment(u64, u32, u32),         // (thrift_id, cycle, position) -> Assignment
    MemberPosition(u64, u32, Address), // (thrift_id, cycle, member) -> u32
    Payout(u64),                       // payout_id -> Payout
    Payouts(u64, u32),                 // (thrift_id, cycle) -> Vec<u64>
    PositionPayout(u64, u32, u32),     // (thrift_id, cycle, position) -> payout_id
}

pub struct Storage;

impl Storage {
    // Admin / config
    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&DataKey::Initialized)
    }

    pub fn initialize(env: &Env, admin: &Address, ledger: &Address) {
        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, admin);
        env.storage().instance().set(&DataKey::Ledger, ledger);
        env.storage().instance().set(&DataKey::Paused, &false);
        Self::extend_instance_ttl(env);
    }

    pub fn get_admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Admin)
    }

    pub fn get_ledger(env: &Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Ledger)
    }

    pub fn is_paused(env: &Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn set_paused(env: &Env, paused: bool) {
        env.storage().instance().set(&DataKey::Paused, &paused);
    }

    // Counters
    pub fn next_thrift_id(env: &Env) -> u64 {
        Self::bump_counter(env, &DataKey::ThriftCounter)
    }

    pub fn next_payout_id(env: &Env) -> u64 {
        Self::bump_counter(env, &DataKey::PayoutCounter)
    }

    pub fn next_preference_sequence(env: &Env) -> u64 {
        Self::bump_counter(env, &DataKey::PreferenceSequence)
    }

    fn bump_counter(env: &Env, key: &DataKey) -> u64 {
        let next = env.storage().instance().get::<DataKey, u64>(key).unwrap_or(0) + 1;
        env.storage().instance().set(key, &next);
        Self::extend_instance_ttl(env);
        next
    }

    // Thrift
    pub fn get_thrift(env: &Env, thrift_id: u64) -> Option<Thrift> {
        Self::read(env, &DataKey::Thrift(thrift_id))
    }

    pub fn set_thrift(env: &Env, thrift: &Thrift) {
        Self::write(env, &DataKey::Thrift(thrift.id), thrift);
    }

    // Preferences
    pub fn get_preference(env: &Env, thrift_id: u64, cycle: u32, member: &Address) -> Option<Preference> {
        Self::read(env, &DataKey::Preference(thrift_id, cycle, member.clone()))
    }

    pub fn set_preference(env: &Env, preference: &Preference) {
        let key = DataKey::Preference(
            preference.thrift_id,
            preference.cycle,
            preference.member.clone(),
        );
        if !env.storage().persistent().has(&key) {
            let mut members = Self::preference_members(env, preference.thrift_id, preference.cycle);
            members.push_back(preference.member.clone());
            Self::write(env, &DataKey::Preferences(preference.thrift_id, preference.cycle), &members);
        }
        Self::write(env, &key, preference);
    }

    /// Members that recorded a preference this cycle, in first-request order
    pub fn preference_members(env: &Env, thrift_id: u64, cycle: u32) -> Vec<Address> {
        Self::read(env, &DataKey::Preferences(thrift_id, cycle)).unwrap_or(Vec::new(env))
    }

    pub fn list_preferences(env: &Env, thrift_id: u64, cycle: u32) -> Vec<Preference> {
        let mut preferences = Vec::new(env);
        for member in Self::preference_members(env, thrift_id, cycle).iter() {
            if let Some(preference) = Self::get_preference(env, thrift_id, cycle, &member) {
                preferences.push_back(preference);
            }
        }
        preferences
    }

    // Assignments
    pub fn get_assignment(env: &Env, thrift_id: u64, cycle: u32, position: u32) -> Option<Assignment> {
        Self::read(env, &DataKey::Assignment(thrift_id, cycle, position))
    }

    pub fn member_position(env: &Env, thrift_id: u64, cycle: u32, member: &Address) -> Option<u32> {
        Self::read(env, &DataKey::MemberPosition(thrift_id, cycle, member.clone()))
    }

    /// Writes both uniqueness indexes; callers check neither exists first.
    pub fn set_assignment(env: &Env, assignment: &Assignment) {
        Self::write(
            env,
            &DataKey::Assignment(assignment.thrift_id, assignment.cycle, assignment.position),
            assignment,
        );
        Self::write(
            env,
            &DataKey::MemberPosition(
                assignment.thrift_id,
                assignment.cycle,
                assignment.member.clone(),
            ),
            &assignment.position,
        );
    }

    pub fn list_assignments(env: &Env, thrift: &Thrift) -> Vec<Assignment> {
        let mut assignments = Vec::new(env);
        for position in 1..=thrift.config.max_members {
            if let Some(assignment) = Self::get_assignment(env, thrift.id, thrift.cycle, position) {
                assignments.push_back(assignment);
            }
        }
        assignments
    }

    // Payouts
    pub fn get_payout(env: &Env, payout_id: u64) -> Option<Payout> {
        Self::read(env, &DataKey::Payout(payout_id))
    }

    pub fn set_payout(env: &Env, payout: &Payout) {
        Self::write(env, &DataKey::Payout(payout.id), payout);
    }

    pub fn add_payout(env: &Env, payout: &Payout) {
        let key = DataKey::Payouts(payout.thrift_id, payout.cycle);
        let mut ids: Vec<u64> = Self::read(env, &key).unwrap_or(Vec::new(env));
        ids.push_back(payout.id);
        Self::write(env, &key, &ids);
        Self::write(
            env,
            &DataKey::PositionPayout(payout.thrift_id, payout.cycle, payout.position),
            &payout.id,
        );
        Self::set_payout(env, payout);
    }

    pub fn position_payout(env: &Env, thrift_id: u64, cycle: u32, position: u32) -> Option<u64> {
        Self::read(env, &DataKey::PositionPayout(thrift_id, cycle, position))
    }

    pub fn list_payouts(env: &Env, thrift_id: u64, cycle: u32) -> Vec<Payout> {
        let ids: Vec<u64> = Self::read(env, &DataKey::Payouts(thrift_id, cycle)).unwrap_or(Vec::new(env));
        let mut payouts = Vec::new(env);
        for id in ids.iter() {
            if let Some(payout) = Self::get_payout(env, id) {
                payouts.push_back(payout);
            }
        }
        payouts
    }

    // --- TTL Management ---

    fn read<V>(env: &Env, key: &DataKey) -> Option<V>
    where
        V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
    {
        let result = env.storage().persistent().get(key);
        if result.is_some() {
            env.storage()
                .persistent()
                .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
        }
        result
    }

    fn write<V>(env: &Env, key: &DataKey, value: &V)
    where
        V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
    {
        env.storage().persistent().set(key, value);
        env.storage()
            .persistent()
            .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
    }
}
