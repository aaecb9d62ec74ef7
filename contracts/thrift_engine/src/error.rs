use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller is not the thrift admin / payout owner
    Unauthorized = 10,

    // ============================================
    // LOOKUP ERRORS (20-29)
    // ============================================
    /// Unknown thrift, member, preference or payout
    NotFound = 20,

    // ============================================
    // ALLOCATION ERRORS (30-39)
    // ============================================
    /// Position outside [1, max_members]
    InvalidPosition = 30,
    /// Position already has a finalized assignment
    PositionAssigned = 31,
    /// Member already holds an assignment this cycle
    MemberAlreadyAssigned = 32,
    /// Allocation state changed since the caller last read it (retryable)
    ConcurrentModification = 33,

    // ============================================
    // AMOUNT/BALANCE ERRORS (40-49)
    // ============================================
    /// Ledger balance too low for the bid or priority fee
    InsufficientBalance = 40,
    /// Amount negative or arithmetic overflow
    InvalidAmount = 41,

    // ============================================
    // PAYOUT ERRORS (50-59)
    // ============================================
    /// Payout status change not allowed from the current status
    IllegalTransition = 50,
    /// Early payout already granted for this payout
    AlreadyExpedited = 51,

    // ============================================
    // CYCLE ERRORS (60-69)
    // ============================================
    /// Cycle parameters out of range
    InvalidConfig = 60,
    /// Cycle config is read-only once allocation or scheduling began
    CycleLocked = 61,
    /// Current cycle still has open payouts
    CycleInProgress = 62,

    // ============================================
    // OPERATIONAL ERRORS (70-79)
    // ============================================
    /// Contract is paused
    ContractPaused = 70,
    /// Ledger contract failed or returned an unexpected value
    AdapterUnavailable = 71,
}
