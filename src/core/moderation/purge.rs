// Bulk purge validation for the `clean` command.

use thiserror::Error;

/// Discord's bulk-delete limit.
pub const MAX_PURGE_AMOUNT: u8 = 100;

/// Bulk delete rejects messages older than two weeks. Keep a minute of
/// slack so a message does not age out between fetch and delete.
pub const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60 - 60;

/// Messages to purge, split by how they can be deleted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PurgePlan {
    /// Young enough for the bulk-delete endpoint
    pub bulk: Vec<u64>,
    /// Must be deleted one at a time
    pub single: Vec<u64>,
}

/// Split `(message_id, created_at_unix)` pairs into bulk and one-by-one
/// deletions, keeping the input order within each group.
pub fn plan_purge(messages: impl IntoIterator<Item = (u64, i64)>, now_unix: i64) -> PurgePlan {
    let mut plan = PurgePlan::default();
    for (id, created_at) in messages {
        if now_unix - created_at < BULK_DELETE_MAX_AGE_SECS {
            plan.bulk.push(id);
        } else {
            plan.single.push(id);
        }
    }
    plan
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurgeError {
    #[error("Please enter a positive number.")]
    Negative,

    #[error("No messages were deleted.")]
    Nothing,

    #[error("Sorry, I can only purge up to {max} messages at once.")]
    TooMany { max: u8 },
}

/// Check a requested purge size and turn it into a fetch limit.
pub fn validate_purge_amount(amount: i64) -> Result<u8, PurgeError> {
    if amount < 0 {
        return Err(PurgeError::Negative);
    }
    if amount == 0 {
        return Err(PurgeError::Nothing);
    }
    if amount > i64::from(MAX_PURGE_AMOUNT) {
        return Err(PurgeError::TooMany {
            max: MAX_PURGE_AMOUNT,
        });
    }
    Ok(amount as u8)
}
