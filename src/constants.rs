// src/constants.rs
//
// Application-wide constants for values fixed by the services or the table schema.

/// Attribute name of the partition key.
///
/// Used in: `infrastructure/dynamo.rs`, `domain/note.rs`
pub const ATTR_USER_ID: &str = "UserId";

/// Attribute name of the numeric sort key.
///
/// Used in: `infrastructure/dynamo.rs`, `domain/note.rs`
pub const ATTR_NOTE_ID: &str = "NoteId";

/// Attribute name of the note text.
pub const ATTR_NOTE: &str = "Note";

/// Attribute set when a note is flagged as incomplete.
pub const ATTR_IS_INCOMPLETE: &str = "Is_Incomplete";

/// Value stored in `Is_Incomplete` when flagging a note.
pub const INCOMPLETE_FLAG: &str = "Yes";

/// Provisioned read and write capacity units for a newly created table.
///
/// Used in: `infrastructure/dynamo.rs`
pub const TABLE_READ_CAPACITY: i64 = 5;
pub const TABLE_WRITE_CAPACITY: i64 = 5;

/// Upper bound for a SigV4 presigned URL lifetime (7 days).
///
/// Used in: `application/bucket_manager.rs`
pub const MAX_PRESIGN_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Maximum number of keys accepted by a single DeleteObjects request.
///
/// Used in: `infrastructure/s3.rs`
pub const DELETE_BATCH_SIZE: usize = 1000;

/// Region that must not be sent as a bucket location constraint.
pub const DEFAULT_S3_REGION: &str = "us-east-1";
