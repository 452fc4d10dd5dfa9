//! Message structs. Each is plain data plus its field layout.

mod create_partitions;
mod delete_acls;
mod fetch;
mod offset_commit;

pub use create_partitions::CreatePartitionsTopicResult;
pub use delete_acls::DeleteAclsFilter;
pub use fetch::{FetchPartition, FetchableTopic};
pub use offset_commit::{OffsetCommitResponsePartition, OffsetCommitResponseTopic};
