//! Property tests: decode(encode(x, v), v) == x across every supported version,
//! and unknown tagged entries never disturb known ones.

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use thorwire::protocol::messages::{
    DeleteAclsFilter, FetchPartition, FetchableTopic, OffsetCommitResponsePartition,
    OffsetCommitResponseTopic,
};
use thorwire::protocol::wire::put_unsigned_varint;
use thorwire::{decode, encode};

fn delete_acls_filter() -> impl Strategy<Value = DeleteAclsFilter> {
    (
        any::<i8>(),
        option::of("[a-z0-9._-]{0,24}"),
        any::<i8>(),
        option::of("User:[a-z]{1,8}"),
        option::of("[0-9.]{1,15}"),
        any::<i8>(),
        any::<i8>(),
    )
        .prop_map(
            |(resource_type, name, pattern, principal, host, operation, permission)| {
                DeleteAclsFilter {
                    resource_type_filter: resource_type,
                    resource_name_filter: name,
                    pattern_type_filter: pattern,
                    principal_filter: principal,
                    host_filter: host,
                    operation,
                    permission_type: permission,
                }
            },
        )
}

fn fetch_partition() -> impl Strategy<Value = FetchPartition> {
    (any::<i32>(), any::<i32>(), any::<i64>(), any::<i64>(), any::<i32>()).prop_map(
        |(partition, epoch, offset, log_start, max_bytes)| FetchPartition {
            partition,
            current_leader_epoch: epoch,
            fetch_offset: offset,
            log_start_offset: log_start,
            partition_max_bytes: max_bytes,
        },
    )
}

fn offset_commit_topic() -> impl Strategy<Value = OffsetCommitResponseTopic> {
    (
        "[a-zA-Z0-9._-]{1,64}",
        vec((any::<i32>(), any::<i16>()), 0..16),
    )
        .prop_map(|(topic_name, partitions)| OffsetCommitResponseTopic {
            topic_name,
            partitions: partitions
                .into_iter()
                .map(|(partition_index, error_code)| OffsetCommitResponsePartition {
                    partition_index,
                    error_code,
                })
                .collect(),
        })
}

proptest! {
    #[test]
    fn delete_acls_filter_round_trips(filter in delete_acls_filter(), version in 0i16..=2) {
        let mut filter = filter;
        if version == 0 {
            // v0 has no pattern type on the wire; decode restores the default.
            filter.pattern_type_filter = 3;
        }
        let buf = encode(&filter, version).unwrap();
        prop_assert_eq!(decode::<DeleteAclsFilter>(&buf, version).unwrap(), filter);
    }

    #[test]
    fn fetchable_topic_round_trips(
        topic_name in "[a-z]{1,32}",
        partitions in vec(fetch_partition(), 0..8),
        version in 0i16..=11,
    ) {
        let fetch_partitions = partitions
            .into_iter()
            .map(|mut p| {
                if version < 9 {
                    p.current_leader_epoch = -1;
                }
                if version < 5 {
                    p.log_start_offset = -1;
                }
                p
            })
            .collect();
        let topic = FetchableTopic { topic_name, fetch_partitions };
        let buf = encode(&topic, version).unwrap();
        prop_assert_eq!(decode::<FetchableTopic>(&buf, version).unwrap(), topic);
    }

    #[test]
    fn offset_commit_topic_round_trips(topic in offset_commit_topic(), version in 0i16..=8) {
        let buf = encode(&topic, version).unwrap();
        prop_assert_eq!(decode::<OffsetCommitResponseTopic>(&buf, version).unwrap(), topic);
    }

    #[test]
    fn unknown_tags_in_trailer_are_skipped(
        topic in offset_commit_topic(),
        unknown in vec((1u32..10_000, vec(any::<u8>(), 0..64)), 1..4),
    ) {
        let encoded = encode(&topic, 8).unwrap();
        // Replace the empty topic trailer with unknown entries.
        let body = &encoded[..encoded.len() - 1];
        let mut buf = bytes::BytesMut::from(body);
        put_unsigned_varint(&mut buf, unknown.len() as u32);
        for (tag, payload) in &unknown {
            put_unsigned_varint(&mut buf, *tag);
            put_unsigned_varint(&mut buf, payload.len() as u32);
            buf.extend_from_slice(payload);
        }
        prop_assert_eq!(decode::<OffsetCommitResponseTopic>(&buf, 8).unwrap(), topic);
    }
}
