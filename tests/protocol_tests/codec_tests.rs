//! Codec Tests
//!
//! Tests for command encoding and reply decoding.

use bytes::BytesMut;
use cachette::protocol::{
    decode_reply, encode_command, encode_reply, Command, Reply, MAX_NESTING_DEPTH,
    MAX_PAYLOAD_SIZE,
};
use cachette::CacheError;

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_get() {
    let encoded = encode_command(&Command::Get {
        key: "some:key".to_string(),
    });

    assert_eq!(&encoded[..], b"*2\r\n$3\r\nGET\r\n$8\r\nsome:key\r\n");
}

#[test]
fn test_encode_setex() {
    let encoded = encode_command(&Command::SetEx {
        key: "k".to_string(),
        seconds: 2,
        value: "some value".to_string(),
    });

    assert_eq!(
        &encoded[..],
        b"*4\r\n$5\r\nSETEX\r\n$1\r\nk\r\n$1\r\n2\r\n$10\r\nsome value\r\n"
    );
}

#[test]
fn test_encode_incrby_negative() {
    let encoded = encode_command(&Command::IncrBy {
        key: "n".to_string(),
        by: -15,
    });

    assert_eq!(
        &encoded[..],
        b"*3\r\n$6\r\nINCRBY\r\n$1\r\nn\r\n$3\r\n-15\r\n"
    );
}

#[test]
fn test_encode_flushall() {
    assert_eq!(
        &encode_command(&Command::FlushAll)[..],
        b"*1\r\n$8\r\nFLUSHALL\r\n"
    );
}

#[test]
fn test_encode_value_with_crlf_is_length_prefixed() {
    let encoded = encode_command(&Command::Set {
        key: "k".to_string(),
        value: "a\r\nb".to_string(),
    });

    assert_eq!(
        &encoded[..],
        b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$4\r\na\r\nb\r\n"
    );
}

#[test]
fn test_command_names() {
    let commands = [
        (Command::Decr { key: "k".into() }, "DECR"),
        (Command::DecrBy { key: "k".into(), by: 2 }, "DECRBY"),
        (Command::Del { key: "k".into() }, "DEL"),
        (Command::Incr { key: "k".into() }, "INCR"),
    ];

    for (command, name) in commands {
        assert_eq!(command.name(), name);
        assert_eq!(command.args()[0], name.as_bytes());
    }
}

// =============================================================================
// Reply Decoding Tests
// =============================================================================

fn decode_all(bytes: &[u8]) -> Reply {
    let mut buffer = BytesMut::from(bytes);
    let reply = decode_reply(&mut buffer).unwrap().expect("complete reply");
    assert!(buffer.is_empty(), "reply should consume the whole buffer");
    reply
}

#[test]
fn test_decode_simple() {
    assert_eq!(decode_all(b"+OK\r\n"), Reply::Simple("OK".to_string()));
}

#[test]
fn test_decode_error() {
    assert_eq!(
        decode_all(b"-ERR value is not an integer or out of range\r\n"),
        Reply::Error("ERR value is not an integer or out of range".to_string())
    );
}

#[test]
fn test_decode_integer() {
    assert_eq!(decode_all(b":-109\r\n"), Reply::Integer(-109));
}

#[test]
fn test_decode_bulk() {
    assert_eq!(
        decode_all(b"$10\r\nsome value\r\n"),
        Reply::Bulk(Some(b"some value".to_vec()))
    );
}

#[test]
fn test_decode_empty_and_null_bulk() {
    assert_eq!(decode_all(b"$0\r\n\r\n"), Reply::Bulk(Some(vec![])));
    assert_eq!(decode_all(b"$-1\r\n"), Reply::Bulk(None));
}

#[test]
fn test_decode_bulk_containing_crlf() {
    assert_eq!(
        decode_all(b"$4\r\na\r\nb\r\n"),
        Reply::Bulk(Some(b"a\r\nb".to_vec()))
    );
}

#[test]
fn test_decode_nested_array() {
    assert_eq!(
        decode_all(b"*3\r\n:1\r\n$3\r\nfoo\r\n*1\r\n+OK\r\n"),
        Reply::Array(Some(vec![
            Reply::Integer(1),
            Reply::Bulk(Some(b"foo".to_vec())),
            Reply::Array(Some(vec![Reply::Simple("OK".to_string())])),
        ]))
    );
    assert_eq!(decode_all(b"*-1\r\n"), Reply::Array(None));
}

// =============================================================================
// Incremental Decoding Tests
// =============================================================================

#[test]
fn test_incomplete_reply_consumes_nothing() {
    for partial in [
        &b""[..],
        &b"+OK"[..],
        &b"$10\r\nsome"[..],
        &b"$10\r\nsome value"[..],
        &b"*2\r\n:1\r\n"[..],
    ] {
        let mut buffer = BytesMut::from(partial);
        assert_eq!(decode_reply(&mut buffer).unwrap(), None);
        assert_eq!(&buffer[..], partial);
    }
}

#[test]
fn test_byte_by_byte_feed() {
    let wire = b"$10\r\nsome value\r\n";
    let mut buffer = BytesMut::new();

    for (i, byte) in wire.iter().enumerate() {
        buffer.extend_from_slice(&[*byte]);
        let decoded = decode_reply(&mut buffer).unwrap();

        if i + 1 < wire.len() {
            assert_eq!(decoded, None);
        } else {
            assert_eq!(decoded, Some(Reply::Bulk(Some(b"some value".to_vec()))));
        }
    }
}

#[test]
fn test_pipelined_replies_decode_in_order() {
    let mut buffer = BytesMut::from(&b"+OK\r\n:5\r\n$-1\r\n"[..]);

    assert_eq!(
        decode_reply(&mut buffer).unwrap(),
        Some(Reply::Simple("OK".to_string()))
    );
    assert_eq!(decode_reply(&mut buffer).unwrap(), Some(Reply::Integer(5)));
    assert_eq!(decode_reply(&mut buffer).unwrap(), Some(Reply::Bulk(None)));
    assert_eq!(decode_reply(&mut buffer).unwrap(), None);
}

// =============================================================================
// Malformed Reply Tests
// =============================================================================

#[test]
fn test_unknown_reply_type() {
    let mut buffer = BytesMut::from(&b"?what\r\n"[..]);
    assert!(matches!(
        decode_reply(&mut buffer),
        Err(CacheError::Protocol(_))
    ));
}

#[test]
fn test_invalid_integer() {
    let mut buffer = BytesMut::from(&b":12a\r\n"[..]);
    assert!(matches!(
        decode_reply(&mut buffer),
        Err(CacheError::Protocol(_))
    ));
}

#[test]
fn test_bulk_without_terminator() {
    let mut buffer = BytesMut::from(&b"$3\r\nfooXY"[..]);
    assert!(matches!(
        decode_reply(&mut buffer),
        Err(CacheError::Protocol(_))
    ));
}

#[test]
fn test_negative_bulk_length() {
    let mut buffer = BytesMut::from(&b"$-5\r\n"[..]);
    assert!(matches!(
        decode_reply(&mut buffer),
        Err(CacheError::Protocol(_))
    ));
}

#[test]
fn test_oversized_bulk_rejected() {
    let header = format!("${}\r\n", MAX_PAYLOAD_SIZE + 1);
    let mut buffer = BytesMut::from(header.as_bytes());
    assert!(matches!(
        decode_reply(&mut buffer),
        Err(CacheError::Protocol(_))
    ));
}

#[test]
fn test_deeply_nested_array_rejected() {
    let mut buffer = BytesMut::from("*1\r\n".repeat(10_000).as_bytes());
    assert!(matches!(
        decode_reply(&mut buffer),
        Err(CacheError::Protocol(_))
    ));
}

#[test]
fn test_nesting_up_to_limit_decodes() {
    let mut bytes = "*1\r\n".repeat(MAX_NESTING_DEPTH);
    bytes.push_str(":7\r\n");
    let mut buffer = BytesMut::from(bytes.as_bytes());

    let mut reply = decode_reply(&mut buffer).unwrap().unwrap();
    for _ in 0..MAX_NESTING_DEPTH {
        reply = match reply {
            Reply::Array(Some(mut items)) => items.remove(0),
            other => panic!("Expected array, got {:?}", other),
        };
    }
    assert_eq!(reply, Reply::Integer(7));
    assert!(buffer.is_empty());
}

// =============================================================================
// Reply Encoding / Conversion Tests
// =============================================================================

#[test]
fn test_encode_reply_matches_wire_format() {
    assert_eq!(&encode_reply(&Reply::Integer(42))[..], b":42\r\n");
    assert_eq!(&encode_reply(&Reply::Bulk(None))[..], b"$-1\r\n");
    assert_eq!(
        &encode_reply(&Reply::Array(Some(vec![Reply::Simple("OK".into())])))[..],
        b"*1\r\n+OK\r\n"
    );
}

#[test]
fn test_reply_conversions() {
    assert_eq!(Reply::Integer(3).into_integer().unwrap(), 3);
    assert_eq!(
        Reply::Bulk(Some(b"v".to_vec())).into_string().unwrap(),
        Some("v".to_string())
    );
    assert_eq!(Reply::Bulk(None).into_string().unwrap(), None);
    assert_eq!(Reply::Simple("OK".into()).into_status().unwrap(), "OK");

    assert!(matches!(
        Reply::Error("ERR boom".into()).into_integer(),
        Err(CacheError::Remote(message)) if message == "ERR boom"
    ));
    assert!(matches!(
        Reply::Simple("OK".into()).into_integer(),
        Err(CacheError::Protocol(_))
    ));
}
