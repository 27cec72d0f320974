#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for the wire codecs
//! Fixed byte strings, boundary conditions and every rejection path

use chrono::Datelike;
use quic_wire::core::public_header::{PacketNumberLen, PublicHeader};
use quic_wire::error::ProtocolError;
use quic_wire::protocol::message::HandshakeMessage;
use quic_wire::protocol::server_config::ServerConfig;
use quic_wire::protocol::tag::Tag;
use quic_wire::protocol::version::Version;
use quic_wire::ConnectionId;
use std::collections::BTreeMap;

const CONNECTION_ID: ConnectionId = ConnectionId(0x4cfa9f9b668619f6);

// ============================================================================
// PUBLIC HEADER
// ============================================================================

#[test]
fn test_decode_client_header_with_version() {
    let bytes = [
        0x09, 0xf6, 0x19, 0x86, 0x66, 0x9b, 0x9f, 0xfa, 0x4c, 0x51, 0x30, 0x33, 0x34, 0x01,
    ];
    let mut cursor = &bytes[..];
    let header = PublicHeader::parse(&mut cursor).expect("Header should decode");

    assert!(header.version_flag);
    assert!(!header.reset_flag);
    assert_eq!(header.connection_id, CONNECTION_ID);
    assert_eq!(header.version_number, Some(Version::Q034));
    assert_eq!(header.packet_number, 1);
    assert_eq!(header.packet_number_len, Some(PacketNumberLen::One));
    assert!(cursor.is_empty(), "Entire input should be consumed");
}

#[test]
fn test_write_truncated_connection_id() {
    let header = PublicHeader {
        connection_id: CONNECTION_ID,
        truncate_connection_id: true,
        packet_number: 1,
        packet_number_len: Some(PacketNumberLen::Six),
        ..Default::default()
    };
    let bytes = header.to_bytes(Version::UNSPECIFIED).unwrap();
    assert_eq!(bytes, [0x30, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn test_write_four_byte_packet_number() {
    let header = PublicHeader {
        connection_id: CONNECTION_ID,
        packet_number: 0xDECAFBAD,
        packet_number_len: Some(PacketNumberLen::Four),
        ..Default::default()
    };
    let bytes = header.to_bytes(Version::UNSPECIFIED).unwrap();
    assert_eq!(bytes.len(), 1 + 8 + 4);
    assert_eq!(bytes[1..9], CONNECTION_ID.to_bytes());
    assert_eq!(bytes[9..], [0xAD, 0xFB, 0xCA, 0xDE]);
}

#[test]
fn test_zero_connection_id_rejected() {
    let mut bytes = vec![0x08];
    bytes.extend([0u8; 8]);
    bytes.push(0x01);
    assert!(matches!(
        PublicHeader::from_bytes(&bytes),
        Err(ProtocolError::InvalidConnectionId)
    ));
}

#[test]
fn test_missing_connection_id_rejected() {
    assert!(matches!(
        PublicHeader::from_bytes(&[0x00, 0x01]),
        Err(ProtocolError::TruncatedConnectionId)
    ));
}

#[test]
fn test_every_truncation_is_eof() {
    let bytes = [
        0x09, 0xf6, 0x19, 0x86, 0x66, 0x9b, 0x9f, 0xfa, 0x4c, 0x51, 0x30, 0x33, 0x34, 0x01,
    ];
    for cut in 0..bytes.len() {
        assert!(
            matches!(PublicHeader::from_bytes(&bytes[..cut]), Err(ProtocolError::UnexpectedEof)),
            "Cut at {cut} should be EOF"
        );
    }
}

#[test]
fn test_malformed_version_tag() {
    let mut bytes = vec![0x09];
    bytes.extend(CONNECTION_ID.to_bytes());
    bytes.extend(b"QUIC");
    bytes.push(0x01);
    assert!(matches!(
        PublicHeader::from_bytes(&bytes),
        Err(ProtocolError::InvalidVersionTag(tag)) if &tag == b"QUIC"
    ));
}

#[test]
fn test_reset_and_version_flags_conflict() {
    let header = PublicHeader {
        version_flag: true,
        reset_flag: true,
        connection_id: CONNECTION_ID,
        packet_number_len: Some(PacketNumberLen::One),
        ..Default::default()
    };
    let mut sink = Vec::new();
    assert!(matches!(
        header.write(&mut sink, Version::Q036),
        Err(ProtocolError::ResetAndVersionFlagSet)
    ));
    assert!(sink.is_empty(), "Nothing is written on error");

    let mut bytes = vec![0x0b];
    bytes.extend(CONNECTION_ID.to_bytes());
    assert!(matches!(
        PublicHeader::from_bytes(&bytes),
        Err(ProtocolError::ResetAndVersionFlagSet)
    ));
}

#[test]
fn test_public_reset_header() {
    let header = PublicHeader {
        reset_flag: true,
        connection_id: CONNECTION_ID,
        ..Default::default()
    };
    let bytes = header.to_bytes(Version::Q035).unwrap();
    assert_eq!(bytes[0], 0x0a);
    assert_eq!(bytes.len(), 1 + 8);
    assert_eq!(PublicHeader::from_bytes(&bytes).unwrap(), header);
}

#[test]
fn test_packet_number_length_required() {
    let header = PublicHeader {
        connection_id: CONNECTION_ID,
        ..Default::default()
    };
    assert!(matches!(
        header.to_bytes(Version::Q036),
        Err(ProtocolError::PacketNumberLenNotSet)
    ));
    assert!(matches!(header.length(), Err(ProtocolError::PacketNumberLenNotSet)));
}

#[test]
fn test_header_length() {
    let header = PublicHeader {
        connection_id: CONNECTION_ID,
        packet_number_len: Some(PacketNumberLen::Two),
        diversification_nonce: Some([1; 32]),
        ..Default::default()
    };
    assert_eq!(header.length().unwrap(), 1 + 8 + 32 + 2);
    assert_eq!(header.to_bytes(Version::Q036).unwrap().len(), header.length().unwrap());

    let version = PublicHeader {
        version_flag: true,
        ..header
    };
    assert!(matches!(
        version.length(),
        Err(ProtocolError::LengthOnlyForRegularPackets)
    ));
}

#[test]
fn test_trailing_payload_left_in_buffer() {
    let header = PublicHeader {
        connection_id: CONNECTION_ID,
        packet_number: 7,
        packet_number_len: Some(PacketNumberLen::Two),
        ..Default::default()
    };
    let mut packet = header.to_bytes(Version::Q036).unwrap();
    packet.extend(b"payload");

    let mut cursor = &packet[..];
    assert_eq!(PublicHeader::parse(&mut cursor).unwrap(), header);
    assert_eq!(cursor, b"payload");
    assert!(matches!(
        PublicHeader::from_bytes(&packet),
        Err(ProtocolError::TrailingBytes(7))
    ));
}

// ============================================================================
// HANDSHAKE MESSAGE
// ============================================================================

#[test]
fn test_empty_message_layout() {
    let bytes = HandshakeMessage::new(Tag::SHLO).to_bytes().unwrap();
    assert_eq!(bytes, [b'S', b'H', b'L', b'O', 0, 0, 0, 0]);
    assert!(HandshakeMessage::from_bytes(&bytes).unwrap().is_empty());
}

#[test]
fn test_decreasing_offsets_rejected() {
    let mut bytes = b"CHLO".to_vec();
    bytes.extend([2, 0, 0, 0]);
    bytes.extend(b"PDMD");
    bytes.extend(4u32.to_le_bytes());
    bytes.extend(b"SNI\0");
    bytes.extend(2u32.to_le_bytes());
    bytes.extend(b"X509");
    assert!(matches!(
        HandshakeMessage::from_bytes(&bytes),
        Err(ProtocolError::MalformedMessage(_))
    ));
}

#[test]
fn test_duplicate_tag_rejected() {
    let mut bytes = b"CHLO".to_vec();
    bytes.extend([2, 0, 0, 0]);
    bytes.extend(b"PDMD");
    bytes.extend(1u32.to_le_bytes());
    bytes.extend(b"PDMD");
    bytes.extend(2u32.to_le_bytes());
    bytes.extend(b"ab");
    assert!(matches!(
        HandshakeMessage::from_bytes(&bytes),
        Err(ProtocolError::DuplicateTag(tag)) if tag == Tag::PDMD
    ));
}

#[test]
fn test_value_past_end_is_eof() {
    let mut msg = HandshakeMessage::new(Tag::CHLO);
    msg.insert(Tag::NONC, vec![9; 32]);
    let bytes = msg.to_bytes().unwrap();
    assert!(matches!(
        HandshakeMessage::from_bytes(&bytes[..bytes.len() - 1]),
        Err(ProtocolError::UnexpectedEof)
    ));
}

// ============================================================================
// SERVER CONFIG
// ============================================================================

fn tag_map() -> BTreeMap<Tag, Vec<u8>> {
    BTreeMap::from([
        (Tag::SCID, vec![b'F'; 16]),
        (Tag::KEXS, b"C255".to_vec()),
        (Tag::AEAD, b"AESG".to_vec()),
        (Tag::PUBS, vec![0; 35]),
        (Tag::OBIT, vec![0; 8]),
        (Tag::EXPY, vec![0xdc, 0x89, 0x0e, 0x59, 0x00, 0x00, 0x00, 0x00]),
    ])
}

#[test]
fn test_server_config_expiry_date() {
    let config = ServerConfig::from_tag_map(&tag_map()).expect("Config should validate");
    let expiry = config.expiry();
    assert_eq!((expiry.year(), expiry.month(), expiry.day()), (2017, 5, 7));
    assert!(config.is_expired());
}

#[test]
fn test_server_config_unsupported_key_exchange() {
    let mut data = tag_map();
    data.insert(Tag::KEXS, b"P256".to_vec());
    let err = ServerConfig::from_tag_map(&data).unwrap_err();
    assert!(matches!(err, ProtocolError::NoSupport(tag) if tag == Tag::KEXS));
    assert_eq!(err.to_string(), "CryptoNoSupport: KEXS");
}

#[test]
fn test_server_config_missing_aead() {
    let mut data = tag_map();
    data.remove(&Tag::AEAD);
    let err = ServerConfig::from_tag_map(&data).unwrap_err();
    assert!(matches!(err, ProtocolError::ParameterNotFound(tag) if tag == Tag::AEAD));
    assert_eq!(err.to_string(), "CryptoMessageParameterNotFound: AEAD");
}

#[test]
fn test_server_config_long_id() {
    let mut data = tag_map();
    data.insert(Tag::SCID, vec![b'F'; 17]);
    let err = ServerConfig::from_tag_map(&data).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidValueLength(tag) if tag == Tag::SCID));
    assert_eq!(err.to_string(), "CryptoInvalidValueLength: SCID");
}

#[test]
fn test_server_config_wrong_message_tag() {
    let msg = HandshakeMessage::with_data(Tag::SHLO, tag_map());
    let bytes = msg.to_bytes().unwrap();
    assert!(matches!(
        ServerConfig::parse(&bytes),
        Err(ProtocolError::MessageNotServerConfig)
    ));
}

#[test]
fn test_server_config_far_future_expiry_clamps() {
    let mut data = tag_map();
    data.insert(Tag::EXPY, u64::MAX.to_le_bytes().to_vec());
    let config = ServerConfig::from_tag_map(&data).unwrap();
    assert!(!config.is_expired());
}
