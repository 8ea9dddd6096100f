//! Codec properties checked against small fixture schemas.

use nvcfg::model::builder::*;
use nvcfg::model::{FieldSpec, Names, Node, Width};
use nvcfg::{Context, Error, ErrorCode, Format, Group, Layout, Magic, Registry, Version};

// =============================================================================
// FIXTURES
// =============================================================================

fn station(_ctx: &Context) -> Vec<FieldSpec> {
    vec![field("mac", mac()), field("rssi", i8())]
}

fn fixture(ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("level", u8_range(0, 255)),
        field("flags", bitmask(Width::W8, Names::Map(&[(0x01, "a"), (0x02, "b")]))),
        field("macs", array_until(mac(), 4, Node::is_blank)),
        field("names", p8list(p8string())),
        reserved(data(2)),
        field("extra", u16()).when(ctx.version >= Version::from_num(0x0002)),
        field("stations", p16list(compound("station", station))),
        field("label", zstring(8)),
    ]
}

fn fixture_group() -> Group {
    Group::new(Magic::new(b"FIXT"), "fixture", Layout::Shared(fixture))
}

fn ctx(version: u32) -> Context {
    Context::new(Format::Permanent).with_version(Version::from_num(version))
}

fn sample_bytes() -> Vec<u8> {
    let mut buf = vec![0x2a, 0x03];
    buf.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    buf.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x66]);
    buf.extend_from_slice(&[0; 12]);
    buf.extend_from_slice(&[0x02, 0x01, b'x', 0x02, b'y', b'z']);
    buf.extend_from_slice(&[0xde, 0xad]);
    buf.extend_from_slice(&[0x12, 0x34]);
    buf.extend_from_slice(&[0x00, 0x01, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0xf6]);
    buf.extend_from_slice(b"home\0\0\0\0");
    buf
}

// =============================================================================
// ROUND TRIP
// =============================================================================

#[test]
fn test_round_trip_law() {
    let buf = sample_bytes();
    let mut group = fixture_group();
    let consumed = group.decode(&buf, 0, &ctx(0x0002)).unwrap();
    assert_eq!(consumed, buf.len());

    let encoded = group.encode().unwrap();
    assert_eq!(encoded, buf);

    let mut again = fixture_group();
    again.decode(&encoded, 0, &ctx(0x0002)).unwrap();
    assert_eq!(again.body(), group.body());
    assert_eq!(again.get("stations.0.rssi").unwrap().as_int(), Some(-10));
    assert_eq!(again.get("extra").unwrap().as_int(), Some(0x1234));
}

#[test]
fn test_decode_at_offset() {
    let mut buf = vec![0xff; 5];
    buf.extend(sample_bytes());
    let mut group = fixture_group();
    let consumed = group.decode(&buf, 5, &ctx(0x0002)).unwrap();
    assert_eq!(consumed, buf.len() - 5);
    assert_eq!(group.get("level").unwrap().as_int(), Some(0x2a));
}

// =============================================================================
// SIZE DETERMINISM
// =============================================================================

#[test]
fn test_size_determinism() {
    let group = fixture_group();
    for version in [0x0001, 0x0002] {
        let first = group.resolved_size(&ctx(version)).unwrap();
        let second = group.resolved_size(&ctx(version)).unwrap();
        assert_eq!(first, second);
    }
    for group in nvcfg::global().iter() {
        for format in Format::ALL {
            let ctx = Context::new(format).with_version(Version::from_num(0x0017));
            if !group.layout().supports(format) {
                continue;
            }
            assert_eq!(
                group.resolved_size(&ctx).unwrap(),
                group.resolved_size(&ctx).unwrap(),
                "{}",
                group.alias()
            );
        }
    }
}

// =============================================================================
// RANGE ENFORCEMENT
// =============================================================================

#[test]
fn test_range_enforcement() {
    let mut group = fixture_group();
    group.init(&ctx(0x0001)).unwrap();

    group.set("level", "300").unwrap();
    let err = group.encode().unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValueOutOfRange);
    match err {
        Error::ValueOutOfRange {
            field,
            offset,
            value,
            min,
            max,
        } => {
            assert_eq!(field, "level");
            assert_eq!(offset, 0);
            assert_eq!((value, min, max), (300, 0, 255));
        }
        other => panic!("unexpected error: {other}"),
    }

    group.set("level", "200").unwrap();
    let bytes = group.encode().unwrap();
    assert_eq!(bytes[0], 0xc8);
}

// =============================================================================
// SENTINEL TRIMMING
// =============================================================================

#[test]
fn test_sentinel_trimming() {
    let mut group = fixture_group();
    group.init(&ctx(0x0001)).unwrap();
    group.set("macs.0", "00:11:22:33:44:55").unwrap();
    group.set("macs.1", "00:11:22:33:44:66").unwrap();

    let macs = group.get("macs").unwrap();
    assert_eq!(macs.as_array().unwrap().used_len(), 2);
    assert_eq!(
        macs.to_pretty_string(),
        "{\n  [0] = 00:11:22:33:44:55\n  [1] = 00:11:22:33:44:66\n}"
    );
    assert_eq!(macs.size(), 24);

    let bytes = group.encode().unwrap();
    assert_eq!(&bytes[2..14], &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x00, 0x11, 0x22, 0x33, 0x44, 0x66]);
    assert_eq!(&bytes[14..26], &[0; 12]);
}

// =============================================================================
// PREFIXED LIST GROWTH
// =============================================================================

#[test]
fn test_prefixed_list_growth() {
    let mut group = fixture_group();
    group.decode(&sample_bytes(), 0, &ctx(0x0002)).unwrap();
    let before = group.size();

    let names = group.get_mut("names").unwrap().as_list_mut().unwrap();
    assert_eq!(names.len(), 2);
    names.push_default().unwrap();
    assert_eq!(group.size(), before + 1);

    let bytes = group.encode().unwrap();
    assert_eq!(bytes[26], 0x03);
}

#[test]
fn test_prefixed_list_overflow() {
    let mut group = fixture_group();
    group.init(&ctx(0x0001)).unwrap();
    let names = group.get_mut("names").unwrap().as_list_mut().unwrap();
    for _ in 0..255 {
        names.push_default().unwrap();
    }
    let err = names.push_default().unwrap_err();
    assert_eq!(err.code(), ErrorCode::ListTooLong);
    assert!(matches!(err, Error::ListTooLong { len: 256, max: 255, .. }));
    assert_eq!(names.len(), 255);
}

// =============================================================================
// VERSION GATING
// =============================================================================

#[test]
fn test_version_gating() {
    let group = fixture_group();
    let old = group.resolved_size(&ctx(0x0001)).unwrap();
    let new = group.resolved_size(&ctx(0x0002)).unwrap();
    assert_eq!(new, old + 2);

    let mut buf = sample_bytes();
    buf.drain(34..36);
    let mut decoded = fixture_group();
    decoded.decode(&buf, 0, &ctx(0x0001)).unwrap();
    assert_eq!(
        decoded.get("extra").unwrap_err(),
        Error::FieldNotFound {
            path: "extra".into(),
            segment: "extra".into()
        }
    );
    assert_eq!(decoded.get("label").unwrap().as_text().as_deref(), Some("home"));
}

// =============================================================================
// BITMASK PRETTY-PRINT
// =============================================================================

#[test]
fn test_bitmask_pretty_print() {
    let mut group = fixture_group();
    group.init(&ctx(0x0001)).unwrap();
    group.set("flags", "3").unwrap();
    assert_eq!(group.get("flags").unwrap().to_pretty_string(), "a, b");
    group.set("flags", "4").unwrap();
    assert_eq!(group.get("flags").unwrap().to_pretty_string(), "0x4");
    // named input keeps unnamed bits
    group.set("flags", "b").unwrap();
    assert_eq!(group.get("flags").unwrap().as_int(), Some(6));
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_truncated_input_names_field() {
    let buf = sample_bytes();
    let mut group = fixture_group();
    group.decode(&buf, 0, &ctx(0x0002)).unwrap();

    let err = group.decode(&buf[..36], 0, &ctx(0x0002)).unwrap_err();
    match err {
        Error::TruncatedInput {
            field,
            offset,
            needed,
            available,
        } => {
            assert_eq!(field, "stations");
            assert_eq!(offset, 36);
            assert_eq!((needed, available), (2, 0));
        }
        other => panic!("unexpected error: {other}"),
    }
    // failed decode leaves the previous tree in place
    assert_eq!(group.get("extra").unwrap().as_int(), Some(0x1234));
}

#[test]
fn test_nested_error_path() {
    let mut buf = sample_bytes();
    buf.truncate(40);
    let err = fixture_group().decode(&buf, 0, &ctx(0x0002)).unwrap_err();
    assert!(
        matches!(err, Error::TruncatedInput { ref field, .. } if field == "stations.0.mac"),
        "{err:?}"
    );
}

#[test]
fn test_unsupported_variant() {
    fn dynamic_only(_ctx: &Context) -> Vec<FieldSpec> {
        vec![field("value", u8())]
    }
    let mut group = Group::new(
        Magic::new(b"DYN."),
        "dynonly",
        Layout::Split {
            permanent: None,
            dynamic: Some(dynamic_only),
        },
    );
    let err = group.decode(&[1], 0, &Context::new(Format::Permanent)).unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedVariant {
            group: "dynonly".into(),
            format: Format::Permanent
        }
    );
    assert_eq!(group.decode(&[1], 0, &Context::new(Format::Dynamic)).unwrap(), 1);
}

#[test]
fn test_custom_registry_records() {
    let mut registry = Registry::new();
    registry.register(fixture_group()).unwrap();

    let body = sample_bytes();
    let mut record = vec![0x00, 0x00, b'F', b'I', b'X', b'T', 0x00, 0x02];
    record.extend_from_slice(&body);
    record.extend_from_slice(&[0x99, 0x98]);
    let size = record.len() as u16;
    record[..2].copy_from_slice(&size.to_be_bytes());

    let (group, consumed) = registry.decode_record(&record, 0, &Context::new(Format::Permanent)).unwrap();
    assert_eq!(consumed, record.len());
    assert_eq!(group.context().version, Version::new(0, 2));
    assert_eq!(group.extra(), &[0x99, 0x98]);
    assert_eq!(group.encode_record().unwrap(), record);
}
