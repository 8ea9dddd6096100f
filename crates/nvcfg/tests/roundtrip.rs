//! Round-trip properties over every built-in group.

use nvcfg::{flags, global, options, Context, ErrorCode, Format, Version};
use proptest::prelude::*;

const VERSIONS: [u32; 6] = [0x0001, 0x0002, 0x0015, 0x0016, 0x0017, 0x0024];
const FLAG_SETS: [u32; 3] = [0, flags::USERIF_ALT, flags::USERIF_ALT_SHORT];

fn context(format: Format, version: u32, flags: u32, proto_reversed: bool, wps_p16: bool) -> Context {
    let mut ctx = Context::new(format)
        .with_version(Version::from_num(version))
        .with_flags(flags);
    if proto_reversed {
        ctx = ctx.with_option(options::RG_PROTO_REVERSED, "1");
    }
    if wps_p16 {
        ctx = ctx.with_option(options::WPS_PIN_P16, "1");
    }
    ctx
}

#[test]
fn test_default_trees_round_trip() {
    for group in global().iter() {
        for format in Format::ALL {
            for version in VERSIONS {
                for flags in FLAG_SETS {
                    let ctx = context(format, version, flags, false, false);
                    let mut fresh = group.clone();
                    if fresh.init(&ctx).is_err() {
                        assert!(!group.layout().supports(format));
                        continue;
                    }
                    let bytes = fresh.encode().unwrap();
                    assert_eq!(bytes.len(), group.resolved_size(&ctx).unwrap());

                    let mut decoded = group.clone();
                    let consumed = decoded.decode(&bytes, 0, &ctx).unwrap();
                    assert_eq!(consumed, bytes.len(), "{}", group.alias());
                    assert_eq!(decoded.body(), fresh.body(), "{}", group.alias());
                }
            }
        }
    }
}

#[test]
fn test_records_round_trip() {
    let ctx = Context::new(Format::Permanent);
    let mut image = Vec::new();
    let mut expected = Vec::new();
    for group in global().iter() {
        let mut g = group.clone();
        if g.init(&ctx.clone().with_version(Version::new(0, 0x17))).is_err() {
            continue;
        }
        image.extend(g.encode_record().unwrap());
        expected.push(g.alias());
    }
    image.extend_from_slice(&[0xff; 16]);

    let groups = global().decode_records(&image, 0, &ctx).unwrap();
    let aliases: Vec<_> = groups.iter().map(|g| g.alias()).collect();
    assert_eq!(aliases, expected);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Mostly-zero buffers resemble erased or default flash; the scattered
    /// writes exercise list counts, string lengths and named values.
    #[test]
    fn prop_decode_encode_is_lossless(
        index in 0usize..27,
        perm in any::<bool>(),
        version in prop::sample::select(VERSIONS.to_vec()),
        flags in prop::sample::select(FLAG_SETS.to_vec()),
        proto_reversed in any::<bool>(),
        wps_p16 in any::<bool>(),
        writes in prop::collection::vec((any::<usize>(), 1u8..=255), 0..48),
        slack in 0usize..32,
    ) {
        let format = if perm { Format::Permanent } else { Format::Dynamic };
        let ctx = context(format, version, flags, proto_reversed, wps_p16);
        let group = global().iter().nth(index % global().len()).unwrap();
        let Ok(size) = group.resolved_size(&ctx) else {
            return Ok(());
        };

        let mut buf = vec![0u8; size + slack];
        for (pos, byte) in writes {
            let len = buf.len().max(1);
            if let Some(b) = buf.get_mut(pos % len) {
                *b = byte;
            }
        }

        let mut decoded = group.clone();
        let Ok(consumed) = decoded.decode(&buf, 0, &ctx) else {
            return Ok(());
        };
        prop_assert!(consumed <= buf.len());

        let encoded = match decoded.encode() {
            Ok(bytes) => bytes,
            Err(err) => {
                // ranged integers are only checked on encode
                prop_assert_eq!(err.code(), ErrorCode::ValueOutOfRange);
                return Ok(());
            }
        };
        prop_assert_eq!(&encoded[..], &buf[..consumed]);

        let mut again = group.clone();
        prop_assert_eq!(again.decode(&encoded, 0, &ctx).unwrap(), encoded.len());
        prop_assert_eq!(again.body(), decoded.body());
        prop_assert_eq!(again.to_raw_string(), decoded.to_raw_string());
    }

    #[test]
    fn prop_size_matches_encoding(
        index in 0usize..27,
        version in prop::sample::select(VERSIONS.to_vec()),
        pushes in 0usize..4,
    ) {
        let ctx = context(Format::Permanent, version, 0, false, false);
        let mut group = global().iter().nth(index % global().len()).unwrap().clone();
        if group.init(&ctx).is_err() {
            return Ok(());
        }
        // grow the first top-level list, if any
        let list_name = group
            .body()
            .as_compound()
            .and_then(|c| c.visible_fields().find(|f| f.node().as_list().is_some()))
            .map(|f| f.name());
        if let Some(name) = list_name {
            let list = group.get_mut(name).unwrap().as_list_mut().unwrap();
            for _ in 0..pushes {
                list.push_default().unwrap();
            }
        }
        let bytes = group.encode().unwrap();
        prop_assert_eq!(bytes.len(), group.size());
    }
}
