//! Simple dumper for nonvol settings images.
//!
//! Usage:
//!
//! ```text
//! dump_group <file> [records|<group>] [perm|dyn] [offset] [version]
//! ```
//!
//! With `records` (the default) the file is read as a sequence of framed
//! records; otherwise the named group is decoded from `offset`.

use std::fs;

use nvcfg::{Context, Format, Group, Version};

fn print_group(group: &Group, offset: usize, size: usize) {
    println!(
        "\n=== {} ({}) version {} at 0x{:x}, {} bytes ===",
        group.alias(),
        group.magic(),
        group.context().version,
        offset,
        size
    );
    println!("{}", group.to_pretty_string());
    if !group.extra().is_empty() {
        println!("  ({} trailing bytes)", group.extra().len());
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let path = args.next().expect("usage: dump_group <file> [records|<group>] [perm|dyn] [offset] [version]");
    let target = args.next().unwrap_or_else(|| "records".to_string());
    let format: Format = args
        .next()
        .map(|s| s.parse().expect("format must be 'perm' or 'dyn'"))
        .unwrap_or(Format::Permanent);
    let offset = args
        .next()
        .map(|s| {
            let s = s.trim_start_matches("0x");
            usize::from_str_radix(s, 16).expect("offset must be hex")
        })
        .unwrap_or(0);
    let version: Version = args
        .next()
        .map(|s| s.parse().expect("bad version"))
        .unwrap_or_default();

    println!("Reading: {}", path);
    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let ctx = Context::new(format).with_version(version);

    if target == "records" {
        let groups = nvcfg::global()
            .decode_records(&data, offset, &ctx)
            .expect("Failed to decode records");
        let mut pos = offset;
        for group in &groups {
            let size = group.encode_record().map(|r| r.len()).unwrap_or(0);
            print_group(group, pos, size);
            pos += size;
        }
        println!("\n=== {} groups ===", groups.len());
    } else {
        let (group, consumed) =
            nvcfg::decode(&target, &data, offset, &ctx).expect("Failed to decode");
        print_group(&group, offset, consumed);
    }
}
