//! Node types shared by several groups.

use crate::context::Context;
use crate::model::builder::*;
use crate::model::{Compound, FieldSpec, Names, Node, Style, Width};

pub const IPSTACK_NAMES: Names = Names::Seq(&["IP1", "IP2", "IP3", "IP4", "IP5", "IP6", "IP7", "IP8"]);

pub const OFF_AUTO: Names = Names::Seq(&["off", "auto"]);

pub const MAC_POLICY: Names = Names::Seq(&["disabled", "allow", "deny"]);

/// Set of IP stacks, one bit each.
pub fn ipstacks() -> Node {
    bitmask(Width::W8, IPSTACK_NAMES)
}

/// A single IP stack by index.
pub fn ipstack() -> Node {
    enumeration(Width::W8, IPSTACK_NAMES)
}

pub fn annex_mode() -> Node {
    enumeration(Width::W8, Names::Seq(&["B", "A", "J", "other", "C"]))
}

/// Wi-Fi encryption mode.
pub fn wifi_encryption() -> Node {
    enumeration(
        Width::W8,
        Names::Seq(&[
            "none",
            "wep64",
            "wep128",
            "tkip",
            "aes",
            "tkip_aes",
            "tkip_wep64",
            "aes_wep64",
            "tkip_aes_wep64",
            "tkip_wep128",
            "aes_wep128",
            "tkip_aes_wep128",
        ]),
    )
}

/// WPA authentication methods.
pub fn wpa_auth() -> Node {
    bitmask(Width::W8, Names::Seq(&["802.1x", "wpa1", "psk1", "wpa2", "psk2"]))
}

pub fn mac_policy() -> Node {
    enumeration(Width::W8, MAC_POLICY)
}

/// Console mode used by several vendor groups.
pub fn console_mode_rw_ro() -> Node {
    enumeration(Width::W32, Names::Seq(&["rw", "ro", "disabled"]))
}

// =============================================================================
// TIME PERIOD
// =============================================================================

fn time_period_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("beg_hrs", u8_max(23)),
        field("end_hrs", u8_max(23)),
        field("beg_min", u8_max(59)),
        field("end_min", u8_max(59)),
    ]
}

fn render_time_period(period: &Compound, style: Style) -> Option<String> {
    if style == Style::Raw {
        return None;
    }
    let num = |name: &str| period.field(name).and_then(Node::as_int);
    Some(format!(
        "{:02}:{:02}-{:02}:{:02}",
        num("beg_hrs")?,
        num("beg_min")?,
        num("end_hrs")?,
        num("end_min")?
    ))
}

/// Time-of-day range, shown as `HH:MM-HH:MM`.
pub fn time_period() -> Node {
    compound_with("time-period", time_period_fields, render_time_period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitives::Reader;

    #[test]
    fn test_time_period_pretty() {
        let mut node = time_period();
        node.decode(&mut Reader::new(&[8, 17, 5, 30]), &Context::default())
            .unwrap();
        assert_eq!(node.to_pretty_string(), "08:05-17:30");
        assert_eq!(
            node.to_raw_string(),
            "{beg_hrs=8,end_hrs=17,beg_min=5,end_min=30}"
        );
    }

    #[test]
    fn test_ipstacks() {
        let mut node = ipstacks();
        node.set_int(0b101).unwrap();
        assert_eq!(node.to_pretty_string(), "IP1, IP3");
        let mut one = ipstack();
        one.set_int(1).unwrap();
        assert_eq!(one.to_pretty_string(), "IP2");
    }
}
