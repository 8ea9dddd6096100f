//! Residential gateway groups: routing, DHCP server, firewall and parental
//! control.

use crate::context::{options, Context, Version};
use crate::group::{Group, Layout, Magic};
use crate::model::builder::*;
use crate::model::{Compound, FieldSpec, Names, Node, Style, Width};
use crate::schema::common::time_period;

// =============================================================================
// RG.. / rg
// =============================================================================

const PROTO: Names = Names::Map(&[(0x03, "TCP"), (0x04, "UDP"), (0xfe, "TCP+UDP")]);

/// Ordering seen on some 0.22 firmware.
const PROTO_REVERSED: Names = Names::Map(&[(0x03, "UDP"), (0x04, "TCP"), (0xfe, "TCP+UDP")]);

fn proto(ctx: &Context) -> Node {
    if ctx.option_bool(options::RG_PROTO_REVERSED) {
        enumeration(Width::W8, PROTO_REVERSED)
    } else {
        enumeration(Width::W8, PROTO)
    }
}

fn ip4_range_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![field("start", ip4()), field("end", ip4())]
}

/// `start,end` in both styles.
fn render_range(range: &Compound, style: Style) -> Option<String> {
    let part = |name: &str| {
        range.field(name).map(|node| match style {
            Style::Raw => node.to_raw_string(),
            Style::Pretty => node.to_pretty_string(),
        })
    };
    Some(format!("{},{}", part("start")?, part("end")?))
}

fn ip4_range() -> Node {
    compound_with("ip4_range", ip4_range_fields, render_range)
}

fn port_range_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![field("start", u16()), field("end", u16())]
}

fn port_range() -> Node {
    compound("port-range", port_range_fields)
}

fn is_port_range(node: Option<&Node>, start: i64, end: i64) -> bool {
    let bound = |name: &str| node.and_then(|n| n.get(name).ok()).and_then(Node::as_int);
    bound("start") == Some(start) && bound("end") == Some(end)
}

fn is_open_port_filter(node: &Node) -> bool {
    is_port_range(Some(node), 1, 0xffff)
}

fn port_forward_fields(ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("dest", ip4()),
        field("ports", port_range()),
        field("type", proto(ctx)),
    ]
}

fn is_unused_port_forward(node: &Node) -> bool {
    node.get("dest").is_ok_and(Node::is_blank)
}

fn port_forward_dport_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![field("ports", port_range()), field("data", data(4))]
}

fn is_unused_dport(node: &Node) -> bool {
    is_port_range(node.get("ports").ok(), 0, 0)
}

fn port_trigger_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![field("trigger", port_range()), field("target", port_range())]
}

fn is_unused_port_trigger(node: &Node) -> bool {
    is_port_range(node.get("trigger").ok(), 0, 0)
}

/// The first static route stores its addresses in a different order.
fn route1_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("netmask", ip4()),
        field("network", ip4()),
        field("gateway", ip4()),
    ]
}

fn route_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("network", ip4()),
        field("gateway", ip4()),
        field("netmask", ip4()),
    ]
}

const RG_FEATURES1: Names = Names::Seq(&[
    "wan_conn_pppoe",
    "",
    "feature_ip_filters",
    "feature_port_filters",
    "wan_block_pings",
    "feature_ipsec_passthrough",
    "feature_pptp_passthrough",
    "wan_remote_cfg_mgmt",
    "feature_ip_forwarding",
    "feature_dmz",
    "wan_conn_static",
    "feature_nat_debug",
    "lan_dhcp_server",
    "lan_http_server",
    "primary_default_override",
    "feature_mac_filters",
    "feature_port_triggers",
    "feature_multicast",
    "wan_rip",
    "",
    "feature_dmz_by_hostname",
    "lan_upnp",
    "lan_routed_subnet",
    "lan_routed_subnet_dhcp",
    "wan_passthrough_skip_dhcp",
    "lan_routed_subnet_nat",
    "",
    "wan_sntp",
    "wan_conn_pptp",
    "wan_pptp_server",
    "feature_ddns",
    "",
]);

fn rg_fields(ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("router_mode", boolean()),
        field("http_pass", zstring(9)),
        field("http_realm", zstring(256)),
        field("spoofed_mac", mac()),
        field("features1", bitmask(Width::W32, RG_FEATURES1)),
        field("dmz_ip", ip4()),
        field("wan_ip", ip4()),
        field("wan_mask", ip4()),
        field("wan_gateway", ip4()),
        field("wan_dhcp_hostname", zstring(0x100)),
        field("syslog_email", zstring(0x100)),
        field("syslog_smtp", zstring(0x100)),
        field("ip_filters", array_until(ip4_range(), 10, Node::is_blank)),
        field("port_filters", array_until(port_range(), 10, is_open_port_filter)),
        field(
            "port_forwards",
            array_until(
                compound("port-forward", port_forward_fields),
                10,
                is_unused_port_forward,
            ),
        ),
        field("mac_filters", array_until(mac(), 20, Node::is_blank)),
        field(
            "port_triggers",
            array_until(
                compound("port-trigger", port_trigger_fields),
                10,
                is_unused_port_trigger,
            ),
        ),
        reserved(data(0x15)),
        field("port_filter_protocols", array(proto(ctx), 10)),
        reserved(data(0xaa)),
        field("port_trigger_protocols", array(proto(ctx), 10)),
        reserved(data(0x443)),
        reserved(data(3)),
        field("rip_key", p8string()),
        field("rip_reporting_interval", u16()),
        reserved(data(0xa)),
        field("route1", compound("route", route1_fields)),
        field("route2", compound("route", route_fields)),
        field("route3", compound("route", route_fields)),
        field("nat_route_gateway", ip4()),
        field("nat_route_dns", array(ip4(), 3)),
        field("l2tp_username", p8string()),
        field("l2tp_password", p8string()),
        reserved(data(5)),
        field("timeservers", p8list(p8string())),
        field("timezone_offset", i32_range(-45000, 45000)),
        field(
            "port_forward_dports",
            array_until(
                compound("port-forward-dport", port_forward_dport_fields),
                10,
                is_unused_dport,
            ),
        )
        .when(ctx.version > Version::from_num(0x0016)),
        field("ddns_username", p16string()),
        field("ddns_password", p16string()),
        field("ddns_hostname", p16string()),
        reserved(data(4)),
        field("mtu", u16()),
        reserved(data(3)),
        field(
            "features2",
            bitmask(Width::W8, Names::Seq(&["wan_l2tp_server", "wan_conn_l2tp"])),
        ),
        field("l2tp_server_ip", ip4()),
        field("l2tp_server_name", p8string()),
    ]
}

pub fn rg() -> Group {
    Group::new(Magic::new(b"RG.."), "rg", Layout::Shared(rg_fields))
}

// =============================================================================
// CDP. / dhcp
// =============================================================================

fn typed_ip_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![field("type", u32()), field("ip", ip4())]
}

fn typed_ip() -> Node {
    compound("typed_ip", typed_ip_fields)
}

fn lan_addr_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("num_1", u16()),
        field("create_time", u16()),
        field("num_2", u16()),
        field("expire_time", u16()),
        field("ip_type", u8()),
        field("ip", ip4()),
        field("ip_data", data(3)),
        field("method", u8()),
        field("client_id", p8data()),
        field("hostname", p8string()),
        field("mac", mac()),
    ]
}

fn wan_dns_entry_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![reserved(u8()), field("ip", ip4())]
}

fn dhcp_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        reserved(data(7)),
        field("lan_trans_threshold", u8()),
        reserved(data(8)),
        field("dhcp_pool_start", typed_ip()),
        field("dhcp_pool_end", typed_ip()),
        field("dhcp_subnet_mask", typed_ip()),
        reserved(data(4)),
        field("router_ip", typed_ip()),
        field("dns_ip", typed_ip()),
        field("syslog_ip", typed_ip()),
        field("ttl", u32()),
        reserved(data(4)),
        field("ip_2", typed_ip()),
        field("domain", p8string()),
        reserved(data(7)),
        field("lan_addrs", array(compound("lan_addr", lan_addr_fields), 16)),
        reserved(data(0x37a)),
        field(
            "wan_dns",
            array(compound("wan-dns-entry", wan_dns_entry_fields), 3),
        ),
    ]
}

pub fn dhcp() -> Group {
    Group::new(Magic::new(b"CDP."), "dhcp", Layout::Shared(dhcp_fields))
}

// =============================================================================
// CSP. / csp
// =============================================================================

fn csp_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        reserved(data(44)),
        field(
            "firewall_policy",
            enumeration(Width::W8, Names::Seq(&["low", "medium", "high"])),
        ),
    ]
}

pub fn csp() -> Group {
    Group::new(Magic::new(b"CSP."), "csp", Layout::Shared(csp_fields))
}

// =============================================================================
// FIRE / firewall
// =============================================================================

/// Bit 12 is `block_fragmented_ip`; firmware builds have always shipped with
/// bits 9 to 11 unnamed and the detection flags at 13 and 14.
const FIREWALL_FEATURES: Names = Names::Seq(&[
    "keyword_blocking",
    "domain_blocking",
    "http_proxy_blocking",
    "disable_cookies",
    "disable_java_applets",
    "disable_activex_ctrl",
    "disable_popups",
    "mac_tod_filtering",
    "email_alerts",
    "",
    "",
    "",
    "block_fragmented_ip",
    "port_scan_detection",
    "syn_flood_detection",
]);

fn firewall_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        reserved(data(2)),
        field("features", bitmask(Width::W16, FIREWALL_FEATURES)),
        reserved(data(4)),
        field("word_filter_count", u8()),
        reserved(data(3)),
        field("domain_filter_count", u8()),
        field("word_filters", array_until(fstring(0x20), 16, Node::is_blank)),
        field("domain_filters", array_until(fstring(0x40), 16, Node::is_blank)),
        // room for 11 more domain filters
        reserved(data(0x2d4)),
        reserved(data(0xc)),
        // 0x00 = all, 0x01 = sunday, 0x40 = saturday
        field("tod_filter_days", bitmask(Width::W8, Names::Seq(&[]))),
        reserved(data(1)),
        field("tod_filter_time", time_period()),
        reserved(data(0x2a80)),
        field("syslog_ip", ip4()),
        reserved(data(2)),
        field("syslog_events", bitmask(Width::W16, Names::Seq(&[]))),
    ]
}

pub fn firewall() -> Group {
    Group::new(Magic::new(b"FIRE"), "firewall", Layout::Shared(firewall_fields))
}

// =============================================================================
// UPC. / upc
// =============================================================================

fn upc_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        reserved(data(3)),
        field("parental_enable", boolean()),
        reserved(data(6)),
        field("parental_activity_time_enable", u16()),
        field("parental_password", zstring(10)),
        reserved(data(0x2237)),
        field("web_country", u8()),
        field("web_language", u8()),
        field("web_syslog_enable", boolean()),
        field(
            "web_syslog_level",
            bitmask(
                Width::W8,
                Names::Seq(&["critical", "major", "minor", "warning", "inform"]),
            ),
        ),
        field("trusted_macs", array_until(mac(), 10, Node::is_blank)),
        reserved(data(0xd8)),
        field("lan_dns4_list", array(ip4(), 3)),
        field("lan_dns6_list", array(ip6(), 3)),
    ]
}

pub fn upc() -> Group {
    Group::new(Magic::new(b"UPC."), "upc", Layout::Shared(upc_fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Format;
    use crate::error::Error;

    fn ctx(version: u32) -> Context {
        Context::new(Format::Permanent).with_version(Version::from_num(version))
    }

    #[test]
    fn test_rg_dports_version_gate() {
        let group = rg();
        let old = group.resolved_size(&ctx(0x0016)).unwrap();
        let new = group.resolved_size(&ctx(0x0017)).unwrap();
        assert_eq!(new - old, 10 * 8);

        let mut g = group.clone();
        g.init(&ctx(0x0016)).unwrap();
        assert!(matches!(
            g.get("port_forward_dports"),
            Err(Error::FieldNotFound { .. })
        ));
        g.init(&ctx(0x0017)).unwrap();
        assert!(g.get("port_forward_dports.9.ports.end").is_ok());
    }

    #[test]
    fn test_rg_same_layout_both_formats() {
        let group = rg();
        let perm = group.resolved_size(&ctx(0x0017)).unwrap();
        let dyn_ = group
            .resolved_size(&ctx(0x0017).for_format(Format::Dynamic))
            .unwrap();
        assert_eq!(perm, dyn_);
    }

    #[test]
    fn test_rg_proto_ordering_option() {
        let mut group = rg();
        group.init(&ctx(0x0016)).unwrap();
        group.set("port_forwards.0.type", "3").unwrap();
        assert_eq!(
            group.get("port_forwards.0.type").unwrap().to_pretty_string(),
            "TCP"
        );

        let reversed = ctx(0x0016).with_option(options::RG_PROTO_REVERSED, "1");
        group.init(&reversed).unwrap();
        group.set("port_forwards.0.type", "3").unwrap();
        assert_eq!(
            group.get("port_forwards.0.type").unwrap().to_pretty_string(),
            "UDP"
        );
    }

    #[test]
    fn test_rg_route_order() {
        let mut group = rg();
        group.init(&ctx(0x0017)).unwrap();
        group.set("route1.netmask", "255.255.255.0").unwrap();
        group.set("route2.netmask", "255.255.0.0").unwrap();
        assert_eq!(
            group.get("route1").unwrap().to_raw_string(),
            "{netmask=255.255.255.0,network=0.0.0.0,gateway=0.0.0.0}"
        );
        assert_eq!(
            group.get("route2").unwrap().to_raw_string(),
            "{network=0.0.0.0,gateway=0.0.0.0,netmask=255.255.0.0}"
        );
    }

    #[test]
    fn test_ip_range_rendering() {
        let mut group = rg();
        group.init(&ctx(0x0017)).unwrap();
        group.set("ip_filters.0.start", "192.168.0.10").unwrap();
        group.set("ip_filters.0.end", "192.168.0.20").unwrap();
        let filters = group.get("ip_filters").unwrap();
        assert_eq!(filters.as_array().unwrap().used_len(), 1);
        assert_eq!(
            filters.get("0").unwrap().to_pretty_string(),
            "192.168.0.10,192.168.0.20"
        );
    }

    #[test]
    fn test_port_filter_sentinel() {
        let mut group = rg();
        group.init(&ctx(0x0017)).unwrap();
        for i in 0..10 {
            group.set(&format!("port_filters.{i}.start"), "1").unwrap();
            group.set(&format!("port_filters.{i}.end"), "65535").unwrap();
        }
        group.set("port_filters.0.end", "1024").unwrap();
        let filters = group.get("port_filters").unwrap().as_array().unwrap();
        assert_eq!(filters.used_len(), 1);
    }

    #[test]
    fn test_timeservers_list() {
        let mut group = rg();
        group.init(&ctx(0x0017)).unwrap();
        let before = group.size();
        let list = group.get_mut("timeservers").unwrap().as_list_mut().unwrap();
        list.push_default().unwrap().set_str("pool.ntp.org").unwrap();
        assert_eq!(group.size(), before + 1 + "pool.ntp.org".len());
    }

    #[test]
    fn test_firewall_feature_names() {
        let mut group = firewall();
        group.init(&Context::new(Format::Dynamic)).unwrap();
        group.set("features", "0x1001").unwrap();
        assert_eq!(
            group.get("features").unwrap().to_pretty_string(),
            "keyword_blocking, block_fragmented_ip"
        );
    }

    #[test]
    fn test_dhcp_lan_addrs() {
        let mut group = dhcp();
        group.init(&Context::new(Format::Permanent)).unwrap();
        group.set("lan_addrs.15.hostname", "printer").unwrap();
        group.set("lan_addrs.15.mac", "00:11:22:33:44:55").unwrap();
        assert_eq!(
            group.get("lan_addrs.15.mac").unwrap().to_pretty_string(),
            "00:11:22:33:44:55"
        );
        assert_eq!(group.get("wan_dns.2.ip").unwrap().to_raw_string(), "0.0.0.0");
    }
}
