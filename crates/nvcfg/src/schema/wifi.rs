//! Wireless settings: Broadcom radio cards, vendor extras and guest networks.

use crate::context::{options, Context};
use crate::group::{Group, Layout, Magic};
use crate::model::builder::*;
use crate::model::{FieldSpec, Names, Node, Width};
use crate::schema::common::{mac_policy, time_period, wifi_encryption, wpa_auth, OFF_AUTO};

// =============================================================================
// 8021, 8022 / bcmwifi, bcmwifi2
// =============================================================================

const RATE_MBPS: Names = Names::Map(&[
    (0x00, "auto"),
    (0x02, "1"),
    (0x04, "2"),
    (0x0b, "5.5"),
    (0x0c, "6"),
    (0x12, "9"),
    (0x16, "11"),
    (0x18, "12"),
    (0x24, "18"),
    (0x30, "24"),
    (0x48, "36"),
    (0x60, "48"),
    (0x6c, "54"),
]);

fn rate_mbps() -> Node {
    enumeration(Width::W8, RATE_MBPS)
}

fn wmm_params(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("cwmin", u16_range(0, 15)),
        field("cwmax", u16_range(0, 1024)),
        field("aifsn", u16_range(0, 15)),
        field("txop_b", u16_range(0, 8192)),
        field("txop_ag", u16_range(0, 8192)),
    ]
}

fn wmm_block(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("sta", compound("wmm-params", wmm_params)),
        field("ap", compound("wmm-params", wmm_params)),
        field("ap_adm_control", boolean()),
        field("ap_oldest_first", boolean()),
    ]
}

fn wmm(_ctx: &Context) -> Vec<FieldSpec> {
    ["ac_be", "ac_bk", "ac_vi", "ac_vo"]
        .into_iter()
        .map(|name| field(name, compound("wmm-block", wmm_block)))
        .collect()
}

fn bcmwifi_dyn(ctx: &Context) -> Vec<FieldSpec> {
    // TWG850 (0.21) carries a larger block before wds_enabled
    let radius_pad = (if ctx.version.num() <= 0x0015 { 0x56 } else { 0x2a }) - 0x1d;
    let wps_pin = if ctx.option_bool(options::WPS_PIN_P16) {
        p16string()
    } else {
        p8string()
    };

    vec![
        field("ssid", zstring(33)),
        reserved(u8()),
        field("b_channel", u8()),
        reserved(u8()),
        field("basic_rates", u8()).disabled(),
        reserved(data(1)),
        field("supported_rates", u8()).disabled(),
        reserved(data(1)),
        field("encryption", wifi_encryption()),
        reserved(data(1)),
        // 1 = open, 2 = shared key, 3 = both
        field("authentication", u8_range(1, 3)),
        field("wep64_keys", array(data(5), 4)),
        field("wep_key_num", u8()),
        field("wep128_key_1", data(13)),
        field("beacon_interval", u16_range(20, 1024)),
        field("dtim_interval", u16_range(1, 255)),
        field("frag_threshold", u16_range(256, 2346)),
        field("rts_threshold", u16_range(1, 2347)),
        field("wep128_keys", array(data(13), 3)),
        field("mac_policy", mac_policy()),
        field("mac_table", array_until(mac(), 32, Node::is_blank)),
        field("preamble_long", boolean()),
        field("hide_ssid", boolean()),
        field("txpower_level", u8_range(1, 8)),
        reserved(data(0x20)),
        field("short_retry_limit", u8()),
        field("long_retry_limit", u8()),
        reserved(u8()),
        field("a_channel", u8()),
        field(
            "g_mode",
            enumeration(
                Width::W8,
                Names::Seq(&["b", "auto", "g", "", "", "performance", "lrs"]),
            ),
        ),
        field("radio_enabled", boolean()),
        field("g_protection", boolean()),
        reserved(data(1)),
        field("g_rate", rate_mbps()),
        field("tx_power", u8_max(100)),
        field("wpa_psk", p16string()),
        reserved(data(2)),
        field("wpa_rekey_interval", u16()),
        field("radius_ip", ip4()),
        field("radius_port", u16()),
        reserved(u8()),
        field("radius_key", p8string()),
        reserved(data(radius_pad)),
        field("wds_enabled", boolean()),
        field("wds_list", array(mac(), 4)),
        field("enable_afterburner", boolean()),
        reserved(data(3)),
        field("wpa_auth", wpa_auth()),
        reserved(data(2)),
        field("wpa_reauth_interval", u16()),
        field("wpa2_preauth_enabled", boolean()),
        reserved(data(3)),
        field("wmm_enabled", boolean()),
        field("wmm_nak", boolean()),
        field("wmm_powersave", boolean()),
        reserved(data(4)),
        field("wmm", compound("wmm", wmm)),
        field(
            "n_band",
            enumeration(Width::W8, Names::Seq(&["", "2.4Ghz", "5Ghz"])),
        ),
        field("n_control_channel", u8()),
        field("n_mode", enumeration(Width::W8, OFF_AUTO)),
        field(
            "n_bandwidth",
            enumeration(
                Width::W8,
                Names::Map(&[(10, "10MHz"), (20, "20MHz"), (40, "40MHz")]),
            ),
        ),
        field(
            "n_sideband",
            signed_enumeration(
                Width::W8,
                Names::Map(&[(-1, "lower"), (0, "none"), (1, "upper")]),
            ),
        ),
        field(
            "n_rate",
            signed_enumeration(
                Width::W8,
                Names::Map(&[
                    (-2, "legacy"),
                    (-1, "auto"),
                    (0, "0"),
                    (1, "1"),
                    (2, "2"),
                    (3, "3"),
                    (4, "4"),
                    (5, "5"),
                    (6, "6"),
                    (7, "7"),
                    (8, "8"),
                    (9, "9"),
                    (10, "10"),
                    (11, "11"),
                    (12, "12"),
                    (13, "13"),
                    (14, "14"),
                    (15, "15"),
                    (32, "mcs_index"),
                ]),
            ),
        ),
        field("n_protection", enumeration(Width::W8, OFF_AUTO)),
        field("wps_enabled", boolean()),
        field("wps_configured", boolean()),
        field("wps_device_pin", wps_pin),
        field("wps_model", p8zstring()),
        field("wps_manufacturer", p8zstring()),
        field("wps_device_name", p8zstring()),
        reserved(u8()),
        field("wps_sta_pin", p8zstring()),
        field("wps_model_num", p8zstring()),
        field("wps_timeout", boolean()),
        reserved(data(1)),
        field("wps_uuid", p8zstring()),
        field("wps_board_num", p8zstring()),
        field("wps_configured2", boolean()),
        field("country", p8zstring()),
        field("primary_network_enabled", boolean()),
        reserved(u8()),
        field("a_mcast_rate", rate_mbps()),
        reserved(u8()),
        field("bg_mcast_rate", rate_mbps()),
        field(
            "reg_mode",
            enumeration(Width::W8, Names::Seq(&["off", "802.11d", "802.11h"])),
        ),
        field("pre_network_radar_check", u8_max(99)),
        field("in_network_radar_check", u8_max(99)),
        field(
            "tpc_mitigation",
            enumeration(Width::W8, Names::Seq(&["off", "", "2dB", "3dB", "4dB"])),
        ),
        field(
            "features",
            bitmask(
                Width::W8,
                Names::Map(&[
                    (0x01, "obss_coex"),
                    (0x04, "ap_isolate"),
                    (0x10, "stbc_tx_on"),
                    (0x20, "stbc_tx_off"),
                    (0x40, "sgi_on"),
                    (0x80, "sgi_off"),
                ]),
            ),
        ),
        reserved(data(1)),
        field("acs_policy_index", u8_max(7)),
        reserved(data(3)),
        field("acs_flags", u8()),
        field("acs_user_policy", p8string()),
        reserved(p8list(u32())),
        field("bss_max_assoc", u8_max(128)),
        field(
            "bandwidth_cap",
            enumeration(
                Width::W8,
                Names::Map(&[(0x01, "20MHz"), (0x03, "40MHz"), (0x07, "80MHz")]),
            ),
        ),
        // n_control_channel as text
        reserved(p8istring()),
        reserved(data(0x13)),
        field("txchain", u8()).disabled(),
        field("rxchain", u8()).disabled(),
        field(
            "mimo_preamble",
            enumeration(
                Width::W8,
                Names::Seq(&["mixed", "greenfield", "greenfield_broadcom"]),
            ),
        ),
        field("features2", bitmask(Width::W8, Names::Seq(&["ampdu", "amsdu"]))),
        field("acs_cs_scan_timer", u32()),
        field("bss_mode_reqd", u8_max(3)).disabled(),
        reserved(data(3)),
        field(
            "features3",
            bitmask(
                Width::W8,
                Names::Map(&[
                    (0x01, "band_steering"),
                    (0x02, "airtime_fairness"),
                    (0x04, "traffic_scheduler"),
                    (0x08, "exhausted_buf_order_sched"),
                ]),
            ),
        ),
    ]
}

fn bcmwifi_layout() -> Layout {
    Layout::Split {
        permanent: None,
        dynamic: Some(bcmwifi_dyn),
    }
}

/// First radio card.
pub fn bcmwifi() -> Group {
    Group::new(Magic::new(b"8021"), "bcmwifi", bcmwifi_layout())
}

/// Second radio card, same layout as the first.
pub fn bcmwifi2() -> Group {
    Group::new(Magic::new(b"8022"), "bcmwifi2", bcmwifi_layout())
}

// =============================================================================
// T802 / tmmwifi
// =============================================================================

fn tmmwifi_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("sleep_breaking_time", boolean()),
        field("sleep_every_day", boolean()),
        field("sleep_days", bitmask(Width::W8, Names::Seq(&[]))),
        field("sleep_all_day", boolean()),
        field("sleep_time", time_period()),
        field("sleep_enabled", boolean()),
        field("sleep_page_visible", boolean()),
        reserved(data(4)),
        field("ssid_24", zstring(33)),
        field("ssid_50", zstring(33)),
        reserved(u8()),
        field("wpa_psk_24", p8string()),
        reserved(u8()),
        field("wpa_psk_50", p8string()),
        reserved(data(4)),
        field("wifi_opt60_replace", zstring(33)),
        reserved(data(8)),
        field("card1_prefix", fstring(33)),
        field("card1_random", zstring(33)),
        field("card2_prefix", zstring(33)),
        field("card2_random", zstring(33)),
        field("card1_regul_rev", u8_max(99)),
        field("card2_regul_rev", u8_max(99)),
    ]
}

pub fn tmmwifi() -> Group {
    Group::new(
        Magic::new(b"T802"),
        "tmmwifi",
        Layout::Split {
            permanent: None,
            dynamic: Some(tmmwifi_dyn),
        },
    )
}

// =============================================================================
// WiGu, WiGv / guestwifi, guestwifi2
// =============================================================================

fn guest_wifi(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        reserved(u8()),
        reserved(u8()),
        field("enabled", boolean()),
        field("ssid", zstring(33)),
        reserved(u8()),
        reserved(u8()),
        field("encryption", wifi_encryption()),
        field("wep64_keys", array(data(5), 4)),
        field("wep_key_num", u8()),
        field("wep128_keys", array(data(13), 4)),
        field("wep_key_passphrase", zstring(27)),
        reserved(data(6)),
        field("wpa_psk", p8string()),
        field("wpa_rekey_interval", u32_max(0xfffff)),
        field("radius_ip", ip4()),
        field("radius_port", u16()),
        reserved(u8()),
        field("radius_key", p8string()),
        reserved(u8()),
        field("shared_key_auth_required", boolean()),
        reserved(u8()),
        field("wpa_auth", wpa_auth()),
        reserved(data(2)),
        field("wpa_reauth_interval", u16()),
        field("wpa2_preauth_enabled", boolean()),
        field("dhcp_enabled", boolean()),
        field("dhcp_ip_address", ip4()),
        field("dhcp_subnet_mask", ip4()),
        field("dhcp_pool_start", ip4()),
        field("dhcp_pool_end", ip4()),
        field("dhcp_lease_time", u32()),
        field("network_bridge", u8()),
        field("mac_policy", mac_policy()),
        field("mac_table", array(mac(), 32)),
    ]
}

fn guestwifi_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("net1", compound("guest-wifi", guest_wifi)),
        field("net2", compound("guest-wifi", guest_wifi)),
    ]
}

fn guestwifi_layout() -> Layout {
    Layout::Split {
        permanent: None,
        dynamic: Some(guestwifi_dyn),
    }
}

pub fn guestwifi() -> Group {
    Group::new(Magic::new(b"WiGu"), "guestwifi", guestwifi_layout())
}

pub fn guestwifi2() -> Group {
    Group::new(Magic::new(b"WiGv"), "guestwifi2", guestwifi_layout())
}
