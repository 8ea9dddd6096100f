//! Cable modem groups: DOCSIS stack, hardware abstraction and BPI keys.

use crate::context::Context;
use crate::group::{Group, Layout, Magic};
use crate::model::builder::*;
use crate::model::{FieldSpec, Names, Width};
use crate::schema::common::{annex_mode, ipstack};

// =============================================================================
// 0xd0c20100 / docsis1
// =============================================================================

const DOCSIS_FEATURES: Names = Names::Seq(&[
    "single_ds_channel",
    "bpi",
    "concat",
    "fragmentation",
    "phs",
    "igmp",
    "rate_shaping",
    "",
    "dhcp",
    "time_of_day",
    "config_file_tftp",
    "canned_registration",
    "online_rng_rsp",
    "",
    "bpi23_secure_sw_dload_disabled",
    "docsis_20_hack_for_1x_cmts",
    "",
    "force_config_file",
    "ack_cel_technology",
    "non_standard_upstream",
    "",
    "ds_header_detection",
    "scan_up_annex_a",
]);

fn docsis1_perm(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("features", bitmask(Width::W32, DOCSIS_FEATURES)),
        field("upstream_queues_enabled", u8()),
        field("bpi_version", u8()),
        field("disabled_docsis_timers", u32()),
        field("concat_threshold", u8()),
        field("rate_shaping_time_interval", u8()),
        reserved(u32()),
        field("canned_ip_addr", ip4()),
        field("canned_ip_mask", ip4()),
        field("canned_gateway_ip", ip4()),
        field("canned_tftp_ip", ip4()),
        field("canned_cm_config_file", zstring(0x40)),
        field("time_server_ip", ip4()),
        field("log_server_ip", ip4()),
        field("ipstack_number", ipstack()),
        field("max_ugs_queue_depth", u8()),
        field("max_concat_packets", u8()),
        field("ugs_queue", p8list(data(3))),
        field("default_ranging_class", u16()),
    ]
}

fn docsis1_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("ds_frequency", u32()),
        field("us_channel", u8()),
        field("us_power", u16()),
        field("startup_ds_frequency", u32()),
        field("startup_us_channel", u8()),
        field("startup_context", u8()),
        field("docsis10_igmp_multicast_enabled", boolean()),
        reserved(u16()),
        reserved(u32()),
        reserved(u8()),
        reserved(u8()),
        reserved(u8()),
        reserved(u8()),
        field("annex_mode_of_last_good_ds", annex_mode()),
    ]
}

pub fn docsis1() -> Group {
    Group::new(
        Magic::from_u32(0xd0c2_0100),
        "docsis1",
        Layout::Split {
            permanent: Some(docsis1_perm),
            dynamic: Some(docsis1_dyn),
        },
    )
}

// =============================================================================
// 0xf2a1f61f / halif
// =============================================================================

const HALIF_INTERFACES: Names = Names::Seq(&[
    "docsis",
    "ethernet",
    "hpna",
    "usb",
    "IP1",
    "IP2",
    "IP3",
    "IP4",
    "davic",
    "pci",
    "bluetooh",
    "802.11",
    "packet_generator",
    "IP5",
    "IP6",
    "IP7",
    "IP8",
    "wan_ethernet",
    "scb",
    "itc",
    "moca",
]);

/// Bits 4 and 5 are unnamed in shipped firmware.
const HALIF_FEATURES3: Names = Names::Seq(&[
    "1024qam",
    "docsis20_clipping",
    "proprietary_scdma_code_matrix",
    "advance_map_run_ahead_disabled",
    "",
    "",
    "us_priority_queue_disabled",
]);

fn halif_perm(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("interfaces", bitmask(Width::W32, HALIF_INTERFACES)),
        field("cm_mac", mac()),
        field("ip2_mac", mac()),
        field("rg_mac", mac()),
        field("ip4_mac", mac()),
        reserved(u8()),
        field("default_hal_debug_zones", u32()),
        field("board_rev", u8()),
        field("usb_vid", u16()).disabled(),
        field("usb_pid", u16()).disabled(),
        field("usb_mac", mac()),
        field(
            "features1",
            bitmask(
                Width::W8,
                Names::Seq(&["auto_negotiate", "full_duplex", "reject_cam_disabled"]),
            ),
        ),
        field("link_speed_mbps", u16()),
        field("hpna_msg_level", u32()),
        field("ds_tuner_type", u8()),
        field("us_amp_type", u8()),
        field("ds_reference_freq", u32()),
        field("us_reference_freq", u32()),
        field("phy_input_freq", u32()),
        field("annex_mode", annex_mode()),
        field(
            "features2",
            bitmask(
                Width::W8,
                Names::Seq(&[
                    "watchdog",
                    "bluetooth_master",
                    "remote_flash_access",
                    "fpm_token_depletion_watchdog_disabled",
                ]),
            ),
        ),
        field("watchdog_timeout", u8()),
        field("bluetooth_local_mac", mac()),
        field("bluetooth_remote_mac", mac()),
        reserved(data(0x16)),
        field("ip5_mac", mac()),
        field("mta_mac", mac()),
        field("veth_mac", mac()),
        field("ip8_mac", mac()),
        field("spreader_scale", u8()),
        field("us_sample_freq", u32()),
        field("features3", bitmask(Width::W8, HALIF_FEATURES3)),
        field("ds_agi", u8()).disabled(),
        field("ds_agt", u8()).disabled(),
        field("stathr", u16()).disabled(),
        field("stagi", u32()).disabled(),
        field("stpga1", u32()).disabled(),
        field("stagt", u32()).disabled(),
        field("stabw1", u16()).disabled(),
        field("stabw2", u16()).disabled(),
        // u16 bufsize, u16 buf_count
        field("bcmalloc_settings", p8list(data(4))),
        field("num_shack_tries", u8()),
        field("usb_rndis_driver", boolean()),
        field("power_save", boolean()),
        field("optimized_3420_freq_map", boolean()),
        field("high_output_pa", boolean()),
        reserved(u8()),
        field(
            "diplexer_type",
            enumeration(Width::W8, Names::Seq(&["lowsplit", "midsplit", ""])),
        ),
        field("enabled_tuner_count", u8()),
        field("cm_tuner_wideband", boolean()),
    ]
}

fn halif_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("fap_bypass_enabled", boolean()),
        // bits 0-3: wakeup timer in units of 84ms; power down after 2.7s
        // unless auto_power_down_5400ms is set
        field(
            "eth_auto_power_down_reg",
            bitmask(
                Width::W16,
                Names::Seq(&[
                    "wakeup_timer_select_0",
                    "wakeup_timer_select_1",
                    "wakeup_timer_select_2",
                    "wakeup_timer_select_3",
                    "auto_power_down_5400ms",
                    "auto_power_down_enabled",
                ]),
            ),
        ),
    ]
}

pub fn halif() -> Group {
    Group::new(
        Magic::from_u32(0xf2a1_f61f),
        "halif",
        Layout::Split {
            permanent: Some(halif_perm),
            dynamic: Some(halif_dyn),
        },
    )
}

// =============================================================================
// bpi / bpi, Ebpi / ebpi
// =============================================================================

fn bpi_perm(_ctx: &Context) -> Vec<FieldSpec> {
    [
        "bpi_public_key",
        "bpi_private_key",
        "bpiplus_root_public_key",
        "bpiplus_cm_certificate",
        "bpiplus_ca_certificate",
        "bpiplus_cvc_root_certificate",
        "bpiplus_cvc_ca_certificate",
    ]
    .into_iter()
    .map(|name| field(name, p16data()))
    .collect()
}

fn bpi_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("code_access_start", data(12)),
        field("cvc_access_start", data(12)),
        reserved(u8()),
    ]
}

fn bpi_layout() -> Layout {
    Layout::Split {
        permanent: Some(bpi_perm),
        dynamic: Some(bpi_dyn),
    }
}

pub fn bpi() -> Group {
    Group::new(Magic::new(b"bpi "), "bpi", bpi_layout())
}

/// Same layout as `bpi`, used by eCos builds with extended BPI support.
pub fn ebpi() -> Group {
    Group::new(Magic::new(b"Ebpi"), "ebpi", bpi_layout())
}

// =============================================================================
// RCA / thomcm
// =============================================================================

fn thomcm_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        reserved(data(2)),
        field("scan_list_freqs", p8list(u32())),
        field("us_alert_poll_period", u32()),
        field("us_alert_thresh_dbmv_min", u32()),
        field("us_alert_thresh_dbmv_max", u32()),
        reserved(data(1)),
        field("html_bitstring", p8data()),
        field(
            "message_led",
            enumeration(Width::W8, Names::Seq(&["", "off", "on", "flashing"])),
        ),
        reserved(data(5)),
        field("last_known_freqs", p8list(u32())),
        reserved(data(2)),
    ]
}

pub fn thomcm() -> Group {
    Group::new(
        Magic::new(b"RCA "),
        "thomcm",
        Layout::Split {
            permanent: None,
            dynamic: Some(thomcm_dyn),
        },
    )
}
