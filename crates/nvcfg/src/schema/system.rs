//! Firmware, console, management and vendor system groups.

use crate::context::{flags, Context, Version};
use crate::group::{Group, Layout, Magic};
use crate::model::builder::*;
use crate::model::{FieldSpec, Names, Width};
use crate::schema::common::{console_mode_rw_ro, ipstacks};

// =============================================================================
// CMAp / bfc
// =============================================================================

fn bfc_perm(_ctx: &Context) -> Vec<FieldSpec> {
    vec![field(
        "console_features",
        bitmask(
            Width::W8,
            Names::Seq(&[
                "stop_at_console",
                "skip_driver_init_prompt",
                "stop_at_console_prompt",
            ]),
        ),
    )]
}

fn bfc_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field(
            "serial_console_mode",
            enumeration(Width::W32, Names::Seq(&["disabled", "ro", "rw", "factory"])),
        ),
        field(
            "features",
            bitmask(Width::W32, Names::Seq(&["aux_serial_console"])),
        ),
    ]
}

pub fn bfc() -> Group {
    Group::new(
        Magic::new(b"CMAp"),
        "bfc",
        Layout::Split {
            permanent: Some(bfc_perm),
            dynamic: Some(bfc_dyn),
        },
    )
}

// =============================================================================
// MLog / userif
// =============================================================================

const REMOTE_ACC_METHODS: Names = Names::Seq(&["telnet", "http", "ssh"]);

fn remote_acc_methods() -> crate::model::Node {
    bitmask(Width::W8, REMOTE_ACC_METHODS)
}

fn userif_perm(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field(
            "log_severities",
            bitmask(
                Width::W32,
                Names::Seq(&["fatal", "error", "warning", "fn_entry_exit", "trace", "info"]),
            ),
        ),
        field(
            "log_fields",
            bitmask(
                Width::W8,
                Names::Seq(&[
                    "severity",
                    "instance",
                    "function",
                    "module",
                    "timestamp",
                    "thread",
                    "milliseconds",
                ]),
            ),
        ),
        field("remote_acc_methods", remote_acc_methods()),
        field("remote_acc_user", data(16)),
        field("remote_acc_pass", data(16)),
        field("remote_acc_ip", ip4()),
        field("remote_acc_subnet", ip4()),
        field("remote_acc_router", ip4()),
        field("remote_acc_ipstack", u8()),
        reserved(u8()).disabled(),
        field("virtual_enet_ipstack", u8()),
    ]
}

fn userif_dyn(ctx: &Context) -> Vec<FieldSpec> {
    let alt = ctx.has_flag(flags::USERIF_ALT);
    let alt_short = ctx.has_flag(flags::USERIF_ALT_SHORT);

    let mut fields = vec![
        field("http_user", p16string_max(32)),
        field("http_pass", p16string_max(32)),
        field("http_admin_user", p16string_max(32)),
        field("http_admin_pass", p16string_max(32)),
    ];

    if alt || alt_short {
        fields.extend([
            field("http_local_user", p16string_max(16)),
            field("http_local_pass", p16string_max(16)),
            field("http_default_pass", p16string()),
            field("http_erouter_user", p16string()),
            field("http_erouter_pass", p16string()),
            field("remote_acc_methods", remote_acc_methods()),
            field("remote_acc_user", zstring(16)),
            reserved(data(112)).when(alt),
        ]);
    } else {
        fields.extend([
            field("remote_acc_methods", remote_acc_methods()),
            field("remote_acc_user", zstring(16)),
            field("remote_acc_pass", zstring(16)),
        ]);
    }

    fields.extend([
        field("telnet_ipstacks", ipstacks()),
        field("ssh_ipstacks", ipstacks()),
        field("remote_acc_timeout", u32()),
        field("http_ipstacks", ipstacks()),
        field("http_adv_ipstacks", ipstacks()),
        field("http_seed", p16string()),
        field("http_acl_hosts", p16data()),
        field("http_idle_timeout", u32()),
        field("log_exceptions", boolean()).when(alt || alt_short),
    ]);
    fields
}

pub fn userif() -> Group {
    Group::new(
        Magic::new(b"MLog"),
        "userif",
        Layout::Split {
            permanent: Some(userif_perm),
            dynamic: Some(userif_dyn),
        },
    )
}

// =============================================================================
// THOM / thombfc
// =============================================================================

fn thombfc_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![field(
        "serial_console_mode",
        bitmask(Width::W8, Names::Seq(&["", "read", "write", "factory"])),
    )]
}

pub fn thombfc() -> Group {
    Group::new(Magic::new(b"THOM"), "thombfc", Layout::Shared(thombfc_fields))
}

// =============================================================================
// TCH / tch
// =============================================================================

fn tch_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![field("serial_console_mode", console_mode_rw_ro())]
}

pub fn tch() -> Group {
    Group::new(
        Magic::new(b"TCH "),
        "tch",
        Layout::Split {
            permanent: None,
            dynamic: Some(tch_dyn),
        },
    )
}

// =============================================================================
// snmp / snmp
// =============================================================================

fn snmp_perm(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("allow_config", boolean()),
        reserved(data(0x20)),
        reserved(data(0x80)),
        reserved(data(0x80)),
        field("sys_contact", zstring(0x80)),
        field("sys_name", zstring(0x80)),
        field("sys_location", zstring(0x80)),
        reserved(data(0x80)),
        reserved(data(0x80)),
        reserved(u8()),
        reserved(data(0x80)),
        field("serial_number", zstring(0x40)),
        field("max_download_tries", u8()),
        reserved(data(4)),
        reserved(data(0x80)),
    ]
}

fn snmp_dyn(ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field(
            "docs_dev_sw_admin_status",
            enumeration(
                Width::W8,
                Names::Seq(&[
                    "unknown",
                    "upgrade_from_mgmt",
                    "allow_provisioning_upgrade",
                    "ignore_provisioning_upgrade",
                ]),
            ),
        ),
        field(
            "docs_dev_sw_oper_status",
            enumeration(
                Width::W8,
                Names::Seq(&[
                    "unknown",
                    "in_progress",
                    "complete_from_provisioning",
                    "complete_from_mgmt",
                    "failed",
                    "other",
                ]),
            ),
        ),
        field("docs_dev_sw_file_name", zstring(0x100)),
        field("docs_dev_sw_server", ip4()),
        reserved(u16()).when(ctx.version < Version::from_num(0x0002)),
        // element count reused by data following num_engine_boots
        field("_list1", p16list(data(12))),
        reserved(p16list(data(4 + 2 + 4 + 4))),
        field("sys_contact", zstring(0x100)),
        field("sys_name", zstring(0x100)),
        field("sys_location", zstring(0x100)),
        field("num_download_tries", u8()),
        field("num_engine_boots", u32()),
    ]
}

pub fn snmp() -> Group {
    Group::new(
        Magic::new(b"snmp"),
        "snmp",
        Layout::Split {
            permanent: Some(snmp_perm),
            dynamic: Some(snmp_dyn),
        },
    )
}

// =============================================================================
// FACT / fact
// =============================================================================

fn fact_perm(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("private_mib_enabled", u16()),
        field("enable_keys", array(p16string(), 8)),
        field("serial_numbers", array(p16string(), 4)),
        field("temporary_mib_enabled", boolean()),
    ]
}

pub fn fact() -> Group {
    Group::new(
        Magic::new(b"FACT"),
        "fact",
        Layout::Split {
            permanent: Some(fact_perm),
            dynamic: None,
        },
    )
}

// =============================================================================
// Scie / sa
// =============================================================================

fn sa_perm(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("ds_search_plan", u8()),
        reserved(u32()),
        reserved(u8()),
        reserved(u8()),
        field("hw_model", zstring(0x100)),
        field("hw_version", zstring(0x100)),
        field("hw_serial", zstring(0x100)),
        field("hw_cm_mac", zstring(0x100)),
    ]
}

fn sa_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("access_protect_delay", u32()),
        field(
            "access_protect_mode",
            enumeration(Width::W8, Names::Seq(&["disabled", "enabled", "auto"])),
        ),
        field(
            "features",
            bitmask(
                Width::W32,
                Names::Seq(&[
                    "igmp_proxy",
                    "web_switch",
                    "ftp_improvement_switch",
                    "console_enabled",
                    "",
                    "console_read_only",
                ]),
            ),
        ),
        reserved(data(0x28)),
        reserved(array(u32(), 10)),
        reserved(array(u8(), 2)),
        field("mta_certificate_date", timestamp()),
        field(
            "dhcp_requirements",
            enumeration(
                Width::W8,
                Names::Seq(&["use_opt_122", "require_opt_122_or_177", "use_opt_177"]),
            ),
        ),
        field("telnet_username", p8string()),
        field("telnet_password", p8string()),
        reserved(u8()),
        reserved(u8()),
        field("mta_off_hook_current", array(u8(), 2)),
        field(
            "telnet_mode",
            enumeration(Width::W8, Names::Seq(&["disabled", "enabled", "enabled_by_mib"])),
        ),
        reserved(u8()),
        field("mta_off_hook_power", array(u8(), 2)),
        field("mta_fast_busy_signal", boolean()),
        reserved(u8()),
        field("batt_measured_capacity", u32()),
        reserved(array(u32(), 5)),
        field("batt_avg_discharge_current", u32()),
        // audit and event logs
        reserved(data(0x435c)),
        field("mta_rtp_mute_on_local_ring_back", boolean()),
        field("cm_timer4", u32()),
        field("mta_force_t38", boolean()),
        field("serial_console_mode", console_mode_rw_ro()),
        field("multicast_promiscous_mode", boolean()),
        field("docsis1x_qpsk_burst_preamble", u32()),
        field("last_upgrade_sw_name", zstring(0x41)),
    ]
}

pub fn sa() -> Group {
    Group::new(
        Magic::new(b"Scie"),
        "sa",
        Layout::Split {
            permanent: Some(sa_perm),
            dynamic: Some(sa_dyn),
        },
    )
}

// =============================================================================
// MSC. / msc
// =============================================================================

fn msc_dyn(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        reserved(data(1)),
        field("server_name", p8istring()),
        reserved(data(6)),
        reserved(data(2)),
    ]
}

pub fn msc() -> Group {
    Group::new(
        Magic::new(b"MSC."),
        "msc",
        Layout::Split {
            permanent: None,
            dynamic: Some(msc_dyn),
        },
    )
}
