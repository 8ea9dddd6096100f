//! Event and reset logs.

use crate::context::Context;
use crate::group::{Group, Layout, Magic};
use crate::model::builder::*;
use crate::model::FieldSpec;

// =============================================================================
// CMEV / cmlog
// =============================================================================

fn cm_event(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("data", data(8)),
        field("time1", timestamp()),
        field("time2", timestamp()),
        field("msg", p16string()),
    ]
}

fn cmlog_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        reserved(u8()),
        field("log", p8list(compound("log-entry", cm_event))),
    ]
}

pub fn cmlog() -> Group {
    Group::new(Magic::new(b"CMEV"), "cmlog", Layout::Shared(cmlog_fields))
}

// =============================================================================
// RSTL, CMBL, EMBL / rstl, cmbl, embl
// =============================================================================

fn log_entry(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        field("time", timestamp()),
        field("msg", p16istring()),
        reserved(data(2)),
    ]
}

fn message_log_fields(_ctx: &Context) -> Vec<FieldSpec> {
    vec![
        reserved(data(1)),
        field("log", p8list(compound("log-entry", log_entry))),
    ]
}

/// Reset log.
pub fn rstl() -> Group {
    Group::new(Magic::new(b"RSTL"), "rstl", Layout::Shared(message_log_fields))
}

/// CM boot log.
pub fn cmbl() -> Group {
    Group::new(Magic::new(b"CMBL"), "cmbl", Layout::Shared(message_log_fields))
}

/// eMTA boot log.
pub fn embl() -> Group {
    Group::new(Magic::new(b"EMBL"), "embl", Layout::Shared(message_log_fields))
}
