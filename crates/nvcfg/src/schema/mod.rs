//! Built-in group declarations.
//!
//! Each group is data: a magic tag, an alias and one field-list function per
//! format. Definitions read the [`Context`](crate::Context) to gate fields on
//! version, capability flags and device options.

pub mod common;
pub mod docsis;
pub mod logs;
pub mod router;
pub mod system;
pub mod wifi;

use tracing::warn;

use crate::group::Group;
use crate::registry::Registry;

/// All built-in groups in registration order.
pub fn builtin() -> Vec<Group> {
    vec![
        system::bfc(),
        system::userif(),
        wifi::bcmwifi(),
        wifi::bcmwifi2(),
        wifi::tmmwifi(),
        router::rg(),
        router::dhcp(),
        router::csp(),
        router::firewall(),
        logs::cmlog(),
        router::upc(),
        logs::rstl(),
        logs::cmbl(),
        logs::embl(),
        system::thombfc(),
        docsis::bpi(),
        docsis::ebpi(),
        docsis::halif(),
        docsis::thomcm(),
        system::msc(),
        wifi::guestwifi2(),
        wifi::guestwifi(),
        system::sa(),
        system::fact(),
        system::snmp(),
        docsis::docsis1(),
        system::tch(),
    ]
}

/// Adds the built-in groups to `registry`. Groups whose tag or alias is
/// already taken are skipped with a warning.
pub fn register_builtin(registry: &mut Registry) {
    for group in builtin() {
        let alias = group.alias();
        if let Err(err) = registry.register(group) {
            warn!(alias, %err, "skipping built-in group");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, Format};
    use rustc_hash::FxHashSet;

    #[test]
    fn test_builtin_tags_unique() {
        let groups = builtin();
        assert_eq!(groups.len(), 27);
        let magics: FxHashSet<_> = groups.iter().map(Group::magic).collect();
        let aliases: FxHashSet<_> = groups.iter().map(Group::alias).collect();
        assert_eq!(magics.len(), 27);
        assert_eq!(aliases.len(), 27);
    }

    #[test]
    fn test_every_group_supports_a_format() {
        for group in builtin() {
            let supported = Format::ALL
                .iter()
                .filter(|f| group.layout().supports(**f))
                .count();
            assert!(supported > 0, "{} has no layout", group.alias());
        }
    }

    #[test]
    fn test_defaults_encode() {
        for group in builtin() {
            for format in Format::ALL {
                let ctx = Context::new(format);
                let mut g = group.clone();
                if g.init(&ctx).is_err() {
                    continue;
                }
                let bytes = g.encode().unwrap();
                assert_eq!(bytes.len(), g.resolved_size(&ctx).unwrap(), "{}", g.alias());
            }
        }
    }

    #[test]
    fn test_register_twice_keeps_first() {
        let mut registry = Registry::new();
        register_builtin(&mut registry);
        register_builtin(&mut registry);
        assert_eq!(registry.len(), 27);
    }
}
