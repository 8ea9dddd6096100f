//! Decode context: format variant, firmware version, capability flags and
//! device options.
//!
//! Every field-list computation receives a [`Context`]. The codec never builds
//! one from device knowledge itself; the caller (usually a device profile)
//! supplies it.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::error::Error;

/// Storage form of a settings group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Canonical on-flash form.
    Permanent,
    /// Runtime / alternate form.
    Dynamic,
}

impl Format {
    /// Both formats, in declaration order.
    pub const ALL: [Format; 2] = [Format::Permanent, Format::Dynamic];
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Permanent => f.write_str("perm"),
            Format::Dynamic => f.write_str("dyn"),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "perm" | "permanent" => Ok(Format::Permanent),
            "dyn" | "dynamic" => Ok(Format::Dynamic),
            _ => Err(Error::invalid(s, "expected 'perm' or 'dyn'")),
        }
    }
}

/// Firmware settings revision, `major.minor` packed as `major << 8 | minor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u32);

impl Version {
    /// Creates a version from its major and minor parts.
    pub const fn new(major: u8, minor: u8) -> Self {
        Version(((major as u32) << 8) | minor as u32)
    }

    /// Creates a version from its packed numeric form.
    pub const fn from_num(num: u32) -> Self {
        Version(num)
    }

    /// Returns the packed numeric form.
    pub const fn num(&self) -> u32 {
        self.0
    }

    pub const fn major(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn minor(&self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

impl FromStr for Version {
    type Err = Error;

    /// Accepts `major.minor`, `0x`-prefixed hex or a decimal packed number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::invalid(s, "expected 'major.minor', hex or decimal version");
        if let Some((major, minor)) = s.split_once('.') {
            let major = major.parse::<u8>().map_err(|_| bad())?;
            let minor = minor.parse::<u8>().map_err(|_| bad())?;
            return Ok(Version::new(major, minor));
        }
        let num = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16).map_err(|_| bad())?,
            None => s.parse::<u32>().map_err(|_| bad())?,
        };
        Ok(Version(num))
    }
}

/// Well-known capability flags supplied by device profiles.
pub mod flags {
    /// Alternate user-interface layout with an extra reserved block.
    pub const USERIF_ALT: u32 = 1 << 0;
    /// Alternate user-interface layout without the reserved block.
    pub const USERIF_ALT_SHORT: u32 = 1 << 1;
}

/// Well-known option bag keys.
pub mod options {
    /// Minutes east of UTC used when pretty-printing timestamps.
    pub const TZ_OFFSET: &str = "tz_offset";
    /// Swap the TCP/UDP codes of the router protocol enum.
    pub const RG_PROTO_REVERSED: &str = "rg.proto_reversed";
    /// Read the Wi-Fi WPS device pin with a 16-bit length prefix.
    pub const WPS_PIN_P16: &str = "bcmwifi.wps_pin_p16";
}

/// Everything a field-list computation may depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub format: Format,
    pub version: Version,
    pub flags: u32,
    pub options: FxHashMap<String, String>,
}

impl Context {
    /// Creates a context for the given format with version 0 and no flags.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            version: Version::default(),
            flags: 0,
            options: FxHashMap::default(),
        }
    }

    /// Sets the version.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Sets the capability flags.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Adds a device option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Returns a copy with a different format.
    pub fn for_format(&self, format: Format) -> Self {
        Self {
            format,
            ..self.clone()
        }
    }

    /// Returns true if any bit of `mask` is set.
    pub fn has_flag(&self, mask: u32) -> bool {
        self.flags & mask != 0
    }

    /// Looks up a device option.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Interprets a device option as a boolean (`1`, `true`, `yes`, `on`).
    pub fn option_bool(&self, key: &str) -> bool {
        matches!(self.option(key), Some("1" | "true" | "yes" | "on"))
    }

    /// Timestamp display offset in minutes east of UTC.
    pub fn tz_offset_min(&self) -> i32 {
        self.option(options::TZ_OFFSET)
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|v| (-1440..=1440).contains(v))
            .unwrap_or(0)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Format::Permanent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(0, 2) > Version::new(0, 1));
        assert!(Version::new(1, 0) > Version::new(0, 255));
        assert_eq!(Version::new(0, 0x16).num(), 0x0016);
    }

    #[test]
    fn test_version_parse() {
        assert_eq!("0.22".parse::<Version>().unwrap(), Version::new(0, 22));
        assert_eq!("0x0016".parse::<Version>().unwrap(), Version::new(0, 22));
        assert_eq!("22".parse::<Version>().unwrap(), Version::new(0, 22));
        assert!("x.y".parse::<Version>().is_err());
        assert_eq!(Version::new(1, 3).to_string(), "1.3");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("perm".parse::<Format>().unwrap(), Format::Permanent);
        assert_eq!("dynamic".parse::<Format>().unwrap(), Format::Dynamic);
        assert!("flash".parse::<Format>().is_err());
    }

    #[test]
    fn test_context_options() {
        let ctx = Context::new(Format::Dynamic)
            .with_flags(flags::USERIF_ALT)
            .with_option(options::RG_PROTO_REVERSED, "yes")
            .with_option(options::TZ_OFFSET, "120");
        assert!(ctx.has_flag(flags::USERIF_ALT | flags::USERIF_ALT_SHORT));
        assert!(!ctx.has_flag(flags::USERIF_ALT_SHORT));
        assert!(ctx.option_bool(options::RG_PROTO_REVERSED));
        assert!(!ctx.option_bool("missing"));
        assert_eq!(ctx.tz_offset_min(), 120);
        assert_eq!(ctx.for_format(Format::Permanent).tz_offset_min(), 120);
    }
}
