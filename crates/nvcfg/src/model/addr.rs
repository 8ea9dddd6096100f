//! Network address leaves.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::codec::primitives::{Reader, Writer};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::model::node::Leaf;

/// 6-byte hardware address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mac(pub [u8; 6]);

impl Mac {
    pub fn new() -> Self {
        Self::default()
    }

    /// True for `00:00:00:00:00:00`, the usual end-of-table marker.
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl Leaf for Mac {
    fn size(&self) -> usize {
        6
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        self.0 = reader.read_array()?;
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn raw(&self) -> String {
        self.0
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        let bad = || Error::invalid(text, "expected 'xx:xx:xx:xx:xx:xx'");
        let parts: Vec<&str> = text.split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(bad());
        }
        let mut mac = [0u8; 6];
        for (byte, part) in mac.iter_mut().zip(parts) {
            if part.is_empty() || part.len() > 2 {
                return Err(bad());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| bad())?;
        }
        self.0 = mac;
        Ok(())
    }
}

/// IPv4 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ip4(pub Ipv4Addr);

impl Ip4 {
    pub fn new() -> Self {
        Self(Ipv4Addr::UNSPECIFIED)
    }
}

impl Default for Ip4 {
    fn default() -> Self {
        Self::new()
    }
}

impl Leaf for Ip4 {
    fn size(&self) -> usize {
        4
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        self.0 = Ipv4Addr::from(reader.read_array::<4>()?);
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bytes(&self.0.octets());
        Ok(())
    }

    fn raw(&self) -> String {
        self.0.to_string()
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        self.0 = text
            .trim()
            .parse()
            .map_err(|_| Error::invalid(text, "expected an IPv4 address"))?;
        Ok(())
    }
}

/// IPv6 address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ip6(pub Ipv6Addr);

impl Ip6 {
    pub fn new() -> Self {
        Self(Ipv6Addr::UNSPECIFIED)
    }
}

impl Default for Ip6 {
    fn default() -> Self {
        Self::new()
    }
}

impl Leaf for Ip6 {
    fn size(&self) -> usize {
        16
    }

    fn decode(&mut self, reader: &mut Reader<'_>, _ctx: &Context) -> Result<()> {
        self.0 = Ipv6Addr::from(reader.read_array::<16>()?);
        Ok(())
    }

    fn encode(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bytes(&self.0.octets());
        Ok(())
    }

    fn raw(&self) -> String {
        self.0.to_string()
    }

    fn parse(&mut self, text: &str) -> Result<()> {
        self.0 = text
            .trim()
            .parse()
            .map_err(|_| Error::invalid(text, "expected an IPv6 address"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac() {
        let data = [0x00, 0x10, 0x18, 0xde, 0xad, 0x01];
        let mut mac = Mac::new();
        assert!(mac.is_zero());
        mac.decode(&mut Reader::new(&data), &Context::default()).unwrap();
        assert_eq!(mac.raw(), "00:10:18:de:ad:01");
        assert!(!mac.is_zero());

        mac.parse("AA-BB-CC-00-11-22").unwrap();
        assert_eq!(mac.0, [0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22]);
        assert!(mac.parse("aa:bb:cc").is_err());
        assert!(mac.parse("aa:bb:cc:dd:ee:fff").is_err());
    }

    #[test]
    fn test_ip4() {
        let mut ip = Ip4::new();
        assert_eq!(ip.raw(), "0.0.0.0");
        ip.parse("192.168.100.1").unwrap();
        let mut writer = Writer::new();
        ip.encode(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), vec![192, 168, 100, 1]);
        assert!(ip.parse("300.1.1.1").is_err());
    }

    #[test]
    fn test_ip6() {
        let mut data = [0u8; 16];
        data[0] = 0xfe;
        data[1] = 0x80;
        data[15] = 0x01;
        let mut ip = Ip6::new();
        ip.decode(&mut Reader::new(&data), &Context::default()).unwrap();
        assert_eq!(ip.raw(), "fe80::1");
    }
}
