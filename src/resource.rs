use crate::bail;
use crate::errors::Result;
use crate::name::read_name;
use crate::types::{Resource, Type, MX};
use std::convert::TryInto;
use std::net::{Ipv4Addr, Ipv6Addr};

impl Resource {
    /// Decodes the RDATA found at `msg[start..start + len]` as the given type.
    ///
    /// `msg` is the whole message, so names inside the RDATA can follow
    /// compression pointers to anywhere before them.
    pub fn parse(r#type: Type, msg: &[u8], start: usize, len: usize) -> Result<Resource> {
        let rdata = match msg.get(start..start + len) {
            Some(rdata) => rdata,
            None => bail!(TruncatedMessage {
                offset: start,
                len,
                size: msg.len(),
            }),
        };

        let f = match r#type {
            Type::A => parse_a,
            Type::AAAA => parse_aaaa,
            Type::CNAME => parse_cname,
            Type::NS => parse_ns,
            Type::MX => parse_mx,
        };

        // Call the appropriate parser function.
        f(msg, start, rdata)
    }
}

fn parse_a(_msg: &[u8], _start: usize, rdata: &[u8]) -> Result<Resource> {
    let octets: [u8; 4] = match rdata.try_into() {
        Ok(octets) => octets,
        Err(_) => bail!(RecordTooShort {
            rtype: Type::A,
            len: rdata.len(),
            expected: 4,
        }),
    };

    Ok(Resource::A(Ipv4Addr::from(octets)))
}

fn parse_aaaa(_msg: &[u8], _start: usize, rdata: &[u8]) -> Result<Resource> {
    let octets: [u8; 16] = match rdata.try_into() {
        Ok(octets) => octets,
        Err(_) => bail!(RecordTooShort {
            rtype: Type::AAAA,
            len: rdata.len(),
            expected: 16,
        }),
    };

    Ok(Resource::AAAA(Ipv6Addr::from(octets)))
}

fn parse_cname(msg: &[u8], start: usize, rdata: &[u8]) -> Result<Resource> {
    Ok(Resource::CNAME(parse_name(msg, start, rdata.len())?))
}

fn parse_ns(msg: &[u8], start: usize, rdata: &[u8]) -> Result<Resource> {
    Ok(Resource::NS(parse_name(msg, start, rdata.len())?))
}

fn parse_mx(msg: &[u8], start: usize, rdata: &[u8]) -> Result<Resource> {
    // A 16 bit preference followed by at least the root label.
    if rdata.len() < 3 {
        bail!(RecordTooShort {
            rtype: Type::MX,
            len: rdata.len(),
            expected: 3,
        });
    }

    let preference = u16::from_be_bytes([rdata[0], rdata[1]]);
    let exchange = parse_name(msg, start + 2, rdata.len() - 2)?;

    Ok(Resource::MX(MX {
        preference,
        exchange,
    }))
}

/// Reads a name that must fit inside the `len` bytes at `start`. Pointers it
/// contains may still lead anywhere in the message.
fn parse_name(msg: &[u8], start: usize, len: usize) -> Result<String> {
    let (name, end) = read_name(msg, start)?;
    if end > start + len {
        bail!(TruncatedMessage {
            offset: start,
            len: end - start,
            size: start + len,
        });
    }
    Ok(name)
}
