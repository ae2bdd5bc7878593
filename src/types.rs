use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;
use strum_macros::{Display, EnumString};

/// The fixed 12 byte header found at the start of every DNS message.
///
/// See [rfc1035#section-4.1.1].
///
/// [rfc1035#section-4.1.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// 16-bit identifier assigned by the program that generates the query.
    /// It is copied into the corresponding reply.
    pub id: u16,

    /// The QR, Opcode, AA, TC, RD, RA, Z, AD, CD and RCODE bits.
    pub flags: u16,

    pub qd_count: u16,
    pub an_count: u16,
    pub ns_count: u16,
    pub ar_count: u16,
}

impl Header {
    /// Length of the header on the wire.
    pub const LEN: usize = 12;

    /// Flags for a standard query with Recursion Desired set.
    pub const STANDARD_QUERY: u16 = 0x0100;

    /// Specifies whether this message is a query (false), or a response (true).
    pub fn is_response(&self) -> bool {
        self.flags & 0x8000 != 0
    }

    /// Truncation - specifies that this message was truncated.
    pub fn truncated(&self) -> bool {
        self.flags & 0x0200 != 0
    }

    /// Recursion Desired.
    pub fn recursion_desired(&self) -> bool {
        self.flags & 0x0100 != 0
    }

    /// Recursion Available.
    pub fn recursion_available(&self) -> bool {
        self.flags & 0x0080 != 0
    }

    /// The response code, or `None` if it is an unassigned value.
    pub fn rcode(&self) -> Option<Rcode> {
        num_traits::FromPrimitive::from_u16(self.flags & 0x000F)
    }
}

/// Response Codes.
/// See [rfc1035] and <https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-6>
///
/// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
#[repr(u16)]
pub enum Rcode {
    /// No Error
    NoError = 0,

    /// Format Error
    FormErr = 1,

    /// Server Failure
    ServFail = 2,

    /// Non-Existent Domain
    NXDomain = 3,

    /// Not Implemented
    NotImp = 4,

    /// Query Refused
    Refused = 5,

    /// Name Exists when it should not. See [rfc2136].
    ///
    /// [rfc2136]: https://datatracker.ietf.org/doc/html/rfc2136
    YXDomain = 6,

    /// RR Set Exists when it should not.
    YXRRSet = 7,

    /// RR Set that should exist does not.
    NXRRSet = 8,

    /// Not Authoritative, or Not Authorized.
    NotAuth = 9,

    /// Name not contained in zone.
    NotZone = 10,
    // 11-15 Not handled
}

impl Default for Rcode {
    fn default() -> Self {
        Rcode::NoError
    }
}

/// Resource Record Type. Only the types this crate can decode are listed.
///
// When adding a Type, a parsing function must be added in resource.rs.
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
#[repr(u16)]
pub enum Type {
    /// (Default) IPv4 Address.
    A = 1,

    /// Authoritative name server.
    NS = 2,

    /// Canonical name for an alias.
    CNAME = 5,

    /// Mail exchange.
    MX = 15,

    /// IPv6 Address.
    AAAA = 28,
}

impl Default for Type {
    fn default() -> Self {
        Type::A
    }
}

impl Type {
    /// Looks up a mnemonic such as `"aaaa"` or `"MX"`, ignoring case.
    ///
    /// Anything unrecognised, including the empty string, is treated as [`Type::A`].
    pub fn from_mnemonic(s: &str) -> Type {
        s.trim().to_ascii_uppercase().parse().unwrap_or_default()
    }

    /// The IANA assigned type code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Returns the Type for a IANA type code, if it is one we know.
    pub fn from_code(code: u16) -> Option<Type> {
        num_traits::FromPrimitive::from_u16(code)
    }
}

/// Resource Record Class.
#[derive(Copy, Clone, Debug, Display, EnumString, FromPrimitive, PartialEq, Eq)]
#[repr(u16)]
pub enum Class {
    /// (Default) The Internet (IN), see [rfc1035].
    ///
    /// [rfc1035]: https://datatracker.ietf.org/doc/html/rfc1035
    #[strum(serialize = "IN")]
    Internet = 1,
}

impl Default for Class {
    fn default() -> Self {
        Class::Internet
    }
}

/// A decoded answer value.
///
// This should be kept in sync with Type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Resource {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),

    CNAME(String),
    NS(String),

    MX(MX),
}

impl Resource {
    /// The record type this value was decoded from.
    pub fn r#type(&self) -> Type {
        match self {
            Resource::A(_) => Type::A,
            Resource::AAAA(_) => Type::AAAA,
            Resource::CNAME(_) => Type::CNAME,
            Resource::NS(_) => Type::NS,
            Resource::MX(_) => Type::MX,
        }
    }
}

/// Mail exchange record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MX {
    /// The preference given to this RR among others at the same owner.
    /// Lower values are preferred.
    pub preference: u16,

    /// A host willing to act as a mail exchange for the owner name.
    pub exchange: String,
}

/// An answer Resource Record (RR) that matched the requested type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// The owner name, with any compression resolved.
    pub name: String,

    /// The number of seconds that the resource record may be cached
    /// before the source of the information should again be consulted.
    pub ttl: Duration,

    pub resource: Resource,
}

impl Record {
    pub fn r#type(&self) -> Type {
        self.resource.r#type()
    }
}

/// A decoded DNS response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub header: Header,

    /// Answers of the requested type, in the order they appeared.
    pub answers: Vec<Record>,
}

impl Response {
    /// True when no answer of the requested type was found.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Returns just the answer values.
    pub fn resources(&self) -> Vec<Resource> {
        self.answers.iter().map(|r| r.resource.clone()).collect()
    }
}
