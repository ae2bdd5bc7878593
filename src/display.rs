//! Implements the Display trait for the various types, so they output
//! in `dig` style.

use crate::types::Class;
use crate::Record;
use crate::Resource;
use crate::MX;
use std::fmt;

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::A(ip) => ip.fmt(f),
            Resource::AAAA(ip) => ip.fmt(f),

            Resource::NS(name) => name.fmt(f),
            Resource::CNAME(name) => name.fmt(f),

            Resource::MX(mx) => mx.fmt(f),
        }
    }
}

impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // "10 aspmx.l.google.com"
        write!(
            f,
            "{preference} {exchange}",
            preference = self.preference,
            exchange = self.exchange,
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{name:<20} {ttl:>4} {class:4} {rtype:6} {resource}",
            name = self.name,
            ttl = self.ttl.as_secs(),
            class = Class::Internet.to_string(),
            rtype = self.r#type().to_string(),
            resource = self.resource,
        )
    }
}
