use crate::bail;
use crate::errors::Result;
use crate::io::DNSReadExt;
use crate::name::write_name;
use crate::types::*;
use log::{debug, trace};
use std::io::Cursor;
use std::time::Duration;

/// A query for a single name and record type.
///
/// # Examples
///
/// ```rust
/// use dohdns::{Query, Type};
///
/// let req = Query::new("example.com", Type::AAAA)
///     .to_vec()
///     .expect("failed to encode DNS request");
///
/// assert_eq!(req.len(), 12 + 13 + 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    /// Transaction id. DNS over HTTPS clients should use 0, so responses
    /// are cache friendly. See [rfc8484#section-4.1].
    ///
    /// [rfc8484#section-4.1]: https://datatracker.ietf.org/doc/html/rfc8484#section-4.1
    pub id: u16,

    pub name: String,
    pub r#type: Type,
}

impl Query {
    pub fn new(name: &str, r#type: Type) -> Query {
        Query {
            id: 0,
            name: name.to_string(),
            r#type,
        }
    }

    pub fn with_id(mut self, id: u16) -> Query {
        self.id = id;
        self
    }

    /// Returns this query as a Vec<u8> ready to be sent, as defined by [rfc1035](https://datatracker.ietf.org/doc/html/rfc1035).
    ///
    /// The message is a standard recursive query with exactly one question.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut req = Vec::<u8>::with_capacity(Header::LEN + self.name.len() + 6);

        req.extend_from_slice(&self.id.to_be_bytes());
        req.extend_from_slice(&Header::STANDARD_QUERY.to_be_bytes());

        req.extend_from_slice(&1_u16.to_be_bytes()); // QDCOUNT
        req.extend_from_slice(&0_u16.to_be_bytes()); // ANCOUNT
        req.extend_from_slice(&0_u16.to_be_bytes()); // NSCOUNT
        req.extend_from_slice(&0_u16.to_be_bytes()); // ARCOUNT

        write_name(&mut req, &self.name)?;

        req.extend_from_slice(&self.r#type.code().to_be_bytes());
        req.extend_from_slice(&(Class::Internet as u16).to_be_bytes());

        Ok(req)
    }
}

/// Encodes a query for `domain`, looking up `record_type` with
/// [`Type::from_mnemonic`] (so unknown types become `A`).
pub fn encode_query(domain: &str, record_type: &str) -> Result<Vec<u8>> {
    Query::new(domain, Type::from_mnemonic(record_type)).to_vec()
}

impl Header {
    /// Parses the first 12 bytes of `buf`.
    pub fn from_slice(buf: &[u8]) -> Result<Header> {
        if buf.len() < Header::LEN {
            bail!(MalformedHeader { len: buf.len() });
        }

        let u16_at = |i: usize| u16::from_be_bytes([buf[i], buf[i + 1]]);

        Ok(Header {
            id: u16_at(0),
            flags: u16_at(2),
            qd_count: u16_at(4),
            an_count: u16_at(6),
            ns_count: u16_at(8),
            ar_count: u16_at(10),
        })
    }
}

// A helper class to hold state while the parsing is happening.
struct MessageParser<'a> {
    cur: Cursor<&'a [u8]>,

    /// Only answers of this type are decoded.
    wanted: Type,
}

impl<'a> MessageParser<'a> {
    fn new(buf: &'a [u8], wanted: Type) -> MessageParser<'a> {
        MessageParser {
            cur: Cursor::new(buf),
            wanted,
        }
    }

    /// Consume the MessageParser and returned the resulting Response.
    fn parse(mut self) -> Result<Response> {
        let header = Header::from_slice(self.cur.get_ref())?;
        self.cur.set_position(Header::LEN as u64);

        debug!(
            "response id: {}, flags: {:#06x}, questions: {}, answers: {}",
            header.id, header.flags, header.qd_count, header.an_count
        );

        let mut response = Response {
            header,
            answers: Vec::new(),
        };

        if header.an_count == 0 {
            return Ok(response);
        }

        self.skip_questions(header.qd_count)?;
        self.read_answers(header.an_count, &mut response.answers)?;

        if self.cur.remaining() > 0 {
            trace!(
                "ignoring {} bytes of authority and additional records",
                self.cur.remaining()
            );
        }

        Ok(response)
    }

    fn skip_questions(&mut self, count: u16) -> Result<()> {
        for _ in 0..count {
            self.cur.skip_name()?;
            self.cur.read_slice(4)?; // QTYPE and QCLASS
        }

        Ok(())
    }

    fn read_answers(&mut self, count: u16, answers: &mut Vec<Record>) -> Result<()> {
        for _ in 0..count {
            let name = self.cur.read_name()?;
            let r#type = self.cur.read_u16_be()?;
            let _class = self.cur.read_u16_be()?;
            let ttl = self.cur.read_u32_be()?;
            let len = self.cur.read_u16_be()? as usize;

            let start = self.cur.position() as usize;
            self.cur.read_slice(len)?;

            if r#type != self.wanted.code() {
                trace!("skipping {} byte answer of type {} for {}", len, r#type, name);
                continue;
            }

            let resource = Resource::parse(self.wanted, self.cur.get_ref(), start, len)?;
            trace!("answer {} {}", name, resource);

            answers.push(Record {
                name,
                ttl: Duration::from_secs(ttl.into()),
                resource,
            });
        }

        Ok(())
    }
}

impl Response {
    /// Decodes a response, keeping the answers of the requested type.
    ///
    /// # Errors
    ///
    /// Any malformed part of the message fails the whole decode, as the
    /// offsets of everything after it can no longer be trusted.
    pub fn from_slice(buf: &[u8], r#type: Type) -> Result<Response> {
        MessageParser::new(buf, r#type).parse()
    }
}

/// Decodes the answers in `buf` that match `record_type`, in the order they
/// appear. A response without answers decodes to an empty list.
pub fn decode_response(buf: &[u8], record_type: &str) -> Result<Vec<Resource>> {
    let response = Response::from_slice(buf, Type::from_mnemonic(record_type))?;
    Ok(response.answers.into_iter().map(|r| r.resource).collect())
}
