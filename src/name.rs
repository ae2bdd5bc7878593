//! Domain name encoding and compression-aware decoding, as defined by
//! [rfc1035#section-3.1] and [rfc1035#section-4.1.4].
//!
//! [rfc1035#section-3.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-3.1
//! [rfc1035#section-4.1.4]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.4

use crate::bail;
use crate::errors::Result;
use log::trace;

/// Restricts the length of a domain label to 63 bytes. [RFC1034]
pub const MAX_LABEL_LEN: usize = 63;

/// Maximum length of a name on the wire, including the terminating zero.
pub const MAX_NAME_LEN: usize = 255;

/// Number of compression pointers followed before a name is considered looped.
pub const MAX_POINTER_HOPS: usize = 10;

const POINTER_MASK: u8 = 0xC0;

/// Writes a domain name into the supplied `Vec<u8>` as a sequence of
/// length prefixed labels, terminated by a zero length label.
///
/// Empty pieces are skipped, so `"example.com."` and `"example.com"` encode
/// the same way, and `""` or `"."` encode the root.
pub fn write_name(buf: &mut Vec<u8>, domain: &str) -> Result<()> {
    let start = buf.len();

    for label in domain.split('.').filter(|l| !l.is_empty()) {
        if label.len() > MAX_LABEL_LEN {
            buf.truncate(start);
            bail!(InvalidName {
                name: domain.to_string(),
                reason: format!(
                    "label '{}' is {} bytes, longer than {}",
                    label,
                    label.len(),
                    MAX_LABEL_LEN
                ),
            });
        }

        // Write the length, then the actual label.
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }

    buf.push(0);

    let len = buf.len() - start;
    if len > MAX_NAME_LEN {
        buf.truncate(start);
        bail!(InvalidName {
            name: domain.to_string(),
            reason: format!("encoded name is {} bytes, longer than {}", len, MAX_NAME_LEN),
        });
    }

    Ok(())
}

/// Encodes a domain name into a new `Vec<u8>`. See [`write_name`].
pub fn encode_name(domain: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(domain.len() + 2);
    write_name(&mut buf, domain)?;
    Ok(buf)
}

/// Reads a possibly compressed domain name starting at `offset` in `msg`.
///
/// `msg` must be the whole message, as compression pointers are absolute
/// offsets from its start. Returns the dot joined name (without a trailing
/// dot, the root is `""`) and the offset just past the name. When the name
/// ends in a pointer, that is the offset just past the first pointer, no
/// matter where the pointer led.
pub fn read_name(msg: &[u8], offset: usize) -> Result<(String, usize)> {
    let mut labels: Vec<String> = Vec::new();
    let mut pos = offset;
    let mut next = None;
    let mut hops = 0;

    loop {
        let len = byte_at(msg, pos)?;

        if len == 0 {
            pos += 1;
            break;
        }

        if len & POINTER_MASK == POINTER_MASK {
            let ptr = pointer_at(msg, pos)?;

            // Only the first pointer decides where the caller resumes.
            if next.is_none() {
                next = Some(pos + 2);
            }

            hops += 1;
            if hops > MAX_POINTER_HOPS {
                bail!(CompressionLoop { offset, hops });
            }

            trace!("name at {} following pointer {} -> {}", offset, pos, ptr);
            pos = ptr;
            continue;
        }

        let start = pos + 1;
        let end = start + len as usize;
        let label = match msg.get(start..end) {
            Some(label) => label,
            None => bail!(TruncatedMessage {
                offset: start,
                len: len as usize,
                size: msg.len(),
            }),
        };

        // Really this is meant to be ASCII, but keep whatever was sent.
        labels.push(String::from_utf8_lossy(label).into_owned());
        pos = end;
    }

    Ok((labels.join("."), next.unwrap_or(pos)))
}

/// Walks over a name starting at `offset` without decoding it, returning the
/// offset just past it. A pointer ends the name, and is not followed.
pub fn skip_name(msg: &[u8], offset: usize) -> Result<usize> {
    let mut pos = offset;

    loop {
        let len = byte_at(msg, pos)?;

        if len == 0 {
            return Ok(pos + 1);
        }

        if len & POINTER_MASK == POINTER_MASK {
            pointer_at(msg, pos)?;
            return Ok(pos + 2);
        }

        pos += 1 + len as usize;
    }
}

fn byte_at(msg: &[u8], pos: usize) -> Result<u8> {
    match msg.get(pos) {
        Some(b) => Ok(*b),
        None => bail!(TruncatedMessage {
            offset: pos,
            len: 1,
            size: msg.len(),
        }),
    }
}

/// Reads the 14 bit pointer starting at `pos`.
fn pointer_at(msg: &[u8], pos: usize) -> Result<usize> {
    match msg.get(pos..pos + 2) {
        Some(&[b1, b2]) => Ok(((b1 & !POINTER_MASK) as usize) << 8 | b2 as usize),
        _ => bail!(TruncatedMessage {
            offset: pos,
            len: 2,
            size: msg.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_name() {
        assert_eq!(
            encode_name("example.com").unwrap(),
            b"\x07example\x03com\x00".to_vec()
        );
        assert_eq!(
            encode_name("example.com.").unwrap(),
            b"\x07example\x03com\x00".to_vec()
        );
        assert_eq!(encode_name("").unwrap(), vec![0]);
        assert_eq!(encode_name(".").unwrap(), vec![0]);
    }

    #[test]
    fn test_encode_name_limits() {
        let label = "a".repeat(MAX_LABEL_LEN);
        assert!(encode_name(&label).is_ok());

        let label = "a".repeat(MAX_LABEL_LEN + 1);
        match encode_name(&format!("{}.com", label)) {
            Err(Error::InvalidName { .. }) => (),
            got => panic!("expected InvalidName, got {:?}", got),
        }

        // Four 63 byte labels is 4 * 64 + 1 = 257 bytes.
        let long = vec![&"b".repeat(63)[..]; 4].join(".");
        assert!(matches!(encode_name(&long), Err(Error::InvalidName { .. })));

        // Three 63 byte labels and a 61 byte label is exactly 255 bytes.
        let max = format!("{}.{}", vec![&"c".repeat(63)[..]; 3].join("."), "d".repeat(61));
        assert_eq!(encode_name(&max).unwrap().len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_write_name_leaves_buffer_on_error() {
        let mut buf = vec![1, 2, 3];
        assert!(write_name(&mut buf, &"x".repeat(64)).is_err());
        assert_eq!(buf, vec![1, 2, 3]);
    }

    #[test]
    fn test_read_name_round_trip() {
        let long = format!("{}.org", "z".repeat(63));
        for name in &[
            "example.com",
            "a.b.c.d.e",
            "MiXeD.Case.Example",
            long.as_str(),
        ] {
            let wire = encode_name(name).unwrap();
            let (got, next) = read_name(&wire, 0).unwrap();
            assert_eq!(got, *name);
            assert_eq!(next, wire.len());
        }
    }

    #[test]
    fn test_read_root() {
        assert_eq!(read_name(&[0], 0).unwrap(), ("".to_string(), 1));
    }

    #[test]
    fn test_read_name_with_pointer() {
        // 0: example.com, 13: "mail" + pointer to 0, 20: trailing byte.
        let mut msg = encode_name("example.com").unwrap();
        msg.extend_from_slice(b"\x04mail\xC0\x00\xFF");

        let (name, next) = read_name(&msg, 13).unwrap();
        assert_eq!(name, "mail.example.com");
        assert_eq!(next, 20);

        // A bare pointer.
        let (name, next) = read_name(&msg, 18).unwrap();
        assert_eq!(name, "example.com");
        assert_eq!(next, 20);
    }

    #[test]
    fn test_read_name_pointer_chain() {
        // 0: com, 5: example + ptr(0), 15: www + ptr(5), 21: ptr(15)
        let mut msg = encode_name("com").unwrap();
        msg.extend_from_slice(b"\x07example\xC0\x00");
        msg.extend_from_slice(b"\x03www\xC0\x05");
        msg.extend_from_slice(b"\xC0\x0F");

        assert_eq!(
            read_name(&msg, 21).unwrap(),
            ("www.example.com".to_string(), 23)
        );
    }

    #[test]
    fn test_read_name_self_pointer() {
        let msg = b"\x00\x00\xC0\x02";
        match read_name(msg, 2) {
            Err(Error::CompressionLoop { offset, hops }) => {
                assert_eq!(offset, 2);
                assert_eq!(hops, MAX_POINTER_HOPS + 1);
            }
            got => panic!("expected CompressionLoop, got {:?}", got),
        }
    }

    #[test]
    fn test_read_name_pointer_cycle() {
        // Two labelled names pointing at each other.
        let msg = b"\x01a\xC0\x04\x01b\xC0\x00";
        assert!(matches!(
            read_name(msg, 0),
            Err(Error::CompressionLoop { .. })
        ));
    }

    #[test]
    fn test_read_name_hop_bound() {
        // A chain of exactly MAX_POINTER_HOPS pointers ending at a real name.
        let mut msg = encode_name("end").unwrap();
        let mut target = 0;
        for _ in 0..MAX_POINTER_HOPS {
            let here = msg.len();
            msg.push(0xC0 | (target >> 8) as u8);
            msg.push(target as u8);
            target = here;
        }
        assert_eq!(read_name(&msg, target).unwrap().0, "end");

        // One more hop is too many.
        let here = msg.len();
        msg.push(0xC0);
        msg.push(target as u8);
        assert!(matches!(
            read_name(&msg, here),
            Err(Error::CompressionLoop { .. })
        ));
    }

    #[test]
    fn test_read_name_truncated() {
        // Label runs off the end.
        assert!(matches!(
            read_name(b"\x07exam", 0),
            Err(Error::TruncatedMessage { .. })
        ));

        // Missing the terminating zero.
        assert!(matches!(
            read_name(b"\x03com", 0),
            Err(Error::TruncatedMessage { offset: 4, .. })
        ));

        // Half a pointer.
        assert!(matches!(
            read_name(b"\x03com\xC0", 0),
            Err(Error::TruncatedMessage { .. })
        ));

        // Pointer past the end of the message.
        assert!(matches!(
            read_name(b"\xC0\x40", 0),
            Err(Error::TruncatedMessage { offset: 64, .. })
        ));

        // Offset outside the message.
        assert!(matches!(
            read_name(b"\x00", 5),
            Err(Error::TruncatedMessage { .. })
        ));
    }

    #[test]
    fn test_skip_name() {
        let msg = b"\x07example\x03com\x00\x04mail\xC0\x00";
        assert_eq!(skip_name(msg, 0).unwrap(), 13);
        assert_eq!(skip_name(msg, 13).unwrap(), 20);
        assert!(matches!(
            skip_name(&msg[..10], 0),
            Err(Error::TruncatedMessage { .. })
        ));
    }
}
