//! Various traits to help parsing of DNS messages.

use crate::bail;
use crate::errors::Result;
use crate::name;
use byteorder::{ReadBytesExt, BE};
use std::io::Cursor;

/// Extensions to `Cursor<&[u8]>` to read DNS specific types.
///
/// Every read is bounds checked against the whole message, and fails with
/// [`crate::Error::TruncatedMessage`] instead of reading past the end.
pub(crate) trait DNSReadExt<'a> {
    /// Returns the number of bytes remaining to be consumed.
    fn remaining(&self) -> usize;

    fn read_u16_be(&mut self) -> Result<u16>;

    fn read_u32_be(&mut self) -> Result<u32>;

    /// Returns the next `len` bytes, and advances past them.
    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]>;

    /// Reads a possibly compressed domain name, leaving the cursor just past
    /// it (or just past its first pointer).
    fn read_name(&mut self) -> Result<String>;

    /// Advances past a domain name without decoding it.
    fn skip_name(&mut self) -> Result<()>;
}

impl<'a> DNSReadExt<'a> for Cursor<&'a [u8]> {
    fn remaining(&self) -> usize {
        let pos = self.position() as usize;
        self.get_ref().len().saturating_sub(pos)
    }

    fn read_u16_be(&mut self) -> Result<u16> {
        self.ensure(2)?;
        // The ensure above makes the read infallible.
        Ok(self.read_u16::<BE>().unwrap_or_default())
    }

    fn read_u32_be(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.read_u32::<BE>().unwrap_or_default())
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;

        let buf: &'a [u8] = *self.get_ref();
        let start = self.position() as usize;
        self.set_position((start + len) as u64);

        Ok(&buf[start..start + len])
    }

    fn read_name(&mut self) -> Result<String> {
        let (qname, next) = name::read_name(self.get_ref(), self.position() as usize)?;
        self.set_position(next as u64);
        Ok(qname)
    }

    fn skip_name(&mut self) -> Result<()> {
        let next = name::skip_name(self.get_ref(), self.position() as usize)?;
        self.set_position(next as u64);
        Ok(())
    }
}

trait Ensure {
    fn ensure(&self, len: usize) -> Result<()>;
}

impl<'a> Ensure for Cursor<&'a [u8]> {
    fn ensure(&self, len: usize) -> Result<()> {
        if self.remaining() < len {
            bail!(TruncatedMessage {
                offset: self.position() as usize,
                len,
                size: self.get_ref().len(),
            });
        }
        Ok(())
    }
}
