//! A DNS message codec, and a DNS over HTTPS (DoH) client built on it.
//!
//! The codec turns a name and record type into a query message, and turns a
//! response message back into the answers of that type:
//!
//! ```rust
//! use dohdns::{decode_response, encode_query};
//!
//! let query = encode_query("example.com", "A").expect("failed to encode");
//! assert_eq!(&query[12..25], b"\x07example\x03com\x00");
//!
//! // A response with an empty answer section is not an error.
//! let answers = decode_response(&query, "A").expect("failed to decode");
//! assert!(answers.is_empty());
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod display;
mod dns;
mod errors;
mod io;
pub mod name;
mod resource;
pub mod types;

#[macro_use]
extern crate num_derive;

#[cfg(feature = "doh")]
#[cfg_attr(docsrs, doc(cfg(feature = "doh")))]
pub mod clients;

pub use crate::dns::{decode_response, encode_query, Query};
pub use crate::errors::{Error, Result};
pub use crate::types::*;
