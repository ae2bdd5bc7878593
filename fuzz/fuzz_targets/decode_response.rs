#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate dohdns;

use dohdns::Type;

fuzz_target!(|data: &[u8]| {
    // Decoding must return, one way or the other, for every input.
    for r#type in &[Type::A, Type::AAAA, Type::CNAME, Type::MX, Type::NS] {
        #[allow(unused_must_use)]
        {
            dohdns::Response::from_slice(data, *r#type);
        }
    }
});
