#[macro_use]
mod util;

mod writer;
mod roundtrip;
