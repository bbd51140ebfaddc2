#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![doc = include_str!("../README.md")]

mod error;
mod field;
mod prime;
mod reducer;

pub use crate::{
    error::{Error, Result},
    field::{FieldElement, PrimeField, sqrt_mod_prime},
    prime::{is_probable_prime, random_below, random_in_range},
    reducer::ModularReducer,
};
pub use num_bigint::{self, BigUint};
pub use rand_core;
pub use subtle;
pub use zeroize;
