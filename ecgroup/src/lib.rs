#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
#![doc = include_str!("../README.md")]

pub mod blinding;
pub mod codec;

mod error;
mod group;
mod lookup_table;
mod named;
mod point;
mod point_arithmetic;
mod registry;

pub use crate::{
    blinding::{BlindedMultiplier, BlindingWorkspace},
    codec::{PointEncoding, decode_point, encode_point},
    error::{Error, Result},
    group::{CurveGroup, DomainParameters},
    point::CurvePoint,
    registry::{CurveId, CurveRegistry, Oid},
};
pub use dynfield::{self, num_bigint, BigUint};
pub use rand_core;
