//! Document store module
//!
//! Extracts voucher instances for one parent voucher from MongoDB.
//!
//! # Overview
//!
//! The document module provides:
//! - `VoucherSource` - The extraction seam used by the report engine
//! - `MongoVoucherSource` - MongoDB-backed implementation
//! - `MemoryVoucherSource` - Fixed instance list, for replays and tests
//! - Strict BSON decoding into `VoucherInstance`

mod decode;
mod source;

pub use decode::{decode_voucher_instance, parse_voucher_id};
pub use source::{MemoryVoucherSource, MongoVoucherSource, VoucherSource};
