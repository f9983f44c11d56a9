//! Name-record model and wire codec for the hskd naming system.
//!
//! Records live on chain as compressed binary blobs; this crate owns the
//! blob format. [`Resource`] is the per-name record set with its
//! encode/decode/JSON operations, [`Target`] is the polymorphic address
//! value the record points at, and [`Compressor`]/[`Decompressor`]
//! implement the per-record string dictionary both directions share.
//!
//! The crate is purely synchronous and does no I/O: inputs and outputs
//! are byte buffers and in-memory values, and every decode works from a
//! fresh read of the blob. DNS synthesis on top of these types lives in
//! `hskd-dns`.

pub mod addr;
pub mod compress;
pub mod constants;
pub mod ds;
pub mod errors;
pub mod extra;
pub mod location;
pub mod magnet;
pub mod resource;
pub mod service;
pub mod ssh;
pub mod target;
pub mod tls;
pub mod utils;

mod hex_serde;
mod wire;

pub use addr::AddrRecord;
pub use compress::{Compressor, Decompressor};
pub use constants::{RecordTag, HSK, HSKP, HSKS, HSK_CURRENCY, ICANN, ICANNP, ICANNS};
pub use ds::DsRecord;
pub use errors::CodecError;
pub use extra::ExtraRecord;
pub use location::LocationRecord;
pub use magnet::MagnetRecord;
pub use resource::Resource;
pub use service::ServiceRecord;
pub use ssh::{PgpRecord, SshRecord};
pub use target::Target;
pub use tls::TlsRecord;
