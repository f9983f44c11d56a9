//! DNS answer synthesis for hskd name records.
//!
//! The codec side of the system lives in `hskd-domain`; this crate turns
//! a decoded [`hskd_domain::Resource`] into authoritative answers and
//! referrals using the hickory wire model. Synthesis is pure: no I/O, no
//! caching, no signing — missing data yields empty sections and the
//! CNAME/SOA fallbacks keep every response well-formed.

pub mod errors;
pub mod synthesizer;

pub use errors::SynthesisError;
pub use synthesizer::{
    to_dns, Synthesizer, TXT_ADDR, TXT_EMAIL, TXT_MAGNET, TXT_TOR, TXT_URL,
};

pub use hickory_proto;
