//! DNS answer synthesis.
//!
//! Maps a decoded [`Resource`] and a query `(name, qtype)` to a complete
//! DNS message. Queries for the zone apex answer authoritatively; queries
//! below it produce a referral whose authority section delegates to the
//! record's name servers. Inline IP targets in NS/MX/SRV positions are
//! materialized as synthetic pointer names (`_<base58(ip)>.<zone>`) with
//! matching glue in the additional section.

use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::sshfp::{Algorithm as SshfpAlgorithm, FingerprintType};
use hickory_proto::rr::rdata::tlsa::{CertUsage, Matching, Selector};
use hickory_proto::rr::rdata::{
    A, AAAA, CNAME, MX, NS, NULL, OPENPGPKEY, SOA, SRV, SSHFP, TLSA, TXT,
};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use tracing::debug;

use hskd_domain::{Resource, Target};

use crate::errors::SynthesisError;

/// Sentinel first string of the TXT record advertising onion hosts.
pub const TXT_TOR: &str = "hsk:tor";
/// Sentinel for URL payloads folded into TXT answers.
pub const TXT_URL: &str = "hsk:url";
/// Sentinel for email payloads.
pub const TXT_EMAIL: &str = "hsk:email";
/// Sentinel for magnet URIs.
pub const TXT_MAGNET: &str = "hsk:magnet";
/// Sentinel for payment addresses.
pub const TXT_ADDR: &str = "hsk:addr";

// Types hickory carries no rdata for; they are emitted as RFC 3597
// unknown rdata and dispatched numerically.
const LOC_TYPE: u16 = 29;
const DNAME_TYPE: u16 = 39;

const SOA_SERIAL: u32 = 0;
const SOA_REFRESH: i32 = 1800;
const SOA_EXPIRE: i32 = 604_800;
const SOA_MINTTL: u32 = 86_400;

const EDNS_PAYLOAD: u16 = 4096;

/// Synthesizes the DNS response for a query against `resource`.
///
/// `name` must be fully qualified. When `naked` is set, inline IP targets
/// in NS/MX/SRV positions resolve to pointer names with glue; without it
/// they are dropped from the answer. Production resolvers always pass
/// `true`.
pub fn to_dns(
    resource: &Resource,
    name: &str,
    qtype: RecordType,
    naked: bool,
) -> Result<Message, SynthesisError> {
    Synthesizer::new(resource, naked).synthesize(name, qtype)
}

pub struct Synthesizer<'a> {
    resource: &'a Resource,
    naked: bool,
}

impl<'a> Synthesizer<'a> {
    pub fn new(resource: &'a Resource, naked: bool) -> Self {
        Self { resource, naked }
    }

    pub fn synthesize(&self, name: &str, qtype: RecordType) -> Result<Message, SynthesisError> {
        assert!(name.ends_with('.'), "query name must be fully qualified");
        let name = name.to_ascii_lowercase();

        let mut message = Message::new();
        message.set_message_type(MessageType::Response);
        message.set_op_code(OpCode::Query);
        message.set_authentic_data(true);
        message.set_edns(default_edns());

        let mut query = Query::new();
        query.set_name(Name::from_ascii(&name)?);
        query.set_query_type(qtype);
        query.set_query_class(DNSClass::IN);
        message.add_query(query);

        let labels: Vec<&str> = name
            .trim_end_matches('.')
            .split('.')
            .filter(|label| !label.is_empty())
            .collect();

        if labels.len() > 1 {
            self.referral(&mut message, labels[labels.len() - 1])?;
        } else {
            message.set_authoritative(true);
            self.authoritative(&mut message, &name, qtype)?;
        }

        debug!(
            name = %name,
            qtype = %qtype,
            aa = message.authoritative(),
            answers = message.answers().len(),
            authority = message.name_servers().len(),
            additional = message.additionals().len(),
            "synthesized response"
        );
        Ok(message)
    }

    /// Below-apex queries delegate downstream: NS referral when name
    /// servers exist, DNAME when only a delegate is set, SOA otherwise.
    /// DS records always ride along in the authority section.
    fn referral(&self, message: &mut Message, tld_label: &str) -> Result<(), SynthesisError> {
        let tld = format!("{tld_label}.");
        message.set_authoritative(false);

        if !self.resource.ns.is_empty() {
            for record in self.ns_records(&tld)? {
                message.add_name_server(record);
            }
            for record in self.ns_glue(&tld)? {
                message.add_additional(record);
            }
        } else if self.resource.delegate.is_some() {
            for record in self.dname_records(&tld)? {
                message.add_answer(record);
            }
        } else {
            message.add_name_server(self.soa(&tld)?);
        }

        for record in self.ds_records(&tld)? {
            message.add_name_server(record);
        }
        Ok(())
    }

    fn authoritative(
        &self,
        message: &mut Message,
        name: &str,
        qtype: RecordType,
    ) -> Result<(), SynthesisError> {
        match qtype {
            RecordType::ANY => {
                message.add_answer(self.soa(name)?);
                for record in self.ns_records(name)? {
                    message.add_answer(record);
                }
                for record in self.ns_glue(name)? {
                    message.add_additional(record);
                }
            }
            RecordType::A => {
                for record in self.address_records(name, false)? {
                    message.add_answer(record);
                }
            }
            RecordType::AAAA => {
                for record in self.address_records(name, true)? {
                    message.add_answer(record);
                }
            }
            RecordType::CNAME => {
                for record in self.cname_records(name)? {
                    message.add_answer(record);
                }
            }
            RecordType::NS => {
                for record in self.ns_records(name)? {
                    message.add_answer(record);
                }
                for record in self.ns_glue(name)? {
                    message.add_additional(record);
                }
            }
            RecordType::MX => {
                for record in self.mx_records(name)? {
                    message.add_answer(record);
                }
                for record in self.service_glue(name, true)? {
                    message.add_additional(record);
                }
            }
            RecordType::SRV => {
                for record in self.srv_records(name)? {
                    message.add_answer(record);
                }
                for record in self.service_glue(name, false)? {
                    message.add_additional(record);
                }
            }
            RecordType::TXT => {
                for record in self.txt_records(name)? {
                    message.add_answer(record);
                }
            }
            RecordType::DS => {
                for record in self.ds_records(name)? {
                    message.add_answer(record);
                }
            }
            RecordType::TLSA => {
                for record in self.tlsa_records(name)? {
                    message.add_answer(record);
                }
            }
            RecordType::SSHFP => {
                for record in self.sshfp_records(name)? {
                    message.add_answer(record);
                }
            }
            RecordType::OPENPGPKEY => {
                for record in self.openpgpkey_records(name)? {
                    message.add_answer(record);
                }
            }
            other => match u16::from(other) {
                DNAME_TYPE => {
                    for record in self.dname_records(name)? {
                        message.add_answer(record);
                    }
                }
                LOC_TYPE => {
                    for record in self.loc_records(name)? {
                        message.add_answer(record);
                    }
                }
                _ => {}
            },
        }

        // Nothing matched: answer with the canonical name when one is
        // set, the zone SOA otherwise.
        if message.answers().is_empty() && message.name_servers().is_empty() {
            if self.resource.canonical.is_some() {
                for record in self.cname_records(name)? {
                    message.add_answer(record);
                }
            } else {
                message.add_answer(self.soa(name)?);
            }
        }
        Ok(())
    }

    fn ttl(&self) -> u32 {
        self.resource.dns_ttl()
    }

    /// The DNS name a target materializes as, if any: names render
    /// directly, inline IPs become pointer names under `zone` when glue
    /// is enabled, everything else is dropped.
    fn target_name(&self, target: &Target, zone: &str) -> Option<String> {
        if target.is_name() {
            Some(target.to_dns())
        } else if self.naked && target.is_inet() {
            target.to_pointer(zone)
        } else {
            None
        }
    }

    /// A or AAAA answers, plus the onion TXT advertisement when any host
    /// is a Tor target.
    fn address_records(&self, name: &str, v6: bool) -> Result<Vec<Record>, SynthesisError> {
        let owner = Name::from_ascii(name)?;
        let mut out = Vec::new();
        for host in &self.resource.hosts {
            match host {
                Target::Inet4(ip) if !v6 => {
                    out.push(Record::from_rdata(owner.clone(), self.ttl(), RData::A(A(*ip))));
                }
                Target::Inet6(ip) if v6 => {
                    out.push(Record::from_rdata(
                        owner.clone(),
                        self.ttl(),
                        RData::AAAA(AAAA(*ip)),
                    ));
                }
                _ => {}
            }
        }
        if let Some(record) = self.tor_txt(&owner) {
            out.push(record);
        }
        Ok(out)
    }

    fn tor_txt(&self, owner: &Name) -> Option<Record> {
        let onions: Vec<String> = self
            .resource
            .hosts
            .iter()
            .filter(|host| host.is_tor())
            .map(Target::to_string)
            .collect();
        if onions.is_empty() {
            return None;
        }
        let mut strings = vec![TXT_TOR.to_string()];
        strings.extend(onions);
        Some(Record::from_rdata(
            owner.clone(),
            self.ttl(),
            RData::TXT(TXT::new(strings)),
        ))
    }

    fn cname_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let Some(canonical) = &self.resource.canonical else {
            return Ok(Vec::new());
        };
        let target = Name::from_ascii(canonical.to_dns())?;
        Ok(vec![Record::from_rdata(
            Name::from_ascii(name)?,
            self.ttl(),
            RData::CNAME(CNAME(target)),
        )])
    }

    fn dname_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let Some(delegate) = &self.resource.delegate else {
            return Ok(Vec::new());
        };
        let target = Name::from_ascii(delegate.to_dns())?;
        Ok(vec![Record::from_rdata(
            Name::from_ascii(name)?,
            self.ttl(),
            unknown_rdata(DNAME_TYPE, name_wire_bytes(&target)),
        )])
    }

    fn ns_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let owner = Name::from_ascii(name)?;
        let mut out = Vec::new();
        for target in &self.resource.ns {
            let Some(ns_name) = self.target_name(target, name) else {
                continue;
            };
            out.push(Record::from_rdata(
                owner.clone(),
                self.ttl(),
                RData::NS(NS(Name::from_ascii(&ns_name)?)),
            ));
        }
        Ok(out)
    }

    fn ns_glue(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let mut out = Vec::new();
        if !self.naked {
            return Ok(out);
        }
        for target in &self.resource.ns {
            if let Some(record) = self.glue_record(target, name)? {
                out.push(record);
            }
        }
        Ok(out)
    }

    /// Glue A/AAAA under the pointer name of an inline IP target.
    fn glue_record(&self, target: &Target, zone: &str) -> Result<Option<Record>, SynthesisError> {
        let Some(pointer) = target.to_pointer(zone) else {
            return Ok(None);
        };
        let rdata = match target {
            Target::Inet4(ip) => RData::A(A(*ip)),
            Target::Inet6(ip) => RData::AAAA(AAAA(*ip)),
            _ => return Ok(None),
        };
        Ok(Some(Record::from_rdata(
            Name::from_ascii(&pointer)?,
            self.ttl(),
            rdata,
        )))
    }

    /// MX answers fall out of SMTP services.
    fn mx_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let owner = Name::from_ascii(name)?;
        let mut out = Vec::new();
        for service in &self.resource.service {
            if !service.is_smtp() {
                continue;
            }
            let Some(exchange) = self.target_name(&service.target, name) else {
                continue;
            };
            out.push(Record::from_rdata(
                owner.clone(),
                self.ttl(),
                RData::MX(MX::new(
                    u16::from(service.priority),
                    Name::from_ascii(&exchange)?,
                )),
            ));
        }
        Ok(out)
    }

    fn srv_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let mut out = Vec::new();
        for service in &self.resource.service {
            let Some(target) = self.target_name(&service.target, name) else {
                continue;
            };
            let owner =
                Name::from_ascii(format!("_{}._{}.{}", service.service, service.protocol, name))?;
            out.push(Record::from_rdata(
                owner,
                self.ttl(),
                RData::SRV(SRV::new(
                    u16::from(service.priority),
                    u16::from(service.weight),
                    service.port,
                    Name::from_ascii(&target)?,
                )),
            ));
        }
        Ok(out)
    }

    /// Additional-section glue for services with inline IP targets.
    /// MX additionals take the strict reading: SMTP services only.
    fn service_glue(&self, name: &str, smtp_only: bool) -> Result<Vec<Record>, SynthesisError> {
        let mut out = Vec::new();
        if !self.naked {
            return Ok(out);
        }
        for service in &self.resource.service {
            if smtp_only && !service.is_smtp() {
                continue;
            }
            if let Some(record) = self.glue_record(&service.target, name)? {
                out.push(record);
            }
        }
        Ok(out)
    }

    fn txt_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let owner = Name::from_ascii(name)?;
        let mut out = Vec::new();

        if !self.resource.text.is_empty() {
            out.push(Record::from_rdata(
                owner.clone(),
                self.ttl(),
                RData::TXT(TXT::new(self.resource.text.clone())),
            ));
        }
        self.push_sentinel_txt(&mut out, &owner, TXT_URL, self.resource.url.clone());
        self.push_sentinel_txt(&mut out, &owner, TXT_EMAIL, self.resource.email.clone());
        self.push_sentinel_txt(
            &mut out,
            &owner,
            TXT_MAGNET,
            self.resource.magnet.iter().map(ToString::to_string).collect(),
        );
        let addrs = self
            .resource
            .addr
            .iter()
            .filter_map(|addr| {
                addr.address()
                    .ok()
                    .map(|s| format!("{}:{}", addr.currency(), s))
            })
            .collect();
        self.push_sentinel_txt(&mut out, &owner, TXT_ADDR, addrs);
        Ok(out)
    }

    fn push_sentinel_txt(
        &self,
        out: &mut Vec<Record>,
        owner: &Name,
        sentinel: &str,
        payload: Vec<String>,
    ) {
        if payload.is_empty() {
            return;
        }
        let mut strings = vec![sentinel.to_string()];
        strings.extend(payload);
        out.push(Record::from_rdata(
            owner.clone(),
            self.ttl(),
            RData::TXT(TXT::new(strings)),
        ));
    }

    fn loc_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let owner = Name::from_ascii(name)?;
        Ok(self
            .resource
            .location
            .iter()
            .map(|location| {
                Record::from_rdata(
                    owner.clone(),
                    self.ttl(),
                    unknown_rdata(LOC_TYPE, location.to_rdata()),
                )
            })
            .collect())
    }

    fn ds_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let owner = Name::from_ascii(name)?;
        Ok(self
            .resource
            .ds
            .iter()
            .map(|ds| {
                Record::from_rdata(
                    owner.clone(),
                    self.ttl(),
                    unknown_rdata(u16::from(RecordType::DS), ds.to_rdata()),
                )
            })
            .collect())
    }

    fn tlsa_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let mut out = Vec::new();
        for tls in &self.resource.tls {
            let owner = Name::from_ascii(format!("_{}._{}.{}", tls.port, tls.protocol, name))?;
            out.push(Record::from_rdata(
                owner,
                self.ttl(),
                RData::TLSA(TLSA::new(
                    CertUsage::from(tls.usage),
                    Selector::from(tls.selector),
                    Matching::from(tls.matching_type),
                    tls.certificate.clone(),
                )),
            ));
        }
        Ok(out)
    }

    fn sshfp_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let owner = Name::from_ascii(name)?;
        Ok(self
            .resource
            .ssh
            .iter()
            .map(|ssh| {
                Record::from_rdata(
                    owner.clone(),
                    self.ttl(),
                    RData::SSHFP(SSHFP::new(
                        SshfpAlgorithm::from(ssh.algorithm),
                        FingerprintType::from(ssh.key_type),
                        ssh.fingerprint.clone(),
                    )),
                )
            })
            .collect())
    }

    fn openpgpkey_records(&self, name: &str) -> Result<Vec<Record>, SynthesisError> {
        let owner = Name::from_ascii(name)?;
        Ok(self
            .resource
            .pgp
            .iter()
            .map(|pgp| {
                Record::from_rdata(
                    owner.clone(),
                    self.ttl(),
                    RData::OPENPGPKEY(OPENPGPKEY::new(pgp.fingerprint.clone())),
                )
            })
            .collect())
    }

    /// Zone SOA. The primary NS and mbox borrow the first NS and MX
    /// names when those sections are non-empty.
    fn soa(&self, name: &str) -> Result<Record, SynthesisError> {
        let owner = Name::from_ascii(name)?;

        let mname = match self.ns_records(name)?.first().and_then(Record::data) {
            Some(RData::NS(ns)) => ns.0.clone(),
            _ => owner.clone(),
        };
        let rname = match self.mx_records(name)?.first().and_then(Record::data) {
            Some(RData::MX(mx)) => mx.exchange().clone(),
            _ => owner.clone(),
        };

        let rdata = SOA::new(
            mname,
            rname,
            SOA_SERIAL,
            SOA_REFRESH,
            self.ttl() as i32,
            SOA_EXPIRE,
            SOA_MINTTL,
        );
        Ok(Record::from_rdata(owner, self.ttl(), RData::SOA(rdata)))
    }
}

fn default_edns() -> Edns {
    let mut edns = Edns::new();
    edns.set_max_payload(EDNS_PAYLOAD);
    edns.set_version(0);
    edns.set_dnssec_ok(true);
    edns
}

/// RFC 3597 rdata for types hickory has no concrete representation of.
fn unknown_rdata(code: u16, bytes: Vec<u8>) -> RData {
    RData::Unknown {
        code: RecordType::Unknown(code),
        rdata: NULL::with(bytes),
    }
}

/// Uncompressed wire form of a name, for raw rdata bodies.
fn name_wire_bytes(name: &Name) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.len() + 1);
    for label in name.iter() {
        out.push(label.len() as u8);
        out.extend_from_slice(label);
    }
    out.push(0);
    out
}
