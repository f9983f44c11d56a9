#![allow(dead_code)]
use hskd_domain::{
    AddrRecord, DsRecord, ExtraRecord, LocationRecord, Resource, ServiceRecord, SshRecord,
    TlsRecord,
};

pub struct ResourceBuilder {
    resource: Resource,
}

impl ResourceBuilder {
    pub fn new() -> Self {
        Self {
            resource: Resource::new(),
        }
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.resource.ttl = ttl;
        self
    }

    pub fn host(mut self, target: &str) -> Self {
        self.resource.hosts.push(target.parse().expect("host"));
        self
    }

    pub fn canonical(mut self, target: &str) -> Self {
        self.resource.canonical = Some(target.parse().expect("canonical"));
        self
    }

    pub fn delegate(mut self, target: &str) -> Self {
        self.resource.delegate = Some(target.parse().expect("delegate"));
        self
    }

    pub fn ns(mut self, target: &str) -> Self {
        self.resource.ns.push(target.parse().expect("ns"));
        self
    }

    pub fn service(
        mut self,
        service: &str,
        protocol: &str,
        priority: u8,
        target: &str,
        port: u16,
    ) -> Self {
        self.resource.service.push(ServiceRecord {
            service: service.into(),
            protocol: protocol.into(),
            priority,
            weight: 0,
            target: target.parse().expect("service target"),
            port,
        });
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.resource.url.push(url.into());
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.resource.email.push(email.into());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.resource.text.push(text.into());
        self
    }

    pub fn location(mut self) -> Self {
        self.resource.location.push(LocationRecord {
            version: 0,
            size: 0x12,
            horiz_pre: 0x16,
            vert_pre: 0x13,
            latitude: 2_332_896_752,
            longitude: 2_146_846_072,
            altitude: 10_000_100,
        });
        self
    }

    pub fn magnet(mut self, uri: &str) -> Self {
        self.resource.magnet.push(uri.parse().expect("magnet"));
        self
    }

    pub fn ds(mut self) -> Self {
        self.resource.ds.push(DsRecord {
            key_tag: 30548,
            algorithm: 8,
            digest_type: 2,
            digest: vec![0xde; 32],
        });
        self
    }

    pub fn tls(mut self) -> Self {
        self.resource.tls.push(TlsRecord {
            protocol: "tcp".into(),
            port: 443,
            usage: 3,
            selector: 1,
            matching_type: 1,
            certificate: vec![0xcc; 32],
        });
        self
    }

    pub fn ssh(mut self) -> Self {
        self.resource.ssh.push(SshRecord {
            algorithm: 4,
            key_type: 2,
            fingerprint: vec![0x5f; 32],
        });
        self
    }

    pub fn pgp(mut self) -> Self {
        self.resource.pgp.push(SshRecord {
            algorithm: 1,
            key_type: 1,
            fingerprint: vec![0xf0; 20],
        });
        self
    }

    pub fn addr(mut self, addr: &str) -> Self {
        self.resource.addr.push(addr.parse().expect("addr"));
        self
    }

    pub fn native_addr(mut self) -> Self {
        self.resource.addr.push(AddrRecord::Hsk {
            testnet: false,
            version: 0,
            hash: (0u8..20).collect(),
        });
        self
    }

    pub fn extra(mut self, rtype: u8, data: &[u8]) -> Self {
        self.resource.extra.push(ExtraRecord {
            rtype,
            data: data.to_vec(),
        });
        self
    }

    pub fn build(self) -> Resource {
        self.resource
    }
}

impl Default for ResourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A record exercising every field of the wire format.
pub fn full_resource() -> Resource {
    ResourceBuilder::new()
        .ttl(3600)
        .host("1.2.3.4")
        .host("2001:db8::1")
        .host("3g2upl4pq6kufc4m.onion")
        .canonical("example.com")
        .delegate("mirror.h")
        .ns("ns1.example.com")
        .ns("5.6.7.8")
        .service("smtp", "tcp", 10, "mail.example.com", 25)
        .service("ssh", "tcp", 1, "1.2.3.4", 22)
        .url("https://example.com/")
        .email("admin@example.com")
        .text("hello world")
        .text("hello world")
        .location()
        .magnet("magnet:?xt=urn:btih:c12fe1c06bba254a9dc9f519b335aa7c1367a88a")
        .ds()
        .tls()
        .ssh()
        .pgp()
        .addr("btc:1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa")
        .native_addr()
        .extra(200, &[0xde, 0xad, 0xbe, 0xef])
        .build()
}
