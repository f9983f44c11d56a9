use hskd_domain::{CodecError, Resource, Target};

mod helpers;
use helpers::builders::{full_resource, ResourceBuilder};

#[test]
fn full_record_round_trips() {
    let resource = full_resource();
    let blob = resource.encode().unwrap();
    let decoded = Resource::decode(&blob).unwrap();

    // TTL comes back quantized; everything else is field-for-field.
    let mut expected = resource.clone();
    expected.ttl = resource.dns_ttl();
    assert_eq!(decoded, expected);
}

#[test]
fn reencode_is_byte_exact() {
    let blob = full_resource().encode().unwrap();
    let decoded = Resource::decode(&blob).unwrap();
    assert_eq!(decoded.encode().unwrap(), blob);
}

#[test]
fn empty_record_vector() {
    let resource = Resource::new();
    assert_eq!(resource.encode().unwrap(), [0x00, 0x00, 0x00, 0x00]);
    assert_eq!(Resource::decode(&[0, 0, 0, 0]).unwrap(), resource);
}

#[test]
fn single_host_vector() {
    let resource = ResourceBuilder::new().ttl(3600).host("1.2.3.4").build();
    let blob = resource.encode().unwrap();
    // version, ttl >> 6 (0x0038), empty table, then the INET4 kind byte
    // doubling as the record tag.
    assert_eq!(blob, [0x00, 0x00, 0x38, 0x00, 0x01, 1, 2, 3, 4]);
}

#[test]
fn canonical_name_vector() {
    let resource = ResourceBuilder::new().canonical("example.com.").build();
    let blob = resource.encode().unwrap();

    let mut expected = vec![0x00, 0x00, 0x00];
    expected.push(0x01); // one table entry
    expected.push(11);
    expected.extend_from_slice(b"example.com");
    expected.push(0x06); // INAME short-form tag
    expected.push(0x80); // reference to entry 0
    assert_eq!(blob, expected);

    let decoded = Resource::decode(&blob).unwrap();
    assert_eq!(
        decoded.canonical,
        Some(Target::Iname("example.com.i".into()))
    );
}

#[test]
fn full_target_canonical_is_accepted_on_decode() {
    // CANONICAL tag followed by a complete target (kind byte + body).
    let mut blob = vec![0x00, 0x00, 0x00];
    blob.push(0x01);
    blob.push(3);
    blob.extend_from_slice(b"bob");
    blob.push(0x08); // CANONICAL
    blob.push(0x07); // HNAME kind
    blob.push(0x80);
    let decoded = Resource::decode(&blob).unwrap();
    assert_eq!(decoded.canonical, Some(Target::Hname("bob.h".into())));
}

#[test]
fn duplicate_canonical_is_a_decode_error() {
    let mut blob = vec![0x00, 0x00, 0x00];
    blob.push(0x01);
    blob.push(7);
    blob.extend_from_slice(b"example");
    for _ in 0..2 {
        blob.push(0x06);
        blob.push(0x80);
    }
    assert_eq!(
        Resource::decode(&blob),
        Err(CodecError::DuplicateCanonical)
    );
}

#[test]
fn duplicate_delegate_is_a_decode_error() {
    let mut blob = vec![0x00, 0x00, 0x00];
    blob.push(0x01);
    blob.push(6);
    blob.extend_from_slice(b"mirror");
    for _ in 0..2 {
        blob.push(0x09); // DELEGATE
        blob.push(0x07); // HNAME kind
        blob.push(0x80);
    }
    assert_eq!(Resource::decode(&blob), Err(CodecError::DuplicateDelegate));
}

#[test]
fn unknown_tag_round_trips_as_extra() {
    let mut blob = vec![0x00, 0x00, 0x00, 0x00];
    blob.push(200);
    blob.push(4);
    blob.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

    let decoded = Resource::decode(&blob).unwrap();
    assert_eq!(decoded.extra.len(), 1);
    assert_eq!(decoded.extra[0].rtype, 200);
    assert_eq!(decoded.extra[0].data, [0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(decoded.encode().unwrap(), blob);
}

#[test]
fn list_order_is_preserved() {
    let resource = ResourceBuilder::new()
        .url("https://one.example/")
        .url("https://two.example/")
        .text("bbb")
        .text("aaa")
        .host("9.9.9.9")
        .host("1.1.1.1")
        .build();
    let decoded = Resource::decode(&resource.encode().unwrap()).unwrap();
    assert_eq!(decoded.url, resource.url);
    assert_eq!(decoded.text, resource.text);
    assert_eq!(decoded.hosts, resource.hosts);
}

#[test]
fn shared_strings_compress() {
    let word = "0123456789";
    let with_reuse = ResourceBuilder::new()
        .url(word)
        .email(word)
        .text(word)
        .build()
        .encode()
        .unwrap();

    // Three distinct strings of the same length cannot share entries.
    let without_reuse = ResourceBuilder::new()
        .url("0123456789")
        .email("abcdefghij")
        .text("qrstuvwxyz")
        .build()
        .encode()
        .unwrap();

    assert!(with_reuse.len() + 2 * word.len() <= without_reuse.len());
}

#[test]
fn truncated_service_is_an_eof_error() {
    let resource = ResourceBuilder::new()
        .service("smtp", "tcp", 10, "mail.example.com", 25)
        .build();
    let blob = resource.encode().unwrap();
    assert_eq!(
        Resource::decode(&blob[..blob.len() - 1]),
        Err(CodecError::UnexpectedEof)
    );
}

#[test]
fn overlong_string_fails_to_encode() {
    let resource = ResourceBuilder::new().text(&"x".repeat(200)).build();
    assert!(matches!(
        resource.encode(),
        Err(CodecError::StringTooLong { .. })
    ));
}
