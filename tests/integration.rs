use rfc9112::{
    parse_request, parse_response, Error, FramingError, HttpVersion, MessageBodyLength,
    ParseOptions, SyntaxError, Target,
};

#[test]
fn simple_request_resolves_origin_target_and_byte_count() {
    let wire = b"GET /p HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request(wire, &ParseOptions::default()).unwrap();
    assert_eq!(parsed.message.method.as_str(), "GET");
    match &parsed.message.target {
        Target::Origin { path, query } => {
            assert_eq!(path.0, "/p");
            assert!(query.is_none());
        }
        other => panic!("expected origin-form target, got {other:?}"),
    }
    assert_eq!(parsed.message.headers.len(), 1);
    assert_eq!(parsed.message.headers[0].value.as_bytes(), b"example.com");
    assert!(parsed.message.body.is_none());
    assert_eq!(parsed.bytes_consumed, wire.len());
    assert_eq!(parsed.bytes_consumed, 40);
}

#[test]
fn chunked_response_decodes_body_with_no_trailers() {
    let wire = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nHello\r\n8\r\n, World!\r\n0\r\n\r\n";
    let parsed = parse_response(wire, "GET", &ParseOptions::default()).unwrap();
    assert_eq!(parsed.message.body.as_deref(), Some(b"Hello, World!".as_slice()));
    assert_eq!(
        rfc9112::response_body_length(200, "GET", &parsed.message.headers),
        MessageBodyLength::Chunked
    );
}

#[test]
fn ambiguous_framing_with_both_headers_is_rejected() {
    let wire = b"POST / HTTP/1.1\r\nHost: a\r\nContent-Length: 10\r\nTransfer-Encoding: chunked\r\n\r\n0123456789";
    let err = parse_request(wire, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Framing(FramingError::AmbiguousMessageFraming)));
}

#[test]
fn whitespace_before_colon_in_header_name_is_rejected() {
    let wire = b"GET / HTTP/1.1\r\nHost : a\r\n\r\n";
    let err = parse_request(wire, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Syntax(SyntaxError::WhitespaceBeforeColon)));
}

#[test]
fn bare_cr_anywhere_in_the_header_block_is_rejected() {
    let wire = b"GET / HTTP/1.1\r\nHost: a\rX-Evil: b\r\n\r\n";
    let err = parse_request(wire, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Syntax(SyntaxError::BareCR(2))));
}

#[test]
fn no_content_rule_dominates_content_length_on_204() {
    let wire = b"HTTP/1.1 204 No Content\r\nContent-Length: 100\r\n\r\n";
    let parsed = parse_response(wire, "GET", &ParseOptions::default()).unwrap();
    assert!(parsed.message.body.is_none());
    assert_eq!(
        rfc9112::response_body_length(204, "GET", &parsed.message.headers),
        MessageBodyLength::None
    );
}

#[test]
fn body_length_is_stable_under_permutation_of_matching_content_length_entries() {
    use rfc9112::{response_body_length, HeaderField};

    let a = vec![
        HeaderField::new("Content-Length", b"5".to_vec()),
        HeaderField::new("Content-Length", b"5".to_vec()),
    ];
    let b = vec![a[1].clone(), a[0].clone()];
    assert_eq!(response_body_length(200, "GET", &a), MessageBodyLength::Fixed(5));
    assert_eq!(response_body_length(200, "GET", &b), MessageBodyLength::Fixed(5));

    let conflicting = vec![
        HeaderField::new("Content-Length", b"5".to_vec()),
        HeaderField::new("Content-Length", b"6".to_vec()),
    ];
    assert_eq!(response_body_length(200, "GET", &conflicting), MessageBodyLength::None);
}

#[test]
fn request_response_round_trip_through_serializer() {
    use rfc9112::serialize_request;

    let wire = b"GET /p?x=1 HTTP/1.1\r\nHost: example.com\r\nAccept: */*\r\n\r\n";
    let parsed = parse_request(wire, &ParseOptions::default()).unwrap();
    let out = serialize_request(&parsed.message, HttpVersion::HTTP_1_1).unwrap();
    assert_eq!(out, wire);
}

#[test]
fn host_mismatch_against_absolute_form_authority_is_rejected() {
    let wire =
        b"GET http://good.example/p HTTP/1.1\r\nHost: evil.example\r\n\r\n";
    assert!(parse_request(wire, &ParseOptions::default()).is_err());
}

#[test]
fn pipelined_messages_are_parsed_independently_using_bytes_consumed() {
    let wire = b"GET /a HTTP/1.1\r\nHost: e\r\n\r\nGET /b HTTP/1.1\r\nHost: e\r\n\r\n";
    let first = parse_request(wire, &ParseOptions::default()).unwrap();
    let second = parse_request(&wire[first.bytes_consumed..], &ParseOptions::default()).unwrap();
    match second.message.target {
        Target::Origin { path, .. } => assert_eq!(path.0, "/b"),
        other => panic!("unexpected target {other:?}"),
    }
}
