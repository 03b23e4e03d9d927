use serde_json::json;

use gmcli::mail::base64url;
use gmcli::mail::payload::{attachments, extract_text_body, header};
use gmcli::mail::{Header, MimePart};

fn part(value: serde_json::Value) -> MimePart {
    serde_json::from_value(value).expect("payload should deserialize")
}

fn alternative(first: serde_json::Value, second: serde_json::Value) -> MimePart {
    part(json!({
        "mimeType": "multipart/alternative",
        "parts": [first, second]
    }))
}

#[test]
fn alternative_yields_plain_text_in_either_order() {
    let plain = json!({"mimeType": "text/plain", "body": {"data": base64url::encode("plain body")}});
    let html = json!({"mimeType": "text/html", "body": {"data": base64url::encode("<p>html body</p>")}});

    assert_eq!(extract_text_body(&alternative(plain.clone(), html.clone())), "plain body");
    assert_eq!(extract_text_body(&alternative(html, plain)), "plain body");
}

#[test]
fn nested_plain_text_is_found_depth_first() {
    let payload = part(json!({
        "mimeType": "multipart/mixed",
        "parts": [
            {
                "mimeType": "multipart/alternative",
                "parts": [
                    {"mimeType": "text/html", "body": {"data": base64url::encode("<b>x</b>")}},
                    {"mimeType": "text/plain", "body": {"data": base64url::encode("nested café")}}
                ]
            },
            {"mimeType": "application/pdf", "filename": "doc.pdf", "body": {"attachmentId": "a1", "size": 100}}
        ]
    }));

    assert_eq!(extract_text_body(&payload), "nested café");
}

#[test]
fn html_only_message_has_no_text_body() {
    let payload = part(json!({
        "mimeType": "text/html",
        "body": {"data": base64url::encode("<p>only html</p>")}
    }));
    assert_eq!(extract_text_body(&payload), "");
}

#[test]
fn attachments_follow_document_order() {
    let payload = part(json!({
        "mimeType": "multipart/mixed",
        "parts": [
            {"mimeType": "text/plain", "body": {"data": base64url::encode("see attached")}},
            {"mimeType": "application/pdf", "filename": "doc.pdf", "body": {"attachmentId": "att-pdf", "size": 2048}},
            {"mimeType": "image/png", "filename": "img.png", "body": {"attachmentId": "att-png", "size": 512}}
        ]
    }));

    let found = attachments(&payload);
    let names = found.iter().map(|a| a.filename.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["doc.pdf", "img.png"]);
    assert_eq!(found[0].attachment_id, "att-pdf");
    assert_eq!(found[0].mime_type, "application/pdf");
    assert_eq!(found[1].size, 512);
}

#[test]
fn attachment_without_mime_type_defaults_to_octet_stream() {
    let payload = part(json!({
        "mimeType": "multipart/mixed",
        "parts": [{"filename": "blob.bin", "body": {"attachmentId": "att-1", "size": 3}}]
    }));

    let found = attachments(&payload);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].mime_type, "application/octet-stream");
}

#[test]
fn header_lookup_is_case_insensitive_and_root_only() {
    let payload = MimePart::multipart(
        "multipart/mixed",
        vec![MimePart::leaf("text/plain", None).with_headers(vec![Header {
            name: "X-Child".to_string(),
            value: "child".to_string(),
        }])],
    )
    .with_headers(vec![
        Header {
            name: "subject".to_string(),
            value: "first".to_string(),
        },
        Header {
            name: "Subject".to_string(),
            value: "second".to_string(),
        },
    ]);

    assert_eq!(header(&payload, "SUBJECT"), Some("first"));
    assert_eq!(header(&payload, "X-Child"), None);
}
