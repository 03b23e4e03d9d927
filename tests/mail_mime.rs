use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gmcli::error::AppError;
use gmcli::mail::MessageBuilder;
use gmcli::mail::base64url;

fn decoded(builder: &MessageBuilder) -> String {
    base64url::decode_to_string(&builder.build())
}

fn base_message() -> MessageBuilder {
    MessageBuilder::new()
        .from("me@example.com")
        .to(vec!["you@example.com".to_string()])
        .subject("Quarterly numbers")
        .body("Hi,\nnumbers attached.\n")
}

#[test]
fn simple_message_carries_headers_and_body() {
    let raw = decoded(&base_message());

    assert!(raw.contains("From: me@example.com\r\n"));
    assert!(raw.contains("To: you@example.com\r\n"));
    assert!(raw.contains("Subject: Quarterly numbers\r\n"));
    assert!(raw.contains("Content-Type: text/plain; charset=utf-8\r\n"));
    assert!(raw.ends_with("\r\n\r\nHi,\nnumbers attached.\n"));
    assert!(!raw.contains("Cc:"));
    assert!(!raw.contains("In-Reply-To:"));
}

#[test]
fn recipients_are_comma_joined() {
    let raw = decoded(
        &base_message()
            .to(vec!["a@example.com".to_string(), "b@example.com".to_string()])
            .cc(vec!["c@example.com".to_string()])
            .bcc(vec!["d@example.com".to_string(), "e@example.com".to_string()]),
    );

    assert!(raw.contains("To: a@example.com, b@example.com\r\n"));
    assert!(raw.contains("Cc: c@example.com\r\n"));
    assert!(raw.contains("Bcc: d@example.com, e@example.com\r\n"));
}

#[test]
fn non_ascii_subject_is_encoded_word() {
    let raw = decoded(&base_message().subject("Grüße aus Köln"));
    assert!(raw.contains("Subject: =?UTF-8?B?"));
    assert!(!raw.contains("Grüße"));
}

#[test]
fn attachment_makes_multipart_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("report.pdf");
    let mut file = std::fs::File::create(&path).expect("create file");
    file.write_all(b"%PDF-1.4 fake").expect("write file");

    let builder = base_message().attach(&path).expect("attach");
    assert_eq!(builder.attachments().len(), 1);

    let raw = decoded(&builder);
    assert!(raw.contains("Content-Type: multipart/mixed; boundary=\"gmcli_"));
    assert!(raw.contains("Content-Disposition: attachment; filename=\"report.pdf\""));
    assert!(raw.contains("Content-Type: application/pdf; name=\"report.pdf\""));
    assert!(raw.contains("Content-Transfer-Encoding: quoted-printable"));
    assert!(!raw.contains(&dir.path().display().to_string()));
}

#[test]
fn missing_attachment_fails_at_attach_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nope.txt");

    let err = base_message().attach(&path).expect_err("missing file");
    match err {
        AppError::FileNotFound(missing) => assert_eq!(missing, path),
        other => panic!("expected file not found, got {other:?}"),
    }
}

#[test]
fn reply_threads_the_message() {
    let builder = base_message().reply_to(
        "<parent@mail.example.com>",
        Some("<root@mail.example.com> <parent@mail.example.com>".to_string()),
        Some("19aea1f2f3532db5".to_string()),
    );

    let raw = decoded(&builder);
    assert!(raw.contains("In-Reply-To: <parent@mail.example.com>\r\n"));
    assert!(raw.contains("References: <root@mail.example.com> <parent@mail.example.com>\r\n"));
    assert_eq!(builder.thread_id(), Some("19aea1f2f3532db5"));
    assert!(!raw.contains("19aea1f2f3532db5"));
}

#[test]
fn reply_without_chain_references_parent_only() {
    let builder = base_message().reply_to("<p@x>", None, None);

    let raw = decoded(&builder);
    assert!(raw.contains("In-Reply-To: <p@x>\r\n"));
    assert!(raw.contains("References: <p@x>\r\n"));
    assert_eq!(builder.thread_id(), None);
}

#[test]
fn attachment_body_is_wrapped_base64_of_file() {
    let contents = (0..=255u8).cycle().take(700).collect::<Vec<_>>();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("blob.bin");
    std::fs::write(&path, &contents).expect("write file");

    let raw = base_message().attach(&path).expect("attach").render();
    assert!(raw.contains("Content-Type: application/octet-stream; name=\"blob.bin\""));

    let marker = "Content-Transfer-Encoding: base64\r\n\r\n";
    let start = raw.find(marker).expect("attachment part") + marker.len();
    let end = start + raw[start..].find("\r\n--").expect("closing boundary");
    let lines = raw[start..end].split("\r\n").collect::<Vec<_>>();

    assert!(lines.len() > 1);
    assert!(lines.iter().all(|line| line.len() <= 76));
    assert!(lines[..lines.len() - 1].iter().all(|line| line.len() == 76));

    let decoded = STANDARD.decode(lines.concat()).expect("valid base64");
    assert_eq!(decoded, contents);
}
