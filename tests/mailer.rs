use scena_crm::domain::mail::{MailAttachment, MailMessage, SmtpConfig};
use scena_crm::domain::types::{EmailAddress, HostName};
use scena_crm::mailer::{MailerError, build_message};

fn smtp_config() -> SmtpConfig {
    SmtpConfig {
        host: HostName::new("mail.example.com").expect("valid host"),
        port: 587,
        username: "crm".to_string(),
        password: "secret".to_string(),
        from: EmailAddress::new("offers@example.com").expect("valid email"),
        from_name: "Scena Offers".to_string(),
    }
}

fn mail_message() -> MailMessage {
    MailMessage {
        to: "Anna Kowalska <anna@example.com>, bart@example.com".to_string(),
        subject: "Your offer".to_string(),
        html_body: "<p>Offer attached</p>".to_string(),
        reply_to: Some("sales@example.com".to_string()),
        attachments: vec![MailAttachment {
            filename: "offer.pdf".to_string(),
            content: b"%PDF-1.4 stub".to_vec(),
            content_type: "application/pdf".to_string(),
        }],
    }
}

#[test]
fn builds_a_multipart_message_with_expected_headers() {
    let (message, message_id) = build_message(&smtp_config(), &mail_message()).expect("build failed");

    let formatted = String::from_utf8_lossy(&message.formatted()).to_string();

    assert!(formatted.contains("Scena Offers"));
    assert!(formatted.contains("offers@example.com"));
    assert!(formatted.contains("anna@example.com"));
    assert!(formatted.contains("bart@example.com"));
    assert!(formatted.contains("Reply-To: sales@example.com"));
    assert!(formatted.contains("Subject: Your offer"));
    assert!(formatted.contains("multipart/mixed"));
    assert!(formatted.contains("text/html"));
    assert!(formatted.contains("offer.pdf"));
    assert!(formatted.contains(&message_id));
}

#[test]
fn message_id_is_scoped_to_the_sender_domain() {
    let (_, message_id) = build_message(&smtp_config(), &mail_message()).expect("build failed");

    assert!(message_id.starts_with('<'));
    assert!(message_id.ends_with("@example.com>"));
}

#[test]
fn message_ids_are_unique_per_build() {
    let (_, first) = build_message(&smtp_config(), &mail_message()).expect("build failed");
    let (_, second) = build_message(&smtp_config(), &mail_message()).expect("build failed");

    assert_ne!(first, second);
}

#[test]
fn blank_from_name_falls_back_to_a_bare_address() {
    let mut config = smtp_config();
    config.from_name = "   ".to_string();

    let (message, _) = build_message(&config, &mail_message()).expect("build failed");
    let formatted = String::from_utf8_lossy(&message.formatted()).to_string();

    assert!(formatted.contains("From: offers@example.com"));
}

#[test]
fn unparsable_recipient_is_a_build_failure() {
    let mut mail = mail_message();
    mail.to = "not an address".to_string();

    let err = build_message(&smtp_config(), &mail).unwrap_err();
    assert!(matches!(err, MailerError::Address(_)));
}

#[test]
fn unparsable_content_type_is_a_build_failure() {
    let mut mail = mail_message();
    mail.attachments[0].content_type = "definitely not a mime type".to_string();

    let err = build_message(&smtp_config(), &mail).unwrap_err();
    assert!(matches!(err, MailerError::Build(_)));
}
