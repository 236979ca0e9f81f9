use std::io::Write;

use fake::{
    faker::{company::en::CatchPhrase, internet::en::SafeEmail, lorem::en::Paragraph},
    Fake,
};
use lettre::address::Envelope;
use mail_parser::MessageParser;
use tempfile::NamedTempFile;
use tokio::time::{timeout, Duration};

use crate::{send_with, Config, Error, ErrorKind, Result, Transport};

use self::sink::Sink;


/// a transport for paths that must fail before any network activity
struct Unreachable;

impl Transport for Unreachable {
    fn connect(&mut self, host: &str) -> Result<()> {
        panic!("unexpected connection to {host}");
    }

    fn enable_debug(&mut self) {}

    fn send(&mut self, _envelope: &Envelope, _message: &[u8]) -> Result<()> {
        panic!("unexpected send");
    }

    fn close(&mut self) -> Result<()> {
        panic!("unexpected close");
    }
}

fn file_with(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "  {line}  ").unwrap();
    }

    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_str().unwrap().to_owned()
}

async fn deliver(config: Config) -> Result<()> {
    tokio::task::spawn_blocking(move || crate::run(&config))
        .await
        .expect("delivery panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn delivers_to_smtp_host() {
    let mut sink = Sink::start(false).await;

    let from: String = SafeEmail().fake();
    let to: Vec<String> = (0..3).map(|_| SafeEmail().fake()).collect();
    let cc: String = SafeEmail().fake();
    let subject: String = CatchPhrase().fake();
    let body: Vec<String> = vec![
        Paragraph(2..3).fake::<String>(),
        String::new(),
        Paragraph(2..3).fake::<String>(),
    ];

    let to_file = file_with(&to);
    let body_file = file_with(&body);

    let config = Config {
        from: from.clone(),
        to: path_of(&to_file),
        subject: format!(" {subject} "),
        body: path_of(&body_file),
        smtp_host: sink.addr.to_string(),
        cc: Some(cc.clone()),
        ..Default::default()
    };

    timeout(Duration::from_secs(5), deliver(config))
        .await
        .expect("delivery stalled")
        .expect("failed to send email");

    let received = timeout(Duration::from_secs(5), sink.rx.recv())
        .await
        .expect("timed out waiting for the message")
        .expect("sink stopped");

    let mut recipients = to.clone();
    recipients.push(cc.clone());
    assert_eq!(received.envelope_from, from);
    assert_eq!(received.envelope_recipients, recipients);

    let parsed = MessageParser::default()
        .parse(&received.raw)
        .expect("failed to parse received message");

    let addresses = |address: Option<&mail_parser::Address>| {
        address
            .map(|a| {
                a.iter()
                    .filter_map(|addr| addr.address())
                    .map(ToString::to_string)
                    .collect::<Vec<String>>()
            })
            .unwrap_or_default()
    };

    assert_eq!(addresses(parsed.from()), vec![from]);
    assert_eq!(addresses(parsed.to()), to);
    assert_eq!(addresses(parsed.cc()), vec![cc]);
    assert_eq!(parsed.subject(), Some(subject.as_str()));
    assert!(parsed.date().is_some());

    let text = parsed.body_text(0).expect("no text body");
    assert_eq!(
        text.replace("\r\n", "\n").trim_end(),
        body.join("\n").trim_end()
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_message_is_a_transport_error() {
    let mut sink = Sink::start(true).await;

    let config = Config {
        from: SafeEmail().fake(),
        to: SafeEmail().fake(),
        subject: CatchPhrase().fake(),
        body: CatchPhrase().fake(),
        smtp_host: sink.addr.to_string(),
        ..Default::default()
    };

    let err = timeout(Duration::from_secs(5), deliver(config))
        .await
        .expect("rejected delivery stalled")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("554"), "{err}");
    assert!(sink.rx.try_recv().is_err());

    // the session is still closed politely after the rejection
    timeout(Duration::from_secs(5), sink.quits.recv())
        .await
        .expect("timed out waiting for QUIT")
        .expect("sink stopped");
}

#[test]
fn missing_field_fails_before_connecting() {
    let config = Config {
        from: String::new(),
        to: "b@x.com".into(),
        subject: "Hi".into(),
        body: "Hello".into(),
        smtp_host: "localhost".into(),
        ..Default::default()
    };

    match send_with(&config, Unreachable) {
        Err(Error::Configuration(field)) => assert_eq!(field, "from"),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[test]
fn empty_from_file_fails_before_connecting() {
    let from = NamedTempFile::new().unwrap();

    let config = Config {
        from: path_of(&from),
        to: "b@x.com".into(),
        subject: "Hi".into(),
        body: "Hello".into(),
        smtp_host: "localhost".into(),
        ..Default::default()
    };

    let err = send_with(&config, Unreachable).unwrap_err();
    assert!(matches!(err, Error::EmptyFile(_)));
    assert_eq!(err.kind(), ErrorKind::FileAccess);
}

#[test]
fn invalid_address_fails_before_connecting() {
    let config = Config {
        from: "a@x.com".into(),
        to: "not an address".into(),
        subject: "Hi".into(),
        body: "Hello".into(),
        smtp_host: "localhost".into(),
        ..Default::default()
    };

    let err = send_with(&config, Unreachable).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composition);
}
