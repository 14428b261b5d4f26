//! Integration tests for hive-renderer-security

use hive_renderer_security::*;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

fn sanitizer_with(list: Arc<PhishingList>) -> LinkSanitizer {
    LinkSanitizer::new(&LinkSanitizerOptions::new("https://example.com"), list).unwrap()
}

#[test]
fn test_pseudo_local_detection() {
    let links = sanitizer_with(Arc::new(PhishingList::empty()));

    assert_eq!(
        links.evaluate("https://evil.test", "example.com"),
        LinkVerdict::Rejected(RejectionReason::PseudoLocalUrl)
    );
    assert_eq!(
        links.evaluate("https://example.com/post/1", "example.com"),
        LinkVerdict::Safe("https://example.com/post/1".to_string())
    );
}

#[test]
fn test_phishing_list_shared_between_evaluators() {
    let list = Arc::new(PhishingList::empty());
    let first = sanitizer_with(list.clone());
    let second = sanitizer_with(list.clone());

    assert!(first.evaluate("https://fresh-scam.test", "claim").is_safe());

    list.replace(PhishingEntries::new(["fresh-scam.test"], std::iter::empty::<&str>()));

    assert!(!first.evaluate("https://fresh-scam.test", "claim").is_safe());
    assert!(!second.evaluate("https://fresh-scam.test", "claim").is_safe());
}

#[test]
fn test_phishing_list_replace_while_reading() {
    let list = Arc::new(PhishingList::new(PhishingEntries::new(
        ["a.test"],
        std::iter::empty::<&str>(),
    )));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let list = list.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = list.snapshot();
                    // Each snapshot is one complete entry set.
                    assert!(snapshot.contains_domain("a.test") != snapshot.contains_domain("b.test"));
                }
            })
        })
        .collect();

    for i in 0..50 {
        let domain = if i % 2 == 0 { "b.test" } else { "a.test" };
        list.replace(PhishingEntries::new([domain], std::iter::empty::<&str>()));
    }

    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_security_gate_script_escape_hatch() {
    let html = "<p>x</p><script>alert(1)</script>";
    assert!(matches!(
        SecurityChecker::check_security(html, &SecurityOptions::default()),
        Err(SecurityError::SecurityViolation(_))
    ));
    assert!(SecurityChecker::check_security(html, &SecurityOptions::new(true)).is_ok());
}

#[test]
fn test_encoder_attribute() {
    let encoded = HtmlEncoder::encode_html_attribute(r#"x" onload="y"#);
    assert!(!encoded.contains('"'));
}

proptest! {
    #[test]
    fn prop_listed_domains_never_safe(
        label in "[a-z][a-z0-9]{2,10}",
        sub in proptest::option::of("[a-z]{1,8}"),
        path in "[a-z0-9/]{0,12}",
        text in "[ -~]{0,30}",
    ) {
        let domain = format!("{}.test", label);
        let list = Arc::new(PhishingList::new(PhishingEntries::new(
            [domain.as_str()],
            std::iter::empty::<&str>(),
        )));
        let links = sanitizer_with(list);

        let host = match sub {
            Some(sub) => format!("{}.{}", sub, domain),
            None => domain.clone(),
        };
        for url in [
            format!("https://{}/{}", host, path),
            format!("http://{}/{}", host, path),
            format!("//{}/{}", host, path),
            format!("{}/{}", host, path),
        ] {
            prop_assert!(!links.evaluate(&url, &text).is_safe(), "{} was accepted", url);
        }
    }

    #[test]
    fn prop_gate_rejects_any_script_tag(prefix in "[a-zA-Z <>/]{0,20}", case in "(script|SCRIPT|ScRiPt)") {
        let html = format!("{}<{}>", prefix, case);
        prop_assert!(SecurityChecker::check_security(&html, &SecurityOptions::default()).is_err());
    }
}
