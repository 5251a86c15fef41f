use super::*;

fn cli(base_url: Option<&str>, cookie: Option<&str>, tag: Option<&str>) -> Cli {
    Cli {
        base_url: base_url.map(str::to_owned),
        session_cookie: cookie.map(str::to_owned),
        tag: tag.map(str::to_owned),
        command: Command::Resolve { source: "/x".into() },
    }
}

#[test]
fn no_values_use_defaults() {
    let config = build_config(&cli(None, None, None)).unwrap();
    assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8069/");
    assert_eq!(config.session_cookie, None);
    assert_eq!(config.tag_name, "remote-fragment");
}

#[test]
fn values_flow_into_config() {
    let config = build_config(&cli(
        Some("https://erp.example.test/odoo/"),
        Some("session_id=abc"),
        Some("offer-widget"),
    ))
    .unwrap();
    assert_eq!(config.base_url.as_str(), "https://erp.example.test/odoo/");
    assert_eq!(config.session_cookie.as_deref(), Some("session_id=abc"));
    assert_eq!(config.tag_name, "offer-widget");
}

#[test]
fn invalid_base_url_flag_errors() {
    let err = build_config(&cli(Some("not a url"), None, None)).unwrap_err();
    assert!(matches!(err, SetupError::InvalidBaseUrl(_)));
}

#[test]
fn base_url_flag_wins_over_unusable_environment_value() {
    unsafe { std::env::set_var("FRAGMENT_BASE_URL", "garbage") };

    let parsed = Cli::try_parse_from([
        "fragment-cli",
        "--base-url",
        "http://ok.example.test/",
        "resolve",
        "/fragment",
    ])
    .unwrap();
    let config = build_config(&parsed).unwrap();

    assert_eq!(config.base_url.as_str(), "http://ok.example.test/");
}
