//! End-to-end tests for the public masking API.
//!
//! These tests exercise the integration of:
//! - `Maskable` derive traversal,
//! - annotation and field rule resolution, and
//! - the built-in strategies.

use masker::{Category, MaskError, Maskable, Masker};

#[derive(Clone, Debug, PartialEq, Maskable)]
struct Credentials {
    username: String,
    password: String,
    #[mask("hash")]
    api_token: String,
}

#[derive(Clone, Debug, PartialEq, Maskable)]
struct Account {
    id: u64,
    credentials: Credentials,
    backups: Vec<Credentials>,
}

fn credentials(password: &str) -> Credentials {
    Credentials {
        username: "alice".into(),
        password: password.into(),
        api_token: "tok_live_123".into(),
    }
}

fn rules_masker() -> Masker {
    let mut masker = Masker::new();
    masker.register_field("password", "filled4");
    masker
}

#[test]
fn test_filled_matches_input_length() {
    #[derive(Maskable)]
    struct Pin {
        #[mask("filled")]
        value: String,
    }

    let masked = Masker::new()
        .mask(&Pin {
            value: "secret".into(),
        })
        .unwrap();
    assert_eq!(masked.value, "******");
}

#[test]
fn test_filled_argument_overrides_length() {
    #[derive(Maskable)]
    struct Pin {
        #[mask("filled(6)")]
        value: String,
    }

    let masked = Masker::new().mask(&Pin { value: "abc".into() }).unwrap();
    assert_eq!(masked.value, "******");
}

#[test]
fn test_hash_is_deterministic() {
    let masker = Masker::new();
    let first = masker.mask(&credentials("a")).unwrap();
    let second = masker.mask(&credentials("b")).unwrap();
    assert_eq!(first.api_token, second.api_token);
    assert_eq!(first.api_token.len(), 40);
    assert_ne!(first.api_token, "tok_live_123");
}

#[test]
fn test_zero_per_type() {
    #[derive(Debug, Maskable)]
    struct Profile {
        #[mask("zero")]
        name: String,
        #[mask("zero")]
        age: i32,
        #[mask("zero")]
        score: f64,
        #[mask("zero")]
        verified: bool,
        #[mask("zero")]
        visits: u16,
    }

    let masked = Masker::new()
        .mask(&Profile {
            name: "alice".into(),
            age: 42,
            score: 9.5,
            verified: true,
            visits: 7,
        })
        .unwrap();
    assert_eq!(masked.name, "");
    assert_eq!(masked.age, 0);
    assert!(masked.score.abs() < f64::EPSILON);
    assert!(!masked.verified);
    assert_eq!(masked.visits, 0);
}

#[test]
fn test_random_stays_in_bounds() {
    #[derive(Maskable)]
    struct Reading {
        #[mask("random(100)")]
        signed: i64,
        #[mask("random100")]
        unsigned: u32,
        #[mask("random(0.5)")]
        float: f32,
    }

    let masker = Masker::new();
    for _ in 0..200 {
        let masked = masker
            .mask(&Reading {
                signed: -4_000,
                unsigned: 4_000,
                float: 12.0,
            })
            .unwrap();
        assert!((0..100).contains(&masked.signed));
        assert!(masked.unsigned < 100);
        assert!((0.0..0.5).contains(&masked.float));
    }
}

#[test]
fn test_explicit_annotation_wins_over_field_rule() {
    #[derive(Maskable)]
    struct Login {
        #[mask("fixed")]
        password: String,
    }

    let masked = rules_masker()
        .mask(&Login {
            password: "x".into(),
        })
        .unwrap();
    assert_eq!(masked.password, "********");
}

#[test]
fn test_field_rule_applies_by_name() {
    let masked = rules_masker().mask(&credentials("hunter2")).unwrap();
    assert_eq!(masked.password, "****");
    assert_eq!(masked.username, "alice");
}

#[test]
fn test_preserve_ends_examples() {
    #[derive(Maskable)]
    struct Card {
        #[mask("preserveEnds(3,3)")]
        number: String,
        #[mask("preserveEnds(3,3)")]
        short: String,
        #[mask("preserveEnds(3,3)")]
        overlap: String,
    }

    let masked = Masker::new()
        .mask(&Card {
            number: "1234567890".into(),
            short: "abc".into(),
            overlap: "abcde".into(),
        })
        .unwrap();
    assert_eq!(masked.number, "123****890");
    assert_eq!(masked.short, "***");
    assert_eq!(masked.overlap, "a***e");
}

#[test]
fn test_nested_masking() {
    let account = Account {
        id: 7,
        credentials: credentials("hunter2"),
        backups: vec![credentials("old"), credentials("older")],
    };

    let masked = rules_masker().mask(&account).unwrap();
    assert_eq!(masked.id, 7);
    assert_eq!(masked.credentials.password, "****");
    assert!(masked
        .backups
        .iter()
        .all(|backup| backup.password == "****" && backup.username == "alice"));
}

#[test]
fn test_input_is_not_mutated() {
    let account = Account {
        id: 1,
        credentials: credentials("hunter2"),
        backups: vec![credentials("old")],
    };
    let before = account.clone();

    let masked = rules_masker().mask(&account).unwrap();
    assert_eq!(account, before);
    assert_ne!(masked, before);
}

#[test]
fn test_unknown_strategy_aborts() {
    #[derive(Debug, Maskable)]
    struct Broken {
        ok: String,
        #[mask("doesNotExist")]
        value: String,
    }

    let error = Masker::new()
        .mask(&Broken {
            ok: "fine".into(),
            value: "secret".into(),
        })
        .unwrap_err();
    match &error {
        MaskError::UnknownStrategy {
            path,
            category,
            strategy,
        } => {
            assert_eq!(path.to_string(), "value");
            assert_eq!(*category, Category::String);
            assert_eq!(strategy, "doesNotExist");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!error.to_string().contains("secret"));
}

#[test]
fn test_error_path_points_into_nested_member() {
    #[derive(Debug, Maskable)]
    struct Item {
        #[mask("random(-1)")]
        quantity: i32,
    }

    #[derive(Debug, Maskable)]
    struct Order {
        items: Vec<Item>,
    }

    let error = Masker::new()
        .mask(&Order {
            items: vec![Item { quantity: 1 }, Item { quantity: 2 }],
        })
        .unwrap_err();
    assert!(matches!(error, MaskError::InvalidArgument { .. }));
    assert_eq!(error.path().to_string(), "items[0].quantity");
    assert_eq!(error.strategy(), "random");
}

#[test]
fn test_narrowing_failure_is_strategy_error() {
    #[derive(Debug, Maskable)]
    struct Small {
        #[mask("big")]
        value: u8,
    }

    let mut masker = Masker::new();
    masker.register_uint("big", |_, _| Ok(1_000));
    let error = masker.mask(&Small { value: 1 }).unwrap_err();
    assert!(matches!(error, MaskError::Strategy { .. }));
    assert_eq!(error.path().to_string(), "value");
}

#[test]
fn test_default_masker_has_default_rules() {
    #[derive(Maskable)]
    struct Request {
        #[allow(non_snake_case)]
        Authorization: String,
        signing_key: String,
        password: String,
        body: String,
    }

    let masked = masker::mask(&Request {
        Authorization: "Bearer abc".into(),
        signing_key: "k".into(),
        password: "correct horse battery staple".into(),
        body: "hello".into(),
    })
    .unwrap();
    assert_eq!(masked.Authorization, "*".repeat(32));
    assert_eq!(masked.signing_key, "*".repeat(32));
    assert_eq!(masked.password, "****");
    assert_eq!(masked.body, "hello");
}
