//! Traversal behaviour across shapes: enums, generics, indirections, maps and
//! the warnings reported for annotations that cannot apply.

use std::{
    collections::{BTreeMap, HashMap},
    marker::PhantomData,
    sync::Arc,
};

use masker::{MaskWarning, Maskable, Masker, Shape};

fn masker() -> Masker {
    let mut masker = Masker::new();
    masker.register_field("password", "filled4");
    masker.register_field("authorization", "fixed");
    masker
}

#[derive(Clone, Debug, PartialEq, Maskable)]
enum Secret {
    None,
    Password(#[mask("filled")] String),
    Key {
        id: u32,
        #[mask("preserveEnds(1,1)")]
        material: String,
    },
}

#[test]
fn test_enum_variants_are_masked() {
    let masker = masker();
    assert_eq!(masker.mask(&Secret::None).unwrap(), Secret::None);
    assert_eq!(
        masker.mask(&Secret::Password("abc".into())).unwrap(),
        Secret::Password("***".into())
    );
    assert_eq!(
        masker
            .mask(&Secret::Key {
                id: 9,
                material: "abcdef".into(),
            })
            .unwrap(),
        Secret::Key {
            id: 9,
            material: "a****f".into(),
        }
    );
}

#[test]
fn test_enum_members_are_numbered_across_variants() {
    let metadata = masker().type_metadata::<Secret>();
    let names: Vec<_> = metadata.members().iter().map(|member| member.name()).collect();
    assert_eq!(names, vec!["0", "id", "material"]);
}

#[test]
fn test_tuple_struct_members() {
    #[derive(Debug, Maskable)]
    struct Pair(String, #[mask("fixed")] String);

    let masked = masker().mask(&Pair("a".into(), "b".into())).unwrap();
    assert_eq!(masked.0, "a");
    assert_eq!(masked.1, "********");
}

#[test]
fn test_unit_struct() {
    #[derive(Debug, PartialEq, Maskable)]
    struct Marker;

    assert_eq!(masker().mask(&Marker).unwrap(), Marker);
}

#[test]
fn test_generic_members_are_walked() {
    #[derive(Debug, Maskable)]
    struct Envelope<T> {
        payload: T,
        #[mask("zero")]
        sequence: u64,
    }

    #[derive(Debug, Maskable)]
    struct Login {
        password: String,
    }

    let masked = masker()
        .mask(&Envelope {
            payload: Login {
                password: "hunter2".into(),
            },
            sequence: 12,
        })
        .unwrap();
    assert_eq!(masked.payload.password, "****");
    assert_eq!(masked.sequence, 0);
}

#[test]
fn test_phantom_data_does_not_require_maskable() {
    #[allow(dead_code)]
    struct NotMaskable;

    #[derive(Debug, Maskable)]
    struct TypedId<T> {
        id: String,
        _marker: PhantomData<T>,
    }

    let masked = masker()
        .mask(&TypedId::<NotMaskable> {
            id: "user-1".into(),
            _marker: PhantomData,
        })
        .unwrap();
    assert_eq!(masked.id, "user-1");
}

#[test]
fn test_annotation_is_forwarded_through_indirections() {
    #[derive(Debug, Maskable)]
    struct Holder {
        #[mask("filled")]
        optional: Option<String>,
        #[mask("filled")]
        missing: Option<String>,
        #[mask("fixed")]
        boxed: Box<String>,
        #[mask("zero")]
        shared: Arc<Option<i32>>,
    }

    let masked = masker()
        .mask(&Holder {
            optional: Some("abcd".into()),
            missing: None,
            boxed: Box::new("x".into()),
            shared: Arc::new(Some(7)),
        })
        .unwrap();
    assert_eq!(masked.optional.as_deref(), Some("****"));
    assert_eq!(masked.missing, None);
    assert_eq!(*masked.boxed, "********");
    assert_eq!(*masked.shared, Some(0));
}

#[test]
fn test_recursive_types() {
    #[derive(Debug, Maskable)]
    struct Node {
        password: String,
        next: Option<Box<Node>>,
    }

    let list = Node {
        password: "a".into(),
        next: Some(Box::new(Node {
            password: "b".into(),
            next: None,
        })),
    };
    let masked = masker().mask(&list).unwrap();
    assert_eq!(masked.password, "****");
    assert_eq!(masked.next.unwrap().password, "****");
}

#[test]
fn test_map_values_follow_rules_by_key() {
    #[derive(Debug, Maskable)]
    struct Request {
        headers: HashMap<String, String>,
    }

    let mut headers = HashMap::new();
    headers.insert("authorization".to_string(), "Bearer abc".to_string());
    headers.insert("accept".to_string(), "application/json".to_string());

    let masked = masker().mask(&Request { headers }).unwrap();
    assert_eq!(masked.headers["authorization"], "********");
    assert_eq!(masked.headers["accept"], "application/json");
}

#[test]
fn test_map_keys_are_never_masked() {
    let mut map = BTreeMap::new();
    map.insert("password".to_string(), "p".to_string());

    let masked = masker().mask(&map).unwrap();
    assert!(masked.contains_key("password"));
    assert_eq!(masked["password"], "****");
}

#[test]
fn test_map_rule_does_not_apply_to_composite_values() {
    #[derive(Clone, Debug, PartialEq, Maskable)]
    struct Inner {
        note: String,
    }

    let mut map = HashMap::new();
    map.insert(
        "password".to_string(),
        Inner {
            note: "plain".into(),
        },
    );

    let report = masker().mask_with_report(&map).unwrap();
    assert_eq!(report.value["password"].note, "plain");
    assert!(report.warnings.is_empty());
}

#[test]
fn test_non_string_keys_use_entry_ordinals_in_paths() {
    #[derive(Debug, Maskable)]
    struct Item {
        #[mask("nope")]
        value: String,
    }

    let mut map = BTreeMap::new();
    map.insert(10_u32, Item { value: "a".into() });

    let error = masker().mask(&map).unwrap_err();
    assert_eq!(error.path().to_string(), "[#0].value");
}

#[test]
fn test_string_key_appears_in_error_path() {
    #[derive(Debug, Maskable)]
    struct Config {
        secrets: BTreeMap<String, i64>,
    }

    let mut masker = masker();
    masker.register_field("pin", "hash");

    let mut secrets = BTreeMap::new();
    secrets.insert("pin".to_string(), 1234);
    let error = masker.mask(&Config { secrets }).unwrap_err();
    assert_eq!(error.path().to_string(), "secrets[\"pin\"]");
}

#[test]
fn test_annotation_on_composite_member_warns_and_walks() {
    #[derive(Clone, Debug, Maskable)]
    struct Inner {
        password: String,
    }

    #[derive(Debug, Maskable)]
    struct Outer {
        #[mask("zero")]
        inner: Inner,
        #[mask("filled")]
        list: Vec<String>,
    }

    let report = masker()
        .mask_with_report(&Outer {
            inner: Inner {
                password: "hunter2".into(),
            },
            list: vec!["visible".into()],
        })
        .unwrap();

    assert_eq!(report.value.inner.password, "****");
    assert_eq!(report.value.list, vec!["visible".to_string()]);
    assert_eq!(report.warnings.len(), 2);
    match &report.warnings[0] {
        MaskWarning::UnsupportedCombination {
            path,
            strategy,
            shape,
        } => {
            assert_eq!(path.to_string(), "inner");
            assert_eq!(strategy, "zero");
            assert_eq!(*shape, Shape::Record);
        }
    }
    assert!(matches!(
        &report.warnings[1],
        MaskWarning::UnsupportedCombination { shape: Shape::Sequence, .. }
    ));
}

#[test]
fn test_field_rule_on_composite_member_is_silent() {
    #[derive(Debug, Maskable)]
    struct Inner {
        value: String,
    }

    #[derive(Debug, Maskable)]
    struct Outer {
        password: Inner,
    }

    let report = masker()
        .mask_with_report(&Outer {
            password: Inner {
                value: "kept".into(),
            },
        })
        .unwrap();
    assert_eq!(report.value.password.value, "kept");
    assert!(report.warnings.is_empty());
}

#[test]
fn test_field_rule_behind_indirection_to_composite_is_silent() {
    #[derive(Debug, Maskable)]
    struct Inner {
        value: String,
    }

    #[derive(Debug, Maskable)]
    struct Outer {
        password: Option<Inner>,
        authorization: Box<Vec<String>>,
    }

    let mut headers = HashMap::new();
    headers.insert("password".to_string(), Arc::new(vec!["kept".to_string()]));

    let masker = masker();
    let report = masker
        .mask_with_report(&Outer {
            password: Some(Inner {
                value: "kept".into(),
            }),
            authorization: Box::new(vec!["kept".into()]),
        })
        .unwrap();
    assert_eq!(report.value.password.unwrap().value, "kept");
    assert_eq!(*report.value.authorization, vec!["kept".to_string()]);
    assert!(report.warnings.is_empty());

    let report = masker.mask_with_report(&headers).unwrap();
    assert_eq!(*report.value["password"], vec!["kept".to_string()]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_field_rule_behind_indirection_to_leaf_applies() {
    #[derive(Debug, Maskable)]
    struct Login {
        password: Option<Box<String>>,
    }

    let masked = masker()
        .mask(&Login {
            password: Some(Box::new("hunter2".into())),
        })
        .unwrap();
    assert_eq!(masked.password.as_deref().map(String::as_str), Some("****"));
}

#[test]
fn test_members_named_like_traversal_locals() {
    #[derive(Debug, Maskable)]
    struct Request {
        metadata: HashMap<String, String>,
        walker: String,
        masker_walker: u32,
        masker_metadata: Option<String>,
        password: String,
    }

    #[derive(Debug, Maskable)]
    enum Envelope {
        Tagged { metadata: String, walker: Vec<String> },
        Plain(String),
    }

    let mut metadata = HashMap::new();
    metadata.insert("authorization".to_string(), "Bearer abc".to_string());
    metadata.insert("trace".to_string(), "t-1".to_string());

    let masked = masker()
        .mask(&Request {
            metadata,
            walker: "w".into(),
            masker_walker: 7,
            masker_metadata: Some("m".into()),
            password: "hunter2".into(),
        })
        .unwrap();
    assert_eq!(masked.metadata["authorization"], "********");
    assert_eq!(masked.metadata["trace"], "t-1");
    assert_eq!(masked.walker, "w");
    assert_eq!(masked.masker_walker, 7);
    assert_eq!(masked.masker_metadata.as_deref(), Some("m"));
    assert_eq!(masked.password, "****");

    let masked = masker()
        .mask(&Envelope::Tagged {
            metadata: "m".into(),
            walker: vec!["w".into()],
        })
        .unwrap();
    let Envelope::Tagged { metadata, walker } = masked else {
        panic!("variant changed");
    };
    assert_eq!(metadata, "m");
    assert_eq!(walker, vec!["w".to_string()]);
    assert!(matches!(
        masker().mask(&Envelope::Plain("p".into())).unwrap(),
        Envelope::Plain(text) if text == "p"
    ));
}

#[test]
fn test_fixed_size_array_member() {
    #[derive(Debug, Maskable)]
    struct Keys {
        #[mask("fixed")]
        primary: String,
        backups: [Option<String>; 2],
    }

    let report = masker()
        .mask_with_report(&Keys {
            primary: "k0".into(),
            backups: [Some("k1".into()), None],
        })
        .unwrap();
    assert_eq!(report.value.primary, "********");
    assert_eq!(report.value.backups, [Some("k1".to_string()), None]);
}

#[test]
fn test_annotation_key_selects_annotations() {
    #[derive(Debug, Maskable)]
    struct Event {
        #[mask("fixed", log = "filled")]
        token: String,
        #[mask(log = "zero")]
        count: u32,
    }

    let event = Event {
        token: "abc".into(),
        count: 3,
    };

    let default_key = masker().mask(&event).unwrap();
    assert_eq!(default_key.token, "********");
    assert_eq!(default_key.count, 3);

    let mut log_masker = masker();
    log_masker.set_annotation_key("log");
    let log_key = log_masker.mask(&event).unwrap();
    assert_eq!(log_key.token, "***");
    assert_eq!(log_key.count, 0);
}

#[test]
fn test_cache_can_be_disabled_and_cleared() {
    #[derive(Debug, Maskable)]
    struct Login {
        password: String,
    }

    let masker = masker();
    let login = Login {
        password: "abc".into(),
    };

    masker.mask(&login).unwrap();
    assert!(!masker.cache().is_empty());

    masker.clear_cache();
    assert!(masker.cache().is_empty());

    masker.set_cache_enabled(false);
    assert_eq!(masker.mask(&login).unwrap().password, "****");
    assert!(masker.cache().is_empty());
}
