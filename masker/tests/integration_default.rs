//! Installing a custom default masker.
//!
//! Kept in its own test binary: the default instance can only be set before
//! its first use in the process.

use masker::{Maskable, Masker, MaskerConfig};

#[test]
fn test_set_default_before_first_use() {
    #[derive(Debug, Maskable)]
    struct Request {
        api_key: String,
        password: String,
    }

    let config = MaskerConfig::default()
        .with_default_rules()
        .with_field("api_key", "fixed")
        .with_mask_char('#');
    assert!(masker::set_default(Masker::from_config(&config)).is_ok());

    let masked = masker::mask(&Request {
        api_key: "k".into(),
        password: "p".into(),
    })
    .unwrap();
    assert_eq!(masked.api_key, "########");
    assert_eq!(masked.password, "####");

    let rejected = masker::set_default(Masker::new());
    assert!(rejected.is_err());
    assert_eq!(masker::default_masker().mask_char(), '#');
}
