use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SheetError::invalid_config("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        SheetError::host("x")
            .to_string()
            .contains("host operation failed:")
    );
    assert!(
        SheetError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SheetError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_invalid_configuration());
}

#[test]
fn invalid_configuration_is_classified() {
    assert!(SheetError::invalid_config("bad layout").is_invalid_configuration());
    assert!(!SheetError::host("export failed").is_invalid_configuration());
}
