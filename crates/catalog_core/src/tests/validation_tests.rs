use super::*;

fn obras_sociales() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new(1, "OSDE"),
        CatalogItem::new(2, "Swiss Medical"),
        CatalogItem::new(3, " IOMA "),
    ]
}

#[test]
fn normalize_trims_both_ends() {
    assert_eq!(normalize("  PAMI \t"), "PAMI");
}

#[test]
fn duplicate_ignores_case_and_whitespace() {
    let list = obras_sociales();
    assert!(is_duplicate("osde", &list, None));
    assert!(is_duplicate("swiss medical", &list, None));
    assert!(is_duplicate("ioma", &list, None));
    assert!(!is_duplicate("Galeno", &list, None));
}

#[test]
fn duplicate_skips_excluded_id() {
    let list = obras_sociales();
    assert!(!is_duplicate("OSDE", &list, Some(&CatalogId::Int(1))));
    assert!(is_duplicate("OSDE", &list, Some(&CatalogId::Int(2))));
}

#[test]
fn allowed_characters() {
    for c in ['a', 'Z', '7', ' ', '.', '-', ':', 'ñ', 'Ñ', 'á', 'É', 'ü', 'ç'] {
        assert!(is_allowed_character(c), "{c:?} should be allowed");
    }
    for c in ['@', '#', '$', '/', '_', '\'', '"', '×', '÷', '\n', 'λ'] {
        assert!(!is_allowed_character(c), "{c:?} should be rejected");
    }
}

#[test]
fn filter_drops_disallowed_characters_anywhere() {
    for raw in ["@OSDE", "OS@DE", "OSDE@", "#O$S@D#E$"] {
        let filtered = filter_input(raw);
        assert_eq!(filtered.value, "OSDE", "input {raw:?}");
        assert!(filtered.dropped > 0);
    }
}

#[test]
fn filter_caps_length() {
    let raw = "a".repeat(MAX_NAME_CHARS + 5);
    let filtered = filter_input(&raw);
    assert_eq!(filtered.value.chars().count(), MAX_NAME_CHARS);
    assert_eq!(filtered.dropped, 5);

    let accented = "á".repeat(MAX_NAME_CHARS);
    assert_eq!(filter_input(&accented).value, accented);
}

#[test]
fn validate_rejects_blank_before_duplicate_check() {
    let list = vec![CatalogItem::new(1, "")];
    assert_eq!(validate_name("   ", &list, None), Err(ValidationError::Required));
}

#[test]
fn validate_returns_trimmed_name() {
    let list = obras_sociales();
    assert_eq!(validate_name("  Galeno ", &list, None), Ok("Galeno".to_string()));
    assert_eq!(
        validate_name("Osde ", &list, None),
        Err(ValidationError::Duplicate {
            name: "Osde".into()
        })
    );
}
