use super::*;

#[test]
fn test_parse_bare_actions() {
    assert_eq!(Action::parse("status").unwrap(), Action::Status);
    assert_eq!(Action::parse("up").unwrap(), Action::Up { limit: 0 });
    assert_eq!(Action::parse("down").unwrap(), Action::Down { limit: 0 });
}

#[test]
fn test_parse_with_count() {
    assert_eq!(Action::parse("up 2").unwrap(), Action::Up { limit: 2 });
    assert_eq!(Action::parse("down 1").unwrap(), Action::Down { limit: 1 });
    assert_eq!(Action::parse("up 0").unwrap(), Action::Up { limit: 0 });
}

#[test]
fn test_parse_tolerates_extra_whitespace() {
    assert_eq!(Action::parse("  up \t 3 ").unwrap(), Action::Up { limit: 3 });
}

#[test]
fn test_parse_empty_action() {
    assert!(matches!(Action::parse(""), Err(CoreError::EmptyAction)));
    assert!(matches!(Action::parse("   "), Err(CoreError::EmptyAction)));
}

#[test]
fn test_parse_unknown_action() {
    match Action::parse("invalid") {
        Err(CoreError::UnknownAction { action }) => assert_eq!(action, "invalid"),
        other => panic!("Expected UnknownAction, got {other:?}"),
    }
}

#[test]
fn test_parse_non_numeric_count() {
    match Action::parse("up two") {
        Err(CoreError::InvalidCount { value }) => assert_eq!(value, "two"),
        other => panic!("Expected InvalidCount, got {other:?}"),
    }
}

#[test]
fn test_parse_negative_count() {
    assert!(matches!(
        Action::parse("down -1"),
        Err(CoreError::InvalidCount { .. })
    ));
}

#[test]
fn test_parse_too_many_tokens() {
    assert!(matches!(
        Action::parse("up 1 2"),
        Err(CoreError::ActionArity { .. })
    ));
    assert!(matches!(
        Action::parse("status 1"),
        Err(CoreError::ActionArity { .. })
    ));
}

#[test]
fn test_from_str() {
    let action: Action = "down 4".parse().unwrap();
    assert_eq!(action, Action::Down { limit: 4 });
}

#[test]
fn test_display_matches_grammar() {
    for input in ["status", "up", "up 2", "down", "down 7"] {
        assert_eq!(Action::parse(input).unwrap().to_string(), input);
    }
    assert_eq!(Action::Up { limit: 0 }.name(), "up");
}
