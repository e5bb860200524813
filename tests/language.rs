//! Loading the PPL grammar into a language handle.

use ppl_grammar::{grammar, language, GrammarDescriptor, Language, Parser, PplError, LANGUAGE};

#[test]
fn test_can_load_grammar() {
    let language = Language::new(grammar());
    assert!(
        language.is_ok(),
        "Error loading PCBoard Programming Language grammar: {:?}",
        language.err()
    );
}

#[test]
fn test_loading_is_idempotent() {
    for _ in 0..3 {
        let language = Language::new(grammar()).unwrap();
        assert_eq!(language.name(), "ppl");
        assert_eq!(language.display_name(), "PCBoard Programming Language");
    }
    assert_eq!(Language::new(&LANGUAGE).unwrap(), language().unwrap());
}

#[test]
fn test_loaded_language_drives_a_parser() {
    let language = Language::new(grammar()).unwrap();
    let mut parser = Parser::new();
    parser.set_language(&language).unwrap();
    let tree = parser.parse("PRINTLN \"Hello\"\n").unwrap();
    assert_eq!(tree.language(), &language);
}

#[test]
fn test_broken_descriptor_reports_grammar_name() {
    let broken = GrammarDescriptor {
        node_kinds: &[],
        ..LANGUAGE
    };
    let err = Language::new(&broken).unwrap_err();
    assert!(matches!(err, PplError::GrammarLoad { .. }));
    assert!(
        err.to_string()
            .starts_with("Error loading PCBoard Programming Language grammar"),
        "unexpected message: {}",
        err
    );
}

#[test]
fn test_failed_load_does_not_affect_later_loads() {
    let broken = GrammarDescriptor {
        abi_version: 0,
        ..LANGUAGE
    };
    assert!(Language::new(&broken).is_err());
    assert!(Language::new(grammar()).is_ok());
}

#[test]
fn test_language_is_shareable_across_threads() {
    let language = Language::new(grammar()).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let language = language.clone();
            std::thread::spawn(move || language.node_kind_count())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), language.node_kind_count());
    }
}
