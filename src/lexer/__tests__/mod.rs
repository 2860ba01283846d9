use crate::lexer::{Lexer, LexerAction, PatternRule, TokenStream};
use crate::util::Code;

fn word_vs_if_lexer() -> Lexer {
    Lexer::new(
        vec![(
            "default".to_string(),
            vec![
                PatternRule::new(r"^ +", LexerAction::None),
                PatternRule::new(r"^if", LexerAction::Scan("kw_if".to_string())),
                PatternRule::new(r"^[a-z]+", LexerAction::Scan("id".to_string())),
            ],
        )],
        "default",
    )
    .unwrap()
}

#[test]
fn longest_match_wins_over_first_defined() {
    // "ifx" should scan as a single id, not kw_if followed by id "x", even
    // though kw_if is defined first (§4.3 step 3: longest match wins, with
    // definition order only as the final tie-break).
    let lexer = word_vs_if_lexer();
    let code: Code = "ifx if".into();
    let mut stream = lexer.lazy_stream(&code);

    let first = stream.next();
    assert_eq!(first.class.as_str(), "id");
    assert_eq!(first.lexeme, "ifx");

    let second = stream.next();
    assert_eq!(second.class.as_str(), "kw_if");
    assert_eq!(second.lexeme, "if");

    assert!(stream.next().is_eof());
}

#[test]
fn panic_mode_recovers_and_continues() {
    let lexer = word_vs_if_lexer();
    let code: Code = "if @@ if".into();
    let mut stream = lexer.lazy_stream(&code);

    assert_eq!(stream.next().class.as_str(), "kw_if");
    let error = stream.next();
    assert!(error.is_error());
    let recovered = stream.next();
    assert_eq!(recovered.class.as_str(), "kw_if");
    assert!(stream.next().is_eof());
}

#[test]
fn eager_stream_fails_on_first_error() {
    let lexer = word_vs_if_lexer();
    let code: Code = "if @@".into();
    assert!(lexer.eager_stream(&code).is_err());
}

#[test]
fn eager_stream_succeeds_on_clean_input() {
    let lexer = word_vs_if_lexer();
    let code: Code = "if foo".into();
    let mut stream = lexer.eager_stream(&code).unwrap();
    assert_eq!(stream.next().class.as_str(), "kw_if");
    assert_eq!(stream.next().class.as_str(), "id");
    assert!(stream.next().is_eof());
}

#[test]
fn peek_does_not_consume() {
    let lexer = word_vs_if_lexer();
    let code: Code = "if foo".into();
    let mut stream = lexer.lazy_stream(&code);
    let peeked = stream.peek();
    assert_eq!(peeked.class.as_str(), "kw_if");
    let next = stream.next();
    assert_eq!(next.class.as_str(), "kw_if");
    assert_eq!(next.position, peeked.position);
}

#[test]
fn state_shift_switches_pattern_set() {
    // Block comments are skipped entirely by switching to a dedicated state
    // whose only pattern consumes through the closing delimiter and shifts
    // back, without ever emitting a token.
    let lexer = Lexer::new(
        vec![
            (
                "code".to_string(),
                vec![
                    PatternRule::new(r"^/\*", LexerAction::ShiftState("comment".to_string())),
                    PatternRule::new(r"^[a-z]+", LexerAction::Scan("id".to_string())),
                    PatternRule::new(r"^ +", LexerAction::None),
                ],
            ),
            (
                "comment".to_string(),
                vec![PatternRule::new(
                    r"^[^*]*\*/",
                    LexerAction::ShiftState("code".to_string()),
                )],
            ),
        ],
        "code",
    )
    .unwrap();
    let code: Code = "x /* skip this */ y".into();
    let mut stream = lexer.lazy_stream(&code);
    assert_eq!(stream.next().class.as_str(), "id");
    let after_comment = stream.next();
    assert_eq!(after_comment.class.as_str(), "id");
    assert_eq!(after_comment.lexeme, "y");
    assert!(stream.next().is_eof());
}

#[test]
fn compile_from_directive_source_respects_human_labels() {
    let source = "^if %token kw_if %human \"the keyword 'if'\"\n^[a-z]+ %token id\n^ + %token ws\n";
    let lexer = Lexer::compile(source).unwrap();
    assert_eq!(lexer.human_label("kw_if"), "the keyword 'if'");
    assert_eq!(lexer.human_label("id"), "id");
}

#[test]
fn unknown_stateshift_target_is_rejected() {
    let built = Lexer::new(
        vec![(
            "code".to_string(),
            vec![PatternRule::new(
                r"^x",
                LexerAction::ShiftState("missing".to_string()),
            )],
        )],
        "code",
    );
    assert!(built.is_err());
}
