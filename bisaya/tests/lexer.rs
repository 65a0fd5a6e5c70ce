//! Lexer-level tests exercising the context-sensitive tokenization rules
//! described in the language design (bracket escapes, the `$` sentinel,
//! the `&`-swallowing rule, comments, and boolean-literal detection).

use bisaya::token::{tokenize, TokenKind};

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src)
        .expect("tokenize should succeed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_two_char_operators() {
    assert_eq!(kinds("=="), vec![TokenKind::EqEq, TokenKind::Eof]);
    assert_eq!(kinds("<>"), vec![TokenKind::NotEq, TokenKind::Eof]);
    assert_eq!(kinds(">="), vec![TokenKind::GreaterEq, TokenKind::Eof]);
    assert_eq!(kinds("<="), vec![TokenKind::LessEq, TokenKind::Eof]);
    assert_eq!(kinds("++"), vec![TokenKind::Increment, TokenKind::Eof]);
}

#[test]
fn test_line_comment_emits_single_newline() {
    let tokens = tokenize("MUGNA -- a comment\nNUMERO").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Mugna,
            TokenKind::Newline,
            TokenKind::TypeInt,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_dollar_emits_newline_with_dollar_lexeme() {
    let tokens = tokenize("$").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Newline);
    assert_eq!(tokens[0].lexeme, "$");
}

#[test]
fn test_real_newline_keeps_its_own_lexeme() {
    let tokens = tokenize("\n").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Newline);
    assert_eq!(tokens[0].lexeme, "\n");
}

#[test]
fn test_concat_swallowed_next_to_dollar_on_either_side() {
    assert_eq!(kinds("a & $"), vec![TokenKind::Ident, TokenKind::Newline, TokenKind::Eof]);
    assert_eq!(kinds("$ & a"), vec![TokenKind::Newline, TokenKind::Ident, TokenKind::Eof]);
}

#[test]
fn test_concat_kept_when_not_adjacent_to_dollar() {
    assert_eq!(
        kinds("a & b"),
        vec![TokenKind::Ident, TokenKind::Concat, TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn test_bracket_escape_allows_literal_brackets_and_ampersand() {
    let tokens = tokenize("[[]&xyz&[]]").unwrap();
    let literals: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::StringLit)
        .map(|t| t.lexeme.clone())
        .collect();
    assert_eq!(literals, vec!["[".to_string(), "]".to_string()]);
}

#[test]
fn test_unterminated_bracket_is_an_error() {
    assert!(tokenize("[abc").is_err());
}

#[test]
fn test_string_with_oo_becomes_bool_true() {
    let tokens = tokenize(r#""OO""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::BoolTrue);
}

#[test]
fn test_string_with_dili_becomes_bool_false() {
    let tokens = tokenize(r#""DILI""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::BoolFalse);
}

#[test]
fn test_plain_string_stays_a_string_literal() {
    let tokens = tokenize(r#""hello""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::StringLit);
    assert_eq!(tokens[0].lexeme, "hello");
}

#[test]
fn test_unterminated_string_is_an_error() {
    assert!(tokenize("\"abc").is_err());
}

#[test]
fn test_empty_char_literal_is_an_error() {
    assert!(tokenize("''").is_err());
}

#[test]
fn test_char_literal_holds_one_code_point() {
    let tokens = tokenize("'x'").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::CharLit);
    assert_eq!(tokens[0].lexeme, "x");
}

#[test]
fn test_number_literals_split_on_second_dot() {
    let tokens = tokenize("1.2.3").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::FloatLit);
    assert_eq!(tokens[0].lexeme, "1.2");
    // the second dot isn't part of any operator the lexer knows, so it's
    // an UNKNOWN token followed by another INT_LIT.
    assert_eq!(tokens[1].kind, TokenKind::Unknown);
    assert_eq!(tokens[2].kind, TokenKind::IntLit);
    assert_eq!(tokens[2].lexeme, "3");
}

#[test]
fn test_unrecognized_character_becomes_unknown_token_not_a_lex_error() {
    let tokens = tokenize("@").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Unknown);
    assert_eq!(tokens[0].lexeme, "@");
}

#[test]
fn test_dili_as_bare_keyword_lexes_as_not() {
    let tokens = tokenize("DILI").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Not);
    assert_eq!(tokens[0].lexeme, "NOT");
}

#[test]
fn test_keyword_lookup_for_type_names() {
    assert_eq!(kinds("NUMERO TIPIK LETRA TINUOD PULONG"), vec![
        TokenKind::TypeInt,
        TokenKind::TypeFloat,
        TokenKind::TypeChar,
        TokenKind::TypeBool,
        TokenKind::TypeString,
        TokenKind::Eof,
    ]);
}

#[test]
fn test_line_numbers_advance_on_real_newlines_only() {
    let tokens = tokenize("MUGNA\nNUMERO x").unwrap();
    assert_eq!(tokens[0].line, 1); // MUGNA
    assert_eq!(tokens[1].line, 1); // newline token itself starts on line 1
    assert_eq!(tokens[2].line, 2); // NUMERO
}
