//! Edge case tests for lute-lex.

#[cfg(test)]
mod tests {
    use crate::{tokenize, KeywordKind, KeywordTable, TokenKind};

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize("edge.lute", source, &KeywordTable::default())
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_whitespace_only() {
        assert_eq!(kinds("  \t\n  \r\n "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_edge_comment_only() {
        assert_eq!(kinds("# nothing here"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_edge_unterminated_block_comment_consumes_rest() {
        assert_eq!(kinds("1 \\ never closed"), vec![TokenKind::Int, TokenKind::Eof]);
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10_000);
        let tokens = tokenize("edge.lute", &name, &KeywordTable::default()).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme.len(), 10_000);
    }

    #[test]
    fn test_edge_keyword_case_sensitivity() {
        let tokens = tokenize("edge.lute", "If if", &KeywordTable::default()).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert!(tokens[1].is_keyword(KeywordKind::If));
    }

    #[test]
    fn test_edge_underscore_identifier() {
        let tokens = tokenize("edge.lute", "_ _x x_1", &KeywordTable::default()).unwrap();
        assert_eq!(tokens[0].lexeme, "_");
        assert_eq!(tokens[1].lexeme, "_x");
        assert_eq!(tokens[2].lexeme, "x_1");
    }

    #[test]
    fn test_edge_adjacent_ranges() {
        // `1..2..3` lexes as int, .., int, .., int; the parser decides
        // whether that shape means anything.
        assert_eq!(
            kinds("1..2..3"),
            vec![
                TokenKind::Int,
                TokenKind::DotDot,
                TokenKind::Int,
                TokenKind::DotDot,
                TokenKind::Int,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_edge_float_then_range() {
        assert_eq!(
            kinds("1.5..9"),
            vec![
                TokenKind::Float,
                TokenKind::DotDot,
                TokenKind::Int,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_edge_dot_member_after_number_parenthesized() {
        // A dot after digits always belongs to the number, so member access
        // on a literal needs parentheses; verify the dot forms here.
        assert_eq!(
            kinds("(1).toStr"),
            vec![
                TokenKind::LParen,
                TokenKind::Int,
                TokenKind::RParen,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_edge_empty_string_literals() {
        let tokens = tokenize("edge.lute", "'' \"\"", &KeywordTable::default()).unwrap();
        assert_eq!(tokens[0].lexeme, "");
        assert_eq!(tokens[1].lexeme, "");
    }

    #[test]
    fn test_edge_string_spanning_newline() {
        let tokens = tokenize("edge.lute", "'a\nb'", &KeywordTable::default()).unwrap();
        assert_eq!(tokens[0].lexeme, "a\nb");
    }

    #[test]
    fn test_edge_mixed_quotes_nest() {
        let tokens =
            tokenize("edge.lute", r#"'say "hi"' "it's""#, &KeywordTable::default()).unwrap();
        assert_eq!(tokens[0].lexeme, "say \"hi\"");
        assert_eq!(tokens[1].lexeme, "it's");
    }

    #[test]
    fn test_edge_int_overflow_is_syntax_error() {
        let err = tokenize(
            "edge.lute",
            "99999999999999999999999999",
            &KeywordTable::default(),
        )
        .unwrap_err();
        assert!(err.message.contains("out of range"));
    }

    #[test]
    fn test_edge_error_position_is_inside_input() {
        let source = "x = 1\ny = @";
        let err = tokenize("edge.lute", source, &KeywordTable::default()).unwrap_err();
        assert_eq!(err.pos.line, 1);
        assert_eq!(err.pos.row, 4);
    }

    #[test]
    fn test_edge_all_delimiters() {
        assert_eq!(
            kinds("()[]{},;:."),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::Semi,
                TokenKind::Colon,
                TokenKind::Dot,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_edge_deterministic_streams() {
        let source = "fn f(a, b = 2) { return a + b } f(1);";
        let a = kinds(source);
        let b = kinds(source);
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use crate::{tokenize, KeywordTable, TokenKind};

    proptest! {
        /// Lexer totality: any ASCII input either tokenizes to an
        /// Eof-terminated stream or fails with a position inside the input.
        #[test]
        fn prop_tokenize_is_total(source in "[ -~\n\t]{0,200}") {
            match tokenize("prop.lute", &source, &KeywordTable::default()) {
                Ok(tokens) => {
                    prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
                }
                Err(err) => {
                    let lines: Vec<&str> = source.lines().collect();
                    let line = err.pos.line as usize;
                    prop_assert!(line <= lines.len());
                    if let Some(text) = lines.get(line) {
                        prop_assert!((err.pos.row as usize) <= text.chars().count());
                    }
                }
            }
        }

        /// Numbers with underscores lex to the same token as without.
        #[test]
        fn prop_underscores_are_skipped(n in 0i64..1_000_000) {
            let plain = tokenize("p.lute", &n.to_string(), &KeywordTable::default()).unwrap();
            let digits: String = n.to_string().chars().flat_map(|c| [c, '_']).collect();
            let scored = tokenize("p.lute", &digits, &KeywordTable::default()).unwrap();
            prop_assert_eq!(plain[0].lexeme.clone(), scored[0].lexeme.clone());
        }
    }
}
