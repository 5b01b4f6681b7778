use crate::token::{Token, TokenType, MAX_TOKEN_DEPTH};
use crate::util::{Code, Log};
use crate::JsonError;

/// Parse a null-terminated-in-spirit JSON string into `tokens`.
///
/// Equivalent to [`parse_buffer`] over `input.as_bytes()`; see its
/// documentation for the full contract.
pub fn parse_str(input: &str, tokens: &mut [Token]) -> Result<usize, JsonError> {
    parse_buffer(input.as_bytes(), tokens)
}

/// Parse a JSON document out of `input` into `tokens`, in place.
///
/// `tokens` is zeroed on entry and filled in preorder: parents before
/// children, siblings left to right. On success, returns the number of
/// tokens written (`1..=tokens.len()`), and `tokens[n - 1]` has
/// [`Token::is_last`] set. On failure, returns the [`JsonError`] describing
/// why, and the contents of `tokens` are unspecified beyond having been
/// zeroed.
///
/// No allocation occurs and `input` is never copied or mutated: every
/// [`Token`] only records an offset and length back into `input`.
pub fn parse_buffer(input: &[u8], tokens: &mut [Token]) -> Result<usize, JsonError> {
    parse_buffer_with_log(input, tokens, Log::None)
}

/// Like [`parse_buffer`], but with a caller-chosen diagnostic verbosity
/// (see [`crate::util::Log`]). Plumbed through for tests and callers that
/// want `MU_LOG_TRACE`-equivalent tracing without recompiling.
pub fn parse_buffer_with_log(
    input: &[u8],
    tokens: &mut [Token],
    log: Log,
) -> Result<usize, JsonError> {
    // TODO: consider using tokens.len() == 0 for "dry run", returning the
    // number of tokens the input would require instead of an error.
    if input.is_empty() || tokens.is_empty() {
        return Err(JsonError::BadArgument);
    }

    for slot in tokens.iter_mut() {
        *slot = Token::default();
    }

    let mut scanner = Scanner::new(input, tokens, log);
    scanner.parse_element()?;

    if scanner.token_count == 0 {
        // Defensive: parse_element only returns Ok after allocating at
        // least one token, so this should not be reachable.
        return Err(JsonError::NoEntities);
    }

    scanner.skip_whitespace();
    if !scanner.at_eos() {
        scanner.log(Log::Debug, "stray input after top-level element");
        return Err(JsonError::StrayInput);
    }

    let last = scanner.token_count - 1;
    scanner.tokens[last].set_is_last(true);
    Ok(scanner.token_count)
}

struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    tokens: &'a mut [Token],
    token_count: usize,
    level: usize,
    log: Log,
    code: Code<'a>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a [u8], tokens: &'a mut [Token], log: Log) -> Self {
        Self {
            input,
            pos: 0,
            tokens,
            token_count: 0,
            level: 0,
            log,
            code: Code::from(input),
        }
    }

    fn log(&self, level: Log, message: &str) {
        self.log.log(level, &self.code, self.pos, format_args!("{}", message));
    }

    fn at_eos(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> u8 {
        self.input[self.pos]
    }

    fn advance(&mut self) -> u8 {
        let b = self.input[self.pos];
        self.pos += 1;
        b
    }

    fn skip_whitespace(&mut self) {
        while !self.at_eos() {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.pos += 1;
                }
                _ => break,
            }
        }
    }

    fn alloc_token(&mut self, kind: TokenType) -> Result<usize, JsonError> {
        if self.token_count >= self.tokens.len() {
            return Err(JsonError::NotEnoughTokens);
        }
        if self.level >= MAX_TOKEN_DEPTH as usize {
            return Err(JsonError::TooDeep);
        }
        let index = self.token_count;
        self.tokens[index] = Token::new(self.pos, 0, kind, self.level);
        self.token_count += 1;
        Ok(index)
    }

    fn finalize(&mut self, index: usize) {
        let start = self.tokens[index].start();
        self.tokens[index].set_length(self.pos - start);
    }

    /// Parse one JSON value. On entry, the scanner is positioned at (or
    /// before, modulo whitespace) the first byte of the value.
    fn parse_element(&mut self) -> Result<(), JsonError> {
        self.log(Log::Trace, "parse_element");
        self.skip_whitespace();

        if self.at_eos() {
            return Err(JsonError::NoEntities);
        }

        match self.peek() {
            b'"' => self.parse_string(),
            b'-' | b'0'..=b'9' => self.parse_number(),
            b't' => self.parse_literal(b"true", TokenType::True),
            b'f' => self.parse_literal(b"false", TokenType::False),
            b'n' => self.parse_literal(b"null", TokenType::Null),
            b'{' => self.parse_object(),
            b'[' => self.parse_array(),
            b if b & 0x80 != 0 => Err(JsonError::NoMultibyte),
            _ => {
                self.log(Log::Debug, "unrecognized input starting a value");
                Err(JsonError::BadFormat)
            }
        }
    }

    fn parse_string(&mut self) -> Result<(), JsonError> {
        self.log(Log::Trace, "parse_string");
        debug_assert_eq!(self.peek(), b'"');
        let index = self.alloc_token(TokenType::String)?;
        self.advance(); // opening quote

        loop {
            if self.at_eos() {
                return Err(JsonError::Incomplete);
            }
            let ch = self.peek();
            if ch == b'\\' {
                self.advance();
                if self.at_eos() {
                    return Err(JsonError::Incomplete);
                }
                match self.advance() {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {}
                    b'u' => {
                        for _ in 0..4 {
                            if self.at_eos() || !self.peek().is_ascii_hexdigit() {
                                return Err(JsonError::BadFormat);
                            }
                            self.advance();
                        }
                    }
                    _ => return Err(JsonError::BadFormat),
                }
            } else if ch & 0x80 != 0 {
                return Err(JsonError::NoMultibyte);
            } else if ch < 0x20 {
                return Err(JsonError::BadFormat);
            } else if ch == b'"' {
                break;
            } else {
                self.advance();
            }
        }

        self.advance(); // closing quote
        self.finalize(index);
        Ok(())
    }

    fn parse_number(&mut self) -> Result<(), JsonError> {
        self.log(Log::Trace, "parse_number");
        let index = self.alloc_token(TokenType::Integer)?;

        if self.peek() == b'-' {
            self.advance();
        }
        if self.at_eos() {
            return Err(JsonError::Incomplete);
        }

        let has_leading_zero = self.peek() == b'0';
        if has_leading_zero {
            self.advance();
        }

        let mut has_integer_digits = false;
        while !self.at_eos() && self.peek().is_ascii_digit() {
            has_integer_digits = true;
            self.advance();
        }

        if has_leading_zero && has_integer_digits {
            self.log(Log::Debug, "number has a leading zero followed by more digits");
            return Err(JsonError::BadFormat);
        }
        if !has_leading_zero && !has_integer_digits {
            self.log(Log::Debug, "number is missing integer digits");
            return Err(JsonError::BadFormat);
        }

        if !self.at_eos() && self.peek() == b'.' {
            self.tokens[index].set_type(TokenType::Number);
            self.advance();
            let mut has_fraction_digits = false;
            while !self.at_eos() && self.peek().is_ascii_digit() {
                has_fraction_digits = true;
                self.advance();
            }
            if !has_fraction_digits {
                return Err(JsonError::BadFormat);
            }
        }

        if !self.at_eos() && (self.peek() == b'e' || self.peek() == b'E') {
            self.tokens[index].set_type(TokenType::Number);
            self.advance();
            if !self.at_eos() && (self.peek() == b'+' || self.peek() == b'-') {
                self.advance();
            }
            let mut has_exponent_digits = false;
            while !self.at_eos() && self.peek().is_ascii_digit() {
                has_exponent_digits = true;
                self.advance();
            }
            if !has_exponent_digits {
                return Err(JsonError::BadFormat);
            }
        }

        self.finalize(index);
        Ok(())
    }

    fn parse_literal(&mut self, literal: &[u8], kind: TokenType) -> Result<(), JsonError> {
        let index = self.alloc_token(kind)?;
        for &expected in literal {
            if self.at_eos() {
                return Err(JsonError::Incomplete);
            }
            if self.advance() != expected {
                return Err(JsonError::BadFormat);
            }
        }
        self.finalize(index);
        Ok(())
    }

    /// Skip whitespace, consume `delimiter`, then skip whitespace again,
    /// requiring a non-EOS position to follow.
    fn find_and_skip(&mut self, delimiter: u8) -> Result<(), JsonError> {
        self.skip_whitespace();
        if self.at_eos() || self.peek() != delimiter {
            return Err(JsonError::BadFormat);
        }
        self.advance();
        self.skip_whitespace();
        if self.at_eos() {
            return Err(JsonError::BadFormat);
        }
        Ok(())
    }

    fn parse_object(&mut self) -> Result<(), JsonError> {
        self.log(Log::Trace, "parse_object");
        debug_assert_eq!(self.peek(), b'{');
        let index = self.alloc_token(TokenType::Object)?;
        self.level += 1;
        self.advance(); // '{'

        let mut first_pair = true;
        loop {
            self.skip_whitespace();
            if self.at_eos() {
                break;
            }
            if self.peek() == b'}' {
                break;
            }
            if !first_pair {
                self.find_and_skip(b',')?;
            }
            first_pair = false;

            self.parse_string()?;
            self.find_and_skip(b':')?;
            self.parse_element()?;
        }

        if self.at_eos() {
            return Err(JsonError::Incomplete);
        }
        debug_assert_eq!(self.peek(), b'}');
        self.advance();
        self.level -= 1;

        self.finalize(index);
        Ok(())
    }

    fn parse_array(&mut self) -> Result<(), JsonError> {
        self.log(Log::Trace, "parse_array");
        debug_assert_eq!(self.peek(), b'[');
        let index = self.alloc_token(TokenType::Array)?;
        self.level += 1;
        self.advance(); // '['

        let mut first_element = true;
        loop {
            self.skip_whitespace();
            if self.at_eos() {
                break;
            }
            if self.peek() == b']' {
                break;
            }
            if !first_element {
                self.find_and_skip(b',')?;
            }
            first_element = false;

            self.parse_element()?;
        }

        if self.at_eos() {
            return Err(JsonError::Incomplete);
        }
        debug_assert_eq!(self.peek(), b']');
        self.advance();
        self.level -= 1;

        self.finalize(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType::*;

    fn types(tokens: &[Token], n: usize) -> Vec<TokenType> {
        tokens[..n].iter().map(|t| t.token_type()).collect()
    }

    fn levels(tokens: &[Token], n: usize) -> Vec<usize> {
        tokens[..n].iter().map(|t| t.level()).collect()
    }

    #[test]
    fn scenario_one_mixed_object() {
        let input = "{ \"a\" : 10 , \"b\" : 11 , \"c\" : [ 3, 4.5 ], \"d\" : [ ] } ";
        let mut tokens = [Token::default(); 200];
        let n = parse_str(input, &mut tokens).unwrap();
        assert_eq!(n, 11);
        assert_eq!(
            types(&tokens, n),
            vec![
                Object, String, Integer, String, Integer, String, Array, Integer, Number, String,
                Array
            ]
        );
        assert_eq!(levels(&tokens, n), vec![0, 1, 1, 1, 1, 1, 1, 2, 2, 1, 1]);
        assert!(tokens[n - 1].is_last());
    }

    #[test]
    fn scenario_two_extents() {
        let input = " {\"a\":111, \"b\":[22.2, 0, 3e0], \"c\":{}}  ";
        let mut tokens = [Token::default(); 10];
        let n = parse_str(input, &mut tokens).unwrap();
        assert_eq!(n, 10);
        assert_eq!(tokens[4].extent_str(input), "[22.2, 0, 3e0]");
        assert_eq!(tokens[9].extent_str(input), "{}");
    }

    #[test]
    fn rejects_leading_comma_in_array() {
        let mut tokens = [Token::default(); 5];
        assert_eq!(parse_str("[,1]", &mut tokens), Err(JsonError::BadFormat));
    }

    #[test]
    fn single_true_scalar() {
        let mut tokens = [Token::default(); 5];
        let n = parse_str("true", &mut tokens).unwrap();
        assert_eq!(n, 1);
        assert_eq!(tokens[0].token_type(), True);
        assert_eq!(tokens[0].extent_str("true"), "true");
    }

    #[test]
    fn empty_containers_have_no_children() {
        let mut tokens = [Token::default(); 5];
        assert_eq!(parse_str("{}", &mut tokens), Ok(1));
        assert_eq!(tokens[0].token_type(), Object);

        let mut tokens = [Token::default(); 5];
        assert_eq!(parse_str("[]", &mut tokens), Ok(1));
        assert_eq!(tokens[0].token_type(), Array);
    }

    #[test]
    fn number_classification() {
        let check = |input: &str, expected: TokenType| {
            let mut tokens = [Token::default(); 2];
            let n = parse_str(input, &mut tokens).unwrap();
            assert_eq!(n, 1, "input={}", input);
            assert_eq!(tokens[0].token_type(), expected, "input={}", input);
        };
        check("0", Integer);
        check("0.0", Number);
        check("0e0", Number);
        check("-0", Integer);
        check("-0.0", Number);

        let mut tokens = [Token::default(); 2];
        assert_eq!(parse_str("01", &mut tokens), Err(JsonError::BadFormat));
    }

    #[test]
    fn rejects_high_bit_bytes() {
        let mut tokens = [Token::default(); 5];
        assert_eq!(
            parse_buffer(b"\xff", &mut tokens),
            Err(JsonError::NoMultibyte)
        );
        let mut tokens = [Token::default(); 5];
        assert_eq!(
            parse_buffer(b"\"a\xffb\"", &mut tokens),
            Err(JsonError::NoMultibyte)
        );
    }

    #[test]
    fn accepts_valid_unicode_escape_rejects_short_one() {
        let mut tokens = [Token::default(); 5];
        assert!(parse_str(r#""\u00e9""#, &mut tokens).is_ok());

        let mut tokens = [Token::default(); 5];
        assert_eq!(
            parse_str(r#""\u00""#, &mut tokens),
            Err(JsonError::BadFormat)
        );
    }

    #[test]
    fn raw_unescaped_multibyte_char_in_string_is_rejected() {
        let mut tokens = [Token::default(); 5];
        assert_eq!(
            parse_str(r#""é""#, &mut tokens),
            Err(JsonError::NoMultibyte)
        );
    }

    #[test]
    fn rejects_bad_escape() {
        let mut tokens = [Token::default(); 5];
        assert_eq!(parse_str(r#""\q""#, &mut tokens), Err(JsonError::BadFormat));
    }

    #[test]
    fn rejects_control_byte_in_string() {
        let mut tokens = [Token::default(); 5];
        assert_eq!(
            parse_buffer(b"\"a\x01b\"", &mut tokens),
            Err(JsonError::BadFormat)
        );
    }

    #[test]
    fn incomplete_inputs() {
        let cases = ["\"abc", "{\"a\":1", "[1,2", "tru", "1e"];
        for case in cases {
            let mut tokens = [Token::default(); 10];
            assert_eq!(
                parse_str(case, &mut tokens),
                Err(JsonError::Incomplete),
                "input={}",
                case
            );
        }
    }

    #[test]
    fn stray_input_after_top_level() {
        let mut tokens = [Token::default(); 5];
        assert_eq!(
            parse_str("1 2", &mut tokens),
            Err(JsonError::StrayInput)
        );
    }

    #[test]
    fn not_enough_tokens() {
        let mut tokens = [Token::default(); 2];
        assert_eq!(
            parse_str("[1, 2, 3]", &mut tokens),
            Err(JsonError::NotEnoughTokens)
        );
    }

    #[test]
    fn bad_argument_on_empty_input_or_storage() {
        let mut tokens = [Token::default(); 5];
        assert_eq!(parse_str("", &mut tokens), Err(JsonError::BadArgument));

        let mut tokens: [Token; 0] = [];
        assert_eq!(parse_str("1", &mut tokens), Err(JsonError::BadArgument));
    }

    #[test]
    fn parses_via_buffer_entry_point_without_trailing_nul() {
        let bytes = b"[1,2,3]";
        let mut tokens = [Token::default(); 10];
        let n = parse_buffer(bytes, &mut tokens).unwrap();
        assert_eq!(n, 4);
    }
}
