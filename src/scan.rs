//! Brace-depth scanner for object literals in TypeScript-like source.
//!
//! Strings, template strings (with `${}` substitutions), comments and regex
//! literals are lexed as whole tokens, so braces inside them never affect
//! depth. Objects whose first property is `id: '<string>'` are returned as
//! record candidates and consumed whole; every other object is descended into.

use std::iter::Peekable;
use std::ops::Range;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Punct(u8),
    Word,
    Str,
    Template,
    Regex,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

/// Value of an object property, classified by its first lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// A single quoted string; holds the decoded contents.
    Str(String),
    /// A quoted string with an escape that does not decode; holds the raw
    /// literal, quotes included.
    BadEscape(String),
    /// A template string, possibly followed by a call such as `.trim()`.
    Template,
    Other,
}

#[derive(Debug, Clone)]
pub struct Property {
    /// `None` for spreads, shorthand members and anything without `key:`.
    pub key: Option<String>,
    pub value: PropertyValue,
}

#[derive(Debug, Clone)]
pub struct ObjectLiteral {
    /// Byte range from the opening `{` through the matching `}`.
    pub span: Range<usize>,
    pub properties: Vec<Property>,
}

impl ObjectLiteral {
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.key.as_deref() == Some(key))
            .map(|p| &p.value)
    }

    pub fn str_value(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(PropertyValue::Str(s)) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    /// What was left open: "string", "template string", "comment", "object".
    pub unterminated: &'static str,
    pub offset: usize,
}

#[derive(Debug, Default)]
pub struct Scan {
    pub objects: Vec<ObjectLiteral>,
    /// Set when scanning stopped early; `objects` holds what came before.
    pub error: Option<ScanError>,
}

pub fn scan_objects(text: &str) -> Scan {
    let (tokens, lex_error) = tokenize(text);
    let mut scan = Scan::default();
    let mut i = 0;

    while i < tokens.len() {
        if tokens[i].kind != TokenKind::Punct(b'{') {
            i += 1;
            continue;
        }
        let Some(close) = matching_close(&tokens, i) else {
            // An unterminated lexeme is the more precise cause.
            scan.error = lex_error.clone().or(Some(ScanError {
                unterminated: "object",
                offset: tokens[i].start,
            }));
            return scan;
        };
        let properties = parse_properties(text, &tokens[i + 1..close]);
        if is_record_candidate(&properties) {
            scan.objects.push(ObjectLiteral {
                span: tokens[i].start..tokens[close].end,
                properties,
            });
            i = close + 1;
        } else {
            i += 1;
        }
    }

    scan.error = lex_error;
    scan
}

/// 1-based line and column (in chars) of a byte offset.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|p| p + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

fn is_record_candidate(properties: &[Property]) -> bool {
    matches!(
        properties.first(),
        Some(Property {
            key: Some(k),
            value: PropertyValue::Str(_) | PropertyValue::BadEscape(_),
        }) if k == "id"
    )
}

fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, tok) in tokens.iter().enumerate().skip(open) {
        match tok.kind {
            TokenKind::Punct(b'{') => depth += 1,
            TokenKind::Punct(b'}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

// ── Properties ──

fn parse_properties(text: &str, body: &[Token]) -> Vec<Property> {
    split_top_level(body)
        .into_iter()
        .filter(|seg| !seg.is_empty())
        .map(|seg| parse_property(text, seg))
        .collect()
}

fn split_top_level(body: &[Token]) -> Vec<&[Token]> {
    let mut segments = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, tok) in body.iter().enumerate() {
        match tok.kind {
            TokenKind::Punct(b'{' | b'[' | b'(') => depth += 1,
            TokenKind::Punct(b'}' | b']' | b')') => depth -= 1,
            TokenKind::Punct(b',') if depth == 0 => {
                segments.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    segments.push(&body[start..]);
    segments
}

fn parse_property(text: &str, seg: &[Token]) -> Property {
    let key = match (seg.first(), seg.get(1)) {
        (Some(k), Some(colon)) if colon.kind == TokenKind::Punct(b':') => match k.kind {
            TokenKind::Word => Some(text[k.start..k.end].to_string()),
            TokenKind::Str => decode_string(&text[k.start..k.end]),
            _ => None,
        },
        _ => None,
    };
    let value = match key {
        Some(_) => classify_value(text, &seg[2..]),
        None => PropertyValue::Other,
    };
    Property { key, value }
}

fn classify_value(text: &str, value: &[Token]) -> PropertyValue {
    match value {
        [tok] if tok.kind == TokenKind::Str => {
            let raw = &text[tok.start..tok.end];
            match decode_string(raw) {
                Some(s) => PropertyValue::Str(s),
                None => PropertyValue::BadEscape(raw.to_string()),
            }
        }
        [first, ..] if first.kind == TokenKind::Template => PropertyValue::Template,
        _ => PropertyValue::Other,
    }
}

/// Strip quotes from a string token and resolve escapes. `None` when an
/// escape is malformed or names no valid char.
fn decode_string(raw: &str) -> Option<String> {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => {
                let code = hex_digits(&mut chars, 2)?;
                out.push(char::from_u32(code)?);
            }
            'u' => out.push(unicode_escape(&mut chars)?),
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            '\n' => {}
            other => out.push(other),
        }
    }
    Some(out)
}

/// The part of a `\u` escape after the `u`: `XXXX` (a high surrogate must be
/// followed by `\uXXXX` with its low half) or `{X…}`.
fn unicode_escape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    if chars.next_if_eq(&'{').is_some() {
        let mut code = 0u32;
        let mut digits = 0;
        loop {
            match chars.next()? {
                '}' if digits > 0 => return char::from_u32(code),
                c => {
                    code = code.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
                    digits += 1;
                }
            }
        }
    }
    let high = hex_digits(chars, 4)?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high);
    }
    if chars.next()? != '\\' || chars.next()? != 'u' {
        return None;
    }
    let low = hex_digits(chars, 4)?;
    if !(0xDC00..0xE000).contains(&low) {
        return None;
    }
    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
}

fn hex_digits(chars: &mut Peekable<Chars<'_>>, count: usize) -> Option<u32> {
    let mut code = 0;
    for _ in 0..count {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}

// ── Lexer ──

/// Keywords after which an expression, and so a regex literal, may start.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "throw", "in", "of", "delete", "void", "new", "else", "do",
    "yield", "await", "instanceof",
];

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// Whether a `/` at the current position opens a regex literal, decided
    /// by the previous token.
    regex_allowed: bool,
}

fn tokenize(text: &str) -> (Vec<Token>, Option<ScanError>) {
    let mut lexer = Lexer {
        bytes: text.as_bytes(),
        pos: 0,
        regex_allowed: true,
    };
    let mut tokens = Vec::new();
    loop {
        match lexer.next_token() {
            Ok(Some(tok)) => tokens.push(tok),
            Ok(None) => return (tokens, None),
            Err(e) => return (tokens, Some(e)),
        }
    }
}

impl<'a> Lexer<'a> {
    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        self.skip_trivia()?;
        let start = self.pos;
        let Some(b) = self.peek(0) else {
            return Ok(None);
        };

        let kind = match b {
            b'\'' | b'"' => {
                self.string(b)?;
                TokenKind::Str
            }
            b'`' => {
                self.template()?;
                TokenKind::Template
            }
            b'/' if self.regex_allowed && self.regex() => TokenKind::Regex,
            b if is_word_byte(b) => {
                while self.peek(0).is_some_and(is_word_byte) {
                    self.pos += 1;
                }
                TokenKind::Word
            }
            _ => {
                self.pos += 1;
                TokenKind::Punct(b)
            }
        };

        self.regex_allowed = match kind {
            TokenKind::Punct(p) => !matches!(p, b')' | b']' | b'}'),
            TokenKind::Word => {
                let word = &self.bytes[start..self.pos];
                EXPRESSION_KEYWORDS.iter().any(|k| k.as_bytes() == word)
            }
            TokenKind::Str | TokenKind::Template | TokenKind::Regex => false,
        };
        Ok(Some(Token {
            kind,
            start,
            end: self.pos,
        }))
    }

    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some(b), _) if b.is_ascii_whitespace() => self.pos += 1,
                (Some(b'/'), Some(b'/')) => {
                    while self.peek(0).is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match (self.peek(0), self.peek(1)) {
                            (Some(b'*'), Some(b'/')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some(_), _) => self.pos += 1,
                            (None, _) => return Err(unterminated("comment", start)),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn string(&mut self, quote: u8) -> Result<(), ScanError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek(0) {
                Some(b'\\') => self.pos += 2,
                Some(b) if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b'\n') | None => return Err(unterminated("string", start)),
                Some(_) => self.pos += 1,
            }
        }
    }

    fn template(&mut self) -> Result<(), ScanError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some(b'\\'), _) => self.pos += 2,
                (Some(b'`'), _) => {
                    self.pos += 1;
                    return Ok(());
                }
                (Some(b'$'), Some(b'{')) => {
                    self.pos += 2;
                    self.substitution(start)?;
                }
                (Some(_), _) => self.pos += 1,
                (None, _) => return Err(unterminated("template string", start)),
            }
        }
    }

    /// Consume a `${ ... }` body up to and including its closing brace.
    fn substitution(&mut self, template_start: usize) -> Result<(), ScanError> {
        let saved = std::mem::replace(&mut self.regex_allowed, true);
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_token()? {
                Some(Token { kind: TokenKind::Punct(b'{'), .. }) => depth += 1,
                Some(Token { kind: TokenKind::Punct(b'}'), .. }) => depth -= 1,
                Some(_) => {}
                None => return Err(unterminated("template string", template_start)),
            }
        }
        self.regex_allowed = saved;
        Ok(())
    }

    /// Try to consume a regex literal. Leaves `pos` untouched and returns
    /// false when no closing slash is found on the same line.
    fn regex(&mut self) -> bool {
        let mut p = self.pos + 1;
        let mut in_class = false;
        loop {
            match self.bytes.get(p).copied() {
                Some(b'\\') => p += 2,
                Some(b'[') => {
                    in_class = true;
                    p += 1;
                }
                Some(b']') => {
                    in_class = false;
                    p += 1;
                }
                Some(b'/') if !in_class => {
                    p += 1;
                    while self.bytes.get(p).is_some_and(|b| b.is_ascii_alphabetic()) {
                        p += 1;
                    }
                    self.pos = p;
                    return true;
                }
                Some(b'\n') | None => return false,
                Some(_) => p += 1,
            }
        }
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn unterminated(what: &'static str, offset: usize) -> ScanError {
    ScanError {
        unterminated: what,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braces_inside_lexemes_do_not_count() {
        let src = r#"[
  {
    id: 'a',
    note: "}}{",
    htmlTemplate: `<style>.x{color:red}</style> ${ {a: '}'}.a } ${`nested ${1}`}`.trim()
  },
  { id: 'b' }
]"#;
        let scan = scan_objects(src);
        assert!(scan.error.is_none());
        assert_eq!(scan.objects.len(), 2);
        assert_eq!(scan.objects[0].str_value("note"), Some("}}{"));
        assert_eq!(scan.objects[0].get("htmlTemplate"), Some(&PropertyValue::Template));
        assert_eq!(&src[scan.objects[1].span.clone()], "{ id: 'b' }");
    }

    #[test]
    fn nested_objects_inside_records_are_not_candidates() {
        let src = "{ id: 'outer', fields: [{ id: 'inner' }] }";
        let scan = scan_objects(src);
        assert_eq!(scan.objects.len(), 1);
        assert_eq!(scan.objects[0].str_value("id"), Some("outer"));
    }

    #[test]
    fn non_record_objects_are_descended_into() {
        let src = "export const x = { list: [ { id: 'inside', name: 'n' } ] }";
        let scan = scan_objects(src);
        assert_eq!(scan.objects.len(), 1);
        assert_eq!(scan.objects[0].str_value("name"), Some("n"));
    }

    #[test]
    fn interfaces_and_code_are_ignored() {
        let src = "export interface T {\n  id: string\n  name: string\n}\n\
                   function f(s) { const m = s.match(/^(.+?)[：:'`{]\\s*(.+)$/); return { id: m[1] } }";
        let scan = scan_objects(src);
        assert!(scan.error.is_none());
        assert!(scan.objects.is_empty());
    }

    #[test]
    fn comments_are_skipped() {
        let src = "// { id: 'x' }\n/* { id: 'y' } */\n{ id: 'z' /* } */ }";
        let scan = scan_objects(src);
        assert_eq!(scan.objects.len(), 1);
        assert_eq!(scan.objects[0].str_value("id"), Some("z"));
    }

    #[test]
    fn quoted_keys_and_escapes() {
        let src = r#"{ 'id': 'it\'s', "name": "a\"b" }"#;
        let scan = scan_objects(src);
        assert_eq!(scan.objects[0].str_value("id"), Some("it's"));
        assert_eq!(scan.objects[0].str_value("name"), Some("a\"b"));
    }

    #[test]
    fn unterminated_template_reports_opening_offset() {
        let src = "{ id: 'ok', t: `x` }\n{ id: 'bad', t: `never closed }";
        let scan = scan_objects(src);
        assert_eq!(scan.objects.len(), 1);
        let err = scan.error.unwrap();
        assert_eq!(err.unterminated, "template string");
        assert_eq!(line_col(src, err.offset), (2, 17));
    }

    #[test]
    fn unbalanced_object_reported() {
        let src = "{ id: 'ok' }\n{ id: 'open',";
        let scan = scan_objects(src);
        assert_eq!(scan.objects.len(), 1);
        let err = scan.error.unwrap();
        assert_eq!(err.unterminated, "object");
        assert_eq!(line_col(src, err.offset), (2, 1));
    }

    #[test]
    fn division_is_not_a_regex() {
        let src = "const r = a / b; const o = { id: 'q', v: (x) / 2 }";
        let scan = scan_objects(src);
        assert_eq!(scan.objects.len(), 1);
    }

    #[test]
    fn regex_after_keyword_is_skipped() {
        let src = "const f = (s) => { return /'/.test(s) }\nexport const t = [\n  { id: 'later', name: 'n' }\n]";
        let scan = scan_objects(src);
        assert!(scan.error.is_none(), "{:?}", scan.error);
        assert_eq!(scan.objects.len(), 1);
        assert_eq!(scan.objects[0].str_value("id"), Some("later"));

        let src = "switch (k) { case /\"/.source: break }\nif (typeof /`/ === 'object') {}\n{ id: 'x' }";
        let scan = scan_objects(src);
        assert!(scan.error.is_none(), "{:?}", scan.error);
        assert_eq!(scan.objects.len(), 1);
    }

    #[test]
    fn identifier_before_slash_is_division() {
        let src = "const n = total / count; const o = { id: 'q', r: returned / 2, s: '/' }";
        let scan = scan_objects(src);
        assert!(scan.error.is_none());
        assert_eq!(scan.objects[0].str_value("s"), Some("/"));
    }

    #[test]
    fn hex_and_unicode_escapes_decode() {
        let src = r"{ id: '\x72eceipt', name: '\u5c0f\u7968', emoji: '\uD83C\uDFAD', cp: '\u{1F3AD}', bad: '\xZZ', lone: '\uDC00' }";
        let scan = scan_objects(src);
        let obj = &scan.objects[0];
        assert_eq!(obj.str_value("id"), Some("receipt"));
        assert_eq!(obj.str_value("name"), Some("小票"));
        assert_eq!(obj.str_value("emoji"), Some("🎭"));
        assert_eq!(obj.str_value("cp"), Some("🎭"));
        assert_eq!(obj.get("bad"), Some(&PropertyValue::BadEscape(r"'\xZZ'".into())));
        assert_eq!(obj.get("lone"), Some(&PropertyValue::BadEscape(r"'\uDC00'".into())));
    }

    #[test]
    fn line_col_counts_chars() {
        let text = "第一行\n  中文{";
        assert_eq!(line_col(text, text.find('{').unwrap()), (2, 5));
    }
}
