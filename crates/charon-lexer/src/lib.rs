//! charon-lexer — analyse lexicale pour Charon
//!
//! Le lexer lit la source `char` par `char`, avec retour arrière pour les
//! règles à plusieurs caractères, et produit toute la séquence en une passe :
//!
//! - `/` regarde deux caractères plus loin : `///` doc, `//` commentaire, sinon `/`
//! - `.` regarde deux caractères plus loin : `...` spread, sinon `.`
//! - chiffres → `Number`, lettres → `Identifier` ou mot-clé
//! - chaque token porte le [`Span`] de son premier caractère
//! - la séquence se termine toujours par un unique `Eoi`
//!
//! ```
//! use charon_lexer::{strip_trivia, tokenize, TokenKind};
//!
//! let tokens = strip_trivia(tokenize("let x = 5"));
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::Let, TokenKind::Identifier, TokenKind::Equal, TokenKind::Number, TokenKind::Eoi]
//! );
//! ```

#![deny(missing_docs)]

use charon_core::Span;

/// Catégories et tokens.
pub mod token;

pub use token::{TokenEntry, TokenKind};

/* ─────────────────────────── Options ─────────────────────────── */

/// Options du lexer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerOptions {
    /// Classe `\t` en `LnBreak` au lieu de `Whitespace`.
    ///
    /// Seule la catégorie change : une tabulation n'ouvre jamais de ligne dans les spans.
    pub tab_is_line_break: bool,
}

/* ─────────────────────────── Lexer ─────────────────────────── */

/// Lexer d'une source complète.
pub struct Lexer {
    chars: Vec<char>,
    /// Indice du prochain caractère non lu.
    pos: usize,
    /// Curseur, avancé avec `pos`.
    span: Span,
    opts: LexerOptions,
    tokens: Vec<TokenEntry>,
}

impl Lexer {
    /// Lexer avec les options par défaut.
    pub fn new(source: &str) -> Self { Self::with_options(source, LexerOptions::default()) }

    /// Lexer avec des options explicites.
    pub fn with_options(source: &str, opts: LexerOptions) -> Self {
        Self { chars: source.chars().collect(), pos: 0, span: Span::START, opts, tokens: Vec::new() }
    }

    /// Lexe toute la source ; le dernier token est toujours `Eoi`.
    pub fn run(mut self) -> Vec<TokenEntry> {
        while let Some(c) = self.bump() {
            let start = self.span;
            let (kind, text) = self.lex(c);
            log::trace!("{start} {kind} {text:?}");
            self.tokens.push(TokenEntry::new(start, text, kind));

            if self.ends_line(c) {
                self.span.advance_line();
            }
        }

        self.tokens.push(TokenEntry::new(self.span, String::new(), TokenKind::Eoi));
        log::debug!("lexed {} tokens, final position {}", self.tokens.len(), self.span);
        self.tokens
    }

    /// Classe le lexème qui commence par `c`, déjà consommé.
    fn lex(&mut self, c: char) -> (TokenKind, String) {
        let kind = match c {
            '+' => TokenKind::Add,
            '-' => TokenKind::Sub,
            '*' => TokenKind::Mul,
            '=' => TokenKind::Equal,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ';' => TokenKind::Semi,

            '/' => return self.lex_slash(),
            '.' => {
                if self.next_is_same(2, '.') {
                    TokenKind::Spread
                } else {
                    TokenKind::Property
                }
            }
            '|' => {
                if self.next_is_same(1, '|') {
                    TokenKind::Or
                } else {
                    TokenKind::Pipe
                }
            }
            '&' => {
                if self.next_is_same(1, '&') {
                    TokenKind::And
                } else {
                    TokenKind::Ampersand
                }
            }

            ' ' => return (TokenKind::Whitespace, String::new()),
            '\t' if self.opts.tab_is_line_break => return (TokenKind::LnBreak, String::new()),
            '\t' => return (TokenKind::Whitespace, String::new()),
            '\n' | '\r' => return (TokenKind::LnBreak, String::new()),

            '"' => return self.lex_string(),
            c if c.is_ascii_digit() => {
                self.push_back(1);
                return (TokenKind::Number, self.read_run(|c| c.is_ascii_digit()));
            }
            c if c.is_alphabetic() => {
                self.push_back(1);
                return self.lex_word();
            }

            other => return (TokenKind::Whitespace, other.to_string()),
        };
        (kind, kind.as_str().to_string())
    }

    /// `///`, `//` ou `/`. Les commentaires vont jusqu'à la fin de ligne.
    fn lex_slash(&mut self) -> (TokenKind, String) {
        let (kind, marker) = if self.next_is_same(2, '/') {
            (TokenKind::DocComment, "///")
        } else if self.next_is_same(1, '/') {
            (TokenKind::Comment, "//")
        } else {
            return (TokenKind::Div, "/".to_string());
        };
        let mut text = marker.to_string();
        text.push_str(&self.read_run(|c| c != '\n' && c != '\r'));
        (kind, text)
    }

    fn lex_word(&mut self) -> (TokenKind, String) {
        let word = self.read_run(char::is_alphabetic);
        let folded = word.to_lowercase();
        match TokenKind::keyword(&folded) {
            Some(kw) => (kw, folded),
            None => (TokenKind::Identifier, word),
        }
    }

    /// Contenu jusqu'au guillemet fermant ; `Invalid` si l'entrée se termine avant.
    fn lex_string(&mut self) -> (TokenKind, String) {
        let mut text = String::new();
        while let Some(c) = self.bump() {
            match c {
                '"' => return (TokenKind::String, text),
                '\n' => {
                    self.span.advance_line();
                    text.push(c);
                }
                '\r' => {
                    if self.peek() != Some('\n') {
                        self.span.advance_line();
                    }
                    text.push(c);
                }
                _ => text.push(c),
            }
        }
        log::debug!("unterminated string literal at end of input");
        (TokenKind::Invalid, text)
    }

    /* ────────── Primitives internes ────────── */

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        self.span.advance_column();
        Some(c)
    }

    fn peek(&self) -> Option<char> { self.chars.get(self.pos).copied() }

    /// Remet les `n` derniers caractères de la ligne courante.
    fn push_back(&mut self, n: usize) {
        let n = n.min(self.pos);
        self.pos -= n;
        self.span.retreat_column(u32::try_from(n).unwrap_or(u32::MAX));
    }

    /// Consomme les `n` caractères suivants s'ils valent tous `ch`.
    ///
    /// Sinon (ou en fin d'entrée) tout ce qui a été lu est remis et le curseur
    /// revient à sa position de départ.
    fn next_is_same(&mut self, n: usize, ch: char) -> bool {
        let mut read = 0;
        while read < n {
            match self.bump() {
                Some(c) => {
                    read += 1;
                    if c != ch {
                        self.push_back(read);
                        return false;
                    }
                }
                None => {
                    self.push_back(read);
                    return false;
                }
            }
        }
        true
    }

    /// Lit tant que `pred` tient ; le premier caractère refusé est remis.
    fn read_run(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.bump() {
            if pred(c) {
                out.push(c);
            } else {
                self.push_back(1);
                break;
            }
        }
        out
    }

    /// `\n` termine toujours une ligne ; `\r` seulement hors d'un `\r\n`.
    fn ends_line(&self, c: char) -> bool {
        match c {
            '\n' => true,
            '\r' => self.peek() != Some('\n'),
            _ => false,
        }
    }
}

/* ─────────────────────────── API ─────────────────────────── */

/// Lexe `source` avec les options par défaut.
pub fn tokenize(source: &str) -> Vec<TokenEntry> { Lexer::new(source).run() }

/// Retire les tokens `Whitespace` en gardant l'ordre des autres.
pub fn strip_trivia(tokens: Vec<TokenEntry>) -> Vec<TokenEntry> {
    tokens.into_iter().filter(|t| t.kind != TokenKind::Whitespace).collect()
}

/* ─────────────────────────── Tests ─────────────────────────── */

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use TokenKind::*;

    fn kinds(src: &str) -> Vec<TokenKind> { tokenize(src).into_iter().map(|t| t.kind).collect() }

    fn single_char_kind(c: char) -> TokenKind {
        match c {
            '+' => Add,
            '-' => Sub,
            '*' => Mul,
            '=' => Equal,
            '<' => Less,
            '>' => Greater,
            '{' => LBrace,
            '}' => RBrace,
            '(' => LParen,
            ')' => RParen,
            ';' => Semi,
            _ => unreachable!("not a single-character operator: {c:?}"),
        }
    }

    #[test]
    fn single_char_operators() {
        assert_eq!(
            kinds("+-*={}();"),
            [Add, Sub, Mul, Equal, LBrace, RBrace, LParen, RParen, Semi, Eoi]
        );
    }

    #[test]
    fn slash_family() {
        let t = tokenize("//");
        assert_eq!(t.len(), 2);
        assert_eq!((t[0].kind, t[0].text.as_str()), (Comment, "//"));

        let t = tokenize("///");
        assert_eq!(t.len(), 2);
        assert_eq!((t[0].kind, t[0].text.as_str()), (DocComment, "///"));

        let t = tokenize("/");
        assert_eq!(t.len(), 2);
        assert_eq!((t[0].kind, t[0].text.as_str()), (Div, "/"));
        assert_eq!(t[1].span, Span::new(1, 1));
    }

    #[test]
    fn failed_slash_lookahead_keeps_following_chars() {
        assert_eq!(kinds("/a"), [Div, Identifier, Eoi]);
        assert_eq!(kinds("/+/"), [Div, Add, Div, Eoi]);
        let t = tokenize("a/b");
        assert_eq!(t[2].text, "b");
        assert_eq!(t[2].span, Span::new(1, 3));
    }

    #[test]
    fn comments_run_to_end_of_line() {
        let t = tokenize("x // note\n/// doc\nlet");
        let got: Vec<_> = t.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(
            got,
            [
                (Identifier, "x"),
                (Whitespace, ""),
                (Comment, "// note"),
                (LnBreak, ""),
                (DocComment, "/// doc"),
                (LnBreak, ""),
                (Let, "let"),
                (Eoi, ""),
            ]
        );
        assert_eq!(t[6].span, Span::new(3, 1));
    }

    #[test]
    fn dots() {
        assert_eq!(kinds("."), [Property, Eoi]);
        assert_eq!(kinds(".."), [Property, Property, Eoi]);
        assert_eq!(kinds("..."), [Spread, Eoi]);
        assert_eq!(kinds("...."), [Spread, Property, Eoi]);
        assert_eq!(kinds(".x"), [Property, Identifier, Eoi]);
        let t = tokenize("a..");
        assert_eq!(t[1].span, Span::new(1, 2));
        assert_eq!(t[2].span, Span::new(1, 3));
        assert_eq!(t[3].span, Span::new(1, 3));
    }

    #[test]
    fn pipes_and_ampersands() {
        assert_eq!(kinds("| || & &&"), [Pipe, Whitespace, Or, Whitespace, Ampersand, Whitespace, And, Eoi]);
        assert_eq!(kinds("|||"), [Or, Pipe, Eoi]);
    }

    #[test]
    fn spans_across_lines() {
        let t = tokenize("a\nb");
        assert_eq!(t[0].span, Span::new(1, 1));
        assert_eq!(t[1].kind, LnBreak);
        assert_eq!(t[2].text, "b");
        assert_eq!(t[2].span, Span::new(2, 1));
        assert_eq!(t[3].span, Span::new(2, 1));
    }

    #[test]
    fn carriage_returns_count_one_line() {
        let crlf = tokenize("a\r\nb");
        assert_eq!(crlf[3].span, Span::new(2, 1));
        let cr = tokenize("a\rb");
        assert_eq!(cr[2].span, Span::new(2, 1));
    }

    #[test]
    fn spans_of_declaration() {
        let t = strip_trivia(tokenize("let x = 5"));
        let spans: Vec<_> = t.iter().map(|t| t.span).collect();
        assert_eq!(
            spans,
            [Span::new(1, 1), Span::new(1, 5), Span::new(1, 7), Span::new(1, 9), Span::new(1, 9)]
        );
    }

    #[test]
    fn keywords_are_case_folded() {
        let t = tokenize("LET Const fn TRUE false type Struct ENUM Letter");
        let got: Vec<_> =
            t.iter().filter(|t| t.kind != Whitespace).map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(
            got,
            [
                (Let, "let"),
                (Const, "const"),
                (Fn, "fn"),
                (True, "true"),
                (False, "false"),
                (Type, "type"),
                (Struct, "struct"),
                (Enum, "enum"),
                (Identifier, "Letter"),
                (Eoi, ""),
            ]
        );
    }

    #[test]
    fn numbers_are_digit_runs() {
        let t = tokenize("123abc 4.5");
        let got: Vec<_> = t.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(
            got,
            [
                (Number, "123"),
                (Identifier, "abc"),
                (Whitespace, ""),
                (Number, "4"),
                (Property, "."),
                (Number, "5"),
                (Eoi, ""),
            ]
        );
        assert_eq!(t[1].span, Span::new(1, 4));
    }

    #[test]
    fn strings() {
        let t = tokenize("\"hi there\" x");
        assert_eq!((t[0].kind, t[0].text.as_str()), (String, "hi there"));
        assert_eq!(t[2].span, Span::new(1, 12));

        let t = tokenize("\"a\nb\" c");
        assert_eq!(t[2].span, Span::new(2, 4));

        let t = tokenize("\"abc");
        assert_eq!(t.len(), 2);
        assert_eq!((t[0].kind, t[0].text.as_str()), (Invalid, "abc"));
    }

    #[test]
    fn unknown_chars_pass_through_as_whitespace() {
        let t = tokenize("@x");
        assert_eq!((t[0].kind, t[0].text.as_str()), (Whitespace, "@"));
        assert_eq!(kinds("\u{a0}"), [Whitespace, Eoi]);
        assert_eq!(strip_trivia(t).iter().map(|t| t.kind).collect::<Vec<_>>(), [Identifier, Eoi]);
    }

    #[test]
    fn tab_classification() {
        assert_eq!(kinds("\t"), [Whitespace, Eoi]);
        let opts = LexerOptions { tab_is_line_break: true };
        let t = Lexer::with_options("\tx", opts).run();
        assert_eq!(t[0].kind, LnBreak);
        assert_eq!(t[1].span, Span::new(1, 2));
    }

    #[test]
    fn strip_trivia_keeps_line_breaks_and_comments() {
        let t = strip_trivia(tokenize("a b\n// c"));
        assert_eq!(t.iter().map(|t| t.kind).collect::<Vec<_>>(), [Identifier, Identifier, LnBreak, Comment, Eoi]);
    }

    #[test]
    fn empty_source() {
        let t = tokenize("");
        assert_eq!(t, [TokenEntry::new(Span::START, "", Eoi)]);
    }

    proptest! {
        #[test]
        fn operator_strings_lex_one_token_per_char(src in "[-+*={}();<>]{0,40}") {
            let t = tokenize(&src);
            prop_assert_eq!(t.len(), src.chars().count() + 1);
            for (tok, c) in t.iter().zip(src.chars()) {
                prop_assert_eq!(tok.kind, single_char_kind(c));
            }
            prop_assert_eq!(t.last().map(|t| t.kind), Some(Eoi));
        }

        #[test]
        fn any_input_ends_with_single_eoi(src in "\\PC{0,64}") {
            let t = tokenize(&src);
            prop_assert_eq!(t.iter().filter(|t| t.kind == Eoi).count(), 1);
            prop_assert_eq!(t.last().map(|t| t.kind), Some(Eoi));
        }

        #[test]
        fn strip_trivia_preserves_order(src in "[a-z0-9 \\t+;\\n]{0,64}") {
            let all = tokenize(&src);
            let expected: Vec<_> = all.iter().filter(|t| t.kind != Whitespace).cloned().collect();
            prop_assert_eq!(strip_trivia(all), expected);
        }

        #[test]
        fn spans_never_go_backwards(src in "[a-z0-9 ./\\n\\r\\t\"|&;=]{0,64}") {
            let t = tokenize(&src);
            for pair in t.windows(2) {
                prop_assert!(pair[0].span <= pair[1].span, "{} then {}", pair[0].span, pair[1].span);
            }
        }
    }
}
