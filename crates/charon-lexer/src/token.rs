//! Catégories de tokens et tokens produits par le [`Lexer`](crate::Lexer).

use core::fmt;

use charon_core::Span;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Catégorie lexicale d'un token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TokenKind {
    /// Fin d'entrée, toujours le dernier token.
    Eoi,

    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,

    /// `=`
    Equal,
    /// `<`
    Less,
    /// `>`
    Greater,

    /// Suite de chiffres ASCII.
    Number,
    /// `"…"`, le texte garde le contenu sans les guillemets.
    String,
    /// Suite de lettres qui n'est pas un mot-clé.
    Identifier,

    /// Espace, tabulation ou caractère non classé par le lexer.
    Whitespace,
    /// `\n` ou `\r`.
    LnBreak,
    /// `;`
    Semi,
    /// `// …` jusqu'à la fin de ligne.
    Comment,
    /// `/// …` jusqu'à la fin de ligne.
    DocComment,

    /// `const`
    Const,
    /// `let`
    Let,
    /// `true`
    True,
    /// `false`
    False,
    /// `fn`
    Fn,
    /// `type`
    Type,
    /// `struct`
    Struct,
    /// `enum`
    Enum,

    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `...`
    Spread,
    /// `.`
    Property,
    /// `|`
    Pipe,
    /// `||`
    Or,
    /// `&`
    Ampersand,
    /// `&&`
    And,

    /// Lexème mal formé (chaîne non terminée).
    Invalid,
}

impl TokenKind {
    /// Mot-clé correspondant à un mot déjà passé en minuscules.
    pub fn keyword(word: &str) -> Option<Self> {
        Some(match word {
            "const" => TokenKind::Const,
            "let" => TokenKind::Let,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "fn" => TokenKind::Fn,
            "type" => TokenKind::Type,
            "struct" => TokenKind::Struct,
            "enum" => TokenKind::Enum,
            _ => return None,
        })
    }

    /// Espacement, sauts de ligne et commentaires.
    pub const fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::LnBreak | TokenKind::Comment | TokenKind::DocComment)
    }

    /// Mots réservés.
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Const
                | TokenKind::Let
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Fn
                | TokenKind::Type
                | TokenKind::Struct
                | TokenKind::Enum
        )
    }

    /// Nom court d'affichage.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenKind::Eoi => "EOI",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::Equal => "=",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::LnBreak => "LNBREAK",
            TokenKind::Semi => "SEMI",
            TokenKind::Comment => "COMMENT",
            TokenKind::DocComment => "DOC_COMMENT",
            TokenKind::Const => "CONST",
            TokenKind::Let => "LET",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Fn => "FN",
            TokenKind::Type => "TYPE",
            TokenKind::Struct => "STRUCT",
            TokenKind::Enum => "ENUM",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Spread => "...",
            TokenKind::Property => ".",
            TokenKind::Pipe => "|",
            TokenKind::Or => "||",
            TokenKind::Ampersand => "&",
            TokenKind::And => "&&",
            TokenKind::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Un lexème classé.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TokenEntry {
    /// Position du premier caractère.
    pub span: Span,
    /// Lexème ; vide pour l'espacement, les sauts de ligne et la fin d'entrée.
    pub text: String,
    /// Catégorie.
    pub kind: TokenKind,
}

impl TokenEntry {
    /// Construit un token.
    pub fn new(span: Span, text: impl Into<String>, kind: TokenKind) -> Self {
        Self { span, text: text.into(), kind }
    }
}

impl fmt::Display for TokenEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' of token type {} on ln {}", self.text.escape_debug(), self.kind, self.span)
    }
}
