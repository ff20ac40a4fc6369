//! Lexing of commands.

use core::fmt::{self, Display};
use logos::{Lexer, Logos};

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'s> {
    #[token("symbol")]
    Symbol,

    #[token("rule")]
    Rule,

    #[token("unit")]
    Unit,

    #[token("absorb")]
    Absorb,

    #[token("idem")]
    Idem,

    #[token("fold")]
    Fold,

    #[token("norm")]
    Norm,

    #[token("eq")]
    Eq,

    #[token("subst")]
    Subst,

    #[token("(")]
    LPar,

    #[token(")")]
    RPar,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token("+")]
    Plus,

    #[token("*")]
    Star,

    #[token("-")]
    Minus,

    #[token("-->")]
    LongArrow,

    #[token("==")]
    EqEq,

    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Ident(&'s str),

    #[regex("[0-9]+")]
    Int(&'s str),

    /// scalar literal `$...$`, without the dollars
    #[regex(r"\$[^$]*\$", |lex| trim(lex.slice()))]
    Scalar(&'s str),

    /// label literal `'...'`, without the quotes
    #[regex(r"'[^']*'", |lex| trim(lex.slice()))]
    Label(&'s str),

    #[regex(r"[ \t\r\n\f]+")]
    #[token("(*", comment)]
    Space,

    #[error]
    Error,
}

impl<'s> Display for Token<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match self {
            Self::Symbol => "symbol",
            Self::Rule => "rule",
            Self::Unit => "unit",
            Self::Absorb => "absorb",
            Self::Idem => "idem",
            Self::Fold => "fold",
            Self::Norm => "norm",
            Self::Eq => "eq",
            Self::Subst => "subst",
            Self::LPar => "(",
            Self::RPar => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Plus => "+",
            Self::Star => "*",
            Self::Minus => "-",
            Self::LongArrow => "-->",
            Self::EqEq => "==",
            Self::Ident(s) | Self::Int(s) => *s,
            Self::Scalar(s) => return write!(f, "${}$", s),
            Self::Label(s) => return write!(f, "'{}'", s),
            Self::Space => " ",
            Self::Error => return Err(Default::default()),
        };
        s.fmt(f)
    }
}

/// Remove the first and the last character.
fn trim(s: &str) -> &str {
    &s[1..s.len() - 1]
}

fn comment<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Option<()> {
    // number of open comments
    let mut open = 1;
    let prefix: &[_] = &['(', '*'];
    while open > 0 {
        lex.bump(lex.remainder().find(prefix)?);
        if lex.remainder().starts_with("(*") {
            open += 1;
            lex.bump(2);
        } else if lex.remainder().starts_with("*)") {
            open -= 1;
            lex.bump(2);
        } else {
            lex.bump(1);
        }
    }
    Some(())
}

/// Tokens of a string, without whitespace and comments.
pub struct Lex<'s>(Lexer<'s, Token<'s>>);

impl<'s> Lex<'s> {
    pub fn new(s: &'s str) -> Self {
        Self(Token::lexer(s))
    }
}

impl<'s> Iterator for Lex<'s> {
    type Item = Token<'s>;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.by_ref().find(|token| *token != Token::Space)
    }
}

#[test]
fn tokens() {
    use Token::*;
    let s = "rule r : ADD(x, $-1$) --> 'e_1'. (* nested (* comment *) *) eq";
    let tokens: Vec<_> = Lex::new(s).collect();
    let expected = [
        Rule,
        Ident("r"),
        Colon,
        Ident("ADD"),
        LPar,
        Ident("x"),
        Comma,
        Scalar("-1"),
        RPar,
        LongArrow,
        Label("e_1"),
        Dot,
        Eq,
    ];
    assert_eq!(tokens, expected);
    assert_eq!(Lex::new("(* open").next(), Some(Error));
    assert_eq!(Lex::new("symbols").collect::<Vec<_>>(), [Ident("symbols")]);
    assert_eq!(Lex::new("-2-->").collect::<Vec<_>>(), [Minus, Int("2"), LongArrow]);
}
