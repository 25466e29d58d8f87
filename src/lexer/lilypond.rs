//! Reference LilyPond tokenizer.
//!
//! Built from two small [`logos`] lexers: a main-mode lexer and a
//! string-interior lexer, switched on each `"` delimiter via `morph`. The
//! driving iterator layers the little context the extraction rules need on
//! top: keyword/command classification of backslash words and
//! scheme-context classification of bare words, tracked with a paren
//! counter after each `#`.
//!
//! This is not a LilyPond grammar. It covers commands, comments, string
//! delimiters and scheme context; everything else is passed through as
//! word or punctuation tokens.

use logos::Logos;

use crate::token::{Token, TokenKind};

/// Backslash words that tokenize as [`TokenKind::Keyword`]; the extraction
/// rules trigger on these.
const KEYWORDS: [&str; 2] = ["\\version", "\\include"];

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LyTok {
    #[regex(r"\\[a-zA-Z]+")]
    BackslashWord,

    #[token("\"")]
    Quote,

    #[token("#")]
    Hash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("%{", block_comment)]
    BlockComment,

    #[regex(r"%([^{\n][^\n]*)?")]
    LineComment,

    #[regex(r"[ \t\r\n]+")]
    Space,

    #[regex(r"[a-zA-Z][a-zA-Z0-9_-]*")]
    Word,

    #[regex(r".", priority = 0)]
    Other,
}

/// Consumes up to and including the closing `%}`; an unterminated block
/// comment runs to the end of input.
fn block_comment(lex: &mut logos::Lexer<LyTok>) {
    let remainder = lex.remainder();
    match remainder.find("%}") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(remainder.len()),
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum StrTok {
    #[token("\"")]
    Quote,

    #[regex(r"\\.")]
    Escape,

    #[regex(r#"[^"\\]+"#)]
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scheme {
    Inactive,
    /// Directly after `#`, waiting for the datum.
    Pending,
    /// Inside a parenthesized scheme expression, with nesting depth.
    Parens(u32),
}

enum State<'a> {
    Main(logos::Lexer<'a, LyTok>),
    Str(logos::Lexer<'a, StrTok>),
    Done,
}

/// Token iterator over LilyPond source text.
pub struct LilypondTokens<'a> {
    state: State<'a>,
    scheme: Scheme,
}

/// Tokenizes LilyPond source text.
pub fn tokens(text: &str) -> LilypondTokens<'_> {
    LilypondTokens {
        state: State::Main(LyTok::lexer(text)),
        scheme: Scheme::Inactive,
    }
}

impl Iterator for LilypondTokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Main(mut lex) => {
                let result = lex.next()?;
                let text = lex.slice().to_string();
                match result {
                    Ok(LyTok::Quote) => {
                        if self.scheme == Scheme::Pending {
                            // the string is the scheme datum
                            self.scheme = Scheme::Inactive;
                        }
                        self.state = State::Str(lex.morph());
                        Some(Token::new(TokenKind::Quote, text))
                    }
                    Ok(tok) => {
                        let token = self.classify(tok, text);
                        self.state = State::Main(lex);
                        Some(token)
                    }
                    Err(()) => {
                        self.state = State::Main(lex);
                        Some(Token::new(TokenKind::Punct, text))
                    }
                }
            }
            State::Str(mut lex) => {
                let result = lex.next()?;
                let text = lex.slice().to_string();
                match result {
                    Ok(StrTok::Quote) => {
                        self.state = State::Main(lex.morph());
                        Some(Token::new(TokenKind::Quote, text))
                    }
                    Ok(_) | Err(()) => {
                        self.state = State::Str(lex);
                        Some(Token::new(TokenKind::Word, text))
                    }
                }
            }
            State::Done => None,
        }
    }
}

impl LilypondTokens<'_> {
    fn classify(&mut self, tok: LyTok, text: String) -> Token {
        match tok {
            LyTok::BackslashWord => {
                if self.scheme == Scheme::Pending {
                    self.scheme = Scheme::Inactive;
                }
                let kind = if KEYWORDS.contains(&text.as_str()) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Command
                };
                Token::new(kind, text)
            }
            LyTok::Hash => {
                if !matches!(self.scheme, Scheme::Parens(_)) {
                    self.scheme = Scheme::Pending;
                }
                Token::new(TokenKind::SchemeStart, text)
            }
            LyTok::LParen => {
                self.scheme = match self.scheme {
                    Scheme::Pending => Scheme::Parens(1),
                    Scheme::Parens(depth) => Scheme::Parens(depth + 1),
                    Scheme::Inactive => Scheme::Inactive,
                };
                Token::new(TokenKind::Punct, text)
            }
            LyTok::RParen => {
                self.scheme = match self.scheme {
                    Scheme::Parens(1) | Scheme::Pending => Scheme::Inactive,
                    Scheme::Parens(depth) => Scheme::Parens(depth - 1),
                    Scheme::Inactive => Scheme::Inactive,
                };
                Token::new(TokenKind::Punct, text)
            }
            LyTok::Word => {
                let kind = match self.scheme {
                    Scheme::Inactive => TokenKind::Word,
                    Scheme::Pending => {
                        self.scheme = Scheme::Inactive;
                        TokenKind::SchemeIdentifier
                    }
                    Scheme::Parens(_) => TokenKind::SchemeIdentifier,
                };
                Token::new(kind, text)
            }
            LyTok::Space => Token::new(TokenKind::Space, text),
            LyTok::BlockComment | LyTok::LineComment => Token::new(TokenKind::Comment, text),
            LyTok::Other => Token::new(TokenKind::Punct, text),
            // handled before classify
            LyTok::Quote => Token::new(TokenKind::Quote, text),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum PlainTok {
    #[regex(r"\s+")]
    Space,

    #[regex(r"\S+")]
    Word,
}

/// Word/space tokenization for non-lilypond dialects. Carries no extraction
/// triggers by construction.
pub fn plain_tokens(text: &str) -> impl Iterator<Item = Token> + '_ {
    PlainTok::lexer(text).spanned().map(|(result, span)| {
        let kind = match result {
            Ok(PlainTok::Space) => TokenKind::Space,
            Ok(PlainTok::Word) | Err(()) => TokenKind::Word,
        };
        Token::new(kind, &text[span])
    })
}
