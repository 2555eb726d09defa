//! Minimal test-only tokenizer. The real lexer is outside this crate's scope
//! (`SPEC_FULL.md` §1); this is just enough hand-rolled scanning to turn the
//! literal source snippets in the end-to-end scenarios into a [`Token`]
//! stream the parser can consume.

use std::rc::Rc;

use gsc::{Token, TokenKind};

pub fn lex(src: &str, file: &str) -> Vec<Token> {
    let file: Rc<str> = Rc::from(file);
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    let mut line = 1u32;

    macro_rules! push {
        ($kind:expr, $lexeme:expr) => {
            tokens.push(Token::new($kind, $lexeme, file.clone(), line))
        };
    }

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            c if c.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    if chars[i] == '\n' {
                        line += 1;
                    }
                    i += 1;
                }
                i += 2;
            }
            '/' if chars.get(i + 1) == Some(&'#') => {
                push!(TokenKind::DevBlockStart, "/#");
                i += 2;
            }
            '#' if chars.get(i + 1) == Some(&'/') => {
                push!(TokenKind::DevBlockEnd, "#/");
                i += 2;
            }
            '"' => {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != '"' {
                    i += 1;
                }
                let lexeme: String = chars[start..i].iter().collect();
                i += 1;
                push!(TokenKind::StringLiteral, lexeme);
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if chars.get(i) == Some(&'.') && chars.get(i + 1).is_some_and(char::is_ascii_digit) {
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    let lexeme: String = chars[start..i].iter().collect();
                    push!(TokenKind::NumberLiteral, lexeme);
                } else {
                    let lexeme: String = chars[start..i].iter().collect();
                    push!(TokenKind::IntegerLiteral, lexeme);
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let kind = keyword(&word);
                push!(kind, word);
            }
            ':' if chars.get(i + 1) == Some(&':') => {
                push!(TokenKind::DoubleColon, "::");
                i += 2;
            }
            '[' if chars.get(i + 1) == Some(&'[') => {
                push!(TokenKind::DoubleLBracket, "[[");
                i += 2;
            }
            ']' if chars.get(i + 1) == Some(&']') => {
                push!(TokenKind::DoubleRBracket, "]]");
                i += 2;
            }
            '+' if chars.get(i + 1) == Some(&'+') => {
                push!(TokenKind::PlusPlus, "++");
                i += 2;
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                push!(TokenKind::MinusMinus, "--");
                i += 2;
            }
            '&' if chars.get(i + 1) == Some(&'&') => {
                push!(TokenKind::AndAnd, "&&");
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                push!(TokenKind::OrOr, "||");
                i += 2;
            }
            '<' if chars.get(i + 1) == Some(&'<') => {
                push!(TokenKind::Shl, "<<");
                i += 2;
            }
            '>' if chars.get(i + 1) == Some(&'>') => {
                push!(TokenKind::Shr, ">>");
                i += 2;
            }
            '=' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::Eq, "==");
                i += 2;
            }
            '!' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::Ne, "!=");
                i += 2;
            }
            '>' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::Ge, ">=");
                i += 2;
            }
            '<' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::Le, "<=");
                i += 2;
            }
            '+' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::PlusAssign, "+=");
                i += 2;
            }
            '-' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::MinusAssign, "-=");
                i += 2;
            }
            '*' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::StarAssign, "*=");
                i += 2;
            }
            '/' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::SlashAssign, "/=");
                i += 2;
            }
            '&' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::AndAssign, "&=");
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::OrAssign, "|=");
                i += 2;
            }
            '^' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::XorAssign, "^=");
                i += 2;
            }
            '%' if chars.get(i + 1) == Some(&'=') => {
                push!(TokenKind::PercentAssign, "%=");
                i += 2;
            }
            '(' => {
                push!(TokenKind::LParen, "(");
                i += 1;
            }
            ')' => {
                push!(TokenKind::RParen, ")");
                i += 1;
            }
            '{' => {
                push!(TokenKind::LBrace, "{");
                i += 1;
            }
            '}' => {
                push!(TokenKind::RBrace, "}");
                i += 1;
            }
            '[' => {
                push!(TokenKind::LBracket, "[");
                i += 1;
            }
            ']' => {
                push!(TokenKind::RBracket, "]");
                i += 1;
            }
            ',' => {
                push!(TokenKind::Comma, ",");
                i += 1;
            }
            ';' => {
                push!(TokenKind::Semicolon, ";");
                i += 1;
            }
            ':' => {
                push!(TokenKind::Colon, ":");
                i += 1;
            }
            '.' => {
                push!(TokenKind::Dot, ".");
                i += 1;
            }
            '#' => {
                push!(TokenKind::Hash, "#");
                i += 1;
            }
            '&' => {
                push!(TokenKind::Ampersand, "&");
                i += 1;
            }
            '%' => {
                push!(TokenKind::Percent, "%");
                i += 1;
            }
            '=' => {
                push!(TokenKind::Assign, "=");
                i += 1;
            }
            '?' => {
                push!(TokenKind::Question, "?");
                i += 1;
            }
            '|' => {
                push!(TokenKind::Pipe, "|");
                i += 1;
            }
            '^' => {
                push!(TokenKind::Caret, "^");
                i += 1;
            }
            '>' => {
                push!(TokenKind::Gt, ">");
                i += 1;
            }
            '<' => {
                push!(TokenKind::Lt, "<");
                i += 1;
            }
            '+' => {
                push!(TokenKind::Plus, "+");
                i += 1;
            }
            '-' => {
                push!(TokenKind::Minus, "-");
                i += 1;
            }
            '*' => {
                push!(TokenKind::Star, "*");
                i += 1;
            }
            '/' => {
                push!(TokenKind::Slash, "/");
                i += 1;
            }
            '!' => {
                push!(TokenKind::Bang, "!");
                i += 1;
            }
            '~' => {
                push!(TokenKind::Tilde, "~");
                i += 1;
            }
            other => panic!("unrecognized character {other:?} in test fixture"),
        }
    }
    push!(TokenKind::Eof, "");
    tokens
}

fn keyword(word: &str) -> TokenKind {
    match word {
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "do" => TokenKind::Do,
        "return" => TokenKind::Return,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "wait" => TokenKind::Wait,
        "waittillframeend" => TokenKind::WaitTillFrameEnd,
        "thread" => TokenKind::Thread,
        "using" => TokenKind::Using,
        "using_animtree" => TokenKind::UsingAnimtree,
        "animtree" => TokenKind::Animtree,
        "undefined" => TokenKind::Undefined,
        _ => TokenKind::Identifier,
    }
}
