//! # JSONPath Expression Parser
//!
//! Turns path text into a small AST that [`crate::compiled_path::CompiledPath`]
//! links into a token chain.
//!
//! ## Supported syntax
//!
//! - **Roots**: `$` (the document) and `@` (the value a function runs on)
//! - **Properties**: `.name`, `['name']`, `["name"]`
//! - **Array indexes**: `[0]`, `[-1]`
//! - **Function calls**: `.name()`, `.name(arg, ...)`
//!
//! A function argument is either a sub-path (starting with `$` or `@`) or a
//! JSON literal. Literal strings may use single or double quotes:
//!
//! ```rust
//! use atrius_json_path::parser::{Argument, Segment, parser};
//! use chumsky::Parser;
//!
//! let expr = parser().parse("$.names.join('|', @.ids)").into_result().unwrap();
//! assert_eq!(expr.segments.len(), 2);
//! assert!(matches!(&expr.segments[1], Segment::Function(name, args)
//!     if name == "join" && matches!(args[1], Argument::Path(_))));
//! ```

use chumsky::Parser;
use chumsky::error::Rich;
use chumsky::prelude::*;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

/// Where a path starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// `$`
    Document,
    /// `@`
    Current,
}

impl RootKind {
    pub fn symbol(&self) -> char {
        match self {
            RootKind::Document => '$',
            RootKind::Current => '@',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Property(String),
    Index(i64),
    Function(String, Vec<Argument>),
}

/// A function argument as written in the path.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Literal(Value),
    Path(PathExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub root: RootKind,
    pub segments: Vec<Segment>,
}

pub fn parser<'src>()
-> impl Parser<'src, &'src str, PathExpr, extra::Err<Rich<'src, char>>> + Clone + 'src {
    // Escape sequences shared by both quote styles, including \uXXXX
    let esc = just('\\').ignore_then(choice((
        just('\'').to('\''),
        just('"').to('"'),
        just('\\').to('\\'),
        just('/').to('/'),
        just('b').to('\u{0008}'),
        just('f').to('\u{000C}'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
        just('u').ignore_then(
            any()
                .filter(|c: &char| c.is_ascii_hexdigit())
                .repeated()
                .exactly(4)
                .collect::<String>()
                .try_map(
                    |digits: String, span| match u32::from_str_radix(&digits, 16) {
                        Ok(code) => match char::from_u32(code) {
                            Some(c) => Ok(c),
                            None => Err(Rich::custom(span, "Invalid Unicode code point")),
                        },
                        Err(_) => Err(Rich::custom(span, "Invalid hex digits")),
                    },
                ),
        ),
    )));

    let single_quoted = just('\'')
        .ignore_then(
            none_of("\\'")
                .or(esc.clone())
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('\''));
    let double_quoted = just('"')
        .ignore_then(
            none_of("\\\"")
                .or(esc.clone())
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'));
    let string = choice((single_quoted, double_quoted)).boxed();

    let digits = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .collect::<String>();

    // -?digits(.digits)?([eE][+-]?digits)?
    let number = just('-')
        .or_not()
        .then(digits.clone())
        .then(just('.').ignore_then(digits.clone()).or_not())
        .then(
            one_of("eE")
                .then(one_of("+-").or_not())
                .then(digits.clone())
                .or_not(),
        )
        .try_map(|(((sign, int), frac), exp), span| {
            let mut text = String::new();
            if sign.is_some() {
                text.push('-');
            }
            text.push_str(&int);
            if let Some(frac) = frac {
                text.push('.');
                text.push_str(&frac);
            }
            if let Some(((e, exp_sign), exp_digits)) = exp {
                text.push(e);
                if let Some(exp_sign) = exp_sign {
                    text.push(exp_sign);
                }
                text.push_str(&exp_digits);
            }
            match Number::from_str(&text) {
                Ok(n) => Ok(Value::Number(n)),
                Err(_) => Err(Rich::custom(span, format!("Invalid number: {}", text))),
            }
        })
        .boxed();

    let index = just('-')
        .or_not()
        .then(digits.clone())
        .try_map(|(sign, digits), span| {
            let text = if sign.is_some() {
                format!("-{}", digits)
            } else {
                digits
            };
            match i64::from_str(&text) {
                Ok(n) => Ok(n),
                Err(_) => Err(Rich::custom(span, format!("Invalid array index: {}", text))),
            }
        });

    let identifier = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(first, rest): (char, Vec<char>)| {
            let mut s = first.to_string();
            s.extend(rest);
            s
        });

    // JSON literal arguments
    let literal = recursive(|literal| {
        let array = literal
            .clone()
            .separated_by(just(',').padded())
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just('[').padded(), just(']').padded())
            .map(Value::Array);

        let member = string
            .clone()
            .padded()
            .then_ignore(just(':').padded())
            .then(literal.clone());
        let object = member
            .separated_by(just(',').padded())
            .allow_trailing()
            .collect::<Vec<(String, Value)>>()
            .delimited_by(just('{').padded(), just('}').padded())
            .map(|members| Value::Object(members.into_iter().collect::<Map<String, Value>>()));

        choice((
            text::keyword("null").to(Value::Null).boxed(),
            text::keyword("true").to(Value::Bool(true)).boxed(),
            text::keyword("false").to(Value::Bool(false)).boxed(),
            number.clone(),
            string.clone().map(Value::String).boxed(),
            array.boxed(),
            object.boxed(),
        ))
        .padded()
    });

    recursive(|path| {
        let root = choice((
            just('$').to(RootKind::Document),
            just('@').to(RootKind::Current),
        ));

        // Sub-paths are tried first; anything not starting with $ or @ is a literal
        let argument = choice((
            path.clone().map(Argument::Path).boxed(),
            literal.clone().map(Argument::Literal).boxed(),
        ))
        .padded();
        let arguments = argument
            .separated_by(just(',').padded())
            .collect::<Vec<_>>()
            .delimited_by(just('(').padded(), just(')'));

        let dot_segment = just('.')
            .ignore_then(identifier.clone())
            .then(arguments.or_not())
            .map(|(name, args)| match args {
                Some(args) => Segment::Function(name, args),
                None => Segment::Property(name),
            });

        let bracket_segment = choice((
            string.clone().map(Segment::Property).boxed(),
            index.clone().map(Segment::Index).boxed(),
        ))
        .padded()
        .delimited_by(just('['), just(']'));

        root.then(
            choice((dot_segment.boxed(), bracket_segment.boxed()))
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(root, segments)| PathExpr { root, segments })
    })
    .padded()
    .then_ignore(end())
}
