// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use std::ops::Range;

use chumsky::{
    error::Simple,
    primitive::{any, end, filter, just},
    Parser,
};

use crate::ast::{Placeholder, Segment};

enum Piece {
    Char(char),
    Placeholder(Placeholder),
}

/// Splits template text into literal text and `${NAME[:default]}` placeholders.
///
/// Spans are character offsets into the scanned text.
pub struct Scanner {
    parser: Box<dyn Parser<char, Vec<Segment>, Error = Simple<char>>>,
}

impl Scanner {
    pub fn new() -> Scanner {
        let parser = gen_scanner();
        Scanner {
            parser: Box::new(parser),
        }
    }

    pub fn scan(&self, text: &str) -> Vec<Segment> {
        match self.parser.parse(text) {
            Ok(segments) => segments,
            // Every character is accepted as literal text, so this branch is never taken.
            Err(_) => vec![Segment::Text(text.to_string())],
        }
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner::new()
    }
}

fn gen_scanner() -> impl Parser<char, Vec<Segment>, Error = Simple<char>> {
    let name = filter(|c: &char| *c != '}' && *c != ':')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .labelled("variable name");

    let default = just(':')
        .ignore_then(filter(|c: &char| *c != '}').repeated().collect::<String>())
        .labelled("default value");

    let placeholder = just("${")
        .ignore_then(name)
        .then(default.or_not())
        .then_ignore(just('}'))
        .map_with_span(|(name, default), span: Range<usize>| {
            Piece::Placeholder(Placeholder { name, default, span })
        });

    // An unfinished `${` falls through to here one character at a time.
    let piece = placeholder.or(any().map(Piece::Char));

    piece.repeated().then_ignore(end()).map(coalesce)
}

fn coalesce(pieces: Vec<Piece>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    for piece in pieces {
        match piece {
            Piece::Char(c) => text.push(c),
            Piece::Placeholder(placeholder) => {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Placeholder(placeholder));
            }
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }

    segments
}
