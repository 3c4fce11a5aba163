//! Placeholder extraction for BRL definition text.
//!
//! Action and eval-condition definitions reference their bound variable as
//! `@{name}` (e.g. `recommendation.addRestaurantEmployees(@{count})`).

use winnow::combinator::{opt, preceded, terminated};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{any, take_while};

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn placeholder<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded("@{", terminated(ident, '}')).parse_next(input)
}

fn scan<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    let mut names = Vec::new();
    while !input.is_empty() {
        match opt(placeholder).parse_next(input)? {
            Some(name) => names.push(name),
            None => {
                any.parse_next(input)?;
            }
        }
    }
    Ok(names)
}

/// All `@{...}` tokens in `text`, in order of appearance.
pub(crate) fn placeholders(text: &str) -> Vec<&str> {
    scan.parse(text).unwrap_or_default()
}

/// The first `@{...}` token in `text`, if any.
pub(crate) fn first_placeholder(text: &str) -> Option<&str> {
    placeholders(text).into_iter().next()
}
