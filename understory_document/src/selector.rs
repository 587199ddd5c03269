// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small selector engine: compound selectors and selector lists.
//!
//! Supported forms, freely combined within one compound selector:
//!
//! - `*` and type selectors (`div`)
//! - `#id` and `.class`
//! - `[attr]`, `[attr=value]`, `[attr*=value]`, `[attr~=value]`, `[attr^=value]`, `[attr$=value]`
//!   with bare or quoted (`'…'` / `"…"`) values
//!
//! Compound selectors may be joined into a list with `,`. Combinators (descendant, child, sibling)
//! are not supported; a selector using them fails to parse.

use alloc::string::String;
use alloc::vec::Vec;

use crate::types::ElementData;

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    test: Option<(AttributeOp, String)>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum AttributeOp {
    Equals,
    Contains,
    Includes,
    Prefix,
    Suffix,
}

impl Selector {
    /// Parse a selector list. Returns `None` when the text is not a supported selector.
    pub fn parse(text: &str) -> Option<Self> {
        let mut alternatives = Vec::new();
        for part in split_list(text) {
            alternatives.push(parse_compound(part.trim())?);
        }
        Some(Self { alternatives })
    }

    /// Returns true if any alternative of the list matches `element`.
    pub fn matches(&self, element: &ElementData) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }
}

impl Compound {
    fn matches(&self, element: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(&element.tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && attribute(element, "id") != Some(id.as_str())
        {
            return false;
        }
        if !self
            .classes
            .iter()
            .all(|c| element.classes.iter().any(|have| have == c))
        {
            return false;
        }
        self.attributes.iter().all(|a| a.matches(element))
    }
}

impl AttributeMatch {
    fn matches(&self, element: &ElementData) -> bool {
        let Some(value) = attribute(element, &self.name) else {
            return false;
        };
        let Some((op, expected)) = &self.test else {
            return true;
        };
        let expected = expected.as_str();
        match op {
            AttributeOp::Equals => value == expected,
            // An empty needle never matches for the substring forms.
            AttributeOp::Contains => !expected.is_empty() && value.contains(expected),
            AttributeOp::Prefix => !expected.is_empty() && value.starts_with(expected),
            AttributeOp::Suffix => !expected.is_empty() && value.ends_with(expected),
            AttributeOp::Includes => value.split_ascii_whitespace().any(|w| w == expected),
        }
    }
}

fn attribute<'a>(element: &'a ElementData, name: &str) -> Option<&'a str> {
    element
        .attributes
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

/// Split a selector list on commas that sit outside brackets and quotes.
fn split_list(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0_u32;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(rest: &mut &str) -> Option<String> {
    let end = rest
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map_or(rest.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }
    let (ident, tail) = rest.split_at(end);
    *rest = tail;
    Some(ident.into())
}

fn parse_compound(text: &str) -> Option<Compound> {
    if text.is_empty() {
        return None;
    }
    let mut rest = text;
    let mut out = Compound::default();

    if let Some(tail) = rest.strip_prefix('*') {
        rest = tail;
    } else if rest.starts_with(is_ident_char) {
        out.tag = Some(take_ident(&mut rest)?);
    }

    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        match c {
            '#' => out.id = Some(take_ident(&mut rest)?),
            '.' => out.classes.push(take_ident(&mut rest)?),
            '[' => {
                let close = rest.find(']')?;
                let (inner, tail) = rest.split_at(close);
                rest = &tail[1..];
                out.attributes.push(parse_attribute(inner.trim())?);
            }
            _ => return None,
        }
    }
    Some(out)
}

fn parse_attribute(inner: &str) -> Option<AttributeMatch> {
    let Some(eq) = inner.find('=') else {
        let mut rest = inner;
        let name = take_ident(&mut rest)?;
        return rest.is_empty().then_some(AttributeMatch { name, test: None });
    };
    let (lhs, rhs) = inner.split_at(eq);
    let (lhs, rhs) = (lhs.trim_end(), rhs[1..].trim());
    let (name, op) = match lhs.chars().last()? {
        '*' => (&lhs[..lhs.len() - 1], AttributeOp::Contains),
        '~' => (&lhs[..lhs.len() - 1], AttributeOp::Includes),
        '^' => (&lhs[..lhs.len() - 1], AttributeOp::Prefix),
        '$' => (&lhs[..lhs.len() - 1], AttributeOp::Suffix),
        _ => (lhs, AttributeOp::Equals),
    };
    let mut name_rest = name.trim();
    let name = take_ident(&mut name_rest)?;
    if !name_rest.is_empty() {
        return None;
    }
    let value = unquote(rhs)?;
    Some(AttributeMatch {
        name,
        test: Some((op, value.into())),
    })
}

fn unquote(value: &str) -> Option<&str> {
    for quote in ['\'', '"'] {
        if let Some(body) = value.strip_prefix(quote) {
            return body.strip_suffix(quote);
        }
    }
    value.chars().all(is_ident_char).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el() -> ElementData {
        ElementData::new("div")
            .with_attribute("id", "hero")
            .with_attribute("data-beacon", "a,b")
            .with_class("card")
            .with_class("wide")
    }

    #[test]
    fn simple_forms() {
        let e = el();
        for text in [
            "div",
            "*",
            "#hero",
            ".card",
            ".card.wide",
            "div#hero.card",
            "[data-beacon]",
            "[data-beacon='a,b']",
            "[data-beacon*=b]",
            "[data-beacon^=\"a\"]",
            "[data-beacon$=',b']",
        ] {
            let sel = Selector::parse(text).expect("selector should parse");
            assert!(sel.matches(&e), "{text} should match");
        }
    }

    #[test]
    fn non_matching_forms() {
        let e = el();
        for text in ["span", "#other", ".missing", "[title]", "[data-beacon=a]"] {
            let sel = Selector::parse(text).expect("selector should parse");
            assert!(!sel.matches(&e), "{text} should not match");
        }
    }

    #[test]
    fn lists_match_any_alternative() {
        let sel = Selector::parse("span, .card").unwrap();
        assert!(sel.matches(&el()));
    }

    #[test]
    fn empty_contains_needle_never_matches() {
        let sel = Selector::parse("[data-beacon*='']").unwrap();
        assert!(!sel.matches(&el()));
    }

    #[test]
    fn rejects_combinators_and_garbage() {
        for text in ["", "div span", "div > span", "#", "[data-beacon", "[=x]", ","] {
            assert!(Selector::parse(text).is_none(), "{text:?} should fail");
        }
    }
}
