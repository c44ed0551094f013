//! Algebra over anchored regular languages (spec.md §2 item 2, §4.6 of
//! SPEC_FULL.md): inclusion, intersection/complement construction, and a
//! finiteness test, implemented with Brzozowski derivatives over a finite
//! symbolic alphabet.
//!
//! Patterns are expected anchored (`^...$`), matching spec.md's glossary
//! entry for `Pattern`. [`parse_anchored`] strips the anchors (adding the
//! implicit `.*` on either side is the caller's job per spec.md §9 when a
//! pattern is *not* anchored) before lowering into [`Regex`].

use std::collections::{BTreeSet, HashSet};
use std::fmt::Write as _;

use regex_syntax::hir::{Class, Hir, HirKind, Literal, Repetition};
use regex_syntax::Parser;

/// A symbolic regular-expression AST restricted to what JSON Schema `pattern`
/// needs: character classes, concatenation, alternation and bounded/unbounded
/// repetition. No backreferences, no lookaround — those never occur in the
/// output of [`regex_syntax`]'s parser for the patterns this crate accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Regex {
    /// Matches the empty language.
    Empty,
    /// Matches only the empty string.
    Epsilon,
    /// Matches exactly one character drawn from the given set of inclusive ranges.
    Class(Vec<(char, char)>),
    Concat(Box<Regex>, Box<Regex>),
    Alt(Box<Regex>, Box<Regex>),
    /// `body{min,max}`; `max = None` means unbounded.
    Repeat {
        body: Box<Regex>,
        min: u32,
        max: Option<u32>,
    },
}

impl Regex {
    fn class(ranges: Vec<(char, char)>) -> Self {
        if ranges.is_empty() {
            Self::Empty
        } else {
            Self::Class(ranges)
        }
    }

    fn concat(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Empty, _) | (_, Self::Empty) => Self::Empty,
            (Self::Epsilon, b) => b,
            (a, Self::Epsilon) => a,
            (a, b) => Self::Concat(Box::new(a), Box::new(b)),
        }
    }

    fn alt(a: Self, b: Self) -> Self {
        match (a, b) {
            (Self::Empty, b) => b,
            (a, Self::Empty) => a,
            (a, b) if a == b => a,
            (a, b) => Self::Alt(Box::new(a), Box::new(b)),
        }
    }
}

/// Parses an anchored pattern (`^...$`) into a [`Regex`]. Patterns lacking
/// anchors are accepted as-is; callers implementing spec.md §9's unanchored
/// mapping should wrap with `.*` themselves before calling this.
pub(crate) fn parse_anchored(pattern: &str) -> Result<Regex, String> {
    let inner = pattern.strip_prefix('^').unwrap_or(pattern);
    let inner = inner.strip_suffix('$').unwrap_or(inner);
    let hir = Parser::new()
        .parse(inner)
        .map_err(|e| format!("invalid pattern `{pattern}`: {e}"))?;
    Ok(lower(&hir))
}

fn lower(hir: &Hir) -> Regex {
    match hir.kind() {
        HirKind::Empty => Regex::Epsilon,
        HirKind::Literal(Literal(bytes)) => {
            let s = String::from_utf8_lossy(bytes);
            s.chars()
                .map(|c| Regex::Class(vec![(c, c)]))
                .fold(Regex::Epsilon, Regex::concat)
        }
        HirKind::Class(Class::Unicode(class)) => {
            let ranges = class
                .ranges()
                .iter()
                .map(|r| (r.start(), r.end()))
                .collect();
            Regex::class(ranges)
        }
        HirKind::Class(Class::Bytes(class)) => {
            let ranges = class
                .ranges()
                .iter()
                .map(|r| (r.start() as char, r.end() as char))
                .collect();
            Regex::class(ranges)
        }
        HirKind::Look(_) => Regex::Epsilon,
        HirKind::Repetition(Repetition { min, max, sub, .. }) => Regex::Repeat {
            body: Box::new(lower(sub)),
            min: *min,
            max: *max,
        },
        HirKind::Capture(cap) => lower(&cap.sub),
        HirKind::Concat(parts) => parts
            .iter()
            .map(lower)
            .fold(Regex::Epsilon, Regex::concat),
        HirKind::Alternation(parts) => {
            let mut iter = parts.iter().map(lower);
            let first = iter.next().unwrap_or(Regex::Empty);
            iter.fold(first, Regex::alt)
        }
    }
}

/// `true` iff `r` matches the empty string.
fn nullable(r: &Regex) -> bool {
    match r {
        Regex::Empty => false,
        Regex::Epsilon => true,
        Regex::Class(_) => false,
        Regex::Concat(a, b) => nullable(a) && nullable(b),
        Regex::Alt(a, b) => nullable(a) || nullable(b),
        Regex::Repeat { body, min, .. } => *min == 0 || nullable(body),
    }
}

/// The Brzozowski derivative of `r` with respect to `ch`: the language of
/// suffixes remaining after consuming `ch`.
fn derivative(r: &Regex, ch: char) -> Regex {
    match r {
        Regex::Empty | Regex::Epsilon => Regex::Empty,
        Regex::Class(ranges) => {
            if ranges.iter().any(|&(lo, hi)| lo <= ch && ch <= hi) {
                Regex::Epsilon
            } else {
                Regex::Empty
            }
        }
        Regex::Concat(a, b) => {
            let da_b = Regex::concat(derivative(a, ch), (**b).clone());
            if nullable(a) {
                Regex::alt(da_b, derivative(b, ch))
            } else {
                da_b
            }
        }
        Regex::Alt(a, b) => Regex::alt(derivative(a, ch), derivative(b, ch)),
        Regex::Repeat { body, min, max } => {
            let next_min = min.saturating_sub(1);
            let next_max = max.map(|m| m.saturating_sub(1));
            let rest = Regex::Repeat {
                body: body.clone(),
                min: next_min,
                max: next_max,
            };
            Regex::concat(derivative(body, ch), rest)
        }
    }
}

/// Collects every class-boundary character appearing anywhere in `r`, used to
/// build a finite symbolic alphabet sufficient to distinguish all derivatives.
fn alphabet_of(r: &Regex, out: &mut BTreeSet<char>) {
    match r {
        Regex::Empty | Regex::Epsilon => {}
        Regex::Class(ranges) => {
            for &(lo, hi) in ranges {
                out.insert(lo);
                if let Some(next) = char::from_u32(hi as u32 + 1) {
                    out.insert(next);
                }
            }
        }
        Regex::Concat(a, b) | Regex::Alt(a, b) => {
            alphabet_of(a, out);
            alphabet_of(b, out);
        }
        Regex::Repeat { body, .. } => alphabet_of(body, out),
    }
}

/// Builds the finite symbolic alphabet shared by two patterns, falling back
/// to a single representative character when both patterns are class-free.
fn symbolic_alphabet(a: &Regex, b: &Regex) -> Vec<char> {
    let mut set = BTreeSet::new();
    alphabet_of(a, &mut set);
    alphabet_of(b, &mut set);
    if set.is_empty() {
        set.insert('a');
    }
    set.into_iter().collect()
}

/// `true` iff `s` is in `L(r)`, by repeated derivation.
pub(crate) fn matches(r: &Regex, s: &str) -> bool {
    let mut current = r.clone();
    for ch in s.chars() {
        current = derivative(&current, ch);
    }
    nullable(&current)
}

/// `true` iff `L(p1) ⊆ L(p2)`, decided by exploring the product derivative
/// automaton until every reachable state pair has been visited (the
/// languages here are always regular over a finite alphabet, so this
/// terminates).
pub(crate) fn is_subset(p1: &Regex, p2: &Regex) -> bool {
    let alphabet = symbolic_alphabet(p1, p2);
    let mut visited: HashSet<(Regex, Regex)> = HashSet::new();
    let mut stack = vec![(p1.clone(), p2.clone())];
    while let Some((a, b)) = stack.pop() {
        if !visited.insert((a.clone(), b.clone())) {
            continue;
        }
        if nullable(&a) && !nullable(&b) {
            return false;
        }
        for &ch in &alphabet {
            stack.push((derivative(&a, ch), derivative(&b, ch)));
        }
    }
    true
}

/// `true` iff `L(p1) ∩ L(p2) = ∅`.
pub(crate) fn is_empty_intersection(p1: &Regex, p2: &Regex) -> bool {
    let alphabet = symbolic_alphabet(p1, p2);
    let mut visited: HashSet<(Regex, Regex)> = HashSet::new();
    let mut stack = vec![(p1.clone(), p2.clone())];
    while let Some((a, b)) = stack.pop() {
        if is_empty(&a) || is_empty(&b) {
            continue;
        }
        if !visited.insert((a.clone(), b.clone())) {
            continue;
        }
        if nullable(&a) && nullable(&b) {
            return false;
        }
        for &ch in &alphabet {
            stack.push((derivative(&a, ch), derivative(&b, ch)));
        }
    }
    true
}

/// Structural emptiness check (no derivative exploration needed).
fn is_empty(r: &Regex) -> bool {
    match r {
        Regex::Empty => true,
        Regex::Epsilon | Regex::Class(_) => false,
        Regex::Concat(a, b) => is_empty(a) || is_empty(b),
        Regex::Alt(a, b) => is_empty(a) && is_empty(b),
        Regex::Repeat { body, min, .. } => *min > 0 && is_empty(body),
    }
}

/// `true` iff `L(r)` is finite. Infinite iff some reachable `Repeat` node has
/// no upper bound and its body denotes a language other than `∅`/`{ε}`.
pub(crate) fn is_finite(r: &Regex) -> bool {
    match r {
        Regex::Empty | Regex::Epsilon | Regex::Class(_) => true,
        Regex::Concat(a, b) | Regex::Alt(a, b) => is_finite(a) && is_finite(b),
        Regex::Repeat { body, max, .. } => {
            if max.is_none() && !(is_empty(body) || is_only_epsilon(body)) {
                false
            } else {
                is_finite(body)
            }
        }
    }
}

fn is_only_epsilon(r: &Regex) -> bool {
    matches!(r, Regex::Epsilon) || (is_empty(r))
}

/// Emits a textual, JSON-Schema-embeddable `pattern` string for `L(p1) ∩
/// L(p2)`, via the ECMA-262 lookahead idiom `^(?=p1)(?:p2)$`. This is a
/// pragmatic re-serialization shortcut (see DESIGN.md); `is_subset`/
/// `is_empty_intersection` above remain exact regardless of how the result
/// is printed back out.
pub(crate) fn intersect_pattern(p1: &str, p2: &str) -> String {
    let inner1 = strip_anchors(p1);
    let inner2 = strip_anchors(p2);
    let mut out = String::new();
    let _ = write!(out, "^(?=^{inner1}$)(?:{inner2})$");
    out
}

/// Emits a textual `pattern` string for the complement of `p`, via
/// `^(?!p)(?:.*)$`.
pub(crate) fn complement_pattern(p: &str) -> String {
    let inner = strip_anchors(p);
    format!("^(?!{inner})(?:.*)$")
}

fn strip_anchors(p: &str) -> &str {
    let p = p.strip_prefix('^').unwrap_or(p);
    p.strip_suffix('$').unwrap_or(p)
}

/// `true` iff `pattern` denotes the universal language over strings (the
/// canonical "no constraint" pattern, spec.md's default `.*`).
pub(crate) fn is_wildcard(pattern: &str) -> bool {
    matches!(strip_anchors(pattern), "" | ".*")
}
