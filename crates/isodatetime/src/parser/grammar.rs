//! Data-declared ISO 8601 grammar.
//!
//! Every rule is a pattern string in the notation of ISO 8601 itself
//! (`CCYY-MM-DD`, `+XCCYYWwwD`, `hh:mm:ss`). Patterns are tokenized once per
//! use with [`tokenize`]; the same token set drives the dumper, so a pattern
//! accepted here can be written back out by `format_point`.

/// One element of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    /// `+XCCYY`: sign plus `4 + X` year digits.
    ExpandedYear,
    /// `+XCC`: sign plus `2 + X` century digits.
    ExpandedCentury,
    /// `CCYY`
    Year,
    /// `CC`
    Century,
    /// `YY`
    YearOfCentury,
    /// `z`
    YearOfDecade,
    /// `MM`
    Month,
    /// `DD`
    DayOfMonth,
    /// `DDD`
    DayOfYear,
    /// `ww`
    Week,
    /// `D`
    DayOfWeek,
    /// `hh`
    Hour,
    /// `mm`
    Minute,
    /// `ss`
    Second,
    /// `,ii`, `,nn` or `,tt`: fraction of the hour, minute or second.
    Fraction(FractionOf, char),
    /// `+hh:mm`
    ZoneExtended,
    /// `+hhmm`
    ZoneBasic,
    /// `+hh`
    ZoneHours,
    Literal(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FractionOf {
    Hour,
    Minute,
    Second,
}

const WORDS: &[(&str, Token)] = &[
    ("+XCCYY", Token::ExpandedYear),
    ("+XCC", Token::ExpandedCentury),
    ("+hh:mm", Token::ZoneExtended),
    ("+hhmm", Token::ZoneBasic),
    ("+hh", Token::ZoneHours),
    (",ii", Token::Fraction(FractionOf::Hour, ',')),
    (".ii", Token::Fraction(FractionOf::Hour, '.')),
    (",nn", Token::Fraction(FractionOf::Minute, ',')),
    (".nn", Token::Fraction(FractionOf::Minute, '.')),
    (",tt", Token::Fraction(FractionOf::Second, ',')),
    (".tt", Token::Fraction(FractionOf::Second, '.')),
    ("CCYY", Token::Year),
    ("CC", Token::Century),
    ("YY", Token::YearOfCentury),
    ("DDD", Token::DayOfYear),
    ("DD", Token::DayOfMonth),
    ("MM", Token::Month),
    ("ww", Token::Week),
    ("hh", Token::Hour),
    ("mm", Token::Minute),
    ("ss", Token::Second),
    ("z", Token::YearOfDecade),
    ("D", Token::DayOfWeek),
];

/// Splits a pattern into tokens, longest word first. Anything that is not a
/// word is a literal character.
pub(crate) fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = pattern;
    'outer: while let Some(c) = rest.chars().next() {
        for (word, token) in WORDS {
            if let Some(tail) = rest.strip_prefix(word) {
                tokens.push(*token);
                rest = tail;
                continue 'outer;
            }
        }
        tokens.push(Token::Literal(c));
        rest = &rest[c.len_utf8()..];
    }
    tokens
}

// ── Rule tables ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Class {
    Complete,
    Reduced,
    Truncated,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Rule {
    pub pattern: &'static str,
    pub class: Class,
}

const fn rule(pattern: &'static str, class: Class) -> Rule {
    Rule { pattern, class }
}

use Class::{Complete, Reduced, Truncated};

/// Basic-format dates. `+XCC` comes after the truncated rules so that
/// `-0023` reads as truncated `-YYMM` rather than an expanded century.
pub(crate) const BASIC_DATES: &[Rule] = &[
    rule("CCYYMMDD", Complete),
    rule("+XCCYYMMDD", Complete),
    rule("CCYYDDD", Complete),
    rule("+XCCYYDDD", Complete),
    rule("CCYYWwwD", Complete),
    rule("+XCCYYWwwD", Complete),
    rule("CCYY-MM", Reduced),
    rule("+XCCYY-MM", Reduced),
    rule("CCYY", Reduced),
    rule("+XCCYY", Reduced),
    rule("CC", Reduced),
    rule("CCYYWww", Reduced),
    rule("+XCCYYWww", Reduced),
    rule("-YYMM", Truncated),
    rule("YYMMDD", Truncated),
    rule("-YY", Truncated),
    rule("--MMDD", Truncated),
    rule("--MM", Truncated),
    rule("---DD", Truncated),
    rule("YYDDD", Truncated),
    rule("-DDD", Truncated),
    rule("YYWwwD", Truncated),
    rule("YYWww", Truncated),
    rule("-zWwwD", Truncated),
    rule("-zWww", Truncated),
    rule("-WwwD", Truncated),
    rule("-Www", Truncated),
    rule("-W-D", Truncated),
    rule("+XCC", Reduced),
];

pub(crate) const EXTENDED_DATES: &[Rule] = &[
    rule("CCYY-MM-DD", Complete),
    rule("+XCCYY-MM-DD", Complete),
    rule("CCYY-DDD", Complete),
    rule("+XCCYY-DDD", Complete),
    rule("CCYY-Www-D", Complete),
    rule("+XCCYY-Www-D", Complete),
    rule("CCYY-MM", Reduced),
    rule("+XCCYY-MM", Reduced),
    rule("CCYY", Reduced),
    rule("+XCCYY", Reduced),
    rule("CC", Reduced),
    rule("CCYY-Www", Reduced),
    rule("+XCCYY-Www", Reduced),
    rule("-YYMM", Truncated),
    rule("YY-MM-DD", Truncated),
    rule("-YY", Truncated),
    rule("--MM-DD", Truncated),
    rule("--MM", Truncated),
    rule("---DD", Truncated),
    rule("YY-DDD", Truncated),
    rule("-DDD", Truncated),
    rule("YY-Www-D", Truncated),
    rule("YY-Www", Truncated),
    rule("-z-Www-D", Truncated),
    rule("-z-Www", Truncated),
    rule("-Www-D", Truncated),
    rule("-Www", Truncated),
    rule("-W-D", Truncated),
    rule("+XCC", Reduced),
];

pub(crate) const BASIC_TIMES: &[Rule] = &[
    rule("hhmmss", Complete),
    rule("hhmm", Reduced),
    rule("hh", Reduced),
    rule("-mmss", Truncated),
    rule("-mm", Truncated),
    rule("--ss", Truncated),
];

pub(crate) const EXTENDED_TIMES: &[Rule] = &[
    rule("hh:mm:ss", Complete),
    rule("hh:mm", Reduced),
    rule("hh", Reduced),
    rule("-mm:ss", Truncated),
    rule("-mm", Truncated),
    rule("--ss", Truncated),
];

pub(crate) const BASIC_ZONES: &[&str] = &["Z", "+hhmm", "+hh"];
pub(crate) const EXTENDED_ZONES: &[&str] = &["Z", "+hh:mm", "+hh"];

pub(crate) const TIME_DESIGNATOR: char = 'T';

/// Date rules, time rules and zone rules for one format style.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Style {
    pub extended: bool,
    pub dates: &'static [Rule],
    pub times: &'static [Rule],
    pub zones: &'static [&'static str],
}

pub(crate) const BASIC: Style = Style {
    extended: false,
    dates: BASIC_DATES,
    times: BASIC_TIMES,
    zones: BASIC_ZONES,
};

pub(crate) const EXTENDED: Style = Style {
    extended: true,
    dates: EXTENDED_DATES,
    times: EXTENDED_TIMES,
    zones: EXTENDED_ZONES,
};

pub(crate) fn uses_expanded_year(tokens: &[Token]) -> bool {
    tokens
        .iter()
        .any(|t| matches!(t, Token::ExpandedYear | Token::ExpandedCentury))
}

// ── Tests ───────────────────────────────────────────────────────────────────
