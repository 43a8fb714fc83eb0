// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Literal syntax for parameter defaults
//!
//! Accepts the literal forms of the host query language: `null`, booleans,
//! integers, floats, quoted strings, lists, maps, and the `date(..)`,
//! `datetime(..)` and `point({..})` constructors.
//!
//! Every parser here must consume input or fail; `alt` chains list the more
//! specific forms first.

use crate::storage::{Point, Value};
use crate::types::{TypeCoercion, TypeError, TypeResult, TypeTag};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, one_of, satisfy},
    combinator::{all_consuming, map, map_res, not, opt, peek, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use std::collections::BTreeMap;

/// Parse a complete literal
pub fn parse_literal(input: &str) -> TypeResult<Value> {
    all_consuming(delimited(multispace0, literal_value, multispace0))(input)
        .map(|(_, value)| value)
        .map_err(|e| TypeError::InvalidLiteral {
            literal: input.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a literal at the start of `input`, returning it with the remainder
pub fn parse_literal_prefix(input: &str) -> Option<(Value, &str)> {
    preceded(multispace0, literal_value)(input)
        .ok()
        .map(|(rest, value)| (value, rest))
}

/// Parse a parameter default literal against its declared type
///
/// Bare words are accepted verbatim for `STRING` parameters and as ISO text
/// for temporal parameters, matching how older definitions were written.
pub fn parse_default(literal: &str, target: &TypeTag) -> TypeResult<Value> {
    let trimmed = literal.trim();
    let parsed = match (parse_literal(trimmed), target) {
        (Ok(value @ (Value::String(_) | Value::Null)), TypeTag::String) => value,
        (_, TypeTag::String) => Value::String(trimmed.to_string()),
        (Ok(Value::String(text)), TypeTag::Date | TypeTag::DateTime) => {
            temporal_from_text(&text, target)?
        }
        (Ok(value), _) => value,
        (Err(err), TypeTag::Date | TypeTag::DateTime) => {
            temporal_from_text(trimmed, target).map_err(|_| err)?
        }
        (Err(err), _) => return Err(err),
    };
    TypeCoercion::coerce(parsed, target)
}

fn temporal_from_text(text: &str, target: &TypeTag) -> TypeResult<Value> {
    let result = match target {
        TypeTag::Date => parse_date(text).map(Value::Date),
        _ => parse_datetime(text).map(Value::DateTime),
    };
    result.map_err(|reason| TypeError::InvalidLiteral {
        literal: text.to_string(),
        reason,
    })
}

/// Parse an ISO calendar date (`YYYY-MM-DD`)
pub(crate) fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|e| e.to_string())
}

/// Parse an RFC 3339 datetime; offset-less and date-only forms are taken as UTC
pub(crate) fn parse_datetime(text: &str) -> Result<DateTime<FixedOffset>, String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }
    let utc = FixedOffset::east_opt(0).ok_or("invalid UTC offset")?;
    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| parse_date(text).ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
        .ok_or_else(|| format!("'{}' is not a datetime", text))?;
    utc.from_local_datetime(&naive)
        .single()
        .ok_or_else(|| format!("'{}' is not a valid UTC datetime", text))
}

/// Recognize a literal without producing its value
pub(crate) fn literal_text(input: &str) -> IResult<&str, &str> {
    recognize(literal_value)(input)
}

fn literal_value(input: &str) -> IResult<&str, Value> {
    alt((
        map(string_literal, Value::String),
        number_literal,
        list_literal,
        map_literal,
        constructor_literal,
        value(Value::Null, keyword("null")),
        value(Value::Boolean(true), keyword("true")),
        value(Value::Boolean(false), keyword("false")),
    ))(input)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(word), not(peek(satisfy(is_identifier_char))))
}

/// Parse a plain identifier
pub(crate) fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Parse a backtick-delimited identifier, `` `` `` escaping a backtick
pub(crate) fn backtick_identifier(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('`'), escaped_backtick_content, char('`')),
        |s: &str| s.replace("``", "`"),
    )(input)
}

/// Parse a plain or backtick-delimited name
pub(crate) fn symbolic_name(input: &str) -> IResult<&str, String> {
    alt((backtick_identifier, map(identifier, str::to_string)))(input)
}

fn escaped_backtick_content(input: &str) -> IResult<&str, &str> {
    let mut pos = 0;
    let input_bytes = input.as_bytes();

    while pos < input_bytes.len() {
        if input_bytes[pos] == b'`' {
            if pos + 1 < input_bytes.len() && input_bytes[pos + 1] == b'`' {
                pos += 2;
            } else {
                break;
            }
        } else {
            pos += 1;
        }
    }

    Ok((&input[pos..], &input[0..pos]))
}

fn escaped_string_content(quote_char: char) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| {
        let mut pos = 0;
        let input_bytes = input.as_bytes();

        while pos < input_bytes.len() {
            if input_bytes[pos] == b'\\' && pos + 1 < input_bytes.len() {
                pos += 2;
            } else if input_bytes[pos] == quote_char as u8 {
                break;
            } else {
                pos += 1;
            }
        }

        Ok((&input[pos..], &input[0..pos]))
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('"'), escaped_string_content('"'), char('"')),
            delimited(char('\''), escaped_string_content('\''), char('\'')),
        )),
        unescape,
    )(input)
}

fn number_literal(input: &str) -> IResult<&str, Value> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |text: &str| -> Result<Value, String> {
            if text.contains(|c| matches!(c, '.' | 'e' | 'E')) {
                text.parse::<f64>()
                    .map(Value::Float)
                    .map_err(|e| e.to_string())
            } else {
                text.parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|e| e.to_string())
            }
        },
    )(input)
}

fn list_literal(input: &str) -> IResult<&str, Value> {
    map(
        delimited(
            char('['),
            separated_list0(char(','), delimited(multispace0, literal_value, multispace0)),
            preceded(multispace0, char(']')),
        ),
        Value::List,
    )(input)
}

fn map_key(input: &str) -> IResult<&str, String> {
    alt((string_literal, symbolic_name))(input)
}

fn map_literal(input: &str) -> IResult<&str, Value> {
    map(
        delimited(
            char('{'),
            separated_list0(
                char(','),
                delimited(
                    multispace0,
                    separated_pair(
                        map_key,
                        delimited(multispace0, char(':'), multispace0),
                        literal_value,
                    ),
                    multispace0,
                ),
            ),
            preceded(multispace0, char('}')),
        ),
        |entries| Value::Map(entries.into_iter().collect::<BTreeMap<_, _>>()),
    )(input)
}

fn constructor_literal(input: &str) -> IResult<&str, Value> {
    map_res(
        tuple((
            identifier,
            preceded(multispace0, char('(')),
            delimited(multispace0, opt(literal_value), multispace0),
            char(')'),
        )),
        |(name, _, argument, _)| construct(name, argument),
    )(input)
}

fn construct(name: &str, argument: Option<Value>) -> Result<Value, String> {
    match (name.to_lowercase().as_str(), argument) {
        ("date", None) => Ok(Value::Date(Utc::now().date_naive())),
        ("date", Some(Value::String(text))) => parse_date(&text).map(Value::Date),
        ("datetime" | "localdatetime", None) => Ok(Value::DateTime(Utc::now().into())),
        ("datetime" | "localdatetime", Some(Value::String(text))) => {
            parse_datetime(&text).map(Value::DateTime)
        }
        ("point", Some(Value::Map(fields))) => point_from_map(&fields).map(Value::Point),
        (other, argument) => Err(format!(
            "unsupported constructor {}({})",
            other,
            argument.map(|a| a.type_name()).unwrap_or("")
        )),
    }
}

fn point_from_map(fields: &BTreeMap<String, Value>) -> Result<Point, String> {
    let coordinate = |key: &str| fields.get(key).and_then(Value::as_float);
    if let (Some(longitude), Some(latitude)) = (coordinate("longitude"), coordinate("latitude")) {
        let mut point = Point::geographic(longitude, latitude);
        point.z = coordinate("height");
        return Ok(point);
    }
    match (coordinate("x"), coordinate("y")) {
        (Some(x), Some(y)) => {
            let mut point = Point::cartesian(x, y);
            point.z = coordinate("z");
            Ok(point)
        }
        _ => Err("point requires x/y or longitude/latitude".to_string()),
    }
}
