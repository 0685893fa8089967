// Copyright © 2019-2020 The Radicle Foundation <hello@radicle.foundation>
// Copyright © 2021 The Radicle Link Contributors
// Copyright © 2024 The Gordian Open Integrity Contributors
//
// This file is part of the Gordian Open Integrity engine, distributed under
// the GPL-3.0-or-later license. For full terms see the included LICENSE file.

//! Commit-message trailer extraction (`spec.md` §4.5, §4.6): every
//! identifier and Layer-1 commit must carry a `Signed-off-by:` trailer.

use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
#[non_exhaustive]
pub enum TrailerError {
    #[error("the trailers paragraph is missing in the given message")]
    MissingParagraph,
    #[error("trailing data after trailers section: '{0}'")]
    Trailing(String),
    #[error(transparent)]
    Parse(#[from] nom::Err<nom::error::Error<String>>),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Trailer<'a> {
    pub token: &'a str,
    pub values: Vec<String>,
}

/// Parse the trailers of the given message: the last paragraph, each line a
/// `token: value` pair.
pub fn parse<'a>(message: &'a str) -> Result<Vec<Trailer<'a>>, TrailerError> {
    let trailers_paragraph = match parser::paragraphs(message.trim_end()).map(|(_, ps)| ps.last().copied()) {
        Ok(None) | Err(_) => return Err(TrailerError::MissingParagraph),
        Ok(Some(p)) => p,
    };

    match parser::trailers(trailers_paragraph) {
        Ok((rest, trailers)) if rest.is_empty() => Ok(trailers),
        Ok((unparseable, _)) => Err(TrailerError::Trailing(unparseable.to_owned())),
        Err(e) => Err(e.to_owned().into()),
    }
}

/// `Signed-off-by: Name <email>` pairs found anywhere in `message`'s
/// trailers paragraph. Malformed messages (no trailers at all) yield an
/// empty vec rather than an error — callers treat "no sign-off" as a plain
/// verification issue, not a parse failure.
pub fn signed_off_by(message: &str) -> Vec<(String, String)> {
    let trailers = match parse(message) {
        Ok(t) => t,
        Err(_) => return Vec::new(),
    };
    trailers
        .into_iter()
        .filter(|t| t.token.eq_ignore_ascii_case("signed-off-by"))
        .filter_map(|t| t.values.into_iter().next())
        .filter_map(|value| split_name_email(&value))
        .collect()
}

/// Render `Signed-off-by: <name> <email>` for appending to a commit message
/// during identifier creation (`spec.md` §4.5).
pub fn render_signed_off_by(name: &str, email: &str) -> String {
    format!("Signed-off-by: {name} <{email}>")
}

fn split_name_email(value: &str) -> Option<(String, String)> {
    let open = value.find('<')?;
    let close = value.find('>')?;
    if close < open {
        return None;
    }
    let name = value[..open].trim().to_string();
    let email = value[open + 1..close].trim().to_string();
    Some((name, email))
}

mod parser {
    use nom::{
        branch::alt,
        bytes::complete::{tag, take_until, take_while1},
        character::complete::{line_ending, not_line_ending, space0, space1},
        combinator::{map, rest},
        multi::many0,
        sequence::{delimited, preceded, separated_pair, terminated},
        IResult,
    };

    use super::Trailer;

    const EMPTY_LINE: &str = "\n\n";

    pub fn paragraphs(s: &str) -> IResult<&str, Vec<&str>> {
        nom::multi::separated_list0(tag(EMPTY_LINE), paragraph)(s)
    }

    pub fn paragraph(s: &str) -> IResult<&str, &str> {
        alt((take_until(EMPTY_LINE), rest))(s)
    }

    pub fn trailers(s: &str) -> IResult<&str, Vec<Trailer<'_>>> {
        many0(trailer)(s)
    }

    fn trailer(s: &str) -> IResult<&str, Trailer<'_>> {
        let (rest, (token, values)) = separated_pair(token, separator, values)(s)?;
        Ok((rest, Trailer { token, values }))
    }

    fn token(s: &str) -> IResult<&str, &str> {
        take_while1(|c: char| c.is_alphanumeric() || c == '-')(s)
    }

    fn separator(s: &str) -> IResult<&str, char> {
        delimited(space0, nom::character::complete::one_of(":"), space0)(s)
    }

    fn values(s: &str) -> IResult<&str, Vec<String>> {
        let (r, inline) = until_eol_or_eof(s)?;
        let (r, mut rest_values) = many0(map(indented_line_contents, str::to_string))(r)?;
        if !inline.is_empty() {
            rest_values.insert(0, inline.to_string());
        }
        Ok((r, rest_values))
    }

    fn until_eol_or_eof(s: &str) -> IResult<&str, &str> {
        alt((until_eol, rest))(s)
    }

    fn indented_line_contents(s: &str) -> IResult<&str, &str> {
        preceded(space1, until_eol_or_eof)(s)
    }

    fn until_eol(s: &str) -> IResult<&str, &str> {
        terminated(not_line_ending, line_ending)(s)
    }
}
