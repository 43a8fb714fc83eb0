// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Signature compiler
//!
//! Turns a raw [`DefinitionRequest`] into a validated [`Definition`]. The
//! statement text is never inspected beyond checking that it is present.

use super::definition::{
    CallableKind, Definition, FieldSpec, Mode, OutputSpec, ParameterSpec, IMPLICIT_PARAMS,
};
use crate::types::literal::{literal_text, symbolic_name};
use crate::types::{parse_default, TypeTag};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, opt, rest},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

static QUALIFIED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("qualified name pattern is valid")
});

/// Signature validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignatureError {
    #[error("Callable name must not be empty")]
    EmptyName,

    #[error("Invalid callable name '{0}': expected dot-separated identifiers")]
    InvalidName(String),

    #[error("Callable '{0}' has no statement")]
    MissingStatement(String),

    #[error("Callable '{name}' has invalid mode '{mode}': expected read or write")]
    BadMode { name: String, mode: String },

    #[error("Invalid default for parameter '{parameter}': '{literal}' ({reason})")]
    BadDefault {
        parameter: String,
        literal: String,
        reason: String,
    },

    #[error("Duplicate parameter '{0}'")]
    DuplicateParameter(String),

    #[error("Duplicate output field '{0}'")]
    DuplicateOutput(String),

    #[error("Procedure '{0}' cannot declare a scalar output")]
    ScalarProcedureOutput(String),

    #[error("Unparseable signature '{signature}': {reason}")]
    UnparseableSignature { signature: String, reason: String },
}

/// Declared output of a definition request
#[derive(Debug, Clone, PartialEq)]
pub enum OutputDeclaration {
    /// A single type token (functions only)
    Scalar(String),
    /// `(name, type token)` columns
    Fields(Vec<(String, String)>),
}

/// Declared input of a definition request
#[derive(Debug, Clone, PartialEq)]
pub struct InputDeclaration {
    pub name: String,
    pub type_token: String,
    pub default: Option<String>,
}

impl InputDeclaration {
    pub fn new(name: impl Into<String>, type_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_token: type_token.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }
}

/// Raw definition request as received from the outer surface
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionRequest {
    pub name: String,
    pub statement: String,
    pub mode: String,
    pub outputs: Option<OutputDeclaration>,
    pub inputs: Option<Vec<InputDeclaration>>,
    pub force_single: bool,
    pub description: Option<String>,
}

impl DefinitionRequest {
    pub fn new(name: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statement: statement.into(),
            mode: Mode::Read.as_token().to_string(),
            outputs: None,
            inputs: None,
            force_single: false,
            description: None,
        }
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn returns(mut self, type_token: impl Into<String>) -> Self {
        self.outputs = Some(OutputDeclaration::Scalar(type_token.into()));
        self
    }

    pub fn output(mut self, name: impl Into<String>, type_token: impl Into<String>) -> Self {
        let field = (name.into(), type_token.into());
        match &mut self.outputs {
            Some(OutputDeclaration::Fields(fields)) => fields.push(field),
            _ => self.outputs = Some(OutputDeclaration::Fields(vec![field])),
        }
        self
    }

    pub fn input(mut self, input: InputDeclaration) -> Self {
        self.inputs.get_or_insert_with(Vec::new).push(input);
        self
    }

    /// Declare that the callable takes no inputs at all
    pub fn no_inputs(mut self) -> Self {
        self.inputs = Some(Vec::new());
        self
    }

    pub fn force_single(mut self, force_single: bool) -> Self {
        self.force_single = force_single;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Compiles definition requests into definitions
#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureCompiler;

impl SignatureCompiler {
    /// Validate a request and build the definition it describes
    ///
    /// Name uniqueness across kinds is checked by the catalog, not here.
    pub fn compile(
        kind: CallableKind,
        request: &DefinitionRequest,
    ) -> Result<Definition, SignatureError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(SignatureError::EmptyName);
        }
        if !QUALIFIED_NAME.is_match(name) {
            return Err(SignatureError::InvalidName(name.to_string()));
        }
        if request.statement.trim().is_empty() {
            return Err(SignatureError::MissingStatement(name.to_string()));
        }

        let mode = if request.mode.trim().is_empty() {
            Mode::Read
        } else {
            Mode::parse(&request.mode).ok_or_else(|| SignatureError::BadMode {
                name: name.to_string(),
                mode: request.mode.clone(),
            })?
        };

        let inputs = match &request.inputs {
            None => vec![ParameterSpec::implicit_map()],
            Some(declared) => Self::compile_inputs(declared)?,
        };
        let output = Self::compile_output(kind, name, request.outputs.as_ref())?;

        let description = request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Definition::new(
            name.to_string(),
            kind,
            request.statement.clone(),
            mode,
            inputs,
            output,
            request.force_single,
            description,
        ))
    }

    fn compile_inputs(declared: &[InputDeclaration]) -> Result<Vec<ParameterSpec>, SignatureError> {
        let mut seen = HashSet::new();
        declared
            .iter()
            .map(|input| {
                if !seen.insert(input.name.as_str()) {
                    return Err(SignatureError::DuplicateParameter(input.name.clone()));
                }
                let type_tag = TypeTag::parse(&input.type_token);
                let spec = ParameterSpec::new(input.name.clone(), type_tag);
                match &input.default {
                    None => Ok(spec),
                    Some(literal) => {
                        let value = parse_default(literal, &spec.type_tag).map_err(|e| {
                            SignatureError::BadDefault {
                                parameter: input.name.clone(),
                                literal: literal.clone(),
                                reason: e.to_string(),
                            }
                        })?;
                        Ok(spec.with_default(literal.trim(), value))
                    }
                }
            })
            .collect()
    }

    fn compile_output(
        kind: CallableKind,
        name: &str,
        declared: Option<&OutputDeclaration>,
    ) -> Result<OutputSpec, SignatureError> {
        match declared {
            None => Ok(OutputSpec::Inferred),
            Some(OutputDeclaration::Scalar(_)) if kind == CallableKind::Procedure => {
                Err(SignatureError::ScalarProcedureOutput(name.to_string()))
            }
            Some(OutputDeclaration::Scalar(token)) => Ok(OutputSpec::Scalar(TypeTag::parse(token))),
            Some(OutputDeclaration::Fields(fields)) if fields.is_empty() => Ok(OutputSpec::Inferred),
            Some(OutputDeclaration::Fields(fields)) => {
                let mut seen = HashSet::new();
                fields
                    .iter()
                    .map(|(field, token)| {
                        if seen.insert(field.as_str()) {
                            Ok(FieldSpec::new(field.clone(), TypeTag::parse(token)))
                        } else {
                            Err(SignatureError::DuplicateOutput(field.clone()))
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(OutputSpec::Fields)
            }
        }
    }
}

/// Inputs and outputs recovered from a display signature
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSignature {
    pub inputs: Vec<InputDeclaration>,
    pub outputs: Option<OutputDeclaration>,
}

impl ParsedSignature {
    /// Inputs as a request would declare them
    ///
    /// A lone `params :: MAP = {}` is how the implicit parameter map renders,
    /// so it maps back to "no inputs declared".
    pub fn declared_inputs(&self) -> Option<Vec<InputDeclaration>> {
        match self.inputs.as_slice() {
            [only]
                if only.name == IMPLICIT_PARAMS
                    && TypeTag::parse(&only.type_token) == TypeTag::Map
                    && only.default.as_deref().map(str::trim) == Some("{}") =>
            {
                None
            }
            _ => Some(self.inputs.clone()),
        }
    }
}

/// Parse a display signature such as
/// `custom.answer(input :: INTEGER = 42) :: (answer :: NUMBER)`
///
/// Defaults may also be written before the type (`input = 42 :: INTEGER?`).
/// A `VOID` result is treated as undeclared.
pub fn parse_signature(text: &str) -> Result<ParsedSignature, SignatureError> {
    all_consuming(signature)(text.trim())
        .map(|(_, parsed)| parsed)
        .map_err(|e| SignatureError::UnparseableSignature {
            signature: text.to_string(),
            reason: e.to_string(),
        })
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    delimited(multispace0, inner, multispace0)
}

fn type_text(input: &str) -> IResult<&str, String> {
    map(take_while1(|c: char| !matches!(c, ',' | ')' | '=')), |t: &str| {
        t.trim().to_string()
    })(input)
}

fn default_text(input: &str) -> IResult<&str, String> {
    map(
        alt((literal_text, take_while1(|c: char| !matches!(c, ',' | ')')))),
        |t: &str| t.trim().to_string(),
    )(input)
}

fn parameter(input: &str) -> IResult<&str, InputDeclaration> {
    map(
        tuple((
            ws(symbolic_name),
            opt(preceded(ws(char('=')), ws(default_text))),
            ws(tag("::")),
            type_text,
            opt(preceded(ws(char('=')), ws(default_text))),
        )),
        |(name, leading, _, type_token, trailing)| InputDeclaration {
            name,
            type_token,
            default: trailing.or(leading),
        },
    )(input)
}

fn field(input: &str) -> IResult<&str, (String, String)> {
    separated_pair(ws(symbolic_name), ws(tag("::")), type_text)(input)
}

fn output(input: &str) -> IResult<&str, Option<OutputDeclaration>> {
    preceded(
        ws(tag("::")),
        alt((
            map(
                delimited(char('('), separated_list0(char(','), field), ws(char(')'))),
                |fields| Some(OutputDeclaration::Fields(fields)),
            ),
            map(rest, |t: &str| {
                let token = t.trim();
                if token.is_empty() || token.eq_ignore_ascii_case("void") {
                    None
                } else {
                    Some(OutputDeclaration::Scalar(token.to_string()))
                }
            }),
        )),
    )(input)
}

fn signature(input: &str) -> IResult<&str, ParsedSignature> {
    map(
        tuple((
            ws(separated_list1(char('.'), symbolic_name)),
            char('('),
            separated_list0(char(','), parameter),
            ws(char(')')),
            opt(output),
        )),
        |(_, _, inputs, _, outputs)| ParsedSignature {
            inputs,
            outputs: outputs.flatten(),
        },
    )(input)
}
