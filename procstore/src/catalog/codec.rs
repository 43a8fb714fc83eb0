// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Persistence codec for the catalog blob
//!
//! The blob is a JSON object with two sections, `procedures` and
//! `functions`, each mapping a callable name to its record. Decoding is
//! best-effort: a field of the wrong shape degrades to absent and marks the
//! record [`DecodeOutcome::Partial`]; only a blob that is not a JSON object
//! fails as a whole.

use super::definition::{CallableKind, CatalogSnapshot, Definition, OutputSpec};
use super::signature::{
    parse_signature, DefinitionRequest, InputDeclaration, OutputDeclaration, ParsedSignature,
};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Whole-blob codec failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Catalog blob is not valid JSON: {0}")]
    Malformed(String),

    #[error("Catalog blob is not a JSON object")]
    NotAnObject,

    #[error("Failed to encode catalog blob: {0}")]
    Encode(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodedRecord<'a> {
    statement: &'a str,
    mode: &'static str,
    force_single: bool,
    signature: String,
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inputs: Option<Vec<EncodedInput<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outputs: Option<EncodedOutput<'a>>,
}

#[derive(Serialize)]
struct EncodedInput<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    type_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EncodedOutput<'a> {
    Scalar(String),
    Fields(Vec<EncodedField<'a>>),
}

#[derive(Serialize)]
struct EncodedField<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    type_token: String,
}

#[derive(Serialize)]
struct EncodedBlob<'a> {
    procedures: BTreeMap<&'a str, EncodedRecord<'a>>,
    functions: BTreeMap<&'a str, EncodedRecord<'a>>,
}

fn encode_record<'a>(definition: &'a Definition, namespace: &str) -> EncodedRecord<'a> {
    let implicit_inputs = definition.spreads_parameter_map();
    let inputs = (!implicit_inputs).then(|| {
        definition
            .inputs
            .iter()
            .map(|p| EncodedInput {
                name: &p.name,
                type_token: p.type_tag.to_string(),
                default: p.default.as_ref().map(|d| d.literal.as_str()),
            })
            .collect()
    });
    let outputs = match &definition.output {
        OutputSpec::Inferred => None,
        OutputSpec::Scalar(tag) => Some(EncodedOutput::Scalar(tag.to_string())),
        OutputSpec::Fields(fields) => Some(EncodedOutput::Fields(
            fields
                .iter()
                .map(|f| EncodedField {
                    name: &f.name,
                    type_token: f.type_tag.to_string(),
                })
                .collect(),
        )),
    };

    EncodedRecord {
        statement: &definition.statement,
        mode: definition.mode.as_token(),
        force_single: definition.force_single,
        signature: definition.signature(namespace),
        description: definition.description.as_deref(),
        inputs,
        outputs,
    }
}

fn encode_section<'a>(
    definitions: impl Iterator<Item = &'a Arc<Definition>>,
    namespace: &str,
) -> BTreeMap<&'a str, EncodedRecord<'a>> {
    definitions
        .map(|d| (d.name.as_str(), encode_record(d, namespace)))
        .collect()
}

/// Encode a full snapshot into blob bytes
pub fn encode(snapshot: &CatalogSnapshot, namespace: &str) -> Result<Vec<u8>, CodecError> {
    let blob = EncodedBlob {
        procedures: encode_section(snapshot.procedures(), namespace),
        functions: encode_section(snapshot.functions(), namespace),
    };
    serde_json::to_vec(&blob).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Fields extracted from one persisted record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFields {
    pub statement: Option<String>,
    pub mode: Option<String>,
    pub force_single: Option<bool>,
    pub description: Option<String>,
    pub inputs: Option<Vec<InputDeclaration>>,
    pub outputs: Option<OutputDeclaration>,
    /// Inputs and outputs recovered from the display signature
    pub signature: Option<ParsedSignature>,
}

impl RecordFields {
    /// Build the definition request this record describes
    ///
    /// Structured `inputs`/`outputs` win over the display signature; a
    /// missing mode means read and a missing `forceSingle` means false.
    pub fn to_request(&self, name: &str) -> DefinitionRequest {
        let mut request = DefinitionRequest::new(name, self.statement.clone().unwrap_or_default());
        if let Some(mode) = &self.mode {
            request.mode = mode.clone();
        }
        request.force_single = self.force_single.unwrap_or(false);
        request.description = self.description.clone();
        request.inputs = self
            .inputs
            .clone()
            .or_else(|| self.signature.as_ref().and_then(ParsedSignature::declared_inputs));
        request.outputs = self
            .outputs
            .clone()
            .or_else(|| self.signature.as_ref().and_then(|s| s.outputs.clone()));
        request
    }
}

/// How completely a record decoded
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    Ok(RecordFields),
    /// Some fields were present but unusable and degraded to absent
    Partial {
        fields: RecordFields,
        gaps: Vec<String>,
    },
}

impl DecodeOutcome {
    pub fn fields(&self) -> &RecordFields {
        match self {
            DecodeOutcome::Ok(fields) | DecodeOutcome::Partial { fields, .. } => fields,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, DecodeOutcome::Partial { .. })
    }

    pub fn gaps(&self) -> &[String] {
        match self {
            DecodeOutcome::Ok(_) => &[],
            DecodeOutcome::Partial { gaps, .. } => gaps,
        }
    }
}

/// One record read back from the blob
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub kind: CallableKind,
    pub name: String,
    pub raw: JsonValue,
    pub outcome: DecodeOutcome,
}

/// Decode blob bytes into records, procedures first
pub fn decode(bytes: &[u8]) -> Result<Vec<DecodedRecord>, CodecError> {
    let root: JsonValue =
        serde_json::from_slice(bytes).map_err(|e| CodecError::Malformed(e.to_string()))?;
    let root = root.as_object().ok_or(CodecError::NotAnObject)?;

    let mut records = Vec::new();
    for (section, kind) in [
        ("procedures", CallableKind::Procedure),
        ("functions", CallableKind::Function),
    ] {
        match root.get(section) {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Object(entries)) => {
                records.extend(entries.iter().map(|(name, raw)| DecodedRecord {
                    kind,
                    name: name.clone(),
                    raw: raw.clone(),
                    outcome: decode_record(raw),
                }));
            }
            Some(other) => {
                log::warn!(
                    "Ignoring catalog section '{}': expected an object, found {}",
                    section,
                    json_kind(other)
                );
            }
        }
    }
    Ok(records)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

struct FieldReader<'a> {
    record: &'a Map<String, JsonValue>,
    gaps: Vec<String>,
}

impl<'a> FieldReader<'a> {
    /// Read an optional field; a present value that `extract` rejects is a gap
    fn read<T>(&mut self, key: &str, extract: impl FnOnce(&JsonValue) -> Option<T>) -> Option<T> {
        match self.record.get(key) {
            None | Some(JsonValue::Null) => None,
            Some(value) => {
                let extracted = extract(value);
                if extracted.is_none() {
                    log::warn!(
                        "Degrading field '{}': unexpected {} value",
                        key,
                        json_kind(value)
                    );
                    self.gaps.push(key.to_string());
                }
                extracted
            }
        }
    }
}

fn as_text(value: &JsonValue) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn literal_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(_) | JsonValue::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

fn decode_inputs(value: &JsonValue) -> Option<Vec<InputDeclaration>> {
    value
        .as_array()?
        .iter()
        .map(|item| {
            let item = item.as_object()?;
            let mut input = InputDeclaration::new(
                item.get("name").and_then(JsonValue::as_str)?,
                item.get("type").and_then(JsonValue::as_str)?,
            );
            input.default = match item.get("default") {
                None | Some(JsonValue::Null) => None,
                Some(default) => Some(literal_text(default)?),
            };
            Some(input)
        })
        .collect()
}

fn decode_outputs(value: &JsonValue) -> Option<OutputDeclaration> {
    match value {
        JsonValue::String(token) => Some(OutputDeclaration::Scalar(token.clone())),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| {
                let item = item.as_object()?;
                Some((
                    item.get("name").and_then(JsonValue::as_str)?.to_string(),
                    item.get("type").and_then(JsonValue::as_str)?.to_string(),
                ))
            })
            .collect::<Option<Vec<_>>>()
            .map(OutputDeclaration::Fields),
        _ => None,
    }
}

fn decode_record(raw: &JsonValue) -> DecodeOutcome {
    let Some(record) = raw.as_object() else {
        log::warn!("Catalog record is a {}, not an object", json_kind(raw));
        return DecodeOutcome::Partial {
            fields: RecordFields::default(),
            gaps: vec!["record".to_string()],
        };
    };

    let mut reader = FieldReader {
        record,
        gaps: Vec::new(),
    };
    let fields = RecordFields {
        statement: reader.read("statement", as_text),
        mode: reader.read("mode", as_text),
        force_single: reader.read("forceSingle", JsonValue::as_bool),
        description: reader.read("description", as_text),
        inputs: reader.read("inputs", decode_inputs),
        outputs: reader.read("outputs", decode_outputs),
        signature: reader.read("signature", |v| {
            let text = v.as_str()?;
            parse_signature(text)
                .map_err(|e| log::debug!("{}", e))
                .ok()
        }),
    };

    if reader.gaps.is_empty() {
        DecodeOutcome::Ok(fields)
    } else {
        DecodeOutcome::Partial {
            fields,
            gaps: reader.gaps,
        }
    }
}
