// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Invocation adapter
//!
//! Binds caller arguments against a stored signature, runs the stored
//! statement on the host engine and reshapes the rows according to the
//! declared output.

use crate::catalog::{
    CallableKind, Catalog, CatalogError, Definition, FieldSpec, Mode, OutputSpec,
    IMPLICIT_PARAMS,
};
use crate::exec::context::{AccessMode, Arguments, InvocationContext};
use crate::exec::engine::{EngineError, EngineRequest, QueryEngine};
use crate::exec::error::InvocationError;
use crate::exec::result::{CallOutput, Row};
use crate::storage::Value;
use crate::types::{TypeCoercion, TypeTag};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Serves calls against the catalog
pub struct Invoker {
    catalog: Arc<Catalog>,
    engine: Arc<dyn QueryEngine>,
}

impl Invoker {
    pub fn new(catalog: Arc<Catalog>, engine: Arc<dyn QueryEngine>) -> Self {
        Self { catalog, engine }
    }

    /// Invoke a callable by name
    ///
    /// # Returns
    /// * `CallOutput::Rows` for procedures
    /// * `CallOutput::Value` for functions
    pub fn invoke(
        &self,
        name: &str,
        kind: CallableKind,
        arguments: Arguments,
        context: &InvocationContext,
    ) -> Result<CallOutput, InvocationError> {
        let definition = self.catalog.resolve(kind, name).map_err(|e| match e {
            CatalogError::NotReady(state) => InvocationError::NotReady(state),
            _ => InvocationError::UnknownCallable {
                name: name.to_string(),
                kind,
            },
        })?;

        if definition.mode == Mode::Write && context.access_mode == AccessMode::ReadOnly {
            return Err(InvocationError::WriteInReadContext {
                callable: definition.name.clone(),
            });
        }

        let request = EngineRequest {
            statement: definition.statement.clone(),
            parameters: bind(&definition, arguments)?,
            mode: definition.mode,
        };
        let rows = self.engine.execute(&request).map_err(|e| match e {
            EngineError::WriteInReadOnly => InvocationError::WriteInReadContext {
                callable: definition.name.clone(),
            },
            other => InvocationError::Engine(other),
        })?;

        if definition.output.is_inferred() {
            if let Some(first) = rows.first() {
                definition.record_observed(
                    first
                        .iter()
                        .map(|(column, value)| FieldSpec::new(column, TypeTag::of(value)))
                        .collect(),
                );
            }
        }

        match definition.kind {
            CallableKind::Procedure => project_rows(&definition, rows).map(CallOutput::Rows),
            CallableKind::Function => function_value(&definition, rows).map(CallOutput::Value),
        }
    }
}

/// Bind arguments to parameters, applying defaults and coercing
fn bind(
    definition: &Definition,
    arguments: Arguments,
) -> Result<BTreeMap<String, Value>, InvocationError> {
    let inputs = &definition.inputs;
    let mut supplied: Vec<Option<Value>> = vec![None; inputs.len()];

    match arguments {
        Arguments::Positional(values) => {
            if values.len() > inputs.len() {
                return Err(InvocationError::TooManyArguments {
                    callable: definition.name.clone(),
                    expected: inputs.len(),
                    actual: values.len(),
                });
            }
            for (slot, value) in supplied.iter_mut().zip(values) {
                *slot = Some(value);
            }
        }
        Arguments::Named(map)
            if definition.spreads_parameter_map() && !map.contains_key(IMPLICIT_PARAMS) =>
        {
            supplied[0] = Some(Value::Map(map));
        }
        Arguments::Named(map) => {
            for (name, value) in map {
                let position = inputs.iter().position(|p| p.name == name).ok_or_else(|| {
                    InvocationError::UnexpectedArgument {
                        callable: definition.name.clone(),
                        argument: name.clone(),
                    }
                })?;
                supplied[position] = Some(value);
            }
        }
    }

    let mut parameters = BTreeMap::new();
    for (spec, value) in inputs.iter().zip(supplied) {
        let value = value
            .or_else(|| spec.default.as_ref().map(|d| d.value.clone()))
            .ok_or_else(|| InvocationError::MissingArgument {
                callable: definition.name.clone(),
                parameter: spec.name.clone(),
            })?;
        let value = TypeCoercion::coerce(value, &spec.type_tag).map_err(|source| {
            InvocationError::TypeMismatch {
                callable: definition.name.clone(),
                parameter: spec.name.clone(),
                source,
            }
        })?;
        parameters.insert(spec.name.clone(), value);
    }

    if definition.spreads_parameter_map() {
        return Ok(match parameters.remove(IMPLICIT_PARAMS) {
            Some(Value::Map(map)) => map,
            _ => BTreeMap::new(),
        });
    }
    Ok(parameters)
}

fn coerce_output(
    definition: &Definition,
    field: &str,
    value: Value,
    target: &TypeTag,
) -> Result<Value, InvocationError> {
    TypeCoercion::coerce(value, target).map_err(|source| InvocationError::TypeMismatch {
        callable: definition.name.clone(),
        parameter: field.to_string(),
        source,
    })
}

/// Declared columns in declared order; missing columns are `Null`
fn project_rows(definition: &Definition, rows: Vec<Row>) -> Result<Vec<Row>, InvocationError> {
    let OutputSpec::Fields(fields) = &definition.output else {
        return Ok(rows);
    };
    rows.into_iter()
        .map(|mut row| {
            let mut projected = Row::new();
            for field in fields {
                let value = row.take(&field.name).unwrap_or(Value::Null);
                let value = coerce_output(definition, &field.name, value, &field.type_tag)?;
                projected.add_value(field.name.clone(), value);
            }
            Ok(projected)
        })
        .collect()
}

/// The single declared result type, if the output has one
fn result_type(output: &OutputSpec) -> Option<&FieldSpec> {
    match output {
        OutputSpec::Fields(fields) if fields.len() == 1 => fields.first(),
        _ => None,
    }
}

/// Uncoerced value a function produces for one row
fn raw_row_value(definition: &Definition, mut row: Row) -> Value {
    match &definition.output {
        OutputSpec::Inferred => row.into_map(),
        OutputSpec::Scalar(TypeTag::Map) => match row.len() {
            1 if matches!(row.get_value_at_position(0), Some(Value::Map(_))) => row.into_first(),
            _ => row.into_map(),
        },
        OutputSpec::Scalar(_) => row.into_first(),
        OutputSpec::Fields(fields) if fields.len() == 1 => match row.take(&fields[0].name) {
            Some(value) => value,
            None => row.into_first(),
        },
        OutputSpec::Fields(fields) => Value::Map(
            fields
                .iter()
                .map(|f| (f.name.clone(), row.take(&f.name).unwrap_or(Value::Null)))
                .collect(),
        ),
    }
}

fn row_value(definition: &Definition, row: Row) -> Result<Value, InvocationError> {
    let value = raw_row_value(definition, row);
    match &definition.output {
        OutputSpec::Inferred => Ok(value),
        OutputSpec::Scalar(tag) => coerce_output(definition, &definition.name, value, tag),
        OutputSpec::Fields(fields) if fields.len() == 1 => {
            coerce_output(definition, &fields[0].name, value, &fields[0].type_tag)
        }
        OutputSpec::Fields(fields) => {
            let Value::Map(mut map) = value else {
                return Ok(value);
            };
            for field in fields {
                let entry = map.remove(&field.name).unwrap_or(Value::Null);
                let coerced = coerce_output(definition, &field.name, entry, &field.type_tag)?;
                map.insert(field.name.clone(), coerced);
            }
            Ok(Value::Map(map))
        }
    }
}

/// Reshape rows into a function result
///
/// Rows are aggregated into a list only when `forceSingle` is off and the
/// declared result can hold several values: an inferred output, `ANY`, or a
/// `LIST`. Every other result type yields the first row's value (`Null`
/// without rows), so a `:: INTEGER` function returns one integer even with
/// `forceSingle` off. With `forceSingle` on, a `LIST` result must come from
/// the first row alone and a scalar first row is a `TypeMismatch`.
fn function_value(definition: &Definition, rows: Vec<Row>) -> Result<Value, InvocationError> {
    let declared = match &definition.output {
        OutputSpec::Inferred => None,
        OutputSpec::Scalar(tag) => Some((definition.name.as_str(), tag)),
        OutputSpec::Fields(_) => {
            result_type(&definition.output).map(|f| (f.name.as_str(), &f.type_tag))
        }
    };
    let multi_valued = match (&definition.output, declared) {
        (OutputSpec::Inferred, _) => true,
        (_, Some((_, tag))) => tag.is_multi_valued(),
        (_, None) => false,
    };

    if definition.force_single || !multi_valued {
        return match rows.into_iter().next() {
            Some(row) => row_value(definition, row),
            None => Ok(Value::Null),
        };
    }

    let values = Value::List(
        rows.into_iter()
            .map(|row| raw_row_value(definition, row))
            .collect(),
    );
    match declared {
        Some((field, tag)) => coerce_output(definition, field, values, tag),
        None => Ok(values),
    }
}
