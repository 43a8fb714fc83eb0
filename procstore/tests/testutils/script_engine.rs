//! Minimal statement runner standing in for a host query engine
//!
//! Understands just enough of a query language to drive the catalog:
//!
//! ```text
//! [CREATE ...] [UNWIND <list> AS <var>] RETURN <expr> [AS alias], ...
//! ```
//!
//! where `<expr>` is a `$parameter`, a literal, or the unwind variable.
//! A statement starting with CREATE is refused in read mode.

use parking_lot::Mutex;
use procstore::catalog::Mode;
use procstore::types::parse_literal_prefix;
use procstore::{EngineError, EngineRequest, QueryEngine, Row, Value};

/// Engine that records every request it runs
#[derive(Default)]
pub struct ScriptEngine {
    requests: Mutex<Vec<EngineRequest>>,
}

impl ScriptEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<EngineRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<EngineRequest> {
        self.requests.lock().last().cloned()
    }
}

impl QueryEngine for ScriptEngine {
    fn execute(&self, request: &EngineRequest) -> Result<Vec<Row>, EngineError> {
        self.requests.lock().push(request.clone());
        run(request)
    }
}

enum Expr {
    Param(String),
    Var(String),
    Literal(Value),
}

fn rejected(message: impl Into<String>) -> EngineError {
    EngineError::Rejected(message.into())
}

fn keyword<'a>(input: &'a str, word: &str) -> Option<&'a str> {
    let trimmed = input.trim_start();
    let head = trimmed.get(..word.len())?;
    if !head.eq_ignore_ascii_case(word) {
        return None;
    }
    let rest = &trimmed[word.len()..];
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

fn identifier(input: &str) -> Result<(String, &str), EngineError> {
    let trimmed = input.trim_start();
    let end = trimmed
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    if end == 0 {
        return Err(rejected(format!("expected identifier at '{}'", trimmed)));
    }
    Ok((trimmed[..end].to_string(), &trimmed[end..]))
}

/// Parse one expression, returning it with its default column name
fn expression(input: &str) -> Result<(Expr, String, &str), EngineError> {
    let trimmed = input.trim_start();
    if let Some(rest) = trimmed.strip_prefix('$') {
        let (name, rest) = identifier(rest)?;
        return Ok((Expr::Param(name.clone()), name, rest));
    }
    if let Some((value, rest)) = parse_literal_prefix(trimmed) {
        let text = trimmed[..trimmed.len() - rest.len()].trim().to_string();
        return Ok((Expr::Literal(value), text, rest));
    }
    let (name, rest) = identifier(trimmed)?;
    Ok((Expr::Var(name.clone()), name, rest))
}

/// Skip a CREATE clause up to the next UNWIND or RETURN
fn skip_clause(input: &str) -> Option<&str> {
    let upper = input.to_ascii_uppercase();
    ["UNWIND", "RETURN"]
        .iter()
        .filter_map(|word| upper.find(word))
        .min()
        .map(|index| &input[index..])
}

fn evaluate(
    expr: &Expr,
    request: &EngineRequest,
    binding: Option<&(String, Value)>,
) -> Result<Value, EngineError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Param(name) => request
            .parameters
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::Failed(format!("Expected parameter(s): {}", name))),
        Expr::Var(name) => match binding {
            Some((var, value)) if var == name => Ok(value.clone()),
            _ => Err(rejected(format!("Variable `{}` not defined", name))),
        },
    }
}

fn run(request: &EngineRequest) -> Result<Vec<Row>, EngineError> {
    let mut rest = request.statement.as_str();

    if let Some(after) = keyword(rest, "CREATE") {
        if request.mode == Mode::Read {
            return Err(EngineError::WriteInReadOnly);
        }
        match skip_clause(after) {
            Some(next) => rest = next,
            None => return Ok(Vec::new()),
        }
    }

    let mut bindings: Vec<Option<(String, Value)>> = vec![None];
    if let Some(after) = keyword(rest, "UNWIND") {
        let (source, _, after) = expression(after)?;
        let items = match evaluate(&source, request, None)? {
            Value::List(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        let after = keyword(after, "AS").ok_or_else(|| rejected("UNWIND requires AS"))?;
        let (var, after) = identifier(after)?;
        bindings = items.into_iter().map(|item| Some((var.clone(), item))).collect();
        rest = after;
    }

    let mut rest = keyword(rest, "RETURN").ok_or_else(|| rejected("expected RETURN"))?;
    let mut items = Vec::new();
    loop {
        let (expr, default_name, after) = expression(rest)?;
        let (name, after) = match keyword(after, "AS") {
            Some(aliased) => identifier(aliased)?,
            None => (default_name, after),
        };
        items.push((name, expr));

        let after = after.trim_start();
        match after.strip_prefix(',') {
            Some(next) => rest = next,
            None if after.is_empty() => break,
            None => return Err(rejected(format!("unexpected input '{}'", after))),
        }
    }

    bindings
        .iter()
        .map(|binding| {
            let mut row = Row::new();
            for (name, expr) in &items {
                row.add_value(name.clone(), evaluate(expr, request, binding.as_ref())?);
            }
            Ok(row)
        })
        .collect()
}
