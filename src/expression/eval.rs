// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! # Expression interpreter
use std::cmp::Ordering;

use regex::Regex;
use serde_json::{Number, Value};

use crate::context::Context;
use crate::expression::ast::{BinaryOp, Expr, Method, Pattern};
use crate::expression::error::EvaluationError;
use crate::expression::full_match_regex;
use crate::expression::value::{loose_eq, type_name, value_to_string};

impl Expr {
    /// Evaluate the expression against the context.
    pub(crate) fn evaluate(&self, ctx: &Context) -> Result<Value, EvaluationError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::List(items) => items
                .iter()
                .map(|item| item.evaluate(ctx))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Self::Variable(name) => ctx
                .get(name)
                .cloned()
                .ok_or_else(|| EvaluationError::UndefinedVariable(name.clone())),
            Self::Index { target, index } => {
                let target = target.evaluate(ctx)?;
                let index = index.evaluate(ctx)?;
                lookup(&target, &index)
            }
            Self::Member { target, name } => match target.evaluate(ctx)? {
                Value::Object(map) => Ok(map.get(name).cloned().unwrap_or(Value::Null)),
                Value::Null => Err(EvaluationError::NullReference(name.clone())),
                other => Err(mismatch(format!(".{name}"), &other)),
            },
            Self::Call {
                target,
                method,
                args,
            } => {
                let target = target.evaluate(ctx)?;
                let args = args
                    .iter()
                    .map(|arg| arg.evaluate(ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                call(*method, &target, &args)
            }
            Self::Not(operand) => match operand.evaluate(ctx)? {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(mismatch("!", &other)),
            },
            Self::Negate(operand) => match operand.evaluate(ctx)? {
                Value::Number(n) => arithmetic(BinaryOp::Subtract, &Number::from(0i64), &n),
                other => Err(mismatch("-", &other)),
            },
            Self::Binary { op, left, right } => {
                let left = left.evaluate(ctx)?;
                let right = right.evaluate(ctx)?;
                binary(*op, &left, &right)
            }
            Self::Matches { target, pattern } => {
                let value = target.evaluate(ctx)?;
                if value.is_null() {
                    return Ok(Value::Bool(false));
                }
                let text = value_to_string(&value);
                let matched = match pattern {
                    Pattern::Static(regex) => regex.is_match(&text),
                    Pattern::Dynamic(pattern) => {
                        dynamic_regex(&pattern.evaluate(ctx)?)?.is_match(&text)
                    }
                };
                Ok(Value::Bool(matched))
            }
            Self::And(left, right) => {
                if !truthy(&left.evaluate(ctx)?, "&&")? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(truthy(&right.evaluate(ctx)?, "&&")?))
            }
            Self::Or(left, right) => {
                if truthy(&left.evaluate(ctx)?, "||")? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(truthy(&right.evaluate(ctx)?, "||")?))
            }
            Self::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if truthy(&condition.evaluate(ctx)?, "?:")? {
                    then.evaluate(ctx)
                } else {
                    otherwise.evaluate(ctx)
                }
            }
        }
    }
}

fn mismatch<S: Into<String>>(operation: S, value: &Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operation: operation.into(),
        found: type_name(value).into(),
    }
}

fn mismatch2<S: Into<String>>(operation: S, left: &Value, right: &Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operation: operation.into(),
        found: format!("{} and {}", type_name(left), type_name(right)),
    }
}

/// `null` is false, booleans are themselves, anything else is an error.
fn truthy(value: &Value, operation: &str) -> Result<bool, EvaluationError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Ok(false),
        other => Err(mismatch(operation, other)),
    }
}

fn dynamic_regex(pattern: &Value) -> Result<Regex, EvaluationError> {
    let pattern = value_to_string(pattern);
    full_match_regex(&pattern).map_err(|err| EvaluationError::InvalidRegex {
        pattern,
        message: err.to_string(),
    })
}

fn lookup(target: &Value, index: &Value) -> Result<Value, EvaluationError> {
    match (target, index) {
        (Value::Object(map), Value::String(key)) => {
            Ok(map.get(key).cloned().unwrap_or(Value::Null))
        }
        (Value::Object(map), key) => Ok(map
            .get(&value_to_string(key))
            .cloned()
            .unwrap_or(Value::Null)),
        (Value::Array(items), Value::Number(n)) => {
            let index = n
                .as_i64()
                .ok_or_else(|| mismatch("[]", &Value::Number(n.clone())))?;
            usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or(EvaluationError::IndexOutOfBounds {
                    index,
                    length: items.len(),
                })
        }
        (Value::Null, _) => Err(EvaluationError::NullReference("[]".into())),
        (target, index) => Err(mismatch2("[]", target, index)),
    }
}

fn string_arg<'a>(method: Method, args: &'a [Value]) -> Result<&'a str, EvaluationError> {
    match args.first() {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(mismatch(method.name(), other)),
        None => Err(mismatch(method.name(), &Value::Null)),
    }
}

fn index_arg(method: Method, arg: Option<&Value>) -> Result<Option<i64>, EvaluationError> {
    match arg {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| mismatch(method.name(), &Value::Number(n.clone()))),
        Some(other) => Err(mismatch(method.name(), other)),
    }
}

fn contains(target: &Value, needle: &Value, operation: &str) -> Result<bool, EvaluationError> {
    match target {
        Value::Array(items) => Ok(items.iter().any(|item| loose_eq(item, needle))),
        Value::String(s) => Ok(s.contains(&value_to_string(needle))),
        Value::Object(map) => Ok(map.contains_key(&value_to_string(needle))),
        other => Err(mismatch(operation, other)),
    }
}

fn length(method: Method, target: &Value) -> Result<usize, EvaluationError> {
    match target {
        Value::Array(items) => Ok(items.len()),
        Value::String(s) => Ok(s.chars().count()),
        Value::Object(map) => Ok(map.len()),
        other => Err(mismatch(method.name(), other)),
    }
}

fn call(method: Method, target: &Value, args: &[Value]) -> Result<Value, EvaluationError> {
    if target.is_null() {
        return Err(EvaluationError::NullReference(format!("{}()", method.name())));
    }
    match method {
        Method::Size | Method::Length => Ok(Value::from(length(method, target)?)),
        Method::IsEmpty => Ok(Value::Bool(length(method, target)? == 0)),
        Method::Contains => Ok(Value::Bool(contains(
            target,
            args.first().unwrap_or(&Value::Null),
            method.name(),
        )?)),
        Method::ContainsKey => match target {
            Value::Object(map) => Ok(Value::Bool(
                map.contains_key(&value_to_string(args.first().unwrap_or(&Value::Null))),
            )),
            other => Err(mismatch(method.name(), other)),
        },
        Method::Get => lookup(target, args.first().unwrap_or(&Value::Null)),
        Method::Equals => Ok(Value::Bool(loose_eq(
            target,
            args.first().unwrap_or(&Value::Null),
        ))),
        _ => {
            let Value::String(text) = target else {
                return Err(mismatch(method.name(), target));
            };
            string_method(method, text, args)
        }
    }
}

fn string_method(method: Method, text: &str, args: &[Value]) -> Result<Value, EvaluationError> {
    Ok(match method {
        Method::StartsWith => Value::Bool(text.starts_with(string_arg(method, args)?)),
        Method::EndsWith => Value::Bool(text.ends_with(string_arg(method, args)?)),
        Method::EqualsIgnoreCase => Value::Bool(
            args.first()
                .and_then(Value::as_str)
                .is_some_and(|other| other.to_lowercase() == text.to_lowercase()),
        ),
        Method::ToLowerCase => Value::String(text.to_lowercase()),
        Method::ToUpperCase => Value::String(text.to_uppercase()),
        Method::Trim => Value::String(text.trim().to_string()),
        Method::Substring => {
            let chars: Vec<char> = text.chars().collect();
            let begin = index_arg(method, args.first())?.unwrap_or(0);
            let end = index_arg(method, args.get(1))?.unwrap_or(chars.len() as i64);
            let (Ok(b), Ok(e)) = (usize::try_from(begin), usize::try_from(end)) else {
                return Err(EvaluationError::IndexOutOfBounds {
                    index: begin.min(end),
                    length: chars.len(),
                });
            };
            if e > chars.len() || b > e {
                return Err(EvaluationError::IndexOutOfBounds {
                    index: if e > chars.len() { end } else { begin },
                    length: chars.len(),
                });
            }
            Value::String(chars[b..e].iter().collect())
        }
        Method::Split => {
            let regex = dynamic_regex_unanchored(string_arg(method, args)?)?;
            let mut parts: Vec<&str> = regex.split(text).collect();
            // trailing empty strings are dropped
            while parts.last().is_some_and(|p| p.is_empty()) {
                parts.pop();
            }
            Value::Array(parts.into_iter().map(Value::from).collect())
        }
        other => return Err(mismatch(other.name(), &Value::String(text.into()))),
    })
}

fn dynamic_regex_unanchored(pattern: &str) -> Result<Regex, EvaluationError> {
    Regex::new(pattern).map_err(|err| EvaluationError::InvalidRegex {
        pattern: pattern.into(),
        message: err.to_string(),
    })
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, EvaluationError> {
    let ordering = match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => l.cmp(&r),
            _ => l
                .as_f64()
                .zip(r.as_f64())
                .and_then(|(l, r)| l.partial_cmp(&r))
                .ok_or_else(|| mismatch2(op.to_string(), left, right))?,
        },
        (Value::String(l), Value::String(r)) => l.cmp(r),
        _ => return Err(mismatch2(op.to_string(), left, right)),
    };
    Ok(match op {
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::LessEqual => ordering != Ordering::Greater,
        BinaryOp::Greater => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    })
}

fn arithmetic(op: BinaryOp, left: &Number, right: &Number) -> Result<Value, EvaluationError> {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        if matches!(op, BinaryOp::Divide | BinaryOp::Remainder) && r == 0 {
            return Err(EvaluationError::DivisionByZero);
        }
        let result = match op {
            BinaryOp::Add => l.checked_add(r),
            BinaryOp::Subtract => l.checked_sub(r),
            BinaryOp::Multiply => l.checked_mul(r),
            BinaryOp::Divide => l.checked_div(r),
            _ => l.checked_rem(r),
        };
        return result
            .map(Value::from)
            .ok_or_else(|| EvaluationError::Overflow(op.to_string()));
    }
    let (l, r) = (
        left.as_f64().unwrap_or(f64::NAN),
        right.as_f64().unwrap_or(f64::NAN),
    );
    if matches!(op, BinaryOp::Divide | BinaryOp::Remainder) && r == 0.0 {
        return Err(EvaluationError::DivisionByZero);
    }
    let result = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Subtract => l - r,
        BinaryOp::Multiply => l * r,
        BinaryOp::Divide => l / r,
        _ => l % r,
    };
    Number::from_f64(result)
        .map(Value::Number)
        .ok_or_else(|| EvaluationError::Overflow(op.to_string()))
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    match op {
        BinaryOp::Equal => Ok(Value::Bool(loose_eq(left, right))),
        BinaryOp::NotEqual => Ok(Value::Bool(!loose_eq(left, right))),
        BinaryOp::Contains => {
            if left.is_null() {
                Ok(Value::Bool(false))
            } else {
                Ok(Value::Bool(contains(left, right, "contains")?))
            }
        }
        BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
            Ok(Value::Bool(compare(op, left, right)?))
        }
        BinaryOp::Add if left.is_string() || right.is_string() => Ok(Value::String(format!(
            "{}{}",
            value_to_string(left),
            value_to_string(right)
        ))),
        _ => match (left, right) {
            (Value::Number(l), Value::Number(r)) => arithmetic(op, l, r),
            _ => Err(mismatch2(op.to_string(), left, right)),
        },
    }
}
