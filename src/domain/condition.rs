//! Condition expressions: parsing and evaluation.
//!
//! A condition is a single binary comparison, `<operand> <op> <operand>`,
//! parsed once at strategy-validation time into a tagged expression. The
//! grammar is deliberately closed — user text is never executed — and at
//! least one operand must name a column.
//!
//! # Evaluation semantics
//!
//! - A row where either side is undefined evaluates to `false`.
//! - A column named by the expression but absent from the table is an
//!   [`EvaluationError`] for the whole series, not a silent all-false.
//! - Equality compares within an epsilon of 1e-9.

use crate::domain::error::{DefinitionError, EvaluationError};
use crate::domain::series::SeriesTable;
use std::fmt;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gt,
    Lt,
    Eq,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Gt => write!(f, ">"),
            Comparator::Lt => write!(f, "<"),
            Comparator::Eq => write!(f, "=="),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(String),
    Literal(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: Operand,
    pub op: Comparator,
    pub right: Operand,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |op: &Operand| match op {
            Operand::Column(name) => name.clone(),
            Operand::Literal(v) => v.to_string(),
        };
        write!(f, "{} {} {}", side(&self.left), self.op, side(&self.right))
    }
}

impl Condition {
    /// Parse an expression like `SMA_20 > SMA_50` or `RSI_14 < 30`.
    ///
    /// `block_id` tags the resulting error so callers can point at the
    /// offending block.
    pub fn parse(expression: &str, block_id: &str) -> Result<Condition, DefinitionError> {
        let malformed = |reason: &str| DefinitionError::MalformedCondition {
            block_id: block_id.to_string(),
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        // `==` before the single-char operators so `a == b` does not split
        // on a stray `=`; `>`/`<` may appear inside neither operand since
        // column names are word-like.
        let (op, split_on) = if expression.contains("==") {
            (Comparator::Eq, "==")
        } else if expression.contains('>') {
            (Comparator::Gt, ">")
        } else if expression.contains('<') {
            (Comparator::Lt, "<")
        } else {
            return Err(malformed("no comparison operator (>, <, ==)"));
        };

        let mut parts = expression.splitn(2, split_on);
        let left_raw = parts.next().unwrap_or("").trim();
        let right_raw = parts.next().unwrap_or("").trim();

        if left_raw.is_empty() {
            return Err(malformed("missing left operand"));
        }
        if right_raw.is_empty() {
            return Err(malformed("missing right operand"));
        }
        for operand in [left_raw, right_raw] {
            if operand.contains(['>', '<']) || operand.contains("==") {
                return Err(malformed("more than one comparison operator"));
            }
        }

        let left = parse_operand(left_raw);
        let right = parse_operand(right_raw);

        if matches!((&left, &right), (Operand::Literal(_), Operand::Literal(_))) {
            return Err(DefinitionError::LiteralOnlyCondition {
                block_id: block_id.to_string(),
                expression: expression.to_string(),
            });
        }

        Ok(Condition { left, op, right })
    }

    /// Evaluate against a table, producing one boolean per bar.
    pub fn evaluate(
        &self,
        table: &SeriesTable,
        block_id: &str,
    ) -> Result<Vec<bool>, EvaluationError> {
        let resolve = |operand: &Operand| -> Result<Resolved<'_>, EvaluationError> {
            match operand {
                Operand::Literal(v) => Ok(Resolved::Literal(*v)),
                Operand::Column(name) => table
                    .get(name)
                    .map(Resolved::Column)
                    .ok_or_else(|| EvaluationError::UnknownColumn {
                        block_id: block_id.to_string(),
                        column: name.clone(),
                    }),
            }
        };

        let left = resolve(&self.left)?;
        let right = resolve(&self.right)?;

        let result = (0..table.len())
            .map(|i| match (left.at(i), right.at(i)) {
                (Some(l), Some(r)) => match self.op {
                    Comparator::Gt => l > r,
                    Comparator::Lt => l < r,
                    Comparator::Eq => (l - r).abs() < EPSILON,
                },
                // Undefined on either side: no signal for this bar.
                _ => false,
            })
            .collect();

        Ok(result)
    }

    /// Column names this condition reads.
    pub fn columns(&self) -> Vec<&str> {
        let mut cols = Vec::new();
        for operand in [&self.left, &self.right] {
            if let Operand::Column(name) = operand {
                cols.push(name.as_str());
            }
        }
        cols
    }
}

enum Resolved<'a> {
    Column(&'a Vec<Option<f64>>),
    Literal(f64),
}

impl Resolved<'_> {
    fn at(&self, i: usize) -> Option<f64> {
        match self {
            Resolved::Column(col) => col[i],
            Resolved::Literal(v) => Some(*v),
        }
    }
}

fn parse_operand(raw: &str) -> Operand {
    match raw.parse::<f64>() {
        Ok(v) => Operand::Literal(v),
        Err(_) => Operand::Column(raw.to_string()),
    }
}
