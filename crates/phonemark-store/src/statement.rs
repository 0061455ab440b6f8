use crate::error::Result;
use phonemark_core::{DbType, UpdateRequest};

/// How phone variants are materialized into the WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Variants are embedded as quoted literals; only the update value is bound.
    InlineLiteral,
    /// Every variant is bound as a positional parameter.
    Parameterized,
}

impl From<DbType> for Dialect {
    fn from(db_type: DbType) -> Self {
        match db_type {
            DbType::Sqlite => Dialect::InlineLiteral,
            DbType::Mysql | DbType::Mariadb => Dialect::Parameterized,
        }
    }
}

/// One `UPDATE` with its positional parameters, update value first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    pub sql: String,
    pub params: Vec<String>,
    /// Number of `column = variant` comparisons in the WHERE clause.
    pub clause_count: usize,
}

impl Dialect {
    pub fn build(&self, request: &UpdateRequest) -> Result<UpdateStatement> {
        let names = request.validate()?;
        let column = names.phone_column.as_str();

        let mut params = vec![request.update_value.clone()];
        let mut clauses = Vec::new();
        for phone in &request.phones {
            for variant in phone.variants().iter() {
                match self {
                    Dialect::InlineLiteral => {
                        clauses.push(format!("{column} = {}", quote_literal(variant)));
                    }
                    Dialect::Parameterized => {
                        clauses.push(format!("{column} = ?"));
                        params.push(variant.to_string());
                    }
                }
            }
        }

        let sql = format!(
            "UPDATE {} SET {} = ? WHERE {}",
            names.table,
            names.update_column,
            balanced_or(&clauses)
        );
        Ok(UpdateStatement {
            sql,
            params,
            clause_count: clauses.len(),
        })
    }
}

/// Joins `clauses` with `OR` as a balanced tree of parenthesized groups.
///
/// SQLite caps expression depth at 1000; a flat chain of n ORs is n deep,
/// the halved tree about log2(n). Clause order, and with it placeholder
/// order, is unchanged.
fn balanced_or(clauses: &[String]) -> String {
    match clauses {
        [] => String::new(),
        [single] => single.clone(),
        _ => {
            let (left, right) = clauses.split_at(clauses.len() / 2);
            format!("{} OR {}", or_group(left), or_group(right))
        }
    }
}

fn or_group(clauses: &[String]) -> String {
    match clauses {
        [single] => single.clone(),
        _ => format!("({})", balanced_or(clauses)),
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
