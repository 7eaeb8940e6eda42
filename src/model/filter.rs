//! Filter compilation
//!
//! A filter is a value object whose populated fields restrict a list
//! query server-side. Each filter type declares its fields as an
//! explicit ordered table; compilation skips unset fields, converts the
//! declared snake_case name to the wire's camelCase, and wraps the key
//! as `filter[<camelCaseName>]`.

use std::collections::HashSet;

use convert_case::{Case, Casing};

use crate::model::enums::{ApiEnum, Fallback};

/// A rendered filter value: a single scalar or a comma-joined list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Scalar(String),
    List(Vec<String>),
}

impl QueryValue {
    pub fn scalar(value: impl ToString) -> Self {
        QueryValue::Scalar(value.to_string())
    }

    /// A recognized enum member, rendered via its wire string.
    pub fn enumerated<E: ApiEnum>(member: E) -> Self {
        QueryValue::Scalar(member.as_str().to_string())
    }

    /// A possibly-unrecognized enum value.
    pub fn fallback<E: ApiEnum>(value: &Fallback<E>) -> Self {
        QueryValue::Scalar(value.value().to_string())
    }

    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        QueryValue::List(values.into_iter().map(|v| v.to_string()).collect())
    }

    /// A list of enum members, each rendered via its wire string.
    pub fn enum_list<E: ApiEnum>(members: &[E]) -> Self {
        QueryValue::List(members.iter().map(|m| m.as_str().to_string()).collect())
    }

    fn render(&self) -> String {
        match self {
            QueryValue::Scalar(value) => value.clone(),
            QueryValue::List(values) => values.join(","),
        }
    }
}

/// A list-operation filter with an explicit ordered field table.
///
/// `entries` returns every declared field in declaration order, set or
/// not; the default `as_query_params` does the compilation. Field names
/// are the internal snake_case forms and must map to distinct wire keys.
pub trait ListFilter {
    fn entries(&self) -> Vec<(&'static str, Option<QueryValue>)>;

    /// Compile the populated fields into `filter[...]` query parameters.
    fn as_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut seen = HashSet::new();
        for (name, value) in self.entries() {
            let Some(value) = value else { continue };
            let key = format!("filter[{}]", name.to_case(Case::Camel));
            debug_assert!(
                seen.insert(key.clone()),
                "filter field {:?} compiles to duplicate key {}",
                name,
                key
            );
            params.push((key, value.render()));
        }
        params
    }
}
