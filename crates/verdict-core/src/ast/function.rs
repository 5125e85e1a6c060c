//! Function tags for expression nodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Function tag of a [`Node`](super::Node).
///
/// Built-in functions form a closed set. Any other name is kept as
/// `Custom` so that it survives a serialization round trip; evaluating it
/// fails unless an evaluator was registered for that exact tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Function {
    /// Constant leaf (no function)
    #[default]
    Undefined,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Comparison
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Equal,
    NotEqual,

    // Logic
    And,
    Or,
    Not,

    // Collections and strings
    List,
    IsInList,
    IsNotInList,
    StringContains,
    StringNotContains,
    StringStartsWith,
    StringEndsWith,
    IsEmpty,
    IsNotEmpty,
    StringConcat,

    // Data access
    Payload,
    DatabaseAccess,
    Aggregator,
    Filter,
    CustomListAccess,

    // Time
    TimeNow,
    TimeAdd,
    TimestampExtract,

    /// Function registered outside the built-in catalog
    Custom(String),
}

impl Function {
    /// All built-in functions
    pub const BUILTINS: &'static [Function] = &[
        Function::Add,
        Function::Subtract,
        Function::Multiply,
        Function::Divide,
        Function::Greater,
        Function::GreaterOrEqual,
        Function::Less,
        Function::LessOrEqual,
        Function::Equal,
        Function::NotEqual,
        Function::And,
        Function::Or,
        Function::Not,
        Function::List,
        Function::IsInList,
        Function::IsNotInList,
        Function::StringContains,
        Function::StringNotContains,
        Function::StringStartsWith,
        Function::StringEndsWith,
        Function::IsEmpty,
        Function::IsNotEmpty,
        Function::StringConcat,
        Function::Payload,
        Function::DatabaseAccess,
        Function::Aggregator,
        Function::Filter,
        Function::CustomListAccess,
        Function::TimeNow,
        Function::TimeAdd,
        Function::TimestampExtract,
    ];

    /// External name of the function
    pub fn name(&self) -> &str {
        match self {
            Function::Undefined => "",
            Function::Add => "+",
            Function::Subtract => "-",
            Function::Multiply => "*",
            Function::Divide => "/",
            Function::Greater => ">",
            Function::GreaterOrEqual => ">=",
            Function::Less => "<",
            Function::LessOrEqual => "<=",
            Function::Equal => "=",
            Function::NotEqual => "!=",
            Function::And => "And",
            Function::Or => "Or",
            Function::Not => "Not",
            Function::List => "List",
            Function::IsInList => "IsInList",
            Function::IsNotInList => "IsNotInList",
            Function::StringContains => "StringContains",
            Function::StringNotContains => "StringNotContains",
            Function::StringStartsWith => "StringStartsWith",
            Function::StringEndsWith => "StringEndsWith",
            Function::IsEmpty => "IsEmpty",
            Function::IsNotEmpty => "IsNotEmpty",
            Function::StringConcat => "StringConcat",
            Function::Payload => "Payload",
            Function::DatabaseAccess => "DatabaseAccess",
            Function::Aggregator => "Aggregator",
            Function::Filter => "Filter",
            Function::CustomListAccess => "CustomListAccess",
            Function::TimeNow => "TimeNow",
            Function::TimeAdd => "TimeAdd",
            Function::TimestampExtract => "TimestampExtract",
            Function::Custom(name) => name,
        }
    }

    /// Look up a function by its external name
    pub fn from_name(name: &str) -> Function {
        if name.is_empty() {
            return Function::Undefined;
        }
        Self::BUILTINS
            .iter()
            .find(|f| f.name() == name)
            .cloned()
            .unwrap_or_else(|| Function::Custom(name.to_string()))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Function::Undefined)
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Function::Undefined | Function::Custom(_))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Function {
    fn from(name: String) -> Self {
        Function::from_name(&name)
    }
}

impl From<Function> for String {
    fn from(function: Function) -> Self {
        function.name().to_string()
    }
}
