//! Value-level operator semantics
//!
//! Pure functions over already-evaluated values. Evaluators call into these
//! so that numeric, string and time semantics are implemented exactly once.

pub(crate) mod arithmetic;
pub(crate) mod comparison;
pub(crate) mod string;
pub(crate) mod time;

pub(crate) use arithmetic::{execute_arithmetic, ArithmeticOp};
pub(crate) use comparison::{execute_compare, order_values, values_equal, CompareOp};
pub(crate) use string::{concat, execute_string_op, list_contains, StringOp};
pub use time::{parse_timestamp, RelativeDuration, TimeUnit, TimestampPart};
pub(crate) use time::{timestamp_to_value, value_to_timestamp};
