//! Expression AST nodes
//!
//! A [`Node`] is pure data: a function tag with positional and named
//! children, or a constant leaf. Evaluation lives in the runtime's
//! evaluator registry, never on the node itself.

use super::function::Function;
use crate::error::{CoreError, Result};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Expression tree node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Function tag, `Undefined` on constant leaves
    #[serde(rename = "name", default, skip_serializing_if = "Function::is_undefined")]
    pub function: Function,

    /// Literal carried by a constant leaf (`None` reads as null)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<Value>,

    /// Positional arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    /// Keyword arguments
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub named_children: BTreeMap<String, Node>,
}

impl Node {
    /// Create a constant leaf
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        Node {
            constant: if value.is_null() { None } else { Some(value) },
            ..Default::default()
        }
    }

    /// Create a function node without children
    pub fn function(function: Function) -> Self {
        Node {
            function,
            ..Default::default()
        }
    }

    /// Add a positional child
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Add several positional children
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Add a named child
    pub fn with_named_child(mut self, name: impl Into<String>, child: Node) -> Self {
        self.named_children.insert(name.into(), child);
        self
    }

    /// Create a two-argument function node (e.g. `>`, `+`)
    pub fn binary(function: Function, left: Node, right: Node) -> Self {
        Node::function(function).with_child(left).with_child(right)
    }

    /// Create a payload read of `field`
    pub fn payload(field: impl Into<String>) -> Self {
        Node::function(Function::Payload).with_child(Node::constant(Value::String(field.into())))
    }

    pub fn is_constant(&self) -> bool {
        self.function.is_undefined()
    }

    /// Value of a constant leaf
    pub fn constant_value(&self) -> Value {
        self.constant.clone().unwrap_or(Value::Null)
    }

    /// Check that this node is either a constant leaf or a function node.
    ///
    /// Only the node itself is checked; see [`Node::validate`] for the whole tree.
    pub fn check_shape(&self) -> Result<()> {
        if self.function.is_undefined() {
            if !self.children.is_empty() || !self.named_children.is_empty() {
                return Err(CoreError::MalformedNode(
                    "constant node cannot have children".to_string(),
                ));
            }
        } else if self.constant.is_some() {
            return Err(CoreError::MalformedNode(format!(
                "function node '{}' cannot carry a constant",
                self.function
            )));
        }
        Ok(())
    }

    /// Check the shape of every node in the tree
    pub fn validate(&self) -> Result<()> {
        self.check_shape()?;
        for child in &self.children {
            child.validate()?;
        }
        for child in self.named_children.values() {
            child.validate()?;
        }
        Ok(())
    }

    pub fn child(&self, index: usize) -> Result<&Node> {
        self.children.get(index).ok_or(CoreError::MissingChild(index))
    }

    pub fn named_child(&self, name: &str) -> Option<&Node> {
        self.named_children.get(name)
    }

    pub fn required_named_child(&self, name: &str) -> Result<&Node> {
        self.named_child(name)
            .ok_or_else(|| CoreError::MissingNamedChild(name.to_string()))
    }

    /// Read a positional child that must be a constant string
    pub fn read_constant_child_string(&self, index: usize) -> Result<&str> {
        let child = self.child(index)?;
        constant_of(child)
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::WrongConstantType {
                name: index.to_string(),
                expected: "string",
            })
    }

    /// Read a named child that must be a constant string
    pub fn read_constant_named_child_string(&self, name: &str) -> Result<&str> {
        let child = self.required_named_child(name)?;
        constant_of(child)
            .and_then(Value::as_str)
            .ok_or_else(|| wrong_type(name, "string"))
    }

    /// Read an optional named child that must be a constant string when present
    pub fn read_optional_constant_named_child_string(&self, name: &str) -> Result<Option<&str>> {
        match self.named_child(name) {
            None => Ok(None),
            Some(child) => constant_of(child)
                .and_then(Value::as_str)
                .map(Some)
                .ok_or_else(|| wrong_type(name, "string")),
        }
    }

    /// Read a named child that must be a constant array of strings.
    ///
    /// A missing child reads as an empty slice.
    pub fn read_constant_named_child_string_slice(&self, name: &str) -> Result<Vec<&str>> {
        let child = match self.named_child(name) {
            Some(child) => child,
            None => return Ok(Vec::new()),
        };
        let items = constant_of(child)
            .and_then(Value::as_array)
            .ok_or_else(|| wrong_type(name, "string array"))?;
        items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| wrong_type(name, "string array")))
            .collect()
    }

    /// Read an optional named constant boolean
    pub fn read_constant_named_child_bool_or(&self, name: &str, default: bool) -> Result<bool> {
        match self.named_child(name) {
            None => Ok(default),
            Some(child) => constant_of(child)
                .and_then(Value::as_bool)
                .ok_or_else(|| wrong_type(name, "bool")),
        }
    }
}

fn constant_of(node: &Node) -> Option<&Value> {
    if node.is_constant() {
        node.constant.as_ref()
    } else {
        None
    }
}

fn wrong_type(name: &str, expected: &'static str) -> CoreError {
    CoreError::WrongConstantType {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_access() -> Node {
        Node::function(Function::DatabaseAccess)
            .with_named_child("tableName", Node::constant("transactions"))
            .with_named_child("fieldName", Node::constant("country"))
            .with_named_child(
                "path",
                Node::constant(Value::Array(vec![Value::from("account"), Value::from("company")])),
            )
    }

    #[test]
    fn test_read_named_string() {
        let node = db_access();
        assert_eq!(node.read_constant_named_child_string("tableName").unwrap(), "transactions");
    }

    #[test]
    fn test_read_named_string_missing() {
        let node = db_access();
        assert_eq!(
            node.read_constant_named_child_string("label").unwrap_err(),
            CoreError::MissingNamedChild("label".to_string())
        );
    }

    #[test]
    fn test_read_named_string_wrong_shape() {
        let node = Node::function(Function::Aggregator)
            .with_named_child("tableName", Node::constant(42));
        assert!(matches!(
            node.read_constant_named_child_string("tableName"),
            Err(CoreError::WrongConstantType { expected: "string", .. })
        ));

        let node = Node::function(Function::Aggregator)
            .with_named_child("tableName", Node::payload("table"));
        assert!(node.read_constant_named_child_string("tableName").is_err());
    }

    #[test]
    fn test_read_string_slice() {
        let node = db_access();
        assert_eq!(
            node.read_constant_named_child_string_slice("path").unwrap(),
            vec!["account", "company"]
        );
        assert!(node
            .read_constant_named_child_string_slice("missing")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_read_string_slice_wrong_item() {
        let node = Node::function(Function::DatabaseAccess).with_named_child(
            "path",
            Node::constant(Value::Array(vec![Value::from("account"), Value::Number(1.0)])),
        );
        assert!(node.read_constant_named_child_string_slice("path").is_err());
    }

    #[test]
    fn test_read_bool_or_default() {
        let node = Node::payload("amount").with_named_child("nullable", Node::constant(true));
        assert!(node.read_constant_named_child_bool_or("nullable", false).unwrap());
        assert!(!Node::payload("amount")
            .read_constant_named_child_bool_or("nullable", false)
            .unwrap());
    }

    #[test]
    fn test_read_constant_child_string() {
        let node = Node::payload("amount");
        assert_eq!(node.read_constant_child_string(0).unwrap(), "amount");
        assert_eq!(node.read_constant_child_string(1).unwrap_err(), CoreError::MissingChild(1));
    }

    #[test]
    fn test_null_constant_is_normalized() {
        let node = Node::constant(Value::Null);
        assert!(node.constant.is_none());
        assert_eq!(node.constant_value(), Value::Null);
    }

    #[test]
    fn test_shape_checks() {
        assert!(Node::constant(1).check_shape().is_ok());
        assert!(Node::function(Function::TimeNow).check_shape().is_ok());

        let constant_with_children = Node {
            constant: Some(Value::Number(1.0)),
            children: vec![Node::constant(2)],
            ..Default::default()
        };
        assert!(constant_with_children.check_shape().is_err());

        let function_with_constant = Node {
            function: Function::Add,
            constant: Some(Value::Number(1.0)),
            ..Default::default()
        };
        assert!(function_with_constant.check_shape().is_err());
    }

    #[test]
    fn test_validate_walks_tree() {
        let bad_leaf = Node {
            function: Function::Payload,
            constant: Some(Value::from("x")),
            ..Default::default()
        };
        let tree = Node::binary(Function::Greater, bad_leaf, Node::constant(1));
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_node_serde_round_trip() {
        let tree = Node::binary(Function::Greater, Node::payload("amount"), Node::constant(1000))
            .with_named_child("unused", Node::constant(Value::Null));

        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.contains("\"name\":\">\""));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, back);
    }

    #[test]
    fn test_node_deserializes_unknown_function() {
        let node: Node = serde_json::from_str(r#"{"name": "Levenshtein", "children": []}"#).unwrap();
        assert_eq!(node.function, Function::Custom("Levenshtein".to_string()));
    }
}
