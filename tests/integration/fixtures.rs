//! JSON syntax trees shared by the integration tests

/// `function f(x: integer) -> integer { return x; }`
pub const IDENTITY: &str = r#"{
  "declarations": [
    {
      "kind": "Function",
      "id": 4,
      "name": "f",
      "parameters": [
        { "id": 1, "name": "x", "type_name": { "id": 0, "kind": { "ElementaryTypeName": "integer" } } }
      ],
      "return_type": { "id": 2, "kind": { "ElementaryTypeName": "integer" } },
      "body": {
        "statements": [
          { "kind": "Return", "expression": { "id": 3, "kind": { "Identifier": "x" } } }
        ]
      }
    }
  ]
}"#;

/// `function f() -> bool { return 1; }` with a located return statement
pub const BAD_RETURN: &str = r#"{
  "declarations": [
    {
      "kind": "Function",
      "id": 2,
      "name": "f",
      "parameters": [],
      "return_type": { "id": 0, "kind": { "ElementaryTypeName": "bool" } },
      "body": {
        "statements": [
          {
            "kind": "Return",
            "span": { "start": { "line": 3, "column": 5 }, "end": { "line": 3, "column": 14 } },
            "expression": { "id": 1, "kind": { "Literal": { "Number": "1" } } }
          }
        ]
      }
    }
  ]
}"#;

/// Three statements referencing unknown names
pub const THREE_UNKNOWN: &str = r#"{
  "declarations": [
    {
      "kind": "Function",
      "id": 3,
      "name": "f",
      "parameters": [],
      "body": {
        "statements": [
          { "kind": "Expression", "expression": { "id": 0, "kind": { "Identifier": "a" } } },
          { "kind": "Expression", "expression": { "id": 1, "kind": { "Identifier": "b" } } },
          { "kind": "Expression", "expression": { "id": 2, "kind": { "Identifier": "c" } } }
        ]
      }
    }
  ]
}"#;

/// `id(x) { return x; }` and `main() { id(1); id(true); }`
pub const IDENTITY_USED_TWICE: &str = r#"{
  "declarations": [
    {
      "kind": "Function",
      "id": 2,
      "name": "id",
      "parameters": [ { "id": 0, "name": "x" } ],
      "body": {
        "statements": [
          { "kind": "Return", "expression": { "id": 1, "kind": { "Identifier": "x" } } }
        ]
      }
    },
    {
      "kind": "Function",
      "id": 9,
      "name": "main",
      "parameters": [],
      "body": {
        "statements": [
          {
            "kind": "Expression",
            "expression": {
              "id": 5,
              "kind": {
                "Call": {
                  "callee": { "id": 3, "kind": { "Identifier": "id" } },
                  "arguments": [ { "id": 4, "kind": { "Literal": { "Number": "1" } } } ]
                }
              }
            }
          },
          {
            "kind": "Expression",
            "expression": {
              "id": 8,
              "kind": {
                "Call": {
                  "callee": { "id": 6, "kind": { "Identifier": "id" } },
                  "arguments": [ { "id": 7, "kind": { "Literal": { "Bool": true } } } ]
                }
              }
            }
          }
        ]
      }
    }
  ]
}"#;
