//! The constrained tool vocabulary the model may call, and its dispatch onto
//! the item service.

use serde::Deserialize;
use serde_json::{json, Value};

use uwork_core::{Axis, CoreError, ItemService, Status};

use crate::error::{ChatError, Result};

/// JSON schemas for the four item tools, in the chat-completions `tools`
/// format.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "type": "function",
            "function": {
                "name": "get_items",
                "description": "List the user's work items. Optionally filter by status.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "status": {
                            "type": "string",
                            "enum": ["planned", "completed", "all"],
                            "description": "Filter by status; omit or use 'all' for everything."
                        }
                    }
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "add_item",
                "description": "Record a new work item, planned or already completed.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "text": {
                            "type": "string",
                            "description": "Description of the work."
                        },
                        "axes": {
                            "type": "array",
                            "items": {
                                "type": "string",
                                "enum": ["existence", "recipient", "purpose", "elegance"]
                            },
                            "description": "The axes of useful work this item moves along. At least one."
                        },
                        "status": {
                            "type": "string",
                            "enum": ["planned", "completed"]
                        }
                    },
                    "required": ["text", "axes", "status"]
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "complete_item",
                "description": "Mark an existing item as completed.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "item_id": { "type": "integer" }
                    },
                    "required": ["item_id"]
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": "delete_item",
                "description": "Delete an item permanently.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "item_id": { "type": "integer" }
                    },
                    "required": ["item_id"]
                }
            }
        }),
    ]
}

#[derive(Deserialize)]
struct GetItemsArgs {
    status: Option<String>,
}

#[derive(Deserialize)]
struct AddItemArgs {
    text: String,
    axes: Vec<String>,
    status: String,
}

#[derive(Deserialize)]
struct ItemIdArgs {
    item_id: i64,
}

fn parse_args<'a, T: Deserialize<'a>>(tool: &str, arguments: &'a str) -> Result<T> {
    serde_json::from_str(arguments).map_err(|source| ChatError::BadToolArgs {
        tool: tool.to_string(),
        source,
    })
}

/// Execute one tool call against the service and return the JSON result to
/// feed back to the model.
///
/// Domain failures the model can correct (missing item, bad status or axis
/// tag, empty fields) come back as `{"error": ...}` tool results instead of
/// aborting the chat request; store-level failures still propagate.
pub fn dispatch(service: &ItemService, name: &str, arguments: &str) -> Result<Value> {
    let result = match name {
        "get_items" => {
            let args: GetItemsArgs = parse_args(name, arguments)?;
            service
                .list(args.status.as_deref())
                .and_then(|items| Ok(serde_json::to_value(items)?))
        }
        "add_item" => {
            let args: AddItemArgs = parse_args(name, arguments)?;
            add_item(service, &args)
        }
        "complete_item" => {
            let args: ItemIdArgs = parse_args(name, arguments)?;
            service
                .complete(args.item_id)
                .and_then(|item| Ok(serde_json::to_value(item)?))
        }
        "delete_item" => {
            let args: ItemIdArgs = parse_args(name, arguments)?;
            service
                .remove(args.item_id)
                .map(|()| json!({ "success": true }))
        }
        other => return Err(ChatError::UnknownTool(other.to_string())),
    };

    match result {
        Ok(value) => Ok(value),
        Err(
            e @ (CoreError::ItemNotFound(_)
            | CoreError::Validation(_)
            | CoreError::InvalidStatus(_)
            | CoreError::InvalidAxis(_)),
        ) => Ok(json!({ "error": e.to_string() })),
        Err(e) => Err(e.into()),
    }
}

fn add_item(service: &ItemService, args: &AddItemArgs) -> uwork_core::Result<Value> {
    let axes = args
        .axes
        .iter()
        .map(|a| a.parse::<Axis>())
        .collect::<uwork_core::Result<Vec<_>>>()?;
    let status: Status = args.status.parse()?;
    let item = service.create(&args.text, &axes, status)?;
    Ok(serde_json::to_value(item)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uwork_core::ItemStore;

    fn service() -> ItemService {
        ItemService::new(ItemStore::open_in_memory().unwrap())
    }

    #[test]
    fn definitions_cover_the_four_tools() {
        let names: Vec<String> = tool_definitions()
            .iter()
            .map(|d| d["function"]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["get_items", "add_item", "complete_item", "delete_item"]);
    }

    #[test]
    fn add_item_then_get_items_round_trip() {
        let svc = service();
        let added = dispatch(
            &svc,
            "add_item",
            r#"{"text":"Wrote a doc","axes":["existence","purpose"],"status":"planned"}"#,
        )
        .unwrap();
        assert!(added["id"].is_i64());
        assert!(added["completed_at"].is_null());
        assert_eq!(added["axes"], json!(["existence", "purpose"]));

        let listed = dispatch(&svc, "get_items", "{}").unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn add_item_with_completed_status_stamps_immediately() {
        let svc = service();
        dispatch(
            &svc,
            "add_item",
            r#"{"text":"Shipped","axes":["elegance"],"status":"completed"}"#,
        )
        .unwrap();

        let completed = dispatch(&svc, "get_items", r#"{"status":"completed"}"#).unwrap();
        let arr = completed.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert!(arr[0]["completed_at"].is_string());
    }

    #[test]
    fn complete_item_transitions_status() {
        let svc = service();
        let added = dispatch(
            &svc,
            "add_item",
            r#"{"text":"todo","axes":["existence"],"status":"planned"}"#,
        )
        .unwrap();
        let id = added["id"].as_i64().unwrap();

        let done = dispatch(&svc, "complete_item", &format!(r#"{{"item_id":{id}}}"#)).unwrap();
        assert_eq!(done["status"], "completed");
        assert!(done["completed_at"].is_string());
    }

    #[test]
    fn missing_item_reports_error_instead_of_failing() {
        let svc = service();
        let result = dispatch(&svc, "complete_item", r#"{"item_id":404}"#).unwrap();
        assert_eq!(result, json!({ "error": "Item not found" }));

        let result = dispatch(&svc, "delete_item", r#"{"item_id":404}"#).unwrap();
        assert_eq!(result, json!({ "error": "Item not found" }));
    }

    #[test]
    fn delete_item_succeeds_and_is_gone() {
        let svc = service();
        let added = dispatch(
            &svc,
            "add_item",
            r#"{"text":"temp","axes":["existence"],"status":"planned"}"#,
        )
        .unwrap();
        let id = added["id"].as_i64().unwrap();

        let deleted = dispatch(&svc, "delete_item", &format!(r#"{{"item_id":{id}}}"#)).unwrap();
        assert_eq!(deleted, json!({ "success": true }));

        let listed = dispatch(&svc, "get_items", "{}").unwrap();
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[test]
    fn bad_axis_tag_reports_error_to_the_model() {
        let svc = service();
        let result = dispatch(
            &svc,
            "add_item",
            r#"{"text":"x","axes":["velocity"],"status":"planned"}"#,
        )
        .unwrap();
        assert!(result["error"].as_str().unwrap().contains("invalid axis"));
    }

    #[test]
    fn unknown_tool_is_an_error() {
        let svc = service();
        assert!(matches!(
            dispatch(&svc, "drop_tables", "{}"),
            Err(ChatError::UnknownTool(_))
        ));
    }

    #[test]
    fn malformed_arguments_are_an_error() {
        let svc = service();
        assert!(matches!(
            dispatch(&svc, "add_item", "not json"),
            Err(ChatError::BadToolArgs { .. })
        ));
    }
}
