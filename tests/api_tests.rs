//! API handler tests

use api_creator_sdk::api::{ApiResponse, ApiService, ResponseBody};
use api_creator_sdk::auth::AuthState;
use api_creator_sdk::compiler::ProjectCompiler;
use api_creator_sdk::config::CompilerConfig;
use api_creator_sdk::models::ProjectId;
use api_creator_sdk::store::memory::{AttributeRow, ObjectRow, ProjectRow};
use api_creator_sdk::store::{InMemorySchemaStore, SchemaSnapshot};
use api_creator_sdk::FileSystemStorageBackend;
use chrono::Utc;
use serde_json::{Value, json};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;
use zip::ZipArchive;

type Service = ApiService<InMemorySchemaStore, FileSystemStorageBackend>;

fn service_with(store: InMemorySchemaStore, staging: &TempDir) -> Service {
    ApiService::new(ProjectCompiler::on_filesystem(
        Arc::new(store),
        CompilerConfig::default().with_staging_dir(staging.path()),
    ))
}

fn service(staging: &TempDir) -> Service {
    service_with(InMemorySchemaStore::new(), staging)
}

fn body(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

fn json_body(response: &ApiResponse) -> &Value {
    response.json_body().expect("JSON response")
}

fn error_of(response: &ApiResponse) -> &str {
    json_body(response)["error"].as_str().expect("error message")
}

/// Create project "Shop" for user 1 and return its id
async fn create_shop(service: &Service) -> ProjectId {
    let response = service
        .projects("POST", AuthState::user(1), Some(&body(json!({"name": "Shop"}))))
        .await;
    assert_eq!(response.status, 201);

    let response = service.projects("GET", AuthState::user(1), None).await;
    json_body(&response)["projects"][0]["id"].as_u64().unwrap()
}

mod download_tests {
    use super::*;

    #[tokio::test]
    async fn test_download_returns_archive() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        let project_id = create_shop(&service).await;
        let response = service
            .objects(
                "POST",
                AuthState::user(1),
                project_id,
                None,
                Some(&body(json!({
                    "name": "Item",
                    "attributes": [
                        {"name": "title", "type": "Text", "required": true},
                        {"name": "price", "type": "Decimal"}
                    ]
                }))),
            )
            .await;
        assert_eq!(response.status, 200);

        let response = service
            .download_project("GET", AuthState::user(1), project_id)
            .await;
        assert_eq!(response.status, 200);
        assert_eq!(response.header("Content-Type"), Some("application/zip"));
        assert_eq!(
            response.header("Content-Disposition"),
            Some("attachment; filename=\"Shop.zip\"")
        );

        let ResponseBody::Binary(bytes) = response.body else {
            panic!("expected a binary body");
        };
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 1);
        assert!(archive.by_name("Shop/api/models/Item.js").is_ok());
    }

    #[tokio::test]
    async fn test_method_is_checked_before_authentication() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);

        let response = service
            .download_project("POST", AuthState::Anonymous, 1)
            .await;
        assert_eq!(response.status, 405);
        assert_eq!(error_of(&response), "Invalid HTTP method");

        let response = service.download_project("GET", AuthState::Anonymous, 1).await;
        assert_eq!(response.status, 401);
        assert_eq!(error_of(&response), "Not authenticated");
    }

    #[tokio::test]
    async fn test_foreign_project_is_not_found() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        let project_id = create_shop(&service).await;

        let foreign = service
            .download_project("GET", AuthState::user(2), project_id)
            .await;
        let missing = service
            .download_project("GET", AuthState::user(2), 404)
            .await;

        assert_eq!(foreign.status, 400);
        assert_eq!(
            error_of(&foreign),
            format!("Project id={} does not exist", project_id)
        );
        assert_eq!(missing.status, 400);
        assert_eq!(error_of(&missing), "Project id=404 does not exist");
    }

    #[tokio::test]
    async fn test_corrupt_type_is_server_error() {
        let snapshot = SchemaSnapshot {
            projects: vec![ProjectRow {
                id: 1,
                name: "Legacy".to_string(),
                owner: 1,
                language: 1,
                created_at: Utc::now(),
            }],
            objects: vec![ObjectRow {
                id: 1,
                name: "Record".to_string(),
                project_id: 1,
                owner: 1,
                created_at: Utc::now(),
            }],
            attributes: vec![AttributeRow {
                id: 1,
                object_id: 1,
                owner: 1,
                name: "payload".to_string(),
                type_code: 9,
                required: false,
                description: None,
            }],
            actions: Vec::new(),
        };
        let staging = TempDir::new().unwrap();
        let service = service_with(InMemorySchemaStore::from_snapshot(snapshot).unwrap(), &staging);

        let response = service.download_project("GET", AuthState::user(1), 1).await;
        assert_eq!(response.status, 500);
        assert_eq!(error_of(&response), "Internal server error");
    }
}

mod project_tests {
    use super::*;

    #[tokio::test]
    async fn test_projects_require_authentication() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);

        // Authentication is checked before the method
        let response = service.projects("PATCH", AuthState::Anonymous, None).await;
        assert_eq!(response.status, 401);

        let response = service.projects("PATCH", AuthState::user(1), None).await;
        assert_eq!(response.status, 405);
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        create_shop(&service).await;

        let response = service
            .projects("POST", AuthState::user(1), Some(&body(json!({"name": "Shop"}))))
            .await;
        assert_eq!(response.status, 400);
        assert_eq!(error_of(&response), "Project with this name already exists");

        let response = service
            .projects("POST", AuthState::user(1), Some(&body(json!({}))))
            .await;
        assert_eq!(error_of(&response), "Missing `name` parameter");

        let response = service.projects("POST", AuthState::user(1), None).await;
        assert_eq!(error_of(&response), "Missing request body");

        // Other users see nothing
        let response = service.projects("GET", AuthState::user(2), None).await;
        assert_eq!(json_body(&response)["projects"], json!([]));
    }

    #[tokio::test]
    async fn test_rename_and_delete() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        let project_id = create_shop(&service).await;

        let response = service
            .project(
                "PUT",
                AuthState::user(1),
                project_id,
                Some(&body(json!({"name": "Store"}))),
            )
            .await;
        assert_eq!(response.status, 200);
        assert_eq!(json_body(&response)["project"]["name"], "Store");

        let response = service
            .download_project("GET", AuthState::user(1), project_id)
            .await;
        assert_eq!(
            response.header("Content-Disposition"),
            Some("attachment; filename=\"Store.zip\"")
        );

        let response = service
            .project("DELETE", AuthState::user(1), project_id, None)
            .await;
        assert_eq!(response.status, 200);

        let response = service
            .project("GET", AuthState::user(1), project_id, None)
            .await;
        assert_eq!(response.status, 400);
    }
}

mod object_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_object() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        let project_id = create_shop(&service).await;

        let payload = body(json!({
            "name": "User",
            "attributes": [{"name": "email", "type": "Text", "required": true}]
        }));
        let response = service
            .objects("POST", AuthState::user(1), project_id, None, Some(&payload))
            .await;
        assert_eq!(json_body(&response)["message"], "Object created");

        let response = service
            .objects("POST", AuthState::user(1), project_id, None, Some(&payload))
            .await;
        assert_eq!(response.status, 400);
        assert_eq!(
            error_of(&response),
            "Object with this name already exists for this project"
        );

        let response = service
            .objects("GET", AuthState::user(1), project_id, None, None)
            .await;
        let object_id = json_body(&response)["objects"][0]["id"].as_u64().unwrap();

        let response = service
            .objects("GET", AuthState::user(1), project_id, Some(object_id), None)
            .await;
        let object = &json_body(&response)["object"];
        assert_eq!(object["name"], "User");
        assert_eq!(object["attributes"][0]["name"], "email");
        assert_eq!(object["attributes"][0]["type"], "Text");
        assert_eq!(object["actions"], json!([]));
    }

    #[tokio::test]
    async fn test_duplicate_attributes_create_nothing() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        let project_id = create_shop(&service).await;

        let response = service
            .objects(
                "POST",
                AuthState::user(1),
                project_id,
                None,
                Some(&body(json!({
                    "name": "User",
                    "attributes": [
                        {"name": "email", "type": "Text"},
                        {"name": "email", "type": "Integer"}
                    ]
                }))),
            )
            .await;
        assert_eq!(response.status, 400);
        assert_eq!(error_of(&response), "Duplicate attribute names for this object");

        let response = service
            .objects("GET", AuthState::user(1), project_id, None, None)
            .await;
        assert_eq!(json_body(&response)["objects"], json!([]));
    }

    #[tokio::test]
    async fn test_object_request_errors() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        let project_id = create_shop(&service).await;

        let response = service
            .objects("OPTIONS", AuthState::Anonymous, project_id, None, None)
            .await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body, ResponseBody::Empty);

        let response = service
            .objects("GET", AuthState::Anonymous, project_id, None, None)
            .await;
        assert_eq!(response.status, 401);

        let response = service
            .objects(
                "POST",
                AuthState::user(1),
                project_id,
                None,
                Some(&body(json!({"name": "User", "attributes": [{"type": "Text"}]}))),
            )
            .await;
        assert_eq!(error_of(&response), "Missing `name` attribute parameter");

        let response = service
            .objects("GET", AuthState::user(1), project_id, Some(77), None)
            .await;
        assert_eq!(error_of(&response), "Object id=77 does not exist");

        let response = service
            .objects("PUT", AuthState::user(1), project_id, Some(77), None)
            .await;
        assert_eq!(response.status, 405);
    }

    #[tokio::test]
    async fn test_delete_object_removes_it_from_download() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        let project_id = create_shop(&service).await;
        for name in ["Item", "Cart"] {
            service
                .objects(
                    "POST",
                    AuthState::user(1),
                    project_id,
                    None,
                    Some(&body(json!({"name": name}))),
                )
                .await;
        }

        let response = service
            .objects("GET", AuthState::user(1), project_id, None, None)
            .await;
        let item_id = json_body(&response)["objects"][0]["id"].as_u64().unwrap();
        let response = service
            .objects("DELETE", AuthState::user(1), project_id, Some(item_id), None)
            .await;
        assert_eq!(response.status, 200);

        let archive = service
            .compiler()
            .compile(1, project_id)
            .await
            .unwrap();
        assert_eq!(archive.entries, vec!["Shop/api/models/Cart.js"]);
    }
}

mod action_tests {
    use super::*;

    async fn create_user_object(service: &Service, project_id: ProjectId) -> u64 {
        service
            .objects(
                "POST",
                AuthState::user(1),
                project_id,
                None,
                Some(&body(json!({"name": "User"}))),
            )
            .await;
        let response = service
            .objects("GET", AuthState::user(1), project_id, None, None)
            .await;
        json_body(&response)["objects"][0]["id"].as_u64().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_actions() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        let project_id = create_shop(&service).await;
        let object_id = create_user_object(&service, project_id).await;

        let payload = body(json!({"name": "List Users", "route": "/users", "method": "GET"}));
        let response = service
            .actions(
                "POST",
                AuthState::user(1),
                project_id,
                Some(object_id),
                Some(&payload),
            )
            .await;
        assert_eq!(json_body(&response)["message"], "Action created");

        let response = service
            .actions(
                "POST",
                AuthState::user(1),
                project_id,
                Some(object_id),
                Some(&payload),
            )
            .await;
        assert_eq!(
            error_of(&response),
            "Action with this name already exists for this object"
        );

        let response = service
            .actions("GET", AuthState::user(1), project_id, Some(object_id), None)
            .await;
        let actions = &json_body(&response)["actions"];
        assert_eq!(actions[0]["identifier"], "list-users");
        assert_eq!(actions[0]["method"], "GET");
    }

    #[tokio::test]
    async fn test_action_request_errors() {
        let staging = TempDir::new().unwrap();
        let service = service(&staging);
        let project_id = create_shop(&service).await;
        let object_id = create_user_object(&service, project_id).await;

        let response = service
            .actions("GET", AuthState::user(1), project_id, None, None)
            .await;
        assert_eq!(error_of(&response), "Invalid object");

        let response = service
            .actions(
                "POST",
                AuthState::user(1),
                project_id,
                Some(object_id),
                Some(&body(json!({"name": "List Users", "method": "GET"}))),
            )
            .await;
        assert_eq!(error_of(&response), "Missing `route` parameter");

        let response = service
            .actions(
                "POST",
                AuthState::user(1),
                project_id,
                Some(object_id),
                Some(&body(json!({"name": "List", "route": "users", "method": "GET"}))),
            )
            .await;
        assert_eq!(response.status, 400);
        assert_eq!(error_of(&response), "route: must start with '/'");

        let response = service
            .actions(
                "POST",
                AuthState::user(2),
                project_id,
                Some(object_id),
                Some(&body(json!({"name": "Steal", "route": "/x", "method": "GET"}))),
            )
            .await;
        assert_eq!(
            error_of(&response),
            format!("Project id={} does not exist", project_id)
        );
    }
}
