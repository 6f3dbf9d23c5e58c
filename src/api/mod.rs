//! API request handlers
//!
//! Handlers are independent of any HTTP framework. The transport layer passes
//! in the request method, the caller's [`AuthState`], the ids parsed from the
//! path and the raw body, and writes the returned [`ApiResponse`] back.
//!
//! | Route | Handler |
//! |---|---|
//! | `/projects` | [`ApiService::projects`] |
//! | `/projects/{pid}` | [`ApiService::project`] |
//! | `/projects/{pid}/download` | [`ApiService::download_project`] |
//! | `/projects/{pid}/objects[/{oid}]` | [`ApiService::objects`] |
//! | `/projects/{pid}/objects/{oid}/actions` | [`ApiService::actions`] |
//!
//! Errors are answered as `{"error": "<message>"}`.

pub mod error;
pub mod response;

pub use error::ApiError;
pub use response::{ApiResponse, ResponseBody};

use crate::auth::AuthState;
use crate::compiler::ProjectCompiler;
use crate::models::{
    AttributeType, HttpMethod, NewAction, NewAttribute, NewObject, NewProject, ObjectId,
    ProjectId, ReturnValue, UserId,
};
use crate::storage::StorageBackend;
use crate::store::SchemaStore;
use serde_json::{Map, Value, json};
use std::sync::Arc;

type JsonObject = Map<String, Value>;

/// Request handlers over a schema store and a project compiler
pub struct ApiService<S, B> {
    compiler: Arc<ProjectCompiler<S, B>>,
}

impl<S, B> Clone for ApiService<S, B> {
    fn clone(&self) -> Self {
        Self {
            compiler: Arc::clone(&self.compiler),
        }
    }
}

impl<S: SchemaStore, B: StorageBackend> ApiService<S, B> {
    pub fn new(compiler: ProjectCompiler<S, B>) -> Self {
        Self {
            compiler: Arc::new(compiler),
        }
    }

    pub fn compiler(&self) -> &ProjectCompiler<S, B> {
        &self.compiler
    }

    fn store(&self) -> &S {
        self.compiler.store()
    }

    /// `GET /projects/{pid}/download`: compile a project and return its archive
    ///
    /// The method is checked before authentication.
    pub async fn download_project(
        &self,
        method: &str,
        auth: AuthState,
        project_id: ProjectId,
    ) -> ApiResponse {
        respond(self.handle_download(method, auth, project_id).await)
    }

    /// `/projects`: list (GET) or create (POST) the caller's projects
    pub async fn projects(&self, method: &str, auth: AuthState, body: Option<&[u8]>) -> ApiResponse {
        respond(self.handle_projects(method, auth, body).await)
    }

    /// `/projects/{pid}`: get (GET), rename (PUT) or delete (DELETE) a project
    pub async fn project(
        &self,
        method: &str,
        auth: AuthState,
        project_id: ProjectId,
        body: Option<&[u8]>,
    ) -> ApiResponse {
        respond(self.handle_project(method, auth, project_id, body).await)
    }

    /// `/projects/{pid}/objects[/{oid}]`: get or list (GET), create (POST) or
    /// delete (DELETE) objects
    pub async fn objects(
        &self,
        method: &str,
        auth: AuthState,
        project_id: ProjectId,
        object_id: Option<ObjectId>,
        body: Option<&[u8]>,
    ) -> ApiResponse {
        // CORS preflight
        if method.eq_ignore_ascii_case("OPTIONS") {
            return ApiResponse::empty(200);
        }
        respond(
            self.handle_objects(method, auth, project_id, object_id, body)
                .await,
        )
    }

    /// `/projects/{pid}/objects/{oid}/actions`: list (GET) or create (POST)
    /// actions of an object
    pub async fn actions(
        &self,
        method: &str,
        auth: AuthState,
        project_id: ProjectId,
        object_id: Option<ObjectId>,
        body: Option<&[u8]>,
    ) -> ApiResponse {
        respond(
            self.handle_actions(method, auth, project_id, object_id, body)
                .await,
        )
    }

    async fn handle_download(
        &self,
        method: &str,
        auth: AuthState,
        project_id: ProjectId,
    ) -> Result<ApiResponse, ApiError> {
        if parse_method(method)? != HttpMethod::Get {
            return Err(ApiError::InvalidMethod);
        }
        let owner = authenticated(auth)?;

        let archive = self.compiler.compile(owner, project_id).await?;
        Ok(ApiResponse::attachment(&archive.file_name, archive.bytes))
    }

    async fn handle_projects(
        &self,
        method: &str,
        auth: AuthState,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, ApiError> {
        let owner = authenticated(auth)?;

        match parse_method(method)? {
            HttpMethod::Get => {
                let projects = self.store().list_projects(owner).await?;
                Ok(ApiResponse::ok(json!({ "projects": projects })))
            }
            HttpMethod::Post => {
                let body = parse_body(body)?;
                let name = required_str(&body, "name")?;
                self.store()
                    .create_project(owner, NewProject::new(name))
                    .await?;
                Ok(ApiResponse::created(json!({ "message": "Project created" })))
            }
            _ => Err(ApiError::InvalidMethod),
        }
    }

    async fn handle_project(
        &self,
        method: &str,
        auth: AuthState,
        project_id: ProjectId,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, ApiError> {
        let owner = authenticated(auth)?;

        match parse_method(method)? {
            HttpMethod::Get => {
                let project = self.store().get_project(owner, project_id).await?;
                Ok(ApiResponse::ok(json!({ "project": project })))
            }
            HttpMethod::Put => {
                let body = parse_body(body)?;
                let name = required_str(&body, "name")?;
                let project = self
                    .store()
                    .rename_project(owner, project_id, &name)
                    .await?;
                Ok(ApiResponse::ok(
                    json!({ "message": "Project updated", "project": project }),
                ))
            }
            HttpMethod::Delete => {
                self.store().delete_project(owner, project_id).await?;
                Ok(ApiResponse::ok(json!({ "message": "Project deleted" })))
            }
            HttpMethod::Post => Err(ApiError::InvalidMethod),
        }
    }

    async fn handle_objects(
        &self,
        method: &str,
        auth: AuthState,
        project_id: ProjectId,
        object_id: Option<ObjectId>,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, ApiError> {
        let owner = authenticated(auth)?;

        match (parse_method(method)?, object_id) {
            (HttpMethod::Get, Some(object_id)) => {
                self.get_object(owner, project_id, object_id).await
            }
            (HttpMethod::Get, None) => {
                let objects = self.store().list_objects(owner, project_id).await?;
                Ok(ApiResponse::ok(json!({ "objects": objects })))
            }
            (HttpMethod::Post, _) => {
                let object = parse_new_object(parse_body(body)?)?;
                self.store()
                    .create_object(owner, project_id, object)
                    .await?;
                Ok(ApiResponse::ok(json!({ "message": "Object created" })))
            }
            (HttpMethod::Delete, Some(object_id)) => {
                self.store()
                    .delete_object(owner, project_id, object_id)
                    .await?;
                Ok(ApiResponse::ok(json!({ "message": "Object deleted" })))
            }
            (HttpMethod::Delete, None) => Err(ApiError::MissingPathSegment("object")),
            (HttpMethod::Put, _) => Err(ApiError::InvalidMethod),
        }
    }

    async fn get_object(
        &self,
        owner: UserId,
        project_id: ProjectId,
        object_id: ObjectId,
    ) -> Result<ApiResponse, ApiError> {
        let object = self.store().get_object(owner, project_id, object_id).await?;
        let attributes = self.store().list_attributes(owner, object_id).await?;
        let actions = self
            .store()
            .list_actions(owner, project_id, object_id)
            .await?;

        let mut value = serde_json::to_value(&object)
            .map_err(|e| ApiError::Internal(format!("Failed to encode object: {}", e)))?;
        if let Value::Object(fields) = &mut value {
            fields.insert("attributes".to_string(), json!(attributes));
            fields.insert("actions".to_string(), json!(actions));
        }
        Ok(ApiResponse::ok(json!({ "object": value })))
    }

    async fn handle_actions(
        &self,
        method: &str,
        auth: AuthState,
        project_id: ProjectId,
        object_id: Option<ObjectId>,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, ApiError> {
        let object_id = object_id.ok_or(ApiError::MissingPathSegment("object"))?;
        let owner = authenticated(auth)?;

        match parse_method(method)? {
            HttpMethod::Get => {
                let actions = self
                    .store()
                    .list_actions(owner, project_id, object_id)
                    .await?;
                Ok(ApiResponse::ok(json!({ "actions": actions })))
            }
            HttpMethod::Post => {
                let action = parse_new_action(parse_body(body)?)?;
                self.store()
                    .create_action(owner, project_id, object_id, action)
                    .await?;
                Ok(ApiResponse::ok(json!({ "message": "Action created" })))
            }
            _ => Err(ApiError::InvalidMethod),
        }
    }
}

fn respond(result: Result<ApiResponse, ApiError>) -> ApiResponse {
    result.unwrap_or_else(ApiError::into_response)
}

fn authenticated(auth: AuthState) -> Result<UserId, ApiError> {
    auth.user_id().ok_or(ApiError::Unauthenticated)
}

fn parse_method(method: &str) -> Result<HttpMethod, ApiError> {
    method.parse().map_err(|_| ApiError::InvalidMethod)
}

fn parse_body(body: Option<&[u8]>) -> Result<JsonObject, ApiError> {
    let bytes = body
        .filter(|bytes| !bytes.is_empty())
        .ok_or(ApiError::MissingBody)?;
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(ApiError::InvalidBody("expected a JSON object".to_string())),
        Err(e) => Err(ApiError::InvalidBody(e.to_string())),
    }
}

fn required_str(body: &JsonObject, field: &'static str) -> Result<String, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Err(ApiError::MissingParameter(field)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ApiError::InvalidParameter {
            field,
            reason: "expected a string".to_string(),
        }),
    }
}

fn optional_str(body: &JsonObject, field: &'static str) -> Result<Option<String>, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ApiError::InvalidParameter {
            field,
            reason: "expected a string".to_string(),
        }),
    }
}

fn parse_new_object(body: JsonObject) -> Result<NewObject, ApiError> {
    let mut object = NewObject::new(required_str(&body, "name")?);

    match body.get("attributes") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for item in items {
                object.attributes.push(parse_new_attribute(item)?);
            }
        }
        Some(_) => {
            return Err(ApiError::InvalidParameter {
                field: "attributes",
                reason: "expected a list".to_string(),
            });
        }
    }
    Ok(object)
}

fn parse_new_attribute(item: &Value) -> Result<NewAttribute, ApiError> {
    let Value::Object(fields) = item else {
        return Err(ApiError::InvalidParameter {
            field: "attributes",
            reason: "expected a list of objects".to_string(),
        });
    };

    let name = match fields.get("name") {
        Some(Value::String(name)) => name.clone(),
        _ => return Err(ApiError::MissingAttributeParameter("name")),
    };
    let attribute_type: AttributeType = match fields.get("type") {
        None | Some(Value::Null) => return Err(ApiError::MissingAttributeParameter("type")),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|e| ApiError::InvalidParameter {
                field: "type",
                reason: e.to_string(),
            })?
        }
    };

    let mut attribute = NewAttribute::new(name, attribute_type);
    attribute.required = match fields.get("required") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(required)) => *required,
        Some(_) => {
            return Err(ApiError::InvalidParameter {
                field: "required",
                reason: "expected true or false".to_string(),
            });
        }
    };
    attribute.description = optional_str(fields, "description")?;
    Ok(attribute)
}

fn parse_new_action(body: JsonObject) -> Result<NewAction, ApiError> {
    let friendly_name = required_str(&body, "name")?;
    let route = required_str(&body, "route")?;
    let method = required_str(&body, "method")?;
    let method = method
        .parse::<HttpMethod>()
        .map_err(|reason| ApiError::InvalidParameter {
            field: "method",
            reason,
        })?;

    let return_values: Vec<ReturnValue> = match body.get("return_values") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|e| ApiError::InvalidParameter {
                field: "return_values",
                reason: e.to_string(),
            })?
        }
    };

    Ok(NewAction {
        friendly_name,
        identifier: optional_str(&body, "identifier")?,
        method,
        route,
        description: optional_str(&body, "description")?,
        return_values,
    })
}
