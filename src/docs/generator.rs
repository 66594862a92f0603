//! Machine-readable API description.
//!
//! The document is rebuilt from the route table on every request to the
//! description endpoint. Each registered route becomes one OpenAPI operation:
//! path parameters are required strings, declared query parameters are added
//! as-is, and the registering controller becomes the operation tag.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use utoipa::openapi::{
    info::InfoBuilder,
    path::{
        HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder,
        PathsBuilder,
    },
    response::ResponseBuilder,
    schema::{ObjectBuilder, Schema, Type},
    tag::TagBuilder,
    OpenApi, OpenApiBuilder, RefOr, Required,
};

use crate::pipeline::{StageKind, StageOutcome};
use crate::routing::{RouteEntry, RouteTable};

/// Title, version and description of the generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

impl DocumentInfo {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Build the description of every route in `routes`.
pub fn describe(routes: &RouteTable, info: &DocumentInfo) -> OpenApi {
    let mut paths = PathsBuilder::new();
    let mut tags = BTreeSet::new();

    for (pattern, entries) in routes.by_pattern() {
        let mut item = PathItemBuilder::new();
        for entry in entries {
            let Some(http_method) = http_method(entry.method()) else {
                continue;
            };
            tags.insert(entry.metadata().controller.clone());
            item = item.operation(http_method, operation(entry));
        }
        paths = paths.path(pattern, item.build());
    }

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title(info.title.clone())
                .version(info.version.clone())
                .description(info.description.clone())
                .build(),
        )
        .paths(paths.build())
        .tags(Some(
            tags.into_iter()
                .map(|name| TagBuilder::new().name(name).build()),
        ))
        .build()
}

fn http_method(method: &Method) -> Option<HttpMethod> {
    Some(match *method {
        Method::GET => HttpMethod::Get,
        Method::POST => HttpMethod::Post,
        Method::PUT => HttpMethod::Put,
        Method::DELETE => HttpMethod::Delete,
        Method::PATCH => HttpMethod::Patch,
        Method::HEAD => HttpMethod::Head,
        Method::OPTIONS => HttpMethod::Options,
        Method::TRACE => HttpMethod::Trace,
        _ => return None,
    })
}

fn string_schema() -> RefOr<Schema> {
    RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(Type::String).build()))
}

fn operation(entry: &RouteEntry) -> Operation {
    let metadata = entry.metadata();
    let mut builder = OperationBuilder::new()
        .operation_id(Some(metadata.operation_id.clone()))
        .summary(metadata.summary.clone())
        .tag(metadata.controller.clone())
        .response("200", ResponseBuilder::new().description("Success").build());

    for name in entry.pattern().param_names() {
        builder = builder.parameter(
            ParameterBuilder::new()
                .name(name)
                .parameter_in(ParameterIn::Path)
                .required(Required::True)
                .schema(Some(string_schema()))
                .build(),
        );
    }

    for query in &metadata.query_params {
        let required = if query.required {
            Required::True
        } else {
            Required::False
        };
        builder = builder.parameter(
            ParameterBuilder::new()
                .name(query.name.clone())
                .parameter_in(ParameterIn::Query)
                .required(required)
                .schema(Some(string_schema()))
                .build(),
        );
    }

    builder.build()
}

/// Shared state of the description stage.
#[derive(Debug, Clone)]
pub struct DescriptionEndpoint {
    path: Arc<str>,
    routes: Arc<RouteTable>,
    info: Arc<DocumentInfo>,
}

impl DescriptionEndpoint {
    pub fn new(path: &str, routes: Arc<RouteTable>, info: Arc<DocumentInfo>) -> Self {
        Self {
            path: Arc::from(path),
            routes,
            info,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn matches(&self, request: &Request) -> bool {
        (request.method() == Method::GET || request.method() == Method::HEAD)
            && request.uri().path() == &*self.path
    }
}

/// Pipeline stage: answer description requests, pass everything else on.
pub async fn description_stage(
    State(endpoint): State<DescriptionEndpoint>,
    request: Request,
    next: Next,
) -> Response {
    if !endpoint.matches(&request) {
        return next.run(request).await;
    }

    tracing::debug!(path = %endpoint.path, routes = endpoint.routes.len(), "Serving API description");
    let document = describe(&endpoint.routes, &endpoint.info);
    let mut response = Json(document).into_response();
    response
        .extensions_mut()
        .insert(StageOutcome::ShortCircuited(StageKind::ApiDescription));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteTableBuilder;
    use serde_json::Value;

    async fn ok() -> &'static str {
        "ok"
    }

    fn table() -> RouteTable {
        let mut builder = RouteTableBuilder::new();
        {
            let mut routes = builder.registrar("Accounts");
            routes.get("/accounts", ok).summary("List accounts").query("page", false);
            routes.post("/accounts", ok);
            routes.get("/accounts/{id}", ok);
        }
        builder.registrar("Health").get("/health", ok);
        builder.build().unwrap()
    }

    fn describe_json() -> Value {
        let info = DocumentInfo::new("FinTrack", "v1").with_description("Ledger API");
        serde_json::to_value(describe(&table(), &info)).unwrap()
    }

    #[test]
    fn document_carries_info() {
        let doc = describe_json();
        assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
        assert_eq!(doc["info"]["title"], "FinTrack");
        assert_eq!(doc["info"]["version"], "v1");
        assert_eq!(doc["info"]["description"], "Ledger API");
    }

    #[test]
    fn every_route_is_described() {
        let doc = describe_json();
        let paths = doc["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths["/accounts"]["get"].is_object());
        assert!(paths["/accounts"]["post"].is_object());
        assert!(paths["/accounts/{id}"]["get"].is_object());
        assert!(paths["/health"]["get"].is_object());
    }

    #[test]
    fn operations_carry_metadata_and_parameters() {
        let doc = describe_json();

        let list = &doc["paths"]["/accounts"]["get"];
        assert_eq!(list["operationId"], "get_accounts");
        assert_eq!(list["summary"], "List accounts");
        assert_eq!(list["tags"][0], "Accounts");
        assert_eq!(list["parameters"][0]["name"], "page");
        assert_eq!(list["parameters"][0]["in"], "query");
        assert_eq!(list["parameters"][0]["required"], false);

        let get = &doc["paths"]["/accounts/{id}"]["get"];
        assert_eq!(get["parameters"][0]["name"], "id");
        assert_eq!(get["parameters"][0]["in"], "path");
        assert_eq!(get["parameters"][0]["required"], true);
    }

    #[test]
    fn tags_list_each_controller_once() {
        let doc = describe_json();
        let tags: Vec<_> = doc["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(tags, vec!["Accounts", "Health"]);
    }

    #[test]
    fn empty_table_yields_empty_paths() {
        let doc = serde_json::to_value(describe(
            &RouteTable::default(),
            &DocumentInfo::new("Empty", "v1"),
        ))
        .unwrap();
        assert!(doc["paths"].as_object().unwrap().is_empty());
    }
}
