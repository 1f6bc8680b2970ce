//! OpenAPI fragments for the CRUD surface every entity module exposes.

use serde_json::{json, Map, Value};

/// Describes one entity's CRUD endpoints.
pub struct CrudDoc<'a> {
    /// Tag grouping the endpoints, e.g. `Publishers`.
    pub tag: &'a str,
    /// Lowercase singular used in summaries, e.g. `publisher`.
    pub singular: &'a str,
    /// Lowercase plural used in summaries, e.g. `publishers`.
    pub plural: &'a str,
    /// Component schema names for the entity and its request bodies.
    pub schema: &'a str,
    pub create_schema: &'a str,
    pub update_schema: &'a str,
    /// Exact-match query filters as `(name, description)`.
    pub filters: &'a [(&'a str, &'a str)],
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn response_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/responses/{}", name) })
}

fn id_parameter(singular: &str) -> Value {
    json!({
        "in": "path",
        "name": "id",
        "required": true,
        "schema": { "type": "string" },
        "description": format!("{} id", singular)
    })
}

fn list_parameters(doc: &CrudDoc<'_>) -> Vec<Value> {
    let mut parameters: Vec<Value> = doc
        .filters
        .iter()
        .map(|(name, description)| {
            json!({
                "in": "query",
                "name": name,
                "required": false,
                "schema": { "type": "string" },
                "description": description
            })
        })
        .collect();

    parameters.push(json!({
        "in": "query",
        "name": "sortBy",
        "required": false,
        "schema": { "type": "string" },
        "description": "sort by query in the form of field:desc/asc (ex. name:asc)"
    }));
    parameters.push(json!({
        "in": "query",
        "name": "limit",
        "required": false,
        "schema": { "type": "integer", "minimum": 1, "default": 10 },
        "description": format!("Maximum number of {}", doc.plural)
    }));
    parameters.push(json!({
        "in": "query",
        "name": "page",
        "required": false,
        "schema": { "type": "integer", "minimum": 1, "default": 1 },
        "description": "Page number"
    }));
    parameters
}

/// Build the module fragment: `paths` relative to the mount point plus the
/// given component `schemas` and the paginated envelope for the entity.
pub fn crud_fragment(doc: &CrudDoc<'_>, schemas: Map<String, Value>) -> Value {
    let page_schema = format!("{}Page", doc.schema);
    let mut schemas = schemas;
    schemas.insert(
        page_schema.clone(),
        json!({
            "type": "object",
            "properties": {
                "results": { "type": "array", "items": schema_ref(doc.schema) },
                "page": { "type": "integer" },
                "limit": { "type": "integer" },
                "totalPages": { "type": "integer" },
                "totalResults": { "type": "integer" }
            },
            "required": ["results", "page", "limit", "totalPages", "totalResults"]
        }),
    );

    json!({
        "paths": {
            "": {
                "post": {
                    "summary": format!("Create {}", doc.singular),
                    "tags": [doc.tag],
                    "requestBody": {
                        "required": true,
                        "content": json_content(schema_ref(doc.create_schema))
                    },
                    "responses": {
                        "201": {
                            "description": "Created",
                            "content": json_content(schema_ref(doc.schema))
                        },
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized"),
                        "403": response_ref("Forbidden")
                    }
                },
                "get": {
                    "summary": format!("Get all {}", doc.plural),
                    "tags": [doc.tag],
                    "parameters": list_parameters(doc),
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": json_content(schema_ref(&page_schema))
                        },
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized"),
                        "403": response_ref("Forbidden")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": format!("Get {} by id", doc.singular),
                    "tags": [doc.tag],
                    "parameters": [id_parameter(doc.singular)],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": json_content(schema_ref(doc.schema))
                        },
                        "401": response_ref("Unauthorized"),
                        "403": response_ref("Forbidden"),
                        "404": response_ref("NotFound")
                    }
                },
                "patch": {
                    "summary": format!("Update {} by id", doc.singular),
                    "tags": [doc.tag],
                    "parameters": [id_parameter(doc.singular)],
                    "requestBody": {
                        "required": true,
                        "content": json_content(schema_ref(doc.update_schema))
                    },
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": json_content(schema_ref(doc.schema))
                        },
                        "400": response_ref("BadRequest"),
                        "401": response_ref("Unauthorized"),
                        "403": response_ref("Forbidden"),
                        "404": response_ref("NotFound")
                    }
                },
                "delete": {
                    "summary": format!("Delete {} by id", doc.singular),
                    "tags": [doc.tag],
                    "parameters": [id_parameter(doc.singular)],
                    "responses": {
                        "200": { "description": "No content" },
                        "401": response_ref("Unauthorized"),
                        "403": response_ref("Forbidden"),
                        "404": response_ref("NotFound")
                    }
                }
            }
        },
        "components": {
            "schemas": schemas
        }
    })
}

/// Schema shared by every entity's stored metadata.
pub fn entity_schema(extra_properties: Value, extra_required: &[&str]) -> Value {
    let mut properties = json!({
        "id": { "type": "string", "description": "Unique identifier" },
        "createdAt": { "type": "string", "format": "date-time" },
        "updatedAt": { "type": "string", "format": "date-time" }
    });
    if let (Some(target), Value::Object(extra)) = (properties.as_object_mut(), extra_properties) {
        target.extend(extra);
    }

    let mut required = vec!["id", "createdAt", "updatedAt"];
    required.extend_from_slice(extra_required);

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}
