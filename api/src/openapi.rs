// OpenAPI schema generator
// Hand-written document for the deposit history and probe endpoints

use serde_json::json;

use crate::config::{AuthConfig, PaginationConfig};

pub fn generate_openapi_spec(
    version: &str,
    auth: &AuthConfig,
    pagination: &PaginationConfig,
) -> serde_json::Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Deposit API",
            "description": "Authenticated, paginated deposit history",
            "version": version
        },
        "servers": [
            {
                "url": "http://localhost:8080",
                "description": "Development server"
            }
        ],
        "paths": {
            "/api/deposits": {
                "get": {
                    "summary": "List the caller's deposits",
                    "description": "Newest first. Invalid paging values fall back to defaults instead of failing.",
                    "tags": ["deposits"],
                    "security": [{ "sessionToken": [] }],
                    "parameters": [
                        {
                            "name": "page",
                            "in": "query",
                            "description": "1-based page number; values below 1 or non-numeric become 1",
                            "schema": { "type": "integer", "minimum": 1, "default": 1 }
                        },
                        {
                            "name": "limit",
                            "in": "query",
                            "description": format!("Page size, clamped to 1-{}", pagination.max_limit),
                            "schema": {
                                "type": "integer",
                                "minimum": 1,
                                "maximum": pagination.max_limit,
                                "default": pagination.default_limit
                            }
                        },
                        {
                            "name": "status",
                            "in": "query",
                            "description": "Only deposits with this status",
                            "schema": { "type": "string" }
                        },
                        {
                            "name": "currency",
                            "in": "query",
                            "description": "Only deposits in this currency",
                            "schema": { "type": "string" }
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "Successful response",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/DepositPage" }
                                }
                            }
                        },
                        "401": {
                            "description": "Missing, malformed or unknown session token",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                }
                            }
                        },
                        "500": {
                            "description": "Internal server error",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                }
                            }
                        }
                    }
                }
            },
            "/healthz": {
                "get": {
                    "summary": "Health check",
                    "description": "Simple liveness probe",
                    "tags": ["health"],
                    "responses": {
                        "200": { "description": "Service is alive" }
                    }
                }
            },
            "/readyz": {
                "get": {
                    "summary": "Readiness check",
                    "description": "Checks if service and integrations are ready",
                    "tags": ["health"],
                    "responses": {
                        "200": { "description": "Service is ready" },
                        "503": { "description": "Service or integrations are not ready" }
                    }
                }
            },
            "/version": {
                "get": {
                    "summary": "Service name and version",
                    "tags": ["health"],
                    "responses": {
                        "200": { "description": "Version info" }
                    }
                }
            }
        },
        "components": {
            "securitySchemes": {
                "sessionToken": {
                    "type": "apiKey",
                    "in": "header",
                    "name": auth.header,
                    "description": format!("`{} <token>` where token is a base58 session token", auth.scheme)
                }
            },
            "schemas": {
                "Deposit": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "format": "uuid" },
                        "user_id": { "type": "string", "description": "Owner of the deposit" },
                        "amount": { "type": "integer", "format": "int64", "description": "Amount in minor units" },
                        "currency": { "type": "string" },
                        "status": { "type": "string" },
                        "tx_reference": { "type": "string", "nullable": true },
                        "created_at": { "type": "string", "format": "date-time" }
                    }
                },
                "DepositPage": {
                    "type": "object",
                    "properties": {
                        "data": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Deposit" }
                        },
                        "pagination": {
                            "type": "object",
                            "properties": {
                                "total": { "type": "integer", "format": "int64" },
                                "page": { "type": "integer" },
                                "limit": { "type": "integer" },
                                "totalPages": { "type": "integer", "format": "int64" }
                            }
                        }
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "properties": {
                        "error": { "type": "string" }
                    }
                }
            }
        }
    })
}
