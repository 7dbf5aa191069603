//! TableCardsClient against a local stub server.
//!
//! The stub answers every request with a canned reply and records what it
//! received, so each test checks the route, the body and the bearer header.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::Mutex;

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::header::AUTHORIZATION;
use hyper::header::CONTENT_TYPE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::Value;
use serde_json::json;
use tablecards_lib::TableCardsClient;
use tablecards_lib::api::dto::*;
use tablecards_lib::auth::SessionTokenProvider;
use tablecards_lib::auth::StaticTokenProvider;
use tablecards_lib::error::ApiError;
use tablecards_lib::error::AuthError;
use tablecards_lib::error::Error;
use tablecards_lib::model::DataType;
use tablecards_lib::session::SessionContext;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Received {
    method: String,
    uri: String,
    authorization: Option<String>,
    body: String,
}

impl Received {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

struct StubServer {
    url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl StubServer {
    /// Starts a server that answers every request with `status` and `body`.
    async fn start(status: u16, body: impl Into<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let reply = Bytes::from(body.into());

        let log = received.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let log = log.clone();
                let reply = reply.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let log = log.clone();
                        let reply = reply.clone();
                        async move {
                            let method = req.method().to_string();
                            let uri = req.uri().to_string();
                            let authorization = req
                                .headers()
                                .get(AUTHORIZATION)
                                .and_then(|value| value.to_str().ok())
                                .map(str::to_string);
                            let body = match req.into_body().collect().await {
                                Ok(collected) => String::from_utf8_lossy(&collected.to_bytes()).into_owned(),
                                Err(_) => String::new(),
                            };
                            log.lock().unwrap().push(Received {
                                method,
                                uri,
                                authorization,
                                body,
                            });

                            Ok::<_, Infallible>(
                                Response::builder()
                                    .status(status)
                                    .header(CONTENT_TYPE, "application/json")
                                    .body(Full::new(reply))
                                    .unwrap(),
                            )
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            url: format!("http://{}/api/", addr),
            received,
        }
    }

    async fn json(status: u16, body: Value) -> Self {
        Self::start(status, body.to_string()).await
    }

    fn client(&self) -> TableCardsClient {
        TableCardsClient::builder()
            .url(&self.url)
            .token_provider(StaticTokenProvider::new("secret"))
            .build()
            .unwrap()
    }

    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    fn only_request(&self) -> Received {
        let received = self.received();
        assert_eq!(received.len(), 1, "expected exactly one request");
        received[0].clone()
    }
}

// =============================================================================
// Table content
// =============================================================================

#[tokio::test]
async fn test_table_content() {
    let server = StubServer::json(
        200,
        json!({
            "id": "t 1",
            "header": [
                {"id": "c0", "columnName": "Name", "dataTypeId": 1},
                {"id": "c1", "columnName": "Price", "dataTypeId": 3}
            ],
            "content": [
                {"id": "r0", "cellsValues": ["Tea", "2.50"]},
                {"id": "r1", "cellsValues": [null, "1"]}
            ]
        }),
    )
    .await;

    let table = server.client().table_content("t 1").await.unwrap();

    assert_eq!(table.header.len(), 2);
    assert_eq!(table.header[1].data_type_id, DataType::MONETARY_ID);
    assert_eq!(table.content[1].cells_values, vec![None, Some("1".to_string())]);

    let request = server.only_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.uri, "/api/tables/t%201/content");
    assert_eq!(request.authorization.as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn test_duplicate_row_body() {
    let server = StubServer::json(
        200,
        json!({"id": "r9", "tableId": "t1", "rowIndex": 3, "cellsValues": ["a", null]}),
    )
    .await;

    let created = server
        .client()
        .create_row("t1", &CreateRowRequest::duplicate(2))
        .await
        .unwrap();

    assert_eq!(created.row_index, 3);
    assert_eq!(created.cells_values, vec![Some("a".to_string()), None]);

    let request = server.only_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.uri, "/api/tables/t1/content/rows");
    assert_eq!(request.json(), json!({"rowIndex": 2, "duplicate": true}));
}

#[tokio::test]
async fn test_create_column_body() {
    let server = StubServer::json(
        200,
        json!({
            "id": "c5", "tableId": "t1", "dataTypeId": 4,
            "columnIndex": 0, "columnName": "Where", "cellsValues": []
        }),
    )
    .await;

    let request = CreateColumnRequest {
        data_type_id: DataType::MAP_ID,
        column_index: None,
        duplicate: false,
    };
    let created = server.client().create_column("t1", &request).await.unwrap();

    assert_eq!(created.column_name, "Where");
    let request = server.only_request();
    assert_eq!(request.uri, "/api/tables/t1/content/columns");
    assert_eq!(request.json(), json!({"dataTypeId": 4, "columnIndex": null}));
}

#[tokio::test]
async fn test_patch_column_route() {
    let server = StubServer::json(200, json!({"id": "c/1", "columnIndex": 2, "dataTypeId": 2})).await;

    let patched = server
        .client()
        .patch_column("t1", "c/1", &PatchColumnRequest::change_data_type(2))
        .await
        .unwrap();

    assert_eq!(patched.column_index, 2);
    assert_eq!(patched.column_name, None);

    let request = server.only_request();
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.uri, "/api/tables/t1/content/columns/c%2F1");
    assert_eq!(request.json(), json!({"dataTypeId": 2}));
}

#[tokio::test]
async fn test_patch_cells_sends_array() {
    let server = StubServer::json(
        200,
        json!([
            {"rowIndex": 0, "columnIndex": 1, "value": "X"},
            {"rowIndex": 1, "columnIndex": 1, "value": "X"}
        ]),
    )
    .await;

    let cells = vec![
        PatchCellRequest {
            row_id: Some("r0".to_string()),
            column_id: Some("c1".to_string()),
            data_type_id: 1,
            new_value: "X".to_string(),
        },
        PatchCellRequest {
            row_id: Some("r1".to_string()),
            column_id: Some("c1".to_string()),
            data_type_id: 1,
            new_value: "X".to_string(),
        },
    ];
    let patched = server.client().patch_cells("t1", &cells).await.unwrap();

    assert_eq!(patched.len(), 2);
    assert_eq!(patched[1].row_index, 1);

    let request = server.only_request();
    assert_eq!(request.uri, "/api/tables/t1/content/cells");
    assert_eq!(
        request.json(),
        json!([
            {"rowId": "r0", "columnId": "c1", "dataTypeId": 1, "newValue": "X"},
            {"rowId": "r1", "columnId": "c1", "dataTypeId": 1, "newValue": "X"}
        ])
    );
}

#[tokio::test]
async fn test_delete_rows_sends_ids() {
    let server = StubServer::json(200, json!({"indexes": [0, 2]})).await;

    let request = IdsRequest {
        ids: vec!["r0".to_string(), "r2".to_string()],
    };
    let deleted = server.client().delete_rows("t1", &request).await.unwrap();

    assert_eq!(deleted.indexes, vec![0, 2]);
    let request = server.only_request();
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.uri, "/api/tables/t1/content/rows");
    assert_eq!(request.json(), json!({"ids": ["r0", "r2"]}));
}

#[tokio::test]
async fn test_move_columns_body() {
    let server = StubServer::json(200, json!({"indexes": [1], "delta": -1})).await;

    let request = MoveRequest {
        ids_to_move: vec!["c1".to_string()],
        from_index: 1,
        to_index: 0,
    };
    let moved = server.client().move_columns("t1", &request).await.unwrap();

    assert_eq!(moved.delta, -1);
    let request = server.only_request();
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.uri, "/api/tables/t1/content/columns");
    assert_eq!(request.json(), json!({"idsToMove": ["c1"], "fromIndex": 1, "toIndex": 0}));
}

// =============================================================================
// Catalog and table cards
// =============================================================================

#[tokio::test]
async fn test_data_types_query() {
    let server = StubServer::json(200, json!([{"id": 3, "name": "Money"}, {"id": 4, "name": "Map"}])).await;

    let data_types = server.client().data_types("m").await.unwrap();

    assert_eq!(data_types, vec![DataType::Monetary, DataType::Map]);
    assert_eq!(server.only_request().uri, "/api/data-type?term=m");
}

#[tokio::test]
async fn test_data_types_unknown_id() {
    let server = StubServer::json(200, json!([{"id": 1, "name": "Text"}, {"id": 42, "name": "Color"}])).await;

    let error = server.client().data_types("").await.unwrap_err();

    match error {
        Error::UnknownDataType(unknown) => assert_eq!(unknown.id, 42),
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_table_cards() {
    let server = StubServer::json(200, json!([{"id": "t1", "name": "Budget"}])).await;

    let cards = server.client().table_cards().await.unwrap();

    assert_eq!(
        cards,
        vec![TableCardDto {
            id: "t1".to_string(),
            name: "Budget".to_string(),
        }]
    );
    assert_eq!(server.only_request().uri, "/api/tables");
}

#[tokio::test]
async fn test_rename_table_card() {
    let server = StubServer::json(200, json!({"id": "t1", "name": "Costs"})).await;

    let card = server.client().rename_table_card("t1", "Costs").await.unwrap();

    assert_eq!(card.name, "Costs");
    let request = server.only_request();
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.uri, "/api/tables/t1");
    assert_eq!(request.json(), json!({"name": "Costs"}));
}

#[tokio::test]
async fn test_delete_table_card_empty_reply() {
    let server = StubServer::start(200, "").await;

    server.client().delete_table_card("t1").await.unwrap();

    let request = server.only_request();
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.uri, "/api/tables/t1");
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_rejection_carries_server_message() {
    let server = StubServer::json(
        409,
        json!({"message": "Column name already taken", "error": "Conflict", "status": 409}),
    )
    .await;

    let error = server
        .client()
        .patch_column("t1", "c1", &PatchColumnRequest::rename("Name"))
        .await
        .unwrap_err();

    assert_eq!(error.status_code(), Some(409));
    assert_eq!(error.user_message(), "Column name already taken");
    match error {
        Error::Api(api) => {
            assert!(api.is_client_error());
            assert_eq!(api.detail().and_then(|d| d.error.as_deref()), Some("Conflict"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_rejection_with_plain_body() {
    let server = StubServer::start(502, "Bad gateway").await;

    let error = server.client().table_cards().await.unwrap_err();

    assert_eq!(error.status_code(), Some(502));
    match error {
        Error::Api(api) => {
            assert_eq!(api.server_message(), None);
            assert!(!api.is_client_error());
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_reply_keeps_body() {
    let server = StubServer::start(200, "<html>maintenance</html>").await;

    let error = server.client().table_content("t1").await.unwrap_err();

    match error {
        Error::Api(ApiError::Parse { body, .. }) => {
            assert_eq!(body.as_deref(), Some("<html>maintenance</html>"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TableCardsClient::builder()
        .url(format!("http://{}", addr))
        .token_provider(StaticTokenProvider::new("secret"))
        .build()
        .unwrap();

    let error = client.table_cards().await.unwrap_err();

    assert!(error.is_network());
    assert_eq!(error.status_code(), None);
}

#[tokio::test]
async fn test_signed_out_sends_nothing() {
    let server = StubServer::json(200, json!([])).await;
    let client = TableCardsClient::builder()
        .url(&server.url)
        .token_provider(SessionTokenProvider::new(SessionContext::in_memory()))
        .build()
        .unwrap();

    let error = client.table_cards().await.unwrap_err();

    assert!(matches!(error, Error::Auth(AuthError::NotSignedIn)));
    assert!(server.received().is_empty());
}
