use crate::app_env::test::TEST_DB_URL;
use crate::{SharedData, db, persistence, routes};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tower::ServiceExt;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

/// A throwaway database which is dropped when this value goes out of scope
struct TestDatabase {
    base_url: String,
    db_name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let db_id: u32 = thread_rng().gen_range(10_000..99_999);
        let db_name = format!("test_db_{db_id}");

        let mut conn = PgConnection::connect(base_url).await?;
        sqlx::query(&format!("CREATE DATABASE {db_name}"))
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        Ok(Self {
            base_url: base_url.to_owned(),
            db_name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let base_url = self.base_url.clone();
        let db_name = self.db_name.clone();

        TOKIO_RT.block_on(async move {
            let mut conn = match PgConnection::connect(&base_url).await {
                Ok(cxn) => cxn,
                Err(conn_err) => {
                    println!("Failed to reconnect to drop test database {db_name}, please remove it manually. Error: {conn_err}");
                    return;
                }
            };

            let drop_result = sqlx::query(&format!("DROP DATABASE {db_name} WITH (FORCE)"))
                .execute(&mut conn)
                .await;
            if let Err(db_err) = drop_result {
                println!("Failed to drop test database {db_name}, please remove it manually. Error: {db_err}");
            }
        });
    }
}

/// Creates a fresh database with the application's schema, hands a pool for it to [test_fn],
/// and drops the database afterwards, even if the test panics.
///
/// Expects that the TEST_DB_URL environment variable is populated with a base postgres URL
/// that doesn't include a database name
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()>,
    F: FnOnce(PgPool) -> R,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    let base_url = env::var(TEST_DB_URL)
        .expect("You must provide the TEST_DB_URL environment variable as the base postgres connection string");
    let test_db = TOKIO_RT
        .block_on(TestDatabase::create(&base_url))
        .unwrap_or_else(|db_err| panic!("Failed to create test database: {db_err}"));

    let pool = TOKIO_RT.block_on(async {
        let pool = db::connect_sqlx(&test_db.url())
            .await
            .expect("Could not connect to the test database");
        db::create_schema(&pool)
            .await
            .expect("Could not create the schema in the test database");
        pool
    });

    TOKIO_RT.block_on(test_fn(pool.clone()));
    TOKIO_RT.block_on(pool.close());
    drop(test_db);
}

/// Builds the full application router on top of the given pool
pub fn router_for(pool: PgPool) -> Router {
    routes::build_router(Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(pool),
    }))
}

/// Sends a single request through the router
pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router should never fail to produce a response")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}
