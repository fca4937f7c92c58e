//! Server harness and shared world for student registration scenarios.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The `WorldFixture` ensures the server
//! is stopped even if a test panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use serde_json::Value;
use student_records::Trace;
use student_records::domain::{StudentService, TRACE_ID_HEADER};
use student_records::inbound::http::state::HttpState;
use student_records::inbound::http::students::{create_student, list_students};
use student_records::inbound::http::validation::json_config;
use student_records::outbound::memory::InMemoryStudentRepository;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

pub(crate) struct StudentWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
    pub(crate) last_location: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<StudentWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

pub(crate) fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it; the future must
    // not borrow the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

async fn spawn_student_server(http_state: HttpState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let http_data = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .app_data(json_config())
            .wrap(Trace)
            .service(list_students)
            .service(create_student)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    (runtime, local)
}

/// Start a server backed by the real service over an empty in-memory store.
pub(crate) fn world() -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let service = Arc::new(StudentService::new(Arc::new(
        InMemoryStudentRepository::new(),
    )));
    let http_state = HttpState::new(service.clone(), service);

    let (base_url, server) = local
        .block_on(&runtime, async { spawn_student_server(http_state).await })
        .expect("server should start");

    let world = Rc::new(RefCell::new(StudentWorld {
        runtime,
        local,
        base_url,
        server,
        last_status: None,
        last_body: None,
        last_trace_id: None,
        last_location: None,
    }));

    WorldFixture { world }
}

struct CapturedResponse {
    status: u16,
    trace_id: Option<String>,
    location: Option<String>,
    body: Value,
}

fn header_value(headers: &actix_web::http::header::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Send a request and record status, headers, and JSON body on the world.
pub(crate) fn perform_json_request(
    world: &SharedWorld,
    method: Method,
    path: &str,
    payload: Option<Value>,
) {
    let captured = with_world_async(world, |base_url| async move {
        let request = Client::default().request(method, format!("{base_url}{path}"));
        let mut response = match payload {
            Some(payload) => request.send_json(&payload).await.expect("json request"),
            None => request.send().await.expect("request"),
        };
        let status = response.status().as_u16();
        let trace_id = header_value(response.headers(), TRACE_ID_HEADER);
        let location = header_value(response.headers(), header::LOCATION.as_str());
        let body = response.body().await.expect("body");
        let json: Value = serde_json::from_slice(&body).expect("json body");
        CapturedResponse {
            status,
            trace_id,
            location,
            body: json,
        }
    });

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(captured.status);
    ctx.last_trace_id = captured.trace_id;
    ctx.last_location = captured.location;
    ctx.last_body = Some(captured.body);
}
