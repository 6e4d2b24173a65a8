use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    if status.is_server_error() {
        log::error!("{method} {path} {} {:?}", status.as_u16(), started.elapsed());
    } else {
        log::info!("{method} {path} {} {:?}", status.as_u16(), started.elapsed());
    }

    response
}
