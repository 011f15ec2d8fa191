use axum::response::Response;

#[track_caller]
pub(crate) fn get_header(response: &Response, header_name: &str) -> String {
    response
        .headers()
        .get(header_name)
        .unwrap_or_else(|| panic!("Headers missing {header_name}"))
        .to_str()
        .expect("Could not convert to str")
        .to_owned()
}

pub(crate) async fn get_body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).into_owned()
}
