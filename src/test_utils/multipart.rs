use axum::{
    extract::{FromRequest, Multipart},
    http::Request,
};

/// A file field of a multipart form.
pub(crate) struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: Vec<u8>,
}

impl<'a> FilePart<'a> {
    pub(crate) fn new(field: &'a str, file_name: &'a str, content_type: &'a str) -> Self {
        Self {
            field,
            file_name,
            content_type,
            bytes: b"fake receipt".to_vec(),
        }
    }

    pub(crate) fn with_size(mut self, size: usize) -> Self {
        self.bytes = vec![b'x'; size];
        self
    }
}

/// Build a multipart form with the text fields in `texts` followed by `files`.
pub(crate) async fn must_make_multipart(
    uri: &str,
    texts: &[(&str, &str)],
    files: &[FilePart<'_>],
) -> Multipart {
    let boundary = "MY_BOUNDARY123456789";
    let mut data: Vec<u8> = Vec::new();

    for (name, value) in texts {
        data.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        data.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        data.extend_from_slice(value.as_bytes());
        data.extend_from_slice(b"\r\n");
    }

    for file in files {
        data.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        data.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.file_name
            )
            .as_bytes(),
        );
        data.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
        data.extend_from_slice(&file.bytes);
        data.extend_from_slice(b"\r\n");
    }

    data.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(data.into())
        .unwrap();

    Multipart::from_request(request, &{}).await.unwrap()
}
