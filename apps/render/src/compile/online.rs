//! Online LaTeX compilers. No local TeX installation needed.
//!
//! Both services answer with the PDF body on success. Size checks live in the
//! pipeline's acceptance rule, not here.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;

use crate::compile::{Artifact, Backend, CompileJob};
use crate::errors::TierError;

/// File name the services see for the uploaded source.
const SOURCE_FILE_NAME: &str = "resume.tex";

/// latexonline.cc: source uploaded as a multipart file.
pub struct LatexOnline {
    client: Client,
    url: String,
}

impl LatexOnline {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl Backend for LatexOnline {
    fn id(&self) -> &str {
        "LaTeX.Online"
    }

    async fn compile(&self, job: CompileJob<'_>) -> Result<Artifact, TierError> {
        let part = Part::bytes(job.source.as_bytes().to_vec())
            .file_name(SOURCE_FILE_NAME)
            .mime_str("text/plain")?;
        let form = Form::new().part("file", part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        read_document(self.id(), response).await
    }
}

/// texlive.net: source posted as a urlencoded form field.
pub struct TexLiveNet {
    client: Client,
    url: String,
}

impl TexLiveNet {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl Backend for TexLiveNet {
    fn id(&self) -> &str {
        "TeXLive.net"
    }

    async fn compile(&self, job: CompileJob<'_>) -> Result<Artifact, TierError> {
        let fields = [
            ("filecontents", job.source),
            ("filename", SOURCE_FILE_NAME),
            ("engine", "pdflatex"),
        ];

        let response = self.client.post(&self.url).form(&fields).send().await?;
        read_document(self.id(), response).await
    }
}

async fn read_document(id: &str, response: Response) -> Result<Artifact, TierError> {
    let status = response.status();
    if !status.is_success() {
        debug!("{id} responded with status {status}");
        return Err(TierError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    debug!("{id} response: status={status}, content-length={}", body.len());
    Ok(Artifact::Bytes(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use uuid::Uuid;

    fn job(source: &str) -> CompileJob<'_> {
        CompileJob {
            request_id: Uuid::new_v4(),
            source,
            work_dir: None,
        }
    }

    /// Serves one canned HTTP response after draining the request headers and
    /// body. The raw request comes back through the receiver.
    async fn serve_once(response: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 64 * 1024];
            let mut seen = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
                if request_complete(&seen) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            tx.send(String::from_utf8_lossy(&seen).into_owned()).ok();
        });
        (format!("http://{addr}/compile"), rx)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    const PDF_RESPONSE: &str = "HTTP/1.1 200 OK\r\ncontent-type: application/pdf\r\ncontent-length: 8\r\nconnection: close\r\n\r\n%PDF-1.5";

    fn assert_pdf(artifact: Artifact) {
        match artifact {
            Artifact::Bytes(body) => assert_eq!(&body[..], b"%PDF-1.5"),
            other => panic!("expected bytes, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_tier_error() {
        let (url, _request) = serve_once("HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n").await;
        let backend = TexLiveNet::new(Client::new(), &url);

        let err = backend.compile(job("\\relax")).await.unwrap_err();
        assert!(matches!(err, TierError::Status { status: 500 }));
    }

    #[tokio::test]
    async fn test_latex_online_uploads_source_as_file_part() {
        let (url, request) = serve_once(PDF_RESPONSE).await;
        let backend = LatexOnline::new(Client::new(), &url);

        assert_pdf(backend.compile(job("A&B x")).await.unwrap());

        let request = request.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert!(request.contains(r#"name="file"; filename="resume.tex""#));
        assert!(lower.contains("content-type: text/plain"));
        assert!(request.contains("A&B x"));
    }

    #[tokio::test]
    async fn test_texlive_net_posts_form_fields() {
        let (url, request) = serve_once(PDF_RESPONSE).await;
        let backend = TexLiveNet::new(Client::new(), &url);

        assert_pdf(backend.compile(job("A&B x")).await.unwrap());

        let request = request.await.unwrap();
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.ends_with("filecontents=A%26B+x&filename=resume.tex&engine=pdflatex"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = LatexOnline::new(
            Client::builder().timeout(Duration::from_secs(5)).build().unwrap(),
            &format!("http://{addr}/compile"),
        );
        let err = backend.compile(job("\\relax")).await.unwrap_err();
        assert!(matches!(err, TierError::Transport(_)));
    }
}
