//! Generation request dispatch

use super::session::{PendingRequest, RequestId, Session};
use super::App;
use crate::client::CaptionClient;
use crate::error::GenerateError;
use crate::types::GenerationResult;
use eframe::egui;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of a background request, waiting to be applied on the UI thread
pub(crate) struct Completion {
    pub id: RequestId,
    pub outcome: Result<GenerationResult, GenerateError>,
}

/// Run one request on the runtime and post its outcome to `inbox`.
/// Nothing is posted if the token is cancelled first.
fn spawn_request(
    request: PendingRequest,
    client: Arc<CaptionClient>,
    inbox: Arc<Mutex<Vec<Completion>>>,
    token: CancellationToken,
    ctx: egui::Context,
    runtime: &tokio::runtime::Runtime,
) {
    runtime.spawn(async move {
        let started = std::time::Instant::now();
        tokio::select! {
            _ = token.cancelled() => {
                debug!(id = ?request.id, "Request task cancelled");
            }
            outcome = client.generate(&request.file, request.language) => {
                debug!(id = ?request.id, ok = outcome.is_ok(), elapsed_ms = started.elapsed().as_millis() as u64, "Request task finished");
                match inbox.lock() {
                    Ok(mut pending) => pending.push(Completion { id: request.id, outcome }),
                    Err(e) => warn!(error = %e, "Completion inbox poisoned"),
                }
                ctx.request_repaint();
            }
        }
    });
}

impl App {
    pub fn start_generation(&mut self, ctx: &egui::Context) {
        let Some(request) = self.session.begin_request() else {
            return;
        };

        let Some(client) = self.client.clone() else {
            let endpoint = self.active_endpoint();
            self.session
                .finish_request(request.id, Err(GenerateError::InvalidEndpoint(endpoint)));
            return;
        };

        info!(
            id = ?request.id,
            file = %request.file.name,
            language = request.language.code(),
            "Starting generation"
        );

        let token = CancellationToken::new();
        if let Some(previous) = self.cancel_token.replace(token.clone()) {
            previous.cancel();
        }

        spawn_request(
            request,
            client,
            self.inbox.clone(),
            token,
            ctx.clone(),
            &self.runtime,
        );
    }

    pub fn cancel_generation(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.session.cancel_request();
    }

    /// Apply finished requests; called once per frame
    pub fn poll_generation(&mut self) {
        if apply_completions(&self.inbox, &mut self.session) {
            self.cancel_token = None;
        }
    }
}

/// Drain `inbox` into `session`. Returns true if the awaited request finished.
fn apply_completions(inbox: &Mutex<Vec<Completion>>, session: &mut Session) -> bool {
    let finished: Vec<Completion> = match inbox.lock() {
        Ok(mut pending) => pending.drain(..).collect(),
        Err(e) => {
            warn!(error = %e, "Completion inbox poisoned");
            return false;
        }
    };
    let mut current_done = false;
    for completion in finished {
        current_done |= session.finish_request(completion.id, completion.outcome);
    }
    current_done
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SelectedFile;
    use crate::types::RequestPhase;
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const BODY: &str = r##"{"captions":["a","b","c"],"hashtags":"#x #y"}"##;

    fn session_with_file(name: &str) -> Session {
        let mut session = Session::default();
        session.select(SelectedFile::new(name, None, "image/png", Arc::from(&b"PNG"[..])));
        session
    }

    fn inbox_len(inbox: &Mutex<Vec<Completion>>) -> usize {
        inbox.lock().unwrap().len()
    }

    /// Poll until `inbox` holds something or `limit` passes
    fn wait_for_completion(inbox: &Mutex<Vec<Completion>>, limit: Duration) {
        let started = Instant::now();
        while inbox_len(inbox) == 0 && started.elapsed() < limit {
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    /// One-shot server: reads the whole multipart body, then answers 200 with `BODY`
    fn serve_captions(runtime: &tokio::runtime::Runtime) -> String {
        let listener = runtime.block_on(TcpListener::bind("127.0.0.1:0")).unwrap();
        let addr = listener.local_addr().unwrap();
        runtime.spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !(request.ends_with(b"--\r\n") || request.ends_with(b"0\r\n\r\n")) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{BODY}",
                BODY.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/generate")
    }

    #[test]
    fn completion_lands_in_inbox_and_applies() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let endpoint = serve_captions(&runtime);
        let client = Arc::new(CaptionClient::new(&endpoint, None).unwrap());
        let inbox = Arc::new(Mutex::new(Vec::new()));

        let mut session = session_with_file("sunset.png");
        let request = session.begin_request().unwrap();
        let id = request.id;
        spawn_request(
            request,
            client,
            inbox.clone(),
            CancellationToken::new(),
            egui::Context::default(),
            &runtime,
        );

        wait_for_completion(&inbox, Duration::from_secs(10));
        {
            let pending = inbox.lock().unwrap();
            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].id, id);
            assert!(pending[0].outcome.is_ok());
        }

        assert!(apply_completions(&inbox, &mut session));
        assert_eq!(inbox_len(&inbox), 0);
        assert_eq!(session.phase(), RequestPhase::Succeeded);
        assert_eq!(session.result().unwrap().captions, ["a", "b", "c"]);
    }

    #[test]
    fn cancelled_request_posts_nothing() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        // Accepted by the backlog but never answered
        let listener = runtime.block_on(TcpListener::bind("127.0.0.1:0")).unwrap();
        let endpoint = format!("http://{}/generate", listener.local_addr().unwrap());
        let client = Arc::new(CaptionClient::new(&endpoint, None).unwrap());
        let inbox = Arc::new(Mutex::new(Vec::new()));
        let token = CancellationToken::new();

        let mut session = session_with_file("clip.mp4");
        let request = session.begin_request().unwrap();
        spawn_request(
            request,
            client,
            inbox.clone(),
            token.clone(),
            egui::Context::default(),
            &runtime,
        );

        std::thread::sleep(Duration::from_millis(200));
        token.cancel();
        session.cancel_request();
        std::thread::sleep(Duration::from_millis(200));

        assert_eq!(inbox_len(&inbox), 0);
        assert!(!apply_completions(&inbox, &mut session));
        assert_eq!(session.phase(), RequestPhase::Idle);
        drop(listener);
    }

    #[test]
    fn draining_applies_only_the_current_request() {
        let mut session = session_with_file("first.png");
        let old = session.begin_request().unwrap();
        session.select(SelectedFile::new("second.png", None, "image/png", Arc::from(&b"PNG"[..])));
        let current = session.begin_request().unwrap();

        let inbox = Mutex::new(vec![
            Completion {
                id: current.id,
                outcome: Ok(GenerationResult {
                    captions: vec!["new".into()],
                    hashtags: "#new".into(),
                }),
            },
            Completion {
                id: old.id,
                outcome: Ok(GenerationResult {
                    captions: vec!["old".into()],
                    hashtags: "#old".into(),
                }),
            },
        ]);

        assert!(apply_completions(&inbox, &mut session));
        assert_eq!(inbox_len(&inbox), 0);
        let result = session.result().unwrap();
        assert_eq!(result.captions, ["new"]);
        assert_eq!(result.hashtags, "#new");
    }

    #[test]
    fn stale_completion_alone_changes_nothing() {
        let mut session = session_with_file("first.png");
        let old = session.begin_request().unwrap();
        session.select(SelectedFile::new("second.png", None, "image/png", Arc::from(&b"PNG"[..])));

        let inbox = Mutex::new(vec![Completion {
            id: old.id,
            outcome: Err(GenerateError::Backend("late".into())),
        }]);

        assert!(!apply_completions(&inbox, &mut session));
        assert!(session.alert().is_none());
        assert_eq!(session.phase(), RequestPhase::Idle);
    }
}
