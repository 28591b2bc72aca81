use std::collections::HashMap;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::GoogleResult;

pub const CALLBACK_PATH: &str = "/callback";

/// How long a single connection may take to send its request line.
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(10);

const SUCCESS_PAGE: &str = "<html><body>\
    <h1>Signed in to Schedularr</h1>\
    <p>You can close this window and return to the terminal.</p>\
    </body></html>";

const FAILURE_PAGE: &str = "<html><body>\
    <h1>Sign-in failed</h1>\
    <p>Google did not grant access. Return to the terminal for details.</p>\
    </body></html>";

/// Serve the loopback redirect until a request for `CALLBACK_PATH` arrives,
/// and return its query parameters.
///
/// Each connection is handled on its own task, so a browser holding an idle
/// preconnect open doesn't block the real redirect. Other paths (favicon
/// etc.) get a 404; unreadable or malformed requests are dropped.
pub(crate) async fn wait_for_callback(listener: &TcpListener) -> GoogleResult<HashMap<String, String>> {
    let (tx, mut rx) = mpsc::channel(1);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                let tx = tx.clone();

                tokio::spawn(async move {
                    match tokio::time::timeout(REQUEST_READ_TIMEOUT, handle_connection(stream)).await {
                        Ok(Ok(Some(params))) => {
                            let _ = tx.send(params).await;
                        }
                        Ok(Ok(None)) => {}
                        Ok(Err(error)) => {
                            debug!(%peer, %error, "dropping callback connection");
                        }
                        Err(_) => debug!(%peer, "callback connection sent nothing, dropping"),
                    }
                });
            }
            Some(params) = rx.recv() => return Ok(params),
        }
    }
}

/// `Some` with the query parameters when this was the redirect.
async fn handle_connection(stream: TcpStream) -> GoogleResult<Option<HashMap<String, String>>> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let Some(target) = request_line.split_whitespace().nth(1) else {
        debug!("ignoring malformed request on callback listener");
        return Ok(None);
    };

    let mut stream = reader.into_inner();

    let url = match url::Url::parse(&format!("http://localhost{}", target)) {
        Ok(url) => url,
        Err(error) => {
            debug!(request_target = target, %error, "ignoring unparseable request target");
            write_response(&mut stream, "400 Bad Request", "").await?;
            return Ok(None);
        }
    };

    if url.path() != CALLBACK_PATH {
        debug!(path = url.path(), "ignoring request on callback listener");
        write_response(&mut stream, "404 Not Found", "").await?;
        return Ok(None);
    }

    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    let page = if params.contains_key("error") {
        FAILURE_PAGE
    } else {
        SUCCESS_PAGE
    };
    write_response(&mut stream, "200 OK", page).await?;

    Ok(Some(params))
}

async fn write_response<W>(stream: &mut W, status: &str, body: &str) -> GoogleResult<()>
where
    W: AsyncWriteExt + Unpin,
{
    let response = format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: text/html\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        body.len()
    );

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    async fn browser_get(port: u16, target: &str) -> String {
        let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        let request = format!("GET {target} HTTP/1.1\r\nHost: 127.0.0.1:{port}\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        let _ = stream.read_to_string(&mut response).await;
        response
    }

    #[tokio::test]
    async fn returns_query_of_callback_request() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let browser = tokio::spawn(async move {
            let favicon = browser_get(port, "/favicon.ico").await;
            let callback = browser_get(port, "/callback?code=4%2F0Ab&state=xyz").await;
            (favicon, callback)
        });

        let params = wait_for_callback(&listener).await.unwrap();
        let (favicon, callback) = browser.await.unwrap();

        assert_eq!(params.get("code").map(String::as_str), Some("4/0Ab"));
        assert_eq!(params.get("state").map(String::as_str), Some("xyz"));
        assert!(favicon.starts_with("HTTP/1.1 404"));
        assert!(callback.contains("Signed in to Schedularr"));
    }

    #[tokio::test]
    async fn idle_connection_does_not_block_redirect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        // Browsers open speculative connections and may never use them.
        let idle = TcpStream::connect(("127.0.0.1", port)).await.unwrap();

        let browser = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            browser_get(port, "/callback?code=c&state=s").await
        });

        let params = tokio::time::timeout(Duration::from_secs(2), wait_for_callback(&listener))
            .await
            .expect("redirect was not handled while an idle connection was open")
            .unwrap();

        assert_eq!(params.get("code").map(String::as_str), Some("c"));
        assert!(browser.await.unwrap().contains("Signed in to Schedularr"));
        drop(idle);
    }

    #[tokio::test]
    async fn malformed_request_is_skipped() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let browser = tokio::spawn(async move {
            let bad = browser_get(port, "@").await;
            let good = browser_get(port, "/callback?code=c&state=s").await;
            (bad, good)
        });

        let params = tokio::time::timeout(Duration::from_secs(2), wait_for_callback(&listener))
            .await
            .unwrap()
            .unwrap();
        let (bad, good) = browser.await.unwrap();

        assert_eq!(params.get("state").map(String::as_str), Some("s"));
        assert!(bad.starts_with("HTTP/1.1 4"));
        assert!(good.contains("Signed in to Schedularr"));
    }

    #[tokio::test]
    async fn error_redirect_shows_failure_page() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let browser =
            tokio::spawn(async move { browser_get(port, "/callback?error=access_denied").await });

        let params = wait_for_callback(&listener).await.unwrap();

        assert_eq!(params.get("error").map(String::as_str), Some("access_denied"));
        assert!(browser.await.unwrap().contains("Sign-in failed"));
    }
}
