//! HTTP server with content reload and live reload
//!
//! Requests read immutable collection snapshots; the file watcher rebuilds
//! the whole collection off the request path and swaps it in atomically. A
//! failed rebuild keeps the previous snapshot serving.

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path as UrlPath, State, WebSocketUpgrade,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::content::{ContentStore, Post};
use crate::feed::{render_rss, render_sitemap};
use crate::templates::{PostView, TemplateRenderer};
use crate::Site;

/// Live reload script injected into HTML pages in watch mode
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Shared server state
struct ServerState {
    site: Site,
    store: ContentStore,
    renderer: TemplateRenderer,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    fn page(&self, html: String) -> Html<String> {
        if self.live_reload {
            Html(inject_live_reload(&html))
        } else {
            Html(html)
        }
    }
}

/// Start the server; blocks until shutdown
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let collection = site.load_collection()?;
    tracing::info!("serving {} posts", collection.len());

    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        site: site.clone(),
        store: ContentStore::new(collection),
        renderer: TemplateRenderer::new()?,
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/posts", get(index_handler))
        .route("/n/*post_id", get(post_handler))
        .route("/rss.xml", get(rss_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Watching {:?} for changes...", site.content_dir);
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("failed to open browser: {}", e);
        }
    }

    if watch {
        let state = state.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(state) {
                tracing::error!("file watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the content directory; rebuild and swap the collection on change
fn watch_and_reload(state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&state.site.content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("watching {:?}", state.site.content_dir);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path = e.path.to_string_lossy();
                    !path.contains(".git") && !path.ends_with('~') && !path.ends_with(".swp")
                });
                if !relevant {
                    continue;
                }

                tracing::info!("content changed, reloading...");
                match state.store.reload(|| state.site.load_collection()) {
                    Ok(()) => {
                        tracing::info!("reloaded {} posts", state.store.snapshot().len());
                        let _ = state.reload_tx.send(());
                    }
                    Err(e) => {
                        // keep serving the previous snapshot
                        tracing::error!("reload failed, keeping old content: {e:#}");
                    }
                }
            }
            Ok(Err(e)) => tracing::error!("watch error: {e:?}"),
            Err(e) => {
                tracing::error!("watch channel closed: {e:?}");
                break;
            }
        }
    }

    Ok(())
}

/// Post listing: published posts, newest first. With `render_drafts` set,
/// drafts are listed too for local preview.
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let collection = state.store.snapshot();
    let mut posts: Vec<&Post> = if state.site.config.render_drafts {
        collection.all().iter().collect()
    } else {
        collection.published().collect()
    };
    posts.sort_by(|a, b| b.date.cmp(&a.date));

    let views: Vec<PostView> = posts.into_iter().map(PostView::from).collect();
    match state.renderer.render_index(&state.site.config, &views) {
        Ok(html) => state.page(html).into_response(),
        Err(e) => render_error(e),
    }
}

/// Post detail. Unknown slugs and drafts both answer 404.
async fn post_handler(
    UrlPath(post_id): UrlPath<String>,
    State(state): State<Arc<ServerState>>,
) -> Response {
    let collection = state.store.snapshot();
    match collection.find_by_path(&post_id) {
        Some(post) if !post.draft || state.site.config.render_drafts => {
            let view = PostView::from(post);
            match state.renderer.render_post(&state.site.config, &view) {
                Ok(html) => state.page(html).into_response(),
                Err(e) => render_error(e),
            }
        }
        _ => not_found(&state),
    }
}

async fn rss_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let xml = render_rss(&state.site.config, &state.store.snapshot());
    ([(header::CONTENT_TYPE, "application/xml")], xml)
}

async fn sitemap_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let xml = render_sitemap(&state.site.config, &state.store.snapshot(), Utc::now());
    ([(header::CONTENT_TYPE, "application/xml")], xml)
}

async fn fallback_handler(State(state): State<Arc<ServerState>>) -> Response {
    not_found(&state)
}

fn not_found(state: &ServerState) -> Response {
    match state.renderer.render_not_found(&state.site.config) {
        Ok(html) => (StatusCode::NOT_FOUND, state.page(html)).into_response(),
        Err(e) => render_error(e),
    }
}

fn render_error(e: anyhow::Error) -> Response {
    tracing::error!("template rendering failed: {e:#}");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}

/// WebSocket endpoint for live reload clients
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }
}

fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    std::process::Command::new("open").arg(url).spawn()?;

    #[cfg(target_os = "linux")]
    std::process::Command::new("xdg-open").arg(url).spawn()?;

    #[cfg(target_os = "windows")]
    std::process::Command::new("cmd")
        .args(["/c", "start", url])
        .spawn()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{Collection, PostMeta};
    use chrono::DateTime;
    use std::path::PathBuf;

    #[test]
    fn live_reload_script_injected_before_body_close() {
        let html = "<html><body><p>hi</p></body></html>";
        let injected = inject_live_reload(html);
        assert!(injected.contains("__livereload"));
        assert!(injected.ends_with("</html>"));
    }

    fn post(path: &str, draft: bool) -> Post {
        Post {
            meta: PostMeta {
                path: path.to_string(),
                source: PathBuf::from(format!("{path}.mdx")),
            },
            title: path.to_string(),
            date: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
            description: None,
            draft,
            tags: Vec::new(),
            raw: String::new(),
            content: "<p>body</p>".to_string(),
        }
    }

    fn state(posts: Vec<Post>) -> Arc<ServerState> {
        let (reload_tx, _) = broadcast::channel(1);
        Arc::new(ServerState {
            site: Site {
                config: SiteConfig::default(),
                base_dir: PathBuf::from("."),
                content_dir: PathBuf::from("."),
            },
            store: ContentStore::new(Collection::new(posts)),
            renderer: TemplateRenderer::new().unwrap(),
            reload_tx,
            live_reload: false,
        })
    }

    #[tokio::test]
    async fn known_slug_renders_post_page() {
        let state = state(vec![post("hello", false)]);
        let response = post_handler(UrlPath("hello".to_string()), State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn draft_slug_answers_not_found() {
        let state = state(vec![post("wip", true)]);
        let response = post_handler(UrlPath("wip".to_string()), State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_slug_answers_not_found() {
        let state = state(vec![post("hello", false)]);
        let response = post_handler(UrlPath("missing-slug".to_string()), State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
