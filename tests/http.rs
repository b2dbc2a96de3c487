use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode, redirect::Policy};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use storefront::client::{
    ControlState, Cursor, HttpFragmentSource, LoadMoreController, LoadMoreView, PageFilters,
    Trigger,
};
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("storefront_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_storefront"))
        .env("PORT", port.to_string())
        .env("STORE_DATA_PATH", data_path)
        .env("STORE_PUBLIC_DIR", concat!(env!("CARGO_MANIFEST_DIR"), "/public"))
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn no_redirect_client() -> Client {
    Client::builder().redirect(Policy::none()).build().unwrap()
}

async fn get_text(client: &Client, url: String) -> (StatusCode, String) {
    let response = client.get(url).send().await.unwrap();
    let status = response.status();
    (status, response.text().await.unwrap())
}

fn card_count(html: &str) -> usize {
    html.matches("class=\"product-card\"").count()
}

#[tokio::test]
async fn http_index_renders_first_page_with_load_more() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (status, html) = get_text(&client, format!("{}/", server.base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card_count(&html), 10);
    assert!(html.contains("id=\"load-more\""));
    assert!(html.contains("data-offset=\"10\""));
}

#[tokio::test]
async fn http_load_more_walks_offsets_until_marker() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (status, second) = get_text(
        &client,
        format!("{}/load-more-products?offset=10&query=&category=", server.base_url),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card_count(&second), 10);
    assert!(!second.contains("no-more-marker"));

    let (_, last) = get_text(
        &client,
        format!("{}/load-more-products?offset=20&query=&category=", server.base_url),
    )
    .await;
    assert!(card_count(&last) > 0);
    assert!(last.contains("id=\"no-more-marker\""));

    let (_, by_page) =
        get_text(&client, format!("{}/load-more-products?page=2", server.base_url)).await;
    assert_eq!(by_page, last);
}

#[tokio::test]
async fn http_load_more_rejects_missing_cursor() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (status, _) = get_text(&client, format!("{}/load-more-products", server.base_url)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        get_text(&client, format!("{}/load-more-products?page=0", server.base_url)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_category_filter_applies_to_listing_and_fragments() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (_, html) = get_text(&client, format!("{}/?category=music", server.base_url)).await;
    assert_eq!(card_count(&html), 3);
    assert!(!html.contains("id=\"load-more\""));

    let (_, fragment) = get_text(
        &client,
        format!("{}/load-more-products?offset=0&query=&category=music", server.base_url),
    )
    .await;
    assert_eq!(card_count(&fragment), 3);
    assert!(fragment.contains("id=\"no-more-marker\""));
}

#[tokio::test]
async fn http_single_search_result_redirects_to_product() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    let response = client
        .get(format!("{}/?query=leica", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    let location = response.headers()["location"].to_str().unwrap().to_string();
    assert!(location.starts_with("/products/"));

    let (status, page) = get_text(&client, format!("{}{location}", server.base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Vintage Leica M3"));
}

#[tokio::test]
async fn http_unknown_product_is_not_found() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (status, _) = get_text(&client, format!("{}/products/9999", server.base_url)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_like_redirects_back_to_product() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    let response = client
        .post(format!("{}/products/2/like", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()["location"], "/products/2");
}

#[tokio::test]
async fn http_dashboard_embeds_island_and_chart_script() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (status, html) = get_text(&client, format!("{}/dashboard/luis", server.base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("id=\"chart-data\""));
    assert!(html.contains("\"revenueLabels\""));
    assert!(html.contains("new Chart("));
    assert!(html.contains("salesByCategoryChart"));

    let (status, _) = get_text(&client, format!("{}/dashboard/nobody", server.base_url)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_serves_static_assets() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let (status, css) =
        get_text(&client, format!("{}/public/css/store.css", server.base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(css.contains(".btn-no-more"));
}

#[derive(Default)]
struct CountingView {
    enabled: bool,
    container: String,
    label: Option<String>,
    alerts: usize,
}

impl LoadMoreView for CountingView {
    fn has_control(&self) -> bool {
        true
    }

    fn set_spinner(&mut self, _visible: bool) {}

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn append(&mut self, markup: &str) {
        self.container.push_str(markup);
    }

    fn mark_exhausted(&mut self, label: &str) {
        self.enabled = false;
        self.label = Some(label.to_string());
    }

    fn alert(&mut self, _message: &str) {
        self.alerts += 1;
    }
}

#[tokio::test]
async fn http_controller_pages_until_exhausted() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let source = HttpFragmentSource::new(&server.base_url).unwrap();
    let filters = PageFilters::from_page_url(&format!("{}/", server.base_url));
    let mut controller =
        LoadMoreController::new(source, CountingView::default(), Cursor::Offset(10), filters)
            .with_min_display(Duration::from_millis(10));

    assert_eq!(controller.trigger().await, Trigger::Advanced);
    assert_eq!(controller.cursor(), Cursor::Offset(20));
    assert!(controller.view().enabled);

    assert_eq!(controller.trigger().await, Trigger::Exhausted);
    assert_eq!(controller.state(), ControlState::Exhausted);
    assert_eq!(controller.cursor(), Cursor::Offset(20));

    let view = controller.into_view();
    assert!(!view.enabled);
    assert_eq!(view.alerts, 0);
    assert!(view.label.is_some());
    assert!(card_count(&view.container) > 10);
    assert!(!view.container.contains("no-more-marker"));
}

#[tokio::test]
async fn http_controller_failure_keeps_cursor() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    // `page=0` is rejected by the server.
    let source = HttpFragmentSource::new(&server.base_url).unwrap();
    let view = CountingView::default();
    let mut controller =
        LoadMoreController::new(source, view, Cursor::Page(0), PageFilters::default())
            .with_min_display(Duration::from_millis(10));

    assert_eq!(controller.trigger().await, Trigger::Failed);
    assert_eq!(controller.cursor(), Cursor::Page(0));
    assert!(controller.view().enabled);
    assert_eq!(controller.view().alerts, 1);
}
