use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<Option<TestServer>> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cargo builds the binary before integration tests run; APP_ENV=test
        // points the server at the tea_time_test database and the reduced
        // hash work factor.
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_teatime-api"));
        cmd.env("APP_ENV", "test")
            .env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

/// Spawn (once per test binary) and return the shared server, or `None` when
/// the environment provides no database to run against.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return Ok(None);
    }

    match SERVER.get_or_init(|| TestServer::spawn().ok()) {
        Some(server) => {
            server.wait_ready(Duration::from_secs(10)).await?;
            Ok(Some(server))
        }
        None => anyhow::bail!("failed to spawn server binary"),
    }
}

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Username unique across test functions and suite runs.
pub fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!(
        "{}_{}_{}_{}",
        prefix,
        std::process::id(),
        nanos,
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

#[allow(dead_code)]
pub async fn register_user(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
) -> Result<String> {
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({
            "username": username,
            "password": "password",
            "first_name": "Test",
            "last_name": "User",
        }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "register failed with status {}",
        res.status()
    );

    let body = res.json::<Value>().await?;
    body["token"]
        .as_str()
        .map(|s| s.to_string())
        .context("no token in register response")
}

#[allow(dead_code)]
pub fn sample_tea() -> Value {
    json!({
        "title": "English Black Tea",
        "brand": "PG TIPS",
        "description": "Fine English tea made from a reputable company.",
        "category": "Black",
        "review": "I have been drinking this tea for years now and I love it.",
        "country_of_origin": "England",
        "organic": false,
        "img_url": "https://images.heb.com/is/image/HEBGrocery/000441976",
        "brew_time": 3,
        "brew_temp": 100
    })
}

/// Create a tea through POST /teas/new, saved to the caller's "My Teas" or
/// wish list, and return its generated id.
#[allow(dead_code)]
pub async fn create_tea(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    is_my_tea: bool,
) -> Result<i64> {
    let mut body = sample_tea();
    body["is_my_tea"] = json!(is_my_tea);
    body["is_on_wish_list"] = json!(!is_my_tea);

    let res = client
        .post(format!("{}/teas/new", base_url))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "tea creation failed with status {}",
        res.status()
    );

    let body = res.json::<Value>().await?;
    body["tea"]["id"].as_i64().context("no tea id in response")
}
