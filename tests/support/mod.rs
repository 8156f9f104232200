#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use repo_exporter::util::sleep::Sleeper;
use serde_json::{json, Value};

/// Records requested sleeps without waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("sleeper lock poisoned").clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .expect("sleeper lock poisoned")
            .push(duration);
    }
}

pub fn secs(values: &[u64]) -> Vec<Duration> {
    values.iter().copied().map(Duration::from_secs).collect()
}

/// A listing entry shaped like the GitHub `GET /user/repos` payload.
pub fn repo_json(owner: &str, name: &str) -> Value {
    json!({
        "id": 1296269,
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "owner": {"login": owner, "id": 1},
        "private": false,
        "language": "Rust",
        "stargazers_count": 80,
        "license": {"key": "mit", "name": "MIT License", "spdx_id": "MIT"},
        "archived": false,
        "is_template": false,
        "mirror_url": null,
        "fork": false
    })
}
