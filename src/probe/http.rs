use std::time::Duration;

use rand::Rng;
use reqwest::header::{HOST, USER_AGENT};
use reqwest::{Client, ClientBuilder};

use super::{is_hit_status, Hit, ProbeErrorKind, ProbeOutcome};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.144 Mobile Safari/537.36",
    "Mozilla/5.0 (iPad; CPU OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1",
];

pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())]
}

/// Client for directory and fuzz probes. Redirects are disabled so the
/// first status code is observed, not the resolved target's.
pub fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .tcp_nodelay(true)
        .gzip(true)
        .use_rustls_tls()
        .danger_accept_invalid_certs(true)
        .build()?;
    Ok(client)
}

/// Vhost probes override the Host header, which hyper only honors on
/// HTTP/1 connections.
pub fn build_vhost_client(timeout: Duration) -> anyhow::Result<Client> {
    let client = ClientBuilder::new()
        .http1_only()
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .gzip(true)
        .use_rustls_tls()
        .danger_accept_invalid_certs(true)
        .build()?;
    Ok(client)
}

fn classify_error(err: &reqwest::Error) -> ProbeErrorKind {
    if err.is_timeout() {
        ProbeErrorKind::Timeout
    } else if err.is_connect() {
        ProbeErrorKind::Connect
    } else {
        ProbeErrorKind::Other
    }
}

/// GET a fully-built URL and classify the response. The body is only
/// read when the status qualifies as a hit, so misses stay cheap.
pub async fn probe_url(client: &Client, url: String) -> ProbeOutcome {
    let request = client.get(&url).header(USER_AGENT, random_user_agent());
    match request.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            if !is_hit_status(status) {
                return ProbeOutcome::Miss;
            }
            let size = response.bytes().await.map(|b| b.len()).unwrap_or(0);
            ProbeOutcome::Hit(Hit::http(url, status, size))
        }
        Err(err) => ProbeOutcome::Error(classify_error(&err)),
    }
}

/// Probe one virtual-host name: request the server's IP directly with a
/// spoofed Host header. A hit is keyed by the vhost name, not the URL.
pub async fn probe_vhost(client: &Client, ip: &str, vhost: String) -> ProbeOutcome {
    let url = format!("http://{ip}/");
    let request = client
        .get(&url)
        .header(USER_AGENT, random_user_agent())
        .header(HOST, &vhost);
    match request.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            if !is_hit_status(status) {
                return ProbeOutcome::Miss;
            }
            let size = response.bytes().await.map(|b| b.len()).unwrap_or(0);
            ProbeOutcome::Hit(Hit::http(vhost, status, size))
        }
        Err(err) => ProbeOutcome::Error(classify_error(&err)),
    }
}
