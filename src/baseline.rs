//! Pre-flight probes that characterize false-positive noise before
//! enumeration starts: DNS wildcarding for subdomain runs, the default
//! virtual host's response for vhost runs.

use std::net::Ipv4Addr;

use ahash::AHashSet;
use hickory_resolver::TokioAsyncResolver;
use rand::Rng;
use reqwest::header::{HOST, USER_AGENT};
use reqwest::Client;

use crate::probe::http::random_user_agent;

/// A label no sane wordlist contains: six random decimal digits.
fn random_probe_label() -> u32 {
    rand::thread_rng().gen_range(100_000..1_000_000)
}

/// Resolve a random label under `domain`. Success with at least one
/// address means the domain wildcards every subdomain; the full address
/// set becomes the suppression baseline. Resolution failure of any kind
/// means no wildcard.
pub async fn detect_dns_wildcard(
    resolver: &TokioAsyncResolver,
    domain: &str,
) -> Option<AHashSet<Ipv4Addr>> {
    let test_sub = format!("{}.{domain}", random_probe_label());
    match resolver.ipv4_lookup(test_sub.as_str()).await {
        Ok(lookup) => {
            let ips: AHashSet<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
            if ips.is_empty() {
                None
            } else {
                println!("[!] Wildcard DNS detected on {domain} -> IPs: {ips:?}");
                Some(ips)
            }
        }
        Err(_) => None,
    }
}

/// One request to the target IP with a random Host header. The returned
/// body length describes the default vhost's response; it is advisory
/// only and never filters vhost hits.
pub async fn detect_vhost_baseline(client: &Client, ip: &str, base_domain: &str) -> Option<usize> {
    let test_host = format!("{}.{base_domain}", random_probe_label());
    let url = format!("http://{ip}/");
    let response = client
        .get(&url)
        .header(USER_AGENT, random_user_agent())
        .header(HOST, &test_host)
        .send()
        .await
        .ok()?;
    let size = response.bytes().await.ok()?.len();
    println!("[!] Wildcard VHOST detected for {base_domain}, default size: {size}");
    Some(size)
}
