use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use serde_json::json;

use crate::probe::Hit;
use crate::session::Mode;

#[derive(Serialize)]
struct PathEntry<'a> {
    url: &'a str,
    status: u16,
    size: usize,
}

#[derive(Serialize)]
struct VhostEntry<'a> {
    vhost: &'a str,
    status: u16,
    size: usize,
}

/// Serialize a result snapshot to pretty-printed JSON. The top-level key
/// and entry shape depend on the mode: path-like modes carry full
/// records, subdomains are bare strings.
pub fn write_results(path: &Path, mode: Mode, hits: &[Hit]) -> anyhow::Result<()> {
    let document = match mode {
        Mode::Dir | Mode::Fuzz | Mode::FuzzAny => {
            let paths: Vec<PathEntry> = hits
                .iter()
                .map(|h| PathEntry {
                    url: &h.identifier,
                    status: h.status,
                    size: h.size,
                })
                .collect();
            json!({ "paths": paths })
        }
        Mode::Sub => {
            let subdomains: Vec<&str> = hits.iter().map(|h| h.identifier.as_str()).collect();
            json!({ "subdomains": subdomains })
        }
        Mode::Vhost => {
            let vhosts: Vec<VhostEntry> = hits
                .iter()
                .map(|h| VhostEntry {
                    vhost: &h.identifier,
                    status: h.status,
                    size: h.size,
                })
                .collect();
            json!({ "vhosts": vhosts })
        }
    };

    let file = File::create(path)
        .with_context(|| format!("cannot create output file '{}'", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &document)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("reconhound-{}-{name}", std::process::id()))
    }

    fn read_json(path: &Path) -> serde_json::Value {
        let data = std::fs::read_to_string(path).unwrap();
        std::fs::remove_file(path).ok();
        serde_json::from_str(&data).unwrap()
    }

    #[test]
    fn path_modes_write_full_records() {
        let path = temp_path("paths.json");
        let hits = vec![Hit::http("http://t/admin".into(), 200, 128)];
        write_results(&path, Mode::Dir, &hits).unwrap();

        let doc = read_json(&path);
        assert_eq!(doc["paths"][0]["url"], "http://t/admin");
        assert_eq!(doc["paths"][0]["status"], 200);
        assert_eq!(doc["paths"][0]["size"], 128);
    }

    #[test]
    fn subdomains_are_bare_strings() {
        let path = temp_path("subs.json");
        let hits = vec![Hit::dns("api.example.com".into())];
        write_results(&path, Mode::Sub, &hits).unwrap();

        let doc = read_json(&path);
        assert_eq!(doc["subdomains"], json!(["api.example.com"]));
    }

    #[test]
    fn vhosts_use_the_vhost_key() {
        let path = temp_path("vhosts.json");
        let hits = vec![Hit::http("dev.example.com".into(), 403, 64)];
        write_results(&path, Mode::Vhost, &hits).unwrap();

        let doc = read_json(&path);
        assert_eq!(doc["vhosts"][0]["vhost"], "dev.example.com");
        assert_eq!(doc["vhosts"][0]["status"], 403);
    }

    #[test]
    fn empty_snapshot_still_writes_the_key() {
        let path = temp_path("empty.json");
        write_results(&path, Mode::FuzzAny, &[]).unwrap();
        let doc = read_json(&path);
        assert_eq!(doc["paths"], json!([]));
    }
}
