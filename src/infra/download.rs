// ============================================================
// Infra — Remote Fetching
// ============================================================
// Downloads a gzip-compressed file over HTTP(S), inflates it
// and writes the plain bytes to disk.
//
// The payload is first written to `<dest>.part` and renamed
// into place, so an interrupted download never leaves a file
// that `is_local` would accept.
//
// Transport and status errors are returned as-is; there is no
// retry.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
    time::Duration,
};

use flate2::read::GzDecoder;

use crate::error::Result;

const USER_AGENT: &str = concat!("visionpod-data/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(300))
        .build()?)
}

/// Fetch `url`, gunzip the body and store it at `dest`. Returns the inflated size.
pub fn fetch_gzipped(client: &reqwest::blocking::Client, url: &str, dest: &Path) -> Result<usize> {
    tracing::debug!("GET {}", url);
    let body = client.get(url).send()?.error_for_status()?.bytes()?;
    let inflated = gunzip(&body)?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let partial = partial_path(dest);
    fs::write(&partial, &inflated)?;
    fs::rename(&partial, dest)?;

    tracing::info!("Downloaded {} ({} bytes)", dest.display(), inflated.len());
    Ok(inflated.len())
}

pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    #[test]
    fn test_gunzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"idx payload").unwrap();
        let compressed = encoder.finish().unwrap();
        assert_eq!(gunzip(&compressed).unwrap(), b"idx payload");
    }

    #[test]
    fn test_gunzip_rejects_plain_bytes() {
        assert!(gunzip(b"not gzip at all").is_err());
    }

    #[test]
    fn test_partial_path_keeps_name() {
        let p = partial_path(Path::new("/data/MNIST/raw/train-images-idx3-ubyte"));
        assert_eq!(p, PathBuf::from("/data/MNIST/raw/train-images-idx3-ubyte.part"));
    }
}
