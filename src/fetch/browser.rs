// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rendered retrieval through a headless Chromium process.
//!
//! Every navigation runs in its own [`BrowserSession`]: a fresh browser
//! process with a throwaway profile directory. The page is given a virtual
//! time budget to finish its network activity, then the live DOM is dumped
//! to stdout. Dropping the session kills the process and deletes the
//! profile, so a timeout or a cancelled request never leaves a browser
//! behind.

use super::{token_url, Fetch, FetchedDocument};
use crate::error::FetchError;
use crate::validators::Address;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct BrowserFetcher {
    base_url: String,
    chrome_path: String,
    user_agent: String,
    timeout: Duration,
    settle: Duration,
}

impl BrowserFetcher {
    pub fn new(
        base_url: &str,
        chrome_path: &str,
        user_agent: &str,
        timeout: Duration,
        settle: Duration,
    ) -> Self {
        Self {
            base_url: base_url.to_string(),
            chrome_path: chrome_path.to_string(),
            user_agent: user_agent.to_string(),
            timeout,
            settle,
        }
    }

    fn args(&self, url: &str) -> Vec<String> {
        vec![
            "--headless=new".to_string(),
            "--disable-gpu".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-extensions".to_string(),
            "--hide-scrollbars".to_string(),
            format!("--user-agent={}", self.user_agent),
            format!("--virtual-time-budget={}", self.settle.as_millis()),
            "--dump-dom".to_string(),
            url.to_string(),
        ]
    }
}

impl Fetch for BrowserFetcher {
    async fn fetch(&self, address: &Address) -> Result<FetchedDocument, FetchError> {
        let url = token_url(&self.base_url, address);
        let started = Instant::now();

        let mut session = BrowserSession::spawn(&self.chrome_path, &self.args(&url))?;
        debug!("Browser session started for {}", url);

        let html = match tokio::time::timeout(self.timeout, session.dump_dom()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Browser navigation to {} timed out", url);
                return Err(FetchError::Timeout(self.timeout));
            }
        };

        info!(
            "🌐 Rendered {} ({} bytes in {}ms)",
            url,
            html.len(),
            started.elapsed().as_millis()
        );

        Ok(FetchedDocument { url, html })
    }
}

/// A running headless browser bound to a private profile directory.
///
/// Released on drop: the process is killed and the profile removed.
pub struct BrowserSession {
    child: Child,
    profile: ProfileDir,
}

impl BrowserSession {
    /// Launch `program` with `args` plus a `--user-data-dir` pointing at a
    /// fresh profile directory.
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, FetchError> {
        let profile = ProfileDir::create().map_err(FetchError::BrowserLaunch)?;

        let child = Command::new(program)
            .args(args)
            .arg(format!("--user-data-dir={}", profile.path().display()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(FetchError::BrowserLaunch)?;

        Ok(Self { child, profile })
    }

    pub fn profile_dir(&self) -> &Path {
        self.profile.path()
    }

    /// Wait for the browser to exit and return what it printed.
    pub async fn dump_dom(&mut self) -> Result<String, FetchError> {
        let mut stdout = self
            .child
            .stdout
            .take()
            .ok_or_else(|| FetchError::Navigation("browser stdout already consumed".into()))?;
        let mut stderr = self
            .child
            .stderr
            .take()
            .ok_or_else(|| FetchError::Navigation("browser stderr already consumed".into()))?;

        let mut out = Vec::new();
        let mut err = Vec::new();
        // Drain both pipes together so a chatty stderr cannot block the browser.
        let (read_out, _) = tokio::join!(stdout.read_to_end(&mut out), stderr.read_to_end(&mut err));
        read_out.map_err(|e| FetchError::Navigation(format!("reading DOM: {}", e)))?;

        let status = self
            .child
            .wait()
            .await
            .map_err(|e| FetchError::Navigation(format!("waiting for browser: {}", e)))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&err);
            let tail = stderr.lines().last().unwrap_or("").trim().to_string();
            return Err(FetchError::Navigation(format!("browser exited with {}: {}", status, tail)));
        }

        let html = String::from_utf8_lossy(&out).into_owned();
        if html.trim().is_empty() {
            return Err(FetchError::Navigation("browser returned an empty DOM".into()));
        }
        Ok(html)
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // No-op if the process already exited.
        let _ = self.child.start_kill();
    }
}

struct ProfileDir(PathBuf);

impl ProfileDir {
    fn create() -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("rugcheck-bot-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&path)?;
        Ok(Self(path))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ProfileDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.0) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove browser profile {}: {}", self.0.display(), e);
            }
        }
    }
}
