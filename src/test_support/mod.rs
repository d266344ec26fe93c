//! Test utilities and mocks for autorecipe unit tests.
//!
//! Recipe phases reach the outside world through two seams: the
//! [`Executor`] for external tools and the [`Fetcher`] for downloads. The
//! mocks here record every call so tests can assert exactly what a phase
//! spawned or fetched.
//!
//! # Example
//!
//! ```rust,ignore
//! let exec = MockExecutor::new();
//! exec.expect_prefix("./configure", MockProcessOutput::failure(1, "no compiler"));
//!
//! // hand `exec.clone()` to a recipe, then inspect `exec.calls()`
//! ```

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use url::Url;

use crate::sources::fetch::Fetcher;
use crate::util::process::{Executor, ProcessBuilder, ProcessOutput};

/// Canned output for a mocked process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failed output with the given status and stderr.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(mock: MockProcessOutput) -> Self {
        ProcessOutput {
            status: Some(mock.status),
            stdout: mock.stdout,
            stderr: mock.stderr,
        }
    }
}

/// A recorded invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: String,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct ExecutorState {
    /// Command prefixes with their canned output, first match wins
    expectations: Vec<(String, MockProcessOutput)>,
    calls: Vec<RecordedCall>,
}

/// Mock process executor.
///
/// Commands succeed with empty output unless an expectation matches. Clones
/// share state, so a test can keep one handle and give another to the code
/// under test.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    state: Arc<Mutex<ExecutorState>>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Answer commands starting with `prefix` with `output`.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.lock()
            .expectations
            .push((prefix.to_string(), output));
        self
    }

    /// Every command run so far, as display strings.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.iter().map(|c| c.command.clone()).collect()
    }

    /// Full records of every command run so far.
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Working directories of every command run so far.
    pub fn cwds(&self) -> Vec<PathBuf> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| c.cwd.clone())
            .collect()
    }

    /// Number of commands starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.command.starts_with(prefix))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ExecutorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Executor for MockExecutor {
    fn exec(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        let command = cmd.display_command();
        let mut state = self.lock();

        state.calls.push(RecordedCall {
            command: command.clone(),
            cwd: cmd.get_cwd().map(PathBuf::from),
            env: cmd.get_env().clone(),
        });

        let output = state
            .expectations
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| MockProcessOutput::success(""));

        Ok(output.into())
    }
}

#[derive(Debug, Default)]
struct FetcherState {
    responses: HashMap<String, std::result::Result<Vec<u8>, String>>,
    requests: Vec<String>,
}

/// Mock archive fetcher.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    state: Arc<Mutex<FetcherState>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        MockFetcher::default()
    }

    /// Serve `body` for `url`.
    pub fn serve(&self, url: &str, body: Vec<u8>) -> &Self {
        self.lock().responses.insert(url.to_string(), Ok(body));
        self
    }

    /// Fail requests for `url` with `message`.
    pub fn fail(&self, url: &str, message: &str) -> &Self {
        self.lock()
            .responses
            .insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FetcherState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let mut state = self.lock();
        state.requests.push(url.to_string());

        match state.responses.get(url.as_str()) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => bail!("{}", message),
            None => bail!("HTTP 404 Not Found"),
        }
    }
}

/// Build an in-memory `.tar.gz` with the given `(path, contents)` entries.
pub fn make_tarball(entries: &[(&str, &str)]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .unwrap();
    }

    let mut encoder = builder.into_inner().unwrap();
    encoder.flush().unwrap();
    encoder.finish().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_records_and_matches() {
        let exec = MockExecutor::new();
        exec.expect_prefix("make install", MockProcessOutput::failure(2, "no rule"));

        let ok = exec
            .exec(&ProcessBuilder::new("make").cwd("/src"))
            .unwrap();
        let failed = exec
            .exec(&ProcessBuilder::new("make").arg("install"))
            .unwrap();

        assert!(ok.success());
        assert_eq!(failed.status, Some(2));
        assert_eq!(exec.calls(), vec!["make", "make install"]);
        assert_eq!(exec.count("make"), 2);
        assert_eq!(exec.cwds(), vec![PathBuf::from("/src")]);
    }

    #[test]
    fn test_mock_fetcher() {
        let fetcher = MockFetcher::new();
        fetcher.serve("https://example.com/a.tar.gz", b"data".to_vec());

        let url = Url::parse("https://example.com/a.tar.gz").unwrap();
        assert_eq!(fetcher.fetch(&url).unwrap(), b"data");

        let missing = Url::parse("https://example.com/b.tar.gz").unwrap();
        assert!(fetcher.fetch(&missing).is_err());
        assert_eq!(fetcher.requests().len(), 2);
    }
}
