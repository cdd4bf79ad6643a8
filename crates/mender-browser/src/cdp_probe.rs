use crate::{Error, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::error::CdpError;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use mender_core::{Probe, ProbeError};
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const DEFAULT_DEBUGGING_PORT: u16 = 9222;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Rendered and not hidden by CSS
const VISIBILITY_FN: &str = r#"function() {
    if (!this.isConnected) return false;
    const style = window.getComputedStyle(this);
    if (style.display === 'none' || style.visibility === 'hidden' || style.visibility === 'collapse') {
        return false;
    }
    const rect = this.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}"#;

/// Probe adapter over a Chrome tab reached through the DevTools Protocol
///
/// Chrome must already be running with `--remote-debugging-port`. The adapter
/// owns a tokio runtime and blocks on each CDP call, so callers stay synchronous.
pub struct CdpProbe {
    runtime: Runtime,
    _browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl CdpProbe {
    /// Attach to the Chrome instance listening on `debugging_port`
    pub fn connect(debugging_port: u16) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let (browser, page, handler_task) = runtime.block_on(attach(debugging_port))?;

        Ok(Self {
            runtime,
            _browser: browser,
            page,
            handler_task,
        })
    }

    /// Navigate the tab and wait for the load to finish
    pub fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to {}", url);
        let page = &self.page;
        self.runtime.block_on(async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<_, Error>(())
        })
    }

    /// Focus an element and type `text` into it
    pub fn fill(&self, element: &Element, text: &str) -> Result<()> {
        self.runtime.block_on(async {
            element.click().await?;
            element.type_str(text).await?;
            Ok::<_, Error>(())
        })
    }

    pub fn click(&self, element: &Element) -> Result<()> {
        self.runtime.block_on(async {
            element.click().await?;
            Ok::<_, Error>(())
        })
    }

    /// Current page HTML
    pub fn content(&self) -> Result<String> {
        let page = &self.page;
        Ok(self.runtime.block_on(page.content())?)
    }

    pub fn pause(&self, duration: Duration) {
        self.runtime.block_on(tokio::time::sleep(duration));
    }
}

impl Drop for CdpProbe {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

impl Probe for CdpProbe {
    type Element = Element;

    fn locate(&mut self, selector: &str, timeout: Duration) -> std::result::Result<Element, ProbeError> {
        let page = &self.page;
        self.runtime.block_on(wait_for_selector(page, selector, timeout))
    }

    fn is_visible(&mut self, element: &Element) -> std::result::Result<bool, ProbeError> {
        let returns = self
            .runtime
            .block_on(element.call_js_fn(VISIBILITY_FN, false))
            .map_err(|e| classify("<element>", e))?;

        Ok(returns
            .result
            .value
            .as_ref()
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    fn query(&mut self, selector: &str) -> std::result::Result<Option<Element>, ProbeError> {
        let page = &self.page;
        match self.runtime.block_on(page.find_element(selector)) {
            Ok(element) => Ok(Some(element)),
            Err(e) => match classify(selector, e) {
                ProbeError::NotFound { .. } => Ok(None),
                other => Err(other),
            },
        }
    }
}

async fn attach(debugging_port: u16) -> Result<(Browser, Page, JoinHandle<()>)> {
    let ws_url = format!("http://localhost:{}", debugging_port);
    tracing::info!("Connecting to Chrome on port {}", debugging_port);

    let (browser, mut handler) = {
        let mut retries = CONNECT_ATTEMPTS;
        loop {
            tracing::debug!("Attempting CDP connection to {}...", ws_url);
            match Browser::connect(&ws_url).await {
                Ok(result) => {
                    tracing::info!("CDP connection established");
                    break result;
                }
                Err(e) => {
                    retries -= 1;
                    if retries == 0 {
                        return Err(Error::Cdp(format!(
                            "Failed to connect to Chrome on port {} after {} attempts: {}",
                            debugging_port, CONNECT_ATTEMPTS, e
                        )));
                    }
                    tracing::debug!("CDP connection attempt failed, retrying... ({} left)", retries);
                    tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                }
            }
        }
    };

    // Commands only complete while the handler is being polled
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::debug!("CDP handler event error (continuing): {}", e);
            }
        }
    });

    let page = match browser.pages().await?.into_iter().next() {
        Some(page) => {
            tracing::debug!("Using existing tab");
            page
        }
        None => {
            tracing::debug!("No open tabs, creating one");
            browser.new_page("about:blank").await?
        }
    };

    Ok((browser, page, handler_task))
}

async fn wait_for_selector(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> std::result::Result<Element, ProbeError> {
    let deadline = Instant::now() + timeout;

    loop {
        match page.find_element(selector).await {
            Ok(element) => return Ok(element),
            Err(e) => match classify(selector, e) {
                ProbeError::NotFound { .. } => {}
                other => return Err(other),
            },
        }

        if Instant::now() >= deadline {
            return Err(ProbeError::Timeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Map a CDP failure onto the probe error taxonomy
fn classify(selector: &str, err: CdpError) -> ProbeError {
    match err {
        CdpError::NotFound => ProbeError::NotFound {
            selector: selector.to_string(),
        },
        lost @ (CdpError::Ws(_)
        | CdpError::Io(_)
        | CdpError::ChannelSendError(_)
        | CdpError::NoResponse) => ProbeError::Disconnected(lost.to_string()),
        CdpError::Chrome(e) => classify_chrome_message(selector, &e.message),
        CdpError::ChromeMessage(message) => classify_chrome_message(selector, &message),
        other => ProbeError::Protocol(other.to_string()),
    }
}

/// Chrome reports DOM failures only as a message string
fn classify_chrome_message(selector: &str, message: &str) -> ProbeError {
    let lower = message.to_lowercase();

    if lower.contains("could not find node") {
        ProbeError::NotFound {
            selector: selector.to_string(),
        }
    } else if lower.contains("error while querying")
        || lower.contains("not a valid selector")
        || lower.contains("syntaxerror")
    {
        ProbeError::InvalidSelector {
            selector: selector.to_string(),
            reason: message.to_string(),
        }
    } else if lower.contains("target closed") || lower.contains("session closed") {
        ProbeError::Disconnected(message.to_string())
    } else {
        ProbeError::Protocol(message.to_string())
    }
}
