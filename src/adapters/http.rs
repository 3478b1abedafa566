//! HTTP report adapter.
//!
//! Implements [`ReportPort`] with one blocking POST per call.
//!
//! - **`target_os = "espidf"`**: `embedded_svc` HTTP client over
//!   `EspHttpConnection`.  A fresh connection is opened per report; at one
//!   request per 15 s keep-alive buys nothing.
//! - **all other targets**: logs the request and answers `200`.

#[cfg(target_os = "espidf")]
use core::fmt::Write as _;
#[cfg(target_os = "espidf")]
use core::time::Duration;

#[cfg(target_os = "espidf")]
use embedded_svc::{http::client::Client as HttpClient, io::Write as _, utils::io::try_read_full};
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use log::warn;

use crate::app::ports::ReportPort;
use crate::app::reporter::{ReportRequest, ReportResponse};
use crate::error::ReportError;

#[cfg(target_os = "espidf")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpReporter {
    sent: u32,
}

impl Default for HttpReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpReporter {
    pub fn new() -> Self {
        Self { sent: 0 }
    }

    /// POSTs attempted since boot.
    pub fn sent(&self) -> u32 {
        self.sent
    }

    #[cfg(target_os = "espidf")]
    fn platform_post(&mut self, req: &ReportRequest) -> Result<ReportResponse, ReportError> {
        let conn = EspHttpConnection::new(&Configuration {
            timeout: Some(HTTP_TIMEOUT),
            ..Default::default()
        })
        .map_err(|e| {
            warn!("http: connect: {e}");
            ReportError::ConnectFailed
        })?;
        let mut client = HttpClient::wrap(conn);

        let mut content_len = heapless::String::<8>::new();
        let _ = write!(content_len, "{}", req.body.len());
        let headers = [
            ("Content-Type", req.content_type),
            ("Content-Length", content_len.as_str()),
        ];

        let url = req.url();
        let mut request = client.post(url.as_str(), &headers).map_err(|e| {
            warn!("http: open {url}: {e}");
            ReportError::ConnectFailed
        })?;
        request.write_all(req.body.as_bytes()).map_err(|e| {
            warn!("http: write: {e:?}");
            ReportError::RequestFailed
        })?;
        request.flush().map_err(|_| ReportError::RequestFailed)?;

        let mut response = request.submit().map_err(|e| {
            warn!("http: submit: {e}");
            ReportError::RequestFailed
        })?;
        let status = response.status();

        let mut buf = [0_u8; 64];
        let n = try_read_full(&mut response, &mut buf).map_err(|(e, _)| {
            warn!("http: read: {e:?}");
            ReportError::ResponseFailed
        })?;

        Ok(ReportResponse {
            status,
            body: lossy_body(&buf[..n]),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_post(&mut self, req: &ReportRequest) -> Result<ReportResponse, ReportError> {
        log::debug!("http(sim): POST {} {}", req.url(), req.body);
        Ok(ReportResponse {
            status: 200,
            body: lossy_body(b"0"),
        })
    }
}

impl ReportPort for HttpReporter {
    fn post_form(&mut self, request: &ReportRequest) -> Result<ReportResponse, ReportError> {
        self.sent = self.sent.wrapping_add(1);
        let res = self.platform_post(request);
        if let Err(e) = &res {
            warn!("http: report #{} failed: {e}", self.sent);
        }
        res
    }
}

/// Keep the printable prefix of a response body.
fn lossy_body(bytes: &[u8]) -> heapless::String<64> {
    let mut out = heapless::String::new();
    for ch in String::from_utf8_lossy(bytes).chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
