//! Blocking HTTP client for the Workforce Hub REST backend.

use super::{AttendanceService, ServiceError, ServiceResult};
use crate::config::Config;
use crate::models::attendance::{AttendanceRecord, ClockRequest, EmployeeProfile};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const TODAY_PATH: &str = "attendance/today";
const CLOCK_IN_PATH: &str = "attendance/clock-in";
const CLOCK_OUT_PATH: &str = "attendance/clock-out";
const PROFILE_PATH: &str = "employees/profile";

pub struct HttpAttendanceService {
    base_url: String,
    client: Client,
}

impl HttpAttendanceService {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout: Option<Duration>,
    ) -> ServiceResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|e| ServiceError::Transport(format!("invalid auth header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Transport(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(cfg: &Config) -> ServiceResult<Self> {
        Self::new(
            &cfg.api_base_url,
            cfg.resolved_token().as_deref(),
            cfg.request_timeout(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send and turn non-2xx responses into `ServiceError::Status`.
    fn send(&self, req: RequestBuilder) -> ServiceResult<Response> {
        let resp = req
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().unwrap_or_default();
            warn!(status = status.as_u16(), body = body.as_str(), "attendance service rejected request");
            Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn decode<T: DeserializeOwned>(resp: Response) -> ServiceResult<T> {
        let text = resp
            .text()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Decode(e.to_string()))
    }

    fn post_clock(&self, path: &str, request: &ClockRequest) -> ServiceResult<AttendanceRecord> {
        let resp = self.send(self.client.post(self.url(path)).json(request))?;
        Self::decode(resp)
    }
}

impl AttendanceService for HttpAttendanceService {
    #[instrument(skip(self))]
    fn profile(&self) -> ServiceResult<EmployeeProfile> {
        let resp = self.send(self.client.get(self.url(PROFILE_PATH)))?;
        Self::decode(resp)
    }

    #[instrument(skip(self))]
    fn today_attendance(&self) -> ServiceResult<Option<AttendanceRecord>> {
        let result = self.send(self.client.get(self.url(TODAY_PATH)));

        let resp = match result {
            Err(ServiceError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                debug!("no attendance record for today");
                return Ok(None);
            }
            other => other?,
        };

        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = resp
            .text()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    #[instrument(skip(self, request), fields(employee = %request.employee_id))]
    fn clock_in(&self, request: &ClockRequest) -> ServiceResult<AttendanceRecord> {
        self.post_clock(CLOCK_IN_PATH, request)
    }

    #[instrument(skip(self, request), fields(employee = %request.employee_id))]
    fn clock_out(&self, request: &ClockRequest) -> ServiceResult<AttendanceRecord> {
        self.post_clock(CLOCK_OUT_PATH, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// One-shot HTTP server answering a single request with `status` and
    /// `body`. Returns the base URL and a handle yielding the raw request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap_or(0);
                }
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                head.push_str(&line);
            }
            let mut payload = vec![0u8; content_length];
            reader.read_exact(&mut payload).unwrap();
            head.push_str(&String::from_utf8_lossy(&payload));

            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            head
        });

        (format!("http://{addr}/api"), handle)
    }

    #[test]
    fn clock_in_posts_json_with_bearer_token() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"recordId":"att-1","clockInTime":"09:00:00","clockOutTime":null,"totalHours":0}"#,
        );
        let svc = HttpAttendanceService::new(&base, Some("tok"), None).unwrap();

        let rec = svc
            .clock_in(&ClockRequest {
                employee_id: "E-1".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(rec.record_id, "att-1");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/attendance/clock-in"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer tok"));
        assert!(request.contains(r#""employeeId":"E-1""#));
    }

    #[test]
    fn rejected_clock_in_keeps_status_and_body() {
        let (base, server) = serve_once("400 Bad Request", "Employee already clocked in");
        let svc = HttpAttendanceService::new(&base, None, None).unwrap();

        let err = svc
            .clock_in(&ClockRequest {
                employee_id: "E-1".into(),
                ..Default::default()
            })
            .unwrap_err();
        server.join().unwrap();

        assert_eq!(
            err,
            ServiceError::Status {
                status: 400,
                body: "Employee already clocked in".into()
            }
        );
        assert!(err.is_already_clocked_in());
    }

    #[test]
    fn today_not_found_means_no_record() {
        let (base, server) = serve_once("404 Not Found", "");
        let svc = HttpAttendanceService::new(&base, None, None).unwrap();

        assert_eq!(svc.today_attendance().unwrap(), None);
        server.join().unwrap();
    }

    #[test]
    fn today_null_body_means_no_record() {
        let (base, server) = serve_once("200 OK", "null");
        let svc = HttpAttendanceService::new(&base, None, None).unwrap();

        assert_eq!(svc.today_attendance().unwrap(), None);
        server.join().unwrap();
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let (base, server) = serve_once("200 OK", "{not json");
        let svc = HttpAttendanceService::new(&base, None, None).unwrap();

        assert!(matches!(svc.profile(), Err(ServiceError::Decode(_))));
        server.join().unwrap();
    }

    #[test]
    fn unreachable_server_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let svc = HttpAttendanceService::new(&format!("http://{addr}"), None, None).unwrap();
        assert!(matches!(
            svc.today_attendance(),
            Err(ServiceError::Transport(_))
        ));
    }
}
