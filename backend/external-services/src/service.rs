use std::{str::FromStr, time::Duration};

use common_utils::{
    request::{Headers, Method, Request, RequestContent},
    CustomResult,
};
use domain_types::{errors::ApiClientError, router_response_types::Response, types::Proxy};
use error_stack::{report, ResultExt};
use reqwest::Client;
use serde_json::{json, Value};

/// Outbound HTTP seam of the connector. The reqwest implementation is used in
/// production; tests substitute a recording fake.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// `Ok(Ok(_))` for a success status, `Ok(Err(_))` for a 4xx/5xx answer, `Err` when
    /// no usable answer was received.
    async fn send(&self, request: Request)
        -> CustomResult<Result<Response, Response>, ApiClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    proxied_client: Client,
    direct_client: Client,
    bypass_proxy_urls: Vec<String>,
}

impl ReqwestTransport {
    pub fn new(proxy_config: &Proxy, timeout: Duration) -> CustomResult<Self, ApiClientError> {
        let direct_client = build_client(proxy_config, true, timeout)?;
        let proxied_client = if proxy_config.is_configured() {
            build_client(proxy_config, false, timeout)?
        } else {
            direct_client.clone()
        };
        Ok(Self {
            proxied_client,
            direct_client,
            bypass_proxy_urls: proxy_config.bypass_proxy_urls.clone(),
        })
    }

    fn client_for(&self, url: &reqwest::Url) -> &Client {
        if self.bypass_proxy_urls.contains(&url.to_string()) {
            &self.direct_client
        } else {
            &self.proxied_client
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    #[tracing::instrument(skip_all, fields(method = %request.method, url = %request.url))]
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        call_connector_api(self, request).await
    }
}

pub async fn call_connector_api(
    transport: &ReqwestTransport,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    debug_log(
        "OUTGOING_REQUEST",
        &json!({
            "method": request.method.to_string(),
            "url": request.url,
            "headers": request.get_masked_headers(),
        }),
    );

    let client = transport.client_for(&url);
    let headers = request.headers.construct_header_map()?;

    let request = {
        match request.method {
            Method::Get => client.get(url),
            Method::Post => match request.body {
                Some(RequestContent::Json(payload)) => client.post(url).json(&payload),
                None => client.post(url),
            },
        }
        .add_headers(headers)
    };

    let response = request.send().await.map_err(|error| {
        let api_error = match error {
            error if error.is_timeout() => ApiClientError::RequestTimeoutReceived,
            _ => ApiClientError::RequestNotSent(error.to_string()),
        };
        error_log(
            "REQUEST_FAILURE",
            &json!(format!("Unable to send request to connector. Error: {api_error}")),
        );
        report!(api_error)
    })?;

    handle_response(response).await
}

fn build_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
    timeout: Duration,
) -> CustomResult<Client, ApiClientError> {
    get_client_builder(proxy_config, should_bypass_proxy)?
        .timeout(timeout)
        .build()
        .change_context(ApiClientError::ClientConstructionFailed)
        .inspect_err(|err| {
            error_log(
                "ERROR",
                &json!(format!("Failed to construct base client. Error: {:?}", err)),
            );
        })
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    error_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    error_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

pub async fn handle_response(
    resp: reqwest::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = resp.status().as_u16();
    let headers = Some(resp.headers().to_owned());
    match status_code {
        200..=299 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Ok(Response {
                headers,
                response,
                status_code,
            }))
        }
        400..=599 => {
            let bytes = resp.bytes().await.map_err(|error| {
                report!(error).change_context(ApiClientError::ResponseDecodingFailed)
            })?;
            Ok(Err(Response {
                headers,
                response: bytes,
                status_code,
            }))
        }
        _ => {
            info_log(
                "UNEXPECTED_RESPONSE",
                &json!(format!("Unexpected response from server: {status_code}")),
            );
            Err(report!(ApiClientError::UnexpectedServerResponse))
        }
    }
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = header_value.into_inner();
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}

#[inline]
pub fn debug_log(action: &str, message: &Value) {
    tracing::debug!(tags = %action, json_value= %message);
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}

#[inline]
pub fn error_log(action: &str, message: &Value) {
    tracing::error!(tags = %action, json_value= %message);
}
