//! Named HTTP client the MVC front end uses to reach the Northwind service.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::AppConfig;
use crate::entities::customer::Model as Customer;
use crate::errors::{ErrorResponse, ServiceError};
use crate::tracing::{current_request_id, REQUEST_ID_HEADER};
use crate::validation::FieldErrors;

/// Name the client is registered under; shows up in logs
pub const NORTHWIND_SERVICE: &str = "Northwind.WebApi";

/// Pooled client for the customer endpoints of the service.
///
/// Built once at startup; cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct NorthwindServiceClient {
    name: &'static str,
    http: reqwest::Client,
    base_url: Url,
}

impl NorthwindServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ServiceError::InternalError(format!("invalid service base URL {}: {}", base_url, e))
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()?;

        Ok(Self {
            name: NORTHWIND_SERVICE,
            http,
            base_url,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(&config.service_base_url, config.http_client_timeout())
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/seg/seg/...`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ServiceError::InternalError(format!(
                    "service base URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_request_id(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match current_request_id() {
            Some(id) => request.header(REQUEST_ID_HEADER, id.as_str()),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ServiceError> {
        let response = self.with_request_id(request).send().await.map_err(|e| {
            warn!(client = self.name, error = %e, "service call failed");
            ServiceError::from(e)
        })?;
        debug!(client = self.name, status = %response.status(), url = %response.url(), "service responded");
        Ok(response)
    }

    /// GET /api/customers[?country=X]
    #[instrument(skip(self))]
    pub async fn list_customers(&self, country: Option<&str>) -> Result<Vec<Customer>, ServiceError> {
        let mut request = self.http.get(self.endpoint(&["api", "customers"])?);
        if let Some(country) = country.filter(|c| !c.is_empty()) {
            request = request.query(&[("country", country)]);
        }
        let response = self.send(request).await?;
        json_or_error(response).await
    }

    /// GET /api/customers/:id; `None` when the service answers 404
    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: &str) -> Result<Option<Customer>, ServiceError> {
        let request = self.http.get(self.endpoint(&["api", "customers", id])?);
        let response = self.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        json_or_error(response).await.map(Some)
    }

    /// POST /api/customers
    #[instrument(skip(self, customer), fields(customer_id = %customer.customer_id))]
    pub async fn create_customer(&self, customer: &Customer) -> Result<Customer, ServiceError> {
        let request = self
            .http
            .post(self.endpoint(&["api", "customers"])?)
            .json(customer);
        let response = self.send(request).await?;
        json_or_error(response).await
    }

    /// PUT /api/customers/:id
    #[instrument(skip(self, customer))]
    pub async fn update_customer(
        &self,
        id: &str,
        customer: &Customer,
    ) -> Result<Customer, ServiceError> {
        let request = self
            .http
            .put(self.endpoint(&["api", "customers", id])?)
            .json(customer);
        let response = self.send(request).await?;
        json_or_error(response).await
    }

    /// DELETE /api/customers/:id
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: &str) -> Result<(), ServiceError> {
        let request = self.http.delete(self.endpoint(&["api", "customers", id])?);
        let response = self.send(request).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }
}

async fn json_or_error<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    if response.status().is_success() {
        Ok(response.json::<T>().await?)
    } else {
        Err(error_from(response).await)
    }
}

/// Maps a failed service response onto the local error taxonomy.
async fn error_from(response: Response) -> ServiceError {
    let status = response.status();
    let body = response.json::<ErrorResponse>().await.ok();
    let message = body
        .as_ref()
        .map(|b| b.message.clone())
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(message),
        StatusCode::CONFLICT => ServiceError::Conflict(message),
        StatusCode::BAD_REQUEST => match body.and_then(|b| b.errors) {
            Some(errors) if !errors.is_empty() => {
                let mut fields = FieldErrors::new();
                for error in errors {
                    fields.push(error.field, error.message);
                }
                ServiceError::ValidationError(fields)
            }
            _ => ServiceError::BadRequest(message),
        },
        _ => ServiceError::ExternalServiceError(format!(
            "{} answered {}: {}",
            NORTHWIND_SERVICE, status, message
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> NorthwindServiceClient {
        NorthwindServiceClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn customer_json(id: &str, country: &str) -> serde_json::Value {
        serde_json::json!({
            "customer_id": id,
            "company_name": format!("{} Company", id),
            "country": country,
        })
    }

    #[test]
    fn endpoint_escapes_segments_and_keeps_base_path() {
        let client =
            NorthwindServiceClient::new("http://localhost:5002/northwind/", Duration::from_secs(1))
                .unwrap();
        let url = client.endpoint(&["api", "customers", "A B/C"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5002/northwind/api/customers/A%20B%2FC"
        );
    }

    #[tokio::test]
    async fn list_passes_country_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/customers"))
            .and(query_param("country", "UK"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(vec![customer_json("AROUT", "UK")]),
            )
            .expect(1)
            .mount(&server)
            .await;

        let customers = client(&server).list_customers(Some("UK")).await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].customer_id, "AROUT");
    }

    #[tokio::test]
    async fn missing_customer_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/customers/ZZZZZ"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(client(&server).get_customer("ZZZZZ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn request_id_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/customers/BONAP"))
            .and(header(REQUEST_ID_HEADER, "mvc-req-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        crate::tracing::scope_request_id(crate::tracing::RequestId::new("mvc-req-1"), async {
            client.delete_customer("BONAP").await
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn error_statuses_map_to_service_errors() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/customers/ALFKI"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": "Conflict",
                "message": "Customer ALFKI has 2 order(s) and cannot be deleted",
                "timestamp": "2024-01-01T00:00:00Z",
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/customers"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "Bad Request",
                "message": "Validation failed",
                "errors": [{"field": "company_name", "message": "This field is required"}],
                "timestamp": "2024-01-01T00:00:00Z",
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/customers"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client(&server);
        assert_matches!(
            client.delete_customer("ALFKI").await,
            Err(ServiceError::Conflict(msg)) if msg.contains("2 order")
        );

        let customer: Customer = serde_json::from_value(customer_json("BONAP", "France")).unwrap();
        match client.create_customer(&customer).await {
            Err(ServiceError::ValidationError(fields)) => {
                assert!(fields.contains_field("company_name"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        assert_matches!(
            client.list_customers(None).await,
            Err(ServiceError::ExternalServiceError(_))
        );
    }
}
