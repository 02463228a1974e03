use std::fs;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, Response, Url};
use secrecy::SecretString;
use serde::{de::DeserializeOwned, Serialize};

use crate::compute::{
    CapacityReservation, CapacityReservationRequest, ComputeApi, Instance, InstanceConfiguration,
    InstanceConfigurationRequest, InstancePool, InstancePoolRequest, LaunchRequest, PoolInstance,
    ReservationConfig,
};
use crate::config::{expand_home, FleetConfig};
use crate::error::FleetError;

use super::models::{
    CapacityReservationBody, CreateCapacityReservationDetails, CreateInstanceConfigurationDetails,
    CreateInstancePoolDetails, DetachInstancePoolInstanceDetails, InstanceBody,
    InstanceConfigurationBody, InstancePoolBody, InstanceReservationConfig, InstanceSummaryBody,
    LaunchInstanceDetails, ServiceError, UpdateCapacityReservationDetails,
    UpdateInstancePoolDetails,
};
use super::signer::RequestSigner;

const API_VERSION: &str = "20160918";
const REQUEST_ID_HEADER: &str = "opc-request-id";
const NEXT_PAGE_HEADER: &str = "opc-next-page";

/// Regional endpoint of the Core Services API.
pub fn regional_endpoint(region: &str) -> String {
    format!("https://iaas.{region}.oraclecloud.com/{API_VERSION}")
}

/// Signed REST client for the compute control plane.
///
/// Cloning is cheap; clones share the connection pool and the signing key.
#[derive(Debug, Clone)]
pub struct OciClient {
    client: Client,
    base_url: String,
    signer: std::sync::Arc<RequestSigner>,
}

impl OciClient {
    /// Builds a client from the credential fields of `config`.
    ///
    /// The private key is read and parsed here so that a bad key fails
    /// before any request is made.
    pub fn from_config(config: &FleetConfig) -> Result<Self, FleetError> {
        config.validate_auth()?;
        let key_path = expand_home(&config.private_key_path)?;
        let pem = fs::read_to_string(&key_path).map_err(|e| {
            FleetError::AuthError(format!(
                "cannot read private key {}: {e}",
                key_path.display()
            ))
        })?;
        let signer = RequestSigner::from_pem(
            &config.tenancy_ocid,
            &config.user_ocid,
            &config.fingerprint,
            &SecretString::new(pem),
        )?;
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| regional_endpoint(&config.region));
        Self::new(endpoint, signer, Some(config.request_timeout()))
    }

    pub fn new(
        endpoint: impl Into<String>,
        signer: RequestSigner,
        timeout: Option<Duration>,
    ) -> Result<Self, FleetError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let base_url = endpoint.into().trim_end_matches('/').to_string();
        log::debug!("compute endpoint {base_url} as {}", signer.key_id());
        Ok(Self {
            client: builder.build()?,
            base_url,
            signer: std::sync::Arc::new(signer),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, FleetError> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|e| FleetError::InvalidRequest(format!("bad endpoint {}: {e}", self.base_url)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        context: &str,
    ) -> Result<Response, FleetError> {
        let url = self.url(path, query)?;
        let payload = body.map(serde_json::to_vec).transpose()?;

        if log::log_enabled!(log::Level::Trace) {
            if let Some(bytes) = &payload {
                log::trace!("{context} payload: {}", String::from_utf8_lossy(bytes));
            }
        }

        let signed = self
            .signer
            .sign(&method, &url, payload.as_deref(), Utc::now())?;
        let mut request = self
            .client
            .request(method, url)
            .header("date", signed.date)
            .header("authorization", signed.authorization);
        if let (Some(content), Some(bytes)) = (signed.content, payload) {
            request = request
                .header("content-type", content.content_type)
                .header("x-content-sha256", content.content_sha256)
                .body(bytes);
        }

        let response = request.send().await?;
        ensure_success(response, context).await
    }

    async fn call<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: &str,
    ) -> Result<T, FleetError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let response = self.send(method, path, &[], body, context).await?;
        decode(response, context).await
    }

    async fn call_empty<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: &str,
    ) -> Result<(), FleetError> {
        self.send(method, path, &[], body, context).await?;
        Ok(())
    }

    /// Follows `opc-next-page` until the listing is exhausted.
    async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        compartment_id: &str,
        context: &str,
    ) -> Result<Vec<T>, FleetError> {
        let mut items = Vec::new();
        let mut page: Option<String> = None;
        loop {
            let mut query = vec![("compartmentId", compartment_id)];
            if let Some(token) = page.as_deref() {
                query.push(("page", token));
            }
            let response = self
                .send::<()>(Method::GET, path, &query, None, context)
                .await?;
            let next = response
                .headers()
                .get(NEXT_PAGE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let batch: Vec<T> = decode(response, context).await?;
            items.extend(batch);
            match next {
                Some(token) if !token.is_empty() => page = Some(token),
                _ => break,
            }
        }
        Ok(items)
    }
}

async fn ensure_success(response: Response, context: &str) -> Result<Response, FleetError> {
    let status = response.status();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    log::debug!("{context} HTTP status: {status} (opc-request-id {request_id})");
    if status.is_success() {
        return Ok(response);
    }

    let raw = response.text().await?;
    let error: ServiceError = serde_json::from_str(&raw).unwrap_or_else(|_| ServiceError {
        code: status.canonical_reason().unwrap_or("Unknown").to_string(),
        message: raw.clone(),
    });
    log::warn!(
        "{context} failed with {status} {} (opc-request-id {request_id})",
        error.code
    );
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(FleetError::AuthError(format!(
            "{context}: {} {}",
            error.code, error.message
        )));
    }
    Err(FleetError::ApiError {
        status: status.as_u16(),
        code: error.code,
        message: error.message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, FleetError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| FleetError::ResponseFormatError {
        message: format!("Failed to decode {context} response: {e}"),
        raw_response: text,
    })
}

#[async_trait]
impl ComputeApi for OciClient {
    async fn launch_instance(&self, request: &LaunchRequest) -> Result<Instance, FleetError> {
        let body = LaunchInstanceDetails::from(request);
        let instance: InstanceBody = self
            .call(Method::POST, "/instances/", Some(&body), "LaunchInstance")
            .await?;
        Ok(instance.into())
    }

    async fn get_instance(&self, instance_id: &str) -> Result<Instance, FleetError> {
        let instance: InstanceBody = self
            .call::<_, ()>(
                Method::GET,
                &format!("/instances/{instance_id}"),
                None,
                "GetInstance",
            )
            .await?;
        Ok(instance.into())
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<(), FleetError> {
        self.call_empty::<()>(
            Method::DELETE,
            &format!("/instances/{instance_id}"),
            None,
            "TerminateInstance",
        )
        .await
    }

    async fn create_instance_configuration(
        &self,
        request: &InstanceConfigurationRequest,
    ) -> Result<InstanceConfiguration, FleetError> {
        let body = CreateInstanceConfigurationDetails::from(request);
        let config: InstanceConfigurationBody = self
            .call(
                Method::POST,
                "/instanceConfigurations",
                Some(&body),
                "CreateInstanceConfiguration",
            )
            .await?;
        Ok(config.into())
    }

    async fn create_instance_pool(
        &self,
        request: &InstancePoolRequest,
    ) -> Result<InstancePool, FleetError> {
        let body = CreateInstancePoolDetails::from(request);
        let pool: InstancePoolBody = self
            .call(Method::POST, "/instancePools", Some(&body), "CreateInstancePool")
            .await?;
        Ok(pool.into())
    }

    async fn get_instance_pool(&self, pool_id: &str) -> Result<InstancePool, FleetError> {
        let pool: InstancePoolBody = self
            .call::<_, ()>(
                Method::GET,
                &format!("/instancePools/{pool_id}"),
                None,
                "GetInstancePool",
            )
            .await?;
        Ok(pool.into())
    }

    async fn update_instance_pool(
        &self,
        pool_id: &str,
        size: u32,
    ) -> Result<InstancePool, FleetError> {
        let pool: InstancePoolBody = self
            .call(
                Method::PUT,
                &format!("/instancePools/{pool_id}"),
                Some(&UpdateInstancePoolDetails { size }),
                "UpdateInstancePool",
            )
            .await?;
        Ok(pool.into())
    }

    async fn terminate_instance_pool(&self, pool_id: &str) -> Result<(), FleetError> {
        self.call_empty::<()>(
            Method::DELETE,
            &format!("/instancePools/{pool_id}"),
            None,
            "TerminateInstancePool",
        )
        .await
    }

    async fn detach_pool_instance(
        &self,
        pool_id: &str,
        instance_id: &str,
    ) -> Result<(), FleetError> {
        let body = DetachInstancePoolInstanceDetails {
            instance_id: instance_id.to_string(),
            is_decrement_size: true,
            is_auto_terminate: true,
        };
        self.call_empty(
            Method::POST,
            &format!("/instancePools/{pool_id}/actions/detachInstance"),
            Some(&body),
            "DetachInstancePoolInstance",
        )
        .await
    }

    async fn list_instance_pool_instances(
        &self,
        compartment_id: &str,
        pool_id: &str,
    ) -> Result<Vec<PoolInstance>, FleetError> {
        let instances: Vec<InstanceSummaryBody> = self
            .list_all(
                &format!("/instancePools/{pool_id}/instances"),
                compartment_id,
                "ListInstancePoolInstances",
            )
            .await?;
        Ok(instances.into_iter().map(Into::into).collect())
    }

    async fn create_capacity_reservation(
        &self,
        request: &CapacityReservationRequest,
    ) -> Result<CapacityReservation, FleetError> {
        let body = CreateCapacityReservationDetails::from(request);
        let reservation: CapacityReservationBody = self
            .call(
                Method::POST,
                "/computeCapacityReservations",
                Some(&body),
                "CreateComputeCapacityReservation",
            )
            .await?;
        Ok(reservation.into())
    }

    async fn get_capacity_reservation(
        &self,
        reservation_id: &str,
    ) -> Result<CapacityReservation, FleetError> {
        let reservation: CapacityReservationBody = self
            .call::<_, ()>(
                Method::GET,
                &format!("/computeCapacityReservations/{reservation_id}"),
                None,
                "GetComputeCapacityReservation",
            )
            .await?;
        Ok(reservation.into())
    }

    async fn update_capacity_reservation(
        &self,
        reservation_id: &str,
        configs: &[ReservationConfig],
    ) -> Result<CapacityReservation, FleetError> {
        let body = UpdateCapacityReservationDetails {
            instance_reservation_configs: configs
                .iter()
                .map(InstanceReservationConfig::from)
                .collect(),
        };
        self.call_empty(
            Method::PUT,
            &format!("/computeCapacityReservations/{reservation_id}"),
            Some(&body),
            "UpdateComputeCapacityReservation",
        )
        .await?;
        // the update is accepted asynchronously and returns no body
        self.get_capacity_reservation(reservation_id).await
    }

    async fn delete_capacity_reservation(&self, reservation_id: &str) -> Result<(), FleetError> {
        self.call_empty::<()>(
            Method::DELETE,
            &format!("/computeCapacityReservations/{reservation_id}"),
            None,
            "DeleteComputeCapacityReservation",
        )
        .await
    }

    async fn list_capacity_reservations(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<CapacityReservation>, FleetError> {
        let reservations: Vec<CapacityReservationBody> = self
            .list_all(
                "/computeCapacityReservations",
                compartment_id,
                "ListComputeCapacityReservations",
            )
            .await?;
        Ok(reservations.into_iter().map(Into::into).collect())
    }
}
