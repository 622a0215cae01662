use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::construction_errors::CollaboratorError;
use super::construction_model::{
    ConstructedPortfolio, ConstructionRequest, ConstructionResponse, RebalanceOutcome,
    RebalanceRequest, RebalanceResponse,
};
use super::construction_traits::PortfolioBuilderTrait;
use crate::constants::{DEFAULT_COLLABORATOR_TIMEOUT_SECS, REBALANCE_REJECTION_STATUSES};
use crate::errors::{Error, Result};

/// HTTP client for the construction and rebalance endpoints.
#[derive(Clone)]
pub struct PortfolioBuilderClient {
    client: Client,
    construction_url: String,
    rebalance_url: String,
}

impl PortfolioBuilderClient {
    pub fn new(
        construction_url: impl Into<String>,
        rebalance_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            construction_url: construction_url.into(),
            rebalance_url: rebalance_url.into(),
        })
    }

    pub fn with_default_timeout(
        construction_url: impl Into<String>,
        rebalance_url: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            construction_url,
            rebalance_url,
            Duration::from_secs(DEFAULT_COLLABORATOR_TIMEOUT_SECS),
        )
    }

    /// POSTs `body` as JSON and returns the status with the decoded reply.
    /// A body that isn't the expected JSON decodes to `None`.
    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<(StatusCode, Option<R>)>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Portfolio service at {} unreachable: {}", url, e);
                CollaboratorError::Transport(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;
        info!(
            "Portfolio service {} responded {} in {:?}",
            url,
            status,
            started.elapsed()
        );

        Ok((status, serde_json::from_str(&text).ok()))
    }
}

#[async_trait]
impl PortfolioBuilderTrait for PortfolioBuilderClient {
    async fn construct(&self, request: &ConstructionRequest) -> Result<ConstructedPortfolio> {
        let (status, body) = self
            .post_json::<_, ConstructionResponse>(&self.construction_url, request)
            .await?;

        let Some(body) = body else {
            return Err(CollaboratorError::Malformed(format!(
                "construction service returned {} with an unreadable body",
                status
            ))
            .into());
        };

        if !status.is_success() || !body.success {
            return Err(CollaboratorError::Failed {
                status: status.as_u16(),
                detail: body
                    .detail
                    .unwrap_or_else(|| "Unknown error from API".to_string()),
            }
            .into());
        }

        Ok(ConstructedPortfolio {
            no_of_stocks: body.no_of_stocks.unwrap_or(request.no_of_stocks),
            portfolio: body.portfolio,
            total_invested: body.total_invested,
            free_cash: body.free_cash,
        })
    }

    async fn rebalance(&self, request: &RebalanceRequest) -> Result<RebalanceOutcome> {
        let (status, body) = self
            .post_json::<_, RebalanceResponse>(&self.rebalance_url, request)
            .await?;
        let code = status.as_u16();
        let success = body.as_ref().map(|b| b.success).unwrap_or(false);
        let detail = body.and_then(|b| b.detail);

        if REBALANCE_REJECTION_STATUSES.contains(&code) {
            if let Some(detail) = detail {
                info!(
                    "Rebalance of portfolio {} rejected ({}): {}",
                    request.portfolio_id, code, detail
                );
                return Ok(RebalanceOutcome::Rejected {
                    status: code,
                    detail,
                });
            }
        }

        if !status.is_success() || !success {
            return Err(CollaboratorError::Failed {
                status: code,
                detail: detail.unwrap_or_else(|| "Unknown error from rebalance API".to_string()),
            }
            .into());
        }

        Ok(RebalanceOutcome::Completed)
    }
}
