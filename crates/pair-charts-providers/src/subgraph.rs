use async_trait::async_trait;
use chrono::Utc;
use pair_charts_core::currency::{Currency, DEFAULT_CHAIN_ID, TokenInfo};
use pair_charts_core::pair::{Pair, PairState};
use pair_charts_core::rate::{HourlyRate, PairRates};
use pair_charts_core::window::TimeWindow;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ProviderError;
use crate::rates::RateHistory;
use crate::resolver::PairResolver;

const SUBGRAPH_URL: &str = "https://subgraph.kuniswap.finance/subgraphs/name/kuniswap/exchange";

/// Wrapped-native token address on KCC; the subgraph only knows wrapped
/// tokens, so native selections map to it.
const WRAPPED_NATIVE_ADDRESS: &str = "0x4446fc4eb47f2f6586f9faab68b3498f86c07521";

const PAIR_QUERY: &str = r#"
query ($a: String!, $b: String!) {
  pairs(first: 1, where: { token0_in: [$a, $b], token1_in: [$a, $b] }) {
    id
    token0 { id symbol decimals }
    token1 { id symbol decimals }
  }
}
"#;

const HOUR_DATA_QUERY: &str = r#"
query ($pair: String!, $start: Int!) {
  pairHourDatas(
    first: 1000, orderBy: hourStartUnix, orderDirection: asc,
    where: { pair: $pair, hourStartUnix_gt: $start }
  ) {
    hourStartUnix
    openRate0
    closeRate0
  }
}
"#;

/// Exchange-subgraph provider for pair resolution and hourly rate history.
/// No authentication required.
pub struct SubgraphProvider {
    client: Client,
    base_url: String,
    chain_id: u64,
}

impl SubgraphProvider {
    pub fn new() -> Self {
        Self::with_base_url(SUBGRAPH_URL.to_string())
    }

    /// Create with a custom endpoint (for tests or alternate deployments).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            chain_id: DEFAULT_CHAIN_ID,
        }
    }

    /// Create from the `PAIR_CHARTS_SUBGRAPH_URL` environment variable.
    pub fn from_env() -> Result<Self, ProviderError> {
        let base_url = std::env::var("PAIR_CHARTS_SUBGRAPH_URL")
            .map_err(|_| ProviderError::Config("PAIR_CHARTS_SUBGRAPH_URL not set".into()))?;
        Ok(Self::with_base_url(base_url))
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ProviderError> {
        debug!(endpoint = %self.base_url, "subgraph query");
        let response = self
            .client
            .post(&self.base_url)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 60,
            });
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status,
                message: body,
            });
        }

        let body: GraphResponse<T> = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("failed to parse response: {e}")))?;

        if let Some(errors) = body.errors
            && !errors.is_empty()
        {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ProviderError::Api { status: 0, message });
        }

        body.data
            .ok_or_else(|| ProviderError::Parse("no data in response".into()))
    }
}

impl Default for SubgraphProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GraphResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphError>>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PairsData {
    pairs: Vec<RawPair>,
}

#[derive(Debug, Deserialize)]
struct RawPair {
    id: String,
    token0: RawToken,
    token1: RawToken,
}

#[derive(Debug, Deserialize)]
struct RawToken {
    id: String,
    symbol: String,
    /// The subgraph serves decimals as a string
    decimals: String,
}

#[derive(Debug, Deserialize)]
struct HourDatasData {
    #[serde(rename = "pairHourDatas")]
    pair_hour_datas: Vec<RawHourData>,
}

#[derive(Debug, Deserialize)]
struct RawHourData {
    #[serde(rename = "hourStartUnix")]
    hour_start_unix: i64,
    /// token1 priced in token0, decimal string
    #[serde(rename = "openRate0")]
    open_rate0: String,
    #[serde(rename = "closeRate0")]
    close_rate0: String,
}

/// Subgraph address for a currency: token address lowercased, or the
/// wrapped-native token for a native selection.
fn currency_address(currency: &Currency) -> String {
    match currency {
        Currency::Native { .. } => WRAPPED_NATIVE_ADDRESS.to_string(),
        Currency::Token(token) => token.address.to_lowercase(),
    }
}

fn parse_token(raw: &RawToken, chain_id: u64) -> Result<TokenInfo, ProviderError> {
    let decimals: u8 = raw
        .decimals
        .parse()
        .map_err(|_| ProviderError::Parse(format!("invalid decimals '{}'", raw.decimals)))?;
    Ok(TokenInfo::new(chain_id, &raw.id, decimals, &raw.symbol))
}

fn parse_decimal(value: &str) -> Result<Decimal, ProviderError> {
    value
        .parse()
        .map_err(|_| ProviderError::Parse(format!("invalid decimal value '{value}'")))
}

fn invert(value: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        Decimal::ONE / value
    }
}

/// Split raw hour rows into the two rate orientations, sorted by timestamp.
/// The subgraph only stores the token0 orientation; the token1 records are
/// its inverse.
fn parse_hour_datas(rows: &[RawHourData]) -> Result<PairRates, ProviderError> {
    let mut rate0 = Vec::with_capacity(rows.len());
    let mut rate1 = Vec::with_capacity(rows.len());

    for row in rows {
        let open = parse_decimal(&row.open_rate0)?;
        let close = parse_decimal(&row.close_rate0)?;
        rate0.push(HourlyRate {
            timestamp: row.hour_start_unix,
            open,
            close,
        });
        rate1.push(HourlyRate {
            timestamp: row.hour_start_unix,
            open: invert(open),
            close: invert(close),
        });
    }

    rate0.sort_by_key(|r| r.timestamp);
    rate1.sort_by_key(|r| r.timestamp);
    Ok(PairRates { rate0, rate1 })
}

#[async_trait]
impl PairResolver for SubgraphProvider {
    fn name(&self) -> &str {
        "subgraph"
    }

    async fn resolve_pair(
        &self,
        currency0: &Currency,
        currency1: &Currency,
    ) -> Result<(PairState, Option<Pair>), ProviderError> {
        let a = currency_address(currency0);
        let b = currency_address(currency1);
        if a == b {
            return Ok((PairState::Invalid, None));
        }

        let data: PairsData = self
            .query(PAIR_QUERY, serde_json::json!({ "a": a, "b": b }))
            .await?;

        let Some(raw) = data.pairs.first() else {
            return Ok((PairState::NotExists, None));
        };

        let token0 = parse_token(&raw.token0, self.chain_id)?;
        let token1 = parse_token(&raw.token1, self.chain_id)?;
        let pair = Pair::new(raw.id.to_lowercase(), token0, token1);
        debug!(address = %pair.address, "resolved pair");
        Ok((PairState::Exists, Some(pair)))
    }
}

#[async_trait]
impl RateHistory for SubgraphProvider {
    fn name(&self) -> &str {
        "subgraph"
    }

    async fn fetch_hourly_rates(
        &self,
        pair_address: &str,
        window: TimeWindow,
    ) -> Result<PairRates, ProviderError> {
        let start = window.start_from(Utc::now()).timestamp();
        let data: HourDatasData = self
            .query(
                HOUR_DATA_QUERY,
                serde_json::json!({ "pair": pair_address.to_lowercase(), "start": start }),
            )
            .await?;

        debug!(
            pair = pair_address,
            hours = data.pair_hour_datas.len(),
            window = window.label(),
            "fetched hourly rates"
        );
        parse_hour_datas(&data.pair_hour_datas)
    }
}
