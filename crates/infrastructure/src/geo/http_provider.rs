use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ipnetwork::IpNetwork;
use meshsentry_application::ports::{ApplyRequester, GeoProviderPort, ZoneSource};
use meshsentry_domain::{EntryType, MeshError};
use meshsentry_application::ports::PolicyStorePort;
use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Strips blank lines and `#` comments, newline-joins the rest. The
/// ipdeny.com-style zone files this targets are one CIDR per line.
fn clean_zone_body(body: &str) -> String {
    body.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// HTTPS geo-blocking provider: fetches per-country CIDR zones from a
/// templated URL, caches them in SQLite, and exposes them to the reconciler's
/// country table via [`ZoneSource`].
pub struct HttpGeoProvider {
    pool: SqlitePool,
    client: Client,
    url_template: String,
    staleness: chrono::Duration,
    policy_store: Arc<dyn PolicyStorePort>,
    apply_requester: Arc<dyn ApplyRequester>,
}

impl HttpGeoProvider {
    pub fn new(
        pool: SqlitePool,
        url_template: String,
        fetch_timeout: Duration,
        staleness_days: i64,
        policy_store: Arc<dyn PolicyStorePort>,
        apply_requester: Arc<dyn ApplyRequester>,
    ) -> Result<Self, MeshError> {
        let client = Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| MeshError::Fetch(format!("failed to build http client: {e}")))?;
        Ok(Self {
            pool,
            client,
            url_template,
            staleness: chrono::Duration::days(staleness_days),
            policy_store,
            apply_requester,
        })
    }

    fn url_for(&self, code: &str) -> String {
        self.url_template.replace("{country}", &code.to_lowercase())
    }

    async fn referenced_countries(&self) -> Result<Vec<String>, MeshError> {
        let entries = self
            .policy_store
            .effective_entries(Some(EntryType::Country))
            .await?;
        Ok(entries.into_iter().map(|e| e.value.to_string()).collect())
    }
}

#[async_trait]
impl ZoneSource for HttpGeoProvider {
    #[instrument(skip(self))]
    async fn get_country_cidrs(&self, code: &str) -> Result<Vec<IpNetwork>, MeshError> {
        let code = code.to_uppercase();
        let row: Option<(String,)> =
            sqlx::query_as("SELECT cidr_list FROM country_zones_cache WHERE country_code = ?")
                .bind(&code)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;

        let Some((cidr_list,)) = row else {
            return Err(MeshError::NotFound(format!(
                "no cached zone for country '{code}'"
            )));
        };

        let mut networks = Vec::new();
        for line in cidr_list.lines().filter(|l| !l.is_empty()) {
            match line.parse::<IpNetwork>() {
                Ok(net) => networks.push(net),
                Err(e) => warn!(country = %code, line, error = %e, "skipping unparseable cached CIDR"),
            }
        }
        Ok(networks)
    }
}

#[async_trait]
impl GeoProviderPort for HttpGeoProvider {
    #[instrument(skip(self))]
    async fn fetch_country_zones(&self, code: &str) -> Result<String, MeshError> {
        let code = code.to_uppercase();
        let url = self.url_for(&code);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MeshError::Fetch(format!("GET {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MeshError::Fetch(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MeshError::Fetch(format!("failed to read body from {url}: {e}")))?;
        let cleaned = clean_zone_body(&body);

        sqlx::query(
            "INSERT INTO country_zones_cache (country_code, cidr_list, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT (country_code) DO UPDATE SET
                cidr_list = excluded.cidr_list, updated_at = excluded.updated_at",
        )
        .bind(&code)
        .bind(&cleaned)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| MeshError::StoreUnavailable(e.to_string()))?;

        Ok(cleaned)
    }

    #[instrument(skip(self))]
    async fn fetch_and_cache(&self, code: &str) -> Result<usize, MeshError> {
        let cleaned = self.fetch_country_zones(code).await?;
        let count = cleaned.lines().filter(|l| !l.is_empty()).count();
        self.apply_requester.request_apply();
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn refresh_all_zones(&self) -> (usize, usize) {
        let countries = match self.referenced_countries().await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "failed to list referenced countries for zone refresh");
                return (0, 0);
            }
        };

        let mut updated = 0;
        let mut errors = 0;
        // Sequential by design: avoid hammering the zone data source.
        for code in countries {
            match self.fetch_country_zones(&code).await {
                Ok(_) => updated += 1,
                Err(e) => {
                    warn!(country = %code, error = %e, "zone fetch failed");
                    errors += 1;
                }
            }
        }

        if updated > 0 {
            self.apply_requester.request_apply();
        }
        info!(updated, errors, "refresh_all_zones complete");
        (updated, errors)
    }

    #[instrument(skip(self))]
    async fn needs_update(&self) -> bool {
        let countries = match self.referenced_countries().await {
            Ok(c) => c,
            Err(_) => return false,
        };
        if countries.is_empty() {
            return false;
        }

        for code in countries {
            let row: Option<(String,)> = sqlx::query_as(
                "SELECT updated_at FROM country_zones_cache WHERE country_code = ?",
            )
            .bind(&code)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or(None);

            match row {
                None => return true,
                Some((updated_at,)) => {
                    let parsed = DateTime::parse_from_rfc3339(&updated_at)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now());
                    if Utc::now().signed_duration_since(parsed) > self.staleness {
                        return true;
                    }
                }
            }
        }
        false
    }

    #[instrument(skip(self))]
    async fn last_updated(&self) -> Option<DateTime<Utc>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT updated_at FROM country_zones_cache ORDER BY updated_at DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await
                .unwrap_or(None);

        row.and_then(|(s,)| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}
