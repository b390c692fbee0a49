// src/clients/report_client.rs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    common::error::SourceError,
    models::{
        filter::{format_report_date, Filter},
        reports::{
            AnalyticsReport, EmployeesReport, GeneralOrdersReport, GoodsReport, MetricsReport,
            MoneyflowReport, OrdersReport, OrganizationsReport, ProfitLossReport,
            SalesDynamicsReport, SourceName,
        },
    },
};

/// Parâmetros de uma coleta: o filtro atual e o token que autoriza o lote.
#[derive(Clone)]
pub struct ReportQuery {
    pub filter: Filter,
    pub token: String,
}

/// Uma função assíncrona por fonte. Falhas voltam como `Err`, nunca como valor sentinela.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn metrics(&self, query: &ReportQuery) -> Result<MetricsReport, SourceError>;
    async fn orders(&self, query: &ReportQuery) -> Result<OrdersReport, SourceError>;
    async fn employees(&self, query: &ReportQuery) -> Result<EmployeesReport, SourceError>;
    async fn moneyflow(&self, query: &ReportQuery) -> Result<MoneyflowReport, SourceError>;
    async fn profit_loss(&self, query: &ReportQuery) -> Result<ProfitLossReport, SourceError>;
    async fn analytics(&self, query: &ReportQuery) -> Result<AnalyticsReport, SourceError>;
    async fn goods(&self, query: &ReportQuery) -> Result<GoodsReport, SourceError>;
    async fn general_orders(&self, query: &ReportQuery) -> Result<GeneralOrdersReport, SourceError>;
    async fn sales_dynamics(&self, query: &ReportQuery) -> Result<SalesDynamicsReport, SourceError>;
    async fn organizations(&self, query: &ReportQuery) -> Result<OrganizationsReport, SourceError>;
}

// Só o 401 derruba a sessão. 403 é falta de acesso àquele relatório: a fonte vira fallback.
fn check_status(status: StatusCode) -> Result<(), SourceError> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(SourceError::Unauthorized(status.as_u16()));
    }
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }
    Ok(())
}

/// Cliente HTTP dos endpoints `{base}/reports/{fonte}`.
#[derive(Clone)]
pub struct HttpReportClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReportClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, source: SourceName) -> String {
        format!("{}/reports/{}", self.base_url, source)
    }

    async fn fetch<T>(&self, source: SourceName, query: &ReportQuery) -> Result<T, SourceError>
    where
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .get(self.url(source))
            .bearer_auth(&query.token);

        if source.uses_filter() {
            request = request.query(&[
                ("date", format_report_date(&query.filter.date)),
                ("period", query.filter.period.to_string()),
                ("locationId", query.filter.location_id.to_string()),
            ]);
        }

        let response = request.send().await?;
        check_status(response.status())?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ReportSource for HttpReportClient {
    async fn metrics(&self, query: &ReportQuery) -> Result<MetricsReport, SourceError> {
        self.fetch(SourceName::Metrics, query).await
    }

    async fn orders(&self, query: &ReportQuery) -> Result<OrdersReport, SourceError> {
        self.fetch(SourceName::Orders, query).await
    }

    async fn employees(&self, query: &ReportQuery) -> Result<EmployeesReport, SourceError> {
        self.fetch(SourceName::Employees, query).await
    }

    async fn moneyflow(&self, query: &ReportQuery) -> Result<MoneyflowReport, SourceError> {
        self.fetch(SourceName::Moneyflow, query).await
    }

    async fn profit_loss(&self, query: &ReportQuery) -> Result<ProfitLossReport, SourceError> {
        self.fetch(SourceName::ProfitLoss, query).await
    }

    async fn analytics(&self, query: &ReportQuery) -> Result<AnalyticsReport, SourceError> {
        self.fetch(SourceName::Analytics, query).await
    }

    async fn goods(&self, query: &ReportQuery) -> Result<GoodsReport, SourceError> {
        self.fetch(SourceName::Goods, query).await
    }

    async fn general_orders(&self, query: &ReportQuery) -> Result<GeneralOrdersReport, SourceError> {
        self.fetch(SourceName::GeneralOrders, query).await
    }

    async fn sales_dynamics(&self, query: &ReportQuery) -> Result<SalesDynamicsReport, SourceError> {
        self.fetch(SourceName::SalesDynamics, query).await
    }

    async fn organizations(&self, query: &ReportQuery) -> Result<OrganizationsReport, SourceError> {
        self.fetch(SourceName::Organizations, query).await
    }
}
