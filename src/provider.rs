//! Поставщик исторических данных
//!
//! Движок сам данные не читает — он получает их через
//! `HistoricalDataProvider`. В продакшене за трейтом стоит запрос к
//! ERP/базе ("заголовки, где ObraID = projectId и IntegradoERP = true,
//! с позициями, по дате по возрастанию"); здесь — in-memory хранилище,
//! наполняемое через POST /partes-diarias.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::DailyReport;

/// Жесткий отказ чтения истории. Пробрасывается наверх без обработки,
/// HTTP слой отвечает 500. "Нет данных" ошибкой не является.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("daily report query failed: {0}")]
    Query(#[from] anyhow::Error),
}

#[async_trait]
pub trait HistoricalDataProvider: Send + Sync {
    /// Утвержденные partes diárias по объекту, с позициями,
    /// отсортированные по дате по возрастанию.
    async fn fetch_approved_daily_reports(
        &self,
        project_id: i64,
    ) -> Result<Vec<DailyReport>, ProviderError>;
}

/// Хранилище отчетов в памяти. Упорядочивание и фильтрация по
/// approved выполняются на чтении — контракт провайдера держится
/// здесь, а не в движке.
pub struct InMemoryReportStore {
    reports: RwLock<HashMap<i64, Vec<DailyReport>>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(HashMap::new()),
        }
    }

    /// Принимает пачку отчетов (утвержденных и нет), возвращает
    /// количество принятых.
    pub async fn insert_reports(&self, batch: Vec<DailyReport>) -> usize {
        let count = batch.len();
        let mut guard = self.reports.write().await;
        for report in batch {
            guard.entry(report.project_id).or_default().push(report);
        }
        count
    }
}

impl Default for InMemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoricalDataProvider for InMemoryReportStore {
    async fn fetch_approved_daily_reports(
        &self,
        project_id: i64,
    ) -> Result<Vec<DailyReport>, ProviderError> {
        let guard = self.reports.read().await;
        let mut approved: Vec<DailyReport> = guard
            .get(&project_id)
            .map(|all| all.iter().filter(|r| r.approved).cloned().collect())
            .unwrap_or_default();
        // стабильная сортировка: отчеты одного дня сохраняют порядок подачи
        approved.sort_by_key(|r| r.date);
        Ok(approved)
    }
}
