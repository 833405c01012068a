//! Item price ledger over a catalog repository.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use benson_core::ledger::{
    normalize_item_name, price_variance_exceeds, summarize_outcomes, CatalogItem, IngestSummary,
    LedgerError, LineOutcome, PriceHistoryEntry, PurchaseLine, SEARCH_LIMIT,
    SEARCH_MIN_KEYWORD_LEN,
};
use benson_core::storage::{CatalogRepository, RepositoryError, Result};

/// Per-line results of one ingestion, in line order.
///
/// Lines with a blank name are skipped and do not appear here.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerReport {
    pub outcomes: Vec<(String, std::result::Result<LineOutcome, LedgerError>)>,
}

impl LedgerReport {
    /// Counts added and updated items. Failed lines are not counted.
    pub fn summary(&self) -> IngestSummary {
        summarize_outcomes(self.outcomes.iter().map(|(_, outcome)| outcome))
    }

    pub fn failures(&self) -> impl Iterator<Item = &LedgerError> {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| outcome.as_ref().err())
    }
}

/// The purchase being recorded for one line.
struct Purchase<'a> {
    receipt_id: Uuid,
    vendor: Option<&'a str>,
    unit_cost: f64,
    purchased_on: Option<NaiveDate>,
}

/// Maintains running cost statistics per distinct item name.
pub struct ItemLedger<R> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> ItemLedger<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Folds every line of a receipt into the catalog.
    ///
    /// Lines are applied one at a time. A failing line is logged and
    /// recorded in the report, and the remaining lines still run.
    pub async fn ingest(
        &self,
        receipt_id: Uuid,
        lines: &[PurchaseLine],
        vendor: Option<&str>,
        purchased_on: Option<NaiveDate>,
    ) -> LedgerReport {
        let mut outcomes = Vec::with_capacity(lines.len());

        for line in lines {
            let Some(item_name) = normalize_item_name(&line.item_name) else {
                continue;
            };
            let purchase = Purchase {
                receipt_id,
                vendor,
                unit_cost: line.unit_cost,
                purchased_on,
            };

            let outcome = self
                .apply(item_name, &purchase)
                .await
                .map_err(|e| LedgerError::line(item_name, e));
            if let Err(ref e) = outcome {
                tracing::error!(item_name, error = %e, "Failed to update item ledger");
            }
            outcomes.push((item_name.to_string(), outcome));
        }

        let report = LedgerReport { outcomes };
        let summary = report.summary();
        tracing::debug!(
            %receipt_id,
            added = summary.added,
            updated = summary.updated,
            "Item ledger updated"
        );
        report
    }

    async fn apply(&self, item_name: &str, purchase: &Purchase<'_>) -> Result<LineOutcome> {
        if let Some(item) = self.repository.find_item_by_name(item_name).await? {
            return self.record(item, purchase).await;
        }

        let item = CatalogItem::first_purchase(
            item_name,
            purchase.vendor,
            purchase.unit_cost,
            purchase.purchased_on,
        );
        match self.repository.create_item(&item).await {
            Ok(()) => {
                self.append_history(&item, purchase).await?;
                Ok(LineOutcome::Added(item))
            }
            Err(RepositoryError::AlreadyExists { .. }) => {
                // Another writer created the same name since the lookup.
                tracing::debug!(item_name, "Item created concurrently, updating instead");
                let item = self
                    .repository
                    .find_item_by_name(item_name)
                    .await?
                    .ok_or_else(|| RepositoryError::not_found("CatalogItem", item_name))?;
                self.record(item, purchase).await
            }
            Err(e) => Err(e),
        }
    }

    /// Folds a purchase into an existing item.
    ///
    /// History goes in before the item update, so a failed line never leaves
    /// the running statistics counting a purchase the history lacks.
    async fn record(&self, mut item: CatalogItem, purchase: &Purchase<'_>) -> Result<LineOutcome> {
        self.append_history(&item, purchase).await?;
        item.record_purchase(purchase.unit_cost, purchase.purchased_on);
        self.repository.update_item(&item).await?;
        Ok(LineOutcome::Updated(item))
    }

    async fn append_history(&self, item: &CatalogItem, purchase: &Purchase<'_>) -> Result<()> {
        let entry = PriceHistoryEntry::new(
            item.id,
            purchase.vendor,
            purchase.unit_cost,
            purchase.purchased_on,
            purchase.receipt_id,
        );
        self.repository.append_price_history(&entry).await
    }

    /// Gets the whole catalog, ordered by name.
    pub async fn list(&self) -> Result<Vec<CatalogItem>> {
        self.repository.list_items().await
    }

    /// Finds items by name fragment, most purchased first.
    ///
    /// Keywords shorter than two characters return nothing.
    pub async fn search(&self, keyword: &str) -> Result<Vec<CatalogItem>> {
        let keyword = keyword.trim();
        if keyword.chars().count() < SEARCH_MIN_KEYWORD_LEN {
            return Ok(Vec::new());
        }
        self.repository.search_items(keyword, SEARCH_LIMIT).await
    }

    /// Gets the recorded prices of an item, newest first.
    pub async fn price_history(&self, item_id: Uuid) -> Result<Vec<PriceHistoryEntry>> {
        self.repository.get_price_history(item_id).await
    }

    /// Returns true when `price` strays from the item's average by more
    /// than the variance threshold. Unknown items never warn.
    pub async fn price_warning(&self, item_name: &str, price: f64) -> Result<bool> {
        let Some(item_name) = normalize_item_name(item_name) else {
            return Ok(false);
        };
        Ok(self
            .repository
            .find_item_by_name(item_name)
            .await?
            .is_some_and(|item| price_variance_exceeds(item.average_unit_cost, price)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::storage::InMemoryRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> (Arc<InMemoryRepository>, ItemLedger<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        (repo.clone(), ItemLedger::new(repo))
    }

    async fn buy(ledger: &ItemLedger<InMemoryRepository>, name: &str, unit_cost: f64) -> LedgerReport {
        ledger
            .ingest(
                Uuid::new_v4(),
                &[PurchaseLine::new(name, 1.0, unit_cost)],
                Some("Home Depot"),
                Some(date(2024, 5, 1)),
            )
            .await
    }

    /// Catalog that fails lookups for one item name.
    struct FailingCatalog {
        inner: InMemoryRepository,
        broken_name: &'static str,
    }

    /// Catalog whose first lookup misses, as if another writer created the
    /// item right after it.
    struct RacingCatalog {
        inner: InMemoryRepository,
        missed: AtomicBool,
    }

    /// Catalog that rejects every item update.
    struct FrozenCatalog {
        inner: InMemoryRepository,
    }

    macro_rules! delegate_catalog {
        ($ty:ty, |$this:ident, $name:ident| $find:expr) => {
            delegate_catalog!($ty, |$this, $name| $find, |this, item| this.inner.update_item(item).await);
        };
        ($ty:ty, |$this:ident, $name:ident| $find:expr, |$uthis:ident, $item:ident| $update:expr) => {
            #[async_trait]
            impl CatalogRepository for $ty {
                async fn get_item(&self, id: Uuid) -> Result<Option<CatalogItem>> {
                    self.inner.get_item(id).await
                }

                async fn find_item_by_name(&self, $name: &str) -> Result<Option<CatalogItem>> {
                    let $this = self;
                    $find
                }

                async fn list_items(&self) -> Result<Vec<CatalogItem>> {
                    self.inner.list_items().await
                }

                async fn search_items(&self, keyword: &str, limit: usize) -> Result<Vec<CatalogItem>> {
                    self.inner.search_items(keyword, limit).await
                }

                async fn create_item(&self, item: &CatalogItem) -> Result<()> {
                    self.inner.create_item(item).await
                }

                async fn update_item(&self, $item: &CatalogItem) -> Result<()> {
                    let $uthis = self;
                    $update
                }

                async fn append_price_history(&self, entry: &PriceHistoryEntry) -> Result<()> {
                    self.inner.append_price_history(entry).await
                }

                async fn get_price_history(&self, item_id: Uuid) -> Result<Vec<PriceHistoryEntry>> {
                    self.inner.get_price_history(item_id).await
                }
            }
        };
    }

    delegate_catalog!(FailingCatalog, |this, item_name| {
        if item_name == this.broken_name {
            return Err(RepositoryError::ConnectionFailed("reset by peer".to_string()));
        }
        this.inner.find_item_by_name(item_name).await
    });

    delegate_catalog!(RacingCatalog, |this, item_name| {
        if !this.missed.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        this.inner.find_item_by_name(item_name).await
    });

    delegate_catalog!(
        FrozenCatalog,
        |this, item_name| this.inner.find_item_by_name(item_name).await,
        |_this, _item| Err(RepositoryError::QueryFailed("database is locked".to_string()))
    );

    #[tokio::test]
    async fn test_first_purchase_adds_item() {
        let (repo, ledger) = ledger();

        let report = buy(&ledger, "2x4 Lumber", 6.5).await;

        assert_eq!(report.summary(), IngestSummary { added: 1, updated: 0 });
        let item = repo.find_item_by_name("2x4 Lumber").await.unwrap().unwrap();
        assert_eq!(item.purchase_count, 1);
        assert_eq!(item.average_unit_cost, 6.5);
        assert_eq!(item.min_unit_cost, 6.5);
        assert_eq!(item.max_unit_cost, 6.5);
        assert_eq!(item.category, "Uncategorized");
        assert_eq!(item.preferred_vendor.as_deref(), Some("Home Depot"));
        assert_eq!(repo.get_price_history(item.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_weighted_average() {
        let (repo, ledger) = ledger();
        buy(&ledger, "Concrete Mix", 10.0).await;
        buy(&ledger, "Concrete Mix", 10.0).await;

        let report = buy(&ledger, "Concrete Mix", 40.0).await;

        assert_eq!(report.summary(), IngestSummary { added: 0, updated: 1 });
        let item = repo.find_item_by_name("Concrete Mix").await.unwrap().unwrap();
        assert_eq!(item.purchase_count, 3);
        assert_eq!(item.average_unit_cost, 20.0);
        assert_eq!(item.last_unit_cost, 40.0);
    }

    #[tokio::test]
    async fn test_min_max_only_widen() {
        let (repo, ledger) = ledger();
        for cost in [5.0, 12.0, 3.0, 9.0] {
            buy(&ledger, "Drywall Screws", cost).await;
        }

        let item = repo.find_item_by_name("Drywall Screws").await.unwrap().unwrap();

        assert_eq!(item.min_unit_cost, 3.0);
        assert_eq!(item.max_unit_cost, 12.0);
        assert_eq!(item.last_unit_cost, 9.0);
        assert_eq!(repo.get_price_history(item.id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_names_are_trimmed_and_blank_lines_skipped() {
        let (repo, ledger) = ledger();
        let lines = [
            PurchaseLine::new("  PVC Pipe ", 2.0, 4.0),
            PurchaseLine::new("   ", 1.0, 1.0),
            PurchaseLine::new("PVC Pipe", 1.0, 6.0),
        ];

        let report = ledger.ingest(Uuid::new_v4(), &lines, None, None).await;

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.summary(), IngestSummary { added: 1, updated: 1 });
        assert_eq!(repo.list_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_line_does_not_abort_batch() {
        let repo = Arc::new(FailingCatalog {
            inner: InMemoryRepository::new(),
            broken_name: "Rebar",
        });
        let ledger = ItemLedger::new(repo.clone());
        let lines = [
            PurchaseLine::new("Lumber", 1.0, 5.0),
            PurchaseLine::new("Rebar", 1.0, 8.0),
            PurchaseLine::new("Nails", 1.0, 2.0),
        ];

        let report = ledger.ingest(Uuid::new_v4(), &lines, None, None).await;

        assert_eq!(report.summary(), IngestSummary { added: 2, updated: 0 });
        assert_eq!(report.failures().count(), 1);
        assert!(matches!(
            &report.outcomes[1],
            (name, Err(LedgerError::Line { .. })) if name == "Rebar"
        ));
        assert!(repo.inner.find_item_by_name("Nails").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_update_leaves_item_stats_unchanged() {
        let repo = Arc::new(FrozenCatalog {
            inner: InMemoryRepository::new(),
        });
        let ledger = ItemLedger::new(repo.clone());
        let first = [PurchaseLine::new("Rebar", 1.0, 8.0)];
        let second = [PurchaseLine::new("Rebar", 1.0, 12.0)];

        ledger.ingest(Uuid::new_v4(), &first, None, None).await;
        let report = ledger.ingest(Uuid::new_v4(), &second, None, None).await;

        assert_eq!(report.failures().count(), 1);
        let item = repo.inner.find_item_by_name("Rebar").await.unwrap().unwrap();
        assert_eq!(item.purchase_count, 1);
        assert_eq!(item.average_unit_cost, 8.0);
        assert_eq!(repo.inner.get_price_history(item.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_create_falls_back_to_update() {
        let inner = InMemoryRepository::new();
        let existing = CatalogItem::first_purchase("Lumber", None, 10.0, None);
        inner.create_item(&existing).await.unwrap();
        let repo = Arc::new(RacingCatalog {
            inner,
            missed: AtomicBool::new(false),
        });
        let ledger = ItemLedger::new(repo.clone());

        let report = ledger
            .ingest(Uuid::new_v4(), &[PurchaseLine::new("Lumber", 1.0, 20.0)], None, None)
            .await;

        assert_eq!(report.summary(), IngestSummary { added: 0, updated: 1 });
        let item = repo.inner.find_item_by_name("Lumber").await.unwrap().unwrap();
        assert_eq!(item.id, existing.id);
        assert_eq!(item.purchase_count, 2);
        assert_eq!(item.average_unit_cost, 15.0);
    }

    #[tokio::test]
    async fn test_search_requires_two_characters() {
        let (_, ledger) = ledger();
        buy(&ledger, "PVC Pipe", 4.0).await;

        assert!(ledger.search("p").await.unwrap().is_empty());
        assert_eq!(ledger.search("pv").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_price_warning() {
        let (_, ledger) = ledger();
        buy(&ledger, "Lumber", 10.0).await;

        assert!(!ledger.price_warning("Lumber", 10.9).await.unwrap());
        assert!(ledger.price_warning("Lumber", 11.5).await.unwrap());
        assert!(!ledger.price_warning("Unknown item", 99.0).await.unwrap());
    }
}
