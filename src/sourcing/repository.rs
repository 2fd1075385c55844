use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::RwLock;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::{GroupsRemote, MortgageProductsRemote, SyncError};
use crate::http::Client;
use crate::resources::products::{Mortgage, MortgageProductFilters};

/// The mortgages belonging to one product group, refreshed on demand or on
/// a schedule.
///
/// Readers get an [`Arc`] snapshot, so a refresh never mutates a list a
/// caller is holding. A refresh holds the write lock for its whole duration.
pub struct MortgageProductsRepository {
    groups: Arc<dyn GroupsRemote>,
    mortgages: Arc<dyn MortgageProductsRemote>,
    group_name: String,
    products: RwLock<Arc<Vec<Mortgage>>>,
}

impl MortgageProductsRepository {
    /// Creates an empty repository; call [`sync`](Self::sync) to populate it.
    pub fn new(
        groups: Arc<dyn GroupsRemote>,
        mortgages: Arc<dyn MortgageProductsRemote>,
        group_name: impl Into<String>,
    ) -> Self {
        Self {
            groups,
            mortgages,
            group_name: group_name.into(),
            products: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// A repository backed by the service for `group_name`.
    pub fn from_client(client: &Client, group_name: impl Into<String>) -> Self {
        Self::new(Arc::new(client.clone()), Arc::new(client.products()), group_name)
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Replaces the snapshot with the group's current mortgages.
    ///
    /// On failure the previous snapshot is kept. A group with no product ids
    /// empties the snapshot without listing any mortgages.
    pub async fn sync(&self) -> Result<(), SyncError> {
        let mut products = self.products.write().await;

        let group = self
            .groups
            .find_group(&self.group_name)
            .await
            .map_err(|source| SyncError::GroupLookup {
                group: self.group_name.clone(),
                source,
            })?;

        // An empty id filter would list the whole catalogue.
        if group.data.products.is_empty() {
            info!(group = self.group_name.as_str(), count = 0; "Synced mortgage products");
            *products = Arc::new(Vec::new());
            return Ok(());
        }

        let filters = MortgageProductFilters {
            ids: group.data.products,
        };
        let resp = self
            .mortgages
            .list_mortgages(&filters)
            .await
            .map_err(SyncError::ProductListing)?;

        info!(group = self.group_name.as_str(), count = resp.data.len(); "Synced mortgage products");
        *products = Arc::new(resp.data);

        Ok(())
    }

    /// Calls [`sync`](Self::sync) every `period` until `cancel` fires.
    ///
    /// The first refresh happens one period from now. Failures are logged
    /// and the schedule carries on.
    pub async fn sync_every(&self, period: Duration, cancel: CancellationToken) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.sync().await {
                        warn!(group = self.group_name.as_str(), error:% = e; "Unable to sync products");
                    }
                }
                _ = cancel.cancelled() => {
                    debug!(group = self.group_name.as_str(); "Product sync stopped");
                    break;
                }
            }
        }
    }

    /// The current snapshot.
    pub async fn all(&self) -> Arc<Vec<Mortgage>> {
        self.products.read().await.clone()
    }

    /// Copies of the mortgages in the current snapshot accepted by `predicate`.
    pub async fn find_matching<F>(&self, predicate: F) -> Vec<Mortgage>
    where
        F: Fn(&Mortgage) -> bool,
    {
        self.all().await.iter().filter(|&m| predicate(m)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::http::CapisError;
    use crate::models::Fee;
    use crate::resources::products::ListMortgagesResponse;
    use crate::resources::products::test_support::client;
    use crate::resources::{DetailedGroup, FindGroupResponse};
    use crate::sourcing::SourcingRun;

    struct StubGroup {
        group_name: String,
        products: Mutex<Vec<Mortgage>>,
        fail_find: AtomicBool,
        fail_listing: AtomicBool,
        find_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    impl StubGroup {
        fn new(group_name: &str, products: Vec<Mortgage>) -> Arc<Self> {
            Arc::new(Self {
                group_name: group_name.to_string(),
                products: Mutex::new(products),
                fail_find: AtomicBool::new(false),
                fail_listing: AtomicBool::new(false),
                find_calls: AtomicUsize::new(0),
                list_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl GroupsRemote for StubGroup {
        async fn find_group(&self, name: &str) -> Result<FindGroupResponse, CapisError> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            if name != self.group_name || self.fail_find.load(Ordering::SeqCst) {
                return Err(CapisError::NotFound);
            }

            let products = self.products.lock().unwrap().iter().map(|p| p.id.clone()).collect();
            Ok(FindGroupResponse {
                data: DetailedGroup {
                    id: name.to_string(),
                    product_type: "mortgage".into(),
                    products,
                },
            })
        }
    }

    #[async_trait]
    impl MortgageProductsRemote for StubGroup {
        async fn list_mortgages(&self, filters: &MortgageProductFilters) -> Result<ListMortgagesResponse, CapisError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_listing.load(Ordering::SeqCst) {
                return Err(CapisError::Unknown { status: 500 });
            }

            let products = self.products.lock().unwrap();
            let data = filters
                .ids
                .iter()
                .filter_map(|id| products.iter().find(|p| &p.id == id).cloned())
                .collect();
            Ok(ListMortgagesResponse { data })
        }
    }

    fn mortgage(id: &str, variable_fee: f64) -> Mortgage {
        Mortgage {
            id: id.to_string(),
            fee: Fee::variable(variable_fee, ""),
            ..Default::default()
        }
    }

    fn repository(stub: Arc<StubGroup>, group_name: &str) -> MortgageProductsRepository {
        MortgageProductsRepository::new(stub.clone(), stub, group_name)
    }

    #[tokio::test]
    async fn test_sync_populates_in_listing_order() {
        let expected = vec![mortgage("m2", 1.0), mortgage("m3", 2.0), mortgage("m1", 3.0)];
        let repo = repository(StubGroup::new("testing", expected.clone()), "testing");

        assert!(repo.all().await.is_empty());
        repo.sync().await.unwrap();
        assert_eq!(*repo.all().await, expected);
    }

    #[tokio::test]
    async fn test_snapshot_survives_later_sync() {
        let stub = StubGroup::new("testing", vec![mortgage("m1", 1.0)]);
        let repo = repository(stub.clone(), "testing");
        repo.sync().await.unwrap();

        let before = repo.all().await;
        stub.products.lock().unwrap().push(mortgage("m2", 2.0));
        repo.sync().await.unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(repo.all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_group_keeps_previous_snapshot() {
        let original = vec![mortgage("m1", 1.0), mortgage("m2", 2.0)];
        let stub = StubGroup::new("testing", original.clone());
        let repo = repository(stub.clone(), "testing");
        repo.sync().await.unwrap();

        stub.fail_find.store(true, Ordering::SeqCst);
        let err = repo.sync().await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::GroupLookup {
                source: CapisError::NotFound,
                ..
            }
        ));
        assert_eq!(*repo.all().await, original);
    }

    #[tokio::test]
    async fn test_listing_failure_keeps_previous_snapshot() {
        let original = vec![mortgage("m1", 1.0)];
        let stub = StubGroup::new("testing", original.clone());
        let repo = repository(stub.clone(), "testing");
        repo.sync().await.unwrap();

        stub.products.lock().unwrap().push(mortgage("m2", 2.0));
        stub.fail_listing.store(true, Ordering::SeqCst);
        let err = repo.sync().await.unwrap_err();

        assert!(matches!(err, SyncError::ProductListing(CapisError::Unknown { status: 500 })));
        assert_eq!(*repo.all().await, original);
    }

    #[tokio::test]
    async fn test_empty_group_clears_snapshot_without_listing() {
        let stub = StubGroup::new("testing", vec![mortgage("m1", 1.0)]);
        let repo = repository(stub.clone(), "testing");
        repo.sync().await.unwrap();
        assert_eq!(stub.list_calls.load(Ordering::SeqCst), 1);

        stub.products.lock().unwrap().clear();
        repo.sync().await.unwrap();

        assert!(repo.all().await.is_empty());
        assert_eq!(stub.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_group_never_lists_the_catalogue() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/groups/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": "empty", "type": "mortgage", "product_ids": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/mortgages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": "unrelated-1", "name": "Unrelated 1" },
                    { "id": "unrelated-2", "name": "Unrelated 2" }
                ]
            })))
            .expect(0)
            .mount(&server)
            .await;

        let repo = MortgageProductsRepository::from_client(&client(&server), "empty");
        repo.sync().await.unwrap();

        assert!(repo.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_find_matching() {
        let fees = [5.1, 3.1, 8.1, 5.1, 7.1, 5.6];
        let products = fees
            .iter()
            .enumerate()
            .map(|(i, fee)| mortgage(&format!("m{i}"), *fee))
            .collect();
        let repo = repository(StubGroup::new("testing", products), "testing");
        repo.sync().await.unwrap();

        let matching = repo.find_matching(|m| m.fee.variable <= 5.1).await;
        assert_eq!(matching.len(), 3);

        let run = SourcingRun::new(200_000, 10_000);
        let affordable: Vec<_> = repo
            .find_matching(|m| run.matches(m))
            .await
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(affordable, vec!["m1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_every_keeps_going_after_failures_until_cancelled() {
        let stub = StubGroup::new("testing", vec![mortgage("m1", 1.0)]);
        stub.fail_find.store(true, Ordering::SeqCst);
        let repo = Arc::new(repository(stub.clone(), "testing"));
        let cancel = CancellationToken::new();

        let handle = tokio::spawn({
            let repo = repo.clone();
            let cancel = cancel.clone();
            async move { repo.sync_every(Duration::from_secs(60), cancel).await }
        });

        tokio::time::sleep(Duration::from_secs(150)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(stub.find_calls.load(Ordering::SeqCst), 2);
        assert!(repo.all().await.is_empty());
    }
}
