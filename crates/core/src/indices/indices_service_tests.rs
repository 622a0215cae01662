#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::indices::{
        ClosePrice, ConstituentSourceTrait, Index, IndexError, IndexRepositoryTrait, IndexService,
        IndexServiceTrait, PriceRepositoryTrait,
    };
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    // --- Mock repositories ---
    struct MockIndexRepository {
        indices: Vec<Index>,
    }

    #[async_trait]
    impl IndexRepositoryTrait for MockIndexRepository {
        fn list_indices(&self) -> Result<Vec<Index>> {
            Ok(self.indices.clone())
        }

        fn get_index(&self, symbol: &str) -> Result<Option<Index>> {
            Ok(self.indices.iter().find(|i| i.symbol == symbol).cloned())
        }

        async fn upsert_index(&self, _index: Index) -> Result<Index> {
            unimplemented!()
        }
    }

    struct MockPriceRepository {
        prices: HashMap<String, f64>,
    }

    #[async_trait]
    impl PriceRepositoryTrait for MockPriceRepository {
        fn latest_close_prices(&self, symbols: &[String]) -> Result<HashMap<String, f64>> {
            Ok(symbols
                .iter()
                .filter_map(|s| self.prices.get(s).map(|p| (s.clone(), *p)))
                .collect())
        }

        async fn upsert_close_prices(&self, _prices: Vec<ClosePrice>) -> Result<usize> {
            unimplemented!()
        }
    }

    struct MockSource {
        body: Option<String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ConstituentSourceTrait for MockSource {
        async fn fetch_csv(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            self.body.clone().ok_or_else(|| {
                IndexError::Fetch {
                    url: url.to_string(),
                    reason: "connection refused".to_string(),
                }
                .into()
            })
        }
    }

    fn service(body: Option<&str>) -> (IndexService, Arc<MockSource>) {
        let source = Arc::new(MockSource {
            body: body.map(str::to_string),
            requested: Mutex::new(Vec::new()),
        });
        let indices = MockIndexRepository {
            indices: vec![Index {
                symbol: "NIFTYIT".to_string(),
                url: "http://indices.test/ind_niftyitlist.csv".to_string(),
            }],
        };
        let prices = MockPriceRepository {
            prices: HashMap::from([
                ("INFY".to_string(), 1890.4),
                ("TCS".to_string(), 4110.55),
            ]),
        };
        let svc = IndexService::new(Arc::new(indices), Arc::new(prices), source.clone());
        (svc, source)
    }

    #[tokio::test]
    async fn joins_constituents_with_latest_close() {
        let csv = "Company Name,Symbol\n\
            Infosys Ltd.,INFY\n\
            Tata Consultancy Services Ltd.,TCS\n\
            Wipro Ltd.,WIPRO\n";
        let (svc, source) = service(Some(csv));

        let result = svc.get_index_stocks("NIFTYIT").await.unwrap();

        assert_eq!(result.index_symbol, "NIFTYIT");
        assert_eq!(result.total_count(), 3);
        assert_eq!(result.suggested_count, 2);
        assert_eq!(result.stocks[0].close_price, Some(1890.4));
        assert_eq!(result.stocks[2].symbol, "WIPRO");
        assert_eq!(result.stocks[2].close_price, None);
        assert_eq!(
            source.requested.lock().unwrap().as_slice(),
            ["http://indices.test/ind_niftyitlist.csv"]
        );
    }

    #[tokio::test]
    async fn unknown_index_is_rejected_without_fetching() {
        let (svc, source) = service(Some("Company Name,Symbol\n"));
        let err = svc.get_index_stocks("NIFTY999").await.unwrap_err();
        assert!(matches!(err, Error::Index(IndexError::UnknownIndex(_))));
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn header_only_csv_has_no_constituents() {
        let (svc, _) = service(Some("Company Name,Symbol\n,\n"));
        let err = svc.get_index_stocks("NIFTYIT").await.unwrap_err();
        assert!(matches!(err, Error::Index(IndexError::NoConstituents(_))));
    }

    #[tokio::test]
    async fn unreachable_csv_fails_the_request() {
        let (svc, _) = service(None);
        let err = svc.get_index_stocks("NIFTYIT").await.unwrap_err();
        assert!(matches!(err, Error::Index(IndexError::Fetch { .. })));
    }

    #[tokio::test]
    async fn missing_headers_fail_the_request() {
        let (svc, _) = service(Some("Name,Ticker\nInfosys Ltd.,INFY\n"));
        let err = svc.get_index_stocks("NIFTYIT").await.unwrap_err();
        assert!(matches!(err, Error::Index(IndexError::MissingColumns)));
    }
}
