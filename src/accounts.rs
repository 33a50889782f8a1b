//! Deposit accounts.

use std::collections::BTreeMap;

use bk_http::{Error, NoParams, Page, PageIter, RequestOptions, Requester, Result};
use bk_reflect::derive::Reflect;
use serde_json::Value;

// -----------------------------------------------------------------------------
// Resources

/// A deposit account.
#[derive(Reflect, Default, Debug, Clone, PartialEq)]
pub struct Account {
    #[json("id")]
    pub id: String,
    #[json("name")]
    pub name: Option<String>,
    /// `open`, `frozen` or `closed`.
    #[json("status")]
    pub status: String,
    /// ISO 4217 code.
    #[json("currency")]
    pub currency: String,
    #[json("balance")]
    pub balance: Balance,
    #[json("account_number")]
    pub account_number: Option<String>,
    #[json("routing_number")]
    pub routing_number: Option<String>,
    #[json("metadata")]
    pub metadata: BTreeMap<String, String>,
    #[json("created_at")]
    pub created_at: String,
    #[json("closed_at")]
    pub closed_at: Option<String>,
    /// Fields this version does not know about.
    #[json(",extras")]
    pub extras: BTreeMap<String, Value>,
}

/// Balances in minor units of the account currency.
#[derive(Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    #[json("available")]
    pub available: i64,
    #[json("current")]
    pub current: i64,
    #[json("pending")]
    pub pending: i64,
}

// -----------------------------------------------------------------------------
// Parameters

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
pub struct AccountCreateParams {
    #[json("name,required")]
    pub name: Option<String>,
    #[json("currency")]
    pub currency: Option<String>,
    #[json("metadata")]
    pub metadata: Option<BTreeMap<String, String>>,
}

/// Only the fields that are set are sent.
#[derive(Reflect, Default, Debug, Clone, PartialEq)]
pub struct AccountUpdateParams {
    #[json("name")]
    pub name: Option<String>,
    #[json("metadata")]
    pub metadata: Option<BTreeMap<String, String>>,
}

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
pub struct AccountListParams {
    /// Page size.
    #[json("limit")]
    pub limit: Option<u32>,
    #[json("status")]
    pub status: Vec<String>,
    #[json("created_at")]
    pub created_at: Option<TimeRange>,
}

/// Bounds on a timestamp, sent as `field[after]` and `field[before]`.
#[derive(Reflect, Default, Debug, Clone, PartialEq)]
pub struct TimeRange {
    #[json("after")]
    pub after: Option<String>,
    #[json("before")]
    pub before: Option<String>,
}

// -----------------------------------------------------------------------------
// AccountService

/// Account endpoints, obtained from [`Brook::accounts`](crate::Brook::accounts).
#[derive(Clone, Copy)]
pub struct AccountService<'a> {
    requester: &'a Requester,
}

impl<'a> AccountService<'a> {
    pub(crate) fn new(requester: &'a Requester) -> Self {
        Self { requester }
    }

    pub async fn create(&self, params: &AccountCreateParams, options: RequestOptions) -> Result<Account> {
        self.requester.post("accounts", params, options).await
    }

    pub async fn retrieve(&self, id: &str, options: RequestOptions) -> Result<Account> {
        self.requester.get(&path(id, "")?, &NoParams {}, options).await
    }

    pub async fn update(&self, id: &str, params: &AccountUpdateParams, options: RequestOptions) -> Result<Account> {
        self.requester.patch(&path(id, "")?, params, options).await
    }

    /// Fetches one page of accounts.
    pub async fn list(&self, params: &AccountListParams, options: RequestOptions) -> Result<Page<Account>> {
        self.requester.get_list("accounts", params, options).await
    }

    /// Iterates over every account matching `params`.
    pub fn list_auto_paging(&self, params: &AccountListParams, options: RequestOptions) -> Result<PageIter<Account>> {
        self.requester.list_auto_paging("accounts", params, options)
    }

    /// Closes the account. Its balance must be zero.
    pub async fn close(&self, id: &str, options: RequestOptions) -> Result<Account> {
        self.requester.post(&path(id, "/close")?, &NoParams {}, options).await
    }
}

fn path(id: &str, suffix: &str) -> Result<String> {
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(Error::InvalidRequest(format!("invalid account id {id:?}")));
    }
    Ok(format!("accounts/{id}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bk_http::{ClientOptions, ErrorKind, Transport, TransportError};
    use bytes::Bytes;

    use crate::Brook;

    #[test]
    fn paths() {
        assert_eq!(path("acc_1", "").unwrap(), "accounts/acc_1");
        assert_eq!(path("acc_1", "/close").unwrap(), "accounts/acc_1/close");
        assert!(matches!(path("", ""), Err(Error::InvalidRequest(_))));
        assert!(matches!(path("../cards", ""), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn list_params_query() {
        let params = AccountListParams {
            limit: Some(25),
            status: vec!["open".into(), "frozen".into()],
            created_at: Some(TimeRange {
                after: Some("2024-01-01T00:00:00Z".into()),
                before: None,
            }),
        };
        let pairs = bk_json::query::to_pairs(&params).unwrap();
        assert_eq!(
            pairs,
            [
                ("created_at[after]".to_string(), "2024-01-01T00:00:00Z".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("status".to_string(), "open".to_string()),
                ("status".to_string(), "frozen".to_string()),
            ]
        );
    }

    #[test]
    fn update_sends_only_set_fields() {
        let params = AccountUpdateParams {
            name: Some("Payroll".into()),
            metadata: None,
        };
        assert_eq!(bk_json::to_vec(&params).unwrap(), br#"{"name":"Payroll"}"#);
    }

    // -------------------------------------------------------------------------
    // Service

    #[derive(Clone, Default)]
    struct Server {
        responses: Arc<Mutex<VecDeque<(u16, &'static str)>>>,
        requests: Arc<Mutex<Vec<::http::Request<Bytes>>>>,
    }

    impl Server {
        fn client(responses: Vec<(u16, &'static str)>) -> (Brook, Self) {
            let server = Self::default();
            server.responses.lock().unwrap().extend(responses);
            let options = ClientOptions::new()
                .with_api_key("sk_test")
                .with_base_url("https://api.test/v1");
            (Brook::with_transport(options, server.clone()), server)
        }

        fn request(&self, index: usize) -> (String, String, String) {
            let requests = self.requests.lock().unwrap();
            let request = &requests[index];
            (
                request.method().to_string(),
                request.uri().to_string(),
                String::from_utf8(request.body().to_vec()).unwrap(),
            )
        }
    }

    #[async_trait]
    impl Transport for Server {
        async fn send(&self, request: ::http::Request<Bytes>) -> Result<::http::Response<Bytes>, TransportError> {
            self.requests.lock().unwrap().push(request);
            let (status, body) = self.responses.lock().unwrap().pop_front().expect("unexpected request");
            Ok(::http::Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Bytes::from_static(body.as_bytes()))
                .unwrap())
        }
    }

    const ACCOUNT: &str = r#"{
        "id": "acc_1",
        "name": "Operating",
        "status": "open",
        "currency": "USD",
        "balance": {"available": 125000, "current": "130000", "pending": 5000},
        "account_number": "000123456789",
        "routing_number": "021000021",
        "metadata": {"team": "ops"},
        "created_at": "2024-03-01T12:00:00Z",
        "closed_at": null,
        "interest_rate": "0.0125"
    }"#;

    #[tokio::test(start_paused = true)]
    async fn create_and_retrieve() {
        let (client, server) = Server::client(vec![(200, ACCOUNT), (200, ACCOUNT)]);

        let params = AccountCreateParams {
            name: Some("Operating".into()),
            currency: Some("USD".into()),
            metadata: Some(BTreeMap::from([("team".to_string(), "ops".to_string())])),
        };
        let created = client.accounts().create(&params, RequestOptions::new()).await.unwrap();
        let retrieved = client.accounts().retrieve("acc_1", RequestOptions::new()).await.unwrap();

        assert_eq!(created, retrieved);
        assert_eq!(created.balance.current, 130_000);
        assert_eq!(created.metadata["team"], "ops");
        assert_eq!(created.extras["interest_rate"], "0.0125");
        assert_eq!(created.closed_at, None);

        assert_eq!(
            server.request(0),
            (
                "POST".to_string(),
                "https://api.test/v1/accounts".to_string(),
                r#"{"currency":"USD","metadata":{"team":"ops"},"name":"Operating"}"#.to_string(),
            )
        );
        assert_eq!(server.request(1).1, "https://api.test/v1/accounts/acc_1");
    }

    #[tokio::test(start_paused = true)]
    async fn create_sends_required_name_as_null() {
        let (client, server) = Server::client(vec![(
            422,
            r#"{"type":"invalid_parameters","title":"Invalid","detail":"name must not be null","status":422}"#,
        )]);
        let err = client
            .accounts()
            .create(&AccountCreateParams::default(), RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::UnprocessableEntity));
        assert_eq!(server.request(0).2, r#"{"name":null}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn update_and_close() {
        let (client, server) = Server::client(vec![(200, ACCOUNT), (200, r#"{"id":"acc_1","status":"closed"}"#)]);
        let params = AccountUpdateParams {
            name: Some("Payroll".into()),
            metadata: None,
        };
        client.accounts().update("acc_1", &params, RequestOptions::new()).await.unwrap();
        let closed = client.accounts().close("acc_1", RequestOptions::new()).await.unwrap();

        assert_eq!(closed.status, "closed");
        assert_eq!(server.request(0).0, "PATCH");
        assert_eq!(server.request(0).2, r#"{"name":"Payroll"}"#);
        assert_eq!(
            (server.request(1).0, server.request(1).1),
            ("POST".to_string(), "https://api.test/v1/accounts/acc_1/close".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn list_and_auto_paging() {
        let (client, server) = Server::client(vec![
            (200, r#"{"data":[{"id":"acc_1"},{"id":"acc_2"}],"next_cursor":"c2"}"#),
            (200, r#"{"data":[{"id":"acc_1"},{"id":"acc_2"}],"next_cursor":"c2"}"#),
            (200, r#"{"data":[{"id":"acc_3"}],"next_cursor":""}"#),
        ]);
        let params = AccountListParams {
            limit: Some(2),
            status: vec!["open".into()],
            created_at: None,
        };

        let page = client.accounts().list(&params, RequestOptions::new()).await.unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.next_cursor(), Some("c2"));

        let ids: Vec<_> = client
            .accounts()
            .list_auto_paging(&params, RequestOptions::new())
            .unwrap()
            .collect_all()
            .await
            .unwrap()
            .into_iter()
            .map(|account| account.id)
            .collect();
        assert_eq!(ids, ["acc_1", "acc_2", "acc_3"]);
        assert_eq!(server.request(0).1, "https://api.test/v1/accounts?limit=2&status=open");
        assert_eq!(server.request(2).1, "https://api.test/v1/accounts?limit=2&status=open&cursor=c2");
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_ids_never_reach_the_server() {
        let (client, server) = Server::client(vec![]);
        let err = client.accounts().retrieve("", RequestOptions::new()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(server.requests.lock().unwrap().is_empty());
    }
}
