use bk_http::{ClientOptions, Requester, Result, Transport};

use crate::accounts::AccountService;

/// The entry point of the API.
///
/// Cloning is cheap: clones share one connection pool. Services borrow the
/// client's requester, so they can be created on demand.
///
/// ```no_run
/// # async fn run() -> brook::Result<()> {
/// let brook = brook::Brook::from_env()?;
/// let account = brook
///     .accounts()
///     .retrieve("acc_123", brook::RequestOptions::new())
///     .await?;
/// println!("{} {}", account.id, account.balance.available);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Brook {
    requester: Requester,
}

impl Brook {
    pub fn new(options: ClientOptions) -> Result<Self> {
        log::debug!("brook client for {}", options.base_url());
        Ok(Self {
            requester: Requester::new(options)?,
        })
    }

    /// Builds a client from the `BROOK_*` environment variables.
    ///
    /// See [`ClientOptions::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    /// Builds a client over a custom transport.
    pub fn with_transport(options: ClientOptions, transport: impl Transport) -> Self {
        Self {
            requester: Requester::with_transport(options, transport),
        }
    }

    /// The underlying requester, for endpoints without a dedicated service.
    #[inline]
    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(&self.requester)
    }
}
