//! Single-object link download.

use async_trait::async_trait;

use crate::config::Destination;
use crate::download::retry::{Fetch, RetryingTransfer};
use crate::download::state::RunOptions;
use crate::error::TransferError;
use crate::link::Link;
use crate::output::{print_name, print_success};
use crate::session::{DownloadSession, FetchedObject};
use crate::status::StatusEventBus;

/// Fetch of the object behind a single-object link.
pub struct LinkFetch<'a, S: ?Sized> {
    session: &'a S,
    link: &'a Link,
    destination: &'a Destination,
}

#[async_trait(?Send)]
impl<S: DownloadSession + ?Sized> Fetch for LinkFetch<'_, S> {
    type Output = FetchedObject;

    fn describe(&self) -> String {
        format!("'{}'", self.link)
    }

    async fn fetch_once(&mut self, bus: &mut StatusEventBus) -> Result<FetchedObject, TransferError> {
        self.session.fetch_link(self.link, self.destination, bus).await
    }
}

/// Download one single-object link. Returns whether it succeeded.
pub async fn download_single<S: DownloadSession + ?Sized>(
    session: &S,
    transfer: &RetryingTransfer,
    options: &RunOptions,
    link: &Link,
    bus: &mut StatusEventBus,
) -> bool {
    let mut fetch = LinkFetch {
        session,
        link,
        destination: &options.destination,
    };

    match transfer.attempt(&mut fetch, bus).await {
        Ok(fetched) => {
            let name = bus
                .state()
                .current_object
                .clone()
                .unwrap_or_else(|| fetched.name.clone());

            if options.show_progress {
                bus.clear();
                print_success(&format!("Downloaded {}", name));
            }
            if options.print_names {
                print_name(&name);
            }
            tracing::debug!("Fetched {} ({} bytes) to {:?}", name, fetched.size, fetched.path);
            true
        }
        Err(err) => {
            tracing::debug!("Link {} failed: {:?}", link.handle(), err.kind());
            false
        }
    }
}
