//! Video domain state

use commlink_common::{Credentials, Result};
use commlink_twilio::{TwilioApi, TwilioConnector};
use std::sync::Arc;

/// Application state for the Video domain
#[derive(Clone)]
pub struct VideoState {
    pub credentials: Credentials,
    pub twilio: Arc<dyn TwilioConnector>,
}

impl VideoState {
    /// Resolve REST credentials and build a remote client for this request
    pub fn client(&self) -> Result<Box<dyn TwilioApi>> {
        Ok(self.twilio.connect(self.credentials.rest()?))
    }
}
