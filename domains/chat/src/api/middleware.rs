//! Chat domain state

use commlink_common::{Credentials, Result};
use commlink_twilio::{TwilioApi, TwilioConnector};
use std::sync::Arc;

/// Application state for the Chat domain
#[derive(Clone)]
pub struct ChatState {
    pub credentials: Credentials,
    pub twilio: Arc<dyn TwilioConnector>,
}

impl ChatState {
    /// Resolve REST credentials and build a remote client for this request
    pub fn client(&self) -> Result<Box<dyn TwilioApi>> {
        let credentials = self.credentials.rest()?;
        Ok(self.twilio.connect(credentials))
    }
}
