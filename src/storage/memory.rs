//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::clicks::Click;
use crate::links::Link;

use super::CreateLinkValues;
use super::Error;
use super::RecordClickValues;
use super::Result;
use super::Storage;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
///
/// A single lock guards links and clicks together, making the uniqueness
/// check on create and the click-plus-counter write atomic
#[derive(Clone, Debug)]
pub struct Memory {
    /// All links and clicks in storage
    state: Arc<Mutex<State>>,
}

/// The actual stored data, behind the single lock
#[derive(Debug, Default)]
struct State {
    /// All links in storage
    links: HashMap<Uuid, Link>,

    /// All clicks in storage, in insertion order
    clicks: Vec<Click>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn create_link(&self, values: &CreateLinkValues) -> Result<Link> {
        let mut state = self.state.lock().await;

        if state
            .links
            .values()
            .any(|link| link.shortcode == values.shortcode)
        {
            return Err(Error::Collision);
        }

        let link = Link {
            id: Uuid::new_v4(),
            shortcode: values.shortcode.to_string(),
            long_url: values.long_url.to_string(),
            created_at: Utc::now(),
            expiry_at: values.expiry_at,
            clicks_count: 0,
        };

        state.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_link_by_shortcode(&self, shortcode: &str) -> Result<Option<Link>> {
        Ok(self
            .state
            .lock()
            .await
            .links
            .values()
            .find(|link| link.shortcode == shortcode)
            .cloned())
    }

    async fn record_click(&self, link: &Link, values: &RecordClickValues) -> Result<Click> {
        let mut state = self.state.lock().await;

        let click = Click {
            id: Uuid::new_v4(),
            link_id: link.id,
            timestamp: Utc::now(),
            source: values.source.to_string(),
            user_agent: values.user_agent.to_string(),
            geo: values.geo.to_string(),
        };

        state.clicks.push(click.clone());

        state
            .links
            .get_mut(&link.id)
            .expect("HashMap is the source of the link")
            .clicks_count += 1;

        Ok(click)
    }

    async fn find_clicks_by_link(&self, link: &Link) -> Result<Vec<Click>> {
        let mut clicks = self
            .state
            .lock()
            .await
            .clicks
            .iter()
            .filter(|click| click.link_id == link.id)
            .cloned()
            .collect::<Vec<Click>>();

        clicks.sort_by_key(|click| click.timestamp);

        Ok(clicks)
    }
}
