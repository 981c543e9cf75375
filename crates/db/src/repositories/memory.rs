use tokio::sync::RwLock;

use hotdeal_core::domain::deal::{DealId, HotDeal};
use hotdeal_core::domain::notice::{Notice, NoticeId, NoticeKind};

use super::{DealRepository, NoticeRepository, RepositoryError};

// Vec rather than a map: listing order is insertion order.
#[derive(Default)]
pub struct InMemoryDealRepository {
    deals: RwLock<Vec<HotDeal>>,
}

impl InMemoryDealRepository {
    pub fn with_deals(deals: Vec<HotDeal>) -> Self {
        Self { deals: RwLock::new(deals) }
    }
}

#[async_trait::async_trait]
impl DealRepository for InMemoryDealRepository {
    async fn find_by_id(&self, id: &DealId) -> Result<Option<HotDeal>, RepositoryError> {
        let deals = self.deals.read().await;
        Ok(deals.iter().find(|deal| &deal.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<HotDeal>, RepositoryError> {
        Ok(self.deals.read().await.clone())
    }

    async fn save(&self, deal: HotDeal) -> Result<(), RepositoryError> {
        let mut deals = self.deals.write().await;
        match deals.iter_mut().find(|existing| existing.id == deal.id) {
            Some(existing) => {
                let registered_on = existing.registered_on;
                *existing = HotDeal { registered_on, ..deal };
            }
            None => deals.push(deal),
        }
        Ok(())
    }

    async fn delete(&self, id: &DealId) -> Result<(), RepositoryError> {
        let mut deals = self.deals.write().await;
        let before = deals.len();
        deals.retain(|deal| &deal.id != id);
        if deals.len() == before {
            return Err(RepositoryError::NotFound { entity: "deal", id: id.0.clone() });
        }
        Ok(())
    }

    async fn standard_model_names(&self) -> Result<Vec<String>, RepositoryError> {
        let deals = self.deals.read().await;
        let mut names: Vec<String> = Vec::new();
        for deal in deals.iter() {
            if !names.contains(&deal.standard_model_name) {
                names.push(deal.standard_model_name.clone());
            }
        }
        Ok(names)
    }
}

#[derive(Default)]
pub struct InMemoryNoticeRepository {
    notices: RwLock<Vec<Notice>>,
}

#[async_trait::async_trait]
impl NoticeRepository for InMemoryNoticeRepository {
    async fn find_by_id(&self, id: &NoticeId) -> Result<Option<Notice>, RepositoryError> {
        let notices = self.notices.read().await;
        Ok(notices.iter().find(|notice| &notice.id == id).cloned())
    }

    async fn list(&self, kind: Option<NoticeKind>) -> Result<Vec<Notice>, RepositoryError> {
        let notices = self.notices.read().await;
        Ok(notices
            .iter()
            .filter(|notice| kind.map_or(true, |kind| notice.kind == kind))
            .cloned()
            .collect())
    }

    async fn save(&self, notice: Notice) -> Result<(), RepositoryError> {
        let mut notices = self.notices.write().await;
        match notices.iter_mut().find(|existing| existing.id == notice.id) {
            Some(existing) => {
                let posted_on = existing.posted_on;
                *existing = Notice { posted_on, ..notice };
            }
            None => notices.push(notice),
        }
        Ok(())
    }

    async fn delete(&self, id: &NoticeId) -> Result<(), RepositoryError> {
        let mut notices = self.notices.write().await;
        let before = notices.len();
        notices.retain(|notice| &notice.id != id);
        if notices.len() == before {
            return Err(RepositoryError::NotFound { entity: "notice", id: id.0.clone() });
        }
        Ok(())
    }
}
