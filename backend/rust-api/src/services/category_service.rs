use std::sync::Arc;

use crate::error::GameResult;
use crate::models::CategoryInfo;
use crate::store::GameStore;

pub struct CategoryService {
    store: Arc<dyn GameStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    /// Active categories a player can start a session in, pseudo-category last.
    pub async fn list_playable(&self) -> GameResult<Vec<CategoryInfo>> {
        let mut categories: Vec<_> = self
            .store
            .list_categories()
            .await?
            .into_iter()
            .filter(|c| c.is_active)
            .collect();
        categories.sort_by_key(|c| c.is_all_categories());

        Ok(categories
            .into_iter()
            .map(|c| CategoryInfo {
                all_categories: c.is_all_categories(),
                id: c.id,
                name: c.name,
                show_on_homepage: c.show_on_homepage,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{Category, CategoryKind, SeedData};
    use crate::store::InMemoryStore;

    #[tokio::test]
    async fn hides_inactive_and_lists_pseudo_category_last() {
        let category = |id: &str, kind, is_active| Category {
            id: id.into(),
            name: id.into(),
            kind,
            is_active,
            show_on_homepage: true,
        };
        let store = InMemoryStore::with_seed(SeedData {
            categories: vec![
                category("all", CategoryKind::AllCategories, true),
                category("jeans", CategoryKind::Regular, true),
                category("coats", CategoryKind::Regular, false),
            ],
            questions: vec![],
        });

        let listed = CategoryService::new(Arc::new(store)).list_playable().await.unwrap();
        let ids: Vec<_> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["jeans", "all"]);
        assert!(listed[1].all_categories);
    }
}
