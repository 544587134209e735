//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use market_core::domain::{Listing, User};
use market_core::error::RepoError;
use market_core::ports::{ListingRepository, UserRepository};
use market_core::resource::ListingFilter;

use super::entity::listing::{self, Entity as ListingEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL listing repository.
pub type PostgresListingRepository = PostgresBaseRepository<ListingEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn query_page(
        &self,
        filter: &ListingFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<Listing>, u64), RepoError> {
        tracing::debug!(?filter, page, page_size, "Querying listings");

        // The paginator multiplies the zero-based page by the page size.
        if page.saturating_sub(1).checked_mul(page_size).is_none() {
            return Err(RepoError::Query(format!("page {page} is out of range")));
        }

        let paginator = ListingEntity::find()
            .filter(condition(filter))
            .order_by_asc(listing::Column::CreatedAt)
            .order_by_asc(listing::Column::Id)
            .paginate(&self.db, page_size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}

fn condition(filter: &ListingFilter) -> Condition {
    let mut cond = Condition::all();

    if let Some(flag) = filter.is_published {
        cond = cond.add(listing::Column::IsPublished.eq(flag));
    }
    if let Some(title) = &filter.title {
        cond = cond.add(listing::Column::Title.contains(title));
    }
    if let Some(description) = &filter.description {
        cond = cond.add(listing::Column::Description.contains(description));
    }

    let price = &filter.price;
    if let Some(b) = price.gt {
        cond = cond.add(listing::Column::Price.gt(b));
    }
    if let Some(b) = price.gte {
        cond = cond.add(listing::Column::Price.gte(b));
    }
    if let Some(b) = price.lt {
        cond = cond.add(listing::Column::Price.lt(b));
    }
    if let Some(b) = price.lte {
        cond = cond.add(listing::Column::Price.lte(b));
    }

    cond
}

// Mask email for logging to avoid PII in logs
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head: String = local.chars().take(1).collect();
            let masked_local = if local.chars().count() > 1 {
                format!("{head}***")
            } else {
                "***".to_string()
            };
            format!("{masked_local}@{domain}")
        }
        None => "***".to_string(),
    }
}
