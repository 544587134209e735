//! Listing entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use market_core::domain::{Listing, ListingParts};
use market_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    /// Normalized form: line breaks already replaced by markers.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Price in cents.
    pub price: i64,
    pub created_at: DateTimeWithTimeZone,
    pub is_published: bool,
    pub owner_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Listing.
impl From<Model> for Listing {
    fn from(model: Model) -> Self {
        Listing::hydrate(ListingParts {
            id: model.id,
            title: model.title,
            description: model.description,
            price: model.price,
            created_at: model.created_at.into(),
            is_published: model.is_published,
            owner: model.owner_id,
        })
    }
}

/// Conversion from Domain Listing to SeaORM ActiveModel.
///
/// Fails when the listing still lacks an id or a mandatory field, which
/// only happens if it skipped validation.
impl TryFrom<Listing> for ActiveModel {
    type Error = RepoError;

    fn try_from(listing: Listing) -> Result<Self, Self::Error> {
        let parts = listing.into_parts().ok_or_else(|| {
            RepoError::Query("listing is missing a mandatory column".to_string())
        })?;

        Ok(Self {
            id: Set(parts.id),
            title: Set(parts.title),
            description: Set(parts.description),
            price: Set(parts.price),
            created_at: Set(parts.created_at.into()),
            is_published: Set(parts.is_published),
            owner_id: Set(parts.owner),
        })
    }
}
