//! User entity for SeaORM.

use sea_orm::entity::prelude::*;

use blog_core::domain::UserRole;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: Option<String>,
    pub nick: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: DateTimeWithTimeZone,
    pub user_role: i32,
    pub salt: String,
    pub avatar: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for blog_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.username.unwrap_or_default(),
            nick: model.nick.unwrap_or_default(),
            email: model.email.unwrap_or_default(),
            role: UserRole::from_code(model.user_role),
            salt: model.salt,
            avatar: model.avatar.unwrap_or_default(),
            created_at: model.created_at.into(),
            modified_at: model.modified_at.into(),
        }
    }
}
