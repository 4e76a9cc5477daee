use sea_orm_migration::prelude::*;

use blog_core::domain::{ANONYMOUS_USER_ID, DEFAULT_RUBRIC_ID};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(users_table()).await?;
        manager.create_table(rubrics_table()).await?;
        manager.create_table(posts_table()).await?;
        manager.create_table(comments_table()).await?;

        // Rows new posts point at by default.
        let db = manager.get_connection();
        db.execute_unprepared(&seed_anonymous_user()).await?;
        db.execute_unprepared(&seed_default_rubric()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rubrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

fn users_table() -> TableCreateStatement {
    Table::create()
        .table(Users::Table)
        .if_not_exists()
        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Users::Username).string_len(255).null())
        .col(ColumnDef::new(Users::Nick).string_len(255).null())
        .col(ColumnDef::new(Users::Email).string_len(500).null())
        .col(
            ColumnDef::new(Users::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Users::ModifiedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Users::UserRole)
                .integer()
                .not_null()
                .default(-1),
        )
        .col(
            ColumnDef::new(Users::Salt)
                .string_len(25)
                .not_null()
                .default("saltsalt"),
        )
        .col(ColumnDef::new(Users::Avatar).text().null())
        .to_owned()
}

fn rubrics_table() -> TableCreateStatement {
    Table::create()
        .table(Rubrics::Table)
        .if_not_exists()
        .col(ColumnDef::new(Rubrics::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Rubrics::Title).string_len(255).null())
        .col(ColumnDef::new(Rubrics::Description).text().null())
        .to_owned()
}

fn posts_table() -> TableCreateStatement {
    Table::create()
        .table(Posts::Table)
        .if_not_exists()
        .col(ColumnDef::new(Posts::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Posts::Title).string_len(1000).not_null())
        .col(ColumnDef::new(Posts::AuthorId).uuid().null())
        .col(ColumnDef::new(Posts::RubricId).uuid().null())
        .col(ColumnDef::new(Posts::Tags).text().null())
        .col(
            ColumnDef::new(Posts::State)
                .string_len(16)
                .not_null()
                .default("public"),
        )
        .col(ColumnDef::new(Posts::Content).text().not_null())
        .col(
            ColumnDef::new(Posts::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Posts::ModifiedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(Posts::ParentPostId).uuid().null())
        .col(
            ColumnDef::new(Posts::CountOfViews)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Posts::CountOfStars)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Posts::CommentsIds).text().null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_posts_rubric")
                .from(Posts::Table, Posts::RubricId)
                .to(Rubrics::Table, Rubrics::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_posts_author")
                .from(Posts::Table, Posts::AuthorId)
                .to(Users::Table, Users::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn comments_table() -> TableCreateStatement {
    Table::create()
        .table(Comments::Table)
        .if_not_exists()
        .col(ColumnDef::new(Comments::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Comments::AuthorId).uuid().null())
        .col(ColumnDef::new(Comments::Content).text().not_null())
        .col(
            ColumnDef::new(Comments::CountOfStars)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Comments::PostId).uuid().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_comments_post")
                .from(Comments::Table, Comments::PostId)
                .to(Posts::Table, Posts::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_comments_author")
                .from(Comments::Table, Comments::AuthorId)
                .to(Users::Table, Users::Id)
                .on_update(ForeignKeyAction::Cascade)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn seed_anonymous_user() -> String {
    format!(
        "INSERT INTO users (id, username, nick, user_role) \
         VALUES ('{ANONYMOUS_USER_ID}', 'anonymous', 'Anonymous', -1) \
         ON CONFLICT (id) DO NOTHING"
    )
}

fn seed_default_rubric() -> String {
    format!(
        "INSERT INTO rubrics (id, title, description) \
         VALUES ('{DEFAULT_RUBRIC_ID}', 'Go for fun', 'Default rubric') \
         ON CONFLICT (id) DO NOTHING"
    )
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Nick,
    Email,
    CreatedAt,
    ModifiedAt,
    UserRole,
    Salt,
    Avatar,
}

#[derive(DeriveIden)]
enum Rubrics {
    Table,
    Id,
    Title,
    Description,
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    Title,
    AuthorId,
    RubricId,
    Tags,
    State,
    Content,
    CreatedAt,
    ModifiedAt,
    ParentPostId,
    CountOfViews,
    CountOfStars,
    CommentsIds,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    AuthorId,
    Content,
    CountOfStars,
    PostId,
}
